use std::path::Path;

fn main() {
    // Only needed when the gui feature is enabled.
    if std::env::var("CARGO_FEATURE_GUI").is_err() {
        return;
    }

    // rust-embed needs the foldview-ui dist directory to exist before
    // `trunk build` has ever run, so write a placeholder page.
    let dist = Path::new("crates/foldview-ui/dist");
    let index = dist.join("index.html");
    if !index.exists() {
        if let Err(e) = std::fs::create_dir_all(dist).and_then(|()| {
            std::fs::write(
                &index,
                "<!DOCTYPE html><html><body>foldview-ui not built</body></html>",
            )
        }) {
            println!("cargo:warning=could not write placeholder UI: {e}");
        }
    }

    println!("cargo:rerun-if-changed=crates/foldview-ui/dist");
}
