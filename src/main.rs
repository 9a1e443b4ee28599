use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use foldview::options::Options;
use foldview::scene::image_source::DEMO_IMAGE_URL;
use foldview::Viewer;

/// Fold image layers into pop-up pages.
#[derive(Parser)]
#[command(name = "foldview", version, about)]
struct Cli {
    /// Layer images (paths or http(s) URLs) in selection order.
    images: Vec<String>,

    /// TOML options file.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Also load the demo layer.
    #[arg(long)]
    demo: bool,

    /// Write the effective options to FILE and exit.
    #[arg(long, value_name = "FILE")]
    save_options: Option<PathBuf>,

    /// List the option presets (`*.toml`) in DIR and exit.
    #[arg(long, value_name = "DIR")]
    list_presets: Option<PathBuf>,
}

fn list_presets(dir: &Path) -> ExitCode {
    let mut out = std::io::stdout().lock();
    for name in Options::list_presets(dir) {
        if let Err(e) = writeln!(out, "{name}") {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(dir) = &cli.list_presets {
        return list_presets(dir);
    }

    let options = match cli.options.as_deref().map(Options::load).transpose() {
        Ok(options) => options.unwrap_or_default(),
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = cli.save_options {
        return match options.save(&path) {
            Ok(()) => {
                log::info!("Wrote options to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let mut images = cli.images;
    if cli.demo {
        images.push(DEMO_IMAGE_URL.to_owned());
    }

    match Viewer::builder()
        .with_images(images)
        .with_options(options)
        .build()
        .run()
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
