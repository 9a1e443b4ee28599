//! Workspace build tasks.
//!
//! ```text
//! cargo run -p foldview-xtask -- build-ui [--release]
//! cargo run -p foldview-xtask -- run [--release] [-- <foldview args>]
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "foldview build tasks")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the panel UI bundle with trunk into crates/foldview-ui/dist.
    BuildUi {
        /// Optimized build.
        #[arg(long)]
        release: bool,
    },
    /// Build the panel UI, then run the viewer.
    Run {
        /// Optimized build.
        #[arg(long)]
        release: bool,
        /// Arguments forwarded to foldview.
        #[arg(last = true)]
        args: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = workspace_root()?;
    match cli.task {
        Task::BuildUi { release } => build_ui(&root, release),
        Task::Run { release, args } => {
            build_ui(&root, release)?;
            let mut cmd = Command::new(cargo());
            let _ = cmd.current_dir(&root).args(["run", "--bin", "foldview"]);
            if release {
                let _ = cmd.arg("--release");
            }
            let _ = cmd.arg("--").args(&args);
            run(&mut cmd)
        }
    }
}

fn build_ui(root: &Path, release: bool) -> Result<()> {
    let mut cmd = Command::new("trunk");
    let _ = cmd.current_dir(root.join("crates/foldview-ui")).arg("build");
    if release {
        let _ = cmd.arg("--release");
    }
    run(&mut cmd).context("trunk build failed (install with `cargo install trunk`)")
}

fn run(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("spawning {:?}", cmd.get_program()))?;
    if !status.success() {
        bail!("{:?} exited with {status}", cmd.get_program());
    }
    Ok(())
}

fn cargo() -> String {
    std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_owned())
}

fn workspace_root() -> Result<PathBuf> {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}
