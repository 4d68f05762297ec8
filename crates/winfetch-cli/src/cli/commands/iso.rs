use anyhow::Result;
use std::path::Path;
use winfetch_core::config::WinfetchConfig;
use winfetch_core::download::{fetch_image, FetchOutcome};
use winfetch_core::heuristic::HeuristicResolver;
use winfetch_core::progress::DownloadProgress;
use winfetch_core::transport::Transport;

use crate::cli::display::ProgressPrinter;

/// Discovers an ISO URL heuristically and downloads it to `output`.
pub fn run_iso(
    cfg: &WinfetchConfig,
    transport: &dyn Transport,
    output: &Path,
    print_url: bool,
) -> Result<()> {
    eprintln!("Searching for a Windows ISO...");
    let target = HeuristicResolver::new(transport, &cfg.heuristic, &cfg.probe).discover();

    if print_url {
        println!("{}", target.url);
        return Ok(());
    }

    println!("Downloading: {}", target.url);
    println!("Saving as: {}", output.display());
    let mut printer = ProgressPrinter::new();
    let outcome = fetch_image(transport, &target, output, &mut |p: &DownloadProgress| {
        printer.update(p)
    });
    printer.finish();

    match outcome? {
        FetchOutcome::AlreadyPresent => {
            println!("{} already exists, skipping download", output.display())
        }
        FetchOutcome::Downloaded { .. } => println!("Downloaded: {}", output.display()),
    }
    Ok(())
}
