use anyhow::Result;
use std::path::PathBuf;
use winfetch_core::catalog::{CatalogResolver, MatchQuery};
use winfetch_core::config::WinfetchConfig;
use winfetch_core::convert::{export_image, ALL_IMAGES};
use winfetch_core::download::{fetch_image, FetchOutcome};
use winfetch_core::progress::DownloadProgress;
use winfetch_core::tools::ToolSet;
use winfetch_core::transport::Transport;
use winfetch_core::Resolver;

use crate::cli::display::{format_gib, ProgressPrinter};

/// Options for the `esd` command, after defaults from config are applied.
#[derive(Debug, Clone)]
pub struct EsdOptions {
    pub query: MatchQuery,
    pub output: PathBuf,
    pub wim: PathBuf,
    pub convert: bool,
    pub print_url: bool,
}

pub fn run_esd(
    cfg: &WinfetchConfig,
    tools: &ToolSet,
    transport: &dyn Transport,
    opts: &EsdOptions,
) -> Result<()> {
    // Missing archive tools only narrow the extraction chain; the raw scan still runs.
    if let Err(e) = tools.require_catalog_tools() {
        eprintln!("warning: {}", e);
    }
    if opts.convert && !opts.print_url {
        tools.require_converter()?;
    }

    eprintln!("Fetching catalog...");
    let resolver = CatalogResolver::new(transport, tools, &cfg.catalog_url, opts.query.clone());
    let target = resolver.resolve()?;

    if opts.print_url {
        println!("{}", target.url);
        return Ok(());
    }

    match target.size_bytes {
        Some(size) => println!("Found {} ({})", opts.query.edition, format_gib(size)),
        None => println!("Found {}", opts.query.edition),
    }

    let mut printer = ProgressPrinter::new();
    let outcome = fetch_image(transport, &target, &opts.output, &mut |p: &DownloadProgress| {
        printer.update(p)
    });
    printer.finish();

    match outcome? {
        FetchOutcome::AlreadyPresent => {
            println!("{} already exists, skipping download", opts.output.display())
        }
        FetchOutcome::Downloaded { .. } => println!("Downloaded: {}", opts.output.display()),
    }

    if !opts.convert {
        return Ok(());
    }

    println!("Converting ESD to WIM...");
    export_image(tools, &opts.output, ALL_IMAGES, &opts.wim)?;
    println!("Created {}", opts.wim.display());
    println!(
        "Note: {} is a WIM image, not a bootable ISO. Build installation media from it with a dedicated tool.",
        opts.wim.display()
    );
    Ok(())
}
