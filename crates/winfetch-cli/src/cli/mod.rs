//! CLI for winfetch.

mod commands;
mod display;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use winfetch_core::catalog::MatchQuery;
use winfetch_core::config;
use winfetch_core::tools::ToolSet;
use winfetch_core::transport::CurlTransport;

use commands::{run_esd, run_iso, run_tools, EsdOptions};

/// Top-level CLI for winfetch.
#[derive(Debug, Parser)]
#[command(name = "winfetch")]
#[command(about = "winfetch: locate and download Windows installation images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Look up an edition in the vendor catalog, download its ESD and convert it to WIM.
    Esd {
        /// Language code (e.g. en-us). Defaults to the configured query.
        #[arg(long)]
        lang: Option<String>,
        /// Edition identifier (e.g. EnterpriseN).
        #[arg(long)]
        edition: Option<String>,
        /// Architecture (e.g. x64).
        #[arg(long)]
        arch: Option<String>,
        /// Where to save the ESD (default: win.esd).
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Where to write the converted WIM (default: win.wim).
        #[arg(long, value_name = "PATH")]
        wim: Option<PathBuf>,
        /// Download only; skip the ESD to WIM conversion.
        #[arg(long)]
        no_convert: bool,
        /// Print the resolved URL and exit without downloading.
        #[arg(long)]
        print_url: bool,
    },

    /// Discover an evaluation ISO without a catalog and download it.
    Iso {
        /// Where to save the ISO (default: win.iso).
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Print the discovered URL and exit without downloading.
        #[arg(long)]
        print_url: bool,
    },

    /// Show which extraction and conversion tools are installed.
    Tools,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let tools = ToolSet::detect();
        let transport = CurlTransport::new();

        match cli.command {
            CliCommand::Esd {
                lang,
                edition,
                arch,
                output,
                wim,
                no_convert,
                print_url,
            } => {
                let query = MatchQuery::new(
                    lang.unwrap_or_else(|| cfg.query.language.clone()),
                    edition.unwrap_or_else(|| cfg.query.edition.clone()),
                    arch.unwrap_or_else(|| cfg.query.architecture.clone()),
                );
                let opts = EsdOptions {
                    query,
                    output: output.unwrap_or_else(|| cfg.output.esd_file.clone()),
                    wim: wim.unwrap_or_else(|| cfg.output.wim_file.clone()),
                    convert: !no_convert,
                    print_url,
                };
                run_esd(&cfg, &tools, &transport, &opts)?;
            }
            CliCommand::Iso { output, print_url } => {
                let output = output.unwrap_or_else(|| cfg.output.iso_file.clone());
                run_iso(&cfg, &transport, &output, print_url)?;
            }
            CliCommand::Tools => run_tools(&tools),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
