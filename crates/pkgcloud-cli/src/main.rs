//! pkgcloud-resource - CI put resource for a hosted package service
//!
//! Reads a JSON request on stdin, publishes a package or deletes packages by
//! version, and prints the resulting version and metadata as JSON on stdout.
//! Logs and diagnostics go to stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "pkgcloud-resource")]
#[command(version)]
#[command(about = "Publish deb/rpm packages to a package service from CI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package service URL, overrides source.url
    #[arg(long, global = true, env = "PKGCLOUD_API_URL")]
    api_url: Option<String>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a put step
    Out {
        /// Working directory holding the build outputs
        work_dir: PathBuf,

        /// Read the request from a file instead of stdin
        #[arg(long)]
        request: Option<PathBuf>,
    },
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout is reserved for the result document
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display; CI logs are not terminals, keep
    // messages on one line
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().wrap_lines(false).build())
    }));
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Commands::Out { work_dir, request } => {
            commands::out::run(&work_dir, request.as_deref(), cli.api_url.as_deref()).await
        }
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
