use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use memprobe::config::{load_config, validate_config};
use memprobe::dump::{dump_app, dump_memory};
use memprobe::region::ProtectionFilter;
use memprobe::remote::{HttpMemoryAccess, MemoryAccess};

/// Client for the remote process-memory inspection service
#[derive(Parser)]
#[command(name = "memprobe", version, about)]
struct Cli {
    /// Server host, overriding the configuration file
    #[arg(long, global = true)]
    host: Option<String>,

    /// Server port, overriding the configuration file
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the target's memory regions
    Regions {
        /// Target process id
        pid: i32,
    },
    /// Dump matching memory regions into a zip archive
    DumpMemory {
        /// Target process id
        pid: i32,
        /// Protection filter in compact form, e.g. r+w*x-
        #[arg(long, default_value = "r+w*x-")]
        protection: ProtectionFilter,
        /// Output path; defaults to the suggested archive name
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Dump the application bundle, neutralizing the encryption marker
    DumpApp {
        /// Target process id
        pid: i32,
        /// Output path; defaults to the suggested archive name
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config().context("loading configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    validate_config(&config).context("validating configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(false)
        .init();

    info!(
        "memprobe v{} -> http://{}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.host,
        config.server.port
    );

    let access = HttpMemoryAccess::from_config(&config)?;

    match cli.command {
        Command::Regions { pid } => {
            access.open_process(pid).await?;
            let regions = access.enumerate_regions().await?;
            let mut stdout = std::io::stdout().lock();
            for region in &regions {
                writeln!(
                    stdout,
                    "{:016x}-{:016x} {} {}",
                    region.start,
                    region.end,
                    region.protection,
                    region.file_path.as_deref().unwrap_or("")
                )?;
            }
            info!(count = regions.len(), "regions listed");
        }
        Command::DumpMemory {
            pid,
            protection,
            output,
        } => {
            let dump = dump_memory(&access, pid, &protection, print_progress).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&dump.file_name));
            std::fs::write(&path, &dump.archive)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                entries = dump.entry_count,
                path = %path.display(),
                "memory dump written"
            );
        }
        Command::DumpApp { pid, output } => {
            access.open_process(pid).await?;
            let dump = dump_app(&access, pid, print_progress).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(&dump.file_name));
            std::fs::write(&path, &dump.archive)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                bundle = %dump.bundle_name,
                entries = dump.entry_count,
                path = %path.display(),
                "bundle dump written"
            );
        }
    }

    Ok(())
}

fn print_progress(fraction: f32) {
    eprint!("\r{:>5.1}%", f64::from(fraction) * 100.0);
    if fraction >= 1.0 {
        eprintln!();
    }
}
