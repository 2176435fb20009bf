use crate::options::Args;
use anyhow::Context;
use clap::Parser;
use credcheck::config::Config;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod options {
    use credcheck::export::{Format, Selection};
    use std::path::PathBuf;

    #[derive(Debug, clap::Parser)]
    #[command(
        name = "credcheck",
        about = "Reconcile creditors between the controls of group 7 and group 8 of a ledger export"
    )]
    pub enum Args {
        /// Reconcile a semicolon-separated balance export and write the report as CSV.
        ///
        /// Divergent lines are written first, followed by the correct ones.
        Check {
            /// A RON configuration file, as printed by `default-config`.
            #[clap(long, short = 'c')]
            config: Option<PathBuf>,
            /// The amount of mask segments after the group to compare, overriding the configuration.
            #[clap(long, short = 'd')]
            depth: Option<usize>,
            /// The delimiter of input and output, overriding the configuration.
            #[clap(long)]
            delimiter: Option<char>,
            /// How to render values, either 'raw' or 'brl'.
            #[clap(long, short = 'f', default_value = "raw")]
            format: Format,
            /// Which lines to write, one of 'all', 'correct' or 'divergent'.
            #[clap(long, default_value = "all")]
            only: Selection,
            /// Write the report to this file instead of stdout.
            #[clap(long, short = 'o')]
            output: Option<PathBuf>,
            /// The CSV file exported from the accounting system.
            csv_file: PathBuf,
        },
        /// Print the default configuration, to be used as starting point for `check --config`.
        DefaultConfig,
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = options::Args::parse();
    match args {
        Args::Check {
            config,
            depth,
            delimiter,
            format,
            only,
            output,
            csv_file,
        } => {
            let mut config = match config {
                Some(path) => Config::from_path(&path).with_context(|| {
                    format!("Could not load configuration from '{}'", path.display())
                })?,
                None => Config::default(),
            };
            if let Some(depth) = depth {
                config.depth = depth;
            }
            if let Some(delimiter) = delimiter {
                config.delimiter = delimiter;
            }
            let options = credcheck::check::Options {
                config,
                format,
                selection: only,
            };
            let input = into_read(&csv_file)?;
            let outcome = match output {
                Some(path) => {
                    let out = std::fs::File::create(&path).with_context(|| {
                        format!("Could not create report file at '{}'", path.display())
                    })?;
                    credcheck::check(input, std::io::BufWriter::new(out), options)
                }
                None => credcheck::check(
                    input,
                    std::io::BufWriter::new(std::io::stdout()),
                    options,
                ),
            };
            outcome.with_context(|| format!("Could not check '{}'", csv_file.display()))?;
        }
        Args::DefaultConfig => println!("{}", Config::default().to_ron()?),
    };
    Ok(())
}

/// Log to stderr so stdout remains usable for the report, filtered by `RUST_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn into_read(file_path: &Path) -> anyhow::Result<impl std::io::Read> {
    let data = std::fs::read(file_path).with_context(|| {
        format!("Could not read from CSV file at '{}'", file_path.display())
    })?;
    Ok(std::io::Cursor::new(data))
}
