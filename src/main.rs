//! bpbook CLI
//!
//! Command-line interface for the blood pressure log:
//! - Add, edit and delete measurements
//! - List recent or all entries
//! - Draw the chart
//! - Import/Export CSV

use anyhow::{bail, Context};
use bpbook::app::{BookOptions, BpBook};
use bpbook::config::{generate_default_config, Config, LoggingConfig};
use bpbook::repository::{AddForm, Confirm, EditRequest};
use bpbook::storage::{Entry, KeyValueStore, MemoryStore, SqliteStore};
use bpbook::view::{render_table, RangeMode};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bpbook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal blood pressure log")]
#[command(long_about = "bpbook records blood pressure and pulse readings.\nBrowse them, chart the trend, and move them in and out as CSV.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides the configured path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log debug output to stderr (default: the configured level)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a measurement
    Add {
        /// Systolic pressure (mmHg)
        #[arg(short, long)]
        systolic: String,
        /// Diastolic pressure (mmHg)
        #[arg(short, long)]
        diastolic: String,
        /// Pulse (bpm)
        #[arg(short, long)]
        pulse: String,
        /// When it was taken (default: now). Supports "YYYY-MM-DDTHH:MM", RFC 3339, epoch milliseconds
        #[arg(long)]
        at: Option<String>,
    },

    /// Change the values of an entry; missing values are asked for
    Edit {
        /// Entry id
        id: String,
        #[arg(short, long)]
        systolic: Option<String>,
        #[arg(short, long)]
        diastolic: Option<String>,
        #[arg(short, long)]
        pulse: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show entries (home = recent, all = everything)
    List {
        #[arg(default_value = "home")]
        page: String,
    },

    /// Write the chart as SVG
    Chart {
        /// Range: 30, 90 or all (default: configured range)
        #[arg(short, long)]
        range: Option<RangeMode>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge entries from a CSV file
    Import {
        /// Path to CSV file
        path: PathBuf,
    },

    /// Export all entries as CSV
    Export {
        /// Output file (default: bpbook.csv, "-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Needs neither config nor store
    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let config = Config::resolve(cli.config.as_deref())?;
    bpbook::logging::init(&log_settings(&config.logging, cli.verbose));

    let options = BookOptions::from_config(&config)?;
    let store = open_store(&cli, &config)?;
    let mut book = BpBook::open(store, options);

    run(&mut book, cli.command)
}

fn run(book: &mut BpBook, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Add {
            systolic,
            diastolic,
            pulse,
            at,
        } => {
            let at = at.unwrap_or_else(|| Utc::now().timestamp_millis().to_string());
            let entry = book.add(&AddForm::new(at, systolic, diastolic, pulse))?;
            println!(
                "Added {} at {}",
                entry.id,
                book.zone().format_row_time(entry.ts)
            );
        }

        Commands::Edit {
            id,
            systolic,
            diastolic,
            pulse,
        } => {
            let Some(current) = book.entry(&id).cloned() else {
                bail!("No entry with id {}", id);
            };

            let request = edit_request(&current, systolic, diastolic, pulse)?;
            if let Some(entry) = book.edit(&id, &request)? {
                println!("Updated {}: {}/{} {}", entry.id, entry.s, entry.d, entry.p);
            }
        }

        Commands::Delete { id, yes } => {
            if book.entry(&id).is_none() {
                bail!("No entry with id {}", id);
            }

            let removed = if yes {
                book.delete(&id, &|_: &str| true)?
            } else {
                book.delete(&id, &StdinConfirm)?
            };

            match removed {
                Some(entry) => println!("Deleted {}", entry.id),
                None => println!("Kept {}", id),
            }
        }

        Commands::List { page } => {
            book.navigate(Some(&page));
            print!("{}", render_table(book.screen().rows()));
        }

        Commands::Chart { range, output } => {
            if let Some(mode) = range {
                book.set_range(mode);
            }
            let Some(chart) = book.chart() else {
                bail!("Chart rendering is disabled in the configuration");
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, &chart.document)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Chart ({} points) written to {:?}", chart.chart.len(), path);
                }
                None => print!("{}", chart.document),
            }
        }

        Commands::Import { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let summary = book.import_csv(&text)?;
            println!(
                "Imported {} rows ({} new, {} replaced, {} skipped)",
                summary.parsed, summary.appended, summary.replaced, summary.skipped
            );
        }

        Commands::Export { output } => {
            let export = book.export_csv()?;
            let path = output.unwrap_or_else(|| PathBuf::from(&export.filename));

            if path == Path::new("-") {
                println!("{}", export.content);
            } else {
                std::fs::write(&path, &export.content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Exported {} entries to {:?}", book.len(), path);
            }
        }

        Commands::Config { output } => write_default_config(output.as_deref())?,
    }

    Ok(())
}

/// `-v` raises the configured level to debug; otherwise it is kept
fn log_settings(configured: &LoggingConfig, verbose: bool) -> LoggingConfig {
    let mut logging = configured.clone();
    if verbose {
        logging.level = "debug".to_string();
    }
    logging
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn open_store(cli: &Cli, config: &Config) -> anyhow::Result<Box<dyn KeyValueStore>> {
    if cli.ephemeral {
        return Ok(Box::new(MemoryStore::new()));
    }

    let path = cli.db.clone().unwrap_or_else(|| config.db_path());
    let store = SqliteStore::open(&path)
        .with_context(|| format!("Failed to open database {:?}", path))?;
    Ok(Box::new(store))
}

/// Fill in missing values by asking, offering the current value as default
fn edit_request(
    current: &Entry,
    systolic: Option<String>,
    diastolic: Option<String>,
    pulse: Option<String>,
) -> anyhow::Result<EditRequest> {
    let systolic = match systolic {
        Some(value) => value,
        None => ask_with_default("Systolic", current.s)?,
    };
    let diastolic = match diastolic {
        Some(value) => value,
        None => ask_with_default("Diastolic", current.d)?,
    };
    let pulse = match pulse {
        Some(value) => value,
        None => ask_with_default("Pulse", current.p)?,
    };

    Ok(EditRequest::parse(&systolic, &diastolic, &pulse)?)
}

fn ask_with_default(label: &str, current: i32) -> io::Result<String> {
    let answer = prompt_line(&format!("{} [{}]: ", label, current))?;
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer
    })
}

fn prompt_line(question: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", question)?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Asks on the terminal; anything but y/yes declines
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match prompt_line(&format!("{} [y/N] ", prompt)) {
            Ok(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "bpbook", "--ephemeral", "add", "-s", "120", "-d", "80", "-p", "65",
        ])
        .unwrap();

        assert!(cli.ephemeral);
        assert!(matches!(
            cli.command,
            Commands::Add { ref systolic, at: None, .. } if systolic == "120"
        ));
    }

    #[test]
    fn test_parse_chart_range() {
        let cli = Cli::try_parse_from(["bpbook", "chart", "--range", "all"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chart {
                range: Some(RangeMode::All),
                output: None
            }
        ));

        assert!(Cli::try_parse_from(["bpbook", "chart", "--range", "7"]).is_err());
    }

    #[test]
    fn test_log_level_follows_config_unless_verbose() {
        let configured = LoggingConfig {
            level: "trace".to_string(),
            ..LoggingConfig::default()
        };

        assert_eq!(log_settings(&configured, false).level, "trace");
        assert_eq!(log_settings(&configured, true).level, "debug");
        assert_eq!(log_settings(&configured, true).format, configured.format);
    }

    #[test]
    fn test_edit_request_uses_given_values() {
        let current = Entry::with_id("a", 0, bpbook::storage::Vitals::new(120, 80, 65));
        let request = edit_request(
            &current,
            Some("130".into()),
            Some("85".into()),
            Some("70".into()),
        )
        .unwrap();

        assert_eq!(request, EditRequest::new(130, 85, 70));
    }
}
