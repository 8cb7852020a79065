use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tidrapport::cli::{
    backup_manager, handle_backup_command, handle_entry_command, handle_export_command,
    BackupCommands, EntryCommands, ExportFormat,
};
use tidrapport::config::paths::TidrapportPaths;
use tidrapport::models::Money;
use tidrapport::storage::{Storage, REPORT_PREFIX};
use tidrapport::TidrapportError;

#[derive(Parser)]
#[command(
    name = "tidrapport",
    version,
    about = "Terminal time reporting with rolling snapshot backups",
    long_about = "Tidrapport keeps a journal of worked shifts, computes pay from \
                  your hourly rate and tax, takes rolling snapshot backups of the \
                  journal, and exports it as JSON, YAML, CSV or TSV."
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Time entry commands
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Save a copy of the journal to the backup directory
    Save,

    /// Export the journal to a file
    Export {
        /// Output file path
        output: PathBuf,

        /// Export format (defaults to the file extension, then JSON)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show configuration and paths, optionally changing pay rules
    Config {
        /// Hourly rate in kronor (e.g. "165" or "165,50")
        #[arg(long)]
        hourly_rate: Option<String>,

        /// Tax rate in percent
        #[arg(long)]
        tax_rate: Option<f64>,

        /// Pay multiplier for red days
        #[arg(long)]
        red_day_multiplier: Option<f64>,

        /// Sick pay in percent of normal pay
        #[arg(long)]
        sick_pay: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let paths = TidrapportPaths::new()?;
    let mut storage = Storage::new(paths)?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Entry(cmd)) => handle_entry_command(&storage, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&mut storage, cmd)?,
        Some(Commands::Save) => {
            let entries = storage.entries.get_all()?;
            let file_name = storage.snapshot_store().write_with_prefix(
                REPORT_PREFIX,
                &entries,
                &storage.settings.pay,
            )?;
            println!("Saved {} entries to: {}", entries.len(), file_name);
        }
        Some(Commands::Export {
            output,
            format,
            pretty,
        }) => handle_export_command(&storage, &output, format, pretty)?,
        Some(Commands::Config {
            hourly_rate,
            tax_rate,
            red_day_multiplier,
            sick_pay,
        }) => {
            let changed = hourly_rate.is_some()
                || tax_rate.is_some()
                || red_day_multiplier.is_some()
                || sick_pay.is_some();

            if changed {
                let mut pay = storage.settings.pay.clone();
                if let Some(rate) = hourly_rate {
                    pay.hourly_rate = Money::parse(&rate).map_err(|e| {
                        TidrapportError::Validation(format!(
                            "Invalid hourly rate: '{}'. {}",
                            rate, e
                        ))
                    })?;
                }
                if let Some(tax) = tax_rate {
                    pay.tax_rate_percent = tax;
                }
                if let Some(multiplier) = red_day_multiplier {
                    pay.red_day_multiplier = multiplier;
                }
                if let Some(sick) = sick_pay {
                    pay.sick_pay_percent = sick;
                }
                pay.validate()
                    .map_err(|e| TidrapportError::Validation(e.to_string()))?;

                storage.settings.pay = pay;
                storage.settings.save(storage.paths())?;
                println!("Pay settings updated. New entries use the new rules.");
                println!();
            }

            let paths = storage.paths();
            let pay = &storage.settings.pay;
            println!("Tidrapport Configuration");
            println!("========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Pay settings:");
            println!("  Hourly rate:        {}", pay.hourly_rate);
            println!("  Tax rate:           {}%", pay.tax_rate_percent);
            println!("  Red day multiplier: {}", pay.red_day_multiplier);
            println!("  Sick pay:           {}%", pay.sick_pay_percent);
            println!();

            let policy = backup_manager(&storage).backup_settings();
            println!("Backups:");
            println!(
                "  Automatic: {} (every {}h, keep {})",
                if policy.auto_backup_enabled { "enabled" } else { "disabled" },
                policy.interval_hours,
                policy.max_backups
            );
        }
        None => {
            println!("Tidrapport - time reporting with rolling backups");
            println!();
            println!("Run 'tidrapport --help' for usage information.");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
