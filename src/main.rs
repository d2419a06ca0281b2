use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use traffic_cli::cli::{
    handle_category_command, handle_export_command, handle_import_command, handle_record_command,
    handle_report_command, CategoryCommands, ExportArgs, ImportArgs, RecordCommands, ReportArgs,
};
use traffic_cli::config::{paths::TrafficPaths, settings::Settings};
use traffic_cli::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "traffic",
    version,
    about = "Track categorized monthly traffic and report on it",
    long_about = "traffic-cli keeps a list of categorized, month-bucketed traffic \
                  measurements and renders monthly and yearly reports with \
                  per-category breakdowns from the command line."
)]
struct Cli {
    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default categories
    Init,

    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(CategoryCommands),

    /// Record management commands
    #[command(subcommand, alias = "rec")]
    Record(RecordCommands),

    /// Monthly or yearly traffic report
    Report(ReportArgs),

    /// Export all data to a file
    Export(ExportArgs),

    /// Replace all data with the contents of an export file
    Import(ImportArgs),

    /// Show current configuration and paths
    Config,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    // Initialize paths and settings
    let paths = TrafficPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(&paths, &settings)?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing traffic-cli at: {}", paths.base_dir().display());
            let created = initialize_storage(&storage)?;
            settings.save(&paths)?;
            if created > 0 {
                println!("Created {} default categories.", created);
            } else {
                println!("Categories already exist; nothing to do.");
            }
            println!("Run 'traffic category list' to see all categories.");
        }
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Record(cmd)) => handle_record_command(&storage, &settings, cmd)?,
        Some(Commands::Report(args)) => handle_report_command(&storage, &settings, args)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, args)?,
        Some(Commands::Import(args)) => handle_import_command(&storage, args)?,
        Some(Commands::Config) => {
            println!("traffic-cli Configuration");
            println!("=========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Page size:          {}", settings.page_size);
            println!("  Unknown category:   {}", settings.unknown_category_label);
            println!("  Default view:       {}", settings.default_view_mode);
            println!("  Audit enabled:      {}", settings.audit_enabled);
        }
        Some(Commands::Audit { limit }) => match storage.audit() {
            Some(logger) => {
                let entries = logger.read_recent(limit)?;
                if entries.is_empty() {
                    println!("No audit entries.");
                }
                for entry in entries {
                    println!("{}", entry.format_human_readable());
                }
            }
            None => println!("Audit logging is disabled."),
        },
        None => {
            println!("traffic-cli - Categorized monthly traffic tracker");
            println!();
            println!("Run 'traffic --help' for usage information.");
            println!("Run 'traffic init' to create the default categories.");
        }
    }

    Ok(())
}
