use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medexp_cli::cli::{
    handle_analytics, handle_claims, handle_dashboard, handle_expense_command,
    handle_export_command, handle_report_command, handle_user_command, require_user,
    AnalyticsArgs, ExpenseCommands, ExportCommands, ReportCommands, UserCommands,
};
use medexp_cli::config::{paths::MedexpPaths, settings::Settings};
use medexp_cli::storage::Storage;

#[derive(Parser)]
#[command(
    name = "medexp",
    version,
    about = "Track medical expenses, insurance claims and tax deductions",
    long_about = "MedExp records medical expenses, follows their insurance claims \
                  through to reimbursement, and produces summary reports and \
                  tax documents from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Account commands
    #[command(subcommand)]
    User(UserCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Headline totals and recent expenses
    Dashboard,

    /// Spending by category and month
    Analytics(AnalyticsArgs),

    /// Insurance claim tracker
    Claims,

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = MedexpPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!("Initialized MedExp at: {}", paths.base_dir().display());
            println!();
            println!("Next: run 'medexp user register <name> <email>' to create an account.");
        }
        Some(Commands::Config) => {
            println!("MedExp Configuration");
            println!("=====================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Date format:         {}", settings.date_format);
            println!("  Recent expenses:     {}", settings.recent_expense_count);
            println!(
                "  Initialized:         {}",
                if paths.is_initialized() { "yes" } else { "no" }
            );
        }
        Some(Commands::User(cmd)) => handle_user_command(&storage, &mut settings, cmd)?,
        Some(Commands::Expense(cmd)) => {
            let user = require_user(&storage, &settings)?;
            handle_expense_command(&storage, &settings, &user, cmd)?;
        }
        Some(Commands::Dashboard) => {
            let user = require_user(&storage, &settings)?;
            handle_dashboard(&storage, &settings, &user)?;
        }
        Some(Commands::Analytics(args)) => {
            let user = require_user(&storage, &settings)?;
            handle_analytics(&storage, &settings, &user, args)?;
        }
        Some(Commands::Claims) => {
            let user = require_user(&storage, &settings)?;
            handle_claims(&storage, &settings, &user)?;
        }
        Some(Commands::Report(cmd)) => {
            let user = require_user(&storage, &settings)?;
            handle_report_command(&storage, &settings, &user, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            let user = require_user(&storage, &settings)?;
            handle_export_command(&storage, &user, cmd)?;
        }
        None => {
            println!("MedExp - medical expense tracking");
            println!();
            println!("Run 'medexp --help' for usage information.");
        }
    }

    Ok(())
}
