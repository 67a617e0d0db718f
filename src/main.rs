use clap::Parser;
use pocketbook::args::{Args, CategorySubcommand, Command, TransactionSubcommand};
use pocketbook::{commands, App, Config, Mode, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for exercising the program without a running server. When
    // POCKETBOOK_IN_TEST_MODE is set and non-zero in length, the mode will be Mode::Test,
    // otherwise it will be Mode::Http.
    let mode = Mode::from_env();

    // Route to the appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.api_url()).await?.print(),

        Command::Signup(credentials) => {
            let app = build_app(home, mode).await?;
            commands::signup(&app, credentials.email(), credentials.password())
                .await?
                .print()
        }

        Command::Login(credentials) => {
            let app = build_app(home, mode).await?;
            commands::login(&app, credentials.email(), credentials.password())
                .await?
                .print()
        }

        Command::Logout => commands::logout(&build_app(home, mode).await?)?.print(),

        Command::Whoami => commands::whoami(&build_app(home, mode).await?)?.print(),

        Command::ResendVerification(email_args) => {
            let app = build_app(home, mode).await?;
            commands::resend_verification(&app, email_args.email())
                .await?
                .print()
        }

        Command::Category(category_args) => {
            let app = build_app(home, mode).await?;
            match category_args.command() {
                CategorySubcommand::List => commands::category_list(&app).await?.print(),
                CategorySubcommand::Add(add) => {
                    commands::category_add(&app, add.name(), add.emoji())
                        .await?
                        .print()
                }
                CategorySubcommand::Update(update) => {
                    commands::category_update(&app, update.id(), update.name(), update.emoji())
                        .await?
                        .print()
                }
                CategorySubcommand::Delete(delete) => {
                    commands::category_delete(&app, delete.id()).await?.print()
                }
            }
        }

        Command::Transaction(transaction_args) => {
            let app = build_app(home, mode).await?;
            match transaction_args.command() {
                TransactionSubcommand::List => commands::transaction_list(&app).await?.print(),
                TransactionSubcommand::Add(fields) => {
                    commands::transaction_add(&app, fields.to_input())
                        .await?
                        .print()
                }
                TransactionSubcommand::Update(update) => {
                    commands::transaction_update(&app, update.id(), update.fields().to_input())
                        .await?
                        .print()
                }
                TransactionSubcommand::Delete(delete) => {
                    commands::transaction_delete(&app, delete.id()).await?.print()
                }
            }
        }

        Command::Dashboard => {
            let app = build_app(home, mode).await?;
            commands::dashboard(&app).await?.print()
        }

        Command::Export(export_args) => {
            let app = build_app(home, mode).await?;
            commands::export(&app, export_args.output()).await?.print()
        }

        Command::Theme(theme_args) => {
            commands::theme(&build_app(home, mode).await?, theme_args.value())?.print()
        }
    };
    Ok(())
}

/// Loads the configuration and wires up the composition root.
async fn build_app(home: &Path, mode: Mode) -> Result<App> {
    let config = Config::load(home).await?;
    Ok(App::new(config, mode))
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
