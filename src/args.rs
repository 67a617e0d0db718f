//! These structs provide the CLI interface for the pocketbook CLI.

use crate::commands::Theme;
use crate::model::{Amount, TransactionInput, TransactionKind};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;
use uuid::Uuid;

/// pocketbook: a command-line client for a personal-finance REST API.
///
/// Run `pocketbook init --api-url <URL>` once to point the client at your backend, then
/// `pocketbook signup` / `pocketbook login` to establish a session. All other commands use
/// the stored session token.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where pocketbook configuration and client storage are held.
    /// Defaults to ~/pocketbook
    #[arg(long, env = "POCKETBOOK_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. Pass the base URL of your backend as
    /// --api-url; everything else is derived from it.
    Init(InitArgs),

    /// Create a new account.
    Signup(CredentialArgs),

    /// Log in and store the session token.
    Login(CredentialArgs),

    /// Clear the stored session token.
    Logout,

    /// Show whether a session token is stored.
    Whoami,

    /// Resend the signup verification email.
    ResendVerification(EmailArgs),

    /// List and manage spending categories.
    Category(CategoryArgs),

    /// List and manage transactions.
    Transaction(TransactionArgs),

    /// Show the financial summary and spending by category.
    Dashboard,

    /// Download all transactions as a CSV file.
    Export(ExportArgs),

    /// Show or set the display theme.
    Theme(ThemeArgs),
}

/// Args for the `pocketbook init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the backend, e.g. http://localhost:8000
    #[arg(long)]
    api_url: String,
}

impl InitArgs {
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Email and password, used by signup and login.
#[derive(Debug, Parser, Clone)]
pub struct CredentialArgs {
    /// The account email address.
    #[arg(long)]
    email: String,

    /// The account password.
    #[arg(long)]
    password: String,
}

impl CredentialArgs {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[derive(Debug, Parser, Clone)]
pub struct EmailArgs {
    /// The account email address.
    #[arg(long)]
    email: String,
}

impl EmailArgs {
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Parser, Clone)]
pub struct CategoryArgs {
    #[command(subcommand)]
    command: CategorySubcommand,
}

impl CategoryArgs {
    pub fn command(&self) -> &CategorySubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategorySubcommand {
    /// List all categories.
    List,
    /// Create a category.
    Add(CategoryAddArgs),
    /// Rename a category or change its emoji.
    Update(CategoryUpdateArgs),
    /// Delete a category. Refused by the backend while transactions reference it.
    Delete(IdArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct CategoryAddArgs {
    /// The display name.
    #[arg(long)]
    name: String,

    /// An optional emoji shown next to the name.
    #[arg(long)]
    emoji: Option<String>,
}

impl CategoryAddArgs {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emoji(&self) -> Option<String> {
        self.emoji.clone()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct CategoryUpdateArgs {
    /// The category id.
    #[arg(long)]
    id: Uuid,

    /// The new display name.
    #[arg(long)]
    name: String,

    /// An optional emoji shown next to the name.
    #[arg(long)]
    emoji: Option<String>,
}

impl CategoryUpdateArgs {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emoji(&self) -> Option<String> {
        self.emoji.clone()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct TransactionArgs {
    #[command(subcommand)]
    command: TransactionSubcommand,
}

impl TransactionArgs {
    pub fn command(&self) -> &TransactionSubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionSubcommand {
    /// List all transactions.
    List,
    /// Record a transaction.
    Add(TransactionFieldArgs),
    /// Rewrite a transaction.
    Update(TransactionUpdateArgs),
    /// Delete a transaction.
    Delete(IdArgs),
}

/// The fields of a transaction, used for both add and update.
#[derive(Debug, Parser, Clone)]
pub struct TransactionFieldArgs {
    /// The amount, e.g. 4.50 or -$1,200.00
    #[arg(long, allow_hyphen_values = true)]
    amount: Amount,

    /// Whether this is income or an expense.
    #[arg(long, value_enum, default_value_t = TransactionKind::Expense)]
    kind: TransactionKind,

    /// The calendar date, e.g. 2025-11-02
    #[arg(long)]
    date: NaiveDate,

    /// Free-text description.
    #[arg(long)]
    description: Option<String>,

    /// The id of the owning category.
    #[arg(long)]
    category: Uuid,
}

impl TransactionFieldArgs {
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> Option<String> {
        self.description.clone()
    }

    pub fn category(&self) -> Uuid {
        self.category
    }

    /// Builds the request body these fields describe.
    pub fn to_input(&self) -> TransactionInput {
        TransactionInput {
            amount: self.amount,
            kind: self.kind,
            date: self.date,
            description: self.description.clone(),
            category_id: self.category,
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct TransactionUpdateArgs {
    /// The transaction id.
    #[arg(long)]
    id: Uuid,

    #[clap(flatten)]
    fields: TransactionFieldArgs,
}

impl TransactionUpdateArgs {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn fields(&self) -> &TransactionFieldArgs {
        &self.fields
    }
}

#[derive(Debug, Parser, Clone)]
pub struct IdArgs {
    /// The entity id.
    #[arg(long)]
    id: Uuid,
}

impl IdArgs {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Where to write the CSV file.
    #[arg(long)]
    output: PathBuf,
}

impl ExportArgs {
    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ThemeArgs {
    /// The theme to set; omit to show the current theme.
    value: Option<Theme>,
}

impl ThemeArgs {
    pub fn value(&self) -> Option<Theme> {
        self.value
    }
}

/// A `PathBuf` wrapper whose `Display` lets clap show a default value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DisplayPath(PathBuf);

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DisplayPath(PathBuf::from(s)))
    }
}

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

/// `$HOME/pocketbook`, or `./pocketbook` if the home directory cannot be determined.
fn default_home() -> DisplayPath {
    let base = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    DisplayPath(base.join("pocketbook"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction_add() {
        let args = Args::try_parse_from([
            "pocketbook",
            "transaction",
            "add",
            "--amount",
            "-$1,200.00",
            "--kind",
            "expense",
            "--date",
            "2025-11-02",
            "--category",
            "7f2c1b7e-0f3a-4a6e-9d2b-1c9f6a3e5d40",
        ])
        .unwrap();
        match args.command() {
            Command::Transaction(t) => match t.command() {
                TransactionSubcommand::Add(fields) => {
                    assert_eq!(fields.kind(), TransactionKind::Expense);
                    assert_eq!(fields.amount().to_string(), "-$1,200.00");
                }
                other => panic!("unexpected subcommand {other:?}"),
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_login() {
        let args = Args::try_parse_from([
            "pocketbook",
            "login",
            "--email",
            "a@b.c",
            "--password",
            "pw",
        ])
        .unwrap();
        match args.command() {
            Command::Login(c) => {
                assert_eq!(c.email(), "a@b.c");
                assert_eq!(c.password(), "pw");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_theme_optional_value() {
        let args = Args::try_parse_from(["pocketbook", "theme"]).unwrap();
        match args.command() {
            Command::Theme(t) => assert!(t.value().is_none()),
            other => panic!("unexpected command {other:?}"),
        }
        let args = Args::try_parse_from(["pocketbook", "theme", "dark"]).unwrap();
        match args.command() {
            Command::Theme(t) => assert_eq!(t.value(), Some(Theme::Dark)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_default_home_is_under_home_dir() {
        let home = default_home();
        assert!(home.path().ends_with("pocketbook"));
    }
}
