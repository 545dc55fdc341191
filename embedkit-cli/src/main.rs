//! `embedkit`: run an embedded app account session from the terminal.
//!
//! The host is the in-process mock bridge, so the whole flow (launch
//! parameters, account discovery, selection, persistence and the resulting
//! embedded URL) can be exercised without a wallet.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use embedkit_core::bridge::MockBridge;
use embedkit_core::storage::{MemoryPreferenceStore, PreferenceStore};
use embedkit_core::{Account, AccountRequestOutcome, SessionConfig, SessionController};
use eyre::{eyre, Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod store;

use store::FilePreferenceStore;

#[derive(Parser)]
#[command(author, version, about = "Drive an embedded app account session against a mock host")]
struct Cli {
    /// Launch parameters as JSON (`webAppName`, `webUrl`, `currencies`).
    #[arg(long, env = "EMBEDKIT_PARAMS")]
    params: Option<String>,

    /// Account the session should open with.
    #[arg(long)]
    account_id: Option<String>,

    /// JSON file listing the host's accounts. Demo accounts are used otherwise.
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Preferences file. Defaults to the user data directory.
    #[arg(long, env = "EMBEDKIT_PREFS", conflicts_with = "ephemeral")]
    prefs: Option<PathBuf>,

    /// Keep preferences in memory for this run only.
    #[arg(long)]
    ephemeral: bool,

    /// Report the embedded frame as loaded before printing.
    #[arg(long)]
    loaded: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the session and print the view.
    Show,
    /// Select one of the listed accounts by id.
    Select {
        /// Account id.
        id: String,
    },
    /// Ask the host to pick an account.
    Request,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = SessionConfig::from_query(cli.params.as_deref(), cli.account_id.as_deref())
        .wrap_err("invalid launch parameters")?;
    let bridge = Rc::new(match &cli.accounts {
        Some(path) => MockBridge::new(read_accounts(path)?),
        None => MockBridge::with_sample_accounts(),
    });
    let store = preference_store(&cli)?;

    let controller = SessionController::new(config, bridge, store);
    controller.start().await?;

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => {}
        Command::Select { id } => {
            let account = controller
                .state()
                .accounts
                .into_iter()
                .find(|account| account.id == id)
                .ok_or_else(|| eyre!("no selectable account with id {id}"))?;
            controller.select_account(Some(account))?;
        }
        Command::Request => match controller.request_account().await? {
            AccountRequestOutcome::Selected(account) => info!(id = %account.id, "host picked account"),
            AccountRequestOutcome::Ignored(err) => info!(%err, "account request ignored"),
            AccountRequestOutcome::Discarded => {}
        },
    }

    if cli.loaded {
        controller.content_loaded(&controller.embedded_url());
    }

    println!("{}", serde_json::to_string_pretty(&controller.view())?);
    controller.teardown();
    Ok(())
}

fn read_accounts(path: &Path) -> Result<Vec<Account>> {
    let bytes = fs::read(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).wrap_err("accounts file must be a JSON array of accounts")
}

fn preference_store(cli: &Cli) -> Result<Rc<dyn PreferenceStore>> {
    if cli.ephemeral {
        return Ok(Rc::new(MemoryPreferenceStore::new()));
    }
    let path = match &cli.prefs {
        Some(path) => path.clone(),
        None => dirs::data_dir()
            .ok_or_else(|| eyre!("no data directory; pass --prefs or --ephemeral"))?
            .join("embedkit")
            .join("preferences.json"),
    };
    let store = FilePreferenceStore::new(path);
    info!(path = %store.path().display(), "using preferences file");
    Ok(Rc::new(store))
}
