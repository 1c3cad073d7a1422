//! `payments-console` command: sign in and inspect the payments backend.
//!
//! # Examples
//! ```sh
//! export CONSOLE_STORAGE_DIR=~/.payments-console
//! payments-console login --email ops@example.com --password secret
//! payments-console merchants --search bean
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use pagination::PaginatedResponse;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use payments_console::ApiClient;
use payments_console::config::ClientSettings;
use payments_console::domain::LoginCredentials;
use payments_console::domain::entities::TransactionStatus;
use payments_console::domain::filters::{
    DateRange, MerchantFilters, SettlementFilters, TransactionFilters, UserFilters,
};
use payments_console::domain::ports::{KeyValueStore, SessionProvider};
use payments_console::outbound::http::ReqwestTransport;
use payments_console::outbound::storage::{FileStore, InMemoryStore};
use payments_console::services::{
    AuthService, MerchantService, SettlementService, TransactionService, UserService,
};

/// `payments-console` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "payments-console",
    about = "Administer merchants, transactions, settlements, and users",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the access token.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the token and saved filters.
    Logout,
    /// Show the signed-in user.
    Me,
    /// List merchants.
    Merchants {
        #[command(flatten)]
        page: PageArgs,
        /// Search over merchant codes and names.
        #[arg(long)]
        search: Option<String>,
    },
    /// List transactions.
    Transactions {
        #[command(flatten)]
        page: PageArgs,
        /// Only transactions in this status, e.g. `FAILED`.
        #[arg(long)]
        status: Option<String>,
        /// Only transactions of this merchant.
        #[arg(long = "merchant-code")]
        merchant_code: Option<String>,
    },
    /// Show transaction analytics for the signed-in user.
    Analytics {
        /// First day included.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included.
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// List settlements.
    Settlements {
        #[command(flatten)]
        page: PageArgs,
    },
    /// List dashboard users.
    Users {
        #[command(flatten)]
        page: PageArgs,
        /// Search over names and emails.
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Args)]
struct PageArgs {
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Records per page.
    #[arg(long = "per-page", default_value_t = pagination::DEFAULT_PER_PAGE)]
    per_page: u32,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("payments-console")])
        .wrap_err("failed to load client settings")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(cli.command, &settings))
}

fn build_client(settings: &ClientSettings) -> Result<ApiClient> {
    let base_url = settings.base_url()?;
    let transport = match settings.user_agent.as_deref() {
        Some(agent) => ReqwestTransport::with_user_agent(base_url, settings.timeout(), agent),
        None => ReqwestTransport::new(base_url, settings.timeout()),
    }
    .wrap_err("failed to build HTTP transport")?;
    let storage: Arc<dyn KeyValueStore> = match settings.storage_dir.as_deref() {
        Some(dir) => Arc::new(
            FileStore::open(dir)
                .with_context(|| format!("failed to open storage at {}", dir.display()))?,
        ),
        None => {
            info!("no storage directory configured; the session lasts for this command only");
            Arc::new(InMemoryStore::new())
        }
    };
    Ok(ApiClient::builder(Arc::new(transport))
        .storage(storage)
        .retry_policy(settings.retry_policy())
        .build())
}

async fn run(command: Command, settings: &ClientSettings) -> Result<()> {
    let client = build_client(settings)?;
    let auth = AuthService::new(client.clone());
    match command {
        Command::Login { email, password } => {
            let credentials = LoginCredentials::try_from_parts(&email, &password)?;
            let response = auth.login(&credentials).await?;
            let who = response
                .user
                .map_or_else(|| credentials.email().to_owned(), |user| user.email);
            write_line(&format!("signed in as {who}"))
        }
        Command::Logout => {
            auth.logout().await;
            write_line("signed out")
        }
        Command::Me => print_json(&auth.current_user().await?),
        Command::Merchants { page, search } => {
            let filters = MerchantFilters {
                page: page.page,
                per_page: page.per_page,
                search,
                ..MerchantFilters::default()
            };
            print_page(&MerchantService::new(client).list(&filters).await?)
        }
        Command::Transactions {
            page,
            status,
            merchant_code,
        } => {
            let filters = TransactionFilters {
                page: page.page,
                limit: page.per_page,
                status: status.as_deref().map(parse_status).transpose()?,
                merchant_code,
                ..TransactionFilters::default()
            };
            print_page(&TransactionService::new(client).list(&filters).await?)
        }
        Command::Analytics { from, to } => {
            let session = auth
                .current_session()
                .await?
                .ok_or_else(|| eyre!("not signed in; run `payments-console login` first"))?;
            let analytics = TransactionService::new(client)
                .analytics(&session, DateRange { from, to })
                .await?;
            print_json(&analytics)
        }
        Command::Settlements { page } => {
            let filters = SettlementFilters {
                page: page.page,
                per_page: page.per_page,
                ..SettlementFilters::default()
            };
            print_page(&SettlementService::new(client).list(&filters).await?)
        }
        Command::Users { page, search } => {
            let filters = UserFilters {
                page: page.page,
                per_page: page.per_page,
                search,
                ..UserFilters::default()
            };
            print_page(&UserService::new(client).list(&filters).await?)
        }
    }
}

fn parse_status(raw: &str) -> Result<TransactionStatus> {
    serde_json::from_value(serde_json::Value::String(raw.to_uppercase()))
        .wrap_err_with(|| format!("unknown transaction status {raw:?}"))
}

fn print_page<T: Serialize>(page: &PaginatedResponse<T>) -> Result<()> {
    for record in &page.data {
        write_line(&serde_json::to_string(record)?)?;
    }
    write_line(&format!(
        "page {} of {} ({} records)",
        page.meta.page, page.meta.total_pages, page.meta.total
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    write_line(&serde_json::to_string_pretty(value)?)
}

fn write_line(line: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").wrap_err("failed to write to stdout")
}
