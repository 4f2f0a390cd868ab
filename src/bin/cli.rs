//! Tally CLI
//!
//! Drives the page controllers against a running expense server without a
//! browser:
//! - Sign in, register, sign out, request a password reset
//! - Delete an expense
//! - Download a report export
//! - Check expense form values locally

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use tally::auth::{
    AuthClient, AuthOutcome, CONFIRM_PASSWORD_FIELD, REGISTER_EMAIL_FIELD,
    REGISTER_PASSWORD_FIELD,
};
use tally::{
    ClientConfig, DashboardClient, DeleteOutcome, Endpoints, ExpenseFields, ExpenseId,
    ExportFormat, HeadlessBrowser, HeadlessCharts, HeadlessModal, ReportsClient,
    ReqwestTransport,
};

const FALLBACK_BASE_URL: &str = "http://localhost:5000";

#[derive(Parser)]
#[command(name = "tally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Expense tracker client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server URL, overriding the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

/// Credentials for commands that need a session
#[derive(Args)]
pub struct SessionArgs {
    /// Sign in as this user first
    #[arg(long, requires = "password")]
    pub email: Option<String>,

    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Register {
        email: String,
        #[arg(short, long)]
        password: String,
        /// Password confirmation (default: same as --password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Sign out
    Logout,

    /// Send password reset instructions
    ResetPassword { email: String },

    /// Delete an expense
    Delete {
        id: String,
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Download a report export
    Export {
        /// Export format (csv, pdf, ...)
        #[arg(short, long, default_value = "csv")]
        format: String,
        /// Reporting period (default: the configured default)
        #[arg(long)]
        period: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Check expense form values without submitting them
    Validate {
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

struct Session {
    config: ClientConfig,
    endpoints: Endpoints,
    transport: ReqwestTransport,
}

impl Session {
    fn open(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => ClientConfig::load_with_env(path)?,
            None => ClientConfig::load_default(),
        };
        if let Some(base_url) = &cli.base_url {
            config.server.base_url = base_url.clone();
        }
        if config.server.base_url.is_empty() {
            config.server.base_url = FALLBACK_BASE_URL.to_string();
        }

        tally::logging::init(&config.logging);
        tracing::debug!(base_url = %config.server.base_url, "Using server");

        let transport =
            ReqwestTransport::new(&config.server).context("Failed to create HTTP client")?;
        Ok(Self {
            endpoints: Endpoints::from_config(&config),
            config,
            transport,
        })
    }

    fn auth(&self, browser: &HeadlessBrowser) -> AuthClient<HeadlessBrowser, ReqwestTransport> {
        AuthClient::new(browser.clone(), self.transport.clone(), self.endpoints.clone())
    }

    async fn sign_in_if_asked(&self, args: &SessionArgs) -> anyhow::Result<()> {
        if let (Some(email), Some(password)) = (&args.email, &args.password) {
            let outcome = self.auth(&HeadlessBrowser::new()).sign_in(email, password).await;
            finish_auth(outcome)?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }
    if let Commands::Validate {
        amount,
        category,
        date,
    } = &cli.command
    {
        return check_fields(ExpenseFields {
            amount: amount.clone(),
            category: category.clone(),
            date: date.clone(),
        });
    }

    let session = Session::open(&cli)?;
    let browser = HeadlessBrowser::new();

    match &cli.command {
        Commands::Login { email, password } => {
            finish_auth(session.auth(&browser).sign_in(email, password).await)?;
        }

        Commands::Register {
            email,
            password,
            confirm,
        } => {
            browser.fill(REGISTER_EMAIL_FIELD, email);
            browser.fill(REGISTER_PASSWORD_FIELD, password);
            browser.fill(
                CONFIRM_PASSWORD_FIELD,
                confirm.as_deref().unwrap_or(password),
            );
            finish_auth(session.auth(&browser).submit_registration().await)?;
        }

        Commands::Logout => {
            finish_auth(session.auth(&browser).sign_out().await)?;
        }

        Commands::ResetPassword { email } => {
            finish_auth(session.auth(&browser).request_password_reset(email).await)?;
        }

        Commands::Delete { id, session: args } => {
            session.sign_in_if_asked(args).await?;

            let dashboard = DashboardClient::new(
                browser.clone(),
                session.transport.clone(),
                HeadlessModal::default(),
                HeadlessCharts,
                session.endpoints.clone(),
            );
            dashboard.on_delete_click(Some(ExpenseId::new(id.as_str())));
            match dashboard.confirm_delete().await {
                DeleteOutcome::Reloaded => println!("Deleted expense {}", id),
                DeleteOutcome::Rejected(message) => bail!(message),
                DeleteOutcome::Failed(reason) => bail!("Delete request failed: {}", reason),
                DeleteOutcome::NothingPending => bail!("No expense selected"),
            }
        }

        Commands::Export {
            format,
            period,
            output,
            session: args,
        } => {
            session.sign_in_if_asked(args).await?;

            let period = period
                .clone()
                .unwrap_or_else(|| session.config.reports.default_period.clone());
            let page = browser.with_query(&format!("?period={}", urlencoding::encode(&period)));
            let reports = ReportsClient::new(page, HeadlessCharts, session.endpoints.clone());
            let url = reports.export(&ExportFormat::new(format.as_str()));

            let data = session
                .transport
                .fetch_bytes(&url)
                .await
                .with_context(|| format!("Export failed: {}", url))?;

            match output {
                Some(path) => {
                    std::fs::write(path, &data)?;
                    println!("Exported to {:?}", path);
                }
                None => {
                    std::io::stdout().write_all(&data)?;
                }
            }
        }

        Commands::Validate { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

fn finish_auth(outcome: AuthOutcome) -> anyhow::Result<()> {
    match outcome {
        AuthOutcome::Navigated(url) => println!("OK, redirected to {}", url),
        AuthOutcome::Reloaded | AuthOutcome::Quiet => println!("OK"),
        AuthOutcome::Notified(message) => println!("{}", message),
        AuthOutcome::Failed(message)
        | AuthOutcome::Rejected(message)
        | AuthOutcome::Logged(message) => bail!(message),
    }
    Ok(())
}

fn check_fields(fields: ExpenseFields) -> anyhow::Result<()> {
    let report = tally::validate(&fields);
    if report.is_valid() {
        if let Some(amount) = fields.amount.as_deref().and_then(tally::parse_amount) {
            println!("Valid: {}", tally::format_currency(amount));
        } else {
            println!("Valid");
        }
        return Ok(());
    }

    for error in report.errors() {
        eprintln!("{}", error);
    }
    bail!("{} field(s) invalid", report.errors().len())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = tally::config::generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}
