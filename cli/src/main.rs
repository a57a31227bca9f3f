
mod shell;

use bookdesk::{
    ClientConfig, ConfigError, HttpAuthGateway, SessionState, SessionStore, SignInCredentials, SignUpCredentials,
    StoreError,
};
use clap::{Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client init failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "bookdesk", about = "BookDesk session client")]
struct Cli {
    /// Backend origin [default: $BOOKDESK_API_URL or http://localhost:8080]
    #[arg(long)]
    base_url: Option<String>,

    /// [default: $BOOKDESK_REQUEST_TIMEOUT_SECS or 30]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    request_timeout_secs: Option<u64>,

    /// [default: $BOOKDESK_CONNECT_TIMEOUT_SECS or 10]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    connect_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new account (does not sign in).
    SignUp {
        phone_number: String,
        user_name: String,
        #[arg(long, env = "BOOKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in and print the resulting session.
    SignIn {
        phone_number: String,
        #[arg(long, env = "BOOKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Ask the backend whether the session is still valid.
    Check,
    /// Sign out.
    Logout,
    /// Read commands from stdin against one session.
    Shell,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig, CliError> {
        self.overlay(ClientConfig::from_env()?)
    }

    /// Flags win over the environment-derived `config`.
    fn overlay(&self, mut config: ClientConfig) -> Result<ClientConfig, CliError> {
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url)?;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout_secs = secs;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = cli.client_config()?;
    tracing::debug!(base_url = config.api_base_url.as_str(), "bookdesk cli starting");
    let store = SessionStore::start(HttpAuthGateway::new(config)?).await;

    match cli.command {
        Command::SignUp { phone_number, user_name, password } => {
            let outcome = store
                .register(SignUpCredentials::new(phone_number, user_name, password))
                .await;
            if let Ok(confirmation) = &outcome {
                if let Some(message) = confirmation.message() {
                    eprintln!("{message}");
                }
            }
            finish(&store.state(), outcome)
        }
        Command::SignIn { phone_number, password } => {
            let outcome = store.login(SignInCredentials::new(phone_number, password)).await;
            finish(&store.state(), outcome)
        }
        Command::Check => {
            let outcome = store.check_session().await;
            finish(&store.state(), outcome)
        }
        Command::Logout => {
            let outcome = store.logout().await;
            finish(&store.state(), outcome)
        }
        Command::Shell => shell::run(&store).await,
    }
}

/// Print the settled state, then surface the operation's error as the exit status.
fn finish<T>(state: &SessionState, outcome: Result<T, StoreError>) -> Result<(), CliError> {
    print_state(state)?;
    outcome?;
    Ok(())
}

fn print_state(state: &SessionState) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}
