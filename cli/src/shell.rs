//! Line-oriented shell over one [`SessionStore`].
//!
//! One gateway serves every command, so the session cookie set by `signin`
//! is sent with later `check`/`logout` lines. A spawned subscriber prints
//! each published state to stderr.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use bookdesk::{AuthGateway, SessionState, SessionStatus, SessionStore, SignInCredentials, SignUpCredentials};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{CliError, print_state};

const USAGE: &str = "commands: signin <phone> <password> | signup <phone> <name> <password> | check | logout | state | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    SignIn { phone_number: String, password: String },
    SignUp { phone_number: String, user_name: String, password: String },
    Check,
    Logout,
    State,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub(crate) fn parse_line(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb, args.as_slice()) {
        ("signin", [phone, password]) => {
            ShellCommand::SignIn { phone_number: (*phone).to_owned(), password: (*password).to_owned() }
        }
        ("signin", _) => return Err(ParseError::Usage("signin <phone> <password>")),
        ("signup", [phone, name, password]) => ShellCommand::SignUp {
            phone_number: (*phone).to_owned(),
            user_name: (*name).to_owned(),
            password: (*password).to_owned(),
        },
        ("signup", _) => return Err(ParseError::Usage("signup <phone> <name> <password>")),
        ("check", []) => ShellCommand::Check,
        ("logout", []) => ShellCommand::Logout,
        ("state", []) => ShellCommand::State,
        ("help", []) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        ("check" | "logout" | "state" | "help" | "quit" | "exit", _) => {
            return Err(ParseError::Usage("this command takes no arguments"));
        }
        (other, _) => return Err(ParseError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

/// One-line summary of a session state for the subscriber output.
pub(crate) fn describe(state: &SessionState) -> String {
    let mut line = match (state.status(), state.identity()) {
        (SessionStatus::Authenticated, Some(identity)) => format!("authenticated as {identity}"),
        (SessionStatus::Authenticated, None) => "authenticated".to_owned(),
        (SessionStatus::Anonymous, _) => "anonymous".to_owned(),
    };
    if let Some(err) = state.last_error() {
        line.push_str(&format!(" ({:?}: {})", err.kind, err.message));
    }
    line
}

/// Run commands from stdin until `quit` or end of input.
pub(crate) async fn run<G: AuthGateway>(store: &SessionStore<G>) -> Result<(), CliError> {
    let mut rx = store.subscribe();
    let watcher = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let line = describe(&rx.borrow_and_update());
            eprintln!("[session] {line}");
        }
    });

    eprintln!("{USAGE}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        execute(store, command).await?;
    }

    watcher.abort();
    Ok(())
}

/// Store errors are reported and the shell keeps going; only output failures abort.
async fn execute<G: AuthGateway>(store: &SessionStore<G>, command: ShellCommand) -> Result<(), CliError> {
    let outcome = match command {
        ShellCommand::SignIn { phone_number, password } => {
            store.login(SignInCredentials::new(phone_number, password)).await.map(drop)
        }
        ShellCommand::SignUp { phone_number, user_name, password } => store
            .register(SignUpCredentials::new(phone_number, user_name, password))
            .await
            .map(|confirmation| {
                if let Some(message) = confirmation.message() {
                    println!("{message}");
                }
            }),
        ShellCommand::Check => store.check_session().await.map(drop),
        ShellCommand::Logout => store.logout().await,
        ShellCommand::State => return print_state(&store.state()),
        ShellCommand::Help => {
            println!("{USAGE}");
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    };
    if let Err(err) = outcome {
        eprintln!("error: {err}");
    }
    Ok(())
}
