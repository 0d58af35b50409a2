//! `armconsole`: interactive Azure resource group console.
//!
//! Asks for service-principal credentials (the secret is masked), verifies
//! the connection by listing resource groups, then loops over a small menu:
//! list, create, deploy an ARM template, delete.
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`) so they never mix with
//! the prompts on stdout.

mod commands;
mod console;
mod error;
mod masked;
mod menu;
mod table;

#[cfg(test)]
mod fake;

use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use armconsole_models::{CloudEndpoints, CloudEnvironment, Credentials};
use armconsole_sdk::{ArmClient, ArmSession, ClientOptions, ResourceManager, SdkError};
use clap::Parser;
use tracing::{info, warn};

use crate::console::Console;
use crate::error::ConsoleError;

#[derive(Parser, Debug)]
#[command(name = "armconsole")]
#[command(about = "Manage Azure resource groups and ARM template deployments interactively")]
#[command(version)]
struct Cli {
    /// Identity endpoint, replacing the selected cloud's (e.g. `http://localhost:4010`)
    #[arg(long, env = "ARMCONSOLE_AUTHORITY_HOST")]
    authority_host: Option<String>,

    /// Resource Manager endpoint, replacing the selected cloud's
    #[arg(long, env = "ARMCONSOLE_RESOURCE_MANAGER_URL")]
    resource_manager_url: Option<String>,

    /// HTTP request timeout
    #[arg(long, env = "ARMCONSOLE_TIMEOUT_SECONDS", default_value_t = 100)]
    timeout_seconds: u64,

    /// Delay between polls of a running delete when the service gives none
    #[arg(long, env = "ARMCONSOLE_POLL_INTERVAL_SECONDS", default_value_t = 5)]
    poll_interval_seconds: u64,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime.block_on(run(cli))
}

/// Endpoint overrides and client tuning from the command line.
struct Settings {
    authority_host: Option<String>,
    resource_manager_url: Option<String>,
    options: ClientOptions,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Self {
            authority_host: cli.authority_host,
            resource_manager_url: cli.resource_manager_url,
            options: ClientOptions {
                timeout: Duration::from_secs(cli.timeout_seconds),
                poll_interval: Duration::from_secs(cli.poll_interval_seconds),
            },
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// The operator chose `exit`.
    Exited,
    /// Authentication or the verification call failed; the menu never showed.
    ConnectionFailed,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Exited => ExitCode::SUCCESS,
            Outcome::ConnectionFailed => ExitCode::FAILURE,
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut console = Console::new(stdin.lock(), io::stdout().lock(), interactive);
    let outcome = session(&mut console, Settings::from(cli)).await?;
    Ok(outcome.into())
}

/// Collect credentials, connect, then hand over to the menu.
async fn session<R, W>(console: &mut Console<R, W>, settings: Settings) -> Result<Outcome, ConsoleError>
where
    R: BufRead,
    W: Write,
{
    console.say("Establish Azure Connection")?;
    let client_id = console.prompt("Enter Azure ClientId: ")?;
    let client_secret = console.prompt_secret("Enter Azure ClientSecret: ")?;
    let tenant_id = console.prompt("Enter Azure tenantId: ")?;
    let subscription_id = console.prompt("Enter Azure SubscriptionId: ")?;
    let cloud = CloudEnvironment::from_selector(&console.prompt("Enter Azure cloud (global, german) [global]: ")?);

    let credentials = Credentials::new(&client_id, client_secret, &tenant_id, &subscription_id, cloud);
    let endpoints = cloud
        .endpoints()
        .with_overrides(settings.authority_host, settings.resource_manager_url);

    let client = match connect(&credentials, &endpoints, &settings.options).await {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, "connection to Azure failed");
            console.say("Damn something went wrong. :(")?;
            console.say(&err.to_string())?;
            return Ok(Outcome::ConnectionFailed);
        }
    };
    console.say("Connection to Azure established!")?;

    menu::run(&client, console).await?;
    info!("session ended");
    Ok(Outcome::Exited)
}

/// Authenticate, bind the subscription and prove the connection works.
async fn connect(
    credentials: &Credentials,
    endpoints: &CloudEndpoints,
    options: &ClientOptions,
) -> Result<ArmClient, SdkError> {
    let session = ArmSession::authenticate(credentials, endpoints, options).await?;
    let client = session
        .with_subscription(credentials.subscription_id.as_ref())
        .await?;
    let groups = client.list_resource_groups().await?;
    info!(
        subscription = %client.subscription(),
        resource_groups = groups.len(),
        "connection verified"
    );
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["armconsole"]).unwrap();
        assert_eq!(cli.timeout_seconds, 100);
        assert_eq!(cli.poll_interval_seconds, 5);
    }

    #[test]
    fn endpoint_overrides() {
        let cli = Cli::try_parse_from([
            "armconsole",
            "--authority-host",
            "http://localhost:4010",
            "--resource-manager-url",
            "http://localhost:4010/",
            "--poll-interval-seconds",
            "1",
        ])
        .unwrap();
        let endpoints = CloudEnvironment::German
            .endpoints()
            .with_overrides(cli.authority_host, cli.resource_manager_url);
        assert_eq!(endpoints.authority_host, "http://localhost:4010");
        assert_eq!(endpoints.resource_manager, "http://localhost:4010/");
        assert_eq!(cli.poll_interval_seconds, 1);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn outcome_maps_to_exit_code() {
        let code = |outcome: Outcome| format!("{:?}", ExitCode::from(outcome));
        assert_eq!(code(Outcome::Exited), format!("{:?}", ExitCode::SUCCESS));
        assert_eq!(code(Outcome::ConnectionFailed), format!("{:?}", ExitCode::FAILURE));
    }

    /// Serve the mock Resource Manager on a free port and point the settings at it.
    async fn mock_settings() -> Settings {
        let app = mock_arm::router(mock_arm::MockConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base = format!("http://{addr}");
        Settings {
            authority_host: Some(base.clone()),
            resource_manager_url: Some(format!("{base}/")),
            options: ClientOptions {
                timeout: Duration::from_secs(5),
                poll_interval: Duration::from_millis(10),
            },
        }
    }

    async fn drive(input: &str) -> (Result<Outcome, ConsoleError>, String) {
        let mut console = Console::new(std::io::Cursor::new(input.as_bytes().to_vec()), Vec::new(), false);
        let outcome = session(&mut console, mock_settings().await).await;
        (outcome, String::from_utf8(console.into_output()).unwrap())
    }

    #[tokio::test]
    async fn rejected_credentials_end_before_the_menu() {
        let (outcome, out) = drive("app\nwrong-secret\ntenant\n\n\n1\nexit\n").await;

        assert_eq!(outcome.unwrap(), Outcome::ConnectionFailed);
        assert!(out.contains("Damn something went wrong. :(\nauthentication failed: "));
        assert!(!out.contains("Connection to Azure established!"));
        assert!(!out.contains("wrong-secret"));
        for line in menu::MENU {
            assert!(!out.contains(line), "menu line shown: {line}");
        }
    }

    #[tokio::test]
    async fn accepted_credentials_reach_the_menu() {
        let (outcome, out) = drive("app\nmock-secret\ntenant\n\nglobal\nexit\n").await;

        assert_eq!(outcome.unwrap(), Outcome::Exited);
        assert!(out.starts_with("Establish Azure Connection\nEnter Azure ClientId: "));
        assert!(out.contains("Enter Azure ClientSecret: ***********\r\n"));
        assert!(out.contains("Connection to Azure established!\n"));
        assert!(out.ends_with(menu::PROMPT));
        for line in menu::MENU {
            assert!(out.contains(line));
        }
    }

    #[tokio::test]
    async fn input_closing_mid_login_is_an_error() {
        let (outcome, out) = drive("app\n").await;
        assert!(matches!(outcome, Err(ConsoleError::InputStreamClosed)));
        assert!(!out.contains("Damn something went wrong"));
    }
}
