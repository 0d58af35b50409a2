//! Menu read-eval loop.

use std::io::{BufRead, Write};

use armconsole_sdk::ResourceManager;
use tracing::{debug, warn};

use crate::commands;
use crate::console::Console;
use crate::error::{CommandError, ConsoleError};

/// Menu lines, printed before every prompt.
pub const MENU: [&str; 5] = [
    "List all Resource Groups [1]",
    "Create a Resource Group [2]",
    "Deploy a ARM Template [3]",
    "Delete Resource Group [4]",
    "Exit [exit]",
];

/// Selection prompt.
pub const PROMPT: &str = "Whats next?: ";

/// A menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `1`
    ListResourceGroups,
    /// `2`
    CreateResourceGroup,
    /// `3`
    DeployTemplate,
    /// `4`
    DeleteResourceGroup,
    /// `exit`
    Exit,
}

impl Command {
    /// Parse a selection, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" => Some(Self::ListResourceGroups),
            "2" => Some(Self::CreateResourceGroup),
            "3" => Some(Self::DeployTemplate),
            "4" => Some(Self::DeleteResourceGroup),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Show the menu until the operator exits.
///
/// Failed commands are reported and the menu comes back. Returns an error
/// only when input closes or output breaks.
pub async fn run<M, R, W>(manager: &M, console: &mut Console<R, W>) -> Result<(), ConsoleError>
where
    M: ResourceManager,
    R: BufRead,
    W: Write,
{
    loop {
        for line in MENU {
            console.say(line)?;
        }
        let input = console.prompt(PROMPT)?;
        let Some(command) = Command::parse(&input) else {
            debug!(%input, "unrecognised selection");
            continue;
        };

        let outcome = match command {
            Command::Exit => return Ok(()),
            Command::ListResourceGroups => commands::list_resource_groups(manager, console).await,
            Command::CreateResourceGroup => commands::create_resource_group(manager, console).await,
            Command::DeployTemplate => commands::deploy_template(manager, console).await,
            Command::DeleteResourceGroup => commands::delete_resource_group(manager, console).await,
        };

        match outcome {
            Ok(()) => {}
            Err(CommandError::Fatal(err)) => return Err(err),
            Err(CommandError::Failed { context, source }) => {
                warn!(?command, error = %source, "command failed");
                console.report(&context, &source)?;
            }
        }
    }
}
