//! Console error types.

use armconsole_sdk::SdkError;

/// Errors raised while driving the console.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Standard input or the keyboard closed (or failed) mid-prompt.
    #[error("input stream closed")]
    InputStreamClosed,

    /// The ARM template file could not be read.
    #[error("could not read '{path}': {source}")]
    TemplateRead {
        /// Path as entered by the operator.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The operator left a required answer empty.
    #[error("the {0} must not be empty")]
    BlankInput(&'static str),

    /// A Resource Manager call failed.
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// Writing to the terminal failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Whether the session cannot go on after this error.
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::InputStreamClosed | Self::Io(_))
    }
}

/// Why a menu command stopped early.
#[derive(Debug)]
pub enum CommandError {
    /// The session is over (input closed, output broken).
    Fatal(ConsoleError),
    /// The command failed; report and return to the menu.
    Failed {
        /// Operator-facing headline, e.g. `Error during ARM deployment`.
        context: String,
        /// What went wrong.
        source: ConsoleError,
    },
}

impl CommandError {
    /// A reportable failure under `context`.
    pub fn failed(context: impl Into<String>, source: impl Into<ConsoleError>) -> Self {
        Self::Failed {
            context: context.into(),
            source: source.into(),
        }
    }
}

impl From<ConsoleError> for CommandError {
    fn from(err: ConsoleError) -> Self {
        if err.ends_session() {
            Self::Fatal(err)
        } else {
            Self::failed("Error", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_input_ends_session() {
        assert!(ConsoleError::InputStreamClosed.ends_session());
        assert!(!ConsoleError::Sdk(SdkError::SubscriptionNotFound).ends_session());
    }

    #[test]
    fn sdk_errors_display_transparently() {
        let err = ConsoleError::from(SdkError::ResourceGroupNotFound("rg".into()));
        assert_eq!(err.to_string(), "resource group 'rg' could not be found");
    }

    #[test]
    fn template_read_names_the_path() {
        let err = ConsoleError::TemplateRead {
            path: "vm.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "could not read 'vm.json': missing");
    }

    #[test]
    fn blank_input_is_reportable() {
        let err = ConsoleError::BlankInput("resource group name");
        assert_eq!(err.to_string(), "the resource group name must not be empty");
        assert!(matches!(CommandError::from(err), CommandError::Failed { .. }));
    }

    #[test]
    fn prompt_errors_become_fatal() {
        let err = CommandError::from(ConsoleError::InputStreamClosed);
        assert!(matches!(err, CommandError::Fatal(ConsoleError::InputStreamClosed)));
    }
}
