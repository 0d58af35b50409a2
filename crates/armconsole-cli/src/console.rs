//! Prompting over a line-oriented input and a terminal output.

use std::io::{BufRead, Write};

use zeroize::Zeroizing;

use crate::error::ConsoleError;
use crate::masked::{read_masked, LineKeys, TerminalKeys};

/// The operator's side of the session.
///
/// Plain prompts read whole lines from `input`. Secret prompts read raw
/// keystrokes from the terminal when `interactive`, otherwise they replay
/// the next line of `input` through the same masking.
///
/// Interactive sessions therefore read stdin two ways. Anything typed or
/// pasted ahead of a secret prompt may already sit in `input`'s buffer, where
/// the raw reader cannot see it, and is handed to the next plain prompt
/// instead. Type the secret only once its label is shown. Piped input goes
/// through `input` alone and keeps its order.
pub struct Console<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Wrap an input and an output.
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    /// Print one line.
    pub fn say(&mut self, line: &str) -> Result<(), ConsoleError> {
        writeln!(self.output, "{line}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Print `label` without a newline and read the answer, trimmed.
    pub fn prompt(&mut self, label: &str) -> Result<String, ConsoleError> {
        self.show_label(label)?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|_| ConsoleError::InputStreamClosed)?;
        if read == 0 {
            return Err(ConsoleError::InputStreamClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Print `label` and read a masked answer. The answer is not trimmed.
    pub fn prompt_secret(&mut self, label: &str) -> Result<Zeroizing<String>, ConsoleError> {
        self.show_label(label)?;
        if self.interactive {
            let mut keys = TerminalKeys::new()?;
            read_masked(&mut keys, &mut self.output)
        } else {
            read_masked(&mut LineKeys::new(&mut self.input), &mut self.output)
        }
    }

    /// Print a failure headline and the error text on the next line.
    pub fn report(&mut self, context: &str, err: &ConsoleError) -> Result<(), ConsoleError> {
        self.say(context)?;
        self.say(&err.to_string())
    }

    /// Write raw text (e.g. a rendered table) as is.
    pub fn write_raw(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn show_label(&mut self, label: &str) -> Result<(), ConsoleError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        Ok(())
    }
}
