//! Masked input for secrets.
//!
//! [`read_masked`] composes a secret from a stream of [`Keystroke`]s,
//! echoing one `*` per character and supporting single-character
//! correction. Characters are taken verbatim: control characters other
//! than confirm and correct end up in the secret unchanged. On a terminal
//! that covers `Ctrl+<letter>` (as its control code) and `Esc`.

use std::io::{BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use zeroize::Zeroizing;

use crate::error::ConsoleError;

/// Erases the last `*`: back, blank, back.
pub const ERASE: &str = "\x08 \x08";
/// Written on confirm. `\r\n` so it also works in raw mode.
pub const LINE_BREAK: &str = "\r\n";
/// Bytes reserved up front for a secret.
const SECRET_CAPACITY: usize = 128;

/// One key as seen by the masked reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// Finish input (Enter).
    Confirm,
    /// Drop the last character (Backspace).
    Correct,
    /// A character to append.
    Char(char),
    /// A key without a character payload (arrows, function keys, ...).
    Ignored,
}

/// A blocking source of keystrokes.
pub trait KeySource {
    /// Wait for the next key.
    ///
    /// Fails with [`ConsoleError::InputStreamClosed`] once the source is
    /// exhausted or broken.
    fn next_key(&mut self) -> Result<Keystroke, ConsoleError>;
}

/// Read a secret from `keys`, masking the echo on `out`.
pub fn read_masked<K, W>(keys: &mut K, out: &mut W) -> Result<Zeroizing<String>, ConsoleError>
where
    K: KeySource + ?Sized,
    W: Write + ?Sized,
{
    let mut secret = Zeroizing::new(String::with_capacity(SECRET_CAPACITY));
    loop {
        match keys.next_key()? {
            Keystroke::Confirm => {
                out.write_all(LINE_BREAK.as_bytes())?;
                out.flush()?;
                return Ok(secret);
            }
            Keystroke::Correct => {
                if secret.pop().is_some() {
                    out.write_all(ERASE.as_bytes())?;
                    out.flush()?;
                }
            }
            Keystroke::Char(c) => {
                push_secret(&mut secret, c);
                out.write_all(b"*")?;
                out.flush()?;
            }
            Keystroke::Ignored => {}
        }
    }
}

/// Append `c` without letting `String` reallocate in place.
///
/// A full buffer is copied into a larger one and the old allocation is
/// wiped when it drops.
fn push_secret(secret: &mut Zeroizing<String>, c: char) {
    if secret.len() + c.len_utf8() > secret.capacity() {
        let mut grown = Zeroizing::new(String::with_capacity(secret.capacity().max(SECRET_CAPACITY) * 2));
        grown.push_str(secret.as_str());
        *secret = grown;
    }
    secret.push(c);
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

/// Keystrokes from the terminal in raw mode.
///
/// Raw mode is on for the lifetime of the value and restored on drop.
/// Raw mode also swallows the terminal's own interrupt handling, so
/// `Ctrl+C` and `Ctrl+D` close the stream instead.
pub struct TerminalKeys {
    _raw: RawModeGuard,
}

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
    }
}

impl TerminalKeys {
    /// Switch the terminal to raw mode.
    pub fn new() -> Result<Self, ConsoleError> {
        terminal::enable_raw_mode()?;
        Ok(Self { _raw: RawModeGuard })
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<Keystroke, ConsoleError> {
        loop {
            let Event::Key(key) = event::read().map_err(|_| ConsoleError::InputStreamClosed)? else {
                continue;
            };
            return keystroke(key).ok_or(ConsoleError::InputStreamClosed);
        }
    }
}

/// Map a terminal key event. `None` means `Ctrl+C` or `Ctrl+D`.
fn keystroke(key: KeyEvent) -> Option<Keystroke> {
    if key.kind == KeyEventKind::Release {
        return Some(Keystroke::Ignored);
    }
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    Some(match key.code {
        KeyCode::Char(c) if control && matches!(c, 'c' | 'd' | 'C' | 'D') => return None,
        KeyCode::Char(c) if control => Keystroke::Char(control_code(c)),
        KeyCode::Char(c) => Keystroke::Char(c),
        KeyCode::Enter => Keystroke::Confirm,
        KeyCode::Backspace => Keystroke::Correct,
        KeyCode::Tab => Keystroke::Char('\t'),
        KeyCode::Esc => Keystroke::Char('\x1b'),
        _ => Keystroke::Ignored,
    })
}

/// The C0 code a terminal sends for `Ctrl+<key>`. Non-ASCII keys pass through.
fn control_code(c: char) -> char {
    match u8::try_from(c) {
        Ok(byte) if byte.is_ascii() => char::from(byte & 0x1f),
        _ => c,
    }
}

// ---------------------------------------------------------------------------
// Line-based fallback
// ---------------------------------------------------------------------------

/// Keystrokes replayed from a line of text, for piped stdin.
///
/// Each line yields its characters followed by [`Keystroke::Confirm`]. The
/// line terminator is not part of the payload.
pub struct LineKeys<R> {
    input: R,
    line: Zeroizing<String>,
    pos: usize,
    loaded: bool,
}

impl<R: BufRead> LineKeys<R> {
    /// Wrap `input`.
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: Zeroizing::new(String::with_capacity(SECRET_CAPACITY)),
            pos: 0,
            loaded: false,
        }
    }
}

impl<R: BufRead> KeySource for LineKeys<R> {
    fn next_key(&mut self) -> Result<Keystroke, ConsoleError> {
        if !self.loaded {
            self.line.clear();
            self.pos = 0;
            let read = self
                .input
                .read_line(&mut self.line)
                .map_err(|_| ConsoleError::InputStreamClosed)?;
            if read == 0 {
                return Err(ConsoleError::InputStreamClosed);
            }
            let payload = self.line.trim_end_matches(['\r', '\n']).len();
            self.line.truncate(payload);
            self.loaded = true;
        }

        match self.line[self.pos..].chars().next() {
            Some(c) => {
                self.pos += c.len_utf8();
                Ok(Keystroke::Char(c))
            }
            None => {
                self.loaded = false;
                Ok(Keystroke::Confirm)
            }
        }
    }
}
