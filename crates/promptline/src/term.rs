//! Terminal I/O seam.
//!
//! The pipeline only ever touches the terminal through [`TerminalIO`]: one
//! operation to write text, one to read a line, and one to read a line
//! without echoing it (passwords). Tests substitute [`MockTerminal`] with a
//! canned sequence of lines and a capturing output buffer.

use std::io::{self, BufRead, Read, Write};

/// Abstraction over terminal I/O for testability.
///
/// [`read_line`](Self::read_line) returns the raw line including its
/// trailing newline; an empty string means EOF (Ctrl+D).
/// [`read_secure_line`](Self::read_secure_line) returns the line without a
/// newline and without echoing keystrokes.
pub trait TerminalIO {
    /// Write text to the screen.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Read one line, echoed. Empty string means EOF.
    fn read_line(&mut self) -> io::Result<String>;

    /// Read one line without echoing it.
    fn read_secure_line(&mut self) -> io::Result<String>;
}

/// Real terminal I/O over stdin/stdout.
pub struct RealTerminal {
    term: console::Term,
}

impl RealTerminal {
    /// Create a terminal bound to stdout.
    pub fn new() -> Self {
        Self {
            term: console::Term::stdout(),
        }
    }
}

impl Default for RealTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalIO for RealTerminal {
    fn write(&mut self, text: &str) -> io::Result<()> {
        print!("{}", text);
        io::stdout().flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        // Read through std's stdin rather than console so that EOF is
        // observable as a zero-length read.
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }

    fn read_secure_line(&mut self) -> io::Result<String> {
        self.term.read_secure_line()
    }
}

/// Mock terminal for tests: canned input lines, captured output.
#[derive(Debug, Default)]
pub struct MockTerminal {
    responses: Vec<String>,
    index: usize,
    output: String,
}

impl MockTerminal {
    /// A terminal that replies with the given lines in sequence, then EOF.
    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            index: 0,
            output: String::new(),
        }
    }

    /// A terminal that replies with a single line, then EOF.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::with_responses([response.into()])
    }

    /// A terminal that immediately signals EOF (Ctrl+D).
    pub fn eof() -> Self {
        Self::default()
    }

    /// Everything written to the terminal so far.
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl TerminalIO for MockTerminal {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        let idx = self.index;
        self.index += 1;
        if idx < self.responses.len() {
            // Real read_line keeps the newline.
            Ok(format!("{}\n", self.responses[idx]))
        } else {
            Ok(String::new())
        }
    }

    fn read_secure_line(&mut self) -> io::Result<String> {
        let idx = self.index;
        self.index += 1;
        if idx < self.responses.len() {
            Ok(self.responses[idx].clone())
        } else {
            // A secure read cannot signal EOF with an empty line (that is a
            // legitimate blank entry), so exhausting the canned responses is
            // an error in the mock.
            Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "mock terminal ran out of responses",
            ))
        }
    }
}

// Allow `&mut stdin-like` readers in doctests and downstream test helpers.
impl<T: TerminalIO + ?Sized> TerminalIO for &mut T {
    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn read_line(&mut self) -> io::Result<String> {
        (**self).read_line()
    }

    fn read_secure_line(&mut self) -> io::Result<String> {
        (**self).read_secure_line()
    }
}

/// Read all of stdin, for callers that accept piped input instead of an
/// interactive session.
pub fn read_all_stdin() -> io::Result<String> {
    let mut buffer = String::new();
    io::stdin().lock().read_to_string(&mut buffer)?;
    Ok(buffer)
}
