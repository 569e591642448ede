use crate::domain::ports::Dialog;
use std::io::{BufRead, Write};

/// Dialogs on a terminal: notices are printed, confirmations read a y/N answer.
pub struct TerminalDialog<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl TerminalDialog<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), assume_yes)
    }
}

impl<R: BufRead, W: Write> TerminalDialog<R, W> {
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Dialog for TerminalDialog<R, W> {
    fn notify(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "\n{}\n", message) {
            tracing::warn!("Could not write notice: {}", e);
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        if let Err(e) = write!(self.output, "\n{}\n\nContinue? [y/N] ", message) {
            tracing::warn!("Could not write prompt: {}", e);
            return false;
        }
        if self.assume_yes {
            let _ = writeln!(self.output, "y");
            return true;
        }
        let _ = self.output.flush();

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Could not read answer: {}", e);
                false
            }
        }
    }
}
