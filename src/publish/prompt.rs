// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Operator interaction.
//!
//! The commit gate is the only point where the workflow waits on the
//! operator. It blocks with no timeout.

use std::io::{self, BufRead, BufReader, Write};

/// Operator prompt capability injected into the publish controller.
pub trait Prompt: Send {
    /// Show `details`, one per line, then ask a yes/no question.
    /// Only `y` or `Y` affirms.
    fn confirm(&mut self, question: &str, details: &[String]) -> bool;

    /// Ask for one line of text; end of input reads as blank.
    fn read_line(&mut self, question: &str) -> String;

    /// Wait for Enter before the window closes.
    fn pause(&mut self, message: &str);
}

/// Whether an answer to a yes/no question affirms.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// [`Prompt`] over a reader and writer, normally stdin and stdout.
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

/// Terminal prompt on the process's own standard streams.
pub type StdioPrompt = TerminalPrompt<BufReader<io::Stdin>, Box<dyn Write + Send>>;

impl StdioPrompt {
    /// Prompt on stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), Box::new(io::stdout()))
    }

    /// Prompt on stdin and stderr, for when stdout carries machine output.
    #[must_use]
    pub fn stdio_to_stderr() -> Self {
        Self::new(BufReader::new(io::stdin()), Box::new(io::stderr()))
    }
}

impl<R: BufRead + Send, W: Write + Send> TerminalPrompt<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> String {
        // A closed output stream must not turn into a confirmation.
        let _ = write!(self.output, "{question}");
        let _ = self.output.flush();

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => String::new(),
            Ok(_) => answer.trim_end_matches(['\r', '\n']).to_string(),
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> Prompt for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str, details: &[String]) -> bool {
        for line in details {
            let _ = writeln!(self.output, "  {line}");
        }
        is_affirmative(&self.ask(&format!("{question} [y/N] ")))
    }

    fn read_line(&mut self, question: &str) -> String {
        self.ask(question)
    }

    fn pause(&mut self, message: &str) {
        let _ = self.ask(message);
    }
}
