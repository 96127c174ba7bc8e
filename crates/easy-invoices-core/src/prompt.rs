//! Operator prompts.
//!
//! The record workflows only need two questions: a free-form answer with a
//! default and a yes/no confirmation. [`TerminalPrompt`] asks them on a
//! line-based terminal; [`ScriptedPrompt`] replays canned answers.

use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Stderr, Write};

use crate::domain::{InvoiceError, Result};

/// Interactive question capability.
pub trait Prompt {
    /// Ask for a value. An empty answer selects `default`.
    fn ask(&mut self, label: &str, default: &str) -> Result<String>;

    /// Ask a yes/no question. An empty answer selects `default`.
    fn confirm(&mut self, label: &str, default: bool) -> Result<bool>;

    /// Tell the operator something without expecting an answer.
    fn notify(&mut self, message: &str);
}

/// Prompt reading answers line by line from `input` and writing questions to
/// `output`.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<StdinLock<'static>, Stderr> {
    /// Questions go to stderr so stdout only carries command output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self, label: &str) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InvoiceError::Interrupted(label.to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            write!(self.output, "{label}: ")?;
        } else {
            write!(self.output, "{label} [{default}]: ")?;
        }
        let answer = self.read_answer(label)?;
        if answer.trim().is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{label} [{hint}]: ")?;
            let answer = self.read_answer(label)?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer 'y' or 'n'.")?,
            }
        }
    }

    fn notify(&mut self, message: &str) {
        // Nothing useful to do if the terminal itself is gone.
        let _ = writeln!(self.output, "{message}");
    }
}

/// Prompt that replays queued answers, for tests and scripted runs.
///
/// An empty queued answer selects the default, like pressing enter. Running
/// out of answers ends the conversation with `InvoiceError::Interrupted`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    confirmations: VecDeque<bool>,
    /// Labels passed to `ask`, in order.
    pub asked: Vec<String>,
    /// Labels passed to `confirm`, in order.
    pub confirmed: Vec<String>,
    /// Messages passed to `notify`, in order.
    pub notices: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<A, S, C>(answers: A, confirmations: C) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
        C: IntoIterator<Item = bool>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            confirmations: confirmations.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Script with answers only; any confirmation interrupts.
    pub fn with_answers<A, S>(answers: A) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(answers, Vec::new())
    }

    /// Answers that were never asked for.
    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }

    pub fn remaining_confirmations(&self) -> usize {
        self.confirmations.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        self.asked.push(label.to_string());
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| InvoiceError::Interrupted(label.to_string()))?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn confirm(&mut self, label: &str, _default: bool) -> Result<bool> {
        self.confirmed.push(label.to_string());
        self.confirmations
            .pop_front()
            .ok_or_else(|| InvoiceError::Interrupted(label.to_string()))
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
