//! Operator interaction port.
//!
//! Every question the provisioning flow asks goes through [`Operator`], so the
//! same services run against a terminal, a scripted answer list, or a test.
//!
//! Question kinds:
//! - choice from a fixed set (`choose`), answered with raw text that the
//!   caller validates, because each step reacts differently to a bad choice
//! - number with a default (`number`)
//! - yes/no with a default (`confirm`)
//! - free text with an optional default (`text`)

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors raised while asking the operator something.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperatorError {
    /// Reading the answer failed.
    #[error("Failed to read operator input: {0}")]
    Io(String),

    /// A scripted operator ran out of answers.
    #[error("No scripted answer left for: {prompt}")]
    ScriptExhausted { prompt: String },
}

impl From<std::io::Error> for OperatorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for operator interactions.
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Synchronous request/response channel to the person running the tool.
pub trait Operator: Send + Sync {
    /// Ask for one of `options`. Returns the trimmed raw answer.
    fn choose(&self, prompt: &str, options: &[String]) -> OperatorResult<String>;

    /// Ask for a positive whole number; empty input yields `default`.
    fn number(&self, prompt: &str, default: u32) -> OperatorResult<u32>;

    /// Ask a yes/no question; empty input yields `default`.
    fn confirm(&self, prompt: &str, default: bool) -> OperatorResult<bool>;

    /// Ask for free text; empty input yields `default` (or an empty string).
    fn text(&self, prompt: &str, default: Option<&str>) -> OperatorResult<String>;

    /// Display an informational message.
    fn info(&self, message: &str);

    /// Display a warning.
    fn warn(&self, message: &str);
}

/// Interpret a yes/no answer. `None` means the answer was not understood.
pub fn interpret_confirmation(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Interpret a numeric answer. `None` means the answer was not a positive
/// whole number.
pub fn interpret_number(input: &str, default: u32) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(default);
    }
    trimmed.parse::<u32>().ok().filter(|value| *value > 0)
}

/// Operator that answers from a fixed script.
///
/// Used for headless runs and tests. Answers are consumed in order, one per
/// question, with exactly the same interpretation rules as the terminal:
/// an empty answer takes the default, and an answer that is not understood
/// consumes the next scripted answer as a re-prompt would.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    messages: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::default(),
            messages: Mutex::default(),
        }
    }

    /// Every prompt asked so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every info/warning message shown so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of scripted answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_answer(&self, prompt: &str) -> OperatorResult<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or_else(|| OperatorError::ScriptExhausted {
                prompt: prompt.to_string(),
            })
    }

    fn record(&self, message: String) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}

impl Operator for ScriptedOperator {
    fn choose(&self, prompt: &str, _options: &[String]) -> OperatorResult<String> {
        self.next_answer(prompt)
    }

    fn number(&self, prompt: &str, default: u32) -> OperatorResult<u32> {
        loop {
            let answer = self.next_answer(prompt)?;
            if let Some(value) = interpret_number(&answer, default) {
                return Ok(value);
            }
            self.warn("Please enter a positive whole number.");
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> OperatorResult<bool> {
        loop {
            let answer = self.next_answer(prompt)?;
            if let Some(value) = interpret_confirmation(&answer, default) {
                return Ok(value);
            }
            self.warn("Please enter 'y' for yes or 'n' for no.");
        }
    }

    fn text(&self, prompt: &str, default: Option<&str>) -> OperatorResult<String> {
        let answer = self.next_answer(prompt)?;
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer)
        }
    }

    fn info(&self, message: &str) {
        self.record(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.record(format!("warning: {message}"));
    }
}
