#[cfg(test)]
use std::collections::VecDeque;
use std::{future::Future, io::Write};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use crate::error::{Error, Result};

/// Source of operator answers. Prompts are line based: a message is shown and one line is read
/// back. The end of input surfaces as [Error::InputClosed].
pub trait LineInput {
    fn prompt(&mut self, message: &str) -> impl Future<Output = Result<String>>;
}

pub struct StdinInput {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl LineInput for StdinInput {
    async fn prompt(&mut self, message: &str) -> Result<String> {
        print!("{message}");
        if let Err(e) = std::io::stdout().flush() {
            warn!("Failed to flush prompt {e}");
        }

        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(Error::InputClosed),
            Err(e) => {
                warn!("Failed to read input {e}");
                Err(Error::InputClosed)
            }
        }
    }
}

/// Replays prepared answers, then behaves like a closed stream.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    pub prompts: Vec<String>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
impl LineInput for ScriptedInput {
    async fn prompt(&mut self, message: &str) -> Result<String> {
        self.prompts.push(message.to_string());
        self.lines.pop_front().ok_or(Error::InputClosed)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::{LineInput, ScriptedInput};

    #[tokio::test]
    async fn test_scripted_input_records_prompts_then_closes() {
        let mut input = ScriptedInput::new(["yes"]);
        assert_eq!(input.prompt("Remove? ").await.ok(), Some("yes".to_string()));
        assert!(matches!(input.prompt("Again? ").await, Err(Error::InputClosed)));
        assert_eq!(input.prompts, vec!["Remove? ", "Again? "]);
        assert_eq!(input.remaining(), 0);
    }
}
