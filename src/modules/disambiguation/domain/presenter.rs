use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::modules::media::Movie;
use crate::modules::provider::SearchResult;

/// Something the user can be asked to pick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "option", rename_all = "snake_case")]
pub enum ChoiceOption {
    Series(SearchResult),
    Movie(Arc<Movie>),
}

impl std::fmt::Display for ChoiceOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChoiceOption::Series(series) => write!(f, "{}", series),
            ChoiceOption::Movie(movie) => write!(f, "{}", movie),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    /// Index into the presented options
    Select(usize),
    Ignore,
}

/// The user's answer to a choice prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub decision: Decision,
    /// Apply the same kind of decision to later prompts of this run
    pub repeat: bool,
}

impl Choice {
    pub fn select(index: usize) -> Self {
        Self {
            decision: Decision::Select(index),
            repeat: false,
        }
    }

    pub fn ignore() -> Self {
        Self {
            decision: Decision::Ignore,
            repeat: false,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }
}

/// Interactive front end asked to resolve ambiguity
///
/// Implementations are driven by a single consumer and never see two
/// requests at once. `None` means the user cancelled.
#[async_trait]
pub trait DisambiguationPresenter: Send {
    async fn choose_one(&mut self, query: &str, options: &[ChoiceOption]) -> Option<Choice>;

    async fn prompt_free_text(&mut self, suggestion: &str) -> Option<String>;
}
