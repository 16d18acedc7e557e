use serde::{Deserialize, Serialize};

use crate::modules::provider::SortOrder;

/// Caller-facing switches of a matching run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Only explicit identifiers count, verification must agree, never prompts
    pub strict: bool,
    pub sort_order: SortOrder,
    pub locale: String,
    /// Filter clutter and detect queries automatically
    pub autodetect: bool,
}

impl MatchOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_autodetect(mut self, autodetect: bool) -> Self {
        self.autodetect = autodetect;
        self
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            strict: false,
            sort_order: SortOrder::default(),
            locale: "en".to_string(),
            autodetect: true,
        }
    }
}
