use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Episode numbering scheme requested from an episode list provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Airdate,
    Dvd,
    Absolute,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Airdate => "airdate",
            SortOrder::Dvd => "dvd",
            SortOrder::Absolute => "absolute",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "airdate" | "aired" => Ok(SortOrder::Airdate),
            "dvd" => Ok(SortOrder::Dvd),
            "absolute" => Ok(SortOrder::Absolute),
            other => Err(AppError::InvalidInput(format!("Unknown sort order: {}", other))),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
