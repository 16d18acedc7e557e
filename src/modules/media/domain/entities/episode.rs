use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single episode record from an episode list provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Episode {
    pub series_name: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub absolute: Option<u32>,
    /// Special number for season 0 style specials
    pub special: Option<u32>,
    pub title: Option<String>,
    pub airdate: Option<NaiveDate>,
}

impl Episode {
    pub fn new(series_name: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            series_name: series_name.into(),
            season: Some(season),
            episode: Some(episode),
            absolute: None,
            special: None,
            title: None,
            airdate: None,
        }
    }

    pub fn special(series_name: impl Into<String>, special: u32) -> Self {
        Self {
            series_name: series_name.into(),
            season: None,
            episode: None,
            absolute: None,
            special: Some(special),
            title: None,
            airdate: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_absolute(mut self, absolute: u32) -> Self {
        self.absolute = Some(absolute);
        self
    }

    pub fn with_airdate(mut self, airdate: NaiveDate) -> Self {
        self.airdate = Some(airdate);
        self
    }

    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }
}

impl std::fmt::Display for Episode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.series_name)?;

        match (self.season, self.episode, self.special) {
            (Some(s), Some(e), _) => write!(f, " - {}x{:02}", s, e)?,
            (None, Some(e), _) => write!(f, " - {:02}", e)?,
            (_, _, Some(sp)) => write!(f, " - Special {}", sp)?,
            _ => {}
        }

        if let Some(title) = &self.title {
            write!(f, " - {}", title)?;
        }
        Ok(())
    }
}
