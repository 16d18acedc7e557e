use serde::{Deserialize, Serialize};

/// Position of one file within a multi-part movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoviePart {
    /// 1-based
    pub index: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Movie {
    pub name: String,
    pub year: Option<i32>,
    pub imdb_id: Option<u32>,
    pub tmdb_id: Option<u32>,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub part: Option<MoviePart>,
}

impl Movie {
    pub fn new(name: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            name: name.into(),
            year,
            imdb_id: None,
            tmdb_id: None,
            aliases: Vec::new(),
            part: None,
        }
    }

    pub fn with_imdb_id(mut self, imdb_id: u32) -> Self {
        self.imdb_id = Some(imdb_id);
        self
    }

    pub fn with_tmdb_id(mut self, tmdb_id: u32) -> Self {
        self.tmdb_id = Some(tmdb_id);
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// New record for one part of this movie
    pub fn as_part(&self, index: u32, count: u32) -> Movie {
        Movie {
            part: Some(MoviePart { index, count }),
            ..self.clone()
        }
    }

    /// Primary name followed by aliases
    pub fn effective_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Same movie regardless of part
    pub fn same_title(&self, other: &Movie) -> bool {
        match (self.imdb_id, other.imdb_id) {
            (Some(a), Some(b)) => a == b,
            _ => match (self.tmdb_id, other.tmdb_id) {
                (Some(a), Some(b)) => a == b,
                _ => self.name.eq_ignore_ascii_case(&other.name) && self.year == other.year,
            },
        }
    }
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(year) = self.year {
            write!(f, " ({})", year)?;
        }
        if let Some(part) = self.part {
            write!(f, " CD{}", part.index)?;
        }
        Ok(())
    }
}
