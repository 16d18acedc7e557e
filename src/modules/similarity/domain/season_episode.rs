use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::date_parser::DateParser;
use crate::modules::media::Episode;

/// `S01E02`, `s01.e02`, `S01_E02`, plus trailing `E03`/`-E03` for multi-episode files
static RE_SXE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)s(\d{1,2})[\s._\-]{0,3}e[p]?(\d{1,3})((?:[\-]?e\d{1,3})*)")
        .expect("Invalid regex")
});

static RE_SXE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)e(\d{1,3})").expect("Invalid regex"));

/// `1x02`, `01x002`
static RE_NXN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})x(\d{2,3})").expect("Invalid regex"));

/// Bare `102` or `1002`
static RE_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3,4}").expect("Invalid regex"));

/// Season/episode pair; `season` is `None` for absolute numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SxE {
    pub season: Option<u32>,
    pub episode: u32,
}

impl SxE {
    pub fn new(season: u32, episode: u32) -> Self {
        Self {
            season: Some(season),
            episode,
        }
    }

    pub fn absolute(episode: u32) -> Self {
        Self {
            season: None,
            episode,
        }
    }

    /// Identifiers an episode record can be addressed by
    pub fn for_episode(episode: &Episode) -> Vec<SxE> {
        let mut ids = Vec::new();
        if let (Some(s), Some(e)) = (episode.season, episode.episode) {
            ids.push(SxE::new(s, e));
        }
        if let Some(special) = episode.special {
            ids.push(SxE::new(0, special));
        }
        if let Some(absolute) = episode.absolute {
            ids.push(SxE::absolute(absolute));
        }
        ids
    }

    /// Single comparable number: `season * 100 + episode`, or the absolute number
    pub fn normalized(&self) -> u32 {
        match self.season {
            Some(s) => s * 100 + self.episode,
            None => self.episode,
        }
    }
}

impl std::fmt::Display for SxE {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.season {
            Some(s) => write!(f, "{}x{:02}", s, self.episode),
            None => write!(f, "{:02}", self.episode),
        }
    }
}

/// Every season/episode pattern found in a name, plus where the first one starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SxEMatch {
    pub start: usize,
    pub values: Vec<SxE>,
}

/// Extracts season/episode identifiers from file names
///
/// Pattern families are tried in order and the first family with any match
/// wins. Strict parsing only accepts the explicit `S01E02` and `1x02` forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonEpisodeParser {
    strict: bool,
}

impl SeasonEpisodeParser {
    pub fn new() -> Self {
        Self { strict: false }
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn parse(&self, name: &str) -> Vec<SxE> {
        self.find(name).map(|m| m.values).unwrap_or_default()
    }

    pub fn find(&self, name: &str) -> Option<SxEMatch> {
        if let Some(found) = Self::find_sxe(name) {
            return Some(found);
        }
        if let Some(found) = Self::find_nxn(name) {
            return Some(found);
        }
        if self.strict {
            return None;
        }
        Self::find_bare(name)
    }

    fn find_sxe(name: &str) -> Option<SxEMatch> {
        let mut values = Vec::new();
        let mut start = None;

        for caps in RE_SXE.captures_iter(name) {
            let Some(whole) = caps.get(0) else { continue };
            if !leading_boundary(name, whole.start()) {
                continue;
            }
            let (Some(season), Some(episode)) = (number(&caps, 1), number(&caps, 2)) else {
                continue;
            };

            start.get_or_insert(whole.start());
            push_unique(&mut values, SxE::new(season, episode));

            if let Some(tail) = caps.get(3) {
                for extra in RE_SXE_TAIL.captures_iter(tail.as_str()) {
                    if let Some(e) = number(&extra, 1) {
                        push_unique(&mut values, SxE::new(season, e));
                    }
                }
            }
        }

        start.map(|start| SxEMatch { start, values })
    }

    fn find_nxn(name: &str) -> Option<SxEMatch> {
        let mut values = Vec::new();
        let mut start = None;

        for caps in RE_NXN.captures_iter(name) {
            let Some(whole) = caps.get(0) else { continue };
            if !leading_boundary(name, whole.start()) || !trailing_boundary(name, whole.end()) {
                continue;
            }
            let (Some(season), Some(episode)) = (number(&caps, 1), number(&caps, 2)) else {
                continue;
            };

            start.get_or_insert(whole.start());
            push_unique(&mut values, SxE::new(season, episode));
        }

        start.map(|start| SxEMatch { start, values })
    }

    fn find_bare(name: &str) -> Option<SxEMatch> {
        let mut values = Vec::new();
        let mut start = None;

        for m in RE_BARE.find_iter(name) {
            if !leading_boundary(name, m.start()) || !trailing_boundary(name, m.end()) {
                continue;
            }
            let digits = m.as_str();
            if digits.len() == 4 && (digits.starts_with("19") || digits.starts_with("20")) {
                // Four digits starting with 19/20 are almost always a year
                continue;
            }
            let Ok(absolute) = digits.parse::<u32>() else {
                continue;
            };

            start.get_or_insert(m.start());
            push_unique(&mut values, SxE::new(absolute / 100, absolute % 100));
            push_unique(&mut values, SxE::absolute(absolute));
        }

        start.map(|start| SxEMatch { start, values })
    }
}

/// Name text preceding the first season/episode or date pattern
///
/// `Show.Name.S01E02.720p` yields `Show.Name.`; `None` when the name carries no
/// identifier or nothing precedes it.
pub fn text_before_identifier(name: &str, strict: bool) -> Option<&str> {
    let parser = if strict {
        SeasonEpisodeParser::strict()
    } else {
        SeasonEpisodeParser::new()
    };

    let sxe_start = parser.find(name).map(|m| m.start);
    let date_start = DateParser.find(name).map(|m| m.start);

    let start = match (sxe_start, date_start) {
        (Some(a), Some(b)) => a.min(b),
        (a, b) => a.or(b)?,
    };

    let prefix = &name[..start];
    prefix
        .chars()
        .any(|c| c.is_alphanumeric())
        .then_some(prefix)
}

fn number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

fn push_unique(values: &mut Vec<SxE>, value: SxE) {
    if !values.contains(&value) {
        values.push(value);
    }
}

pub(crate) fn leading_boundary(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

pub(crate) fn trailing_boundary(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric())
}
