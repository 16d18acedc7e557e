use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use super::season_episode::{leading_boundary, trailing_boundary};

static RE_YMD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})[.\-_ ](\d{1,2})[.\-_ ](\d{1,2})").expect("Invalid regex")
});

static RE_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[.\-_ ](\d{1,2})[.\-_ ](\d{4})").expect("Invalid regex")
});

/// A date found in a name and where it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub start: usize,
    pub date: NaiveDate,
}

/// Finds air dates such as `2010.05.17`, `2010-05-17` or `17.05.2010` in names
#[derive(Debug, Clone, Copy, Default)]
pub struct DateParser;

impl DateParser {
    pub fn parse(&self, name: &str) -> Option<NaiveDate> {
        self.find(name).map(|m| m.date)
    }

    pub fn find(&self, name: &str) -> Option<DateMatch> {
        Self::scan(&RE_YMD, name, (1, 2, 3)).or_else(|| Self::scan(&RE_DMY, name, (3, 2, 1)))
    }

    fn scan(pattern: &Regex, name: &str, (y, m, d): (usize, usize, usize)) -> Option<DateMatch> {
        pattern.captures_iter(name).find_map(|caps| {
            let whole = caps.get(0)?;
            if !leading_boundary(name, whole.start()) || !trailing_boundary(name, whole.end()) {
                return None;
            }

            let year = caps.get(y)?.as_str().parse::<i32>().ok()?;
            let month = caps.get(m)?.as_str().parse::<u32>().ok()?;
            let day = caps.get(d)?.as_str().parse::<u32>().ok()?;

            if !(1900..=2100).contains(&year) {
                return None;
            }

            NaiveDate::from_ymd_opt(year, month, day).map(|date| DateMatch {
                start: whole.start(),
                date,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_year_first_dates() {
        let parser = DateParser;
        assert_eq!(parser.parse("Daily.Show.2010.05.17.mkv"), Some(date(2010, 5, 17)));
        assert_eq!(parser.parse("news 2010-05-17"), Some(date(2010, 5, 17)));
        assert_eq!(parser.parse("news_2010_5_7"), Some(date(2010, 5, 7)));
    }

    #[test]
    fn test_parses_day_first_dates() {
        assert_eq!(DateParser.parse("Show 17.05.2010"), Some(date(2010, 5, 17)));
    }

    #[test]
    fn test_rejects_invalid_dates() {
        assert_eq!(DateParser.parse("Show 2010.13.40"), None);
        assert_eq!(DateParser.parse("Show.S01E01"), None);
    }

    #[test]
    fn test_reports_start() {
        let found = DateParser.find("Show.2010.05.17").unwrap();
        assert_eq!(found.start, 5);
    }
}
