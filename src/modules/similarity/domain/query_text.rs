use regex::Regex;
use std::sync::LazyLock;

use super::normalizer::NameNormalizer;
use super::season_episode::{leading_boundary, trailing_boundary};

static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:19|20)\d{2}").expect("Invalid regex"));

static QUERY_NORMALIZER: LazyLock<NameNormalizer> = LazyLock::new(NameNormalizer::query_pipeline);

/// A readable name with the year it carried, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameWithYear {
    pub name: String,
    pub year: Option<i32>,
}

/// Splits `The.Dark.Knight.2008.1080p` into `The Dark Knight` and 2008
///
/// The last standalone year wins so titles like `2001 A Space Odyssey 1968`
/// keep their leading number. Everything after the year is release noise.
pub fn split_name_and_year(raw: &str) -> NameWithYear {
    let year_match = RE_YEAR
        .find_iter(raw)
        .filter(|m| leading_boundary(raw, m.start()) && trailing_boundary(raw, m.end()))
        .filter(|m| QUERY_NORMALIZER.normalize(&raw[..m.start()]).chars().any(char::is_alphanumeric))
        .last();

    match year_match {
        Some(m) => NameWithYear {
            name: clean_query(&raw[..m.start()]),
            year: m.as_str().parse().ok(),
        },
        None => NameWithYear {
            name: clean_query(raw),
            year: None,
        },
    }
}

/// Strips brackets, release info and separators but keeps the name readable
pub fn clean_query(raw: &str) -> String {
    QUERY_NORMALIZER
        .normalize(raw)
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_release_name() {
        let parsed = split_name_and_year("The.Dark.Knight.2008.1080p.BluRay.x264");
        assert_eq!(parsed.name, "The Dark Knight");
        assert_eq!(parsed.year, Some(2008));
    }

    #[test]
    fn test_year_in_parentheses() {
        let parsed = split_name_and_year("Heat (1995)");
        assert_eq!(parsed.name, "Heat");
        assert_eq!(parsed.year, Some(1995));
    }

    #[test]
    fn test_leading_number_is_part_of_name() {
        let parsed = split_name_and_year("2001 A Space Odyssey 1968");
        assert_eq!(parsed.name, "2001 A Space Odyssey");
        assert_eq!(parsed.year, Some(1968));
    }

    #[test]
    fn test_no_year() {
        let parsed = split_name_and_year("[Group] Some_Movie");
        assert_eq!(parsed.name, "Some Movie");
        assert_eq!(parsed.year, None);
    }
}
