use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::modules::media::MediaFile;
use crate::modules::similarity::metrics::file_name_and_year;
use crate::modules::similarity::{clean_query, split_name_and_year, text_before_identifier, NameWithYear};

static RE_SEASON_FOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:season|series|staffel|saison|temporada)[\s._\-]*\d{1,4}|s\d{1,2}|specials?)$")
        .expect("Invalid regex")
});

static RE_GENERIC_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:cd|dvd|disc|disk|part|pt)[\s._\-]*\d{1,2}|movie|video|film)$")
        .expect("Invalid regex")
});

/// Folders like `Season 1`, `S01` or `Specials` that never name a series
pub fn is_season_folder(name: &str) -> bool {
    RE_SEASON_FOLDER.is_match(name.trim())
}

/// Series name taken from the text before the file's episode identifier
pub fn detect_series_name(file: &MediaFile, min_length: usize) -> Option<String> {
    let prefix = text_before_identifier(file.base_name(), false)?;
    let name = clean_query(prefix);
    (name.chars().count() >= min_length).then_some(name)
}

/// Distinct series names detected across the files, in first-seen order
pub fn detect_series_names(files: &[MediaFile], min_length: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in files.iter().filter_map(|f| detect_series_name(f, min_length)) {
        if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
            names.push(name);
        }
    }
    names
}

/// Query for a folder, walking up past season folders
pub fn detect_folder_query(folder: &Path, min_length: usize) -> Option<String> {
    folder
        .ancestors()
        .filter_map(|p| p.file_name()?.to_str())
        .find(|name| !is_season_folder(name))
        .map(|name| match text_before_identifier(name, false) {
            Some(prefix) => clean_query(prefix),
            None => split_name_and_year(name).name,
        })
        .filter(|name| name.chars().count() >= min_length)
}

/// Movie name and year from the file, or from its folder when the file name is generic
pub fn detect_movie_query(file: &MediaFile, min_length: usize) -> NameWithYear {
    let parsed = file_name_and_year(file);
    let generic = parsed.name.chars().count() < min_length || RE_GENERIC_NAME.is_match(&parsed.name);
    if !generic {
        return parsed;
    }

    match file.folder_name().map(split_name_and_year) {
        Some(from_folder) if from_folder.name.chars().count() >= min_length => NameWithYear {
            year: from_folder.year.or(parsed.year),
            name: from_folder.name,
        },
        _ => parsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_folders() {
        assert!(is_season_folder("Season 1"));
        assert!(is_season_folder("season.02"));
        assert!(is_season_folder("S01"));
        assert!(is_season_folder("Specials"));
        assert!(!is_season_folder("Seinfeld"));
    }

    #[test]
    fn test_detect_series_name_from_file() {
        let file = MediaFile::new("/tv/misc/The.Office.US.S02E03.720p.mkv");
        assert_eq!(detect_series_name(&file, 2).as_deref(), Some("The Office US"));
    }

    #[test]
    fn test_no_identifier_means_no_name() {
        let file = MediaFile::new("/tv/Firefly/pilot.mkv");
        assert_eq!(detect_series_name(&file, 2), None);
    }

    #[test]
    fn test_detect_series_names_is_distinct_and_ordered() {
        let files = vec![
            MediaFile::new("/a/Firefly.S01E01.mkv"),
            MediaFile::new("/b/Lost.1x01.avi"),
            MediaFile::new("/c/firefly.S01E02.mkv"),
        ];
        assert_eq!(detect_series_names(&files, 2), vec!["Firefly", "Lost"]);
    }

    #[test]
    fn test_folder_query_skips_season_folders() {
        let query = detect_folder_query(Path::new("/tv/Firefly (2002)/Season 1"), 2);
        assert_eq!(query.as_deref(), Some("Firefly"));
    }

    #[test]
    fn test_movie_query_from_generic_file_name() {
        let parsed = detect_movie_query(&MediaFile::new("/movies/Heat 1995/CD1.avi"), 2);
        assert_eq!(parsed.name, "Heat");
        assert_eq!(parsed.year, Some(1995));

        let parsed = detect_movie_query(&MediaFile::new("/movies/Heat/cd2.avi"), 2);
        assert_eq!(parsed.name, "Heat");
        assert_eq!(parsed.year, None);

        let parsed = detect_movie_query(&MediaFile::new("/movies/Heat.1995.720p.mkv"), 2);
        assert_eq!(parsed.name, "Heat");
    }
}
