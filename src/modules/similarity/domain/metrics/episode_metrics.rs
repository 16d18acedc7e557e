use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::modules::media::{Candidate, Episode, MediaFile};
use crate::modules::similarity::domain::combinators::Cascade;
use crate::modules::similarity::domain::date_parser::DateParser;
use crate::modules::similarity::domain::metric::{Metric, VETO};
use crate::modules::similarity::domain::name_similarity::{HybridSimilarity, NameSimilarity};
use crate::modules::similarity::domain::normalizer::NameNormalizer;
use crate::modules::similarity::domain::season_episode::{
    text_before_identifier, SeasonEpisodeParser, SxE,
};

static RE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex"));

pub type FileMetric = Metric<MediaFile, Candidate>;

/// Titles shorter than this are too generic to count as evidence
const MIN_TITLE_LENGTH: usize = 4;

/// Floors a similarity into one of four ranks so near-equal scores tie
fn quarter_rank(similarity: f64) -> f32 {
    ((similarity * 4.0).floor() / 4.0) as f32
}

/// True when `needle` appears in `haystack` on word boundaries
fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() || haystack.is_empty() {
        return false;
    }
    format!(" {} ", haystack).contains(&format!(" {} ", needle))
}

/// Library of file-to-episode similarity metrics
///
/// Every metric scores `(file, candidate)` and is neutral (0.0) for candidates
/// that are not episodes. Cloning is cheap; parsers and the normalizer are shared.
#[derive(Clone)]
pub struct EpisodeMetrics {
    parser: SeasonEpisodeParser,
    normalizer: Arc<NameNormalizer>,
    similarity: Arc<dyn NameSimilarity>,
}

impl EpisodeMetrics {
    pub fn new(similarity: Arc<dyn NameSimilarity>) -> Self {
        Self {
            parser: SeasonEpisodeParser::new(),
            normalizer: Arc::new(NameNormalizer::default_pipeline()),
            similarity,
        }
    }

    /// Only explicit `S01E02`/`1x02` patterns count as identifiers
    pub fn strict(similarity: Arc<dyn NameSimilarity>) -> Self {
        Self {
            parser: SeasonEpisodeParser::strict(),
            ..Self::new(similarity)
        }
    }

    /// 1 on a shared season/episode, veto on disagreement, 0 when either side has none
    pub fn season_episode(&self) -> FileMetric {
        let parser = self.parser;
        Metric::new("SeasonEpisode", move |file: &MediaFile, candidate: &Candidate| {
            let Some(episode) = candidate.as_episode() else {
                return 0.0;
            };
            let found = parser.parse(file.base_name());
            let ids = SxE::for_episode(episode);
            if found.is_empty() || ids.is_empty() {
                return 0.0;
            }
            if found.iter().any(|sxe| ids.contains(sxe)) {
                1.0
            } else {
                VETO
            }
        })
    }

    /// 1 on equal air date, veto on disagreement, 0 when either side has none
    pub fn air_date(&self) -> FileMetric {
        Metric::new("AirDate", |file: &MediaFile, candidate: &Candidate| {
            let airdate = candidate.as_episode().and_then(|e| e.airdate);
            match (DateParser.parse(file.base_name()), airdate) {
                (Some(a), Some(b)) if a == b => 1.0,
                (Some(_), Some(_)) => VETO,
                _ => 0.0,
            }
        })
    }

    /// 1 when the episode title appears in the file name
    pub fn title(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("Title", move |file: &MediaFile, candidate: &Candidate| {
            let Some(episode) = candidate.as_episode() else {
                return 0.0;
            };
            match this.usable_title(episode) {
                Some(title) if contains_words(&this.normalize(file.base_name()), &title) => 1.0,
                _ => 0.0,
            }
        })
    }

    pub fn episode_identifier(&self) -> FileMetric {
        Cascade::of(vec![self.season_episode(), self.air_date()])
    }

    pub fn episode_funnel(&self) -> FileMetric {
        Cascade::of(vec![self.season_episode(), self.air_date(), self.title()])
    }

    /// Identifier agreement boosted by a title match
    ///
    /// Scores 1.1 for identifier plus title, 0.1 for identifier alone and -0.1
    /// for a vetoed identifier. A title only counts when the series name agrees.
    ///
    /// An identifier that only comes from numbers in the episode title is not
    /// treated as a conflict. That only matters when the balancer is used on its
    /// own: in the default episode sequence the funnel pass has already vetoed
    /// such pairs.
    pub fn episode_balancer(&self) -> FileMetric {
        let identifier = self.episode_identifier();
        let title = self.title();
        let series_name = self.series_name();
        let parser = self.parser;
        let this = self.clone();

        Metric::new("EpisodeBalancer", move |file: &MediaFile, candidate: &Candidate| {
            let Some(episode) = candidate.as_episode() else {
                return 0.0;
            };

            let mut sxe = identifier.score(file, candidate);
            let mut title_score = if sxe < 1.0 {
                title.score(file, candidate)
            } else {
                1.0
            };

            // Numbers inside the episode title can look like a conflicting identifier
            if sxe < 0.0 && title_score == 1.0 {
                let in_title = this
                    .usable_title(episode)
                    .map(|t| parser.parse(&t))
                    .unwrap_or_default();
                let in_file = parser.parse(file.base_name());
                if in_title.iter().any(|s| in_file.contains(s)) {
                    sxe = 1.0;
                    title_score = 0.0;
                }
            }

            if title_score == 1.0 && series_name.score(file, candidate) < 0.5 {
                title_score = 0.0;
            }

            sxe.max(0.0) * title_score + sxe.floor() / 10.0
        })
    }

    /// Containment of series name and title in the folder path and file name
    ///
    /// Averages every field pairing and rounds up to thirds.
    pub fn substring_fields(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("SubstringFields", move |file: &MediaFile, candidate: &Candidate| {
            let Some(episode) = candidate.as_episode() else {
                return 0.0;
            };

            let mut file_fields = Vec::new();
            if let Some(folder) = file.parent_folder() {
                file_fields.push(this.normalize(&folder.to_string_lossy()));
            }
            file_fields.push(this.normalize(file.base_name()));

            let mut episode_fields = vec![this.normalize(&episode.series_name)];
            if let Some(title) = &episode.title {
                let title = this.normalize(title);
                if !episode_fields.contains(&title) {
                    episode_fields.push(title);
                }
            }

            let mut sum = 0.0;
            for a in &file_fields {
                for b in &episode_fields {
                    if contains_words(a, b) || contains_words(b, a) {
                        sum += 1.0;
                    }
                }
            }
            let average = sum / (file_fields.len() * episode_fields.len()) as f32;
            (average * 3.0).ceil() / 3.0
        })
    }

    /// Similarity of series names guessed from the path against the episode's series
    pub fn series_name(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("SeriesName", move |file: &MediaFile, candidate: &Candidate| {
            let Some(episode) = candidate.as_episode() else {
                return 0.0;
            };
            let series = this.normalize(&episode.series_name);

            let best = this
                .path_series_names(file)
                .iter()
                .map(|name| this.similarity.calculate(name, &series))
                .fold(0.0_f64, f64::max);
            quarter_rank(best)
        })
    }

    /// Generic name similarity of file name and candidate, in quarter ranks
    pub fn name(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("Name", move |file: &MediaFile, candidate: &Candidate| {
            let a = this.normalize(file.base_name());
            let b = this.normalize(&candidate.to_string());
            quarter_rank(this.similarity.calculate(&a, &b))
        })
    }

    /// Share of the episode's numbers that also appear in the file name
    pub fn numeric(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("Numeric", move |file: &MediaFile, candidate: &Candidate| {
            let Some(episode) = candidate.as_episode() else {
                return 0.0;
            };
            let wanted: HashSet<u32> = [
                episode.season,
                episode.episode,
                episode.absolute,
                episode.special,
            ]
            .into_iter()
            .flatten()
            .collect();
            if wanted.is_empty() {
                return 0.0;
            }

            let found: HashSet<u32> = RE_DIGITS
                .find_iter(&this.normalize(file.base_name()))
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            wanted.intersection(&found).count() as f32 / wanted.len() as f32
        })
    }

    /// Prefers regular episodes over specials
    pub fn special_number(&self) -> FileMetric {
        Metric::new("SpecialNumber", |_: &MediaFile, candidate: &Candidate| {
            match candidate.as_episode() {
                Some(e) if e.is_special() => 0.0,
                Some(_) => 0.5,
                None => 0.0,
            }
        })
    }

    /// Raw similarity of the last three path components against the candidate
    pub fn file_path(&self) -> FileMetric {
        let this = self.clone();
        Metric::new("FilePath", move |file: &MediaFile, candidate: &Candidate| {
            let components: Vec<&str> = file.path.iter().filter_map(|c| c.to_str()).collect();
            let tail = &components[components.len().saturating_sub(3)..];
            let a = this.normalize(&tail.join(" "));
            let b = this.normalize(&candidate.to_string());
            this.similarity.calculate(&a, &b) as f32
        })
    }

    /// Independent check applied to strict-mode matches
    pub fn verification(&self) -> FileMetric {
        Cascade::of(vec![
            self.season_episode(),
            self.air_date(),
            self.title(),
            self.name(),
        ])
    }

    fn normalize(&self, name: &str) -> String {
        self.normalizer.normalize(name)
    }

    /// Normalized title, unless it is too short or just repeats the series name
    fn usable_title(&self, episode: &Episode) -> Option<String> {
        let title = self.normalize(episode.title.as_deref()?);
        let series = self.normalize(&episode.series_name);
        (title.len() >= MIN_TITLE_LENGTH && !series.contains(&title)).then_some(title)
    }

    /// Series name guesses from file name, folder and grandparent folder
    fn path_series_names(&self, file: &MediaFile) -> Vec<String> {
        let mut components: Vec<&str> = vec![file.base_name()];
        components.extend(
            file.path
                .ancestors()
                .skip(1)
                .take(2)
                .filter_map(|p| p.file_name())
                .filter_map(|n| n.to_str()),
        );

        components
            .into_iter()
            .map(|name| {
                let guess = text_before_identifier(name, false).unwrap_or(name);
                self.normalize(guess)
            })
            .filter(|name| !name.is_empty())
            .collect()
    }
}

impl Default for EpisodeMetrics {
    fn default() -> Self {
        Self::new(Arc::new(HybridSimilarity::default_hybrid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::similarity::domain::metric::is_veto;
    use chrono::NaiveDate;

    fn file(path: &str) -> MediaFile {
        MediaFile::new(path)
    }

    fn episode(series: &str, season: u32, number: u32, title: &str) -> Candidate {
        Candidate::episode(Episode::new(series, season, number).with_title(title))
    }

    #[test]
    fn test_season_episode_match_and_veto() {
        let metrics = EpisodeMetrics::default();
        let sxe = metrics.season_episode();

        let f = file("/tv/Show/Show.S01E02.mkv");
        assert_eq!(sxe.score(&f, &episode("Show", 1, 2, "Next")), 1.0);
        assert!(is_veto(sxe.score(&f, &episode("Show", 1, 3, "Other"))));
        assert_eq!(sxe.score(&file("/tv/Show/pilot.mkv"), &episode("Show", 1, 2, "Next")), 0.0);
    }

    #[test]
    fn test_absolute_numbering_matches() {
        let metrics = EpisodeMetrics::default();
        let candidate = Candidate::episode(Episode::new("Show", 2, 5).with_absolute(105));
        assert_eq!(
            metrics.season_episode().score(&file("Show - 105.mkv"), &candidate),
            1.0
        );
    }

    #[test]
    fn test_air_date() {
        let metrics = EpisodeMetrics::default();
        let date = NaiveDate::from_ymd_opt(2010, 5, 17).unwrap();
        let candidate = Candidate::episode(Episode::new("Daily", 15, 60).with_airdate(date));

        assert_eq!(metrics.air_date().score(&file("Daily.2010.05.17.mkv"), &candidate), 1.0);
        assert!(is_veto(
            metrics.air_date().score(&file("Daily.2010.05.18.mkv"), &candidate)
        ));
    }

    #[test]
    fn test_title_ignores_short_titles() {
        let metrics = EpisodeMetrics::default();
        let title = metrics.title();

        assert_eq!(
            title.score(&file("Show - Hot Dogs.avi"), &episode("Show", 1, 19, "Hot Dogs")),
            1.0
        );
        assert_eq!(title.score(&file("Show - Up.avi"), &episode("Show", 1, 2, "Up")), 0.0);
    }

    #[test]
    fn test_veto_beats_perfect_name() {
        let metrics = EpisodeMetrics::default();
        let funnel = metrics.episode_funnel();
        let candidate = episode("Show", 1, 3, "Pilot");

        let f = file("Show - S01E02 - Pilot.mkv");
        assert!(is_veto(funnel.score(&f, &candidate)));
    }

    #[test]
    fn test_episode_balancer_levels() {
        let metrics = EpisodeMetrics::default();
        let balancer = metrics.episode_balancer();

        let f = file("/tv/Greek/Greek - S01E19 - No Campus for Old Rules.avi");
        let right = episode("Greek", 1, 19, "No Campus for Old Rules");
        let wrong = episode("Greek", 1, 20, "Something Else");

        assert!((balancer.score(&f, &right) - 1.1).abs() < 0.001);
        assert!(balancer.score(&f, &wrong) < 0.0);
    }

    #[test]
    fn test_balancer_ignores_numbers_from_title() {
        let metrics = EpisodeMetrics::default();
        let f = file("/tv/Show/Show - 101 - Room 101.avi");
        let room = episode("Show", 3, 5, "Room 101");

        assert!((metrics.episode_balancer().score(&f, &room) - 0.1).abs() < 0.001);
        assert!(is_veto(metrics.episode_funnel().score(&f, &room)));
    }

    #[test]
    fn test_substring_fields() {
        let metrics = EpisodeMetrics::default();
        let candidate = Candidate::episode(Episode::new("Doctor Who", 1, 1).with_title("Rose"));

        let same = file("Doctor Who (2005)/Doctor Who - 1x01 - Rose.avi");
        let other = file("Doctor Who (1963)/Doctor Who - 1x01 - An Unearthly Child.avi");

        let metric = metrics.substring_fields();
        assert_eq!(metric.score(&same, &candidate), 1.0);
        assert!((metric.score(&other, &candidate) - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_series_name_uses_folders() {
        let metrics = EpisodeMetrics::default();
        let candidate = episode("Veronica Mars", 1, 19, "Hot Dogs");
        let f = file("/tv/Veronica Mars/Season 1/1x19.avi");
        assert_eq!(metrics.series_name().score(&f, &candidate), 1.0);
    }

    #[test]
    fn test_numeric() {
        let metrics = EpisodeMetrics::default();
        let candidate = episode("Show", 1, 2, "Next");
        assert_eq!(metrics.numeric().score(&file("Show Season 1 Episode 2.avi"), &candidate), 1.0);
    }

    #[test]
    fn test_special_number_prefers_regular_episodes() {
        let metrics = EpisodeMetrics::default();
        let f = file("x.avi");
        let regular = episode("Show", 1, 1, "A");
        let special = Candidate::episode(Episode::special("Show", 1));
        assert!(metrics.special_number().score(&f, &regular) > metrics.special_number().score(&f, &special));
    }

    #[test]
    fn test_metrics_are_neutral_for_movies() {
        let metrics = EpisodeMetrics::default();
        let movie = Candidate::movie(crate::modules::media::Movie::new("Heat", Some(1995)));
        let f = file("Heat.S01E01.avi");
        assert_eq!(metrics.episode_funnel().score(&f, &movie), 0.0);
    }
}
