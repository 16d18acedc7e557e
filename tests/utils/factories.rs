/// Test data factories using builder pattern
///
/// Provides convenient methods to create episode lists and file sets with
/// sensible defaults
use chrono::NaiveDate;
use mediamatch::modules::media::{Episode, MediaFile, Movie};

pub struct SeriesFactory {
    name: String,
    seasons: Vec<Vec<String>>,
    specials: u32,
    first_airdate: Option<NaiveDate>,
}

impl SeriesFactory {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seasons: Vec::new(),
            specials: 0,
            first_airdate: None,
        }
    }

    /// Adds a season with the given episode titles
    pub fn season(mut self, titles: &[&str]) -> Self {
        self.seasons
            .push(titles.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Adds a season of `count` episodes titled `Episode N`
    pub fn season_of(mut self, count: u32) -> Self {
        self.seasons
            .push((1..=count).map(|n| format!("Episode {}", n)).collect());
        self
    }

    pub fn with_specials(mut self, count: u32) -> Self {
        self.specials = count;
        self
    }

    /// Episodes air weekly starting on this date
    pub fn aired_from(mut self, date: NaiveDate) -> Self {
        self.first_airdate = Some(date);
        self
    }

    pub fn build(self) -> Vec<Episode> {
        let mut episodes = Vec::new();
        let mut absolute = 0;

        for (s, titles) in self.seasons.iter().enumerate() {
            for (e, title) in titles.iter().enumerate() {
                absolute += 1;
                let mut episode = Episode::new(&self.name, s as u32 + 1, e as u32 + 1)
                    .with_title(title)
                    .with_absolute(absolute);
                if let Some(first) = self.first_airdate {
                    let airdate = first + chrono::Duration::weeks(absolute as i64 - 1);
                    episode = episode.with_airdate(airdate);
                }
                episodes.push(episode);
            }
        }

        for n in 1..=self.specials {
            episodes.push(Episode::special(&self.name, n).with_title(format!("Special {}", n)));
        }
        episodes
    }
}

pub struct FileFactory;

impl FileFactory {
    /// `<root>/<Series>.S01E0n.<ext>` for every episode number
    pub fn episodes(root: &str, series: &str, season: u32, numbers: &[u32], ext: &str) -> Vec<MediaFile> {
        numbers
            .iter()
            .map(|n| {
                MediaFile::new(format!(
                    "{}/{}.S{:02}E{:02}.{}",
                    root,
                    series.replace(' ', "."),
                    season,
                    n,
                    ext
                ))
            })
            .collect()
    }

    /// One episode file per folder: `<root>/folderNN/<Series>.S01ENN.mkv`
    pub fn scattered_episodes(root: &str, series: &str, count: u32) -> Vec<MediaFile> {
        (1..=count)
            .map(|n| {
                MediaFile::new(format!(
                    "{}/folder{:02}/{}.S01E{:02}.mkv",
                    root,
                    n,
                    series.replace(' ', "."),
                    n
                ))
            })
            .collect()
    }
}

pub struct MovieFactory {
    movie: Movie,
}

impl MovieFactory {
    pub fn new(name: &str, year: i32) -> Self {
        Self {
            movie: Movie::new(name, Some(year)),
        }
    }

    pub fn with_imdb_id(mut self, imdb_id: u32) -> Self {
        self.movie = self.movie.with_imdb_id(imdb_id);
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.movie.aliases.push(alias.to_string());
        self
    }

    pub fn build(self) -> Movie {
        self.movie
    }
}
