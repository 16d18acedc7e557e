/// Hand-written collaborators with call counters
use async_trait::async_trait;
use mediamatch::modules::disambiguation::{Choice, ChoiceOption, DisambiguationPresenter};
use mediamatch::modules::media::{Episode, MediaFile, Movie, Track};
use mediamatch::modules::provider::{
    EpisodeListProvider, MovieIdentificationService, MusicIdentificationService, SearchResult,
    SortOrder,
};
use mediamatch::shared::errors::{AppError, AppResult};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Episode list provider serving canned series
#[derive(Default)]
pub struct MockEpisodeProvider {
    series: Vec<(SearchResult, Vec<Episode>)>,
    failing_queries: HashSet<String>,
    delay: Option<Duration>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockEpisodeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, id: &str, episodes: Vec<Episode>) -> Self {
        let name = episodes
            .first()
            .map(|e| e.series_name.clone())
            .unwrap_or_else(|| id.to_string());
        self.series.push((SearchResult::new(name, id), episodes));
        self
    }

    /// Searches for this query fail with a provider error
    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_lowercase());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EpisodeListProvider for MockEpisodeProvider {
    fn name(&self) -> &str {
        "mock-episodes"
    }

    async fn search(&self, query: &str, _locale: &str) -> AppResult<Vec<SearchResult>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let query = query.to_lowercase();
        if self.failing_queries.contains(&query) {
            return Err(AppError::ProviderError(format!("search '{}' failed", query)));
        }
        Ok(self
            .series
            .iter()
            .filter(|(result, _)| {
                let name = result.name.to_lowercase();
                name.contains(&query) || query.contains(&name)
            })
            .map(|(result, _)| result.clone())
            .collect())
    }

    async fn get_record_list(
        &self,
        series: &SearchResult,
        _order: SortOrder,
        _locale: &str,
    ) -> AppResult<Vec<Episode>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.series
            .iter()
            .find(|(result, _)| result.id == series.id)
            .map(|(_, episodes)| episodes.clone())
            .ok_or_else(|| AppError::ProviderError(format!("unknown series {}", series.id)))
    }
}

/// Movie service with name search, hash and id tables
#[derive(Default)]
pub struct MockMovieService {
    movies: Vec<Movie>,
    hashes: HashMap<String, Movie>,
    search_calls: AtomicUsize,
    id_calls: AtomicUsize,
}

impl MockMovieService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(mut self, movie: Movie) -> Self {
        self.movies.push(movie);
        self
    }

    /// Files with this name are identified by hash
    pub fn with_hash(mut self, file_name: &str, movie: Movie) -> Self {
        self.hashes.insert(file_name.to_string(), movie);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn id_calls(&self) -> usize {
        self.id_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieIdentificationService for MockMovieService {
    fn name(&self) -> &str {
        "mock-movies"
    }

    async fn search_movie(
        &self,
        query: &str,
        year: Option<i32>,
        _locale: &str,
    ) -> AppResult<Vec<Movie>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let first_word = query
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();
        Ok(self
            .movies
            .iter()
            .filter(|m| {
                m.effective_names()
                    .any(|name| name.to_lowercase().contains(&first_word))
            })
            .filter(|m| year.is_none() || m.year == year)
            .cloned()
            .collect())
    }

    async fn lookup_by_id(&self, imdb_id: u32, _locale: &str) -> AppResult<Option<Movie>> {
        self.id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .movies
            .iter()
            .find(|m| m.imdb_id == Some(imdb_id))
            .cloned())
    }

    async fn lookup_by_hash(&self, file: &MediaFile, _locale: &str) -> AppResult<Option<Movie>> {
        Ok(self.hashes.get(file.file_name()).cloned())
    }
}

/// Fingerprint service keyed by file name
#[derive(Default)]
pub struct MockMusicService {
    tracks: HashMap<String, Track>,
    lookups: AtomicUsize,
}

impl MockMusicService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, file_name: &str, track: Track) -> Self {
        self.tracks.insert(file_name.to_string(), track);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MusicIdentificationService for MockMusicService {
    fn name(&self) -> &str {
        "mock-music"
    }

    async fn lookup(&self, file: &MediaFile) -> AppResult<Option<Track>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.tracks.get(file.file_name()).cloned())
    }
}

/// Presenter answering from a script; an exhausted script cancels
#[derive(Default)]
pub struct ScriptedPresenter {
    choices: VecDeque<Option<Choice>>,
    texts: VecDeque<Option<String>>,
    pub choose_calls: Arc<AtomicUsize>,
    pub text_calls: Arc<AtomicUsize>,
    pub seen_options: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, choice: Option<Choice>) -> Self {
        self.choices.push_back(choice);
        self
    }

    pub fn type_text(mut self, text: &str) -> Self {
        self.texts.push_back(Some(text.to_string()));
        self
    }
}

#[async_trait]
impl DisambiguationPresenter for ScriptedPresenter {
    async fn choose_one(&mut self, _query: &str, options: &[ChoiceOption]) -> Option<Choice> {
        self.choose_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_options
            .lock()
            .unwrap()
            .push(options.iter().map(|o| o.to_string()).collect());
        self.choices.pop_front().flatten()
    }

    async fn prompt_free_text(&mut self, _suggestion: &str) -> Option<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.texts.pop_front().flatten()
    }
}
