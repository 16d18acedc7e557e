use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::modules::disambiguation::application::presenter_channel::PresenterHandle;
use crate::modules::disambiguation::domain::{auto_select, Choice, ChoiceOption, Decision};
use crate::modules::media::{Candidate, Movie};
use crate::modules::provider::{EpisodeListProvider, SearchResult, SortOrder};
use crate::modules::similarity::{HybridSimilarity, NameNormalizer, NameSimilarity};
use crate::shared::config::MatchConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::LogContext;
use crate::{log_debug, log_info};

/// Remembered outcome of a query; `None` records that the user declined
type Remembered<T> = Option<T>;

#[derive(Default)]
struct SessionCache {
    series_selections: HashMap<String, Remembered<SearchResult>>,
    movie_selections: HashMap<String, Remembered<Arc<Movie>>>,
    inputs: HashMap<String, String>,
    record_lists: HashMap<String, Vec<Candidate>>,
    repeat: Option<Decision>,
}

/// State shared by every worker of one top-level matching call
///
/// Holds the selection and input memory, fetched episode lists and the
/// per-provider lock that keeps fetches and prompts from overlapping.
/// Dropped when the call returns.
pub struct MatchSession {
    config: Arc<MatchConfig>,
    presenter: PresenterHandle,
    similarity: Arc<dyn NameSimilarity>,
    keys: NameNormalizer,
    cache: Mutex<SessionCache>,
    provider_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    input_lock: Mutex<()>,
}

impl MatchSession {
    pub fn new(config: Arc<MatchConfig>, presenter: PresenterHandle) -> AppResult<Self> {
        let similarity = Arc::new(HybridSimilarity::from_config(&config)?);
        Ok(Self {
            config,
            presenter,
            similarity,
            keys: NameNormalizer::key_pipeline(),
            cache: Mutex::new(SessionCache::default()),
            provider_locks: Mutex::new(HashMap::new()),
            input_lock: Mutex::new(()),
        })
    }

    /// A session that never prompts
    pub fn non_interactive(config: Arc<MatchConfig>) -> AppResult<Self> {
        Self::new(config, PresenterHandle::detached())
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn presenter(&self) -> &PresenterHandle {
        &self.presenter
    }

    pub fn similarity(&self) -> Arc<dyn NameSimilarity> {
        self.similarity.clone()
    }

    /// Exclusive access to a provider for fetching and prompting
    pub async fn provider_lock(&self, provider: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.provider_locks.lock().await;
            locks
                .entry(provider.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    fn key(&self, scope: &str, query: &str) -> String {
        format!("{}:{}", scope, self.keys.normalize(query))
    }

    /// Resolves a series query to one search result
    ///
    /// Memory is consulted first. Otherwise the provider is searched, obvious
    /// results are accepted and the rest go to the presenter. The outcome,
    /// including a declined prompt, is remembered for the rest of the call.
    pub async fn select_series(
        &self,
        provider: &dyn EpisodeListProvider,
        query: &str,
        locale: &str,
    ) -> AppResult<Option<SearchResult>> {
        let key = self.key(provider.name(), query);
        let _guard = self.provider_lock(provider.name()).await;

        if let Some(remembered) = self.cache.lock().await.series_selections.get(&key) {
            log_debug!("Selection memory hit for '{}'", query);
            return Ok(remembered.clone());
        }

        LogContext::search_operation(query, Some(provider.name()), None);
        let results = provider.search(query, locale).await?;
        LogContext::search_operation(query, Some(provider.name()), Some(results.len()));

        let selection = match auto_select(
            query,
            &results,
            SearchResult::effective_names,
            self.similarity.as_ref(),
            self.config.probable_match_threshold,
        ) {
            Some(index) => results.get(index).cloned(),
            None if results.is_empty() => None,
            None => {
                let options = results.iter().cloned().map(ChoiceOption::Series).collect();
                match self.presenter.choose_one(query, options).await {
                    Some(Choice {
                        decision: Decision::Select(index),
                        ..
                    }) => results.get(index).cloned(),
                    _ => None,
                }
            }
        };

        self.cache
            .lock()
            .await
            .series_selections
            .insert(key, selection.clone());
        Ok(selection)
    }

    /// Fetches the episode list of a series once per call
    ///
    /// Repeated fetches hand out the same shared records.
    pub async fn episode_list(
        &self,
        provider: &dyn EpisodeListProvider,
        series: &SearchResult,
        order: SortOrder,
        locale: &str,
    ) -> AppResult<Vec<Candidate>> {
        let key = format!("{}:{}:{}:{}", provider.name(), series.id, order, locale);
        let _guard = self.provider_lock(provider.name()).await;

        if let Some(records) = self.cache.lock().await.record_lists.get(&key) {
            return Ok(records.clone());
        }

        let timer = std::time::Instant::now();
        let episodes = provider.get_record_list(series, order, locale).await?;
        LogContext::api_call(
            provider.name(),
            &format!("episodes/{}", series.id),
            "ok",
            Some(timer.elapsed().as_millis() as u64),
        );

        let records: Vec<Candidate> = episodes.into_iter().map(Candidate::episode).collect();
        self.cache
            .lock()
            .await
            .record_lists
            .insert(key, records.clone());
        Ok(records)
    }

    /// Asks the user for a query, memoized by suggestion
    pub async fn prompt_query(&self, suggestion: &str) -> Option<String> {
        let _guard = self.input_lock.lock().await;
        let key = self.key("input", suggestion);

        if let Some(input) = self.cache.lock().await.inputs.get(&key) {
            return Some(input.clone());
        }

        let input = self
            .presenter
            .prompt_free_text(suggestion)
            .await
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())?;

        log_info!("Query '{}' entered for '{}'", input, suggestion);
        self.cache.lock().await.inputs.insert(key, input.clone());
        Some(input)
    }

    pub async fn remembered_movie(&self, query: &str) -> Option<Remembered<Arc<Movie>>> {
        let key = self.key("movie", query);
        self.cache.lock().await.movie_selections.get(&key).cloned()
    }

    pub async fn remember_movie(&self, query: &str, movie: Remembered<Arc<Movie>>) {
        let key = self.key("movie", query);
        self.cache.lock().await.movie_selections.insert(key, movie);
    }

    pub async fn repeat_decision(&self) -> Option<Decision> {
        self.cache.lock().await.repeat
    }

    pub async fn set_repeat_decision(&self, decision: Decision) {
        self.cache.lock().await.repeat = Some(decision);
    }
}
