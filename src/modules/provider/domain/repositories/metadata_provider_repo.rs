use async_trait::async_trait;

use crate::modules::media::{Episode, MediaFile, Movie, Track};
use crate::modules::provider::domain::value_objects::{SearchResult, SortOrder};
use crate::shared::errors::AppResult;

/// Remote source of episode lists for a series
///
/// Errors are scoped to the batch that issued the call.
#[async_trait]
pub trait EpisodeListProvider: Send + Sync {
    /// Provider name, also the scope of the fetch lock and the selection cache
    fn name(&self) -> &str;

    /// Search series by name
    async fn search(&self, query: &str, locale: &str) -> AppResult<Vec<SearchResult>>;

    /// Fetch every episode of a series
    async fn get_record_list(
        &self,
        series: &SearchResult,
        order: SortOrder,
        locale: &str,
    ) -> AppResult<Vec<Episode>>;
}

/// Remote movie database
#[async_trait]
pub trait MovieIdentificationService: Send + Sync {
    fn name(&self) -> &str;

    /// Search movies by name and optional year
    async fn search_movie(
        &self,
        query: &str,
        year: Option<i32>,
        locale: &str,
    ) -> AppResult<Vec<Movie>>;

    /// Look up a movie by its IMDb number
    async fn lookup_by_id(&self, imdb_id: u32, locale: &str) -> AppResult<Option<Movie>>;

    /// Exact identification by file hash (optional - not all services can hash files)
    async fn lookup_by_hash(&self, _file: &MediaFile, _locale: &str) -> AppResult<Option<Movie>> {
        Ok(None)
    }
}

/// Audio fingerprint lookup
#[async_trait]
pub trait MusicIdentificationService: Send + Sync {
    fn name(&self) -> &str;

    async fn lookup(&self, file: &MediaFile) -> AppResult<Option<Track>>;
}
