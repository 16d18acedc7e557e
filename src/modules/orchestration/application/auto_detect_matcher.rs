use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::modules::derived::DerivedFilePropagator;
use crate::modules::disambiguation::{MatchSession, PresenterHandle};
use crate::modules::media::{MediaClass, MediaFile};
use crate::modules::orchestration::application::{EpisodeListMatcher, MovieMatcher, TrackMatcher};
use crate::modules::orchestration::domain::{
    ClutterFilter, FileMatch, MatchOptions, MatchOutcome, MatchReport,
};
use crate::modules::provider::{
    EpisodeListProvider, MovieIdentificationService, MusicIdentificationService,
};
use crate::modules::similarity::{DateParser, SeasonEpisodeParser};
use crate::shared::config::MatchConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::TimedOperation;
use crate::log_info;

/// Where a file is sent by auto-detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Episode,
    Movie,
    Track,
    /// Sidecars and other companions, matched only through their anchor
    Companion,
}

/// Sends each file to the episode, movie or track matcher and merges the results
pub struct AutoDetectMatcher {
    config: Arc<MatchConfig>,
    episodes: Option<Arc<dyn EpisodeListProvider>>,
    movies: Option<Arc<dyn MovieIdentificationService>>,
    music: Option<Arc<dyn MusicIdentificationService>>,
    presenter: PresenterHandle,
    token: CancellationToken,
}

impl AutoDetectMatcher {
    pub fn new(config: Arc<MatchConfig>) -> Self {
        Self {
            config,
            episodes: None,
            movies: None,
            music: None,
            presenter: PresenterHandle::detached(),
            token: CancellationToken::new(),
        }
    }

    pub fn with_episode_provider(mut self, provider: Arc<dyn EpisodeListProvider>) -> Self {
        self.episodes = Some(provider);
        self
    }

    pub fn with_movie_service(mut self, service: Arc<dyn MovieIdentificationService>) -> Self {
        self.movies = Some(service);
        self
    }

    pub fn with_music_service(mut self, service: Arc<dyn MusicIdentificationService>) -> Self {
        self.music = Some(service);
        self
    }

    pub fn with_presenter(mut self, presenter: PresenterHandle) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Decides the route of every file, in input order
    pub fn routes(&self, files: &[MediaFile]) -> Vec<Route> {
        let parser = SeasonEpisodeParser::strict();
        let has_identifier = |file: &MediaFile| {
            parser.find(file.base_name()).is_some() || DateParser.find(file.base_name()).is_some()
        };

        let episode_folders: HashSet<PathBuf> = files
            .iter()
            .filter(|file| file.media_class() == MediaClass::Video && has_identifier(file))
            .filter_map(|file| file.parent_folder().map(PathBuf::from))
            .collect();

        files
            .iter()
            .map(|file| match file.media_class() {
                MediaClass::Audio => Route::Track,
                MediaClass::Video | MediaClass::Subtitle => {
                    let in_episode_folder = file
                        .parent_folder()
                        .map_or(false, |folder| episode_folders.contains(folder));
                    if has_identifier(file) || in_episode_folder {
                        Route::Episode
                    } else {
                        Route::Movie
                    }
                }
                MediaClass::Info | MediaClass::Other => Route::Companion,
            })
            .collect()
    }

    pub async fn match_files(
        &self,
        files: Vec<MediaFile>,
        options: &MatchOptions,
    ) -> AppResult<MatchReport> {
        let timer = TimedOperation::new("auto-detect matching");
        let options = options.clone().with_autodetect(true);
        let presenter = if options.strict {
            PresenterHandle::detached()
        } else {
            self.presenter.clone()
        };
        let session = MatchSession::new(self.config.clone(), presenter.clone())?;

        let mut outcome = MatchOutcome::default();
        let clutter = ClutterFilter::new(&self.config.clutter_pattern)?;
        let routes = self.routes(&files);

        let mut episode_files = Vec::new();
        let mut movie_files = Vec::new();
        let mut track_files = Vec::new();
        let mut companions = Vec::new();
        for (index, (file, route)) in files.into_iter().zip(routes).enumerate() {
            if clutter.is_clutter(&file) {
                outcome.remaining.push((index, file));
                continue;
            }
            match route {
                Route::Episode if self.episodes.is_some() => episode_files.push((index, file)),
                Route::Movie if self.movies.is_some() => movie_files.push((index, file)),
                Route::Track if self.music.is_some() => track_files.push((index, file)),
                Route::Companion => companions.push((index, file)),
                _ => outcome.remaining.push((index, file)),
            }
        }

        log_info!(
            "Auto-detected {} episode, {} movie and {} track files",
            episode_files.len(),
            movie_files.len(),
            track_files.len()
        );

        let episode_run = async {
            match &self.episodes {
                Some(provider) if !episode_files.is_empty() => {
                    EpisodeListMatcher::new(provider.clone(), self.config.clone())
                        .with_presenter(presenter.clone())
                        .with_cancellation(self.token.clone())
                        .run(episode_files, &options, &session)
                        .await
                }
                _ => Ok(MatchOutcome::unmatched(episode_files)),
            }
        };
        let movie_run = async {
            match &self.movies {
                Some(service) if !movie_files.is_empty() => {
                    MovieMatcher::new(service.clone(), self.config.clone())
                        .with_presenter(presenter.clone())
                        .with_cancellation(self.token.clone())
                        .run(movie_files, &options, &session)
                        .await
                }
                _ => Ok(MatchOutcome::unmatched(movie_files)),
            }
        };
        let track_run = async {
            match &self.music {
                Some(service) if !track_files.is_empty() => {
                    TrackMatcher::new(service.clone(), self.config.clone())
                        .with_cancellation(self.token.clone())
                        .run(track_files, &options, &session)
                        .await
                }
                _ => Ok(MatchOutcome::unmatched(track_files)),
            }
        };

        let (episodes, movies, tracks) = tokio::try_join!(episode_run, movie_run, track_run)?;
        outcome.merge(episodes);
        outcome.merge(movies);
        outcome.merge(tracks);

        let anchors: Vec<FileMatch> = outcome.matches.iter().map(|(_, m)| m.clone()).collect();
        let propagator = DerivedFilePropagator::new(self.config.min_derived_prefix_len);
        for (index, file) in companions {
            let (derived, _) = propagator.propagate(&anchors, vec![file.clone()]);
            match derived.into_iter().next() {
                Some(m) => outcome.matches.push((index, m)),
                None => outcome.remaining.push((index, file)),
            }
        }

        let report = outcome.into_report();
        timer.finish_with_info(&format!(
            "{} matched, {} remaining",
            report.matches.len(),
            report.remaining_values.len()
        ));
        Ok(report)
    }
}
