use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::modules::derived::DerivedFilePropagator;
use crate::modules::disambiguation::{MatchSession, PresenterHandle};
use crate::modules::dispatch::ParallelDispatcher;
use crate::modules::grouping::{detect_series_name, Batch, BatchPlanner};
use crate::modules::matching::Matcher;
use crate::modules::media::{Candidate, MediaClass, MediaFile};
use crate::modules::orchestration::domain::{
    ClutterFilter, FileMatch, FilePass, MatchOptions, MatchOutcome, MatchReport, MetricSequences,
};
use crate::modules::provider::{EpisodeListProvider, SearchResult};
use crate::modules::similarity::{DateParser, SeasonEpisodeParser};
use crate::shared::config::MatchConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_info, log_warn};

/// Matches episode files against episode lists fetched per detected series
pub struct EpisodeListMatcher {
    provider: Arc<dyn EpisodeListProvider>,
    config: Arc<MatchConfig>,
    presenter: PresenterHandle,
    token: CancellationToken,
}

impl EpisodeListMatcher {
    pub fn new(provider: Arc<dyn EpisodeListProvider>, config: Arc<MatchConfig>) -> Self {
        Self {
            provider,
            config,
            presenter: PresenterHandle::detached(),
            token: CancellationToken::new(),
        }
    }

    pub fn with_presenter(mut self, presenter: PresenterHandle) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Matches `files` and reports matches plus leftovers on both sides
    ///
    /// With no files, asks for a series and returns its episodes as
    /// remaining candidates. Only cancellation is reported as an error.
    pub async fn match_files(
        &self,
        files: Vec<MediaFile>,
        options: &MatchOptions,
    ) -> AppResult<MatchReport> {
        let timer = TimedOperation::new("episode matching");
        let presenter = if options.strict {
            PresenterHandle::detached()
        } else {
            self.presenter.clone()
        };
        let session = MatchSession::new(self.config.clone(), presenter)?;

        let outcome = if files.is_empty() {
            self.fetch_only(options, &session).await?
        } else {
            let indexed = files.into_iter().enumerate().collect();
            self.run(indexed, options, &session).await?
        };

        let report = outcome.into_report();
        timer.finish_with_info(&format!(
            "{} matched, {} remaining",
            report.matches.len(),
            report.remaining_values.len()
        ));
        Ok(report)
    }

    pub(crate) async fn run(
        &self,
        files: Vec<(usize, MediaFile)>,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> AppResult<MatchOutcome> {
        let mut outcome = MatchOutcome::default();

        let mut accepted = Vec::new();
        let clutter = ClutterFilter::new(&self.config.clutter_pattern)?;
        let strict_parser = SeasonEpisodeParser::strict();
        for (index, file) in files {
            let skip = (options.autodetect && clutter.is_clutter(&file))
                || (options.strict && !has_identifier(&strict_parser, &file));
            if skip {
                log_debug!("Skipping {}", file);
                outcome.remaining.push((index, file));
            } else {
                accepted.push((index, file));
            }
        }

        let planner = BatchPlanner::new(self.config.clone());
        let (indices, plain): (Vec<usize>, Vec<MediaFile>) = accepted.into_iter().unzip();
        let batches: Vec<Batch> = planner
            .plan_series(&plain)
            .into_iter()
            .map(|mut batch| {
                for member in &mut batch.members {
                    member.0 = indices[member.0];
                }
                batch
            })
            .collect();

        log_info!(
            "Matching {} files in {} batches via {}",
            plain.len(),
            batches.len(),
            self.provider.name()
        );

        let dispatcher = ParallelDispatcher::new(self.config.preferred_concurrency, self.token.clone());
        let results = dispatcher
            .dispatch("episode", batches, |_, batch| self.match_batch(batch, options, session))
            .await?;

        for result in results {
            outcome.merge(result);
        }
        Ok(outcome)
    }

    async fn fetch_only(&self, options: &MatchOptions, session: &MatchSession) -> AppResult<MatchOutcome> {
        let Some(query) = session.prompt_query("").await else {
            return Ok(MatchOutcome::default());
        };

        let candidates = match self.fetch(&query, options, session).await {
            Ok(Some((_, candidates))) => candidates,
            Ok(None) => Vec::new(),
            Err(e) => {
                log_warn!("Fetching episodes for '{}' failed: {}", query, e);
                Vec::new()
            }
        };
        Ok(MatchOutcome {
            candidates,
            ..MatchOutcome::default()
        })
    }

    /// Never fails: provider and presenter problems leave the batch unmatched
    async fn match_batch(&self, batch: Batch, options: &MatchOptions, session: &MatchSession) -> MatchOutcome {
        let label = batch.query.clone();
        match self.try_match_batch(batch.clone(), options, session).await {
            Ok(outcome) => outcome,
            Err(e) => {
                LogContext::error_with_context(&e, &format!("Episode batch '{}'", label));
                MatchOutcome::unmatched(batch.members)
            }
        }
    }

    async fn try_match_batch(
        &self,
        batch: Batch,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> AppResult<MatchOutcome> {
        let mut fetched = match batch.has_query() {
            true => self.fetch(&batch.query, options, session).await?,
            false => None,
        };

        if fetched.is_none() && !options.strict {
            let suggestion = if batch.has_query() {
                batch.query.clone()
            } else {
                self.suggestion_for(&batch)
            };
            if let Some(query) = session.prompt_query(&suggestion).await {
                fetched = self.fetch(&query, options, session).await?;
            }
        }

        match fetched {
            Some((series, candidates)) => {
                log_debug!("Batch '{}' resolved to {}", batch.query, series);
                Ok(self.match_members(batch.members, candidates, options, session))
            }
            None if !options.strict && batch.len() > 1 => self.match_each(batch, options, session).await,
            None => Ok(MatchOutcome::unmatched(batch.members)),
        }
    }

    /// Last resort: identify every file of a failed batch on its own
    async fn match_each(
        &self,
        batch: Batch,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> AppResult<MatchOutcome> {
        log_info!("Identifying {} files of '{}' one by one", batch.len(), batch.query);
        let mut outcome = MatchOutcome::default();

        for (index, file) in batch.members {
            let query = detect_series_name(&file, self.config.min_query_length)
                .or_else(|| Some(file.base_name().to_string()));
            let query = match query {
                Some(q) => session.prompt_query(&q).await,
                None => None,
            };

            let fetched = match query {
                Some(q) => self.fetch(&q, options, session).await?,
                None => None,
            };
            match fetched {
                Some((_, candidates)) => {
                    outcome.merge(self.match_members(vec![(index, file)], candidates, options, session))
                }
                None => outcome.remaining.push((index, file)),
            }
        }
        Ok(outcome)
    }

    async fn fetch(
        &self,
        query: &str,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> AppResult<Option<(SearchResult, Vec<Candidate>)>> {
        let provider = self.provider.as_ref();
        let Some(series) = session.select_series(provider, query, &options.locale).await? else {
            return Ok(None);
        };
        let candidates = session
            .episode_list(provider, &series, options.sort_order, &options.locale)
            .await?;
        Ok(Some((series, candidates)))
    }

    /// Primary files first, then derived companions, then the other classes on their own
    fn match_members(
        &self,
        members: Vec<(usize, MediaFile)>,
        candidates: Vec<Candidate>,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> MatchOutcome {
        let passes = MetricSequences::episodes(session.similarity(), options.strict);
        let verification = MetricSequences::episode_verification(session.similarity());
        let mut outcome = MatchOutcome {
            candidates: candidates.clone(),
            ..MatchOutcome::default()
        };

        let (primary, secondary): (Vec<_>, Vec<_>) = members
            .into_iter()
            .partition(|(_, file)| file.media_class().is_primary());

        let mut committed = self.run_matcher(primary, &candidates, &passes, options.strict, &mut outcome);

        let anchors: Vec<FileMatch> = committed.iter().map(|(_, m)| m.clone()).collect();
        let (secondary_indices, secondary_files): (Vec<usize>, Vec<MediaFile>) = secondary.into_iter().unzip();
        let (derived, _) = DerivedFilePropagator::new(self.config.min_derived_prefix_len)
            .propagate(&anchors, secondary_files.clone());
        let mut orphans = Vec::new();
        for (index, file) in secondary_indices.into_iter().zip(secondary_files) {
            match derived.iter().find(|m| m.value.path() == file.path()) {
                Some(m) => committed.push((index, m.clone())),
                None => orphans.push((index, file)),
            }
        }

        for class in [MediaClass::Subtitle, MediaClass::Info, MediaClass::Other] {
            let (group, rest): (Vec<_>, Vec<_>) = orphans
                .into_iter()
                .partition(|(_, file)| file.media_class() == class);
            orphans = rest;
            let matched = self.run_matcher(group, &candidates, &passes, options.strict, &mut outcome);
            committed.extend(matched);
        }
        outcome.remaining.extend(orphans);

        for (index, m) in committed {
            if options.strict && !verification.accepts(&m.value, &m.candidate) {
                log_debug!("Verification rejected {} -> {}", m.value, m.candidate);
                outcome.remaining.push((index, m.value));
            } else {
                outcome.matches.push((index, m));
            }
        }
        outcome
    }

    /// Runs the matcher over one media class; leftovers go straight to the outcome
    fn run_matcher(
        &self,
        group: Vec<(usize, MediaFile)>,
        candidates: &[Candidate],
        passes: &[FilePass],
        strict: bool,
        outcome: &mut MatchOutcome,
    ) -> Vec<(usize, FileMatch)> {
        if group.is_empty() {
            return Vec::new();
        }

        let (indices, files): (Vec<usize>, Vec<MediaFile>) = group.into_iter().unzip();
        let mut matcher = Matcher::new(files.clone(), candidates.to_vec(), passes.to_vec(), strict);
        let matches = matcher.run();

        let mut taken = vec![false; files.len()];
        let mut index_of = |file: &MediaFile| {
            let position = (0..files.len()).find(|&p| !taken[p] && files[p] == *file)?;
            taken[position] = true;
            Some(indices[position])
        };

        let committed: Vec<(usize, FileMatch)> = matches
            .into_iter()
            .filter_map(|m| index_of(&m.value).map(|index| (index, m)))
            .collect();
        for file in matcher.remaining_values() {
            if let Some(index) = index_of(file) {
                outcome.remaining.push((index, file.clone()));
            }
        }
        committed
    }

    fn suggestion_for(&self, batch: &Batch) -> String {
        batch
            .members
            .iter()
            .take(self.config.query_prompt_file_limit)
            .map(|(_, file)| file.file_name())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn has_identifier(parser: &SeasonEpisodeParser, file: &MediaFile) -> bool {
    parser.find(file.base_name()).is_some() || DateParser.find(file.base_name()).is_some()
}
