use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::modules::derived::DerivedFilePropagator;
use crate::modules::disambiguation::{
    auto_select, Choice, ChoiceOption, Decision, MatchSession, PresenterHandle,
};
use crate::modules::dispatch::ParallelDispatcher;
use crate::modules::grouping::{detect_movie_query, Batch, BatchPlanner};
use crate::modules::matching::Match;
use crate::modules::media::{Candidate, MediaFile, Movie};
use crate::modules::orchestration::domain::{
    ClutterFilter, FileMatch, MatchOptions, MatchOutcome, MatchReport, MetricSequences,
};
use crate::modules::provider::{MovieIdentificationService, NfoReader};
use crate::modules::similarity::{split_name_and_year, NameNormalizer, NameWithYear};
use crate::shared::config::MatchConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_info, log_warn};

/// Identifies movie files one folder-and-name batch at a time
///
/// Each file goes through, in order: hash lookup, sidecar id lookup, then a
/// name search resolved by perfect name prefix, a single probable result or
/// the user's choice. In lenient mode a search without results is retried
/// with a query typed by the user.
pub struct MovieMatcher {
    service: Arc<dyn MovieIdentificationService>,
    config: Arc<MatchConfig>,
    presenter: PresenterHandle,
    token: CancellationToken,
    sidecars: NfoReader,
}

impl MovieMatcher {
    pub fn new(service: Arc<dyn MovieIdentificationService>, config: Arc<MatchConfig>) -> Self {
        Self {
            service,
            config,
            presenter: PresenterHandle::detached(),
            token: CancellationToken::new(),
            sidecars: NfoReader::new(),
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

    pub async fn match_files(
        &self,
        files: Vec<MediaFile>,
        options: &MatchOptions,
    ) -> AppResult<MatchReport> {
        let timer = TimedOperation::new("movie matching");
        let presenter = if options.strict {
            PresenterHandle::detached()
        } else {
            self.presenter.clone()
        };
        let session = MatchSession::new(self.config.clone(), presenter)?;

        let indexed = files.into_iter().enumerate().collect();
        let report = self.run(indexed, options, &session).await?.into_report();
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
        let clutter = ClutterFilter::new(&self.config.clutter_pattern)?;

        let (files, cluttered): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|(_, file)| !(options.autodetect && clutter.is_clutter(file)));
        outcome.remaining.extend(cluttered);

        let (primary, secondary): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|(_, file)| file.media_class().is_primary());

        let primary_outcome = self.identify(primary, options, session).await?;
        let anchors: Vec<FileMatch> = primary_outcome.matches.iter().map(|(_, m)| m.clone()).collect();
        outcome.merge(primary_outcome);

        let propagator = DerivedFilePropagator::new(self.config.min_derived_prefix_len);
        let mut orphans = Vec::new();
        for (index, file) in secondary {
            let (derived, _) = propagator.propagate(&anchors, vec![file.clone()]);
            match derived.into_iter().next() {
                Some(m) => outcome.matches.push((index, m)),
                None => orphans.push((index, file)),
            }
        }
        outcome.merge(self.identify(orphans, options, session).await?);

        Ok(outcome)
    }

    async fn identify(
        &self,
        files: Vec<(usize, MediaFile)>,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> AppResult<MatchOutcome> {
        if files.is_empty() {
            return Ok(MatchOutcome::default());
        }

        let planner = BatchPlanner::new(self.config.clone());
        let (indices, plain): (Vec<usize>, Vec<MediaFile>) = files.into_iter().unzip();
        let batches: Vec<Batch> = planner
            .plan_movies(&plain)
            .into_iter()
            .map(|mut batch| {
                for member in &mut batch.members {
                    member.0 = indices[member.0];
                }
                batch
            })
            .collect();

        let dispatcher = ParallelDispatcher::new(self.config.preferred_concurrency, self.token.clone());
        let results = dispatcher
            .dispatch("movie", batches, |_, batch| self.match_batch(batch, options, session))
            .await?;

        let mut outcome = MatchOutcome::default();
        for result in results {
            outcome.merge(result);
        }
        Ok(outcome)
    }

    async fn match_batch(&self, batch: Batch, options: &MatchOptions, session: &MatchSession) -> MatchOutcome {
        let label = batch.query.clone();
        match self.try_match_batch(batch.clone(), options, session).await {
            Ok(outcome) => outcome,
            Err(e) => {
                LogContext::error_with_context(&e, &format!("Movie batch '{}'", label));
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
        let mut resolved: Vec<(usize, MediaFile, Option<Arc<Movie>>)> = Vec::new();
        let mut by_query: Option<Option<Arc<Movie>>> = None;

        for (index, file) in batch.members {
            let mut movie = self.exact_lookup(&file, options).await?;
            if movie.is_none() {
                if by_query.is_none() {
                    let query = detect_movie_query(&file, self.config.min_query_length);
                    by_query = Some(self.lookup_by_query(&query, &file, options, session).await?);
                }
                movie = by_query.clone().flatten();
            }
            resolved.push((index, file, movie));
        }

        let verification = MetricSequences::movie_verification(session.similarity());
        let mut outcome = MatchOutcome::default();
        for (index, m) in assign_parts(&mut resolved) {
            if options.strict && !verification.accepts(&m.value, &m.candidate) {
                log_debug!("Verification rejected {} -> {}", m.value, m.candidate);
                outcome.remaining.push((index, m.value));
            } else {
                outcome.candidates.push(m.candidate.clone());
                outcome.matches.push((index, m));
            }
        }
        outcome
            .remaining
            .extend(resolved.into_iter().map(|(index, file, _)| (index, file)));
        Ok(outcome)
    }

    /// Hash lookup, then the IMDb id referenced by a sidecar
    async fn exact_lookup(&self, file: &MediaFile, options: &MatchOptions) -> AppResult<Option<Arc<Movie>>> {
        if let Some(movie) = self.service.lookup_by_hash(file, &options.locale).await? {
            log_debug!("Hash lookup identified {} as {}", file, movie);
            return Ok(Some(Arc::new(movie)));
        }

        let imdb_id = match self.sidecars.imdb_id_for(file).await {
            Ok(id) => id,
            Err(e) => {
                log_warn!("Reading sidecars of {} failed: {}", file, e);
                None
            }
        };
        match imdb_id {
            Some(id) => Ok(self
                .service
                .lookup_by_id(id, &options.locale)
                .await?
                .map(Arc::new)),
            None => Ok(None),
        }
    }

    async fn lookup_by_query(
        &self,
        query: &NameWithYear,
        file: &MediaFile,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> AppResult<Option<Arc<Movie>>> {
        if query.name.chars().count() < self.config.min_query_length {
            return Ok(None);
        }

        let memo_key = match query.year {
            Some(year) => format!("{} {}", query.name, year),
            None => query.name.clone(),
        };
        let _guard = session.provider_lock(self.service.name()).await;
        if let Some(remembered) = session.remembered_movie(&memo_key).await {
            return Ok(remembered);
        }

        let mut found = self.search(query, options).await?;
        let mut chosen_for = query.name.clone();

        if found.is_empty() && !options.strict {
            if let Some(input) = session.prompt_query(&query.name).await {
                let typed = split_name_and_year(&input);
                found = self.search(&typed, options).await?;
                chosen_for = typed.name;
            }
        }

        let choice = self.choose(&chosen_for, file, found, options, session).await;
        session.remember_movie(&memo_key, choice.clone()).await;
        Ok(choice)
    }

    async fn search(&self, query: &NameWithYear, options: &MatchOptions) -> AppResult<Vec<Movie>> {
        LogContext::search_operation(&query.name, Some(self.service.name()), None);
        let found = self
            .service
            .search_movie(&query.name, query.year, &options.locale)
            .await?;
        LogContext::search_operation(&query.name, Some(self.service.name()), Some(found.len()));
        Ok(found)
    }

    async fn choose(
        &self,
        query: &str,
        file: &MediaFile,
        found: Vec<Movie>,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> Option<Arc<Movie>> {
        if found.is_empty() {
            return None;
        }
        let found: Vec<Arc<Movie>> = found.into_iter().map(Arc::new).collect();

        if let Some(movie) = perfect_prefix_match(file, &found) {
            log_debug!("Perfect name match {} for {}", movie, file);
            return Some(movie);
        }

        let similarity = session.similarity();
        if let Some(index) = auto_select(
            query,
            &found,
            |movie| movie.effective_names(),
            similarity.as_ref(),
            self.config.probable_match_threshold,
        ) {
            return found.get(index).cloned();
        }

        if options.strict {
            return None;
        }

        match session.repeat_decision().await {
            Some(Decision::Select(_)) => return found.first().cloned(),
            Some(Decision::Ignore) => return None,
            None => {}
        }

        let choice_options = found.iter().cloned().map(ChoiceOption::Movie).collect();
        match session.presenter().choose_one(query, choice_options).await {
            Some(Choice { decision, repeat }) => {
                if repeat {
                    session.set_repeat_decision(decision).await;
                }
                match decision {
                    Decision::Select(index) => found.get(index).cloned(),
                    Decision::Ignore => None,
                }
            }
            None => {
                log_info!("No movie chosen for '{}'", query);
                None
            }
        }
    }
}

/// The only result whose name, and year if known, starts the file or folder name
fn perfect_prefix_match(file: &MediaFile, found: &[Arc<Movie>]) -> Option<Arc<Movie>> {
    let normalizer = NameNormalizer::default_pipeline();
    let targets: Vec<String> = std::iter::once(file.base_name())
        .chain(file.folder_name())
        .map(|name| normalizer.normalize(name))
        .collect();

    let mut perfect = found.iter().filter(|movie| {
        movie.effective_names().any(|name| {
            let name = normalizer.normalize(name);
            let with_year = movie.year.map(|year| format!("{} {}", name, year));
            targets.iter().any(|target| {
                with_year.as_deref().map_or(false, |prefix| starts_with_words(target, prefix))
                    || (movie.year.is_none() && starts_with_words(target, &name))
            })
        })
    });

    match (perfect.next(), perfect.next()) {
        (Some(movie), None) => Some(movie.clone()),
        _ => None,
    }
}

fn starts_with_words(text: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && text
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with(' '))
}

/// Builds matches, splitting a movie into parts when several files of one
/// extension resolve to it. Resolved entries are drained, unresolved ones stay.
fn assign_parts(resolved: &mut Vec<(usize, MediaFile, Option<Arc<Movie>>)>) -> Vec<(usize, FileMatch)> {
    let mut groups: Vec<(Arc<Movie>, Option<String>, Vec<(usize, MediaFile)>)> = Vec::new();
    let mut unresolved = Vec::new();

    for (index, file, movie) in resolved.drain(..) {
        let Some(movie) = movie else {
            unresolved.push((index, file, None));
            continue;
        };
        let extension = file.extension();
        match groups
            .iter_mut()
            .find(|(m, ext, _)| m.same_title(&movie) && *ext == extension)
        {
            Some((_, _, members)) => members.push((index, file)),
            None => groups.push((movie, extension, vec![(index, file)])),
        }
    }
    *resolved = unresolved;

    let mut shared: HashMap<usize, Candidate> = HashMap::new();
    let mut matches = Vec::new();
    for (movie, _, mut members) in groups {
        if members.len() == 1 {
            let candidate = shared
                .entry(Arc::as_ptr(&movie) as usize)
                .or_insert_with(|| Candidate::Movie(movie.clone()))
                .clone();
            let (index, file) = members.remove(0);
            matches.push((index, Match::new(file, candidate)));
            continue;
        }

        members.sort_by(|(_, a), (_, b)| a.path().cmp(b.path()));
        let count = members.len() as u32;
        for (part, (index, file)) in members.into_iter().enumerate() {
            let candidate = Candidate::movie(movie.as_part(part as u32 + 1, count));
            matches.push((index, Match::new(file, candidate)));
        }
    }
    matches
}
