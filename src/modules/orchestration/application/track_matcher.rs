use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::modules::disambiguation::MatchSession;
use crate::modules::dispatch::ParallelDispatcher;
use crate::modules::matching::Match;
use crate::modules::media::{Candidate, MediaClass, MediaFile};
use crate::modules::orchestration::domain::{MatchOptions, MatchOutcome, MatchReport, MetricSequences};
use crate::modules::provider::MusicIdentificationService;
use crate::shared::config::MatchConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::TimedOperation;
use crate::{log_debug, log_warn};

/// Identifies audio files by fingerprint, one lookup per file
pub struct TrackMatcher {
    service: Arc<dyn MusicIdentificationService>,
    config: Arc<MatchConfig>,
    token: CancellationToken,
}

impl TrackMatcher {
    pub fn new(service: Arc<dyn MusicIdentificationService>, config: Arc<MatchConfig>) -> Self {
        Self {
            service,
            config,
            token: CancellationToken::new(),
        }
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
        let timer = TimedOperation::new("track matching");
        let session = MatchSession::non_interactive(self.config.clone())?;

        let indexed = files.into_iter().enumerate().collect();
        let report = self.run(indexed, options, &session).await?.into_report();
        timer.finish_with_info(&format!("{} matched", report.matches.len()));
        Ok(report)
    }

    pub(crate) async fn run(
        &self,
        files: Vec<(usize, MediaFile)>,
        options: &MatchOptions,
        session: &MatchSession,
    ) -> AppResult<MatchOutcome> {
        let verification = MetricSequences::track_verification(session.similarity());
        let dispatcher = ParallelDispatcher::new(self.config.preferred_concurrency, self.token.clone());

        let results = dispatcher
            .dispatch("track", files, |_, (index, file)| {
                let verification = verification.clone();
                async move {
                    if file.media_class() != MediaClass::Audio {
                        return MatchOutcome::unmatched(vec![(index, file)]);
                    }

                    let track = match self.service.lookup(&file).await {
                        Ok(track) => track,
                        Err(e) => {
                            log_warn!("Fingerprint lookup of {} failed: {}", file, e);
                            None
                        }
                    };
                    let Some(track) = track else {
                        return MatchOutcome::unmatched(vec![(index, file)]);
                    };

                    let candidate = Candidate::track(track);
                    if options.strict && !verification.accepts(&file, &candidate) {
                        log_debug!("Verification rejected {} -> {}", file, candidate);
                        return MatchOutcome {
                            remaining: vec![(index, file)],
                            candidates: vec![candidate],
                            ..MatchOutcome::default()
                        };
                    }

                    MatchOutcome {
                        candidates: vec![candidate.clone()],
                        matches: vec![(index, Match::new(file, candidate))],
                        ..MatchOutcome::default()
                    }
                }
            })
            .await?;

        let mut outcome = MatchOutcome::default();
        for result in results {
            outcome.merge(result);
        }
        Ok(outcome)
    }
}
