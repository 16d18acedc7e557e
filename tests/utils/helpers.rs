/// Test helper functions
use mediamatch::modules::disambiguation::{DisambiguationPresenter, PresenterChannel, PresenterHandle};
use mediamatch::modules::orchestration::MatchReport;
use mediamatch::shared::config::MatchConfig;
use std::sync::Arc;

pub fn test_config() -> Arc<MatchConfig> {
    mediamatch::init_logger();
    Arc::new(MatchConfig::minimal())
}

/// Runs the presenter on its own task and returns the handle workers post to
pub fn spawn_presenter<P: DisambiguationPresenter + 'static>(presenter: P) -> PresenterHandle {
    let (handle, channel) = PresenterChannel::new(8);
    channel.spawn(presenter);
    handle
}

/// `(file name, candidate)` pairs of a report, in report order
pub fn pairs(report: &MatchReport) -> Vec<(String, String)> {
    report
        .matches
        .iter()
        .map(|m| (m.value.file_name().to_string(), m.candidate.to_string()))
        .collect()
}

pub fn remaining_names(report: &MatchReport) -> Vec<String> {
    report
        .remaining_values
        .iter()
        .map(|f| f.file_name().to_string())
        .collect()
}
