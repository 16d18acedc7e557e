/// Interactive disambiguation: presenter seam, serialized channel and the
/// per-call session cache
pub mod application;
pub mod domain;

pub use application::{MatchSession, PresenterChannel, PresenterHandle};
pub use domain::{auto_select, Choice, ChoiceOption, Decision, DisambiguationPresenter};
