pub mod match_session;
pub mod presenter_channel;

pub use match_session::MatchSession;
pub use presenter_channel::{PresenterChannel, PresenterHandle};
