pub mod auto_accept;
pub mod presenter;

pub use auto_accept::auto_select;
pub use presenter::{Choice, ChoiceOption, Decision, DisambiguationPresenter};
