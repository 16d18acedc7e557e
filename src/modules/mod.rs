pub mod derived;
pub mod disambiguation;
pub mod dispatch;
pub mod grouping;
pub mod matching;
pub mod media;
pub mod orchestration;
pub mod provider;
pub mod similarity;
