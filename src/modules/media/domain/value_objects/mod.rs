pub mod media_class;

pub use media_class::MediaClass;
