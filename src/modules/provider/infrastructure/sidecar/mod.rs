pub mod nfo_reader;

pub use nfo_reader::NfoReader;
