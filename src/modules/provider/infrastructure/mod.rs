pub mod sidecar;

pub use sidecar::NfoReader;
