pub mod roster;
pub mod upstream;

pub use roster::{RosterConfig, RosterSettings};
pub use upstream::UpstreamConfig;
