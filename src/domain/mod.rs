pub mod matching;
pub mod models;

pub use matching::MatchPolicy;
