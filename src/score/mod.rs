//! Musical object model
//!
//! In-memory representation of a score: parts, measures, voices, timed
//! events, measure-level directions, and the score-global spanner
//! collection. The pipeline stages operate exclusively on these types;
//! MusicXML never leaks past the `musicxml` module boundary.

pub mod model;
pub mod spanner;

pub use model::*;
pub use spanner::*;
