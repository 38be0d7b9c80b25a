//! Error types for the SATB splitting pipeline
//!
//! Every error is fatal: the pipeline terminates without producing partial
//! output. Diagnostics name the stage that fired and, where applicable, the
//! offending measure number with an expected-vs-actual description.

use thiserror::Error;

/// Top-level error type for all pipeline stages
#[derive(Debug, Error)]
pub enum SplitError {
    /// Input score does not conform to the expected closed-score shape
    #[error("invalid score: {0}")]
    InvalidScore(String),

    /// Voice identification could not produce a complete SATB mapping
    #[error("voice detection failed: {0}")]
    VoiceDetection(String),

    /// Voice removal hit an unexpected structural condition
    #[error("voice removal failed in measure {measure}: {detail}")]
    VoiceRemoval { measure: u32, detail: String },

    /// Staff simplification hit an unexpected structural condition
    #[error("staff simplification failed: {0}")]
    Simplification(String),

    /// A unification policy hit a contract violation
    #[error("unification failed: {0}")]
    Unification(String),

    /// Malformed or unsupported MusicXML input
    #[error("MusicXML parse error: {0}")]
    Parse(String),

    /// The external notation tool failed to convert a zipped container
    #[error("MuseScore conversion failed: {0}")]
    Conversion(String),

    /// File read/write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for unforeseen structural problems
    #[error("processing failed: {0}")]
    Processing(String),
}
