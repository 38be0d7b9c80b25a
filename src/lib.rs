//! satb-split: closed-score SATB voice separation
//!
//! Transforms a closed-score SATB choral score (two staves with two
//! voices per staff) into four independent single-staff scores, one per
//! vocal part, preserving dynamics, lyrics, slurs, ties, wedges, tempo
//! markings, and system layout.
//!
//! The pipeline is copy-and-remove: the input is deep-copied four times,
//! each copy is pruned to one voice and collapsed to a single labeled
//! staff, and a contextual unification pass redistributes the markings
//! that closed-score engraving attaches to only one voice.

pub mod convert;
pub mod error;
pub mod identify;
pub mod musicxml;
pub mod output;
pub mod processor;
pub mod remover;
pub mod score;
pub mod simplifier;
pub mod unifier;

use std::path::{Path, PathBuf};

pub use error::SplitError;
pub use identify::{VoiceLocation, VoiceMapping, VoiceName};
pub use processor::{split_satb_score, ProcessingOptions};
pub use unifier::VoiceScores;

/// Split a score file into four voice part files.
///
/// Accepts MusicXML directly or a zipped MuseScore container, which is
/// first converted through the external notation tool. Output goes to
/// `output_dir`, or `<input stem>_voices` next to the input when none is
/// given. Returns the written paths in voice order.
pub fn split_satb_file(
    input: &Path,
    output_dir: Option<&Path>,
    options: &ProcessingOptions,
) -> Result<Vec<PathBuf>, SplitError> {
    let base_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SplitError::InvalidScore(format!("bad input path: {}", input.display())))?
        .to_string();

    let is_mscz = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("mscz"))
        .unwrap_or(false);

    // The intermediate MusicXML from a container conversion is temporary;
    // its name must never reach output metadata, which is why the base
    // name above comes from the original input path.
    let (xml_path, intermediate) = if is_mscz {
        let converted = convert::convert_mscz_to_musicxml(input)?;
        (converted.clone(), Some(converted))
    } else {
        (input.to_path_buf(), None)
    };

    let result = (|| {
        let xml = std::fs::read_to_string(&xml_path)?;
        let score = musicxml::parse_musicxml(&xml)?;
        let scores = split_satb_score(&score, &base_name, options)?;

        let default_dir = input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}_voices", base_name));
        let dir = output_dir.unwrap_or(&default_dir);
        output::save_voice_scores(&scores, dir, &base_name)
    })();

    if let Some(path) = intermediate {
        if let Err(e) = std::fs::remove_file(&path) {
            log::warn!("could not remove intermediate {}: {}", path.display(), e);
        }
    }

    result
}
