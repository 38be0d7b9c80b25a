//! Output file writing
//!
//! Serializes the four derived scores to
//! `<basename>-<Voice>.musicxml` in the caller's output directory,
//! creating the directory when needed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SplitError;
use crate::identify::VoiceName;
use crate::musicxml::write_musicxml;
use crate::unifier::VoiceScores;

/// Write all four voice scores. Returns the created paths in voice order.
pub fn save_voice_scores(
    scores: &VoiceScores,
    output_dir: &Path,
    base_name: &str,
) -> Result<Vec<PathBuf>, SplitError> {
    fs::create_dir_all(output_dir)?;

    let mut created = Vec::with_capacity(4);
    for voice in VoiceName::ALL {
        let score = scores.get(&voice).ok_or_else(|| {
            SplitError::Processing(format!("missing derived score for {}", voice))
        })?;
        let xml = write_musicxml(score)?;
        let path = output_dir.join(format!("{}-{}.musicxml", base_name, voice));
        fs::write(&path, xml)?;
        log::info!("wrote {}", path.display());
        created.push(path);
    }
    Ok(created)
}
