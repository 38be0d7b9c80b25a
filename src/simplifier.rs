//! Staff simplification: collapse a pruned score to one labeled staff
//!
//! After voice removal each derived score still carries both parts of the
//! closed score (one holding the kept voice, the other holding only
//! backfill rests). Simplification selects the part containing the kept
//! voice, discards the rest, assigns the engraving-convention clef, and
//! stamps part name and work/movement titles.

use crate::error::SplitError;
use crate::identify::{VoiceLocation, VoiceName};
use crate::score::Score;

/// Collapse the score to a single part for `voice` and set its metadata.
///
/// `base_title` is the fallback work title (the input file's stem) used
/// when the original score carries no usable title. A work or movement
/// title that still names an intermediate MusicXML file is treated as
/// unset so temporary filenames never leak into output metadata.
pub fn simplify_to_single_staff(
    score: &mut Score,
    voice: VoiceName,
    keep: &VoiceLocation,
    base_title: &str,
) -> Result<(), SplitError> {
    if keep.part_index >= score.parts.len() {
        return Err(SplitError::Simplification(format!(
            "part index {} out of range ({} parts present)",
            keep.part_index,
            score.parts.len()
        )));
    }

    let part = score.parts.swap_remove(keep.part_index);
    score.parts.clear();
    score.parts.push(part);

    let part = &mut score.parts[0];
    part.id = "P1".to_string();
    part.name = Some(voice.as_str().to_string());
    part.clef = Some(keep.expected_clef);
    // Clef changes inherited from the closed score would fight the
    // part-level assignment.
    for measure in &mut part.measures {
        measure.clef_change = None;
    }

    let original = effective_title(score, base_title);
    let title = format!("{} ({})", original, voice);
    score.metadata.work_title = Some(title.clone());
    score.metadata.movement_title = Some(title);

    log::debug!("simplified {} part: clef {:?}", voice, keep.expected_clef);
    Ok(())
}

/// The title to derive output titles from: the original work title unless
/// it is missing or names a temporary intermediate file.
fn effective_title(score: &Score, base_title: &str) -> String {
    let candidate = score
        .metadata
        .work_title
        .as_deref()
        .or(score.metadata.movement_title.as_deref());
    match candidate {
        Some(t) if !t.trim().is_empty() && !looks_like_filename(t) => t.trim().to_string(),
        _ => base_title.to_string(),
    }
}

fn looks_like_filename(title: &str) -> bool {
    let lower = title.to_ascii_lowercase();
    lower.ends_with(".musicxml") || lower.ends_with(".xml") || lower.ends_with(".mscz")
}
