//! Deterministic SATB voice identification
//!
//! Locates the four vocal parts within the closed-score part/voice grid
//! using the fixed mapping produced by the MuseScore MusicXML exporter:
//! Soprano = part 0 voice "1", Alto = part 0 voice "2", Tenor = part 1
//! voice "5", Bass = part 1 voice "6". There is no heuristic fallback and
//! no confidence score; a score that does not match this shape is rejected
//! outright. Empirical fallbacks silently masked upstream bugs in earlier
//! iterations of this tool.

use serde::{Deserialize, Serialize};

use crate::error::SplitError;
use crate::score::{Clef, Score};

/// The four SATB voice names, in score order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VoiceName {
    Soprano,
    Alto,
    Tenor,
    Bass,
}

impl VoiceName {
    pub const ALL: [VoiceName; 4] = [
        VoiceName::Soprano,
        VoiceName::Alto,
        VoiceName::Tenor,
        VoiceName::Bass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceName::Soprano => "Soprano",
            VoiceName::Alto => "Alto",
            VoiceName::Tenor => "Tenor",
            VoiceName::Bass => "Bass",
        }
    }

    /// Engraving-convention clef for a standalone part of this voice.
    /// Tenor parts are written an octave higher than they sound.
    pub fn clef(&self) -> Clef {
        match self {
            VoiceName::Soprano | VoiceName::Alto => Clef::Treble,
            VoiceName::Tenor => Clef::Treble8vb,
            VoiceName::Bass => Clef::Bass,
        }
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of one SATB voice within the input score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceLocation {
    pub part_index: usize,
    pub voice_id: String,
    pub expected_clef: Clef,
}

/// Complete mapping of all four SATB voices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceMapping {
    pub soprano: VoiceLocation,
    pub alto: VoiceLocation,
    pub tenor: VoiceLocation,
    pub bass: VoiceLocation,
}

impl VoiceMapping {
    pub fn location(&self, voice: VoiceName) -> &VoiceLocation {
        match voice {
            VoiceName::Soprano => &self.soprano,
            VoiceName::Alto => &self.alto,
            VoiceName::Tenor => &self.tenor,
            VoiceName::Bass => &self.bass,
        }
    }

    /// The canonical closed-score mapping. The voice ids "5"/"6" on the
    /// second staff are an empirical fact about the upstream exporter; a
    /// different upstream tool would need a different constant.
    pub fn canonical() -> Self {
        VoiceMapping {
            soprano: VoiceLocation {
                part_index: 0,
                voice_id: "1".to_string(),
                expected_clef: VoiceName::Soprano.clef(),
            },
            alto: VoiceLocation {
                part_index: 0,
                voice_id: "2".to_string(),
                expected_clef: VoiceName::Alto.clef(),
            },
            tenor: VoiceLocation {
                part_index: 1,
                voice_id: "5".to_string(),
                expected_clef: VoiceName::Tenor.clef(),
            },
            bass: VoiceLocation {
                part_index: 1,
                voice_id: "6".to_string(),
                expected_clef: VoiceName::Bass.clef(),
            },
        }
    }
}

/// Identify the SATB voices in the input score, or fail with a message
/// naming the expected structure.
pub fn identify_voices(score: &Score) -> Result<VoiceMapping, SplitError> {
    if score.parts.len() != 2 {
        return Err(SplitError::VoiceDetection(format!(
            "expected exactly 2 parts for closed-score SATB, found {}",
            score.parts.len()
        )));
    }

    let mapping = VoiceMapping::canonical();

    // Each required voice id must appear in every non-empty measure of
    // its part.
    for (part_index, required) in [(0usize, ["1", "2"]), (1usize, ["5", "6"])] {
        let part = &score.parts[part_index];
        for measure in &part.measures {
            if !measure.has_timed_content() {
                continue;
            }
            for voice_id in required {
                let present = measure
                    .voice(voice_id)
                    .map(|v| !v.events.is_empty())
                    .unwrap_or(false);
                if !present {
                    return Err(SplitError::VoiceDetection(format!(
                        "part {} measure {} is missing voice \"{}\" \
                         (closed-score SATB requires voices 1/2 on the upper \
                         staff and 5/6 on the lower staff)",
                        part_index, measure.number, voice_id
                    )));
                }
            }
        }
    }

    // Duplicate voice ids across parts make the part-index disambiguation
    // ambiguous and indicate a malformed export.
    let upper: std::collections::BTreeSet<&str> = score.parts[0]
        .measures
        .iter()
        .flat_map(|m| m.voices.iter().map(|v| v.id.as_str()))
        .collect();
    let lower: std::collections::BTreeSet<&str> = score.parts[1]
        .measures
        .iter()
        .flat_map(|m| m.voices.iter().map(|v| v.id.as_str()))
        .collect();
    if let Some(dup) = upper.intersection(&lower).next() {
        return Err(SplitError::VoiceDetection(format!(
            "voice id \"{}\" appears in both parts; expected disjoint \
             voice ids (1/2 upper, 5/6 lower)",
            dup
        )));
    }

    log::debug!(
        "identified SATB voices: S=({},{}) A=({},{}) T=({},{}) B=({},{})",
        mapping.soprano.part_index,
        mapping.soprano.voice_id,
        mapping.alto.part_index,
        mapping.alto.voice_id,
        mapping.tenor.part_index,
        mapping.tenor.voice_id,
        mapping.bass.part_index,
        mapping.bass.voice_id,
    );

    Ok(mapping)
}
