//! Pipeline orchestration
//!
//! Runs the five stages in sequence: identify voices, replicate the score
//! four times by deep copy, prune each copy to one voice, simplify each
//! to a single labeled staff, then unify shared musical context across
//! the four results. The input score is read-only throughout; the four
//! derived scores are owned exclusively by the pipeline and mutated in
//! place.
//!
//! Copy-and-remove is the defining choice: everything the input carries
//! is preserved by default and removed selectively, so element types the
//! pipeline never heard of survive into the output instead of silently
//! disappearing.

use serde::{Deserialize, Serialize};

use crate::error::SplitError;
use crate::identify::{identify_voices, VoiceName};
use crate::remover::remove_other_voices;
use crate::score::{Event, Score};
use crate::simplifier::simplify_to_single_staff;
use crate::unifier::{unify_scores, VoiceScores};

/// Options controlling which pipeline stages run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOptions {
    #[serde(default = "default_true")]
    pub apply_dynamics_unification: bool,
    #[serde(default = "default_true")]
    pub apply_lyrics_unification: bool,
    #[serde(default = "default_true")]
    pub apply_spanner_unification: bool,
    #[serde(default = "default_true")]
    pub apply_layout_unification: bool,
    /// Verify structural invariants on the four outputs after unification
    #[serde(default = "default_true")]
    pub validate_output: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        ProcessingOptions {
            apply_dynamics_unification: true,
            apply_lyrics_unification: true,
            apply_spanner_unification: true,
            apply_layout_unification: true,
            validate_output: true,
        }
    }
}

/// Split a closed-score SATB score into four single-staff voice scores.
///
/// `base_title` is the input file's stem, used as the work-title fallback
/// when the score itself carries none.
pub fn split_satb_score(
    input: &Score,
    base_title: &str,
    options: &ProcessingOptions,
) -> Result<VoiceScores, SplitError> {
    validate_input(input)?;

    let mapping = identify_voices(input)?;

    // Four full deep copies; mutation of one never affects another.
    let mut scores: VoiceScores = VoiceName::ALL
        .into_iter()
        .map(|voice| (voice, input.clone()))
        .collect();
    log::info!("replicated input into {} voice copies", scores.len());

    for voice in VoiceName::ALL {
        let location = mapping.location(voice);
        let score = scores.get_mut(&voice).expect("all four voices present");
        remove_other_voices(score, location)?;
        simplify_to_single_staff(score, voice, location, base_title)?;
    }

    unify_scores(&mut scores, options)?;

    if options.validate_output {
        validate_output(input, &mapping, &scores)?;
    }

    Ok(scores)
}

/// Reject inputs with no parts or no notes before the pipeline starts.
fn validate_input(score: &Score) -> Result<(), SplitError> {
    if score.parts.is_empty() {
        return Err(SplitError::InvalidScore("score has no parts".to_string()));
    }
    if score.note_count() == 0 {
        return Err(SplitError::InvalidScore(
            "score contains no musical notes".to_string(),
        ));
    }
    Ok(())
}

/// Check the structural invariants on the four derived scores: exactly
/// one part each, at most one voice per measure, and every note of the
/// input voice preserved with identical pitch, measure, offset, and
/// duration.
fn validate_output(
    input: &Score,
    mapping: &crate::identify::VoiceMapping,
    scores: &VoiceScores,
) -> Result<(), SplitError> {
    for (&voice, score) in scores.iter() {
        if score.parts.len() != 1 {
            return Err(SplitError::Processing(format!(
                "{} output has {} parts, expected exactly 1",
                voice,
                score.parts.len()
            )));
        }
        for measure in &score.parts[0].measures {
            if measure.voices.len() > 1 {
                return Err(SplitError::Processing(format!(
                    "{} output measure {} holds {} voices, expected at most 1",
                    voice,
                    measure.number,
                    measure.voices.len()
                )));
            }
        }

        let location = mapping.location(voice);
        let source_part = &input.parts[location.part_index];
        for source_measure in &source_part.measures {
            let Some(source_voice) = source_measure.voice(&location.voice_id) else {
                continue;
            };
            for event in &source_voice.events {
                let (id, offset, duration) = match event {
                    Event::Note(n) => (n.id, n.offset, n.duration),
                    Event::Chord(c) => (c.id, c.offset, c.duration),
                    Event::Rest(_) => continue,
                };
                let Some(pos) = score.locate_note(id) else {
                    return Err(SplitError::Processing(format!(
                        "{} output lost a note from measure {}",
                        voice, source_measure.number
                    )));
                };
                if pos.measure_number != source_measure.number
                    || pos.offset != offset
                    || pos.duration != duration
                {
                    return Err(SplitError::Processing(format!(
                        "{} output displaced a note: measure {} offset {} \
                         duration {} became measure {} offset {} duration {}",
                        voice,
                        source_measure.number,
                        offset,
                        duration,
                        pos.measure_number,
                        pos.offset,
                        pos.duration
                    )));
                }
            }
        }
    }
    Ok(())
}
