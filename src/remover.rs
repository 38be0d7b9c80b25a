//! Voice removal: prune a derived score down to one voice
//!
//! Takes a full deep copy of the input and removes every voice except the
//! target, measure by measure. Non-voice measure elements (dynamics, tempo
//! marks, rehearsal marks, layout flags, attribute changes) are preserved
//! in place. Parts other than the target's are emptied of voice content
//! but retained until staff simplification.
//!
//! Measures left without timed content receive a full-measure rest at
//! offset 0 so downstream timing is preserved. Spanners whose endpoint
//! notes were removed are swept immediately after the pass; a broken
//! spanner is discarded, never repaired from partial references.

use crate::error::SplitError;
use crate::identify::VoiceLocation;
use crate::score::{Event, Rational, Rest, Score, TimeSignature, Voice};

/// Remove every voice except `keep` from all parts of the score.
pub fn remove_other_voices(score: &mut Score, keep: &VoiceLocation) -> Result<(), SplitError> {
    for (part_index, part) in score.parts.iter_mut().enumerate() {
        let keep_here = part_index == keep.part_index;
        let mut effective_ts = TimeSignature::default();

        for measure in &mut part.measures {
            if let Some(ts) = measure.time_signature {
                effective_ts = ts;
            }

            if keep_here {
                let had_voices = !measure.voices.is_empty();
                let has_target = measure.voice(&keep.voice_id).is_some();
                if had_voices && !has_target {
                    // The identifier guarantees the target voice exists in
                    // every non-empty measure; reaching this point means
                    // that invariant was violated upstream.
                    return Err(SplitError::VoiceRemoval {
                        measure: measure.number,
                        detail: format!(
                            "expected voice \"{}\" in part {}, found [{}]",
                            keep.voice_id,
                            part_index,
                            measure
                                .voices
                                .iter()
                                .map(|v| v.id.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    });
                }
                measure.voices.retain(|v| v.id == keep.voice_id);
            } else {
                measure.voices.clear();
            }

            if !measure.has_timed_content() {
                let voice_id = if keep_here { keep.voice_id.clone() } else { "1".to_string() };
                let mut rest_voice = Voice::new(voice_id);
                rest_voice.events.push(Event::Rest(Rest {
                    offset: Rational::from_integer(0),
                    duration: effective_ts.measure_duration(),
                }));
                measure.voices = vec![rest_voice];
            }
        }
    }

    let dropped = score.remove_orphaned_spanners();
    if dropped > 0 {
        log::debug!(
            "dropped {} spanner(s) with endpoints outside voice {}/{}",
            dropped,
            keep.part_index,
            keep.voice_id
        );
    }

    Ok(())
}
