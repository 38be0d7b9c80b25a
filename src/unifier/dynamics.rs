//! Dynamics unification
//!
//! Rules, applied per (measure, offset) position in ascending order:
//! - system-wide: an identical mark carried by two or more voices is
//!   copied to the voices that lack it;
//! - soprano-lead: a mark carried by Soprano alone, with no other voice
//!   marked at that position, is copied to Alto, Tenor, and Bass;
//! - voice-specific: voices carrying *different* marks at one position
//!   keep them; nothing is overridden.
//!
//! A copy is suppressed whenever the target already has any dynamic
//! within 1/1024 quarter note of the position.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SplitError;
use crate::identify::VoiceName;
use crate::score::{offset_eq, Direction, Dynamic, Measure, Placement, Rational};
use crate::unifier::VoiceScores;

/// Apply the dynamics rules. Returns the number of marks copied.
pub fn unify(scores: &mut VoiceScores) -> Result<usize, SplitError> {
    // Snapshot every dynamic position before mutating anything.
    type Position = (u32, Rational);
    let mut by_position: BTreeMap<Position, BTreeMap<String, BTreeSet<VoiceName>>> =
        BTreeMap::new();
    for (&voice, score) in scores.iter() {
        for part in &score.parts {
            for measure in &part.measures {
                for dynamic in measure.dynamics() {
                    by_position
                        .entry((measure.number, dynamic.offset))
                        .or_default()
                        .entry(dynamic.value.clone())
                        .or_default()
                        .insert(voice);
                }
            }
        }
    }

    let mut copied = 0usize;
    for (&(measure_number, offset), values) in &by_position {
        let voices_marked_here: BTreeSet<VoiceName> =
            values.values().flatten().copied().collect();

        for (value, carriers) in values {
            let system_wide = carriers.len() >= 2;
            let soprano_lead = carriers.len() == 1
                && carriers.contains(&VoiceName::Soprano)
                && voices_marked_here.len() == 1;
            if !system_wide && !soprano_lead {
                continue;
            }

            for target in VoiceName::ALL {
                if carriers.contains(&target) {
                    continue;
                }
                let score = scores.get_mut(&target).expect("all four voices present");
                let Some(measure) = score.find_measure_mut(measure_number) else {
                    continue;
                };
                if has_dynamic_near(measure, offset) {
                    continue;
                }
                measure.directions.push(Direction::Dynamic(Dynamic {
                    value: value.clone(),
                    offset,
                    placement: Some(default_placement(target)),
                }));
                copied += 1;
                log::debug!(
                    "copied dynamic '{}' to {} at measure {} offset {}",
                    value,
                    target,
                    measure_number,
                    offset
                );
            }
        }
    }

    Ok(copied)
}

/// Upper voices read dynamics above the staff, lower voices below.
fn default_placement(voice: VoiceName) -> Placement {
    match voice {
        VoiceName::Soprano | VoiceName::Alto => Placement::Above,
        VoiceName::Tenor | VoiceName::Bass => Placement::Below,
    }
}

fn has_dynamic_near(measure: &Measure, offset: Rational) -> bool {
    measure.dynamics().any(|d| offset_eq(d.offset, offset))
}
