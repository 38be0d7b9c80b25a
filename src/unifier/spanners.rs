//! Spanner unification
//!
//! Slurs, ties, and voice-attached wedges whose endpoints all live in one
//! voice stay in that voice; nothing is copied across voices for them.
//! Ties are carried on the notes themselves, so they survive removal
//! untouched and no policy here ever creates one.
//!
//! A crescendo or diminuendo carried by Soprano with no same-type wedge
//! at an overlapping time range in any other voice is system-wide: it is
//! copied to Alto, Tenor, and Bass. If Soprano and Bass carry matching
//! wedges (and the inner voices do not), the copy goes to Alto and Tenor
//! only. Copying locates endpoint notes in the target voice by the same
//! time-window rule lyrics use; a wedge whose endpoints cannot be located
//! is skipped for that voice, never invented.
//!
//! A final reference sweep removes any spanner left with a missing
//! endpoint.

use std::collections::BTreeMap;

use crate::error::SplitError;
use crate::identify::VoiceName;
use crate::score::{Rational, Score, Spanner, SpannerKind};
use crate::unifier::{select_in_time_window, VoiceScores};

/// A wedge resolved to its time range within one derived score
#[derive(Debug, Clone)]
struct WedgeSpan {
    kind: SpannerKind,
    /// Absolute start/end of the sounding range, for overlap tests
    abs_start: Rational,
    abs_end: Rational,
    start_measure: u32,
    start_offset: Rational,
    start_duration: Rational,
    end_measure: u32,
    end_offset: Rational,
    end_duration: Rational,
}

impl WedgeSpan {
    fn overlaps(&self, other: &WedgeSpan) -> bool {
        self.kind == other.kind && self.abs_start < other.abs_end && other.abs_start < self.abs_end
    }
}

/// Apply system-wide wedge propagation. Returns the number of wedges
/// copied.
pub fn unify(scores: &mut VoiceScores) -> Result<usize, SplitError> {
    let spans: BTreeMap<VoiceName, Vec<WedgeSpan>> = scores
        .iter()
        .map(|(&voice, score)| (voice, wedge_spans(score)))
        .collect();

    let mut copied = 0usize;
    for soprano_wedge in &spans[&VoiceName::Soprano] {
        let carriers: Vec<VoiceName> = VoiceName::ALL
            .into_iter()
            .filter(|v| *v != VoiceName::Soprano)
            .filter(|v| spans[v].iter().any(|w| w.overlaps(soprano_wedge)))
            .collect();

        let targets: &[VoiceName] = match carriers.as_slice() {
            [] => &[VoiceName::Alto, VoiceName::Tenor, VoiceName::Bass],
            [VoiceName::Bass] => &[VoiceName::Alto, VoiceName::Tenor],
            _ => &[],
        };

        for &target in targets {
            let score = scores.get_mut(&target).expect("all four voices present");
            match copy_wedge(score, soprano_wedge) {
                Some(()) => {
                    copied += 1;
                    log::debug!(
                        "copied {:?} to {} over measures {}-{}",
                        soprano_wedge.kind,
                        target,
                        soprano_wedge.start_measure,
                        soprano_wedge.end_measure
                    );
                }
                None => log::debug!(
                    "no endpoints for {:?} in {} over measures {}-{}, skipped",
                    soprano_wedge.kind,
                    target,
                    soprano_wedge.start_measure,
                    soprano_wedge.end_measure
                ),
            }
        }
    }

    for score in scores.values_mut() {
        let dropped = score.remove_orphaned_spanners();
        if dropped > 0 {
            log::warn!("removed {} orphaned spanner(s) after unification", dropped);
        }
    }

    Ok(copied)
}

/// Resolve every wedge in the score to its time range, in ascending
/// start order. Wedges with unresolvable endpoints are ignored here and
/// left to the orphan sweep.
fn wedge_spans(score: &Score) -> Vec<WedgeSpan> {
    let starts = score.measure_start_times();
    let mut spans = Vec::new();
    for spanner in &score.spanners {
        if !spanner.is_wedge() {
            continue;
        }
        let (Some(first), Some(last)) = (spanner.first(), spanner.last()) else {
            continue;
        };
        let (Some(first_pos), Some(last_pos)) =
            (score.locate_note(first), score.locate_note(last))
        else {
            continue;
        };
        let (Some(&m_start), Some(&m_end)) = (
            starts.get(&first_pos.measure_number),
            starts.get(&last_pos.measure_number),
        ) else {
            continue;
        };
        spans.push(WedgeSpan {
            kind: spanner.kind,
            abs_start: m_start + first_pos.offset,
            abs_end: m_end + last_pos.offset + last_pos.duration,
            start_measure: first_pos.measure_number,
            start_offset: first_pos.offset,
            start_duration: first_pos.duration,
            end_measure: last_pos.measure_number,
            end_offset: last_pos.offset,
            end_duration: last_pos.duration,
        });
    }
    spans.sort_by(|a, b| a.abs_start.cmp(&b.abs_start).then(a.abs_end.cmp(&b.abs_end)));
    spans
}

/// Locate endpoint notes for a wedge in the target score and insert the
/// copy. Returns `None` when either endpoint cannot be located or both
/// resolve to the same note.
fn copy_wedge(score: &mut Score, wedge: &WedgeSpan) -> Option<()> {
    let start = select_in_time_window(
        score,
        wedge.start_measure,
        wedge.start_offset,
        wedge.start_offset + wedge.start_duration,
        false,
        false,
    )?;
    let end = select_in_time_window(
        score,
        wedge.end_measure,
        wedge.end_offset,
        wedge.end_offset + wedge.end_duration,
        false,
        false,
    )?;
    if start == end {
        return None;
    }
    score.spanners.push(Spanner::new(wedge.kind, vec![start, end]));
    Some(())
}
