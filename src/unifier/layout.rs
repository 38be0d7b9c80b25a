//! Layout and tempo unification
//!
//! System breaks, page breaks, tempo marks, and rehearsal marks carry no
//! note endpoints, so redistribution is a measure-indexed insertion with
//! duplicate suppression: any voice's mark at a measure appears in the
//! same measure of all four derived scores.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SplitError;
use crate::score::{offset_eq, Direction, Rational, RehearsalMark, TempoMark};
use crate::unifier::VoiceScores;

/// Apply layout/tempo propagation. Returns the number of marks copied.
pub fn unify(scores: &mut VoiceScores) -> Result<usize, SplitError> {
    let mut copied = 0usize;

    // Breaks: union of flags per measure number.
    let mut system_breaks: BTreeSet<u32> = BTreeSet::new();
    let mut page_breaks: BTreeSet<u32> = BTreeSet::new();
    for score in scores.values() {
        for part in &score.parts {
            for measure in &part.measures {
                if measure.new_system {
                    system_breaks.insert(measure.number);
                }
                if measure.new_page {
                    page_breaks.insert(measure.number);
                }
            }
        }
    }
    for score in scores.values_mut() {
        for part in &mut score.parts {
            for measure in &mut part.measures {
                if system_breaks.contains(&measure.number) && !measure.new_system {
                    measure.new_system = true;
                    copied += 1;
                }
                if page_breaks.contains(&measure.number) && !measure.new_page {
                    measure.new_page = true;
                    copied += 1;
                }
            }
        }
    }

    // Tempo marks, keyed by position; first occurrence in voice order wins
    // when voices disagree about the content at one position.
    let mut tempos: BTreeMap<(u32, Rational), TempoMark> = BTreeMap::new();
    let mut rehearsals: BTreeMap<(u32, Rational), RehearsalMark> = BTreeMap::new();
    for score in scores.values() {
        for part in &score.parts {
            for measure in &part.measures {
                for tempo in measure.tempo_marks() {
                    tempos
                        .entry((measure.number, tempo.offset))
                        .or_insert_with(|| tempo.clone());
                }
                for mark in measure.rehearsal_marks() {
                    rehearsals
                        .entry((measure.number, mark.offset))
                        .or_insert_with(|| mark.clone());
                }
            }
        }
    }

    for (&(measure_number, offset), tempo) in &tempos {
        for score in scores.values_mut() {
            let Some(measure) = score.find_measure_mut(measure_number) else {
                continue;
            };
            if measure.tempo_marks().any(|t| offset_eq(t.offset, offset)) {
                continue;
            }
            measure.directions.push(Direction::Tempo(tempo.clone()));
            copied += 1;
        }
    }

    for (&(measure_number, offset), mark) in &rehearsals {
        for score in scores.values_mut() {
            let Some(measure) = score.find_measure_mut(measure_number) else {
                continue;
            };
            if measure
                .rehearsal_marks()
                .any(|r| offset_eq(r.offset, offset))
            {
                continue;
            }
            measure.directions.push(Direction::Rehearsal(mark.clone()));
            copied += 1;
        }
    }

    Ok(copied)
}
