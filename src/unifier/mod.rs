//! Contextual unification across the four derived scores
//!
//! After voice removal each derived score carries only the markings that
//! happened to be attached to its own voice in the input. Closed-score
//! engraving places system-wide markings (a forte, a crescendo, a system
//! break) on one voice only, typically Soprano, so the four printed parts
//! would come out inconsistently marked. Unification redistributes them.
//!
//! Four sub-policies run in a fixed order: dynamics, lyrics, spanners,
//! layout/tempo. Later policies read the state left by earlier ones.
//! Unification may add elements but never shifts or rewrites an existing
//! timed element, and it never creates ties.

pub mod dynamics;
pub mod layout;
pub mod lyrics;
pub mod spanners;

use std::collections::BTreeMap;

use crate::error::SplitError;
use crate::identify::VoiceName;
use crate::processor::ProcessingOptions;
use crate::score::{Event, NoteId, Rational, Score, SpannerKind};

/// The four derived scores, keyed by voice in score order
pub type VoiceScores = BTreeMap<VoiceName, Score>;

/// Apply all enabled unification policies in order.
pub fn unify_scores(
    scores: &mut VoiceScores,
    options: &ProcessingOptions,
) -> Result<(), SplitError> {
    if options.apply_dynamics_unification {
        let n = dynamics::unify(scores)?;
        log::info!("dynamics unification: {} mark(s) copied", n);
    }
    if options.apply_lyrics_unification {
        let n = lyrics::unify(scores)?;
        log::info!("lyrics unification: {} lyric(s) copied", n);
    }
    if options.apply_spanner_unification {
        let n = spanners::unify(scores)?;
        log::info!("spanner unification: {} wedge(s) copied", n);
    }
    if options.apply_layout_unification {
        let n = layout::unify(scores)?;
        log::info!("layout unification: {} mark(s) copied", n);
    }
    Ok(())
}

/// A candidate note for receiving a copied lyric or spanner endpoint
#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: NoteId,
    offset: Rational,
    duration: Rational,
    /// Order of appearance within the measure, the stable tiebreaker
    appearance: usize,
}

/// Select the note or chord in `measure_number` of `score` whose onset
/// falls in the half-open window `[window_start, window_end)`, by the
/// total order: longest duration first, then earliest offset, then order
/// of appearance. Grace notes never qualify. With `require_no_lyric`,
/// candidates already carrying a lyric are skipped; with `slur_filter`,
/// candidates strictly inside a slur are skipped.
pub(crate) fn select_in_time_window(
    score: &Score,
    measure_number: u32,
    window_start: Rational,
    window_end: Rational,
    require_no_lyric: bool,
    slur_filter: bool,
) -> Option<NoteId> {
    let measure = score.find_measure(measure_number)?;

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut appearance = 0usize;
    for voice in &measure.voices {
        for event in &voice.events {
            let (id, offset, duration, grace, has_lyric) = match event {
                Event::Note(n) => (n.id, n.offset, n.duration, n.grace, !n.lyrics.is_empty()),
                Event::Chord(c) => (c.id, c.offset, c.duration, c.grace, !c.lyrics.is_empty()),
                Event::Rest(_) => continue,
            };
            appearance += 1;
            if grace {
                continue;
            }
            if require_no_lyric && has_lyric {
                continue;
            }
            if offset < window_start || offset >= window_end {
                continue;
            }
            if slur_filter && in_slur_middle(score, id, measure_number, offset) {
                continue;
            }
            candidates.push(Candidate {
                id,
                offset,
                duration,
                appearance,
            });
        }
    }

    // Deterministic total order; never rely on collection iteration order.
    candidates.sort_by(|a, b| {
        b.duration
            .cmp(&a.duration)
            .then(a.offset.cmp(&b.offset))
            .then(a.appearance.cmp(&b.appearance))
    });
    candidates.first().map(|c| c.id)
}

/// Whether the note sits strictly inside a slur: listed between the
/// slur's first and last endpoints, or positioned strictly between them.
/// The first and last notes of a slur remain eligible for lyrics.
pub(crate) fn in_slur_middle(
    score: &Score,
    id: NoteId,
    measure_number: u32,
    offset: Rational,
) -> bool {
    for spanner in &score.spanners {
        if spanner.kind != SpannerKind::Slur {
            continue;
        }
        let (Some(first), Some(last)) = (spanner.first(), spanner.last()) else {
            continue;
        };
        if id == first || id == last {
            return false;
        }
        if spanner.notes.contains(&id) {
            return true;
        }
        let (Some(first_pos), Some(last_pos)) =
            (score.locate_note(first), score.locate_note(last))
        else {
            continue;
        };
        let here = (measure_number, offset);
        let start = (first_pos.measure_number, first_pos.offset);
        let end = (last_pos.measure_number, last_pos.offset);
        if start < here && here < end {
            return true;
        }
    }
    false
}
