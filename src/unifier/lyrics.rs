//! Lyrics unification by deterministic time-window matching
//!
//! Exact offset+duration matching drops lyrics whenever voices carry
//! different rhythmic values under the same word (Soprano's dotted half
//! against Alto's half and Tenor's quarter at the same beat). Matching is
//! therefore done by onset window: a note in another voice is a candidate
//! for a source lyric if it starts during the source note's sounding span
//! `[offset, offset + duration)` in the same measure.
//!
//! Among eligible candidates exactly one is selected per target voice:
//! longest duration first, then earliest offset, then order of
//! appearance. Candidates strictly inside a slur are ineligible, grace
//! notes never qualify, and existing lyrics are never overwritten. The
//! source's syllabic value and line number propagate verbatim.

use crate::error::SplitError;
use crate::identify::VoiceName;
use crate::score::{Event, Lyric, Rational, Score};
use crate::unifier::{select_in_time_window, VoiceScores};

/// One note-with-lyric occurrence, snapshotted from a source score
#[derive(Debug, Clone)]
struct LyricSource {
    measure_number: u32,
    offset: Rational,
    duration: Rational,
    lyrics: Vec<Lyric>,
}

/// Apply lyric gap-filling across the four scores. Returns the number of
/// notes that received a copied lyric.
pub fn unify(scores: &mut VoiceScores) -> Result<usize, SplitError> {
    // Snapshot every source from the pristine state before any fill, the
    // same way dynamics and spanner unification snapshot their positions.
    // A note that receives a copy during this pass must never act as a
    // source itself: its own duration would project a wider window than
    // the true source's onto voices scanned later.
    let all_sources: Vec<(VoiceName, Vec<LyricSource>)> = VoiceName::ALL
        .into_iter()
        .map(|voice| (voice, collect_sources(&scores[&voice])))
        .collect();

    let mut filled = 0usize;

    // Insertions made for an earlier source are still visible when a
    // later source scans for candidates, so a note only ever receives
    // one lyric.
    for (source_voice, sources) in &all_sources {
        let source_voice = *source_voice;

        for source in sources {
            for target_voice in VoiceName::ALL {
                if target_voice == source_voice {
                    continue;
                }
                let target = scores.get_mut(&target_voice).expect("all four voices present");
                let window_end = source.offset + source.duration;
                let Some(candidate) = select_in_time_window(
                    target,
                    source.measure_number,
                    source.offset,
                    window_end,
                    true,
                    true,
                ) else {
                    continue;
                };
                attach_lyrics(target, candidate, &source.lyrics);
                filled += 1;
                log::debug!(
                    "copied lyric '{}' from {} to {} in measure {}",
                    source.lyrics[0].text,
                    source_voice,
                    target_voice,
                    source.measure_number
                );
            }
        }
    }

    Ok(filled)
}

/// Snapshot every non-grace note or chord carrying a lyric, in ascending
/// measure and offset order.
fn collect_sources(score: &Score) -> Vec<LyricSource> {
    let mut sources = Vec::new();
    for part in &score.parts {
        for measure in &part.measures {
            for voice in &measure.voices {
                for event in &voice.events {
                    let (offset, duration, lyrics, grace) = match event {
                        Event::Note(n) => (n.offset, n.duration, &n.lyrics, n.grace),
                        Event::Chord(c) => (c.offset, c.duration, &c.lyrics, c.grace),
                        Event::Rest(_) => continue,
                    };
                    if grace || lyrics.is_empty() {
                        continue;
                    }
                    sources.push(LyricSource {
                        measure_number: measure.number,
                        offset,
                        duration,
                        lyrics: lyrics.clone(),
                    });
                }
            }
        }
    }
    sources.sort_by(|a, b| {
        a.measure_number
            .cmp(&b.measure_number)
            .then(a.offset.cmp(&b.offset))
    });
    sources
}

fn attach_lyrics(score: &mut Score, id: crate::score::NoteId, lyrics: &[Lyric]) {
    for part in &mut score.parts {
        for measure in &mut part.measures {
            for voice in &mut measure.voices {
                for event in &mut voice.events {
                    match event {
                        Event::Note(n) if n.id == id => {
                            n.lyrics = lyrics.to_vec();
                            return;
                        }
                        Event::Chord(c) if c.id == id => {
                            c.lyrics = lyrics.to_vec();
                            return;
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{
        Chord, Measure, Note, NoteId, Part, Pitch, Spanner, SpannerKind, Syllabic, Voice,
    };

    fn make_score(notes: &[(Rational, Rational, Option<&str>)]) -> (Score, Vec<NoteId>) {
        let mut score = Score::new();
        let mut voice = Voice::new("1");
        let mut ids = Vec::new();
        for &(offset, duration, lyric) in notes {
            let id = score.fresh_note_id();
            ids.push(id);
            voice.events.push(Event::Note(Note {
                id,
                offset,
                duration,
                pitch: Pitch::new(4, 0, 4),
                lyrics: lyric
                    .map(|t| {
                        vec![Lyric {
                            text: t.to_string(),
                            syllabic: Syllabic::Single,
                            number: 1,
                        }]
                    })
                    .unwrap_or_default(),
                tie: None,
                grace: false,
            }));
        }
        let mut measure = Measure::new(29);
        measure.voices.push(voice);
        score.parts.push(Part {
            id: "P1".to_string(),
            name: None,
            clef: None,
            measures: vec![measure],
        });
        (score, ids)
    }

    fn r(n: i32) -> Rational {
        Rational::from_integer(n)
    }

    fn first_lyric(scores: &VoiceScores, voice: VoiceName) -> Option<String> {
        scores[&voice].parts[0].measures[0].voices[0]
            .notes()
            .next()
            .and_then(|n| n.lyrics.first())
            .map(|l| l.text.clone())
    }

    #[test]
    fn test_time_window_mismatch_still_propagates() {
        // Soprano dotted half with "far"; Alto half, Tenor quarter, Bass
        // half, all at the same beat with no lyric. Exact-duration
        // matching would drop all three copies.
        let mut scores = VoiceScores::new();
        let (soprano, _) = make_score(&[(r(0), r(3), Some("far"))]);
        let (alto, _) = make_score(&[(r(0), r(2), None)]);
        let (tenor, _) = make_score(&[(r(0), r(1), None)]);
        let (bass, _) = make_score(&[(r(0), r(2), None)]);
        scores.insert(VoiceName::Soprano, soprano);
        scores.insert(VoiceName::Alto, alto);
        scores.insert(VoiceName::Tenor, tenor);
        scores.insert(VoiceName::Bass, bass);

        let filled = unify(&mut scores).unwrap();
        assert_eq!(filled, 3);
        for voice in VoiceName::ALL {
            assert_eq!(first_lyric(&scores, voice).as_deref(), Some("far"));
        }
    }

    #[test]
    fn test_existing_lyric_never_overwritten() {
        let mut scores = VoiceScores::new();
        let (soprano, _) = make_score(&[(r(0), r(2), Some("rest"))]);
        let (alto, _) = make_score(&[(r(0), r(2), None)]);
        let (tenor, _) = make_score(&[(r(0), r(2), None)]);
        let (bass, _) = make_score(&[(r(0), r(2), Some("sleep"))]);
        scores.insert(VoiceName::Soprano, soprano);
        scores.insert(VoiceName::Alto, alto);
        scores.insert(VoiceName::Tenor, tenor);
        scores.insert(VoiceName::Bass, bass);

        unify(&mut scores).unwrap();
        assert_eq!(first_lyric(&scores, VoiceName::Soprano).as_deref(), Some("rest"));
        assert_eq!(first_lyric(&scores, VoiceName::Bass).as_deref(), Some("sleep"));
        // Inner voices receive Soprano's lyric, scanned first in order.
        assert_eq!(first_lyric(&scores, VoiceName::Alto).as_deref(), Some("rest"));
        assert_eq!(first_lyric(&scores, VoiceName::Tenor).as_deref(), Some("rest"));
    }

    #[test]
    fn test_slur_middle_candidate_rejected() {
        let mut scores = VoiceScores::new();
        let (soprano, _) = make_score(&[(r(0), r(3), Some("light"))]);
        // Tenor: three slurred quarters; the middle one starts inside the
        // window and is the longest-at-window candidate set's only entry
        // once the first is taken, but slur filtering must reject it.
        let (mut tenor, tenor_ids) = make_score(&[(r(0), r(1), None), (r(1), r(1), None), (r(2), r(1), None)]);
        tenor.spanners.push(Spanner::new(
            SpannerKind::Slur,
            vec![tenor_ids[0], tenor_ids[1], tenor_ids[2]],
        ));
        let (alto, _) = make_score(&[(r(0), r(3), None)]);
        let (bass, _) = make_score(&[(r(0), r(3), None)]);
        scores.insert(VoiceName::Soprano, soprano);
        scores.insert(VoiceName::Alto, alto);
        scores.insert(VoiceName::Tenor, tenor);
        scores.insert(VoiceName::Bass, bass);

        unify(&mut scores).unwrap();
        assert_eq!(first_lyric(&scores, VoiceName::Alto).as_deref(), Some("light"));
        assert_eq!(first_lyric(&scores, VoiceName::Bass).as_deref(), Some("light"));
        // Tenor's first note (slur start) is eligible and receives it.
        let tenor_first = &scores[&VoiceName::Tenor].parts[0].measures[0].voices[0];
        let lyric_notes: Vec<_> = tenor_first.notes().filter(|n| !n.lyrics.is_empty()).collect();
        assert_eq!(lyric_notes.len(), 1);
        assert_eq!(lyric_notes[0].offset, r(0));
    }

    #[test]
    fn test_syllabic_and_line_number_propagate_verbatim() {
        let mut scores = VoiceScores::new();
        let (mut soprano, soprano_ids) = make_score(&[(r(0), r(1), None)]);
        // Give the source a begin-syllable on verse 2.
        for note in soprano.parts[0].measures[0].voices[0].notes_mut() {
            if note.id == soprano_ids[0] {
                note.lyrics = vec![Lyric {
                    text: "shi".to_string(),
                    syllabic: Syllabic::Begin,
                    number: 2,
                }];
            }
        }
        let (alto, _) = make_score(&[(r(0), r(1), None)]);
        let (tenor, _) = make_score(&[(r(0), r(1), None)]);
        let (bass, _) = make_score(&[(r(0), r(1), None)]);
        scores.insert(VoiceName::Soprano, soprano);
        scores.insert(VoiceName::Alto, alto);
        scores.insert(VoiceName::Tenor, tenor);
        scores.insert(VoiceName::Bass, bass);

        unify(&mut scores).unwrap();
        let alto_note = scores[&VoiceName::Alto].parts[0].measures[0].voices[0]
            .notes()
            .next()
            .unwrap()
            .clone();
        assert_eq!(alto_note.lyrics[0].syllabic, Syllabic::Begin);
        assert_eq!(alto_note.lyrics[0].number, 2);
    }

    fn make_chord_score(
        offset: Rational,
        duration: Rational,
        lyric: Option<&str>,
    ) -> (Score, NoteId) {
        let mut score = Score::new();
        let id = score.fresh_note_id();
        let mut voice = Voice::new("1");
        voice.events.push(Event::Chord(Chord {
            id,
            offset,
            duration,
            pitches: vec![Pitch::new(2, 0, 4), Pitch::new(4, 0, 4)],
            lyrics: lyric
                .map(|t| {
                    vec![Lyric {
                        text: t.to_string(),
                        syllabic: Syllabic::Single,
                        number: 1,
                    }]
                })
                .unwrap_or_default(),
            tie: None,
            grace: false,
        }));
        let mut measure = Measure::new(29);
        measure.voices.push(voice);
        score.parts.push(Part {
            id: "P1".to_string(),
            name: None,
            clef: None,
            measures: vec![measure],
        });
        (score, id)
    }

    fn chord_lyric(scores: &VoiceScores, voice: VoiceName) -> Option<String> {
        scores[&voice].parts[0].measures[0].voices[0]
            .events
            .iter()
            .find_map(|e| match e {
                Event::Chord(c) => c.lyrics.first().map(|l| l.text.clone()),
                _ => None,
            })
    }

    #[test]
    fn test_filled_note_never_becomes_a_source() {
        // Soprano quarter "hi"; Alto half; Tenor quarter on beat 2; Bass
        // quarter. Alto receives "hi" from the Soprano pass, but its own
        // longer duration must not widen the window onto Tenor: the true
        // source window [0, 1) excludes Tenor's note at offset 1.
        let mut scores = VoiceScores::new();
        let (soprano, _) = make_score(&[(r(0), r(1), Some("hi"))]);
        let (alto, _) = make_score(&[(r(0), r(2), None)]);
        let (tenor, _) = make_score(&[(r(1), r(1), None)]);
        let (bass, _) = make_score(&[(r(0), r(1), None)]);
        scores.insert(VoiceName::Soprano, soprano);
        scores.insert(VoiceName::Alto, alto);
        scores.insert(VoiceName::Tenor, tenor);
        scores.insert(VoiceName::Bass, bass);

        let filled = unify(&mut scores).unwrap();
        assert_eq!(filled, 2);
        assert_eq!(first_lyric(&scores, VoiceName::Alto).as_deref(), Some("hi"));
        assert_eq!(first_lyric(&scores, VoiceName::Bass).as_deref(), Some("hi"));
        assert_eq!(first_lyric(&scores, VoiceName::Tenor), None);
    }

    #[test]
    fn test_chord_candidate_receives_lyric() {
        let mut scores = VoiceScores::new();
        let (soprano, _) = make_score(&[(r(0), r(1), Some("joy"))]);
        let (alto, _) = make_chord_score(r(0), r(1), None);
        let (tenor, _) = make_score(&[(r(0), r(1), None)]);
        let (bass, _) = make_score(&[(r(0), r(1), None)]);
        scores.insert(VoiceName::Soprano, soprano);
        scores.insert(VoiceName::Alto, alto);
        scores.insert(VoiceName::Tenor, tenor);
        scores.insert(VoiceName::Bass, bass);

        let filled = unify(&mut scores).unwrap();
        assert_eq!(filled, 3);
        assert_eq!(chord_lyric(&scores, VoiceName::Alto).as_deref(), Some("joy"));
    }

    #[test]
    fn test_chord_lyric_acts_as_source() {
        let mut scores = VoiceScores::new();
        let (soprano, _) = make_chord_score(r(0), r(2), Some("sea"));
        let (alto, _) = make_score(&[(r(0), r(2), None)]);
        let (tenor, _) = make_score(&[(r(0), r(1), None), (r(1), r(1), None)]);
        let (bass, _) = make_score(&[(r(0), r(2), None)]);
        scores.insert(VoiceName::Soprano, soprano);
        scores.insert(VoiceName::Alto, alto);
        scores.insert(VoiceName::Tenor, tenor);
        scores.insert(VoiceName::Bass, bass);

        let filled = unify(&mut scores).unwrap();
        assert_eq!(filled, 3);
        for voice in [VoiceName::Alto, VoiceName::Tenor, VoiceName::Bass] {
            assert_eq!(
                first_lyric(&scores, voice).as_deref(),
                Some("sea"),
                "{} should carry the chord's lyric",
                voice
            );
        }
    }

    #[test]
    fn test_no_candidate_outside_window() {
        let mut scores = VoiceScores::new();
        let (soprano, _) = make_score(&[(r(0), r(1), Some("day"))]);
        // Alto's only note starts after the window closes.
        let (alto, _) = make_score(&[(r(2), r(1), None)]);
        let (tenor, _) = make_score(&[(r(0), r(1), None)]);
        let (bass, _) = make_score(&[(r(0), r(1), None)]);
        scores.insert(VoiceName::Soprano, soprano);
        scores.insert(VoiceName::Alto, alto);
        scores.insert(VoiceName::Tenor, tenor);
        scores.insert(VoiceName::Bass, bass);

        let filled = unify(&mut scores).unwrap();
        assert_eq!(filled, 2);
        assert_eq!(first_lyric(&scores, VoiceName::Alto), None);
    }
}
