// Shared builders for pipeline tests: closed-score SATB inputs built
// programmatically, with voices "1"/"2" on the upper staff and "5"/"6"
// on the lower, four quarter notes per voice per measure unless a test
// replaces a measure's rhythm.

#![allow(dead_code)] // each test binary uses a different subset

use satb_split::score::{
    Clef, Event, Lyric, Measure, Note, NoteId, Part, Pitch, Rational, Score, Syllabic,
    TimeSignature, Voice,
};
use satb_split::{split_satb_score, ProcessingOptions, VoiceName, VoiceScores};

pub const VOICE_IDS: [(usize, &str); 4] = [(0, "1"), (0, "2"), (1, "5"), (1, "6")];

pub fn r(n: i32) -> Rational {
    Rational::from_integer(n)
}

pub fn rat(n: i32, d: i32) -> Rational {
    Rational::new(n, d)
}

fn register_pitch(part_index: usize, voice_id: &str) -> Pitch {
    match (part_index, voice_id) {
        (0, "1") => Pitch::new(4, 0, 4), // G4
        (0, "2") => Pitch::new(2, 0, 4), // E4
        (1, "5") => Pitch::new(0, 0, 4), // C4
        _ => Pitch::new(0, 0, 3),        // C3
    }
}

/// A closed-score SATB input with `measures` measures of 4/4, four
/// quarter notes per voice per measure.
pub fn closed_score(measures: u32) -> Score {
    let mut score = Score::new();
    score.metadata.work_title = Some("Abendlied".to_string());

    for part_index in 0..2 {
        let mut part = Part {
            id: format!("P{}", part_index + 1),
            name: None,
            clef: Some(if part_index == 0 {
                Clef::Treble
            } else {
                Clef::Bass
            }),
            measures: Vec::new(),
        };
        for number in 1..=measures {
            let mut measure = Measure::new(number);
            if number == 1 {
                measure.time_signature = Some(TimeSignature {
                    beats: 4,
                    beat_type: 4,
                });
                measure.key_fifths = Some(0);
            }
            for (voice_part, voice_id) in VOICE_IDS {
                if voice_part != part_index {
                    continue;
                }
                let mut voice = Voice::new(voice_id);
                for beat in 0..4 {
                    let id = score.fresh_note_id();
                    voice.events.push(Event::Note(Note {
                        id,
                        offset: r(beat),
                        duration: r(1),
                        pitch: register_pitch(part_index, voice_id),
                        lyrics: Vec::new(),
                        tie: None,
                        grace: false,
                    }));
                }
                measure.voices.push(voice);
            }
            part.measures.push(measure);
        }
        score.parts.push(part);
    }
    score
}

/// Replace one voice's events in one measure with notes at the given
/// (offset, duration) pairs. Returns the new note ids.
pub fn set_rhythm(
    score: &mut Score,
    part_index: usize,
    voice_id: &str,
    measure_number: u32,
    rhythm: &[(Rational, Rational)],
) -> Vec<NoteId> {
    let pitch = register_pitch(part_index, voice_id);
    let mut ids = Vec::new();
    let mut events = Vec::new();
    for &(offset, duration) in rhythm {
        let id = score.fresh_note_id();
        ids.push(id);
        events.push(Event::Note(Note {
            id,
            offset,
            duration,
            pitch,
            lyrics: Vec::new(),
            tie: None,
            grace: false,
        }));
    }
    let measure = score.parts[part_index]
        .measures
        .iter_mut()
        .find(|m| m.number == measure_number)
        .expect("measure exists");
    measure
        .voices
        .iter_mut()
        .find(|v| v.id == voice_id)
        .expect("voice exists")
        .events = events;
    ids
}

/// Attach a single lyric to the note at the given position.
pub fn add_lyric(
    score: &mut Score,
    part_index: usize,
    voice_id: &str,
    measure_number: u32,
    offset: Rational,
    text: &str,
) {
    let measure = score.parts[part_index]
        .measures
        .iter_mut()
        .find(|m| m.number == measure_number)
        .expect("measure exists");
    let note = measure
        .voices
        .iter_mut()
        .find(|v| v.id == voice_id)
        .expect("voice exists")
        .notes_mut()
        .find(|n| n.offset == offset)
        .expect("note at offset");
    note.lyrics.push(Lyric {
        text: text.to_string(),
        syllabic: Syllabic::Single,
        number: 1,
    });
}

/// Note id at a position, for building spanners.
pub fn note_id_at(
    score: &Score,
    part_index: usize,
    voice_id: &str,
    measure_number: u32,
    offset: Rational,
) -> NoteId {
    score.parts[part_index]
        .measures
        .iter()
        .find(|m| m.number == measure_number)
        .expect("measure exists")
        .voices
        .iter()
        .find(|v| v.id == voice_id)
        .expect("voice exists")
        .notes()
        .find(|n| n.offset == offset)
        .expect("note at offset")
        .id
}

pub fn run_pipeline(score: &Score) -> VoiceScores {
    split_satb_score(score, "abendlied", &ProcessingOptions::default())
        .expect("pipeline should succeed")
}

/// (offset, text) of every lyric in one output measure
pub fn lyrics_in_measure(scores: &VoiceScores, voice: VoiceName, measure: u32) -> Vec<(Rational, String)> {
    let mut found = Vec::new();
    let m = scores[&voice].find_measure(measure).expect("measure exists");
    for v in &m.voices {
        for note in v.notes() {
            for lyric in &note.lyrics {
                found.push((note.offset, lyric.text.clone()));
            }
        }
    }
    found.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    found
}

/// (offset, value) of every dynamic in one output measure
pub fn dynamics_in_measure(
    scores: &VoiceScores,
    voice: VoiceName,
    measure: u32,
) -> Vec<(Rational, String)> {
    let m = scores[&voice].find_measure(measure).expect("measure exists");
    let mut found: Vec<(Rational, String)> =
        m.dynamics().map(|d| (d.offset, d.value.clone())).collect();
    found.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    found
}
