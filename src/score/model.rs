//! Core score containers and timed elements
//!
//! A `Score` owns an ordered list of `Part`s, each a staff-level container
//! of numbered `Measure`s. Measures hold polyphonic `Voice` streams of
//! notes, chords, and rests at rational quarter-note offsets, plus
//! measure-level directions (dynamics, tempo, rehearsal marks) and layout
//! flags. Spanners live in the score-global collection (see `spanner`)
//! and reference notes by `NoteId`.
//!
//! `Score` is deep-copyable through `Clone`; `NoteId`s are preserved by
//! the copy, so spanner references remain valid in every copy until voice
//! removal deletes their endpoint notes.

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

use crate::score::spanner::Spanner;

/// Rational offset/duration arithmetic in quarter-note units
pub type Rational = Rational32;

/// Identity of a note or chord, unique within one score and preserved by
/// deep copy. Spanner endpoints are expressed in these.
pub type NoteId = u32;

/// Offset comparison tolerance: 1/1024 of a quarter note
pub fn offset_eq(a: Rational, b: Rational) -> bool {
    let tolerance = Rational::new(1, 1024);
    let diff = if a > b { a - b } else { b - a };
    diff <= tolerance
}

// ============================================================================
// SCORE AND PARTS
// ============================================================================

/// Work-level metadata carried through to every derived score
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreMetadata {
    pub work_title: Option<String>,
    pub movement_title: Option<String>,
    pub composer: Option<String>,
    pub lyricist: Option<String>,
}

/// Root container: metadata, parts, and the global spanner collection
#[derive(Debug, Clone, Default)]
pub struct Score {
    pub metadata: ScoreMetadata,
    pub parts: Vec<Part>,
    pub spanners: Vec<Spanner>,
    next_note_id: NoteId,
}

impl Score {
    pub fn new() -> Self {
        Score::default()
    }

    /// Allocate a fresh note identity. Used by the parser and by test
    /// score builders; pipeline stages never mint new notes.
    pub fn fresh_note_id(&mut self) -> NoteId {
        let id = self.next_note_id;
        self.next_note_id += 1;
        id
    }

    /// Find a measure by number, scanning parts in order
    pub fn find_measure(&self, number: u32) -> Option<&Measure> {
        self.parts
            .iter()
            .flat_map(|p| p.measures.iter())
            .find(|m| m.number == number)
    }

    pub fn find_measure_mut(&mut self, number: u32) -> Option<&mut Measure> {
        self.parts
            .iter_mut()
            .flat_map(|p| p.measures.iter_mut())
            .find(|m| m.number == number)
    }

    /// Ascending measure numbers across all parts, deduplicated
    pub fn measure_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .parts
            .iter()
            .flat_map(|p| p.measures.iter().map(|m| m.number))
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    /// Whether a note or chord with this identity still exists anywhere
    pub fn contains_note(&self, id: NoteId) -> bool {
        self.locate_note(id).is_some()
    }

    /// Locate a note or chord by identity
    pub fn locate_note(&self, id: NoteId) -> Option<NotePosition> {
        for (part_index, part) in self.parts.iter().enumerate() {
            for measure in &part.measures {
                for voice in &measure.voices {
                    for event in &voice.events {
                        let (event_id, offset, duration) = match event {
                            Event::Note(n) => (n.id, n.offset, n.duration),
                            Event::Chord(c) => (c.id, c.offset, c.duration),
                            Event::Rest(_) => continue,
                        };
                        if event_id == id {
                            return Some(NotePosition {
                                part_index,
                                measure_number: measure.number,
                                voice_id: voice.id.clone(),
                                offset,
                                duration,
                            });
                        }
                    }
                }
            }
        }
        None
    }

    /// Drop every spanner with at least one endpoint no longer present.
    /// Returns the number removed.
    pub fn remove_orphaned_spanners(&mut self) -> usize {
        let mut alive = std::collections::BTreeSet::new();
        for part in &self.parts {
            for measure in &part.measures {
                for voice in &measure.voices {
                    for event in &voice.events {
                        match event {
                            Event::Note(n) => {
                                alive.insert(n.id);
                            }
                            Event::Chord(c) => {
                                alive.insert(c.id);
                            }
                            Event::Rest(_) => {}
                        }
                    }
                }
            }
        }
        let before = self.spanners.len();
        self.spanners
            .retain(|s| s.notes.iter().all(|id| alive.contains(id)));
        before - self.spanners.len()
    }

    /// Total number of notes and chords across all parts
    pub fn note_count(&self) -> usize {
        self.parts
            .iter()
            .flat_map(|p| p.measures.iter())
            .flat_map(|m| m.voices.iter())
            .flat_map(|v| v.events.iter())
            .filter(|e| !matches!(e, Event::Rest(_)))
            .count()
    }

    /// Absolute start time of each measure, derived from time signatures
    /// carried forward measure to measure. Used for cross-measure time
    /// range comparisons.
    pub fn measure_start_times(&self) -> std::collections::BTreeMap<u32, Rational> {
        let mut starts = std::collections::BTreeMap::new();
        let Some(part) = self.parts.first() else {
            return starts;
        };
        let mut cursor = Rational::from_integer(0);
        let mut effective = TimeSignature::default();
        for measure in &part.measures {
            if let Some(ts) = measure.time_signature {
                effective = ts;
            }
            starts.insert(measure.number, cursor);
            cursor += effective.measure_duration();
        }
        starts
    }
}

/// A staff-level container with a name, predominant clef, and measures
#[derive(Debug, Clone, Default)]
pub struct Part {
    pub id: String,
    pub name: Option<String>,
    pub clef: Option<Clef>,
    pub measures: Vec<Measure>,
}

// ============================================================================
// MEASURES AND VOICES
// ============================================================================

/// An indexed, time-bounded container of voices and non-voice elements
#[derive(Debug, Clone, Default)]
pub struct Measure {
    pub number: u32,
    /// Time signature change taking effect at this measure
    pub time_signature: Option<TimeSignature>,
    /// Key signature change, circle-of-fifths position (-7..=7)
    pub key_fifths: Option<i8>,
    /// Mid-score clef change
    pub clef_change: Option<Clef>,
    pub voices: Vec<Voice>,
    pub directions: Vec<Direction>,
    /// System break before this measure
    pub new_system: bool,
    /// Page break before this measure
    pub new_page: bool,
}

impl Measure {
    pub fn new(number: u32) -> Self {
        Measure {
            number,
            ..Measure::default()
        }
    }

    pub fn voice(&self, id: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id == id)
    }

    pub fn voice_mut(&mut self, id: &str) -> Option<&mut Voice> {
        self.voices.iter_mut().find(|v| v.id == id)
    }

    /// Whether any voice carries at least one timed event
    pub fn has_timed_content(&self) -> bool {
        self.voices.iter().any(|v| !v.events.is_empty())
    }

    /// Dynamics among this measure's directions, in stored order
    pub fn dynamics(&self) -> impl Iterator<Item = &Dynamic> {
        self.directions.iter().filter_map(|d| match d {
            Direction::Dynamic(dy) => Some(dy),
            _ => None,
        })
    }

    pub fn tempo_marks(&self) -> impl Iterator<Item = &TempoMark> {
        self.directions.iter().filter_map(|d| match d {
            Direction::Tempo(t) => Some(t),
            _ => None,
        })
    }

    pub fn rehearsal_marks(&self) -> impl Iterator<Item = &RehearsalMark> {
        self.directions.iter().filter_map(|d| match d {
            Direction::Rehearsal(r) => Some(r),
            _ => None,
        })
    }
}

/// A polyphonic stream within a measure, identified by a voice id
#[derive(Debug, Clone)]
pub struct Voice {
    pub id: String,
    pub events: Vec<Event>,
}

impl Voice {
    pub fn new(id: impl Into<String>) -> Self {
        Voice {
            id: id.into(),
            events: Vec::new(),
        }
    }

    /// Single notes in this voice, in stored order
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.events.iter().filter_map(|e| match e {
            Event::Note(n) => Some(n),
            _ => None,
        })
    }

    pub fn notes_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.events.iter_mut().filter_map(|e| match e {
            Event::Note(n) => Some(n),
            _ => None,
        })
    }
}

// ============================================================================
// TIMED EVENTS
// ============================================================================

/// A timed element within a voice
#[derive(Debug, Clone)]
pub enum Event {
    Note(Note),
    Chord(Chord),
    Rest(Rest),
}

impl Event {
    pub fn offset(&self) -> Rational {
        match self {
            Event::Note(n) => n.offset,
            Event::Chord(c) => c.offset,
            Event::Rest(r) => r.offset,
        }
    }

    pub fn duration(&self) -> Rational {
        match self {
            Event::Note(n) => n.duration,
            Event::Chord(c) => c.duration,
            Event::Rest(r) => r.duration,
        }
    }
}

/// A pitched note with optional lyric attachments and tie relation
#[derive(Debug, Clone)]
pub struct Note {
    pub id: NoteId,
    pub offset: Rational,
    pub duration: Rational,
    pub pitch: Pitch,
    pub lyrics: Vec<Lyric>,
    pub tie: Option<TieType>,
    pub grace: bool,
}

/// Simultaneous pitches sharing one stem
#[derive(Debug, Clone)]
pub struct Chord {
    pub id: NoteId,
    pub offset: Rational,
    pub duration: Rational,
    pub pitches: Vec<Pitch>,
    pub lyrics: Vec<Lyric>,
    pub tie: Option<TieType>,
    pub grace: bool,
}

#[derive(Debug, Clone)]
pub struct Rest {
    pub offset: Rational,
    pub duration: Rational,
}

/// Resolved position of a note within a score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePosition {
    pub part_index: usize,
    pub measure_number: u32,
    pub voice_id: String,
    pub offset: Rational,
    pub duration: Rational,
}

// ============================================================================
// PITCH, LYRIC, TIE
// ============================================================================

/// Musical pitch: diatonic step, chromatic alteration, octave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    /// Scale degree (0=C, 1=D, 2=E, 3=F, 4=G, 5=A, 6=B)
    pub step: u8,
    /// Accidental (-2=double flat .. +2=double sharp)
    pub alter: i8,
    /// Octave number (4 = middle C octave)
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: u8, alter: i8, octave: i8) -> Self {
        debug_assert!(step <= 6, "step must be 0-6");
        Pitch {
            step,
            alter,
            octave,
        }
    }

    /// The MusicXML step letter for this pitch
    pub fn step_name(&self) -> char {
        ['C', 'D', 'E', 'F', 'G', 'A', 'B'][self.step as usize]
    }
}

/// Lyric text with syllabic classification and verse line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyric {
    pub text: String,
    pub syllabic: Syllabic,
    pub number: u32,
}

/// Syllabic type for lyrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Syllabic {
    Single,
    Begin,
    Middle,
    End,
}

impl Syllabic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Syllabic::Single => "single",
            Syllabic::Begin => "begin",
            Syllabic::Middle => "middle",
            Syllabic::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Syllabic::Single),
            "begin" => Some(Syllabic::Begin),
            "middle" => Some(Syllabic::Middle),
            "end" => Some(Syllabic::End),
            _ => None,
        }
    }
}

/// Tie relation carried on a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieType {
    Start,
    Continue,
    Stop,
}

// ============================================================================
// DIRECTIONS AND ATTRIBUTES
// ============================================================================

/// A measure-level non-voice element at a rational offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Dynamic(Dynamic),
    Tempo(TempoMark),
    Rehearsal(RehearsalMark),
}

impl Direction {
    pub fn offset(&self) -> Rational {
        match self {
            Direction::Dynamic(d) => d.offset,
            Direction::Tempo(t) => t.offset,
            Direction::Rehearsal(r) => r.offset,
        }
    }
}

/// A dynamic mark (p, f, mp, ...) at a measure offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dynamic {
    pub value: String,
    pub offset: Rational,
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Above,
    Below,
}

/// Tempo indication: metronome mark and/or text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempoMark {
    pub text: Option<String>,
    /// Metronome beat unit ("quarter", "half", ...)
    pub beat_unit: Option<String>,
    pub per_minute: Option<u32>,
    pub offset: Rational,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RehearsalMark {
    pub text: String,
    pub offset: Rational,
}

/// Clef assignment for a part or mid-score change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clef {
    Treble,
    /// Treble clef sounding an octave lower than written
    Treble8vb,
    Bass,
}

impl Clef {
    /// MusicXML (sign, line, octave-change)
    pub fn musicxml_parts(&self) -> (&'static str, u8, i8) {
        match self {
            Clef::Treble => ("G", 2, 0),
            Clef::Treble8vb => ("G", 2, -1),
            Clef::Bass => ("F", 4, 0),
        }
    }

    pub fn from_musicxml_parts(sign: &str, line: u8, octave_change: i8) -> Option<Self> {
        match (sign, line, octave_change) {
            ("G", 2, 0) => Some(Clef::Treble),
            ("G", 2, -1) => Some(Clef::Treble8vb),
            ("F", 4, 0) => Some(Clef::Bass),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub beats: u8,
    pub beat_type: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature {
            beats: 4,
            beat_type: 4,
        }
    }
}

impl TimeSignature {
    /// Full-measure duration in quarter notes
    pub fn measure_duration(&self) -> Rational {
        Rational::new(self.beats as i32 * 4, self.beat_type as i32)
    }
}
