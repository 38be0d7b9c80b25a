//! MusicXML emission
//!
//! Serializes a `Score` back to a MusicXML partwise document through a
//! string-building pass. Divisions are computed per measure as the LCM
//! of all rational denominators appearing in it, so every emitted
//! duration is an exact integer. Slurs and wedges are re-expanded from
//! the score's spanner collection into start/stop elements anchored at
//! their endpoint notes.

use std::collections::BTreeMap;

use crate::error::SplitError;
use crate::score::{
    Chord, Clef, Direction, Dynamic, Event, Lyric, Measure, Note, NoteId, Part, Placement,
    Rational, Rest, Score, SpannerKind, TieType,
};

const DYNAMIC_ELEMENTS: &[&str] = &[
    "p", "pp", "ppp", "pppp", "f", "ff", "fff", "ffff", "mp", "mf", "sf", "sfp", "sfz", "fp",
    "rf", "rfz", "fz",
];

/// Spanner start/stop markers resolved to note identities
#[derive(Debug, Default)]
struct SpannerMarkers {
    slur_starts: BTreeMap<NoteId, Vec<u32>>,
    slur_stops: BTreeMap<NoteId, Vec<u32>>,
    wedge_starts: BTreeMap<NoteId, Vec<(SpannerKind, u32)>>,
    wedge_stops: BTreeMap<NoteId, Vec<u32>>,
}

impl SpannerMarkers {
    fn from_score(score: &Score) -> Self {
        let mut markers = SpannerMarkers::default();
        let mut slur_number = 0u32;
        let mut wedge_number = 0u32;
        for spanner in &score.spanners {
            let (Some(first), Some(last)) = (spanner.first(), spanner.last()) else {
                continue;
            };
            match spanner.kind {
                SpannerKind::Slur | SpannerKind::Line => {
                    slur_number = slur_number % 6 + 1;
                    markers.slur_starts.entry(first).or_default().push(slur_number);
                    markers.slur_stops.entry(last).or_default().push(slur_number);
                }
                SpannerKind::Crescendo | SpannerKind::Diminuendo => {
                    wedge_number = wedge_number % 6 + 1;
                    markers
                        .wedge_starts
                        .entry(first)
                        .or_default()
                        .push((spanner.kind, wedge_number));
                    markers.wedge_stops.entry(last).or_default().push(wedge_number);
                }
            }
        }
        markers
    }
}

/// Serialize a score to a MusicXML partwise document.
pub fn write_musicxml(score: &Score) -> Result<String, SplitError> {
    let markers = SpannerMarkers::from_score(score);
    let mut out = String::with_capacity(16 * 1024);

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \
         \"http://www.musicxml.org/dtds/partwise.dtd\">\n",
    );
    out.push_str("<score-partwise version=\"3.1\">\n");

    if let Some(title) = &score.metadata.work_title {
        out.push_str("  <work>\n");
        out.push_str(&format!("    <work-title>{}</work-title>\n", escape(title)));
        out.push_str("  </work>\n");
    }
    if let Some(movement) = &score.metadata.movement_title {
        out.push_str(&format!(
            "  <movement-title>{}</movement-title>\n",
            escape(movement)
        ));
    }
    if score.metadata.composer.is_some() || score.metadata.lyricist.is_some() {
        out.push_str("  <identification>\n");
        if let Some(composer) = &score.metadata.composer {
            out.push_str(&format!(
                "    <creator type=\"composer\">{}</creator>\n",
                escape(composer)
            ));
        }
        if let Some(lyricist) = &score.metadata.lyricist {
            out.push_str(&format!(
                "    <creator type=\"lyricist\">{}</creator>\n",
                escape(lyricist)
            ));
        }
        out.push_str("  </identification>\n");
    }

    out.push_str("  <part-list>\n");
    for part in &score.parts {
        out.push_str(&format!("    <score-part id=\"{}\">\n", escape(&part.id)));
        out.push_str(&format!(
            "      <part-name>{}</part-name>\n",
            escape(part.name.as_deref().unwrap_or("Music"))
        ));
        out.push_str("    </score-part>\n");
    }
    out.push_str("  </part-list>\n");

    for part in &score.parts {
        write_part(&mut out, part, &markers)?;
    }

    out.push_str("</score-partwise>\n");
    Ok(out)
}

fn write_part(out: &mut String, part: &Part, markers: &SpannerMarkers) -> Result<(), SplitError> {
    out.push_str(&format!("  <part id=\"{}\">\n", escape(&part.id)));
    for (index, measure) in part.measures.iter().enumerate() {
        write_measure(out, measure, part, index == 0, markers)?;
    }
    out.push_str("  </part>\n");
    Ok(())
}

fn write_measure(
    out: &mut String,
    measure: &Measure,
    part: &Part,
    is_first: bool,
    markers: &SpannerMarkers,
) -> Result<(), SplitError> {
    let divisions = measure_divisions(measure);
    out.push_str(&format!("    <measure number=\"{}\">\n", measure.number));

    if measure.new_system || measure.new_page {
        let mut print = String::from("      <print");
        if measure.new_system {
            print.push_str(" new-system=\"yes\"");
        }
        if measure.new_page {
            print.push_str(" new-page=\"yes\"");
        }
        print.push_str("/>\n");
        out.push_str(&print);
    }

    let clef = if is_first {
        part.clef
    } else {
        measure.clef_change
    };
    out.push_str("      <attributes>\n");
    out.push_str(&format!("        <divisions>{}</divisions>\n", divisions));
    if let Some(fifths) = measure.key_fifths {
        out.push_str(&format!(
            "        <key><fifths>{}</fifths></key>\n",
            fifths
        ));
    }
    if let Some(time) = measure.time_signature {
        out.push_str(&format!(
            "        <time><beats>{}</beats><beat-type>{}</beat-type></time>\n",
            time.beats, time.beat_type
        ));
    }
    if let Some(clef) = clef {
        write_clef(out, clef);
    }
    out.push_str("      </attributes>\n");

    // Directions interleave with the first voice's events by offset.
    let mut directions: Vec<&Direction> = measure.directions.iter().collect();
    directions.sort_by_key(|d| d.offset());
    let mut next_direction = 0usize;

    for (voice_index, voice) in measure.voices.iter().enumerate() {
        let mut cursor = 0i64;
        if voice_index > 0 {
            // Rewind to the start of the measure for the next voice.
            let span: i64 = voice_span(&measure.voices[voice_index - 1], divisions);
            if span > 0 {
                out.push_str(&format!(
                    "      <backup><duration>{}</duration></backup>\n",
                    span
                ));
            }
        }

        for event in &voice.events {
            let event_divs = to_divisions(event.offset(), divisions);
            if voice_index == 0 {
                while next_direction < directions.len()
                    && directions[next_direction].offset() <= event.offset()
                {
                    write_direction(out, directions[next_direction], divisions);
                    next_direction += 1;
                }
            }
            if event_divs > cursor {
                out.push_str(&format!(
                    "      <forward><duration>{}</duration></forward>\n",
                    event_divs - cursor
                ));
                cursor = event_divs;
            }

            match event {
                Event::Note(note) => {
                    write_wedge_starts(out, note.id, markers);
                    write_note(out, note, &voice.id, divisions, markers);
                    write_wedge_stops(out, note.id, markers);
                    if !note.grace {
                        cursor += to_divisions(note.duration, divisions);
                    }
                }
                Event::Chord(chord) => {
                    write_wedge_starts(out, chord.id, markers);
                    write_chord(out, chord, &voice.id, divisions, markers);
                    write_wedge_stops(out, chord.id, markers);
                    if !chord.grace {
                        cursor += to_divisions(chord.duration, divisions);
                    }
                }
                Event::Rest(rest) => {
                    write_rest(out, rest, &voice.id, divisions);
                    cursor += to_divisions(rest.duration, divisions);
                }
            }
        }
    }

    // Directions past the last event still belong to this measure.
    while next_direction < directions.len() {
        write_direction(out, directions[next_direction], divisions);
        next_direction += 1;
    }

    out.push_str("    </measure>\n");
    Ok(())
}

fn write_clef(out: &mut String, clef: Clef) {
    let (sign, line, octave_change) = clef.musicxml_parts();
    out.push_str("        <clef>\n");
    out.push_str(&format!("          <sign>{}</sign>\n", sign));
    out.push_str(&format!("          <line>{}</line>\n", line));
    if octave_change != 0 {
        out.push_str(&format!(
            "          <clef-octave-change>{}</clef-octave-change>\n",
            octave_change
        ));
    }
    out.push_str("        </clef>\n");
}

fn write_direction(out: &mut String, direction: &Direction, _divisions: i64) {
    match direction {
        Direction::Dynamic(dynamic) => write_dynamic(out, dynamic),
        Direction::Tempo(tempo) => {
            out.push_str("      <direction placement=\"above\">\n");
            out.push_str("        <direction-type>\n");
            if let Some(text) = &tempo.text {
                out.push_str(&format!(
                    "          <words>{}</words>\n",
                    escape(text)
                ));
            }
            if tempo.beat_unit.is_some() || tempo.per_minute.is_some() {
                out.push_str("          <metronome>\n");
                if let Some(unit) = &tempo.beat_unit {
                    out.push_str(&format!(
                        "            <beat-unit>{}</beat-unit>\n",
                        escape(unit)
                    ));
                }
                if let Some(bpm) = tempo.per_minute {
                    out.push_str(&format!(
                        "            <per-minute>{}</per-minute>\n",
                        bpm
                    ));
                }
                out.push_str("          </metronome>\n");
            }
            out.push_str("        </direction-type>\n");
            if let Some(bpm) = tempo.per_minute {
                out.push_str(&format!("        <sound tempo=\"{}\"/>\n", bpm));
            }
            out.push_str("      </direction>\n");
        }
        Direction::Rehearsal(mark) => {
            out.push_str("      <direction placement=\"above\">\n");
            out.push_str("        <direction-type>\n");
            out.push_str(&format!(
                "          <rehearsal>{}</rehearsal>\n",
                escape(&mark.text)
            ));
            out.push_str("        </direction-type>\n");
            out.push_str("      </direction>\n");
        }
    }
}

fn write_dynamic(out: &mut String, dynamic: &Dynamic) {
    let placement = match dynamic.placement {
        Some(Placement::Above) => " placement=\"above\"",
        Some(Placement::Below) => " placement=\"below\"",
        None => "",
    };
    out.push_str(&format!("      <direction{}>\n", placement));
    out.push_str("        <direction-type>\n");
    if DYNAMIC_ELEMENTS.contains(&dynamic.value.as_str()) {
        out.push_str(&format!(
            "          <dynamics><{}/></dynamics>\n",
            dynamic.value
        ));
    } else {
        out.push_str(&format!(
            "          <dynamics><other-dynamics>{}</other-dynamics></dynamics>\n",
            escape(&dynamic.value)
        ));
    }
    out.push_str("        </direction-type>\n");
    out.push_str("      </direction>\n");
}

fn write_wedge_starts(out: &mut String, id: NoteId, markers: &SpannerMarkers) {
    if let Some(starts) = markers.wedge_starts.get(&id) {
        for (kind, number) in starts {
            let wedge_type = match kind {
                SpannerKind::Crescendo => "crescendo",
                SpannerKind::Diminuendo => "diminuendo",
                _ => continue,
            };
            out.push_str("      <direction>\n");
            out.push_str("        <direction-type>\n");
            out.push_str(&format!(
                "          <wedge type=\"{}\" number=\"{}\"/>\n",
                wedge_type, number
            ));
            out.push_str("        </direction-type>\n");
            out.push_str("      </direction>\n");
        }
    }
}

fn write_wedge_stops(out: &mut String, id: NoteId, markers: &SpannerMarkers) {
    if let Some(stops) = markers.wedge_stops.get(&id) {
        for number in stops {
            out.push_str("      <direction>\n");
            out.push_str("        <direction-type>\n");
            out.push_str(&format!(
                "          <wedge type=\"stop\" number=\"{}\"/>\n",
                number
            ));
            out.push_str("        </direction-type>\n");
            out.push_str("      </direction>\n");
        }
    }
}

fn write_note(
    out: &mut String,
    note: &Note,
    voice_id: &str,
    divisions: i64,
    markers: &SpannerMarkers,
) {
    out.push_str("      <note>\n");
    if note.grace {
        out.push_str("        <grace/>\n");
    }
    write_pitch(out, &note.pitch);
    if !note.grace {
        out.push_str(&format!(
            "        <duration>{}</duration>\n",
            to_divisions(note.duration, divisions)
        ));
    }
    write_tie_elements(out, note.tie);
    out.push_str(&format!("        <voice>{}</voice>\n", escape(voice_id)));
    write_type_and_dots(out, note.duration, note.grace);
    write_notations(out, note.id, note.tie, markers);
    for lyric in &note.lyrics {
        write_lyric(out, lyric);
    }
    out.push_str("      </note>\n");
}

fn write_chord(
    out: &mut String,
    chord: &Chord,
    voice_id: &str,
    divisions: i64,
    markers: &SpannerMarkers,
) {
    for (index, pitch) in chord.pitches.iter().enumerate() {
        out.push_str("      <note>\n");
        if index > 0 {
            out.push_str("        <chord/>\n");
        }
        if chord.grace {
            out.push_str("        <grace/>\n");
        }
        write_pitch(out, pitch);
        if !chord.grace {
            out.push_str(&format!(
                "        <duration>{}</duration>\n",
                to_divisions(chord.duration, divisions)
            ));
        }
        if index == 0 {
            write_tie_elements(out, chord.tie);
        }
        out.push_str(&format!("        <voice>{}</voice>\n", escape(voice_id)));
        write_type_and_dots(out, chord.duration, chord.grace);
        if index == 0 {
            write_notations(out, chord.id, chord.tie, markers);
            for lyric in &chord.lyrics {
                write_lyric(out, lyric);
            }
        }
        out.push_str("      </note>\n");
    }
}

fn write_rest(out: &mut String, rest: &Rest, voice_id: &str, divisions: i64) {
    out.push_str("      <note>\n");
    out.push_str("        <rest/>\n");
    out.push_str(&format!(
        "        <duration>{}</duration>\n",
        to_divisions(rest.duration, divisions)
    ));
    out.push_str(&format!("        <voice>{}</voice>\n", escape(voice_id)));
    write_type_and_dots(out, rest.duration, false);
    out.push_str("      </note>\n");
}

fn write_pitch(out: &mut String, pitch: &crate::score::Pitch) {
    out.push_str("        <pitch>\n");
    out.push_str(&format!("          <step>{}</step>\n", pitch.step_name()));
    if pitch.alter != 0 {
        out.push_str(&format!("          <alter>{}</alter>\n", pitch.alter));
    }
    out.push_str(&format!("          <octave>{}</octave>\n", pitch.octave));
    out.push_str("        </pitch>\n");
}

fn write_tie_elements(out: &mut String, tie: Option<TieType>) {
    match tie {
        Some(TieType::Start) => out.push_str("        <tie type=\"start\"/>\n"),
        Some(TieType::Stop) => out.push_str("        <tie type=\"stop\"/>\n"),
        Some(TieType::Continue) => {
            out.push_str("        <tie type=\"stop\"/>\n");
            out.push_str("        <tie type=\"start\"/>\n");
        }
        None => {}
    }
}

fn write_type_and_dots(out: &mut String, duration: Rational, grace: bool) {
    if grace {
        out.push_str("        <type>eighth</type>\n");
        return;
    }
    if let Some((type_name, dots)) = duration_to_type(duration) {
        out.push_str(&format!("        <type>{}</type>\n", type_name));
        for _ in 0..dots {
            out.push_str("        <dot/>\n");
        }
    }
}

fn write_notations(out: &mut String, id: NoteId, tie: Option<TieType>, markers: &SpannerMarkers) {
    let slur_starts = markers.slur_starts.get(&id);
    let slur_stops = markers.slur_stops.get(&id);
    let has_tied = tie.is_some();
    if slur_starts.is_none() && slur_stops.is_none() && !has_tied {
        return;
    }
    out.push_str("        <notations>\n");
    match tie {
        Some(TieType::Start) => out.push_str("          <tied type=\"start\"/>\n"),
        Some(TieType::Stop) => out.push_str("          <tied type=\"stop\"/>\n"),
        Some(TieType::Continue) => {
            out.push_str("          <tied type=\"stop\"/>\n");
            out.push_str("          <tied type=\"start\"/>\n");
        }
        None => {}
    }
    if let Some(stops) = slur_stops {
        for number in stops {
            out.push_str(&format!(
                "          <slur type=\"stop\" number=\"{}\"/>\n",
                number
            ));
        }
    }
    if let Some(starts) = slur_starts {
        for number in starts {
            out.push_str(&format!(
                "          <slur type=\"start\" number=\"{}\"/>\n",
                number
            ));
        }
    }
    out.push_str("        </notations>\n");
}

fn write_lyric(out: &mut String, lyric: &Lyric) {
    out.push_str(&format!("        <lyric number=\"{}\">\n", lyric.number));
    out.push_str(&format!(
        "          <syllabic>{}</syllabic>\n",
        lyric.syllabic.as_str()
    ));
    out.push_str(&format!("          <text>{}</text>\n", escape(&lyric.text)));
    out.push_str("        </lyric>\n");
}

// ============================================================================
// DURATION ARITHMETIC
// ============================================================================

/// LCM of every rational denominator appearing in the measure, so all
/// emitted durations are exact integers.
fn measure_divisions(measure: &Measure) -> i64 {
    let mut result: i64 = 1;
    let mut fold = |r: Rational| {
        result = lcm(result, *r.denom() as i64);
    };
    for voice in &measure.voices {
        for event in &voice.events {
            fold(event.offset());
            fold(event.duration());
        }
    }
    for direction in &measure.directions {
        fold(direction.offset());
    }
    result
}

fn to_divisions(value: Rational, divisions: i64) -> i64 {
    *value.numer() as i64 * (divisions / *value.denom() as i64)
}

fn voice_span(voice: &crate::score::Voice, divisions: i64) -> i64 {
    voice
        .events
        .iter()
        .map(|e| to_divisions(e.offset() + e.duration(), divisions))
        .max()
        .unwrap_or(0)
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: i64, b: i64) -> i64 {
    a / gcd(a, b) * b
}

/// Map a quarter-note duration to a MusicXML note type and dot count
fn duration_to_type(duration: Rational) -> Option<(&'static str, u8)> {
    const BASES: &[(i32, i32, &str)] = &[
        (4, 1, "whole"),
        (2, 1, "half"),
        (1, 1, "quarter"),
        (1, 2, "eighth"),
        (1, 4, "16th"),
        (1, 8, "32nd"),
        (1, 16, "64th"),
    ];
    for &(num, den, name) in BASES {
        let base = Rational::new(num, den);
        if duration == base {
            return Some((name, 0));
        }
        if duration == base * Rational::new(3, 2) {
            return Some((name, 1));
        }
        if duration == base * Rational::new(7, 4) {
            return Some((name, 2));
        }
    }
    None
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{Event, Part, Pitch, Syllabic, Voice};

    fn r(n: i32) -> Rational {
        Rational::from_integer(n)
    }

    fn simple_score() -> Score {
        let mut score = Score::new();
        score.metadata.work_title = Some("Abendlied (Tenor)".to_string());
        score.metadata.movement_title = Some("Abendlied (Tenor)".to_string());
        let mut measure = Measure::new(1);
        measure.time_signature = Some(crate::score::TimeSignature {
            beats: 4,
            beat_type: 4,
        });
        let mut voice = Voice::new("5");
        let id = score.fresh_note_id();
        voice.events.push(Event::Note(Note {
            id,
            offset: r(0),
            duration: Rational::new(3, 2),
            pitch: Pitch::new(4, 1, 4),
            lyrics: vec![Lyric {
                text: "Sun".to_string(),
                syllabic: Syllabic::Single,
                number: 1,
            }],
            tie: None,
            grace: false,
        }));
        measure.voices.push(voice);
        score.parts.push(Part {
            id: "P1".to_string(),
            name: Some("Tenor".to_string()),
            clef: Some(Clef::Treble8vb),
            measures: vec![measure],
        });
        score
    }

    #[test]
    fn test_emits_titles_and_part_list() {
        let xml = write_musicxml(&simple_score()).unwrap();
        assert!(xml.contains("<work-title>Abendlied (Tenor)</work-title>"));
        assert!(xml.contains("<movement-title>Abendlied (Tenor)</movement-title>"));
        assert!(xml.contains("<part-name>Tenor</part-name>"));
    }

    #[test]
    fn test_emits_tenor_octave_clef() {
        let xml = write_musicxml(&simple_score()).unwrap();
        assert!(xml.contains("<sign>G</sign>"));
        assert!(xml.contains("<clef-octave-change>-1</clef-octave-change>"));
    }

    #[test]
    fn test_dotted_quarter_divisions_and_type() {
        let xml = write_musicxml(&simple_score()).unwrap();
        // 3/2 quarter notes with divisions 2 gives duration 3.
        assert!(xml.contains("<divisions>2</divisions>"));
        assert!(xml.contains("<duration>3</duration>"));
        assert!(xml.contains("<type>quarter</type>"));
        assert!(xml.contains("<dot/>"));
    }

    #[test]
    fn test_emits_lyric_with_syllabic() {
        let xml = write_musicxml(&simple_score()).unwrap();
        assert!(xml.contains("<syllabic>single</syllabic>"));
        assert!(xml.contains("<text>Sun</text>"));
    }

    #[test]
    fn test_escapes_metadata() {
        let mut score = simple_score();
        score.metadata.work_title = Some("Dawn & Dusk <draft>".to_string());
        let xml = write_musicxml(&score).unwrap();
        assert!(xml.contains("Dawn &amp; Dusk &lt;draft&gt;"));
    }

    #[test]
    fn test_duration_to_type_table() {
        assert_eq!(duration_to_type(r(4)), Some(("whole", 0)));
        assert_eq!(duration_to_type(r(3)), Some(("half", 1)));
        assert_eq!(duration_to_type(r(1)), Some(("quarter", 0)));
        assert_eq!(duration_to_type(Rational::new(1, 2)), Some(("eighth", 0)));
        assert_eq!(duration_to_type(Rational::new(3, 4)), Some(("eighth", 1)));
        assert_eq!(duration_to_type(Rational::new(7, 4)), Some(("quarter", 2)));
        assert_eq!(duration_to_type(Rational::new(5, 7)), None);
    }

    #[test]
    fn test_wedge_emitted_as_directions() {
        let mut score = simple_score();
        let id2 = score.fresh_note_id();
        let first_id = score.parts[0].measures[0].voices[0]
            .notes()
            .next()
            .unwrap()
            .id;
        score.parts[0].measures[0].voices[0]
            .events
            .push(Event::Note(Note {
                id: id2,
                offset: Rational::new(3, 2),
                duration: Rational::new(1, 2),
                pitch: Pitch::new(5, 0, 4),
                lyrics: Vec::new(),
                tie: None,
                grace: false,
            }));
        score.spanners.push(crate::score::Spanner::new(
            SpannerKind::Crescendo,
            vec![first_id, id2],
        ));

        let xml = write_musicxml(&score).unwrap();
        assert!(xml.contains("<wedge type=\"crescendo\" number=\"1\"/>"));
        assert!(xml.contains("<wedge type=\"stop\" number=\"1\"/>"));
        let start_pos = xml.find("crescendo").unwrap();
        let stop_pos = xml.find("type=\"stop\"").unwrap();
        assert!(start_pos < stop_pos);
    }

    #[test]
    fn test_multi_voice_measure_uses_backup() {
        let mut score = simple_score();
        let id = score.fresh_note_id();
        let mut v2 = Voice::new("6");
        v2.events.push(Event::Note(Note {
            id,
            offset: r(0),
            duration: r(2),
            pitch: Pitch::new(0, 0, 3),
            lyrics: Vec::new(),
            tie: None,
            grace: false,
        }));
        score.parts[0].measures[0].voices.push(v2);

        let xml = write_musicxml(&score).unwrap();
        assert!(xml.contains("<backup>"));
        assert!(xml.contains("<voice>6</voice>"));
    }
}
