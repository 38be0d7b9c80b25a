//! MusicXML parsing layer
//!
//! Parses MusicXML partwise documents into the score model using
//! roxmltree. The parser maintains a divisions-based cursor per measure,
//! honoring `<backup>`/`<forward>`, and assembles the note-referencing
//! spanner collection from slur notations and wedge directions as it
//! goes. Slur and wedge elements are matched by their MusicXML number
//! attribute within one part.

use std::collections::BTreeMap;

use roxmltree::{Document, Node};

use crate::error::SplitError;
use crate::score::{
    Chord, Clef, Direction, Dynamic, Event, Lyric, Measure, Note, NoteId, Part, Pitch, Placement,
    Rational, RehearsalMark, Rest, Score, Spanner, SpannerKind, Syllabic, TempoMark,
    TieType, TimeSignature, Voice,
};

/// Parse a MusicXML partwise document into a `Score`.
pub fn parse_musicxml(xml: &str) -> Result<Score, SplitError> {
    // roxmltree rejects DTDs; MusicXML files routinely carry one.
    let cleaned: String = if xml.contains("<!DOCTYPE") {
        xml.lines()
            .filter(|line| !line.trim_start().starts_with("<!DOCTYPE"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        xml.to_string()
    };

    let doc = Document::parse(&cleaned)
        .map_err(|e| SplitError::Parse(format!("malformed XML: {}", e)))?;
    let root = doc.root_element();
    if root.tag_name().name() != "score-partwise" {
        return Err(SplitError::Parse(format!(
            "expected score-partwise, found {}",
            root.tag_name().name()
        )));
    }

    let mut score = Score::new();
    parse_metadata(root, &mut score);
    let part_names = parse_part_list(root);

    for part_node in root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "part")
    {
        let part = parse_part(part_node, &part_names, &mut score)?;
        score.parts.push(part);
    }

    if score.parts.is_empty() {
        return Err(SplitError::Parse("no parts found in score".to_string()));
    }

    log::debug!(
        "parsed score: {} part(s), {} spanner(s)",
        score.parts.len(),
        score.spanners.len()
    );
    Ok(score)
}

fn parse_metadata(root: Node, score: &mut Score) {
    if let Some(work) = get_child(root, "work") {
        score.metadata.work_title = get_child_text(work, "work-title");
    }
    score.metadata.movement_title = get_child_text(root, "movement-title");
    if let Some(identification) = get_child(root, "identification") {
        for creator in identification
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "creator")
        {
            let text = get_text(creator);
            match creator.attribute("type") {
                Some("composer") => score.metadata.composer = text,
                Some("lyricist") | Some("poet") => score.metadata.lyricist = text,
                _ => {}
            }
        }
    }
}

/// Part id → part name from `<part-list>`
fn parse_part_list(root: Node) -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();
    let Some(part_list) = get_child(root, "part-list") else {
        return names;
    };
    for score_part in part_list
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "score-part")
    {
        if let (Some(id), Some(name)) = (
            score_part.attribute("id"),
            get_child_text(score_part, "part-name"),
        ) {
            names.insert(id.to_string(), name);
        }
    }
    names
}

/// In-flight wedge, opened by a start element and closed by a stop
struct OpenWedge {
    kind: SpannerKind,
    start_measure: u32,
    start_offset: Rational,
}

/// Completed wedge span, resolved to note endpoints after the part parse
struct WedgeRange {
    kind: SpannerKind,
    start_measure: u32,
    start_offset: Rational,
    stop_measure: u32,
    stop_offset: Rational,
}

fn parse_part(
    part_node: Node,
    part_names: &BTreeMap<String, String>,
    score: &mut Score,
) -> Result<Part, SplitError> {
    let part_id = part_node.attribute("id").unwrap_or("P1").to_string();
    let mut part = Part {
        name: part_names.get(&part_id).cloned(),
        id: part_id,
        clef: None,
        measures: Vec::new(),
    };

    let mut divisions: i32 = 1;
    let mut open_slurs: BTreeMap<u32, NoteId> = BTreeMap::new();
    let mut open_wedges: BTreeMap<u32, OpenWedge> = BTreeMap::new();
    let mut wedge_ranges: Vec<WedgeRange> = Vec::new();

    for (index, measure_node) in part_node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "measure")
        .enumerate()
    {
        let number = measure_node
            .attribute("number")
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(index as u32 + 1);
        let mut measure = Measure::new(number);
        let mut cursor = Rational::from_integer(0);

        for child in measure_node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                "attributes" => {
                    parse_attributes(child, &mut measure, &mut part, &mut divisions);
                }
                "note" => {
                    parse_note(
                        child,
                        divisions,
                        &mut cursor,
                        &mut measure,
                        &mut open_slurs,
                        score,
                    )?;
                }
                "backup" => {
                    let d = duration_of(child, divisions)?;
                    cursor -= d;
                }
                "forward" => {
                    let d = duration_of(child, divisions)?;
                    cursor += d;
                }
                "direction" => {
                    parse_direction(
                        child,
                        cursor,
                        &mut measure,
                        &mut open_wedges,
                        &mut wedge_ranges,
                    );
                }
                "print" => {
                    if child.attribute("new-system") == Some("yes") {
                        measure.new_system = true;
                    }
                    if child.attribute("new-page") == Some("yes") {
                        measure.new_page = true;
                    }
                }
                _ => {} // harmony, barline, sound
            }
        }

        part.measures.push(measure);
    }

    resolve_wedges(&part, wedge_ranges, score);

    if !open_slurs.is_empty() {
        log::warn!(
            "part {}: {} slur(s) never closed, discarded",
            part.id,
            open_slurs.len()
        );
    }

    Ok(part)
}

fn parse_attributes(node: Node, measure: &mut Measure, part: &mut Part, divisions: &mut i32) {
    if let Some(d) = get_child_text(node, "divisions").and_then(|t| t.parse::<i32>().ok()) {
        if d > 0 {
            *divisions = d;
        }
    }
    if let Some(key) = get_child(node, "key") {
        measure.key_fifths = get_child_text(key, "fifths").and_then(|t| t.parse::<i8>().ok());
    }
    if let Some(time) = get_child(node, "time") {
        let beats = get_child_text(time, "beats").and_then(|t| t.parse::<u8>().ok());
        let beat_type = get_child_text(time, "beat-type").and_then(|t| t.parse::<u8>().ok());
        if let (Some(beats), Some(beat_type)) = (beats, beat_type) {
            measure.time_signature = Some(TimeSignature { beats, beat_type });
        }
    }
    if let Some(clef_node) = get_child(node, "clef") {
        let sign = get_child_text(clef_node, "sign").unwrap_or_default();
        let line = get_child_text(clef_node, "line")
            .and_then(|t| t.parse::<u8>().ok())
            .unwrap_or(match sign.as_str() {
                "F" => 4,
                _ => 2,
            });
        let octave_change = get_child_text(clef_node, "clef-octave-change")
            .and_then(|t| t.parse::<i8>().ok())
            .unwrap_or(0);
        if let Some(clef) = Clef::from_musicxml_parts(&sign, line, octave_change) {
            if part.clef.is_none() && part.measures.is_empty() {
                part.clef = Some(clef);
            } else {
                measure.clef_change = Some(clef);
            }
        }
    }
}

fn parse_note(
    node: Node,
    divisions: i32,
    cursor: &mut Rational,
    measure: &mut Measure,
    open_slurs: &mut BTreeMap<u32, NoteId>,
    score: &mut Score,
) -> Result<(), SplitError> {
    let grace = get_child(node, "grace").is_some();
    let is_chord_follower = get_child(node, "chord").is_some();
    let is_rest = get_child(node, "rest").is_some();
    let voice_id = get_child_text(node, "voice").unwrap_or_else(|| "1".to_string());

    let duration = if grace {
        Rational::from_integer(0)
    } else {
        duration_of(node, divisions)?
    };

    if is_rest {
        let voice = voice_entry(measure, &voice_id);
        voice.events.push(Event::Rest(Rest {
            offset: *cursor,
            duration,
        }));
        *cursor += duration;
        return Ok(());
    }

    let pitch = parse_pitch(node).ok_or_else(|| {
        SplitError::Parse(format!(
            "note without pitch or rest in measure {}",
            measure.number
        ))
    })?;

    if is_chord_follower {
        // Fold into the preceding event of the same voice.
        let voice = voice_entry(measure, &voice_id);
        let promoted = match voice.events.last_mut() {
            Some(Event::Note(prev)) => Some(Chord {
                id: prev.id,
                offset: prev.offset,
                duration: prev.duration,
                pitches: vec![prev.pitch, pitch],
                lyrics: std::mem::take(&mut prev.lyrics),
                tie: prev.tie,
                grace: prev.grace,
            }),
            Some(Event::Chord(prev)) => {
                prev.pitches.push(pitch);
                None
            }
            _ => {
                return Err(SplitError::Parse(format!(
                    "chord note with no preceding note in measure {}",
                    measure.number
                )));
            }
        };
        if let Some(chord) = promoted {
            *voice.events.last_mut().unwrap() = Event::Chord(chord);
        }
        return Ok(());
    }

    let id = score.fresh_note_id();
    let note = Note {
        id,
        offset: *cursor,
        duration,
        pitch,
        lyrics: parse_lyrics(node),
        tie: parse_tie(node),
        grace,
    };

    // Slur notations reference the enclosing note.
    if let Some(notations) = get_child(node, "notations") {
        for slur in notations
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "slur")
        {
            let number = slur
                .attribute("number")
                .and_then(|n| n.parse::<u32>().ok())
                .unwrap_or(1);
            match slur.attribute("type") {
                Some("start") => {
                    open_slurs.insert(number, id);
                }
                Some("stop") => {
                    if let Some(start_id) = open_slurs.remove(&number) {
                        score
                            .spanners
                            .push(Spanner::new(SpannerKind::Slur, vec![start_id, id]));
                    } else {
                        log::warn!(
                            "slur stop without start in measure {}, ignored",
                            measure.number
                        );
                    }
                }
                _ => {}
            }
        }
    }

    let voice = voice_entry(measure, &voice_id);
    voice.events.push(Event::Note(note));
    if !grace {
        *cursor += duration;
    }
    Ok(())
}

fn parse_direction(
    node: Node,
    cursor: Rational,
    measure: &mut Measure,
    open_wedges: &mut BTreeMap<u32, OpenWedge>,
    wedge_ranges: &mut Vec<WedgeRange>,
) {
    let placement = match node.attribute("placement") {
        Some("above") => Some(Placement::Above),
        Some("below") => Some(Placement::Below),
        _ => None,
    };
    let has_sound_tempo = get_child(node, "sound")
        .and_then(|s| s.attribute("tempo"))
        .is_some();

    for dtype in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "direction-type")
    {
        for item in dtype.children().filter(|n| n.is_element()) {
            match item.tag_name().name() {
                "dynamics" => {
                    if let Some(mark) = item.children().find(|n| n.is_element()) {
                        let value = match mark.tag_name().name() {
                            "other-dynamics" => get_text(mark).unwrap_or_default(),
                            name => name.to_string(),
                        };
                        if !value.is_empty() {
                            measure.directions.push(Direction::Dynamic(Dynamic {
                                value,
                                offset: cursor,
                                placement,
                            }));
                        }
                    }
                }
                "wedge" => {
                    let number = item
                        .attribute("number")
                        .and_then(|n| n.parse::<u32>().ok())
                        .unwrap_or(1);
                    match item.attribute("type") {
                        Some("crescendo") => {
                            open_wedges.insert(
                                number,
                                OpenWedge {
                                    kind: SpannerKind::Crescendo,
                                    start_measure: measure.number,
                                    start_offset: cursor,
                                },
                            );
                        }
                        Some("diminuendo") => {
                            open_wedges.insert(
                                number,
                                OpenWedge {
                                    kind: SpannerKind::Diminuendo,
                                    start_measure: measure.number,
                                    start_offset: cursor,
                                },
                            );
                        }
                        Some("stop") => {
                            if let Some(open) = open_wedges.remove(&number) {
                                wedge_ranges.push(WedgeRange {
                                    kind: open.kind,
                                    start_measure: open.start_measure,
                                    start_offset: open.start_offset,
                                    stop_measure: measure.number,
                                    stop_offset: cursor,
                                });
                            } else {
                                log::warn!(
                                    "wedge stop without start in measure {}, ignored",
                                    measure.number
                                );
                            }
                        }
                        _ => {}
                    }
                }
                "metronome" => {
                    let beat_unit = get_child_text(item, "beat-unit");
                    let per_minute =
                        get_child_text(item, "per-minute").and_then(|t| t.parse::<u32>().ok());
                    if beat_unit.is_some() || per_minute.is_some() {
                        measure.directions.push(Direction::Tempo(TempoMark {
                            text: None,
                            beat_unit,
                            per_minute,
                            offset: cursor,
                        }));
                    }
                }
                "words" if has_sound_tempo => {
                    if let Some(text) = get_text(item) {
                        measure.directions.push(Direction::Tempo(TempoMark {
                            text: Some(text),
                            beat_unit: None,
                            per_minute: None,
                            offset: cursor,
                        }));
                    }
                }
                "rehearsal" => {
                    if let Some(text) = get_text(item) {
                        measure.directions.push(Direction::Rehearsal(RehearsalMark {
                            text,
                            offset: cursor,
                        }));
                    }
                }
                _ => {}
            }
        }
    }
}

/// Resolve completed wedge ranges to note endpoints within one voice of
/// the part. The endpoint voice is the first (lowest id) voice with a
/// note at the wedge's start; the stop endpoint is the last note of the
/// same voice at or before the stop position. Unresolvable wedges are
/// dropped with a warning.
fn resolve_wedges(part: &Part, ranges: Vec<WedgeRange>, score: &mut Score) {
    for range in ranges {
        let Some((voice_id, start_id)) =
            first_note_at_or_after(part, range.start_measure, range.start_offset)
        else {
            log::warn!(
                "wedge in measure {} has no start note, dropped",
                range.start_measure
            );
            continue;
        };
        let Some(stop_id) =
            last_note_at_or_before(part, &voice_id, range.stop_measure, range.stop_offset)
        else {
            log::warn!(
                "wedge ending in measure {} has no stop note, dropped",
                range.stop_measure
            );
            continue;
        };
        let notes = if start_id == stop_id {
            vec![start_id]
        } else {
            vec![start_id, stop_id]
        };
        score.spanners.push(Spanner::new(range.kind, notes));
    }
}

fn first_note_at_or_after(
    part: &Part,
    measure_number: u32,
    offset: Rational,
) -> Option<(String, NoteId)> {
    let measure = part.measures.iter().find(|m| m.number == measure_number)?;
    let mut voices: Vec<&Voice> = measure.voices.iter().collect();
    voices.sort_by(|a, b| a.id.cmp(&b.id));
    for voice in voices {
        let mut best: Option<(Rational, NoteId)> = None;
        for event in &voice.events {
            let (id, event_offset) = match event {
                Event::Note(n) if !n.grace => (n.id, n.offset),
                Event::Chord(c) if !c.grace => (c.id, c.offset),
                _ => continue,
            };
            if event_offset >= offset && best.map(|(o, _)| event_offset < o).unwrap_or(true) {
                best = Some((event_offset, id));
            }
        }
        if let Some((_, id)) = best {
            return Some((voice.id.clone(), id));
        }
    }
    None
}

fn last_note_at_or_before(
    part: &Part,
    voice_id: &str,
    measure_number: u32,
    offset: Rational,
) -> Option<NoteId> {
    let measure = part.measures.iter().find(|m| m.number == measure_number)?;
    let voice = measure.voice(voice_id)?;
    let mut best: Option<(Rational, NoteId)> = None;
    for event in &voice.events {
        let (id, event_offset) = match event {
            Event::Note(n) if !n.grace => (n.id, n.offset),
            Event::Chord(c) if !c.grace => (c.id, c.offset),
            _ => continue,
        };
        if event_offset <= offset && best.map(|(o, _)| event_offset >= o).unwrap_or(true) {
            best = Some((event_offset, id));
        }
    }
    best.map(|(_, id)| id)
}

fn voice_entry<'m>(measure: &'m mut Measure, voice_id: &str) -> &'m mut Voice {
    if let Some(index) = measure.voices.iter().position(|v| v.id == voice_id) {
        return &mut measure.voices[index];
    }
    measure.voices.push(Voice::new(voice_id));
    measure.voices.last_mut().unwrap()
}

fn parse_pitch(node: Node) -> Option<Pitch> {
    let pitch = get_child(node, "pitch")?;
    let step = match get_child_text(pitch, "step")?.as_str() {
        "C" => 0,
        "D" => 1,
        "E" => 2,
        "F" => 3,
        "G" => 4,
        "A" => 5,
        "B" => 6,
        _ => return None,
    };
    let alter = get_child_text(pitch, "alter")
        .and_then(|t| t.parse::<f32>().ok())
        .map(|a| a.round() as i8)
        .unwrap_or(0);
    let octave = get_child_text(pitch, "octave").and_then(|t| t.parse::<i8>().ok())?;
    Some(Pitch::new(step, alter, octave))
}

fn parse_tie(node: Node) -> Option<TieType> {
    let mut start = false;
    let mut stop = false;
    for tie in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "tie")
    {
        match tie.attribute("type") {
            Some("start") => start = true,
            Some("stop") => stop = true,
            _ => {}
        }
    }
    match (start, stop) {
        (true, true) => Some(TieType::Continue),
        (true, false) => Some(TieType::Start),
        (false, true) => Some(TieType::Stop),
        (false, false) => None,
    }
}

fn parse_lyrics(node: Node) -> Vec<Lyric> {
    let mut lyrics = Vec::new();
    for lyric in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "lyric")
    {
        let Some(text) = get_child_text(lyric, "text") else {
            continue;
        };
        let syllabic = get_child_text(lyric, "syllabic")
            .and_then(|t| Syllabic::parse(&t))
            .unwrap_or(Syllabic::Single);
        let number = lyric
            .attribute("number")
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(1);
        lyrics.push(Lyric {
            text,
            syllabic,
            number,
        });
    }
    lyrics
}

fn duration_of(node: Node, divisions: i32) -> Result<Rational, SplitError> {
    let raw = get_child_text(node, "duration")
        .and_then(|t| t.parse::<i32>().ok())
        .ok_or_else(|| SplitError::Parse("element without duration".to_string()))?;
    Ok(Rational::new(raw, divisions))
}

// ============================================================================
// NODE HELPERS
// ============================================================================

fn get_child<'a>(node: Node<'a, 'a>, name: &str) -> Option<Node<'a, 'a>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn get_text(node: Node) -> Option<String> {
    let text = node.text()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn get_child_text(node: Node, name: &str) -> Option<String> {
    get_child(node, name).and_then(get_text)
}
