// End-to-end: parse a closed-score MusicXML document, split it, write
// the four parts back out, and parse one of them again. Exercises the
// parser's cursor handling, the full pipeline, and the writer in one
// pass.

use satb_split::musicxml::{parse_musicxml, write_musicxml};
use satb_split::score::Rational;
use satb_split::{split_satb_score, ProcessingOptions, VoiceName};

/// Two measures of closed-score SATB as MuseScore exports it: voices
/// 1/2 on the upper staff, 5/6 on the lower, with a forte and a lyric
/// on the soprano line and a system break on measure 2.
const CLOSED_SCORE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="3.1">
  <work><work-title>Abendlied</work-title></work>
  <identification>
    <creator type="composer">J. Rheinberger</creator>
  </identification>
  <part-list>
    <score-part id="P1"><part-name>Soprano Alto</part-name></score-part>
    <score-part id="P2"><part-name>Tenor Bass</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes>
        <divisions>2</divisions>
        <key><fifths>0</fifths></key>
        <time><beats>4</beats><beat-type>4</beat-type></time>
        <clef><sign>G</sign><line>2</line></clef>
      </attributes>
      <direction placement="above">
        <direction-type><dynamics><f/></dynamics></direction-type>
      </direction>
      <note>
        <pitch><step>G</step><octave>4</octave></pitch>
        <duration>2</duration><voice>1</voice><type>quarter</type>
        <lyric number="1"><syllabic>single</syllabic><text>Sun</text></lyric>
      </note>
      <note>
        <pitch><step>A</step><octave>4</octave></pitch>
        <duration>6</duration><voice>1</voice><type>half</type><dot/>
      </note>
      <backup><duration>8</duration></backup>
      <note>
        <pitch><step>E</step><octave>4</octave></pitch>
        <duration>4</duration><voice>2</voice><type>half</type>
      </note>
      <note>
        <pitch><step>F</step><octave>4</octave></pitch>
        <duration>4</duration><voice>2</voice><type>half</type>
      </note>
    </measure>
    <measure number="2">
      <note>
        <pitch><step>G</step><octave>4</octave></pitch>
        <duration>8</duration><voice>1</voice><type>whole</type>
      </note>
      <backup><duration>8</duration></backup>
      <note>
        <pitch><step>E</step><octave>4</octave></pitch>
        <duration>8</duration><voice>2</voice><type>whole</type>
      </note>
    </measure>
  </part>
  <part id="P2">
    <measure number="1">
      <attributes>
        <divisions>2</divisions>
        <key><fifths>0</fifths></key>
        <time><beats>4</beats><beat-type>4</beat-type></time>
        <clef><sign>F</sign><line>4</line></clef>
      </attributes>
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <duration>4</duration><voice>5</voice><type>half</type>
      </note>
      <note>
        <pitch><step>B</step><octave>3</octave></pitch>
        <duration>4</duration><voice>5</voice><type>half</type>
      </note>
      <backup><duration>8</duration></backup>
      <note>
        <pitch><step>C</step><octave>3</octave></pitch>
        <duration>8</duration><voice>6</voice><type>whole</type>
      </note>
    </measure>
    <measure number="2">
      <print new-system="yes"/>
      <note>
        <pitch><step>C</step><octave>4</octave></pitch>
        <duration>8</duration><voice>5</voice><type>whole</type>
      </note>
      <backup><duration>8</duration></backup>
      <note>
        <pitch><step>C</step><octave>3</octave></pitch>
        <duration>8</duration><voice>6</voice><type>whole</type>
      </note>
    </measure>
  </part>
</score-partwise>"#;

fn r(n: i32) -> Rational {
    Rational::from_integer(n)
}

#[test]
fn parse_split_write_roundtrip() {
    let input = parse_musicxml(CLOSED_SCORE).unwrap();
    assert_eq!(input.parts.len(), 2);

    let scores = split_satb_score(&input, "abendlied", &ProcessingOptions::default()).unwrap();

    // Soprano keeps its own notes and lyric.
    let soprano = &scores[&VoiceName::Soprano];
    let m1 = soprano.find_measure(1).unwrap();
    let notes: Vec<_> = m1.voices[0].notes().collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].duration, r(1));
    assert_eq!(notes[1].duration, r(3));
    assert_eq!(notes[0].lyrics[0].text, "Sun");

    // The forte on the upper staff reaches Tenor and Bass; the lyric
    // reaches every voice; the system break reaches every measure 2.
    for voice in VoiceName::ALL {
        let score = &scores[&voice];
        let m1 = score.find_measure(1).unwrap();
        assert_eq!(
            m1.dynamics().map(|d| d.value.as_str()).collect::<Vec<_>>(),
            vec!["f"],
            "{} dynamics",
            voice
        );
        assert!(
            m1.voices[0]
                .notes()
                .any(|n| n.lyrics.iter().any(|l| l.text == "Sun")),
            "{} lyric missing",
            voice
        );
        assert!(score.find_measure(2).unwrap().new_system, "{} break", voice);
    }

    // Write each part and parse it back; structure must survive.
    for voice in VoiceName::ALL {
        let xml = write_musicxml(&scores[&voice]).unwrap();
        let reparsed = parse_musicxml(&xml).unwrap();
        assert_eq!(reparsed.parts.len(), 1, "{} reparsed part count", voice);
        let expected_title = format!("Abendlied ({})", voice);
        assert_eq!(
            reparsed.metadata.work_title.as_deref(),
            Some(expected_title.as_str()),
            "{} title",
            voice
        );
        assert_eq!(
            reparsed.metadata.composer.as_deref(),
            Some("J. Rheinberger"),
            "{} composer survives",
            voice
        );

        let original_m1 = scores[&voice].find_measure(1).unwrap();
        let reparsed_m1 = reparsed.find_measure(1).unwrap();
        let original: Vec<_> = original_m1.voices[0]
            .notes()
            .map(|n| (n.offset, n.duration, n.pitch))
            .collect();
        let round: Vec<_> = reparsed_m1.voices[0]
            .notes()
            .map(|n| (n.offset, n.duration, n.pitch))
            .collect();
        assert_eq!(original, round, "{} measure 1 notes round-trip", voice);
        assert!(reparsed.find_measure(2).unwrap().new_system);
    }
}

#[test]
fn tenor_output_carries_octave_clef_in_xml() {
    let input = parse_musicxml(CLOSED_SCORE).unwrap();
    let scores = split_satb_score(&input, "abendlied", &ProcessingOptions::default()).unwrap();

    let xml = write_musicxml(&scores[&VoiceName::Tenor]).unwrap();
    assert!(xml.contains("<clef-octave-change>-1</clef-octave-change>"));
    assert!(xml.contains("<part-name>Tenor</part-name>"));

    let bass_xml = write_musicxml(&scores[&VoiceName::Bass]).unwrap();
    assert!(bass_xml.contains("<sign>F</sign>"));
}
