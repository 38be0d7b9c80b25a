//! Spanners: elements connecting notes across time
//!
//! Spanners live in the score's global collection and reference their
//! endpoint notes by `NoteId`, never by position. Deep copy keeps the
//! references valid; removing a referenced note orphans the spanner, and
//! orphans are swept by `Score::remove_orphaned_spanners`.

use crate::score::model::NoteId;

/// A slur, wedge, or untyped line connecting an ordered list of notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanner {
    pub kind: SpannerKind,
    /// Ordered endpoints; at minimum the first and last spanned note
    pub notes: Vec<NoteId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpannerKind {
    Slur,
    Crescendo,
    Diminuendo,
    /// Untyped line spanner (dashes, brackets)
    Line,
}

impl Spanner {
    pub fn new(kind: SpannerKind, notes: Vec<NoteId>) -> Self {
        Spanner { kind, notes }
    }

    pub fn first(&self) -> Option<NoteId> {
        self.notes.first().copied()
    }

    pub fn last(&self) -> Option<NoteId> {
        self.notes.last().copied()
    }

    /// Crescendo or diminuendo hairpin
    pub fn is_wedge(&self) -> bool {
        matches!(self.kind, SpannerKind::Crescendo | SpannerKind::Diminuendo)
    }
}
