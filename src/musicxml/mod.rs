//! MusicXML boundary
//!
//! Parsing of MusicXML partwise documents into the score model and
//! serialization back out. Nothing outside this module sees XML.

pub mod parser;
pub mod writer;

pub use parser::parse_musicxml;
pub use writer::write_musicxml;
