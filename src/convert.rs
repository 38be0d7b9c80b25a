//! MuseScore container conversion
//!
//! Zipped `.mscz` containers are unpacked by shelling out to the
//! MuseScore binary, which writes a MusicXML intermediate. The
//! subprocess contract is `mscore -o <out.xml> <in.mscz>`; a non-zero
//! exit code is a fatal load error. Several binary names are probed
//! because distributions disagree about what the executable is called.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::SplitError;

const MSCORE_CANDIDATES: &[&str] = &["mscore", "mscore3", "musescore", "musescore3"];

/// Locate a working MuseScore binary, if any.
pub fn find_mscore() -> Option<&'static str> {
    MSCORE_CANDIDATES.iter().copied().find(|cmd| {
        Command::new(cmd)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    })
}

/// Convert a `.mscz` file to MusicXML next to it, returning the path of
/// the intermediate file. The caller is responsible for deleting it.
pub fn convert_mscz_to_musicxml(input: &Path) -> Result<PathBuf, SplitError> {
    let mscore = find_mscore().ok_or_else(|| {
        SplitError::Conversion(
            "MuseScore command line tool not found; install MuseScore and ensure \
             'mscore' or 'musescore' is on PATH"
                .to_string(),
        )
    })?;

    let output_path = input.with_extension("converted.musicxml");
    log::info!("converting {} via {}", input.display(), mscore);

    let output = Command::new(mscore)
        .arg("-o")
        .arg(&output_path)
        .arg(input)
        .output()
        .map_err(|e| SplitError::Conversion(format!("failed to run {}: {}", mscore, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SplitError::Conversion(format!(
            "{} exited with {}: {}",
            mscore,
            output.status,
            stderr.trim()
        )));
    }
    if !output_path.exists() {
        return Err(SplitError::Conversion(format!(
            "{} reported success but produced no output at {}",
            mscore,
            output_path.display()
        )));
    }

    Ok(output_path)
}
