//! Find-or-insert of the badge line in a text file.
//!
//! The file is read whole, rewritten in memory and written back through a
//! temporary file in the same directory that is renamed over the original,
//! so readers see either the old or the new content. Nothing guards against
//! another writer touching the file between the read and the rename; the
//! last writer wins.

use std::io::Write;
use std::path::Path;

use log::debug;
use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::error::{CovshieldError, Result};

/// What `patch` did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "lines", rename_all = "snake_case")]
pub enum PatchOutcome {
    /// This many lines matched the marker and were rewritten.
    Replaced(usize),
    /// No line matched; the rendered line was prepended.
    Inserted,
    /// The file already held exactly the rendered content.
    UpToDate,
    /// No line matched and insertion was not requested.
    MarkerAbsent,
}

impl PatchOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, PatchOutcome::Replaced(_) | PatchOutcome::Inserted)
    }
}

/// Whether `marker` is usable for `rendered`: it must match the rendered line
/// as a whole, so that a patched file matches again on the next run and the
/// replacement leaves it unchanged.
pub fn marker_covers(marker: &Regex, rendered: &str) -> bool {
    marker.is_match(rendered) && marker.replace_all(rendered, NoExpand(rendered)) == rendered
}

/// Apply the patch to file content without touching the filesystem.
///
/// Every line containing a match for `marker` has the match replaced by
/// `rendered`. If nothing matches and `insert_if_absent` is set, `rendered`
/// becomes the first line. Each line keeps its own ending; the inserted line
/// and an unterminated last line take the first ending found in the file
/// (`\n` if there is none), so the result always ends with a newline.
pub fn patch_content(
    content: &str,
    marker: &Regex,
    rendered: &str,
    insert_if_absent: bool,
) -> (String, PatchOutcome) {
    let mut lines: Vec<(String, &str)> =
        content.split_inclusive('\n').map(split_ending).collect();
    let newline = lines
        .iter()
        .map(|(_, ending)| *ending)
        .find(|ending| !ending.is_empty())
        .unwrap_or("\n");

    let mut matched = 0;
    for (line, _) in lines.iter_mut() {
        if marker.is_match(line) {
            *line = marker.replace_all(line, NoExpand(rendered)).into_owned();
            matched += 1;
        }
    }

    let outcome = if matched > 0 {
        PatchOutcome::Replaced(matched)
    } else if insert_if_absent {
        lines.insert(0, (rendered.to_string(), newline));
        PatchOutcome::Inserted
    } else {
        return (content.to_string(), PatchOutcome::MarkerAbsent);
    };

    let mut patched = String::with_capacity(content.len() + rendered.len() + 2);
    for (line, ending) in &lines {
        patched.push_str(line);
        patched.push_str(if ending.is_empty() { newline } else { *ending });
    }

    if patched == content {
        (patched, PatchOutcome::UpToDate)
    } else {
        (patched, outcome)
    }
}

/// Split a line produced by `split_inclusive('\n')` into its text and ending.
fn split_ending(piece: &str) -> (String, &str) {
    if let Some(line) = piece.strip_suffix("\r\n") {
        (line.to_string(), "\r\n")
    } else if let Some(line) = piece.strip_suffix('\n') {
        (line.to_string(), "\n")
    } else {
        (piece.to_string(), "")
    }
}

/// Patch `file_path` in place. A missing file is an error, never an implicit
/// create.
pub fn patch(
    file_path: &Path,
    marker: &Regex,
    rendered: &str,
    insert_if_absent: bool,
) -> Result<PatchOutcome> {
    let content = read_target(file_path)?;
    let (patched, outcome) = patch_content(&content, marker, rendered, insert_if_absent);

    if outcome.changed() {
        write_atomic(file_path, &patched)?;
        debug!("patched {}: {:?}", file_path.display(), outcome);
    } else {
        debug!("left {} untouched: {:?}", file_path.display(), outcome);
    }

    Ok(outcome)
}

/// Read the target file, mapping "not found" to its own error.
pub fn read_target(file_path: &Path) -> Result<String> {
    std::fs::read_to_string(file_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CovshieldError::TargetNotFound(file_path.to_path_buf()),
        _ => CovshieldError::Io(e),
    })
}

/// Replace the file's content in one rename, keeping its permissions.
fn write_atomic(file_path: &Path, content: &str) -> Result<()> {
    let dir = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = std::fs::metadata(file_path)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(file_path).map_err(|e| CovshieldError::Io(e.error))?;
    Ok(())
}
