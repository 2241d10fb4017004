use std::io::Write;
use std::path::Path;

use crate::IndexResult;

/// What [`sync_file`] did with a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
	/// The content on disk already matched; nothing was written.
	Unchanged,
	/// The note was replaced with the new content.
	Written,
}

/// Whether `generated` differs byte for byte from what is on disk.
/// `current` is `None` when the file does not exist.
pub fn needs_write(generated: &str, current: Option<&[u8]>) -> bool {
	current != Some(generated.as_bytes())
}

/// Replace `path` with `generated` unless it already holds exactly that.
///
/// The new content is written to a scratch file in the same directory and
/// renamed over the original, so the note is either fully old or fully new.
/// The scratch file is removed on every path that does not persist it.
pub fn sync_file(path: &Path, generated: &str) -> IndexResult<SyncOutcome> {
	let current = match std::fs::read(path) {
		Ok(bytes) => Some(bytes),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
		Err(e) => return Err(e.into()),
	};

	if !needs_write(generated, current.as_deref()) {
		tracing::debug!(file = %path.display(), "note unchanged");
		return Ok(SyncOutcome::Unchanged);
	}

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let mut scratch = tempfile::NamedTempFile::new_in(dir)?;
	scratch.write_all(generated.as_bytes())?;
	scratch.as_file().sync_all()?;

	if current.is_some() {
		let permissions = std::fs::metadata(path)?.permissions();
		std::fs::set_permissions(scratch.path(), permissions)?;
	}

	scratch.persist(path).map_err(|e| e.error)?;
	tracing::info!(file = %path.display(), "note refreshed");

	Ok(SyncOutcome::Written)
}
