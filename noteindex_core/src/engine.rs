use std::path::Path;
use std::path::PathBuf;

use crate::IndexConfig;
use crate::IndexError;
use crate::IndexResult;
use crate::Item;
use crate::block::BlockRequest;
use crate::block::refresh_content;
use crate::build_item;
use crate::discovery::run_discovery;
use crate::render::render_template;
use crate::scanner::ScanOptions;
use crate::scanner::scan_directive_notes;
use crate::sync::SyncOutcome;
use crate::sync::sync_file;

/// A scanned directory together with its configuration, ready for
/// computing or writing updates.
#[derive(Debug)]
pub struct IndexContext {
	/// Directory the scan started from.
	pub root: PathBuf,
	/// Configuration loaded from `noteindex.toml`, or the defaults.
	pub config: IndexConfig,
	/// Notes containing at least one begin marker, in lexical order.
	pub notes: Vec<PathBuf>,
}

/// A note whose regenerated content differs from what is on disk.
#[derive(Debug)]
pub struct NoteUpdate {
	pub file: PathBuf,
	/// The note as currently stored.
	pub current_content: String,
	/// The note with every directive block regenerated.
	pub expected_content: String,
}

/// A note that could not be regenerated. It is left untouched.
#[derive(Debug)]
pub struct NoteFailure {
	pub file: PathBuf,
	pub error: IndexError,
}

/// Result of regenerating every directive note in a context.
#[derive(Debug, Default)]
pub struct UpdateResult {
	/// Notes that need to be rewritten.
	pub updates: Vec<NoteUpdate>,
	/// Notes whose blocks are already up to date.
	pub unchanged: Vec<PathBuf>,
	/// Notes that failed. These are collected instead of aborting so that one
	/// broken note does not block the others.
	pub failures: Vec<NoteFailure>,
}

impl UpdateResult {
	/// Returns true if every note is up to date and nothing failed.
	pub fn is_ok(&self) -> bool {
		self.updates.is_empty() && self.failures.is_empty()
	}

	/// Returns true if any note failed to regenerate.
	pub fn has_failures(&self) -> bool {
		!self.failures.is_empty()
	}
}

/// Load the config at `root` and find every directive note below it.
pub fn scan_with_config(root: &Path) -> IndexResult<IndexContext> {
	let config = IndexConfig::load_or_default(root)?;
	let options = ScanOptions::from_config(&config);
	let notes = scan_directive_notes(root, &options)?;

	Ok(IndexContext {
		root: root.to_path_buf(),
		config,
		notes,
	})
}

/// Regenerate the directive blocks of one note.
///
/// Discovery queries run in the note's own directory and the paths they
/// print are resolved against it.
pub fn refresh_note(note: &Path, content: &str, config: &IndexConfig) -> IndexResult<String> {
	let base_dir = match note.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	refresh_content(content, |request| render_block(request, base_dir, config))
}

fn render_block(
	request: &BlockRequest,
	base_dir: &Path,
	config: &IndexConfig,
) -> IndexResult<String> {
	let files = run_discovery(&request.query, base_dir, config.shell())?
		.iter()
		.map(PathBuf::as_path)
		.map(build_item)
		.collect::<IndexResult<Vec<Item>>>()?;

	render_template(&request.template, &files, config.undefined)
}

/// Compute the regenerated content of every note without writing anything.
///
/// With `fail_fast` the first failing note aborts the run; otherwise it is
/// recorded in [`UpdateResult::failures`] and the remaining notes are still
/// processed.
pub fn compute_updates(ctx: &IndexContext, fail_fast: bool) -> IndexResult<UpdateResult> {
	let mut result = UpdateResult::default();

	for note in &ctx.notes {
		let outcome = std::fs::read_to_string(note)
			.map_err(IndexError::from)
			.and_then(|current| {
				let expected = refresh_note(note, &current, &ctx.config)?;
				Ok((current, expected))
			});

		match outcome {
			Ok((current, expected)) if current == expected => {
				result.unchanged.push(note.clone());
			}
			Ok((current_content, expected_content)) => {
				result.updates.push(NoteUpdate {
					file: note.clone(),
					current_content,
					expected_content,
				});
			}
			Err(error) if fail_fast => return Err(error),
			Err(error) => {
				tracing::warn!(file = %note.display(), %error, "failed to refresh note");
				result.failures.push(NoteFailure {
					file: note.clone(),
					error,
				});
			}
		}
	}

	Ok(result)
}

/// Write the regenerated notes back to disk. Returns the notes that were
/// actually replaced.
pub fn write_updates(result: &UpdateResult) -> IndexResult<Vec<PathBuf>> {
	let mut written = Vec::new();
	for update in &result.updates {
		if sync_file(&update.file, &update.expected_content)? == SyncOutcome::Written {
			written.push(update.file.clone());
		}
	}

	Ok(written)
}
