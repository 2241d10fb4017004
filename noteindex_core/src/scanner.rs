use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::BEGIN_MARKER;
use crate::IndexConfig;
use crate::IndexError;
use crate::IndexResult;
use crate::config::DEFAULT_MAX_FILE_SIZE;

/// Options for controlling which files are searched for directive blocks.
///
/// Use [`ScanOptions::default()`] for sensible defaults or
/// [`ScanOptions::from_config`] to construct from an [`IndexConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Files larger than this many bytes are skipped.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			exclude_patterns: Vec::new(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	pub fn from_config(config: &IndexConfig) -> Self {
		Self {
			exclude_patterns: config.exclude.patterns.clone(),
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
		}
	}
}

/// Find every note under `root` whose content contains the directive begin
/// marker. Paths are returned in lexical order. No matches is an empty list,
/// not an error.
pub fn scan_directive_notes(root: &Path, options: &ScanOptions) -> IndexResult<Vec<PathBuf>> {
	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	let mut files = Vec::new();
	let mut ancestors = HashSet::new();
	walk_dir(
		root,
		&mut files,
		&gitignore,
		&custom_exclude,
		&mut ancestors,
	)?;
	files.sort();

	// A directory reachable through a symlink as well as directly yields the
	// same note twice. Keep the first path in lexical order.
	let mut seen = HashSet::new();
	files.retain(|file| seen.insert(file.canonicalize().unwrap_or_else(|_| file.clone())));

	let mut notes = Vec::new();
	for file in files {
		let metadata = std::fs::metadata(&file)?;
		if metadata.len() > options.max_file_size {
			tracing::debug!(file = %file.display(), size = metadata.len(), "skipping large file");
			continue;
		}

		let bytes = std::fs::read(&file)?;
		if contains_marker(&bytes) {
			tracing::debug!(file = %file.display(), "found directive note");
			notes.push(file);
		}
	}

	Ok(notes)
}

fn contains_marker(bytes: &[u8]) -> bool {
	let marker = BEGIN_MARKER.as_bytes();
	bytes.windows(marker.len()).any(|window| window == marker)
}

/// Build a `Gitignore` matcher from exclude patterns in `[exclude]`. These
/// follow `.gitignore` syntax and are applied on top of any `.gitignore`
/// rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> IndexResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			IndexError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| IndexError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the root's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Hidden directories hold editor state and trash, never notes to refresh.
fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	ancestors: &mut HashSet<PathBuf>,
) -> IndexResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Only a directory that contains itself is a cycle, so the canonical path
	// is tracked for the current descent and released afterwards.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !ancestors.insert(canonical.clone()) {
		return Err(IndexError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let is_dir = path.is_dir();

		if is_dir
			&& path
				.file_name()
				.and_then(|n| n.to_str())
				.is_some_and(is_ignored_directory_name)
		{
			continue;
		}

		if gitignore.matched(&path, is_dir).is_ignore()
			|| custom_exclude.matched(&path, is_dir).is_ignore()
		{
			continue;
		}

		if is_dir {
			walk_dir(&path, files, gitignore, custom_exclude, ancestors)?;
		} else if path.is_file() {
			files.push(path);
		}
	}

	ancestors.remove(&canonical);

	Ok(())
}
