use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use crate::IndexError;
use crate::IndexResult;

/// Run a discovery query and return the paths it prints.
///
/// The command runs through `shell` with `base_dir` as its working
/// directory, so relative queries resolve against the note that owns the
/// block. The process-wide working directory is never changed. Each non-empty
/// line of standard output is one path, joined onto `base_dir` unless it is
/// already absolute.
pub fn run_discovery(query: &str, base_dir: &Path, shell: &str) -> IndexResult<Vec<PathBuf>> {
	tracing::debug!(query, dir = %base_dir.display(), "running discovery query");

	let output = shell_command(shell, query)
		.current_dir(base_dir)
		.output()
		.map_err(|e| discovery_error(query, base_dir, e.to_string()))?;

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
		let reason = if stderr.is_empty() {
			format!(
				"command exited with status {}",
				output
					.status
					.code()
					.map_or_else(|| "unknown".to_string(), |code| code.to_string())
			)
		} else {
			stderr
		};

		return Err(discovery_error(query, base_dir, reason));
	}

	let paths: Vec<PathBuf> = String::from_utf8_lossy(&output.stdout)
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(|line| base_dir.join(line))
		.collect();
	tracing::debug!(query, count = paths.len(), "discovery query finished");

	Ok(paths)
}

fn shell_command(shell: &str, query: &str) -> Command {
	let mut command = Command::new(shell);
	let is_cmd = Path::new(shell)
		.file_stem()
		.and_then(|stem| stem.to_str())
		.is_some_and(|stem| stem.eq_ignore_ascii_case("cmd"));
	command.arg(if is_cmd { "/C" } else { "-c" }).arg(query);
	command
}

fn discovery_error(query: &str, base_dir: &Path, reason: String) -> IndexError {
	IndexError::Discovery {
		query: query.to_string(),
		dir: base_dir.display().to_string(),
		reason,
	}
}
