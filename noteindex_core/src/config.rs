use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::IndexError;
use crate::IndexResult;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"noteindex.toml",
	".noteindex.toml",
	".config/noteindex.toml",
];

/// Configuration loaded from a `noteindex.toml` file.
///
/// ```toml
/// shell = "bash"
/// undefined = "semi-strict"
/// max_file_size = 1048576
/// disable_gitignore = false
///
/// [exclude]
/// patterns = ["archive/", "*.excalidraw.md"]
/// ```
#[derive(Debug, Deserialize)]
pub struct IndexConfig {
	/// Interpreter used to run discovery queries. Defaults to `sh` (`cmd` on
	/// Windows).
	#[serde(default)]
	pub shell: Option<String>,
	/// How templates treat references to fields a record does not have.
	#[serde(default)]
	pub undefined: UndefinedMode,
	/// Files larger than this are never treated as directive notes.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, the root `.gitignore` is not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
}

/// Behavior of the template renderer for undefined fields.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedMode {
	/// Printing or iterating an undefined value is a render error, while
	/// `{% if f.status %}` checks on optional fields are falsy.
	#[default]
	#[serde(rename = "semi-strict")]
	SemiStrict,
	/// Any use of an undefined value is a render error, including `if` checks.
	Strict,
	/// Undefined values print as empty and are falsy.
	Lenient,
	/// Like `lenient`, and attribute access on undefined values is allowed.
	Chainable,
}

impl UndefinedMode {
	pub(crate) fn to_minijinja(self) -> minijinja::UndefinedBehavior {
		match self {
			Self::SemiStrict => minijinja::UndefinedBehavior::SemiStrict,
			Self::Strict => minijinja::UndefinedBehavior::Strict,
			Self::Lenient => minijinja::UndefinedBehavior::Lenient,
			Self::Chainable => minijinja::UndefinedBehavior::Chainable,
		}
	}
}

/// Paths skipped while scanning for directive notes. Patterns follow
/// gitignore syntax relative to the root.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl Default for IndexConfig {
	fn default() -> Self {
		Self {
			shell: None,
			undefined: UndefinedMode::default(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
			exclude: ExcludeConfig::default(),
		}
	}
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl IndexConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> IndexResult<Option<IndexConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: IndexConfig =
			toml::from_str(&content).map_err(|e| IndexError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to defaults when absent.
	pub fn load_or_default(root: &Path) -> IndexResult<IndexConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// The interpreter discovery queries are handed to.
	pub fn shell(&self) -> &str {
		match &self.shell {
			Some(shell) => shell.as_str(),
			None if cfg!(windows) => "cmd",
			None => "sh",
		}
	}
}
