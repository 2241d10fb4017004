use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum IndexError {
	#[error(transparent)]
	#[diagnostic(code(noteindex::io_error))]
	Io(#[from] std::io::Error),

	#[error("discovery query `{query}` failed in `{dir}`: {reason}")]
	#[diagnostic(
		code(noteindex::discovery),
		help("the query runs in the note's own directory and must print one path per line")
	)]
	Discovery {
		query: String,
		dir: String,
		reason: String,
	},

	#[error("failed to read discovered file `{path}`: {reason}")]
	#[diagnostic(code(noteindex::read_item))]
	ReadItem { path: String, reason: String },

	#[error("failed to parse metadata in `{path}`: {reason}")]
	#[diagnostic(
		code(noteindex::metadata_parse),
		help("front matter between `---` lines must be a YAML mapping")
	)]
	MetadataParse { path: String, reason: String },

	#[error("template rendering failed: {0}")]
	#[diagnostic(
		code(noteindex::template_render),
		help("records expose `stem`, `title`, `ref` and any metadata keys of the file")
	)]
	TemplateRender(String),

	#[error("directive block opened on line {line} is never closed")]
	#[diagnostic(
		code(noteindex::unterminated_block),
		help("close the template with a ``` line and end the block with `%%+END%%`")
	)]
	UnterminatedBlock { line: usize },

	#[error("template on line {line} closed before a discovery query was given")]
	#[diagnostic(
		code(noteindex::missing_query),
		help("put the query on the first template line, e.g. `{{# find . -name '*.md' #}}`")
	)]
	MissingQuery { line: usize },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(noteindex::config_parse),
		help("check that noteindex.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(noteindex::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type IndexResult<T> = Result<T, IndexError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
