use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Refresh generated index blocks inside markdown notes.",
	long_about = "noteindex keeps `%%+BEGIN: indexer%%` blocks in your notes up to date.\n\nEach \
	              block names a shell query that prints file paths and a jinja template that \
	              turns those files into text. Running noteindex executes every query, renders \
	              every template and rewrites the block output in place.\n\nQuick start:\n  \
	              noteindex          Refresh every block below the current directory\n  \
	              noteindex check    Verify everything is up to date\n  noteindex list     \
	              Show the blocks that would be refreshed"
)]
pub struct NoteIndexCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the directory to scan for notes.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Stop at the first note that fails instead of skipping it.
	#[arg(long, global = true, default_value_t = false)]
	pub fail_fast: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Refresh the output of every directive block. This is the default
	/// when no subcommand is given.
	///
	/// Notes whose blocks are already current are not touched. A note that
	/// fails is reported and left unchanged while the rest are still
	/// refreshed.
	Update {
		/// Report which notes would change without writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch for file changes and refresh again automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Check that every directive block is up to date.
	///
	/// Exits with status 1 when any note would change, which makes it
	/// suitable for CI and pre-commit hooks.
	Check {
		/// Show a diff between the stored and regenerated note.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List every directive block with its discovery query.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
