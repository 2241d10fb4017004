use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use noteindex_cli::Commands;
use noteindex_cli::NoteIndexCli;
use noteindex_cli::OutputFormat;
use noteindex_core::IndexContext;
use noteindex_core::IndexError;
use noteindex_core::NoteFailure;
use noteindex_core::compute_updates;
use noteindex_core::find_directives;
use noteindex_core::scan_with_config;
use noteindex_core::write_updates;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV_VAR: &str = "NOTEINDEX_LOG";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = NoteIndexCli::parse();

	// Respect NO_COLOR, --no-color and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Update { dry_run, watch }) => run_update(&args, dry_run, watch),
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::List) => run_list(&args),
		None => run_update(&args, false, false),
	};

	if let Err(e) = result {
		match e.downcast::<IndexError>() {
			Ok(index_err) => {
				let report: miette::Report = (*index_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr so stdout stays usable for `--format json`.
fn init_logging(verbose: bool, use_color: bool) {
	let fallback = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &NoteIndexCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn scan(args: &NoteIndexCli) -> Result<IndexContext, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = scan_with_config(&root)?;

	if args.verbose {
		println!("Found {} note(s) with directive blocks", ctx.notes.len());
	}

	Ok(ctx)
}

fn run_update(
	args: &NoteIndexCli,
	dry_run: bool,
	watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	run_update_once(args, dry_run)?;

	if !watch || dry_run {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms. Our own writes land
		// here too; the pass after them finds nothing to change.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, refreshing...");
		if let Err(e) = run_update_once(args, false) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_update_once(args: &NoteIndexCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = scan(args)?;
	let root = resolve_root(args);
	let result = compute_updates(&ctx, args.fail_fast)?;

	if result.updates.is_empty() {
		if !result.has_failures() {
			println!("All notes are already up to date.");
		}
	} else if dry_run {
		println!("Dry run: would refresh {} note(s):", result.updates.len());
		for update in &result.updates {
			println!("  {}", make_relative(&update.file, &root));
		}
	} else {
		let written = write_updates(&result)?;
		println!("Refreshed {} note(s):", written.len());
		for path in &written {
			println!("  {}", make_relative(path, &root));
		}
	}

	if args.verbose && !result.unchanged.is_empty() {
		println!("{} note(s) unchanged", result.unchanged.len());
	}

	report_failures(&result.failures, &root)
}

fn run_check(
	args: &NoteIndexCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = scan(args)?;
	let root = resolve_root(args);
	let result = compute_updates(&ctx, args.fail_fast)?;

	match format {
		OutputFormat::Json => {
			let stale: Vec<serde_json::Value> = result
				.updates
				.iter()
				.map(|update| serde_json::json!({ "file": make_relative(&update.file, &root) }))
				.collect();
			let errors: Vec<serde_json::Value> = result
				.failures
				.iter()
				.map(|failure| {
					serde_json::json!({
						"file": make_relative(&failure.file, &root),
						"message": failure.error.to_string(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": result.is_ok(),
				"stale": stale,
				"errors": errors,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			if result.is_ok() {
				println!("Check passed: all notes are up to date.");
			}

			if !result.updates.is_empty() {
				eprintln!("{}", colored!("Stale notes:", yellow));
				for update in &result.updates {
					eprintln!("  {}", make_relative(&update.file, &root));
					if show_diff {
						print_diff(&update.current_content, &update.expected_content);
					}
				}
				eprintln!();
				eprintln!(
					"{} note(s) are out of date. Run `noteindex update` to fix.",
					result.updates.len()
				);
			}
		}
	}

	if result.has_failures() {
		if matches!(format, OutputFormat::Text) {
			report_failures(&result.failures, &root)?;
		}
		return Err(format!("{} note(s) failed", result.failures.len()).into());
	}

	if !result.updates.is_empty() {
		process::exit(1);
	}

	Ok(())
}

fn run_list(args: &NoteIndexCli) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = scan(args)?;
	let root = resolve_root(args);

	if ctx.notes.is_empty() {
		println!("No directive blocks found.");
		return Ok(());
	}

	let mut block_count = 0;
	let mut failures = Vec::new();
	for note in &ctx.notes {
		let directives = std::fs::read_to_string(note)
			.map_err(IndexError::from)
			.and_then(|content| find_directives(&content));

		let directives = match directives {
			Ok(directives) => directives,
			Err(error) if args.fail_fast => return Err(error.into()),
			Err(error) => {
				failures.push(NoteFailure {
					file: note.clone(),
					error,
				});
				continue;
			}
		};

		println!("{}", colored!(make_relative(note, &root), bold));
		for directive in &directives {
			println!("  line {}: {}", directive.line, directive.query);
		}
		block_count += directives.len();
	}

	println!(
		"\n{block_count} block(s) in {} note(s)",
		ctx.notes.len() - failures.len()
	);

	report_failures(&failures, &root)
}

/// Print every failed note and turn a non-empty list into an error.
fn report_failures(
	failures: &[NoteFailure],
	root: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
	if failures.is_empty() {
		return Ok(());
	}

	eprintln!();
	eprintln!("{}", colored!("Failed notes:", bold));
	for failure in failures {
		eprintln!(
			"  {} {}: {}",
			colored!("error:", red),
			make_relative(&failure.file, root),
			failure.error
		);
	}

	Err(format!("{} note(s) failed and were left unchanged", failures.len()).into())
}

/// Print a line diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
