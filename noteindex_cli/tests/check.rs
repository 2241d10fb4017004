#![cfg(unix)]

mod common;

use noteindex_cli::Commands;
use noteindex_cli::NoteIndexCli;
use noteindex_cli::OutputFormat;
use noteindex_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_vault(tmp.path(), "- [[A|Alpha]]\n- [[B]]")?;

	common::noteindex_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_fails_when_stale_without_writing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_vault(tmp.path(), "- [[Old]]")?;
	let before = std::fs::read_to_string(tmp.path().join("Index.md"))?;

	common::noteindex_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("Stale notes:"))
		.stderr(predicates::str::contains("Index.md"))
		.stderr(predicates::str::contains("noteindex update"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("Index.md"))?, before);

	Ok(())
}

#[test]
fn check_diff_shows_changed_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_vault(tmp.path(), "- [[Old]]")?;

	common::noteindex_cmd()
		.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-- [[Old]]"))
		.stderr(predicates::str::contains("+- [[A|Alpha]]"))
		.stderr(predicates::str::contains("+- [[B]]"));

	Ok(())
}

#[test]
fn check_without_diff_hides_content() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_vault(tmp.path(), "- [[Old]]")?;

	common::noteindex_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("[[A|Alpha]]").not());

	Ok(())
}

#[test]
fn check_json_reports_stale_notes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_vault(tmp.path(), "- [[Old]]")?;

	let output = common::noteindex_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["stale"][0]["file"], "Index.md");
	assert_eq!(json["errors"].as_array().map(Vec::len), Some(0));

	Ok(())
}

#[test]
fn check_json_reports_failures() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("Index.md"),
		common::index_note("echo nope >&2; exit 1", ""),
	)?;

	let output = common::noteindex_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(2));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["errors"][0]["file"], "Index.md");
	let message = json["errors"][0]["message"].as_str().unwrap_or_default();
	assert!(message.contains("nope"), "unexpected message: {message}");

	Ok(())
}

#[test]
fn check_with_no_notes_passes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("plain.md"), "# Nothing to index\n")?;

	common::noteindex_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_parses_format_flag() {
	use clap::Parser;

	let cli = NoteIndexCli::try_parse_from(["noteindex", "check", "--diff", "--format", "json"]);
	let Ok(cli) = cli else {
		panic!("arguments should parse");
	};
	assert!(matches!(
		cli.command,
		Some(Commands::Check {
			diff: true,
			format: OutputFormat::Json,
		})
	));

	let cli = NoteIndexCli::try_parse_from(["noteindex", "--fail-fast"]);
	let Ok(cli) = cli else {
		panic!("arguments should parse");
	};
	assert!(cli.command.is_none());
	assert!(cli.fail_fast);
}
