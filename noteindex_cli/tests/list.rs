#![cfg(unix)]

mod common;

use noteindex_core::AnyEmptyResult;

#[test]
fn list_prints_notes_and_queries() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_vault(tmp.path(), "")?;
	std::fs::create_dir_all(tmp.path().join("projects"))?;
	std::fs::write(
		tmp.path().join("projects/Overview.md"),
		format!(
			"{}{}",
			common::index_note("find . -name '*.md'", ""),
			common::index_note("ls ../pages", "")
		),
	)?;

	common::noteindex_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Index.md\n  line 3: ls pages/*.md"))
		.stdout(predicates::str::contains("projects/Overview.md"))
		.stdout(predicates::str::contains("line 3: find . -name '*.md'"))
		.stdout(predicates::str::contains("line 16: ls ../pages"))
		.stdout(predicates::str::contains("3 block(s) in 2 note(s)"));

	Ok(())
}

#[test]
fn list_does_not_run_queries() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_vault(tmp.path(), "- [[Old]]")?;
	let marker = tmp.path().join("ran");
	std::fs::write(
		tmp.path().join("Touch.md"),
		common::index_note("touch ran", ""),
	)?;

	common::noteindex_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(!marker.exists());
	let content = std::fs::read_to_string(tmp.path().join("Index.md"))?;
	assert!(content.contains("- [[Old]]"));

	Ok(())
}

#[test]
fn list_with_no_blocks() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("plain.md"), "# Plain\n")?;

	common::noteindex_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No directive blocks found."));

	Ok(())
}
