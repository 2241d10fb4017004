use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use noteindex_core::AnyEmptyResult;

pub fn noteindex_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("noteindex"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("NOTEINDEX_LOG");
	cmd
}

/// A note with one directive block listing the references of `query`'s
/// files, currently showing `output`.
pub fn index_note(query: &str, output: &str) -> String {
	format!(
		"# Index\n\n%%+BEGIN: indexer%%\n```jinja2\n{{# {query} #}}\n{{% for f in files -%}}\n- \
		 {{{{ f.ref }}}}\n{{% endfor %}}\n```\n\n{output}\n\n%%+END%%\n"
	)
}

/// Writes `pages/A.md` (titled "Alpha"), `pages/B.md` and an `Index.md`
/// whose block lists both pages and currently shows `output`.
pub fn write_vault(root: &Path, output: &str) -> AnyEmptyResult {
	std::fs::create_dir_all(root.join("pages"))?;
	std::fs::write(root.join("pages/A.md"), "# Alpha\n\nBody.\n")?;
	std::fs::write(root.join("pages/B.md"), "Just text.\n")?;
	std::fs::write(root.join("Index.md"), index_note("ls pages/*.md", output))?;

	Ok(())
}
