use std::path::Path;

use crate::AnyEmptyResult;
use crate::BEGIN_MARKER;
use crate::END_MARKER;

/// Write `content` to `rel` under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> AnyEmptyResult {
	let path = root.join(rel);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)?;

	Ok(())
}

/// A note with one directive block whose rendered output is `output`.
pub fn directive_note(query: &str, template: &str, output: &str) -> String {
	format!(
		"# Index\n\n{BEGIN_MARKER}\n```jinja2\n{{# {query} #}}\n{template}\n```\n\n{output}\n\n{END_MARKER}\n\nFooter\n"
	)
}

/// Template listing every record's reference on its own line.
pub const REF_LIST_TEMPLATE: &str = "{% for f in files -%}\n- {{ f.ref }}\n{% endfor %}";

/// A vault with `pages/A.md` titled by heading and `pages/B.md` without one,
/// indexed from `index/Index.md`.
pub fn alpha_beta_vault(root: &Path, output: &str) -> AnyEmptyResult {
	write_file(root, "pages/A.md", "# Alpha\n\nBody.\n")?;
	write_file(root, "pages/B.md", "Just text.\n")?;
	write_file(
		root,
		"index/Index.md",
		&directive_note(
			"find ../pages -name '*.md' | sort",
			REF_LIST_TEMPLATE,
			output,
		),
	)?;

	Ok(())
}
