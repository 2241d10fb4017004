use crate::IndexError;
use crate::IndexResult;
use crate::Item;
use crate::config::UndefinedMode;

/// Name under which the discovered records are exposed to a template.
pub const FILES_VARIABLE: &str = "files";

/// Render a directive template against the discovered records.
///
/// The records are available as `files`. The result is trimmed so the block
/// output never starts or ends with blank lines.
pub fn render_template(
	template: &str,
	files: &[Item],
	undefined: UndefinedMode,
) -> IndexResult<String> {
	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.set_undefined_behavior(undefined.to_minijinja());
	env.add_template("__directive__", template)
		.map_err(|e| IndexError::TemplateRender(describe(&e)))?;

	let template = env
		.get_template("__directive__")
		.map_err(|e| IndexError::TemplateRender(describe(&e)))?;

	let rendered = template
		.render(minijinja::context! { files => files })
		.map_err(|e| IndexError::TemplateRender(describe(&e)))?;

	Ok(rendered.trim().to_string())
}

/// Flatten a minijinja error and its causes into one line.
fn describe(error: &minijinja::Error) -> String {
	let mut message = error.to_string();
	let mut source = std::error::Error::source(error);
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}
