use crate::IndexError;
use crate::IndexResult;

/// Line that opens a directive block.
pub const BEGIN_MARKER: &str = "%%+BEGIN: indexer%%";
/// Line that closes a directive block.
pub const END_MARKER: &str = "%%+END%%";
/// Fence line that opens the template inside a directive block.
pub const TEMPLATE_OPEN_FENCE: &str = "```jinja2";
/// Fence line that closes the template.
pub const TEMPLATE_CLOSE_FENCE: &str = "```";
/// Width of the comment markers around the discovery query, as in
/// `{# find . -name '*.md' #}`.
pub const QUERY_MARKER_WIDTH: usize = 3;

/// Position of the parser relative to a directive block.
///
/// Every non-`Normal` state remembers the 1-indexed line of the begin marker
/// so an unterminated block can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BlockState {
	/// Outside any directive block.
	#[default]
	Normal,
	/// After the begin marker, before the template fence.
	InDirective { opened_at: usize },
	/// Inside the template fence, collecting the query and template body.
	InTemplate {
		opened_at: usize,
		query: Option<String>,
		template: Vec<String>,
	},
	/// Inside the previously rendered output, which is dropped.
	InOutput { opened_at: usize },
}

impl BlockState {
	/// The begin-marker line of the block being processed, if any.
	pub fn opened_at(&self) -> Option<usize> {
		match self {
			Self::Normal => None,
			Self::InDirective { opened_at }
			| Self::InTemplate { opened_at, .. }
			| Self::InOutput { opened_at } => Some(*opened_at),
		}
	}
}

/// Whether an input line survives into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
	Copy,
	Discard,
}

/// A fully collected directive waiting to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRequest {
	/// Shell command that prints the paths to index.
	pub query: String,
	/// Template body, without the query line and fences.
	pub template: String,
	/// 1-indexed line of the begin marker.
	pub line: usize,
}

/// The result of feeding one line to [`step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
	pub state: BlockState,
	pub emit: Emit,
	/// Set when the line closed a template. The rendered output, followed by
	/// a fresh end marker, belongs directly after the emitted line.
	pub render: Option<BlockRequest>,
}

impl Transition {
	fn copy(state: BlockState) -> Self {
		Self {
			state,
			emit: Emit::Copy,
			render: None,
		}
	}
}

/// Advance the block state machine by one line. `line_number` is 1-indexed.
///
/// This performs no I/O; rendering is requested through
/// [`Transition::render`].
pub fn step(state: BlockState, line: &str, line_number: usize) -> IndexResult<Transition> {
	let transition = match state {
		BlockState::Normal => {
			if line == BEGIN_MARKER {
				Transition::copy(BlockState::InDirective {
					opened_at: line_number,
				})
			} else {
				Transition::copy(BlockState::Normal)
			}
		}
		BlockState::InDirective { opened_at } => {
			if line == TEMPLATE_OPEN_FENCE {
				Transition::copy(BlockState::InTemplate {
					opened_at,
					query: None,
					template: Vec::new(),
				})
			} else {
				Transition::copy(BlockState::InDirective { opened_at })
			}
		}
		BlockState::InTemplate {
			opened_at,
			query,
			mut template,
		} => {
			if line == TEMPLATE_CLOSE_FENCE {
				let Some(query) = query else {
					return Err(IndexError::MissingQuery { line: line_number });
				};

				Transition {
					state: BlockState::InOutput { opened_at },
					emit: Emit::Copy,
					render: Some(BlockRequest {
						query,
						template: template.join("\n"),
						line: opened_at,
					}),
				}
			} else if query.is_none() {
				Transition::copy(BlockState::InTemplate {
					opened_at,
					query: Some(strip_query_markers(line)),
					template,
				})
			} else {
				template.push(line.to_string());
				Transition::copy(BlockState::InTemplate {
					opened_at,
					query,
					template,
				})
			}
		}
		BlockState::InOutput { opened_at } => {
			let state = if line == END_MARKER {
				BlockState::Normal
			} else {
				BlockState::InOutput { opened_at }
			};
			Transition {
				state,
				emit: Emit::Discard,
				render: None,
			}
		}
	};

	Ok(transition)
}

/// Recover the shell command from a query line by dropping the fixed-width
/// markers on both ends.
pub fn strip_query_markers(line: &str) -> String {
	let chars: Vec<char> = line.chars().collect();
	if chars.len() <= QUERY_MARKER_WIDTH * 2 {
		return String::new();
	}

	chars[QUERY_MARKER_WIDTH..chars.len() - QUERY_MARKER_WIDTH]
		.iter()
		.collect()
}

/// Rewrite `content` with every directive block's output regenerated.
///
/// `render` is called once per block, in document order, and returns the
/// text placed between the template fence and the end marker. Lines are
/// re-joined with `\n` and the result always ends with a newline unless the
/// input is empty. A block still open at the end of the input is an
/// [`IndexError::UnterminatedBlock`].
pub fn refresh_content<F>(content: &str, mut render: F) -> IndexResult<String>
where
	F: FnMut(&BlockRequest) -> IndexResult<String>,
{
	let mut output = String::with_capacity(content.len());
	let mut state = BlockState::Normal;

	for (index, line) in content.lines().enumerate() {
		let transition = step(state, line, index + 1)?;

		if transition.emit == Emit::Copy {
			output.push_str(line);
			output.push('\n');
		}

		if let Some(request) = &transition.render {
			let rendered = render(request)?;
			output.push('\n');
			output.push_str(rendered.trim());
			output.push_str("\n\n");
			output.push_str(END_MARKER);
			output.push('\n');
		}

		state = transition.state;
	}

	if let Some(line) = state.opened_at() {
		return Err(IndexError::UnterminatedBlock { line });
	}

	Ok(output)
}

/// Collect the directive blocks of `content` without rendering anything.
pub fn find_directives(content: &str) -> IndexResult<Vec<BlockRequest>> {
	let mut requests = Vec::new();
	refresh_content(content, |request| {
		requests.push(request.clone());
		Ok(String::new())
	})?;

	Ok(requests)
}
