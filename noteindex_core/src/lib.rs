//! `noteindex_core` keeps generated index blocks inside markdown notes up to
//! date. A note declares a directive block naming a discovery query and a
//! [`minijinja`](https://docs.rs/minijinja) template; refreshing runs the
//! query, summarizes every file it prints, renders the template and rewrites
//! the block's output in place.
//!
//! ## Directive Blocks
//!
//! ````markdown
//! %%+BEGIN: indexer%%
//! ```jinja2
//! {# find ../projects -name '*.md' | sort #}
//! {% for f in files %}
//! - {{ f.ref }}{% if f.status %} ({{ f.status }}){% endif %}
//! {% endfor %}
//! ```
//!
//! - [[alpha|Project Alpha]] (active)
//! - [[beta]]
//!
//! %%+END%%
//! ````
//!
//! The first template line is the discovery query wrapped in a template
//! comment. Everything between the closing fence and `%%+END%%` is
//! regenerated on every run.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Directory
//!   → Scanner (finds notes containing the begin marker)
//!   → Block parser (line state machine, one render request per block)
//!   → Discovery (runs the query in the note's directory)
//!   → Item builder (stem, title, ref and metadata per discovered file)
//!   → Renderer (template over `files`)
//!   → File sync (atomic replace, skipped when nothing changed)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use noteindex_core::{compute_updates, scan_with_config, write_updates};
//! use std::path::Path;
//!
//! let ctx = scan_with_config(Path::new(".")).unwrap();
//! let result = compute_updates(&ctx, false).unwrap();
//! for failure in &result.failures {
//!     eprintln!("{}: {}", failure.file.display(), failure.error);
//! }
//! write_updates(&result).unwrap();
//! ```

pub use block::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use item::*;

pub mod block;
pub mod config;
pub mod discovery;
mod engine;
#[allow(unused_assignments)]
mod error;
mod item;
pub mod render;
pub mod scanner;
pub mod sync;

#[cfg(test)]
mod __fixtures;
