//! `stamp_core` is the core library for the `stamp` tool. It resolves build
//! identifiers such as `docker_image_tag`, `git_tag` and `git_branch` from the
//! environment and writes them into files wherever a configured regular
//! expression captures a placeholder in a named group.
//!
//! ## Processing Pipeline
//!
//! ```text
//! stamp.toml
//!   → VariableCollection (well-known + requested names resolved from the environment)
//!   → ContentUpdater (subject variable + ordered replacers + all variables)
//!   → for each replacer, for each match, for each named group: substitute the variable
//!   → UpdateEvents (trace, warnings, line modifications) sent to an EventSink
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `stamp.toml`.
//! - [`environment`]: Friendly name → value resolution and the missing-variable
//!   policy.
//! - [`project`]: Target file discovery and project-wide updates.
//!
//! ## Key Types
//!
//! - [`Variable`]: An immutable name/value pair.
//! - [`VariableCollection`]: Every variable available to a run.
//! - [`Replacer`]: A regular expression whose named groups mark placeholders.
//! - [`ContentUpdater`]: The substitution engine.
//! - [`UpdateEvent`] / [`EventSink`]: Diagnostics emitted while updating.
//!
//! ## Quick Start
//!
//! ```rust
//! use stamp_core::ContentUpdater;
//! use stamp_core::MapEnvironment;
//! use stamp_core::RecordingSink;
//! use stamp_core::Replacer;
//! use stamp_core::VariableCollection;
//!
//! let environment = MapEnvironment::new().with("git_tag", "v2.3.1");
//! let mut variables = VariableCollection::new();
//! variables.merge_well_known_variables(&environment, None).unwrap();
//!
//! let replacers = vec![Replacer::new(r"image: app:(?<git_tag>.+)").unwrap()];
//! let subject = variables.get("git_tag").unwrap();
//! let updater = ContentUpdater::new(subject, &replacers, &variables);
//!
//! let mut sink = RecordingSink::new();
//! let output = updater.update("image: app:{{ git_tag }}", &mut sink);
//! assert_eq!(output, "image: app:v2.3.1");
//! ```

pub use config::*;
pub use environment::*;
pub use error::*;
pub use events::*;
pub use project::*;
pub use replacer::*;
pub use updater::*;
pub use variable::*;

pub mod config;
pub mod environment;
#[allow(unused_assignments)]
mod error;
mod events;
pub mod project;
mod replacer;
mod updater;
mod variable;

#[cfg(test)]
mod __fixtures;
