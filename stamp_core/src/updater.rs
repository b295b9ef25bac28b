use std::path::Path;

use crate::EventSink;
use crate::Replacer;
use crate::StampResult;
use crate::UpdateEvent;
use crate::Variable;
use crate::VariableCollection;

/// Rewrites content by running replacers against it and substituting every
/// named capture group with the registered variable of the same name.
///
/// An updater is bound to a single subject variable, which is what its
/// diagnostics are attributed to. The groups themselves may reference any
/// variable in the collection.
///
/// Replacement is textual: each rewritten line replaces the *first*
/// occurrence of the original matched text in the content, and each
/// captured value is replaced at its first occurrence within the matched
/// line. When identical text appears earlier in the content, that earlier
/// occurrence is the one that changes.
#[derive(Debug, Clone, Copy)]
pub struct ContentUpdater<'a> {
	variable: &'a Variable,
	replacers: &'a [Replacer],
	all_variables: &'a VariableCollection,
}

/// The owned parts of a single match, taken before the content is edited.
struct MatchedLine {
	line: String,
	/// Captured text per named group, in group declaration order. Groups that
	/// did not participate in the match capture the empty string.
	captures: Vec<String>,
}

impl<'a> ContentUpdater<'a> {
	pub fn new(
		variable: &'a Variable,
		replacers: &'a [Replacer],
		all_variables: &'a VariableCollection,
	) -> Self {
		Self {
			variable,
			replacers,
			all_variables,
		}
	}

	pub fn variable(&self) -> &'a Variable {
		self.variable
	}

	pub fn replacers(&self) -> &'a [Replacer] {
		self.replacers
	}

	/// Apply every replacer in order and return the rewritten content. Each
	/// replacer sees the output of the previous one.
	#[tracing::instrument(level = "debug", skip_all, fields(subject = %self.variable.name()))]
	pub fn update(&self, content: &str, sink: &mut impl EventSink) -> String {
		let mut content_in_edit = content.to_string();

		for replacer in self.replacers {
			sink.emit(UpdateEvent::Trying {
				pattern: replacer.pattern().to_string(),
				value: self.variable.value().to_string(),
			});

			let group_names: Vec<&str> = replacer.group_names().collect();
			let matches = collect_matches(replacer, &group_names, &content_in_edit);

			if matches.is_empty() {
				sink.emit(UpdateEvent::NoMatches {
					pattern: replacer.pattern().to_string(),
				});
				continue;
			}

			sink.emit(UpdateEvent::MatchesFound {
				pattern: replacer.pattern().to_string(),
				count: matches.len(),
			});

			for matched in matches {
				let new_line = self.rewrite_line(&matched, &group_names, sink);

				if !matched.line.is_empty() {
					content_in_edit = content_in_edit.replacen(&matched.line, &new_line, 1);
				}

				sink.emit(UpdateEvent::LineConverted {
					from: matched.line,
					to: new_line,
				});
			}
		}

		content_in_edit
	}

	/// Read `path`, update its content and write the result to `new_path`, or
	/// back to `path` when no new path is given.
	pub fn update_file(
		&self,
		path: &Path,
		new_path: Option<&Path>,
		sink: &mut impl EventSink,
	) -> StampResult<()> {
		let content = std::fs::read_to_string(path)?;
		let updated = self.update(&content, sink);
		std::fs::write(new_path.unwrap_or(path), updated)?;

		Ok(())
	}

	fn rewrite_line(
		&self,
		matched: &MatchedLine,
		group_names: &[&str],
		sink: &mut impl EventSink,
	) -> String {
		let mut new_line = matched.line.clone();

		for (name, old_value) in group_names.iter().zip(&matched.captures) {
			let Some(variable) = self.all_variables.get(name) else {
				sink.emit(UpdateEvent::UnregisteredVariable {
					name: (*name).to_string(),
					available: self
						.all_variables
						.variable_names()
						.into_iter()
						.map(String::from)
						.collect(),
				});
				continue;
			};

			// An empty capture has no text to locate.
			if !old_value.is_empty() {
				new_line = new_line.replacen(old_value.as_str(), variable.value(), 1);
			}

			sink.emit(UpdateEvent::LineModified {
				variable_name: (*name).to_string(),
				old_value: old_value.clone(),
				new_value: variable.value().to_string(),
			});
		}

		new_line
	}
}

fn collect_matches(replacer: &Replacer, group_names: &[&str], content: &str) -> Vec<MatchedLine> {
	replacer
		.regex()
		.captures_iter(content)
		.map(|captures| {
			MatchedLine {
				line: captures
					.get(0)
					.map_or_else(String::new, |m| m.as_str().to_string()),
				captures: group_names
					.iter()
					.map(|name| {
						captures
							.name(name)
							.map_or_else(String::new, |m| m.as_str().to_string())
					})
					.collect(),
			}
		})
		.collect()
}
