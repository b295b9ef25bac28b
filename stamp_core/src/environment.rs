//! Resolution of friendly variable names (`git_tag`) to concrete values.
//!
//! The registry never reads the environment directly. It asks an
//! [`EnvironmentSource`] for each name and hands any miss to the configured
//! [`OnMissingVariable`] policy.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::Deserialize;

use crate::StampError;
use crate::StampResult;

/// Something that can produce a value for a friendly variable name.
pub trait EnvironmentSource {
	/// Look up `friendly_name`. Returns `None` when no value is available.
	fn lookup(&self, friendly_name: &str) -> Option<String>;
}

impl<S: EnvironmentSource + ?Sized> EnvironmentSource for &S {
	fn lookup(&self, friendly_name: &str) -> Option<String> {
		(**self).lookup(friendly_name)
	}
}

/// What to do when a requested variable cannot be found.
///
/// ```toml
/// on_missing = "skip"
/// on_missing = "fail"
/// on_missing = { default = "latest" }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OnMissingVariable {
	/// Leave the variable out.
	#[default]
	Skip,
	/// Abort resolution with [`StampError::MissingEnvironmentVariable`]. This
	/// applies to every requested name, well-known ones included.
	Fail,
	/// Resolve the variable to a fixed fallback value.
	Default(String),
}

/// A friendly name paired with the value it resolved to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResolvedVariable {
	pub friendly_name: String,
	pub value: String,
}

/// Resolve each of `names`, in order, against `source`.
///
/// Names that cannot be found are handled by `policy`. Only
/// [`OnMissingVariable::Fail`] produces an error.
pub fn resolve_friendly_names<S, N>(
	source: &S,
	names: &[N],
	policy: &OnMissingVariable,
) -> StampResult<Vec<ResolvedVariable>>
where
	S: EnvironmentSource + ?Sized,
	N: AsRef<str>,
{
	let mut resolved = Vec::with_capacity(names.len());

	for name in names {
		let name = name.as_ref();
		let value = match source.lookup(name) {
			Some(value) => value,
			None => {
				match policy {
					OnMissingVariable::Skip => {
						tracing::debug!(variable = name, "variable not found, skipping");
						continue;
					}
					OnMissingVariable::Fail => {
						return Err(StampError::MissingEnvironmentVariable(name.to_string()));
					}
					OnMissingVariable::Default(fallback) => {
						tracing::debug!(
							variable = name,
							fallback = %fallback,
							"variable not found, using default"
						);
						fallback.clone()
					}
				}
			}
		};

		tracing::debug!(variable = name, value = %value, "resolved variable");
		resolved.push(ResolvedVariable {
			friendly_name: name.to_string(),
			value,
		});
	}

	Ok(resolved)
}

/// Reads variables from the process environment.
///
/// A friendly name maps to an ordered list of environment variable names.
/// Without an alias the friendly name is upper-cased (`git_tag` becomes
/// `GIT_TAG`). The first candidate with a non-empty value wins.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnvironment {
	aliases: BTreeMap<String, Vec<String>>,
}

impl ProcessEnvironment {
	pub fn new() -> Self {
		Self::default()
	}

	/// Use the given friendly name → environment variable candidates.
	#[must_use]
	pub fn with_aliases(mut self, aliases: BTreeMap<String, Vec<String>>) -> Self {
		self.aliases = aliases;
		self
	}

	/// The environment variable names consulted for `friendly_name`.
	pub fn candidates(&self, friendly_name: &str) -> Vec<String> {
		match self.aliases.get(friendly_name) {
			Some(candidates) if !candidates.is_empty() => candidates.clone(),
			_ => vec![friendly_name.to_ascii_uppercase()],
		}
	}
}

impl EnvironmentSource for ProcessEnvironment {
	fn lookup(&self, friendly_name: &str) -> Option<String> {
		self.candidates(friendly_name)
			.iter()
			.filter_map(|key| std::env::var(key).ok())
			.find(|value| !value.is_empty())
	}
}

/// An in-memory environment keyed by friendly name.
///
/// Can be layered over another source, in which case its own entries take
/// precedence.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment<S = NoEnvironment> {
	values: HashMap<String, String>,
	fallback: S,
}

impl MapEnvironment {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<S> MapEnvironment<S> {
	/// Put `self`'s entries in front of `fallback`.
	pub fn over<T>(self, fallback: T) -> MapEnvironment<T> {
		MapEnvironment {
			values: self.values,
			fallback,
		}
	}

	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(name, value);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.values.insert(name.into(), value.into());
	}
}

impl<S: EnvironmentSource> EnvironmentSource for MapEnvironment<S> {
	fn lookup(&self, friendly_name: &str) -> Option<String> {
		self.values
			.get(friendly_name)
			.cloned()
			.or_else(|| self.fallback.lookup(friendly_name))
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut env = Self::new();
		for (name, value) in iter {
			env.insert(name, value);
		}
		env
	}
}

/// A source where nothing is ever set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnvironment;

impl EnvironmentSource for NoEnvironment {
	fn lookup(&self, _friendly_name: &str) -> Option<String> {
		None
	}
}
