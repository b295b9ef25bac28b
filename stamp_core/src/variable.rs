use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::StampError;
use crate::StampResult;
use crate::environment::EnvironmentSource;
use crate::environment::OnMissingVariable;
use crate::environment::resolve_friendly_names;

/// Identifying variables of which at least one must resolve for a run to be
/// meaningful, unless the caller supplies its own list.
pub const WELL_KNOWN_VARIABLE_NAMES: [&str; 3] = ["docker_image_tag", "git_tag", "git_branch"];

/// A named value that replacers can substitute into content.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Variable {
	name: String,
	value: String,
}

impl Variable {
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> &str {
		&self.value
	}
}

impl fmt::Display for Variable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}={}", self.name, self.value)
	}
}

/// Every variable available to a run, keyed by name in insertion order.
///
/// The collection is grown while the run is being set up and then handed to
/// [`ContentUpdater`](crate::ContentUpdater)s as read-only input.
#[derive(Debug, Clone, Default)]
pub struct VariableCollection {
	items: IndexMap<String, Variable>,
	on_missing: OnMissingVariable,
}

impl VariableCollection {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty collection that resolves missing environment variables
	/// with `policy`.
	pub fn with_missing_policy(policy: OnMissingVariable) -> Self {
		Self {
			items: IndexMap::new(),
			on_missing: policy,
		}
	}

	pub fn on_missing(&self) -> &OnMissingVariable {
		&self.on_missing
	}

	/// Register `variable`, replacing any earlier variable with the same name.
	/// A replaced variable keeps its original position.
	pub fn add(&mut self, variable: Variable) -> &mut Self {
		self.items.insert(variable.name.clone(), variable);
		self
	}

	pub fn get(&self, name: &str) -> Option<&Variable> {
		self.items.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.items.contains_key(name)
	}

	/// Registered names in insertion order.
	pub fn variable_names(&self) -> Vec<&str> {
		self.items.keys().map(String::as_str).collect()
	}

	/// Registered variables in insertion order.
	pub fn items(&self) -> impl Iterator<Item = &Variable> {
		self.items.values()
	}

	/// The underlying name → variable map.
	pub fn raw(&self) -> &IndexMap<String, Variable> {
		&self.items
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Resolve `names` from `source` and register every variable found.
	///
	/// Missing names are handled by this collection's [`OnMissingVariable`]
	/// policy, which is also the only source of errors.
	pub fn locate_and_merge<S, N>(&mut self, source: &S, names: &[N]) -> StampResult<&mut Self>
	where
		S: EnvironmentSource + ?Sized,
		N: AsRef<str>,
	{
		for resolved in resolve_friendly_names(source, names, &self.on_missing)? {
			self.add(Variable::new(resolved.friendly_name, resolved.value));
		}

		Ok(self)
	}

	/// Merge the well-known identifying variables from `source`.
	///
	/// `names` overrides [`WELL_KNOWN_VARIABLE_NAMES`] when present and
	/// non-empty. Fails with [`StampError::MissingWellKnownVariable`] unless
	/// the merge registers at least one new variable.
	pub fn merge_well_known_variables<S>(
		&mut self,
		source: &S,
		names: Option<&[String]>,
	) -> StampResult<&mut Self>
	where
		S: EnvironmentSource + ?Sized,
	{
		let names: Vec<String> = match names {
			Some(names) if !names.is_empty() => names.to_vec(),
			_ => WELL_KNOWN_VARIABLE_NAMES.iter().map(ToString::to_string).collect(),
		};

		let size_before = self.len();
		self.locate_and_merge(source, &names)?;

		if self.len() == size_before {
			return Err(StampError::MissingWellKnownVariable { names });
		}

		Ok(self)
	}
}

impl Extend<Variable> for VariableCollection {
	fn extend<T: IntoIterator<Item = Variable>>(&mut self, iter: T) {
		for variable in iter {
			self.add(variable);
		}
	}
}

impl FromIterator<Variable> for VariableCollection {
	fn from_iter<T: IntoIterator<Item = Variable>>(iter: T) -> Self {
		let mut collection = Self::new();
		collection.extend(iter);
		collection
	}
}
