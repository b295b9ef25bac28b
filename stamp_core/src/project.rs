use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::ContentUpdater;
use crate::EnvironmentSource;
use crate::MapEnvironment;
use crate::ProcessEnvironment;
use crate::RecordingSink;
use crate::StampError;
use crate::StampResult;
use crate::TracingSink;
use crate::UpdateEvent;
use crate::Variable;
use crate::VariableCollection;
use crate::config::FilesConfig;
use crate::config::StampConfig;

/// A loaded project: its config, the resolved variables and the subject
/// variable updates are attributed to.
#[derive(Debug)]
pub struct ProjectContext {
	pub root: PathBuf,
	pub config: StampConfig,
	pub variables: VariableCollection,
	subject: Variable,
}

impl ProjectContext {
	/// Load `stamp.toml` from `root` and resolve variables from the process
	/// environment. `overrides` take precedence over the environment.
	pub fn load(root: &Path, overrides: &[Variable]) -> StampResult<Self> {
		let config = StampConfig::load(root)?.ok_or(StampError::MissingConfig)?;
		let environment = ProcessEnvironment::new().with_aliases(config.environment.clone());

		Self::from_config(root, config, &environment, overrides)
	}

	/// Build a project from an already loaded config and an arbitrary
	/// environment.
	pub fn from_config<S>(
		root: &Path,
		config: StampConfig,
		source: &S,
		overrides: &[Variable],
	) -> StampResult<Self>
	where
		S: EnvironmentSource + ?Sized,
	{
		let environment = overrides
			.iter()
			.map(|variable| (variable.name(), variable.value()))
			.collect::<MapEnvironment>()
			.over(source);

		let mut variables = VariableCollection::with_missing_policy(config.on_missing.clone());
		variables
			.merge_well_known_variables(&environment, config.well_known_names())?
			.locate_and_merge(&environment, &config.variables)?;
		variables.extend(overrides.iter().cloned());

		let subject = match &config.subject {
			Some(name) => {
				variables.get(name).cloned().ok_or_else(|| {
					StampError::UnknownSubject {
						name: name.clone(),
						available: variables.variable_names().join(", "),
					}
				})?
			}
			None => {
				variables.items().next().cloned().ok_or_else(|| {
					StampError::MissingWellKnownVariable {
						names: config.well_known.clone(),
					}
				})?
			}
		};

		tracing::debug!(
			subject = %subject.name(),
			variables = variables.len(),
			"resolved project variables"
		);

		Ok(Self {
			root: root.to_path_buf(),
			config,
			variables,
			subject,
		})
	}

	/// The variable updates are attributed to.
	pub fn subject(&self) -> &Variable {
		&self.subject
	}

	/// An updater bound to the subject, the configured replacers and every
	/// resolved variable.
	pub fn updater(&self) -> ContentUpdater<'_> {
		ContentUpdater::new(self.subject(), &self.config.replacers, &self.variables)
	}

	/// Files selected by the `[files]` config section.
	pub fn target_files(&self) -> StampResult<Vec<PathBuf>> {
		collect_target_files(&self.root, &self.config.files)
	}
}

/// Parse a `name=value` variable override.
pub fn parse_override(input: &str) -> StampResult<Variable> {
	match input.split_once('=') {
		Some((name, value)) if !name.trim().is_empty() => Ok(Variable::new(name.trim(), value)),
		_ => Err(StampError::InvalidOverride(input.to_string())),
	}
}

/// The outcome of updating a single file.
#[derive(Debug, Clone)]
pub struct FileUpdate {
	pub path: PathBuf,
	pub original: String,
	pub updated: String,
	/// Everything the updater reported while processing this file.
	pub events: Vec<UpdateEvent>,
}

impl FileUpdate {
	pub fn is_changed(&self) -> bool {
		self.original != self.updated
	}

	/// Number of captured values that were replaced.
	pub fn modification_count(&self) -> usize {
		self.events
			.iter()
			.filter(|event| matches!(event, UpdateEvent::LineModified { .. }))
			.count()
	}
}

/// Result of updating a set of files.
#[derive(Debug, Default)]
pub struct UpdateResult {
	pub files: Vec<FileUpdate>,
}

impl UpdateResult {
	/// Files whose content changed.
	pub fn changed(&self) -> impl Iterator<Item = &FileUpdate> {
		self.files.iter().filter(|file| file.is_changed())
	}

	pub fn changed_count(&self) -> usize {
		self.changed().count()
	}

	pub fn is_up_to_date(&self) -> bool {
		self.changed_count() == 0
	}
}

/// Run the project's updater over `files` without writing anything.
pub fn compute_updates(ctx: &ProjectContext, files: &[PathBuf]) -> StampResult<UpdateResult> {
	let updater = ctx.updater();
	let mut result = UpdateResult::default();

	for path in files {
		let _span = tracing::info_span!("file", path = %path.display()).entered();
		let original = std::fs::read_to_string(path)?;
		let mut sink = RecordingSink::forwarding_to(TracingSink);
		let updated = updater.update(&original, &mut sink);

		result.files.push(FileUpdate {
			path: path.clone(),
			original,
			updated,
			events: sink.into_events(),
		});
	}

	Ok(result)
}

/// Write changed files back to disk. Returns the number of files written.
pub fn write_updates(result: &UpdateResult) -> StampResult<usize> {
	let mut written = 0;

	for file in result.changed() {
		std::fs::write(&file.path, &file.updated)?;
		written += 1;
	}

	Ok(written)
}

/// Collect the files under `root` selected by `files`, sorted.
///
/// `.gitignore` rules are respected unless disabled. Exclude patterns use
/// gitignore syntax and apply on top.
pub fn collect_target_files(root: &Path, files: &FilesConfig) -> StampResult<Vec<PathBuf>> {
	if files.patterns.is_empty() {
		return Ok(Vec::new());
	}

	let include_set = build_glob_set(&files.patterns)?;
	let exclude = build_exclude_matcher(root, &files.exclude)?;

	let walker = WalkBuilder::new(root)
		.git_ignore(!files.disable_gitignore)
		.git_exclude(!files.disable_gitignore)
		.require_git(false)
		.build();

	let mut targets = Vec::new();

	for entry in walker {
		let entry = entry.map_err(|e| StampError::Io(std::io::Error::other(e)))?;
		if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
			continue;
		}

		let path = entry.path();
		let Ok(rel_path) = path.strip_prefix(root) else {
			continue;
		};

		if !include_set.is_match(rel_path) {
			continue;
		}

		if exclude.matched_path_or_any_parents(rel_path, false).is_ignore() {
			continue;
		}

		targets.push(path.to_path_buf());
	}

	// Sort for deterministic ordering.
	targets.sort();
	Ok(targets)
}

fn build_glob_set(patterns: &[String]) -> StampResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			StampError::InvalidGlob {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		StampError::InvalidGlob {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> StampResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			StampError::InvalidGlob {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}

	builder.build().map_err(|e| {
		StampError::InvalidGlob {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}
