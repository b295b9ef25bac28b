use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::OnMissingVariable;
use crate::Replacer;
use crate::StampError;
use crate::StampResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["stamp.toml", ".stamp.toml", ".config/stamp.toml"];

/// Configuration loaded from a `stamp.toml` file.
///
/// ```toml
/// subject = "docker_image_tag"
/// well_known = ["docker_image_tag", "git_tag"]
/// variables = ["build_number"]
/// on_missing = "skip"
///
/// [environment]
/// git_tag = ["CI_COMMIT_TAG", "GITHUB_REF_NAME"]
///
/// [[replacers]]
/// regex = 'image: registry/app:(?<docker_image_tag>\S+)'
///
/// [files]
/// patterns = ["deploy/**/*.yaml"]
/// exclude = ["deploy/legacy/"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StampConfig {
	/// Name of the variable updates are attributed to. Defaults to the first
	/// registered variable.
	#[serde(default)]
	pub subject: Option<String>,
	/// Replaces the default well-known variable names. At least one of these
	/// must resolve, or every one of them with `on_missing = "fail"`.
	#[serde(default)]
	pub well_known: Vec<String>,
	/// Additional variables to resolve from the environment.
	#[serde(default)]
	pub variables: Vec<String>,
	/// What to do when a requested variable is not set. The policy covers
	/// the well-known names as well as `variables`, so `"fail"` aborts on the
	/// first unset well-known name even when another one resolves.
	#[serde(default)]
	pub on_missing: OnMissingVariable,
	/// Friendly variable name → environment variable names to try in order.
	#[serde(default)]
	pub environment: BTreeMap<String, Vec<String>>,
	/// Patterns applied to every target file, in order.
	#[serde(default)]
	pub replacers: Vec<Replacer>,
	/// Which files to rewrite.
	#[serde(default)]
	pub files: FilesConfig,
}

/// Selection of the files `stamp update` rewrites.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
	/// Glob patterns relative to the project root.
	#[serde(default)]
	pub patterns: Vec<String>,
	/// Gitignore-style patterns for files and directories to skip.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl StampConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> StampResult<Option<StampConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Parse config from TOML source.
	pub fn parse(content: &str) -> StampResult<StampConfig> {
		toml::from_str(content).map_err(|e| StampError::ConfigParse(e.to_string()))
	}

	/// The well-known names to require, or `None` to use the defaults.
	pub fn well_known_names(&self) -> Option<&[String]> {
		if self.well_known.is_empty() {
			None
		} else {
			Some(&self.well_known)
		}
	}
}
