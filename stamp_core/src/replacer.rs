use std::fmt;

use regex::Regex;
use serde::Deserialize;

use crate::StampError;
use crate::StampResult;

/// A pattern whose named capture groups mark the text to replace with the
/// variable of the same name.
///
/// ```toml
/// [[replacers]]
/// regex = 'image: registry/app:(?<docker_image_tag>\S+)'
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawReplacer")]
pub struct Replacer {
	regex: Regex,
}

#[derive(Deserialize)]
struct RawReplacer {
	regex: String,
}

impl TryFrom<RawReplacer> for Replacer {
	type Error = StampError;

	fn try_from(raw: RawReplacer) -> StampResult<Self> {
		Self::new(&raw.regex)
	}
}

impl Replacer {
	/// Compile `pattern`. Both `(?<name>...)` and `(?P<name>...)` group
	/// syntaxes are accepted.
	pub fn new(pattern: &str) -> StampResult<Self> {
		let regex = Regex::new(pattern).map_err(|e| {
			StampError::InvalidPattern {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})?;

		Ok(Self { regex })
	}

	pub fn pattern(&self) -> &str {
		self.regex.as_str()
	}

	pub fn regex(&self) -> &Regex {
		&self.regex
	}

	/// Names of the named capture groups, in declaration order. Unnamed
	/// groups are skipped.
	pub fn group_names(&self) -> impl Iterator<Item = &str> {
		self.regex.capture_names().flatten()
	}
}

impl fmt::Display for Replacer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "/{}/", self.regex.as_str())
	}
}
