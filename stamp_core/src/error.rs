use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum StampError {
	#[error(transparent)]
	#[diagnostic(code(stamp::io_error))]
	Io(#[from] std::io::Error),

	#[error("at least one of the well-known variables ({}) must be provided", .names.join(", "))]
	#[diagnostic(
		code(stamp::missing_well_known_variable),
		help(
			"export one of these variables (for example `GIT_TAG=v1.0.0`) or map it to an \
			 existing environment variable in the `[environment]` table of stamp.toml"
		)
	)]
	MissingWellKnownVariable { names: Vec<String> },

	#[error("environment variable for `{0}` is not set")]
	#[diagnostic(
		code(stamp::missing_environment_variable),
		help("set `on_missing = \"skip\"` or provide a default to tolerate missing variables")
	)]
	MissingEnvironmentVariable(String),

	#[error("invalid replacer pattern `{pattern}`: {reason}")]
	#[diagnostic(code(stamp::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("invalid file pattern `{pattern}`: {reason}")]
	#[diagnostic(code(stamp::invalid_glob))]
	InvalidGlob { pattern: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(stamp::config_parse),
		help("check that stamp.toml is valid TOML with [[replacers]] and [files] sections")
	)]
	ConfigParse(String),

	#[error("no stamp.toml found")]
	#[diagnostic(
		code(stamp::missing_config),
		help("run `stamp init` to create one, or pass `--path` to the project root")
	)]
	MissingConfig,

	#[error("subject variable `{name}` is not registered")]
	#[diagnostic(
		code(stamp::unknown_subject),
		help("registered variables: {available}")
	)]
	UnknownSubject { name: String, available: String },

	#[error("invalid variable override `{0}`")]
	#[diagnostic(
		code(stamp::invalid_override),
		help("overrides take the form `name=value`")
	)]
	InvalidOverride(String),

	#[error("`--output` can only be used with exactly one input file")]
	#[diagnostic(code(stamp::output_requires_single_file))]
	OutputRequiresSingleFile,
}

pub type StampResult<T> = Result<T, StampError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
