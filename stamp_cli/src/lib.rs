use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use stamp_core::Variable;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Stamp build identifiers into deployment manifests.",
	long_about = "stamp resolves build identifiers such as docker_image_tag, git_tag and git_branch \
	              from the environment and writes them into files wherever a configured regular \
	              expression captures a placeholder in a named group.\n\nQuick start:\n  stamp \
	              init    Create a stamp.toml\n  stamp update  Rewrite all target files\n  stamp \
	              check   Verify all target files are stamped\n  stamp vars    Show resolved \
	              variables"
)]
pub struct StampCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output. Logs every replacer pass and line change.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Set a variable directly, taking precedence over the environment.
	/// Can be repeated.
	#[arg(long = "set", global = true, value_name = "NAME=VALUE", value_parser = parse_variable)]
	pub set: Vec<Variable>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `stamp.toml` in the project root.
	///
	/// If the file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Rewrite target files with the resolved variables.
	///
	/// Without arguments, rewrites every file selected by `[files]` in
	/// `stamp.toml`. Pass files explicitly to rewrite only those.
	///
	/// Use `--dry-run` to preview changes without writing to disk.
	Update {
		/// Files to rewrite instead of the configured targets.
		files: Vec<PathBuf>,

		/// Write the result to this path instead of back to the input file.
		/// Requires exactly one input file.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Preview changes without writing files. Prints a unified diff for
		/// every file that would change.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Check that every target file is already stamped.
	///
	/// Exits with a non-zero status code if any target file would change.
	/// Ideal for CI pipelines.
	Check {
		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the resolved variables.
	Vars {
		/// Output format for the variable list.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

fn parse_variable(input: &str) -> Result<Variable, String> {
	stamp_core::parse_override(input).map_err(|e| e.to_string())
}
