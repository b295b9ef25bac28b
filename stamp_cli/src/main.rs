use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use stamp_cli::Commands;
use stamp_cli::OutputFormat;
use stamp_cli::StampCli;
use stamp_core::FileUpdate;
use stamp_core::ProjectContext;
use stamp_core::StampConfig;
use stamp_core::StampError;
use stamp_core::TracingSink;
use stamp_core::UpdateResult;
use stamp_core::compute_updates;
use stamp_core::write_updates;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = r#"# stamp configuration

# Variables updates are attributed to. Defaults to the first resolved variable.
# subject = "docker_image_tag"

# At least one of these must be set. Defaults to docker_image_tag, git_tag and
# git_branch, read from DOCKER_IMAGE_TAG, GIT_TAG and GIT_BRANCH.
# well_known = ["docker_image_tag", "git_tag", "git_branch"]

# Additional variables to resolve.
# variables = ["build_number"]

# What to do when a variable is not set: "skip", "fail" or { default = "..." }.
# on_missing = "skip"

# Read variables from differently named environment variables.
# [environment]
# git_tag = ["CI_COMMIT_TAG", "GITHUB_REF_NAME"]

# Every named group is replaced with the variable of the same name.
[[replacers]]
regex = 'image: (?:[^\s:]+):(?<docker_image_tag>\S+)'

[files]
patterns = ["deploy/**/*.yaml", "deploy/**/*.yml"]
"#;

fn main() {
	let args = StampCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Update {
			files,
			output,
			dry_run,
		}) => run_update(&args, files, output.as_deref(), *dry_run),
		Some(Commands::Check { format }) => run_check(&args, *format),
		Some(Commands::Vars { format }) => run_vars(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `stamp --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<StampError>() {
			Ok(stamp_err) => {
				let report: miette::Report = (*stamp_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "info" } else { "warn" };
	let filter = tracing_subscriber::EnvFilter::try_from_env("STAMP_LOG")
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn resolve_root(args: &StampCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_project(args: &StampCli) -> Result<ProjectContext, StampError> {
	let root = resolve_root(args);
	let ctx = ProjectContext::load(&root, &args.set)?;
	tracing::info!(
		subject = %ctx.subject(),
		replacers = ctx.config.replacers.len(),
		"loaded project"
	);

	Ok(ctx)
}

fn run_init(args: &StampCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = StampConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("stamp.toml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Edit stamp.toml to describe the placeholders in your files");
	println!("  2. Export one of DOCKER_IMAGE_TAG, GIT_TAG or GIT_BRANCH");
	println!("  3. Run `stamp update` to stamp your files");

	Ok(())
}

fn run_update(
	args: &StampCli,
	files: &[PathBuf],
	output: Option<&Path>,
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_project(args)?;

	if let Some(output) = output {
		let [file] = files else {
			return Err(StampError::OutputRequiresSingleFile.into());
		};

		if dry_run {
			let original = std::fs::read_to_string(file)?;
			let updated = ctx.updater().update(&original, &mut TracingSink);
			print_diff(&original, &updated);
			println!("Dry run: would write {}", output.display());
		} else {
			ctx.updater().update_file(file, Some(output), &mut TracingSink)?;
			println!("Wrote {}", output.display());
		}

		return Ok(());
	}

	let targets = if files.is_empty() {
		ctx.target_files()?
	} else {
		files.to_vec()
	};

	if targets.is_empty() {
		println!("No target files matched.");
		return Ok(());
	}

	let result = compute_updates(&ctx, &targets)?;

	if result.is_up_to_date() {
		println!("All {} file(s) are already up to date.", result.files.len());
		return Ok(());
	}

	if dry_run {
		for file in result.changed() {
			println!(
				"{} {}",
				colored!("Would update:", yellow),
				make_relative(&file.path, &ctx.root)
			);
			print_diff(&file.original, &file.updated);
		}
		println!(
			"\nDry run: {} file(s) would be updated.",
			result.changed_count()
		);
		return Ok(());
	}

	let written = write_updates(&result)?;
	for file in result.changed() {
		println!(
			"{} {} ({} replacement(s))",
			colored!("Updated", green),
			make_relative(&file.path, &ctx.root),
			file.modification_count()
		);
	}
	println!("\nUpdated {written} file(s).");

	Ok(())
}

fn run_check(args: &StampCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_project(args)?;
	let targets = ctx.target_files()?;
	let result = compute_updates(&ctx, &targets)?;
	let stale: Vec<&FileUpdate> = result.changed().collect();

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = stale
				.iter()
				.map(|file| {
					serde_json::json!({
						"file": make_relative(&file.path, &ctx.root),
						"replacements": file.modification_count(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": stale.is_empty(),
				"checked": result.files.len(),
				"stale": entries,
			});
			println!("{output}");
		}
		OutputFormat::Text => print_check_summary(&result, &stale, &ctx.root),
	}

	if !stale.is_empty() {
		process::exit(1);
	}

	Ok(())
}

fn print_check_summary(result: &UpdateResult, stale: &[&FileUpdate], root: &Path) {
	if stale.is_empty() {
		println!(
			"Check passed: all {} file(s) are up to date.",
			result.files.len()
		);
		return;
	}

	for file in stale {
		eprintln!(
			"{} {} is out of date",
			colored!("stale:", red),
			make_relative(&file.path, root)
		);
		print_diff(&file.original, &file.updated);
	}
	eprintln!(
		"\n{} of {} file(s) out of date. Run `stamp update` to stamp them.",
		stale.len(),
		result.files.len()
	);
}

fn run_vars(args: &StampCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_project(args)?;

	match format {
		OutputFormat::Json => {
			let variables: Vec<_> = ctx.variables.items().collect();
			let output = serde_json::json!({
				"subject": ctx.subject().name(),
				"variables": variables,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			for variable in ctx.variables.items() {
				let line = variable.to_string();
				if variable.name() == ctx.subject().name() {
					println!("{} (subject)", colored!(line, bold));
				} else {
					println!("{line}");
				}
			}
		}
	}

	Ok(())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
