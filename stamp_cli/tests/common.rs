#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use stamp_core::AnyEmptyResult;

pub const CONFIG: &str = r#"well_known = ["docker_image_tag", "git_tag", "git_branch"]

[[replacers]]
regex = 'image: registry\.example\.com/app:(?<docker_image_tag>\S+)'

[[replacers]]
regex = 'branch: (?<git_branch>\S+)'

[files]
patterns = ["deploy/**/*.yaml"]
exclude = ["deploy/legacy/"]
"#;

pub const MANIFEST: &str = "branch: GIT_BRANCH\nimage: registry.example.com/app:DOCKER_IMAGE_TAG\n";

/// A `stamp` command isolated from the identifying variables of the host
/// environment.
pub fn stamp_cmd() -> Command {
	let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stamp"));
	cmd.env("NO_COLOR", "1")
		.env_remove("DOCKER_IMAGE_TAG")
		.env_remove("GIT_TAG")
		.env_remove("GIT_BRANCH")
		.env_remove("STAMP_LOG");
	cmd
}

pub fn write_project(root: &Path) -> AnyEmptyResult {
	std::fs::create_dir_all(root.join("deploy/legacy"))?;
	std::fs::write(root.join("stamp.toml"), CONFIG)?;
	std::fs::write(root.join("deploy/app.yaml"), MANIFEST)?;
	std::fs::write(root.join("deploy/legacy/app.yaml"), MANIFEST)?;

	Ok(())
}
