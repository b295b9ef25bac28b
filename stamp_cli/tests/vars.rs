use predicates::prelude::*;
use rstest::rstest;
use stamp_core::AnyEmptyResult;

mod common;

use common::stamp_cmd;
use common::write_project;

#[test]
fn vars_lists_resolved_variables() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path())?;

	stamp_cmd()
		.env("GIT_TAG", "v1.0.0")
		.env("GIT_BRANCH", "main")
		.arg("vars")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("git_tag=v1.0.0 (subject)"))
		.stdout(predicate::str::contains("git_branch=main\n"))
		.stdout(predicate::str::contains("docker_image_tag").not());

	Ok(())
}

#[rstest]
#[case::text("text", "git_branch=main (subject)")]
#[case::json("json", "\"subject\":\"git_branch\"")]
fn vars_marks_configured_subject(#[case] format: &str, #[case] expected: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path())?;
	let config = format!("subject = \"git_branch\"\n{}", common::CONFIG);
	std::fs::write(tmp.path().join("stamp.toml"), config)?;

	stamp_cmd()
		.env("GIT_TAG", "v1.0.0")
		.env("GIT_BRANCH", "main")
		.arg("vars")
		.arg("--format")
		.arg(format)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains(expected));

	Ok(())
}

#[test]
fn vars_json_format() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path())?;

	let output = stamp_cmd()
		.env("DOCKER_IMAGE_TAG", "1.2.3")
		.arg("vars")
		.arg("--set")
		.arg("build_number=42")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["subject"], "docker_image_tag");
	assert_eq!(
		report["variables"],
		serde_json::json!([
			{ "name": "docker_image_tag", "value": "1.2.3" },
			{ "name": "build_number", "value": "42" },
		])
	);

	Ok(())
}
