use predicates::prelude::*;
use rstest::rstest;
use stamp_core::AnyEmptyResult;

mod common;

use common::stamp_cmd;
use common::write_project;

#[test]
fn check_fails_on_stale_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path())?;

	stamp_cmd()
		.env("DOCKER_IMAGE_TAG", "1.2.3")
		.env("GIT_BRANCH", "main")
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicate::str::contains("is out of date"))
		.stderr(predicate::str::contains("deploy/app.yaml"))
		.stderr(predicate::str::contains("deploy/legacy").not());

	Ok(())
}

#[rstest]
#[case::text("text", "Check passed")]
#[case::json("json", "\"ok\":true")]
fn check_passes_after_update(#[case] format: &str, #[case] expected: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path())?;

	stamp_cmd()
		.env("DOCKER_IMAGE_TAG", "1.2.3")
		.env("GIT_BRANCH", "main")
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	stamp_cmd()
		.env("DOCKER_IMAGE_TAG", "1.2.3")
		.env("GIT_BRANCH", "main")
		.arg("check")
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
fn check_json_format() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path())?;

	let output = stamp_cmd()
		.env("DOCKER_IMAGE_TAG", "1.2.3")
		.env("GIT_BRANCH", "main")
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["ok"], false);
	assert_eq!(report["checked"], 1);
	assert_eq!(report["stale"][0]["file"], "deploy/app.yaml");
	assert_eq!(report["stale"][0]["replacements"], 2);

	Ok(())
}
