use stamp_core::AnyEmptyResult;

mod common;

use common::stamp_cmd;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	stamp_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"))
		.stdout(predicates::str::contains("stamp update"));

	let config_path = tmp.path().join("stamp.toml");
	assert!(config_path.exists());

	let config = stamp_core::StampConfig::load(tmp.path())?;
	let config = config.ok_or("config should be discoverable")?;
	assert_eq!(config.replacers.len(), 1);
	assert_eq!(config.files.patterns.len(), 2);

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("stamp.toml");
	std::fs::write(&config_path, "existing config")?;

	stamp_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");

	Ok(())
}
