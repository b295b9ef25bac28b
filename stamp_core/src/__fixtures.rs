use crate::Replacer;
use crate::Variable;
use crate::VariableCollection;

pub fn variables(pairs: &[(&str, &str)]) -> VariableCollection {
	pairs
		.iter()
		.map(|(name, value)| Variable::new(*name, *value))
		.collect()
}

pub fn replacers(patterns: &[&str]) -> Vec<Replacer> {
	patterns
		.iter()
		.map(|pattern| Replacer::new(pattern))
		.collect::<Result<_, _>>()
		.unwrap_or_else(|e| panic!("invalid fixture pattern: {e}"))
}

pub fn release_variables() -> VariableCollection {
	variables(&[
		("docker_image_tag", "1.4.0-abc123"),
		("git_tag", "v1.4.0"),
		("git_branch", "main"),
	])
}

pub const MANIFEST: &str = r"apiVersion: apps/v1
kind: Deployment
metadata:
  labels:
    branch: GIT_BRANCH
spec:
  template:
    spec:
      containers:
        - name: app
          image: registry.example.com/app:DOCKER_IMAGE_TAG
";

pub const MANIFEST_PATTERNS: [&str; 2] = [
	r"branch: (?<git_branch>\S+)",
	r"image: registry\.example\.com/app:(?<docker_image_tag>\S+)",
];

pub const STAMPED_MANIFEST: &str = r"apiVersion: apps/v1
kind: Deployment
metadata:
  labels:
    branch: main
spec:
  template:
    spec:
      containers:
        - name: app
          image: registry.example.com/app:1.4.0-abc123
";
