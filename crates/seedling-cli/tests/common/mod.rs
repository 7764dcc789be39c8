//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use std::{fs, path::{Path, PathBuf}};

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated environment: config home, working directory and no
/// `SEEDLING_*` overrides leaking in from the caller.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn seedling(&self) -> Command {
        let mut cmd = Command::cargo_bin("seedling").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.join(".config"))
            .env_remove("SEEDLING_TEMPLATE_DIR")
            .env_remove("SEEDLING_REGISTRY")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.join(rel)).unwrap()
    }
}

pub const PAGE: &str = "<html>\n<head>\n</head>\n<body>\n</body>\n</html>\n";

/// A small template under `tpl/` and a registry at `libs.json`.
pub fn with_fixture(sandbox: &Sandbox) -> (PathBuf, PathBuf) {
    sandbox.write("tpl/index.html", PAGE);
    sandbox.write("tpl/package.json", "{\n  \"name\": \"starter\",\n  \"version\": \"1.0.0\"\n}\n");
    sandbox.write("tpl/src/main.js", "console.log('hi');\n");
    let registry = sandbox.write(
        "libs.json",
        r#"{
  "alpha": { "name": "Alpha", "css": [{ "src": "a.css" }], "js": [{ "src": "a.js", "defer": true }] },
  "beta": { "css": [{ "src": "b.css", "integrity": "sha384-b", "crossorigin": true }] }
}"#,
    );
    (sandbox.join("tpl"), registry)
}
