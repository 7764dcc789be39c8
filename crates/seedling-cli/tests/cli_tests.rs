//! `list`, `config`, `init`, `completions` and top-level flags.

mod common;

use predicates::prelude::*;

use common::{Sandbox, with_fixture};

#[test]
fn help_flag() {
    Sandbox::new()
        .seedling()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("new"));
}

#[test]
fn version_flag() {
    Sandbox::new()
        .seedling()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn list_shows_bundled_libraries() {
    Sandbox::new()
        .seedling()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("bootstrap"))
        .stdout(predicate::str::contains("htmx"));
}

#[test]
fn list_plain_prints_ids_in_order() {
    let sandbox = Sandbox::new();
    let (_, registry) = with_fixture(&sandbox);

    sandbox
        .seedling()
        .args(["list", "--format", "list", "--registry"])
        .arg(&registry)
        .assert()
        .success()
        .stdout("alpha\nbeta\n");
}

#[test]
fn list_json_is_an_array_of_definitions() {
    let sandbox = Sandbox::new();
    let (_, registry) = with_fixture(&sandbox);

    let out = sandbox
        .seedling()
        .args(["list", "--format", "json", "--registry"])
        .arg(&registry)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let libraries: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let libraries = libraries.as_array().unwrap();
    assert_eq!(libraries.len(), 2);
    assert_eq!(libraries[0]["id"], "alpha");
    assert_eq!(libraries[1]["css"][0]["integrity"], "sha384-b");
}

#[test]
fn registry_from_environment_is_used() {
    let sandbox = Sandbox::new();
    let (_, registry) = with_fixture(&sandbox);

    sandbox
        .seedling()
        .env("SEEDLING_REGISTRY", &registry)
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout("alpha\nbeta\n");
}

#[test]
fn completions_for_bash() {
    Sandbox::new()
        .seedling()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seedling"));
}

#[test]
fn init_then_config_round_trip() {
    let sandbox = Sandbox::new();
    let config = sandbox.join("conf/seedling.toml");

    sandbox
        .seedling()
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success();
    assert!(config.exists());

    sandbox
        .seedling()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "defaults.library", "bulma"])
        .assert()
        .success();

    sandbox
        .seedling()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "defaults.library"])
        .assert()
        .success()
        .stdout("bulma\n");

    sandbox
        .seedling()
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seedling.toml"));
}

#[test]
fn init_does_not_overwrite_without_force() {
    let sandbox = Sandbox::new();
    let config = sandbox.write("seedling.toml", "[defaults]\nlibrary = \"htmx\"\n");

    sandbox
        .seedling()
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    assert!(sandbox.read("seedling.toml").contains("htmx"));
}

#[test]
fn config_get_unknown_key_is_config_error() {
    Sandbox::new()
        .seedling()
        .args(["config", "get", "defaults.nope"])
        .assert()
        .code(4);
}

#[test]
fn config_set_rejects_wrong_type() {
    let sandbox = Sandbox::new();
    let config = sandbox.join("seedling.toml");

    sandbox
        .seedling()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "cache.registry_ttl_secs", "soon"])
        .assert()
        .code(4);
    assert!(!config.exists());
}
