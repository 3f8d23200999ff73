//! Tests for config parsing and layered loading.

use super::*;
use crate::{StoreProvider, DEFAULT_LISTING_ROUTE, DEFAULT_STORE_PATH};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.system_config_path = None;
    options.user_config_path = None;
    options
}

#[test]
fn empty_config_uses_defaults() {
    let config = MockviewConfig::load_from_str("{}").expect("config");
    assert_eq!(config.generation.question_count, 5);
    assert!(!config.generation.strict_shape);
    assert_eq!(config.store.provider, StoreProvider::File);
    assert_eq!(config.store.resolved_path(), DEFAULT_STORE_PATH);
    assert_eq!(config.listing_route, DEFAULT_LISTING_ROUTE);
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = MockviewConfig::load_from_str("{ unexpected: true }").unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_unknown_store_provider() {
    let err = MockviewConfig::load_from_str(r#"{ store: { provider: "firestore" } }"#)
        .unwrap_err();
    assert!(format!("{err}").contains("store.provider"));
}

#[test]
fn rejects_zero_question_count() {
    let err =
        MockviewConfig::load_from_str("{ generation: { question_count: 0 } }").unwrap_err();
    assert!(format!("{err}").contains("generation.question_count"));
}

#[test]
fn rejects_listing_route_without_slash() {
    let err = MockviewConfig::load_from_str(r#"{ listing_route: "generate" }"#).unwrap_err();
    assert!(format!("{err}").contains("listing_route"));
}

#[test]
fn parses_model_and_memory_store() {
    let config = MockviewConfig::load_from_str(
        r#"{
            // comments are allowed in json5
            generation: { model: { provider: "openai", name: "gpt-4.1" }, strict_shape: true },
            store: { provider: "memory" },
        }"#,
    )
    .expect("config");
    let model = config.generation.model.expect("model");
    assert_eq!(model.provider, "openai");
    assert_eq!(model.name, "gpt-4.1");
    assert!(config.generation.strict_shape);
    assert_eq!(config.store.provider, StoreProvider::Memory);
}

#[test]
fn layered_config_prefers_repo_over_cwd_and_user() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("user.json5");
    write_json5(&user_config, "{ generation: { question_count: 3 } }");
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        "{ generation: { question_count: 4 }, listing_route: \"/project\" }",
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ generation: { question_count: 6 } }",
    );
    write_json5(
        &project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
        "{ generation: { question_count: 7 } }",
    );

    let mut options = isolated_options(&cwd);
    options.user_config_path = Some(user_config);

    let layered = MockviewConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.generation.question_count, 7);
    assert_eq!(layered.config.listing_route, "/project");
    let sources: Vec<_> = layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Repo,
        ]
    );
}

#[test]
fn runtime_layer_applies_last() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    fs::create_dir_all(&cwd).expect("cwd");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ store: { provider: \"file\", path: \"cwd-store\" } }",
    );
    let runtime = temp.path().join("runtime.json5");
    write_json5(&runtime, "{ store: { path: \"runtime-store\" } }");

    let options = isolated_options(&cwd).with_runtime_path(&runtime);
    let layered = MockviewConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.store.resolved_path(), "runtime-store");
    assert_eq!(layered.config.store.provider, StoreProvider::File);
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("nope.json5"));
    let err = MockviewConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::MissingLayer(path) if path.ends_with("nope.json5")));
}

#[test]
fn invalid_layer_reports_its_origin() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ generation: { strict_shape: \"yes\" } }",
    );
    let err = MockviewConfig::load_layered_with_options(isolated_options(&cwd)).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("generation.strict_shape"));
}

#[test]
fn system_layer_is_unix_only() {
    let options = LayeredConfigOptions::new(Path::new("."));
    #[cfg(unix)]
    assert_eq!(
        options.system_config_path,
        Some(PathBuf::from("/etc/mockview/mockview.json5"))
    );
    #[cfg(not(unix))]
    assert_eq!(options.system_config_path, None);
}
