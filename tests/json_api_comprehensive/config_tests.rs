//! Keyspaces configured from `jsonkv.toml`.

use crate::test_utils::*;
use jsonkv::CONFIG_FILE_NAME;
use tempfile::TempDir;

#[test]
fn test_open_creates_default_config() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let ks = Keyspace::open(dir.path()).unwrap();

    assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    assert!(ks.config().legacy_paths);
}

#[test]
fn test_strict_paths_from_config() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "legacy_paths = false\n").unwrap();

    let ks = Keyspace::open(dir.path()).unwrap();
    ks.write().set_json("doc", scenario_doc()).unwrap();
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    assert!(matches!(doc.query("a[2].b"), Err(Error::InvalidPath { .. })));
    assert_eq!(doc.query("$.a[2].b").unwrap().len(), 1);
}

#[test]
fn test_limits_from_config() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[limits]\nmax_nesting_depth = 2\nmax_path_length = 3\n",
    )
    .unwrap();

    let ks = Keyspace::open(dir.path()).unwrap();
    let mut w = ks.write();
    assert!(matches!(w.set_json("deep", json!([[[1]]])), Err(Error::Limit(_))));
    w.set_json("doc", json!({"a": {"b": 1}})).unwrap();
    drop(w);

    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();
    assert_eq!(doc.query("$.a.b").unwrap().len(), 1);
    assert!(matches!(doc.query("$.a.b.c.d"), Err(Error::Limit(_))));
}

#[test]
fn test_invalid_config_is_rejected() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[limits]\nmax_array_size = 0\n").unwrap();
    assert!(Keyspace::open(dir.path()).is_err());
}
