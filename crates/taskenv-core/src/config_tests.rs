use crate::Config;

#[test]
fn defaults_match_spec_constants() {
    let cfg = Config::default();
    assert_eq!(cfg.page_size, 200);
    assert_eq!(cfg.default_timeout_ms, 25_000);
    assert_eq!(cfg.long_timeout_ms, 500_000);
    assert_eq!(cfg.grep_file_cap, 100);
    assert_eq!(cfg.search_match_cap, 10);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = Config::load(Some(std::path::Path::new("/does/not/exist.toml"))).unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn file_values_are_honored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskenv.toml");
    std::fs::write(&path, "page_size = 50\n").unwrap();
    let cfg = Config::load(Some(&path)).unwrap();
    assert_eq!(cfg.page_size, 50);
    assert_eq!(cfg.default_timeout_ms, Config::default().default_timeout_ms);
}

#[test]
fn env_override_wins_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskenv.toml");
    std::fs::write(&path, "page_size = 50\n").unwrap();
    // Rust 2024 made `env::set_var` unsafe (process-wide mutation); the test
    // process is single-threaded at this point so this is sound.
    unsafe {
        std::env::set_var("TASKENV_PAGE_SIZE", "77");
    }
    let cfg = Config::load(Some(&path)).unwrap();
    unsafe {
        std::env::remove_var("TASKENV_PAGE_SIZE");
    }
    assert_eq!(cfg.page_size, 77);
}
