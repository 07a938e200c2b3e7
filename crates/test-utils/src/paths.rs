//! Path utilities for locating test data files.

use std::path::PathBuf;

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Directory holding the shared capabilities and descriptor fixtures.
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Absolute path of a fixture file in [`testdata_dir`].
///
/// Panics if the file does not exist, so a typo fails the test loudly.
pub fn testdata_file(name: &str) -> PathBuf {
    let path = testdata_dir().join(name);
    assert!(path.exists(), "fixture not found: {}", path.display());
    path
}
