//! Architectural Enforcement Integration Tests
//!
//! This package contains tests that enforce architectural principles over
//! the drillbook source tree:
//! - No blocking `thread::sleep` in production code (it stalls every task
//!   sharing the cooperative scheduler)
//! - No `unwrap()`/`expect()` in library code outside test modules
//! - The library never installs a global tracing subscriber
//!
//! These tests are designed to catch violations early in the development cycle.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A rule violation at a specific source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the violation
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.text)
    }
}

/// Root of the workspace this package lives in
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../.."))
}

/// All `.rs` files under `dir`, skipping build output
#[must_use]
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .filter(|e| !e.path().components().any(|c| c.as_os_str() == "target"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Lines of `source` that precede its `#[cfg(test)]` module
fn production_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(i, line)| (i + 1, line))
}

/// Find production lines in `files` containing any of `needles`
///
/// Comment lines are ignored.
#[must_use]
pub fn find_violations(files: &[PathBuf], needles: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in files {
        let Ok(source) = fs::read_to_string(path) else {
            continue;
        };
        for (line, text) in production_lines(&source) {
            let trimmed = text.trim();
            if trimmed.starts_with("//") {
                continue;
            }
            if needles.iter().any(|needle| trimmed.contains(needle)) {
                violations.push(Violation {
                    path: path.clone(),
                    line,
                    text: trimmed.to_string(),
                });
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(violations: &[Violation]) -> String {
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn crate_sources(name: &str) -> Vec<PathBuf> {
        let dir = workspace_root().join("drillbook").join(name).join("src");
        let files = rust_sources(&dir);
        assert!(!files.is_empty(), "no sources found under {}", dir.display());
        files
    }

    #[test]
    fn test_no_blocking_sleep() {
        let mut files = crate_sources("core");
        files.extend(crate_sources("cli"));

        let violations = find_violations(&files, &["thread::sleep", "std::thread::sleep"]);
        assert!(
            violations.is_empty(),
            "Blocking sleep stalls the cooperative scheduler:\n{}",
            report(&violations)
        );
    }

    #[test]
    fn test_no_unwrap_in_library() {
        let violations = find_violations(&crate_sources("core"), &[".unwrap()", ".expect("]);
        assert!(
            violations.is_empty(),
            "Library code must propagate errors:\n{}",
            report(&violations)
        );
    }

    #[test]
    fn test_library_does_not_install_subscriber() {
        let manifest = workspace_root().join("drillbook/core/Cargo.toml");
        let manifest = fs::read_to_string(&manifest).unwrap();
        let dependencies = manifest
            .split("[dev-dependencies]")
            .next()
            .unwrap_or_default();
        assert!(
            !dependencies.contains("tracing-subscriber"),
            "Only the binary chooses how logs are emitted"
        );
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let source = "fn a() {}\n#[cfg(test)]\nmod tests { fn b() { x.unwrap(); } }\n";
        let lines: Vec<_> = production_lines(source).collect();
        assert_eq!(lines, vec![(1, "fn a() {}")]);
    }
}
