//! Source discovery over a project tree
//!
//! Walks the source directory and applies a source filter to decide which
//! files enter the compilation set, the way the surrounding build tool's
//! source-discovery step consumes the filter entry.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::CoreError;
use crate::filter::SrcFilter;

/// File extensions that mark a file as build-eligible
const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "s", "S", "asm"];

/// Collect the source files under `src_dir` that survive the filter.
///
/// Filter globs are matched against each file's path relative to
/// `src_dir`, with `/` separators. Entries are visited in sorted order so
/// the result is deterministic.
pub fn discover_sources(src_dir: &Path, filter: &SrcFilter) -> Result<Vec<PathBuf>, CoreError> {
    let mut selected = Vec::new();

    for entry in WalkDir::new(src_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }

        let rel = entry.path().strip_prefix(src_dir).unwrap_or(entry.path());
        let rel = rel.to_string_lossy().replace('\\', "/");
        if filter.matches(&rel) {
            selected.push(entry.path().to_path_buf());
        }
    }

    debug!(
        dir = %src_dir.display(),
        count = selected.len(),
        "source discovery complete"
    );
    Ok(selected)
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::BuildEnv;
    use crate::select::{PLATFORM_VAR, SRC_FILTER_VAR, select_sources};
    use std::fs;
    use tempfile::TempDir;

    /// Lay out a small driver-like source tree
    fn fixture_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        for name in ["radio.c", "radio_spi.c", "radio_esp_spi.c", "README.md"] {
            fs::write(temp.path().join(name), "").unwrap();
        }
        fs::create_dir(temp.path().join("util")).unwrap();
        fs::write(temp.path().join("util/fifo.c"), "").unwrap();
        temp
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn filter_for(platform: Option<&str>) -> SrcFilter {
        let mut env = BuildEnv::new();
        if let Some(platform) = platform {
            env.set_str(PLATFORM_VAR, platform);
        }
        select_sources(&mut env);
        env.get_filter(SRC_FILTER_VAR).unwrap().clone()
    }

    #[test]
    fn test_discover_espressif32() {
        let temp = fixture_tree();
        let filter = filter_for(Some("espressif32"));

        let sources = discover_sources(temp.path(), &filter).unwrap();

        // Sorted walk order: root files first, then util/
        assert_eq!(
            file_names(&sources),
            vec!["radio.c", "radio_esp_spi.c", "fifo.c"]
        );
    }

    #[test]
    fn test_discover_other_platform() {
        let temp = fixture_tree();
        let filter = filter_for(Some("ststm32"));

        let sources = discover_sources(temp.path(), &filter).unwrap();
        let names = file_names(&sources);

        assert!(names.contains(&"radio.c".to_string()));
        assert!(names.contains(&"fifo.c".to_string()));
        assert!(!names.contains(&"radio_spi.c".to_string()));
        assert!(!names.contains(&"radio_esp_spi.c".to_string()));
    }

    #[test]
    fn test_non_source_files_never_selected() {
        let temp = fixture_tree();
        let filter = filter_for(None);

        let sources = discover_sources(temp.path(), &filter).unwrap();

        assert!(file_names(&sources).iter().all(|n| n != "README.md"));
    }

    #[test]
    fn test_missing_dir_is_error() {
        let filter = filter_for(None);
        let missing = Path::new("/nonexistent/srcsel-test-dir");
        assert!(discover_sources(missing, &filter).is_err());
    }
}
