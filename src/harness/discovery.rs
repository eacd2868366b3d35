//! Test file discovery and role classification.
//!
//! Files in the suite directory are recognized by filename prefix:
//! `helper*`, `setup*`, `test*`, `teardown*`, all with the `.tess`
//! extension. Everything else is ignored. The scan is non-recursive and
//! the returned list is sorted for deterministic execution order.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::errors::{ErrorKind, TesseraError};

pub const SCRIPT_EXTENSION: &str = "tess";

/// Lifecycle role inferred from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Helper,
    Setup,
    Test,
    Teardown,
}

impl FileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileRole::Helper => "helper",
            FileRole::Setup => "setup",
            FileRole::Test => "test",
            FileRole::Teardown => "teardown",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discovered file plus its inferred role.
#[derive(Debug, Clone, PartialEq)]
pub struct TestFile {
    pub path: PathBuf,
    pub role: FileRole,
}

impl TestFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Classify a filename into a role. `teardown*` is checked before
/// `test*` only for clarity; the prefixes cannot collide.
pub fn classify_role(file_name: &str) -> Option<FileRole> {
    let stem = file_name.strip_suffix(&format!(".{}", SCRIPT_EXTENSION))?;
    if stem.starts_with("teardown") {
        Some(FileRole::Teardown)
    } else if stem.starts_with("test") {
        Some(FileRole::Test)
    } else if stem.starts_with("helper") {
        Some(FileRole::Helper)
    } else if stem.starts_with("setup") {
        Some(FileRole::Setup)
    } else {
        None
    }
}

/// Scan `dir` (one level deep) for recognizable files, sorted by path.
pub fn discover(dir: &Path) -> Result<Vec<TestFile>, TesseraError> {
    if !dir.is_dir() {
        return Err(TesseraError::harness(ErrorKind::SuiteIo {
            path: dir.display().to_string(),
            message: "not a directory".into(),
        }));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            TesseraError::harness(ErrorKind::SuiteIo {
                path: dir.display().to_string(),
                message: e.to_string(),
            })
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(role) = classify_role(&name) {
            files.push(TestFile {
                path: entry.path().to_path_buf(),
                role,
            });
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// The filterable part of a test filename: extension and `test` prefix
/// stripped, a single separator trimmed, lowercased.
pub fn filter_key(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(&format!(".{}", SCRIPT_EXTENSION))
        .unwrap_or(file_name);
    let stripped = stem.strip_prefix("test").unwrap_or(stem);
    let stripped = stripped
        .strip_prefix('-')
        .or_else(|| stripped.strip_prefix('_'))
        .unwrap_or(stripped);
    stripped.to_lowercase()
}

/// Case-insensitive substring match against the filter key. Applied to
/// the test role only; lifecycle files are never filtered out.
pub fn matches_filter(file: &TestFile, filter: &str) -> bool {
    if file.role != FileRole::Test {
        return true;
    }
    filter_key(&file.file_name()).contains(&filter.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_follow_filename_prefixes() {
        assert_eq!(classify_role("test-math.tess"), Some(FileRole::Test));
        assert_eq!(classify_role("teardown-db.tess"), Some(FileRole::Teardown));
        assert_eq!(classify_role("helper-util.tess"), Some(FileRole::Helper));
        assert_eq!(classify_role("setup.tess"), Some(FileRole::Setup));
        assert_eq!(classify_role("readme.md"), None);
        assert_eq!(classify_role("notes.tess"), None);
        // wrong extension is ignored even with a matching prefix
        assert_eq!(classify_role("test-math.txt"), None);
    }

    #[test]
    fn filter_key_strips_prefix_and_extension() {
        assert_eq!(filter_key("test-math.tess"), "math");
        assert_eq!(filter_key("test_strings.tess"), "strings");
        assert_eq!(filter_key("testMath.tess"), "math");
    }

    #[test]
    fn filter_never_excludes_lifecycle_files() {
        let helper = TestFile {
            path: PathBuf::from("helper-util.tess"),
            role: FileRole::Helper,
        };
        assert!(matches_filter(&helper, "zzz"));
        let test = TestFile {
            path: PathBuf::from("test-math.tess"),
            role: FileRole::Test,
        };
        assert!(matches_filter(&test, "math"));
        assert!(!matches_filter(&test, "strings"));
    }
}
