// partition.rs — Test output partitioning
//
// Splits the rendered test bodies into N roughly equal files by contiguous
// index ranges, each prefixed with the fixed helper include. No reordering
// and no rebalancing by content size.
//
// Preconditions: `n_files >= 1`; tests are in final emission order.
// Postconditions: concatenating the slices (headers aside) reproduces the
//   input order exactly.
// Failure modes: file IO errors in `write_files`.
// Side effects: `write_files` creates/overwrites files under `out_dir`.

use std::path::{Path, PathBuf};

use crate::diag::GenError;
use crate::testgen::GeneratedTestCase;

/// Fixed boilerplate header for every generated test file.
pub const TEST_FILE_HEADER: &str = "#include <test/expressions/expression_test_helpers.hpp>\n\n";

/// Render `n_files` file contents from the ordered test list.
pub fn partition(tests: &[GeneratedTestCase], n_files: usize) -> Vec<String> {
    let mut files = Vec::with_capacity(n_files);
    for i in 0..n_files {
        let start = i * tests.len() / n_files;
        let end = (i + 1) * tests.len() / n_files;
        let mut content = String::from(TEST_FILE_HEADER);
        for test in &tests[start..end] {
            content.push_str(&test.body);
        }
        files.push(content);
    }
    files
}

/// Write partitioned contents as `tests{i}_test.cpp` under `out_dir`.
/// Returns the written paths.
pub fn write_files(contents: &[String], out_dir: &Path) -> Result<Vec<PathBuf>, GenError> {
    std::fs::create_dir_all(out_dir).map_err(|e| GenError::Io {
        path: out_dir.to_path_buf(),
        source: e,
    })?;
    let mut paths = Vec::with_capacity(contents.len());
    for (i, content) in contents.iter().enumerate() {
        let path = out_dir.join(format!("tests{i}_test.cpp"));
        std::fs::write(&path, content).map_err(|e| GenError::Io {
            path: path.clone(),
            source: e,
        })?;
        paths.push(path);
    }
    Ok(paths)
}

// ── Tests ──
