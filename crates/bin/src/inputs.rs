//! Input discovery for batch parsing.
//!
//! Arguments may name company-facts files directly or directories holding
//! them; directories contribute their `*.json` files in name order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix appended to the input stem for parsed output files.
pub(crate) const PARSED_SUFFIX: &str = "_parsed";

/// Expand files and directories into the list of files to parse.
///
/// Missing paths are returned as given so that the failure is reported per
/// file rather than aborting the batch.
pub(crate) fn collect_inputs(paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut files: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_json(p))
                .collect();
            files.sort();
            inputs.extend(files);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Output file for an input: `<output_dir>/<stem>_parsed.<extension>`.
pub(crate) fn output_path(output_dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "company".into(), |s| s.to_string_lossy());
    output_dir.join(format!("{stem}{PARSED_SUFFIX}.{extension}"))
}
