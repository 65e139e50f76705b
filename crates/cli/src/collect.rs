//! File collection for the inspection commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// Extensions gathered by default when walking a directory tree.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "java", "php", "xml", "pom", "jsp", "py", "js", "ts", "go", "rb", "c", "h", "cpp", "cs",
];

/// Expand the given paths into a flat file list.
///
/// Explicit files are kept as-is; directories are walked recursively,
/// honoring ignore files, and filtered to the extension set. `pom.xml` is
/// always kept. The result is sorted for stable output.
pub fn collect_files(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        if !path.is_dir() {
            anyhow::bail!("no such file or directory: {}", path.display());
        }

        for entry in WalkBuilder::new(path).build() {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let file = entry.path();
            if matches_extensions(file, extensions) {
                files.push(file.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn matches_extensions(path: &Path, extensions: &[String]) -> bool {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    if file_name.eq_ignore_ascii_case("pom.xml") {
        return true;
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(ext))
        })
}
