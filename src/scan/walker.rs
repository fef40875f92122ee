use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::error::{Result, StubError};

/// Source files of a module: `<root>/<source_dir>` recursively, then the root itself.
pub fn discover_sources(module_root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    if !module_root.is_dir() {
        return Err(StubError::ModuleNotFound(module_root.to_path_buf()));
    }

    let mut seen = HashSet::new();
    let mut files = Vec::new();

    let source_dir = module_root.join(&config.source_dir);
    if source_dir.is_dir() {
        collect(&source_dir, None, config, &mut seen, &mut files)?;
    } else {
        tracing::debug!("No source directory at {}", source_dir.display());
    }
    collect(module_root, Some(1), config, &mut seen, &mut files)?;

    tracing::info!("Found {} source files in {}", files.len(), module_root.display());
    Ok(files)
}

fn collect(
    dir: &Path,
    max_depth: Option<usize>,
    config: &ScanConfig,
    seen: &mut HashSet<PathBuf>,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut walker = WalkDir::new(dir).follow_links(false).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    for entry in walker {
        let entry = entry.map_err(|source| StubError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !has_source_extension(entry.path(), config) {
            continue;
        }

        let path = entry.into_path();
        if seen.insert(path.clone()) {
            tracing::trace!("Discovered {}", path.display());
            files.push(path);
        }
    }

    Ok(())
}

fn has_source_extension(path: &Path, config: &ScanConfig) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| config.extensions.iter().any(|e| e == ext))
}
