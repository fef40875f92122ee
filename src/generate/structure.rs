use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::dts::render_declarations;
use crate::config::GenerateConfig;
use crate::error::{Result, StubError};
use crate::types::DependencyInfo;

pub const DECLARATION_FILE: &str = "index.d.ts";

/// Location of a dependency under the project root.
///
/// - `@pura/harmony-utils` -> `<root>/@pura/harmony-utils`
/// - `lodash` -> `<root>/lodash`
pub fn dependency_dir(project_root: &Path, module_path: &str) -> PathBuf {
    let mut path = project_root.to_path_buf();
    for part in module_path.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}

/// Manifest value pointing a module at the generated directory
pub fn local_reference(module_path: &str) -> String {
    format!("file:../{}", module_path)
}

fn stub_manifest(dep: &DependencyInfo, config: &GenerateConfig) -> String {
    let manifest = json!({
        "name": dep.oh_package_name(),
        "version": config.stub_version,
        "description": format!("Local stub declarations for {}", dep.module_path),
        "main": DECLARATION_FILE,
        "types": DECLARATION_FILE,
    });
    let mut content = serde_json::to_string_pretty(&manifest).unwrap_or_else(|_| "{}".to_string());
    content.push('\n');
    content
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| StubError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Create one directory per dependency with `index.d.ts` and a stub manifest
pub fn write_structure(
    dependencies: &BTreeMap<String, DependencyInfo>,
    project_root: &Path,
    config: &GenerateConfig,
) -> Result<Vec<PathBuf>> {
    tracing::info!("Generating dependency structure in project root: {}", project_root.display());

    let mut written = Vec::with_capacity(dependencies.len());
    for dep in dependencies.values() {
        let dir = dependency_dir(project_root, &dep.module_path);
        tracing::info!("  Creating dependency: {} -> {}", dep.module_path, dir.display());

        fs::create_dir_all(&dir).map_err(|source| StubError::Write {
            path: dir.clone(),
            source,
        })?;
        write_file(&dir.join(DECLARATION_FILE), &render_declarations(dep))?;
        write_file(&dir.join(&config.manifest_name), &stub_manifest(dep, config))?;

        written.push(dir);
    }

    tracing::info!("Generated {} dependencies", written.len());
    Ok(written)
}
