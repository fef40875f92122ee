use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::structure::local_reference;
use crate::config::GenerateConfig;
use crate::error::{Result, StubError};
use crate::types::DependencyInfo;

/// Result of adding local references to a module manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PatchOutcome {
    /// No manifest at the expected location, nothing written
    Missing { path: PathBuf },
    Patched {
        path: PathBuf,
        /// Module paths that received a `file:../` reference
        added: Vec<String>,
        /// Module paths that already had an entry, left untouched
        kept: Vec<String>,
    },
}

/// Point the module manifest at the generated directories. Existing entries are never replaced.
pub fn patch_manifest(
    module_root: &Path,
    dependencies: &BTreeMap<String, DependencyInfo>,
    config: &GenerateConfig,
) -> Result<PatchOutcome> {
    let path = module_root.join(&config.manifest_name);
    if !path.is_file() {
        tracing::warn!("{} not found at: {}", config.manifest_name, path.display());
        return Ok(PatchOutcome::Missing { path });
    }

    let content = fs::read_to_string(&path).map_err(|source| StubError::Read {
        path: path.clone(),
        source,
    })?;
    let mut manifest: Value =
        json5::from_str(&content).map_err(|source| StubError::ManifestSyntax {
            path: path.clone(),
            source,
        })?;

    let Some(root) = manifest.as_object_mut() else {
        return Err(StubError::Manifest {
            path,
            source: serde::de::Error::custom("manifest root is not an object"),
        });
    };
    let entry = root
        .entry("dependencies")
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        tracing::warn!("Replacing non-object dependencies in {}", path.display());
        *entry = Value::Object(Map::new());
    }
    let Some(deps_object) = entry.as_object_mut() else {
        return Ok(PatchOutcome::Missing { path });
    };

    let mut added = Vec::new();
    let mut kept = Vec::new();
    for module_path in dependencies.keys() {
        if deps_object.contains_key(module_path) {
            tracing::debug!("Keeping existing dependency: {}", module_path);
            kept.push(module_path.clone());
            continue;
        }
        let reference = local_reference(module_path);
        tracing::debug!("Added dependency: {} -> {}", module_path, reference);
        deps_object.insert(module_path.clone(), Value::String(reference));
        added.push(module_path.clone());
    }

    if !added.is_empty() {
        let mut output =
            serde_json::to_string_pretty(&manifest).map_err(|source| StubError::Manifest {
                path: path.clone(),
                source,
            })?;
        output.push('\n');
        fs::write(&path, output).map_err(|source| StubError::Write {
            path: path.clone(),
            source,
        })?;
    }

    tracing::info!(
        "Updated {} with {} local dependencies ({} already present)",
        config.manifest_name,
        added.len(),
        kept.len()
    );
    Ok(PatchOutcome::Patched { path, added, kept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn deps(names: &[&str]) -> BTreeMap<String, DependencyInfo> {
        names
            .iter()
            .map(|n| (n.to_string(), DependencyInfo::new(*n)))
            .collect()
    }

    fn patch_single(content: &str) -> Value {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oh-package.json5");
        fs::write(&path, content).unwrap();
        patch_manifest(dir.path(), &deps(&["lodash"]), &GenerateConfig::default()).unwrap();
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap()
    }

    #[test]
    fn test_patch_comments_and_trailing_commas() {
        let value = patch_single(
            r#"{
  // module manifest
  "name": "entry", /* inline */
  "dependencies": {
    "a": "1.0.0",
  },
}"#,
        );
        assert_eq!(value["name"], "entry");
        assert_eq!(value["dependencies"]["a"], "1.0.0");
        assert_eq!(value["dependencies"]["lodash"], "file:../lodash");
    }

    #[test]
    fn test_patch_keeps_string_contents() {
        let value =
            patch_single(r#"{ "url": "https://example.com/a,}", "note": "/* not a comment */" }"#);
        assert_eq!(value["url"], "https://example.com/a,}");
        assert_eq!(value["note"], "/* not a comment */");
    }

    #[test]
    fn test_patch_bare_keys_and_single_quotes() {
        let value = patch_single("{ name: 'entry', license: 'it\\'s \"ok\"', private: true }");
        assert_eq!(value["name"], "entry");
        assert_eq!(value["license"], "it's \"ok\"");
        assert_eq!(value["private"], true);
    }

    #[test]
    fn test_patch_json5_numbers_and_line_continuation() {
        let value = patch_single(
            "{\n  port: 0x1F,\n  ratio: .5,\n  n: +1,\n  note: 'line one \\\nline two',\n}\n",
        );
        assert_eq!(value["port"].as_f64(), Some(31.0));
        assert_eq!(value["ratio"].as_f64(), Some(0.5));
        assert_eq!(value["n"].as_f64(), Some(1.0));
        assert_eq!(value["note"], "line one line two");
        assert_eq!(value["dependencies"]["lodash"], "file:../lodash");
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let outcome =
            patch_manifest(dir.path(), &deps(&["lodash"]), &GenerateConfig::default()).unwrap();
        assert!(matches!(outcome, PatchOutcome::Missing { .. }));
        assert!(!dir.path().join("oh-package.json5").exists());
    }

    #[test]
    fn test_patch_creates_dependencies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oh-package.json5");
        fs::write(&path, "{\n  \"name\": \"entry\",\n  \"version\": \"1.0.0\",\n}\n").unwrap();

        let outcome = patch_manifest(
            dir.path(),
            &deps(&["@pura/harmony-utils", "crypto-js"]),
            &GenerateConfig::default(),
        )
        .unwrap();

        let PatchOutcome::Patched { added, kept, .. } = outcome else {
            panic!("expected patched outcome");
        };
        assert_eq!(added, vec!["@pura/harmony-utils", "crypto-js"]);
        assert!(kept.is_empty());

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["dependencies"]["@pura/harmony-utils"], "file:../@pura/harmony-utils");
        assert_eq!(value["dependencies"]["crypto-js"], "file:../crypto-js");

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "version", "dependencies"]);
    }

    #[test]
    fn test_patch_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oh-package.json5");
        fs::write(&path, r#"{ "dependencies": { "crypto-js": "^4.2.0" } }"#).unwrap();

        let outcome = patch_manifest(
            dir.path(),
            &deps(&["crypto-js", "lodash"]),
            &GenerateConfig::default(),
        )
        .unwrap();
        assert_eq!(
            outcome,
            PatchOutcome::Patched {
                path: path.clone(),
                added: vec!["lodash".to_string()],
                kept: vec!["crypto-js".to_string()],
            }
        );

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["dependencies"]["crypto-js"], "^4.2.0");
        assert_eq!(value["dependencies"]["lodash"], "file:../lodash");
    }

    #[test]
    fn test_patch_without_additions_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oh-package.json5");
        let original = "{\n  // keep me\n  \"dependencies\": { \"lodash\": \"4.17.21\" }\n}\n";
        fs::write(&path, original).unwrap();

        patch_manifest(dir.path(), &deps(&["lodash"]), &GenerateConfig::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_invalid_manifest_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("oh-package.json5"), "{ \"name\": ").unwrap();
        let err = patch_manifest(dir.path(), &deps(&["lodash"]), &GenerateConfig::default())
            .unwrap_err();
        assert!(matches!(err, StubError::ManifestSyntax { .. }));
    }
}
