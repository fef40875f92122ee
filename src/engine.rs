//! End-to-end processing of one module: discover, extract, aggregate, generate.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::aggregate::Aggregator;
use crate::analyze::{ExtractWarning, Extractor};
use crate::config::Config;
use crate::error::{Result, StubError};
use crate::generate::{patch_manifest, write_structure, PatchOutcome};
use crate::scan::discover_sources;
use crate::types::DependencyInfo;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Analyze only; nothing is written
    pub dry_run: bool,
    /// Keep SDK modules instead of skipping them
    pub include_sdk: bool,
}

#[derive(Debug)]
pub struct EngineResult {
    pub module_path: PathBuf,
    /// Parent of the module; generated dependencies live here
    pub project_root: PathBuf,
    pub files_scanned: usize,
    pub warnings: Vec<ExtractWarning>,
    /// Dependencies that get (or would get) a stub directory
    pub dependencies: BTreeMap<String, DependencyInfo>,
    pub skipped_sdk: Vec<String>,
    pub written: Vec<PathBuf>,
    pub patch: Option<PatchOutcome>,
}

impl EngineResult {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

pub struct Engine {
    config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn process(&self, module_root: &Path, options: &ProcessOptions) -> Result<EngineResult> {
        tracing::info!("Processing module: {}", module_root.display());

        let files = discover_sources(module_root, &self.config.scan)?;
        let module_path = module_root.canonicalize().map_err(|source| StubError::Read {
            path: module_root.to_path_buf(),
            source,
        })?;
        let project_root = module_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| module_path.clone());

        let extraction = Extractor::new(&self.config.analyze).extract_files(&files);
        let all = Aggregator::new(&self.config.infer).aggregate(&extraction.results);

        let mut dependencies = BTreeMap::new();
        let mut skipped_sdk = Vec::new();
        for (module, dep) in all {
            if !options.include_sdk && self.config.generate.is_sdk_module(&module) {
                tracing::debug!("Skipping SDK dependency: {}", module);
                skipped_sdk.push(module);
            } else {
                dependencies.insert(module, dep);
            }
        }

        for (module, declarations) in &self.config.extra_declarations {
            let Some(dep) = dependencies.get_mut(module) else {
                tracing::debug!("Extra declarations for unused module {} ignored", module);
                continue;
            };
            for (name, declaration) in declarations {
                dep.add_extra_declaration(name, declaration);
            }
        }

        let mut result = EngineResult {
            module_path,
            project_root,
            files_scanned: files.len(),
            warnings: extraction.warnings,
            dependencies,
            skipped_sdk,
            written: Vec::new(),
            patch: None,
        };

        if result.dependencies.is_empty() {
            if result.skipped_sdk.is_empty() {
                tracing::info!("No external dependencies found, nothing to do.");
            } else {
                tracing::info!("Only SDK dependencies were detected, nothing to do.");
            }
            return Ok(result);
        }

        if options.dry_run {
            tracing::info!("Dry run: {} dependencies not written", result.dependencies.len());
            return Ok(result);
        }

        result.written = write_structure(
            &result.dependencies,
            &result.project_root,
            &self.config.generate,
        )?;
        result.patch = Some(patch_manifest(
            &result.module_path,
            &result.dependencies,
            &self.config.generate,
        )?);

        tracing::info!(
            "Generated {} dependencies in: {}",
            result.written.len(),
            result.project_root.display()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const INDEX: &str = r#"import { PermissionUtil } from '@pura/harmony-utils';
import { router } from '@kit.ArkUI';
import * as CryptoJS from 'crypto-js';
import { helper } from '../common/helper';

@Entry
@Component
export struct Index {
  build() {
    PermissionUtil.checkPermissions(perms);
    const salt = CryptoJS.lib.WordArray.random(16);
  }
}
"#;

    fn module_fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let module = dir.path().join("entry");
        let pages = module.join("src/main/ets/pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("Index.ets"), INDEX).unwrap();
        fs::write(
            module.join("oh-package.json5"),
            "{\n  \"name\": \"entry\",\n  \"dependencies\": {}\n}\n",
        )
        .unwrap();
        (dir, module)
    }

    #[test]
    fn test_process_writes_structure_and_manifest() {
        let (dir, module) = module_fixture();
        let result = Engine::new(Config::default())
            .process(&module, &ProcessOptions::default())
            .unwrap();

        assert_eq!(result.files_scanned, 1);
        assert_eq!(
            result.dependencies.keys().collect::<Vec<_>>(),
            vec!["@pura/harmony-utils", "crypto-js"]
        );
        assert_eq!(result.skipped_sdk, vec!["@kit.ArkUI"]);
        assert_eq!(result.written.len(), 2);

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(result.project_root, root);
        assert!(root.join("@pura/harmony-utils/index.d.ts").is_file());
        assert!(root.join("crypto-js/oh-package.json5").is_file());

        let manifest = fs::read_to_string(module.join("oh-package.json5")).unwrap();
        assert!(manifest.contains("\"crypto-js\": \"file:../crypto-js\""));
        assert!(matches!(result.patch, Some(PatchOutcome::Patched { .. })));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (dir, module) = module_fixture();
        let options = ProcessOptions {
            dry_run: true,
            ..ProcessOptions::default()
        };
        let result = Engine::new(Config::default()).process(&module, &options).unwrap();

        assert_eq!(result.dependencies.len(), 2);
        assert!(result.written.is_empty());
        assert!(result.patch.is_none());
        assert!(!dir.path().join("crypto-js").exists());
        let manifest = fs::read_to_string(module.join("oh-package.json5")).unwrap();
        assert!(!manifest.contains("crypto-js"));
    }

    #[test]
    fn test_include_sdk() {
        let (_dir, module) = module_fixture();
        let options = ProcessOptions {
            dry_run: true,
            include_sdk: true,
        };
        let result = Engine::new(Config::default()).process(&module, &options).unwrap();
        assert!(result.dependencies.contains_key("@kit.ArkUI"));
        assert!(result.skipped_sdk.is_empty());
    }

    #[test]
    fn test_only_sdk_dependencies_is_success() {
        let dir = TempDir::new().unwrap();
        let module = dir.path().join("entry");
        fs::create_dir_all(module.join("src/main/ets")).unwrap();
        fs::write(
            module.join("src/main/ets/App.ets"),
            "import { hilog } from '@kit.PerformanceAnalysisKit';\n",
        )
        .unwrap();

        let result = Engine::new(Config::default())
            .process(&module, &ProcessOptions::default())
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.skipped_sdk, vec!["@kit.PerformanceAnalysisKit"]);
        assert!(result.patch.is_none());
    }

    #[test]
    fn test_missing_module_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Engine::new(Config::default())
            .process(&dir.path().join("missing"), &ProcessOptions::default())
            .unwrap_err();
        assert!(matches!(err, StubError::ModuleNotFound(_)));
    }

    #[test]
    fn test_extra_declarations_merged() {
        let (dir, module) = module_fixture();
        let config = Config::parse(
            "[extra_declarations.\"crypto-js\"]\nWordArray = \"export interface Hasher { finalize(): unknown; }\"\n",
        )
        .unwrap();
        Engine::new(config)
            .process(&module, &ProcessOptions::default())
            .unwrap();

        let dts = fs::read_to_string(dir.path().join("crypto-js/index.d.ts")).unwrap();
        assert!(dts.contains("export interface Hasher { finalize(): unknown; }"));
    }
}
