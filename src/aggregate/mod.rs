//! Cross-file aggregation of parse results into one model per external package.
//!
//! Runs as a single ordered pass after extraction: insertion order feeds the
//! check-before-insert deduplication of [`DependencyInfo`].

pub mod infer;
mod namespace;

use std::collections::BTreeMap;

use crate::config::InferConfig;
use crate::types::{DependencyInfo, ParseResult};

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: InferConfig,
}

impl Aggregator {
    pub fn new(config: &InferConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Merge all files of a module, keyed by external module path
    pub fn aggregate(&self, results: &[ParseResult]) -> BTreeMap<String, DependencyInfo> {
        let mut dependencies: BTreeMap<String, DependencyInfo> = BTreeMap::new();

        for result in results {
            self.collect_imports(result, &mut dependencies);
            self.collect_accesses(result, &mut dependencies);
        }

        tracing::info!("Found {} external dependencies", dependencies.len());
        for dep in dependencies.values() {
            tracing::info!(
                "  - {}: {} imports, {} types, {} methods",
                dep.module_path,
                dep.imports.len(),
                dep.types.len(),
                dep.methods.len()
            );
        }

        dependencies
    }

    fn collect_imports(
        &self,
        result: &ParseResult,
        dependencies: &mut BTreeMap<String, DependencyInfo>,
    ) {
        for import in result.imports.iter().filter(|i| i.is_external()) {
            let dep = dependencies
                .entry(import.module_path.clone())
                .or_insert_with(|| DependencyInfo::new(import.module_path.as_str()));
            dep.add_import(import.clone());
            namespace::insert_import_root(dep, import, &self.config);
        }
    }

    fn collect_accesses(
        &self,
        result: &ParseResult,
        dependencies: &mut BTreeMap<String, DependencyInfo>,
    ) {
        tracing::debug!(
            "Processing {} member accesses for file: {}",
            result.member_accesses.len(),
            result.file_path
        );

        for access in &result.member_accesses {
            // Bindings are file-local: resolve through this file's imports only
            let Some(import) = result.binding_for(&access.base_object) else {
                tracing::debug!("  No import binds {}", access.base_object);
                continue;
            };
            let Some(dep) = dependencies.get_mut(&import.module_path) else {
                tracing::debug!(
                    "  {} is bound to local module {}",
                    access.base_object,
                    import.module_path
                );
                continue;
            };

            // Aliased names hang under the node of the imported symbol
            let mut segments = access.segments();
            if segments.is_empty() {
                continue;
            }
            segments[0] = import.root_name();

            if access.is_static_method_call() {
                namespace::insert_static_call(dep, &segments, access, &self.config);
            } else {
                namespace::insert_chain(dep, &segments, access, &self.config);
            }
        }
    }
}
