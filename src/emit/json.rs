use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyze::ExtractWarning;
use crate::engine::EngineResult;
use crate::generate::PatchOutcome;
use crate::types::{DependencyInfo, ImportInfo, InterfaceMethod, MethodParameter, TypeNode};

#[derive(Serialize)]
pub struct JsonReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub module: String,
    pub project_root: String,
    pub files_scanned: usize,
    pub warnings: Vec<ExtractWarning>,
    pub skipped_sdk_modules: Vec<String>,
    pub dependencies: Vec<DependencyOutput>,
    pub written: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PatchOutcome>,
}

#[derive(Serialize)]
pub struct DependencyOutput {
    pub module_path: String,
    pub imports: Vec<ImportInfo>,
    pub types: Vec<TypeNode>,
    pub methods: Vec<MethodOutput>,
    pub extra_declarations: BTreeMap<String, String>,
}

impl DependencyOutput {
    pub fn from_dependency(dep: &DependencyInfo) -> Self {
        Self {
            module_path: dep.module_path.clone(),
            imports: dep.imports.clone(),
            types: dep.types.clone(),
            methods: dep.methods.iter().map(MethodOutput::from_method).collect(),
            extra_declarations: dep.extra_declarations.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct MethodOutput {
    pub owner: String,
    pub name: String,
    pub is_static: bool,
    pub parameters: Vec<MethodParameter>,
    pub return_type: String,
    pub full_qualifier: String,
    pub signature: String,
}

impl MethodOutput {
    pub fn from_method(method: &InterfaceMethod) -> Self {
        Self {
            owner: method.owning_interface_name.clone(),
            name: method.method_name.clone(),
            is_static: method.is_static,
            parameters: method.parameters.clone(),
            return_type: method.return_type.clone(),
            full_qualifier: method.full_qualifier.clone(),
            signature: method.signature(),
        }
    }
}

impl JsonReport {
    pub fn from_result(result: &EngineResult) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            module: result.module_path.display().to_string(),
            project_root: result.project_root.display().to_string(),
            files_scanned: result.files_scanned,
            warnings: result.warnings.clone(),
            skipped_sdk_modules: result.skipped_sdk.clone(),
            dependencies: result
                .dependencies
                .values()
                .map(DependencyOutput::from_dependency)
                .collect(),
            written: result.written.iter().map(|p| p.display().to_string()).collect(),
            manifest: result.patch.clone(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImportInfo, TypeKind};
    use std::path::PathBuf;

    fn sample_result() -> EngineResult {
        let mut dep = DependencyInfo::new("crypto-js");
        dep.add_import(ImportInfo::namespace("crypto-js", "CryptoJS"));
        dep.insert_type(TypeNode::new("CryptoJS", TypeKind::Namespace));
        let qualifier = "CryptoJS.lib.WordArray.random";
        dep.insert_method(
            InterfaceMethod::new("random", true, "WordArray", "WordArray", qualifier)
                .with_parameters(vec![MethodParameter::new("size", "number")]),
        );

        let mut dependencies = BTreeMap::new();
        dependencies.insert(dep.module_path.clone(), dep);

        EngineResult {
            module_path: PathBuf::from("/work/app/entry"),
            project_root: PathBuf::from("/work/app"),
            files_scanned: 3,
            warnings: Vec::new(),
            dependencies,
            skipped_sdk: vec!["@kit.ArkUI".to_string()],
            written: Vec::new(),
            patch: None,
        }
    }

    #[test]
    fn test_report_shape() {
        let report = JsonReport::from_result(&sample_result());
        let value: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();

        assert_eq!(value["files_scanned"], 3);
        assert_eq!(value["skipped_sdk_modules"][0], "@kit.ArkUI");
        assert!(value.get("manifest").is_none());

        let dep = &value["dependencies"][0];
        assert_eq!(dep["module_path"], "crypto-js");
        assert_eq!(dep["imports"][0]["importedName"], "*");
        assert_eq!(dep["types"][0]["kind"], "namespace");
        assert_eq!(dep["methods"][0]["signature"], "static random(size: number): WordArray");
        assert_eq!(dep["methods"][0]["parameters"][0]["type"], "number");
    }

    #[test]
    fn test_report_includes_version() {
        let report = JsonReport::from_result(&sample_result());
        assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
        assert!(report.to_json().contains("\"generated_at\""));
    }
}
