//! Analyzer configuration, loaded from `arkstub.toml`.
//!
//! Every section falls back to defaults, so an empty file (or no file) is valid.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, StubError};

pub const CONFIG_FILE_NAME: &str = "arkstub.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub analyze: AnalyzeConfig,
    pub infer: InferConfig,
    pub generate: GenerateConfig,
    /// module path → (declaration name → declaration text)
    pub extra_declarations: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Recursively scanned, relative to the module root
    pub source_dir: String,
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_dir: "src/main".to_string(),
            extensions: vec!["ets".to_string(), "ts".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    /// Namespace segments that never lead to a static method call
    pub reserved_segments: Vec<String>,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            reserved_segments: vec!["enc".to_string(), "mode".to_string(), "pad".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferConfig {
    /// Module path prefixes of the platform SDK
    pub platform_prefixes: Vec<String>,
    /// SDK names that are inferred as type aliases
    pub alias_like_names: Vec<String>,
    /// Owner suffixes that make `create`/`from` take a size
    pub collection_suffixes: Vec<String>,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            platform_prefixes: vec!["@kit.".to_string()],
            alias_like_names: vec!["Permissions".to_string(), "abilityAccessCtrl".to_string()],
            collection_suffixes: vec!["Array".to_string(), "List".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Dependencies under these prefixes ship with the SDK and get no stub
    pub sdk_prefixes: Vec<String>,
    pub manifest_name: String,
    pub stub_version: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            sdk_prefixes: vec!["@kit.".to_string(), "@ohos.".to_string(), "@hms.".to_string()],
            manifest_name: "oh-package.json5".to_string(),
            stub_version: "1.0.0".to_string(),
        }
    }
}

impl GenerateConfig {
    pub fn is_sdk_module(&self, module_path: &str) -> bool {
        self.sdk_prefixes
            .iter()
            .any(|prefix| module_path.starts_with(prefix.as_str()))
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| StubError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| StubError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Explicit file if given, else `<module_root>/arkstub.toml` when present, else defaults
    pub fn resolve(explicit: Option<&Path>, module_root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = module_root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("Loading config from {}", candidate.display());
            return Self::load(&candidate);
        }

        Ok(Self::default())
    }
}
