use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::access::scan_member_accesses;
use super::exports::parse_export;
use super::imports::parse_import;
use crate::config::AnalyzeConfig;
use crate::error::{Result, StubError};
use crate::types::ParseResult;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*").unwrap());

/// A file that could not be analyzed; the run continues without it
#[derive(Debug, Clone, Serialize)]
pub struct ExtractWarning {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Extraction {
    /// In the order the paths were given
    pub results: Vec<ParseResult>,
    pub warnings: Vec<ExtractWarning>,
}

/// Line-oriented extractor for `.ets`/`.ts` sources.
///
/// Lines are matched independently; statements spanning several lines are not recognized.
#[derive(Debug, Clone)]
pub struct Extractor {
    reserved_segments: HashSet<String>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&AnalyzeConfig::default())
    }
}

impl Extractor {
    pub fn new(config: &AnalyzeConfig) -> Self {
        Self {
            reserved_segments: config.reserved_segments.iter().cloned().collect(),
        }
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        tracing::debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| StubError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.parse_source(&path.to_string_lossy(), &content))
    }

    pub fn parse_source(&self, file_path: &str, content: &str) -> ParseResult {
        let mut result = ParseResult::new(file_path);

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || is_comment(line) {
                continue;
            }

            let imports = parse_import(line);
            let is_import_line = !imports.is_empty();
            result.imports.extend(imports);

            if let Some(export) = parse_export(line) {
                tracing::trace!("Found export: {} {}", export.kind, export.name);
                result.exports.push(export);
            }

            if is_import_line {
                continue;
            }
            count_references(line, &mut result);
            scan_member_accesses(line, &self.reserved_segments, &mut result);
        }

        tracing::debug!(
            "Parsed {} imports, {} exports, {} member accesses from {}",
            result.imports.len(),
            result.exports.len(),
            result.member_accesses.len(),
            file_path
        );

        result
    }

    /// Parse every file in parallel; unreadable files become warnings
    pub fn extract_files(&self, paths: &[PathBuf]) -> Extraction {
        let outcomes: Vec<Result<ParseResult>> =
            paths.par_iter().map(|path| self.parse_file(path)).collect();

        let mut extraction = Extraction::default();
        for (path, outcome) in paths.iter().zip(outcomes) {
            match outcome {
                Ok(result) => extraction.results.push(result),
                Err(e) => {
                    tracing::warn!("Failed to parse file {}: {}", path.display(), e);
                    extraction.warnings.push(ExtractWarning {
                        path: path.to_string_lossy().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        extraction
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with("//") || line.starts_with("/*") || line.starts_with('*')
}

fn count_references(line: &str, result: &mut ParseResult) {
    let mut bound: Vec<&str> = Vec::new();
    for token in IDENTIFIER.find_iter(line) {
        if line[..token.start()].ends_with('.') {
            continue;
        }
        if result.binding_for(token.as_str()).is_some() {
            bound.push(token.as_str());
        }
    }
    for symbol in bound {
        result.add_reference(symbol);
    }
}
