use crate::types::ImportInfo;
use once_cell::sync::Lazy;
use regex::Regex;

// import [type] { A, B as C } | * as NS | Default from 'module'
static IMPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^import\s+(?:(type)\s+)?(?:\{([^}]*)\}|\*\s+as\s+([\w$]+)|([\w$]+))\s+from\s+['"]([^'"]+)['"]"#,
    )
    .unwrap()
});

// A as B
static ALIAS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\w$]+)\s+as\s+([\w$]+)$").unwrap());

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w$]+$").unwrap());

/// Parse one trimmed line as an import statement.
///
/// Returns one record per bound name; empty if the line is not a single-line import.
pub fn parse_import(line: &str) -> Vec<ImportInfo> {
    let Some(cap) = IMPORT_PATTERN.captures(line) else {
        return Vec::new();
    };

    let is_type_import = cap.get(1).is_some();
    let module_path = cap.get(5).map(|m| m.as_str()).unwrap_or("");

    if let Some(named) = cap.get(2) {
        return parse_named_entries(named.as_str(), module_path, is_type_import);
    }

    if let Some(alias) = cap.get(3) {
        tracing::trace!("Found namespace import: {} as {}", module_path, alias.as_str());
        let import = ImportInfo::namespace(module_path, alias.as_str());
        return vec![import.with_type_only(is_type_import)];
    }

    match cap.get(4) {
        Some(name) => {
            tracing::trace!("Found default import: {} from {}", name.as_str(), module_path);
            let import = ImportInfo::default_import(module_path, name.as_str());
            vec![import.with_type_only(is_type_import)]
        }
        None => Vec::new(),
    }
}

fn parse_named_entries(content: &str, module_path: &str, is_type_import: bool) -> Vec<ImportInfo> {
    let mut imports = Vec::new();

    for part in content.split(',') {
        let mut entry = part.trim();
        if entry.is_empty() {
            continue;
        }

        // Inline modifier: { type A, B }
        let mut entry_is_type = is_type_import;
        if let Some(rest) = entry.strip_prefix("type ") {
            entry = rest.trim();
            entry_is_type = true;
        }

        let import = if let Some(alias) = ALIAS_PATTERN.captures(entry) {
            ImportInfo::named(module_path, &alias[1], Some(&alias[2]))
        } else if NAME_PATTERN.is_match(entry) {
            ImportInfo::named(module_path, entry, None)
        } else {
            tracing::trace!("Skipping unrecognized import entry: {}", entry);
            continue;
        };

        let import = import.with_type_only(entry_is_type);
        tracing::trace!("Found import: {:?}", import);
        imports.push(import);
    }

    imports
}
