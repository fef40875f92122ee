use crate::types::{TypeKind, TypeNode};
use once_cell::sync::Lazy;
use regex::Regex;

static EXPORT_CLASS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^export\s+(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\s+(\w+)\s*(<[^>]*>)?",
    )
    .unwrap()
});

static EXPORT_INTERFACE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^export\s+(?:default\s+)?(?:declare\s+)?interface\s+(\w+)\s*(<[^>]*>)?").unwrap()
});

static EXPORT_TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^export\s+(?:default\s+)?(?:declare\s+)?type\s+(\w+)\s*(<[^>]*>)?\s*=").unwrap()
});

static EXPORT_FUNCTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^export\s+(?:default\s+)?(?:declare\s+)?(?:async\s+)?function\s*\*?\s*(\w+)\s*(<[^>]*>)?\s*\(",
    )
    .unwrap()
});

static EXPORT_CONST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^export\s+(?:default\s+)?(?:declare\s+)?const\s+(\w+)\s*[=:]").unwrap()
});

static EXPORT_ENUM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^export\s+(?:default\s+)?(?:declare\s+)?(?:const\s+)?enum\s+(\w+)").unwrap()
});

// @Component export struct Name (decorators must sit on the same line)
static EXPORT_STRUCT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:@\w+(?:\([^)]*\))?\s+)*)export\s+(?:default\s+)?struct\s+(\w+)").unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parse one trimmed line as a top-level export declaration
pub fn parse_export(line: &str) -> Option<TypeNode> {
    if let Some(cap) = EXPORT_CLASS_PATTERN.captures(line) {
        return Some(
            TypeNode::new(&cap[1], TypeKind::Class)
                .with_signature(block_signature(line))
                .with_type_parameters(cap.get(2).map(|m| m.as_str().to_string())),
        );
    }

    if let Some(cap) = EXPORT_INTERFACE_PATTERN.captures(line) {
        return Some(
            TypeNode::new(&cap[1], TypeKind::Interface)
                .with_signature(block_signature(line))
                .with_type_parameters(cap.get(2).map(|m| m.as_str().to_string())),
        );
    }

    if let Some(cap) = EXPORT_TYPE_PATTERN.captures(line) {
        return Some(
            TypeNode::new(&cap[1], TypeKind::TypeAlias)
                .with_signature(statement_signature(line))
                .with_type_parameters(cap.get(2).map(|m| m.as_str().to_string())),
        );
    }

    if let Some(cap) = EXPORT_FUNCTION_PATTERN.captures(line) {
        let header = normalize(header_before_body(line));
        return Some(
            TypeNode::new(&cap[1], TypeKind::Function)
                .with_signature(format!("{};", header.trim_end_matches(';')))
                .with_type_parameters(cap.get(2).map(|m| m.as_str().to_string())),
        );
    }

    if let Some(cap) = EXPORT_CONST_PATTERN.captures(line) {
        let node = TypeNode::new(&cap[1], TypeKind::Const);
        return Some(node.with_signature(statement_signature(line)));
    }

    if let Some(cap) = EXPORT_ENUM_PATTERN.captures(line) {
        let name = &cap[1];
        let node = TypeNode::new(name, TypeKind::Enum);
        return Some(node.with_signature(format!("enum {} {{}}", name)));
    }

    if let Some(cap) = EXPORT_STRUCT_PATTERN.captures(line) {
        let decorators = normalize(cap.get(1).map(|m| m.as_str()).unwrap_or(""));
        let name = &cap[2];
        let signature = if decorators.is_empty() {
            format!("struct {} {{}}", name)
        } else {
            format!("{} struct {} {{}}", decorators, name)
        };
        return Some(TypeNode::new(name, TypeKind::Struct).with_signature(signature));
    }

    None
}

fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").to_string()
}

fn header_before_body(line: &str) -> &str {
    match line.find('{') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// `export class A<T> extends B {` → `export class A<T> extends B {}`
fn block_signature(line: &str) -> String {
    format!("{} {{}}", normalize(header_before_body(line)))
}

fn statement_signature(line: &str) -> String {
    let normalized = normalize(line);
    if normalized.ends_with(';') {
        normalized
    } else {
        format!("{};", normalized)
    }
}
