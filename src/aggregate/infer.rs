//! Naming-convention type inference.
//!
//! Pure functions of names and access context, independent of any particular library.

use crate::config::InferConfig;
use crate::types::{AccessContext, MethodParameter, TypeKind};

pub const OPAQUE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodShape {
    pub return_type: String,
    pub parameters: Vec<MethodParameter>,
}

/// Return type and parameters of `owner.method(...)`
pub fn method_shape(owner: &str, method: &str, collection_suffixes: &[String]) -> MethodShape {
    let (return_type, parameters) = match method {
        "create" | "from" => {
            let is_collection = collection_suffixes
                .iter()
                .any(|suffix| owner.ends_with(suffix.as_str()));
            let param = if is_collection {
                MethodParameter::new("size", "number")
            } else {
                MethodParameter::new("data", OPAQUE)
            };
            (owner.to_string(), vec![param])
        }
        "random" | "generate" => (owner.to_string(), vec![MethodParameter::new("size", "number")]),
        "parse" => (OPAQUE.to_string(), vec![MethodParameter::new("input", "string")]),
        "stringify" | "toString" => (
            "string".to_string(),
            vec![MethodParameter::new("encoder", OPAQUE)],
        ),
        _ => (OPAQUE.to_string(), vec![MethodParameter::new("args", OPAQUE)]),
    };

    MethodShape {
        return_type,
        parameters,
    }
}

/// Return type of a free function member such as `CryptoJS.enc.Utf8.parse`
pub fn leaf_return_type(method: &str) -> &'static str {
    match method {
        "stringify" | "toString" => "string",
        _ => OPAQUE,
    }
}

/// Kind of the final segment of an access chain
pub fn member_kind(context: AccessContext) -> TypeKind {
    match context {
        AccessContext::MethodCall | AccessContext::StaticMethodCall => TypeKind::Function,
        AccessContext::ConstructorCall => TypeKind::Class,
        _ => TypeKind::Const,
    }
}

/// Uppercase constants (`Utf8`, `Base64`) are likely objects with members
pub fn is_object_like(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Kind of an imported symbol that has no member access to go by
pub fn top_level_kind(name: &str, module_path: &str, config: &InferConfig) -> TypeKind {
    let is_platform = config
        .platform_prefixes
        .iter()
        .any(|prefix| module_path.starts_with(prefix.as_str()));

    if is_platform {
        if name.ends_with("Manager") || name.ends_with("Controller") {
            return TypeKind::Class;
        }
        if config.alias_like_names.iter().any(|n| n == name) {
            return TypeKind::TypeAlias;
        }
        return TypeKind::Interface;
    }

    if is_object_like(name) {
        TypeKind::Class
    } else {
        TypeKind::Function
    }
}

pub fn root_signature(name: &str, kind: TypeKind) -> String {
    match kind {
        TypeKind::Class => format!("declare class {} {{}}", name),
        TypeKind::Interface => format!("interface {} {{}}", name),
        TypeKind::Function => format!("declare function {}(...args: any[]): any;", name),
        TypeKind::TypeAlias => format!("type {} = any;", name),
        TypeKind::Namespace => format!("declare namespace {} {{}}", name),
        TypeKind::Const => format!("declare const {}: any;", name),
        TypeKind::Enum => format!("declare enum {} {{}}", name),
        TypeKind::Struct => format!("declare var {}: any;", name),
    }
}
