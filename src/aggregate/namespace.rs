//! Building the namespace tree of a dependency from dotted access paths.
//!
//! `CryptoJS.enc.Utf8.parse(...)` yields:
//! - const `enc` under `CryptoJS`
//! - const `Utf8` under `CryptoJS.enc`
//! - function `parse` under `CryptoJS.enc.Utf8`
//! - instance method `Utf8.parse`

use super::infer;
use crate::config::InferConfig;
use crate::types::{
    AccessContext, DependencyInfo, ImportInfo, InterfaceMethod, MemberAccess, TypeKind, TypeNode,
};

/// Add the node that represents an imported symbol
pub(crate) fn insert_import_root(
    dep: &mut DependencyInfo,
    import: &ImportInfo,
    config: &InferConfig,
) {
    let name = import.root_name();
    let kind = if import.is_wildcard() {
        TypeKind::Namespace
    } else {
        infer::top_level_kind(name, &dep.module_path, config)
    };

    let node = TypeNode::new(name, kind).with_signature(infer::root_signature(name, kind));
    if dep.insert_type(node) {
        tracing::trace!("Added root {} {} to {}", kind, name, dep.module_path);
    }
}

fn insert_intermediates(dep: &mut DependencyInfo, segments: &[&str], end: usize) {
    for i in 1..end {
        let parent_path = segments[..i].join(".");
        let node = TypeNode::new(segments[i], TypeKind::Const).with_parent(parent_path);
        if dep.insert_type(node) {
            tracing::trace!(
                "Added intermediate namespace: {} under {}",
                segments[i],
                segments[..i].join(".")
            );
        }
    }
}

/// Insert every segment of a non-static access below the import root
pub(crate) fn insert_chain(
    dep: &mut DependencyInfo,
    segments: &[&str],
    access: &MemberAccess,
    config: &InferConfig,
) {
    if segments.len() < 2 {
        return;
    }

    let last = segments.len() - 1;
    insert_intermediates(dep, segments, last);

    let member = segments[last];
    let parent_path = segments[..last].join(".");
    let kind = infer::member_kind(access.context);
    let mut node = TypeNode::new(member, kind).with_parent(parent_path.as_str());
    if access.context == AccessContext::MethodCall {
        node = node.with_return_type(infer::leaf_return_type(member));
    }
    if dep.insert_type(node) {
        tracing::trace!("Added member: {} to namespace: {}", member, parent_path);
    }

    // Root.ns.Owner.method(): method belongs to Owner. Root.method() only names a function.
    if access.context == AccessContext::MethodCall && segments.len() >= 3 {
        let owner = segments[last - 1];
        let shape = infer::method_shape(owner, member, &config.collection_suffixes);
        let qualifier = segments.join(".");
        let method = InterfaceMethod::new(member, false, &shape.return_type, owner, &qualifier)
            .with_parameters(shape.parameters);
        if dep.insert_method(method) {
            tracing::debug!(
                "Added instance method: {}.{} -> {} (total methods for {}: {})",
                owner,
                member,
                shape.return_type,
                owner,
                dep.methods_for_interface(owner).len()
            );
        }
    }
}

/// Register `Root.[ns.]*Class.method(...)` as a static method of `Class`
pub(crate) fn insert_static_call(
    dep: &mut DependencyInfo,
    segments: &[&str],
    access: &MemberAccess,
    config: &InferConfig,
) {
    let Some(class_name) = access.class_name.as_deref() else {
        return;
    };
    if segments.len() < 3 {
        return;
    }

    // The class and method segments are modeled by the method, not the tree
    insert_intermediates(dep, segments, segments.len() - 2);

    let method_name = access.member_name.as_str();
    let shape = infer::method_shape(class_name, method_name, &config.collection_suffixes);
    let qualifier = segments.join(".");
    let method = InterfaceMethod::new(method_name, true, &shape.return_type, class_name, &qualifier)
        .with_parameters(shape.parameters);
    if dep.insert_method(method) {
        tracing::debug!(
            "Added static method: {}.{} -> {} (total methods for {}: {})",
            class_name,
            method_name,
            shape.return_type,
            class_name,
            dep.methods_for_interface(class_name).len()
        );
    }

    if !dep.has_top_level(class_name) {
        dep.insert_type(TypeNode::new(class_name, TypeKind::Interface));
        tracing::debug!("Added interface type: {}", class_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(dep: &mut DependencyInfo, path: &str, context: AccessContext) {
        let segments: Vec<&str> = path.split('.').collect();
        let member = segments[segments.len() - 1];
        let access = MemberAccess::new(segments[0], path, member, context);
        insert_chain(dep, &segments, &access, &InferConfig::default());
    }

    #[test]
    fn test_chain_builds_tree() {
        let mut dep = DependencyInfo::new("crypto-js");
        chain(&mut dep, "CryptoJS.enc.Utf8.parse", AccessContext::MethodCall);

        assert!(dep.contains_type("enc", TypeKind::Const, Some("CryptoJS")));
        assert!(dep.contains_type("Utf8", TypeKind::Const, Some("CryptoJS.enc")));
        assert!(dep.contains_type("parse", TypeKind::Function, Some("CryptoJS.enc.Utf8")));

        let methods = dep.methods_for_interface("Utf8");
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].method_name, "parse");
        assert!(!methods[0].is_static);
        assert_eq!(methods[0].parameters[0].ty, "string");
    }

    #[test]
    fn test_two_segment_call_has_no_interface_method() {
        let mut dep = DependencyInfo::new("crypto-js");
        chain(&mut dep, "CryptoJS.MD5", AccessContext::MethodCall);
        assert!(dep.contains_type("MD5", TypeKind::Function, Some("CryptoJS")));
        assert!(dep.methods.is_empty());
    }

    #[test]
    fn test_repeated_chain_is_deduplicated() {
        let mut dep = DependencyInfo::new("crypto-js");
        chain(&mut dep, "CryptoJS.enc.Hex.stringify", AccessContext::MethodCall);
        chain(&mut dep, "CryptoJS.enc.Hex.stringify", AccessContext::MethodCall);
        chain(&mut dep, "CryptoJS.enc.Utf8", AccessContext::PropertyAccess);
        // enc, Hex, stringify, Utf8
        assert_eq!(dep.types.len(), 4);
        assert_eq!(dep.methods.len(), 1);
    }

    #[test]
    fn test_property_leaf_is_const() {
        let mut dep = DependencyInfo::new("crypto-js");
        chain(&mut dep, "CryptoJS.mode.CBC", AccessContext::PropertyAccess);
        assert!(dep.contains_type("CBC", TypeKind::Const, Some("CryptoJS.mode")));
        assert!(dep.types.iter().all(|t| t.return_type.is_none()));
    }

    #[test]
    fn test_static_call_registers_class() {
        let mut dep = DependencyInfo::new("crypto-js");
        let path = "CryptoJS.lib.WordArray.random";
        let segments: Vec<&str> = path.split('.').collect();
        let access = MemberAccess::static_call("CryptoJS", path, "random", "WordArray");
        insert_static_call(&mut dep, &segments, &access, &InferConfig::default());
        insert_static_call(&mut dep, &segments, &access, &InferConfig::default());

        assert_eq!(dep.methods.len(), 1);
        assert!(dep.methods[0].is_static);
        assert_eq!(dep.methods[0].return_type, "WordArray");
        assert!(dep.contains_type("WordArray", TypeKind::Interface, None));
        assert!(dep.contains_type("lib", TypeKind::Const, Some("CryptoJS")));
        assert!(!dep.has_children("CryptoJS.lib"));
    }
}
