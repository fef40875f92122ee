//! `index.d.ts` rendering of an inferred dependency model.
//!
//! Namespace imports (`import * as CryptoJS from 'crypto-js'`) bind the whole module, so
//! their children are emitted as module-level exports. Nodes that share a name in one
//! scope are merged into a single entry and rendered as at most one type declaration,
//! one value declaration and one namespace block, which keeps the output free of
//! duplicate identifiers.

use crate::aggregate::infer::{is_object_like, OPAQUE};
use crate::types::{DependencyInfo, InterfaceMethod, TypeKind, TypeNode};

/// Where the methods of an owner are rendered
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    /// Module level, in the body of the owner's top-level declaration
    Module,
    /// Inside the namespace at `container`, re-exported at module level as a type alias
    Relocated { container: String },
}

/// All nodes of one scope that share a name
#[derive(Debug)]
struct Entry<'a> {
    name: &'a str,
    kinds: Vec<TypeKind>,
    paths: Vec<String>,
    return_type: Option<&'a str>,
}

impl<'a> Entry<'a> {
    fn bare(name: &'a str) -> Self {
        Self {
            name,
            kinds: Vec::new(),
            paths: Vec::new(),
            return_type: None,
        }
    }
}

fn collect_entries<'a>(nodes: impl IntoIterator<Item = &'a TypeNode>) -> Vec<Entry<'a>> {
    let mut entries: Vec<Entry<'a>> = Vec::new();
    for node in nodes {
        let idx = match entries.iter().position(|e| e.name == node.name) {
            Some(idx) => idx,
            None => {
                entries.push(Entry::bare(&node.name));
                entries.len() - 1
            }
        };
        let entry = &mut entries[idx];
        if !entry.kinds.contains(&node.kind) {
            entry.kinds.push(node.kind);
        }
        let path = node.qualified_path();
        if !entry.paths.contains(&path) {
            entry.paths.push(path);
        }
        if node.kind == TypeKind::Function && entry.return_type.is_none() {
            entry.return_type = node.return_type.as_deref();
        }
    }
    entries
}

struct Renderer<'a> {
    dep: &'a DependencyInfo,
    flattened: Vec<&'a str>,
    placements: Vec<(&'a str, Placement)>,
    out: String,
}

impl<'a> Renderer<'a> {
    fn new(dep: &'a DependencyInfo) -> Self {
        let flattened: Vec<&str> = dep
            .top_level_types()
            .filter(|t| t.kind == TypeKind::Namespace)
            .map(|t| t.name.as_str())
            .collect();

        let mut renderer = Self {
            dep,
            flattened,
            placements: Vec::new(),
            out: String::new(),
        };
        renderer.placements = dep
            .method_owners()
            .into_iter()
            .map(|owner| (owner, renderer.placement_of(owner)))
            .collect();
        renderer
    }

    fn placement_of(&self, owner: &str) -> Placement {
        // An imported symbol is declared at module level, its methods stay with it
        let imported = self
            .dep
            .top_level_types()
            .any(|t| t.name == owner && t.kind != TypeKind::Namespace && t.signature.is_some());
        if imported {
            return Placement::Module;
        }

        let qualifier = self
            .dep
            .methods_for_interface(owner)
            .into_iter()
            .find(|m| m.is_static)
            .map(|m| m.full_qualifier.as_str());
        let Some(qualifier) = qualifier else {
            return Placement::Module;
        };

        let segments: Vec<&str> = qualifier.split('.').collect();
        if segments.len() < 3 {
            return Placement::Module;
        }
        let container = segments[..segments.len() - 2].join(".");
        if self.flattened.contains(&container.as_str()) {
            Placement::Module
        } else {
            Placement::Relocated { container }
        }
    }

    fn is_relocated(&self, owner: &str) -> bool {
        self.placements
            .iter()
            .any(|(o, p)| *o == owner && matches!(p, Placement::Relocated { .. }))
    }

    /// Owners whose class lives in a namespace at one of `paths`
    fn hosted_in(&self, paths: &[String]) -> Vec<&'a str> {
        self.placements
            .iter()
            .filter_map(|(owner, placement)| match placement {
                Placement::Relocated { container } if paths.contains(container) => Some(*owner),
                _ => None,
            })
            .collect()
    }

    /// `lib.WordArray` for a class relocated into `CryptoJS.lib` under a flattened root
    fn alias_target(&self, owner: &str) -> Option<String> {
        self.placements.iter().find_map(|(o, placement)| match placement {
            Placement::Relocated { container } if *o == owner => {
                let (head, rest) = match container.split_once('.') {
                    Some((head, rest)) => (head, Some(rest)),
                    None => (container.as_str(), None),
                };
                let path = match rest {
                    Some(rest) if self.flattened.contains(&head) => rest.to_string(),
                    None if self.flattened.contains(&head) => return None,
                    _ => container.clone(),
                };
                Some(format!("{}.{}", path, owner))
            }
            _ => None,
        })
    }

    fn render(mut self) -> String {
        let dep = self.dep;
        self.push_line(&format!(
            "// Stub declarations for '{}' generated by arkstub.",
            dep.module_path
        ));
        self.push_line("// Shapes are inferred from usage in the importing module.");
        self.push_line("");
        let header_len = self.out.len();

        let module_nodes = dep.types.iter().filter(|t| match &t.parent_path {
            None => t.kind != TypeKind::Namespace,
            Some(parent) => self.flattened.contains(&parent.as_str()),
        });

        let owners: Vec<&'a str> = self.placements.iter().map(|(owner, _)| *owner).collect();
        let module_owners: Vec<&'a str> = self
            .placements
            .iter()
            .filter(|(_, p)| *p == Placement::Module)
            .map(|(owner, _)| *owner)
            .collect();

        let mut entries = collect_entries(module_nodes);
        for owner in &owners {
            if !entries.iter().any(|e| e.name == *owner) {
                entries.push(Entry::bare(*owner));
            }
        }
        for entry in &entries {
            self.render_entry(entry, &module_owners, 0);
        }

        if let Some(name) = dep.default_import_name() {
            self.push_line(&format!("export default {};", name));
        }

        for (name, declaration) in &dep.extra_declarations {
            tracing::trace!("Appending extra declaration {} to {}", name, dep.module_path);
            self.push_line(declaration.trim_end());
        }

        if self.out.len() == header_len {
            self.push_line("export {};");
        }

        self.out
    }

    fn render_scope(&mut self, nodes: Vec<&'a TypeNode>, owners: Vec<&'a str>, depth: usize) {
        let mut entries = collect_entries(nodes);
        for owner in &owners {
            if !entries.iter().any(|e| e.name == *owner) {
                entries.push(Entry::bare(*owner));
            }
        }
        for entry in &entries {
            self.render_entry(entry, &owners, depth);
        }
    }

    fn has_nested(&self, entry: &Entry<'a>) -> bool {
        entry.kinds.contains(&TypeKind::Namespace)
            || entry.paths.iter().any(|p| self.dep.has_children(p))
            || !self.hosted_in(&entry.paths).is_empty()
    }

    fn render_entry(&mut self, entry: &Entry<'a>, scope_owners: &[&'a str], depth: usize) {
        let dep = self.dep;
        let indent = "  ".repeat(depth);
        let declare = if depth == 0 { "declare " } else { "" };
        let name = entry.name;

        let methods: Vec<&InterfaceMethod> = if scope_owners.contains(&name) {
            dep.methods_for_interface(name)
        } else {
            Vec::new()
        };

        // The class of a relocated owner is rendered in its container
        let relocated_away = depth == 0 && self.is_relocated(name);
        let mut kinds = entry.kinds.clone();
        if relocated_away {
            kinds.retain(|k| *k != TypeKind::Interface);
        }
        let has = |kind: TypeKind| kinds.contains(&kind);
        let nested = self.has_nested(entry);

        let is_class = has(TypeKind::Class)
            || has(TypeKind::Struct)
            || methods.iter().any(|m| m.is_static);
        let mut declares_type = true;
        let mut declares_value = false;

        if is_class || has(TypeKind::Interface) || !methods.is_empty() {
            let head = if is_class {
                format!("{}export {}class {}", indent, declare, name)
            } else {
                format!("{}export interface {}", indent, name)
            };
            self.push_body(&head, &methods, &indent);
            declares_value = is_class;
        } else if has(TypeKind::Enum) {
            self.push_line(&format!("{}export {}enum {} {{}}", indent, declare, name));
            declares_value = true;
        } else if has(TypeKind::TypeAlias) {
            self.push_line(&format!("{}export type {} = {};", indent, name, OPAQUE));
        } else {
            declares_type = false;
        }

        if !declares_type && relocated_away {
            if let Some(target) = self.alias_target(name) {
                self.push_line(&format!("{}export type {} = {};", indent, name, target));
            }
        }

        if !declares_value {
            if has(TypeKind::Function) {
                self.push_line(&format!(
                    "{}export {}function {}(...args: {}[]): {};",
                    indent,
                    declare,
                    name,
                    OPAQUE,
                    entry.return_type.unwrap_or(OPAQUE)
                ));
            } else if has(TypeKind::Const) && !nested {
                let ty = if is_object_like(name) {
                    "Record<string, unknown>"
                } else {
                    OPAQUE
                };
                self.push_line(&format!("{}export {}const {}: {};", indent, declare, name, ty));
            }
        }

        if nested {
            let children: Vec<&'a TypeNode> = entry
                .paths
                .iter()
                .flat_map(|p| dep.children_of(p))
                .collect();
            let hosted = self.hosted_in(&entry.paths);

            self.push_line(&format!("{}export {}namespace {} {{", indent, declare, name));
            self.render_scope(children, hosted, depth + 1);
            self.push_line(&format!("{}}}", indent));
        }
    }

    fn push_body(&mut self, head: &str, methods: &[&InterfaceMethod], indent: &str) {
        if methods.is_empty() {
            self.push_line(&format!("{} {{}}", head));
            return;
        }
        self.push_line(&format!("{} {{", head));
        for method in methods {
            self.push_line(&format!("{}  {};", indent, method.signature()));
        }
        self.push_line(&format!("{}}}", indent));
    }

    fn push_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }
}

/// Render the ambient declarations for one dependency
pub fn render_declarations(dep: &DependencyInfo) -> String {
    Renderer::new(dep).render()
}
