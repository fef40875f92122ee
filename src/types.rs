use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// How an import clause binds its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportKind {
    /// `import { A, B as C } from 'm'`
    Named,
    /// `import * as ns from 'm'`
    Namespace,
    /// `import A from 'm'`
    Default,
}

/// One entry of an import clause
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    pub module_path: String,
    /// Symbol name, `*` for namespace imports, or the default binding name
    pub imported_name: String,
    pub local_alias: Option<String>,
    pub is_type_import: bool,
    pub kind: ImportKind,
}

impl ImportInfo {
    pub fn named(module_path: &str, imported_name: &str, local_alias: Option<&str>) -> Self {
        Self {
            module_path: module_path.to_string(),
            imported_name: imported_name.to_string(),
            local_alias: local_alias.map(|s| s.to_string()),
            is_type_import: false,
            kind: ImportKind::Named,
        }
    }

    pub fn namespace(module_path: &str, alias: &str) -> Self {
        Self {
            module_path: module_path.to_string(),
            imported_name: "*".to_string(),
            local_alias: Some(alias.to_string()),
            is_type_import: false,
            kind: ImportKind::Namespace,
        }
    }

    pub fn default_import(module_path: &str, name: &str) -> Self {
        Self {
            module_path: module_path.to_string(),
            imported_name: name.to_string(),
            local_alias: None,
            is_type_import: false,
            kind: ImportKind::Default,
        }
    }

    pub fn with_type_only(mut self, is_type_import: bool) -> Self {
        self.is_type_import = is_type_import;
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.imported_name == "*"
    }

    /// Relative specifiers (`./x`, `../x`) are local files, everything else is a package
    pub fn is_external(&self) -> bool {
        !self.module_path.starts_with('.')
    }

    /// Whether `identifier` refers to this import inside the importing file
    pub fn binds(&self, identifier: &str) -> bool {
        if self.is_wildcard() {
            return self.local_alias.as_deref() == Some(identifier);
        }
        self.imported_name == identifier || self.local_alias.as_deref() == Some(identifier)
    }

    /// Name of the node that represents this import inside its dependency
    pub fn root_name(&self) -> &str {
        if self.is_wildcard() {
            self.local_alias.as_deref().unwrap_or("*")
        } else {
            &self.imported_name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Class,
    Interface,
    TypeAlias,
    Function,
    Enum,
    Const,
    Namespace,
    Struct,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::TypeAlias => "type",
            TypeKind::Function => "function",
            TypeKind::Enum => "enum",
            TypeKind::Const => "const",
            TypeKind::Namespace => "namespace",
            TypeKind::Struct => "struct",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declared or inferred type, function, value or namespace.
///
/// Nodes live in a flat list per dependency; `parent_path` is the dotted path of the
/// enclosing node (`None` for top-level nodes), so children are found by filtering on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    pub name: String,
    pub kind: TypeKind,
    pub signature: Option<String>,
    pub type_parameters: Option<String>,
    pub parent_path: Option<String>,
    pub return_type: Option<String>,
}

impl TypeNode {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            signature: None,
            type_parameters: None,
            parent_path: None,
            return_type: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_type_parameters(mut self, type_parameters: Option<String>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    pub fn with_parent(mut self, parent_path: impl Into<String>) -> Self {
        self.parent_path = Some(parent_path.into());
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_path.is_none()
    }

    /// Dotted path of this node: "CryptoJS.enc" for `enc` under `CryptoJS`
    pub fn qualified_path(&self) -> String {
        match &self.parent_path {
            Some(parent) => format!("{}.{}", parent, self.name),
            None => self.name.clone(),
        }
    }

    pub fn key(&self) -> TypeKey {
        TypeKey {
            name: self.name.clone(),
            kind: self.kind,
            parent_path: self.parent_path.clone(),
        }
    }
}

/// Identity of a [`TypeNode`] within one dependency
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub name: String,
    pub kind: TypeKind,
    pub parent_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessContext {
    MethodCall,
    /// `Base.ns.Class.method(...)`, modeled as belonging to `Class`
    StaticMethodCall,
    PropertyAccess,
    ConstructorCall,
    TypeReference,
    Unknown,
}

/// A dotted member-access expression rooted at an imported identifier
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAccess {
    pub base_object: String,
    /// Full dotted path including the base: "CryptoJS.enc.Utf8.parse"
    pub full_path: String,
    pub member_name: String,
    pub context: AccessContext,
    /// Owning class segment, set only for static method calls
    pub class_name: Option<String>,
}

impl MemberAccess {
    pub fn new(
        base_object: &str,
        full_path: &str,
        member_name: &str,
        context: AccessContext,
    ) -> Self {
        Self {
            base_object: base_object.to_string(),
            full_path: full_path.to_string(),
            member_name: member_name.to_string(),
            context,
            class_name: None,
        }
    }

    pub fn static_call(
        base_object: &str,
        full_path: &str,
        member_name: &str,
        class_name: &str,
    ) -> Self {
        Self {
            class_name: Some(class_name.to_string()),
            ..Self::new(base_object, full_path, member_name, AccessContext::StaticMethodCall)
        }
    }

    pub fn is_static_method_call(&self) -> bool {
        self.context == AccessContext::StaticMethodCall && self.class_name.is_some()
    }

    pub fn segments(&self) -> Vec<&str> {
        self.full_path.split('.').collect()
    }

    /// Path without the final member: "CryptoJS.enc" for "CryptoJS.enc.Utf8"
    pub fn namespace_path(&self) -> &str {
        match self.full_path.rfind('.') {
            Some(idx) if idx > 0 => &self.full_path[..idx],
            _ => &self.base_object,
        }
    }
}

impl PartialEq for MemberAccess {
    fn eq(&self, other: &Self) -> bool {
        self.base_object == other.base_object
            && self.full_path == other.full_path
            && self.member_name == other.member_name
    }
}

impl Eq for MemberAccess {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl MethodParameter {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}

impl fmt::Display for MethodParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// A method observed on an interface or class
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceMethod {
    pub method_name: String,
    pub is_static: bool,
    pub parameters: Vec<MethodParameter>,
    pub return_type: String,
    pub owning_interface_name: String,
    /// Path the call was observed at: "CryptoJS.lib.WordArray.random"
    pub full_qualifier: String,
}

impl InterfaceMethod {
    pub fn new(
        method_name: &str,
        is_static: bool,
        return_type: &str,
        owning_interface_name: &str,
        full_qualifier: &str,
    ) -> Self {
        Self {
            method_name: method_name.to_string(),
            is_static,
            parameters: Vec::new(),
            return_type: return_type.to_string(),
            owning_interface_name: owning_interface_name.to_string(),
            full_qualifier: full_qualifier.to_string(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<MethodParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// `[static] name(param: type, ...): returnType`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        format!(
            "{}{}({}): {}",
            if self.is_static { "static " } else { "" },
            self.method_name,
            params.join(", "),
            self.return_type
        )
    }

    pub fn key(&self) -> MethodKey {
        MethodKey {
            method_name: self.method_name.clone(),
            owning_interface_name: self.owning_interface_name.clone(),
            is_static: self.is_static,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub method_name: String,
    pub owning_interface_name: String,
    pub is_static: bool,
}

/// Everything extracted from one source file
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub file_path: String,
    pub imports: Vec<ImportInfo>,
    pub exports: Vec<TypeNode>,
    pub member_accesses: Vec<MemberAccess>,
    /// Usage count of each imported identifier in the file body
    pub symbol_frequency: BTreeMap<String, usize>,
}

impl ParseResult {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Default::default()
        }
    }

    pub fn has_export(&self, name: &str) -> bool {
        self.exports.iter().any(|e| e.name == name)
    }

    /// First import of this file that binds `identifier`
    pub fn binding_for(&self, identifier: &str) -> Option<&ImportInfo> {
        self.imports.iter().find(|imp| imp.binds(identifier))
    }

    pub fn accesses_for(&self, base_object: &str) -> Vec<&MemberAccess> {
        self.member_accesses
            .iter()
            .filter(|ma| ma.base_object == base_object)
            .collect()
    }

    pub fn add_reference(&mut self, symbol: &str) {
        *self.symbol_frequency.entry(symbol.to_string()).or_default() += 1;
    }
}

/// The inferred model of one external package
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyInfo {
    pub module_path: String,
    pub imports: Vec<ImportInfo>,
    pub types: Vec<TypeNode>,
    pub methods: Vec<InterfaceMethod>,
    pub extra_declarations: BTreeMap<String, String>,
    #[serde(skip)]
    type_index: HashSet<TypeKey>,
    #[serde(skip)]
    method_index: HashSet<MethodKey>,
}

impl DependencyInfo {
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            imports: Vec::new(),
            types: Vec::new(),
            methods: Vec::new(),
            extra_declarations: BTreeMap::new(),
            type_index: HashSet::new(),
            method_index: HashSet::new(),
        }
    }

    pub fn add_import(&mut self, import: ImportInfo) {
        self.imports.push(import);
    }

    /// Insert unless a node with the same (name, kind, parent) exists. Returns true if added.
    pub fn insert_type(&mut self, node: TypeNode) -> bool {
        if !self.type_index.insert(node.key()) {
            return false;
        }
        self.types.push(node);
        true
    }

    /// Insert unless the (method, owner, static) identity exists; the first occurrence wins.
    pub fn insert_method(&mut self, method: InterfaceMethod) -> bool {
        if !self.method_index.insert(method.key()) {
            return false;
        }
        self.methods.push(method);
        true
    }

    pub fn contains_type(&self, name: &str, kind: TypeKind, parent_path: Option<&str>) -> bool {
        self.type_index.contains(&TypeKey {
            name: name.to_string(),
            kind,
            parent_path: parent_path.map(|s| s.to_string()),
        })
    }

    pub fn top_level_types(&self) -> impl Iterator<Item = &TypeNode> {
        self.types.iter().filter(|t| t.is_top_level())
    }

    pub fn has_top_level(&self, name: &str) -> bool {
        self.top_level_types().any(|t| t.name == name)
    }

    /// Nodes whose parent is the dotted `path`
    pub fn children_of(&self, path: &str) -> Vec<&TypeNode> {
        self.types
            .iter()
            .filter(|t| t.parent_path.as_deref() == Some(path))
            .collect()
    }

    pub fn has_children(&self, path: &str) -> bool {
        self.types.iter().any(|t| t.parent_path.as_deref() == Some(path))
    }

    pub fn methods_for_interface(&self, owner: &str) -> Vec<&InterfaceMethod> {
        self.methods
            .iter()
            .filter(|m| m.owning_interface_name == owner)
            .collect()
    }

    /// Owner names in first-seen order
    pub fn method_owners(&self) -> Vec<&str> {
        let mut owners: Vec<&str> = Vec::new();
        for method in &self.methods {
            if !owners.contains(&method.owning_interface_name.as_str()) {
                owners.push(&method.owning_interface_name);
            }
        }
        owners
    }

    /// Name of the first default import; a module has one default export
    pub fn default_import_name(&self) -> Option<&str> {
        self.imports
            .iter()
            .find(|i| i.kind == ImportKind::Default)
            .map(|i| i.imported_name.as_str())
    }

    pub fn add_extra_declaration(&mut self, name: &str, declaration: &str) {
        self.extra_declarations
            .insert(name.to_string(), declaration.to_string());
    }

    /// Package name for the stub manifest: "@pura/harmony-utils" → "pura_harmony-utils"
    pub fn oh_package_name(&self) -> String {
        self.module_path
            .strip_prefix('@')
            .unwrap_or(&self.module_path)
            .replace('/', "_")
    }
}
