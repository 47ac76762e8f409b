//! Arena of type declarations with bound supertype edges.
//!
//! The index is built once per resolution pass. Building binds every supertype name to a
//! [`TypeId`], rewrites references to in-scope type parameters into type variables and runs
//! hierarchy cycle detection, so every later walk can assume ids are valid.

use std::collections::{HashMap, VecDeque};

use fixedbitset::FixedBitSet;
use nova_types::{simple_type_name, ClassRef, TypeParam, TypeRef, WildcardBound, OBJECT};

use crate::diagnostics::{DiagnosticKind, MethodDiagnostic};
use crate::error::{IndexError, ResolveError};
use crate::hierarchy::{TypeDeclaration, TypeId, TypeKind};
use crate::jdk;
use crate::signature_table::SelectorKey;

/// A bound `extends`/`implements` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectSupertype {
    pub id: TypeId,
    /// Type arguments as written, bound in the subtype's scope. Empty for raw or non-generic
    /// supertypes.
    pub args: Vec<TypeRef>,
}

#[derive(Debug)]
struct Entry {
    decl: TypeDeclaration,
    super_class: Option<DirectSupertype>,
    interfaces: Vec<DirectSupertype>,
}

impl Entry {
    /// The `idx`-th supertype edge: superclass first, then interfaces in declaration order.
    fn edge(&self, idx: usize) -> Option<TypeId> {
        match &self.super_class {
            Some(sup) if idx == 0 => Some(sup.id),
            Some(_) => self.interfaces.get(idx - 1).map(|sup| sup.id),
            None => self.interfaces.get(idx).map(|sup| sup.id),
        }
    }

    fn edges(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..).map_while(move |idx| self.edge(idx))
    }
}

#[derive(Debug)]
pub struct TypeHierarchyIndex {
    entries: Vec<Entry>,
    /// Binary names by id.
    names: Vec<String>,
    by_name: HashMap<String, TypeId>,
    by_simple_name: HashMap<String, Vec<TypeId>>,
    erroneous: FixedBitSet,
    hierarchy_diagnostics: Vec<MethodDiagnostic>,
    object: Option<TypeId>,
}

impl TypeHierarchyIndex {
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.entries.len()).map(|idx| TypeId::from_raw(idx as u32))
    }

    pub fn declaration_of(&self, id: TypeId) -> Result<&TypeDeclaration, ResolveError> {
        self.entries
            .get(id.idx())
            .map(|entry| &entry.decl)
            .ok_or(ResolveError::UnknownType(id))
    }

    /// Superclass followed by superinterfaces, in declaration order.
    pub fn direct_supertypes_of(
        &self,
        id: TypeId,
    ) -> Result<impl Iterator<Item = &DirectSupertype> + '_, ResolveError> {
        let entry = self
            .entries
            .get(id.idx())
            .ok_or(ResolveError::UnknownType(id))?;
        Ok(entry.super_class.iter().chain(entry.interfaces.iter()))
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        resolve_name(&self.by_name, &self.by_simple_name, name)
    }

    pub fn is_erroneous(&self, id: TypeId) -> bool {
        self.erroneous.contains(id.idx())
    }

    /// `HIERARCHY_CYCLE` diagnostics found while building the index.
    pub fn hierarchy_diagnostics(&self) -> &[MethodDiagnostic] {
        &self.hierarchy_diagnostics
    }

    pub fn object(&self) -> Option<TypeId> {
        self.object
    }

    /// Parse `text` and bind its class names the same way declarations are bound.
    ///
    /// Unknown names are kept as written; no type variables are in scope.
    pub fn bind_type(&self, text: &str) -> Result<TypeRef, IndexError> {
        let parsed = TypeRef::parse(text)?;
        Ok(bind(&self.by_name, &self.by_simple_name, &self.names, &parsed, &[]))
    }

    /// Build a lookup key from a method name and written parameter types.
    pub fn selector(&self, name: &str, params: &[&str]) -> Result<SelectorKey, IndexError> {
        let erased_params = params
            .iter()
            .map(|param| Ok(self.bind_type(param)?.erasure(&[])))
            .collect::<Result<Vec<_>, IndexError>>()?;
        Ok(SelectorKey::new(name, erased_params))
    }

    pub(crate) fn decl(&self, id: TypeId) -> &TypeDeclaration {
        &self.entries[id.idx()].decl
    }

    pub(crate) fn kind(&self, id: TypeId) -> TypeKind {
        self.entries[id.idx()].decl.kind
    }

    pub(crate) fn supertypes(&self, id: TypeId) -> impl Iterator<Item = &DirectSupertype> + '_ {
        let entry = &self.entries[id.idx()];
        entry.super_class.iter().chain(entry.interfaces.iter())
    }

    pub(crate) fn superclass_of(&self, id: TypeId) -> Option<&DirectSupertype> {
        self.entries[id.idx()].super_class.as_ref()
    }

    pub(crate) fn simple_name(&self, id: TypeId) -> String {
        simple_type_name(&self.entries[id.idx()].decl.name)
    }

    /// The generic self type `Name<T1, .., Tn>`.
    pub(crate) fn self_type(&self, id: TypeId) -> TypeRef {
        let decl = self.decl(id);
        TypeRef::class(
            decl.name.clone(),
            decl.type_params
                .iter()
                .map(|param| TypeRef::type_var(param.name.clone()))
                .collect(),
        )
    }
}

#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    decls: Vec<TypeDeclaration>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder seeded with the handful of `java.lang` types most hierarchies bottom out in.
    pub fn with_minimal_jdk() -> Self {
        let mut builder = Self::new();
        builder.extend(jdk::minimal_jdk());
        builder
    }

    pub fn add(&mut self, decl: TypeDeclaration) -> &mut Self {
        self.decls.push(decl);
        self
    }

    pub fn extend(&mut self, decls: impl IntoIterator<Item = TypeDeclaration>) -> &mut Self {
        self.decls.extend(decls);
        self
    }

    pub fn build(self) -> Result<TypeHierarchyIndex, IndexError> {
        let mut by_name = HashMap::with_capacity(self.decls.len());
        let mut by_simple_name: HashMap<String, Vec<TypeId>> = HashMap::new();
        for (idx, decl) in self.decls.iter().enumerate() {
            let id = TypeId::from_raw(idx as u32);
            if by_name.insert(decl.name.clone(), id).is_some() {
                return Err(IndexError::DuplicateType(decl.name.clone()));
            }
            by_simple_name
                .entry(simple_type_name(&decl.name))
                .or_default()
                .push(id);
        }
        let names: Vec<&str> = self.decls.iter().map(|decl| decl.name.as_str()).collect();
        let object = by_name.get(OBJECT).copied();

        let mut entries = Vec::with_capacity(self.decls.len());
        for decl in &self.decls {
            let ty_scope: &[TypeParam] = &decl.type_params;
            let bind_in = |ty: &TypeRef, scopes: &[&[TypeParam]]| {
                bind(&by_name, &by_simple_name, &names, ty, scopes)
            };

            let supertype = |ty: &TypeRef, want_class: bool| {
                bind_supertype(&by_name, &by_simple_name, &names, &self.decls, decl, ty, want_class)
            };
            let mut super_class = match (&decl.super_class, decl.kind) {
                (Some(ty), TypeKind::Class) => Some(supertype(ty, true)?),
                (Some(ty), _) => {
                    return Err(IndexError::IllegalSupertype {
                        ty: decl.name.clone(),
                        supertype: ty.to_string(),
                        expected: "a superclass",
                    })
                }
                (None, _) => None,
            };
            if super_class.is_none() && decl.kind == TypeKind::Class && decl.name != OBJECT {
                super_class = object.map(|id| DirectSupertype {
                    id,
                    args: Vec::new(),
                });
            }
            let interfaces = decl
                .interfaces
                .iter()
                .map(|ty| supertype(ty, false))
                .collect::<Result<Vec<_>, _>>()?;

            let mut bound = decl.clone();
            for param in &mut bound.type_params {
                param.bounds = param
                    .bounds
                    .iter()
                    .map(|b| bind_in(b, &[ty_scope]))
                    .collect();
            }
            for method in &mut bound.methods {
                let method_scope = method.type_params.clone();
                let scopes: [&[TypeParam]; 2] = [&method_scope, ty_scope];
                for param in &mut method.type_params {
                    param.bounds = param.bounds.iter().map(|b| bind_in(b, &scopes)).collect();
                }
                method.params = method.params.iter().map(|p| bind_in(p, &scopes)).collect();
                method.return_type = bind_in(&method.return_type, &scopes);
            }
            bound.super_class = decl.super_class.as_ref().map(|ty| bind_in(ty, &[ty_scope]));
            bound.interfaces = decl
                .interfaces
                .iter()
                .map(|ty| bind_in(ty, &[ty_scope]))
                .collect();

            entries.push(Entry {
                decl: bound,
                super_class,
                interfaces,
            });
        }

        let (erroneous, hierarchy_diagnostics) = detect_cycles(&entries);
        tracing::debug!(
            target: "nova.inherit",
            types = entries.len(),
            erroneous = erroneous.count_ones(..),
            "built type hierarchy index"
        );

        let names = self.decls.iter().map(|decl| decl.name.clone()).collect();
        Ok(TypeHierarchyIndex {
            entries,
            names,
            by_name,
            by_simple_name,
            erroneous,
            hierarchy_diagnostics,
            object,
        })
    }
}

fn resolve_name(
    by_name: &HashMap<String, TypeId>,
    by_simple_name: &HashMap<String, Vec<TypeId>>,
    name: &str,
) -> Option<TypeId> {
    if let Some(id) = by_name.get(name) {
        return Some(*id);
    }
    if !name.contains('.') {
        if let Some(id) = by_name.get(&format!("java.lang.{name}")) {
            return Some(*id);
        }
    }
    // `Outer.Inner` or a simple name declared in some package; only unambiguous matches bind.
    match by_simple_name.get(name).map(Vec::as_slice) {
        Some([id]) => Some(*id),
        _ => None,
    }
}

fn bind<N: AsRef<str>>(
    by_name: &HashMap<String, TypeId>,
    by_simple_name: &HashMap<String, Vec<TypeId>>,
    names: &[N],
    ty: &TypeRef,
    scopes: &[&[TypeParam]],
) -> TypeRef {
    let rec = |inner: &TypeRef| bind(by_name, by_simple_name, names, inner, scopes);
    match ty {
        TypeRef::Class(class)
            if class.args.is_empty()
                && scopes
                    .iter()
                    .any(|scope| scope.iter().any(|param| param.name == class.name)) =>
        {
            TypeRef::TypeVar(class.name.clone())
        }
        TypeRef::Class(class) => {
            let name = match resolve_name(by_name, by_simple_name, &class.name) {
                Some(id) => names[id.idx()].as_ref().to_owned(),
                None => class.name.clone(),
            };
            TypeRef::Class(ClassRef {
                name,
                args: class.args.iter().map(rec).collect(),
            })
        }
        TypeRef::Array(component) => TypeRef::Array(Box::new(rec(component))),
        TypeRef::Wildcard(WildcardBound::Extends(bound)) => {
            TypeRef::Wildcard(WildcardBound::Extends(Box::new(rec(bound))))
        }
        TypeRef::Wildcard(WildcardBound::Super(bound)) => {
            TypeRef::Wildcard(WildcardBound::Super(Box::new(rec(bound))))
        }
        TypeRef::Void
        | TypeRef::Primitive(_)
        | TypeRef::TypeVar(_)
        | TypeRef::Wildcard(WildcardBound::Unbounded) => ty.clone(),
    }
}

fn bind_supertype(
    by_name: &HashMap<String, TypeId>,
    by_simple_name: &HashMap<String, Vec<TypeId>>,
    names: &[&str],
    decls: &[TypeDeclaration],
    owner: &TypeDeclaration,
    ty: &TypeRef,
    want_class: bool,
) -> Result<DirectSupertype, IndexError> {
    let expected = if want_class {
        "a superclass"
    } else {
        "a superinterface"
    };
    let TypeRef::Class(class) = ty else {
        return Err(IndexError::IllegalSupertype {
            ty: owner.name.clone(),
            supertype: ty.to_string(),
            expected,
        });
    };
    let id = resolve_name(by_name, by_simple_name, &class.name).ok_or_else(|| {
        IndexError::UnknownType {
            name: class.name.clone(),
            referenced_from: owner.name.clone(),
        }
    })?;
    let target_kind = decls[id.idx()].kind;
    let kind_ok = if want_class {
        target_kind == TypeKind::Class
    } else {
        target_kind.is_interface_like()
    };
    if !kind_ok {
        return Err(IndexError::IllegalSupertype {
            ty: owner.name.clone(),
            supertype: names[id.idx()].to_owned(),
            expected,
        });
    }
    let scopes: [&[TypeParam]; 1] = [&owner.type_params];
    Ok(DirectSupertype {
        id,
        args: class
            .args
            .iter()
            .map(|arg| bind(by_name, by_simple_name, names, arg, &scopes))
            .collect(),
    })
}

const UNVISITED: usize = usize::MAX;

/// Strongly connected components of the supertype graph (iterative Tarjan).
fn strongly_connected(entries: &[Entry]) -> Vec<Vec<usize>> {
    let len = entries.len();
    let mut order = vec![UNVISITED; len];
    let mut low = vec![0usize; len];
    let mut on_stack = FixedBitSet::with_capacity(len);
    let mut stack: Vec<usize> = Vec::new();
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut next = 0;
    let mut components = Vec::new();

    for root in 0..len {
        if order[root] != UNVISITED {
            continue;
        }
        order[root] = next;
        low[root] = next;
        next += 1;
        stack.push(root);
        on_stack.insert(root);
        frames.push((root, 0));

        while let Some(&(node, edge)) = frames.last() {
            if let Some(succ) = entries[node].edge(edge) {
                if let Some(top) = frames.last_mut() {
                    top.1 += 1;
                }
                let succ = succ.idx();
                if order[succ] == UNVISITED {
                    order[succ] = next;
                    low[succ] = next;
                    next += 1;
                    stack.push(succ);
                    on_stack.insert(succ);
                    frames.push((succ, 0));
                } else if on_stack.contains(succ) {
                    low[node] = low[node].min(order[succ]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                low[parent] = low[parent].min(low[node]);
            }
            if low[node] == order[node] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack.set(member, false);
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }
    components
}

/// Report every type on a hierarchy cycle and mark it, and everything inheriting from it,
/// erroneous.
///
/// A cycle is a strongly connected component with more than one member, or a type naming
/// itself as a supertype.
fn detect_cycles(entries: &[Entry]) -> (FixedBitSet, Vec<MethodDiagnostic>) {
    let len = entries.len();
    let mut on_cycle = FixedBitSet::with_capacity(len);
    let mut diagnostics = Vec::new();

    for mut component in strongly_connected(entries) {
        let cyclic = match component.as_slice() {
            [single] => entries[*single].edges().any(|sup| sup.idx() == *single),
            _ => true,
        };
        if cyclic {
            component.sort_unstable();
            report_cycle(entries, &component, &mut on_cycle, &mut diagnostics);
        }
    }
    diagnostics.sort_by_key(|diagnostic| diagnostic.ty);

    if on_cycle.count_ones(..) == 0 {
        return (on_cycle, diagnostics);
    }

    let mut subtypes: Vec<Vec<usize>> = vec![Vec::new(); len];
    for (idx, entry) in entries.iter().enumerate() {
        for sup in entry.edges() {
            subtypes[sup.idx()].push(idx);
        }
    }
    let mut erroneous = on_cycle.clone();
    let mut queue: VecDeque<usize> = on_cycle.ones().collect();
    while let Some(node) = queue.pop_front() {
        for &sub in &subtypes[node] {
            if !erroneous.put(sub) {
                queue.push_back(sub);
            }
        }
    }
    tracing::debug!(
        target: "nova.inherit",
        cycle_members = on_cycle.count_ones(..),
        erroneous = erroneous.count_ones(..),
        "hierarchy cycles detected"
    );
    (erroneous, diagnostics)
}

/// One diagnostic per member of a sorted cyclic component.
fn report_cycle(
    entries: &[Entry],
    members: &[usize],
    on_cycle: &mut FixedBitSet,
    diagnostics: &mut Vec<MethodDiagnostic>,
) {
    let involved: Vec<TypeId> = members
        .iter()
        .map(|idx| TypeId::from_raw(*idx as u32))
        .collect();
    for &member in members {
        on_cycle.insert(member);
        let decl = &entries[member].decl;
        let message = if members.len() == 1 {
            format!(
                "Cycle detected: the type {} cannot extend/implement itself or one of its own member types",
                simple_type_name(&decl.name)
            )
        } else {
            // the first supertype that leads back into the cycle
            let next = entries[member]
                .edges()
                .map(TypeId::idx)
                .find(|sup| *sup != member && members.binary_search(sup).is_ok())
                .unwrap_or(member);
            format!(
                "Cycle detected: a cycle exists in the type hierarchy between {} and {}",
                simple_type_name(&decl.name),
                simple_type_name(&entries[next].decl.name)
            )
        };
        diagnostics.push(
            MethodDiagnostic::error(
                DiagnosticKind::HierarchyCycle,
                TypeId::from_raw(member as u32),
                decl.span,
                message,
            )
            .with_involved(involved.iter().copied()),
        );
    }
}
