//! Transitive method collection for a single type.
//!
//! A [`SignatureTable`] walks the hierarchy above a type once, depth-first (own declarations,
//! then the superclass subtree, then each superinterface subtree in declaration order), and
//! records every inherited method as seen through the parameterized supertype path. Candidates
//! are grouped by name and erased parameter types.

use std::fmt;

use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use nova_types::{Span, Substitution, TypeParam, TypeRef};
use serde::Serialize;

use crate::hierarchy::{
    MethodDecl, MethodId, MethodKind, Modifier, Modifiers, TypeDeclaration, TypeId, Visibility,
};
use crate::index::TypeHierarchyIndex;

/// Method name plus erased parameter types: the unit of override-equivalence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SelectorKey {
    pub name: String,
    pub erased_params: Vec<TypeRef>,
}

impl SelectorKey {
    pub fn new(name: impl Into<String>, erased_params: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            erased_params,
        }
    }
}

impl fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, join(&self.erased_params))
    }
}

pub(crate) fn join(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A method declaration as seen from the type whose table contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub method: MethodId,
    pub name: String,
    pub kind: MethodKind,
    pub modifiers: Modifiers,
    pub visibility: Visibility,
    pub declaring: TypeId,
    /// Parameterized view of the declaring type, e.g. `A<String>` for `B extends A<String>`.
    pub declaring_view: TypeRef,
    pub type_params: Vec<TypeParam>,
    /// Parameter types as declared, before substitution.
    pub declared_params: Vec<TypeRef>,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub erased_params: Vec<TypeRef>,
    /// Declaration-site erasure, i.e. what the class file carries.
    pub descriptor_params: Vec<TypeRef>,
    pub descriptor_return: TypeRef,
    pub span: Span,
}

impl MethodSignature {
    /// `name(P1, P2)` with the parameters as declared.
    pub fn display(&self) -> String {
        format!("{}({})", self.name, join(&self.declared_params))
    }

    /// `Owner.name(P1, P2)`.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.declaring_view, self.display())
    }

    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for param in &self.descriptor_params {
            out.push_str(&param.descriptor());
        }
        out.push(')');
        out.push_str(&self.descriptor_return.descriptor());
        out
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifier::Final)
    }

    /// Rename this method's type variables to `onto`'s, positionally.
    pub(crate) fn adapt_to(&self, onto: &MethodSignature) -> (Vec<TypeRef>, TypeRef) {
        if self.type_params.is_empty() || self.type_params.len() != onto.type_params.len() {
            return (self.params.clone(), self.return_type.clone());
        }
        let subst: Substitution = self
            .type_params
            .iter()
            .zip(&onto.type_params)
            .map(|(from, to)| (from.name.clone(), TypeRef::type_var(to.name.clone())))
            .collect();
        (
            self.params.iter().map(|p| p.substitute(&subst)).collect(),
            self.return_type.substitute(&subst),
        )
    }

    /// Same signature, or one is the erasure of the other (JLS 8.4.2).
    pub fn is_override_equivalent(&self, other: &MethodSignature) -> bool {
        if self.name != other.name || self.params.len() != other.params.len() {
            return false;
        }
        let same = self.type_params.len() == other.type_params.len()
            && self.adapt_to(other).0 == other.params;
        same || (self.type_params.is_empty() && self.params == other.erased_params)
            || (other.type_params.is_empty() && other.params == self.erased_params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub sig: MethodSignature,
    /// Discovery order within the table.
    pub order: u32,
    /// Supertype edges between the resolved type and the declaring type.
    pub depth: u32,
    /// Direct supertype through which the declaring type was reached; `None` for own methods.
    pub via: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateGroup {
    pub key: SelectorKey,
    pub candidates: Vec<Candidate>,
}

impl CandidateGroup {
    pub fn declared_in(&self, ty: TypeId) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(move |c| c.sig.declaring == ty)
    }

    pub fn inherited_by(&self, ty: TypeId) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(move |c| c.sig.declaring != ty)
    }
}

/// An ancestor as reached from the table's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorView {
    pub id: TypeId,
    /// `A<String>` when reached through `extends A<String>`.
    pub view: TypeRef,
    pub subst: Substitution,
    pub depth: u32,
    pub via: Option<TypeId>,
}

#[derive(Debug, Clone)]
pub struct SignatureTable {
    ty: TypeId,
    ancestors: Vec<AncestorView>,
    ancestor_set: FixedBitSet,
    groups: IndexMap<SelectorKey, CandidateGroup>,
}

impl SignatureTable {
    pub fn build(index: &TypeHierarchyIndex, ty: TypeId) -> SignatureTable {
        let ancestors = collect_ancestors(index, ty);
        let mut ancestor_set = FixedBitSet::with_capacity(index.len());
        for ancestor in &ancestors {
            ancestor_set.insert(ancestor.id.idx());
        }

        let owner = index.decl(ty);
        let mut groups: IndexMap<SelectorKey, CandidateGroup> = IndexMap::new();
        let mut order = 0u32;
        for ancestor in &ancestors {
            let decl = index.decl(ancestor.id);
            for (idx, method) in decl.methods.iter().enumerate() {
                let kind = MethodKind::of(method, decl.kind);
                if ancestor.id != ty && !is_inherited(kind, method, decl, owner) {
                    continue;
                }
                let sig = signature(ancestor, decl, owner, idx, method, kind);
                let key = SelectorKey::new(sig.name.clone(), sig.erased_params.clone());
                groups
                    .entry(key.clone())
                    .or_insert_with(|| CandidateGroup {
                        key,
                        candidates: Vec::new(),
                    })
                    .candidates
                    .push(Candidate {
                        sig,
                        order,
                        depth: ancestor.depth,
                        via: ancestor.via,
                    });
                order += 1;
            }
        }

        tracing::trace!(
            target: "nova.inherit",
            ty = %owner.name,
            ancestors = ancestors.len(),
            groups = groups.len(),
            "built signature table"
        );
        SignatureTable {
            ty,
            ancestors,
            ancestor_set,
            groups,
        }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn groups(&self) -> impl Iterator<Item = &CandidateGroup> {
        self.groups.values()
    }

    pub fn group(&self, key: &SelectorKey) -> Option<&CandidateGroup> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The type itself first, then every ancestor in discovery order.
    pub fn ancestors(&self) -> &[AncestorView] {
        &self.ancestors
    }

    pub fn ancestor(&self, id: TypeId) -> Option<&AncestorView> {
        self.ancestors.iter().find(|ancestor| ancestor.id == id)
    }

    /// Reflexive: a type is its own ancestor.
    pub fn has_ancestor(&self, id: TypeId) -> bool {
        self.ancestor_set.contains(id.idx())
    }
}

fn is_inherited(
    kind: MethodKind,
    method: &MethodDecl,
    declaring: &TypeDeclaration,
    owner: &TypeDeclaration,
) -> bool {
    match kind {
        MethodKind::Private => false,
        MethodKind::Static if declaring.kind.is_interface_like() => false,
        MethodKind::Static | MethodKind::Abstract | MethodKind::Default | MethodKind::Concrete => {
            method.visibility(declaring.kind) != Visibility::Package
                || declaring.package() == owner.package()
        }
    }
}

fn signature(
    ancestor: &AncestorView,
    decl: &TypeDeclaration,
    owner: &TypeDeclaration,
    idx: usize,
    method: &MethodDecl,
    kind: MethodKind,
) -> MethodSignature {
    // method type parameters shadow the declaring type's
    let mut subst = ancestor.subst.clone();
    for param in &method.type_params {
        subst.remove(&param.name);
    }
    let type_params: Vec<TypeParam> = method
        .type_params
        .iter()
        .map(|param| TypeParam {
            name: param.name.clone(),
            bounds: param.bounds.iter().map(|b| b.substitute(&subst)).collect(),
        })
        .collect();
    let params: Vec<TypeRef> = method.params.iter().map(|p| p.substitute(&subst)).collect();

    let key_scopes: [&[TypeParam]; 3] = [&type_params, &owner.type_params, &decl.type_params];
    let erased_params = params.iter().map(|p| p.erasure(&key_scopes)).collect();
    let decl_scopes: [&[TypeParam]; 2] = [&method.type_params, &decl.type_params];

    MethodSignature {
        method: MethodId {
            owner: ancestor.id,
            index: idx as u32,
        },
        name: method.name.clone(),
        kind,
        modifiers: method.modifiers,
        visibility: method.visibility(decl.kind),
        declaring: ancestor.id,
        declaring_view: ancestor.view.clone(),
        declared_params: method.params.clone(),
        return_type: method.return_type.substitute(&subst),
        params,
        erased_params,
        descriptor_params: method
            .params
            .iter()
            .map(|p| p.erasure(&decl_scopes))
            .collect(),
        descriptor_return: method.return_type.erasure(&decl_scopes),
        type_params,
        span: method.span,
    }
}

/// Depth-first pre-order over supertype edges, visiting each type once.
fn collect_ancestors(index: &TypeHierarchyIndex, ty: TypeId) -> Vec<AncestorView> {
    let mut visited = FixedBitSet::with_capacity(index.len());
    let mut out = Vec::new();
    let mut stack = vec![AncestorView {
        id: ty,
        view: index.self_type(ty),
        subst: Substitution::new(),
        depth: 0,
        via: None,
    }];

    while let Some(current) = stack.pop() {
        if visited.put(current.id.idx()) {
            continue;
        }
        let children: Vec<AncestorView> = index
            .supertypes(current.id)
            .map(|sup| {
                let decl = index.decl(sup.id);
                let params: &[TypeParam] = &decl.type_params;
                let raw = sup.args.is_empty() && !params.is_empty();
                let args: Vec<TypeRef> = if raw {
                    params
                        .iter()
                        .map(|p| TypeRef::type_var(p.name.clone()).erasure(&[params]))
                        .collect()
                } else {
                    sup.args.iter().map(|a| a.substitute(&current.subst)).collect()
                };
                let view = if raw {
                    TypeRef::named(decl.name.clone())
                } else {
                    TypeRef::class(decl.name.clone(), args.clone())
                };
                AncestorView {
                    id: sup.id,
                    view,
                    subst: params
                        .iter()
                        .map(|p| p.name.clone())
                        .zip(args)
                        .collect(),
                    depth: current.depth + 1,
                    via: current.via.or(Some(sup.id)),
                }
            })
            .collect();
        out.push(current);
        stack.extend(children.into_iter().rev());
    }
    out
}
