//! Synthetic bridge methods.
//!
//! A bridge is needed wherever an implementation is reachable under a JVM descriptor other
//! than its own: a generic parameter specialised by a subtype, or a covariant return.

use nova_types::TypeRef;
use serde::Serialize;

use crate::conflicts::{ConflictKind, ConflictRecord};
use crate::context::ResolutionContext;
use crate::hierarchy::{MethodId, MethodKind, TypeId, TypeKind};
use crate::signature_table::{Candidate, CandidateGroup, SignatureTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeMethod {
    /// The type the bridge is emitted into.
    pub owner: TypeId,
    pub name: String,
    /// Erased parameter types of the bridged descriptor.
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    /// The implementation the bridge forwards to.
    pub target: MethodId,
}

impl BridgeMethod {
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for param in &self.params {
            out.push_str(&param.descriptor());
        }
        out.push(')');
        out.push_str(&self.return_type.descriptor());
        out
    }
}

pub(crate) fn synthesize(
    ctx: &mut ResolutionContext<'_>,
    table: &SignatureTable,
    group: &CandidateGroup,
    record: &ConflictRecord,
    out: &mut Vec<BridgeMethod>,
) {
    if record.kind == ConflictKind::NameClashErasure {
        return;
    }
    let ty = table.ty();
    let index = ctx.index();

    let own_impl = group.declared_in(ty).find(|c| is_implementation(c));
    let (implementation, inherited_impl) = match own_impl {
        Some(own) => (own, false),
        None => {
            if index.kind(ty) != TypeKind::Class {
                return;
            }
            let nearest = group
                .inherited_by(ty)
                .filter(|c| index.kind(c.sig.declaring) == TypeKind::Class)
                .min_by_key(|c| c.depth);
            match nearest {
                Some(c) if c.sig.kind == MethodKind::Concrete => (c, true),
                _ => return,
            }
        }
    };

    let own_descriptor = implementation.sig.descriptor();
    let mut seen: Vec<String> = vec![own_descriptor];
    if inherited_impl {
        // descriptors the superclass chain already bridges
        if let Some(superclass) = index.superclass_of(ty).map(|sup| sup.id) {
            for c in group.candidates.iter() {
                if ctx.is_subtype(superclass, c.sig.declaring) {
                    seen.push(c.sig.descriptor());
                }
            }
        }
    }

    for c in group.inherited_by(ty) {
        if c.sig.method == implementation.sig.method || !c.sig.kind.is_instance() {
            continue;
        }
        let descriptor = c.sig.descriptor();
        if seen.contains(&descriptor) {
            continue;
        }
        seen.push(descriptor);
        let bridge = BridgeMethod {
            owner: ty,
            name: c.sig.name.clone(),
            params: c.sig.descriptor_params.clone(),
            return_type: c.sig.descriptor_return.clone(),
            target: implementation.sig.method,
        };
        tracing::trace!(
            target: "nova.inherit",
            name = %bridge.name,
            descriptor = %bridge.descriptor(),
            "synthesized bridge"
        );
        out.push(bridge);
    }
}

fn is_implementation(candidate: &Candidate) -> bool {
    match candidate.sig.kind {
        MethodKind::Concrete | MethodKind::Default => true,
        MethodKind::Abstract | MethodKind::Static | MethodKind::Private => false,
    }
}
