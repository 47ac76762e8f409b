//! Reference subtyping over [`TypeRef`]s, enough for return-type substitutability.

use nova_types::{ClassRef, Substitution, TypeParam, TypeRef, WildcardBound};

use crate::context::ResolutionContext;

// Bound chains are followed at most this far; deeper chains are malformed.
const MAX_DEPTH: usize = 16;

/// Type variables visible while comparing, searched in order.
pub(crate) type VarScopes<'s> = [&'s [TypeParam]];

#[cfg(test)]
pub(crate) fn is_subtype_ref(
    ctx: &mut ResolutionContext<'_>,
    vars: &VarScopes<'_>,
    sub: &TypeRef,
    sup: &TypeRef,
) -> bool {
    subtype(ctx, vars, sub, sup, 0)
}

/// JLS 8.4.8.3: `r1` may be returned where `r2` is expected.
pub(crate) fn is_return_substitutable(
    ctx: &mut ResolutionContext<'_>,
    vars: &VarScopes<'_>,
    r1: &TypeRef,
    r2: &TypeRef,
) -> bool {
    if r1 == r2 {
        return true;
    }
    if !r1.is_reference() || !r2.is_reference() {
        return false;
    }
    if subtype(ctx, vars, r1, r2, 0) {
        return true;
    }
    // unchecked conversion: a raw return type against a parameterized one
    matches!(r1, TypeRef::Class(ClassRef { args, .. }) if args.is_empty())
        && subtype(ctx, vars, r1, &r2.erasure(vars), 0)
}

fn subtype(
    ctx: &mut ResolutionContext<'_>,
    vars: &VarScopes<'_>,
    sub: &TypeRef,
    sup: &TypeRef,
    depth: usize,
) -> bool {
    if sub == sup {
        return true;
    }
    if depth > MAX_DEPTH {
        return false;
    }
    if sup.is_object() {
        return sub.is_reference() && !matches!(sub, TypeRef::Wildcard(_));
    }
    match (sub, sup) {
        (TypeRef::TypeVar(name), _) => {
            let bounds: Vec<TypeRef> = vars
                .iter()
                .flat_map(|scope| scope.iter())
                .find(|param| &param.name == name)
                .map(|param| param.bounds.clone())
                .unwrap_or_default();
            bounds
                .iter()
                .any(|bound| subtype(ctx, vars, bound, sup, depth + 1))
        }
        (TypeRef::Class(a), TypeRef::Class(b)) => class_subtype(ctx, vars, a, b, depth),
        (TypeRef::Array(a), TypeRef::Array(b)) => {
            if a.is_primitive() || b.is_primitive() {
                a == b
            } else {
                subtype(ctx, vars, a, b, depth + 1)
            }
        }
        (TypeRef::Array(_), TypeRef::Class(b)) => {
            b.name == "java.lang.Cloneable" || b.name == "java.io.Serializable"
        }
        _ => false,
    }
}

fn class_subtype(
    ctx: &mut ResolutionContext<'_>,
    vars: &VarScopes<'_>,
    a: &ClassRef,
    b: &ClassRef,
    depth: usize,
) -> bool {
    let index = ctx.index();
    let (Some(a_id), Some(b_id)) = (index.lookup(&a.name), index.lookup(&b.name)) else {
        return false;
    };
    let Ok(table) = ctx.table(a_id) else {
        return false;
    };
    let Some(ancestor) = table.ancestor(b_id) else {
        return false;
    };
    let a_params = &index.decl(a_id).type_params;
    if b.args.is_empty() || (a.args.is_empty() && !a_params.is_empty()) {
        // raw on either side
        return true;
    }
    let TypeRef::Class(view) = &ancestor.view else {
        return false;
    };
    if view.args.is_empty() {
        return true;
    }
    let subst: Substitution = a_params
        .iter()
        .map(|param| param.name.clone())
        .zip(a.args.iter().cloned())
        .collect();
    let args: Vec<TypeRef> = view.args.iter().map(|arg| arg.substitute(&subst)).collect();
    args.len() == b.args.len()
        && args
            .iter()
            .zip(&b.args)
            .all(|(inner, outer)| contains(ctx, vars, outer, inner, depth + 1))
}

/// Type argument containment (JLS 4.5.1).
fn contains(
    ctx: &mut ResolutionContext<'_>,
    vars: &VarScopes<'_>,
    outer: &TypeRef,
    inner: &TypeRef,
    depth: usize,
) -> bool {
    match outer {
        TypeRef::Wildcard(WildcardBound::Unbounded) => true,
        TypeRef::Wildcard(WildcardBound::Extends(bound)) => match inner {
            TypeRef::Wildcard(WildcardBound::Extends(inner_bound)) => {
                subtype(ctx, vars, inner_bound, bound, depth)
            }
            TypeRef::Wildcard(_) => bound.is_object(),
            _ => subtype(ctx, vars, inner, bound, depth),
        },
        TypeRef::Wildcard(WildcardBound::Super(bound)) => match inner {
            TypeRef::Wildcard(WildcardBound::Super(inner_bound)) => {
                subtype(ctx, vars, bound, inner_bound, depth)
            }
            TypeRef::Wildcard(_) => false,
            _ => subtype(ctx, vars, bound, inner, depth),
        },
        _ => outer == inner,
    }
}
