//! Override-specificity between candidates of one selector group.

use crate::context::ResolutionContext;
use crate::hierarchy::TypeId;
use crate::signature_table::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specificity {
    Same,
    MoreSpecific,
    LessSpecific,
    Incomparable,
}

/// Compare two declaring types: `a` is more specific when it is a strict subtype of `b`.
pub fn compare(ctx: &mut ResolutionContext<'_>, a: TypeId, b: TypeId) -> Specificity {
    if a == b {
        Specificity::Same
    } else if ctx.is_subtype(a, b) {
        Specificity::MoreSpecific
    } else if ctx.is_subtype(b, a) {
        Specificity::LessSpecific
    } else {
        Specificity::Incomparable
    }
}

/// Candidates whose declaring type is not a strict supertype of another candidate's.
///
/// Input order is preserved.
pub fn maximal<'c>(
    ctx: &mut ResolutionContext<'_>,
    candidates: &[&'c Candidate],
) -> Vec<&'c Candidate> {
    let mut out = Vec::with_capacity(candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        let dominated = candidates.iter().enumerate().any(|(other_idx, other)| {
            other_idx != idx
                && compare(ctx, other.sig.declaring, candidate.sig.declaring)
                    == Specificity::MoreSpecific
        });
        if !dominated {
            out.push(*candidate);
        }
    }
    out
}
