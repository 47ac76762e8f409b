//! Method inheritance and override-conflict analysis for Java types.
//!
//! Given a closed-world snapshot of name-resolved type declarations, this crate decides for
//! every type and method selector which declaration applies, reports default-method conflicts,
//! missing implementations and erasure clashes, validates method modifiers for the language
//! level in use, checks `super` invocations and lists the bridge methods each type must emit.
//!
//! ```text
//! TypeHierarchyIndex -> SignatureTable -> specificity -> conflicts / super calls -> bridges
//! ```
//!
//! All state for one pass lives in a [`ResolutionContext`]; [`resolve_all`] runs one context
//! per worker thread.

mod batch;
mod bridges;
mod call_site;
mod conflicts;
mod context;
mod diagnostics;
mod error;
mod hierarchy;
mod index;
mod jdk;
mod modifiers;
mod resolve;
mod signature_table;
mod specificity;
mod subtyping;
mod super_call;

pub use batch::{resolve_all, BatchResolution};
pub use bridges::BridgeMethod;
pub use call_site::{CallResolution, CallSite, Receiver};
pub use conflicts::{ConflictKind, ConflictRecord};
pub use context::ResolutionContext;
pub use diagnostics::{DiagnosticKind, DiagnosticSink, MethodDiagnostic};
pub use error::{IndexError, ResolveError};
pub use hierarchy::{
    MethodDecl, MethodId, MethodKind, Modifier, Modifiers, TypeDeclaration, TypeId, TypeKind,
    Visibility,
};
pub use index::{DirectSupertype, HierarchyBuilder, TypeHierarchyIndex};
pub use jdk::minimal_jdk;
pub use modifiers::{validate_method, validate_type};
pub use resolve::{Resolution, TypeResolution};
pub use signature_table::{
    AncestorView, Candidate, CandidateGroup, MethodSignature, SelectorKey, SignatureTable,
};
pub use specificity::{compare as compare_specificity, maximal as maximal_candidates, Specificity};
pub use super_call::SuperCall;
