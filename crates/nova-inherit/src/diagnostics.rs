use nova_types::{Diagnostic, Severity, Span};
use serde::Serialize;

use crate::hierarchy::TypeId;

/// Every problem the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DiagnosticKind {
    IllegalModifierCombination,
    IllegalModifierForContext,
    MissingBody,
    UnexpectedBodyForAbstract,
    UnexpectedBodyForNative,
    RedundantStrictfp,
    DuplicateMethod,
    DefaultConflict,
    MustImplement,
    NameClashErasure,
    ReturnIncompatible,
    IllegalSuperReference,
    StaticMethodHidesInstance,
    OverrideCannotChangeFromStatic,
    CannotOverrideFinal,
    InheritedReducesVisibility,
    DefaultOverridesObjectMethod,
    InvalidStaticAccessViaInstance,
    NonStaticAccessToStatic,
    StaticReferenceToInstance,
    MethodUndefined,
    HierarchyCycle,
}

impl DiagnosticKind {
    pub const fn code(self) -> &'static str {
        match self {
            DiagnosticKind::IllegalModifierCombination => "ILLEGAL_MODIFIER_COMBINATION",
            DiagnosticKind::IllegalModifierForContext => "ILLEGAL_MODIFIER_FOR_CONTEXT",
            DiagnosticKind::MissingBody => "MISSING_BODY",
            DiagnosticKind::UnexpectedBodyForAbstract => "UNEXPECTED_BODY_FOR_ABSTRACT",
            DiagnosticKind::UnexpectedBodyForNative => "UNEXPECTED_BODY_FOR_NATIVE",
            DiagnosticKind::RedundantStrictfp => "REDUNDANT_STRICTFP",
            DiagnosticKind::DuplicateMethod => "DUPLICATE_METHOD",
            DiagnosticKind::DefaultConflict => "DEFAULT_CONFLICT",
            DiagnosticKind::MustImplement => "MUST_IMPLEMENT",
            DiagnosticKind::NameClashErasure => "NAME_CLASH_ERASURE",
            DiagnosticKind::ReturnIncompatible => "RETURN_INCOMPATIBLE",
            DiagnosticKind::IllegalSuperReference => "ILLEGAL_SUPER_REFERENCE",
            DiagnosticKind::StaticMethodHidesInstance => "STATIC_METHOD_HIDES_INSTANCE",
            DiagnosticKind::OverrideCannotChangeFromStatic => "OVERRIDE_CANNOT_CHANGE_FROM_STATIC",
            DiagnosticKind::CannotOverrideFinal => "CANNOT_OVERRIDE_FINAL",
            DiagnosticKind::InheritedReducesVisibility => "INHERITED_REDUCES_VISIBILITY",
            DiagnosticKind::DefaultOverridesObjectMethod => "DEFAULT_OVERRIDES_OBJECT_METHOD",
            DiagnosticKind::InvalidStaticAccessViaInstance => "INVALID_STATIC_ACCESS_VIA_INSTANCE",
            DiagnosticKind::NonStaticAccessToStatic => "NON_STATIC_ACCESS_TO_STATIC",
            DiagnosticKind::StaticReferenceToInstance => "STATIC_REFERENCE_TO_INSTANCE",
            DiagnosticKind::MethodUndefined => "METHOD_UNDEFINED",
            DiagnosticKind::HierarchyCycle => "HIERARCHY_CYCLE",
        }
    }

    /// Fatal diagnostics mark the reported type erroneous; everything else is accumulated.
    pub const fn is_fatal(self) -> bool {
        matches!(self, DiagnosticKind::HierarchyCycle)
    }
}

/// A diagnostic produced by the inheritance engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDiagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    /// The type the problem is reported against.
    pub ty: TypeId,
    /// Declaring types that contributed to the problem.
    pub involved: Vec<TypeId>,
}

impl MethodDiagnostic {
    pub fn new(
        kind: DiagnosticKind,
        severity: Severity,
        ty: TypeId,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            span,
            ty,
            involved: Vec::new(),
        }
    }

    pub fn error(kind: DiagnosticKind, ty: TypeId, span: Span, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, ty, span, message)
    }

    pub fn warning(
        kind: DiagnosticKind,
        ty: TypeId,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self::new(kind, Severity::Warning, ty, span, message)
    }

    #[must_use]
    pub fn with_involved(mut self, involved: impl IntoIterator<Item = TypeId>) -> Self {
        for ty in involved {
            if !self.involved.contains(&ty) {
                self.involved.push(ty);
            }
        }
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(
            self.severity,
            self.kind.code(),
            self.message.clone(),
            Some(self.span),
        )
    }
}

/// Accumulates diagnostics for one resolution unit.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticSink {
    diagnostics: Vec<MethodDiagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: MethodDiagnostic) {
        tracing::trace!(
            target: "nova.inherit",
            code = diagnostic.kind.code(),
            message = %diagnostic.message,
            "diagnostic"
        );
        self.diagnostics.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodDiagnostic> {
        self.diagnostics.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(MethodDiagnostic::is_error)
    }

    pub fn into_vec(self) -> Vec<MethodDiagnostic> {
        self.diagnostics
    }
}

impl Extend<MethodDiagnostic> for DiagnosticSink {
    fn extend<I: IntoIterator<Item = MethodDiagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}
