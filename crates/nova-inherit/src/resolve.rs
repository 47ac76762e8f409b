//! Per-type resolution: the query surface handed to the type checker and code generator.

use serde::Serialize;

use crate::bridges::{self, BridgeMethod};
use crate::conflicts::{self, ConflictKind, ConflictRecord};
use crate::context::ResolutionContext;
use crate::diagnostics::{DiagnosticSink, MethodDiagnostic};
use crate::error::ResolveError;
use crate::hierarchy::TypeId;
use crate::modifiers;
use crate::signature_table::{MethodSignature, SelectorKey};

/// Answer to `resolve(type, selector)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    /// A call through the selector binds to this method without error.
    Applicable(MethodSignature),
    Conflict(ConflictRecord),
}

impl Resolution {
    pub fn applicable(&self) -> Option<&MethodSignature> {
        match self {
            Resolution::Applicable(sig) => Some(sig),
            Resolution::Conflict(_) => None,
        }
    }

    pub fn conflict(&self) -> Option<&ConflictRecord> {
        match self {
            Resolution::Applicable(_) => None,
            Resolution::Conflict(record) => Some(record),
        }
    }
}

/// Everything computed for one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeResolution {
    pub ty: TypeId,
    /// One record per selector group, in table order.
    pub records: Vec<ConflictRecord>,
    pub bridges: Vec<BridgeMethod>,
    pub diagnostics: Vec<MethodDiagnostic>,
}

impl TypeResolution {
    pub fn record(&self, key: &SelectorKey) -> Option<&ConflictRecord> {
        self.records.iter().find(|record| &record.key == key)
    }

    /// Records whose selector is named `name`, any parameters.
    pub fn records_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s ConflictRecord> + 's {
        self.records.iter().filter(move |record| record.key.name == name)
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &ConflictRecord> {
        self.records.iter().filter(|record| !record.kind.is_resolved())
    }

    /// Whether every inherited abstract method is implemented.
    pub fn is_concrete_ok(&self) -> bool {
        !self
            .records
            .iter()
            .any(|record| record.kind == ConflictKind::MustImplement)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(MethodDiagnostic::is_error)
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}

impl ResolutionContext<'_> {
    /// Resolve one selector of `ty`. `Ok(None)` when the type has no such member.
    pub fn resolve(
        &mut self,
        ty: TypeId,
        key: &SelectorKey,
    ) -> Result<Option<Resolution>, ResolveError> {
        let table = self.table(ty)?;
        let Some(group) = table.group(key) else {
            return Ok(None);
        };
        let mut scratch = DiagnosticSink::new();
        let record = conflicts::detect(self, &table, group, &mut scratch);
        let resolution = match (&record.applicable, record.kind.is_resolved()) {
            (Some(sig), true) => Resolution::Applicable(sig.clone()),
            _ => Resolution::Conflict(record),
        };
        Ok(Some(resolution))
    }

    /// Validate and classify every member of `ty`, and collect its bridges.
    pub fn resolve_type(&mut self, ty: TypeId) -> Result<TypeResolution, ResolveError> {
        self.check(ty)?;
        let decl = self.index().decl(ty);
        let _span = tracing::debug_span!(target: "nova.inherit", "resolve_type", ty = %decl.name).entered();

        let mut sink = DiagnosticSink::new();
        modifiers::validate_type(self.config(), ty, decl, &mut sink);

        let table = self.table(ty)?;
        let mut records = Vec::with_capacity(table.len());
        let mut bridges = Vec::new();
        for group in table.groups() {
            let record = conflicts::detect(self, &table, group, &mut sink);
            bridges::synthesize(self, &table, group, &record, &mut bridges);
            records.push(record);
        }

        tracing::debug!(
            target: "nova.inherit",
            groups = records.len(),
            bridges = bridges.len(),
            diagnostics = sink.len(),
            "resolved type"
        );
        Ok(TypeResolution {
            ty,
            records,
            bridges,
            diagnostics: sink.into_vec(),
        })
    }
}
