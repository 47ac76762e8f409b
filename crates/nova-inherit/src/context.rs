use std::collections::HashMap;
use std::sync::Arc;

use nova_config::InheritConfig;

use crate::error::ResolveError;
use crate::hierarchy::TypeId;
use crate::index::TypeHierarchyIndex;
use crate::signature_table::SignatureTable;

/// State for one resolution pass: the read-only index and configuration plus a memo of
/// signature tables keyed by type.
///
/// A context is owned by a single worker. Tables are idempotent, so two workers computing the
/// same table independently is harmless.
pub struct ResolutionContext<'a> {
    index: &'a TypeHierarchyIndex,
    config: &'a InheritConfig,
    tables: HashMap<TypeId, Arc<SignatureTable>>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(index: &'a TypeHierarchyIndex, config: &'a InheritConfig) -> Self {
        Self {
            index,
            config,
            tables: HashMap::new(),
        }
    }

    pub fn index(&self) -> &'a TypeHierarchyIndex {
        self.index
    }

    pub fn config(&self) -> &'a InheritConfig {
        self.config
    }

    /// Fails for unknown ids and for types on or below a hierarchy cycle.
    pub fn check(&self, ty: TypeId) -> Result<(), ResolveError> {
        self.index.declaration_of(ty)?;
        if self.index.is_erroneous(ty) {
            return Err(ResolveError::CyclicHierarchy(ty));
        }
        Ok(())
    }

    pub fn table(&mut self, ty: TypeId) -> Result<Arc<SignatureTable>, ResolveError> {
        self.check(ty)?;
        if let Some(table) = self.tables.get(&ty) {
            tracing::trace!(target: "nova.inherit", ?ty, "signature table cache hit");
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(SignatureTable::build(self.index, ty));
        self.tables.insert(ty, Arc::clone(&table));
        Ok(table)
    }

    /// Reflexive, declaration-level subtyping (`sub` reaches `sup` over supertype edges).
    pub fn is_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        match self.table(sub) {
            Ok(table) => table.has_ancestor(sup),
            Err(_) => false,
        }
    }

    pub fn cached_tables(&self) -> usize {
        self.tables.len()
    }
}
