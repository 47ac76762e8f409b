//! Whole-index resolution on a worker pool.

use nova_config::InheritConfig;
use rayon::prelude::*;

use crate::context::ResolutionContext;
use crate::diagnostics::MethodDiagnostic;
use crate::error::ResolveError;
use crate::hierarchy::TypeId;
use crate::index::TypeHierarchyIndex;
use crate::resolve::TypeResolution;

#[derive(Debug, Clone, Default)]
pub struct BatchResolution {
    /// Resolved types in id order.
    pub types: Vec<TypeResolution>,
    /// Types that were not resolved because their hierarchy is cyclic.
    pub skipped: Vec<TypeId>,
    /// Hierarchy diagnostics followed by every type's diagnostics, in id order.
    pub diagnostics: Vec<MethodDiagnostic>,
}

impl BatchResolution {
    pub fn get(&self, ty: TypeId) -> Option<&TypeResolution> {
        self.types
            .binary_search_by_key(&ty, |resolution| resolution.ty)
            .ok()
            .map(|idx| &self.types[idx])
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(MethodDiagnostic::is_error)
    }
}

enum Pool {
    Rayon(rayon::ThreadPool),
    Inline,
}

fn build_pool(threads: usize) -> Pool {
    if threads == 1 {
        return Pool::Inline;
    }
    // 0 lets rayon pick one worker per CPU
    let mut threads = threads;
    loop {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("nova-inherit-{idx}"))
            .build()
        {
            Ok(pool) => return Pool::Rayon(pool),
            Err(_) if threads > 2 => threads /= 2,
            Err(err) => {
                tracing::warn!(
                    target: "nova.inherit",
                    ?err,
                    "failed to build resolution worker pool; resolving inline"
                );
                return Pool::Inline;
            }
        }
    }
}

/// Resolve every non-erroneous type of `index`.
///
/// Each worker owns a [`ResolutionContext`], so signature tables are memoised per worker and
/// never shared mutably. Output order does not depend on scheduling.
pub fn resolve_all(index: &TypeHierarchyIndex, config: &InheritConfig) -> BatchResolution {
    let (ids, skipped): (Vec<TypeId>, Vec<TypeId>) =
        index.ids().partition(|&id| !index.is_erroneous(id));

    let results: Vec<Result<TypeResolution, ResolveError>> = match build_pool(config.resolution.threads) {
        Pool::Rayon(pool) => pool.install(|| {
            ids.par_iter()
                .map_init(
                    || ResolutionContext::new(index, config),
                    |ctx, &id| ctx.resolve_type(id),
                )
                .collect()
        }),
        Pool::Inline => {
            let mut ctx = ResolutionContext::new(index, config);
            ids.iter().map(|&id| ctx.resolve_type(id)).collect()
        }
    };

    let mut batch = BatchResolution {
        types: Vec::with_capacity(results.len()),
        skipped,
        diagnostics: index.hierarchy_diagnostics().to_vec(),
    };
    for result in results {
        match result {
            Ok(resolution) => {
                batch.diagnostics.extend(resolution.diagnostics.iter().cloned());
                batch.types.push(resolution);
            }
            Err(err) => {
                tracing::warn!(target: "nova.inherit", %err, "type resolution failed");
            }
        }
    }

    tracing::info!(
        target: "nova.inherit",
        types = batch.types.len(),
        skipped = batch.skipped.len(),
        diagnostics = batch.diagnostics.len(),
        threads = config.resolution.threads,
        "resolved type hierarchy"
    );
    batch
}
