//! Validation of `super.m()` and `Q.super.m()` invocations.

use nova_types::{Span, TypeRef};

use crate::call_site::{call_display, call_key, most_specific, CallResolution};
use crate::context::ResolutionContext;
use crate::diagnostics::{DiagnosticKind, MethodDiagnostic};
use crate::error::ResolveError;
use crate::hierarchy::{MethodKind, TypeId, TypeKind};
use crate::signature_table::{Candidate, MethodSignature, SelectorKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperCall {
    /// The type whose body contains the call.
    pub in_type: TypeId,
    /// Lexically enclosing types, innermost first, not including `in_type`.
    pub enclosing: Vec<TypeId>,
    /// `Q` in `Q.super.m()`; `None` for plain `super.m()`.
    pub qualifier: Option<TypeId>,
    pub name: String,
    /// Erased argument types.
    pub args: Vec<TypeRef>,
    pub static_context: bool,
    pub span: Span,
}

impl SuperCall {
    pub fn new(in_type: TypeId, name: impl Into<String>) -> Self {
        Self {
            in_type,
            enclosing: Vec::new(),
            qualifier: None,
            name: name.into(),
            args: Vec::new(),
            static_context: false,
            span: Span::default(),
        }
    }

    pub fn qualified(mut self, qualifier: TypeId) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    pub fn enclosed_by(mut self, outer: TypeId) -> Self {
        self.enclosing.push(outer);
        self
    }

    pub fn arg(mut self, ty: TypeRef) -> Self {
        self.args.push(ty);
        self
    }

    pub fn in_static_context(mut self) -> Self {
        self.static_context = true;
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

struct SuperResolver<'c, 'a> {
    ctx: &'c mut ResolutionContext<'a>,
    call: &'c SuperCall,
    key: SelectorKey,
}

impl ResolutionContext<'_> {
    /// Resolve the method a super invocation dispatches to, or report why it is illegal.
    pub fn resolve_super_call(&mut self, call: &SuperCall) -> Result<CallResolution, ResolveError> {
        self.check(call.in_type)?;
        if let Some(qualifier) = call.qualifier {
            self.check(qualifier)?;
        }
        let key = call_key(&call.name, &call.args);
        let resolution = SuperResolver {
            ctx: self,
            call,
            key,
        }
        .resolve()?;
        tracing::trace!(
            target: "nova.inherit",
            method = %call.name,
            ok = resolution.is_ok(),
            "resolved super call"
        );
        Ok(resolution)
    }
}

impl SuperResolver<'_, '_> {
    fn fail(&self, message: String, involved: &[TypeId]) -> CallResolution {
        CallResolution::failed(
            MethodDiagnostic::error(
                DiagnosticKind::IllegalSuperReference,
                self.call.in_type,
                self.call.span,
                message,
            )
            .with_involved(involved.iter().copied()),
        )
    }

    fn name(&self, id: TypeId) -> String {
        self.ctx.index().simple_name(id)
    }

    fn no_enclosing_instance(&self, qualifier: TypeId) -> CallResolution {
        let view = self.ctx.index().self_type(qualifier);
        self.fail(
            format!("No enclosing instance of the type {view} is accessible in scope"),
            &[qualifier],
        )
    }

    fn resolve(&mut self) -> Result<CallResolution, ResolveError> {
        if self.call.static_context {
            return Ok(self.fail("Cannot use super in a static context".to_owned(), &[]));
        }
        let in_type = self.call.in_type;
        let Some(qualifier) = self.call.qualifier else {
            return self.through_superclass(in_type);
        };

        if self.ctx.index().kind(qualifier) == TypeKind::Class {
            // `Outer.super.m()` names a lexically enclosing class (or the current one)
            if qualifier == in_type || self.call.enclosing.contains(&qualifier) {
                return self.through_superclass(qualifier);
            }
            return Ok(self.no_enclosing_instance(qualifier));
        }

        let direct: Vec<TypeId> = self.ctx.index().supertypes(in_type).map(|s| s.id).collect();
        if !direct.contains(&qualifier) {
            let enclosing_direct = self.call.enclosing.iter().any(|&outer| {
                self.ctx
                    .index()
                    .supertypes(outer)
                    .any(|sup| sup.id == qualifier)
            });
            if enclosing_direct {
                return Ok(self.no_enclosing_instance(qualifier));
            }
            if let Some(r) = self.more_specific_direct(&direct, qualifier) {
                return Ok(self.bypass_type(qualifier, r));
            }
            return Ok(self.no_enclosing_instance(qualifier));
        }
        if let Some(r) = self.more_specific_direct(&direct, qualifier) {
            return Ok(self.bypass_type(qualifier, r));
        }

        self.through_interface(qualifier, &direct)
    }

    /// A direct supertype other than `qualifier` that inherits from it.
    fn more_specific_direct(&mut self, direct: &[TypeId], qualifier: TypeId) -> Option<TypeId> {
        direct
            .iter()
            .copied()
            .find(|&r| r != qualifier && self.ctx.is_subtype(r, qualifier))
    }

    fn bypass_type(&self, qualifier: TypeId, r: TypeId) -> CallResolution {
        self.fail(
            format!(
                "Illegal reference to super type {}, cannot bypass the more specific direct super type {}",
                self.name(qualifier),
                self.name(r)
            ),
            &[qualifier, r],
        )
    }

    /// Members of `from`'s table whose declaring type is `through` or one of its ancestors.
    fn candidates_through(
        &mut self,
        from: TypeId,
        through: TypeId,
    ) -> Result<Option<MethodSignature>, ResolveError> {
        let table = self.ctx.table(from)?;
        let through_table = self.ctx.table(through)?;
        let Some(group) = table.group(&self.key) else {
            return Ok(None);
        };
        let reachable: Vec<&Candidate> = group
            .candidates
            .iter()
            .filter(|c| c.sig.declaring != from && through_table.has_ancestor(c.sig.declaring))
            .collect();
        Ok(most_specific(self.ctx, &reachable).map(|c| c.sig.clone()))
    }

    fn undefined(&self, ty: TypeId) -> CallResolution {
        CallResolution::failed(MethodDiagnostic::error(
            DiagnosticKind::MethodUndefined,
            self.call.in_type,
            self.call.span,
            format!(
                "The method {} is undefined for the type {}",
                call_display(&self.call.name, &self.call.args),
                self.name(ty)
            ),
        ))
    }

    fn abstract_target(&mut self, from: TypeId, target: &MethodSignature, ty: TypeId) -> CallResolution {
        let view = match self.ctx.table(from) {
            Ok(table) => table
                .ancestor(ty)
                .map(|ancestor| ancestor.view.clone())
                .unwrap_or_else(|| self.ctx.index().self_type(ty)),
            Err(_) => self.ctx.index().self_type(ty),
        };
        self.fail(
            format!(
                "Cannot directly invoke the abstract method {} for the type {view}",
                target.display()
            ),
            &[target.declaring],
        )
    }

    /// `super.m()` from `from`: the superclass chain and everything it inherits.
    fn through_superclass(&mut self, from: TypeId) -> Result<CallResolution, ResolveError> {
        let superclass = self.ctx.index().superclass_of(from).map(|s| s.id);
        let Some(superclass) = superclass else {
            return Ok(self.undefined(self.ctx.index().object().unwrap_or(from)));
        };
        match self.candidates_through(from, superclass)? {
            None => Ok(self.undefined(superclass)),
            Some(target) if target.kind == MethodKind::Abstract => {
                Ok(self.abstract_target(from, &target, superclass))
            }
            Some(target) => Ok(CallResolution::bound(target)),
        }
    }

    fn through_interface(
        &mut self,
        qualifier: TypeId,
        direct: &[TypeId],
    ) -> Result<CallResolution, ResolveError> {
        let in_type = self.call.in_type;
        let Some(target) = self.candidates_through(in_type, qualifier)? else {
            if self.declares_static(qualifier)? {
                let name = self.name(qualifier);
                return Ok(CallResolution::failed(
                    MethodDiagnostic::error(
                        DiagnosticKind::InvalidStaticAccessViaInstance,
                        in_type,
                        self.call.span,
                        format!(
                            "This static method of interface {name} can only be accessed as {name}.{}",
                            self.call.name
                        ),
                    )
                    .with_involved([qualifier]),
                ));
            }
            return Ok(self.undefined(qualifier));
        };

        if target.kind == MethodKind::Abstract {
            return Ok(self.abstract_target(in_type, &target, qualifier));
        }

        // another direct supertype may override the selected method more specifically
        for &other in direct {
            if other == qualifier || self.ctx.is_subtype(qualifier, other) {
                continue;
            }
            let Some(theirs) = self.candidates_through(in_type, other)? else {
                continue;
            };
            if theirs.declaring != target.declaring
                && self.ctx.is_subtype(theirs.declaring, target.declaring)
            {
                return Ok(self.fail(
                    format!(
                        "Illegal reference to super method {} from type {}, cannot bypass the more specific override from type {}",
                        target.display(),
                        self.name(target.declaring),
                        self.name(theirs.declaring)
                    ),
                    &[target.declaring, theirs.declaring],
                ));
            }
        }
        Ok(CallResolution::bound(target))
    }

    fn declares_static(&mut self, iface: TypeId) -> Result<bool, ResolveError> {
        let table = self.ctx.table(iface)?;
        Ok(table
            .group(&self.key)
            .map(|group| group.declared_in(iface).any(|c| c.sig.kind == MethodKind::Static))
            .unwrap_or(false))
    }
}
