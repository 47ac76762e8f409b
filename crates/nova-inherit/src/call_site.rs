//! Binding of ordinary method invocations against signature tables.
//!
//! Only what inheritance decides is checked here: whether the selector is visible from the
//! receiver at all (static interface methods are never inherited) and whether static and
//! instance members are reached the right way. Overload selection is out of scope; arguments
//! are matched by exact erasure.

use nova_types::{Span, TypeRef};
use serde::Serialize;

use crate::context::ResolutionContext;
use crate::diagnostics::{DiagnosticKind, MethodDiagnostic};
use crate::error::ResolveError;
use crate::hierarchy::{MethodKind, TypeId, TypeKind};
use crate::signature_table::{join, Candidate, MethodSignature, SelectorKey};
use crate::specificity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// `m()`
    Unqualified,
    /// `T.m()`
    TypeName(TypeId),
    /// `expr.m()` where `expr` has the given static type.
    Instance(TypeRef),
    /// `this.m()`
    This,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// The type whose body contains the call.
    pub in_type: TypeId,
    pub receiver: Receiver,
    pub name: String,
    /// Erased argument types.
    pub args: Vec<TypeRef>,
    /// The call appears in a static method or initializer.
    pub static_context: bool,
    pub span: Span,
}

impl CallSite {
    pub fn new(in_type: TypeId, receiver: Receiver, name: impl Into<String>) -> Self {
        Self {
            in_type,
            receiver,
            name: name.into(),
            args: Vec::new(),
            static_context: false,
            span: Span::default(),
        }
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

/// Outcome of binding a call: the method it dispatches to (if any) and what was wrong with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallResolution {
    pub target: Option<MethodSignature>,
    pub diagnostics: Vec<MethodDiagnostic>,
}

impl CallResolution {
    pub fn bound(target: MethodSignature) -> Self {
        Self {
            target: Some(target),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        !self.diagnostics.iter().any(MethodDiagnostic::is_error)
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.diagnostics.iter().map(|d| d.kind.code()).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    pub(crate) fn failed(diagnostic: MethodDiagnostic) -> Self {
        Self {
            target: None,
            diagnostics: vec![diagnostic],
        }
    }
}

pub(crate) fn call_key(name: &str, args: &[TypeRef]) -> SelectorKey {
    SelectorKey::new(name, args.iter().map(|arg| arg.erasure(&[])).collect())
}

/// `m(A, B)` as written at a call site.
pub(crate) fn call_display(name: &str, args: &[TypeRef]) -> String {
    format!("{}({})", name, join(args))
}

/// The candidate a call dispatches to: an own declaration, else the nearest class-chain
/// method, else a maximally specific interface member (implementations preferred).
pub(crate) fn most_specific<'c>(
    ctx: &mut ResolutionContext<'_>,
    candidates: &[&'c Candidate],
) -> Option<&'c Candidate> {
    if let Some(own) = candidates.iter().copied().find(|c| c.depth == 0) {
        return Some(own);
    }
    let index = ctx.index();
    let nearest_class = candidates
        .iter()
        .copied()
        .filter(|c| index.kind(c.sig.declaring) == TypeKind::Class)
        .min_by_key(|c| c.depth);
    if nearest_class.is_some() {
        return nearest_class;
    }
    let max = specificity::maximal(ctx, candidates);
    max.iter()
        .copied()
        .find(|c| c.sig.kind.has_implementation())
        .or_else(|| max.first().copied())
}

impl ResolutionContext<'_> {
    /// Bind `site` against the signature table of its receiver.
    pub fn bind_call(&mut self, site: &CallSite) -> Result<CallResolution, ResolveError> {
        self.check(site.in_type)?;
        let key = call_key(&site.name, &site.args);

        let receiver = match &site.receiver {
            Receiver::Unqualified | Receiver::This => site.in_type,
            Receiver::TypeName(id) => {
                self.check(*id)?;
                *id
            }
            Receiver::Instance(ty) => match ty.class_name().and_then(|name| self.index().lookup(name)) {
                Some(id) => {
                    self.check(id)?;
                    id
                }
                None => {
                    return Ok(CallResolution::failed(self.undefined(site, &ty.to_string())));
                }
            },
        };
        let via_instance = matches!(site.receiver, Receiver::Instance(_) | Receiver::This);

        let table = self.table(receiver)?;
        let found = match table.group(&key) {
            Some(group) => {
                let candidates: Vec<&Candidate> = group.candidates.iter().collect();
                most_specific(self, &candidates).map(|c| c.sig.clone())
            }
            None => None,
        };

        let Some(target) = found else {
            if via_instance {
                if let Some(iface) = self.hidden_interface_static(receiver, &key) {
                    return Ok(CallResolution::failed(self.static_via_instance(site, iface)));
                }
            }
            let name = self.index().simple_name(receiver);
            return Ok(CallResolution::failed(self.undefined(site, &name)));
        };

        let mut resolution = CallResolution::bound(target.clone());
        match target.kind {
            MethodKind::Static => {
                if via_instance {
                    if self.index().kind(target.declaring).is_interface_like() {
                        return Ok(CallResolution::failed(
                            self.static_via_instance(site, target.declaring),
                        ));
                    }
                    let message = format!(
                        "The static method {} from the type {} should be accessed in a static way",
                        target.display(),
                        self.index().simple_name(target.declaring)
                    );
                    resolution.diagnostics.push(
                        MethodDiagnostic::warning(
                            DiagnosticKind::NonStaticAccessToStatic,
                            site.in_type,
                            site.span,
                            message,
                        )
                        .with_involved([target.declaring]),
                    );
                }
            }
            MethodKind::Abstract | MethodKind::Default | MethodKind::Private | MethodKind::Concrete => {
                let static_reference = match site.receiver {
                    Receiver::Unqualified => site.static_context,
                    Receiver::TypeName(id) => site.static_context || !self.is_subtype(site.in_type, id),
                    Receiver::Instance(_) | Receiver::This => false,
                };
                if static_reference {
                    let message = format!(
                        "Cannot make a static reference to the non-static method {} from the type {}",
                        target.display(),
                        self.index().simple_name(target.declaring)
                    );
                    return Ok(CallResolution::failed(
                        MethodDiagnostic::error(
                            DiagnosticKind::StaticReferenceToInstance,
                            site.in_type,
                            site.span,
                            message,
                        )
                        .with_involved([target.declaring]),
                    ));
                }
            }
        }
        Ok(resolution)
    }

    /// A static method of an interface ancestor that would match `key` if statics were inherited.
    fn hidden_interface_static(&mut self, ty: TypeId, key: &SelectorKey) -> Option<TypeId> {
        let table = self.table(ty).ok()?;
        for ancestor in table.ancestors().iter().skip(1) {
            if !self.index().kind(ancestor.id).is_interface_like() {
                continue;
            }
            let Ok(own) = self.table(ancestor.id) else {
                continue;
            };
            let declared = own
                .group(key)
                .map(|group| {
                    group
                        .declared_in(ancestor.id)
                        .any(|c| c.sig.kind == MethodKind::Static)
                })
                .unwrap_or(false);
            if declared {
                return Some(ancestor.id);
            }
        }
        None
    }

    fn static_via_instance(&self, site: &CallSite, iface: TypeId) -> MethodDiagnostic {
        let name = self.index().simple_name(iface);
        MethodDiagnostic::error(
            DiagnosticKind::InvalidStaticAccessViaInstance,
            site.in_type,
            site.span,
            format!(
                "This static method of interface {name} can only be accessed as {name}.{}",
                site.name
            ),
        )
        .with_involved([iface])
    }

    pub(crate) fn undefined(&self, site: &CallSite, ty: &str) -> MethodDiagnostic {
        MethodDiagnostic::error(
            DiagnosticKind::MethodUndefined,
            site.in_type,
            site.span,
            format!(
                "The method {} is undefined for the type {ty}",
                call_display(&site.name, &site.args)
            ),
        )
    }
}
