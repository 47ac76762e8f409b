//! Classification of one selector group of one type.
//!
//! Groups with an own declaration are checked as overrides of everything they inherit. Groups
//! without one are classified by what the type inherits: a class-chain method trumps interface
//! members, otherwise the maximally specific interface members decide.

use nova_types::{Span, TypeParam};
use serde::Serialize;

use crate::context::ResolutionContext;
use crate::diagnostics::{DiagnosticKind, DiagnosticSink, MethodDiagnostic};
use crate::hierarchy::{MethodKind, TypeDeclaration, TypeId, TypeKind, Visibility};
use crate::signature_table::{
    join, Candidate, CandidateGroup, MethodSignature, SelectorKey, SignatureTable,
};
use crate::specificity::{self, Specificity};
use crate::subtyping::is_return_substitutable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConflictKind {
    Unique,
    DefaultConflict,
    MustImplement,
    TrumpedByClassAncestor,
    ReturnIncompatible,
    NameClashErasure,
}

impl ConflictKind {
    /// Whether a call through this group binds without an error.
    pub fn is_resolved(self) -> bool {
        match self {
            ConflictKind::Unique | ConflictKind::TrumpedByClassAncestor => true,
            ConflictKind::DefaultConflict
            | ConflictKind::MustImplement
            | ConflictKind::ReturnIncompatible
            | ConflictKind::NameClashErasure => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictRecord {
    pub ty: TypeId,
    pub key: SelectorKey,
    pub kind: ConflictKind,
    /// Declaring types of the candidates that decided the outcome.
    pub contributors: Vec<TypeId>,
    pub applicable: Option<MethodSignature>,
}

struct Detector<'c, 'a> {
    ctx: &'c mut ResolutionContext<'a>,
    sink: &'c mut DiagnosticSink,
    ty: TypeId,
    decl: &'a TypeDeclaration,
    key: &'c SelectorKey,
    /// `X<T>`, for messages.
    display: String,
}

pub(crate) fn detect(
    ctx: &mut ResolutionContext<'_>,
    table: &SignatureTable,
    group: &CandidateGroup,
    sink: &mut DiagnosticSink,
) -> ConflictRecord {
    let ty = table.ty();
    let index = ctx.index();
    let mut detector = Detector {
        display: index.self_type(ty).to_string(),
        decl: index.decl(ty),
        ctx,
        sink,
        ty,
        key: &group.key,
    };
    let own: Vec<&Candidate> = group.declared_in(ty).collect();
    let inherited: Vec<&Candidate> = group.inherited_by(ty).collect();
    let record = match own.split_first() {
        Some((first, duplicates)) => detector.check_declared(first, duplicates, &inherited),
        None => detector.check_inherited(&inherited),
    };
    tracing::trace!(
        target: "nova.inherit",
        ty = %detector.display,
        key = %group.key,
        kind = ?record.kind,
        "classified selector group"
    );
    record
}

impl Detector<'_, '_> {
    fn record(
        &self,
        kind: ConflictKind,
        contributors: impl IntoIterator<Item = TypeId>,
        applicable: Option<&Candidate>,
    ) -> ConflictRecord {
        let mut unique = Vec::new();
        for ty in contributors {
            if !unique.contains(&ty) {
                unique.push(ty);
            }
        }
        ConflictRecord {
            ty: self.ty,
            key: self.key.clone(),
            kind,
            contributors: unique,
            applicable: applicable.map(|c| c.sig.clone()),
        }
    }

    fn error(&mut self, kind: DiagnosticKind, span: Span, message: String, involved: &[&Candidate]) {
        self.sink.push(
            MethodDiagnostic::error(kind, self.ty, span, message)
                .with_involved(involved.iter().map(|c| c.sig.declaring)),
        );
    }

    fn substitutable(&mut self, m1: &MethodSignature, m2: &MethodSignature) -> bool {
        let (_, r1) = m1.adapt_to(m2);
        let vars: [&[TypeParam]; 2] = [&m2.type_params, &self.decl.type_params];
        is_return_substitutable(self.ctx, &vars, &r1, &m2.return_type)
    }

    fn check_declared(
        &mut self,
        own: &Candidate,
        duplicates: &[&Candidate],
        inherited: &[&Candidate],
    ) -> ConflictRecord {
        let mut kind = ConflictKind::Unique;

        for &dup in duplicates {
            if own.sig.is_override_equivalent(&dup.sig) {
                let message = format!("Duplicate method {} in type {}", dup.sig.display(), self.display);
                self.error(DiagnosticKind::DuplicateMethod, dup.sig.span, message, &[own, dup]);
            } else {
                let message = format!(
                    "Erasure of method {} is the same as another method in type {}",
                    dup.sig.display(),
                    self.display
                );
                self.error(DiagnosticKind::NameClashErasure, dup.sig.span, message, &[own, dup]);
                kind = ConflictKind::NameClashErasure;
            }
        }

        if self.decl.kind.is_interface_like() {
            self.check_object_method(own);
        }

        let (equivalent, clashing): (Vec<&Candidate>, Vec<&Candidate>) = inherited
            .iter()
            .copied()
            .partition(|c| own.sig.is_override_equivalent(&c.sig));
        for &c in &clashing {
            let message = format!(
                "Name clash: The method {} of type {} has the same erasure as {} of type {} but does not override it",
                own.sig.display(),
                self.display,
                c.sig.display(),
                c.sig.declaring_view
            );
            self.error(DiagnosticKind::NameClashErasure, own.sig.span, message, &[own, c]);
            kind = ConflictKind::NameClashErasure;
        }

        match own.sig.kind {
            MethodKind::Static => {
                if let Some(c) = equivalent.iter().copied().find(|c| c.sig.kind.is_instance()) {
                    let message = format!(
                        "This static method cannot hide the instance method from {}",
                        c.sig.declaring_view
                    );
                    self.error(DiagnosticKind::StaticMethodHidesInstance, own.sig.span, message, &[own, c]);
                }
            }
            MethodKind::Abstract | MethodKind::Default | MethodKind::Concrete | MethodKind::Private => {
                if let Some(c) = equivalent.iter().copied().find(|c| !c.sig.kind.is_instance()) {
                    let message = format!(
                        "This instance method cannot override the static method from {}",
                        c.sig.declaring_view
                    );
                    self.error(
                        DiagnosticKind::OverrideCannotChangeFromStatic,
                        own.sig.span,
                        message,
                        &[own, c],
                    );
                }
                let overridden: Vec<&Candidate> = equivalent
                    .iter()
                    .copied()
                    .filter(|c| c.sig.kind.is_instance())
                    .collect();
                if let Some(c) = overridden.iter().copied().find(|c| c.sig.is_final()) {
                    let message = format!("Cannot override the final method from {}", c.sig.declaring_view);
                    self.error(DiagnosticKind::CannotOverrideFinal, own.sig.span, message, &[own, c]);
                }
                if let Some(c) = overridden
                    .iter()
                    .copied()
                    .find(|c| own.sig.visibility < c.sig.visibility)
                {
                    let message = format!(
                        "Cannot reduce the visibility of the inherited method from {}",
                        c.sig.declaring_view
                    );
                    self.error(DiagnosticKind::InheritedReducesVisibility, own.sig.span, message, &[own, c]);
                }

                let mut incompatible: Vec<&Candidate> = Vec::new();
                for &c in &overridden {
                    if !self.substitutable(&own.sig, &c.sig) {
                        incompatible.push(c);
                    }
                }
                // abstract contributors before defaults, each in declaration order
                incompatible.sort_by_key(|c| (c.sig.kind == MethodKind::Default, c.order));
                for &c in &incompatible {
                    let message = format!("The return type is incompatible with {}", c.sig.qualified());
                    self.error(DiagnosticKind::ReturnIncompatible, own.sig.span, message, &[own, c]);
                }
                if !incompatible.is_empty() && kind == ConflictKind::Unique {
                    kind = ConflictKind::ReturnIncompatible;
                }
            }
        }

        let contributors = std::iter::once(self.ty)
            .chain(equivalent.iter().map(|c| c.sig.declaring))
            .chain(clashing.iter().map(|c| c.sig.declaring));
        self.record(kind, contributors, Some(own))
    }

    /// Interface members versus the public methods of `java.lang.Object`.
    fn check_object_method(&mut self, own: &Candidate) {
        if !own.sig.kind.is_instance() || own.sig.kind == MethodKind::Private {
            return;
        }
        let Some(object) = self.ctx.index().object() else {
            return;
        };
        let Ok(table) = self.ctx.table(object) else {
            return;
        };
        let Some(group) = table.group(self.key) else {
            return;
        };
        let Some(method) = group
            .candidates
            .iter()
            .find(|c| c.sig.visibility == Visibility::Public)
        else {
            return;
        };
        if method.sig.is_final() {
            let message = format!("Cannot override the final method from {}", method.sig.declaring_view);
            self.error(DiagnosticKind::CannotOverrideFinal, own.sig.span, message, &[own, method]);
        } else if own.sig.kind == MethodKind::Default {
            self.error(
                DiagnosticKind::DefaultOverridesObjectMethod,
                own.sig.span,
                "A default method cannot override a method from java.lang.Object ".to_owned(),
                &[own, method],
            );
        }
    }

    fn check_inherited(&mut self, inherited: &[&Candidate]) -> ConflictRecord {
        // erasure clashes between unrelated declarations take precedence
        for (idx, &a) in inherited.iter().enumerate() {
            for &b in &inherited[idx + 1..] {
                if a.sig.is_override_equivalent(&b.sig) {
                    continue;
                }
                if specificity::compare(self.ctx, a.sig.declaring, b.sig.declaring)
                    != Specificity::Incomparable
                {
                    continue;
                }
                let message = format!(
                    "Name clash: The method {} of type {} has the same erasure as {} of type {} but does not override it",
                    a.sig.display(),
                    a.sig.declaring_view,
                    b.sig.display(),
                    b.sig.declaring_view
                );
                self.error(DiagnosticKind::NameClashErasure, self.decl.span, message, &[a, b]);
                return self.record(
                    ConflictKind::NameClashErasure,
                    [a.sig.declaring, b.sig.declaring],
                    None,
                );
            }
        }

        let index = self.ctx.index();
        let (class_chain, interfaces): (Vec<&Candidate>, Vec<&Candidate>) = inherited
            .iter()
            .copied()
            .partition(|c| index.kind(c.sig.declaring) == TypeKind::Class);

        match class_chain.iter().copied().min_by_key(|c| c.depth) {
            Some(nearest) => self.check_trump(nearest, &interfaces),
            None => self.check_interfaces(&interfaces),
        }
    }

    fn must_implement(&mut self, abstract_method: &Candidate) {
        let message = format!(
            "The type {} must implement the inherited abstract method {}",
            self.display,
            abstract_method.sig.qualified()
        );
        self.error(DiagnosticKind::MustImplement, self.decl.span, message, &[abstract_method]);
    }

    fn incompatible_returns(&mut self, methods: &[&Candidate]) {
        let listed = methods
            .iter()
            .map(|c| c.sig.qualified())
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!("The return types are incompatible for the inherited methods {listed}");
        self.error(DiagnosticKind::ReturnIncompatible, self.decl.span, message, methods);
    }

    /// The first member whose return type is substitutable for every other member's.
    fn substitutable_for_all<'c>(&mut self, methods: &[&'c Candidate]) -> Option<&'c Candidate> {
        'outer: for &candidate in methods {
            for &other in methods {
                if candidate.sig.method != other.sig.method
                    && !self.substitutable(&candidate.sig, &other.sig)
                {
                    continue 'outer;
                }
            }
            return Some(candidate);
        }
        None
    }

    /// A class-chain method is applicable; interface members only constrain it.
    fn check_trump(&mut self, nearest: &Candidate, interfaces: &[&Candidate]) -> ConflictRecord {
        // interfaces the declaring class implements were checked there
        let mut outside: Vec<&Candidate> = Vec::new();
        for &c in interfaces {
            if !self.ctx.is_subtype(nearest.sig.declaring, c.sig.declaring) {
                outside.push(c);
            }
        }
        let relevant = specificity::maximal(self.ctx, &outside);
        let contributors: Vec<TypeId> = std::iter::once(nearest.sig.declaring)
            .chain(relevant.iter().map(|c| c.sig.declaring))
            .collect();

        if relevant.is_empty() {
            if nearest.sig.kind == MethodKind::Abstract && self.decl.is_concrete_class() {
                self.must_implement(nearest);
                return self.record(ConflictKind::MustImplement, contributors, Some(nearest));
            }
            return self.record(ConflictKind::Unique, contributors, Some(nearest));
        }

        let mut kind = ConflictKind::TrumpedByClassAncestor;
        match nearest.sig.kind {
            MethodKind::Static => {
                if let Some(c) = relevant.first().copied() {
                    let message = format!(
                        "The static method {} conflicts with the abstract method in {}",
                        nearest.sig.display(),
                        c.sig.declaring_view
                    );
                    self.error(DiagnosticKind::StaticMethodHidesInstance, self.decl.span, message, &[nearest, c]);
                }
            }
            MethodKind::Concrete | MethodKind::Abstract | MethodKind::Default | MethodKind::Private => {
                if nearest.sig.kind == MethodKind::Concrete && nearest.sig.visibility != Visibility::Public {
                    if let Some(c) = relevant.first().copied() {
                        let message = format!(
                            "The inherited method {} cannot hide the public abstract method in {}",
                            nearest.sig.qualified(),
                            c.sig.declaring_view
                        );
                        self.error(
                            DiagnosticKind::InheritedReducesVisibility,
                            self.decl.span,
                            message,
                            &[nearest, c],
                        );
                    }
                }
                if nearest.sig.kind == MethodKind::Abstract {
                    let mut all = vec![nearest];
                    all.extend(relevant.iter().copied());
                    if self.substitutable_for_all(&all).is_none() {
                        self.incompatible_returns(&all);
                        kind = ConflictKind::ReturnIncompatible;
                    } else if self.decl.is_concrete_class() {
                        self.must_implement(nearest);
                        kind = ConflictKind::MustImplement;
                    }
                } else {
                    let mut incompatible = vec![nearest];
                    for &c in &relevant {
                        if !self.substitutable(&nearest.sig, &c.sig) {
                            incompatible.push(c);
                        }
                    }
                    if incompatible.len() > 1 {
                        self.incompatible_returns(&incompatible);
                        kind = ConflictKind::ReturnIncompatible;
                    }
                }
            }
        }
        self.record(kind, contributors, Some(nearest))
    }

    fn check_interfaces(&mut self, interfaces: &[&Candidate]) -> ConflictRecord {
        let max = specificity::maximal(self.ctx, interfaces);
        let contributors: Vec<TypeId> = max.iter().map(|c| c.sig.declaring).collect();

        if let &[only] = max.as_slice() {
            return match only.sig.kind {
                MethodKind::Abstract if self.decl.is_concrete_class() => {
                    self.must_implement(only);
                    self.record(ConflictKind::MustImplement, contributors, Some(only))
                }
                MethodKind::Abstract
                | MethodKind::Default
                | MethodKind::Static
                | MethodKind::Private
                | MethodKind::Concrete => self.record(ConflictKind::Unique, contributors, Some(only)),
            };
        }

        let defaults: Vec<&Candidate> = max
            .iter()
            .copied()
            .filter(|c| c.sig.kind == MethodKind::Default)
            .collect();
        let abstracts: Vec<&Candidate> = max
            .iter()
            .copied()
            .filter(|c| c.sig.kind != MethodKind::Default)
            .collect();

        match (defaults.as_slice(), abstracts.first()) {
            ([first, second, ..], _) => {
                let message = format!(
                    "Duplicate default methods named {} with the parameters ({}) and ({}) are inherited from the types {} and {}",
                    self.key.name,
                    join(&first.sig.params),
                    join(&second.sig.params),
                    second.sig.declaring_view,
                    first.sig.declaring_view
                );
                self.error(DiagnosticKind::DefaultConflict, self.decl.span, message, &max);
                self.record(ConflictKind::DefaultConflict, contributors, None)
            }
            ([default], Some(other)) => {
                let message = format!(
                    "The default method {} inherited from {} conflicts with another method inherited from {}",
                    default.sig.display(),
                    default.sig.declaring_view,
                    other.sig.declaring_view
                );
                self.error(DiagnosticKind::DefaultConflict, self.decl.span, message, &max);
                self.record(ConflictKind::DefaultConflict, contributors, None)
            }
            _ => match self.substitutable_for_all(&max) {
                None => {
                    self.incompatible_returns(&max);
                    self.record(ConflictKind::ReturnIncompatible, contributors, None)
                }
                Some(_) if self.decl.is_concrete_class() => {
                    let first = max[0];
                    self.must_implement(first);
                    self.record(ConflictKind::MustImplement, contributors, Some(first))
                }
                Some(chosen) => self.record(ConflictKind::Unique, contributors, Some(chosen)),
            },
        }
    }
}
