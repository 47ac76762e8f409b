//! Modifier and body legality of declared methods.
//!
//! Every version-dependent answer comes from the [`InheritConfig`]: whether `private` is a
//! legal interface modifier, and whether (and how loudly) a redundant `strictfp` is reported.

use nova_config::InheritConfig;

use crate::diagnostics::{DiagnosticKind, DiagnosticSink, MethodDiagnostic};
use crate::hierarchy::{MethodDecl, MethodKind, Modifier, TypeDeclaration, TypeId, TypeKind};

const INTERFACE_MODIFIERS: &[Modifier] = &[
    Modifier::Public,
    Modifier::Private,
    Modifier::Abstract,
    Modifier::Default,
    Modifier::Static,
    Modifier::Strictfp,
];

const CLASS_MODIFIERS: &[Modifier] = &[
    Modifier::Public,
    Modifier::Protected,
    Modifier::Private,
    Modifier::Abstract,
    Modifier::Static,
    Modifier::Final,
    Modifier::Synchronized,
    Modifier::Native,
    Modifier::Strictfp,
];

const ANNOTATION_MODIFIERS: &[Modifier] = &[Modifier::Public, Modifier::Abstract];

const ACCESS: &[Modifier] = &[Modifier::Public, Modifier::Protected, Modifier::Private];

/// Modifiers an abstract class method may not combine with.
const NOT_WITH_ABSTRACT: &[Modifier] = &[
    Modifier::Private,
    Modifier::Static,
    Modifier::Final,
    Modifier::Native,
    Modifier::Synchronized,
    Modifier::Strictfp,
];

/// Validate every method declared by `decl`.
pub fn validate_type(
    config: &InheritConfig,
    ty: TypeId,
    decl: &TypeDeclaration,
    sink: &mut DiagnosticSink,
) {
    for method in &decl.methods {
        validate_method(config, ty, decl, method, sink);
    }
}

pub fn validate_method(
    config: &InheritConfig,
    ty: TypeId,
    decl: &TypeDeclaration,
    method: &MethodDecl,
    sink: &mut DiagnosticSink,
) {
    let mut v = Validator {
        config,
        ty,
        decl,
        method,
        sink,
    };
    match decl.kind {
        TypeKind::Interface => v.interface_method(),
        TypeKind::Class => v.class_method(),
        TypeKind::Annotation => v.annotation_member(),
    }
}

struct Validator<'v> {
    config: &'v InheritConfig,
    ty: TypeId,
    decl: &'v TypeDeclaration,
    method: &'v MethodDecl,
    sink: &'v mut DiagnosticSink,
}

impl Validator<'_> {
    fn has(&self, modifier: Modifier) -> bool {
        self.method.modifiers.contains(modifier)
    }

    fn error(&mut self, kind: DiagnosticKind, message: String) {
        self.sink
            .push(MethodDiagnostic::error(kind, self.ty, self.method.span, message));
    }

    fn illegal_modifiers(&self, allowed: &[Modifier]) -> bool {
        self.method.modifiers.iter().any(|m| !allowed.contains(&m))
    }

    fn redundant_strictfp(&mut self) {
        if !self.has(Modifier::Strictfp) || !self.config.language_level().strictfp_is_redundant() {
            return;
        }
        let Some(severity) = self.config.diagnostics.redundant_strictfp.severity() else {
            return;
        };
        self.sink.push(MethodDiagnostic::new(
            DiagnosticKind::RedundantStrictfp,
            severity,
            self.ty,
            self.method.span,
            "Floating-point expressions are always strictly evaluated from source level 17. Keyword 'strictfp' is not required.",
        ));
    }

    fn interface_method(&mut self) {
        let name = self.method.name.clone();
        let kind = MethodKind::of(self.method, self.decl.kind);
        self.redundant_strictfp();

        if self.has(Modifier::Strictfp) && kind == MethodKind::Abstract {
            self.error(
                DiagnosticKind::IllegalModifierCombination,
                format!("strictfp is not permitted for abstract interface method {name}"),
            );
        }

        let private_allowed = self.config.language_level().supports_private_interface_methods();
        let allowed: Vec<Modifier> = INTERFACE_MODIFIERS
            .iter()
            .copied()
            .filter(|m| *m != Modifier::Private || private_allowed)
            .collect();
        if self.illegal_modifiers(&allowed) {
            let listed = if private_allowed {
                "public, private, abstract, default, static and strictfp"
            } else {
                "public, abstract, default, static and strictfp"
            };
            self.error(
                DiagnosticKind::IllegalModifierForContext,
                format!("Illegal modifier for the interface method {name}; only {listed} are permitted"),
            );
            return;
        }

        let shapes = [Modifier::Abstract, Modifier::Default, Modifier::Static];
        if self.method.modifiers.count_of(&shapes) > 1 {
            self.error(
                DiagnosticKind::IllegalModifierCombination,
                format!(
                    "Illegal combination of modifiers for the interface method {name}; only one of abstract, default, or static permitted"
                ),
            );
            return;
        }
        if self.has(Modifier::Private)
            && self.method.modifiers.count_of(&[Modifier::Public, Modifier::Abstract, Modifier::Default]) > 0
        {
            self.error(
                DiagnosticKind::IllegalModifierCombination,
                format!(
                    "Illegal combination of modifiers for the private interface method {name}; additionally only one of static and strictfp is permitted"
                ),
            );
            return;
        }

        match kind {
            MethodKind::Abstract => {
                if self.method.has_body {
                    self.abstract_with_body();
                }
            }
            MethodKind::Default | MethodKind::Static | MethodKind::Private | MethodKind::Concrete => {
                if !self.method.has_body {
                    self.missing_body();
                }
            }
        }
    }

    fn class_method(&mut self) {
        let name = self.method.name.clone();
        let owner = self.decl.simple_name();
        self.redundant_strictfp();

        if self.illegal_modifiers(CLASS_MODIFIERS) {
            self.error(
                DiagnosticKind::IllegalModifierForContext,
                format!(
                    "Illegal modifier for the method {name}; only public, protected, private, abstract, static, final, synchronized, native & strictfp are permitted"
                ),
            );
            return;
        }
        if self.method.modifiers.count_of(ACCESS) > 1 {
            self.error(
                DiagnosticKind::IllegalModifierCombination,
                format!(
                    "Illegal combination of modifiers for the method {name}; only one of public, protected or private is permitted"
                ),
            );
            return;
        }

        if self.has(Modifier::Abstract) {
            if self.method.modifiers.count_of(NOT_WITH_ABSTRACT) > 0 {
                self.error(
                    DiagnosticKind::IllegalModifierCombination,
                    format!(
                        "The abstract method {name} in type {owner} can only set a visibility modifier, one of public or protected"
                    ),
                );
                return;
            }
            if !self.decl.is_abstract() {
                self.error(
                    DiagnosticKind::IllegalModifierForContext,
                    format!("The abstract method {name} in type {owner} can only be defined by an abstract class"),
                );
            }
            if self.method.has_body {
                self.abstract_with_body();
            }
            return;
        }

        if self.has(Modifier::Native) {
            if self.method.has_body {
                self.error(
                    DiagnosticKind::UnexpectedBodyForNative,
                    "Native methods do not specify a body".to_owned(),
                );
            }
        } else if !self.method.has_body {
            self.missing_body();
        }
    }

    fn annotation_member(&mut self) {
        if self.illegal_modifiers(ANNOTATION_MODIFIERS) {
            let message = format!(
                "Illegal modifier for the annotation attribute {}.{}; only public & abstract are permitted",
                self.decl.simple_name(),
                self.method.name
            );
            self.error(DiagnosticKind::IllegalModifierForContext, message);
            return;
        }
        if self.method.has_body {
            self.abstract_with_body();
        }
    }

    fn missing_body(&mut self) {
        self.error(
            DiagnosticKind::MissingBody,
            "This method requires a body instead of a semicolon".to_owned(),
        );
    }

    fn abstract_with_body(&mut self) {
        self.error(
            DiagnosticKind::UnexpectedBodyForAbstract,
            "Abstract methods do not specify a body".to_owned(),
        );
    }
}
