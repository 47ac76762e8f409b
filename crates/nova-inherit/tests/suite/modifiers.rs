use nova_config::{DiagnosticLevel, InheritConfig};
use nova_inherit::{DiagnosticKind, MethodDecl, Modifier, TypeDeclaration};
use nova_types::{Severity, TypeRef};
use pretty_assertions::assert_eq;

use super::{abstract_method, default_method, index_of, resolve_with};

fn diagnostics(
    config: &InheritConfig,
    decl: TypeDeclaration,
) -> Vec<(DiagnosticKind, Severity, String)> {
    let name = decl.name.clone();
    let index = index_of([decl]);
    resolve_with(&index, config, &name)
        .diagnostics
        .into_iter()
        .map(|d| (d.kind, d.severity, d.message))
        .collect()
}

fn messages(config: &InheritConfig, decl: TypeDeclaration) -> Vec<String> {
    diagnostics(config, decl)
        .into_iter()
        .map(|(_, _, message)| message)
        .collect()
}

fn java(release: u16) -> InheritConfig {
    InheritConfig::for_release(release)
}

#[test]
fn strictfp_on_abstract_interface_method() {
    let decl = || {
        TypeDeclaration::interface("I")
            .with_method(abstract_method("m").with_modifier(Modifier::Strictfp))
    };
    assert_eq!(
        diagnostics(&java(17), decl()),
        vec![
            (
                DiagnosticKind::RedundantStrictfp,
                Severity::Warning,
                "Floating-point expressions are always strictly evaluated from source level 17. Keyword 'strictfp' is not required.".to_owned()
            ),
            (
                DiagnosticKind::IllegalModifierCombination,
                Severity::Error,
                "strictfp is not permitted for abstract interface method m".to_owned()
            ),
        ]
    );
    assert_eq!(
        messages(&java(11), decl()),
        vec!["strictfp is not permitted for abstract interface method m"]
    );
}

#[test]
fn redundant_strictfp_severity_follows_configuration() {
    let decl = || {
        TypeDeclaration::class("C").with_method(
            MethodDecl::new("calc")
                .with_modifier(Modifier::Strictfp)
                .with_body()
                .returns(TypeRef::int()),
        )
    };
    let mut config = java(21);
    config.diagnostics.redundant_strictfp = DiagnosticLevel::Error;
    let found = diagnostics(&config, decl());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].1, Severity::Error);

    config.diagnostics.redundant_strictfp = DiagnosticLevel::Ignore;
    assert!(diagnostics(&config, decl()).is_empty());
    assert!(diagnostics(&java(8), decl()).is_empty());
}

#[test]
fn interface_method_modifier_sets() {
    let iface = |method: MethodDecl| TypeDeclaration::interface("I").with_method(method);

    assert_eq!(
        messages(&java(21), iface(abstract_method("m").with_modifier(Modifier::Final))),
        vec!["Illegal modifier for the interface method m; only public, private, abstract, default, static and strictfp are permitted"]
    );
    assert_eq!(
        messages(&java(8), iface(abstract_method("m").with_modifier(Modifier::Synchronized))),
        vec!["Illegal modifier for the interface method m; only public, abstract, default, static and strictfp are permitted"]
    );
    assert_eq!(
        messages(
            &java(21),
            iface(default_method("m").with_modifier(Modifier::Static))
        ),
        vec!["Illegal combination of modifiers for the interface method m; only one of abstract, default, or static permitted"]
    );
    assert_eq!(
        messages(
            &java(9),
            iface(default_method("m").with_modifier(Modifier::Private))
        ),
        vec!["Illegal combination of modifiers for the private interface method m; additionally only one of static and strictfp is permitted"]
    );
    assert!(messages(
        &java(9),
        iface(
            MethodDecl::new("helper")
                .with_modifier(Modifier::Private)
                .with_modifier(Modifier::Static)
                .with_body()
        )
    )
    .is_empty());
}

#[test]
fn interface_bodies() {
    let iface = |method: MethodDecl| TypeDeclaration::interface("I").with_method(method);
    assert_eq!(
        diagnostics(&java(21), iface(MethodDecl::new("m").with_modifier(Modifier::Default))),
        vec![(
            DiagnosticKind::MissingBody,
            Severity::Error,
            "This method requires a body instead of a semicolon".to_owned()
        )]
    );
    assert_eq!(
        diagnostics(&java(21), iface(MethodDecl::new("m").with_modifier(Modifier::Static))),
        vec![(
            DiagnosticKind::MissingBody,
            Severity::Error,
            "This method requires a body instead of a semicolon".to_owned()
        )]
    );
    assert_eq!(
        diagnostics(&java(21), iface(abstract_method("m").with_body())),
        vec![(
            DiagnosticKind::UnexpectedBodyForAbstract,
            Severity::Error,
            "Abstract methods do not specify a body".to_owned()
        )]
    );
}

#[test]
fn class_method_modifiers() {
    let class = |method: MethodDecl| TypeDeclaration::class("C").with_method(method);
    let abstract_class = |method: MethodDecl| {
        TypeDeclaration::class("C")
            .with_modifier(Modifier::Abstract)
            .with_method(method)
    };

    assert_eq!(
        messages(&java(21), class(default_method("m"))),
        vec!["Illegal modifier for the method m; only public, protected, private, abstract, static, final, synchronized, native & strictfp are permitted"]
    );
    assert_eq!(
        messages(
            &java(21),
            class(
                MethodDecl::new("m")
                    .with_modifier(Modifier::Public)
                    .with_modifier(Modifier::Private)
                    .with_body()
            )
        ),
        vec!["Illegal combination of modifiers for the method m; only one of public, protected or private is permitted"]
    );
    assert_eq!(
        messages(
            &java(21),
            abstract_class(
                MethodDecl::new("m")
                    .with_modifier(Modifier::Abstract)
                    .with_modifier(Modifier::Static)
            )
        ),
        vec!["The abstract method m in type C can only set a visibility modifier, one of public or protected"]
    );
    assert_eq!(
        messages(&java(21), class(MethodDecl::new("m").with_modifier(Modifier::Abstract))),
        vec!["The abstract method m in type C can only be defined by an abstract class"]
    );
    assert_eq!(
        messages(&java(21), class(MethodDecl::new("m"))),
        vec!["This method requires a body instead of a semicolon"]
    );
    assert!(messages(
        &java(21),
        class(
            MethodDecl::new("peek")
                .with_modifier(Modifier::Native)
                .returns(TypeRef::int())
        )
    )
    .is_empty());
}

#[test]
fn annotation_attributes_allow_only_public_and_abstract() {
    let decl = TypeDeclaration::annotation("p.Marker").with_method(
        MethodDecl::new("value")
            .with_modifier(Modifier::Static)
            .returns(TypeRef::int()),
    );
    assert_eq!(
        messages(&java(21), decl),
        vec!["Illegal modifier for the annotation attribute Marker.value; only public & abstract are permitted"]
    );

    let ok = TypeDeclaration::annotation("p.Marker").with_method(
        MethodDecl::new("value")
            .with_modifier(Modifier::Public)
            .with_modifier(Modifier::Abstract)
            .returns(TypeRef::int()),
    );
    assert!(messages(&java(21), ok).is_empty());
}
