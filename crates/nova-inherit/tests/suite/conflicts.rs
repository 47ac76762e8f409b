use nova_config::InheritConfig;
use nova_inherit::{
    ConflictKind, Modifier, Resolution, ResolutionContext, SelectorKey, TypeDeclaration,
    TypeHierarchyIndex, TypeResolution,
};
use nova_types::{TypeParam, TypeRef};
use pretty_assertions::assert_eq;

use super::{abstract_method, default_method, id, index_of, public_method, resolve, ty};

fn query(index: &TypeHierarchyIndex, name: &str, key: SelectorKey) -> Option<Resolution> {
    let config = InheritConfig::default();
    let mut ctx = ResolutionContext::new(index, &config);
    ctx.resolve(id(index, name), &key).expect("type should resolve")
}

fn no_args(name: &str) -> SelectorKey {
    SelectorKey::new(name, Vec::new())
}

fn list_of(arg: &str) -> TypeRef {
    TypeRef::class("List", vec![ty(arg)])
}

fn list_decl() -> TypeDeclaration {
    TypeDeclaration::interface("java.util.List").with_type_param(TypeParam::new("E"))
}

fn default_vs_abstract(first: &str, second: &str) -> TypeResolution {
    let index = index_of([
        TypeDeclaration::interface("I1").with_method(abstract_method("foo").returns(ty("String"))),
        TypeDeclaration::interface("I2").with_method(default_method("foo").returns(ty("String"))),
        TypeDeclaration::class("C").implements(ty(first)).implements(ty(second)),
    ]);
    resolve(&index, "C")
}

#[test]
fn default_conflicting_with_abstract_names_the_default_first() {
    for (first, second) in [("I1", "I2"), ("I2", "I1")] {
        let resolution = default_vs_abstract(first, second);
        assert_eq!(
            resolution.messages(),
            vec!["The default method foo() inherited from I2 conflicts with another method inherited from I1"]
        );
        let record = resolution.records_named("foo").next().unwrap();
        assert_eq!(record.kind, ConflictKind::DefaultConflict);
        assert_eq!(record.applicable, None);
        assert_eq!(record.contributors.len(), 2);
        assert!(resolution.is_concrete_ok());
    }
}

#[test]
fn duplicate_defaults_swap_names_with_declaration_order() {
    let messages = |first: &str, second: &str| {
        let index = index_of([
            TypeDeclaration::interface("A").with_method(default_method("m")),
            TypeDeclaration::interface("B").with_method(default_method("m")),
            TypeDeclaration::class("C").implements(ty(first)).implements(ty(second)),
        ]);
        resolve(&index, "C")
            .messages()
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };
    assert_eq!(
        messages("A", "B"),
        vec!["Duplicate default methods named m with the parameters () and () are inherited from the types B and A"]
    );
    assert_eq!(
        messages("B", "A"),
        vec!["Duplicate default methods named m with the parameters () and () are inherited from the types A and B"]
    );
}

#[test]
fn abstract_class_method_trumps_interface_defaults() {
    let index = index_of([
        TypeDeclaration::interface("I1").with_method(default_method("v").returns(ty("String"))),
        TypeDeclaration::interface("I2").with_method(default_method("v").returns(ty("String"))),
        TypeDeclaration::class("C1")
            .with_modifier(Modifier::Abstract)
            .with_method(
                abstract_method("v")
                    .with_modifier(Modifier::Abstract)
                    .returns(ty("Object")),
            ),
        TypeDeclaration::class("C2")
            .with_modifier(Modifier::Abstract)
            .extends(ty("C1"))
            .implements(ty("I1"))
            .implements(ty("I2")),
        TypeDeclaration::class("C3")
            .extends(ty("C2"))
            .with_method(public_method("v").returns(ty("Object"))),
    ]);

    let c2 = resolve(&index, "C2");
    assert!(c2.diagnostics.is_empty(), "{:?}", c2.messages());
    let record = c2.record(&no_args("v")).unwrap();
    assert_eq!(record.kind, ConflictKind::TrumpedByClassAncestor);
    assert_eq!(
        record.applicable.as_ref().map(|sig| sig.declaring),
        Some(id(&index, "C1"))
    );

    let c3 = resolve(&index, "C3");
    assert_eq!(
        c3.messages(),
        vec![
            "The return type is incompatible with I1.v()",
            "The return type is incompatible with I2.v()",
        ]
    );
    assert_eq!(c3.record(&no_args("v")).unwrap().kind, ConflictKind::ReturnIncompatible);
}

#[test]
fn abstract_redeclaration_suppresses_the_inherited_default() {
    let index = index_of([
        TypeDeclaration::interface("I").with_method(default_method("foo")),
        TypeDeclaration::interface("J")
            .extends(ty("I"))
            .with_method(abstract_method("foo")),
        TypeDeclaration::class("X").implements(ty("J")),
    ]);
    let resolution = resolve(&index, "X");
    assert_eq!(
        resolution.messages(),
        vec!["The type X must implement the inherited abstract method J.foo()"]
    );
    assert!(!resolution.is_concrete_ok());

    match query(&index, "X", no_args("foo")) {
        Some(Resolution::Conflict(record)) => {
            assert_eq!(record.kind, ConflictKind::MustImplement);
            assert_eq!(record.contributors, vec![id(&index, "J")]);
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[test]
fn diamond_reconvergence_is_not_a_conflict() {
    let index = index_of([
        TypeDeclaration::interface("A").with_method(default_method("m")),
        TypeDeclaration::interface("B").extends(ty("A")),
        TypeDeclaration::interface("C").extends(ty("A")),
        TypeDeclaration::interface("D").extends(ty("B")).extends(ty("C")),
    ]);
    assert!(resolve(&index, "D").diagnostics.is_empty());
    let applicable = query(&index, "D", no_args("m"))
        .and_then(|resolution| resolution.applicable().cloned())
        .expect("m() is applicable");
    assert_eq!(applicable.declaring, id(&index, "A"));
}

#[test]
fn wide_diamonds_resolve_once_per_ancestor() {
    let mut decls = vec![TypeDeclaration::interface("Base").with_method(default_method("m"))];
    let mut sink = TypeDeclaration::class("Sink");
    for idx in 0..64 {
        let name = format!("Mid{idx}");
        decls.push(TypeDeclaration::interface(name.clone()).extends(ty("Base")));
        sink = sink.implements(ty(&name));
    }
    decls.push(sink);
    let index = index_of(decls);

    let config = InheritConfig::default();
    let mut ctx = ResolutionContext::new(&index, &config);
    let table = ctx.table(id(&index, "Sink")).unwrap();
    let group = table.group(&no_args("m")).unwrap();
    assert_eq!(group.candidates.len(), 1);
    // Sink, Object, 64 intermediates and Base
    assert_eq!(table.ancestors().len(), 67);
    assert!(ctx.resolve_type(id(&index, "Sink")).unwrap().diagnostics.is_empty());
}

#[test]
fn erasure_clash_takes_precedence_over_default_conflict() {
    let index = index_of([
        list_decl(),
        TypeDeclaration::interface("A")
            .with_method(default_method("m").param(list_of("String"))),
        TypeDeclaration::interface("B")
            .with_method(default_method("m").param(list_of("Integer"))),
        TypeDeclaration::interface("C").extends(ty("A")).extends(ty("B")),
    ]);
    let resolution = resolve(&index, "C");
    assert_eq!(
        resolution.messages(),
        vec!["Name clash: The method m(List<String>) of type A has the same erasure as m(List<Integer>) of type B but does not override it"]
    );
    let key = SelectorKey::new("m", vec![ty("java.util.List")]);
    assert_eq!(resolution.record(&key).unwrap().kind, ConflictKind::NameClashErasure);
}

#[test]
fn own_method_clashing_by_erasure_does_not_override() {
    let index = index_of([
        list_decl(),
        TypeDeclaration::interface("A").with_method(abstract_method("m").param(list_of("String"))),
        TypeDeclaration::class("X")
            .with_modifier(Modifier::Abstract)
            .implements(ty("A"))
            .with_method(public_method("m").param(list_of("Integer"))),
    ]);
    assert_eq!(
        resolve(&index, "X").messages(),
        vec!["Name clash: The method m(List<Integer>) of type X has the same erasure as m(List<String>) of type A but does not override it"]
    );
}

#[test]
fn duplicate_declarations_in_one_type() {
    let index = index_of([
        list_decl(),
        TypeDeclaration::class("C")
            .with_method(public_method("m"))
            .with_method(public_method("m"))
            .with_method(public_method("n").param(list_of("String")))
            .with_method(public_method("n").param(list_of("Integer"))),
    ]);
    assert_eq!(
        resolve(&index, "C").messages(),
        vec![
            "Duplicate method m() in type C",
            "Erasure of method n(List<Integer>) is the same as another method in type C",
        ]
    );
}

#[test]
fn incompatible_inherited_returns_are_reported_once() {
    let index = index_of([
        TypeDeclaration::interface("I").with_method(abstract_method("m").returns(ty("String"))),
        TypeDeclaration::interface("J").with_method(abstract_method("m").returns(ty("Integer"))),
        TypeDeclaration::class("K")
            .with_modifier(Modifier::Abstract)
            .implements(ty("I"))
            .implements(ty("J")),
    ]);
    let resolution = resolve(&index, "K");
    assert_eq!(
        resolution.messages(),
        vec!["The return types are incompatible for the inherited methods I.m(), J.m()"]
    );
    assert_eq!(resolution.record(&no_args("m")).unwrap().kind, ConflictKind::ReturnIncompatible);
}

#[test]
fn covariant_abstract_members_merge() {
    let index = index_of([
        TypeDeclaration::interface("I").with_method(abstract_method("m").returns(ty("Object"))),
        TypeDeclaration::interface("J").with_method(abstract_method("m").returns(ty("String"))),
        TypeDeclaration::interface("K").extends(ty("I")).extends(ty("J")),
    ]);
    assert!(resolve(&index, "K").diagnostics.is_empty());
    let applicable = query(&index, "K", no_args("m"))
        .and_then(|resolution| resolution.applicable().cloned())
        .unwrap();
    assert_eq!(applicable.declaring, id(&index, "J"));
}

#[test]
fn implementing_the_conflict_resolves_it() {
    let index = index_of([
        TypeDeclaration::interface("I1").with_method(abstract_method("foo").returns(ty("String"))),
        TypeDeclaration::interface("I2").with_method(default_method("foo").returns(ty("String"))),
        TypeDeclaration::class("C")
            .implements(ty("I1"))
            .implements(ty("I2"))
            .with_method(public_method("foo").returns(ty("String"))),
    ]);
    let resolution = resolve(&index, "C");
    assert!(resolution.diagnostics.is_empty(), "{:?}", resolution.messages());
    let record = resolution.record(&no_args("foo")).unwrap();
    assert_eq!(record.kind, ConflictKind::Unique);
    assert_eq!(record.applicable.as_ref().unwrap().declaring, id(&index, "C"));
}

#[test]
fn abstract_superclass_method_must_be_implemented() {
    let index = index_of([
        TypeDeclaration::class("S")
            .with_modifier(Modifier::Abstract)
            .with_method(abstract_method("run").with_modifier(Modifier::Abstract)),
        TypeDeclaration::class("T").extends(ty("S")),
    ]);
    assert_eq!(
        resolve(&index, "T").messages(),
        vec!["The type T must implement the inherited abstract method S.run()"]
    );
}

#[test]
fn package_private_methods_stay_in_their_package() {
    let index = index_of([
        TypeDeclaration::class("p.A").with_method(abstract_method("m").with_body()),
        TypeDeclaration::class("p.B").extends(ty("p.A")),
        TypeDeclaration::class("q.C").extends(ty("p.A")),
    ]);
    assert!(matches!(
        query(&index, "p.B", no_args("m")),
        Some(Resolution::Applicable(_))
    ));
    assert_eq!(query(&index, "q.C", no_args("m")), None);
}

#[test]
fn non_public_class_method_cannot_implement_interface_method() {
    let index = index_of([
        TypeDeclaration::interface("I").with_method(abstract_method("clone").returns(ty("Object"))),
        TypeDeclaration::class("C").implements(ty("I")),
    ]);
    assert_eq!(
        resolve(&index, "C").messages(),
        vec!["The inherited method Object.clone() cannot hide the public abstract method in I"]
    );
}

#[test]
fn interface_methods_versus_object() {
    let index = index_of([
        TypeDeclaration::interface("I").with_method(default_method("toString").returns(ty("String"))),
        TypeDeclaration::interface("J").with_method(abstract_method("notify")),
        TypeDeclaration::interface("K").with_method(abstract_method("toString").returns(ty("String"))),
    ]);
    assert_eq!(
        resolve(&index, "I").messages(),
        vec!["A default method cannot override a method from java.lang.Object "]
    );
    assert_eq!(
        resolve(&index, "J").messages(),
        vec!["Cannot override the final method from Object"]
    );
    assert!(resolve(&index, "K").diagnostics.is_empty());
}

#[test]
fn static_and_instance_methods_do_not_override_each_other() {
    let index = index_of([
        TypeDeclaration::class("Y").with_method(public_method("m").with_modifier(Modifier::Static)),
        TypeDeclaration::class("Z").extends(ty("Y")).with_method(public_method("m")),
        TypeDeclaration::class("A")
            .with_type_param(TypeParam::new("T"))
            .with_method(public_method("m").param(ty("T"))),
        TypeDeclaration::class("B")
            .extends(TypeRef::class("A", vec![ty("String")]))
            .with_method(
                public_method("m")
                    .with_modifier(Modifier::Static)
                    .param(ty("String")),
            ),
    ]);
    assert_eq!(
        resolve(&index, "Z").messages(),
        vec!["This instance method cannot override the static method from Y"]
    );
    assert_eq!(
        resolve(&index, "B").messages(),
        vec!["This static method cannot hide the instance method from A<String>"]
    );
}

#[test]
fn final_methods_and_reduced_visibility() {
    let index = index_of([
        TypeDeclaration::class("X").with_method(public_method("m").with_modifier(Modifier::Final)),
        TypeDeclaration::class("Y").extends(ty("X")).with_method(public_method("m")),
        TypeDeclaration::interface("I").with_method(abstract_method("run")),
        TypeDeclaration::class("C")
            .implements(ty("I"))
            .with_method(abstract_method("run").with_body()),
    ]);
    assert_eq!(
        resolve(&index, "Y").messages(),
        vec!["Cannot override the final method from X"]
    );
    assert_eq!(
        resolve(&index, "C").messages(),
        vec!["Cannot reduce the visibility of the inherited method from I"]
    );
}

#[test]
fn conflicting_selector_resolves_to_its_record() {
    let index = index_of([
        TypeDeclaration::interface("A").with_method(default_method("m")),
        TypeDeclaration::interface("B").with_method(default_method("m")),
        TypeDeclaration::interface("C").extends(ty("A")).extends(ty("B")),
    ]);
    let Some(Resolution::Conflict(record)) = query(&index, "C", no_args("m")) else {
        panic!("m() should conflict");
    };
    assert_eq!(record.kind, ConflictKind::DefaultConflict);
    assert_eq!(record.contributors, vec![id(&index, "A"), id(&index, "B")]);
    assert_eq!(query(&index, "C", no_args("absent")), None);
}
