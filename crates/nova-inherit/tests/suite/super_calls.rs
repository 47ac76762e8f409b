use nova_config::InheritConfig;
use nova_inherit::{
    CallResolution, Modifier, ResolutionContext, SuperCall, TypeDeclaration, TypeHierarchyIndex,
};
use nova_types::{TypeParam, TypeRef};
use pretty_assertions::assert_eq;

use super::{abstract_method, default_method, id, index_of, public_method, ty};

fn resolve_call(index: &TypeHierarchyIndex, call: SuperCall) -> CallResolution {
    let config = InheritConfig::default();
    let mut ctx = ResolutionContext::new(index, &config);
    ctx.resolve_super_call(&call).expect("super call should resolve")
}

#[test]
fn direct_superinterface_default_is_callable() {
    let index = index_of([
        TypeDeclaration::interface("I").with_method(default_method("foo")),
        TypeDeclaration::class("C")
            .implements(ty("I"))
            .with_method(public_method("foo")),
    ]);
    let (c, i) = (id(&index, "C"), id(&index, "I"));
    let resolution = resolve_call(&index, SuperCall::new(c, "foo").qualified(i));
    assert!(resolution.diagnostics.is_empty());
    assert_eq!(resolution.target.map(|sig| sig.declaring), Some(i));
}

#[test]
fn indirect_superinterfaces_cannot_be_named() {
    let index = index_of([
        TypeDeclaration::interface("I0").with_method(default_method("foo")),
        TypeDeclaration::interface("I1")
            .extends(ty("I0"))
            .with_method(default_method("foo")),
        TypeDeclaration::interface("I2")
            .extends(ty("I1"))
            .with_method(default_method("foo")),
    ]);
    let resolution = resolve_call(
        &index,
        SuperCall::new(id(&index, "I2"), "foo").qualified(id(&index, "I0")),
    );
    assert_eq!(
        resolution.messages(),
        vec!["Illegal reference to super type I0, cannot bypass the more specific direct super type I1"]
    );
    assert_eq!(resolution.codes(), vec!["ILLEGAL_SUPER_REFERENCE"]);
}

fn ordered_set() -> TypeHierarchyIndex {
    let e = || ty("E");
    index_of([
        TypeDeclaration::interface("Coll")
            .with_type_param(TypeParam::new("E"))
            .with_method(default_method("add").param(e())),
        TypeDeclaration::interface("OrderedSet")
            .with_type_param(TypeParam::new("E"))
            .extends(TypeRef::class("Coll", vec![e()]))
            .with_method(abstract_method("add").param(e())),
        TypeDeclaration::class("Impl")
            .with_type_param(TypeParam::new("E"))
            .implements(TypeRef::class("OrderedSet", vec![e()]))
            .implements(TypeRef::class("Coll", vec![e()]))
            .with_method(public_method("add").param(e())),
    ])
}

#[test]
fn redundant_direct_superinterface_is_bypassed() {
    let index = ordered_set();
    let call = SuperCall::new(id(&index, "Impl"), "add")
        .qualified(id(&index, "Coll"))
        .arg(TypeRef::object());
    assert_eq!(
        resolve_call(&index, call).messages(),
        vec!["Illegal reference to super type Coll, cannot bypass the more specific direct super type OrderedSet"]
    );
}

#[test]
fn abstract_methods_cannot_be_invoked_through_super() {
    let index = ordered_set();
    let call = SuperCall::new(id(&index, "Impl"), "add")
        .qualified(id(&index, "OrderedSet"))
        .arg(TypeRef::object());
    let resolution = resolve_call(&index, call);
    assert_eq!(
        resolution.messages(),
        vec!["Cannot directly invoke the abstract method add(E) for the type OrderedSet<E>"]
    );
    assert_eq!(resolution.target, None);

    let classes = index_of([
        TypeDeclaration::class("A")
            .with_modifier(Modifier::Abstract)
            .with_method(abstract_method("m").with_modifier(Modifier::Abstract)),
        TypeDeclaration::class("B").extends(ty("A")).with_method(public_method("m")),
    ]);
    assert_eq!(
        resolve_call(&classes, SuperCall::new(id(&classes, "B"), "m")).messages(),
        vec!["Cannot directly invoke the abstract method m() for the type A"]
    );
}

#[test]
fn more_specific_override_in_sibling_cannot_be_bypassed() {
    let index = index_of([
        TypeDeclaration::interface("I0").with_method(default_method("foo")),
        TypeDeclaration::interface("IA").extends(ty("I0")),
        TypeDeclaration::interface("IB")
            .extends(ty("I0"))
            .with_method(default_method("foo")),
        TypeDeclaration::interface("IX")
            .extends(ty("IA"))
            .extends(ty("IB"))
            .with_method(default_method("foo")),
    ]);
    let resolution = resolve_call(
        &index,
        SuperCall::new(id(&index, "IX"), "foo").qualified(id(&index, "IA")),
    );
    assert_eq!(
        resolution.messages(),
        vec!["Illegal reference to super method foo() from type I0, cannot bypass the more specific override from type IB"]
    );

    let through_ib = resolve_call(
        &index,
        SuperCall::new(id(&index, "IX"), "foo").qualified(id(&index, "IB")),
    );
    assert!(through_ib.is_ok());
    assert_eq!(through_ib.target.map(|sig| sig.declaring), Some(id(&index, "IB")));
}

#[test]
fn enclosing_instances() {
    let index = index_of([
        TypeDeclaration::interface("I").with_method(default_method("foo")),
        TypeDeclaration::class("Base").with_method(public_method("foo")),
        TypeDeclaration::class("Outer")
            .extends(ty("Base"))
            .implements(ty("I")),
        TypeDeclaration::class("Outer$Inner"),
    ]);
    let (inner, outer) = (id(&index, "Outer$Inner"), id(&index, "Outer"));

    let via_interface = SuperCall::new(inner, "foo")
        .qualified(id(&index, "I"))
        .enclosed_by(outer);
    assert_eq!(
        resolve_call(&index, via_interface).messages(),
        vec!["No enclosing instance of the type I is accessible in scope"]
    );

    let via_outer = SuperCall::new(inner, "foo").qualified(outer).enclosed_by(outer);
    let resolution = resolve_call(&index, via_outer);
    assert!(resolution.is_ok());
    assert_eq!(resolution.target.map(|sig| sig.declaring), Some(id(&index, "Base")));

    let unrelated = SuperCall::new(inner, "foo").qualified(id(&index, "Base"));
    assert_eq!(
        resolve_call(&index, unrelated).messages(),
        vec!["No enclosing instance of the type Base is accessible in scope"]
    );
}

#[test]
fn static_members_and_contexts() {
    let index = index_of([
        TypeDeclaration::interface("I")
            .with_method(public_method("util").with_modifier(Modifier::Static))
            .with_method(default_method("foo")),
        TypeDeclaration::class("C").implements(ty("I")),
    ]);
    let (c, i) = (id(&index, "C"), id(&index, "I"));

    assert_eq!(
        resolve_call(&index, SuperCall::new(c, "util").qualified(i)).messages(),
        vec!["This static method of interface I can only be accessed as I.util"]
    );
    assert_eq!(
        resolve_call(&index, SuperCall::new(c, "foo").qualified(i).in_static_context()).messages(),
        vec!["Cannot use super in a static context"]
    );
    assert_eq!(
        resolve_call(&index, SuperCall::new(c, "missing").qualified(i)).messages(),
        vec!["The method missing() is undefined for the type I"]
    );
}

#[test]
fn plain_super_uses_the_superclass_chain() {
    let index = index_of([TypeDeclaration::class("C").with_method(
        public_method("toString").returns(ty("String")),
    )]);
    let resolution = resolve_call(&index, SuperCall::new(id(&index, "C"), "toString"));
    assert!(resolution.is_ok());
    assert_eq!(
        resolution.target.map(|sig| sig.declaring),
        index.lookup("java.lang.Object")
    );
}
