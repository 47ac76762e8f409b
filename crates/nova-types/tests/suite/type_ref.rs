use std::collections::HashMap;

use nova_types::{TypeParam, TypeParseError, TypeRef, WildcardBound};
use pretty_assertions::assert_eq;

#[test]
fn substitution_reaches_nested_arguments() {
    let list_of_t = TypeRef::class(
        "java.util.List",
        vec![TypeRef::Wildcard(WildcardBound::Extends(Box::new(
            TypeRef::type_var("T"),
        )))],
    );
    let subst = HashMap::from([("T".to_owned(), TypeRef::named("java.lang.Double"))]);
    assert_eq!(list_of_t.substitute(&subst).to_string(), "List<? extends Double>");
    assert!(list_of_t.has_type_vars());
    assert!(!list_of_t.substitute(&subst).has_type_vars());
}

#[test]
fn erasure_drops_arguments_and_resolves_variables() {
    let params = [TypeParam::new("E").with_bound(TypeRef::named("java.lang.Number"))];
    let ty = TypeRef::array(TypeRef::type_var("E"));
    assert_eq!(ty.erasure(&[&params]), TypeRef::array(TypeRef::named("java.lang.Number")));
    assert_eq!(ty.erasure(&[&params]).descriptor(), "[Ljava/lang/Number;");

    let parameterized = TypeRef::class("java.util.List", vec![TypeRef::named("java.lang.String")]);
    assert_eq!(parameterized.erasure(&[]), TypeRef::named("java.util.List"));
}

#[test]
fn parsed_primitives_and_void_render_descriptors() {
    assert_eq!(TypeRef::parse("int").unwrap().descriptor(), "I");
    assert_eq!(TypeRef::parse("void").unwrap(), TypeRef::Void);
    assert_eq!(TypeRef::parse("long[][]").unwrap().descriptor(), "[[J");
    assert!(TypeRef::parse("double").unwrap().is_primitive());
}

#[test]
fn malformed_types_are_rejected() {
    assert!(matches!(
        TypeRef::parse("List<String"),
        Err(TypeParseError::UnexpectedEnd(_))
    ));
    assert!(matches!(
        TypeRef::parse("? extends Number"),
        Err(TypeParseError::Misplaced(_))
    ));
    assert!(matches!(
        TypeRef::parse("void[]"),
        Err(TypeParseError::Misplaced(_))
    ));
}
