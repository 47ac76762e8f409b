//! A minimal slice of `java.lang` so hierarchies have a real `Object` at the top.

use nova_types::{PrimitiveType, TypeParam, TypeRef, WildcardBound, OBJECT};

use crate::hierarchy::{MethodDecl, Modifier, TypeDeclaration};

fn object() -> TypeRef {
    TypeRef::object()
}

fn string() -> TypeRef {
    TypeRef::named("java.lang.String")
}

fn prim(prim: PrimitiveType) -> TypeRef {
    TypeRef::Primitive(prim)
}

fn public(name: &str) -> MethodDecl {
    MethodDecl::new(name).with_modifier(Modifier::Public)
}

fn public_impl(name: &str) -> MethodDecl {
    public(name).with_body()
}

fn public_abstract(name: &str) -> MethodDecl {
    public(name).with_modifier(Modifier::Abstract)
}

fn final_native(name: &str) -> MethodDecl {
    public(name)
        .with_modifier(Modifier::Final)
        .with_modifier(Modifier::Native)
}

fn java_lang_object() -> TypeDeclaration {
    TypeDeclaration::class(OBJECT)
        .with_modifier(Modifier::Public)
        .with_method(
            public_impl("equals")
                .param(object())
                .returns(prim(PrimitiveType::Boolean)),
        )
        .with_method(
            public("hashCode")
                .with_modifier(Modifier::Native)
                .returns(TypeRef::int()),
        )
        .with_method(public_impl("toString").returns(string()))
        .with_method(final_native("getClass").returns(TypeRef::class(
            "java.lang.Class",
            vec![TypeRef::Wildcard(WildcardBound::Unbounded)],
        )))
        .with_method(
            MethodDecl::new("clone")
                .with_modifier(Modifier::Protected)
                .with_modifier(Modifier::Native)
                .returns(object()),
        )
        .with_method(
            MethodDecl::new("finalize")
                .with_modifier(Modifier::Protected)
                .with_body(),
        )
        .with_method(final_native("notify"))
        .with_method(final_native("notifyAll"))
        .with_method(
            public_impl("wait")
                .with_modifier(Modifier::Final),
        )
        .with_method(final_native("wait").param(prim(PrimitiveType::Long)))
        .with_method(
            public_impl("wait")
                .with_modifier(Modifier::Final)
                .param(prim(PrimitiveType::Long))
                .param(TypeRef::int()),
        )
}

fn boxed(name: &str, value: PrimitiveType) -> TypeDeclaration {
    let qualified = format!("java.lang.{name}");
    let this = TypeRef::named(qualified.clone());
    TypeDeclaration::class(qualified)
        .with_modifier(Modifier::Public)
        .with_modifier(Modifier::Final)
        .extends(TypeRef::named("java.lang.Number"))
        .implements(TypeRef::class("java.lang.Comparable", vec![this.clone()]))
        .with_method(public_impl("intValue").returns(TypeRef::int()))
        .with_method(public_impl("longValue").returns(prim(PrimitiveType::Long)))
        .with_method(public_impl("doubleValue").returns(prim(PrimitiveType::Double)))
        .with_method(
            public_impl("compareTo")
                .param(this.clone())
                .returns(TypeRef::int()),
        )
        .with_method(
            public_impl("valueOf")
                .with_modifier(Modifier::Static)
                .param(prim(value))
                .returns(this),
        )
}

/// `Object`, `String`, `CharSequence`, `Comparable<T>`, `Number`, `Integer`, `Double`,
/// `Cloneable`, `java.io.Serializable`, `Iterable<T>` and `AutoCloseable`.
pub fn minimal_jdk() -> Vec<TypeDeclaration> {
    let t = || TypeRef::type_var("T");
    vec![
        java_lang_object(),
        TypeDeclaration::interface("java.io.Serializable").with_modifier(Modifier::Public),
        TypeDeclaration::interface("java.lang.Cloneable").with_modifier(Modifier::Public),
        TypeDeclaration::interface("java.lang.AutoCloseable")
            .with_modifier(Modifier::Public)
            .with_method(public("close")),
        TypeDeclaration::interface("java.lang.Comparable")
            .with_modifier(Modifier::Public)
            .with_type_param(TypeParam::new("T"))
            .with_method(public("compareTo").param(t()).returns(TypeRef::int())),
        TypeDeclaration::interface("java.lang.Iterable")
            .with_modifier(Modifier::Public)
            .with_type_param(TypeParam::new("T"))
            .with_method(
                public("iterator").returns(TypeRef::class("java.util.Iterator", vec![t()])),
            )
            .with_method(
                public("forEach")
                    .with_modifier(Modifier::Default)
                    .with_body()
                    .param(TypeRef::class(
                        "java.util.function.Consumer",
                        vec![TypeRef::Wildcard(WildcardBound::Super(Box::new(t())))],
                    )),
            ),
        TypeDeclaration::interface("java.lang.CharSequence")
            .with_modifier(Modifier::Public)
            .with_method(public("length").returns(TypeRef::int()))
            .with_method(
                public("charAt")
                    .param(TypeRef::int())
                    .returns(prim(PrimitiveType::Char)),
            )
            .with_method(public("toString").returns(string())),
        TypeDeclaration::class("java.lang.String")
            .with_modifier(Modifier::Public)
            .with_modifier(Modifier::Final)
            .implements(TypeRef::named("java.io.Serializable"))
            .implements(TypeRef::class("java.lang.Comparable", vec![string()]))
            .implements(TypeRef::named("java.lang.CharSequence"))
            .with_method(public_impl("length").returns(TypeRef::int()))
            .with_method(
                public_impl("charAt")
                    .param(TypeRef::int())
                    .returns(prim(PrimitiveType::Char)),
            )
            .with_method(public_impl("isEmpty").returns(prim(PrimitiveType::Boolean)))
            .with_method(public_impl("toString").returns(string()))
            .with_method(
                public_impl("compareTo")
                    .param(string())
                    .returns(TypeRef::int()),
            ),
        TypeDeclaration::class("java.lang.Number")
            .with_modifier(Modifier::Public)
            .with_modifier(Modifier::Abstract)
            .implements(TypeRef::named("java.io.Serializable"))
            .with_method(public_abstract("intValue").returns(TypeRef::int()))
            .with_method(public_abstract("longValue").returns(prim(PrimitiveType::Long)))
            .with_method(public_abstract("doubleValue").returns(prim(PrimitiveType::Double))),
        boxed("Integer", PrimitiveType::Int),
        boxed("Double", PrimitiveType::Double),
    ]
}
