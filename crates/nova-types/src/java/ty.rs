use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Binary name of `java.lang.Object`.
pub const OBJECT: &str = "java.lang.Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "boolean" => PrimitiveType::Boolean,
            "byte" => PrimitiveType::Byte,
            "short" => PrimitiveType::Short,
            "char" => PrimitiveType::Char,
            "int" => PrimitiveType::Int,
            "long" => PrimitiveType::Long,
            "float" => PrimitiveType::Float,
            "double" => PrimitiveType::Double,
            _ => return None,
        })
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Single-character JVM descriptor.
    pub const fn descriptor(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Short => 'S',
            PrimitiveType::Char => 'C',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<TypeRef>),
    Super(Box<TypeRef>),
}

/// A (possibly parameterized) reference to a class or interface by binary name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassRef {
    pub name: String,
    pub args: Vec<TypeRef>,
}

/// A Java type as written in a declaration, after name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TypeRef {
    Void,
    Primitive(PrimitiveType),
    Class(ClassRef),
    TypeVar(String),
    Array(Box<TypeRef>),
    Wildcard(WildcardBound),
}

/// Maps type variable names to the types they are instantiated with.
pub type Substitution = HashMap<String, TypeRef>;

/// A declared type parameter (`T extends Comparable<T>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeRef>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn with_bound(mut self, bound: TypeRef) -> Self {
        self.bounds.push(bound);
        self
    }
}

// Bound chains like `<A extends B, B extends C, ...>` are resolved iteratively; anything deeper
// than this is a malformed (cyclic) declaration and erases to `Object`.
const MAX_BOUND_CHAIN: usize = 32;

impl TypeRef {
    pub fn class(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Class(ClassRef {
            name: name.into(),
            args,
        })
    }

    /// A raw / non-generic class reference.
    pub fn named(name: impl Into<String>) -> Self {
        Self::class(name, Vec::new())
    }

    pub fn object() -> Self {
        Self::named(OBJECT)
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        TypeRef::TypeVar(name.into())
    }

    pub fn array(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    pub fn int() -> Self {
        TypeRef::Primitive(PrimitiveType::Int)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, TypeRef::Void | TypeRef::Primitive(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, TypeRef::Class(ClassRef { name, .. }) if name == OBJECT)
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(class) => Some(&class.name),
            _ => None,
        }
    }

    /// Whether the type mentions a type variable anywhere.
    pub fn has_type_vars(&self) -> bool {
        match self {
            TypeRef::TypeVar(_) => true,
            TypeRef::Class(class) => class.args.iter().any(TypeRef::has_type_vars),
            TypeRef::Array(component) => component.has_type_vars(),
            TypeRef::Wildcard(WildcardBound::Extends(bound) | WildcardBound::Super(bound)) => {
                bound.has_type_vars()
            }
            TypeRef::Void | TypeRef::Primitive(_) | TypeRef::Wildcard(WildcardBound::Unbounded) => {
                false
            }
        }
    }

    /// Replace type variables according to `subst`. Variables not in the map are kept.
    #[must_use]
    pub fn substitute(&self, subst: &Substitution) -> TypeRef {
        if subst.is_empty() {
            return self.clone();
        }
        match self {
            TypeRef::TypeVar(name) => subst.get(name).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Class(class) => TypeRef::Class(ClassRef {
                name: class.name.clone(),
                args: class.args.iter().map(|arg| arg.substitute(subst)).collect(),
            }),
            TypeRef::Array(component) => TypeRef::Array(Box::new(component.substitute(subst))),
            TypeRef::Wildcard(WildcardBound::Extends(bound)) => {
                TypeRef::Wildcard(WildcardBound::Extends(Box::new(bound.substitute(subst))))
            }
            TypeRef::Wildcard(WildcardBound::Super(bound)) => {
                TypeRef::Wildcard(WildcardBound::Super(Box::new(bound.substitute(subst))))
            }
            TypeRef::Void | TypeRef::Primitive(_) | TypeRef::Wildcard(WildcardBound::Unbounded) => {
                self.clone()
            }
        }
    }

    /// Type erasure (JLS 4.6).
    ///
    /// `scopes` are searched in order for the declaration of a type variable; a variable erases
    /// to the erasure of its leftmost bound, or `Object` when unbounded or undeclared.
    #[must_use]
    pub fn erasure(&self, scopes: &[&[TypeParam]]) -> TypeRef {
        match self {
            TypeRef::Void | TypeRef::Primitive(_) => self.clone(),
            TypeRef::Class(class) => TypeRef::named(class.name.clone()),
            TypeRef::Array(component) => TypeRef::Array(Box::new(component.erasure(scopes))),
            TypeRef::Wildcard(WildcardBound::Extends(bound)) => bound.erasure(scopes),
            TypeRef::Wildcard(_) => TypeRef::object(),
            TypeRef::TypeVar(name) => {
                let mut current = name.as_str();
                for _ in 0..MAX_BOUND_CHAIN {
                    let bound = scopes
                        .iter()
                        .flat_map(|scope| scope.iter())
                        .find(|param| param.name == current)
                        .and_then(|param| param.bounds.first());
                    match bound {
                        Some(TypeRef::TypeVar(next)) => current = next.as_str(),
                        Some(bound) => return bound.erasure(scopes),
                        None => return TypeRef::object(),
                    }
                }
                TypeRef::object()
            }
        }
    }

    /// JVM field descriptor of an erased type (`Ljava/lang/String;`, `[I`, `V`).
    ///
    /// Type variables and wildcards that slipped through are rendered as `Object`.
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }

    fn write_descriptor(&self, out: &mut String) {
        match self {
            TypeRef::Void => out.push('V'),
            TypeRef::Primitive(prim) => out.push(prim.descriptor()),
            TypeRef::Class(class) => {
                out.push('L');
                out.push_str(&class.name.replace('.', "/"));
                out.push(';');
            }
            TypeRef::Array(component) => {
                out.push('[');
                component.write_descriptor(out);
            }
            TypeRef::TypeVar(_) | TypeRef::Wildcard(_) => out.push_str("Ljava/lang/Object;"),
        }
    }
}

/// Java-style display name of a binary type name: package dropped, nested `$` shown as `.`.
///
/// `java.util.Map$Entry` becomes `Map.Entry`.
pub fn simple_type_name(binary_name: &str) -> String {
    let tail = binary_name.rsplit('.').next().unwrap_or(binary_name);
    tail.replace('$', ".")
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Primitive(prim) => f.write_str(prim.keyword()),
            TypeRef::Class(class) => {
                f.write_str(&simple_type_name(&class.name))?;
                if !class.args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in class.args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::TypeVar(name) => f.write_str(name),
            TypeRef::Array(component) => write!(f, "{component}[]"),
            TypeRef::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            TypeRef::Wildcard(WildcardBound::Extends(bound)) => write!(f, "? extends {bound}"),
            TypeRef::Wildcard(WildcardBound::Super(bound)) => write!(f, "? super {bound}"),
        }
    }
}
