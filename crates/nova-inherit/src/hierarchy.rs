//! Declarations the engine consumes: types, methods and their modifiers.
//!
//! Declarations are immutable once they are handed to [`crate::HierarchyBuilder`]. Everything
//! downstream refers to them by [`TypeId`] / [`MethodId`].

use std::fmt;

use nova_types::{simple_type_name, Span, TypeParam, TypeRef};
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// A method declaration, addressed by its owner and its position in the owner's method list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MethodId {
    pub owner: TypeId,
    pub index: u32,
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({}#{})", self.owner.0, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    Class,
    Interface,
    Annotation,
}

impl TypeKind {
    /// Interfaces and annotation types share the interface member rules.
    pub fn is_interface_like(self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Annotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Synchronized,
    Native,
    Strictfp,
    Transient,
    Volatile,
}

impl Modifier {
    pub const ALL: [Modifier; 12] = [
        Modifier::Public,
        Modifier::Protected,
        Modifier::Private,
        Modifier::Abstract,
        Modifier::Default,
        Modifier::Static,
        Modifier::Final,
        Modifier::Synchronized,
        Modifier::Native,
        Modifier::Strictfp,
        Modifier::Transient,
        Modifier::Volatile,
    ];

    pub const fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Strictfp => "strictfp",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// The set of modifiers written on a declaration.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const fn empty() -> Self {
        Modifiers(0)
    }

    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    #[must_use]
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Modifiers in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    /// How many of `candidates` are present.
    pub fn count_of(self, candidates: &[Modifier]) -> usize {
        candidates.iter().filter(|m| self.contains(**m)).count()
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut out = Modifiers::empty();
        for modifier in iter {
            out.insert(modifier);
        }
        out
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(Modifier::keyword))
            .finish()
    }
}

/// Declared accessibility, ordered from least to most accessible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Visibility {
    Private,
    Package,
    Protected,
    Public,
}

/// The closed set of method shapes the engine distinguishes.
///
/// Derived from modifiers and the enclosing type kind; every `match` on it is exhaustive so a
/// new shape has to be handled at each decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MethodKind {
    /// Interface method without `default`/`static`/`private`, or an `abstract` class method.
    Abstract,
    /// Interface `default` method.
    Default,
    /// `static` method of a class or interface.
    Static,
    /// Private instance method. Never inherited.
    Private,
    /// Class instance method with an implementation (including `native`).
    Concrete,
}

impl MethodKind {
    pub fn of(method: &MethodDecl, owner: TypeKind) -> MethodKind {
        let mods = method.modifiers;
        if mods.contains(Modifier::Static) {
            return MethodKind::Static;
        }
        match owner {
            TypeKind::Interface | TypeKind::Annotation => {
                if mods.contains(Modifier::Private) {
                    MethodKind::Private
                } else if mods.contains(Modifier::Default) {
                    MethodKind::Default
                } else {
                    MethodKind::Abstract
                }
            }
            TypeKind::Class => {
                if mods.contains(Modifier::Abstract) {
                    MethodKind::Abstract
                } else if mods.contains(Modifier::Private) {
                    MethodKind::Private
                } else {
                    MethodKind::Concrete
                }
            }
        }
    }

    pub fn is_instance(self) -> bool {
        !matches!(self, MethodKind::Static)
    }

    /// Whether an invocation may dispatch to a body (abstract methods have none).
    pub fn has_implementation(self) -> bool {
        match self {
            MethodKind::Default
            | MethodKind::Static
            | MethodKind::Private
            | MethodKind::Concrete => true,
            MethodKind::Abstract => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub modifiers: Modifiers,
    pub has_body: bool,
    /// Span of the method name.
    pub span: Span,
}

impl MethodDecl {
    /// A `void` method without parameters, modifiers or body.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: TypeRef::Void,
            modifiers: Modifiers::empty(),
            has_body: false,
            span: Span::default(),
        }
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    pub fn param(mut self, ty: TypeRef) -> Self {
        self.params.push(ty);
        self
    }

    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn with_body(mut self) -> Self {
        self.has_body = true;
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn visibility(&self, owner: TypeKind) -> Visibility {
        let mods = self.modifiers;
        if mods.contains(Modifier::Private) {
            Visibility::Private
        } else if mods.contains(Modifier::Public) || owner.is_interface_like() {
            Visibility::Public
        } else if mods.contains(Modifier::Protected) {
            Visibility::Protected
        } else {
            Visibility::Package
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDeclaration {
    /// Binary name, e.g. `p.Outer$Inner`.
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    /// `extends` clause of a class.
    pub super_class: Option<TypeRef>,
    /// `implements` clause of a class, `extends` clause of an interface.
    pub interfaces: Vec<TypeRef>,
    pub methods: Vec<MethodDecl>,
    /// Span of the type name.
    pub span: Span,
}

impl TypeDeclaration {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn annotation(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Annotation)
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    /// `extends` for classes (the superclass) and interfaces (another superinterface).
    pub fn extends(mut self, ty: TypeRef) -> Self {
        match self.kind {
            TypeKind::Class => self.super_class = Some(ty),
            TypeKind::Interface | TypeKind::Annotation => self.interfaces.push(ty),
        }
        self
    }

    pub fn implements(mut self, ty: TypeRef) -> Self {
        self.interfaces.push(ty);
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.kind.is_interface_like() || self.modifiers.contains(Modifier::Abstract)
    }

    /// A class that has to provide an implementation for every inherited abstract method.
    pub fn is_concrete_class(&self) -> bool {
        self.kind == TypeKind::Class && !self.modifiers.contains(Modifier::Abstract)
    }

    /// Package part of the binary name (empty for the unnamed package).
    pub fn package(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[..idx],
            None => "",
        }
    }

    pub fn simple_name(&self) -> String {
        simple_type_name(&self.name)
    }
}
