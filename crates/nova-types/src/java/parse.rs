//! Parser for Java type syntax as it appears in source (`Map<String, List<? extends T>>[]`).
//!
//! Names are returned exactly as written. Deciding whether `T` is a type variable or a class,
//! and which package a simple name lives in, is left to whoever owns the declaration scopes.

use thiserror::Error;

use super::ty::{PrimitiveType, TypeRef, WildcardBound};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("unexpected end of type `{0}`")]
    UnexpectedEnd(String),
    #[error("unexpected character `{found}` at offset {offset} in `{text}`")]
    UnexpectedChar {
        text: String,
        found: char,
        offset: usize,
    },
    #[error("`{0}` is not allowed here")]
    Misplaced(String),
}

impl TypeRef {
    /// Parse a single type.
    pub fn parse(text: &str) -> Result<TypeRef, TypeParseError> {
        let mut parser = Parser {
            text,
            chars: text.char_indices().collect(),
            pos: 0,
        };
        let ty = parser.parse_type(false)?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(ty),
            Some((offset, found)) => Err(TypeParseError::UnexpectedChar {
                text: text.to_owned(),
                found,
                offset,
            }),
        }
    }
}

struct Parser<'a> {
    text: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if matches!(self.peek(), Some((_, c)) if c == expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, expected: char) -> Result<(), TypeParseError> {
        if self.eat(expected) {
            return Ok(());
        }
        Err(self.unexpected())
    }

    fn unexpected(&self) -> TypeParseError {
        match self.peek() {
            Some((offset, found)) => TypeParseError::UnexpectedChar {
                text: self.text.to_owned(),
                found,
                offset,
            },
            None => TypeParseError::UnexpectedEnd(self.text.to_owned()),
        }
    }

    fn ident(&mut self) -> Result<String, TypeParseError> {
        self.skip_ws();
        let mut out = String::new();
        while let Some((_, c)) = self.peek() {
            let ok = if out.is_empty() {
                c.is_alphabetic() || c == '_' || c == '$'
            } else if c == '.' {
                // qualified name, but not the start of `...`
                matches!(self.chars.get(self.pos + 1), Some((_, next)) if next.is_alphabetic())
            } else {
                c.is_alphanumeric() || c == '_' || c == '$'
            };
            if !ok {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        if out.is_empty() {
            return Err(self.unexpected());
        }
        Ok(out)
    }

    fn parse_type(&mut self, in_args: bool) -> Result<TypeRef, TypeParseError> {
        self.skip_ws();
        if self.eat('?') {
            if !in_args {
                return Err(TypeParseError::Misplaced("?".to_owned()));
            }
            self.skip_ws();
            let save = self.pos;
            let bound = match self.ident() {
                Ok(kw) if kw == "extends" => {
                    WildcardBound::Extends(Box::new(self.parse_type(false)?))
                }
                Ok(kw) if kw == "super" => WildcardBound::Super(Box::new(self.parse_type(false)?)),
                _ => {
                    self.pos = save;
                    WildcardBound::Unbounded
                }
            };
            return Ok(TypeRef::Wildcard(bound));
        }

        let name = self.ident()?;
        let mut ty = if name == "void" {
            TypeRef::Void
        } else if let Some(prim) = PrimitiveType::from_keyword(&name) {
            TypeRef::Primitive(prim)
        } else {
            let mut args = Vec::new();
            if self.eat('<') {
                loop {
                    args.push(self.parse_type(true)?);
                    if self.eat(',') {
                        continue;
                    }
                    self.expect('>')?;
                    break;
                }
            }
            TypeRef::class(name, args)
        };

        while self.eat('[') {
            self.expect(']')?;
            if ty.is_void() {
                return Err(TypeParseError::Misplaced("void[]".to_owned()));
            }
            ty = TypeRef::array(ty);
        }
        if self.eat('.') {
            // varargs `T...` is written by declarations, not by type references
            self.expect('.')?;
            self.expect('.')?;
            ty = TypeRef::array(ty);
        }
        Ok(ty)
    }
}
