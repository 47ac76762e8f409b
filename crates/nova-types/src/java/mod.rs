//! Java-specific pieces of Nova's type model.
//!
//! Types here are purely structural. Nothing in this module knows about the class hierarchy;
//! subtyping and member lookup live in the crates that own a hierarchy snapshot.

pub mod language_level;
pub mod parse;
pub mod ty;
