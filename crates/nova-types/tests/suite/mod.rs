mod language_level;
mod type_ref;
