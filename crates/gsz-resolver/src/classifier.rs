//! Reference classification.
//!
//! Tags a written name with the [`RefKind`] that decides which lookup
//! strategies are worth trying. Pure; the resolver stores the result on the
//! reference before running its cascade.

use crate::options::ResolverOptions;
use gsz_ast::class::PRIMITIVE_TYPES;
use gsz_ast::{RefKind, TypeReference};

#[must_use]
pub fn is_primitive_type_name(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

/// Bare identifier that starts with a lower-case letter and is not a primitive.
#[must_use]
pub fn is_lowercase_vanilla(name: &str, options: &ResolverOptions) -> bool {
    if !options.lowercase_vanilla_policy || name.contains(['.', '$']) {
        return false;
    }
    name.chars().next().is_some_and(char::is_lowercase) && !is_primitive_type_name(name)
}

/// Kind to assign to `reference`. Internally produced kinds are kept.
#[must_use]
pub fn classify(reference: &TypeReference, options: &ResolverOptions) -> RefKind {
    match &reference.kind {
        RefKind::Plain if is_lowercase_vanilla(&reference.name, options) => {
            RefKind::LowercaseVanilla
        }
        kind => kind.clone(),
    }
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
