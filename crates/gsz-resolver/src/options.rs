//! Resolver options.

use serde::Deserialize;

/// Packages whose types are visible without an import, each with its trailing dot.
pub const DEFAULT_IMPORTS: &[&str] = &[
    "java.lang.",
    "java.util.",
    "java.io.",
    "java.net.",
    "groovy.lang.",
    "groovy.util.",
];

/// Options for the resolution pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverOptions {
    /// Package prefixes tried for unqualified names, in order.
    pub default_imports: Vec<String>,
    /// `(simple name, fully-qualified name)` pairs visible everywhere although
    /// they live outside the default packages.
    pub implicit_types: Vec<(String, String)>,
    /// Treat bare lower-case identifiers as variables unless explicitly imported.
    pub lowercase_vanilla_policy: bool,
    /// Replace `Type.CONSTANT` in annotation members with the constant's value.
    pub fold_annotation_constants: bool,
    /// When false, ambiguous star-import matches silently keep the first candidate.
    pub report_ambiguity: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            default_imports: DEFAULT_IMPORTS.iter().map(|p| (*p).to_string()).collect(),
            implicit_types: vec![
                ("BigInteger".to_string(), "java.math.BigInteger".to_string()),
                ("BigDecimal".to_string(), "java.math.BigDecimal".to_string()),
            ],
            lowercase_vanilla_policy: true,
            fold_annotation_constants: true,
            report_ambiguity: true,
        }
    }
}

impl ResolverOptions {
    /// Parse options from JSON; absent keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut options: Self = serde_json::from_str(text)?;
        for prefix in &mut options.default_imports {
            if !prefix.ends_with('.') {
                prefix.push('.');
            }
        }
        Ok(options)
    }
}

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod tests;
