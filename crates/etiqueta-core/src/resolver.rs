//! Key recognition against the alias table.
//!
//! A text unit can carry a key and its value merged into one line
//! (`"Nome: João"`), a key alone whose value follows in the next unit
//! (`"Endereço:"`), or two key/value pairs erroneously concatenated
//! (`"Nome: João CPF: 111..."`, where the value must stop before the
//! embedded key). [`KeyResolver::resolve`] untangles all three.

use crate::config::AliasTable;
use crate::error::{EtiquetaError, Result};
use crate::record::FieldKey;
use regex::{Regex, RegexBuilder};

/// Outcome of matching one text unit against the alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch {
    /// The canonical field the unit labels.
    pub key: FieldKey,
    /// Inline value, when the unit carried one after the key.
    pub value: Option<String>,
}

/// One alias variant with its precompiled matchers.
#[derive(Debug)]
struct AliasPattern {
    key: FieldKey,
    /// Lowercased variant text, for the key-only comparison.
    variant_lower: String,
    /// `^<variant>\s*:\s*(.*)$`, case-insensitive.
    inline: Regex,
    /// `\s+<variant>\s*:`, case-insensitive, for a key embedded mid-value.
    embedded: Regex,
}

/// Matches text units against a compiled [`AliasTable`].
///
/// Patterns are compiled once at construction; `resolve` is then pure and
/// cheap enough to run per cell.
#[derive(Debug)]
pub struct KeyResolver {
    patterns: Vec<AliasPattern>,
}

impl KeyResolver {
    /// Compile the alias table into match patterns.
    ///
    /// # Errors
    /// Returns [`EtiquetaError::Config`] if an entry has no variants or a
    /// variant is blank.
    pub fn new(table: &AliasTable) -> Result<Self> {
        let mut patterns = Vec::new();
        for entry in &table.entries {
            if entry.variants.is_empty() {
                return Err(EtiquetaError::Config(format!(
                    "alias entry for {} has no variants",
                    entry.key.label()
                )));
            }
            for variant in &entry.variants {
                let variant = variant.trim();
                if variant.is_empty() {
                    return Err(EtiquetaError::Config(format!(
                        "blank alias variant for {}",
                        entry.key.label()
                    )));
                }
                let escaped = regex::escape(variant);
                patterns.push(AliasPattern {
                    key: entry.key,
                    variant_lower: variant.to_lowercase(),
                    inline: case_insensitive(&format!(r"^{escaped}\s*:\s*(.*)$"))?,
                    embedded: case_insensitive(&format!(r"\s+{escaped}\s*:"))?,
                });
            }
        }
        Ok(Self { patterns })
    }

    /// Test a text unit against every alias variant, in table order.
    ///
    /// Returns the canonical key and, for `key: value` units, the cleaned
    /// inline value. A unit that is a key with nothing after the colon (or
    /// whose value vanishes after embedded-key truncation) yields a match
    /// with no value. Units matching no variant yield `None`.
    #[must_use]
    pub fn resolve(&self, unit: &str) -> Option<KeyMatch> {
        let line = strip_outer(unit);
        for pattern in &self.patterns {
            if let Some(caps) = pattern.inline.captures(line) {
                let raw = caps.get(1).map_or("", |m| m.as_str());
                let value = self.truncate_embedded(raw.trim().trim_matches('"').trim());
                return Some(KeyMatch {
                    key: pattern.key,
                    value: (!value.is_empty()).then_some(value),
                });
            }
            if line.trim_end_matches(':').trim().to_lowercase() == pattern.variant_lower {
                return Some(KeyMatch {
                    key: pattern.key,
                    value: None,
                });
            }
        }
        None
    }

    /// Cut a captured value short at the first embedded `<variant>:`
    /// occurrence, so two concatenated pairs don't bleed into one value.
    ///
    /// The scan covers every variant of every key, the one being parsed
    /// included, in table order; the first hit wins.
    fn truncate_embedded(&self, value: &str) -> String {
        for pattern in &self.patterns {
            if let Some(found) = pattern.embedded.find(value) {
                return value[..found.start()].trim().to_string();
            }
        }
        value.to_string()
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| EtiquetaError::Config(format!("bad alias pattern: {e}")))
}

/// Trim whitespace, then outer commas and quotes, as cells exported from
/// spreadsheets tend to be wrapped.
pub(crate) fn strip_outer(unit: &str) -> &str {
    unit.trim().trim_matches(',').trim_matches('"').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> KeyResolver {
        KeyResolver::new(&AliasTable::default()).unwrap()
    }

    #[test]
    fn test_resolve_is_case_insensitive_and_whitespace_tolerant() {
        let r = resolver();
        let a = r.resolve("nome:   João").unwrap();
        let b = r.resolve("Nome: João").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key, FieldKey::Nome);
        assert_eq!(a.value.as_deref(), Some("João"));
    }

    #[test]
    fn test_key_only_with_trailing_colon() {
        let m = resolver().resolve("Endereço:").unwrap();
        assert_eq!(m.key, FieldKey::Endereco);
        assert_eq!(m.value, None);
    }

    #[test]
    fn test_key_only_without_colon() {
        let m = resolver().resolve("CPF").unwrap();
        assert_eq!(m.key, FieldKey::Cpf);
        assert_eq!(m.value, None);
    }

    #[test]
    fn test_embedded_next_key_truncates_value() {
        let m = resolver()
            .resolve("Nome: João Silva CPF: 111.222.333-44")
            .unwrap();
        assert_eq!(m.key, FieldKey::Nome);
        assert_eq!(m.value.as_deref(), Some("João Silva"));
    }

    #[test]
    fn test_specific_variant_wins_over_short_one() {
        let m = resolver()
            .resolve("Nome completo / Razão Social: ACME Ltda")
            .unwrap();
        assert_eq!(m.key, FieldKey::Nome);
        assert_eq!(m.value.as_deref(), Some("ACME Ltda"));
    }

    #[test]
    fn test_outer_quotes_and_commas_are_stripped() {
        let m = resolver().resolve("\"Telefone: 61 3333-0000\",").unwrap();
        assert_eq!(m.key, FieldKey::Telefone);
        assert_eq!(m.value.as_deref(), Some("61 3333-0000"));
    }

    #[test]
    fn test_quantity_variants_resolve() {
        let r = resolver();
        for unit in ["Qtd de cartões: 5", "qtda de cartões: 5", "Qtda Cartões: 5"] {
            let m = r.resolve(unit).unwrap();
            assert_eq!(m.key, FieldKey::QtdCartoes, "variant: {unit}");
            assert_eq!(m.value.as_deref(), Some("5"));
        }
    }

    #[test]
    fn test_unrelated_line_resolves_to_nothing() {
        assert!(resolver().resolve("Rua das Acácias, 120").is_none());
        assert!(resolver().resolve("Email: x@y.com").is_none());
    }

    #[test]
    fn test_key_with_empty_value_reports_no_value() {
        let m = resolver().resolve("Telefone:   ").unwrap();
        assert_eq!(m.key, FieldKey::Telefone);
        assert_eq!(m.value, None);
    }

    #[test]
    fn test_empty_variant_list_is_rejected() {
        let mut table = AliasTable::default();
        table.entries[0].variants.clear();
        assert!(matches!(
            KeyResolver::new(&table),
            Err(EtiquetaError::Config(_))
        ));
    }

    #[test]
    fn test_ibge_value_keeps_digits_intact() {
        let m = resolver().resolve("IBGE de atuação: 5300108").unwrap();
        assert_eq!(m.key, FieldKey::Ibge);
        assert_eq!(m.value.as_deref(), Some("5300108"));
    }
}
