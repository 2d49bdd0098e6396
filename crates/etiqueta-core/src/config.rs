//! Configuration surface: alias table, label geometry, and engine options.
//!
//! Everything externally tunable lives here with documented defaults
//! matching the label stock and source documents the tool was built for:
//! 99 × 34 mm labels, two per row on A4, and the Brazilian field labels
//! observed across the incoming files.

use crate::record::FieldKey;
use serde::Deserialize;

/// One canonical field together with the textual variants that label it in
/// source documents, in match priority order.
///
/// Variants are matched case-insensitively. More specific variants must be
/// listed before shorter ones they contain (e.g. "Nome completo / Razão
/// Social" before "Nome"), since the first matching variant wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AliasEntry {
    /// Canonical field this entry feeds.
    pub key: FieldKey,
    /// Non-empty list of textual variants, most specific first.
    pub variants: Vec<String>,
}

impl AliasEntry {
    fn new(key: FieldKey, variants: &[&str]) -> Self {
        Self {
            key,
            variants: variants.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Ordered mapping from canonical field to its textual variants.
///
/// Table order is significant: entries and their variants are tried in
/// order, and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    /// Entries in match priority order.
    pub entries: Vec<AliasEntry>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            entries: vec![
                AliasEntry::new(FieldKey::Nome, &["Nome completo / Razão Social", "Nome"]),
                AliasEntry::new(FieldKey::Cpf, &["CPF ou CNPJ", "CPF/CNPJ", "CPF"]),
                AliasEntry::new(FieldKey::Endereco, &["Endereço completo", "Endereço"]),
                AliasEntry::new(FieldKey::Telefone, &["Telefone de contato", "Telefone"]),
                AliasEntry::new(
                    FieldKey::QtdCartoes,
                    &[
                        "Qtd de cartões",
                        "Qtda Cartões",
                        "qtd cartões",
                        "qtda de cartões",
                    ],
                ),
                AliasEntry::new(FieldKey::Ibge, &["IBGE de atuação", "IBGE"]),
            ],
        }
    }
}

/// A4 page setup for the rendered label sheet, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub width_cm: f64,
    pub height_cm: f64,
    pub margin_top_cm: f64,
    pub margin_bottom_cm: f64,
    pub margin_left_cm: f64,
    pub margin_right_cm: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width_cm: 21.0,
            height_cm: 29.7,
            margin_top_cm: 1.2,
            margin_bottom_cm: 1.2,
            margin_left_cm: 0.5,
            margin_right_cm: 0.5,
        }
    }
}

/// Physical layout of the label grid: two labels per row separated by a
/// narrow spacer column.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelGeometry {
    /// Width of one label column.
    pub label_width_cm: f64,
    /// Exact height of every grid row.
    pub label_height_cm: f64,
    /// Width of the spacer column between the two labels.
    pub spacer_width_cm: f64,
    /// Page dimensions and margins.
    pub page: PageSetup,
}

impl Default for LabelGeometry {
    fn default() -> Self {
        Self {
            label_width_cm: 9.9,
            label_height_cm: 3.4,
            spacer_width_cm: 0.3,
            page: PageSetup::default(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Alias table driving key recognition.
    pub aliases: AliasTable,
    /// Label grid geometry handed to the renderer.
    pub geometry: LabelGeometry,
    /// Zero-based spreadsheet column holding the record data.
    pub data_column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alias_table_covers_every_field() {
        let table = AliasTable::default();
        for key in FieldKey::ALL {
            let entry = table.entries.iter().find(|e| e.key == key);
            assert!(entry.is_some(), "no alias entry for {key:?}");
            assert!(!entry.unwrap().variants.is_empty());
        }
    }

    #[test]
    fn test_default_alias_table_lists_specific_variants_first() {
        let table = AliasTable::default();
        let nome = &table.entries[0];
        assert_eq!(nome.key, FieldKey::Nome);
        assert_eq!(nome.variants[0], "Nome completo / Razão Social");
        assert_eq!(nome.variants.last().map(String::as_str), Some("Nome"));
    }

    #[test]
    fn test_default_geometry_matches_label_stock() {
        let geometry = LabelGeometry::default();
        assert!((geometry.label_width_cm - 9.9).abs() < f64::EPSILON);
        assert!((geometry.label_height_cm - 3.4).abs() < f64::EPSILON);
        assert!((geometry.spacer_width_cm - 0.3).abs() < f64::EPSILON);
        assert!((geometry.page.width_cm - 21.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_config_reads_first_column() {
        assert_eq!(ExtractConfig::default().data_column, 0);
    }
}
