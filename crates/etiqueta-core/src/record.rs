//! Canonical record fields, completed records, and deduplication.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A record with fewer populated fields than this at flush time is treated
/// as noise and silently discarded.
pub const MIN_POPULATED_FIELDS: usize = 3;

/// The closed set of canonical record fields, in label output order.
///
/// Source documents label these fields inconsistently; the
/// [`AliasTable`](crate::config::AliasTable) maps the observed variants back
/// onto this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    /// Recipient name or company name.
    Nome,
    /// CPF or CNPJ tax id.
    #[serde(rename = "CPF")]
    Cpf,
    /// Full mailing address, possibly assembled from several lines.
    #[serde(rename = "Endereço")]
    Endereco,
    /// Contact phone.
    Telefone,
    /// Number of cards to ship.
    #[serde(rename = "Qtd Cartões")]
    QtdCartoes,
    /// IBGE municipality code.
    #[serde(rename = "IBGE")]
    Ibge,
}

impl FieldKey {
    /// All fields, in the fixed order labels are printed.
    pub const ALL: [Self; 6] = [
        Self::Nome,
        Self::Cpf,
        Self::Endereco,
        Self::Telefone,
        Self::QtdCartoes,
        Self::Ibge,
    ];

    /// The label printed in front of this field's value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nome => "Nome",
            Self::Cpf => "CPF/CNPJ",
            Self::Endereco => "Endereço",
            Self::Telefone => "Telefone",
            Self::QtdCartoes => "Qtd Cartões",
            Self::Ibge => "IBGE",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// One extracted recipient record: a mapping from canonical field to value.
///
/// Mutated only while under construction in
/// [`ParseState`](crate::assembler::ParseState); once emitted by the
/// assembler it is moved out and no longer touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: [Option<String>; FieldKey::ALL.len()],
}

impl Record {
    /// The value for `key`, if populated.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields[key.index()].as_deref()
    }

    /// Set (or overwrite) the value for `key`.
    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.fields[key.index()] = Some(value.into());
    }

    /// Concatenate `fragment` onto the existing value for `key` with a
    /// single separating space, or set it if the field is empty.
    pub fn append(&mut self, key: FieldKey, fragment: &str) {
        match &mut self.fields[key.index()] {
            Some(existing) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(fragment);
            }
            slot => *slot = Some(fragment.to_string()),
        }
    }

    /// Number of populated fields.
    #[must_use]
    pub fn populated(&self) -> usize {
        self.fields.iter().flatten().count()
    }

    /// True when no field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(Option::is_none)
    }

    /// The identity tuple two records must share to count as the same
    /// physical recipient. Missing fields hash as the empty string.
    fn dedup_key(&self) -> (String, String, String) {
        let norm = |key: FieldKey| {
            self.get(key)
                .unwrap_or_default()
                .trim()
                .to_lowercase()
        };
        (
            norm(FieldKey::Nome),
            norm(FieldKey::Cpf),
            norm(FieldKey::Endereco),
        )
    }
}

/// Collapse records describing the same recipient, keeping the first
/// occurrence of each and preserving encounter order.
///
/// Identity is the case- and whitespace-insensitive (Nome, CPF, Endereço)
/// tuple. Raw and unique counts are reported through the logging sink.
#[must_use]
pub fn dedup(records: Vec<Record>) -> Vec<Record> {
    let raw = records.len();
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(raw);
    for record in records {
        if seen.insert(record.dedup_key()) {
            unique.push(record);
        }
    }
    log::info!("{} unique record(s) out of {raw} collected", unique.len());
    unique
}
