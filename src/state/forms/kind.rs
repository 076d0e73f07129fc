//! Field kinds and construction entries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies which validator and which bound element a field uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "fio")]
    FullName,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
}

impl FieldKind {
    /// Every kind the form knows how to fill from external data
    pub const ALL: [FieldKind; 3] = [FieldKind::FullName, FieldKind::Email, FieldKind::Phone];

    /// Name of the bound element and key in serialized form data
    pub fn wire_name(self) -> &'static str {
        match self {
            FieldKind::FullName => "fio",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FieldKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.wire_name() == s)
            .ok_or(())
    }
}

/// One entry of the ordered field list a form is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "name")]
    pub kind: FieldKind,
    pub label: String,
}

impl FieldSpec {
    pub fn new(kind: FieldKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
        }
    }

    /// Full name, email and phone, in that order
    pub fn defaults() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new(FieldKind::FullName, "FIO"),
            FieldSpec::new(FieldKind::Email, "EMAIL"),
            FieldSpec::new(FieldKind::Phone, "PHONE"),
        ]
    }
}
