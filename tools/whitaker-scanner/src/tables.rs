//! Field tables: the code → label mappings used to decode headers.
//!
//! The tables live in `schema/tables.yaml`, which is compiled into the binary.
//! A replacement schema with the same shape can be loaded at runtime.

use crate::error::TableError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUILTIN_SCHEMA: &str = include_str!("../../../schema/tables.yaml");

static BUILTIN: OnceCell<FieldTables> = OnceCell::new();

/// A decoded attribute: the source code and its label.
///
/// Codes such as `X` are valid but unlabelled; their value is `None` and
/// serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coded {
    pub code: String,
    pub value: Option<String>,
}

impl Coded {
    pub fn new(code: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Coded {
            code: code.into(),
            value: value.map(Into::into),
        }
    }
}

/// One category's code → label mapping.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Table(BTreeMap<String, Option<String>>);

impl Table {
    pub fn lookup(&self, code: &str) -> Option<Coded> {
        self.0
            .get_key_value(code)
            .map(|(code, label)| Coded::new(code.as_str(), label.as_deref()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The five flag categories, in the order their characters appear inside
/// the bracketed flag code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagField {
    Age,
    Area,
    Geo,
    Frequency,
    Source,
}

impl FlagField {
    pub const ALL: [FlagField; 5] = [
        FlagField::Age,
        FlagField::Area,
        FlagField::Geo,
        FlagField::Frequency,
        FlagField::Source,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FlagField::Age => "age",
            FlagField::Area => "area",
            FlagField::Geo => "geo",
            FlagField::Frequency => "frequency",
            FlagField::Source => "source",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagTables {
    pub age: Table,
    pub area: Table,
    pub geo: Table,
    pub frequency: Table,
    pub source: Table,
}

impl FlagTables {
    pub fn table(&self, field: FlagField) -> &Table {
        match field {
            FlagField::Age => &self.age,
            FlagField::Area => &self.area,
            FlagField::Geo => &self.geo,
            FlagField::Frequency => &self.frequency,
            FlagField::Source => &self.source,
        }
    }
}

/// Every table the header decoder consults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldTables {
    pub flags: FlagTables,
    pub cases: Table,
    pub genders: Table,
    pub verb_types: Table,
    pub pronoun_types: Table,
    /// `(1st)` … `(5th)`, shared by noun declensions and verb conjugations.
    pub ordinals: BTreeMap<String, u8>,
}

impl FieldTables {
    /// Tables compiled into the binary.
    pub fn builtin() -> &'static FieldTables {
        BUILTIN.get_or_init(|| {
            FieldTables::from_yaml(BUILTIN_SCHEMA).expect("embedded schema/tables.yaml is valid")
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, TableError> {
        let tables: FieldTables = serde_yaml::from_str(text)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let io_err = |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(io_err)?;
        FieldTables::from_yaml(&contents)
    }

    fn validate(&self) -> Result<(), TableError> {
        for field in FlagField::ALL {
            let table = self.flags.table(field);
            if table.is_empty() {
                return Err(TableError::EmptyTable(field.name()));
            }
            if let Some(code) = table.codes().find(|code| code.chars().count() != 1) {
                return Err(TableError::WideFlagCode {
                    table: field.name(),
                    code: code.to_string(),
                });
            }
        }
        let named = [
            ("cases", &self.cases),
            ("genders", &self.genders),
            ("verb_types", &self.verb_types),
            ("pronoun_types", &self.pronoun_types),
        ];
        if let Some((name, _)) = named.iter().find(|(_, table)| table.is_empty()) {
            return Err(TableError::EmptyTable(*name));
        }
        if self.ordinals.is_empty() {
            return Err(TableError::EmptyTable("ordinals"));
        }
        Ok(())
    }
}
