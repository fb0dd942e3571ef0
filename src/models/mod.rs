use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::assembler;
use crate::error::RecordError;

/// Label/value strings in page order, as read from the public records section.
/// Expected to alternate `label, value, label, value, ...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedFields(Vec<String>);

impl ScrapedFields {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Public-record attributes of one property, keyed by field label
#[derive(Debug, Clone, Serialize)]
pub struct PropertyRecord {
    address: String,
    scraped_at: DateTime<Utc>,
    fields: BTreeMap<String, String>,
}

impl PropertyRecord {
    /// Build the record for `address`. Repeated labels keep their last value.
    pub fn assemble(address: impl Into<String>, fields: &ScrapedFields) -> Result<Self, RecordError> {
        Ok(Self {
            address: address.into(),
            scraped_at: Utc::now(),
            fields: assembler::to_mapping(fields.as_slice())?,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for PropertyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (scraped {})", self.address, self.scraped_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        for (label, value) in &self.fields {
            writeln!(f, "   {}: {}", label, value)?;
        }
        Ok(())
    }
}
