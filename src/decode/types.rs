//! Decoder types and traits

use crate::error::Result;
use crate::types::Record;

/// Records decoded from one response body
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// The body was an array; elements in upstream order
    Many(Vec<Record>),
    /// The body was a single object
    Single(Record),
}

impl Page {
    /// A page with no records
    pub fn empty() -> Self {
        Self::Many(Vec::new())
    }

    /// Number of records on the page
    pub fn len(&self) -> usize {
        match self {
            Self::Many(records) => records.len(),
            Self::Single(_) => 1,
        }
    }

    /// True when the page holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the response was a single object rather than a collection
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Consume the page into its records
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Many(records) => records,
            Self::Single(record) => vec![record],
        }
    }
}

/// Turns a response body into a page of records
pub trait RecordDecoder: Send + Sync {
    /// Decode a response body
    fn decode(&self, body: &str) -> Result<Page>;
}
