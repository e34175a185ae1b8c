use std::collections::BTreeMap;

use crate::engine::types::{ColumnSpec, Schema, TableSchema};

pub struct SchemaFactory {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaFactory {
    pub fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Adds a table with a single `time_` column.
    pub fn with_table(self, name: &str) -> Self {
        self.with_columns(name, &[("time_", "time64ns")])
    }

    pub fn with_columns(mut self, name: &str, columns: &[(&str, &str)]) -> Self {
        let columns = columns
            .iter()
            .map(|(name, data_type)| ColumnSpec {
                name: name.to_string(),
                data_type: data_type.to_string(),
            })
            .collect();
        self.tables.insert(name.to_string(), TableSchema { columns });
        self
    }

    pub fn create(self) -> Schema {
        Schema {
            tables: self.tables,
        }
    }
}
