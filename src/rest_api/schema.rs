//! # Resource Schemas
//!
//! Field schemas for the record resources served by the REST API.
//!
//! Every resource shares one shape: a store-assigned integer id plus a set
//! of free-form string columns. Instead of one handler set per resource, the
//! handler is parameterized over a [`ResourceSchema`], so adding a resource
//! means adding a schema constant and a route mount.

/// A single string column of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name, used in SQL and as the JSON key
    pub name: &'static str,

    /// Required columns must be present and non-empty on create
    pub required: bool,
}

/// Field schema for one record resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Relational table backing the resource
    pub table: &'static str,

    /// Collection key, used as the list wrapper key
    pub collection: &'static str,

    /// String columns besides the id
    pub columns: &'static [Column],
}

impl ResourceSchema {
    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Posts: a free-form message per record.
pub const POSTS: ResourceSchema = ResourceSchema {
    table: "posts",
    collection: "posts",
    columns: &[Column {
        name: "message",
        required: false,
    }],
};

/// Labels: a free-form text plus a required target.
pub const LABELS: ResourceSchema = ResourceSchema {
    table: "labels",
    collection: "labels",
    columns: &[
        Column {
            name: "text",
            required: false,
        },
        Column {
            name: "target",
            required: true,
        },
    ],
};
