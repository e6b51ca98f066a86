//! Resource catalog: the tables exposed over HTTP, their columns, keys and insert allow-lists.

/// PostgreSQL type of a column. Parameters are bound as text and cast to this type in SQL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PgType {
    Int4,
    Numeric,
    Text,
    Timestamptz,
}

impl PgType {
    pub fn sql_name(self) -> &'static str {
        match self {
            PgType::Int4 => "int4",
            PgType::Numeric => "numeric",
            PgType::Text => "text",
            PgType::Timestamptz => "timestamptz",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub name: &'static str,
    pub pg_type: PgType,
    /// Accepted from request bodies on insert. Generated and defaulted columns are not.
    pub insertable: bool,
}

impl Column {
    const fn new(name: &'static str, pg_type: PgType, insertable: bool) -> Self {
        Column { name, pg_type, insertable }
    }
}

#[derive(Debug)]
pub struct Resource {
    /// Path segment under the base path, e.g. "suppliers".
    pub path: &'static str,
    pub table: &'static str,
    /// Key columns in lookup order. Get accepts any non-empty prefix; delete needs all of them.
    pub key: &'static [&'static str],
    pub columns: &'static [Column],
}

impl Resource {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn insertable(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.insertable)
    }

    pub fn key_columns(&self) -> impl Iterator<Item = &Column> {
        self.key.iter().filter_map(|k| self.column(k))
    }
}

pub static SUPPLIERS: Resource = Resource {
    path: "suppliers",
    table: "suppliers",
    key: &["id"],
    columns: &[
        Column::new("id", PgType::Int4, false),
        Column::new("name", PgType::Text, true),
        Column::new("website", PgType::Text, true),
    ],
};

pub static PARTS: Resource = Resource {
    path: "parts",
    table: "parts",
    key: &["id"],
    columns: &[
        Column::new("id", PgType::Int4, false),
        Column::new("name", PgType::Text, true),
        Column::new("supplier_id", PgType::Int4, true),
        Column::new("unit_price", PgType::Numeric, true),
    ],
};

pub static PROJECTS: Resource = Resource {
    path: "projects",
    table: "projects",
    key: &["id"],
    columns: &[
        Column::new("id", PgType::Int4, false),
        Column::new("name", PgType::Text, true),
        Column::new("description", PgType::Text, true),
        Column::new("created_at", PgType::Timestamptz, false),
    ],
};

pub static BOM: Resource = Resource {
    path: "bom",
    table: "bom",
    key: &["project_id", "part_id"],
    columns: &[
        Column::new("project_id", PgType::Int4, true),
        Column::new("part_id", PgType::Int4, true),
        Column::new("quantity", PgType::Int4, true),
        Column::new("net_price", PgType::Numeric, true),
    ],
};

/// Every resource served by the application, in mount order.
pub fn catalog() -> [&'static Resource; 4] {
    [&SUPPLIERS, &PARTS, &PROJECTS, &BOM]
}
