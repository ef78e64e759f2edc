//! Predicate-based document queries.
//!
//! A small selector language compiled to SQL: equality, not-equal,
//! not-in-set, and field-existence clauses over the indexed columns, plus
//! limit and single-field ordering. `Ne` and `NotIn` follow SQL three-valued
//! logic: a NULL field never matches, so posts whose linkage fields were
//! stripped stay out of not-in-set scans.

use gazette_types::DocType;

/// Columns a selector clause may target. All of them are covered by the
/// secondary indexes provisioned at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    DocType,
    Name,
    OriginalName,
    Published,
}

impl Field {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::DocType => "doc_type",
            Field::Name => "name",
            Field::OriginalName => "original_name",
            Field::Published => "published",
        }
    }
}

/// Scalar value a clause compares against.
///
/// Booleans translate to the storage engine's 0/1 representation here, at
/// the adapter boundary; the domain layer only ever sees `bool`.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl FieldValue {
    fn to_param(&self) -> Box<dyn rusqlite::ToSql> {
        match self {
            FieldValue::Text(s) => Box::new(s.clone()),
            FieldValue::Bool(b) => Box::new(*b as i64),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// A single predicate over one field.
#[derive(Debug, Clone)]
pub enum Clause {
    /// Field equals the value.
    Eq(Field, FieldValue),
    /// Field is present and differs from the value.
    Ne(Field, FieldValue),
    /// Field is present and not in the set. An empty set degenerates to a
    /// bare existence check.
    NotIn(Field, Vec<String>),
    /// Field is present (non-null).
    Exists(Field),
}

impl Clause {
    fn push_sql(&self, sql: &mut String, params: &mut Vec<Box<dyn rusqlite::ToSql>>) {
        match self {
            Clause::Eq(field, value) => {
                sql.push_str(field.column());
                sql.push_str(" = ?");
                params.push(value.to_param());
            }
            Clause::Ne(field, value) => {
                sql.push_str(field.column());
                sql.push_str(" <> ?");
                params.push(value.to_param());
            }
            Clause::NotIn(field, values) => {
                if values.is_empty() {
                    sql.push_str(field.column());
                    sql.push_str(" IS NOT NULL");
                } else {
                    sql.push_str(field.column());
                    sql.push_str(" NOT IN (");
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            sql.push_str(", ");
                        }
                        sql.push('?');
                        params.push(Box::new(value.clone()));
                    }
                    sql.push(')');
                }
            }
            Clause::Exists(field) => {
                sql.push_str(field.column());
                sql.push_str(" IS NOT NULL");
            }
        }
    }
}

/// Conjunction of clauses; a document matches when every clause holds.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    clauses: Vec<Clause>,
}

impl Selector {
    /// An empty selector matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// All documents of one family. Every query in this system starts here.
    pub fn doc_type(doc_type: DocType) -> Self {
        Self::new().eq(Field::DocType, doc_type.as_str())
    }

    /// Require the field to equal the value.
    pub fn eq(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.clauses.push(Clause::Eq(field, value.into()));
        self
    }

    /// Require the field to be present and differ from the value.
    pub fn ne(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.clauses.push(Clause::Ne(field, value.into()));
        self
    }

    /// Require the field to be present and outside the set.
    pub fn not_in(mut self, field: Field, values: Vec<String>) -> Self {
        self.clauses.push(Clause::NotIn(field, values));
        self
    }

    /// Require the field to be present.
    pub fn exists(mut self, field: Field) -> Self {
        self.clauses.push(Clause::Exists(field));
        self
    }

    /// Compile to a SQL `WHERE` body and its parameters. Empty string when
    /// the selector has no clauses.
    pub(crate) fn to_sql(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut sql = String::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            clause.push_sql(&mut sql, &mut params);
        }
        (sql, params)
    }
}

/// Ordering direction for find results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Options for [`PostStore::find`](crate::PostStore::find).
///
/// Without `sort` the result order is whatever the storage engine yields.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub limit: Option<usize>,
    pub sort: Option<(Field, SortOrder)>,
}

impl FindOptions {
    /// No limit, no ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Order results by a single field.
    pub fn sorted(mut self, field: Field, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }
}
