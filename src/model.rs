use serde::{Deserialize, Serialize};

/// Logical column types, resolved to native SQLite types at DDL time.
///
/// The mapping is a fixed lookup, not an inference step. `Boolean` and `Date`
/// have no native storage class and land on `INTEGER` and `TEXT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Text,
    Integer,
    BigInt,
    Real,
    Boolean,
    Date,
    Json,
    Blob,
    Any,
}

impl DataType {
    /// Native SQLite type name for this logical type.
    pub fn sql_type(self) -> &'static str {
        match self {
            DataType::Text => "TEXT",
            DataType::Integer | DataType::BigInt => "INTEGER",
            DataType::Real => "REAL",
            DataType::Boolean => "INTEGER",
            DataType::Date => "TEXT",
            DataType::Json => "TEXT",
            DataType::Blob => "BLOB",
            DataType::Any => "ANY",
        }
    }

    /// Whether the column stores text, which gates `COLLATE` emission.
    pub fn is_text(self) -> bool {
        matches!(self, DataType::Text | DataType::Date | DataType::Json)
    }
}

/// A uniqueness declaration on a single attribute.
///
/// `Inline` becomes a column-level `UNIQUE` clause; `Named` is deferred to a
/// table-level `CONSTRAINT <name> UNIQUE (...)`, with attributes sharing a
/// name folded into one composite constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unique {
    Inline,
    Named(String),
}

/// Literal used for column `DEFAULT` clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlLiteral {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    CurrentTimestamp,
}

/// Referential action for `ON DELETE` / `ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// Deferral mode of a foreign-key constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferrable {
    Deferred,
    Immediate,
}

impl Deferrable {
    pub fn sql_clause(self) -> &'static str {
        match self {
            Deferrable::Deferred => "DEFERRABLE INITIALLY DEFERRED",
            Deferrable::Immediate => "DEFERRABLE INITIALLY IMMEDIATE",
        }
    }
}

/// Target of a foreign-key reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct References {
    pub table: String,
    pub column: String,
}

impl References {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// A generated (computed) column expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generated {
    pub expression: String,
    /// `true` materializes the value (`STORED`), `false` computes on read.
    pub stored: bool,
}

/// One column of a model, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub data_type: DataType,
    pub allow_null: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: Option<Unique>,
    pub default_value: Option<SqlLiteral>,
    pub check: Option<String>,
    pub collate: Option<String>,
    pub generated: Option<Generated>,
    pub references: Option<References>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    pub deferrable: Option<Deferrable>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            allow_null: true,
            primary_key: false,
            auto_increment: false,
            unique: None,
            default_value: None,
            check: None,
            collate: None,
            generated: None,
            references: None,
            on_delete: None,
            on_update: None,
            deferrable: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = Some(Unique::Inline);
        self
    }

    pub fn unique_named(mut self, constraint: impl Into<String>) -> Self {
        self.unique = Some(Unique::Named(constraint.into()));
        self
    }

    pub fn default_value(mut self, literal: SqlLiteral) -> Self {
        self.default_value = Some(literal);
        self
    }

    pub fn check(mut self, expression: impl Into<String>) -> Self {
        self.check = Some(expression.into());
        self
    }

    pub fn collate(mut self, collation: impl Into<String>) -> Self {
        self.collate = Some(collation.into());
        self
    }

    pub fn generated(mut self, expression: impl Into<String>, stored: bool) -> Self {
        self.generated = Some(Generated {
            expression: expression.into(),
            stored,
        });
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(References::new(table, column));
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    pub fn deferrable(mut self, mode: Deferrable) -> Self {
        self.deferrable = Some(mode);
        self
    }
}

/// Named multi-column unique constraint declared at table level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub name: String,
    pub columns: Vec<String>,
}

/// Named table-level check constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConstraint {
    pub name: String,
    pub expression: String,
}

/// Named table-level foreign-key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    pub name: String,
    pub fields: Vec<String>,
    pub references_table: Option<String>,
    pub references_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    pub deferrable: Option<Deferrable>,
}

/// Table-level constraints, kept as ordered lists so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConstraints {
    pub unique: Vec<UniqueConstraint>,
    pub check: Vec<CheckConstraint>,
    pub foreign_key: Vec<ForeignKeyConstraint>,
}

/// Virtual-table declaration; short-circuits normal column generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualTable {
    /// Module name, e.g. `fts5` or `rtree`. Required for generation.
    pub using: Option<String>,
    pub args: Vec<String>,
}

/// Table-wide options applied during DDL generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Single or composite primary key declared at table level. When set it
    /// owns the `PRIMARY KEY` clause; column-level flags are suppressed unless
    /// it names exactly one column that also carries the flag itself.
    pub primary_key: Option<Vec<String>>,
    pub constraints: TableConstraints,
    pub strict: bool,
    pub without_rowid: bool,
    pub temporary: bool,
    pub if_not_exists: bool,
    /// Rename attribute columns to snake_case.
    pub underscored: bool,
    pub virtual_table: Option<VirtualTable>,
}

/// A declarative model: table name, ordered attributes, options.
///
/// Read-only input to [`crate::ddl::create_table_sql`]; attributes keep their
/// declaration order so generated column order is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub table_name: String,
    pub attributes: Vec<Attribute>,
    pub options: TableOptions,
}

impl ModelDefinition {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            attributes: Vec::new(),
            options: TableOptions::default(),
        }
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }
}
