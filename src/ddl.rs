//! DDL generation: model definition in, one SQL statement out.
//!
//! Pure string building with no I/O; the resulting statement is handed to the
//! driver as-is. Column clauses are emitted in a fixed order so that two calls
//! on the same definition produce byte-identical output.

use crate::error::{Error, Result};
use crate::model::{
    Attribute, ModelDefinition, ReferentialAction, SqlLiteral, TableOptions, Unique, VirtualTable,
};

/// Generate a complete `CREATE TABLE` or `CREATE VIRTUAL TABLE` statement.
///
/// Never mutates the definition. Fails only when a virtual table is declared
/// without a `using` module; malformed table constraints are skipped instead.
pub fn create_table_sql(definition: &ModelDefinition) -> Result<String> {
    match &definition.options.virtual_table {
        Some(virtual_table) => virtual_table_sql(definition, virtual_table),
        None => table_sql(definition),
    }
}

fn virtual_table_sql(definition: &ModelDefinition, virtual_table: &VirtualTable) -> Result<String> {
    let module = virtual_table
        .using
        .as_deref()
        .filter(|module| !module.is_empty())
        .ok_or_else(|| Error::InvalidVirtualTableSpec {
            table: definition.table_name.clone(),
        })?;

    let mut sql = String::from("CREATE VIRTUAL TABLE ");
    if definition.options.if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push_str(&definition.table_name);
    sql.push_str(" USING ");
    sql.push_str(module);
    if !virtual_table.args.is_empty() {
        sql.push_str(" (");
        sql.push_str(&virtual_table.args.join(", "));
        sql.push(')');
    }
    Ok(sql)
}

fn table_sql(definition: &ModelDefinition) -> Result<String> {
    let options = &definition.options;
    let mut pieces: Vec<String> = Vec::new();
    // Named column uniques fold into table constraints, grouped by name in
    // order of first mention.
    let mut named_uniques: Vec<(String, Vec<String>)> = Vec::new();

    for attribute in &definition.attributes {
        pieces.push(column_sql(attribute, options, &mut named_uniques));
    }

    for (name, columns) in &named_uniques {
        pieces.push(format!("CONSTRAINT {} UNIQUE ({})", name, columns.join(", ")));
    }

    if let Some(key_columns) = table_primary_key(definition) {
        pieces.push(format!("PRIMARY KEY ({})", key_columns.join(", ")));
    }

    for unique in &options.constraints.unique {
        if unique.columns.is_empty() {
            continue;
        }
        let columns: Vec<String> = unique
            .columns
            .iter()
            .map(|column| resolve_column(column, options))
            .collect();
        pieces.push(format!(
            "CONSTRAINT {} UNIQUE ({})",
            unique.name,
            columns.join(", ")
        ));
    }

    for check in &options.constraints.check {
        pieces.push(format!(
            "CONSTRAINT {} CHECK ({})",
            check.name, check.expression
        ));
    }

    for foreign_key in &options.constraints.foreign_key {
        if foreign_key.fields.is_empty() {
            continue;
        }
        let Some(referenced_table) = &foreign_key.references_table else {
            continue;
        };
        let fields: Vec<String> = foreign_key
            .fields
            .iter()
            .map(|field| resolve_column(field, options))
            .collect();
        let mut constraint = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}",
            foreign_key.name,
            fields.join(", "),
            referenced_table
        );
        if !foreign_key.references_columns.is_empty() {
            constraint.push('(');
            constraint.push_str(&foreign_key.references_columns.join(", "));
            constraint.push(')');
        }
        push_action(&mut constraint, "ON DELETE", foreign_key.on_delete);
        push_action(&mut constraint, "ON UPDATE", foreign_key.on_update);
        if let Some(mode) = foreign_key.deferrable {
            constraint.push(' ');
            constraint.push_str(mode.sql_clause());
        }
        pieces.push(constraint);
    }

    let mut sql = String::from("CREATE ");
    if options.temporary {
        sql.push_str("TEMPORARY ");
    }
    sql.push_str("TABLE ");
    if options.if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push_str(&definition.table_name);
    sql.push_str(" (");
    sql.push_str(&pieces.join(", "));
    sql.push(')');

    let mut modifiers: Vec<&str> = Vec::new();
    if options.strict {
        modifiers.push("STRICT");
    }
    if options.without_rowid {
        modifiers.push("WITHOUT ROWID");
    }
    if !modifiers.is_empty() {
        sql.push(' ');
        sql.push_str(&modifiers.join(", "));
    }

    Ok(sql.trim_end().to_string())
}

fn column_sql(
    attribute: &Attribute,
    options: &TableOptions,
    named_uniques: &mut Vec<(String, Vec<String>)>,
) -> String {
    let column = resolve_column(&attribute.name, options);
    let mut clauses: Vec<String> = vec![column.clone(), attribute.data_type.sql_type().to_string()];

    if attribute.primary_key && column_primary_key_allowed(attribute, options) {
        clauses.push("PRIMARY KEY".to_string());
        if attribute.auto_increment {
            clauses.push("AUTOINCREMENT".to_string());
        }
    }
    if !attribute.allow_null {
        clauses.push("NOT NULL".to_string());
    }
    match &attribute.unique {
        Some(Unique::Inline) => clauses.push("UNIQUE".to_string()),
        Some(Unique::Named(constraint)) => {
            match named_uniques.iter_mut().find(|(name, _)| name == constraint) {
                Some((_, columns)) => columns.push(column),
                None => named_uniques.push((constraint.clone(), vec![column])),
            }
        }
        None => {}
    }
    if let Some(literal) = &attribute.default_value {
        clauses.push(format!("DEFAULT {}", format_literal(literal)));
    }
    if let Some(expression) = &attribute.check {
        clauses.push(format!("CHECK ({})", expression));
    }
    if let Some(collation) = &attribute.collate {
        if attribute.data_type.is_text() {
            clauses.push(format!("COLLATE {}", collation));
        }
    }
    if let Some(generated) = &attribute.generated {
        clauses.push(format!(
            "GENERATED ALWAYS AS ({}) {}",
            generated.expression,
            if generated.stored { "STORED" } else { "VIRTUAL" }
        ));
    }
    if let Some(references) = &attribute.references {
        let mut reference = format!("REFERENCES {}({})", references.table, references.column);
        push_action(&mut reference, "ON DELETE", attribute.on_delete);
        push_action(&mut reference, "ON UPDATE", attribute.on_update);
        if let Some(mode) = attribute.deferrable {
            reference.push(' ');
            reference.push_str(mode.sql_clause());
        }
        clauses.push(reference);
    }

    clauses.join(" ")
}

/// A table-level key owns the `PRIMARY KEY` clause outright. The one
/// exception is a single-column key whose column already carries the flag;
/// that stays a column clause so no duplicate constraint is emitted.
fn column_primary_key_allowed(attribute: &Attribute, options: &TableOptions) -> bool {
    match &options.primary_key {
        None => true,
        Some(columns) => {
            columns.len() == 1 && columns[0] == attribute.name && attribute.primary_key
        }
    }
}

fn table_primary_key(definition: &ModelDefinition) -> Option<Vec<String>> {
    let columns = definition.options.primary_key.as_ref()?;
    if columns.is_empty() {
        return None;
    }
    if columns.len() == 1 {
        let owned_by_column = definition
            .attributes
            .iter()
            .any(|attribute| attribute.primary_key && attribute.name == columns[0]);
        if owned_by_column {
            return None;
        }
    }
    Some(
        columns
            .iter()
            .map(|column| resolve_column(column, &definition.options))
            .collect(),
    )
}

fn resolve_column(name: &str, options: &TableOptions) -> String {
    if options.underscored {
        underscore(name)
    } else {
        name.to_string()
    }
}

fn push_action(sql: &mut String, keyword: &str, action: Option<ReferentialAction>) {
    if let Some(action) = action {
        sql.push(' ');
        sql.push_str(keyword);
        sql.push(' ');
        sql.push_str(action.sql_keyword());
    }
}

fn format_literal(literal: &SqlLiteral) -> String {
    match literal {
        SqlLiteral::Null => "NULL".to_string(),
        SqlLiteral::Integer(value) => value.to_string(),
        SqlLiteral::Real(value) => value.to_string(),
        SqlLiteral::Boolean(true) => "TRUE".to_string(),
        SqlLiteral::Boolean(false) => "FALSE".to_string(),
        SqlLiteral::Text(value) => format!("'{}'", value.replace('\'', "''")),
        SqlLiteral::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
    }
}

/// camelCase → snake_case, used when `options.underscored` is set.
fn underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
            out.push(ch);
        }
    }
    out
}
