use rusqlite::Connection;
use sqlite_models::{
    create_table_sql, Attribute, CheckConstraint, DataType, Deferrable, Error,
    ForeignKeyConstraint, ModelDefinition, ReferentialAction, SqlLiteral, TableOptions,
    UniqueConstraint, VirtualTable,
};

fn users() -> ModelDefinition {
    ModelDefinition::new("Users")
        .attribute(Attribute::new("id", DataType::Text).primary_key().not_null())
}

#[test]
fn single_text_primary_key() {
    let sql = create_table_sql(&users()).unwrap();
    assert_eq!(sql, "CREATE TABLE Users (id TEXT PRIMARY KEY NOT NULL)");
}

#[test]
fn output_is_one_create_table_with_one_clause_list() {
    let definition = ModelDefinition::new("things")
        .attribute(Attribute::new("name", DataType::Text))
        .attribute(Attribute::new("count", DataType::Integer));
    let sql = create_table_sql(&definition).unwrap();
    assert!(sql.starts_with("CREATE TABLE "));
    assert!(sql.ends_with(')'));
    assert_eq!(sql.matches('(').count(), 1);
    assert_eq!(sql.matches(')').count(), 1);
}

#[test]
fn generation_is_idempotent() {
    let definition = ModelDefinition::new("Users")
        .attribute(Attribute::new("id", DataType::Integer).primary_key().auto_increment())
        .attribute(Attribute::new("email", DataType::Text).unique().not_null());
    let first = create_table_sql(&definition).unwrap();
    let second = create_table_sql(&definition).unwrap();
    assert_eq!(first, second);
}

#[test]
fn composite_primary_key_is_a_single_table_constraint() {
    let definition = ModelDefinition::new("memberships")
        .attribute(Attribute::new("a", DataType::Integer))
        .attribute(Attribute::new("b", DataType::Integer))
        .options(TableOptions {
            primary_key: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        });
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE memberships (a INTEGER, b INTEGER, PRIMARY KEY (a, b))"
    );
    assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
}

#[test]
fn table_key_suppresses_column_level_flags() {
    // Both columns flagged at column level and a composite key declared: the
    // table-level key wins outright.
    let definition = ModelDefinition::new("memberships")
        .attribute(Attribute::new("a", DataType::Integer).primary_key())
        .attribute(Attribute::new("b", DataType::Integer).primary_key())
        .options(TableOptions {
            primary_key: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        });
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
    assert!(sql.contains("PRIMARY KEY (a, b)"));
}

#[test]
fn single_column_table_key_matching_flagged_column_stays_inline() {
    let definition = ModelDefinition::new("Users")
        .attribute(Attribute::new("id", DataType::Integer).primary_key())
        .options(TableOptions {
            primary_key: Some(vec!["id".into()]),
            ..Default::default()
        });
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(sql, "CREATE TABLE Users (id INTEGER PRIMARY KEY)");
}

#[test]
fn virtual_table_fts5() {
    let definition = ModelDefinition::new("t").options(TableOptions {
        virtual_table: Some(VirtualTable {
            using: Some("fts5".into()),
            args: vec!["title".into(), "body".into()],
        }),
        ..Default::default()
    });
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(sql, "CREATE VIRTUAL TABLE t USING fts5 (title, body)");
}

#[test]
fn virtual_table_without_args_omits_parentheses() {
    let definition = ModelDefinition::new("t").options(TableOptions {
        virtual_table: Some(VirtualTable {
            using: Some("dbstat".into()),
            args: Vec::new(),
        }),
        ..Default::default()
    });
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(sql, "CREATE VIRTUAL TABLE t USING dbstat");
}

#[test]
fn virtual_table_without_module_is_rejected() {
    let definition = ModelDefinition::new("t").options(TableOptions {
        virtual_table: Some(VirtualTable::default()),
        ..Default::default()
    });
    match create_table_sql(&definition) {
        Err(Error::InvalidVirtualTableSpec { table }) => assert_eq!(table, "t"),
        other => panic!("expected InvalidVirtualTableSpec, got {:?}", other),
    }
}

#[test]
fn if_not_exists_follows_create_table() {
    let definition = users().options(TableOptions {
        if_not_exists: true,
        ..Default::default()
    });
    let sql = create_table_sql(&definition).unwrap();
    assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS Users ("));

    let virtual_definition = ModelDefinition::new("t").options(TableOptions {
        if_not_exists: true,
        virtual_table: Some(VirtualTable {
            using: Some("fts5".into()),
            args: vec!["body".into()],
        }),
        ..Default::default()
    });
    let sql = create_table_sql(&virtual_definition).unwrap();
    assert_eq!(sql, "CREATE VIRTUAL TABLE IF NOT EXISTS t USING fts5 (body)");
}

#[test]
fn column_clauses_keep_fixed_order() {
    let definition = ModelDefinition::new("articles")
        .attribute(
            Attribute::new("slug", DataType::Text)
                .not_null()
                .unique()
                .default_value(SqlLiteral::Text("draft".into()))
                .check("length(slug) > 0")
                .collate("NOCASE"),
        )
        .attribute(Attribute::new("wordCount", DataType::Integer).generated("length(body)", true))
        .attribute(Attribute::new("body", DataType::Text));
    let sql = create_table_sql(&definition).unwrap();
    assert!(sql.contains(
        "slug TEXT NOT NULL UNIQUE DEFAULT 'draft' CHECK (length(slug) > 0) COLLATE NOCASE"
    ));
    assert!(sql.contains("wordCount INTEGER GENERATED ALWAYS AS (length(body)) STORED"));
}

#[test]
fn collate_is_dropped_for_non_text_columns() {
    let definition = ModelDefinition::new("t")
        .attribute(Attribute::new("n", DataType::Integer).collate("NOCASE"));
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(sql, "CREATE TABLE t (n INTEGER)");
}

#[test]
fn named_unique_attributes_fold_into_one_constraint() {
    let definition = ModelDefinition::new("people")
        .attribute(Attribute::new("first", DataType::Text).unique_named("uq_full_name"))
        .attribute(Attribute::new("last", DataType::Text).unique_named("uq_full_name"));
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE people (first TEXT, last TEXT, CONSTRAINT uq_full_name UNIQUE (first, last))"
    );
}

#[test]
fn column_reference_clause_with_actions() {
    let definition = ModelDefinition::new("posts")
        .attribute(Attribute::new("id", DataType::Integer).primary_key())
        .attribute(
            Attribute::new("authorId", DataType::Integer)
                .references("Users", "id")
                .on_delete(ReferentialAction::Cascade)
                .on_update(ReferentialAction::NoAction)
                .deferrable(Deferrable::Deferred),
        );
    let sql = create_table_sql(&definition).unwrap();
    assert!(sql.contains(
        "authorId INTEGER REFERENCES Users(id) ON DELETE CASCADE ON UPDATE NO ACTION \
         DEFERRABLE INITIALLY DEFERRED"
    ));
}

#[test]
fn foreign_key_constraint_with_empty_fields_is_skipped() {
    let mut options = TableOptions::default();
    options.constraints.foreign_key.push(ForeignKeyConstraint {
        name: "fk_empty".into(),
        fields: Vec::new(),
        references_table: Some("Users".into()),
        references_columns: vec!["id".into()],
        on_delete: None,
        on_update: None,
        deferrable: None,
    });
    options.constraints.foreign_key.push(ForeignKeyConstraint {
        name: "fk_author".into(),
        fields: vec!["authorId".into()],
        references_table: Some("Users".into()),
        references_columns: vec!["id".into()],
        on_delete: None,
        on_update: None,
        deferrable: None,
    });
    let definition = ModelDefinition::new("posts")
        .attribute(Attribute::new("authorId", DataType::Integer))
        .options(options);
    let sql = create_table_sql(&definition).unwrap();
    assert!(!sql.contains("fk_empty"));
    // No trailing whitespace artifacts when action clauses are absent.
    assert_eq!(
        sql,
        "CREATE TABLE posts (authorId INTEGER, \
         CONSTRAINT fk_author FOREIGN KEY (authorId) REFERENCES Users(id))"
    );
}

#[test]
fn foreign_key_constraint_without_references_is_skipped() {
    let mut options = TableOptions::default();
    options.constraints.foreign_key.push(ForeignKeyConstraint {
        name: "fk_dangling".into(),
        fields: vec!["authorId".into()],
        references_table: None,
        references_columns: Vec::new(),
        on_delete: None,
        on_update: None,
        deferrable: None,
    });
    let definition = ModelDefinition::new("posts")
        .attribute(Attribute::new("authorId", DataType::Integer))
        .options(options);
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(sql, "CREATE TABLE posts (authorId INTEGER)");
}

#[test]
fn table_constraints_keep_declaration_order() {
    let mut options = TableOptions::default();
    options.constraints.unique.push(UniqueConstraint {
        name: "uq_pair".into(),
        columns: vec!["a".into(), "b".into()],
    });
    options.constraints.unique.push(UniqueConstraint {
        name: "uq_empty".into(),
        columns: Vec::new(),
    });
    options.constraints.check.push(CheckConstraint {
        name: "ck_positive".into(),
        expression: "a > 0".into(),
    });
    let definition = ModelDefinition::new("t")
        .attribute(Attribute::new("a", DataType::Integer))
        .attribute(Attribute::new("b", DataType::Integer))
        .options(options);
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE t (a INTEGER, b INTEGER, \
         CONSTRAINT uq_pair UNIQUE (a, b), CONSTRAINT ck_positive CHECK (a > 0))"
    );
}

#[test]
fn underscored_renames_columns_and_key_references() {
    let definition = ModelDefinition::new("events")
        .attribute(Attribute::new("eventId", DataType::Integer))
        .attribute(Attribute::new("createdAt", DataType::Date))
        .options(TableOptions {
            primary_key: Some(vec!["eventId".into(), "createdAt".into()]),
            underscored: true,
            ..Default::default()
        });
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE events (event_id INTEGER, created_at TEXT, \
         PRIMARY KEY (event_id, created_at))"
    );
}

#[test]
fn table_modifiers_trail_the_clause_list() {
    let definition = ModelDefinition::new("kv")
        .attribute(Attribute::new("k", DataType::Text).primary_key().not_null())
        .attribute(Attribute::new("v", DataType::Blob))
        .options(TableOptions {
            strict: true,
            without_rowid: true,
            ..Default::default()
        });
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE kv (k TEXT PRIMARY KEY NOT NULL, v BLOB) STRICT, WITHOUT ROWID"
    );
}

#[test]
fn temporary_tables_use_the_create_prefix() {
    let definition = ModelDefinition::new("scratch")
        .attribute(Attribute::new("v", DataType::Text))
        .options(TableOptions {
            temporary: true,
            ..Default::default()
        });
    let sql = create_table_sql(&definition).unwrap();
    assert_eq!(sql, "CREATE TEMPORARY TABLE scratch (v TEXT)");
}

// The generated statements must be accepted by the real driver, not just look
// plausible.
#[test]
fn generated_ddl_executes_against_sqlite() {
    let conn = Connection::open_in_memory().unwrap();

    let users = ModelDefinition::new("users")
        .attribute(Attribute::new("id", DataType::Integer).primary_key().auto_increment())
        .attribute(Attribute::new("email", DataType::Text).not_null().unique())
        .attribute(
            Attribute::new("createdAt", DataType::Date)
                .default_value(SqlLiteral::CurrentTimestamp),
        )
        .options(TableOptions {
            underscored: true,
            ..Default::default()
        });
    conn.execute(&create_table_sql(&users).unwrap(), []).unwrap();

    let posts = ModelDefinition::new("posts")
        .attribute(Attribute::new("id", DataType::Integer).primary_key())
        .attribute(
            Attribute::new("author", DataType::Integer)
                .references("users", "id")
                .on_delete(ReferentialAction::Cascade),
        )
        .attribute(Attribute::new("body", DataType::Text).check("length(body) > 0"))
        .attribute(Attribute::new("bodyLength", DataType::Integer).generated("length(body)", false))
        .options(TableOptions {
            if_not_exists: true,
            ..Default::default()
        });
    conn.execute(&create_table_sql(&posts).unwrap(), []).unwrap();
    // IF NOT EXISTS makes a second run a no-op instead of an error.
    conn.execute(&create_table_sql(&posts).unwrap(), []).unwrap();

    let search = ModelDefinition::new("post_search").options(TableOptions {
        virtual_table: Some(VirtualTable {
            using: Some("fts5".into()),
            args: vec!["body".into()],
        }),
        ..Default::default()
    });
    conn.execute(&create_table_sql(&search).unwrap(), []).unwrap();

    let kv = ModelDefinition::new("kv")
        .attribute(Attribute::new("k", DataType::Text).primary_key().not_null())
        .attribute(Attribute::new("v", DataType::Any))
        .options(TableOptions {
            strict: true,
            without_rowid: true,
            ..Default::default()
        });
    conn.execute(&create_table_sql(&kv).unwrap(), []).unwrap();
}
