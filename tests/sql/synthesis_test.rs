//! DDL / INSERT synthesis from sheet-derived tables.

use rusqlite::Connection;
use sheetforge::schema::{Relation, RelationType, Table};
use sheetforge::sql::{quote_identifier, schema_script, synthesize};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

fn table(name: &str, data: &[&[&str]]) -> Table {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect();
    Table::from_sheet(name, &rows).unwrap()
}

fn user() -> Table {
    table(
        "User",
        &[
            &["name", "email", "level"],
            &["notnull", "unique,index", "default:1"],
            &["string", "string", "int"],
            &["alice", "alice@example.com", "3"],
        ],
    )
}

fn post() -> Table {
    let mut post = table(
        "Post",
        &[
            &["title", "index"],
            &["", ""],
            &["string", "int"],
            &["Hello", "1"],
        ],
    );
    post.relations
        .push(Relation::new("Post", "User", RelationType::BelongsTo, "", ""));
    post
}

fn assert_parses(sql: &str) {
    if let Err(e) = Parser::parse_sql(&SQLiteDialect {}, sql) {
        panic!("failed to parse {}: {}", sql, e);
    }
}

#[test]
fn test_post_belongs_to_user() {
    let sql = synthesize(&post());

    insta::assert_snapshot!(sql.create_table, @r#"
CREATE TABLE IF NOT EXISTS Post (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  PostID INTEGER,
  "Index" INTEGER,
  Title TEXT,
  FOREIGN KEY(PostID) REFERENCES User(id)
)
"#);
    assert_eq!(
        sql.create_indexes,
        vec!["CREATE INDEX IF NOT EXISTS idx_Post_PostID ON Post(PostID)"]
    );
    assert_eq!(
        sql.insert,
        r#"INSERT INTO Post ("Index", Title) VALUES (?, ?)"#
    );
}

#[test]
fn test_user_constraints_and_indexes() {
    let sql = synthesize(&user());

    insta::assert_snapshot!(sql.create_table, @r#"
CREATE TABLE IF NOT EXISTS User (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  Email TEXT UNIQUE,
  Level INTEGER DEFAULT 1,
  Name TEXT NOT NULL
)
"#);
    assert_eq!(
        sql.create_indexes,
        vec!["CREATE INDEX IF NOT EXISTS idx_User_Email ON User(Email)"]
    );
}

#[test]
fn test_unique_default_clause() {
    let t = table(
        "Score",
        &[&["points"], &["unique,default:0"], &["int"], &["5"]],
    );
    let sql = synthesize(&t);
    let clause = sql
        .create_table
        .lines()
        .find(|l| l.trim_start().starts_with("Points"))
        .unwrap();
    assert!(clause.trim_end_matches(',').ends_with("UNIQUE DEFAULT 0"));
}

#[test]
fn test_insert_columns_match_ddl_order() {
    let t = table(
        "Hero",
        &[
            &["zeta", "skills", "alpha", "skills"],
            &["", "", "", ""],
            &["int", "array<string>", "bool", "array<string>"],
            &["1", "a", "true", "b"],
        ],
    );
    let sql = synthesize(&t);

    let ddl_columns: Vec<&str> = sql
        .create_table
        .lines()
        .skip(2)
        .filter(|l| l.starts_with("  "))
        .map(|l| l.trim().split(' ').next().unwrap())
        .collect();
    assert_eq!(ddl_columns, sql.insert_columns);
    assert_eq!(
        sql.insert_columns,
        vec!["Alpha", "Skills", "Skills_0", "Skills_1", "Zeta"]
    );
}

#[test]
fn test_quoting_rules() {
    assert_eq!(quote_identifier("select"), "\"select\"");
    assert_eq!(quote_identifier("name"), "name");
    assert_eq!(quote_identifier("Level Req"), "\"Level Req\"");
}

#[test]
fn test_statements_parse_as_sqlite() {
    let t = table(
        "Everything",
        &[
            &["a", "b", "c", "d", "e", "f", "g", "h", "h", "order"],
            &["notnull", "unique", "index", "default:0", "pk", "", "", "", "", "index"],
            &[
                "int",
                "bigint",
                "float",
                "bool",
                "string",
                "datetime",
                "blob",
                "array<int>",
                "array<int>",
                "text",
            ],
            &["1", "2", "3.5", "true", "x", "2024-01-02", "raw", "1", "2", "first"],
        ],
    );
    let mut with_fk = t.clone();
    with_fk
        .relations
        .push(Relation::new("Everything", "User", RelationType::BelongsTo, "", ""));

    for table in [&t, &with_fk] {
        let sql = synthesize(table);
        for statement in sql.ddl() {
            assert_parses(statement);
        }
        assert_parses(&sql.insert);
    }
}

#[test]
fn test_schema_script_is_idempotent() {
    let tables = vec![post(), user()];
    let script = schema_script(&tables);

    assert!(script.starts_with("-- Schema generated by sheetforge\n\nPRAGMA foreign_keys=ON;\n\n"));
    assert!(script.contains("CREATE INDEX IF NOT EXISTS idx_User_Email ON User(Email);\n"));

    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&script).unwrap();
    conn.execute_batch(&script).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('Post', 'User')",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(count, 2);
}
