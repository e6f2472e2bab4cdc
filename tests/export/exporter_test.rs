//! Exporter tests: files on disk, database contents, generated source.

use std::fs;

use rusqlite::Connection;
use sheetforge::export::{ExportOptions, ExporterRegistry, MANIFEST_FILE, SCHEMA_FILE};
use sheetforge::schema::{Relation, RelationType, Table};

fn table(name: &str, data: &[&[&str]]) -> Table {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect();
    Table::from_sheet(name, &rows).unwrap()
}

fn catalog() -> Vec<Table> {
    let hero = table(
        "Hero",
        &[
            &["name", "skills", "skills", "skills", "born", "active", "memo"],
            &["unique", "", "", "", "", "", "design"],
            &[
                "string",
                "array<string>",
                "array<string>",
                "array<string>",
                "datetime",
                "bool",
                "string",
            ],
            &["Arthur", "slash", "parry", "", "2024-01-02 15:04:05", "true", "x"],
            &["Merlin", "", "", "", "not-a-date", "0", "y"],
        ],
    );
    let mut item = table(
        "Item",
        &[
            &["label", "heroid"],
            &["", ""],
            &["string", "int"],
            &["Sword", "1"],
        ],
    );
    item.relations.push(Relation::new(
        "Item",
        "Hero",
        RelationType::BelongsTo,
        "Heroid",
        "",
    ));
    vec![hero, item]
}

#[test]
fn test_sqlite_export() {
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::new(dir.path()).with_db_name("game.db");
    ExporterRegistry::with_defaults()
        .export("sqlite", &catalog(), &options)
        .unwrap();

    let sqlite_dir = dir.path().join("sqlite");
    let schema = fs::read_to_string(sqlite_dir.join(SCHEMA_FILE)).unwrap();
    assert!(schema.contains("CREATE TABLE IF NOT EXISTS Hero ("));
    assert!(schema.contains("FOREIGN KEY(Heroid) REFERENCES Hero(id)"));
    assert!(schema.contains("CREATE INDEX IF NOT EXISTS idx_Item_Heroid ON Item(Heroid);"));
    assert!(!schema.contains("Memo"));

    let conn = Connection::open(sqlite_dir.join("game.db")).unwrap();

    let (skills, s0, s1, born, active): (String, String, String, String, i64) = conn
        .query_row(
            "SELECT Skills, Skills_0, Skills_1, Born, Active FROM Hero WHERE Name = 'Arthur'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .unwrap();
    assert_eq!(skills, r#"["slash","parry"]"#);
    assert_eq!((s0.as_str(), s1.as_str()), ("slash", "parry"));
    assert_eq!(born, "2024-01-02T15:04:05Z");
    assert_eq!(active, 1);

    // A bad cell is stored as NULL without losing the row.
    let (skills, born): (String, Option<String>) = conn
        .query_row(
            "SELECT Skills, Born FROM Hero WHERE Name = 'Merlin'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(skills, "[]");
    assert_eq!(born, None);

    let heroid: i64 = conn
        .query_row("SELECT Heroid FROM Item WHERE Label = 'Sword'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(heroid, 1);
}

#[test]
fn test_sqlite_export_replaces_database() {
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::new(dir.path());
    let registry = ExporterRegistry::with_defaults();

    registry.export("sqlite", &catalog(), &options).unwrap();
    registry.export("sqlite", &catalog(), &options).unwrap();

    let conn = Connection::open(dir.path().join("sqlite").join("app.db")).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM Hero", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_rust_export() {
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::new(dir.path()).with_package("game");
    ExporterRegistry::with_defaults()
        .export("rust", &catalog(), &options)
        .unwrap();

    let pkg = dir.path().join("rust").join("game");
    let module = fs::read_to_string(pkg.join("mod.rs")).unwrap();
    assert!(module.contains("pub mod hero;"));
    assert!(module.contains("pub use item::Item;"));

    let hero = fs::read_to_string(pkg.join("hero.rs")).unwrap();
    assert!(hero.contains("pub struct Hero {"));
    assert!(hero.contains("    pub id: i64,"));
    assert!(hero.contains("    /// `Name`: TEXT, tags `unique`\n    pub name: Option<String>,"));
    assert!(hero.contains("    /// `Skills`: TEXT, tags `type:text`\n    pub skills: Option<Vec<String>>,"));
    assert!(hero.contains("    /// `Skills_2`: TEXT, tags `column:skills_2`\n    pub skills_2: Option<String>,"));
    assert!(hero.contains("pub fn skills_from_slots(&self) -> Vec<String> {"));
    assert!(hero.contains("[&self.skills_0, &self.skills_1, &self.skills_2]"));
    assert!(!hero.contains("memo"));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(pkg.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest[0]["table"], "Hero");
    assert_eq!(manifest[0]["array_fields"][0]["name"], "Skills");
    assert_eq!(manifest[0]["array_fields"][0]["array_len"], 3);
    assert_eq!(manifest[1]["fields"][0]["name"], "Heroid");
}

#[test]
fn test_export_all_writes_every_exporter() {
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::new(dir.path());
    ExporterRegistry::with_defaults()
        .export_all(&catalog(), &options)
        .unwrap();

    assert!(dir.path().join("sqlite").join("schema.sql").is_file());
    assert!(dir.path().join("rust").join("models").join("mod.rs").is_file());
}
