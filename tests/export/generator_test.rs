//! End-to-end: CSV workbooks on disk through the worker pool into exporters.

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use sheetforge::export::{ExportOptions, ExporterRegistry};
use sheetforge::generator::{GenerateError, Generator};
use sheetforge::schema::SchemaError;
use sheetforge::workbook::discover_workbooks;

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

/// `blog/` with a relation sheet, plus a standalone `Tag.csv` workbook.
fn fixture(root: &Path) {
    let blog = root.join("blog");
    fs::create_dir(&blog).unwrap();
    write(
        &blog.join("User.csv"),
        "name,email,level\nnotnull,\"unique,index\",default:1\nstring,string,int\nalice,alice@example.com,3\nbob,bob@example.com,\n",
    );
    write(
        &blog.join("Post.csv"),
        "title,tags,tags,userid\n,,,\nstring,array<string>,array<string>,int\nHello,rust,,1\nAgain,a,b,2\n",
    );
    write(
        &blog.join("#Relation.csv"),
        "SourceTable,TargetTable,RelationType,ForeignKey,ReferenceKey\nPost,User,belongsTo,Userid,\nUser,Post,hasMany,,\n",
    );
    write(&blog.join("~$User.csv"), "lock");

    write(
        &root.join("Tag.csv"),
        "label,weight\nunique,\nstring,float\nnew,0.5\nhot,1.5\n",
    );
}

#[test]
fn test_discover_and_generate() {
    let input = tempfile::tempdir().unwrap();
    fixture(input.path());

    let paths = discover_workbooks(input.path()).unwrap();
    assert_eq!(paths.len(), 2);

    let catalog = Generator::new(4).run_paths(paths);
    assert!(!catalog.has_errors(), "{:?}", catalog.errors);

    let names: Vec<_> = catalog.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Post", "Tag", "User"]);

    let post = catalog.table("Post").unwrap();
    assert_eq!(post.relations.len(), 1);
    assert_eq!(post.belongs_to().next().unwrap().foreign_key, "Userid");
    assert_eq!(catalog.table("User").unwrap().relations.len(), 1);
    assert!(catalog.table("Tag").unwrap().relations.is_empty());
}

#[test]
fn test_generate_then_export_sqlite() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fixture(input.path());

    let catalog = Generator::new(2).run_paths(discover_workbooks(input.path()).unwrap());
    let tables = catalog.into_result().unwrap();

    ExporterRegistry::with_defaults()
        .export("sqlite", &tables, &ExportOptions::new(output.path()))
        .unwrap();

    let conn = Connection::open(output.path().join("sqlite").join("app.db")).unwrap();

    let level: i64 = conn
        .query_row("SELECT Level FROM User WHERE Name = 'bob'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(level, 0);

    let tags: Vec<String> = {
        let mut stmt = conn.prepare("SELECT Tags FROM Post ORDER BY id").unwrap();
        let rows = stmt.query_map([], |r| r.get(0)).unwrap();
        rows.collect::<Result<_, _>>().unwrap()
    };
    assert_eq!(tags, vec![r#"["rust"]"#, r#"["a","b"]"#]);

    let index_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name IN ('idx_Post_Userid', 'idx_User_Email')",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(index_count, 2);
}

#[test]
fn test_failures_are_collected_per_sheet() {
    let input = tempfile::tempdir().unwrap();
    let book = input.path().join("game");
    fs::create_dir(&book).unwrap();
    write(&book.join("Item.csv"), "name\n\"\"\nstring\nSword\n");
    write(&book.join("Short.csv"), "name\n\nstring\n");
    write(&book.join("Account.csv"), "id,name\n,\nint,string\n1,x\n");
    write(
        &book.join("#Relation.csv"),
        "SourceTable,TargetTable\nItem,Account\n",
    );

    let catalog = Generator::new(3).run_paths([book]);

    let names: Vec<_> = catalog.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Item"]);
    assert_eq!(catalog.errors.len(), 3);

    assert!(catalog
        .errors
        .iter()
        .any(|e| matches!(e, GenerateError::Relation { .. })));
    assert!(catalog.errors.iter().any(|e| matches!(
        e,
        GenerateError::Sheet {
            source: SchemaError::TooFewRows { .. },
            ..
        }
    )));
    assert!(catalog.errors.iter().any(|e| matches!(
        e,
        GenerateError::Sheet {
            source: SchemaError::ReservedColumnName { .. },
            ..
        }
    )));

    let err = catalog.into_result().unwrap_err();
    assert!(err.to_string().starts_with("3 input error(s)"));
}

#[test]
fn test_unreadable_input_does_not_stop_others() {
    let input = tempfile::tempdir().unwrap();
    fixture(input.path());

    let mut paths = discover_workbooks(input.path()).unwrap();
    paths.push(input.path().join("missing.csv"));

    let catalog = Generator::new(2).run_paths(paths);
    assert_eq!(catalog.tables.len(), 3);
    assert_eq!(catalog.errors.len(), 1);
    assert!(matches!(&catalog.errors[0], GenerateError::Workbook { .. }));
}
