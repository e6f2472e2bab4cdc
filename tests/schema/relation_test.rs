//! Relation sheet parsing and attachment.

use sheetforge::schema::{
    attach_relations, parse_relations, RelationError, RelationType, Table,
};

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}

const HEADER: &[&str] = &[
    "SourceTable",
    "TargetTable",
    "RelationType",
    "ForeignKey",
    "ReferenceKey",
];

#[test]
fn test_belongs_to_defaults() {
    let relations = parse_relations(&rows(&[HEADER, &["Post", "User", "belongs_to", "", ""]])).unwrap();

    assert_eq!(relations.len(), 1);
    let r = &relations[0];
    assert_eq!(r.source_table, "Post");
    assert_eq!(r.target_table, "User");
    assert_eq!(r.relation_type, RelationType::BelongsTo);
    assert_eq!(r.relation_type.to_string(), "belongsTo");
    assert_eq!(r.foreign_key, "PostID");
    assert_eq!(r.reference_key, "ID");
}

#[test]
fn test_explicit_keys_kept() {
    let relations = parse_relations(&rows(&[
        HEADER,
        &["Comment", "Post", "belongsTo", "ParentPost", "Code"],
    ]))
    .unwrap();
    assert_eq!(relations[0].foreign_key, "ParentPost");
    assert_eq!(relations[0].reference_key, "Code");
}

#[test]
fn test_header_order_is_free() {
    let relations = parse_relations(&rows(&[
        &["RelationType", "ReferenceKey", "ForeignKey", "TargetTable", "SourceTable"],
        &["hasMany", "", "", "Post", "User"],
    ]))
    .unwrap();
    assert_eq!(relations[0].source_table, "User");
    assert_eq!(relations[0].relation_type, RelationType::HasMany);
    assert!(!relations[0].is_belongs_to());
}

#[test]
fn test_missing_header_is_error() {
    let err = parse_relations(&rows(&[
        &["SourceTable", "TargetTable", "RelationType", "ForeignKey"],
        &["Post", "User", "belongsTo", ""],
    ]))
    .unwrap_err();
    assert!(matches!(err, RelationError::MissingHeader("ReferenceKey")));
}

#[test]
fn test_incomplete_and_invalid_rows_skipped() {
    let relations = parse_relations(&rows(&[
        HEADER,
        &["", "User", "belongsTo", "", ""],
        &["Post", "User", "manyToMany", "", ""],
        &["Post", "", "hasOne", "", ""],
        &["Post", "User", "has-one", "", ""],
        &["Post"],
    ]))
    .unwrap();
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].relation_type, RelationType::HasOne);
}

#[test]
fn test_empty_sheet_has_no_relations() {
    assert!(parse_relations(&[]).unwrap().is_empty());
}

#[test]
fn test_attach_to_source_table() {
    let sheet = rows(&[&["title"], &[""], &["string"], &["Hello"]]);
    let mut tables = vec![
        Table::from_sheet("Post", &sheet).unwrap(),
        Table::from_sheet("User", &sheet).unwrap(),
    ];
    let relations = parse_relations(&rows(&[
        HEADER,
        &["Post", "User", "belongsTo", "", ""],
        &["User", "Post", "hasMany", "", ""],
        &["Tag", "Post", "belongsTo", "", ""],
    ]))
    .unwrap();

    attach_relations(&mut tables, relations);

    assert_eq!(tables[0].relations.len(), 1);
    assert_eq!(tables[0].belongs_to().count(), 1);
    assert_eq!(tables[1].relations.len(), 1);
    assert_eq!(tables[1].belongs_to().count(), 0);
}
