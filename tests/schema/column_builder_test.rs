//! Column builder tests: header triples to the sorted column model.

use sheetforge::schema::{
    normalize_name, ColumnBuilder, ColumnRole, ColumnType, ScalarKind, SchemaError, TagKind,
};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

fn names(columns: &[sheetforge::schema::Column]) -> Vec<&str> {
    columns.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn test_id_column_is_rejected() {
    let header = row(&["id", "name", "skills", "skills", "skills"]);
    let tags = row(&["", "", "", "", ""]);
    let types = row(&["string", "string", "array<string>", "array<string>", "array<string>"]);

    let err = ColumnBuilder::new(&header, &tags, &types)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::ReservedColumnName { ref name } if name == "Id"));
}

#[test]
fn test_skills_array_expansion() {
    let header = row(&["name", "skills", "skills", "skills"]);
    let tags = row(&["", "", "", ""]);
    let types = row(&["string", "array<string>", "array<string>", "array<string>"]);

    let columns = ColumnBuilder::new(&header, &tags, &types).build().unwrap();
    assert_eq!(
        names(&columns),
        vec!["Name", "Skills", "Skills_0", "Skills_1", "Skills_2"]
    );

    assert_eq!(columns[0].ty, ColumnType::Scalar(ScalarKind::String));
    assert_eq!(
        columns[1].ty,
        ColumnType::Array(Box::new(ColumnType::Scalar(ScalarKind::String)))
    );
    assert_eq!(columns[1].role, ColumnRole::ArrayAggregate { len: 3 });
    assert_eq!(columns[1].positions, vec![1, 2, 3]);

    for (i, column) in columns[2..].iter().enumerate() {
        assert_eq!(column.ty, ColumnType::Scalar(ScalarKind::String));
        assert_eq!(
            column.role,
            ColumnRole::ArrayElement {
                parent: "Skills".to_string(),
                index: i
            }
        );
        assert_eq!(column.positions, vec![i + 1]);
    }
}

#[test]
fn test_reserved_names_any_case() {
    for reserved in ["created_at", "UPDATED_AT", "deleted_at"] {
        let header = row(&["name", reserved]);
        let result = ColumnBuilder::new(&header, &[], &[]).build();
        assert!(
            matches!(result, Err(SchemaError::ReservedColumnName { .. })),
            "{} should be reserved",
            reserved
        );
    }
}

#[test]
fn test_normalization_collision_is_duplicate() {
    let header = row(&["level req", "levelReq"]);
    let err = ColumnBuilder::new(&header, &[], &[]).build().unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateColumn { ref name } if name == "LevelReq"));
}

#[test]
fn test_output_order_independent_of_input_order() {
    let a = ColumnBuilder::new(
        &row(&["zeta", "alpha", "mid"]),
        &row(&["", "unique", ""]),
        &row(&["int", "string", "bool"]),
    )
    .build()
    .unwrap();
    let b = ColumnBuilder::new(
        &row(&["mid", "zeta", "alpha"]),
        &row(&["", "", "unique"]),
        &row(&["bool", "int", "string"]),
    )
    .build()
    .unwrap();

    assert_eq!(names(&a), vec!["Alpha", "Mid", "Zeta"]);
    assert_eq!(names(&a), names(&b));
    assert!(a[0].is_unique() && b[0].is_unique());
}

#[test]
fn test_design_only_scalar_dropped() {
    let columns = ColumnBuilder::new(
        &row(&["name", "memo"]),
        &row(&["", "design"]),
        &row(&["string", "string"]),
    )
    .build()
    .unwrap();
    assert_eq!(names(&columns), vec!["Name"]);
}

#[test]
fn test_tags_parsed_onto_scalars() {
    let columns = ColumnBuilder::new(
        &row(&["score"]),
        &row(&["unique,default:0"]),
        &row(&["int"]),
    )
    .build()
    .unwrap();

    let score = &columns[0];
    assert!(score.tags.contains(TagKind::Unique));
    assert_eq!(score.tags.value(TagKind::Default), Some("0"));
    assert_eq!(score.ty, ColumnType::Scalar(ScalarKind::Int32));
}

#[test]
fn test_first_occurrence_base_type_wins() {
    let columns = ColumnBuilder::new(
        &row(&["vals", "vals"]),
        &[],
        &row(&["array<int>", "array<string>"]),
    )
    .build()
    .unwrap();
    assert_eq!(columns[1].ty, ColumnType::Scalar(ScalarKind::Int32));
    assert_eq!(columns[2].ty, ColumnType::Scalar(ScalarKind::Int32));
}

#[test]
fn test_normalize_is_idempotent() {
    for raw in ["level req", "  attack   power ", "hp", "ALREADY Normal", "x_y z"] {
        let once = normalize_name(raw);
        assert_eq!(normalize_name(&once), once);
    }
}
