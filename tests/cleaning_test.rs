//! End-to-end cleaning: load a file, run a recipe, export
//!
//! Run with: `cargo test --test cleaning_test`

use std::fs;
use std::path::Path;
use table_cleaner::{
    export_table, load_bytes, load_table, CleanRecipe, CleaningPipeline, Delimiter, ExportFormat,
    ExportOptions, ReadOptions, RowFilter, Scalar, SortKey,
};

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_clean_csv_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "sales.2024.csv",
        "region,product,units,price\n\
         north,apple,10,1.5\n\
         south,pear,3,2.0\n\
         north,plum,,0.5\n\
         east,apple,7,1.25\n",
    );

    let loaded = load_table(&input, &ReadOptions::default()).unwrap();
    assert_eq!(loaded.table.shape(), (4, 4));
    assert_eq!(loaded.delimiter, Some(b','));

    let recipe = CleanRecipe {
        select: vec!["product".into(), "units".into()],
        sort: vec![SortKey::desc("units")],
        filters: vec![RowFilter::Range { column: "units".into(), min: Some(5.0), max: None }],
        export: ExportOptions {
            format: ExportFormat::Csv,
            out_dir: Some(dir.path().join("out")),
            ..ExportOptions::default()
        },
        ..CleanRecipe::default()
    };
    let outcome = CleaningPipeline::new(recipe.clone()).run(loaded).unwrap();
    assert_eq!(outcome.summary(), "sales.2024.csv: 4x4 -> 2x2");

    let paths = export_table(&outcome.table, "sales.2024.csv", &recipe.export).unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].ends_with("sales_cleaned.csv"));

    let written = fs::read(&paths[0]).unwrap();
    assert!(written.starts_with(b"\xEF\xBB\xBF"));
    assert_eq!(&written[3..], "product,units\napple,10\napple,7\n".as_bytes());
}

#[test]
fn test_skip_rows_and_header_row() {
    let content = "Quarterly report\nGenerated 2024-01-01\nid;name\n1;ann\n2;bob\n";
    let options = ReadOptions {
        skip_rows: 2,
        ..ReadOptions::default()
    };
    let loaded = load_bytes("report.txt", content.as_bytes().to_vec(), &options).unwrap();
    assert_eq!(loaded.delimiter, Some(b';'));
    assert_eq!(loaded.table.column_names(), vec!["id", "name"]);
    assert_eq!(loaded.table.scalar(1, 1), Scalar::Text("bob".into()));

    let shifted = ReadOptions {
        skip_rows: 1,
        header_row: Some(1),
        delimiter: Delimiter::Semicolon,
        sheet: None,
    };
    let loaded = load_bytes("report.txt", content.as_bytes().to_vec(), &shifted).unwrap();
    assert_eq!(loaded.table.column_names(), vec!["id", "name"]);
    assert_eq!(loaded.table.num_rows(), 2);
}

#[test]
fn test_header_row_past_end_has_hint() {
    let options = ReadOptions {
        header_row: Some(10),
        ..ReadOptions::default()
    };
    let err = load_bytes("a.csv", b"a,b\n1,2\n".to_vec(), &options).unwrap_err();
    assert!(err.hint().is_some());
}

#[test]
fn test_recipe_file_drives_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "people.tsv", "name\tcity\nann\tOslo\nbob\toslo\ncy\tRome\n");
    let recipe_path = write(
        dir.path(),
        "recipe.json",
        r#"{
            "filters": [{"kind": "text", "column": "city", "pattern": "oslo", "case_sensitive": false}],
            "export": {"format": "both"}
        }"#,
    );

    let recipe = CleanRecipe::from_path(&recipe_path).unwrap();
    let loaded = load_table(&input, &recipe.read).unwrap();
    let outcome = CleaningPipeline::new(recipe.clone()).run(loaded).unwrap();
    assert_eq!(outcome.table.num_rows(), 2);
    assert_eq!(outcome.steps.len(), 1);

    let export = ExportOptions {
        out_dir: Some(dir.path().to_path_buf()),
        ..recipe.export
    };
    let paths = export_table(&outcome.table, "people.tsv", &export).unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths[1].ends_with("people_cleaned.xlsx"));

    let reloaded = load_table(&paths[1], &ReadOptions::default()).unwrap();
    assert_eq!(reloaded.table.column_names(), vec!["name", "city"]);
    assert_eq!(reloaded.table.num_rows(), 2);
}

#[test]
fn test_unsupported_extension() {
    let err = load_bytes("notes.pdf", Vec::new(), &ReadOptions::default()).unwrap_err();
    assert_eq!(err.hint(), Some("supported: csv, tsv, txt, dat, xlsx, xlsm, xls, ods"));
}
