use std::path::Path;

use crate::{Config, Error, Rounding, SaveStrategy, load_from_path};

#[test]
fn empty_config_uses_defaults() {
    let cfg = Config::from_ron("()").unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.grid.columns, 20);
    assert_eq!(cfg.grid.row_height(), 32.0);
    assert_eq!(cfg.interaction.rounding, Rounding::HalfAwayFromZero);
    assert_eq!(cfg.persistence.strategy, SaveStrategy::Incremental);
}

#[test]
fn full_config_parses() {
    let text = r#"(
        grid: (columns: 12, root_font_px: 10.0, row_rem: 4.0),
        interaction: (drag_threshold_px: 3.0, rounding: half_to_even),
        persistence: (strategy: batched),
    )"#;
    let cfg = Config::from_ron(text).unwrap();
    assert_eq!(cfg.grid.columns, 12);
    assert_eq!(cfg.grid.row_height(), 40.0);
    assert_eq!(cfg.interaction.drag_threshold_px, 3.0);
    assert_eq!(cfg.interaction.rounding, Rounding::HalfToEven);
    assert_eq!(cfg.persistence.strategy, SaveStrategy::Batched);
    let g = cfg.grid.geometry(1200.0);
    assert_eq!(g.columns(), 12);
    assert_eq!(g.cell_width(), 100.0);
}

#[test]
fn partial_section_keeps_other_defaults() {
    let cfg = Config::from_ron("(grid: (columns: 8))").unwrap();
    assert_eq!(cfg.grid.columns, 8);
    assert_eq!(cfg.grid.root_font_px, 16.0);
}

#[test]
fn unknown_field_is_parse_error() {
    let err = Config::from_ron("(grid: (colums: 8))").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "{err:?}");
}

#[test]
fn zero_columns_rejected() {
    let err = Config::from_ron("(grid: (columns: 0))").unwrap_err();
    match err {
        Error::Validation { field, .. } => assert_eq!(field, "grid.columns"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn negative_threshold_rejected() {
    let err = Config::from_ron("(interaction: (drag_threshold_px: -1.0))").unwrap_err();
    assert!(err.pretty().contains("interaction.drag_threshold_px"));
}

#[test]
fn non_ron_extension_rejected() {
    let err = load_from_path(Path::new("/tmp/tilegrid.toml")).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert_eq!(err.path(), Some(Path::new("/tmp/tilegrid.toml")));
}

#[test]
fn missing_file_is_read_error() {
    let err = load_from_path(Path::new("/nonexistent/dir/config.ron")).unwrap_err();
    assert!(err.pretty().starts_with("Read error at /nonexistent/dir/config.ron"));
}
