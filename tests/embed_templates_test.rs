use jtpl::fs::MemoryFs;
use jtpl::{Engine, Value, embed_templates};
use std::path::Path;
use std::sync::Arc;

#[test]
fn test_embedded_templates() {
    let assets = embed_templates!("tests/resources/templates/**/*.tpl");
    assert_eq!(assets.len(), 3);

    let engine = Engine::new().with_fs(Arc::new(MemoryFs::from_assets(assets)));
    let header = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/templates/partials/header.tpl");
    let template = engine.load(&header).expect("embedded template should be found");

    let mut data = Value::from_json(r#"{"customer": {"name": "Globex", "tier": "bronze"}}"#).unwrap();
    assert_eq!(
        template.render_to_string_with(&engine, &mut data).unwrap(),
        "Report for Globex (bronze)\n"
    );
}

#[test]
fn test_embedded_includes_resolve_inside_memory_fs() {
    let engine = Engine::new().with_fs(Arc::new(MemoryFs::from_assets(embed_templates!(
        "tests/resources/templates/**/*.tpl"
    ))));
    let report = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/resources/templates/report.tpl");
    let template = engine.load(&report).unwrap();

    let mut data = Value::from_json(
        r#"{"customer": {"name": "X", "tier": "y"}, "orders": [{"id": 9, "paid": true, "lines": []}]}"#,
    )
    .unwrap();
    assert_eq!(
        template.render_to_string_with(&engine, &mut data).unwrap(),
        "Report for X (y)\n#9: paid\nNo notes.\n"
    );
}

#[test]
fn test_no_matches_is_empty() {
    let assets = embed_templates!("tests/resources/none/*.tpl");
    assert!(assets.is_empty());
}
