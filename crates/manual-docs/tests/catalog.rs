use manual_docs::{view_document, Catalog, CatalogError, CategoryFilter};
use manual_test_support::{test_config, write_fixture, SAMPLE_DOCS_JSON};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sample() -> Catalog {
    Catalog::from_json(SAMPLE_DOCS_JSON).expect("sample export parses")
}

#[test]
fn summaries_are_newest_first() {
    let ids: Vec<u64> = sample().summaries().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn category_filter_narrows_the_list() {
    let catalog = sample();
    let guides = catalog.in_category(&CategoryFilter::Named("Guides".into()));
    let titles: Vec<&str> = guides.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Uploading images", "Getting started"]);

    assert!(catalog
        .in_category(&CategoryFilter::Named("Missing".into()))
        .is_empty());
}

#[test]
fn categories_are_distinct_in_store_order() {
    assert_eq!(sample().categories(), vec!["Home", "Guides"]);
}

#[test]
fn single_fetch_reveals_content() {
    let catalog = sample();
    let doc = catalog.get(2).expect("document 2");
    assert!(doc.content.contains("**guide**"));
    assert!(catalog.get(99).is_none());
}

#[test]
fn document_view_renders_content() {
    let catalog = sample();
    let options = test_config().render.to_options();

    let view = view_document(catalog.get(3).expect("document 3"), &options);
    assert_eq!(view.title, "Uploading images");
    assert_eq!(
        view.html,
        "<p>Paste an image:</p>\n<img src=\"/uploads/shot.png\" alt=\"screenshot\" class=\"md-image\">"
    );

    let view = view_document(catalog.get(2).expect("document 2"), &options);
    assert_eq!(
        view.html,
        "<h1>Getting started</h1>\n<p>Read the <strong>guide</strong> first.</p>"
    );
}

#[test]
fn loads_exports_from_disk() {
    let temp = TempDir::new().expect("tempdir");
    let path = write_fixture(temp.path(), "data/docs.json", SAMPLE_DOCS_JSON);

    let catalog = Catalog::load(&path).expect("load export");
    assert_eq!(catalog.len(), 3);
}

#[test]
fn reports_missing_and_malformed_exports() {
    let temp = TempDir::new().expect("tempdir");

    let missing = Catalog::load(temp.path().join("absent.json")).expect_err("missing file");
    assert!(matches!(missing, CatalogError::Io { .. }));

    let path = write_fixture(temp.path(), "broken.json", "[{\"id\": \"x\"}]");
    let malformed = Catalog::load(&path).expect_err("malformed file");
    match malformed {
        CatalogError::Parse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}
