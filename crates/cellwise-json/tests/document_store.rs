//! Document store behavior against files on disk and instrumented trees

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cellwise_json::{
    DocumentConfig, DocumentStore, DocumentTree, JsonError, JsonTree, Lookup, SchemaValidator,
    Violation,
};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};

/// Counts key lookups that reach the tree
#[derive(Debug)]
struct CountingTree {
    inner: JsonTree,
    lookups: AtomicUsize,
}

impl CountingTree {
    fn new(document: Value) -> Arc<Self> {
        Arc::new(Self {
            inner: JsonTree::new(document),
            lookups: AtomicUsize::new(0),
        })
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl DocumentTree for CountingTree {
    fn root(&self) -> &Value {
        self.inner.root()
    }

    fn lookup(&self, section: &str, key: &str) -> cellwise_core::Result<Option<&Value>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(section, key)
    }
}

fn write_json(dir: &tempfile::TempDir, name: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn test_deposit_by_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(&dir, "booking.json", &json!({"Deposit": [true, false]}));
    let store = DocumentConfig::builder()
        .file_path(&path)
        .build()
        .unwrap()
        .open()
        .unwrap();

    assert!(store.get_boolean_by_index("Deposit", 0).unwrap());
    assert!(!store.get_boolean_by_index("Deposit", 1).unwrap());

    let err = store.get_boolean_by_index("Deposit", 5).unwrap_err();
    assert!(matches!(err, JsonError::MissingValue { kind: "boolean", .. }));
    assert_eq!(store.get_optional_by_index::<bool>("Deposit", 5).unwrap(), None);
    assert_eq!(store.get_optional_by_index::<bool>("Missing", 0).unwrap(), None);
}

#[test]
fn test_optional_and_required_on_missing_key() {
    let store = DocumentStore::from_value(json!({"Hotel": {"Name": "Harbour", "Stars": null}}));

    assert_eq!(store.get_optional_string("Hotel", "Phone").unwrap(), None);
    assert_eq!(store.get_optional_int("Hotel", "Stars").unwrap(), None);
    let err = store.get_string("Hotel", "Phone").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing String value for section 'Hotel', key 'Phone'"
    );
}

#[test]
fn test_values_convert_like_cells() {
    let store = DocumentStore::from_value(json!({
        "Booking": {"Rooms": "2", "Paid": "yes", "Nights": 3, "Guest": "  Ann  ", "Rate": 99.50}
    }));

    assert_eq!(store.get_int("Booking", "Rooms").unwrap(), 2);
    assert!(store.get_boolean("Booking", "Paid").unwrap());
    assert_eq!(store.get_long("Booking", "Nights").unwrap(), 3);
    assert_eq!(store.get_string("Booking", "Guest").unwrap(), "Ann");
    assert_eq!(store.get_string("Booking", "Rate").unwrap(), "99.5");
    assert!(matches!(
        store.get_int("Booking", "Guest"),
        Err(JsonError::MissingValue { kind: "int", .. })
    ));
}

#[test]
fn test_section_arrays() {
    let store = DocumentStore::from_value(json!({
        "Cities": ["Sydney", "Perth", null],
        "Counts": [1, "2", "three", 4.0],
        "Flags": ["true", false, "NO"],
        "Hotel": {"Name": "Harbour"}
    }));

    assert_eq!(store.get_all_strings("Cities").unwrap(), vec!["Sydney", "Perth"]);
    assert_eq!(store.get_all_integers("Counts").unwrap(), vec![1, 2, 4]);
    assert_eq!(store.get_all_booleans("Flags").unwrap(), vec![true, false, false]);
    assert!(store.get_all_strings("Hotel").unwrap().is_empty());
    assert!(store.get_all_strings("Nowhere").unwrap().is_empty());
    assert_eq!(store.get_string_by_index("Cities", 1).unwrap(), "Perth");
    assert_eq!(store.get_int_by_index("Counts", 1).unwrap(), 2);
}

#[test]
fn test_default_section() {
    let document = json!({"Booking": {"Guest": "Ann"}});
    let store = DocumentStore::from_value(document.clone()).with_default_section("Booking");
    assert_eq!(store.get_in_default::<String>("Guest").unwrap(), "Ann");
    assert_eq!(store.get_optional_in_default::<String>("Room").unwrap(), None);

    let store = DocumentStore::from_value(document);
    assert!(matches!(
        store.get_in_default::<String>("Guest"),
        Err(JsonError::Config(_))
    ));
}

#[test]
fn test_deserialized_values() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Address {
        city: String,
        postcode: u32,
    }

    let store = DocumentStore::from_value(json!({
        "Hotel": {"Address": {"city": "Sydney", "postcode": 2000}, "Broken": {"city": 1}}
    }));

    let address: Address = store.get_deserialized("Hotel", "Address").unwrap();
    assert_eq!(
        address,
        Address {
            city: "Sydney".to_string(),
            postcode: 2000
        }
    );
    assert!(matches!(
        store.get_deserialized::<Address>("Hotel", "Broken"),
        Err(JsonError::Deserialize { .. })
    ));
    assert!(matches!(
        store.get_deserialized::<Address>("Hotel", "Missing"),
        Err(JsonError::MissingValue { .. })
    ));
}

#[test]
fn test_context_cache_skips_repeat_lookups() {
    let tree = CountingTree::new(json!({"Hotel": {"Name": "Harbour"}}));
    let store = DocumentStore::from_tree(tree.clone()).with_cache(true);
    let ctx = store.context();

    let first = ctx.get_string("Hotel", "Name").unwrap();
    let second = ctx.get_string("Hotel", "Name").unwrap();
    assert_eq!(first, second);
    assert_eq!(tree.lookups(), 1);

    // Misses are memoized too
    assert_eq!(ctx.get_optional_string("Hotel", "Phone").unwrap(), None);
    assert_eq!(ctx.get_optional_string("Hotel", "Phone").unwrap(), None);
    assert_eq!(tree.lookups(), 2);
    assert_eq!(ctx.cached_entries(), 2);
}

#[test]
fn test_contexts_do_not_share_caches() {
    let tree = CountingTree::new(json!({"Hotel": {"Name": "Harbour"}}));
    let store = DocumentStore::from_tree(tree.clone()).with_cache(true);

    let a = store.context();
    let b = store.context();
    a.get_string("Hotel", "Name").unwrap();
    b.get_string("Hotel", "Name").unwrap();
    a.get_string("Hotel", "Name").unwrap();
    assert_eq!(tree.lookups(), 2);

    a.close();
    a.close();
    assert_eq!(a.cached_entries(), 0);
    assert_eq!(b.cached_entries(), 1);

    a.get_string("Hotel", "Name").unwrap();
    assert_eq!(tree.lookups(), 3);
}

#[test]
fn test_uncached_store_always_reads_tree() {
    let tree = CountingTree::new(json!({"Hotel": {"Name": "Harbour"}}));
    let store = DocumentStore::from_tree(tree.clone());
    let ctx = store.context();

    ctx.get_string("Hotel", "Name").unwrap();
    ctx.get_string("Hotel", "Name").unwrap();
    assert_eq!(tree.lookups(), 2);
    assert_eq!(ctx.cached_entries(), 0);
}

#[test]
fn test_contexts_across_threads() {
    let store = DocumentStore::from_value(json!({"Hotel": {"Rooms": 12}})).with_cache(true);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let ctx = store.context();
                assert_eq!(ctx.get_int("Hotel", "Rooms").unwrap(), 12);
                assert_eq!(ctx.cached_entries(), 1);
            });
        }
    });
}

#[test]
fn test_schema_failure_is_fatal_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_json(&dir, "data.json", &json!({"Rooms": "two", "Deposit": [true, 1]}));
    let schema = write_json(
        &dir,
        "data.schema.json",
        &json!({
            "type": "object",
            "required": ["Guest"],
            "properties": {
                "Rooms": {"type": "integer"},
                "Deposit": {"type": "array", "items": {"type": "boolean"}}
            }
        }),
    );

    let config = DocumentConfig::builder()
        .file_path(&data)
        .schema_path(&schema)
        .build()
        .unwrap();
    match DocumentStore::load(&config) {
        Err(JsonError::SchemaInvalid { violations }) => {
            let mut pointers: Vec<&str> = violations.iter().map(|v| v.pointer.as_str()).collect();
            pointers.sort_unstable();
            assert_eq!(pointers, vec!["", "/Deposit/1", "/Rooms"]);
        }
        other => panic!("expected schema failure, got {other:?}"),
    }
}

#[test]
fn test_missing_schema_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_json(&dir, "data.json", &json!({}));
    let config = DocumentConfig::builder()
        .file_path(&data)
        .schema_path(dir.path().join("nope.json"))
        .build()
        .unwrap();

    assert!(matches!(
        DocumentStore::load(&config),
        Err(JsonError::SchemaLoad { .. })
    ));
}

#[derive(Debug)]
struct NoEmptySections;

impl SchemaValidator for NoEmptySections {
    fn validate(&self, document: &Value) -> Vec<Violation> {
        document
            .as_object()
            .into_iter()
            .flatten()
            .filter(|(_, v)| v.as_object().is_some_and(|o| o.is_empty()))
            .map(|(k, _)| Violation::new(format!("/{k}"), "section is empty"))
            .collect()
    }
}

#[test]
fn test_custom_validator() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_json(&dir, "data.json", &json!({"A": {}, "B": {"x": 1}, "C": {}}));
    let config = DocumentConfig::builder()
        .file_path(&data)
        .validator(Arc::new(NoEmptySections))
        .build()
        .unwrap();

    let err = config.open().unwrap_err();
    assert_eq!(
        err.to_string(),
        "JSON data does not match schema: /A: section is empty; /C: section is empty"
    );
}

#[test]
fn test_unreadable_documents() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"a\": ").unwrap();

    assert!(matches!(
        DocumentConfig::new(&broken).open(),
        Err(JsonError::Parse { .. })
    ));
    assert!(matches!(
        DocumentConfig::new(dir.path().join("absent.json")).open(),
        Err(JsonError::Load { .. })
    ));
    assert!(matches!(
        DocumentConfig::new("").open(),
        Err(JsonError::Config(_))
    ));
}
