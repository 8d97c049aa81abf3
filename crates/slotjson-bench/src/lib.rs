//! slotjson benchmarking suite
//!
//! Shared payloads for the criterion benches.

use slotjson::{JsonDocument, ObjectRef};

pub use slotjson::{Error, Result};

/// Small flat object
pub const SMALL_JSON: &str = r#"{"id": 1, "name": "test", "status": "active"}"#;

/// Nested object with arrays
pub const MEDIUM_JSON: &str = r#"{
  "user": {
    "id": 12345,
    "name": "John Doe",
    "email": "john.doe@example.com",
    "status": "active",
    "profile": {
      "bio": "Software engineer",
      "location": "San Francisco",
      "company": "TechCorp"
    },
    "posts": [
      {"id": 1, "title": "Hello World", "likes": 25},
      {"id": 2, "title": "Tech Tips", "likes": 42}
    ]
  }
}"#;

/// Catalog of `count` items as JSON text
pub fn generate_catalog_json(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"id":{},"name":"Item {}","price":{:.2},"active":{},"tags":["tag1","tag2","tag3"]}}"#,
                i,
                i,
                i as f64 * 1.5 + 10.0,
                i % 2 == 0
            )
        })
        .collect();
    format!(r#"{{"data":[{}],"total":{}}}"#, items.join(","), count)
}

/// Build the catalog of `count` items directly in `doc`
///
/// Returns whether everything fit.
pub fn build_catalog(doc: &mut JsonDocument<'_>, count: usize) -> bool {
    let mut root = doc.to_object();
    let Some(mut data) = root.create_nested_array("data") else {
        return false;
    };
    for i in 0..count {
        let Some(mut item) = data.add_element() else {
            return false;
        };
        let mut item = item.to_object();
        if !fill_item(&mut item, i) {
            return false;
        }
    }
    root.insert("total", count as u64)
}

fn fill_item(item: &mut ObjectRef<'_, '_>, i: usize) -> bool {
    let Some(mut tags) = item.create_nested_array("tags") else {
        return false;
    };
    let tagged = ["tag1", "tag2", "tag3"]
        .into_iter()
        .all(|tag| tags.add(String::from(tag)));
    tagged
        && item.insert("id", i as u64)
        && item.insert("name", format!("Item {i}"))
        && item.insert("price", i as f64 * 1.5 + 10.0)
        && item.insert("active", i % 2 == 0)
}
