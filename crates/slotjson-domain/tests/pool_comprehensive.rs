//! Comprehensive tests for the memory pool and document lifecycle
//!
//! Covers:
//! - The three construction modes (unbacked, fixed, growable)
//! - Capacity accounting and the capacity formula
//! - Sticky overflow and no-op degradation of failed operations
//! - String storage policy and deduplication
//! - Constant-time clear and handle invalidation

use slotjson_domain::{
    JsonDocument, Linked, MemoryPool, PoolMode, SLOT_SIZE, StringStoragePolicy, json_array_size,
    json_object_size, json_string_size, storage_policy,
};

// === Construction Modes ===

#[test]
fn test_unbacked_document_reports_overflow() {
    let mut doc = JsonDocument::unbacked();
    assert_eq!(doc.capacity(), 0);
    assert!(doc.to_array().add_element().is_none());
    assert!(doc.overflowed());
    assert_eq!(doc.size(), 0);
}

#[test]
fn test_fixed_document_accepts_exact_fit() {
    let mut doc = JsonDocument::fixed(json_array_size(3));
    let mut array = doc.to_array();
    assert!(array.add(1_i32));
    assert!(array.add(2_i32));
    assert!(array.add(3_i32));
    assert!(!array.add(4_i32));

    assert_eq!(doc.size(), 3);
    assert!(doc.overflowed());
    assert_eq!(doc.memory_usage(), json_array_size(3));
}

#[test]
fn test_growable_document_grows_until_limit() {
    let limit = json_array_size(40);
    let mut doc = JsonDocument::growable(SLOT_SIZE, limit);
    let mut array = doc.to_array();
    let mut added = 0;
    while array.add(added) {
        added += 1;
    }
    assert_eq!(added, 40);
    assert_eq!(doc.capacity(), limit);
    assert!(doc.overflowed());
}

#[test]
fn test_dynamic_document_shrinks_to_usage() {
    let mut doc = JsonDocument::dynamic(4096);
    doc.to_array().add(true);
    doc.shrink_to_fit();
    assert_eq!(doc.capacity(), doc.memory_usage());
    assert_eq!(doc.pool().mode(), PoolMode::Growable { limit: None });
}

#[test]
fn test_default_document_is_dynamic() {
    let doc = JsonDocument::default();
    assert!(doc.capacity() >= slotjson_domain::DEFAULT_DOCUMENT_CAPACITY);
    assert!(doc.is_null());
}

// === Capacity Formula ===

#[test]
fn test_object_usage_matches_formula() {
    let mut doc = JsonDocument::fixed(1024);
    let mut object = doc.to_object();
    object.insert(Linked("a"), 1_u8);
    object.insert(Linked("b"), 2_u8);
    assert_eq!(doc.memory_usage(), json_object_size(2));
}

#[test]
fn test_copied_key_adds_string_size() {
    let mut doc = JsonDocument::fixed(1024);
    let key = String::from("name");
    doc.to_object().insert(key.as_str(), false);
    assert_eq!(
        doc.memory_usage(),
        json_object_size(1) + json_string_size(key.len())
    );
}

#[test]
fn test_formula_is_independent_of_value_kind() {
    let mut ints = JsonDocument::fixed(1024);
    let mut floats = JsonDocument::fixed(1024);
    ints.set(vec![1_i64, 2, 3]);
    floats.set(vec![1.5_f64, 2.5, 3.5]);
    assert_eq!(ints.memory_usage(), floats.memory_usage());
    assert_eq!(ints.memory_usage(), json_array_size(3));
}

// === Overflow Degradation ===

#[test]
fn test_failed_string_store_keeps_previous_value() {
    let mut doc = JsonDocument::fixed(json_object_size(1));
    let mut object = doc.to_object();
    assert!(object.insert(Linked("k"), 5_i32));
    assert!(!object.insert(Linked("k"), String::from("too long for the pool")));
    assert_eq!(doc.member("k").as_value::<i32>(), 5);
    assert!(doc.overflowed());
}

#[test]
fn test_failed_insert_adds_no_member() {
    let mut doc = JsonDocument::fixed(json_object_size(2));
    let mut object = doc.to_object();
    assert!(object.insert(Linked("a"), 1_i32));
    assert!(!object.insert(Linked("b"), String::from("xyz".repeat(40))));
    assert_eq!(doc.size(), 1);
    assert!(!doc.contains_key("b"));
}

#[test]
fn test_overflow_flag_survives_later_success() {
    let mut doc = JsonDocument::fixed(json_array_size(1));
    let mut array = doc.to_array();
    assert!(array.add(1_i32));
    assert!(!array.add(2_i32));
    array.element_mut(0).unwrap().set(9_i32);
    assert!(doc.overflowed());
}

// === String Storage Policy ===

#[test]
fn test_policy_selection_by_type() {
    assert_eq!(storage_policy("x"), StringStoragePolicy::Copy);
    assert_eq!(storage_policy(&String::from("x")), StringStoragePolicy::Copy);
    assert_eq!(storage_policy(&Linked("x")), StringStoragePolicy::Link);
}

#[test]
fn test_linked_strings_consume_no_capacity() {
    let mut doc = JsonDocument::fixed(json_array_size(1));
    assert!(doc.to_array().add_string(&Linked("a long literal that would not fit")));
    assert!(!doc.overflowed());
    assert!(doc.element(0).is_linked_string());
}

#[test]
fn test_linked_string_borrows_caller_buffer() {
    let buffer = String::from("borrowed");
    let mut doc = JsonDocument::fixed(256);
    doc.set_string(&Linked(buffer.as_str()));
    assert_eq!(doc.root().as_str(), Some("borrowed"));
    assert_eq!(doc.memory_usage(), 0);
}

#[test]
fn test_identical_copies_are_stored_once() {
    let mut doc = JsonDocument::fixed(1024);
    let mut array = doc.to_array();
    for _ in 0..5 {
        array.add_string("repeated");
    }
    assert_eq!(
        doc.memory_usage(),
        json_array_size(5) + json_string_size("repeated".len())
    );
}

#[test]
fn test_deduplication_disabled_pool() {
    let mut doc = JsonDocument::with_pool(MemoryPool::fixed(1024).with_deduplication(false));
    let mut array = doc.to_array();
    array.add_string("dup");
    array.add_string("dup");
    assert_eq!(doc.memory_usage(), json_array_size(2) + 6);
}

// === Clear ===

#[test]
fn test_clear_resets_to_baseline() {
    let mut doc = JsonDocument::fixed(json_array_size(2));
    let mut array = doc.to_array();
    array.add_string("abc");
    array.add(1_u8);
    array.add(2_u8);
    assert!(doc.overflowed());

    doc.clear();
    assert!(doc.is_null());
    assert_eq!(doc.size(), 0);
    assert_eq!(doc.memory_usage(), 0);
    assert!(!doc.overflowed());

    // rebuildable from empty
    let mut array = doc.to_array();
    assert!(array.add(1_u8));
    assert!(array.add(2_u8));
    assert_eq!(doc.size(), 2);
}

#[test]
fn test_clear_invalidates_handles() {
    let mut doc = JsonDocument::fixed(256);
    let handle = doc.to_array().add_element().unwrap().handle();
    let generation = doc.pool().generation();
    doc.clear();
    assert_eq!(doc.pool().generation(), generation + 1);
    assert!(doc.node(handle).is_none());
}

#[test]
fn test_pool_offsets_track_both_ends() {
    let mut doc = JsonDocument::fixed(json_array_size(1) + 8);
    doc.to_array().add_string("four");
    let pool = doc.pool();
    assert_eq!(pool.slot_offset(), SLOT_SIZE);
    assert_eq!(pool.string_offset(), pool.capacity() - 4);
    assert!(pool.slot_offset() <= pool.string_offset());
}
