//! Tests for backend identifier newtypes

use core_kernel::{AdmissionId, CourseId, EnquiryId};
use core_kernel::error::CoreError;

#[test]
fn test_new_keeps_backend_key() {
    let id = CourseId::new("64b7f0c2a1").unwrap();
    assert_eq!(id.as_str(), "64b7f0c2a1");
    assert_eq!(id.to_string(), "64b7f0c2a1");
}

#[test]
fn test_new_trims_whitespace() {
    let id = AdmissionId::new(" 1007 ").unwrap();
    assert_eq!(id.as_str(), "1007");
}

#[test]
fn test_blank_id_is_rejected() {
    let result = EnquiryId::new("");
    assert!(matches!(result, Err(CoreError::BlankIdentifier { entity: "enquiry" })));
}

#[test]
fn test_blank_id_message_names_entity() {
    let err = CourseId::new("  ").unwrap_err();
    assert!(err.to_string().contains("course"));
}

#[test]
fn test_from_str() {
    let id: EnquiryId = "enq-12".parse().unwrap();
    assert_eq!(id.as_ref(), "enq-12");
}

#[test]
fn test_entity_names() {
    assert_eq!(CourseId::entity(), "course");
    assert_eq!(AdmissionId::entity(), "admission");
}

#[test]
fn test_serde_round_trip_is_plain_string() {
    let id = AdmissionId::new("adm-9").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"adm-9\"");

    let back: AdmissionId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn test_ids_are_ordered_and_hashable() {
    use std::collections::BTreeSet;

    let set: BTreeSet<CourseId> = ["b", "a", "b"]
        .iter()
        .map(|s| CourseId::new(*s).unwrap())
        .collect();
    assert_eq!(set.len(), 2);
    assert_eq!(set.iter().next().unwrap().as_str(), "a");
}
