use super::common::*;
use crate::complaints::domain::{Category, ComplaintId, Priority, Status};
use crate::complaints::query::{ComplaintFilter, ComplaintQuery};

#[test]
fn display_id_takes_last_three_characters() {
    assert_eq!(ComplaintId("cmp-000042".to_string()).display(), "#042");
    assert_eq!(ComplaintId("65ba1f0c9d2e".to_string()).display(), "#d2e");
}

#[test]
fn display_id_pads_short_ids_with_zeros() {
    assert_eq!(ComplaintId("ab".to_string()).display(), "#0ab");
    assert_eq!(ComplaintId("7".to_string()).display(), "#007");
}

#[test]
fn empty_filter_builds_the_unrestricted_query() {
    let query = ComplaintFilter::default()
        .into_query()
        .expect("empty filter parses");
    assert_eq!(query, ComplaintQuery::default());
}

#[test]
fn blank_filter_values_are_treated_as_absent() {
    let filter = ComplaintFilter {
        category: Some("   ".to_string()),
        priority: Some(String::new()),
        status: None,
        date: Some("  ".to_string()),
        search: Some(String::new()),
    };
    let query = filter.into_query().expect("blank values parse");
    assert_eq!(query, ComplaintQuery::default());
}

#[test]
fn filter_parses_every_field() {
    let filter = ComplaintFilter {
        category: Some("Billing".to_string()),
        priority: Some("Low".to_string()),
        status: Some("In Progress".to_string()),
        date: Some("2024-01-15".to_string()),
        search: Some("invoice".to_string()),
    };
    let query = filter.into_query().expect("filter parses");
    assert_eq!(query.category, Some(Category::Billing));
    assert_eq!(query.priority, Some(Priority::Low));
    assert_eq!(query.status, Some(Status::InProgress));
    assert_eq!(query.filed_on, Some(day(2024, 1, 15)));
    assert_eq!(query.search.as_deref(), Some("invoice"));
}

#[test]
fn filter_collects_every_unparseable_field() {
    let filter = ComplaintFilter {
        category: Some("Gardening".to_string()),
        priority: Some("ASAP".to_string()),
        status: Some("Done".to_string()),
        date: Some("15/01/2024".to_string()),
        search: None,
    };
    let err = filter.into_query().expect_err("bad filter rejected");
    let fields: Vec<&str> = err.errors.iter().map(|field| field.field).collect();
    assert_eq!(fields, vec!["category", "priority", "status", "date"]);
}

#[test]
fn matches_compares_filing_day_exactly() {
    let complaint = stored_complaint(
        "cmp-000801",
        &reporter(),
        Category::Other,
        Priority::Medium,
        Status::Pending,
        day(2024, 1, 15),
        1,
    );

    let same_day = ComplaintQuery {
        filed_on: Some(day(2024, 1, 15)),
        ..ComplaintQuery::default()
    };
    assert!(same_day.matches(&complaint));

    let next_day = ComplaintQuery {
        filed_on: Some(day(2024, 1, 16)),
        ..ComplaintQuery::default()
    };
    assert!(!next_day.matches(&complaint));
}

#[test]
fn matches_searches_description_case_insensitively() {
    let mut complaint = stored_complaint(
        "cmp-000802",
        &reporter(),
        Category::Technical,
        Priority::High,
        Status::Pending,
        day(2024, 1, 15),
        1,
    );
    complaint.description = "Network DOWN in lab 3".to_string();

    let query = ComplaintQuery {
        search: Some("network down".to_string()),
        ..ComplaintQuery::default()
    };
    assert!(query.matches(&complaint));

    let miss = ComplaintQuery {
        search: Some("printer".to_string()),
        ..ComplaintQuery::default()
    };
    assert!(!miss.matches(&complaint));
}

#[test]
fn matches_enforces_owner_scope() {
    let complaint = stored_complaint(
        "cmp-000803",
        &reporter(),
        Category::Service,
        Priority::Low,
        Status::Pending,
        day(2024, 1, 15),
        1,
    );

    assert!(ComplaintQuery::for_owner(reporter().id).matches(&complaint));
    assert!(!ComplaintQuery::for_owner(outsider().id).matches(&complaint));
}
