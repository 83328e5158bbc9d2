use super::common::*;
use crate::complaints::domain::{Category, Priority, Status};
use crate::complaints::export::{to_csv, ExportRow, EXPORT_HEADERS};

fn row(id: &str, description: &str, with_owner: bool) -> ExportRow {
    let mut complaint = stored_complaint(
        id,
        &reporter(),
        Category::Technical,
        Priority::High,
        Status::Pending,
        day(2024, 1, 15),
        1,
    );
    complaint.description = description.to_string();
    ExportRow {
        complaint,
        owner: with_owner.then(|| profile_for(&reporter(), "Rita Reporter")),
    }
}

#[test]
fn header_row_matches_the_fixed_column_set() {
    let csv = to_csv(&[]).expect("empty export renders");
    assert_eq!(
        csv.lines().next(),
        Some(EXPORT_HEADERS.join(",").as_str())
    );
}

#[test]
fn renders_one_row_per_complaint_in_input_order() {
    let rows = [
        row("cmp-001001", "First complaint description", true),
        row("cmp-001002", "Second complaint description", true),
        row("cmp-001003", "Third complaint description", true),
    ];
    let csv = to_csv(&rows).expect("export renders");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 1 + rows.len());
    assert!(lines[1].starts_with("#001,"));
    assert!(lines[2].starts_with("#002,"));
    assert!(lines[3].starts_with("#003,"));
}

#[test]
fn sanitizes_commas_and_newlines_in_descriptions() {
    let rows = [row(
        "cmp-001004",
        "Printer jams, smokes,\nand beeps loudly",
        true,
    )];
    let csv = to_csv(&rows).expect("export renders");
    let line = csv.lines().nth(1).expect("data row present");
    assert!(line.contains("Printer jams; smokes; and beeps loudly"));
    assert_eq!(csv.lines().count(), 2, "row must stay on a single line");
}

#[test]
fn renders_full_field_set_for_a_row() {
    let rows = [row("cmp-001005", "Escalator stuck on floor two", true)];
    let csv = to_csv(&rows).expect("export renders");
    let line = csv.lines().nth(1).expect("data row present");
    assert_eq!(
        line,
        "#005,Technical,Escalator stuck on floor two,High,Pending,2024-01-15,\
         Rita Reporter,rita.reporter@example.net"
    );
}

#[test]
fn missing_owner_fields_render_as_na() {
    let rows = [row("cmp-001006", "Orphaned complaint description", false)];
    let csv = to_csv(&rows).expect("export renders");
    let line = csv.lines().nth(1).expect("data row present");
    assert!(line.ends_with(",N/A,N/A"));
}
