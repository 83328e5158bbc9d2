use super::domain::{Complaint, UserProfile};

/// Fixed column set of the export table, in output order.
pub const EXPORT_HEADERS: [&str; 8] = [
    "Complaint ID",
    "Category",
    "Description",
    "Priority",
    "Status",
    "Date",
    "User Name",
    "User Email",
];

/// Placeholder for user fields the directory could not resolve.
const MISSING_FIELD: &str = "N/A";

/// One export line: the complaint plus the owner profile when the directory
/// resolved one.
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub complaint: Complaint,
    pub owner: Option<UserProfile>,
}

/// CSV writer failure.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer error: {0}")]
    Buffer(#[from] std::io::Error),
    #[error("export produced invalid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render complaints as a flat CSV table, one single-line row per record in
/// input order. Commas inside the description become semicolons and newlines
/// become spaces; no quoting is applied beyond that, so a substituted
/// semicolon is indistinguishable from an original one.
pub fn to_csv(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(&mut buffer);

        writer.write_record(EXPORT_HEADERS)?;
        for row in rows {
            let complaint = &row.complaint;
            let display_id = complaint.id.display();
            let description = complaint.description.replace(',', ";").replace('\n', " ");
            let date = complaint.date.format("%Y-%m-%d").to_string();
            let (name, email) = match &row.owner {
                Some(profile) => (profile.name.as_str(), profile.email.as_str()),
                None => (MISSING_FIELD, MISSING_FIELD),
            };

            writer.write_record([
                display_id.as_str(),
                complaint.category.label(),
                description.as_str(),
                complaint.priority.label(),
                complaint.status.label(),
                date.as_str(),
                name,
                email,
            ])?;
        }
        writer.flush()?;
    }

    Ok(String::from_utf8(buffer)?)
}
