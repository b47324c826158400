//! Plain-text report of matched listings
//!
//! The report is the body of the end-of-run notification. Each record is
//! rendered as a block of labelled fields separated by `\t\n` pairs, followed
//! by a 100 character delimiter line.

use crate::query::QueryTagSet;
use crate::state::JobRecord;

/// Character repeated to build the delimiter line between records
pub const DELIMITER_CHAR: char = ':';

/// Width of the delimiter line
pub const DELIMITER_WIDTH: usize = 100;

/// Field separator used inside a block
const FIELD_BREAK: &str = "\t\n\t\n";

/// Padding placed on both sides of the delimiter line
const DELIMITER_PADDING: &str = "\t\n\t\n\t\n\t\n";

/// Renders all records into a single report
///
/// Blocks appear in the order given, with no sorting or de-duplication.
/// An empty slice renders to an empty string.
///
/// # Example
///
/// ```
/// use job_sift::output::render_report;
///
/// assert_eq!(render_report(&[]), "");
/// ```
pub fn render_report(records: &[JobRecord]) -> String {
    let mut report = String::new();

    for record in records {
        render_block(&mut report, record);
    }

    report
}

/// Appends one record's block to `out`
fn render_block(out: &mut String, record: &JobRecord) {
    out.push_str(&format!("Company: {}{}", record.company(), FIELD_BREAK));
    out.push_str(&format!("Position: {}{}", record.position(), FIELD_BREAK));
    out.push_str(&format!("Tags: {}{}", record.all_tags().join(", "), FIELD_BREAK));
    out.push_str(&format!("Description: {}{}", record.description(), FIELD_BREAK));
    out.push_str(&format!("Url: {}{}", record.source_url(), FIELD_BREAK));
    out.push_str(DELIMITER_PADDING);
    out.push_str(&delimiter_line());
    out.push_str(DELIMITER_PADDING);
}

/// The line separating two record blocks
pub fn delimiter_line() -> String {
    DELIMITER_CHAR.to_string().repeat(DELIMITER_WIDTH)
}

/// Subject line for the notification of a run
pub fn notification_subject(query: &QueryTagSet) -> String {
    format!("Job listings curated by job-sift - query tags: {}", query)
}
