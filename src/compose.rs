//! Message composition - grouping, ordering, and rendering
//!
//! Pure functions. Given the enriched records, branch names, an output
//! format, and the configured type ordering, produce the final string.
//! Composing twice from identical inputs yields byte-identical output:
//! group order is computed explicitly and within-group order is the record
//! list order.

use crate::types::{IssueRecord, MessageFormat, UNKNOWN};
use std::collections::HashMap;

/// Bucket for records without a resolved issue type
const OTHER_GROUP: &str = "Other";

/// Compose the merge/release summary
///
/// `Plain` renders the commit message (`Merge <source> into <target>` with
/// `##` type headings); `Rich` renders the notification variant
/// (`Release <source> into <target>` with bold headings and hyperlinked
/// keys). Each group ends with a blank separator line.
pub fn compose_message(
    records: &[IssueRecord],
    source: &str,
    target: &str,
    format: MessageFormat,
    type_order: &[String],
) -> String {
    let action = match format {
        MessageFormat::Plain => "Merge",
        MessageFormat::Rich => "Release",
    };
    let mut message = format!("{action} {source} into {target}\n\n");

    for group in group_records(records, type_order) {
        match format {
            MessageFormat::Plain => message.push_str(&format!("## {}\n", group.name)),
            MessageFormat::Rich => message.push_str(&format!("*{}*\n", group.name)),
        }
        for record in group.records {
            message.push_str(&render_line(record, format));
        }
        message.push('\n');
    }

    message
}

struct Group<'a> {
    name: &'a str,
    records: Vec<&'a IssueRecord>,
}

/// Effective group for a record: empty or sentinel types fall into "Other"
fn group_name(record: &IssueRecord) -> &str {
    if record.issue_type.is_empty() || record.issue_type == UNKNOWN {
        OTHER_GROUP
    } else {
        &record.issue_type
    }
}

/// Bucket records by type and fix the emission order: types named in the
/// configured list first, in list order, then remaining types ascending.
fn group_records<'a>(records: &'a [IssueRecord], type_order: &'a [String]) -> Vec<Group<'a>> {
    let mut buckets: HashMap<&str, Vec<&IssueRecord>> = HashMap::new();
    for record in records {
        buckets.entry(group_name(record)).or_default().push(record);
    }

    let mut ordered: Vec<&str> = Vec::new();
    for name in type_order {
        let name = name.as_str();
        if buckets.contains_key(name) && !ordered.contains(&name) {
            ordered.push(name);
        }
    }
    let mut remaining: Vec<&str> = buckets
        .keys()
        .copied()
        .filter(|name| !ordered.contains(name))
        .collect();
    remaining.sort_unstable();
    ordered.extend(remaining);

    ordered
        .into_iter()
        .map(|name| Group {
            name,
            records: buckets.remove(name).unwrap_or_default(),
        })
        .collect()
}

fn render_line(record: &IssueRecord, format: MessageFormat) -> String {
    let key = match format {
        MessageFormat::Plain => record.key.to_string(),
        MessageFormat::Rich => format!("<{}|{}>", record.url, record.key),
    };
    if record.has_summary() {
        format!("- {key}: {}\n", record.summary)
    } else {
        format!("- {key}\n")
    }
}
