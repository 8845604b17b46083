//! Inbound request validation
//!
//! Pure body-shape checks for the two submission kinds. Bodies that fail
//! here are rejected at the proxy with a stable machine code and never
//! reach the upstream backend. The legacy-header expansion is a data
//! transform stage that runs after validation succeeds and before
//! forwarding, not a special case inside the handlers.

use crate::error::ValidationError;
use serde_json::Value;

/// Canonical three-column header for outreach-message CSV submissions
pub const CANONICAL_HEADER: &str = "userName,userLink,directMessage";

/// Legacy two-column header; accepted and auto-expanded to the canonical form
pub const LEGACY_HEADER: &str = "userName,userLink";

/// Maximum number of data rows per submission
pub const MAX_DATA_ROWS: usize = 300;

/// A validated outreach CSV, ready to forward upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachCsv {
    /// Body to forward (header-expanded when the legacy form was submitted)
    pub body: String,
    /// Number of non-blank data rows
    pub data_rows: usize,
    /// Whether the legacy two-column header was expanded
    pub expanded: bool,
}

/// Validates an outreach-message CSV submission
///
/// A leading byte-order mark is stripped, lines may end in LF or CRLF, and
/// the first line must be exactly one of the two accepted headers after
/// trimming. Between 1 and [`MAX_DATA_ROWS`] non-blank data rows must
/// follow. On the legacy-header path the returned body carries the
/// expansion transform; otherwise the (BOM-stripped) input is returned
/// unchanged.
pub fn validate_outreach_csv(raw: &str) -> Result<OutreachCsv, ValidationError> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = text.split('\n');
    let header = lines.next().unwrap_or("").trim();
    let expanded = match header {
        CANONICAL_HEADER => false,
        LEGACY_HEADER => true,
        _ => return Err(ValidationError::InvalidHeader),
    };

    let data_rows = lines.filter(|line| !line.trim().is_empty()).count();
    if data_rows == 0 {
        return Err(ValidationError::EmptyRows);
    }
    if data_rows > MAX_DATA_ROWS {
        return Err(ValidationError::TooManyRows {
            count: data_rows,
            limit: MAX_DATA_ROWS,
        });
    }

    let body = if expanded {
        expand_legacy_rows(text)
    } else {
        text.to_string()
    };

    Ok(OutreachCsv {
        body,
        data_rows,
        expanded,
    })
}

/// Rewrites the legacy header to the canonical form and appends a trailing
/// empty field to every non-blank data row, so each row ends with a
/// separator. Blank lines and CRLF endings pass through unchanged.
fn expand_legacy_rows(text: &str) -> String {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                with_line_ending_of(CANONICAL_HEADER, line)
            } else if line.trim().is_empty() {
                line.to_string()
            } else {
                append_empty_field(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Carries a trailing carriage return from `original` onto `content`
fn with_line_ending_of(content: &str, original: &str) -> String {
    if original.ends_with('\r') {
        format!("{content}\r")
    } else {
        content.to_string()
    }
}

fn append_empty_field(line: &str) -> String {
    match line.strip_suffix('\r') {
        Some(row) => format!("{row},\r"),
        None => format!("{line},"),
    }
}

/// Validates a lead-discovery submission
///
/// The body must decode as a JSON object with a non-empty `seedUserNames`
/// array of non-blank strings. An optional `filters` member must be an
/// object; its contents are not inspected and travel to the upstream
/// verbatim. Returns the parsed object so the handler forwards a
/// re-serialized copy of exactly what was validated.
pub fn validate_leads(raw: &str) -> Result<Value, ValidationError> {
    let payload: Value =
        serde_json::from_str(raw).map_err(|_| ValidationError::InvalidJson)?;
    if !payload.is_object() {
        return Err(ValidationError::InvalidJson);
    }

    let seeds = payload
        .get("seedUserNames")
        .and_then(Value::as_array)
        .ok_or(ValidationError::InvalidSeed)?;
    if seeds.is_empty() {
        return Err(ValidationError::InvalidSeed);
    }
    for (index, seed) in seeds.iter().enumerate() {
        match seed.as_str() {
            Some(name) if !name.trim().is_empty() => {}
            _ => return Err(ValidationError::InvalidSeedItem { index }),
        }
    }

    if let Some(filters) = payload.get("filters")
        && !filters.is_object()
    {
        return Err(ValidationError::InvalidFilters);
    }

    Ok(payload)
}
