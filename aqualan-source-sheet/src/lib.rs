//! Route table source backed by a CSV route sheet, read from disk or a URL.
//!
//! The sheet has a header row and one row per locality:
//! `locality, Mon, Tue, Wed, Thu, Fri, period`. Weekday cells are ticked with
//! `x`, `1`, `si`, `yes`, `true` or `✓`; the period column holds labels such as
//! `SEMANA A` for biweekly routes and stays blank for weekly ones.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Trim};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use aqualan_core::ports::{PortError, RouteRow, RouteTableSource};

/// Locality column plus the five weekday columns.
const MIN_COLUMNS: usize = 6;

const TRUTHY: [&str; 7] = ["x", "1", "si", "sí", "yes", "true", "✓"];

/// Whether a weekday cell counts as ticked.
#[must_use]
pub fn is_ticked(cell: &str) -> bool {
    let cell = cell.trim().to_lowercase();
    TRUTHY.contains(&cell.as_str())
}

/// `;` when the header row uses it, `,` otherwise.
fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

fn to_row(record: &StringRecord) -> Option<RouteRow> {
    if record.len() < MIN_COLUMNS {
        return None;
    }
    let mut days = [false; 5];
    for (slot, cell) in days.iter_mut().zip(record.iter().skip(1)) {
        *slot = is_ticked(cell);
    }
    Some(RouteRow {
        locality: record.get(0).unwrap_or_default().to_owned(),
        days,
        period: record.get(MIN_COLUMNS).unwrap_or_default().to_owned(),
    })
}

/// Parse a route sheet into raw rows.
///
/// Rows with too few columns are skipped with a warning; rows are otherwise
/// passed through unvalidated so the caller can count rejects.
///
/// # Errors
///
/// Returns [`PortError::Sheet`] when the text has no usable header row.
pub fn parse_sheet(text: &str) -> Result<Vec<RouteRow>, PortError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .delimiter(detect_delimiter(text))
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let columns = reader
        .headers()
        .map_err(|err| PortError::Sheet(err.to_string()))?
        .len();
    if columns < MIN_COLUMNS {
        return Err(PortError::Sheet(format!(
            "expected a locality column and five weekday columns, found {columns} columns"
        )));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        match record {
            Ok(record) => match to_row(&record) {
                Some(row) => rows.push(row),
                None => warn!(line, fields = record.len(), "skipping short route sheet row"),
            },
            Err(err) => warn!(line, error = %err, "skipping unreadable route sheet row"),
        }
    }
    debug!(rows = rows.len(), "route sheet parsed");
    Ok(rows)
}

/// Route sheet stored as a local CSV file.
pub struct FileSheetSource {
    path: PathBuf,
}

impl FileSheetSource {
    /// Source reading `path` on every fetch.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RouteTableSource for FileSheetSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch_rows(&self) -> Result<Vec<RouteRow>, PortError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_sheet(&text)
    }
}

/// Route sheet published as CSV at a URL, e.g. a spreadsheet export link.
pub struct HttpSheetSource {
    client: Client,
    url: String,
}

impl HttpSheetSource {
    /// Source downloading `url` with `client` on every fetch.
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RouteTableSource for HttpSheetSource {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    async fn fetch_rows(&self) -> Result<Vec<RouteRow>, PortError> {
        let text = fetch_text(self.client.get(&self.url)).await?;
        parse_sheet(&text)
    }
}

/// Pick a source for `location`: `http://` and `https://` locations are
/// downloaded, anything else is read as a file path.
#[must_use]
pub fn from_location(location: &str, client: Client) -> Arc<dyn RouteTableSource> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSheetSource::new(client, location))
    } else {
        Arc::new(FileSheetSource::new(location))
    }
}

// Small helper to fetch a text body with status handling.
async fn fetch_text(req: RequestBuilder) -> Result<String, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .text()
        .await
        .map_err(PortError::from)
}
