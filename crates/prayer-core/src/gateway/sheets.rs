//! Remote spreadsheet backend over the Google Sheets v4 / Drive v3 REST APIs.
//!
//! Credential plumbing is external: the client is handed a bearer token
//! through the environment variable named in [`SheetsConfig::token_env`].

use crate::config::SheetsConfig;
use crate::error::PersistError;
use regex::Regex;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

const SHARED_URL_MARKER: &str = "docs.google.com/spreadsheets";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Sheet identifiers
// ---------------------------------------------------------------------------

/// How a spreadsheet is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    /// Spreadsheet key (the ID in sharing URLs).
    Key(String),
    /// Spreadsheet title, looked up by exact name.
    Title(String),
}

static URL_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn url_key_re() -> &'static Regex {
    URL_KEY_RE.get_or_init(|| Regex::new(r"/d/([a-zA-Z0-9\-_]+)").expect("static regex"))
}

/// Resolve a raw identifier: a sharing URL, a bare key (longer than 30
/// characters and containing `-`), or otherwise a title.
pub fn resolve_sheet(identifier: &str) -> Result<SheetRef, PersistError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(PersistError::UnresolvableSheet(identifier.to_string()));
    }
    if identifier.contains(SHARED_URL_MARKER) {
        return url_key_re()
            .captures(identifier)
            .and_then(|c| c.get(1))
            .map(|m| SheetRef::Key(m.as_str().to_string()))
            .ok_or_else(|| PersistError::UnresolvableSheet(identifier.to_string()));
    }
    if identifier.chars().count() > 30 && identifier.contains('-') {
        return Ok(SheetRef::Key(identifier.to_string()));
    }
    Ok(SheetRef::Title(identifier.to_string()))
}

// ---------------------------------------------------------------------------
// SheetService
// ---------------------------------------------------------------------------

/// Read and full-replace access to the first worksheet of a spreadsheet.
pub trait SheetService: Send {
    /// All cell values of the first worksheet as formatted strings, row-major.
    fn fetch_values(&self, sheet: &SheetRef) -> Result<Vec<Vec<String>>, PersistError>;

    /// Clear the first worksheet, then write `rows` starting at `A1`.
    fn replace_values(&self, sheet: &SheetRef, rows: &[Vec<String>]) -> Result<(), PersistError>;
}

// ---------------------------------------------------------------------------
// SheetsClient
// ---------------------------------------------------------------------------

pub struct SheetsClient {
    http: Client,
    token: Option<String>,
    token_env: String,
    sheets_api: String,
    drive_api: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    /// Build a client reading its token from the configured env var. A
    /// missing token is reported per request as
    /// [`PersistError::MissingCredentials`].
    pub fn from_config(config: &SheetsConfig) -> Result<Self, PersistError> {
        Self::new(config, config.token())
    }

    pub fn new(config: &SheetsConfig, token: Option<String>) -> Result<Self, PersistError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(PersistError::from)?;
        Ok(Self {
            http,
            token,
            token_env: config.token_env.clone(),
            sheets_api: config.sheets_api.clone(),
            drive_api: config.drive_api.clone(),
        })
    }

    fn token(&self) -> Result<&str, PersistError> {
        self.token
            .as_deref()
            .ok_or_else(|| PersistError::MissingCredentials(self.token_env.clone()))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, PersistError> {
        let response = request.bearer_auth(self.token()?).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().unwrap_or_default();
        Err(PersistError::Remote {
            status: status.as_u16(),
            message: message.trim().to_string(),
        })
    }

    /// Resolve a [`SheetRef`] to a spreadsheet key.
    fn key(&self, sheet: &SheetRef) -> Result<String, PersistError> {
        match sheet {
            SheetRef::Key(key) => Ok(key.clone()),
            SheetRef::Title(title) => self.find_by_title(title),
        }
    }

    fn find_by_title(&self, title: &str) -> Result<String, PersistError> {
        let url = endpoint(&self.drive_api, &["drive", "v3", "files"])?;
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
            title.replace('\\', "\\\\").replace('\'', "\\'")
        );
        let list: FileList = self
            .send(self.http.get(url).query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("pageSize", "1"),
            ]))?
            .json()?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| PersistError::SheetNotFound(title.to_string()))
    }

    fn first_sheet_title(&self, key: &str) -> Result<String, PersistError> {
        let url = endpoint(&self.sheets_api, &["v4", "spreadsheets", key])?;
        let meta: SpreadsheetMeta = self
            .send(
                self.http
                    .get(url)
                    .query(&[("fields", "sheets.properties.title")]),
            )?
            .json()?;
        meta.sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| PersistError::UnresolvableSheet(key.to_string()))
    }
}

impl SheetService for SheetsClient {
    fn fetch_values(&self, sheet: &SheetRef) -> Result<Vec<Vec<String>>, PersistError> {
        let key = self.key(sheet)?;
        let range = a1_sheet(&self.first_sheet_title(&key)?);
        let url = endpoint(&self.sheets_api, &["v4", "spreadsheets", &key, "values", &range])?;
        let values: ValueRange = self.send(self.http.get(url))?.json()?;
        tracing::debug!(key = %key, rows = values.values.len(), "fetched remote sheet");
        Ok(values.values)
    }

    fn replace_values(&self, sheet: &SheetRef, rows: &[Vec<String>]) -> Result<(), PersistError> {
        let key = self.key(sheet)?;
        let range = a1_sheet(&self.first_sheet_title(&key)?);

        let clear = endpoint(
            &self.sheets_api,
            &["v4", "spreadsheets", &key, "values", &format!("{range}:clear")],
        )?;
        self.send(self.http.post(clear).json(&serde_json::json!({})))?;

        let origin = format!("{range}!A1");
        let update = endpoint(&self.sheets_api, &["v4", "spreadsheets", &key, "values", &origin])?;
        self.send(
            self.http
                .put(update)
                .query(&[("valueInputOption", "RAW")])
                .json(&serde_json::json!({
                    "range": origin,
                    "majorDimension": "ROWS",
                    "values": rows,
                })),
        )?;
        tracing::debug!(key = %key, rows = rows.len(), "replaced remote sheet");
        Ok(())
    }
}

/// Quote a worksheet title for A1 notation.
fn a1_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn endpoint(base: &str, segments: &[&str]) -> Result<Url, PersistError> {
    let mut url =
        Url::parse(base).map_err(|e| PersistError::Transport(format!("bad base url {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| PersistError::Transport(format!("bad base url {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
