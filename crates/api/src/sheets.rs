//! Catalog import from an online spreadsheet.
//!
//! The spreadsheet service exports any sheet tab as CSV at
//! `{base}/spreadsheets/d/{id}/export?format=csv&gid={gid}`. The sheet must be
//! shared so that anyone with the link can view it.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use skudesk_core::error::CoreError;
use skudesk_core::import::parse_csv;

use crate::error::AppError;

static SHEET_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("valid regex")
});
static GID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#&?]gid=(\d+)").expect("valid regex"));
static SHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

/// Tab exported when neither the URL nor the request names one.
pub const DEFAULT_GID: &str = "0";

const FETCH_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("Spreadsheet request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Spreadsheet service returned HTTP {0}")]
    Status(u16),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<SheetsError> for AppError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Core(core) => AppError::Core(core),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// A specific tab of a specific spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub id: String,
    pub gid: String,
}

impl SheetRef {
    /// Parse a sheet reference from a share URL or a bare spreadsheet id.
    ///
    /// An explicit `gid` wins over one found in the URL.
    pub fn parse(input: &str, gid: Option<&str>) -> Result<Self, CoreError> {
        let input = input.trim();

        let id = match SHEET_URL_RE.captures(input) {
            Some(caps) => caps[1].to_string(),
            None if SHEET_ID_RE.is_match(input) => input.to_string(),
            None => {
                return Err(CoreError::Validation(format!(
                    "Not a spreadsheet URL or id: '{input}'"
                )))
            }
        };

        let gid = match gid.map(str::trim).filter(|g| !g.is_empty()) {
            Some(g) if g.chars().all(|c| c.is_ascii_digit()) => g.to_string(),
            Some(g) => {
                return Err(CoreError::Validation(format!("Invalid sheet gid '{g}'")));
            }
            None => GID_RE
                .captures(input)
                .map(|caps| caps[1].to_string())
                .unwrap_or_else(|| DEFAULT_GID.to_string()),
        };

        Ok(Self { id, gid })
    }
}

/// HTTP client for the spreadsheet CSV export endpoint.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
}

impl SheetsClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn export_url(&self, sheet: &SheetRef) -> String {
        format!(
            "{}/spreadsheets/d/{}/export?format=csv&gid={}",
            self.base_url, sheet.id, sheet.gid
        )
    }

    /// Download the sheet as CSV and split it into rows.
    pub async fn fetch_rows(&self, sheet: &SheetRef) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.export_url(sheet);
        tracing::info!(sheet_id = %sheet.id, gid = %sheet.gid, "Fetching spreadsheet");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(sheet_id = %sheet.id, status = status.as_u16(), "Spreadsheet fetch rejected");
            return Err(SheetsError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(parse_csv(&body)?)
    }
}
