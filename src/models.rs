//! Typed `data` payloads for each endpoint.
//!
//! Use with [`ApiResponse::data`](crate::ApiResponse::data). Optional and
//! defaulted fields cover what the API leaves out for private ranges or
//! non-verbose requests.

use serde::{Deserialize, Serialize};

/// `check` response data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckData {
    pub ip_address: String,

    #[serde(default)]
    pub is_public: bool,

    #[serde(default)]
    pub ip_version: Option<u8>,

    #[serde(default)]
    pub is_whitelisted: Option<bool>,

    /// Abuse confidence score (0-100).
    pub abuse_confidence_score: u8,

    #[serde(default)]
    pub country_code: Option<String>,

    /// Only present on verbose requests.
    #[serde(default)]
    pub country_name: Option<String>,

    #[serde(default)]
    pub usage_type: Option<String>,

    #[serde(default)]
    pub isp: Option<String>,

    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub hostnames: Vec<String>,

    #[serde(default)]
    pub is_tor: bool,

    #[serde(default)]
    pub total_reports: u32,

    #[serde(default)]
    pub num_distinct_users: u32,

    #[serde(default)]
    pub last_reported_at: Option<String>,

    /// Individual reports, verbose requests only.
    #[serde(default)]
    pub reports: Vec<CheckReport>,
}

/// One report in a verbose `check` response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub reported_at: String,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub categories: Vec<u8>,

    #[serde(default)]
    pub reporter_id: Option<u64>,

    #[serde(default)]
    pub reporter_country_code: Option<String>,

    #[serde(default)]
    pub reporter_country_name: Option<String>,
}

/// `check-block` response data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckBlockData {
    pub network_address: String,
    pub netmask: String,

    #[serde(default)]
    pub min_address: Option<String>,

    #[serde(default)]
    pub max_address: Option<String>,

    #[serde(default)]
    pub num_possible_hosts: u64,

    #[serde(default)]
    pub address_space_desc: Option<String>,

    #[serde(default)]
    pub reported_address: Vec<ReportedAddress>,
}

/// Address inside a checked block that has reports.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedAddress {
    pub ip_address: String,

    #[serde(default)]
    pub num_reports: u32,

    #[serde(default)]
    pub most_recent_report: Option<String>,

    #[serde(default)]
    pub abuse_confidence_score: u8,

    #[serde(default)]
    pub country_code: Option<String>,
}

/// `report` response data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub ip_address: String,
    pub abuse_confidence_score: u8,
}

/// `bulk-report` response data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReportData {
    pub saved_reports: u32,

    #[serde(default)]
    pub invalid_reports: Vec<InvalidReport>,
}

/// CSV row rejected by `bulk-report`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidReport {
    pub error: String,
    pub input: String,
    pub row_number: u32,
}

/// `clear-address` response data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearAddressData {
    pub num_reports_deleted: u32,
}

/// Entry of the JSON `blacklist` data array.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistEntry {
    pub ip_address: String,

    #[serde(default)]
    pub abuse_confidence_score: u8,

    #[serde(default)]
    pub last_reported_at: Option<String>,

    #[serde(default)]
    pub country_code: Option<String>,
}
