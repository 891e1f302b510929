//! Client library for the AbuseIPDB API v2.
//!
//! Report abusive IP addresses, query the abuse history of an address or
//! a network, fetch the blacklist, upload bulk reports and clear your own
//! reports.
//!
//! # Features
//!
//! - **Input validation** - Arguments are checked before any request is sent
//! - **Report categories** - Ids or short names, with the "can't be used alone" rule enforced
//! - **Message scrubbing** - Backslashes, self identifiers and email addresses are removed from comments
//! - **Uniform responses** - Every call returns an [`ApiResponse`] with plaintext, JSON and error views
//! - **Quiet mode** - [`QuietClient`] turns every failure into an error response
//!
//! # Example Configuration
//!
//! ```yaml
//! api_key: "${ABUSEIPDB_API_KEY}"
//! self_identifiers:
//!   - "203.0.113.10"
//!   - "mail.example.org"
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use abuseipdb_client::{AbuseIpdbClient, ClientConfig};
//!
//! # async fn run() -> abuseipdb_client::Result<()> {
//! let client = AbuseIpdbClient::new(ClientConfig::new("my-key", vec![]))?;
//! let response = client.check("118.25.6.39", 90, false).await?;
//! if !response.has_error() {
//!     println!("{}", response.plaintext());
//! }
//! # Ok(())
//! # }
//! ```

pub mod categories;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod quiet;
pub mod response;
pub mod sanitizer;
pub mod transport;

pub use categories::{resolve_report_categories, Category};
pub use client::AbuseIpdbClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use quiet::{quiet, QuietClient};
pub use response::{ApiError, ApiResponse};
pub use sanitizer::sanitize;
pub use transport::{HttpTransport, Transport};
