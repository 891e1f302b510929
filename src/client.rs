//! AbuseIPDB API v2 client.

use crate::categories::{self, Category};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::quiet::QuietClient;
use crate::response::ApiResponse;
use crate::sanitizer;
use crate::transport::{ApiRequest, HttpTransport, Method, RequestBody, Transport};
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

/// AbuseIPDB API v2 endpoint.
pub const API_ENDPOINT: &str = "https://api.abuseipdb.com/api/v2/";

/// Default `maxAgeInDays` for `check` and `check-block`.
pub const DEFAULT_MAX_AGE_IN_DAYS: u32 = 30;

/// Upper bound accepted by the API for `maxAgeInDays`.
pub const MAX_AGE_IN_DAYS_LIMIT: u32 = 365;

/// Default `limit` for `blacklist`.
pub const DEFAULT_BLACKLIST_LIMIT: u32 = 10_000;

/// Default `confidenceMinimum` for `blacklist`.
pub const DEFAULT_CONFIDENCE_MINIMUM: u8 = 100;

/// Client for the AbuseIPDB API.
///
/// Every operation checks its arguments before anything is sent and
/// raises on bad input. Once a request is sent, transport failures and
/// API errors come back as data: an empty [`ApiResponse`] or one whose
/// [`has_error`](ApiResponse::has_error) is true.
pub struct AbuseIpdbClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl AbuseIpdbClient<HttpTransport> {
    /// Create a client over the default HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client from a configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = ClientConfig::load(path.as_ref())?;
        Ok(Self::new(config)?)
    }
}

impl<T: Transport> AbuseIpdbClient<T> {
    /// Create a client over any transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Report categories known to the API.
    pub fn categories(&self) -> &'static [Category] {
        categories::list_categories()
    }

    /// Wrap this client so that every operation returns an [`ApiResponse`].
    pub fn quiet(self) -> QuietClient<T> {
        QuietClient::new(self)
    }

    /// Report an abusive IP address.
    ///
    /// `categories` is a comma separated list of ids or short names; the
    /// message is scrubbed of self identifiers and email addresses.
    pub async fn report(&self, ip: &str, categories: &str, message: &str) -> Result<ApiResponse> {
        require(ip, "Ip was empty")?;
        require(categories, "categories list was empty")?;
        require(message, "report message was empty")?;

        let categories = categories::resolve_report_categories(categories)?;
        let comment = sanitizer::sanitize(message, &self.config.self_identifiers);

        let params = vec![
            ("ip", ip.to_string()),
            ("categories", categories),
            ("comment", comment),
        ];

        self.execute("report", &params, Method::Post, None).await
    }

    /// Upload a CSV file of reports.
    pub async fn bulk_report(&self, path: impl AsRef<Path>) -> Result<ApiResponse> {
        let path = path.as_ref();
        ensure_readable(path).await?;

        self.execute("bulk-report", &[], Method::Post, Some(path))
            .await
    }

    /// Remove our own reports for an IP address.
    pub async fn clear_address(&self, ip: &str) -> Result<ApiResponse> {
        require(ip, "ip argument must be set (empty given)")?;

        let params = vec![("ipAddress", ip.to_string())];
        self.execute("clear-address", &params, Method::Delete, None)
            .await
    }

    /// Query the abuse history of an IP address.
    pub async fn check(&self, ip: &str, max_age_in_days: u32, verbose: bool) -> Result<ApiResponse> {
        check_max_age(max_age_in_days)?;
        require(ip, "ip argument must be set (empty given)")?;

        let mut params = vec![
            ("ipAddress", ip.to_string()),
            ("maxAgeInDays", max_age_in_days.to_string()),
        ];
        if verbose {
            params.push(("verbose", "true".to_string()));
        }

        self.execute("check", &params, Method::Get, None).await
    }

    /// Query reported addresses inside a network, e.g. `127.0.0.1/24`.
    pub async fn check_block(&self, network: &str, max_age_in_days: u32) -> Result<ApiResponse> {
        check_max_age(max_age_in_days)?;
        require(network, "network argument must be set (empty given)")?;

        let params = vec![
            ("network", network.to_string()),
            ("maxAgeInDays", max_age_in_days.to_string()),
        ];

        self.execute("check-block", &params, Method::Get, None)
            .await
    }

    /// Fetch the blacklist.
    ///
    /// With `plain_text` the body is a newline separated address list, so
    /// only [`ApiResponse::plaintext`] is meaningful. The API accepts a
    /// `confidence_minimum` between 25 and 100; other values are left for
    /// it to reject.
    pub async fn blacklist(
        &self,
        limit: u32,
        plain_text: bool,
        confidence_minimum: u8,
    ) -> Result<ApiResponse> {
        if limit < 1 {
            return Err(Error::InvalidArgument(format!(
                "limit must be at least 1 ({} was given)",
                limit
            )));
        }

        let mut params = vec![
            ("confidenceMinimum", confidence_minimum.to_string()),
            ("limit", limit.to_string()),
        ];
        // the API reads any plaintext value as true, so only send it when set
        if plain_text {
            params.push(("plaintext", "true".to_string()));
        }

        self.execute("blacklist", &params, Method::Get, None).await
    }

    /// Build and send one API request.
    ///
    /// GET and DELETE parameters go in the query string, POST parameters
    /// in a form body. With `upload`, the body is the file as a multipart
    /// `csv` field and `params` is ignored; uploads require `Method::Post`.
    /// `path` is appended to [`API_ENDPOINT`], leading slashes dropped.
    /// A transport failure yields an empty response instead of an error.
    pub async fn execute(
        &self,
        path: &str,
        params: &[(&str, String)],
        method: Method,
        upload: Option<&Path>,
    ) -> Result<ApiResponse> {
        let mut url = Url::parse(&format!(
            "{}{}",
            API_ENDPOINT,
            path.trim_start_matches('/')
        ))?;

        let body = match (method, upload) {
            (Method::Post, Some(file)) => read_csv_upload(file).await?,
            (Method::Get | Method::Delete, Some(_)) => {
                return Err(Error::InvalidArgument(format!(
                    "file upload requires POST ({} was given)",
                    method
                )));
            }
            (Method::Post, None) => RequestBody::Form(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            ),
            (Method::Get | Method::Delete, None) => {
                if !params.is_empty() {
                    url.query_pairs_mut()
                        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
                }
                RequestBody::Empty
            }
        };

        let request = ApiRequest {
            method,
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Key".to_string(), self.config.api_key.clone()),
            ],
            body,
        };

        debug!(endpoint = %path, method = %method, "Sending AbuseIPDB request");

        match self.transport.send(request).await {
            Ok(text) => Ok(ApiResponse::new(text)),
            Err(e) => {
                warn!(endpoint = %path, error = %e, "AbuseIPDB request failed");
                Ok(ApiResponse::empty())
            }
        }
    }
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::InvalidArgument(message.to_string()))
    } else {
        Ok(())
    }
}

fn check_max_age(max_age_in_days: u32) -> Result<()> {
    if !(1..=MAX_AGE_IN_DAYS_LIMIT).contains(&max_age_in_days) {
        return Err(Error::InvalidArgument(format!(
            "maxAge must be between 1 and {} ({} was given)",
            MAX_AGE_IN_DAYS_LIMIT, max_age_in_days
        )));
    }
    Ok(())
}

/// Fail with `FileNotFound`/`PermissionDenied` unless `path` is a readable file.
async fn ensure_readable(path: &Path) -> Result<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| Error::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    // opened only to probe permissions, closed on drop
    tokio::fs::File::open(path)
        .await
        .map_err(|e| Error::from_io(path, e))?;

    Ok(())
}

async fn read_csv_upload(path: &Path) -> Result<RequestBody> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::from_io(path, e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report.csv".to_string());

    Ok(RequestBody::Csv { file_name, bytes })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Transport that records requests and replays a canned reply.
    pub(crate) struct RecordingTransport {
        pub requests: Mutex<Vec<ApiRequest>>,
        reply: Option<String>,
    }

    impl RecordingTransport {
        pub fn replying(body: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Some(body.to_string()),
            }
        }

        pub fn failing() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: None,
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last(&self) -> ApiRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: ApiRequest) -> std::result::Result<String, TransportError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Some(body) => Ok(body.clone()),
                None => Err(TransportError::Other("connection refused".to_string())),
            }
        }
    }

    impl AbuseIpdbClient<RecordingTransport> {
        pub(crate) fn transport_calls(&self) -> usize {
            self.transport.calls()
        }
    }

    pub(crate) fn create_test_client(transport: RecordingTransport) -> AbuseIpdbClient<RecordingTransport> {
        let config = ClientConfig::new("test-key", vec!["10.0.0.5".to_string()]);
        AbuseIpdbClient::with_transport(config, transport)
    }

    fn query(request: &ApiRequest) -> Vec<(String, String)> {
        request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_check_request() {
        let client = create_test_client(RecordingTransport::replying(
            r#"{"data":{"ipAddress":"1.2.3.4","abuseConfidenceScore":0}}"#,
        ));

        let response = client.check("1.2.3.4", 90, false).await.unwrap();
        assert!(!response.has_error());

        let request = client.transport.last();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url.path(), "/api/v2/check");
        assert_eq!(request.url.host_str(), Some("api.abuseipdb.com"));
        assert_eq!(
            query(&request),
            pairs(&[("ipAddress", "1.2.3.4"), ("maxAgeInDays", "90")])
        );
        assert_eq!(request.header("Key"), Some("test-key"));
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[tokio::test]
    async fn test_check_verbose() {
        let client = create_test_client(RecordingTransport::replying("{}"));
        client.check("1.2.3.4", DEFAULT_MAX_AGE_IN_DAYS, true).await.unwrap();

        let query = query(&client.transport.last());
        assert!(query.contains(&("verbose".to_string(), "true".to_string())));
        assert!(query.contains(&("maxAgeInDays".to_string(), "30".to_string())));
    }

    #[tokio::test]
    async fn test_check_validation_sends_nothing() {
        let client = create_test_client(RecordingTransport::replying("{}"));

        for age in [0, 366, 400] {
            let err = client.check("1.2.3.4", age, false).await.unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
        let err = client.check("", 30, false).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        assert!(client.check("1.2.3.4", 1, false).await.is_ok());
        assert!(client.check("1.2.3.4", 365, false).await.is_ok());
        assert_eq!(client.transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_check_block_request() {
        let client = create_test_client(RecordingTransport::replying("{}"));
        client.check_block("127.0.0.1/24", 15).await.unwrap();

        let request = client.transport.last();
        assert_eq!(request.url.path(), "/api/v2/check-block");
        assert_eq!(
            query(&request),
            pairs(&[("network", "127.0.0.1/24"), ("maxAgeInDays", "15")])
        );

        assert!(client.check_block("", 30).await.is_err());
        assert!(client.check_block("127.0.0.1/24", 400).await.is_err());
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_report_request() {
        let client = create_test_client(RecordingTransport::replying(
            r#"{"data":{"ipAddress":"1.2.3.4","abuseConfidenceScore":52}}"#,
        ));

        client
            .report(
                "1.2.3.4",
                "brute,ssh",
                r"Failed password for root\ from 1.2.3.4 to 10.0.0.5 <admin@example.com>",
            )
            .await
            .unwrap();

        let request = client.transport.last();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url.path(), "/api/v2/report");
        assert_eq!(request.url.query(), None);
        assert_eq!(
            request.body,
            RequestBody::Form(pairs(&[
                ("ip", "1.2.3.4"),
                ("categories", "18,22"),
                ("comment", "Failed password for root from 1.2.3.4 to * *"),
            ]))
        );
    }

    #[tokio::test]
    async fn test_report_validation_sends_nothing() {
        let client = create_test_client(RecordingTransport::replying("{}"));

        let err = client.report("", "18", "msg").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = client.report("1.2.3.4", "", "msg").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = client.report("1.2.3.4", "18", "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = client.report("1.2.3.4", "nope", "msg").await.unwrap_err();
        assert!(matches!(err, Error::InvalidCategory(_)));
        let err = client.report("1.2.3.4", "13", "msg").await.unwrap_err();
        assert!(matches!(err, Error::StandaloneCategory(_)));

        assert_eq!(client.transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_clear_address_request() {
        let client = create_test_client(RecordingTransport::replying(
            r#"{"data":{"numReportsDeleted":3}}"#,
        ));
        client.clear_address("1.2.3.4").await.unwrap();

        let request = client.transport.last();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.url.path(), "/api/v2/clear-address");
        assert_eq!(query(&request), pairs(&[("ipAddress", "1.2.3.4")]));

        assert!(client.clear_address(" ").await.is_err());
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_blacklist_request() {
        let client = create_test_client(RecordingTransport::replying("{}"));
        client
            .blacklist(DEFAULT_BLACKLIST_LIMIT, false, DEFAULT_CONFIDENCE_MINIMUM)
            .await
            .unwrap();

        let request = client.transport.last();
        assert_eq!(request.url.path(), "/api/v2/blacklist");
        assert_eq!(
            query(&request),
            pairs(&[("confidenceMinimum", "100"), ("limit", "10000")])
        );
    }

    #[tokio::test]
    async fn test_blacklist_plaintext() {
        let client = create_test_client(RecordingTransport::replying("1.2.3.4\n5.6.7.8\n"));
        let response = client.blacklist(2, true, 90).await.unwrap();

        assert_eq!(response.plaintext(), "1.2.3.4\n5.6.7.8\n");
        assert!(response.object().is_none());
        assert!(query(&client.transport.last())
            .contains(&("plaintext".to_string(), "true".to_string())));
    }

    #[tokio::test]
    async fn test_blacklist_confidence_left_to_api() {
        let client = create_test_client(RecordingTransport::replying("{}"));
        client.blacklist(10, false, 150).await.unwrap();

        assert!(query(&client.transport.last())
            .contains(&("confidenceMinimum".to_string(), "150".to_string())));
    }

    #[tokio::test]
    async fn test_blacklist_limit_validation() {
        let client = create_test_client(RecordingTransport::replying("{}"));
        let err = client.blacklist(0, false, 100).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(client.transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_bulk_report_upload() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"IP,Categories,ReportDate,Comment\n1.2.3.4,18,,ssh\n")
            .unwrap();
        file.flush().unwrap();

        let client = create_test_client(RecordingTransport::replying(
            r#"{"data":{"savedReports":1,"invalidReports":[]}}"#,
        ));
        let response = client.bulk_report(file.path()).await.unwrap();
        assert!(!response.has_error());

        let request = client.transport.last();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url.path(), "/api/v2/bulk-report");
        match request.body {
            RequestBody::Csv { file_name, bytes } => {
                assert_eq!(
                    file_name,
                    file.path().file_name().unwrap().to_string_lossy()
                );
                assert!(bytes.starts_with(b"IP,Categories"));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bulk_report_missing_file() {
        let client = create_test_client(RecordingTransport::replying("{}"));

        let err = client
            .bulk_report("/nonexistent/reports.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));

        let dir = tempfile::tempdir().unwrap();
        let err = client.bulk_report(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));

        assert_eq!(client.transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_empty() {
        let client = create_test_client(RecordingTransport::failing());

        let response = client.check("1.2.3.4", 30, false).await.unwrap();
        assert!(response.is_empty());
        assert!(!response.has_error());
        assert!(response.object().is_none());
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_remote_errors_are_data() {
        let client = create_test_client(RecordingTransport::replying(
            r#"{"errors":[{"detail":"Authentication failed. Your API key is either missing, incorrect, or revoked.","status":401}]}"#,
        ));

        let response = client.check("1.2.3.4", 30, false).await.unwrap();
        assert!(response.has_error());
        assert_eq!(response.errors()[0].status, Some(401));
        assert!(matches!(response.into_result(), Err(Error::RemoteApi(_))));
    }

    #[tokio::test]
    async fn test_execute_direct() {
        let client = create_test_client(RecordingTransport::replying("not json"));
        let response = client
            .execute("check", &[("ipAddress", "::1".to_string())], Method::Get, None)
            .await
            .unwrap();

        assert_eq!(response.plaintext(), "not json");
        assert!(response.object().is_none());
        assert_eq!(
            query(&client.transport.last()),
            pairs(&[("ipAddress", "::1")])
        );
    }

    #[tokio::test]
    async fn test_execute_keeps_base_path() {
        let client = create_test_client(RecordingTransport::replying("{}"));

        client.execute("/check", &[], Method::Get, None).await.unwrap();
        assert_eq!(
            client.transport.last().url.as_str(),
            "https://api.abuseipdb.com/api/v2/check"
        );

        client.execute("check-block", &[], Method::Get, None).await.unwrap();
        assert_eq!(
            client.transport.last().url.as_str(),
            "https://api.abuseipdb.com/api/v2/check-block"
        );
    }

    #[tokio::test]
    async fn test_execute_upload_requires_post() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"IP,Categories\n1.2.3.4,18\n").unwrap();
        file.flush().unwrap();

        let client = create_test_client(RecordingTransport::replying("{}"));
        for method in [Method::Get, Method::Delete] {
            let err = client
                .execute("bulk-report", &[], method, Some(file.path()))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
        assert_eq!(client.transport.calls(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_bulk_report_unreadable_file() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"IP,Categories\n1.2.3.4,18\n").unwrap();
        file.flush().unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores file modes, nothing to check there
        if std::fs::File::open(file.path()).is_ok() {
            return;
        }

        let client = create_test_client(RecordingTransport::replying("{}"));
        let err = client.bulk_report(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));
        assert_eq!(client.transport.calls(), 0);

        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600)).unwrap();
    }

    #[test]
    fn test_categories_exposed() {
        let client = create_test_client(RecordingTransport::replying("{}"));
        assert_eq!(client.categories().len(), 23);
        assert_eq!(client.config().api_key, "test-key");
    }
}
