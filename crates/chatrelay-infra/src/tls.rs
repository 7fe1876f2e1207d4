//! Custom CA bundle bootstrap.
//!
//! Some upstream gateways present certificates issued by a private CA. The
//! bundle is downloaded once to a local PEM file and then added to the HTTP
//! client's trust roots.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Errors while fetching or loading a CA bundle.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to download CA bundle from {url}: {message}")]
    Download { url: String, message: String },

    #[error("CA bundle download from {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("CA bundle file error at '{path}': {message}")]
    Io { path: String, message: String },

    #[error("invalid PEM in '{path}': {message}")]
    InvalidPem { path: String, message: String },
}

/// Make sure the CA bundle exists at `path`, downloading it from `url` if not.
///
/// An existing file is trusted as-is and never re-downloaded. The download
/// gives up after `timeout`.
pub async fn ensure_ca_bundle(path: &Path, url: &str, timeout: Duration) -> Result<PathBuf, TlsError> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        tracing::debug!(path = %path.display(), "CA bundle already present");
        return Ok(path.to_path_buf());
    }

    tracing::info!(url, path = %path.display(), "downloading CA bundle");
    let download_error = |e: reqwest::Error| TlsError::Download {
        url: url.to_string(),
        message: e.to_string(),
    };
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(download_error)?;
    let response = client.get(url).send().await.map_err(download_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(TlsError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(download_error)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| io_error(parent, e))?;
    }
    tokio::fs::write(path, &bytes).await.map_err(|e| io_error(path, e))?;

    Ok(path.to_path_buf())
}

/// Parse every certificate in a PEM bundle.
pub fn load_root_certificates(path: &Path) -> Result<Vec<reqwest::Certificate>, TlsError> {
    let pem = std::fs::read(path).map_err(|e| io_error(path, e))?;
    let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| TlsError::InvalidPem {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    if certs.is_empty() {
        return Err(TlsError::InvalidPem {
            path: path.display().to_string(),
            message: "no certificates found".to_string(),
        });
    }
    Ok(certs)
}

fn io_error(path: &Path, e: std::io::Error) -> TlsError {
    TlsError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    const FAKE_PEM: &str = "-----BEGIN CERTIFICATE-----\nnot really\n-----END CERTIFICATE-----\n";

    #[tokio::test]
    async fn test_existing_bundle_is_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("ca.pem");
        std::fs::write(&bundle, FAKE_PEM).unwrap();

        // Unroutable URL: any download attempt would fail.
        let result = ensure_ca_bundle(&bundle, "http://127.0.0.1:9/ca.pem", TIMEOUT).await.unwrap();
        assert_eq!(result, bundle);
        assert_eq!(std::fs::read_to_string(&bundle).unwrap(), FAKE_PEM);
    }

    #[tokio::test]
    async fn test_missing_bundle_is_downloaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trust/ca.pem"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FAKE_PEM))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("certs").join("ca.pem");
        let url = format!("{}/trust/ca.pem", server.uri());

        let result = ensure_ca_bundle(&bundle, &url, TIMEOUT).await.unwrap();
        assert_eq!(result, bundle);
        assert_eq!(std::fs::read_to_string(&bundle).unwrap(), FAKE_PEM);
    }

    #[tokio::test]
    async fn test_failed_download_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("ca.pem");
        let err = ensure_ca_bundle(&bundle, &format!("{}/ca.pem", server.uri()), TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(err, TlsError::Status { status: 404, .. }));
        assert!(!bundle.exists());
    }

    #[tokio::test]
    async fn test_slow_download_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(FAKE_PEM)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("ca.pem");
        let err = ensure_ca_bundle(
            &bundle,
            &format!("{}/ca.pem", server.uri()),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TlsError::Download { .. }));
        assert!(!bundle.exists());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_root_certificates(Path::new("/no/such/bundle.pem")).unwrap_err();
        assert!(matches!(err, TlsError::Io { .. }));
    }

    #[test]
    fn test_load_garbage_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("ca.pem");
        std::fs::write(&bundle, "this is not a certificate").unwrap();
        assert!(load_root_certificates(&bundle).is_err());
    }
}
