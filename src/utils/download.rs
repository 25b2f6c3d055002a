//! Streaming PDF downloads for a selection manifest.

use futures_util::{Stream, StreamExt};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

use super::HttpClient;
use crate::models::Library;

/// Errors for a single download
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The URL has no usable file name
    #[error("Invalid download URL: {0}")]
    InvalidUrl(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file written by [`download_pdf`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Summary of a batch download
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Number of manifest entries attempted
    pub attempted: usize,

    pub downloaded: Vec<DownloadedFile>,

    /// `(url, error)` for every entry that failed
    pub failures: Vec<(String, DownloadError)>,
}

impl DownloadReport {
    /// Entries that ended up on disk; always `attempted - failures.len()`
    pub fn succeeded(&self) -> usize {
        self.downloaded.len()
    }

    /// Total bytes written
    pub fn total_bytes(&self) -> u64 {
        self.downloaded.iter().map(|file| file.bytes).sum()
    }
}

/// Final path segment of `url`, used as the local file name
pub fn file_name_from_url(url: &str) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", url, e)))?;

    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DownloadError::InvalidUrl(format!("{}: no file name", url)))
}

/// Stream `url` into `dest_dir`, named after the URL's last path segment.
///
/// The body is written verbatim, chunk by chunk.
pub async fn download_pdf(
    client: &HttpClient,
    url: &str,
    dest_dir: &Path,
) -> Result<DownloadedFile, DownloadError> {
    let file_name = file_name_from_url(url)?;

    let response = client
        .client()
        .get(url)
        .send()
        .await
        .map_err(|e| DownloadError::Network(format!("Failed to download {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DownloadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let path = dest_dir.join(file_name);
    let bytes = write_stream(&path, url, response.bytes_stream()).await?;
    debug!(path = %path.display(), bytes, "download complete");

    Ok(DownloadedFile { path, bytes })
}

/// Write every chunk of `stream` to a new file at `path`.
///
/// On any error the partially written file is removed.
async fn write_stream<S, B, E>(path: &Path, url: &str, stream: S) -> Result<u64, DownloadError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = std::pin::pin!(stream);

    let written = async {
        let mut bytes: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| DownloadError::Network(format!("Failed to read {}: {}", url, e)))?;
            let chunk = chunk.as_ref();
            file.write_all(chunk).await?;
            bytes += chunk.len() as u64;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok::<u64, DownloadError>(bytes)
    }
    .await;

    if written.is_err() {
        drop(file);
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "could not remove partial download");
        }
    }

    written
}

/// Download every manifest entry in key order.
///
/// A failed entry is recorded and the next one is still attempted.
pub async fn download_all(
    client: &HttpClient,
    manifest: &Library,
    dest_dir: &Path,
    progress: &ProgressBar,
) -> DownloadReport {
    let mut report = DownloadReport::default();
    progress.set_length(manifest.len() as u64);

    for publication in manifest.publications() {
        report.attempted += 1;
        let url = publication.paper_link.as_str();

        match download_pdf(client, url, dest_dir).await {
            Ok(file) => report.downloaded.push(file),
            Err(error) => {
                progress.suspend(|| warn!(%url, %error, "download failed"));
                report.failures.push((url.to_string(), error));
            }
        }
        progress.inc(1);
    }

    progress.finish();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Publication;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url(
                "https://openaccess.thecvf.com/content/CVPR2023/papers/Foo_CVPR_2023_paper.pdf"
            )
            .unwrap(),
            "Foo_CVPR_2023_paper.pdf"
        );
        assert_eq!(
            file_name_from_url("https://a.org/dir/paper.pdf?download=1").unwrap(),
            "paper.pdf"
        );
        assert!(matches!(
            file_name_from_url("https://a.org/dir/"),
            Err(DownloadError::InvalidUrl(_))
        ));
        assert!(matches!(
            file_name_from_url("not a url"),
            Err(DownloadError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_download_pdf_writes_body_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let body: Vec<u8> = (0..=255u8).cycle().take(20_000).collect();
        server
            .mock("GET", "/papers/a.pdf")
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::new().unwrap();
        let url = format!("{}/papers/a.pdf", server.url());

        let file = download_pdf(&client, &url, dir.path()).await.unwrap();

        assert_eq!(file.path, dir.path().join("a.pdf"));
        assert_eq!(file.bytes, body.len() as u64);
        assert_eq!(std::fs::read(&file.path).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_pdf_reports_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/papers/gone.pdf")
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::new().unwrap();
        let url = format!("{}/papers/gone.pdf", server.url());

        let err = download_pdf(&client, &url, dir.path()).await.unwrap_err();

        match err {
            DownloadError::Status { status, body, .. } => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!dir.path().join("gone.pdf").exists());
    }

    #[tokio::test]
    async fn test_interrupted_stream_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.pdf");
        let chunks = futures_util::stream::iter(vec![
            Ok(b"%PDF-1.5 partial".to_vec()),
            Err("connection reset"),
        ]);

        let err = write_stream(&path, "https://a.org/cut.pdf", chunks)
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Network(ref msg) if msg.contains("connection reset")));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_complete_stream_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whole.pdf");
        let chunks = futures_util::stream::iter(vec![
            Ok::<_, std::io::Error>(b"%PDF".to_vec()),
            Ok(b"-1.5".to_vec()),
        ]);

        let bytes = write_stream(&path, "https://a.org/whole.pdf", chunks)
            .await
            .unwrap();

        assert_eq!(bytes, 8);
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
    }

    #[tokio::test]
    async fn test_download_all_continues_after_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/papers/one.pdf")
            .with_status(200)
            .with_body("one")
            .create_async()
            .await;
        server
            .mock("GET", "/papers/two.pdf")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        server
            .mock("GET", "/papers/three.pdf")
            .with_status(200)
            .with_body("three")
            .create_async()
            .await;

        let manifest = Library::renumbered(["one", "two", "three"].iter().map(|name| {
            Publication::new(
                *name,
                format!("{}/html/{}.html", server.url(), name),
                format!("{}/papers/{}.pdf", server.url(), name),
                "abstract",
            )
        }));

        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::new().unwrap();
        let report = download_all(&client, &manifest, dir.path(), &ProgressBar::hidden()).await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.succeeded(), report.attempted - report.failures.len());
        assert!(report.failures[0].0.ends_with("/papers/two.pdf"));
        assert_eq!(std::fs::read_to_string(dir.path().join("three.pdf")).unwrap(), "three");
        assert_eq!(report.total_bytes(), 8);
    }
}
