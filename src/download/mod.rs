use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Downloads a file from a URL to a temporary path with retry support.
#[tracing::instrument(skip(runtime, temp_path, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    temp_path: &Path,
    http_client: &HttpClient,
) -> Result<u64> {
    info!("Downloading from {}", url);

    let bytes = http_client
        .download_file(url, || {
            runtime
                .create_file(temp_path)
                .with_context(|| format!("Failed to create temporary file at {:?}", temp_path))
        })
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    info!("Download complete ({} bytes).", bytes);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use reqwest::Client;
    use std::time::Duration;

    fn http_client() -> HttpClient {
        HttpClient::new(Client::new()).with_retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_download_file() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/operator-sdk_linux_amd64")
            .with_status(200)
            .with_body("binary")
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_create_file()
            .with(eq(Path::new("/tmp/operator-sdk.download").to_path_buf()))
            .times(1)
            .returning(|_| Ok(Box::new(std::io::sink())));

        let bytes = download_file(
            &runtime,
            &format!("{}/operator-sdk_linux_amd64", url),
            Path::new("/tmp/operator-sdk.download"),
            &http_client(),
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 6);
    }

    #[tokio::test]
    async fn test_download_file_not_found() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        // No expectations: the file must not be created for a failed response.
        let runtime = MockRuntime::new();

        let result = download_file(
            &runtime,
            &format!("{}/missing", url),
            Path::new("/tmp/missing.download"),
            &http_client(),
        )
        .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to download"));
    }
}
