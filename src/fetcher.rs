use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use isahc::{
    config::{Configurable, RedirectPolicy},
    Request, RequestExt,
};

use crate::constants::youtube::*;
use crate::debug;
use crate::error::*;

/// Body and content type of a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// An image downloaded to be embedded in the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl FetchedImage {
    pub fn data_uri(&self) -> String {
        to_data_uri(&self.bytes, &self.mime)
    }
}

/// Performs bounded HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(HTTP_TIMEOUT)
    }
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Retrieves the resource at the given URL.
    ///
    /// # Arguments
    /// * `url` - The URL of the resource.
    /// * `accept` - The value of the `Accept` header.
    ///
    /// # Returns
    /// The response body and its content type.
    ///
    /// # Errors
    /// Returns an error if the request fails, times out or the server answers
    /// with a non 2xx status.
    pub fn get(&self, url: &str, accept: &str) -> Result<HttpResponse> {
        smol::block_on(self.get_async(url, accept))
    }

    async fn get_async(&self, url: &str, accept: &str) -> Result<HttpResponse> {
        let mut response = Request::get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", accept)
            .timeout(self.timeout)
            .redirect_policy(RedirectPolicy::Follow)
            .body(())?
            .send_async()
            .await?;

        if !response.status().is_success() {
            return Err(Error::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let mut body = Vec::new();
        smol::io::AsyncReadExt::read_to_end(response.body_mut(), &mut body).await?;
        debug!("GET {} -> {} bytes", url, body.len());

        Ok(HttpResponse { body, content_type })
    }

    /// Downloads an image, normalizing its content type.
    pub fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        let response = self.get(url, IMAGE_ACCEPT)?;
        Ok(FetchedImage {
            mime: normalize_content_type(response.content_type.as_deref()),
            bytes: response.body,
        })
    }
}

/// Keeps the media type of a `Content-Type` header, lower-cased and without
/// parameters. Images without a usable header are assumed to be JPEG.
///
/// # Examples
/// ```
/// use ytcard::fetcher::normalize_content_type;
///
/// assert_eq!(normalize_content_type(Some("Image/PNG; charset=binary")), "image/png");
/// assert_eq!(normalize_content_type(Some("  ")), "image/jpeg");
/// assert_eq!(normalize_content_type(None), "image/jpeg");
/// ```
pub fn normalize_content_type(header: Option<&str>) -> String {
    header
        .and_then(|h| h.split(';').next())
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string())
}

/// Encodes the given bytes as a base64 data URI.
///
/// # Examples
/// ```
/// use ytcard::fetcher::to_data_uri;
///
/// assert_eq!(to_data_uri(b"GIF89a", "image/gif"), "data:image/gif;base64,R0lGODlh");
/// ```
pub fn to_data_uri(data: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(data))
}
