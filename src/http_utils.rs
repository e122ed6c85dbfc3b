use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;
use url::Url;

use crate::{ErrorDetail, cli_utils};

/// A non-success response from the server.
#[derive(Debug)]
pub struct HttpError {
    /// Status returned by the server.
    pub status: StatusCode,
    /// The `detail` field of the error body, or the raw body when it has none.
    pub message: String,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl Error for HttpError {}

impl HttpError {
    fn from_body(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorDetail>(body) {
            Ok(detail) => detail.detail,
            Err(_) if body.is_empty() => "No error details".to_string(),
            Err(_) => body.to_string(),
        };
        Self { status, message }
    }
}

/// Client for a sectorguide server.
pub struct SectorGuideClient {
    client: Client,
    base_url: String,
}

impl SectorGuideClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Constructs a full URL from a path
    pub fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, path)
    }

    /// Constructs a full URL from path segments, percent-encoding each one.
    pub fn segments_url(&self, segments: &[&str]) -> Result<Url, Box<dyn Error>> {
        let mut url = Url::parse(&format!("{}/", self.base_url))?;
        url.path_segments_mut()
            .map_err(|()| format!("{} cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Makes a GET request to the path built from `segments`.
    pub async fn get_segments<T>(&self, segments: &[&str]) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = self.segments_url(segments)?;
        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    /// Makes a GET request and handles the response
    pub async fn get<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Makes a POST request with JSON body and handles the response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Box<dyn Error>>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Makes a POST request without body and handles the response
    pub async fn post_empty<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.client.post(&url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T>(&self, response: Response) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Box::new(HttpError::from_body(status, &body)))
        }
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, Box<dyn Error>>>,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => cli_utils::exit_with_error(&format!("{}: {}", context, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_paths() {
        let client = SectorGuideClient::new("http://localhost:8000/".to_string());
        assert_eq!(client.url("/sectors"), "http://localhost:8000/sectors");
        assert_eq!(client.url("search"), "http://localhost:8000/search");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let client = SectorGuideClient::new("http://localhost:8000".to_string());
        let url = client.segments_url(&["sectors", "a b?c#d/e"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/sectors/a%20b%3Fc%23d%2Fe"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn segments_keep_base_path() {
        let client = SectorGuideClient::new("http://localhost:8000/api/".to_string());
        let url = client.segments_url(&["sectors", "sales"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/sectors/sales");
    }

    #[test]
    fn error_uses_detail_field() {
        let err = HttpError::from_body(StatusCode::NOT_FOUND, r#"{"detail":"Sector not found"}"#);
        assert_eq!(err.message, "Sector not found");
        assert_eq!(err.to_string(), "Sector not found (404 Not Found)");
    }

    #[test]
    fn error_falls_back_to_body() {
        let err = HttpError::from_body(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.message, "upstream down");
        let err = HttpError::from_body(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.message, "No error details");
    }
}
