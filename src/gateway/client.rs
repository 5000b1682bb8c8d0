//! HTTP gateway - executes store requests with reqwest and decodes responses

use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::constants::DATE_FORMAT;
use crate::gateway::error::classify_status;
use crate::gateway::{check_date_range, ExpenseGateway, GatewayResult};
use crate::models::{Category, Expense, ExpenseCreate, ExpenseId, ExpenseUpdate, TotalsResponse};

/// Gateway backed by the store's REST API
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpGateway {
    /// Build a gateway for `base_url`. `timeout` of None waits indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid store URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("store URL cannot be used as a base: {}", base_url);
        }
        Ok(HttpGateway {
            client: create_client(timeout)?,
            base_url,
        })
    }

    /// Append path segments to the base URL. Segments are percent-encoded,
    /// so `Health Care` stays a single segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "Executing store request");
        self.client.request(method, url)
    }

    /// Send and decode a JSON body
    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        target: Option<ExpenseId>,
    ) -> GatewayResult<T> {
        let response = self.execute(builder, target).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and check the status; the body is left unread
    async fn execute(
        &self,
        builder: RequestBuilder,
        target: Option<ExpenseId>,
    ) -> GatewayResult<reqwest::Response> {
        let start = Instant::now();
        let result = builder.send().await;
        let elapsed = start.elapsed().as_millis() as u64;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    tracing::warn!(time_ms = elapsed, "Store request timed out");
                } else if e.is_connect() {
                    tracing::warn!(time_ms = elapsed, error = %e, "Store connection failed");
                } else {
                    tracing::warn!(time_ms = elapsed, error = %e, "Store request failed");
                }
                return Err(e.into());
            }
        };

        let status = response.status();
        tracing::debug!(status = status.as_u16(), time_ms = elapsed, "Store request completed");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), &body, target))
    }
}

impl ExpenseGateway for HttpGateway {
    async fn list_all(&self) -> GatewayResult<Vec<Expense>> {
        let url = self.endpoint(&["expenses", ""]);
        self.fetch(self.request(Method::GET, url), None).await
    }

    async fn create(&self, data: &ExpenseCreate) -> GatewayResult<Expense> {
        let url = self.endpoint(&["expenses", ""]);
        self.fetch(self.request(Method::POST, url).json(data), None).await
    }

    async fn update(&self, id: ExpenseId, data: &ExpenseUpdate) -> GatewayResult<Expense> {
        let url = self.endpoint(&["expenses", &id.to_string()]);
        self.fetch(self.request(Method::PUT, url).json(data), Some(id)).await
    }

    async fn delete(&self, id: ExpenseId) -> GatewayResult<()> {
        let url = self.endpoint(&["expenses", &id.to_string()]);
        self.execute(self.request(Method::DELETE, url), Some(id)).await?;
        Ok(())
    }

    async fn list_by_category(&self, category: Category) -> GatewayResult<Vec<Expense>> {
        let url = self.endpoint(&["expenses", "category", category.as_str()]);
        self.fetch(self.request(Method::GET, url), None).await
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> GatewayResult<Vec<Expense>> {
        check_date_range(start, end)?;
        let url = self.endpoint(&["expenses", "filter"]);
        let query = [
            ("start_date", start.format(DATE_FORMAT).to_string()),
            ("end_date", end.format(DATE_FORMAT).to_string()),
        ];
        self.fetch(self.request(Method::GET, url).query(&query), None).await
    }

    async fn get_totals(&self) -> GatewayResult<TotalsResponse> {
        let url = self.endpoint(&["expenses", "total"]);
        self.fetch(self.request(Method::GET, url), None).await
    }
}

/// Create an HTTP client with JSON defaults
pub fn create_client(timeout: Option<Duration>) -> anyhow::Result<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("building HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// What the canned server saw
    #[derive(Debug)]
    struct Captured {
        request_line: String,
        body: String,
    }

    /// Serve one canned HTTP response and report the request it received
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break buf.len();
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let body_end = (header_end + content_length).min(buf.len());
            let captured = Captured {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&buf[header_end..body_end]).to_string(),
            };

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            let _ = tx.send(captured);
        });

        (format!("http://{}", addr), rx)
    }

    #[test]
    fn test_endpoint_encodes_category() {
        let gw = HttpGateway::new("http://localhost:8000", None).unwrap();
        let url = gw.endpoint(&["expenses", "category", Category::HealthCare.as_str()]);
        assert_eq!(url.as_str(), "http://localhost:8000/expenses/category/Health%20Care");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_trailing_slash() {
        let gw = HttpGateway::new("http://example.com/api/", None).unwrap();
        assert_eq!(gw.endpoint(&["expenses", ""]).as_str(), "http://example.com/api/expenses/");
        assert_eq!(gw.endpoint(&["expenses", "12"]).as_str(), "http://example.com/api/expenses/12");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(HttpGateway::new("not a url", None).is_err());
        assert!(HttpGateway::new("mailto:someone@example.com", None).is_err());
    }

    #[tokio::test]
    async fn test_list_all_decodes_expenses() {
        let (url, seen) = serve_once(
            "200 OK",
            r#"[{"id":1,"amount":12.5,"description":null,"category":"Food","date":"2024-06-01T08:00:00"}]"#,
        )
        .await;
        let gw = HttpGateway::new(&url, None).unwrap();

        let expenses = gw.list_all().await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, Category::Food);
        assert_eq!(seen.await.unwrap().request_line, "GET /expenses/ HTTP/1.1");
    }

    #[tokio::test]
    async fn test_create_posts_json_body() {
        let (url, seen) = serve_once(
            "200 OK",
            r#"{"id":5,"amount":42.5,"description":"Lunch","category":"Food","date":"2024-06-01T12:00:00"}"#,
        )
        .await;
        let gw = HttpGateway::new(&url, None).unwrap();
        let data = ExpenseCreate {
            amount: 42.5,
            description: Some("Lunch".into()),
            category: Category::Food,
        };

        let created = gw.create(&data).await.unwrap();
        assert_eq!(created.id, 5);

        let captured = seen.await.unwrap();
        assert_eq!(captured.request_line, "POST /expenses/ HTTP/1.1");
        let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(sent["category"], "Food");
        assert_eq!(sent["amount"], 42.5);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let (url, seen) = serve_once("404 Not Found", r#"{"detail":"Expense not found"}"#).await;
        let gw = HttpGateway::new(&url, None).unwrap();

        let err = gw.delete(77).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(77)));
        assert_eq!(seen.await.unwrap().request_line, "DELETE /expenses/77 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_no_content() {
        let (url, _seen) = serve_once("204 No Content", "").await;
        let gw = HttpGateway::new(&url, None).unwrap();
        gw.delete(3).await.unwrap();
    }

    #[tokio::test]
    async fn test_date_range_sends_query() {
        let (url, seen) = serve_once("200 OK", "[]").await;
        let gw = HttpGateway::new(&url, None).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        assert!(gw.list_by_date_range(start, end).await.unwrap().is_empty());
        assert_eq!(
            seen.await.unwrap().request_line,
            "GET /expenses/filter?start_date=2024-01-01&end_date=2024-01-31 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_inverted_range_never_hits_the_network() {
        // Nothing listens on this URL; a request would fail as a request error
        let gw = HttpGateway::new("http://127.0.0.1:9", None).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(gw.list_by_date_range(start, end).await, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unprocessable_create_is_validation() {
        let (url, _seen) = serve_once(
            "422 Unprocessable Entity",
            r#"{"detail":[{"loc":["body","amount"],"msg":"Input should be greater than 0"}]}"#,
        )
        .await;
        let gw = HttpGateway::new(&url, None).unwrap();
        let data = ExpenseCreate {
            amount: -1.0,
            description: None,
            category: Category::Other,
        };
        assert!(matches!(gw.create(&data).await, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_request_error() {
        let (url, _seen) = serve_once("200 OK", r#"{"total":"lots"}"#).await;
        let gw = HttpGateway::new(&url, None).unwrap();
        assert!(matches!(gw.get_totals().await, Err(GatewayError::Request(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gw = HttpGateway::new(&format!("http://{}", addr), None).unwrap();
        assert!(matches!(gw.list_all().await, Err(GatewayError::Request(_))));
    }
}
