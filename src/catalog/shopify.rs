use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::LINK;

use super::types::ProductsPage;
use super::{CatalogClient, FetchError, Page, next_link};

pub const DEFAULT_API_VERSION: &str = "2024-01";
/// Largest page the Admin REST products endpoint will return.
pub const MAX_PAGE_SIZE: u32 = 250;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Clone, Debug)]
pub struct ShopifyClientConfig {
    /// Bare admin host, e.g. `my-shop.myshopify.com`.
    pub store: String,
    pub access_token: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl ShopifyClientConfig {
    pub fn new(store: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Apply `SHOPIFY_API_VERSION` and `SHOPFEED_TIMEOUT_SECS` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(version) = std::env::var("SHOPIFY_API_VERSION") {
            if !version.trim().is_empty() {
                self.api_version = version.trim().to_string();
            }
        }
        if let Some(timeout) = std::env::var("SHOPFEED_TIMEOUT_SECS").ok().as_deref().and_then(parse_timeout) {
            self.timeout = timeout;
        }
        self
    }

    pub fn products_url(&self) -> String {
        format!(
            "https://{}/admin/api/{}/products.json?limit={}",
            self.store.trim_end_matches('/'),
            self.api_version,
            MAX_PAGE_SIZE
        )
    }
}

// Zero would make reqwest time out every request immediately, so it is ignored
// like any other unusable value.
fn parse_timeout(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => None,
    }
}

#[derive(Clone)]
pub struct ShopifyClient {
    http: HttpClient,
    cfg: ShopifyClientConfig,
}

impl ShopifyClient {
    pub fn new(cfg: ShopifyClientConfig) -> Result<Self, FetchError> {
        let http = HttpClient::builder()
            .timeout(cfg.timeout)
            .user_agent(concat!("shopfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::from_reqwest)?;
        Ok(Self { http, cfg })
    }

    pub fn first_page_url(&self) -> String {
        self.cfg.products_url()
    }
}

#[async_trait]
impl CatalogClient for ShopifyClient {
    async fn get_page(&self, url: &str) -> Result<Page, FetchError> {
        let response = self
            .http
            .get(url)
            .header(ACCESS_TOKEN_HEADER, &self.cfg.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http { status, url: url.to_string() });
        }

        let mut next = None;
        for value in response.headers().get_all(LINK) {
            let value = value
                .to_str()
                .map_err(|_| FetchError::InvalidLink { url: url.to_string() })?;
            if let Some(link) = next_link(value) {
                next = Some(link);
                break;
            }
        }

        let bytes = response.bytes().await.map_err(FetchError::from_reqwest)?;
        let parsed: ProductsPage = serde_json::from_slice(&bytes).map_err(FetchError::Decode)?;

        Ok(Page { products: parsed.into_products(), next })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    // Serve one canned HTTP response and hand back the raw request head.
    async fn serve_once(response: Vec<u8>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 { break; }
                buf.extend_from_slice(&chunk[..n]);
            }
            sock.write_all(&response).await.unwrap();
            sock.shutdown().await.unwrap();
            String::from_utf8_lossy(&buf).to_string()
        });
        (format!("http://{addr}/admin/api/2024-01/products.json?limit=250"), handle)
    }

    fn response(status: &str, extra_headers: &[u8], body: &str) -> Vec<u8> {
        let mut out = format!("HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n", body.len()).into_bytes();
        out.extend_from_slice(extra_headers);
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(body.as_bytes());
        out
    }

    fn client() -> ShopifyClient {
        ShopifyClient::new(ShopifyClientConfig::new("unused.example", "shpat_secret")).unwrap()
    }

    const ONE_PRODUCT: &str = r#"{"products":[{"id":1,"title":"Mug","handle":"mug","variants":[{"id":10,"price":"9.50","inventory_quantity":2}]}]}"#;

    #[test]
    fn products_url_uses_max_page_size() {
        let cfg = ShopifyClientConfig::new("my-shop.myshopify.com", "shpat_x");
        assert_eq!(
            cfg.products_url(),
            "https://my-shop.myshopify.com/admin/api/2024-01/products.json?limit=250"
        );
    }

    #[test]
    fn client_builds_with_custom_version() {
        let mut cfg = ShopifyClientConfig::new("s.example", "t");
        cfg.api_version = "2023-10".into();
        let client = ShopifyClient::new(cfg).unwrap();
        assert_eq!(client.first_page_url(), "https://s.example/admin/api/2023-10/products.json?limit=250");
    }

    #[test]
    fn timeout_ignores_zero_and_garbage() {
        assert_eq!(parse_timeout("45"), Some(Duration::from_secs(45)));
        assert_eq!(parse_timeout(" 5 "), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("-3"), None);
        assert_eq!(parse_timeout("soon"), None);
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let (url, server) = serve_once(response("401 Unauthorized", b"", r#"{"errors":"bad token"}"#)).await;

        let err = client().get_page(&url).await.unwrap_err();

        assert!(matches!(&err, FetchError::Http { status, url: u } if *status == StatusCode::UNAUTHORIZED && *u == url));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn reads_next_link_and_sends_token() {
        let next = "http://127.0.0.1:1/admin/api/2024-01/products.json?limit=250&page_info=abc";
        let link = format!("Link: <http://127.0.0.1:1/prev>; rel=\"previous\", <{next}>; rel=\"next\"\r\n");
        let (url, server) = serve_once(response("200 OK", link.as_bytes(), ONE_PRODUCT)).await;

        let page = client().get_page(&url).await.unwrap();

        assert_eq!(page.next.as_deref(), Some(next));
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].variants[0].price.as_deref(), Some("9.50"));
        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /admin/api/2024-01/products.json?limit=250 "));
        assert!(request.contains("x-shopify-access-token: shpat_secret"));
    }

    #[tokio::test]
    async fn missing_next_link_ends_pagination() {
        let link = b"Link: <http://127.0.0.1:1/prev>; rel=\"previous\"\r\n";
        let (url, server) = serve_once(response("200 OK", link, ONE_PRODUCT)).await;

        let page = client().get_page(&url).await.unwrap();

        assert_eq!(page.next, None);
        assert_eq!(page.products.len(), 1);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreadable_link_header_is_an_error() {
        let link = b"Link: <http://127.0.0.1:1/caf\xe9>; rel=\"next\"\r\n";
        let (url, server) = serve_once(response("200 OK", link, ONE_PRODUCT)).await;

        let err = client().get_page(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::InvalidLink { .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (url, server) = serve_once(response("200 OK", b"", "<html>oops</html>")).await;

        let err = client().get_page(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)));
        server.await.unwrap();
    }
}
