use async_trait::async_trait;

use crate::telemetry::{self};
use crate::telemetry::ops::generate::Phase as GeneratePhase;

mod error;
mod link;
pub mod shopify;
pub mod types;

pub use error::FetchError;
pub use link::next_link;
pub use types::{Image, Product, Variant};

/// One decoded page of the catalog plus its pagination cue.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub products: Vec<Product>,
    pub next: Option<String>,
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn get_page(&self, url: &str) -> Result<Page, FetchError>;
}

/// Walk the catalog from `first_url` until a page carries no `next` relation.
///
/// Empty pages do not end the walk; only a missing `next` does. The first
/// failing request aborts the whole fetch.
pub async fn fetch_all_products<C>(client: &C, first_url: &str) -> Result<Vec<Product>, FetchError>
where
    C: CatalogClient + ?Sized,
{
    let log = telemetry::generate();
    let _s = log.span(&GeneratePhase::Fetch).entered();

    let mut products: Vec<Product> = Vec::new();
    let mut url = first_url.to_string();
    let mut pages = 0usize;
    loop {
        pages += 1;
        let page = {
            let _p = log.span_kv(&GeneratePhase::Page, [("page", pages.to_string()), ("url", url.clone())]).entered();
            client.get_page(&url).await?
        };
        log.debug_kv("page fetched", [("page", pages.to_string()), ("products", page.products.len().to_string())]);
        products.extend(page.products);
        match page.next {
            Some(next) => url = next,
            None => break,
        }
    }
    log.info(format!("📦 Catalog fetched — pages={} products={}", pages, products.len()));
    Ok(products)
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    pub struct MockCatalog {
        pages: Mutex<VecDeque<Result<Page, FetchError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_page(&self, page: Result<Page, FetchError>) {
            self.pages.lock().unwrap().push_back(page);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogClient for MockCatalog {
        async fn get_page(&self, url: &str) -> Result<Page, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("no page queued for {url}"))
        }
    }
}
