use chrono::NaiveDateTime;
use serde::Serialize;

use crate::catalog::Product;
use crate::util::time::{feed_timestamp, local_now};

mod entry;
mod price;
mod text;

use entry::FeedEntry;

const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub products: usize,
    pub variants: usize,
    pub entries: usize,
    pub out_of_stock: usize,
}

#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub xml: String,
    pub stats: FeedStats,
}

/// Render the feed stamped with the current local time.
pub fn build_feed(products: &[Product], storefront: &str) -> FeedDocument {
    render_feed(products, storefront, local_now())
}

pub fn render_feed(products: &[Product], storefront: &str, created_at: NaiveDateTime) -> FeedDocument {
    let mut stats = FeedStats { products: products.len(), ..Default::default() };
    let mut xml = String::with_capacity(1024 + products.len() * 1024);
    xml.push_str(XML_PROLOG);
    xml.push('\n');
    xml.push_str("<mywebstore>\n");
    xml.push_str("  <created_at>");
    xml.push_str(&feed_timestamp(created_at));
    xml.push_str("</created_at>\n");
    xml.push_str("  <products>\n");

    for product in products {
        for variant in &product.variants {
            stats.variants += 1;
            match FeedEntry::from_variant(product, variant, storefront) {
                Some(entry) => {
                    entry.write_xml(&mut xml);
                    stats.entries += 1;
                }
                None => stats.out_of_stock += 1,
            }
        }
    }

    xml.push_str("  </products>\n");
    xml.push_str("</mywebstore>\n");
    FeedDocument { xml, stats }
}
