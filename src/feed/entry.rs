use std::fmt::Write as _;

use crate::catalog::{Image, Product, Variant};

use super::price::{compute_discount, format_price, full_price};
use super::text::{cdata, escape, sanitize};

pub const MAX_ADDITIONAL_IMAGES: usize = 10;
pub const UNCATEGORIZED: &str = "Uncategorized";
const SHIPPING_COST: &str = "0.00";
const AVAILABILITY: &str = "2 days";

/// One `<product>` element, already escaped and ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub name: String,
    pub link: String,
    pub image: String,
    pub price: String,
    pub full_price: String,
    pub manufacturer: String,
    pub mpn: String,
    pub ean: String,
    pub description: String,
    pub additional_images: Vec<String>,
    pub discount: Option<String>,
    pub quantity: i64,
    pub category: String,
}

impl FeedEntry {
    /// `None` for variants that are out of stock.
    pub fn from_variant(product: &Product, variant: &Variant, storefront: &str) -> Option<Self> {
        if !variant.in_stock() {
            return None;
        }

        let raw_name = match variant.distinct_title() {
            Some(v) => format!("{} {}", product.title, v),
            None => product.title.clone(),
        };

        let primary = primary_image(product, variant);
        let additional_images = product
            .images
            .iter()
            .filter(|img| primary.is_none_or(|p| p.id != img.id))
            .take(MAX_ADDITIONAL_IMAGES)
            .map(|img| escape(&img.src))
            .collect();

        let price = format_price(variant.price.as_deref());
        let full_price = full_price(&price, variant.compare_at_price.as_deref());
        let discount = compute_discount(&price, &full_price);

        let description = match sanitize(product.body_html.as_deref()) {
            d if d.is_empty() => sanitize(Some(&product.title)),
            d => d,
        };

        Some(FeedEntry {
            id: variant.id.to_string(),
            name: sanitize(Some(&raw_name)),
            link: escape(&product_link(storefront, &product.handle, variant.id)),
            image: primary.map(|img| escape(&img.src)).unwrap_or_default(),
            price,
            full_price,
            manufacturer: sanitize(product.vendor.as_deref()),
            mpn: sanitize(variant.sku.as_deref()),
            ean: sanitize(variant.barcode.as_deref()),
            description,
            additional_images,
            discount,
            quantity: variant.inventory_quantity,
            category: category(product.product_type.as_deref()),
        })
    }

    pub fn write_xml(&self, out: &mut String) {
        out.push_str("    <product>\n");
        field(out, "id", &self.id);
        field(out, "name", &self.name);
        field(out, "link", &self.link);
        field(out, "image", &self.image);
        field(out, "price", &self.price);
        field(out, "full_price", &self.full_price);
        field(out, "manufacturer", &self.manufacturer);
        field(out, "mpn", &self.mpn);
        field(out, "instock", "Y");
        field(out, "ean", &self.ean);
        field(out, "description", &self.description);
        if self.additional_images.is_empty() {
            out.push_str("      <additionalimage/>\n");
        } else {
            out.push_str("      <additionalimage>\n");
            for (i, src) in self.additional_images.iter().enumerate() {
                let _ = writeln!(out, "        <image{n}>{src}</image{n}>", n = i + 1);
            }
            out.push_str("      </additionalimage>\n");
        }
        if let Some(discount) = &self.discount {
            field(out, "discount", discount);
        }
        field(out, "quantity", &self.quantity.to_string());
        field(out, "category", &self.category);
        field(out, "shiping", SHIPPING_COST);
        field(out, "availability", AVAILABILITY);
        out.push_str("    </product>\n");
    }
}

fn field(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "      <{name}>{value}</{name}>");
}

/// The variant's own image when it references one we know, else the first
/// product image.
fn primary_image<'a>(product: &'a Product, variant: &Variant) -> Option<&'a Image> {
    variant
        .image_id
        .and_then(|id| product.image_by_id(id))
        .or_else(|| product.images.first())
}

fn product_link(storefront: &str, handle: &str, variant_id: i64) -> String {
    format!("https://{storefront}/products/{handle}?variant={variant_id}")
}

// Consumers choke on escaped `&gt;` in category paths, so those go in CDATA.
fn category(raw: Option<&str>) -> String {
    let raw = raw.filter(|s| !s.trim().is_empty()).unwrap_or(UNCATEGORIZED);
    if raw.contains('>') { cdata(raw) } else { escape(raw) }
}
