use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

/// Variant title Shopify assigns when a product has no options.
pub const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Raw page body. Products stay as JSON until [`ProductsPage::into_products`]
/// so one malformed record cannot fail the whole page.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<Value>,
}

impl ProductsPage {
    /// Decode each product on its own, dropping (and logging) the ones that fail.
    pub fn into_products(self) -> Vec<Product> {
        self.products
            .into_iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let id = raw.get("id").map(Value::to_string).unwrap_or_else(|| "?".to_string());
                match serde_json::from_value::<Product>(raw) {
                    Ok(p) => Some(p),
                    Err(e) => {
                        warn!(product_id = %id, index = idx, error = %e, "skipping undecodable product");
                        None
                    }
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub handle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Variant {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "decimal_text")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "decimal_text")]
    pub compare_at_price: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inventory_quantity: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub image_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Image {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub src: String,
}

impl Product {
    pub fn image_by_id(&self, id: i64) -> Option<&Image> {
        self.images.iter().find(|img| img.id == id)
    }
}

impl Variant {
    /// Variant title when it actually distinguishes the variant from its product.
    pub fn distinct_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != DEFAULT_VARIANT_TITLE)
    }

    pub fn in_stock(&self) -> bool {
        self.inventory_quantity > 0
    }
}

fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

// Prices arrive as strings ("19.50") from the REST API but older payloads and
// hand-written fixtures use plain numbers.
fn decimal_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => {
            debug!(value = %other, "ignoring non-numeric price");
            Ok(None)
        }
    }
}
