use serde::{Deserialize, Serialize};

use shelfwise_core::{Entity, ProductId};

use crate::units;

/// Product status.
///
/// `OutOfStock` is derived from the stock level; `Inactive` is only ever set
/// by an explicit edit and is never auto-corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    Active,
    Inactive,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "Active",
            ProductStatus::Inactive => "Inactive",
            ProductStatus::OutOfStock => "Out of Stock",
        }
    }
}

impl core::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable packaging option.
///
/// `mrp` and `selling_price` are integers in the smallest currency unit
/// (paise), on the wire as well. Records that carry major-unit decimals such
/// as `49.5` must be converted (×100) before they reach this type; a
/// fractional number is rejected on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub unit: String,
    pub mrp: u64,
    pub selling_price: u64,
}

impl ProductVariant {
    pub fn new(unit: impl Into<String>, mrp: u64, selling_price: u64) -> Self {
        Self {
            unit: unit.into(),
            mrp,
            selling_price,
        }
    }

    /// Grams-equivalent one unit of this variant draws from the stock pool.
    pub fn grams_per_unit(&self) -> u64 {
        units::grams_equivalent(&self.unit)
    }

    pub fn is_stock_tracked(&self) -> bool {
        self.grams_per_unit() > 0
    }
}

/// Catalog product. All variants share `total_stock_grams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: ProductStatus,
    pub total_stock_grams: u64,
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Look a variant up by its unit label (exact match).
    pub fn variant(&self, unit: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.unit == unit)
    }

    /// Unit labels that cannot be tracked against the grams pool.
    pub fn untracked_units(&self) -> Vec<&str> {
        self.variants
            .iter()
            .filter(|v| !v.is_stock_tracked())
            .map(|v| v.unit.as_str())
            .collect()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rice() -> Product {
        Product {
            id: ProductId::new(),
            sku: "RICE-01".to_string(),
            name: "Basmati Rice".to_string(),
            description: String::new(),
            category: "Grains".to_string(),
            brand: String::new(),
            tags: vec![],
            image_url: None,
            status: ProductStatus::Active,
            total_stock_grams: 1000,
            variants: vec![
                ProductVariant::new("1kg", 120, 110),
                ProductVariant::new("500g", 65, 60),
                ProductVariant::new("1 Dozen", 0, 0),
            ],
        }
    }

    #[test]
    fn variant_lookup_by_exact_unit() {
        let p = rice();
        assert_eq!(p.variant("500g").map(|v| v.grams_per_unit()), Some(500));
        assert!(p.variant("2kg").is_none());
    }

    #[test]
    fn reports_untracked_units() {
        assert_eq!(rice().untracked_units(), vec!["1 Dozen"]);
    }

    #[test]
    fn wire_format_uses_original_names() {
        let json = serde_json::to_value(rice()).unwrap();
        assert_eq!(json["totalStockGrams"], 1000);
        assert_eq!(json["variants"][0]["sellingPrice"], 110);
        assert!(json.get("imageUrl").is_none());

        let status: ProductStatus = serde_json::from_str("\"Out of Stock\"").unwrap();
        assert_eq!(status, ProductStatus::OutOfStock);
    }

    #[test]
    fn prices_are_whole_minor_units() {
        let v: ProductVariant =
            serde_json::from_str(r#"{"unit":"500g","mrp":5500,"sellingPrice":4950}"#).unwrap();
        assert_eq!(v.selling_price, 4950);

        let major = serde_json::from_str::<ProductVariant>(r#"{"unit":"500g","mrp":55,"sellingPrice":49.5}"#);
        assert!(major.is_err());
    }
}
