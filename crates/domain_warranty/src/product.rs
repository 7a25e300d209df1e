//! Product catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::{BusinessId, FieldErrors, ProductId};

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Electronics,
    Appliances,
    Furniture,
    Automotive,
    Other,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "electronics",
            ProductCategory::Appliances => "appliances",
            ProductCategory::Furniture => "furniture",
            ProductCategory::Automotive => "automotive",
            ProductCategory::Other => "other",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electronics" => Ok(ProductCategory::Electronics),
            "appliances" => Ok(ProductCategory::Appliances),
            "furniture" => Ok(ProductCategory::Furniture),
            "automotive" => Ok(ProductCategory::Automotive),
            "other" => Ok(ProductCategory::Other),
            _ => Err(format!("Unknown product category: {}", s)),
        }
    }
}

/// Input for adding a product to a business catalog
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 2, message = "Product name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    pub category: ProductCategory,
    #[validate(range(min = 1, message = "Warranty period must be at least 1 month"))]
    pub warranty_months: u32,
    #[validate(length(min = 3, message = "Serial number format is required"))]
    pub serial_format: String,
}

impl NewProduct {
    /// Strips surrounding whitespace from the text fields
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            serial_format: self.serial_format.trim().to_string(),
            ..self
        }
    }
}

/// A business-owned catalog entry carrying the warranty term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub business_id: BusinessId,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    /// Warranty term in calendar months, at least 1
    pub warranty_months: u32,
    /// Serial number pattern, e.g. `LPX1-####-####`
    pub serial_format: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Validates the input and creates a product owned by `business_id`
    pub fn create(
        business_id: BusinessId,
        input: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Self, FieldErrors> {
        let input = input.trimmed();
        input.validate()?;

        Ok(Self {
            id: ProductId::new_v7(),
            business_id,
            name: input.name,
            description: input.description,
            category: input.category,
            warranty_months: input.warranty_months,
            serial_format: input.serial_format,
            created_at: now,
            updated_at: now,
        })
    }

    /// True if a serial number's prefix appears in this product's format
    pub fn matches_serial(&self, serial_number: &str) -> bool {
        let prefix = serial_prefix(serial_number);
        !prefix.is_empty() && self.serial_format.contains(prefix)
    }

    pub fn is_owned_by(&self, business_id: BusinessId) -> bool {
        self.business_id == business_id
    }
}

/// The part of a serial number before the first `-`
pub fn serial_prefix(serial_number: &str) -> &str {
    let trimmed = serial_number.trim();
    trimmed.split('-').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewProduct {
        NewProduct {
            name: "UltraBook Pro".to_string(),
            description: "14 inch laptop with aluminium chassis".to_string(),
            category: ProductCategory::Electronics,
            warranty_months: 24,
            serial_format: "LPX1-####-####".to_string(),
        }
    }

    #[test]
    fn test_create_product() {
        let business_id = BusinessId::new();
        let product = Product::create(business_id, input(), Utc::now()).unwrap();

        assert_eq!(product.business_id, business_id);
        assert_eq!(product.warranty_months, 24);
        assert!(product.is_owned_by(business_id));
    }

    #[test]
    fn test_create_product_collects_field_errors() {
        let bad = NewProduct {
            name: "X".to_string(),
            description: "short".to_string(),
            warranty_months: 0,
            serial_format: "AB".to_string(),
            ..input()
        };

        let errors = Product::create(BusinessId::new(), bad, Utc::now()).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["description", "name", "serial_format", "warranty_months"]);
    }

    #[test]
    fn test_padding_does_not_count_towards_lengths() {
        let padded = NewProduct {
            name: "   X   ".to_string(),
            description: "  short     ".to_string(),
            serial_format: " AB ".to_string(),
            ..input()
        };

        let errors = Product::create(BusinessId::new(), padded, Utc::now()).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["description", "name", "serial_format"]);

        let product = Product::create(
            BusinessId::new(),
            NewProduct { name: "  UltraBook Pro  ".to_string(), ..input() },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(product.name, "UltraBook Pro");
    }

    #[test]
    fn test_serial_prefix() {
        assert_eq!(serial_prefix("LPX1-7845-9371"), "LPX1");
        assert_eq!(serial_prefix("NODASH123"), "NODASH123");
        assert_eq!(serial_prefix("  LPX1-1  "), "LPX1");
    }

    #[test]
    fn test_matches_serial() {
        let product = Product::create(BusinessId::new(), input(), Utc::now()).unwrap();
        assert!(product.matches_serial("LPX1-7845-9371"));
        assert!(!product.matches_serial("TV55-0001-0002"));
        assert!(!product.matches_serial("-0001"));
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ProductCategory::Appliances).unwrap();
        assert_eq!(json, "\"appliances\"");
        assert_eq!("furniture".parse::<ProductCategory>().unwrap(), ProductCategory::Furniture);
    }
}
