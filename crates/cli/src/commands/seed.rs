//! Seed the catalog with products from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Enamel Mug
//!     description: 12 oz camp mug
//!     price: 14.50
//!     image_url: uploads/mug.png   # optional, relative to the static root
//! ```
//!
//! Prices may be numbers or strings and go through the same coercion as the
//! admin form. The whole file is validated before anything is inserted.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use bazaar_storefront::config::DatabaseConfig;
use bazaar_storefront::db::{self, PgProductRepository, ProductStore};
use bazaar_storefront::models::NewProduct;

/// Top-level seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub products: Vec<SeedProduct>,
}

/// One product entry in a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: SeedPrice,
    #[serde(default)]
    pub image_url: String,
}

/// A price written either as a YAML number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SeedPrice {
    Number(f64),
    Text(String),
}

impl Default for SeedPrice {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl SeedPrice {
    fn as_raw(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

impl SeedProduct {
    /// Convert into an insertable product.
    #[must_use]
    pub fn to_new_product(&self) -> NewProduct {
        NewProduct::from_form(
            &self.name,
            &self.description,
            &self.price.as_raw(),
            self.image_url.clone(),
        )
    }
}

/// Check a seed file for entries that would produce broken products.
///
/// Returns one message per problem; empty means valid.
#[must_use]
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();

    if seed.products.is_empty() {
        errors.push("file contains no products".to_string());
    }

    for (index, product) in seed.products.iter().enumerate() {
        let position = index + 1;
        if product.name.trim().is_empty() {
            errors.push(format!("product #{position}: name is empty"));
        }
        if matches!(&product.price, SeedPrice::Number(value) if !value.is_finite() || *value < 0.0)
        {
            errors.push(format!(
                "product #{position} ({}): price must be a non-negative number",
                product.name
            ));
        }
        let image = Path::new(&product.image_url);
        if image.is_absolute() || product.image_url.contains("..") {
            errors.push(format!(
                "product #{position} ({}): image_url must be relative to the static root",
                product.name
            ));
        }
    }

    errors
}

/// Parse a seed file's contents.
///
/// # Errors
///
/// Returns an error if the YAML does not match the seed format.
pub fn parse(content: &str) -> Result<SeedFile, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Seed products from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML seed file
/// * `dry_run` - Validate only, do not connect to the database
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, validation fails,
/// or database operations fail.
pub async fn products(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let seed = parse(&content)?;
    info!(products = seed.products.len(), "Parsed seed file");

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    if dry_run {
        info!("Dry run: seed file is valid, nothing inserted");
        return Ok(());
    }

    let database = DatabaseConfig::from_env()?;
    let pool = db::create_pool(&database).await?;
    info!("Connected to database");

    let store = PgProductRepository::new(pool);
    for product in &seed.products {
        let inserted = store.insert_product(product.to_new_product()).await?;
        info!(id = %inserted.id, name = %inserted.name, price = %inserted.price, "Inserted product");
    }

    info!("Seeding complete! {} products inserted", seed.products.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const SAMPLE: &str = r#"
products:
  - name: Enamel Mug
    description: Speckled
    price: 14.50
  - name: Linen Tote
    price: "22.00"
    image_url: uploads/tote.png
  - name: Sticker
"#;

    #[test]
    fn test_parse_accepts_number_and_string_prices() {
        let seed = parse(SAMPLE).unwrap();
        assert_eq!(seed.products.len(), 3);

        let mug = seed.products[0].to_new_product();
        assert_eq!(mug.name, "Enamel Mug");
        assert_eq!(mug.price, Decimal::new(1450, 2));

        let tote = seed.products[1].to_new_product();
        assert_eq!(tote.price, Decimal::new(2200, 2));
        assert_eq!(tote.image_url, "uploads/tote.png");
        assert_eq!(tote.description, "");
    }

    #[test]
    fn test_missing_price_defaults_to_zero() {
        let seed = parse(SAMPLE).unwrap();
        assert!(seed.products[2].to_new_product().price.is_zero());
    }

    #[test]
    fn test_validate_sample_is_clean() {
        assert!(validate(&parse(SAMPLE).unwrap()).is_empty());
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let seed = parse(
            r"
products:
  - name: '  '
    price: 3
  - name: Bad price
    price: -1
  - name: Escaping image
    image_url: ../secret.png
",
        )
        .unwrap();

        let errors = validate(&seed);
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("name is empty"));
        assert!(errors[1].contains("Bad price"));
        assert!(errors[2].contains("Escaping image"));
    }

    #[test]
    fn test_validate_rejects_empty_file() {
        let seed = parse("products: []").unwrap();
        assert_eq!(validate(&seed), ["file contains no products"]);
    }

    #[tokio::test]
    async fn test_dry_run_reads_file_without_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        products(path.to_str().unwrap(), true).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let err = products("/nonexistent/products.yaml", true).await.unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
