//! Product catalog service.
//!
//! Business rules over the product repository: the discount invariant
//! (`original_price >= price` on every stored state), slug derivation, and
//! the search-query minimum. Mutations are authorization-gated upstream by
//! the admin extractor; this service performs no authorization checks.

use std::sync::Arc;

use thiserror::Error;

use debandi_core::{ProductId, Slug};

use crate::models::product::{NewProduct, Product, UpdateProduct};
use crate::store::{CreateProduct, ProductRepository, RepositoryError};

/// Minimum length of a trimmed search query.
const MIN_SEARCH_LENGTH: usize = 2;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// No product with the given id or slug.
    #[error("product not found")]
    NotFound,

    /// The original price is below the current price.
    #[error("original price cannot be less than the current price")]
    InvalidPrice,

    /// The trimmed search query is under the minimum length.
    #[error("search query must be at least 2 characters")]
    InvalidSearchQuery,

    /// The derived slug collides with an existing product.
    #[error("a product with this name already exists")]
    SlugTaken,

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

/// Product catalog service.
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

impl ProductService {
    /// Create a new product service.
    #[must_use]
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// All products, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` if the backend fails.
    pub fn list(&self) -> Result<Vec<Product>, ProductError> {
        self.products.find_all().map_err(ProductError::Repository)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the id is absent.
    pub fn get(&self, id: ProductId) -> Result<Product, ProductError> {
        self.products
            .find_by_id(id)
            .map_err(ProductError::Repository)?
            .ok_or(ProductError::NotFound)
    }

    /// Get a product by slug.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the slug is absent.
    pub fn get_by_slug(&self, slug: &Slug) -> Result<Product, ProductError> {
        self.products
            .find_by_slug(slug)
            .map_err(ProductError::Repository)?
            .ok_or(ProductError::NotFound)
    }

    /// Products in a category (case-insensitive equality).
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` if the backend fails.
    pub fn by_category(&self, category: &str) -> Result<Vec<Product>, ProductError> {
        self.products
            .find_by_category(category)
            .map_err(ProductError::Repository)
    }

    /// Case-insensitive substring search over name, description, and brand.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::InvalidSearchQuery` if the trimmed query is
    /// under 2 characters.
    pub fn search(&self, query: &str) -> Result<Vec<Product>, ProductError> {
        let query = query.trim();
        if query.len() < MIN_SEARCH_LENGTH {
            return Err(ProductError::InvalidSearchQuery);
        }

        self.products
            .search(query)
            .map_err(ProductError::Repository)
    }

    /// Create a product.
    ///
    /// Derives the slug from the trimmed name. New products start unrated
    /// with an empty spec sheet, and the thumbnail defaults to the image.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::InvalidPrice` if an original price is supplied
    /// below the price, leaving stored state unchanged.
    pub fn create(&self, data: NewProduct) -> Result<Product, ProductError> {
        if data.original_price.is_some_and(|op| op < data.price) {
            return Err(ProductError::InvalidPrice);
        }

        let name = data.name.trim().to_owned();
        let slug = Slug::from_name(&name);

        let product = self
            .products
            .create(CreateProduct {
                slug,
                description: data.description.trim().to_owned(),
                price: data.price,
                original_price: data.original_price,
                category: data.category.trim().to_owned(),
                thumbnail: data.image.clone(),
                image: data.image,
                rating: 0.0,
                stock: data.stock,
                brand: data.brand.map(|b| b.trim().to_owned()),
                specs: serde_json::Map::new(),
                name,
            })
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ProductError::SlugTaken,
            })?;

        tracing::info!(product_id = %product.id, slug = %product.slug, "product created");
        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// The discount invariant is checked against the merged record, not just
    /// the patch, so an update can never leave a stored product with
    /// `original_price < price`. A name change re-derives the slug.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the id is absent and
    /// `ProductError::InvalidPrice` on an invariant violation; failed updates
    /// leave stored state unchanged.
    pub fn update(&self, id: ProductId, patch: UpdateProduct) -> Result<Product, ProductError> {
        let current = self.get(id)?;

        let price = patch.price.unwrap_or(current.price);
        let original_price = patch.original_price.or(current.original_price);
        if original_price.is_some_and(|op| op < price) {
            return Err(ProductError::InvalidPrice);
        }

        let (name, slug) = match patch.name {
            Some(name) => {
                let name = name.trim().to_owned();
                let slug = Slug::from_name(&name);
                (name, slug)
            }
            None => (current.name, current.slug),
        };

        let merged = Product {
            id,
            name,
            slug,
            description: patch
                .description
                .map_or(current.description, |d| d.trim().to_owned()),
            price,
            original_price,
            category: patch
                .category
                .map_or(current.category, |c| c.trim().to_owned()),
            image: patch.image.unwrap_or(current.image),
            thumbnail: current.thumbnail,
            rating: current.rating,
            stock: patch.stock.unwrap_or(current.stock),
            brand: patch.brand.map(|b| b.trim().to_owned()).or(current.brand),
            specs: current.specs,
        };

        let updated = self
            .products
            .replace(merged)
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ProductError::SlugTaken,
            })?
            .ok_or(ProductError::NotFound)?;

        tracing::info!(product_id = %updated.id, "product updated");
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the id is absent.
    pub fn delete(&self, id: ProductId) -> Result<(), ProductError> {
        let deleted = self
            .products
            .delete(id)
            .map_err(ProductError::Repository)?;

        if !deleted {
            return Err(ProductError::NotFound);
        }

        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}
