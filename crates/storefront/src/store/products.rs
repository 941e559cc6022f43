//! Product repository.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{PoisonError, RwLock};

use debandi_core::{Price, ProductId, Slug};

use super::RepositoryError;
use crate::models::product::Product;

/// Fields for inserting a product; the repository assigns the ID.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub price: Price,
    pub original_price: Option<Price>,
    pub category: String,
    pub image: String,
    pub thumbnail: String,
    pub rating: f32,
    pub stock: u32,
    pub brand: Option<String>,
    pub specs: serde_json::Map<String, serde_json::Value>,
}

/// Repository for catalog products.
pub trait ProductRepository: Send + Sync {
    /// All products, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Look up a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Look up a product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_by_slug(&self, slug: &Slug) -> Result<Option<Product>, RepositoryError>;

    /// Products in a category (case-insensitive equality).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError>;

    /// Case-insensitive substring search over name, description, and brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError>;

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    fn create(&self, data: CreateProduct) -> Result<Product, RepositoryError>;

    /// Replace an existing product wholesale.
    ///
    /// Returns `None` if no product has the given ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug collides with a
    /// different product.
    fn replace(&self, product: Product) -> Result<Option<Product>, RepositoryError>;

    /// Delete a product. Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

/// In-memory, seeded product store.
///
/// A `BTreeMap` keeps listings in stable ID order.
pub struct MemoryProductRepository {
    records: RwLock<BTreeMap<ProductId, Product>>,
    next_id: AtomicI32,
}

impl MemoryProductRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Number of stored products (test observability).
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<ProductId, Product>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<ProductId, Product>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductRepository for MemoryProductRepository {
    fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.read().values().cloned().collect())
    }

    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read().get(&id).cloned())
    }

    fn find_by_slug(&self, slug: &Slug) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read().values().find(|p| &p.slug == slug).cloned())
    }

    fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .read()
            .values()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect())
    }

    fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let query = query.to_lowercase();
        Ok(self
            .read()
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
                    || p.brand
                        .as_ref()
                        .is_some_and(|b| b.to_lowercase().contains(&query))
            })
            .cloned()
            .collect())
    }

    fn create(&self, data: CreateProduct) -> Result<Product, RepositoryError> {
        let mut records = self.write();

        if records.values().any(|p| p.slug == data.slug) {
            return Err(RepositoryError::Conflict("slug already exists".to_owned()));
        }

        let id = ProductId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let product = Product {
            id,
            name: data.name,
            slug: data.slug,
            description: data.description,
            price: data.price,
            original_price: data.original_price,
            category: data.category,
            image: data.image,
            thumbnail: data.thumbnail,
            rating: data.rating,
            stock: data.stock,
            brand: data.brand,
            specs: data.specs,
        };

        records.insert(id, product.clone());
        Ok(product)
    }

    fn replace(&self, product: Product) -> Result<Option<Product>, RepositoryError> {
        let mut records = self.write();

        if !records.contains_key(&product.id) {
            return Ok(None);
        }

        if records
            .values()
            .any(|p| p.slug == product.slug && p.id != product.id)
        {
            return Err(RepositoryError::Conflict("slug already exists".to_owned()));
        }

        records.insert(product.id, product.clone());
        Ok(Some(product))
    }

    fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self.write().remove(&id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn create_data(name: &str) -> CreateProduct {
        CreateProduct {
            name: name.to_owned(),
            slug: Slug::from_name(name),
            description: "desc".to_owned(),
            price: Price::from_cents(1999).unwrap(),
            original_price: None,
            category: "herramientas".to_owned(),
            image: "/img.jpg".to_owned(),
            thumbnail: "/img.jpg".to_owned(),
            rating: 0.0,
            stock: 5,
            brand: Some("Bosch".to_owned()),
            specs: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let repo = MemoryProductRepository::new();
        let a = repo.create(create_data("Taladro")).unwrap();
        let b = repo.create(create_data("Sierra")).unwrap();
        assert_eq!(a.id.as_i32(), 1);
        assert_eq!(b.id.as_i32(), 2);
    }

    #[test]
    fn test_duplicate_slug_conflicts() {
        let repo = MemoryProductRepository::new();
        repo.create(create_data("Taladro")).unwrap();
        let err = repo.create(create_data("Taladro")).unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[test]
    fn test_find_by_slug() {
        let repo = MemoryProductRepository::new();
        repo.create(create_data("Mazo de Goma 32oz")).unwrap();

        let found = repo
            .find_by_slug(&Slug::from_raw("mazo-de-goma-32oz"))
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let repo = MemoryProductRepository::new();
        repo.create(create_data("Taladro")).unwrap();

        assert_eq!(repo.find_by_category("Herramientas").unwrap().len(), 1);
        assert_eq!(repo.find_by_category("sierras").unwrap().len(), 0);
    }

    #[test]
    fn test_search_matches_name_description_brand() {
        let repo = MemoryProductRepository::new();
        repo.create(create_data("Taladro DeWalt")).unwrap();

        assert_eq!(repo.search("taladro").unwrap().len(), 1);
        assert_eq!(repo.search("desc").unwrap().len(), 1);
        assert_eq!(repo.search("bosch").unwrap().len(), 1);
        assert_eq!(repo.search("makita").unwrap().len(), 0);
    }

    #[test]
    fn test_replace_checks_slug_collision() {
        let repo = MemoryProductRepository::new();
        let a = repo.create(create_data("Taladro")).unwrap();
        repo.create(create_data("Sierra")).unwrap();

        let mut renamed = a.clone();
        renamed.slug = Slug::from_raw("sierra");
        assert!(matches!(
            repo.replace(renamed).unwrap_err(),
            RepositoryError::Conflict(_)
        ));

        // Replacing with its own slug is fine
        let same = repo.replace(a).unwrap();
        assert!(same.is_some());
    }

    #[test]
    fn test_replace_missing_returns_none() {
        let repo = MemoryProductRepository::new();
        let product = repo.create(create_data("Taladro")).unwrap();
        repo.delete(product.id).unwrap();

        assert!(repo.replace(product).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let repo = MemoryProductRepository::new();
        let product = repo.create(create_data("Taladro")).unwrap();

        assert!(repo.delete(product.id).unwrap());
        assert!(!repo.delete(product.id).unwrap());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_find_all_in_id_order() {
        let repo = MemoryProductRepository::new();
        repo.create(create_data("Uno")).unwrap();
        repo.create(create_data("Dos")).unwrap();
        repo.create(create_data("Tres")).unwrap();

        let ids: Vec<i32> = repo
            .find_all()
            .unwrap()
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
