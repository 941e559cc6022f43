//! Seed data for the in-memory stores.
//!
//! The storefront ships with two demo accounts and the initial tool catalog.
//! Seeding happens once at startup, when the application state is built.

use debandi_core::{Email, Price, PriceError, Slug};
use thiserror::Error;

use super::products::{CreateProduct, MemoryProductRepository, ProductRepository};
use super::users::{MemoryUserRepository, UserRepository};
use super::RepositoryError;
use crate::models::user::NewUser;
use crate::services::auth::{self, AuthError};

/// Errors while building seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed email: {0}")]
    Email(#[from] debandi_core::EmailError),
    #[error("invalid seed price: {0}")]
    Price(#[from] PriceError),
    #[error("failed to hash seed password: {0}")]
    Hash(#[from] AuthError),
    #[error("seed data conflict: {0}")]
    Repository(#[from] RepositoryError),
}

/// Build the user store with the default demo accounts.
///
/// # Errors
///
/// Returns `SeedError` if password hashing fails or the seed data is invalid.
pub fn users() -> Result<MemoryUserRepository, SeedError> {
    let repo = MemoryUserRepository::new();

    repo.create(NewUser {
        email: Email::parse("admin@debandi.com")?,
        password_hash: auth::hash_password("admin123")?,
        first_name: "Admin".to_owned(),
        last_name: "Debandi".to_owned(),
        is_admin: true,
    })?;

    repo.create(NewUser {
        email: Email::parse("cliente@debandi.com")?,
        password_hash: auth::hash_password("cliente123")?,
        first_name: "Cliente".to_owned(),
        last_name: "Debandi".to_owned(),
        is_admin: false,
    })?;

    Ok(repo)
}

/// Build the product store with the initial catalog.
///
/// # Errors
///
/// Returns `SeedError` if the seed data is invalid.
pub fn products() -> Result<MemoryProductRepository, SeedError> {
    let repo = MemoryProductRepository::new();

    for product in catalog()? {
        repo.create(product)?;
    }

    Ok(repo)
}

#[allow(clippy::too_many_lines)]
fn catalog() -> Result<Vec<CreateProduct>, SeedError> {
    Ok(vec![
        CreateProduct {
            name: "Taladro Profesional DeWalt 20V".to_owned(),
            slug: Slug::from_raw("taladro-dewalt-20v"),
            description: "Taladro inalámbrico profesional de alto rendimiento".to_owned(),
            price: Price::from_cents(14_999)?,
            original_price: Some(Price::from_cents(19_999)?),
            category: "taladros".to_owned(),
            image: "/professional-drill.jpg".to_owned(),
            thumbnail: "/professional-drill.jpg".to_owned(),
            rating: 4.8,
            stock: 50,
            brand: Some("DeWalt".to_owned()),
            specs: specs(&[
                ("voltaje", "20V"),
                ("velocidad", "0-500 RPM"),
                ("capacidad", "13mm"),
                ("peso", "1.5kg"),
            ]),
        },
        CreateProduct {
            name: "Sierra Circular Makita 7 1/4\"".to_owned(),
            slug: Slug::from_raw("sierra-circular-makita"),
            description: "Sierra circular de 7 1/4 pulgadas con potencia máxima".to_owned(),
            price: Price::from_cents(8_999)?,
            original_price: Some(Price::from_cents(12_999)?),
            category: "sierras".to_owned(),
            image: "/circular-saw-makita.jpg".to_owned(),
            thumbnail: "/circular-saw.png".to_owned(),
            rating: 4.6,
            stock: 35,
            brand: Some("Makita".to_owned()),
            specs: specs(&[
                ("potencia", "5800W"),
                ("velocidad", "5800 RPM"),
                ("profundidad", "57mm"),
                ("peso", "2.3kg"),
            ]),
        },
        CreateProduct {
            name: "Lijadora Orbital Bosch 5\"".to_owned(),
            slug: Slug::from_raw("lijadora-orbital-bosch"),
            description: "Lijadora orbital profesional de precisión".to_owned(),
            price: Price::from_cents(7_999)?,
            original_price: Some(Price::from_cents(11_999)?),
            category: "lijadoras".to_owned(),
            image: "/orbital-sander-bosch.jpg".to_owned(),
            thumbnail: "/orbital-sander.png".to_owned(),
            rating: 4.7,
            stock: 42,
            brand: Some("Bosch".to_owned()),
            specs: specs(&[
                ("potencia", "350W"),
                ("velocidad", "12000 opm"),
                ("tamaño", "5 pulgadas"),
                ("peso", "1.1kg"),
            ]),
        },
        CreateProduct {
            name: "Juego 40 Destornilladores".to_owned(),
            slug: Slug::from_raw("juego-destornilladores"),
            description: "Set completo de 40 destornilladores profesionales".to_owned(),
            price: Price::from_cents(3_499)?,
            original_price: Some(Price::from_cents(4_999)?),
            category: "destornilladores".to_owned(),
            image: "/screwdriver-set-professional.jpg".to_owned(),
            thumbnail: "/screwdriver-set.jpg".to_owned(),
            rating: 4.9,
            stock: 100,
            brand: Some("Stanley".to_owned()),
            specs: specs(&[
                ("cantidad", "40 piezas"),
                ("tipos", "Phillips, Slotted, Square"),
                ("estuche", "Incluido"),
            ]),
        },
        CreateProduct {
            name: "Mazo de Goma 32oz".to_owned(),
            slug: Slug::from_raw("mazo-goma-32oz"),
            description: "Mazo profesional de goma de alta calidad".to_owned(),
            price: Price::from_cents(1_599)?,
            original_price: Some(Price::from_cents(2_499)?),
            category: "herramientas-manuales".to_owned(),
            image: "/rubber-mallet-hammer.jpg".to_owned(),
            thumbnail: "/rubber-mallet.jpg".to_owned(),
            rating: 4.8,
            stock: 80,
            brand: Some("Estwing".to_owned()),
            specs: specs(&[
                ("peso", "32oz (907g)"),
                ("material", "Goma de nylon"),
                ("mango", "Acero templado"),
            ]),
        },
        CreateProduct {
            name: "Casco de Seguridad Amarillo".to_owned(),
            slug: Slug::from_raw("casco-amarillo"),
            description: "Casco profesional ANSI certificado".to_owned(),
            price: Price::from_cents(1_299)?,
            original_price: Some(Price::from_cents(1_999)?),
            category: "seguridad".to_owned(),
            image: "/yellow-safety-helmet.jpg".to_owned(),
            thumbnail: "/yellow-safety-helmet.png".to_owned(),
            rating: 4.7,
            stock: 200,
            brand: Some("3M".to_owned()),
            specs: specs(&[
                ("certificacion", "ANSI Z89.1"),
                ("material", "ABS"),
                ("peso", "400g"),
            ]),
        },
    ])
}

fn specs(pairs: &[(&str, &str)]) -> serde_json::Map<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), serde_json::Value::from(*v)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use debandi_core::UserId;

    #[test]
    fn test_seeded_catalog() {
        let repo = products().unwrap();
        assert_eq!(repo.len(), 6);

        let drill = repo
            .find_by_slug(&Slug::from_raw("taladro-dewalt-20v"))
            .unwrap()
            .unwrap();
        assert_eq!(drill.id.as_i32(), 1);
        assert_eq!(drill.brand.as_deref(), Some("DeWalt"));
        assert!(drill.original_price.unwrap() >= drill.price);
    }

    #[test]
    fn test_seeded_prices_honor_discount_invariant() {
        let repo = products().unwrap();
        for product in repo.find_all().unwrap() {
            if let Some(original) = product.original_price {
                assert!(original >= product.price, "seed violates price invariant");
            }
        }
    }

    #[test]
    fn test_seeded_users() {
        let repo = users().unwrap();
        assert_eq!(repo.len(), 2);

        let admin = repo.find_by_id(UserId::new(1)).unwrap().unwrap();
        assert_eq!(admin.email.as_str(), "admin@debandi.com");
        assert!(admin.is_admin);

        let customer = repo.find_by_id(UserId::new(2)).unwrap().unwrap();
        assert!(!customer.is_admin);
    }

    #[test]
    fn test_seeded_password_is_hashed() {
        let repo = users().unwrap();
        let email = Email::parse("admin@debandi.com").unwrap();
        let (_, hash) = repo.credentials(&email).unwrap().unwrap();
        assert_ne!(hash, "admin123");
        assert!(hash.starts_with("$argon2"));
    }
}
