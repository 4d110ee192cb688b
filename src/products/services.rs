use tracing::info;
use uuid::Uuid;

use super::{
    model::{NewProduct, Product, ProductChanges},
    repo::ProductRepo,
};
use crate::error::AppError;

const NOT_FOUND_OR_NOT_OWNED: &str = "Product not found or you do not have permission to modify it.";

pub async fn list_approved(products: &dyn ProductRepo) -> Result<Vec<Product>, AppError> {
    Ok(products.list_approved().await?)
}

pub async fn list_owned(products: &dyn ProductRepo, owner_id: Uuid) -> Result<Vec<Product>, AppError> {
    Ok(products.list_by_owner(owner_id).await?)
}

pub async fn create(products: &dyn ProductRepo, new: NewProduct) -> Result<Product, AppError> {
    let product = products.insert(new).await?;
    info!(product_id = %product.id, owner_id = %product.owner_id, "product created");
    Ok(product)
}

/// Owner-only. A product owned by someone else is reported as missing.
pub async fn update(
    products: &dyn ProductRepo,
    id: Uuid,
    owner_id: Uuid,
    changes: ProductChanges,
) -> Result<Product, AppError> {
    let product = products
        .update_owned(id, owner_id, changes)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND_OR_NOT_OWNED))?;
    info!(product_id = %id, %owner_id, "product updated");
    Ok(product)
}

/// Owner-only, same masking as [`update`].
pub async fn delete(products: &dyn ProductRepo, id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
    if !products.delete_owned(id, owner_id).await? {
        return Err(AppError::not_found(NOT_FOUND_OR_NOT_OWNED));
    }
    info!(product_id = %id, %owner_id, "product deleted");
    Ok(())
}

/// Moves a product between pending and approved. Idempotent.
pub async fn set_approval(
    products: &dyn ProductRepo,
    id: Uuid,
    approved: bool,
) -> Result<Product, AppError> {
    let product = products
        .set_approved(id, approved)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found."))?;
    if approved {
        info!(product_id = %id, "product approved");
    } else {
        info!(product_id = %id, "product disapproved");
    }
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::memory::MemoryProductRepo;

    fn new_product(owner_id: Uuid) -> NewProduct {
        NewProduct {
            name: "P".into(),
            description: "D".into(),
            price: 10.0,
            quantity: 1,
            owner_id,
        }
    }

    #[tokio::test]
    async fn new_products_start_pending() {
        let repo = MemoryProductRepo::new();
        let p = create(&repo, new_product(Uuid::new_v4())).await.unwrap();
        assert!(!p.is_approved);
        assert!(list_approved(&repo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_owner_update_and_delete_are_not_found() {
        let repo = MemoryProductRepo::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let p = create(&repo, new_product(owner)).await.unwrap();

        let changes = ProductChanges {
            name: Some("hijacked".into()),
            ..Default::default()
        };
        let err = update(&repo, p.id, stranger, changes.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = delete(&repo, p.id, stranger).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Same answer for an id that does not exist at all.
        let missing = update(&repo, Uuid::new_v4(), stranger, changes).await.unwrap_err();
        assert_eq!(missing.to_string(), err.to_string());

        let still = list_owned(&repo, owner).await.unwrap();
        assert_eq!(still[0].name, "P");
    }

    #[tokio::test]
    async fn owner_can_update_and_delete() {
        let repo = MemoryProductRepo::new();
        let owner = Uuid::new_v4();
        let p = create(&repo, new_product(owner)).await.unwrap();

        let updated = update(
            &repo,
            p.id,
            owner,
            ProductChanges {
                quantity: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.price, 10.0);

        delete(&repo, p.id, owner).await.unwrap();
        assert!(list_owned(&repo, owner).await.unwrap().is_empty());
        let err = delete(&repo, p.id, owner).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn approval_is_idempotent_and_reversible() {
        let repo = MemoryProductRepo::new();
        let p = create(&repo, new_product(Uuid::new_v4())).await.unwrap();

        assert!(set_approval(&repo, p.id, true).await.unwrap().is_approved);
        assert!(set_approval(&repo, p.id, true).await.unwrap().is_approved);
        assert_eq!(list_approved(&repo).await.unwrap().len(), 1);

        assert!(!set_approval(&repo, p.id, false).await.unwrap().is_approved);
        assert!(list_approved(&repo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn approving_unknown_product_is_not_found() {
        let repo = MemoryProductRepo::new();
        let err = set_approval(&repo, Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_owned_filters_by_owner() {
        let repo = MemoryProductRepo::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        create(&repo, new_product(a)).await.unwrap();
        create(&repo, new_product(a)).await.unwrap();
        create(&repo, new_product(b)).await.unwrap();
        assert_eq!(list_owned(&repo, a).await.unwrap().len(), 2);
        assert_eq!(list_owned(&repo, b).await.unwrap().len(), 1);
    }
}
