// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product catalog managed by sellers.
//!
//! Sellers may only update or delete products they listed. Stock is set
//! when a product is created and afterwards only decreases through
//! purchases.

use uuid::Uuid;

use super::{coins::is_representable, MachineError};
use crate::models::{CreateProductRequest, Product, UpdateProductRequest};
use crate::storage::VendingDatabase;

/// Resources that belong to a single seller.
pub trait OwnedResource {
    fn owner_id(&self) -> Uuid;

    /// Fail with `NotProductOwner` unless `seller_id` owns this resource.
    fn verify_owner(&self, seller_id: Uuid) -> Result<(), MachineError> {
        if self.owner_id() == seller_id {
            Ok(())
        } else {
            Err(MachineError::NotProductOwner)
        }
    }
}

impl OwnedResource for Product {
    fn owner_id(&self) -> Uuid {
        self.seller_id
    }
}

fn validate_name(name: &str) -> Result<String, MachineError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MachineError::InvalidProduct(
            "name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn validate_cost(cost: u64) -> Result<u64, MachineError> {
    if cost == 0 || !is_representable(cost) {
        return Err(MachineError::InvalidProduct(
            "cost must be a positive multiple of 5".to_string(),
        ));
    }
    Ok(cost)
}

pub struct Catalog<'a> {
    db: &'a VendingDatabase,
}

impl<'a> Catalog<'a> {
    pub fn new(db: &'a VendingDatabase) -> Self {
        Self { db }
    }

    pub fn list_products(&self) -> Result<Vec<Product>, MachineError> {
        Ok(self.db.list_products()?)
    }

    pub fn get_product(&self, product_id: Uuid) -> Result<Product, MachineError> {
        self.db
            .get_product(product_id)?
            .ok_or(MachineError::ProductNotFound(product_id))
    }

    /// List a new product owned by `seller_id`.
    pub fn create_product(
        &self,
        seller_id: Uuid,
        request: CreateProductRequest,
    ) -> Result<Product, MachineError> {
        let product = Product {
            id: Uuid::new_v4(),
            name: validate_name(&request.name)?,
            cost: validate_cost(request.cost)?,
            stock: request.stock,
            seller_id,
        };
        self.db.insert_product(&product)?;

        tracing::info!(
            product_id = %product.id,
            seller_id = %seller_id,
            cost = product.cost,
            stock = product.stock,
            "Product created"
        );
        Ok(product)
    }

    /// Change the name and/or price of a product the seller owns.
    pub fn update_product(
        &self,
        seller_id: Uuid,
        product_id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<Product, MachineError> {
        let name = request.name.as_deref().map(validate_name).transpose()?;
        let cost = request.cost.map(validate_cost).transpose()?;

        let product = self.db.update_product(product_id, |product| {
            product.verify_owner(seller_id)?;
            if let Some(name) = name {
                product.name = name;
            }
            if let Some(cost) = cost {
                product.cost = cost;
            }
            Ok::<_, MachineError>(product.clone())
        })?;

        tracing::info!(product_id = %product_id, seller_id = %seller_id, "Product updated");
        Ok(product)
    }

    /// Remove a product the seller owns.
    pub fn delete_product(&self, seller_id: Uuid, product_id: Uuid) -> Result<Product, MachineError> {
        let removed = self
            .db
            .delete_product_if(product_id, |product| product.verify_owner(seller_id))?;

        tracing::info!(product_id = %product_id, seller_id = %seller_id, "Product deleted");
        Ok(removed)
    }
}
