// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Purchase engine.
//!
//! A purchase is either rejected during validation or committed in one
//! step. Validation runs inside the store's write transaction against the
//! current user and product, so concurrent purchases cannot both pass the
//! stock or funds check on a stale snapshot.
//!
//! The buyer keeps the leftover balance after a purchase. The returned
//! `change` is the coin breakdown of that balance; it is paid out only if
//! the buyer later resets the deposit.

use uuid::Uuid;

use super::{coins::decompose, MachineError};
use crate::models::PurchaseReceipt;
use crate::storage::VendingDatabase;

pub struct PurchaseEngine<'a> {
    db: &'a VendingDatabase,
}

impl<'a> PurchaseEngine<'a> {
    pub fn new(db: &'a VendingDatabase) -> Self {
        Self { db }
    }

    /// Buy `quantity` units of a product with the user's deposit.
    ///
    /// Checks, in order: product exists, user exists, enough stock, enough
    /// funds. Nothing is written unless all of them pass.
    pub fn buy(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<PurchaseReceipt, MachineError> {
        if quantity == 0 {
            return Err(MachineError::InvalidQuantity);
        }

        let outcome = self
            .db
            .update_user_and_product(user_id, product_id, |user, product| {
                if quantity > product.stock {
                    return Err(MachineError::InsufficientStock {
                        requested: quantity,
                        available: product.stock,
                    });
                }

                // An overflowing price is beyond any balance.
                let total_price = product
                    .cost
                    .checked_mul(u64::from(quantity))
                    .filter(|price| *price <= user.deposit)
                    .ok_or(MachineError::InsufficientFunds {
                        deposit: user.deposit,
                    })?;

                let remaining = user.deposit - total_price;
                let change = decompose(remaining)?;

                user.deposit = remaining;
                product.stock -= quantity;

                Ok(PurchaseReceipt {
                    total_price,
                    change,
                    quantity,
                })
            });

        match &outcome {
            Ok(receipt) => tracing::info!(
                user_id = %user_id,
                product_id = %product_id,
                quantity,
                total_price = receipt.total_price,
                "Purchase committed"
            ),
            Err(err) => tracing::warn!(
                user_id = %user_id,
                product_id = %product_id,
                quantity,
                error = %err,
                "Purchase rejected"
            ),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::models::{Product, User};
    use tempfile::TempDir;

    struct Fixture {
        db: VendingDatabase,
        user: User,
        product: Product,
        _dir: TempDir,
    }

    fn setup(deposit: u64, cost: u64, stock: u32) -> Fixture {
        let dir = TempDir::new().unwrap();
        let db = VendingDatabase::open(&dir.path().join("machine.redb")).unwrap();
        let user = User {
            id: Uuid::new_v4(),
            username: "buyer".into(),
            password_hash: "hash".into(),
            role: Role::Buyer,
            deposit,
        };
        let product = Product {
            id: Uuid::new_v4(),
            name: "cola".into(),
            cost,
            stock,
            seller_id: Uuid::new_v4(),
        };
        db.insert_user(&user).unwrap();
        db.insert_product(&product).unwrap();
        Fixture {
            db,
            user,
            product,
            _dir: dir,
        }
    }

    impl Fixture {
        fn deposit(&self) -> u64 {
            self.db.get_user(self.user.id).unwrap().unwrap().deposit
        }

        fn stock(&self) -> u32 {
            self.db.get_product(self.product.id).unwrap().unwrap().stock
        }
    }

    #[test]
    fn successful_purchase_updates_balance_and_stock() {
        let fx = setup(100, 60, 10);
        let receipt = PurchaseEngine::new(&fx.db)
            .buy(fx.user.id, fx.product.id, 1)
            .unwrap();

        assert_eq!(
            receipt,
            PurchaseReceipt {
                total_price: 60,
                change: vec![20, 20],
                quantity: 1,
            }
        );
        assert_eq!(fx.deposit(), 40);
        assert_eq!(fx.stock(), 9);
    }

    #[test]
    fn change_sums_to_new_balance() {
        let fx = setup(285, 35, 10);
        let receipt = PurchaseEngine::new(&fx.db)
            .buy(fx.user.id, fx.product.id, 3)
            .unwrap();

        assert_eq!(receipt.total_price, 105);
        assert_eq!(receipt.change.iter().sum::<u64>(), fx.deposit());
        assert_eq!(fx.deposit(), 180);
        assert_eq!(fx.stock(), 7);
    }

    #[test]
    fn exact_payment_leaves_no_change() {
        let fx = setup(60, 60, 1);
        let receipt = PurchaseEngine::new(&fx.db)
            .buy(fx.user.id, fx.product.id, 1)
            .unwrap();

        assert!(receipt.change.is_empty());
        assert_eq!(fx.deposit(), 0);
        assert_eq!(fx.stock(), 0);
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let fx = setup(50, 60, 5);
        let err = PurchaseEngine::new(&fx.db)
            .buy(fx.user.id, fx.product.id, 1)
            .unwrap_err();

        assert!(matches!(err, MachineError::InsufficientFunds { deposit: 50 }));
        assert_eq!(fx.deposit(), 50);
        assert_eq!(fx.stock(), 5);
    }

    #[test]
    fn insufficient_stock_changes_nothing() {
        let fx = setup(500, 10, 2);
        let err = PurchaseEngine::new(&fx.db)
            .buy(fx.user.id, fx.product.id, 3)
            .unwrap_err();

        assert!(matches!(
            err,
            MachineError::InsufficientStock {
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(fx.deposit(), 500);
        assert_eq!(fx.stock(), 2);
    }

    #[test]
    fn stock_is_checked_before_funds() {
        let fx = setup(0, 10, 1);
        let err = PurchaseEngine::new(&fx.db)
            .buy(fx.user.id, fx.product.id, 2)
            .unwrap_err();
        assert!(matches!(err, MachineError::InsufficientStock { .. }));
    }

    #[test]
    fn price_overflow_is_insufficient_funds() {
        let fx = setup(100, u64::MAX - 4, u32::MAX);
        let err = PurchaseEngine::new(&fx.db)
            .buy(fx.user.id, fx.product.id, 2)
            .unwrap_err();
        assert!(matches!(err, MachineError::InsufficientFunds { .. }));
    }

    #[test]
    fn missing_product_reported_before_missing_user() {
        let fx = setup(100, 60, 10);
        let missing_product = Uuid::new_v4();
        let err = PurchaseEngine::new(&fx.db)
            .buy(Uuid::new_v4(), missing_product, 1)
            .unwrap_err();
        assert!(matches!(err, MachineError::ProductNotFound(id) if id == missing_product));

        let err = PurchaseEngine::new(&fx.db)
            .buy(Uuid::new_v4(), fx.product.id, 1)
            .unwrap_err();
        assert!(matches!(err, MachineError::UserNotFound(_)));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let fx = setup(100, 60, 10);
        let err = PurchaseEngine::new(&fx.db)
            .buy(fx.user.id, fx.product.id, 0)
            .unwrap_err();
        assert!(matches!(err, MachineError::InvalidQuantity));
        assert_eq!(fx.stock(), 10);
    }

    #[test]
    fn concurrent_purchases_never_oversell() {
        let fx = setup(1000, 10, 5);
        let db = std::sync::Arc::new(fx.db);
        let (user_id, product_id) = (fx.user.id, fx.product.id);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let db = db.clone();
                std::thread::spawn(move || PurchaseEngine::new(&db).buy(user_id, product_id, 1))
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();

        assert_eq!(successes, 5);
        assert_eq!(db.get_product(product_id).unwrap().unwrap().stock, 0);
        assert_eq!(db.get_user(user_id).unwrap().unwrap().deposit, 950);
    }
}
