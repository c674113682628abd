// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::VendingDatabase;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<VendingDatabase>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(db: VendingDatabase, tokens: TokenService) -> Self {
        Self {
            db: Arc::new(db),
            tokens,
        }
    }
}
