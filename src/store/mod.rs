// Copyright 2025 Felipe Torres González
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

//! Persistence of the shop.
//!
//! # Description
//!
//! The trait [ShopStore] is the API that the rest of the modules use to read the catalog and to write the
//! records of the customers: users and cart entries. Two backends are available:
//!
//! - [PgStore]: PostgreSQL backend, used by the bot.
//! - [MemoryStore]: volatile backend, meant for tests and demos.
//!
//! Writes are idempotent upserts. The store doesn't retry failed operations, errors are propagated to the
//! caller.

use crate::errors::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Maximum length, in characters, of the phone of a [User]. It matches the `users.phone` column.
pub const PHONE_MAX_LEN: usize = 20;

/// Identity record of a customer of the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Relation between a customer and a product.
///
/// Adding the same product more than once increases the quantity of the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartEntry {
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A product of the catalog. Prices are expressed in minor units of the currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// Static informative page of the shop (main, about, payment, shipping).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Page {
    pub name: String,
    pub description: String,
}

/// A line of the cart of a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i32,
}

impl CartItem {
    pub fn subtotal(&self) -> i64 {
        self.product.price * i64::from(self.quantity)
    }
}

/// Access to the persisted data of the shop.
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Insert a user or refresh the stored one.
    ///
    /// # Description
    ///
    /// Names are always overwritten. A missing phone never erases a phone stored before.
    async fn add_user(&self, user: &User) -> Result<(), StoreError>;

    async fn user(&self, user_id: i64) -> Result<Option<User>, StoreError>;

    /// Add one unit of a product to the cart of the user and return the updated entry.
    async fn add_to_cart(&self, user_id: i64, product_id: i64) -> Result<CartEntry, StoreError>;

    /// Content of the cart of the user, sorted by product ID.
    async fn cart(&self, user_id: i64) -> Result<Vec<CartItem>, StoreError>;

    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Products of a category, sorted by product ID.
    async fn products(&self, category_id: i64) -> Result<Vec<Product>, StoreError>;

    async fn page(&self, name: &str) -> Result<Option<Page>, StoreError>;
}
