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

//! PostgreSQL implementation of [ShopStore].

use super::{CartEntry, CartItem, Category, Page, Product, ShopStore, User};
use crate::{configuration::DatabaseSettings, errors::StoreError};
use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::{debug, error, info, instrument, trace};

pub struct PgStore {
    db_pool: PgPool,
}

/// Row of the join between the carts and the products.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i64,
    category_id: i64,
    name: String,
    description: String,
    price: i64,
    quantity: i32,
}

impl From<CartRow> for CartItem {
    fn from(row: CartRow) -> Self {
        CartItem {
            product: Product {
                id: row.id,
                category_id: row.category_id,
                name: row.name,
                description: row.description,
                price: row.price,
            },
            quantity: row.quantity,
        }
    }
}

impl PgStore {
    #[instrument(name = "Connect DB backend for the shop", skip(settings))]
    pub async fn connect_backend(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let db_pool = PgPoolOptions::new()
            .connect_with(settings.with_db())
            .await
            .map_err(|e| {
                error!("{e}");
                StoreError::Unknown(e.to_string())
            })?;

        trace!("PostgreSQL database server succesfully connected");

        Ok(Self { db_pool })
    }

    pub fn from_pool(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Apply the pending migrations of the `migrations` directory.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        info!("DB schema up to date");

        Ok(())
    }
}

#[async_trait]
impl ShopStore for PgStore {
    #[instrument(name = "Upsert user", skip(self, user), fields(user_id = user.user_id))]
    async fn add_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, first_name, last_name, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = COALESCE(EXCLUDED.phone, users.phone),
                updated = now()
            "#,
        )
        .bind(user.user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .execute(&self.db_pool)
        .await?;

        debug!("User stored");

        Ok(())
    }

    async fn user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT user_id, first_name, last_name, phone FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?)
    }

    #[instrument(name = "Add to cart", skip(self))]
    async fn add_to_cart(&self, user_id: i64, product_id: i64) -> Result<CartEntry, StoreError> {
        let entry = sqlx::query_as::<_, CartEntry>(
            r#"
            INSERT INTO carts (user_id, product_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, product_id) DO UPDATE
            SET quantity = carts.quantity + 1,
                updated = now()
            RETURNING user_id, product_id, quantity
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err)
                if db_err.constraint() == Some("carts_product_id_fkey") =>
            {
                StoreError::MissingProduct(product_id)
            }
            e => StoreError::from(e),
        })?;

        debug!("Cart entry with {} units", entry.quantity);

        Ok(entry)
    }

    async fn cart(&self, user_id: i64) -> Result<Vec<CartItem>, StoreError> {
        let rows = sqlx::query_as::<_, CartRow>(
            r#"
            SELECT products.id, products.category_id, products.name, products.description,
                   products.price, carts.quantity
            FROM carts INNER JOIN products ON carts.product_id = products.id
            WHERE carts.user_id = $1
            ORDER BY products.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn products(&self, category_id: i64) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, category_id, name, description, price
            FROM products WHERE category_id = $1
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db_pool)
        .await?;

        debug!("Obtained {} products from the DB", products.len());

        Ok(products)
    }

    async fn page(&self, name: &str) -> Result<Option<Page>, StoreError> {
        Ok(
            sqlx::query_as::<_, Page>("SELECT name, description FROM pages WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }
}
