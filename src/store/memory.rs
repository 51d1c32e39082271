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

//! Volatile implementation of [ShopStore].

use super::{CartEntry, CartItem, Category, Page, Product, ShopStore, User};
use crate::errors::StoreError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use tracing::debug;

/// Store that keeps all the records in memory.
///
/// # Description
///
/// The catalog is loaded when the store is built, and it is read-only afterwards. Users and carts are lost
/// when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: Catalog,
    records: Mutex<Records>,
}

#[derive(Debug, Default)]
struct Catalog {
    categories: Vec<Category>,
    products: BTreeMap<i64, Product>,
    pages: HashMap<String, Page>,
}

#[derive(Debug, Default)]
struct Records {
    users: BTreeMap<i64, User>,
    carts: BTreeMap<(i64, i64), i32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(categories: Vec<Category>, products: Vec<Product>, pages: Vec<Page>) -> Self {
        MemoryStore {
            catalog: Catalog {
                categories,
                products: products.into_iter().map(|p| (p.id, p)).collect(),
                pages: pages.into_iter().map(|p| (p.name.clone(), p)).collect(),
            },
            records: Mutex::default(),
        }
    }

    /// All the cart entries of the store, sorted by user and product.
    pub async fn cart_entries(&self) -> Vec<CartEntry> {
        self.records
            .lock()
            .await
            .carts
            .iter()
            .map(|(&(user_id, product_id), &quantity)| CartEntry {
                user_id,
                product_id,
                quantity,
            })
            .collect()
    }
}

#[async_trait]
impl ShopStore for MemoryStore {
    async fn add_user(&self, user: &User) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;

        let phone = match (&user.phone, records.users.get(&user.user_id)) {
            (Some(phone), _) => Some(phone.clone()),
            (None, Some(stored)) => stored.phone.clone(),
            (None, None) => None,
        };

        records.users.insert(
            user.user_id,
            User {
                phone,
                ..user.clone()
            },
        );
        debug!("User {} stored", user.user_id);

        Ok(())
    }

    async fn user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.records.lock().await.users.get(&user_id).cloned())
    }

    async fn add_to_cart(&self, user_id: i64, product_id: i64) -> Result<CartEntry, StoreError> {
        if !self.catalog.products.contains_key(&product_id) {
            return Err(StoreError::MissingProduct(product_id));
        }

        let mut records = self.records.lock().await;
        let quantity = records.carts.entry((user_id, product_id)).or_insert(0);
        *quantity += 1;

        Ok(CartEntry {
            user_id,
            product_id,
            quantity: *quantity,
        })
    }

    async fn cart(&self, user_id: i64) -> Result<Vec<CartItem>, StoreError> {
        let records = self.records.lock().await;

        records
            .carts
            .range((user_id, i64::MIN)..=(user_id, i64::MAX))
            .map(|(&(_, product_id), &quantity)| {
                self.catalog
                    .products
                    .get(&product_id)
                    .cloned()
                    .map(|product| CartItem { product, quantity })
                    .ok_or(StoreError::MissingProduct(product_id))
            })
            .collect()
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.catalog.categories.clone())
    }

    async fn products(&self, category_id: i64) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .catalog
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn page(&self, name: &str) -> Result<Option<Page>, StoreError> {
        Ok(self.catalog.pages.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::random;
    use rstest::*;

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::with_catalog(
            vec![Category {
                id: 1,
                name: String::from("Pizza"),
            }],
            vec![
                Product {
                    id: 10,
                    category_id: 1,
                    name: String::from("Margherita"),
                    description: String::from("Tomato and mozzarella"),
                    price: 45000,
                },
                Product {
                    id: 11,
                    category_id: 1,
                    name: String::from("Pepperoni"),
                    description: String::from("Spicy"),
                    price: 52000,
                },
            ],
            Vec::new(),
        )
    }

    fn user(user_id: i64, phone: Option<&str>) -> User {
        User {
            user_id,
            first_name: String::from("Ivan"),
            last_name: None,
            phone: phone.map(String::from),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_keeps_phone(store: MemoryStore) {
        let user_id = random::<i32>() as i64;

        store
            .add_user(&user(user_id, Some("+79998887766")))
            .await
            .expect("Failed to add the user");
        store
            .add_user(&user(user_id, None))
            .await
            .expect("Failed to upsert the user");

        let stored = store
            .user(user_id)
            .await
            .expect("Failed to read the user")
            .expect("The user was not stored");
        assert_eq!(stored.phone.as_deref(), Some("+79998887766"));

        store
            .add_user(&user(user_id, Some("+70000000000")))
            .await
            .expect("Failed to upsert the user");
        let stored = store.user(user_id).await.unwrap().unwrap();
        assert_eq!(stored.phone.as_deref(), Some("+70000000000"));
    }

    #[rstest]
    #[tokio::test]
    async fn quantity_by_repetition(store: MemoryStore) {
        let user_id = random::<i32>() as i64;

        for expected in 1..=3 {
            let entry = store.add_to_cart(user_id, 10).await.expect("Failed to add");
            assert_eq!(entry.quantity, expected);
        }
        store.add_to_cart(user_id, 11).await.expect("Failed to add");
        store.add_to_cart(user_id + 1, 11).await.expect("Failed to add");

        let cart = store.cart(user_id).await.expect("Failed to read the cart");
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].product.id, 10);
        assert_eq!(cart[0].quantity, 3);
        assert_eq!(cart[0].subtotal(), 135000);
        assert_eq!(cart[1].quantity, 1);
        assert_eq!(store.cart_entries().await.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_product(store: MemoryStore) {
        let result = store.add_to_cart(1, 999).await;
        assert!(matches!(result, Err(StoreError::MissingProduct(999))));
        assert!(store.cart(1).await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn catalog(store: MemoryStore) {
        assert_eq!(store.categories().await.unwrap().len(), 1);
        assert_eq!(store.products(1).await.unwrap().len(), 2);
        assert!(store.products(2).await.unwrap().is_empty());
        assert!(store.page("about").await.unwrap().is_none());
    }
}
