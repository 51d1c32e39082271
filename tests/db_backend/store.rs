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


use crate::helpers::test_setup;
use pretty_assertions::assert_eq;
use rand::random;
use shopbot::{
    configuration::ShopSettings,
    dialog::{Customer, Event, Incoming, OrderFlow, State},
    errors::StoreError,
    menu::CatalogMenu,
    store::{PgStore, ShopStore, User},
};
use std::sync::Arc;

fn user(phone: Option<&str>) -> User {
    User {
        user_id: random::<u32>() as i64,
        first_name: String::from("Ivan"),
        last_name: Some(String::from("Petrov")),
        phone: phone.map(str::to_owned),
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn upsert_user() {
    let app = test_setup().await;

    let mut record = user(Some("+79998887766"));
    app.store.add_user(&record).await.expect("Failed to add the user");

    // A later upsert without phone keeps the stored one.
    record.phone = None;
    record.first_name = String::from("Ivan Ivanovich");
    app.store.add_user(&record).await.expect("Failed to update the user");

    let stored = app
        .store
        .user(record.user_id)
        .await
        .expect("Failed to read the user")
        .expect("The user is missing");
    assert_eq!(stored.phone.as_deref(), Some("+79998887766"));
    assert_eq!(stored.first_name, "Ivan Ivanovich");

    let (created, updated): (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) =
        sqlx::query_as("SELECT created, updated FROM users WHERE user_id = $1")
            .bind(record.user_id)
            .fetch_one(&app.pool)
            .await
            .expect("Failed to read the timestamps");
    assert!(updated >= created);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn cart_quantity_by_repetition() {
    let app = test_setup().await;
    let record = user(None);
    app.store.add_user(&record).await.unwrap();

    for expected in 1..=3 {
        let entry = app.store.add_to_cart(record.user_id, 10).await.unwrap();
        assert_eq!(entry.quantity, expected);
    }
    app.store.add_to_cart(record.user_id, 11).await.unwrap();

    let cart = app.store.cart(record.user_id).await.unwrap();
    assert_eq!(cart.len(), 2);
    assert_eq!(cart[0].product.name, "Margherita");
    assert_eq!(cart[0].subtotal(), 135000);
    assert_eq!(cart[1].quantity, 1);

    assert!(matches!(
        app.store.add_to_cart(record.user_id, 99).await,
        Err(StoreError::MissingProduct(99))
    ));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn catalog() {
    let app = test_setup().await;

    let categories = app.store.categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Pizza");

    let products = app.store.products(1).await.unwrap();
    assert_eq!(
        products.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![10, 11]
    );
    assert!(app.store.products(2).await.unwrap().is_empty());

    let about = app.store.page("about").await.unwrap().expect("Missing page");
    assert_eq!(about.description, "<b>About us</b>");
    assert!(app.store.page("main").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn phone_step_with_long_text() {
    let app = test_setup().await;

    let store: Arc<dyn ShopStore> = Arc::new(PgStore::from_pool(app.pool.clone()));
    let settings = ShopSettings {
        pickup_location_url: String::from("https://maps.example.com/pickup"),
        products_per_page: 1,
        currency: String::from("RUB"),
    };
    let menu = Arc::new(CatalogMenu::new(store.clone(), &settings));
    let flow = OrderFlow::new(store.clone(), menu, settings);
    let customer = Customer {
        id: random::<u32>() as i64,
        first_name: String::from("Ivan"),
        last_name: None,
        lang_code: String::from("en"),
    };

    // The text doesn't fit in the phone column, so the step is repeated.
    let outcome = flow
        .handle(
            &State::AwaitingPhone,
            &Incoming::new(
                customer.clone(),
                Event::Text(String::from("+7 (999) 888-77-66, call after 6pm")),
            ),
        )
        .await
        .expect("The flow failed")
        .expect("The text was not handled");
    assert_eq!(outcome.rule, "remind");
    assert_eq!(outcome.next, State::AwaitingPhone);
    assert!(store.user(customer.id).await.unwrap().is_none());

    // A phone of the maximum length is stored.
    let outcome = flow
        .handle(
            &State::AwaitingPhone,
            &Incoming::new(customer.clone(), Event::Text(String::from("+7 999 888 77 66 #12"))),
        )
        .await
        .expect("The flow failed")
        .expect("The phone was not handled");
    assert_eq!(outcome.rule, "phone");
    let stored = store.user(customer.id).await.unwrap().expect("The user is missing");
    assert_eq!(stored.phone.as_deref(), Some("+7 999 888 77 66 #12"));
}
