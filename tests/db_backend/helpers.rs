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


use shopbot::{
    configuration::{DatabaseSettings, Settings},
    store::PgStore,
};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

pub struct TestApp {
    pub pool: PgPool,
    pub store: PgStore,
}

pub async fn test_setup() -> TestApp {
    let configuration = {
        let mut cfg = Settings::new().expect("Failed to read configuration file.");
        cfg.database.name = Uuid::new_v4().to_string();

        cfg
    };

    let pool = configure_database(&configuration.database).await;
    let store = PgStore::from_pool(pool.clone());
    store.migrate().await.expect("Failed to migrate the testing DB.");

    // Seed the catalog
    pool.execute(
        r#"
        INSERT INTO categories (id, name) VALUES (1, 'Pizza');
        INSERT INTO products (id, category_id, name, description, price)
        VALUES (10, 1, 'Margherita', 'Tomato and mozzarella', 45000),
               (11, 1, 'Diavola', 'Spicy salami', 52000);
        INSERT INTO pages (name, description) VALUES ('about', '<b>About us</b>');
        "#,
    )
    .await
    .expect("Failed to seed the catalog.");

    TestApp { pool, store }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    // Connect to the server without using a DB name, as we'll give a testing name.
    let mut conn = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to PostgreSQL.");

    conn.execute(format!(r#"CREATE DATABASE "{}";"#, config.name).as_str())
        .await
        .expect("Failed to create test DB.");

    PgPool::connect_with(config.with_db())
        .await
        .expect("Failed to connect to PostgreSQL.")
}
