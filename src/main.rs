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

//! Main file of the ShopBot

use secrecy::ExposeSecret;
use shopbot::{
    CommandEng, CommandRus, OrderFlow, State,
    configuration::{SessionSettings, Settings},
    handlers,
    menu::CatalogMenu,
    store::{PgStore, ShopStore},
    telemetry::configure_tracing,
};
use std::{net::SocketAddr, process::exit, str::FromStr, sync::Arc};
use teloxide::{
    adaptors::throttle::Limits,
    dispatching::dialogue::{
        ErasedStorage, InMemStorage, RedisStorage, Storage, serializer::Json,
    },
    payloads::SetMyCommandsSetters,
    prelude::*,
    requests::RequesterExt,
    update_listeners::webhooks,
    utils::command::BotCommands,
};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load the settings.
    let settings = Settings::new()?;

    // Initialize the tracing subsystem.
    configure_tracing(settings.tracing_level.as_str());

    // Set up the shop's DB.
    let store = match PgStore::connect_backend(&settings.database).await {
        Ok(store) => store,
        Err(e) => {
            error!("An error occurred while attempting to connect to the shop's DB:\n{e}");
            exit(69)
        }
    };
    store.migrate().await?;
    let store: Arc<dyn ShopStore> = Arc::new(store);

    let menu = Arc::new(CatalogMenu::new(store.clone(), &settings.shop));
    let flow = Arc::new(OrderFlow::new(store, menu, settings.shop.clone()));

    // Storage for the sessions of the order dialog.
    let storage: Arc<ErasedStorage<State>> = match &settings.session {
        SessionSettings::Memory => InMemStorage::<State>::new().erase(),
        SessionSettings::Redis { url } => RedisStorage::open(url.as_str(), Json).await?.erase(),
    };
    debug!("Session storage: {:?}", settings.session);

    // Instance a throttled bot, to avoid reaching the message limits of Telegram.
    let bot = Bot::new(settings.application.api_token.expose_secret()).throttle(Limits::default());

    // Configure the supported languages of the Bot.
    debug!("Setting up commands of the bot");
    bot.set_my_commands(CommandRus::bot_commands())
        .language_code("ru")
        .await?;
    bot.set_my_commands(CommandEng::bot_commands()).await?;

    let mut dispatcher = Dispatcher::builder(bot.clone(), handlers::schema())
        .dependencies(dptree::deps![flow, storage])
        .enable_ctrlc_handler()
        .build();

    match &settings.application.webhook {
        Some(webhook) => {
            let http_server_address =
                SocketAddr::from_str(&format!("{}:{}", webhook.host, webhook.port))?;
            let tcp_listener = TcpListener::bind(http_server_address).await?;

            // Build a listener based on the axum server.
            let (listener, stop_future, bot_router) = webhooks::axum_to_router(
                bot.inner().clone(),
                webhooks::Options::new(http_server_address, webhook.url.parse()?),
            )
            .await?;

            // Launch the Axum server.
            let app = axum::Router::new()
                .route("/health", axum::routing::get(|| async { "OK" }))
                .fallback_service(bot_router);

            tokio::task::spawn(async move {
                axum::serve(tcp_listener, app)
                    .with_graceful_shutdown(stop_future)
                    .await
            });
            info!("Started ShopBot server at {http_server_address}");

            dispatcher
                .dispatch_with_listener(listener, LoggingErrorHandler::with_custom_text("shopbot"))
                .await;
        }
        None => {
            info!("Started ShopBot using long polling");
            dispatcher.dispatch().await;
        }
    }

    info!("Gracefully closed ShopBot");

    Ok(())
}
