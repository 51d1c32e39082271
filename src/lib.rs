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

//! Library of the ShopBot crate.

use teloxide::{
    dispatching::dialogue::{Dialogue, ErasedStorage},
    utils::command::BotCommands,
};

pub mod callback;
pub mod configuration;
pub mod dialog;
pub mod errors;
pub mod keyboards;
pub mod menu;
pub mod store;
pub mod telemetry;

// Bring all the endpoints to the main context.
pub mod endpoints {
    mod callback;
    mod cancel;
    mod help;
    mod helper;
    mod message;
    mod start;

    pub use callback::receive_callback;
    pub use cancel::cancel;
    pub use help::help;
    pub use message::receive_message;
    pub use start::start;
}

// Bring all the handlers to the main context.
pub mod handlers {
    mod schema;

    pub use schema::*;
}

pub use dialog::{OrderFlow, State};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Dialogue of a chat, backed by the session storage chosen in the settings.
pub type ShopDialogue = Dialogue<State, ErasedStorage<State>>;

/// Application commands in English language
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum CommandEng {
    /// Open the shop
    Start,
    /// Help message
    Help,
    /// Cancel the order in progress
    Cancel,
}

/// Application commands in Russian language
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum CommandRus {
    /// Открыть магазин
    Start,
    /// Справка
    Help,
    /// Отменить текущий заказ
    Cancel,
}
