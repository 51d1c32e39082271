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

//! Handler for the /cancel command.

use super::helper::run_flow;
use crate::{
    HandlerResult, ShopDialogue,
    dialog::{Customer, Event, Incoming, OrderFlow},
};
use std::sync::Arc;
use teloxide::{adaptors::Throttle, prelude::*};
use tracing::{error, info};

/// Cancel handler.
#[tracing::instrument(
    name = "Cancel handler",
    skip(bot, dialogue, msg, flow),
    fields(
        chat_id = %msg.chat.id,
    )
)]
pub async fn cancel(
    bot: Throttle<Bot>,
    dialogue: ShopDialogue,
    msg: Message,
    flow: Arc<OrderFlow>,
) -> HandlerResult {
    info!("Command /cancel called");

    let Some(user) = &msg.from else {
        error!("A non-user of Telegram is attempting to use the bot");
        return Ok(());
    };

    run_flow(
        &bot,
        &dialogue,
        &flow,
        Incoming::new(Customer::from(user), Event::Cancel),
        None,
    )
    .await
}
