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

//! Handler for the inline buttons.

use super::helper::run_flow;
use crate::{
    HandlerResult, ShopDialogue,
    callback::MenuCallback,
    dialog::{Customer, Event, Incoming, OrderFlow},
    errors::CallbackError,
};
use std::sync::Arc;
use teloxide::{adaptors::Throttle, prelude::*};
use tracing::{debug, warn};

#[tracing::instrument(
    name = "Callback handler",
    skip(bot, dialogue, q, flow),
    fields(
        chat_id = %dialogue.chat_id(),
    )
)]
pub async fn receive_callback(
    bot: Throttle<Bot>,
    dialogue: ShopDialogue,
    q: CallbackQuery,
    flow: Arc<OrderFlow>,
) -> HandlerResult {
    let payload = q.data.clone().unwrap_or_default();
    debug!("Callback payload: {payload}");

    let event = match payload.parse::<MenuCallback>() {
        Ok(nav) => Event::Menu(nav),
        Err(CallbackError::NotMenuPayload) => Event::Button(payload),
        Err(e) => {
            warn!("Malformed menu payload: {e}");
            Event::Button(payload)
        }
    };

    run_flow(
        &bot,
        &dialogue,
        &flow,
        Incoming::new(Customer::from(&q.from), event),
        Some(&q),
    )
    .await
}
