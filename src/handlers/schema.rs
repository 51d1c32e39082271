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

//! Main handler of the ShopBot.
//!
//! # Description
//!
//! The handler implemented herein shall be passed to the [teloxide::dispatching::Dispatcher::builder]
//! instance of the main application.
//!
//! The schema only sorts updates by kind: commands, other messages and callback queries. Which step of
//! the order dialog handles each update is decided by [crate::dialog::rules].

use crate::{CommandEng, State, endpoints::*};
use teloxide::{
    dispatching::{
        UpdateHandler,
        dialogue::{self, ErasedStorage},
    },
    prelude::*,
};

/// Main handler of the ShopBot application.
pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<CommandEng, _>()
        .branch(case![CommandEng::Start].endpoint(start))
        .branch(case![CommandEng::Help].endpoint(help))
        .branch(case![CommandEng::Cancel].endpoint(cancel));

    // Sessions are keyed by chat, thus only private chats get into the dialog.
    let message_handler = Update::filter_message()
        .filter(message_from_private_chat)
        .branch(command_handler)
        .branch(dptree::endpoint(receive_message));

    let query_handler = Update::filter_callback_query()
        .filter(query_from_private_chat)
        .endpoint(receive_callback);

    dialogue::enter::<Update, ErasedStorage<State>, State, _>()
        .branch(message_handler)
        .branch(query_handler)
}

fn message_from_private_chat(msg: Message) -> bool {
    msg.chat.is_private()
}

fn query_from_private_chat(q: CallbackQuery) -> bool {
    q.message.as_ref().is_some_and(|msg| msg.chat().is_private())
}
