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

//! Common logic of the endpoints that feed the order dialog.

use crate::{
    HandlerResult, ShopDialogue,
    dialog::{Incoming, OrderFlow, Outgoing},
    keyboards::{menu_keyboard, reply_markup},
};
use teloxide::{
    ApiError, RequestError,
    adaptors::Throttle,
    prelude::*,
    types::{ChatId, ParseMode},
};
use tracing::{debug, trace, warn};

/// Run an event through the order dialog and deliver the replies.
///
/// # Description
///
/// The session is stored before any reply is sent, thus the user never receives the prompt of a step
/// whose state was not saved. Callback queries are always answered, even when no rule handles them or the
/// event fails.
pub(crate) async fn run_flow(
    bot: &Throttle<Bot>,
    dialogue: &ShopDialogue,
    flow: &OrderFlow,
    incoming: Incoming,
    query: Option<&CallbackQuery>,
) -> HandlerResult {
    let state = dialogue.get_or_default().await?;

    let outcome = match flow.handle(&state, &incoming).await {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            if let Some(q) = query {
                bot.answer_callback_query(q.id.clone()).await?;
            }
            return Ok(());
        }
        Err(e) => {
            warn!("The event couldn't be handled: {e}");
            if let Some(q) = query {
                bot.answer_callback_query(q.id.clone()).await?;
            }
            return Err(e.into());
        }
    };

    if outcome.next != state {
        if outcome.next.is_idle() {
            dialogue.exit().await?;
        } else {
            dialogue.update(outcome.next).await?;
        }
    }

    deliver(
        bot,
        dialogue.chat_id(),
        &incoming.customer.lang_code,
        outcome.replies,
        query,
    )
    .await
}

async fn deliver(
    bot: &Throttle<Bot>,
    chat_id: ChatId,
    lang_code: &str,
    replies: Vec<Outgoing>,
    query: Option<&CallbackQuery>,
) -> HandlerResult {
    let mut answered = false;

    for reply in replies {
        match reply {
            Outgoing::Text { text, keyboard } => {
                let request = bot.send_message(chat_id, text);
                match reply_markup(keyboard, lang_code) {
                    Some(markup) => request.reply_markup(markup).await?,
                    None => request.await?,
                };
            }
            Outgoing::Menu { content, edit } => {
                let keyboard = menu_keyboard(&content)?;
                let menu_msg = query.and_then(|q| q.regular_message());

                match menu_msg {
                    Some(menu_msg) if edit => {
                        let result = bot
                            .edit_message_text(chat_id, menu_msg.id, content.caption)
                            .parse_mode(ParseMode::Html)
                            .reply_markup(keyboard)
                            .await;
                        match result {
                            Ok(_) => trace!("Menu message updated"),
                            Err(RequestError::Api(ApiError::MessageNotModified)) => {
                                debug!("The menu didn't change")
                            }
                            Err(e) => return Err(e.into()),
                        }
                    }
                    _ => {
                        bot.send_message(chat_id, content.caption)
                            .parse_mode(ParseMode::Html)
                            .reply_markup(keyboard)
                            .await?;
                    }
                }
            }
            Outgoing::Notice(text) => {
                if let Some(q) = query.filter(|_| !answered) {
                    let request = bot.answer_callback_query(q.id.clone());
                    match text {
                        Some(text) => request.text(text).await?,
                        None => request.await?,
                    };
                    answered = true;
                }
            }
        }
    }

    if let Some(q) = query.filter(|_| !answered) {
        bot.answer_callback_query(q.id.clone()).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        State,
        callback::{ADD_TO_CART, MenuCallback},
        configuration::ShopSettings,
        dialog::{Customer, Event},
        menu::CatalogMenu,
        store::MemoryStore,
    };
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::sync::{Arc, Mutex};
    use teloxide::{
        adaptors::throttle::Limits,
        dispatching::dialogue::{InMemStorage, Storage},
        requests::RequesterExt,
    };
    use tokio::net::TcpListener;

    /// Serve a local Bot API that accepts every request and records the name of the called methods.
    async fn bot_api() -> (Throttle<Bot>, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorder = calls.clone();
        let app = axum::Router::new().fallback(move |uri: axum::http::Uri| {
            let recorder = recorder.clone();
            async move {
                if let Some(method) = uri.path().rsplit('/').next() {
                    recorder.lock().unwrap().push(method.to_lowercase());
                }
                r#"{"ok":true,"result":true}"#
            }
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let bot = Bot::new("1234:TEST")
            .set_api_url(format!("http://{address}/").parse().unwrap())
            .throttle(Limits::default());

        (bot, calls)
    }

    fn flow() -> OrderFlow {
        let store = Arc::new(MemoryStore::new());
        let settings = ShopSettings {
            pickup_location_url: String::from("https://maps.example.com/pickup"),
            products_per_page: 1,
            currency: String::from("RUB"),
        };
        let menu = Arc::new(CatalogMenu::new(store.clone(), &settings));

        OrderFlow::new(store, menu, settings)
    }

    fn query(data: &str) -> CallbackQuery {
        serde_json::from_value(serde_json::json!({
            "id": "42",
            "from": {"id": 1, "is_bot": false, "first_name": "Ivan", "language_code": "en"},
            "chat_instance": "1",
            "data": data,
        }))
        .expect("Failed to build the callback query")
    }

    #[rstest]
    #[case(MenuCallback::new(2, ADD_TO_CART).with_category(1).with_product(99))]
    #[case(MenuCallback::new(1, "jobs"))]
    #[tokio::test]
    async fn failed_callbacks_are_answered(#[case] nav: MenuCallback) {
        let (bot, calls) = bot_api().await;
        let dialogue = ShopDialogue::new(InMemStorage::<State>::new().erase(), ChatId(1));
        let q = query(&nav.encode().expect("Failed to encode the payload"));
        let incoming = Incoming::new(Customer::from(&q.from), Event::Menu(nav));

        let result = run_flow(&bot, &dialogue, &flow(), incoming, Some(&q)).await;

        assert!(result.is_err());
        assert_eq!(
            *calls.lock().unwrap(),
            vec![String::from("answercallbackquery")]
        );
        assert_eq!(dialogue.get().await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn ignored_callbacks_are_answered() {
        let (bot, calls) = bot_api().await;
        let dialogue = ShopDialogue::new(InMemStorage::<State>::new().erase(), ChatId(1));
        let q = query("pickup");
        let incoming = Incoming::new(Customer::from(&q.from), Event::Button(String::from("pickup")));

        run_flow(&bot, &dialogue, &flow(), incoming, Some(&q))
            .await
            .expect("The callback failed");

        assert_eq!(
            *calls.lock().unwrap(),
            vec![String::from("answercallbackquery")]
        );
    }
}
