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

//! Driver of the order dialog.

use super::{
    Incoming, State,
    rules::{self, Action, Context, Keyboard, Reply, Transition},
};
use crate::{
    configuration::ShopSettings,
    errors::FlowError,
    menu::{MenuContent, MenuRenderer},
    store::ShopStore,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A message that shall be delivered to the user.
#[derive(Clone, Debug, PartialEq)]
pub enum Outgoing {
    Text { text: String, keyboard: Keyboard },
    Menu { content: MenuContent, edit: bool },
    Notice(Option<String>),
}

/// Result of handling an event.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// Name of the rule that handled the event.
    pub rule: &'static str,
    /// State of the session after the event.
    pub next: State,
    /// Messages to deliver, in order.
    pub replies: Vec<Outgoing>,
}

/// Runs the rules of the dialog against the collaborators of the shop.
///
/// # Description
///
/// [OrderFlow::handle] routes an event through the rule table, runs the persistence actions of the matched
/// rule and renders the requested menus. It doesn't touch the session nor Telegram: the caller shall store
/// [Outcome::next] before delivering [Outcome::replies], so the session is already advanced when the user
/// reads the prompt of the next step.
pub struct OrderFlow {
    store: Arc<dyn ShopStore>,
    menu: Arc<dyn MenuRenderer>,
    shop: ShopSettings,
}

impl OrderFlow {
    pub fn new(store: Arc<dyn ShopStore>, menu: Arc<dyn MenuRenderer>, shop: ShopSettings) -> Self {
        OrderFlow { store, menu, shop }
    }

    /// Handle an event of a user whose session is in `state`.
    ///
    /// Returns `None` when no rule accepts the event, in which case the event is ignored.
    #[instrument(
        name = "Order flow",
        skip(self, state, incoming),
        fields(
            user_id = incoming.customer.id,
            step = state.step(),
        )
    )]
    pub async fn handle(
        &self,
        state: &State,
        incoming: &Incoming,
    ) -> Result<Option<Outcome>, FlowError> {
        let Some(rule) = rules::route(state, &incoming.event) else {
            debug!("Event not handled: {:?}", incoming.event);
            return Ok(None);
        };

        let ctx = Context {
            customer: &incoming.customer,
            shop: &self.shop,
        };
        let Transition { next, actions } = (rule.apply)(&ctx, state, &incoming.event);

        let customer = &incoming.customer;
        let mut replies = Vec::new();

        for action in actions {
            match action {
                Action::UpsertUser { phone } => {
                    self.store.add_user(&customer.as_user(phone)).await?;
                }
                Action::AddToCart { product_id } => {
                    let entry = self.store.add_to_cart(customer.id, product_id).await?;
                    debug!(
                        "Product {product_id} added to the cart ({} units)",
                        entry.quantity
                    );
                }
                Action::Reply(Reply::Menu { nav, edit }) => {
                    let content = self
                        .menu
                        .render(&nav, customer.id, &customer.lang_code)
                        .await?;
                    replies.push(Outgoing::Menu { content, edit });
                }
                Action::Reply(Reply::Text { text, keyboard }) => {
                    replies.push(Outgoing::Text { text, keyboard });
                }
                Action::Reply(Reply::Notice(text)) => replies.push(Outgoing::Notice(text)),
            }
        }

        if next != *state {
            info!("Rule {}: {} -> {}", rule.name, state.step(), next.step());
        } else {
            debug!("Rule {} handled the event", rule.name);
        }

        Ok(Some(Outcome {
            rule: rule.name,
            next,
            replies,
        }))
    }
}
