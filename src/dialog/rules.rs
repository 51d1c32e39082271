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

//! Rule table of the order dialog.
//!
//! # Description
//!
//! Each [Rule] pairs a filter over the current [State] and the inbound [Event] with the transition that
//! runs when the filter matches. Rules are evaluated in order and the first match wins, so specific rules
//! must precede the generic ones (e.g. `add_to_cart` before `navigate`).
//!
//! Rules are pure: they compute the next state and the list of [Action]s, and
//! [OrderFlow](super::OrderFlow) runs those actions.

use super::{Customer, Delivery, DeliveryMethod, Event, PaymentMethod, State, texts};
use crate::{
    callback::{ADD_TO_CART, MenuCallback, ORDER},
    configuration::ShopSettings,
    store::PHONE_MAX_LEN,
};

/// Keyboard attached to a text reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyboard {
    None,
    /// Inline buttons: pickup, courier.
    DeliveryMethods,
    /// Inline buttons: cash, prepayment.
    PaymentMethods,
    /// Reply keyboard with a button that shares the device location.
    RequestLocation,
    /// Removes the reply keyboard.
    Remove,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Text { text: String, keyboard: Keyboard },
    /// Render a menu, either in a new message or replacing the message that holds the menu.
    Menu { nav: MenuCallback, edit: bool },
    /// Answer the callback query, with an optional notification.
    Notice(Option<String>),
}

impl Reply {
    fn text(text: String, keyboard: Keyboard) -> Self {
        Reply::Text { text, keyboard }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Upsert the sender as a user of the shop.
    UpsertUser { phone: Option<String> },
    AddToCart { product_id: i64 },
    Reply(Reply),
}

/// Result of applying a rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub next: State,
    pub actions: Vec<Action>,
}

impl Transition {
    fn new(next: State, actions: Vec<Action>) -> Self {
        Transition { next, actions }
    }
}

/// Data that rules may read besides the state and the event.
pub struct Context<'a> {
    pub customer: &'a Customer,
    pub shop: &'a ShopSettings,
}

pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&State, &Event) -> bool,
    pub apply: fn(&Context, &State, &Event) -> Transition,
}

/// Find the first rule whose filter matches.
pub fn route(state: &State, event: &Event) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.matches)(state, event))
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "start",
        matches: |_, event| matches!(event, Event::Start),
        apply: |_, state, _| {
            Transition::new(
                state.clone(),
                vec![Action::Reply(Reply::Menu {
                    nav: MenuCallback::new(0, "main"),
                    edit: false,
                })],
            )
        },
    },
    Rule {
        name: "cancel_order",
        matches: |state, event| !state.is_idle() && matches!(event, Event::Cancel),
        apply: |ctx, _, _| {
            Transition::new(
                State::Idle,
                vec![Action::Reply(Reply::text(
                    texts::order_cancelled(&ctx.customer.lang_code),
                    Keyboard::Remove,
                ))],
            )
        },
    },
    Rule {
        name: "cancel_idle",
        matches: |state, event| state.is_idle() && matches!(event, Event::Cancel),
        apply: |ctx, _, _| {
            Transition::new(
                State::Idle,
                vec![Action::Reply(Reply::text(
                    texts::nothing_to_cancel(&ctx.customer.lang_code),
                    Keyboard::None,
                ))],
            )
        },
    },
    Rule {
        name: "add_to_cart",
        matches: |_, event| {
            matches!(event, Event::Menu(nav) if nav.menu_name == ADD_TO_CART && nav.product_id.is_some())
        },
        apply: |ctx, state, event| {
            let mut actions = vec![Action::UpsertUser { phone: None }];
            if let Event::Menu(MenuCallback {
                product_id: Some(product_id),
                ..
            }) = event
            {
                actions.push(Action::AddToCart {
                    product_id: *product_id,
                });
            }
            actions.push(Action::Reply(Reply::Notice(Some(texts::added_to_cart(
                &ctx.customer.lang_code,
            )))));

            Transition::new(state.clone(), actions)
        },
    },
    Rule {
        name: "start_order",
        matches: |_, event| matches!(event, Event::Menu(nav) if nav.menu_name == ORDER),
        apply: |ctx, _, _| {
            Transition::new(
                State::AwaitingPhone,
                vec![
                    Action::Reply(Reply::text(
                        texts::phone_prompt(&ctx.customer.lang_code),
                        Keyboard::None,
                    )),
                    Action::Reply(Reply::Notice(None)),
                ],
            )
        },
    },
    Rule {
        name: "navigate",
        matches: |_, event| matches!(event, Event::Menu(_)),
        apply: |_, state, event| {
            let mut actions = Vec::new();
            if let Event::Menu(nav) = event {
                actions.push(Action::Reply(Reply::Menu {
                    nav: nav.clone(),
                    edit: true,
                }));
            }
            actions.push(Action::Reply(Reply::Notice(None)));

            Transition::new(state.clone(), actions)
        },
    },
    Rule {
        name: "phone",
        matches: |state, event| {
            matches!(state, State::AwaitingPhone)
                && matches!(event, Event::Text(text) if is_phone_input(text))
        },
        apply: |ctx, state, event| match event {
            Event::Text(text) => {
                let phone = text.trim().to_owned();
                Transition::new(
                    State::AwaitingDeliveryMethod {
                        phone: phone.clone(),
                    },
                    vec![
                        Action::UpsertUser { phone: Some(phone) },
                        Action::Reply(Reply::text(
                            texts::choose_delivery(&ctx.customer.lang_code),
                            Keyboard::DeliveryMethods,
                        )),
                    ],
                )
            }
            _ => Transition::new(state.clone(), Vec::new()),
        },
    },
    Rule {
        name: "pickup",
        matches: |state, event| {
            matches!(state, State::AwaitingDeliveryMethod { .. })
                && is_delivery(event, DeliveryMethod::Pickup)
        },
        apply: |ctx, state, _| {
            let lang_code = &ctx.customer.lang_code;
            Transition::new(
                State::AwaitingPayment {
                    phone: phone_of(state),
                    delivery: Delivery::Pickup,
                },
                vec![
                    Action::Reply(Reply::text(
                        texts::pickup_location(lang_code, &ctx.shop.pickup_location_url),
                        Keyboard::None,
                    )),
                    Action::Reply(Reply::text(
                        texts::choose_payment(lang_code),
                        Keyboard::PaymentMethods,
                    )),
                    Action::Reply(Reply::Notice(None)),
                ],
            )
        },
    },
    Rule {
        name: "courier",
        matches: |state, event| {
            matches!(state, State::AwaitingDeliveryMethod { .. })
                && is_delivery(event, DeliveryMethod::Courier)
        },
        apply: |ctx, state, _| {
            Transition::new(
                State::AwaitingLocation {
                    phone: phone_of(state),
                },
                vec![
                    Action::Reply(Reply::text(
                        texts::share_location(&ctx.customer.lang_code),
                        Keyboard::RequestLocation,
                    )),
                    Action::Reply(Reply::Notice(None)),
                ],
            )
        },
    },
    Rule {
        name: "location",
        matches: |state, event| {
            matches!(state, State::AwaitingLocation { .. })
                && matches!(event, Event::Location { .. })
        },
        apply: |ctx, state, event| match *event {
            Event::Location {
                latitude,
                longitude,
            } => {
                let lang_code = &ctx.customer.lang_code;
                Transition::new(
                    State::AwaitingPayment {
                        phone: phone_of(state),
                        delivery: Delivery::Courier {
                            latitude,
                            longitude,
                        },
                    },
                    vec![
                        Action::Reply(Reply::text(
                            texts::your_location(lang_code, latitude, longitude),
                            Keyboard::Remove,
                        )),
                        Action::Reply(Reply::text(
                            texts::choose_payment(lang_code),
                            Keyboard::PaymentMethods,
                        )),
                    ],
                )
            }
            _ => Transition::new(state.clone(), Vec::new()),
        },
    },
    Rule {
        name: "payment",
        matches: |state, event| {
            matches!(state, State::AwaitingPayment { .. })
                && matches!(event, Event::Button(data) if PaymentMethod::from_payload(data).is_some())
        },
        apply: |ctx, state, event| match (state, event) {
            (State::AwaitingPayment { phone, delivery }, Event::Button(data)) => {
                let Some(payment) = PaymentMethod::from_payload(data) else {
                    return Transition::new(state.clone(), vec![Action::Reply(Reply::Notice(None))]);
                };
                Transition::new(
                    State::Idle,
                    vec![
                        Action::Reply(Reply::text(
                            texts::order_placed(&ctx.customer.lang_code, payment, phone, delivery),
                            Keyboard::None,
                        )),
                        Action::Reply(Reply::Notice(None)),
                    ],
                )
            }
            _ => Transition::new(state.clone(), Vec::new()),
        },
    },
    Rule {
        name: "remind",
        matches: |state, event| !state.is_idle() && event.is_message(),
        apply: |ctx, state, _| {
            let keyboard = match state {
                State::AwaitingDeliveryMethod { .. } => Keyboard::DeliveryMethods,
                State::AwaitingLocation { .. } => Keyboard::RequestLocation,
                State::AwaitingPayment { .. } => Keyboard::PaymentMethods,
                State::Idle | State::AwaitingPhone => Keyboard::None,
            };

            Transition::new(
                state.clone(),
                vec![Action::Reply(Reply::text(
                    texts::reminder(&ctx.customer.lang_code, state),
                    keyboard,
                ))],
            )
        },
    },
    Rule {
        name: "stale_button",
        matches: |_, event| matches!(event, Event::Button(_)),
        apply: |_, state, _| Transition::new(state.clone(), vec![Action::Reply(Reply::Notice(None))]),
    },
];

/// Whether a text may be a phone number. Empty messages, unknown commands and texts that don't fit in the
/// phone field of the user record are rejected.
fn is_phone_input(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !text.starts_with('/') && text.chars().count() <= PHONE_MAX_LEN
}

fn is_delivery(event: &Event, method: DeliveryMethod) -> bool {
    matches!(event, Event::Button(data) if DeliveryMethod::from_payload(data) == Some(method))
}

fn phone_of(state: &State) -> String {
    match state {
        State::AwaitingDeliveryMethod { phone }
        | State::AwaitingLocation { phone }
        | State::AwaitingPayment { phone, .. } => phone.clone(),
        State::Idle | State::AwaitingPhone => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use super::Context;

    fn customer() -> Customer {
        Customer {
            id: 1,
            first_name: String::from("Ivan"),
            last_name: Some(String::from("Petrov")),
            lang_code: String::from("en"),
        }
    }

    fn shop() -> ShopSettings {
        ShopSettings {
            pickup_location_url: String::from("https://maps.example.com/pickup"),
            products_per_page: 1,
            currency: String::from("RUB"),
        }
    }

    fn apply(state: &State, event: Event) -> Option<(&'static str, Transition)> {
        let (customer, shop) = (customer(), shop());
        let ctx = Context {
            customer: &customer,
            shop: &shop,
        };

        route(state, &event).map(|rule| (rule.name, (rule.apply)(&ctx, state, &event)))
    }

    fn button(data: &str) -> Event {
        Event::Button(data.to_owned())
    }

    fn delivery_state() -> State {
        State::AwaitingDeliveryMethod {
            phone: String::from("+79998887766"),
        }
    }

    #[rstest]
    #[case(State::Idle, Event::Start, "start")]
    #[case(State::AwaitingPhone, Event::Start, "start")]
    #[case(State::AwaitingPhone, Event::Cancel, "cancel_order")]
    #[case(State::Idle, Event::Cancel, "cancel_idle")]
    #[case(State::Idle, Event::Menu(MenuCallback::new(2, ADD_TO_CART).with_product(3)), "add_to_cart")]
    #[case(State::Idle, Event::Menu(MenuCallback::new(3, ORDER)), "start_order")]
    #[case(delivery_state(), Event::Menu(MenuCallback::new(3, ORDER)), "start_order")]
    #[case(State::Idle, Event::Menu(MenuCallback::new(1, "catalog")), "navigate")]
    #[case(State::Idle, Event::Menu(MenuCallback::new(2, ADD_TO_CART)), "navigate")]
    #[case(State::AwaitingPhone, Event::Text(String::from("+79998887766")), "phone")]
    #[case(State::AwaitingPhone, Event::Text(String::from("/unknown")), "remind")]
    #[case(State::AwaitingPhone, Event::Text(String::from("+7 (999) 888-77-66, call after 6pm")), "remind")]
    #[case(State::AwaitingPhone, Event::Location { latitude: 1.0, longitude: 2.0 }, "remind")]
    #[case(delivery_state(), button("pickup"), "pickup")]
    #[case(delivery_state(), button("courier"), "courier")]
    #[case(delivery_state(), button("cash"), "stale_button")]
    #[case(delivery_state(), Event::Text(String::from("courier")), "remind")]
    #[case(State::AwaitingPhone, button("pickup"), "stale_button")]
    #[case(State::Idle, button("cash"), "stale_button")]
    fn rule_order(#[case] state: State, #[case] event: Event, #[case] expected: &str) {
        assert_eq!(route(&state, &event).map(|r| r.name), Some(expected));
    }

    #[rstest]
    #[case(State::Idle, Event::Text(String::from("hello")))]
    #[case(State::Idle, Event::Location { latitude: 1.0, longitude: 2.0 })]
    fn idle_messages_are_ignored(#[case] state: State, #[case] event: Event) {
        assert!(route(&state, &event).is_none());
    }

    #[test]
    fn phone_received() {
        let (rule, transition) = apply(
            &State::AwaitingPhone,
            Event::Text(String::from(" +79998887766 ")),
        )
        .expect("No rule matched");

        assert_eq!(rule, "phone");
        assert_eq!(transition.next, delivery_state());
        assert_eq!(
            transition.actions[0],
            Action::UpsertUser {
                phone: Some(String::from("+79998887766"))
            }
        );
        assert_eq!(
            transition.actions[1],
            Action::Reply(Reply::text(
                String::from("Choose a delivery method:"),
                Keyboard::DeliveryMethods
            ))
        );
    }

    #[test]
    fn pickup_skips_location() {
        let (_, transition) = apply(&delivery_state(), button("pickup")).unwrap();

        assert_eq!(
            transition.next,
            State::AwaitingPayment {
                phone: String::from("+79998887766"),
                delivery: Delivery::Pickup,
            }
        );
        let texts = transition
            .actions
            .iter()
            .filter(|a| matches!(a, Action::Reply(Reply::Text { .. })))
            .count();
        assert_eq!(texts, 2);
        assert_eq!(
            transition.actions[0],
            Action::Reply(Reply::text(
                String::from("Here is the location of the pickup point: https://maps.example.com/pickup"),
                Keyboard::None
            ))
        );
        assert_eq!(
            transition.actions[1],
            Action::Reply(Reply::text(
                String::from("Choose a payment method:"),
                Keyboard::PaymentMethods
            ))
        );
    }

    #[test]
    fn courier_requires_location() {
        let (_, transition) = apply(&delivery_state(), button("courier")).unwrap();
        let state = transition.next;
        assert_eq!(
            state,
            State::AwaitingLocation {
                phone: String::from("+79998887766")
            }
        );

        // Payment buttons are not accepted until the location arrives.
        assert_eq!(apply(&state, button("cash")).unwrap().0, "stale_button");

        let (_, transition) = apply(
            &state,
            Event::Location {
                latitude: 41.309703,
                longitude: 69.509435,
            },
        )
        .unwrap();
        assert_eq!(
            transition.next,
            State::AwaitingPayment {
                phone: String::from("+79998887766"),
                delivery: Delivery::Courier {
                    latitude: 41.309703,
                    longitude: 69.509435,
                },
            }
        );
        assert_eq!(
            transition.actions[0],
            Action::Reply(Reply::text(
                String::from("Your location: 41.309703, 69.509435"),
                Keyboard::Remove
            ))
        );
    }

    #[rstest]
    #[case("cash", "💵 Cash")]
    #[case("prepayment", "💳 Prepayment")]
    fn payment_resets_session(#[case] payload: &str, #[case] label: &str) {
        let state = State::AwaitingPayment {
            phone: String::from("+79998887766"),
            delivery: Delivery::Pickup,
        };

        let (rule, transition) = apply(&state, button(payload)).unwrap();

        assert_eq!(rule, "payment");
        assert_eq!(transition.next, State::Idle);
        match &transition.actions[0] {
            Action::Reply(Reply::Text { text, .. }) => assert!(text.contains(label)),
            other => panic!("Unexpected action: {other:?}"),
        }
    }

    #[test]
    fn unknown_payment_keeps_state() {
        let state = State::AwaitingPayment {
            phone: String::from("+79998887766"),
            delivery: Delivery::Pickup,
        };
        let rule = RULES
            .iter()
            .find(|r| r.name == "payment")
            .expect("Missing payment rule");
        let (customer, shop) = (customer(), shop());
        let ctx = Context {
            customer: &customer,
            shop: &shop,
        };

        let transition = (rule.apply)(&ctx, &state, &button("bitcoin"));

        assert_eq!(transition.next, state);
        assert_eq!(transition.actions, vec![Action::Reply(Reply::Notice(None))]);
    }

    #[rstest]
    #[case("+79998887766", true)]
    #[case("+7 999 888 77 66 ext1", false)]
    #[case("12345678901234567890", true)]
    #[case("123456789012345678901", false)]
    #[case("   ", false)]
    #[case("/help", false)]
    fn phone_fits_user_record(#[case] text: &str, #[case] accepted: bool) {
        assert_eq!(is_phone_input(text), accepted);
    }

    #[test]
    fn add_to_cart_keeps_state() {
        let state = State::AwaitingPhone;
        let (_, transition) = apply(
            &state,
            Event::Menu(MenuCallback::new(2, ADD_TO_CART).with_category(1).with_product(5)),
        )
        .unwrap();

        assert_eq!(transition.next, state);
        assert_eq!(
            transition.actions,
            vec![
                Action::UpsertUser { phone: None },
                Action::AddToCart { product_id: 5 },
                Action::Reply(Reply::Notice(Some(String::from(
                    "The product was added to the cart."
                )))),
            ]
        );
        assert!(
            !transition
                .actions
                .iter()
                .any(|a| matches!(a, Action::Reply(Reply::Menu { .. })))
        );
    }

    #[test]
    fn reminders_resend_keyboards() {
        let state = State::AwaitingLocation {
            phone: String::from("+79998887766"),
        };
        let (_, transition) = apply(&state, Event::Text(String::from("here"))).unwrap();

        assert_eq!(transition.next, state);
        assert!(matches!(
            &transition.actions[0],
            Action::Reply(Reply::Text { keyboard: Keyboard::RequestLocation, text })
                if text.contains("Please, share your location.")
        ));
    }
}
