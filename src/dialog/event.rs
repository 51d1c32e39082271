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

//! Inbound events of the order dialog.

use crate::{callback::MenuCallback, store::User};
use teloxide::types;

/// Telegram user that sends an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Language of the replies: `ru` or `en`.
    pub lang_code: String,
}

impl Customer {
    /// Build the identity record that is persisted for this customer.
    pub fn as_user(&self, phone: Option<String>) -> User {
        User {
            user_id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone,
        }
    }
}

impl From<&types::User> for Customer {
    fn from(user: &types::User) -> Self {
        // Telegram user IDs use at most 52 bits.
        Customer {
            id: user.id.0 as i64,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            lang_code: match user.language_code.as_deref() {
                Some("ru") => String::from("ru"),
                _ => String::from("en"),
            },
        }
    }
}

/// Tagged variant of everything the dialog reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The `/start` command.
    Start,
    /// The `/cancel` command.
    Cancel,
    /// A menu button was pressed.
    Menu(MenuCallback),
    /// Any other inline button was pressed. Contains the raw callback data.
    Button(String),
    /// Plain text message.
    Text(String),
    /// The user shared a location.
    Location { latitude: f64, longitude: f64 },
}

impl Event {
    /// Whether the event was produced by a message, rather than by a button.
    pub fn is_message(&self) -> bool {
        !matches!(self, Event::Menu(_) | Event::Button(_))
    }
}

/// An event and the customer who produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Incoming {
    pub customer: Customer,
    pub event: Event,
}

impl Incoming {
    pub fn new(customer: Customer, event: Event) -> Self {
        Incoming { customer, event }
    }
}
