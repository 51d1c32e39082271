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

//! Payload of the menu buttons.
//!
//! # Description
//!
//! Every inline button of the catalog menus carries a [MenuCallback] that tells the bot which menu
//! shall be rendered next. Telegram limits the callback data to 64 bytes, so the payload is packed as a
//! colon separated string:
//!
//! ```text
//! menu:<level>:<menu_name>:<category>:<page>:<product_id>
//! ```
//!
//! Optional fields are left empty, e.g. `menu:0:main:::`.

use crate::errors::CallbackError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Prefix that identifies the payload of a menu button.
pub const MENU_PREFIX: &str = "menu";

/// Maximum length of the callback data accepted by Telegram.
pub const MAX_CALLBACK_LEN: usize = 64;

/// Menu name reserved to add a product to the cart of the user.
pub const ADD_TO_CART: &str = "add_to_cart";

/// Menu name reserved to start the order dialog.
pub const ORDER: &str = "order";

/// Navigation event attached to the buttons of the menus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCallback {
    pub level: u8,
    pub menu_name: String,
    pub category: Option<i64>,
    pub page: Option<u32>,
    pub product_id: Option<i64>,
}

impl MenuCallback {
    pub fn new(level: u8, menu_name: &str) -> Self {
        MenuCallback {
            level,
            menu_name: menu_name.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: i64) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_product(mut self, product_id: i64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Page of the menu, starting at 1.
    pub fn page_or_first(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Build the string that is sent as callback data of a button.
    ///
    /// # Description
    ///
    /// The menu name can't include the field separator, and the resulting payload must fit in
    /// [MAX_CALLBACK_LEN] bytes.
    pub fn encode(&self) -> Result<String, CallbackError> {
        if self.menu_name.is_empty() || self.menu_name.contains(':') {
            return Err(CallbackError::WrongFormat(format!(
                "invalid menu name: {:?}",
                self.menu_name
            )));
        }

        let payload = self.to_string();

        if payload.len() > MAX_CALLBACK_LEN {
            Err(CallbackError::TooLong(MAX_CALLBACK_LEN))
        } else {
            Ok(payload)
        }
    }
}

impl fmt::Display for MenuCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{MENU_PREFIX}:{}:{}:{}:{}:{}",
            self.level,
            self.menu_name,
            optional(self.category),
            optional(self.page),
            optional(self.product_id),
        )
    }
}

impl FromStr for MenuCallback {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split(':').collect::<Vec<&str>>();

        match fields.as_slice() {
            [MENU_PREFIX, level, menu_name, category, page, product_id] => {
                if menu_name.is_empty() {
                    return Err(CallbackError::WrongFormat("missing menu name".to_owned()));
                }

                Ok(MenuCallback {
                    level: level
                        .parse()
                        .map_err(|_| CallbackError::WrongFormat(format!("level: {level}")))?,
                    menu_name: (*menu_name).to_owned(),
                    category: parse_optional(category, "category")?,
                    page: parse_optional(page, "page")?,
                    product_id: parse_optional(product_id, "product_id")?,
                })
            }
            [MENU_PREFIX, ..] => Err(CallbackError::WrongFormat(format!(
                "expected 6 fields, found {}",
                fields.len()
            ))),
            _ => Err(CallbackError::NotMenuPayload),
        }
    }
}

fn optional<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_optional<T: FromStr>(field: &str, name: &str) -> Result<Option<T>, CallbackError> {
    if field.is_empty() {
        Ok(None)
    } else {
        field
            .parse()
            .map(Some)
            .map_err(|_| CallbackError::WrongFormat(format!("{name}: {field}")))
    }
}
