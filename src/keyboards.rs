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

//! Keyboards module
//!
//! # Description
//!
//! This module includes all the keyboards that are used within the handlers of the bot.

use crate::{
    dialog::{DeliveryMethod, Keyboard, PaymentMethod, texts},
    errors::CallbackError,
    menu::MenuContent,
};
use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    KeyboardRemove, ReplyMarkup,
};

/// Inline keyboard with the delivery methods, one per row.
pub fn delivery_keyboard(lang_code: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(DeliveryMethod::ALL.map(|m| {
        [InlineKeyboardButton::callback(
            texts::delivery_label(lang_code, m),
            m.payload(),
        )]
    }))
}

/// Inline keyboard with the payment methods, one per row.
pub fn payment_keyboard(lang_code: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(PaymentMethod::ALL.map(|m| {
        [InlineKeyboardButton::callback(
            texts::payment_label(lang_code, m),
            m.payload(),
        )]
    }))
}

/// Reply keyboard with a single button that shares the location of the device.
pub fn location_keyboard(lang_code: &str) -> KeyboardMarkup {
    KeyboardMarkup::new([[
        KeyboardButton::new(texts::location_button(lang_code)).request(ButtonRequest::Location)
    ]])
    .resize_keyboard()
}

/// Markup that shall be attached to a text reply of the dialog.
pub fn reply_markup(keyboard: Keyboard, lang_code: &str) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::DeliveryMethods => Some(delivery_keyboard(lang_code).into()),
        Keyboard::PaymentMethods => Some(payment_keyboard(lang_code).into()),
        Keyboard::RequestLocation => Some(location_keyboard(lang_code).into()),
        Keyboard::Remove => Some(KeyboardRemove::new().into()),
    }
}

/// Inline keyboard of a menu, keeping the layout of its rows.
pub fn menu_keyboard(content: &MenuContent) -> Result<InlineKeyboardMarkup, CallbackError> {
    let mut keyboard_markup = InlineKeyboardMarkup::default();

    for row in &content.buttons {
        let buttons = row
            .iter()
            .map(|b| Ok(InlineKeyboardButton::callback(b.label.clone(), b.target.encode()?)))
            .collect::<Result<Vec<_>, CallbackError>>()?;
        keyboard_markup = keyboard_markup.append_row(buttons);
    }

    Ok(keyboard_markup)
}
