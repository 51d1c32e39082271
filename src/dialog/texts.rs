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

//! Messages of the order dialog in English and Russian.

use super::{Delivery, DeliveryMethod, PaymentMethod, State};

pub fn phone_prompt(lang_code: &str) -> String {
    match lang_code {
        "ru" => "Пожалуйста, введите ваш номер телефона в формате +7XXXXXXXXXX:".to_owned(),
        _ => "Please, enter your phone number using the format +7XXXXXXXXXX:".to_owned(),
    }
}

pub fn choose_delivery(lang_code: &str) -> String {
    match lang_code {
        "ru" => "Выберите способ доставки:".to_owned(),
        _ => "Choose a delivery method:".to_owned(),
    }
}

pub fn pickup_location(lang_code: &str, url: &str) -> String {
    match lang_code {
        "ru" => format!("Вот ссылка на локацию: {url}"),
        _ => format!("Here is the location of the pickup point: {url}"),
    }
}

pub fn share_location(lang_code: &str) -> String {
    match lang_code {
        "ru" => "Пожалуйста, отправьте вашу локацию.".to_owned(),
        _ => "Please, share your location.".to_owned(),
    }
}

pub fn your_location(lang_code: &str, latitude: f64, longitude: f64) -> String {
    match lang_code {
        "ru" => format!("Ваша локация: {latitude}, {longitude}"),
        _ => format!("Your location: {latitude}, {longitude}"),
    }
}

pub fn choose_payment(lang_code: &str) -> String {
    match lang_code {
        "ru" => "Выберите способ оплаты:".to_owned(),
        _ => "Choose a payment method:".to_owned(),
    }
}

pub fn order_placed(lang_code: &str, payment: PaymentMethod, phone: &str, delivery: &Delivery) -> String {
    let delivery = match delivery {
        Delivery::Pickup => delivery_label(lang_code, DeliveryMethod::Pickup),
        Delivery::Courier { .. } => delivery_label(lang_code, DeliveryMethod::Courier),
    };
    let payment = payment_label(lang_code, payment);

    match lang_code {
        "ru" => format!(
            "Вы выбрали способ оплаты: {payment}. Заказ оформлен!\nДоставка: {delivery}\nТелефон: {phone}"
        ),
        _ => format!(
            "You chose the payment method: {payment}. Your order was placed!\nDelivery: {delivery}\nPhone: {phone}"
        ),
    }
}

pub fn order_cancelled(lang_code: &str) -> String {
    match lang_code {
        "ru" => "❌ Оформление заказа отменено.".to_owned(),
        _ => "❌ The order was cancelled.".to_owned(),
    }
}

pub fn nothing_to_cancel(lang_code: &str) -> String {
    match lang_code {
        "ru" => "Нет заказа для отмены.".to_owned(),
        _ => "There is no order in progress.".to_owned(),
    }
}

pub fn added_to_cart(lang_code: &str) -> String {
    match lang_code {
        "ru" => "Товар добавлен в корзину.".to_owned(),
        _ => "The product was added to the cart.".to_owned(),
    }
}

/// Reminder of the input that the current step expects.
pub fn reminder(lang_code: &str, state: &State) -> String {
    let hint = match state {
        State::Idle => return String::new(),
        State::AwaitingPhone => phone_prompt(lang_code),
        State::AwaitingDeliveryMethod { .. } => choose_delivery(lang_code),
        State::AwaitingLocation { .. } => share_location(lang_code),
        State::AwaitingPayment { .. } => choose_payment(lang_code),
    };

    match lang_code {
        "ru" => format!("🤔 Не понял. {hint}\nЧтобы отменить заказ, отправьте /cancel"),
        _ => format!("🤔 I didn't get that. {hint}\nSend /cancel to abort the order"),
    }
}

pub fn delivery_label(lang_code: &str, method: DeliveryMethod) -> &'static str {
    match (lang_code, method) {
        ("ru", DeliveryMethod::Pickup) => "🏬 Самовывоз",
        ("ru", DeliveryMethod::Courier) => "🛵 Курьер",
        (_, DeliveryMethod::Pickup) => "🏬 Pickup",
        (_, DeliveryMethod::Courier) => "🛵 Courier",
    }
}

pub fn payment_label(lang_code: &str, method: PaymentMethod) -> &'static str {
    match (lang_code, method) {
        ("ru", PaymentMethod::Cash) => "💵 Наличные",
        ("ru", PaymentMethod::Prepayment) => "💳 Предоплата",
        (_, PaymentMethod::Cash) => "💵 Cash",
        (_, PaymentMethod::Prepayment) => "💳 Prepayment",
    }
}

pub fn location_button(lang_code: &str) -> &'static str {
    match lang_code {
        "ru" => "Отправить локацию 🗺️",
        _ => "Share location 🗺️",
    }
}
