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

//! States of the order dialog.

use serde::{Deserialize, Serialize};

/// Step of the order dialog of a user, with the data collected so far.
///
/// # Description
///
/// ```text
/// Idle ─order─▶ AwaitingPhone ─text─▶ AwaitingDeliveryMethod ─pickup──────────────▶ AwaitingPayment ─cash|prepayment─▶ Idle
///                                                            └courier▶ AwaitingLocation ─location─┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum State {
    #[default]
    Idle,
    AwaitingPhone,
    AwaitingDeliveryMethod {
        phone: String,
    },
    AwaitingLocation {
        phone: String,
    },
    AwaitingPayment {
        phone: String,
        delivery: Delivery,
    },
}

impl State {
    /// Name of the step, for logging purposes.
    pub fn step(&self) -> &'static str {
        match self {
            State::Idle => "Idle",
            State::AwaitingPhone => "AwaitingPhone",
            State::AwaitingDeliveryMethod { .. } => "AwaitingDeliveryMethod",
            State::AwaitingLocation { .. } => "AwaitingLocation",
            State::AwaitingPayment { .. } => "AwaitingPayment",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, State::Idle)
    }
}

/// How the order reaches the customer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Delivery {
    Pickup,
    /// Delivery by courier to the shared location.
    Courier { latitude: f64, longitude: f64 },
}

/// Buttons of the delivery keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMethod {
    Pickup,
    Courier,
}

impl DeliveryMethod {
    pub const ALL: [DeliveryMethod; 2] = [DeliveryMethod::Pickup, DeliveryMethod::Courier];

    pub fn payload(self) -> &'static str {
        match self {
            DeliveryMethod::Pickup => "pickup",
            DeliveryMethod::Courier => "courier",
        }
    }

    pub fn from_payload(payload: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.payload() == payload)
    }
}

/// Buttons of the payment keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Prepayment,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Cash, PaymentMethod::Prepayment];

    pub fn payload(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Prepayment => "prepayment",
        }
    }

    pub fn from_payload(payload: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.payload() == payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn payloads() {
        assert_eq!(
            DeliveryMethod::from_payload("pickup"),
            Some(DeliveryMethod::Pickup)
        );
        assert_eq!(
            DeliveryMethod::from_payload("courier"),
            Some(DeliveryMethod::Courier)
        );
        assert_eq!(DeliveryMethod::from_payload("cash"), None);
        assert_eq!(
            PaymentMethod::from_payload("prepayment"),
            Some(PaymentMethod::Prepayment)
        );
        assert_eq!(PaymentMethod::from_payload("card"), None);
    }

    #[test]
    fn sessions_survive_serialisation() {
        let state = State::AwaitingPayment {
            phone: String::from("+79998887766"),
            delivery: Delivery::Courier {
                latitude: 41.309703,
                longitude: 69.509435,
            },
        };

        let json = serde_json::to_string(&state).expect("Failed to serialise the state");
        let restored: State = serde_json::from_str(&json).expect("Failed to deserialise the state");
        assert_eq!(restored, state);
        assert_eq!(State::default().step(), "Idle");
    }
}
