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

//! Order dialog.
//!
//! # Description
//!
//! The order dialog collects the data of an order in several steps: phone number, delivery method, location
//! (only for deliveries by courier) and payment method. The session of each user is a [State], kept by the
//! session storage of the dispatcher.
//!
//! Inbound updates are translated into an [Event]. The [rules] table decides which transition applies to the
//! pair (state, event), and the [OrderFlow] runs it.

mod event;
mod flow;
pub mod rules;
mod state;
pub mod texts;

pub use event::{Customer, Event, Incoming};
pub use flow::{OrderFlow, Outcome, Outgoing};
pub use rules::Keyboard;
pub use state::{Delivery, DeliveryMethod, PaymentMethod, State};
