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

//! Custom error types.

use thiserror::Error;

/// Errors raised by the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("the product {0} is not listed in the catalog")]
    MissingProduct(i64),
    #[error("failed to migrate the DB: {0}")]
    Migration(String),
    #[error("unknown db error: {0}")]
    Unknown(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        StoreError::Unknown(value.to_string())
    }
}

/// Errors raised while decoding or encoding the payload of a menu button.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CallbackError {
    #[error("the payload does not belong to a menu button")]
    NotMenuPayload,
    #[error("wrong format of the menu payload: {0}")]
    WrongFormat(String),
    #[error("the menu payload exceeds {0} bytes")]
    TooLong(usize),
}

/// Errors raised by the menu renderer.
#[derive(Error, Debug)]
pub enum MenuError {
    #[error("unknown menu requested: {0}")]
    UnknownMenu(String),
    #[error(transparent)]
    Callback(#[from] CallbackError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised while running a step of the order dialog.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Menu(#[from] MenuError),
}
