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

//! Menu module
//!
//! # Description
//!
//! Menus are the navigable screens of the shop: the main page, the catalog, the products of a category
//! and the cart. A [MenuRenderer] turns a [MenuCallback] into a [MenuContent], which is a text plus a
//! grid of buttons. The conversion into Telegram keyboards lives in [crate::keyboards].

use crate::{callback::MenuCallback, errors::MenuError};
use async_trait::async_trait;

mod catalog;

pub use catalog::CatalogMenu;

/// A button of a menu and the navigation event it triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub target: MenuCallback,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, target: MenuCallback) -> Self {
        MenuButton {
            label: label.into(),
            target,
        }
    }
}

/// Display content of a menu. The caption is formatted using HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuContent {
    pub caption: String,
    pub buttons: Vec<Vec<MenuButton>>,
}

impl MenuContent {
    /// Iterate over all the buttons of the menu, row by row.
    pub fn iter_buttons(&self) -> impl Iterator<Item = &MenuButton> {
        self.buttons.iter().flatten()
    }
}

/// Producer of the content of the menus.
#[async_trait]
pub trait MenuRenderer: Send + Sync {
    async fn render(
        &self,
        nav: &MenuCallback,
        user_id: i64,
        lang_code: &str,
    ) -> Result<MenuContent, MenuError>;
}
