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

//! Menus backed by the catalog of the shop.

use super::{MenuButton, MenuContent, MenuRenderer};
use crate::{
    callback::{ADD_TO_CART, MenuCallback, ORDER},
    configuration::ShopSettings,
    errors::MenuError,
    store::{CartItem, Product, ShopStore},
};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::utils::html;
use tracing::{debug, instrument};

/// Static pages that are reachable from the main menu.
const INFO_PAGES: [&str; 3] = ["about", "payment", "shipping"];

/// Renderer of the shop menus.
///
/// # Description
///
/// Menus are organised in levels:
///
/// - Level 0: main page of the shop.
/// - Level 1: list of categories (`catalog`) or a static page (`about`, `payment`, `shipping`).
/// - Level 2: products of a category (`products`), paginated.
/// - Level 3: the cart of the user (`cart`).
pub struct CatalogMenu {
    store: Arc<dyn ShopStore>,
    products_per_page: usize,
    currency: String,
}

impl CatalogMenu {
    pub fn new(store: Arc<dyn ShopStore>, settings: &ShopSettings) -> Self {
        CatalogMenu {
            store,
            products_per_page: settings.products_per_page.max(1),
            currency: settings.currency.clone(),
        }
    }

    async fn main_menu(&self, lang_code: &str) -> Result<MenuContent, MenuError> {
        let caption = match self.store.page("main").await? {
            Some(page) => page.description,
            None => _welcome(lang_code).to_owned(),
        };

        Ok(MenuContent {
            caption,
            buttons: vec![
                vec![MenuButton::new(
                    _label("catalog", lang_code),
                    MenuCallback::new(1, "catalog"),
                )],
                vec![MenuButton::new(
                    _label("cart", lang_code),
                    MenuCallback::new(3, "cart"),
                )],
                vec![
                    MenuButton::new(_label("about", lang_code), MenuCallback::new(1, "about")),
                    MenuButton::new(
                        _label("payment", lang_code),
                        MenuCallback::new(1, "payment"),
                    ),
                ],
                vec![MenuButton::new(
                    _label("shipping", lang_code),
                    MenuCallback::new(1, "shipping"),
                )],
            ],
        })
    }

    async fn categories(&self, lang_code: &str) -> Result<MenuContent, MenuError> {
        let categories = self.store.categories().await?;
        debug!("{} categories listed", categories.len());

        let mut buttons: Vec<Vec<MenuButton>> = categories
            .chunks(2)
            .map(|row| {
                row.iter()
                    .map(|c| {
                        MenuButton::new(
                            c.name.as_str(),
                            MenuCallback::new(2, "products")
                                .with_category(c.id)
                                .with_page(1),
                        )
                    })
                    .collect()
            })
            .collect();
        buttons.push(vec![
            MenuButton::new(_label("back", lang_code), MenuCallback::new(0, "main")),
            MenuButton::new(_label("cart", lang_code), MenuCallback::new(3, "cart")),
        ]);

        Ok(MenuContent {
            caption: _choose_category(lang_code).to_owned(),
            buttons,
        })
    }

    async fn info_page(&self, name: &str, lang_code: &str) -> Result<MenuContent, MenuError> {
        let caption = match self.store.page(name).await? {
            Some(page) => page.description,
            None => format!("<b>{}</b>", _label(name, lang_code)),
        };

        Ok(MenuContent {
            caption,
            buttons: vec![vec![MenuButton::new(
                _label("back", lang_code),
                MenuCallback::new(0, "main"),
            )]],
        })
    }

    async fn products(&self, nav: &MenuCallback, lang_code: &str) -> Result<MenuContent, MenuError> {
        let category = nav
            .category
            .ok_or_else(|| MenuError::UnknownMenu(format!("{nav}")))?;
        let products = self.store.products(category).await?;

        let back_row = vec![
            MenuButton::new(_label("back", lang_code), MenuCallback::new(1, "catalog")),
            MenuButton::new(_label("cart", lang_code), MenuCallback::new(3, "cart")),
        ];

        if products.is_empty() {
            return Ok(MenuContent {
                caption: _no_products(lang_code).to_owned(),
                buttons: vec![back_row],
            });
        }

        let pages = products.len().div_ceil(self.products_per_page);
        let page = (nav.page_or_first() as usize).min(pages);
        let shown = products
            .chunks(self.products_per_page)
            .nth(page - 1)
            .unwrap_or_default();

        let mut caption = shown
            .iter()
            .map(|p| self.product_caption(p, lang_code))
            .collect::<Vec<_>>()
            .join("\n\n");
        caption.push_str(&format!("\n\n{}", _page_counter(page, pages, lang_code)));

        let target = |p: usize| {
            MenuCallback::new(2, "products")
                .with_category(category)
                .with_page(p as u32)
        };

        let mut buttons: Vec<Vec<MenuButton>> = shown
            .iter()
            .map(|p| {
                let label = if shown.len() == 1 {
                    _label("add_to_cart", lang_code).to_owned()
                } else {
                    format!("{} {}", _label("add_to_cart", lang_code), p.name)
                };
                vec![MenuButton::new(
                    label,
                    MenuCallback::new(2, ADD_TO_CART)
                        .with_category(category)
                        .with_page(page as u32)
                        .with_product(p.id),
                )]
            })
            .collect();

        let mut pagination = Vec::new();
        if page > 1 {
            pagination.push(MenuButton::new(_label("previous", lang_code), target(page - 1)));
        }
        if page < pages {
            pagination.push(MenuButton::new(_label("next", lang_code), target(page + 1)));
        }
        if !pagination.is_empty() {
            buttons.push(pagination);
        }
        buttons.push(back_row);

        Ok(MenuContent { caption, buttons })
    }

    async fn cart(&self, user_id: i64, lang_code: &str) -> Result<MenuContent, MenuError> {
        let items = self.store.cart(user_id).await?;

        let back = vec![MenuButton::new(
            _label("back", lang_code),
            MenuCallback::new(0, "main"),
        )];

        if items.is_empty() {
            return Ok(MenuContent {
                caption: _empty_cart(lang_code).to_owned(),
                buttons: vec![back],
            });
        }

        let total: i64 = items.iter().map(CartItem::subtotal).sum();
        let lines = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                format!(
                    "{}. {} — {} × {} = {}",
                    i + 1,
                    html::escape(&item.product.name),
                    item.quantity,
                    self.price(item.product.price),
                    self.price(item.subtotal()),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(MenuContent {
            caption: format!(
                "🛒 <b>{}</b>\n\n{lines}\n\n<b>{}: {}</b>",
                _label("cart", lang_code),
                _label("total", lang_code),
                self.price(total),
            ),
            buttons: vec![
                vec![MenuButton::new(
                    _label("order", lang_code),
                    MenuCallback::new(3, ORDER),
                )],
                back,
            ],
        })
    }

    fn product_caption(&self, product: &Product, lang_code: &str) -> String {
        format!(
            "<b>{}</b>\n{}\n{}: {}",
            html::escape(&product.name),
            html::escape(&product.description),
            _label("price", lang_code),
            self.price(product.price),
        )
    }

    /// Format an amount given in minor units.
    fn price(&self, amount: i64) -> String {
        format!("{}.{:02} {}", amount / 100, amount % 100, self.currency)
    }
}

#[async_trait]
impl MenuRenderer for CatalogMenu {
    #[instrument(name = "Render menu", skip(self, nav, lang_code), fields(menu = %nav))]
    async fn render(
        &self,
        nav: &MenuCallback,
        user_id: i64,
        lang_code: &str,
    ) -> Result<MenuContent, MenuError> {
        match (nav.level, nav.menu_name.as_str()) {
            (0, _) => self.main_menu(lang_code).await,
            (1, "catalog") => self.categories(lang_code).await,
            (1, name) if INFO_PAGES.contains(&name) => self.info_page(name, lang_code).await,
            (2, _) => self.products(nav, lang_code).await,
            (3, _) => self.cart(user_id, lang_code).await,
            (_, name) => Err(MenuError::UnknownMenu(name.to_owned())),
        }
    }
}

fn _label<'a>(key: &'a str, lang_code: &str) -> &'a str {
    match (lang_code, key) {
        ("ru", "catalog") => "🍕 Каталог",
        ("ru", "cart") => "🛒 Корзина",
        ("ru", "about") => "ℹ️ О нас",
        ("ru", "payment") => "💳 Оплата",
        ("ru", "shipping") => "🚚 Доставка",
        ("ru", "back") => "◀️ Назад",
        ("ru", "previous") => "◀️ Пред.",
        ("ru", "next") => "След. ▶️",
        ("ru", "add_to_cart") => "🛒 Купить",
        ("ru", "order") => "✅ Оформить заказ",
        ("ru", "price") => "Стоимость",
        ("ru", "total") => "Итого",
        (_, "catalog") => "🍕 Catalog",
        (_, "cart") => "🛒 Cart",
        (_, "about") => "ℹ️ About us",
        (_, "payment") => "💳 Payment",
        (_, "shipping") => "🚚 Shipping",
        (_, "back") => "◀️ Back",
        (_, "previous") => "◀️ Prev",
        (_, "next") => "Next ▶️",
        (_, "add_to_cart") => "🛒 Add to cart",
        (_, "order") => "✅ Place order",
        (_, "price") => "Price",
        (_, "total") => "Total",
        _ => key,
    }
}

fn _welcome(lang_code: &str) -> &'static str {
    match lang_code {
        "ru" => "<b>Добро пожаловать!</b>",
        _ => "<b>Welcome to our shop!</b>",
    }
}

fn _choose_category(lang_code: &str) -> &'static str {
    match lang_code {
        "ru" => "Выберите категорию:",
        _ => "Choose a category:",
    }
}

fn _no_products(lang_code: &str) -> &'static str {
    match lang_code {
        "ru" => "В этой категории пока нет товаров.",
        _ => "There are no products in this category yet.",
    }
}

fn _empty_cart(lang_code: &str) -> &'static str {
    match lang_code {
        "ru" => "🛒 Ваша корзина пуста.",
        _ => "🛒 Your cart is empty.",
    }
}

fn _page_counter(page: usize, pages: usize, lang_code: &str) -> String {
    match lang_code {
        "ru" => format!("Страница {page} из {pages}"),
        _ => format!("Page {page} of {pages}"),
    }
}
