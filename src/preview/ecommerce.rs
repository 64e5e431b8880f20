//! E-commerce template
//!
//! Navigation is `home -> product -> cart -> checkout -> home`. The cart is
//! keyed by product id and prices are kept in cents.

use std::collections::BTreeSet;

use serde_json::json;

use super::node::{ButtonStyle, Icon, PreviewNode};
use super::{Palette, PreviewAction, Reaction, Screen, format_price};
use crate::config::SimulatorConfig;
use crate::notify::Notification;

pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub price_cents: u64,
    pub rating: f32,
    pub description: &'static str,
    /// Custom image slot shown for this product, if any
    pub image_slot: Option<&'static str>,
}

pub const CATALOG: &[Product] = &[
    Product {
        id: 1,
        name: "Laptop Pro 15\"",
        price_cents: 129_999,
        rating: 4.8,
        description: "Procesador de última generación, 16 GB de RAM y pantalla Retina.",
        image_slot: Some("product1"),
    },
    Product {
        id: 2,
        name: "Smartphone X",
        price_cents: 89_999,
        rating: 4.6,
        description: "Cámara triple de 48 MP y batería para todo el día.",
        image_slot: Some("product2"),
    },
    Product {
        id: 3,
        name: "Auriculares Wireless",
        price_cents: 49_999,
        rating: 4.7,
        description: "Cancelación activa de ruido y 30 horas de autonomía.",
        image_slot: Some("product3"),
    },
    Product {
        id: 4,
        name: "Smartwatch Sport",
        price_cents: 29_999,
        rating: 4.4,
        description: "GPS integrado, monitor cardíaco y resistencia al agua.",
        image_slot: None,
    },
];

pub fn product(id: u32) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Product(u32),
    Cart,
    Checkout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenProduct(u32),
    Back,
    AddToCart(u32),
    RemoveFromCart(u32),
    ChangeQuantity { product_id: u32, delta: i32 },
    OpenCart,
    Checkout,
    PlaceOrder,
    ToggleFavorite(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    AddToCart(u32),
    PlaceOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: u32,
    pub quantity: u32,
}

pub struct EcommerceScreen {
    view: View,
    cart: Vec<CartLine>,
    favorites: BTreeSet<u32>,
}

impl Default for EcommerceScreen {
    fn default() -> Self {
        Self {
            view: View::Home,
            cart: Vec::new(),
            favorites: BTreeSet::new(),
        }
    }
}

impl EcommerceScreen {
    #[cfg(test)]
    pub fn view(&self) -> View {
        self.view
    }

    #[cfg(test)]
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    /// Number of items, counting quantities
    pub fn cart_count(&self) -> u32 {
        self.cart.iter().map(|line| line.quantity).sum()
    }

    pub fn quantity_of(&self, product_id: u32) -> u32 {
        self.cart
            .iter()
            .find(|line| line.product_id == product_id)
            .map_or(0, |line| line.quantity)
    }

    pub fn total_cents(&self) -> u64 {
        self.cart
            .iter()
            .filter_map(|line| product(line.product_id).map(|p| p.price_cents * u64::from(line.quantity)))
            .sum()
    }

    pub fn is_favorite(&self, product_id: u32) -> bool {
        self.favorites.contains(&product_id)
    }

    fn add(&mut self, product_id: u32) {
        match self.cart.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.quantity += 1,
            None => self.cart.push(CartLine { product_id, quantity: 1 }),
        }
    }

    fn change_quantity(&mut self, product_id: u32, delta: i32) -> bool {
        let Some(index) = self.cart.iter().position(|line| line.product_id == product_id) else {
            return false;
        };
        let quantity = i64::from(self.cart[index].quantity) + i64::from(delta);
        if quantity <= 0 {
            self.cart.remove(index);
        } else {
            self.cart[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        true
    }

    fn navigate(&mut self, view: View, event: &'static str) -> Reaction<Commit> {
        self.view = view;
        Reaction::new(event).navigation()
    }
}

impl Screen for EcommerceScreen {
    type Action = Action;
    type Commit = Commit;

    fn handle(&mut self, action: Action) -> Reaction<Commit> {
        match (action, self.view) {
            (Action::OpenProduct(id), View::Home) if product(id).is_some() => {
                self.navigate(View::Product(id), "view_product").payload(json!({ "productId": id }))
            }
            (Action::Back, View::Product(_) | View::Cart) => self.navigate(View::Home, "navigate_back"),
            (Action::Back, View::Checkout) => self.navigate(View::Cart, "navigate_back"),
            (Action::OpenCart, View::Home | View::Product(_)) => self.navigate(View::Cart, "open_cart"),
            (Action::Checkout, View::Cart) if !self.cart.is_empty() => self
                .navigate(View::Checkout, "begin_checkout")
                .payload(json!({ "totalCents": self.total_cents() })),
            (Action::AddToCart(id), View::Home | View::Product(_)) if product(id).is_some() => {
                Reaction::new("add_to_cart")
                    .payload(json!({ "productId": id }))
                    .request(Commit::AddToCart(id))
            }
            (Action::RemoveFromCart(id), View::Cart) => {
                if self.change_quantity(id, i32::MIN) {
                    Reaction::new("remove_from_cart").payload(json!({ "productId": id }))
                } else {
                    Reaction::ignored()
                }
            }
            (Action::ChangeQuantity { product_id, delta }, View::Cart) => {
                if self.change_quantity(product_id, delta) {
                    Reaction::new("change_quantity").payload(json!({
                        "productId": product_id,
                        "quantity": self.quantity_of(product_id),
                    }))
                } else {
                    Reaction::ignored()
                }
            }
            (Action::PlaceOrder, View::Checkout) => Reaction::new("place_order")
                .payload(json!({ "totalCents": self.total_cents(), "items": self.cart_count() }))
                .request(Commit::PlaceOrder),
            (Action::ToggleFavorite(id), _) if product(id).is_some() => {
                let favorite = self.favorites.insert(id);
                if !favorite {
                    self.favorites.remove(&id);
                }
                Reaction::new("toggle_favorite").payload(json!({ "productId": id, "favorite": favorite }))
            }
            _ => Reaction::ignored(),
        }
    }

    fn commit(&mut self, commit: Commit) -> Option<Notification> {
        match commit {
            Commit::AddToCart(id) => {
                let product = product(id)?;
                self.add(id);
                Some(Notification::success(format!("{} agregado al carrito", product.name)))
            }
            Commit::PlaceOrder => {
                if self.view != View::Checkout {
                    return None;
                }
                self.cart.clear();
                self.view = View::Home;
                Some(Notification::success("¡Pedido realizado con éxito!"))
            }
        }
    }

    fn render(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let header = PreviewNode::surface(
            palette.primary,
            vec![PreviewNode::row(vec![
                PreviewNode::image("logo", config.logo.as_deref(), Icon::Cart, 28.0),
                PreviewNode::heading(&config.app_name, palette.on_primary),
                PreviewNode::icon_button(Icon::Cart, format!("{}", self.cart_count()), shop(Action::OpenCart))
                    .enabled(matches!(self.view, View::Home | View::Product(_))),
            ])],
        );

        let body = match self.view {
            View::Home => self.render_home(config, palette),
            View::Product(id) => self.render_product(id, config, palette),
            View::Cart => self.render_cart(palette),
            View::Checkout => self.render_checkout(palette),
        };

        PreviewNode::column(vec![header, body])
    }
}

fn shop(action: Action) -> PreviewAction {
    PreviewAction::Ecommerce(action)
}

impl EcommerceScreen {
    fn render_home(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let mut children = vec![
            PreviewNode::image("banner", config.custom_image("banner"), Icon::Image, 120.0),
            PreviewNode::heading("Productos destacados", palette.text),
        ];
        for chunk in CATALOG.chunks(2) {
            let cards = chunk.iter().map(|p| self.product_card(p, config, palette)).collect();
            children.push(PreviewNode::row(cards));
        }
        PreviewNode::column(children)
    }

    fn product_card(&self, p: &Product, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let heart = if self.is_favorite(p.id) { "Favorito" } else { "Me gusta" };
        PreviewNode::surface(
            palette.surface,
            vec![
                product_image(p, config, 80.0),
                PreviewNode::button(p.name, shop(Action::OpenProduct(p.id)), ButtonStyle::Ghost),
                PreviewNode::accent(format_price(p.price_cents)),
                PreviewNode::row(vec![
                    PreviewNode::icon_button(Icon::Heart, heart, shop(Action::ToggleFavorite(p.id))),
                    PreviewNode::button("Agregar", shop(Action::AddToCart(p.id)), ButtonStyle::Filled(palette.primary)),
                ]),
            ],
        )
    }

    fn render_product(&self, id: u32, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let Some(p) = product(id) else {
            return PreviewNode::muted("Producto no disponible");
        };
        PreviewNode::column(vec![
            PreviewNode::icon_button(Icon::Back, "Volver", shop(Action::Back)),
            product_image(p, config, 180.0),
            PreviewNode::heading(p.name, palette.text),
            PreviewNode::row(vec![
                PreviewNode::tinted_icon(Icon::Star, palette.secondary),
                PreviewNode::muted(format!("{:.1}", p.rating)),
            ]),
            PreviewNode::text(p.description),
            PreviewNode::strong(format_price(p.price_cents)),
            PreviewNode::button(
                "Agregar al carrito",
                shop(Action::AddToCart(p.id)),
                ButtonStyle::Filled(palette.primary),
            ),
        ])
    }

    fn render_cart(&self, palette: &Palette) -> PreviewNode {
        let mut children = vec![
            PreviewNode::icon_button(Icon::Back, "Seguir comprando", shop(Action::Back)),
            PreviewNode::heading("Carrito", palette.text),
        ];
        if self.cart.is_empty() {
            children.push(PreviewNode::muted("Tu carrito está vacío"));
        }
        for line in &self.cart {
            let Some(p) = product(line.product_id) else { continue };
            children.push(PreviewNode::row(vec![
                PreviewNode::text(p.name),
                PreviewNode::button(
                    "-",
                    shop(Action::ChangeQuantity { product_id: p.id, delta: -1 }),
                    ButtonStyle::Outline(palette.primary),
                ),
                PreviewNode::strong(line.quantity.to_string()),
                PreviewNode::button(
                    "+",
                    shop(Action::ChangeQuantity { product_id: p.id, delta: 1 }),
                    ButtonStyle::Outline(palette.primary),
                ),
                PreviewNode::muted(format_price(p.price_cents * u64::from(line.quantity))),
                PreviewNode::icon_button(Icon::Trash, "Quitar", shop(Action::RemoveFromCart(p.id))),
            ]));
        }
        children.push(PreviewNode::Divider);
        children.push(PreviewNode::strong(format!("Total: {}", format_price(self.total_cents()))));
        children.push(
            PreviewNode::button("Proceder al pago", shop(Action::Checkout), ButtonStyle::Filled(palette.primary))
                .enabled(!self.cart.is_empty()),
        );
        PreviewNode::column(children)
    }

    fn render_checkout(&self, palette: &Palette) -> PreviewNode {
        PreviewNode::column(vec![
            PreviewNode::icon_button(Icon::Back, "Volver al carrito", shop(Action::Back)),
            PreviewNode::heading("Checkout", palette.text),
            PreviewNode::muted(format!("{} artículos", self.cart_count())),
            PreviewNode::strong(format!("Total: {}", format_price(self.total_cents()))),
            PreviewNode::muted("Pago simulado, no se realizará ningún cargo"),
            PreviewNode::button("Confirmar pedido", shop(Action::PlaceOrder), ButtonStyle::Filled(palette.secondary)),
        ])
    }
}

fn product_image(p: &Product, config: &SimulatorConfig, height: f32) -> PreviewNode {
    match p.image_slot {
        Some(slot) => PreviewNode::image(slot, config.custom_image(slot), Icon::Image, height),
        None => PreviewNode::image(format!("product{}", p.id), None, Icon::Image, height),
    }
}
