//! Client-side shopping cart.
//!
//! Lives entirely on the client until checkout, when it becomes the item
//! list of an order. Serializable so callers can persist it between runs.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: u32,
    /// Stock at the time the product was added; display only.
    pub stock_quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Product details needed to put something in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub stock_quantity: u32,
}

/// Line of an order request built from the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Add `quantity` (at least one) of a product; an existing line grows
    /// instead of duplicating.
    pub fn add_item(&mut self, product: CartProduct, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartItem {
            product_id: product.product_id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            quantity,
            stock_quantity: product.stock_quantity,
        });
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Set a line's quantity; never drops below one (use `remove_item` for that).
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity.max(1);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Item list for an order request.
    #[must_use]
    pub fn to_order_items(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|i| OrderLine {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect()
    }
}
