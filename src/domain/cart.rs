use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::ProductView;

/// Well-known session key the serialized cart lives under.
pub const CART_SESSION_KEY: &str = "cart";

/// One pending selection. `price` and `title` are snapshots taken when the
/// product was first added; only `quantity` mutates afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub quantity: i32,
    pub price: BigDecimal,
    pub title: String,
}

impl CartEntry {
    pub fn total_price(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

/// Session-scoped collection of pending selections, keyed by product id.
///
/// Serializes to the session store as a mapping of product-id-string to
/// `{quantity, price, title}` with the price as a decimal string, never a
/// float.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: BTreeMap<Uuid, CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `product`, snapshotting its current price and title
    /// on first sight. With `update` the quantity is set rather than
    /// incremented.
    pub fn add(&mut self, product: &ProductView, quantity: i32, update: bool) {
        let entry = self.entries.entry(product.id).or_insert_with(|| CartEntry {
            quantity: 0,
            price: product.price.clone(),
            title: product.title.clone(),
        });
        if update {
            entry.quantity = quantity;
        } else {
            // Saturate rather than overflow; absurd totals are rejected by the
            // inventory check at checkout anyway.
            entry.quantity = entry.quantity.saturating_add(quantity);
        }
    }

    /// Drop the entry for `product_id`. Absent entries are a no-op, not an
    /// error.
    pub fn remove(&mut self, product_id: Uuid) {
        self.entries.remove(&product_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, product_id: Uuid) -> Option<&CartEntry> {
        self.entries.get(&product_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Uuid, &CartEntry)> {
        self.entries.iter()
    }

    /// Total quantity across all entries, not the number of entries.
    pub fn len(&self) -> i64 {
        self.entries.values().map(|e| i64::from(e.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of `price × quantity` across entries, in decimal arithmetic.
    pub fn total_price(&self) -> BigDecimal {
        self.entries.values().map(CartEntry::total_price).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product(title: &str, price: &str) -> ProductView {
        ProductView {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            description: String::new(),
            price: BigDecimal::from_str(price).unwrap(),
            inventory: 10,
            is_active: true,
        }
    }

    #[test]
    fn adding_same_product_twice_accumulates() {
        let p = product("Django for Beginners", "500.00");
        let mut cart = Cart::new();
        cart.add(&p, 2, false);
        cart.add(&p, 3, false);
        assert_eq!(cart.get(p.id).unwrap().quantity, 5);
        assert_eq!(cart.len(), 5);
    }

    #[test]
    fn adding_with_update_replaces_quantity() {
        let p = product("Django for Beginners", "500.00");
        let mut cart = Cart::new();
        cart.add(&p, 2, false);
        cart.add(&p, 7, true);
        assert_eq!(cart.get(p.id).unwrap().quantity, 7);
    }

    #[test]
    fn quantity_saturates_instead_of_overflowing() {
        let p = product("A", "1.00");
        let mut cart = Cart::new();
        cart.add(&p, i32::MAX, false);
        cart.add(&p, 1, false);
        assert_eq!(cart.get(p.id).unwrap().quantity, i32::MAX);
        assert!(cart.get(p.id).unwrap().quantity >= 1);
    }

    #[test]
    fn len_is_total_quantity_not_entry_count() {
        let a = product("A", "1.00");
        let b = product("B", "2.00");
        let mut cart = Cart::new();
        cart.add(&a, 2, false);
        cart.add(&b, 1, false);
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn remove_deletes_entry_and_is_noop_when_absent() {
        let p = product("A", "1.00");
        let mut cart = Cart::new();
        cart.add(&p, 2, false);
        cart.remove(p.id);
        assert!(cart.get(p.id).is_none());
        assert!(cart.is_empty());

        // Removing again is silently ignored.
        cart.remove(p.id);
        assert!(cart.is_empty());
    }

    #[test]
    fn no_entry_survives_with_nonpositive_quantity_after_removal() {
        let p = product("A", "1.00");
        let mut cart = Cart::new();
        cart.add(&p, 1, false);
        cart.remove(p.id);
        assert!(cart.entries().all(|(_, e)| e.quantity >= 1));
        assert_eq!(cart.len(), 0);
    }

    #[test]
    fn total_price_uses_decimal_arithmetic() {
        let a = product("A", "10.00");
        let b = product("B", "25.00");
        let mut cart = Cart::new();
        cart.add(&a, 2, false);
        cart.add(&b, 1, false);
        assert_eq!(cart.total_price(), BigDecimal::from_str("45.00").unwrap());
    }

    #[test]
    fn price_is_snapshotted_at_add_time() {
        let mut p = product("A", "10.00");
        let mut cart = Cart::new();
        cart.add(&p, 1, false);

        // A later catalog price change must not affect the existing entry.
        p.price = BigDecimal::from_str("99.00").unwrap();
        cart.add(&p, 1, false);
        assert_eq!(
            cart.get(p.id).unwrap().price,
            BigDecimal::from_str("10.00").unwrap()
        );
    }

    #[test]
    fn serializes_as_string_keyed_map_with_string_prices() {
        let p = product("A", "10.50");
        let mut cart = Cart::new();
        cart.add(&p, 2, false);

        let value = serde_json::to_value(&cart).unwrap();
        let entry = value
            .as_object()
            .unwrap()
            .get(&p.id.to_string())
            .expect("keyed by product id string");
        assert_eq!(entry["quantity"], 2);
        assert_eq!(entry["price"], "10.50");
        assert_eq!(entry["title"], "A");

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}
