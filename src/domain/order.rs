use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Order lifecycle. Orders are created `New`; later transitions (fulfilment,
/// cancellation) happen through operational tooling, not checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    New,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(OrderStatus::New),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// Who placed the order: an authenticated user, or a guest identified by the
/// name and email captured from the shipping form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Customer {
    Registered(Uuid),
    Guest { name: String, email: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingInfo {
    pub name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Everything the order store needs to create an order header.
#[derive(Debug, Clone)]
pub struct NewOrderInput {
    pub customer: Customer,
    pub shipping: ShippingInfo,
}

/// One line to be committed during checkout: the cart's price snapshot plus
/// the requested quantity.
#[derive(Debug, Clone)]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl OrderItemView {
    pub fn total_price(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub customer: Customer,
    pub shipping: ShippingInfo,
    pub paid: bool,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    /// Sum of `unit_price × quantity` over all items, in decimal arithmetic.
    pub fn total_amount(&self) -> BigDecimal {
        self.items.iter().map(OrderItemView::total_price).sum()
    }
}

#[derive(Debug, Clone)]
pub struct OrderList {
    pub items: Vec<OrderView>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for s in ["new", "processing", "shipped", "completed", "cancelled"] {
            assert_eq!(OrderStatus::parse(s).expect("known status").as_str(), s);
        }
        assert!(OrderStatus::parse("refunded").is_none());
    }

    #[test]
    fn total_amount_sums_lines_in_decimal() {
        let order = OrderView {
            id: Uuid::new_v4(),
            customer: Customer::Guest {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            shipping: ShippingInfo {
                name: "Ada".to_string(),
                address1: "1 Main St".to_string(),
                address2: String::new(),
                city: "Manila".to_string(),
                postal_code: "1000".to_string(),
                country: "Philippines".to_string(),
            },
            paid: false,
            status: OrderStatus::New,
            created_at: Utc::now(),
            items: vec![
                OrderItemView {
                    id: Uuid::new_v4(),
                    product_id: Uuid::new_v4(),
                    quantity: 2,
                    unit_price: BigDecimal::from_str("10.00").unwrap(),
                },
                OrderItemView {
                    id: Uuid::new_v4(),
                    product_id: Uuid::new_v4(),
                    quantity: 1,
                    unit_price: BigDecimal::from_str("25.00").unwrap(),
                },
            ],
        };
        assert_eq!(order.total_amount(), BigDecimal::from_str("45.00").unwrap());
    }
}
