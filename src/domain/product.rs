use bigdecimal::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: BigDecimal,
    pub inventory: i32,
    pub is_active: bool,
}
