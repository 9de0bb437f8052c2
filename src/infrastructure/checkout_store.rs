use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{CheckoutLine, Customer, NewOrderInput, OrderList, OrderStatus, OrderView};
use crate::domain::ports::OrderStore;
use crate::schema::{order_items, orders, products};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

/// Diesel-backed order store. `checkout` runs as one Postgres transaction:
/// the inventory decrement is a guarded `UPDATE ... WHERE inventory >= qty`,
/// so two concurrent checkouts can never jointly over-draw a product — the
/// slower one matches zero rows and the whole transaction rolls back.
pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for DieselOrderStore {
    fn checkout(
        &self,
        input: NewOrderInput,
        lines: Vec<CheckoutLine>,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order_id = Uuid::new_v4();
            let (user_id, guest_name, guest_email) = match &input.customer {
                Customer::Registered(id) => (Some(*id), None, None),
                Customer::Guest { name, email } => {
                    (None, Some(name.clone()), Some(email.clone()))
                }
            };
            let row: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id,
                    guest_name,
                    guest_email,
                    shipping_name: input.shipping.name.clone(),
                    shipping_address1: input.shipping.address1.clone(),
                    shipping_address2: input.shipping.address2.clone(),
                    shipping_city: input.shipping.city.clone(),
                    shipping_postal_code: input.shipping.postal_code.clone(),
                    shipping_country: input.shipping.country.clone(),
                    paid: false,
                    status: OrderStatus::New.as_str().to_string(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            let mut item_rows = Vec::with_capacity(lines.len());
            for line in &lines {
                let decremented = diesel::update(
                    products::table
                        .find(line.product_id)
                        .filter(products::inventory.ge(line.quantity)),
                )
                .set(products::inventory.eq(products::inventory - line.quantity))
                .execute(conn)?;

                if decremented == 0 {
                    // Zero rows: either the product is gone or stock ran out.
                    // Returning Err rolls back the order and any earlier
                    // decrements.
                    let current: Option<(String, i32)> = products::table
                        .find(line.product_id)
                        .select((products::title, products::inventory))
                        .first(conn)
                        .optional()?;
                    return Err(match current {
                        Some((title, available)) => DomainError::InsufficientInventory {
                            product_id: line.product_id,
                            title,
                            available,
                        },
                        None => DomainError::NotFound,
                    });
                }

                let item: OrderItemRow = diesel::insert_into(order_items::table)
                    .values(&NewOrderItemRow {
                        id: Uuid::new_v4(),
                        order_id,
                        product_id: line.product_id,
                        unit_price: line.unit_price.clone(),
                        quantity: line.quantity,
                    })
                    .returning(OrderItemRow::as_returning())
                    .get_result(conn)?;
                item_rows.push(item);
            }

            row.into_view(item_rows)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = order_items::table
            .filter(order_items::order_id.eq(order.id))
            .select(OrderItemRow::as_select())
            .load(&mut conn)?;

        order.into_view(items).map(Some)
    }

    fn list(&self, page: i64, limit: i64) -> Result<OrderList, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = orders::table.count().get_result(conn)?;

            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            let items = rows
                .into_iter()
                .map(|row| row.into_view(vec![]))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(OrderList { items, total })
        })
    }
}
