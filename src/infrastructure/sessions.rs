use chrono::Utc;
use diesel::prelude::*;
use serde_json::Value;

use crate::db::DbPool;
use crate::domain::cart::{Cart, CART_SESSION_KEY};
use crate::domain::errors::DomainError;
use crate::domain::ports::SessionCarts;
use crate::schema::sessions;

/// Diesel-backed `SessionCarts`: one row per session cookie, with the
/// serialized cart inside the JSONB document under its well-known key.
/// Carts survive restarts and are shared across replicas.
pub struct DieselSessions {
    pool: DbPool,
}

impl DieselSessions {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn session_doc(cart: &Cart) -> Result<Value, DomainError> {
    let value = serde_json::to_value(cart)
        .map_err(|e| DomainError::Internal(format!("Cart serialization failed: {e}")))?;
    Ok(serde_json::json!({ CART_SESSION_KEY: value }))
}

fn cart_from_doc(doc: Option<Value>) -> Result<Cart, DomainError> {
    match doc.and_then(|mut v| v.get_mut(CART_SESSION_KEY).map(Value::take)) {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| DomainError::Internal(format!("Corrupt session cart: {e}"))),
        None => Ok(Cart::new()),
    }
}

impl SessionCarts for DieselSessions {
    fn load(&self, session_id: &str) -> Result<Cart, DomainError> {
        let mut conn = self.pool.get()?;
        let doc = sessions::table
            .find(session_id)
            .select(sessions::data)
            .first::<Value>(&mut conn)
            .optional()?;
        cart_from_doc(doc)
    }

    fn save(&self, session_id: &str, cart: &Cart) -> Result<(), DomainError> {
        let doc = session_doc(cart)?;
        let mut conn = self.pool.get()?;
        diesel::insert_into(sessions::table)
            .values((sessions::id.eq(session_id), sessions::data.eq(doc.clone())))
            .on_conflict(sessions::id)
            .do_update()
            .set((sessions::data.eq(doc), sessions::updated_at.eq(Utc::now())))
            .execute(&mut conn)?;
        Ok(())
    }
}
