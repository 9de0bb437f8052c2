pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sid";

/// Session identity for the request: the `sid` cookie, or a freshly minted id
/// that the response will set.
pub struct SessionId {
    pub value: String,
    fresh: bool,
}

pub fn session_id(req: &HttpRequest) -> SessionId {
    match req.cookie(SESSION_COOKIE) {
        Some(cookie) => SessionId {
            value: cookie.value().to_string(),
            fresh: false,
        },
        None => SessionId {
            value: Uuid::new_v4().to_string(),
            fresh: true,
        },
    }
}

/// JSON response that also sets the session cookie when the id is new.
pub(crate) fn json_with_session<T: serde::Serialize>(
    sid: &SessionId,
    status: StatusCode,
    body: &T,
) -> HttpResponse {
    let mut builder = HttpResponseBuilder::new(status);
    if sid.fresh {
        builder.cookie(
            Cookie::build(SESSION_COOKIE, sid.value.clone())
                .path("/")
                .http_only(true)
                .finish(),
        );
    }
    builder.json(body)
}
