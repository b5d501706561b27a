use actix_web::http::header;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

pub mod articles;
pub mod auth;
pub mod comments;
pub mod home;

#[derive(Serialize, Deserialize, Debug)]
pub struct Response<T> {
    pub status: String,
    pub result: T,
}

impl<T> Response<T> {
    pub fn ok(result: T) -> Self {
        Self {
            status: "OK".to_owned(),
            result,
        }
    }
}

/// Post/redirect/get: successful mutations answer with a redirect instead of
/// a body.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .header(header::LOCATION, location)
        .finish()
}

/// Body of the CSRF-protected POST forms. A missing token is treated exactly
/// like an invalid one.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TokenForm {
    #[serde(rename = "_token")]
    pub token: Option<String>,
}

impl TokenForm {
    pub fn authorizes(&self, action: &str, id: i32) -> anyhow::Result<bool> {
        match self.token.as_deref() {
            Some(t) => crate::csrf::is_valid(t, action, id),
            None => Ok(false),
        }
    }
}
