use actix_web::error::ErrorUnauthorized;
use actix_web::{dev, Error, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};

/// Identity carried by the bearer token. Required as-is for routes that
/// demand authentication; `Option<UserInfo>` in a handler signature keeps
/// the route reachable anonymously.
pub struct UserInfo {
    pub id: i32,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<UserInfo, Error>>;
    type Config = ();

    fn from_request(req: &HttpRequest, _payload: &mut dev::Payload) -> Self::Future {
        let header = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
        {
            Some(header) => header,
            None => return err(ErrorUnauthorized("authentication required")),
        };
        let token = match header.strip_prefix("Bearer") {
            Some(token) => token.trim(),
            None => return err(ErrorUnauthorized("authentication required")),
        };
        match crate::auth::decode(token) {
            Ok(decoded) => ok(UserInfo {
                id: decoded.claims.sub,
            }),
            Err(_e) => err(ErrorUnauthorized("invalid token")),
        }
    }
}
