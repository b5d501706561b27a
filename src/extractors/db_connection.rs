use crate::db::DbPool;
use actix_web::error::ErrorInternalServerError;
use actix_web::{dev, web::Data, Error, FromRequest, HttpRequest};
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::PgConnection;
use futures::future::{err, ok, Ready};
use std::ops::Deref;

pub type Conn = PooledConnection<ConnectionManager<PgConnection>>;

/// Checks a pooled connection out for the duration of one request.
pub struct DbConnection {
    pub conn: Conn,
}

impl Deref for DbConnection {
    type Target = Conn;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl FromRequest for DbConnection {
    type Error = Error;
    type Future = Ready<Result<Self, Error>>;
    type Config = ();

    fn from_request(req: &HttpRequest, _payload: &mut dev::Payload) -> Self::Future {
        let pool = match req.app_data::<Data<DbPool>>() {
            Some(pool) => pool,
            None => return err(ErrorInternalServerError("database pool is not configured")),
        };
        match pool.get() {
            Ok(conn) => ok(DbConnection { conn }),
            Err(e) => err(ErrorInternalServerError(e)),
        }
    }
}
