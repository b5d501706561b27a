use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use dotenv::dotenv;
use std::env;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub fn create_connection_pool() -> DbPool {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create pool.")
}

/// Pool variant that reports an unreachable database instead of panicking.
/// Tests use it to skip themselves when no database is configured.
pub fn try_create_connection_pool() -> Option<DbPool> {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL").ok()?;
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder().build(manager).ok()
}

pub fn create_connection() -> PgConnection {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgConnection::establish(&database_url).expect("Failed to connect to database")
}

/// See [`try_create_connection_pool`].
pub fn try_create_connection() -> Option<PgConnection> {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL").ok()?;
    PgConnection::establish(&database_url).ok()
}
