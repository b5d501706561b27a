use super::{redirect, Response};
use crate::auth;
use crate::error::AppError;
use crate::extractors::DbConnection;
use crate::models::User;
use actix_web::{get, post, web, HttpResponse};
use actix_web_validator::ValidatedJson;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64))]
    pub pseudo: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct LoginRequest {
    pub pseudo: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Blank registration form.
#[get("/register")]
pub async fn register_form() -> HttpResponse {
    HttpResponse::Ok().json(Response::ok(RegisterRequest::default()))
}

#[post("/register")]
pub async fn register(
    conn: DbConnection,
    data: ValidatedJson<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    if User::find_by_pseudo(&conn, &data.pseudo)?.is_some() {
        return Err(AppError::Validation(format!(
            "pseudo {} is already taken",
            data.pseudo
        )));
    }
    let password_hash = auth::hash_password(&data.password)?;
    User::create(&conn, &data.pseudo, &password_hash)?;
    Ok(redirect("/login"))
}

/// Blank login form.
#[get("/login")]
pub async fn login_form() -> HttpResponse {
    HttpResponse::Ok().json(Response::ok(LoginRequest::default()))
}

#[post("/login")]
pub async fn login(
    conn: DbConnection,
    data: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = match User::find_by_pseudo(&conn, &data.pseudo)? {
        Some(user) if auth::verify_password(&data.password, &user.password_hash) => user,
        _ => return Err(AppError::Unauthenticated),
    };
    Ok(HttpResponse::Ok().json(Response::ok(LoginResponse {
        access_token: auth::issue_access_token(user.id),
    })))
}

// Bearer tokens are client-held; there is no server-side session to tear
// down.
#[get("/logout")]
pub async fn logout() -> HttpResponse {
    redirect("/")
}
