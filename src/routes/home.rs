use super::Response;
use crate::error::AppError;
use crate::extractors::DbConnection;
use crate::models::Article;
use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ArticleList {
    pub articles: Vec<Article>,
    pub search: Option<String>,
}

/// Home listing. Without a keyword every published article is shown, newest
/// first; with one, the keyword search runs instead (and that search does
/// not hide drafts).
#[get("/")]
pub async fn home(
    query: web::Query<SearchQuery>,
    conn: DbConnection,
) -> Result<HttpResponse, AppError> {
    let articles = match query.q.as_deref() {
        Some(q) if !q.is_empty() => Article::search(&conn, q)?,
        _ => Article::list_published(&conn)?,
    };
    Ok(HttpResponse::Ok().json(Response::ok(ArticleList {
        articles,
        search: query.into_inner().q,
    })))
}

/// Dedicated search endpoint. Unlike the home listing, an absent or empty
/// keyword yields an empty result set, not "everything published".
#[get("/recherche")]
pub async fn search(
    query: web::Query<SearchQuery>,
    conn: DbConnection,
) -> Result<HttpResponse, AppError> {
    let articles = match query.q.as_deref() {
        Some(q) if !q.is_empty() => Article::search(&conn, q)?,
        _ => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(Response::ok(ArticleList {
        articles,
        search: query.into_inner().q,
    })))
}
