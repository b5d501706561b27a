use super::{redirect, Response, TokenForm};
use crate::csrf;
use crate::error::AppError;
use crate::extractors::{DbConnection, UserInfo};
use crate::models::{Article, ArticleDraft, Comment, User};
use crate::policy::{self, ActorContext};
use crate::uploads;
use actix_web::{get, post, web, HttpResponse};
use actix_web_validator::ValidatedJson;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct ArticleForm {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 500))]
    pub lead: String,
    #[validate(length(min = 1, max = 100000))]
    pub body: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub image: Option<ImageUpload>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ImageUpload {
    pub filename: String,
    /// Base64-encoded file content.
    pub data: String,
}

/// Decodes, validates and stores an uploaded image, returning the filename
/// to persist. A failed move is logged and reported as "no image"; the
/// already-validated article is saved without it.
fn process_image(upload: &ImageUpload) -> Result<Option<String>, AppError> {
    let bytes = base64::decode(&upload.data)
        .map_err(|_| AppError::Validation("image payload is not valid base64".to_owned()))?;
    let kind = uploads::validate(&bytes)?;
    let filename = uploads::unique_filename(&upload.filename, kind);
    match uploads::store(&uploads::images_directory(), &filename, &bytes) {
        Ok(()) => Ok(Some(filename)),
        Err(e) => {
            log::warn!("could not store uploaded image {}: {}", filename, e);
            Ok(None)
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CommentView {
    pub id: i32,
    pub body: String,
    pub published_at: NaiveDateTime,
    pub author: String,
    /// Token for this comment's own delete form.
    pub delete_token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ArticleShowResponse {
    pub article: Article,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub like_count: i64,
    /// Tokens for the mutating forms this view renders.
    pub delete_token: String,
    pub toggle_publish_token: String,
}

#[get("/article/show/{id}")]
pub async fn show(path: web::Path<(i32,)>, conn: DbConnection) -> Result<HttpResponse, AppError> {
    let article = Article::find(&conn, path.0.0)?.ok_or(AppError::NotFound)?;
    let author = article.get_author(&conn)?;
    let mut comments = Vec::new();
    for (comment, user) in Comment::list_with_authors(&conn, &article)? {
        comments.push(CommentView {
            id: comment.id,
            delete_token: csrf::token(csrf::DELETE_COMMENT, comment.id)?,
            body: comment.body,
            published_at: comment.published_at,
            author: user.pseudo,
        });
    }
    let like_count = article.like_count(&conn)?;
    let resp = ArticleShowResponse {
        delete_token: csrf::token(csrf::DELETE_ARTICLE, article.id)?,
        toggle_publish_token: csrf::token(csrf::TOGGLE_PUBLISH, article.id)?,
        author: author.pseudo,
        comments,
        like_count,
        article,
    };
    Ok(HttpResponse::Ok().json(Response::ok(resp)))
}

/// Blank form for the create view.
#[get("/article/new")]
pub async fn new_form(_user: UserInfo) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(Response::ok(ArticleForm::default())))
}

#[post("/article/new")]
pub async fn create(
    user: UserInfo,
    conn: DbConnection,
    form: ValidatedJson<ArticleForm>,
) -> Result<HttpResponse, AppError> {
    let author = User::find(&conn, user.id)?.ok_or(AppError::Unauthenticated)?;
    let image_name = match &form.image {
        Some(upload) => process_image(upload)?,
        None => None,
    };
    Article::create(
        &conn,
        &ArticleDraft {
            title: &form.title,
            lead: &form.lead,
            body: &form.body,
            category: &form.category,
            image: image_name.as_deref(),
        },
        author.id,
    )?;
    Ok(redirect("/"))
}

/// Form pre-filled with the stored field values.
#[get("/article/{id}/edit")]
pub async fn edit_form(
    _user: UserInfo,
    conn: DbConnection,
    path: web::Path<(i32,)>,
) -> Result<HttpResponse, AppError> {
    let article = Article::find(&conn, path.0.0)?.ok_or(AppError::NotFound)?;
    let form = ArticleForm {
        title: article.title,
        lead: article.lead,
        body: article.body,
        category: article.category,
        image: None,
    };
    Ok(HttpResponse::Ok().json(Response::ok(form)))
}

// Any authenticated user may edit; there is deliberately no ownership check
// on this route.
#[post("/article/{id}/edit")]
pub async fn edit(
    _user: UserInfo,
    conn: DbConnection,
    path: web::Path<(i32,)>,
    form: ValidatedJson<ArticleForm>,
) -> Result<HttpResponse, AppError> {
    let article = Article::find(&conn, path.0.0)?.ok_or(AppError::NotFound)?;
    let image_name = match &form.image {
        Some(upload) => process_image(upload)?,
        None => None,
    };
    article.update(
        &conn,
        &ArticleDraft {
            title: &form.title,
            lead: &form.lead,
            body: &form.body,
            category: &form.category,
            image: image_name.as_deref(),
        },
    )?;
    Ok(redirect(&format!("/article/show/{}", article.id)))
}

#[post("/article/{id}/delete")]
pub async fn delete(
    user: UserInfo,
    conn: DbConnection,
    path: web::Path<(i32,)>,
    form: web::Json<TokenForm>,
) -> Result<HttpResponse, AppError> {
    let article = Article::find(&conn, path.0.0)?.ok_or(AppError::NotFound)?;
    let me = User::find(&conn, user.id)?.ok_or(AppError::Unauthenticated)?;
    let actor = ActorContext::load(&conn, &me)?;
    policy::can_delete_article(&actor, article.author_id)?;
    // a missing or invalid token skips the deletion but still redirects
    if form.authorizes(csrf::DELETE_ARTICLE, article.id)? {
        article.delete(&conn)?;
    }
    Ok(redirect("/"))
}

#[post("/article/{id}/toggle-publish")]
pub async fn toggle_publish(
    user: Option<UserInfo>,
    conn: DbConnection,
    path: web::Path<(i32,)>,
    form: web::Json<TokenForm>,
) -> Result<HttpResponse, AppError> {
    if user.is_none() {
        return Ok(redirect("/login"));
    }
    let article = Article::find(&conn, path.0.0)?.ok_or(AppError::NotFound)?;
    if form.authorizes(csrf::TOGGLE_PUBLISH, article.id)? {
        article.toggle_publish(&conn)?;
    }
    Ok(redirect("/"))
}

#[get("/article/{id}/like")]
pub async fn like(
    user: Option<UserInfo>,
    conn: DbConnection,
    path: web::Path<(i32,)>,
) -> Result<HttpResponse, AppError> {
    let user = match user {
        Some(user) => user,
        None => return Ok(redirect("/login")),
    };
    let article = Article::find(&conn, path.0.0)?.ok_or(AppError::NotFound)?;
    if article.is_liked_by(&conn, user.id)? {
        article.remove_like(&conn, user.id)?;
    } else {
        article.add_like(&conn, user.id)?;
    }
    Ok(redirect(&format!("/article/show/{}", article.id)))
}

/// The connected user's own articles, drafts included.
#[get("/dashboard")]
pub async fn dashboard(user: UserInfo, conn: DbConnection) -> Result<HttpResponse, AppError> {
    let articles = Article::list_by_author(&conn, user.id)?;
    Ok(HttpResponse::Ok().json(Response::ok(articles)))
}
