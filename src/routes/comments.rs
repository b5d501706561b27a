use super::{redirect, TokenForm};
use crate::csrf;
use crate::error::AppError;
use crate::extractors::{DbConnection, UserInfo};
use crate::models::{Article, Comment, User};
use crate::policy::{self, ActorContext};
use actix_web::{post, web, HttpResponse};
use actix_web_validator::ValidatedJson;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct CommentForm {
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}

/// Posting on the article view adds a comment and returns to it.
#[post("/article/show/{id}")]
pub async fn post_comment(
    user: UserInfo,
    conn: DbConnection,
    path: web::Path<(i32,)>,
    form: ValidatedJson<CommentForm>,
) -> Result<HttpResponse, AppError> {
    let article = Article::find(&conn, path.0.0)?.ok_or(AppError::NotFound)?;
    let author = User::find(&conn, user.id)?.ok_or(AppError::Unauthenticated)?;
    Comment::create(&conn, &article, &author, &form.body)?;
    Ok(redirect(&format!("/article/show/{}", article.id)))
}

#[post("/commentaire/{id}/delete")]
pub async fn delete_comment(
    user: UserInfo,
    conn: DbConnection,
    path: web::Path<(i32,)>,
    form: web::Json<TokenForm>,
) -> Result<HttpResponse, AppError> {
    let comment = Comment::find(&conn, path.0.0)?.ok_or(AppError::NotFound)?;
    let me = User::find(&conn, user.id)?.ok_or(AppError::Unauthenticated)?;
    let actor = ActorContext::load(&conn, &me)?;
    policy::can_delete_comment(&actor, comment.author_id)?;
    let article_id = comment.article_id;
    // a missing or invalid token skips the deletion but still redirects
    if form.authorizes(csrf::DELETE_COMMENT, comment.id)? {
        comment.delete(&conn)?;
    }
    Ok(redirect(&format!("/article/show/{}", article_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{ArticleDraft, PUBLIC_CATEGORY};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use diesel::prelude::*;

    fn set_secrets() {
        std::env::set_var("JWT_SECRET", "carnet-test-jwt-secret");
        std::env::set_var("CSRF_SECRET", "carnet-test-csrf-secret");
    }

    fn bearer(user_id: i32) -> String {
        format!("Bearer {}", crate::auth::issue_access_token(user_id))
    }

    #[actix_rt::test]
    async fn only_the_author_deletes_their_comment() {
        set_secrets();
        let pool = match db::try_create_connection_pool() {
            Some(pool) => pool,
            None => return,
        };
        let conn = db::create_connection();
        let author = User::create(
            &conn,
            &format!("auteur-{}", uuid::Uuid::new_v4().simple()),
            "hash",
        )
        .expect("must be created");
        let commenter = User::create(
            &conn,
            &format!("lectrice-{}", uuid::Uuid::new_v4().simple()),
            "hash",
        )
        .expect("must be created");
        let article = Article::create(
            &conn,
            &ArticleDraft {
                title: "Avec commentaire",
                lead: "L",
                body: "B",
                category: PUBLIC_CATEGORY,
                image: None,
            },
            author.id,
        )
        .expect("must be created");
        let comment =
            Comment::create(&conn, &article, &commenter, "à supprimer").expect("must post");

        let mut app =
            test::init_service(App::new().data(pool.clone()).service(delete_comment)).await;
        let form = TokenForm {
            token: Some(
                crate::csrf::token(crate::csrf::DELETE_COMMENT, comment.id)
                    .expect("token must be computed"),
            ),
        };

        // the article's author is not the comment's author: denied
        let req = test::TestRequest::post()
            .uri(&format!("/commentaire/{}/delete", comment.id))
            .header("Authorization", bearer(author.id))
            .set_json(&form)
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(Comment::find(&conn, comment.id)
            .expect("lookup must succeed")
            .is_some());

        // its own author succeeds with the same token
        let req = test::TestRequest::post()
            .uri(&format!("/commentaire/{}/delete", comment.id))
            .header("Authorization", bearer(commenter.id))
            .set_json(&form)
            .to_request();
        let resp = test::call_service(&mut app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert!(Comment::find(&conn, comment.id)
            .expect("lookup must succeed")
            .is_none());

        article.delete(&conn).expect("cleanup");
        diesel::delete(&author).execute(&conn).expect("cleanup");
        diesel::delete(&commenter).execute(&conn).expect("cleanup");
    }
}
