use crate::models::{Article, User};
use crate::schema::{comments, users};
use anyhow::Result;
use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A comment always belongs to exactly one article and one author.
#[derive(Serialize, Deserialize, Queryable, Identifiable, Associations, Debug)]
#[belongs_to(Article)]
#[belongs_to(User, foreign_key = "author_id")]
pub struct Comment {
    pub id: i32,
    pub body: String,
    pub published_at: NaiveDateTime,
    pub author_id: i32,
    pub article_id: i32,
}

#[derive(Insertable)]
#[table_name = "comments"]
struct NewComment<'a> {
    body: &'a str,
    published_at: NaiveDateTime,
    author_id: i32,
    article_id: i32,
}

impl Comment {
    pub fn find(conn: &PgConnection, comment_id: i32) -> Result<Option<Comment>> {
        let comment = comments::table
            .find(comment_id)
            .first::<Comment>(conn)
            .optional()?;
        Ok(comment)
    }

    pub fn create(
        conn: &PgConnection,
        article: &Article,
        author: &User,
        body: &str,
    ) -> Result<Comment> {
        let new_comment = NewComment {
            body,
            published_at: Utc::now().naive_utc(),
            author_id: author.id,
            article_id: article.id,
        };
        let comment = diesel::insert_into(comments::table)
            .values(new_comment)
            .get_result(conn)?;
        Ok(comment)
    }

    /// Comments of one article, oldest first, with their authors joined in.
    pub fn list_with_authors(
        conn: &PgConnection,
        article: &Article,
    ) -> Result<Vec<(Comment, User)>> {
        let list = comments::table
            .inner_join(users::table)
            .filter(comments::article_id.eq(article.id))
            .order(comments::published_at.asc())
            .load::<(Comment, User)>(conn)?;
        Ok(list)
    }

    pub fn delete(&self, conn: &PgConnection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}
