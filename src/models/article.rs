use crate::models::User;
use crate::schema::{article_likes, articles, comments, users};
use anyhow::Result;
use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Category value marking an article as an unpublished draft.
pub const DRAFT_CATEGORY: &str = "brouillon";
/// Category an article flips to when it leaves the draft state.
pub const PUBLIC_CATEGORY: &str = "public";

#[derive(Serialize, Deserialize, Queryable, Identifiable, Debug)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub lead: String,
    pub body: String,
    pub category: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub author_id: i32,
}

/// Field set a handler has bound and validated, ready to persist.
#[derive(Debug)]
pub struct ArticleDraft<'a> {
    pub title: &'a str,
    pub lead: &'a str,
    pub body: &'a str,
    pub category: &'a str,
    pub image: Option<&'a str>,
}

#[derive(Insertable)]
#[table_name = "articles"]
struct NewArticle<'a> {
    title: &'a str,
    lead: &'a str,
    body: &'a str,
    category: &'a str,
    image: Option<&'a str>,
    created_at: NaiveDateTime,
    author_id: i32,
}

#[derive(AsChangeset)]
#[table_name = "articles"]
struct ArticleChanges<'a> {
    title: &'a str,
    lead: &'a str,
    body: &'a str,
    category: &'a str,
    // None keeps the stored image untouched
    image: Option<&'a str>,
    updated_at: NaiveDateTime,
}

impl Article {
    pub fn find(conn: &PgConnection, article_id: i32) -> Result<Option<Article>> {
        let article = articles::table
            .find(article_id)
            .first::<Article>(conn)
            .optional()?;
        Ok(article)
    }

    /// Home listing: drafts are excluded, newest first.
    pub fn list_published(conn: &PgConnection) -> Result<Vec<Article>> {
        let list = articles::table
            .filter(articles::category.ne(DRAFT_CATEGORY))
            .order(articles::created_at.desc())
            .load::<Article>(conn)?;
        Ok(list)
    }

    /// Case-insensitive substring search over title, category and author
    /// pseudo. Drafts are NOT filtered out here; hiding them is the home
    /// listing's job only.
    pub fn search(conn: &PgConnection, keyword: &str) -> Result<Vec<Article>> {
        let pattern = format!("%{}%", keyword.to_lowercase());
        let list = articles::table
            .inner_join(users::table)
            .filter(
                articles::title
                    .ilike(&pattern)
                    .or(articles::category.ilike(&pattern))
                    .or(users::pseudo.ilike(&pattern)),
            )
            .order(articles::created_at.desc())
            .select(articles::all_columns)
            .load::<Article>(conn)?;
        Ok(list)
    }

    /// Every article by the author, drafts included.
    pub fn list_by_author(conn: &PgConnection, author_id: i32) -> Result<Vec<Article>> {
        let list = articles::table
            .filter(articles::author_id.eq(author_id))
            .load::<Article>(conn)?;
        Ok(list)
    }

    pub fn create(conn: &PgConnection, draft: &ArticleDraft, author_id: i32) -> Result<Article> {
        let new_article = NewArticle {
            title: draft.title,
            lead: draft.lead,
            body: draft.body,
            category: draft.category,
            image: draft.image,
            created_at: Utc::now().naive_utc(),
            author_id,
        };
        let article = diesel::insert_into(articles::table)
            .values(new_article)
            .get_result(conn)?;
        Ok(article)
    }

    /// Applies the bound fields and stamps `updated_at`.
    pub fn update(&self, conn: &PgConnection, draft: &ArticleDraft) -> Result<Article> {
        let updated = diesel::update(self)
            .set(ArticleChanges {
                title: draft.title,
                lead: draft.lead,
                body: draft.body,
                category: draft.category,
                image: draft.image,
                updated_at: Utc::now().naive_utc(),
            })
            .get_result::<Article>(conn)?;
        Ok(updated)
    }

    /// Drafts become public, anything else becomes a draft.
    pub fn toggle_publish(&self, conn: &PgConnection) -> Result<Article> {
        let next = if self.category == DRAFT_CATEGORY {
            PUBLIC_CATEGORY
        } else {
            DRAFT_CATEGORY
        };
        let updated = diesel::update(self)
            .set(articles::category.eq(next))
            .get_result::<Article>(conn)?;
        Ok(updated)
    }

    /// Removes the article together with its comments and like memberships.
    pub fn delete(&self, conn: &PgConnection) -> Result<()> {
        diesel::delete(comments::table.filter(comments::article_id.eq(self.id))).execute(conn)?;
        diesel::delete(article_likes::table.filter(article_likes::article_id.eq(self.id)))
            .execute(conn)?;
        diesel::delete(self).execute(conn)?;
        Ok(())
    }

    pub fn get_author(&self, conn: &PgConnection) -> Result<User> {
        let user = users::table
            .find(self.author_id)
            .get_result::<User>(conn)?;
        Ok(user)
    }
}
