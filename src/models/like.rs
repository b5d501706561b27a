use crate::models::{Article, User};
use crate::schema::article_likes;
use anyhow::Result;
use diesel::prelude::*;
use serde::Serialize;

/// One membership row of the "liked by" set. No payload.
#[derive(Serialize, Associations, Identifiable, Insertable, Queryable, Debug)]
#[table_name = "article_likes"]
#[primary_key(article_id, user_id)]
#[belongs_to(Article)]
#[belongs_to(User)]
pub struct ArticleLike {
    pub article_id: i32,
    pub user_id: i32,
}

/// Membership operations over the like set. Set semantics throughout:
/// duplicate inserts and absent removals are no-ops.
impl Article {
    pub fn is_liked_by(&self, conn: &PgConnection, user_id: i32) -> Result<bool> {
        let like = article_likes::table
            .find((self.id, user_id))
            .get_result::<ArticleLike>(conn)
            .optional()?;
        Ok(like.is_some())
    }

    pub fn add_like(&self, conn: &PgConnection, user_id: i32) -> Result<()> {
        diesel::insert_into(article_likes::table)
            .values(ArticleLike {
                article_id: self.id,
                user_id,
            })
            .on_conflict_do_nothing()
            .execute(conn)?;
        Ok(())
    }

    pub fn remove_like(&self, conn: &PgConnection, user_id: i32) -> Result<()> {
        diesel::delete(article_likes::table.find((self.id, user_id))).execute(conn)?;
        Ok(())
    }

    pub fn like_count(&self, conn: &PgConnection) -> Result<i64> {
        let count = ArticleLike::belonging_to(self).count().get_result(conn)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::try_create_connection;
    use crate::models::{ArticleDraft, PUBLIC_CATEGORY};

    fn fixture(conn: &PgConnection) -> (Article, User) {
        let author = User::create(conn, "plume", "hash").expect("must be created");
        let reader = User::create(conn, "fan", "hash").expect("must be created");
        let article = Article::create(
            conn,
            &ArticleDraft {
                title: "Titre",
                lead: "lead",
                body: "body",
                category: PUBLIC_CATEGORY,
                image: None,
            },
            author.id,
        )
        .expect("must be created");
        (article, reader)
    }

    #[actix_rt::test]
    async fn liking_twice_is_liking_once() {
        let conn = match try_create_connection() {
            Some(conn) => conn,
            None => return,
        };
        conn.test_transaction::<_, diesel::result::Error, _>(|| {
            let (article, reader) = fixture(&conn);
            article.add_like(&conn, reader.id).expect("must like");
            article.add_like(&conn, reader.id).expect("must stay a no-op");
            assert_eq!(article.like_count(&conn).expect("must count"), 1);
            assert!(article.is_liked_by(&conn, reader.id).expect("must check"));
            Ok(())
        });
    }

    #[actix_rt::test]
    async fn unliking_a_non_member_is_a_no_op() {
        let conn = match try_create_connection() {
            Some(conn) => conn,
            None => return,
        };
        conn.test_transaction::<_, diesel::result::Error, _>(|| {
            let (article, reader) = fixture(&conn);
            article
                .remove_like(&conn, reader.id)
                .expect("absent member removal must not fail");
            assert_eq!(article.like_count(&conn).expect("must count"), 0);

            article.add_like(&conn, reader.id).expect("must like");
            article.remove_like(&conn, reader.id).expect("must unlike");
            assert!(!article.is_liked_by(&conn, reader.id).expect("must check"));
            Ok(())
        });
    }
}
