//! Per-action authorization rules.
//!
//! Decisions are pure comparisons over an [`ActorContext`] whose role
//! membership is materialized up front; handlers never reach through lazy
//! relations. `AccessDenied` (the actor is known but lacks permission) is a
//! different outcome from `Unauthenticated` and from redirect-to-login, and
//! the three are never collapsed.

use crate::error::AppError;
use crate::models::User;
use anyhow::Result;
use diesel::PgConnection;

/// The identity behind the current request, with role lookups already done.
/// Built once per request and passed explicitly to every decision.
#[derive(Debug, Clone, Copy)]
pub struct ActorContext {
    pub user_id: i32,
    pub is_admin: bool,
}

impl ActorContext {
    pub fn load(conn: &PgConnection, user: &User) -> Result<ActorContext> {
        Ok(ActorContext {
            user_id: user.id,
            is_admin: user.is_admin(conn)?,
        })
    }
}

/// Deleting an article takes its author or an admin.
pub fn can_delete_article(actor: &ActorContext, author_id: i32) -> Result<(), AppError> {
    if actor.user_id == author_id || actor.is_admin {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}

/// Only the comment's own author may delete it; the admin role does not
/// override this.
pub fn can_delete_comment(actor: &ActorContext, author_id: i32) -> Result<(), AppError> {
    if actor.user_id == author_id {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}
