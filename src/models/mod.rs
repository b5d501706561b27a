mod article;
mod comment;
mod like;
mod role;
mod user;
pub use article::{Article, ArticleDraft, DRAFT_CATEGORY, PUBLIC_CATEGORY};
pub use comment::Comment;
pub use like::ArticleLike;
pub use role::{Role, UserRole, ADMIN_ROLE};
pub use user::User;
