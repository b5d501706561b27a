use crate::models::User;
use crate::schema::{roles, user_roles};
use anyhow::Result;
use diesel::prelude::*;
use serde::Serialize;

/// Name of the only role this application gives meaning to.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Serialize, Queryable, Identifiable, Debug)]
pub struct Role {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, Associations, Identifiable, Insertable, Queryable, Debug)]
#[table_name = "user_roles"]
#[primary_key(user_id, role_id)]
#[belongs_to(User)]
#[belongs_to(Role)]
pub struct UserRole {
    pub user_id: i32,
    pub role_id: i32,
}

impl Role {
    pub fn create(conn: &PgConnection, name: &str) -> Result<Self> {
        let role = diesel::insert_into(roles::table)
            .values(roles::name.eq(name))
            .get_result(conn)?;
        Ok(role)
    }

    pub fn find_by_name(conn: &PgConnection, name: &str) -> Result<Option<Role>> {
        let role = roles::table
            .filter(roles::name.eq(name))
            .first::<Role>(conn)
            .optional()?;
        Ok(role)
    }

    pub fn add_user(&self, conn: &PgConnection, user: &User) -> Result<()> {
        user.add_role(conn, self)
    }
}
