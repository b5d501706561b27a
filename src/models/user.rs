use crate::models::{Role, UserRole};
use crate::schema::{roles, user_roles, users};
use anyhow::Result;
use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Serialize, Queryable, Identifiable, Debug)]
pub struct User {
    pub id: i32,
    pub pseudo: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "users"]
struct NewUser<'a> {
    pseudo: &'a str,
    password_hash: &'a str,
    created_at: NaiveDateTime,
}

impl User {
    pub fn find(conn: &PgConnection, user_id: i32) -> Result<Option<User>> {
        let user = users::table.find(user_id).first::<User>(conn).optional()?;
        Ok(user)
    }

    pub fn find_by_pseudo(conn: &PgConnection, pseudo: &str) -> Result<Option<User>> {
        let user = users::table
            .filter(users::pseudo.eq(pseudo))
            .first::<User>(conn)
            .optional()?;
        Ok(user)
    }

    /// Stores the already-hashed credentials. Accounts start with an empty
    /// role set; roles are granted separately.
    pub fn create(conn: &PgConnection, pseudo: &str, password_hash: &str) -> Result<Self> {
        let new_user = NewUser {
            pseudo,
            password_hash,
            created_at: Utc::now().naive_utc(),
        };
        let user = diesel::insert_into(users::table)
            .values(new_user)
            .get_result::<User>(conn)?;
        Ok(user)
    }

    pub fn add_role(&self, conn: &PgConnection, role: &Role) -> Result<()> {
        diesel::insert_into(user_roles::table)
            .values(UserRole {
                user_id: self.id,
                role_id: role.id,
            })
            .execute(conn)?;
        Ok(())
    }

    pub fn has_role(&self, conn: &PgConnection, role: &Role) -> Result<bool> {
        let user_role = user_roles::table
            .find((self.id, role.id))
            .get_result::<UserRole>(conn)
            .optional()?;
        Ok(user_role.is_some())
    }

    pub fn is_admin(&self, conn: &PgConnection) -> Result<bool> {
        let membership = user_roles::table
            .inner_join(roles::table)
            .filter(user_roles::user_id.eq(self.id))
            .filter(roles::name.eq(crate::models::ADMIN_ROLE))
            .first::<(UserRole, Role)>(conn)
            .optional()?;
        Ok(membership.is_some())
    }
}
