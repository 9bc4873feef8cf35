//! User entity <-> model mapper

use board_core::entities::{NewUser, User, UserRole};
use board_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            role: UserRole::from_db(&model.role),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Insert values for a new user, with the email normalized
pub struct UserInsert<'a> {
    pub id: i64,
    pub username: &'a str,
    pub email: String,
    pub password_hash: &'a str,
    pub role: &'static str,
}

impl<'a> UserInsert<'a> {
    pub fn new(user: &'a NewUser) -> Self {
        Self {
            id: user.id.into_inner(),
            username: user.username.trim(),
            email: User::normalize_email(&user.email),
            password_hash: &user.password_hash,
            role: UserRole::default().as_str(),
        }
    }
}
