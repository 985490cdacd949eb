// Database models for Diesel
use diesel::prelude::*;
use shared_types::NewUser;

/// Insertable struct for new users; `id` and `created_at` use column defaults
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserRow<'a> {
    pub email: &'a str,
    pub full_name: Option<&'a str>,
    pub provider: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        NewUserRow {
            email: &user.email,
            full_name: user.full_name.as_deref(),
            provider: &user.provider,
        }
    }
}
