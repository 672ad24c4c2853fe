use crate::schema::users;
use diesel::prelude::*;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[diesel(table_name = users)]
pub struct UserData {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: String,
}

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_FACULTY: &str = "faculty";
pub const ROLE_ADMIN: &str = "admin";

pub const ALL_ROLES: [&str; 3] = [ROLE_STUDENT, ROLE_FACULTY, ROLE_ADMIN];
