use blake2::{Blake2b512, Digest};
use diesel::prelude::*;
use rand::Rng;

use crate::database::assert;
use crate::error::ServiceError;
use crate::models::users::{NewUser, UserData, ROLE_ADMIN};
use crate::utils::assert_role_str;

fn new_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hash_password(plain: &str, salt: &str) -> String {
    let mut hasher = Blake2b512::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    format!("{}${:x}", salt, hasher.finalize())
}

fn verify_password(plain: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, _)) => hash_password(plain, salt) == stored,
        None => false,
    }
}

pub fn create_user(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
    role: &str,
) -> Result<UserData, ServiceError> {
    use crate::schema::users;

    assert_role_str(role)?;

    let data = NewUser {
        username: username.to_string(),
        password: hash_password(password, &new_salt()),
        role: role.to_string(),
    };
    // The UNIQUE constraint on username is the authority on duplicates, so a
    // second writer racing this insert still gets the same answer.
    let user = diesel::insert_into(users::table)
        .values(data)
        .get_result::<UserData>(conn)
        .map_err(|err| match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => ServiceError::DuplicateUsername,
            other => ServiceError::Database(other),
        })?;
    Ok(user)
}

pub fn authenticate(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<UserData, ServiceError> {
    use crate::schema::users;

    let user = users::table
        .filter(users::username.eq(username))
        .first::<UserData>(conn)
        .optional()?
        .ok_or(ServiceError::InvalidCredentials)?;
    if !verify_password(password, &user.password) {
        return Err(ServiceError::InvalidCredentials);
    }
    Ok(user)
}

/// The one authorization check every service method funnels through.
pub fn require_role(user: &UserData, allowed: &[&str]) -> Result<(), ServiceError> {
    if allowed.contains(&user.role.as_str()) {
        Ok(())
    } else {
        Err(ServiceError::PermissionDenied)
    }
}

pub fn set_role(
    conn: &mut SqliteConnection,
    acting_id: i32,
    target_id: i32,
    new_role: &str,
) -> Result<UserData, ServiceError> {
    use crate::schema::users;

    assert_role_str(new_role)?;

    conn.transaction(|conn| {
        let acting = assert::assert_user(conn, acting_id)?;
        require_role(&acting, &[ROLE_ADMIN])?;
        assert::assert_user(conn, target_id)?;

        let user = diesel::update(users::table.find(target_id))
            .set(users::role.eq(new_role))
            .get_result::<UserData>(conn)?;
        Ok(user)
    })
}

/// Re-hashes with a fresh salt. Users change their own password by proving
/// the old one; an admin may reset anyone's without it.
pub fn set_password(
    conn: &mut SqliteConnection,
    acting_id: i32,
    target_id: i32,
    old_password: Option<&str>,
    new_password: &str,
) -> Result<UserData, ServiceError> {
    use crate::schema::users;

    conn.transaction(|conn| {
        let acting = assert::assert_user(conn, acting_id)?;
        let target = assert::assert_user(conn, target_id)?;

        if acting.id == target.id {
            let old = old_password.ok_or(ServiceError::InvalidCredentials)?;
            if !verify_password(old, &target.password) {
                return Err(ServiceError::InvalidCredentials);
            }
        } else {
            require_role(&acting, &[ROLE_ADMIN])?;
        }

        let user = diesel::update(users::table.find(target.id))
            .set(users::password.eq(hash_password(new_password, &new_salt())))
            .get_result::<UserData>(conn)?;
        Ok(user)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{ROLE_FACULTY, ROLE_STUDENT};

    fn conn() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        crate::database::init_schema(&mut conn).unwrap();
        conn
    }

    #[test]
    fn password_hashes_are_salted() {
        let a = hash_password("hunter2", &new_salt());
        let b = hash_password("hunter2", &new_salt());
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a));
        assert!(verify_password("hunter2", &b));
        assert!(!verify_password("hunter3", &a));
    }

    #[test]
    fn create_user_rejects_duplicate_username() {
        let mut conn = conn();
        create_user(&mut conn, "alice", "pw", ROLE_STUDENT).unwrap();
        let err = create_user(&mut conn, "alice", "other", ROLE_FACULTY).unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateUsername));
    }

    #[test]
    fn create_user_rejects_unknown_role() {
        let mut conn = conn();
        let err = create_user(&mut conn, "bob", "pw", "provost").unwrap_err();
        assert!(matches!(err, ServiceError::MalformedInput(_)));
    }

    #[test]
    fn authenticate_checks_password() {
        let mut conn = conn();
        let created = create_user(&mut conn, "alice", "pw", ROLE_STUDENT).unwrap();

        let user = authenticate(&mut conn, "alice", "pw").unwrap();
        assert_eq!(user.id, created.id);

        assert!(matches!(
            authenticate(&mut conn, "alice", "nope"),
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&mut conn, "nobody", "pw"),
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn set_role_is_admin_only() {
        let mut conn = conn();
        let admin = create_user(&mut conn, "root", "pw", ROLE_ADMIN).unwrap();
        let student = create_user(&mut conn, "alice", "pw", ROLE_STUDENT).unwrap();

        let err = set_role(&mut conn, student.id, student.id, ROLE_ADMIN).unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied));

        let updated = set_role(&mut conn, admin.id, student.id, ROLE_FACULTY).unwrap();
        assert_eq!(updated.role, ROLE_FACULTY);
    }

    #[test]
    fn change_own_password_needs_the_old_one() {
        let mut conn = conn();
        let alice = create_user(&mut conn, "alice", "pw", ROLE_STUDENT).unwrap();

        let err = set_password(&mut conn, alice.id, alice.id, Some("nope"), "new").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
        let err = set_password(&mut conn, alice.id, alice.id, None, "new").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
        // The failed attempts left the old password in place.
        authenticate(&mut conn, "alice", "pw").unwrap();

        set_password(&mut conn, alice.id, alice.id, Some("pw"), "new").unwrap();
        authenticate(&mut conn, "alice", "new").unwrap();
        assert!(matches!(
            authenticate(&mut conn, "alice", "pw"),
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn admin_resets_without_old_password() {
        let mut conn = conn();
        let admin = create_user(&mut conn, "root", "pw", ROLE_ADMIN).unwrap();
        let alice = create_user(&mut conn, "alice", "pw", ROLE_STUDENT).unwrap();

        set_password(&mut conn, admin.id, alice.id, None, "issued").unwrap();
        authenticate(&mut conn, "alice", "issued").unwrap();
    }

    #[test]
    fn only_admins_touch_other_accounts() {
        let mut conn = conn();
        let alice = create_user(&mut conn, "alice", "pw", ROLE_STUDENT).unwrap();
        let bob = create_user(&mut conn, "bob", "pw", ROLE_STUDENT).unwrap();

        let err = set_password(&mut conn, alice.id, bob.id, None, "gotcha").unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied));
        authenticate(&mut conn, "bob", "pw").unwrap();
    }

    #[test]
    fn set_role_requires_existing_target() {
        let mut conn = conn();
        let admin = create_user(&mut conn, "root", "pw", ROLE_ADMIN).unwrap();
        assert!(matches!(
            set_role(&mut conn, admin.id, 999, ROLE_FACULTY),
            Err(ServiceError::UnknownUser)
        ));
    }
}
