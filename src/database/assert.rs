use diesel::prelude::*;

use crate::error::ServiceError;
use crate::models::appointments::Appointment;
use crate::models::cancellation_requests::{CancellationRequest, CANCEL_STATUS_PENDING};
use crate::models::users::UserData;

pub fn assert_user(conn: &mut SqliteConnection, user_id: i32) -> Result<UserData, ServiceError> {
    use crate::schema::users;

    users::table
        .find(user_id)
        .first::<UserData>(conn)
        .optional()?
        .ok_or(ServiceError::UnknownUser)
}

pub fn assert_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<UserData, ServiceError> {
    use crate::schema::users;

    users::table
        .filter(users::username.eq(username))
        .first::<UserData>(conn)
        .optional()?
        .ok_or(ServiceError::UnknownUser)
}

pub fn assert_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i32,
) -> Result<Appointment, ServiceError> {
    use crate::schema::appointments;

    appointments::table
        .find(appointment_id)
        .first::<Appointment>(conn)
        .optional()?
        .ok_or(ServiceError::NotFound)
}

/// The pending cancellation request for an appointment, if any. Resolution
/// always targets the newest one.
pub fn pending_cancellation(
    conn: &mut SqliteConnection,
    appointment_id: i32,
) -> Result<Option<CancellationRequest>, ServiceError> {
    use crate::schema::cancellation_requests;

    let req = cancellation_requests::table
        .filter(cancellation_requests::appointment_id.eq(appointment_id))
        .filter(cancellation_requests::status.eq(CANCEL_STATUS_PENDING))
        .order(cancellation_requests::id.desc())
        .first::<CancellationRequest>(conn)
        .optional()?;
    Ok(req)
}
