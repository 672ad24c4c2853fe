use diesel::prelude::*;

use crate::database::assert;
use crate::error::ServiceError;
use crate::models::appointments::Appointment;
use crate::models::cancellation_requests::{
    CancellationRequest, NewCancellationRequest, CANCEL_STATUS_ACCEPTED, CANCEL_STATUS_PENDING,
    CANCEL_STATUS_REJECTED,
};
use crate::models::users::{ROLE_ADMIN, ROLE_FACULTY, ROLE_STUDENT};
use crate::services::auth;
use crate::services::booking::{self, Decision};

pub fn request_cancellation(
    conn: &mut SqliteConnection,
    appointment_id: i32,
    requester_id: i32,
    reason: String,
    allow_repeat: bool,
) -> Result<CancellationRequest, ServiceError> {
    use crate::schema::cancellation_requests;

    conn.transaction(|conn| {
        assert::assert_appointment(conn, appointment_id)?;
        let requester = assert::assert_user(conn, requester_id)?;
        auth::require_role(&requester, &[ROLE_STUDENT, ROLE_FACULTY])?;

        if !allow_repeat && assert::pending_cancellation(conn, appointment_id)?.is_some() {
            return Err(ServiceError::InvalidTransition);
        }

        let data = NewCancellationRequest {
            appointment_id,
            requester_id,
            reason,
            status: CANCEL_STATUS_PENDING.to_string(),
        };
        let request = diesel::insert_into(cancellation_requests::table)
            .values(data)
            .get_result::<CancellationRequest>(conn)?;
        Ok(request)
    })
}

/// Admin decision on the pending request for an appointment. Accepting marks
/// the request accepted and cancels the appointment in the same transaction;
/// both happen or neither does.
pub fn resolve(
    conn: &mut SqliteConnection,
    appointment_id: i32,
    admin_id: i32,
    decision: Decision,
) -> Result<(CancellationRequest, Appointment), ServiceError> {
    use crate::schema::cancellation_requests;

    conn.transaction(|conn| {
        let admin = assert::assert_user(conn, admin_id)?;
        auth::require_role(&admin, &[ROLE_ADMIN])?;

        let request = assert::pending_cancellation(conn, appointment_id)?
            .ok_or(ServiceError::NotFound)?;

        let appointment = match decision {
            Decision::Accept => {
                let appointment = booking::cancel(conn, appointment_id, admin_id)?;
                diesel::update(cancellation_requests::table.find(request.id))
                    .set(cancellation_requests::status.eq(CANCEL_STATUS_ACCEPTED))
                    .execute(conn)?;
                appointment
            }
            Decision::Reject => {
                diesel::update(cancellation_requests::table.find(request.id))
                    .set(cancellation_requests::status.eq(CANCEL_STATUS_REJECTED))
                    .execute(conn)?;
                assert::assert_appointment(conn, appointment_id)?
            }
        };

        let request = cancellation_requests::table
            .find(request.id)
            .first::<CancellationRequest>(conn)?;
        Ok((request, appointment))
    })
}

#[derive(Default)]
pub struct CancellationFilter {
    pub appointment_id: Option<i32>,
    pub status: Option<String>,
}

pub fn search_cancellations(
    conn: &mut SqliteConnection,
    filter: CancellationFilter,
) -> Result<Vec<CancellationRequest>, ServiceError> {
    use crate::schema::cancellation_requests;

    let mut query = cancellation_requests::table.into_boxed();
    if let Some(id) = filter.appointment_id {
        query = query.filter(cancellation_requests::appointment_id.eq(id));
    }
    if let Some(status) = filter.status {
        query = query.filter(cancellation_requests::status.eq(status));
    }

    let requests = query
        .order(cancellation_requests::id.asc())
        .get_results::<CancellationRequest>(conn)?;
    Ok(requests)
}
