use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::database::assert;
use crate::error::ServiceError;
use crate::models::appointments::{
    can_transition, Appointment, NewAppointment, UpdateAppointment, APPOINT_STATUS_ACCEPTED,
    APPOINT_STATUS_CANCELLED, APPOINT_STATUS_PENDING, APPOINT_STATUS_REJECTED,
};
use crate::models::users::{ROLE_ADMIN, ROLE_FACULTY};
use crate::services::auth;

/// A half-open meeting slot `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ServiceError> {
        if start >= end {
            return Err(ServiceError::MalformedInput(
                "time window must end after it starts".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn parse(s: &str) -> Result<Self, ServiceError> {
        match s {
            "accept" => Ok(Decision::Accept),
            "reject" => Ok(Decision::Reject),
            _ => Err(ServiceError::MalformedInput(format!(
                "unknown decision `{}`",
                s
            ))),
        }
    }
}

/// Fails with `SlotTaken` when an *accepted* appointment of the same faculty
/// member overlaps the window. Pending appointments never block a slot.
fn ensure_slot_free(
    conn: &mut SqliteConnection,
    faculty_id: i32,
    window: TimeWindow,
    exclude: Option<i32>,
) -> Result<(), ServiceError> {
    use crate::schema::appointments;

    let mut query = appointments::table
        .filter(appointments::faculty_id.eq(faculty_id))
        .filter(appointments::status.eq(APPOINT_STATUS_ACCEPTED))
        .filter(appointments::start_time.lt(window.end))
        .filter(appointments::end_time.gt(window.start))
        .into_boxed();
    if let Some(id) = exclude {
        query = query.filter(appointments::id.ne(id));
    }

    let conflicts = query.get_results::<Appointment>(conn)?;
    if !conflicts.is_empty() {
        return Err(ServiceError::SlotTaken);
    }
    Ok(())
}

pub fn request_appointment(
    conn: &mut SqliteConnection,
    student_id: i32,
    faculty_id: i32,
    window: TimeWindow,
    reason: String,
) -> Result<Appointment, ServiceError> {
    use crate::schema::appointments;

    conn.transaction(|conn| {
        assert::assert_user(conn, student_id)?;
        assert::assert_user(conn, faculty_id)?;
        ensure_slot_free(conn, faculty_id, window, None)?;

        let data = NewAppointment {
            student_id,
            faculty_id,
            start_time: window.start,
            end_time: window.end,
            reason,
            status: APPOINT_STATUS_PENDING.to_string(),
        };
        let appointment = diesel::insert_into(appointments::table)
            .values(data)
            .get_result::<Appointment>(conn)?;
        Ok(appointment)
    })
}

pub fn decide(
    conn: &mut SqliteConnection,
    appointment_id: i32,
    acting_id: i32,
    decision: Decision,
) -> Result<Appointment, ServiceError> {
    use crate::schema::appointments;

    conn.transaction(|conn| {
        let acting = assert::assert_user(conn, acting_id)?;
        auth::require_role(&acting, &[ROLE_FACULTY, ROLE_ADMIN])?;

        let appointment = assert::assert_appointment(conn, appointment_id)?;
        let new_status = match decision {
            Decision::Accept => APPOINT_STATUS_ACCEPTED,
            Decision::Reject => APPOINT_STATUS_REJECTED,
        };
        if !can_transition(&appointment.status, new_status) {
            return Err(ServiceError::InvalidTransition);
        }

        if decision == Decision::Accept {
            // Another appointment may have been accepted since this one was
            // requested; the slot must still be free now.
            let window = TimeWindow {
                start: appointment.start_time,
                end: appointment.end_time,
            };
            ensure_slot_free(conn, appointment.faculty_id, window, Some(appointment.id))?;
        }

        let appointment = diesel::update(appointments::table.find(appointment_id))
            .set(appointments::status.eq(new_status))
            .get_result::<Appointment>(conn)?;
        Ok(appointment)
    })
}

/// Soft transition to `cancelled`; the record stays around so cancellation
/// requests keep a resolvable back-reference.
pub fn cancel(
    conn: &mut SqliteConnection,
    appointment_id: i32,
    acting_admin_id: i32,
) -> Result<Appointment, ServiceError> {
    use crate::schema::appointments;

    conn.transaction(|conn| {
        let acting = assert::assert_user(conn, acting_admin_id)?;
        auth::require_role(&acting, &[ROLE_ADMIN])?;

        let appointment = assert::assert_appointment(conn, appointment_id)?;
        if !can_transition(&appointment.status, APPOINT_STATUS_CANCELLED) {
            return Err(ServiceError::InvalidTransition);
        }

        let appointment = diesel::update(appointments::table.find(appointment_id))
            .set(appointments::status.eq(APPOINT_STATUS_CANCELLED))
            .get_result::<Appointment>(conn)?;
        Ok(appointment)
    })
}

pub fn edit(
    conn: &mut SqliteConnection,
    acting_admin_id: i32,
    appointment_id: i32,
    new_window: Option<TimeWindow>,
    new_reason: Option<String>,
) -> Result<Appointment, ServiceError> {
    use crate::schema::appointments;

    conn.transaction(|conn| {
        let acting = assert::assert_user(conn, acting_admin_id)?;
        auth::require_role(&acting, &[ROLE_ADMIN])?;

        let appointment = assert::assert_appointment(conn, appointment_id)?;
        if new_window.is_none() && new_reason.is_none() {
            return Ok(appointment);
        }

        let mut data = UpdateAppointment {
            reason: new_reason,
            ..Default::default()
        };
        if let Some(window) = new_window {
            ensure_slot_free(conn, appointment.faculty_id, window, Some(appointment.id))?;
            data.start_time = Some(window.start);
            data.end_time = Some(window.end);
        }

        let appointment = diesel::update(appointments::table.find(appointment_id))
            .set(&data)
            .get_result::<Appointment>(conn)?;
        Ok(appointment)
    })
}

#[derive(Default)]
pub struct AppointmentFilter {
    pub student_id: Option<i32>,
    pub faculty_id: Option<i32>,
    pub status: Option<String>,
}

pub fn search_appointments(
    conn: &mut SqliteConnection,
    filter: AppointmentFilter,
) -> Result<Vec<Appointment>, ServiceError> {
    use crate::schema::appointments;

    let mut query = appointments::table.into_boxed();
    if let Some(id) = filter.student_id {
        query = query.filter(appointments::student_id.eq(id));
    }
    if let Some(id) = filter.faculty_id {
        query = query.filter(appointments::faculty_id.eq(id));
    }
    if let Some(status) = filter.status {
        query = query.filter(appointments::status.eq(status));
    }

    let appointments = query
        .order(appointments::start_time.asc())
        .get_results::<Appointment>(conn)?;
    Ok(appointments)
}
