use crate::schema::appointments;
use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Queryable, Identifiable, Clone, Debug)]
#[diesel(table_name = appointments)]
pub struct Appointment {
    pub id: i32,
    pub student_id: i32,
    pub faculty_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub reason: String,
    pub status: String,
}

#[derive(Insertable)]
#[diesel(table_name = appointments)]
pub struct NewAppointment {
    pub student_id: i32,
    pub faculty_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub reason: String,
    pub status: String,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = appointments)]
pub struct UpdateAppointment {
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub reason: Option<String>,
}

pub const APPOINT_STATUS_PENDING: &str = "pending";
pub const APPOINT_STATUS_ACCEPTED: &str = "accepted";
pub const APPOINT_STATUS_REJECTED: &str = "rejected";
pub const APPOINT_STATUS_CANCELLED: &str = "cancelled";

/// The appointment status machine. `pending` is the sole initial state,
/// `rejected` and `cancelled` are terminal.
pub fn can_transition(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        (APPOINT_STATUS_PENDING, APPOINT_STATUS_ACCEPTED)
            | (APPOINT_STATUS_PENDING, APPOINT_STATUS_REJECTED)
            | (APPOINT_STATUS_ACCEPTED, APPOINT_STATUS_CANCELLED)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_decided() {
        assert!(can_transition(APPOINT_STATUS_PENDING, APPOINT_STATUS_ACCEPTED));
        assert!(can_transition(APPOINT_STATUS_PENDING, APPOINT_STATUS_REJECTED));
    }

    #[test]
    fn only_accepted_can_be_cancelled() {
        assert!(can_transition(APPOINT_STATUS_ACCEPTED, APPOINT_STATUS_CANCELLED));
        assert!(!can_transition(APPOINT_STATUS_PENDING, APPOINT_STATUS_CANCELLED));
        assert!(!can_transition(APPOINT_STATUS_REJECTED, APPOINT_STATUS_CANCELLED));
    }

    #[test]
    fn terminal_states_stay_terminal() {
        for terminal in [APPOINT_STATUS_REJECTED, APPOINT_STATUS_CANCELLED] {
            for to in [
                APPOINT_STATUS_PENDING,
                APPOINT_STATUS_ACCEPTED,
                APPOINT_STATUS_REJECTED,
                APPOINT_STATUS_CANCELLED,
            ] {
                assert!(!can_transition(terminal, to));
            }
        }
    }

    #[test]
    fn no_way_back_to_pending() {
        assert!(!can_transition(APPOINT_STATUS_ACCEPTED, APPOINT_STATUS_PENDING));
        assert!(!can_transition(APPOINT_STATUS_PENDING, APPOINT_STATUS_PENDING));
    }
}
