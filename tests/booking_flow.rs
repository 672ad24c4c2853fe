use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Connection, SqliteConnection};

use campus_booking::database;
use campus_booking::error::ServiceError;
use campus_booking::models::appointments::{
    APPOINT_STATUS_ACCEPTED, APPOINT_STATUS_CANCELLED, APPOINT_STATUS_PENDING,
};
use campus_booking::models::cancellation_requests::CANCEL_STATUS_ACCEPTED;
use campus_booking::models::users::{ROLE_ADMIN, ROLE_FACULTY, ROLE_STUDENT};
use campus_booking::services::booking::{self, Decision, TimeWindow};
use campus_booking::services::{auth, cancellation};

fn setup() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    database::init_schema(&mut conn).unwrap();
    conn
}

fn slot(hour: u32) -> TimeWindow {
    let at = |h: u32| -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    };
    TimeWindow::new(at(hour), at(hour + 1)).unwrap()
}

// The full life of one slot: requested, accepted, contested, cancelled
// through a moderated request, then re-booked by someone else.
#[test]
fn booking_lifecycle_end_to_end() {
    let mut conn = setup();

    let admin = auth::create_user(&mut conn, "registrar", "pw", ROLE_ADMIN).unwrap();
    let s1 = auth::create_user(&mut conn, "alice", "pw", ROLE_STUDENT).unwrap();
    let s2 = auth::create_user(&mut conn, "bob", "pw", ROLE_STUDENT).unwrap();
    let prof = auth::create_user(&mut conn, "dr_grey", "pw", ROLE_FACULTY).unwrap();

    // Student S requests faculty F at 10:00.
    let appo = booking::request_appointment(&mut conn, s1.id, prof.id, slot(10), "thesis".into())
        .unwrap();
    assert_eq!(appo.status, APPOINT_STATUS_PENDING);

    // Faculty F accepts.
    let appo = booking::decide(&mut conn, appo.id, prof.id, Decision::Accept).unwrap();
    assert_eq!(appo.status, APPOINT_STATUS_ACCEPTED);

    // Student S2 asks for the same instant and is turned away.
    let err = booking::request_appointment(&mut conn, s2.id, prof.id, slot(10), "".into())
        .unwrap_err();
    assert!(matches!(err, ServiceError::SlotTaken));

    // S files a cancellation request; the admin approves it.
    cancellation::request_cancellation(&mut conn, appo.id, s1.id, "sick".into(), false).unwrap();
    let (request, cancelled) =
        cancellation::resolve(&mut conn, appo.id, admin.id, Decision::Accept).unwrap();
    assert_eq!(request.status, CANCEL_STATUS_ACCEPTED);
    assert_eq!(cancelled.status, APPOINT_STATUS_CANCELLED);

    // The slot is free again, so S2's new request goes through.
    let second = booking::request_appointment(&mut conn, s2.id, prof.id, slot(10), "".into())
        .unwrap();
    let second = booking::decide(&mut conn, second.id, prof.id, Decision::Accept).unwrap();
    assert_eq!(second.status, APPOINT_STATUS_ACCEPTED);
}

#[test]
fn failed_operations_leave_no_trace() {
    let mut conn = setup();

    let s1 = auth::create_user(&mut conn, "alice", "pw", ROLE_STUDENT).unwrap();
    let prof = auth::create_user(&mut conn, "dr_grey", "pw", ROLE_FACULTY).unwrap();

    // Unknown faculty member: nothing must be written.
    booking::request_appointment(&mut conn, s1.id, 999, slot(10), "".into()).unwrap_err();
    let all = booking::search_appointments(&mut conn, Default::default()).unwrap();
    assert!(all.is_empty());

    // A student cannot decide; the appointment stays pending.
    let appo =
        booking::request_appointment(&mut conn, s1.id, prof.id, slot(10), "".into()).unwrap();
    booking::decide(&mut conn, appo.id, s1.id, Decision::Accept).unwrap_err();
    let all = booking::search_appointments(&mut conn, Default::default()).unwrap();
    assert_eq!(all[0].status, APPOINT_STATUS_PENDING);
}
