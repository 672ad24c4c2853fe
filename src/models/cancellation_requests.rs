use crate::schema::cancellation_requests;
use diesel::prelude::*;

/// Holds a non-owning reference to its appointment; appointments are never
/// hard-deleted, so the reference always resolves.
#[derive(Queryable, Identifiable, Clone, Debug)]
#[diesel(table_name = cancellation_requests)]
pub struct CancellationRequest {
    pub id: i32,
    pub appointment_id: i32,
    pub requester_id: i32,
    pub reason: String,
    pub status: String,
}

#[derive(Insertable)]
#[diesel(table_name = cancellation_requests)]
pub struct NewCancellationRequest {
    pub appointment_id: i32,
    pub requester_id: i32,
    pub reason: String,
    pub status: String,
}

pub const CANCEL_STATUS_PENDING: &str = "pending";
pub const CANCEL_STATUS_ACCEPTED: &str = "accepted";
pub const CANCEL_STATUS_REJECTED: &str = "rejected";
