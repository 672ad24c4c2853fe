pub mod appointments;
pub mod cancellation_requests;
pub mod users;
