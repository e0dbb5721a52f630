//! API Routes

pub mod forms;
pub mod responses;
pub mod status;
