//! Responder scheduling handler.

mod schedule_responses;

pub use schedule_responses::{ScheduleResponsesCommand, ScheduleResponsesHandler};
