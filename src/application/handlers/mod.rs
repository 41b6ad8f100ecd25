//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod assessment;
pub mod chat;
pub mod init;
pub mod plan;
pub mod progress;
pub mod scheduling;

pub use assessment::{
    AssessmentStep, GetResultHandler, GetResultQuery, StartOrContinueCommand,
    StartOrContinueHandler, SubmitAnswerCommand, SubmitAnswerHandler,
};
pub use chat::{
    AssessmentFlow, ChatError, ChatEvent, ChatEventStream, ChatSettings, SendChatMessageCommand,
    SendChatMessageHandler,
};
pub use init::{ClientProfile, InitializeClientHandler, InitializeClientQuery};
pub use plan::{
    CompleteTaskCommand, CompleteTaskHandler, GeneratePlanCommand, GeneratePlanHandler,
    GetActivePlanHandler, GetActivePlanQuery, GetPlanDetailsHandler, GetPlanDetailsQuery,
    ListUserPlansHandler, ListUserPlansQuery, SkipTaskCommand, SkipTaskHandler,
};
pub use progress::{GenerateReportHandler, GenerateReportQuery};
pub use scheduling::{ScheduleResponsesCommand, ScheduleResponsesHandler};
