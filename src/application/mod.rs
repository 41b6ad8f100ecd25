//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers change state; query handlers only read it.

pub mod handlers;

pub use handlers::{
    // Assessment handlers
    AssessmentStep, GetResultHandler, GetResultQuery, StartOrContinueCommand,
    StartOrContinueHandler, SubmitAnswerCommand, SubmitAnswerHandler,
    // Scheduling
    ScheduleResponsesCommand, ScheduleResponsesHandler,
    // Chat
    AssessmentFlow, ChatError, ChatEvent, ChatEventStream, ChatSettings, SendChatMessageCommand,
    SendChatMessageHandler,
    // Plans and progress
    CompleteTaskCommand, CompleteTaskHandler, GenerateReportHandler, GenerateReportQuery,
    GeneratePlanCommand, GeneratePlanHandler, GetActivePlanHandler, GetActivePlanQuery,
    GetPlanDetailsHandler, GetPlanDetailsQuery, ListUserPlansHandler, ListUserPlansQuery,
    SkipTaskCommand, SkipTaskHandler,
    // Client initialisation
    ClientProfile, InitializeClientHandler, InitializeClientQuery,
};
