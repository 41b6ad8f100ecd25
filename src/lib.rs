//! Health Coach - conversational health-coaching backend
//!
//! A group of AI personas answers each chat message: a router persona tags
//! the message, the best-matching personas reply over server-sent events,
//! and a profile assessment runs inside the conversation. Completed
//! profiles feed habit plans and adherence reports.
//!
//! The crate follows a hexagonal layout:
//!
//! - `domain` - assessment, personas, chat history, plans, progress, quota
//! - `ports` - storage, AI and persona-directory traits
//! - `application` - command and query handlers
//! - `adapters` - AI providers, HTTP, in-memory, PostgreSQL and Redis
//! - `config` - layered YAML and environment configuration
//! - `bootstrap` - wiring from configuration to a running router

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
