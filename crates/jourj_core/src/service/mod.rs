//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs: current-event
//!   selection, event-scoped projection, timeline reordering, Drive stub.
//! - Keep UI layers decoupled from storage details.

pub mod current_event;
pub mod drive;
pub mod projector;
pub mod timeline;
