//! `gatehouse-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{AggregateRoot, EventRecorder};
pub use entity::Entity;
pub use error::{DomainError, DomainResult, ErrorCode, ensure_not_blank};
pub use id::{InvitationId, TenantId};
pub use value_object::ValueObject;
