//! `gatehouse-application`: use cases over the identity domain.
//!
//! Services take flat [`commands`], load aggregates (a missing one is
//! `NotFound`), apply the change, persist it and publish the drained events.

pub mod app;
pub mod commands;
mod common;
pub mod group;
pub mod role;
pub mod tenant;
pub mod user;

pub use app::{Application, IdentityBus, bootstrap};
pub use group::GroupApplicationService;
pub use role::RoleApplicationService;
pub use tenant::TenantApplicationService;
pub use user::UserApplicationService;
