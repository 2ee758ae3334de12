//! `shelfwise-auth`: role-based access policy and acting identity.
//!
//! This crate is intentionally decoupled from transport, storage and any
//! identity provider: the caller hands in an [`Identity`] and asks whether it
//! may perform a [`Permission`].

pub mod authorize;
pub mod identity;
pub mod permissions;
pub mod policy;
pub mod roles;

pub use authorize::{authorize, authorize_any, authorize_simulation, is_authorized, simulate, AuthzError};
pub use identity::{Identity, IdentityContext};
pub use permissions::Permission;
pub use policy::{can_simulate, permissions_for};
pub use roles::Role;
