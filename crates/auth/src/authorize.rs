use thiserror::Error;

use shelfwise_core::DomainError;

use crate::{Identity, IdentityContext, Permission, Role, policy};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: '{actor}' is missing permission '{permission}'")]
    Forbidden { actor: String, permission: String },

    #[error("forbidden: '{actor}' ({role}) may not operate as another user")]
    SimulationForbidden { actor: String, role: Role },
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Forbidden { actor, permission } => DomainError::unauthorized(actor, permission),
            AuthzError::SimulationForbidden { actor, .. } => {
                DomainError::unauthorized(actor, "simulateUsers")
            }
        }
    }
}

/// Pure set-membership check.
pub fn is_authorized(identity: &Identity, permission: Permission) -> bool {
    identity.has_permission(permission)
}

/// Authorize an identity for one permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(identity: &Identity, required: Permission) -> Result<(), AuthzError> {
    authorize_any(identity, &[required])
}

/// Succeeds when the identity holds at least one of `required`.
pub fn authorize_any(identity: &Identity, required: &[Permission]) -> Result<(), AuthzError> {
    if required.iter().any(|p| is_authorized(identity, *p)) {
        return Ok(());
    }

    let permission = required
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" or ");

    tracing::warn!(
        actor = %identity.name,
        role = %identity.role,
        permission = %permission,
        "authorization refused"
    );

    Err(AuthzError::Forbidden {
        actor: identity.name.clone(),
        permission,
    })
}

/// Check that the real operator behind `ctx` may simulate other users.
///
/// While already simulating, the saved original identity is the one judged,
/// so an Admin acting as a Viewer can still hop to another user.
pub fn authorize_simulation(ctx: &IdentityContext) -> Result<(), AuthzError> {
    let operator = ctx.operator();
    if policy::can_simulate(operator.role) {
        Ok(())
    } else {
        tracing::warn!(actor = %operator.name, role = %operator.role, "simulation refused");
        Err(AuthzError::SimulationForbidden {
            actor: operator.name.clone(),
            role: operator.role,
        })
    }
}

/// Authorize, then enter simulation as `target`.
pub fn simulate(ctx: &mut IdentityContext, target: Identity) -> Result<(), AuthzError> {
    authorize_simulation(ctx)?;
    tracing::info!(
        operator = %ctx.operator().name,
        target = %target.name,
        role = %target.role,
        "entering simulation"
    );
    ctx.enter_simulation(target);
    Ok(())
}
