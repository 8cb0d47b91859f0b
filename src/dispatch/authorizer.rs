//! Authorization hook run before an action is invoked.

use crate::dispatch::controller::ControllerInstance;
use crate::error::Result;

/// Decides whether a resolved controller may be invoked.
///
/// Returning `Err` (normally [`crate::RouterError::AuthorizationRejected`])
/// makes the router switch to the login fallback route.
pub trait Authorizer: Send + Sync {
    fn verify(&self, controller: &ControllerInstance) -> Result<()>;
}

impl<F> Authorizer for F
where
    F: Fn(&ControllerInstance) -> Result<()> + Send + Sync,
{
    fn verify(&self, controller: &ControllerInstance) -> Result<()> {
        self(controller)
    }
}
