//! Boundary to the external identity provider.
//!
//! Authentication happens outside this system. The storefront only consumes
//! the signed-in identity and reacts to sign-in/sign-out events by loading
//! or discarding the session state.

use attar_core::UserId;

/// The signed-in identity as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl Identity {
    /// An identity with only an ID, the minimum the provider guarantees.
    #[must_use]
    pub const fn bare(id: UserId) -> Self {
        Self {
            id,
            email: None,
            name: None,
        }
    }
}

/// Identity lifecycle events the session manager subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    SignedIn(Identity),
    SignedOut,
}
