//! Authorization gate consumed at driver construction
//!
//! Driver construction checks the gate once; an unauthorized gate fails
//! construction with [`crate::EvseError::SponsorRequired`]. The gate's
//! internals (licensing, sponsorship tokens) are an external collaborator.

/// Construction-time authorization check
pub trait AuthorizationGate: Send + Sync {
    fn is_authorized(&self) -> bool;
}

/// Gate that always authorizes (default for unrestricted deployments)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAuthorized;

impl AuthorizationGate for AlwaysAuthorized {
    fn is_authorized(&self) -> bool {
        true
    }
}
