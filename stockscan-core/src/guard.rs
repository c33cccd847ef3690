//! Caller identity and the authorization check run before every operation.

use std::collections::BTreeSet;

use crate::error::{Result, ScanError};

/// Capability required to scan, flag and list assets.
pub const MANAGE_MEDIA: &str = "manage_media";

/// The party on whose behalf an operation runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub subject: String,
    pub capabilities: BTreeSet<String>,
}

impl Caller {
    pub fn new<C: Into<String>>(
        subject: impl Into<String>,
        capabilities: impl IntoIterator<Item = C>,
    ) -> Self {
        Self {
            subject: subject.into(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        }
    }

    /// A caller holding the administrative capability.
    pub fn operator(subject: impl Into<String>) -> Self {
        Self::new(subject, [MANAGE_MEDIA])
    }

    /// A caller without any capability.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Authorization precondition for controller operations.
pub trait AccessGuard: Send + Sync {
    /// `Ok(())` when `caller` may run `operation`, `Unauthorized` otherwise.
    fn authorize(&self, caller: &Caller, operation: &str) -> Result<()>;
}

/// Grants access to callers holding one named capability.
#[derive(Debug, Clone)]
pub struct CapabilityGuard {
    required: String,
}

impl CapabilityGuard {
    pub fn new(required: impl Into<String>) -> Self {
        Self {
            required: required.into(),
        }
    }

    pub fn required(&self) -> &str {
        &self.required
    }
}

impl Default for CapabilityGuard {
    fn default() -> Self {
        Self::new(MANAGE_MEDIA)
    }
}

impl AccessGuard for CapabilityGuard {
    fn authorize(&self, caller: &Caller, operation: &str) -> Result<()> {
        if caller.has_capability(&self.required) {
            return Ok(());
        }

        tracing::warn!(
            subject = %caller.subject,
            operation,
            required = %self.required,
            "Caller lacks required capability"
        );
        Err(ScanError::unauthorized("Unauthorized user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_authorized() {
        let guard = CapabilityGuard::default();
        assert!(guard.authorize(&Caller::operator("editor"), "scan").is_ok());
    }

    #[test]
    fn test_missing_capability_rejected() {
        let guard = CapabilityGuard::default();
        let caller = Caller::new("viewer", ["read_media"]);

        let err = guard.authorize(&caller, "scan").unwrap_err();
        assert!(matches!(err, ScanError::Unauthorized(_)));
        assert!(guard.authorize(&Caller::anonymous(), "flag").is_err());
    }

    #[test]
    fn test_custom_capability() {
        let guard = CapabilityGuard::new("audit");
        assert_eq!(guard.required(), "audit");
        assert!(guard.authorize(&Caller::new("a", ["audit"]), "list").is_ok());
        assert!(guard.authorize(&Caller::operator("b"), "list").is_err());
    }
}
