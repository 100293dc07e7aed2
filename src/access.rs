//! Dashboard access control.
//!
//! Who may view analytics is decided by an injected [`AccessPolicy`]
//! rather than by lists compiled into the binary.

use crate::error::SurveyError;

/// Capability check for viewing analytics and exports.
pub trait AccessPolicy {
    fn can_view(&self, viewer: Option<&str>) -> bool;

    /// Return an error unless `viewer` may see analytics.
    fn authorize(&self, viewer: Option<&str>) -> Result<(), SurveyError> {
        if self.can_view(viewer) {
            Ok(())
        } else {
            Err(SurveyError::AccessDenied(
                viewer.unwrap_or("<anonymous>").to_string(),
            ))
        }
    }
}

/// Policy that lets everyone in.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAccess;

impl AccessPolicy for OpenAccess {
    fn can_view(&self, _viewer: Option<&str>) -> bool {
        true
    }
}

/// Policy admitting only listed e-mail addresses (case-insensitive).
#[derive(Debug, Clone)]
pub struct AllowList {
    emails: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }
}

impl AccessPolicy for AllowList {
    fn can_view(&self, viewer: Option<&str>) -> bool {
        match viewer {
            Some(email) => {
                let email = email.trim().to_lowercase();
                self.emails.iter().any(|allowed| *allowed == email)
            }
            None => false,
        }
    }
}

/// Build the policy for a configured allow-list; empty means open access.
pub fn policy_from_config(allowed_viewers: &[String]) -> Box<dyn AccessPolicy> {
    if allowed_viewers.is_empty() {
        Box::new(OpenAccess)
    } else {
        Box::new(AllowList::new(allowed_viewers))
    }
}
