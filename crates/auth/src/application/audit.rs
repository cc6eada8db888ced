//! Audit Recorder
//!
//! Best-effort append of security-relevant events. Audit is
//! observability, not a correctness gate: when the append fails the
//! parent operation has already applied its primary effect and must
//! still report success, so failures are logged and swallowed here.

use kernel::id::IdentityId;

use crate::domain::entity::{AuditEvent, AuditEventType};
use crate::domain::repository::AuditRepository;

/// Best-effort audit trail writer
pub struct AuditRecorder<A>
where
    A: AuditRepository,
{
    repo: std::sync::Arc<A>,
}

impl<A> AuditRecorder<A>
where
    A: AuditRepository,
{
    pub fn new(repo: std::sync::Arc<A>) -> Self {
        Self { repo }
    }

    /// Append one event; never fails the caller
    pub async fn record(
        &self,
        identity_id: &IdentityId,
        event_type: AuditEventType,
        ip_address: Option<String>,
    ) {
        let event = AuditEvent::new(*identity_id, event_type, ip_address);

        if let Err(e) = self.repo.append(&event).await {
            tracing::warn!(
                error = %e,
                identity_id = %identity_id,
                event = event.event_type.code(),
                "Audit append failed; primary operation unaffected"
            );
        }
    }
}
