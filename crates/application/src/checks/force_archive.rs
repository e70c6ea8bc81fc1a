use async_trait::async_trait;
use kpi_check_domain::{Assertion, RequestSpec, is_truthy};

use super::Check;
use crate::error::{ApplicationError, ApplicationResult};
use crate::session::KpiSession;

/// Outcome reported by `POST /admin/force-archive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The current period was archived before.
    AlreadyArchived,
    /// The period was archived by this call.
    Archived,
}

impl ArchiveOutcome {
    /// Classifies an archive message, case-insensitively.
    #[must_use]
    pub fn from_message(message: &str) -> Option<Self> {
        let message = message.to_lowercase();
        if message.contains("already archived") {
            Some(Self::AlreadyArchived)
        } else if message.contains("successfully archived") {
            Some(Self::Archived)
        } else {
            None
        }
    }
}

/// Manual archiving reports either an existing or a new archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceArchive;

#[async_trait]
impl Check for ForceArchive {
    fn name(&self) -> &'static str {
        "Force Archive"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Force Archive...");

        let request = RequestSpec::post("/admin/force-archive");
        let result = session
            .check_json(
                &request,
                [Assertion::status(200), Assertion::truthy("$.message")],
            )
            .await?;

        let message = result
            .get("message")
            .map(|m| m.as_str().map_or_else(|| m.to_string(), ToString::to_string))
            .unwrap_or_default();
        match ArchiveOutcome::from_message(&message) {
            Some(ArchiveOutcome::AlreadyArchived) => {
                tracing::info!(
                    "✅ POST /admin/force-archive correctly reports already archived period"
                );
                Ok(())
            }
            Some(ArchiveOutcome::Archived) => {
                tracing::info!("✅ POST /admin/force-archive successfully archived period");
                if result.get("period").is_some_and(is_truthy) {
                    Ok(())
                } else {
                    Err(ApplicationError::check_failed(
                        request.describe(),
                        "Successful archive missing period data",
                    ))
                }
            }
            None => Err(ApplicationError::check_failed(
                request.describe(),
                format!("Unexpected force archive message: {message}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classifies_messages() {
        assert_eq!(
            ArchiveOutcome::from_message("Period 2025-06-01_to_2025-06-14 Already Archived"),
            Some(ArchiveOutcome::AlreadyArchived)
        );
        assert_eq!(
            ArchiveOutcome::from_message("Successfully archived period"),
            Some(ArchiveOutcome::Archived)
        );
        assert_eq!(ArchiveOutcome::from_message("queued"), None);
    }
}
