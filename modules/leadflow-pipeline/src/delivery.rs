use std::time::Duration;

use tracing::{info, warn};

use crate::traits::{DeliveryBackend, Throttle};
use crate::types::{DeliveryReport, DeliveryResult, EnrichedContact};

/// Pushes contacts to the campaign: one bulk upload, then one-by-one if that fails.
/// Never errors; failures end up in the report's counts.
pub struct DeliverySubmitter<'a> {
    backend: &'a dyn DeliveryBackend,
    throttle: &'a dyn Throttle,
    pacing: Duration,
}

impl<'a> DeliverySubmitter<'a> {
    pub fn new(
        backend: &'a dyn DeliveryBackend,
        throttle: &'a dyn Throttle,
        pacing: Duration,
    ) -> Self {
        Self {
            backend,
            throttle,
            pacing,
        }
    }

    pub async fn submit(&self, contacts: &[EnrichedContact]) -> DeliveryReport {
        if contacts.is_empty() {
            return DeliveryReport::default();
        }

        match self.backend.submit_bulk(contacts).await {
            Ok(counts) => {
                let report = DeliveryReport {
                    added: counts.added.unwrap_or(contacts.len() as u32),
                    failed: counts.failed.unwrap_or(0),
                    outcomes: Vec::new(),
                };
                info!(added = report.added, failed = report.failed, "Bulk upload complete");
                report
            }
            Err(e) => {
                warn!(
                    error = %e,
                    count = contacts.len(),
                    "Bulk upload failed, submitting one by one"
                );
                self.submit_individually(contacts).await
            }
        }
    }

    async fn submit_individually(&self, contacts: &[EnrichedContact]) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for (i, contact) in contacts.iter().enumerate() {
            if i > 0 {
                self.throttle.pause(self.pacing).await;
            }

            let outcome = match self.backend.submit_one(contact).await {
                Ok(()) => {
                    report.added += 1;
                    DeliveryResult {
                        success: true,
                        email: contact.email.clone(),
                        error: None,
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(email = contact.email.as_str(), error = %e, "Lead upload failed");
                    DeliveryResult {
                        success: false,
                        email: contact.email.clone(),
                        error: Some(e.to_string()),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        info!(
            added = report.added,
            failed = report.failed,
            "Individual upload complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::types::BulkCounts;

    const PACING: Duration = Duration::from_millis(200);

    fn contacts(n: usize) -> Vec<EnrichedContact> {
        (0..n).map(|i| contact(&format!("lead{i}@acme.com"))).collect()
    }

    #[tokio::test]
    async fn bulk_success_without_counts_reports_all_added() {
        let backend = MockDelivery::new();
        let throttle = RecordingThrottle::new();
        let submitter = DeliverySubmitter::new(&backend, &throttle, PACING);

        let report = submitter.submit(&contacts(4)).await;

        assert_eq!(report.added, 4);
        assert_eq!(report.failed, 0);
        assert!(!report.used_fallback());
        assert_eq!(backend.bulk_calls().len(), 1);
        assert!(backend.single_calls().is_empty());
    }

    #[tokio::test]
    async fn bulk_success_uses_reported_counts() {
        let backend = MockDelivery::new().bulk_reports(BulkCounts {
            added: Some(3),
            failed: Some(1),
        });
        let throttle = RecordingThrottle::new();
        let submitter = DeliverySubmitter::new(&backend, &throttle, PACING);

        let report = submitter.submit(&contacts(4)).await;

        assert_eq!((report.added, report.failed), (3, 1));
    }

    #[tokio::test]
    async fn bulk_failure_falls_back_to_one_call_per_contact() {
        let backend = MockDelivery::new()
            .bulk_fails("422 validation error")
            .rejects("lead1@acme.com")
            .rejects("lead3@acme.com");
        let throttle = RecordingThrottle::new();
        let submitter = DeliverySubmitter::new(&backend, &throttle, PACING);
        let batch = contacts(5);

        let report = submitter.submit(&batch).await;

        assert_eq!(backend.single_calls().len(), 5);
        assert_eq!(report.added + report.failed, 5);
        assert_eq!(report.failed, 2);
        assert!(report.used_fallback());
        let failed: Vec<_> = report
            .outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.email.as_str())
            .collect();
        assert_eq!(failed, vec!["lead1@acme.com", "lead3@acme.com"]);
        assert!(report.outcomes[1].error.as_deref().unwrap_or("").contains("rejected"));
        assert_eq!(throttle.pauses(), vec![PACING; 4]);
    }

    #[tokio::test]
    async fn empty_contact_list_submits_nothing() {
        let backend = MockDelivery::new();
        let throttle = RecordingThrottle::new();
        let submitter = DeliverySubmitter::new(&backend, &throttle, PACING);

        let report = submitter.submit(&[]).await;

        assert_eq!(report, DeliveryReport::default());
        assert!(backend.bulk_calls().is_empty());
    }
}
