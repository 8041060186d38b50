use crate::application::{
    ServiceDependencies,
    loan::{Result, notify_late_loans},
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};

use super::DailySchedule;

/// Daily late loan e-mail job
///
/// Runs are single-flight: a trigger that arrives while a run is still in
/// progress is skipped, never executed concurrently.
pub struct OverdueNotifierJob {
    deps: ServiceDependencies,
    message: String,
    in_flight: Mutex<()>,
}

impl OverdueNotifierJob {
    pub fn new(deps: ServiceDependencies, message: impl Into<String>) -> Self {
        Self {
            deps,
            message: message.into(),
            in_flight: Mutex::new(()),
        }
    }

    /// Run the job once for `today`
    ///
    /// Returns `Ok(None)` when another run holds the guard,
    /// otherwise the number of notified addresses.
    pub async fn run_once(&self, today: NaiveDate) -> Result<Option<usize>> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::warn!("Late loan notification already running; skipping this trigger");
            return Ok(None);
        };

        notify_late_loans(&self.deps, &self.message, today)
            .await
            .map(Some)
    }
}

/// Spawn the job on its daily schedule
///
/// The task owns the loop; a failed run is logged and the next trigger still fires.
pub fn spawn_overdue_notifier(
    job: Arc<OverdueNotifierJob>,
    schedule: DailySchedule,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let next = schedule.next_after(now);
            tracing::debug!(next_run = %next, "Late loan notification scheduled");

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            match job.run_once(Utc::now().date_naive()).await {
                Ok(Some(notified)) => {
                    tracing::info!(notified, "Late loan notification run finished")
                }
                Ok(None) => {}
                Err(e) => tracing::error!(error = ?e, "Late loan notification run failed"),
            }
        }
    })
}
