//! Statistics aggregation over paged task ID queries.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use vivo_core::{
    PageFailure, PushError, StatisticRecord, StatisticsEvent, StatisticsReply, StatisticsReport,
    TaskIds, TokenPurpose,
};

use crate::gateway::Gateway;
use crate::{GatewayCall, Transport, chunk};

/// Query parameter carrying the comma-joined task IDs.
const TASK_IDS_PARAM: &str = "taskIds";

/// Sums delivery statistics across pages of task IDs.
pub struct StatisticsAggregator<T> {
    gateway: Arc<Gateway<T>>,
}

impl<T> Clone for StatisticsAggregator<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<T: Transport> StatisticsAggregator<T> {
    pub(crate) fn new(gateway: Arc<Gateway<T>>) -> Self {
        Self { gateway }
    }

    /// Aggregate statistics for `task_ids`.
    ///
    /// Pages are queried one after another. A failed page is recorded on the
    /// report and skipped; it never aborts the aggregation.
    pub async fn get_statistics(
        &self,
        task_ids: TaskIds,
        subscriber: Option<UnboundedSender<StatisticsEvent>>,
    ) -> StatisticsReport {
        let pages = chunk(task_ids.as_slice(), self.gateway.config.statistic_max_num);
        let mut report = StatisticsReport {
            page_count: pages.len(),
            ..Default::default()
        };

        for (page, ids) in pages.into_iter().enumerate() {
            match self.fetch_page(&ids).await {
                Ok(records) => {
                    tracing::debug!(page, records = records.len(), "statistics page fetched");
                    for record in records {
                        report.totals += &record.counts;
                        report.tasks.push(record);
                    }
                }
                Err(error) => {
                    tracing::warn!(page, error = %error, "statistics page failed");
                    let failure = PageFailure {
                        page,
                        task_ids: ids,
                        error,
                    };
                    if let Some(subscriber) = &subscriber {
                        let _ = subscriber.send(StatisticsEvent::PageFailed(failure.clone()));
                    }
                    report.failures.push(failure);
                }
            }
        }

        tracing::info!(
            tasks = task_ids.len(),
            pages = report.page_count,
            failed_pages = report.failures.len(),
            send = report.totals.send,
            "statistics aggregated"
        );

        if let Some(subscriber) = subscriber {
            let _ = subscriber.send(StatisticsEvent::Finished(report.clone()));
        }

        report
    }

    /// Aggregate statistics for task IDs given as JSON: a comma-joined string
    /// or an array of strings.
    pub async fn get_statistics_json(
        &self,
        task_ids: &serde_json::Value,
    ) -> Result<StatisticsReport, PushError> {
        let task_ids = TaskIds::from_json(task_ids)?;
        Ok(self.get_statistics(task_ids, None).await)
    }

    async fn fetch_page(&self, ids: &[String]) -> Result<Vec<StatisticRecord>, PushError> {
        let token = self.gateway.authorize(TokenPurpose::Statistics).await?;
        let call = GatewayCall::get(&self.gateway.config.statistic_url)
            .with_query(TASK_IDS_PARAM, ids.join(","));

        let reply: StatisticsReply = self.gateway.execute(call, &token).await?;
        Ok(reply.statistics)
    }
}
