//! Delivery routing: single, bulk and broadcast paths.

use std::sync::Arc;

use vivo_core::{
    BatchSendRequest, BroadcastRequest, DeliveryReport, DeliveryStatus, GatewayReply, PushError,
    PushRequest, Route, TokenPurpose,
};

use crate::events::EventLog;
use crate::gateway::Gateway;
use crate::{Dispatcher, GatewayCall, Transport, chunk};

/// Chooses a delivery path by recipient count and assembles the report.
pub struct DeliveryRouter<T> {
    gateway: Arc<Gateway<T>>,
}

impl<T> Clone for DeliveryRouter<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

/// Running totals for a bulk push.
struct BulkTally {
    success_total: u64,
    fail_total: u64,
    log: EventLog,
}

impl<T: Transport + 'static> DeliveryRouter<T> {
    pub(crate) fn new(gateway: Arc<Gateway<T>>) -> Self {
        Self { gateway }
    }

    /// Deliver to the request's recipients.
    ///
    /// Zero or one recipient goes through the single-send endpoint, two or more
    /// through save-message plus batched bulk sends. Never fails: errors are
    /// reported as failure events on the returned report.
    pub async fn deliver(&self, request: PushRequest) -> DeliveryReport {
        if request.recipients.len() <= 1 {
            self.deliver_single(request).await
        } else {
            self.deliver_bulk(request).await
        }
    }

    /// Deliver to the application's whole audience.
    pub async fn broadcast(&self, request: BroadcastRequest) -> DeliveryReport {
        let config = &self.gateway.config;
        let mut log = EventLog::new(request.subscriber);
        let mut report = DeliveryReport::new(Route::Broadcast, config.max_length);

        let token = match self.gateway.authorize(TokenPurpose::Broadcast).await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "broadcast aborted: authentication failed");
                report.status = DeliveryStatus::Aborted;
                log.error(e);
                return log.finish(report);
            }
        };

        let request_id = serde_json::Value::from(vivo_core::request_id());
        let body = request.payload.to_body_with([("requestId", request_id)]);
        let call = GatewayCall::post(&config.push_all_url, body);
        report.batch_count = 1;

        match self.gateway.execute::<GatewayReply>(call, &token).await {
            Ok(reply) => {
                tracing::info!(task_id = ?reply.task_id, "broadcast accepted");
                report.task_id = reply.task_id.clone();
                log.success(reply);
            }
            Err(e) => {
                tracing::warn!(error = %e, "broadcast failed");
                log.error(e);
            }
        }

        log.finish(report)
    }

    async fn deliver_single(&self, request: PushRequest) -> DeliveryReport {
        let config = &self.gateway.config;
        let mut log = EventLog::new(request.subscriber);
        let mut report = DeliveryReport::new(Route::Single, config.max_length);

        let token = match self.gateway.authorize(TokenPurpose::Single).await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "single push aborted: authentication failed");
                report.status = DeliveryStatus::Aborted;
                report.fail_total = 1;
                log.error(e);
                return log.finish(report);
            }
        };

        let mut extra: Vec<(&str, serde_json::Value)> =
            vec![("requestId", vivo_core::request_id().into())];
        if let Some(reg_id) = request.recipients.first() {
            extra.push(("regId", reg_id.clone().into()));
        }
        let body = request.payload.to_body_with(extra);
        let call = GatewayCall::post(&config.push_single_url, body);
        report.batch_count = 1;

        match self.gateway.execute::<GatewayReply>(call, &token).await {
            Ok(reply) => {
                tracing::info!(task_id = ?reply.task_id, "single push accepted");
                report.success_total = 1;
                report.task_id = reply.task_id.clone();
                log.success(reply);
            }
            Err(e) => {
                tracing::warn!(error = %e, "single push failed");
                report.fail_total = 1;
                log.error(e);
            }
        }

        log.finish(report)
    }

    async fn deliver_bulk(&self, request: PushRequest) -> DeliveryReport {
        let config = &self.gateway.config;
        let total = request.recipients.len() as u64;
        let mut log = EventLog::new(request.subscriber);
        let mut report = DeliveryReport::new(Route::Bulk, config.max_length);

        let (token, task_id) = match self.prepare_bulk(&request.payload).await {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    recipients = total,
                    "bulk push aborted before dispatch"
                );
                report.status = DeliveryStatus::Aborted;
                report.fail_total = total;
                log.error(e);
                return log.finish(report);
            }
        };

        let batches = chunk(&request.recipients, config.max_length);
        let sizes: Vec<u64> = batches.iter().map(|b| b.len() as u64).collect();
        report.batch_count = batches.len();
        report.task_id = Some(task_id.clone());

        tracing::info!(
            task_id = %task_id,
            recipients = total,
            batches = batches.len(),
            "dispatching bulk push"
        );

        let tally = BulkTally {
            success_total: 0,
            fail_total: 0,
            log,
        };

        let tally = Dispatcher::new(request.pacing)
            .dispatch_all(
                batches,
                |index, reg_ids| {
                    let gateway = Arc::clone(&self.gateway);
                    let token = token.clone();
                    let task_id = task_id.clone();
                    async move {
                        tracing::debug!(batch = index, size = reg_ids.len(), "sending batch");
                        let body = vivo_core::to_body(&BatchSendRequest {
                            task_id,
                            reg_ids,
                            request_id: vivo_core::request_id(),
                        })?;
                        let call = GatewayCall::post(&gateway.config.push_url, body);
                        gateway.execute::<GatewayReply>(call, &token).await
                    }
                },
                tally,
                |tally, index, result| {
                    let size = sizes[index];
                    match result {
                        Ok(reply) => {
                            let invalid: Vec<String> = reply
                                .invalid_users()
                                .iter()
                                .map(|u| u.reg_id().to_string())
                                .collect();
                            let rejected = (invalid.len() as u64).min(size);

                            tally.success_total += size - rejected;
                            tally.fail_total += rejected;
                            tally.log.success(reply);
                            if !invalid.is_empty() {
                                tracing::warn!(
                                    batch = index,
                                    invalid = invalid.len(),
                                    "gateway reported invalid recipients"
                                );
                                tally.log.invalid_recipients(invalid);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(batch = index, size, error = %e, "batch failed");
                            tally.fail_total += size;
                            tally.log.error(e);
                        }
                    }
                },
            )
            .await;

        report.success_total = tally.success_total;
        report.fail_total = tally.fail_total;

        tracing::info!(
            task_id = ?report.task_id,
            success = report.success_total,
            fail = report.fail_total,
            "bulk push finished"
        );

        tally.log.finish(report)
    }

    /// Authenticate and save the message, yielding the token and task ID.
    async fn prepare_bulk(
        &self,
        payload: &vivo_core::Payload,
    ) -> Result<(String, String), PushError> {
        let token = self.gateway.authorize(TokenPurpose::Bulk).await?;

        let request_id = serde_json::Value::from(vivo_core::request_id());
        let body = payload.to_body_with([("requestId", request_id)]);
        let call = GatewayCall::post(&self.gateway.config.save_message_url, body);
        let reply: GatewayReply = self.gateway.execute(call, &token).await?;

        let task_id = reply
            .task_id
            .ok_or_else(|| PushError::Decode("save message reply carried no taskId".to_string()))?;

        Ok((token, task_id))
    }
}
