//! Concurrent batch dispatch.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use tokio::task::{JoinError, JoinSet};
use vivo_core::PushError;

/// Runs one task per batch and folds their outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    pacing: Duration,
}

impl Dispatcher {
    /// `pacing` is the delay between starting consecutive batches.
    pub fn new(pacing: Duration) -> Self {
        Self { pacing }
    }

    /// Start `op` for every batch in order and fold each outcome into `init`
    /// as soon as it completes, including while waiting out the pacing delay.
    ///
    /// Batches run concurrently once started. A failing or panicking batch does
    /// not affect its siblings; a panic is folded as [`PushError::Aborted`].
    /// Returns once every batch has been folded exactly once.
    pub async fn dispatch_all<B, R, Op, Fut, Acc, Fold>(
        &self,
        batches: Vec<B>,
        mut op: Op,
        init: Acc,
        mut fold: Fold,
    ) -> Acc
    where
        Op: FnMut(usize, B) -> Fut,
        Fut: Future<Output = Result<R, PushError>> + Send + 'static,
        R: Send + 'static,
        Fold: FnMut(&mut Acc, usize, Result<R, PushError>),
    {
        let total = batches.len();
        let mut set = JoinSet::new();
        let mut pending: BTreeSet<usize> = (0..total).collect();
        let mut acc = init;
        let mut last_panic = None;

        for (index, batch) in batches.into_iter().enumerate() {
            let unit = op(index, batch);
            set.spawn(async move { (index, unit.await) });

            if self.pacing.is_zero() || index + 1 == total {
                continue;
            }

            // Fold whatever finishes while waiting to start the next batch.
            let deadline = tokio::time::Instant::now() + self.pacing;
            loop {
                tokio::select! {
                    () = tokio::time::sleep_until(deadline) => break,
                    Some(joined) = set.join_next(), if !set.is_empty() => {
                        absorb(joined, &mut acc, &mut pending, &mut last_panic, &mut fold);
                    }
                }
            }
        }

        while let Some(joined) = set.join_next().await {
            absorb(joined, &mut acc, &mut pending, &mut last_panic, &mut fold);
        }

        // Panicked tasks never report their index; whatever is left is theirs.
        let reason = last_panic.unwrap_or_else(|| "task did not complete".to_string());
        for index in pending {
            fold(&mut acc, index, Err(PushError::Aborted(reason.clone())));
        }

        acc
    }
}

fn absorb<R, Acc, Fold>(
    joined: Result<(usize, Result<R, PushError>), JoinError>,
    acc: &mut Acc,
    pending: &mut BTreeSet<usize>,
    last_panic: &mut Option<String>,
    fold: &mut Fold,
) where
    Fold: FnMut(&mut Acc, usize, Result<R, PushError>),
{
    match joined {
        Ok((index, result)) => {
            pending.remove(&index);
            fold(acc, index, result);
        }
        Err(e) => {
            tracing::error!(error = %e, "batch task panicked");
            *last_panic = Some(e.to_string());
        }
    }
}
