// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::channel::Subscriber;
use crate::errors::Result;
use crate::exec::{CommandRunner, Dispatcher};
use crate::shutdown::{Detach, ShutdownCoordinator};
use crate::stream::Stream;

use super::{RunSummary, StreamReport};

/// How long consumers may keep draining after a shutdown request before
/// they are aborted.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Drives every configured stream until nothing is left to watch.
///
/// One consumer task per stream reads lines from its subscriber, matches them
/// and dispatches commands. The runtime returns once the shutdown coordinator
/// reports that the last subscriber detached.
pub struct Runtime<R> {
    streams: Vec<Arc<Stream>>,
    dispatcher: Arc<Dispatcher<R>>,
    coordinator: ShutdownCoordinator,
    shutdown_grace: Duration,
}

impl<R> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("streams", &self.streams)
            .field("coordinator", &self.coordinator)
            .field("shutdown_grace", &self.shutdown_grace)
            .finish_non_exhaustive()
    }
}

impl<R> Runtime<R>
where
    R: CommandRunner + 'static,
{
    pub fn new(streams: Vec<Stream>, dispatcher: Dispatcher<R>) -> Self {
        Self::with_coordinator(streams, dispatcher, ShutdownCoordinator::new())
    }

    pub fn with_coordinator(
        streams: Vec<Stream>,
        dispatcher: Dispatcher<R>,
        coordinator: ShutdownCoordinator,
    ) -> Self {
        Self {
            streams: streams.into_iter().map(Arc::new).collect(),
            dispatcher: Arc::new(dispatcher),
            coordinator,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    /// Override how long consumers may drain after shutdown is requested.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn streams(&self) -> &[Arc<Stream>] {
        &self.streams
    }

    pub fn coordinator(&self) -> &ShutdownCoordinator {
        &self.coordinator
    }

    /// Run until every stream is exhausted.
    pub async fn run(self) -> Result<RunSummary> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run until every stream is exhausted or `shutdown` resolves.
    ///
    /// On shutdown every stream's channel is closed and the consumers are
    /// allowed to drain what was already queued. Consumers still busy after
    /// the shutdown grace are aborted, which kills any running command;
    /// their reports are left out of the summary.
    pub async fn run_until<F>(self, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()> + Send,
    {
        if self.streams.is_empty() {
            info!("no streams configured; nothing to watch");
            return Ok(RunSummary::default());
        }

        info!(streams = self.streams.len(), "streammon runtime started");

        let mut consumers = JoinSet::new();
        for (index, stream) in self.streams.iter().enumerate() {
            let subscriber = stream.attach(&self.coordinator);
            consumers.spawn(watch_stream(
                index,
                Arc::clone(stream),
                subscriber,
                Arc::clone(&self.dispatcher),
            ));
        }

        tokio::pin!(shutdown);
        let mut reports = Vec::with_capacity(self.streams.len());

        tokio::select! {
            _ = self.coordinator.wait_idle() => {
                debug!("all subscribers detached");
                collect_reports(&mut consumers, &mut reports).await?;
            }
            _ = &mut shutdown => {
                info!("shutdown requested; closing all streams");
                for stream in &self.streams {
                    stream.close();
                }

                let drained = tokio::time::timeout(
                    self.shutdown_grace,
                    collect_reports(&mut consumers, &mut reports),
                )
                .await;

                match drained {
                    Ok(joined) => joined?,
                    Err(_) => {
                        warn!(
                            pending = consumers.len(),
                            grace = ?self.shutdown_grace,
                            "consumers still busy after shutdown grace; aborting"
                        );
                        consumers.abort_all();
                        while let Some(joined) = consumers.join_next().await {
                            match joined {
                                Ok(report) => reports.push(report),
                                Err(e) if e.is_cancelled() => {}
                                Err(e) => {
                                    return Err(anyhow!("stream consumer task failed: {e}").into());
                                }
                            }
                        }
                    }
                }
            }
        }

        reports.sort_by_key(|r| r.index);

        info!("no more files to watch, closing");
        Ok(RunSummary { streams: reports })
    }
}

async fn collect_reports(
    consumers: &mut JoinSet<StreamReport>,
    reports: &mut Vec<StreamReport>,
) -> Result<()> {
    while let Some(joined) = consumers.join_next().await {
        let report = joined.map_err(|e| anyhow!("stream consumer task failed: {e}"))?;
        reports.push(report);
    }
    Ok(())
}

/// Consumer loop for one stream: match every received line and dispatch.
///
/// Dispatch failures are logged and matching continues. The subscriber is
/// detached once the channel closes.
pub async fn watch_stream<R>(
    index: usize,
    stream: Arc<Stream>,
    mut subscriber: Subscriber,
    dispatcher: Arc<Dispatcher<R>>,
) -> StreamReport
where
    R: CommandRunner,
{
    let mut report = StreamReport::new(index, stream.name());

    while let Some(line) = subscriber.recv().await {
        report.lines += 1;
        match dispatcher.dispatch(&stream, &line).await {
            Ok(Some(_)) => report.matched += 1,
            Ok(None) => {}
            Err(err) => {
                report.matched += 1;
                report.failed += 1;
                error!(
                    stream = %stream.name(),
                    command = %stream.command(),
                    error = %err,
                    "error exec command"
                );
            }
        }
    }

    match subscriber.detach() {
        Detach::Last => info!(stream = %stream.name(), "stream closed; it was the last one"),
        Detach::Remaining(n) => {
            info!(stream = %stream.name(), remaining = n, "stream closed")
        }
    }

    report
}
