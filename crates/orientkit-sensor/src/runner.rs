//! Async polling loop driving a pipeline from a sample source

use std::time::Duration;

use anyhow::{Context, Result};
use orientkit_core::{Clock, GravityVector, OrientationState};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::indicator::{DeviceIndicator, IndicatorEvent};
use crate::level::{LevelEvent, LevelIndicator};
use crate::sampler::OrientationSampler;
use crate::source::{RawOrientationSample, SampleSource};

/// A stateful consumer of periodic sensor samples
pub trait Pipeline: Send + 'static {
    type Sample: Send + 'static;
    type Event: Send + 'static;

    /// How often the sensor should be polled
    fn update_interval(&self) -> Duration;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Process one poll; `None` means the sensor had no reading
    fn tick(&mut self, sample: Option<Self::Sample>, now_ms: u64) -> Vec<Self::Event>;
}

/// Receiver of pipeline events
pub trait EventSink<E>: Send + 'static {
    fn emit(&mut self, event: E);
}

impl<E, F> EventSink<E> for F
where
    F: FnMut(E) + Send + 'static,
{
    fn emit(&mut self, event: E) {
        self(event)
    }
}

impl<E: Send + 'static> EventSink<E> for mpsc::UnboundedSender<E> {
    fn emit(&mut self, event: E) {
        // Receiver gone means nobody is listening any more.
        let _ = self.send(event);
    }
}

impl Pipeline for OrientationSampler {
    type Sample = RawOrientationSample;
    type Event = OrientationState;

    fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms())
    }

    fn is_enabled(&self) -> bool {
        OrientationSampler::is_enabled(self)
    }

    fn set_enabled(&mut self, enabled: bool) {
        OrientationSampler::set_enabled(self, enabled)
    }

    fn tick(&mut self, sample: Option<RawOrientationSample>, now_ms: u64) -> Vec<OrientationState> {
        OrientationSampler::tick(self, sample, now_ms).into_iter().collect()
    }
}

impl Pipeline for DeviceIndicator {
    type Sample = RawOrientationSample;
    type Event = IndicatorEvent;

    fn update_interval(&self) -> Duration {
        Duration::from_millis(self.config().update_interval_ms)
    }

    fn is_enabled(&self) -> bool {
        DeviceIndicator::is_enabled(self)
    }

    fn set_enabled(&mut self, enabled: bool) {
        DeviceIndicator::set_enabled(self, enabled)
    }

    fn tick(&mut self, sample: Option<RawOrientationSample>, now_ms: u64) -> Vec<IndicatorEvent> {
        DeviceIndicator::tick(self, sample, now_ms)
    }
}

impl Pipeline for LevelIndicator {
    type Sample = GravityVector;
    type Event = LevelEvent;

    fn update_interval(&self) -> Duration {
        Duration::from_millis(self.config().update_interval_ms)
    }

    fn is_enabled(&self) -> bool {
        LevelIndicator::is_enabled(self)
    }

    fn set_enabled(&mut self, enabled: bool) {
        LevelIndicator::set_enabled(self, enabled)
    }

    fn tick(&mut self, sample: Option<GravityVector>, now_ms: u64) -> Vec<LevelEvent> {
        LevelIndicator::tick(self, sample, now_ms)
    }
}

/// Control handle for a running polling task.
///
/// Dropping the handle stops the task; [`PollingHandle::shutdown`] also waits
/// for it so no event is emitted afterwards.
pub struct PollingHandle {
    enabled_tx: watch::Sender<bool>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollingHandle {
    /// Pause or resume polling. Resuming starts from the next tick.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled_tx.send_replace(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled_tx.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Stop polling and wait for the task to exit
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.context("Polling task failed")?;
        }
        Ok(())
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawn a task polling `source` at the pipeline's update interval and
/// forwarding every event to `sink`, in order.
///
/// Must be called from within a tokio runtime.
pub fn spawn_pipeline<P, S, C, K>(pipeline: P, source: S, clock: C, sink: K) -> PollingHandle
where
    P: Pipeline,
    S: SampleSource<P::Sample>,
    C: Clock + 'static,
    K: EventSink<P::Event>,
{
    let (enabled_tx, enabled_rx) = watch::channel(pipeline.is_enabled());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(poll_loop(pipeline, source, clock, sink, enabled_rx, shutdown_rx));

    PollingHandle {
        enabled_tx,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    }
}

/// Spawn the 3D device indicator
pub fn spawn_indicator<S, C, K>(indicator: DeviceIndicator, source: S, clock: C, sink: K) -> PollingHandle
where
    S: SampleSource<RawOrientationSample>,
    C: Clock + 'static,
    K: EventSink<IndicatorEvent>,
{
    spawn_pipeline(indicator, source, clock, sink)
}

/// Spawn the bubble level
pub fn spawn_level<S, C, K>(level: LevelIndicator, source: S, clock: C, sink: K) -> PollingHandle
where
    S: SampleSource<GravityVector>,
    C: Clock + 'static,
    K: EventSink<LevelEvent>,
{
    spawn_pipeline(level, source, clock, sink)
}

async fn poll_loop<P, S, C, K>(
    mut pipeline: P,
    source: S,
    clock: C,
    mut sink: K,
    mut enabled_rx: watch::Receiver<bool>,
    mut shutdown_rx: oneshot::Receiver<()>,
) where
    P: Pipeline,
    S: SampleSource<P::Sample>,
    C: Clock,
    K: EventSink<P::Event>,
{
    let period = pipeline.update_interval().max(Duration::from_millis(1));
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut enabled = *enabled_rx.borrow_and_update();
    pipeline.set_enabled(enabled);
    info!(period_ms = period.as_millis() as u64, enabled, "Sensor polling started");

    loop {
        tokio::select! {
            biased;

            // Fires on an explicit shutdown and when the handle is dropped.
            _ = &mut shutdown_rx => break,

            changed = enabled_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let now_enabled = *enabled_rx.borrow_and_update();
                if now_enabled != enabled {
                    enabled = now_enabled;
                    pipeline.set_enabled(enabled);
                    if enabled {
                        ticker.reset();
                    }
                    debug!(enabled, "Sensor polling toggled");
                }
            }

            _ = ticker.tick(), if enabled => {
                let sample = source.latest();
                for event in pipeline.tick(sample, clock.now_ms()) {
                    sink.emit(event);
                }
            }
        }
    }

    info!("Sensor polling stopped");
}
