//! Pull-style access to the most recent sensor reading

use orientkit_core::Quaternion;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Raw rotation-vector reading as delivered by the platform sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawOrientationSample {
    pub qw: f64,
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
}

impl RawOrientationSample {
    pub fn new(qw: f64, qx: f64, qy: f64, qz: f64) -> Self {
        Self { qw, qx, qy, qz }
    }

    pub fn quaternion(&self) -> Quaternion {
        Quaternion::new(self.qw, self.qx, self.qy, self.qz)
    }
}

impl From<Quaternion> for RawOrientationSample {
    fn from(q: Quaternion) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

/// Something that can report its latest sample.
///
/// `None` means the sensor is currently unavailable.
pub trait SampleSource<T>: Send + Sync + 'static {
    fn latest(&self) -> Option<T>;
}

impl<T, F> SampleSource<T> for F
where
    F: Fn() -> Option<T> + Send + Sync + 'static,
{
    fn latest(&self) -> Option<T> {
        self()
    }
}

/// Receiving half of a push-updated sensor value
#[derive(Debug, Clone)]
pub struct LatestSample<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T> SampleSource<T> for LatestSample<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn latest(&self) -> Option<T> {
        self.rx.borrow().clone()
    }
}

/// Create a channel whose sender publishes readings and whose receiver can be polled.
///
/// Starts out empty (sensor unavailable).
pub fn sample_channel<T>() -> (watch::Sender<Option<T>>, LatestSample<T>) {
    let (tx, rx) = watch::channel(None);
    (tx, LatestSample { rx })
}

/// Source that always reports the same reading
#[derive(Debug, Clone)]
pub struct FixedSource<T>(pub Option<T>);

impl<T> SampleSource<T> for FixedSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn latest(&self) -> Option<T> {
        self.0.clone()
    }
}
