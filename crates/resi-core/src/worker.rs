//! Runs an estimate on its own thread so the caller stays responsive.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::complex::ComplexValue;
use crate::error::{ResiError, ResiResult};
use crate::estimator::{estimate_residue_with_cancel, ProgressSink, ResidueRequest};
use crate::evaluator::Evaluator;

const THREAD_NAME: &str = "residue-estimate";

/// Smallest progress increment forwarded to the channel.
const PROGRESS_GRANULARITY: f64 = 1e-3;

pub struct EstimateWorker {
    progress: Receiver<f64>,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<ResiResult<ComplexValue>>,
}

impl EstimateWorker {
    pub fn spawn(request: ResidueRequest, evaluator: Arc<dyn Evaluator>) -> ResiResult<Self> {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || {
                debug!(function = %request.function, "estimate worker started");
                let sink = ThrottledSender::new(tx);
                estimate_residue_with_cancel(&request, evaluator.as_ref(), &sink, &flag)
            })?;

        Ok(Self {
            progress: rx,
            cancel,
            handle,
        })
    }

    /// Progress values in `[0, 1]`, ending with `1.0` on success. The channel
    /// closes when the worker finishes.
    pub fn progress(&self) -> &Receiver<f64> {
        &self.progress
    }

    /// Ask the worker to stop before its next sample.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn join(self) -> ResiResult<ComplexValue> {
        self.handle.join().map_err(|_| ResiError::WorkerPanicked)?
    }
}

/// Forwards progress only when it has advanced by at least
/// [`PROGRESS_GRANULARITY`], plus the final `1.0`.
struct ThrottledSender {
    tx: Sender<f64>,
    last: Cell<f64>,
}

impl ThrottledSender {
    fn new(tx: Sender<f64>) -> Self {
        Self {
            tx,
            last: Cell::new(f64::NEG_INFINITY),
        }
    }
}

impl ProgressSink for ThrottledSender {
    fn report(&self, fraction: f64) {
        if fraction >= 1.0 || fraction - self.last.get() >= PROGRESS_GRANULARITY {
            self.last.set(fraction);
            let _ = self.tx.send(fraction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{estimate_residue, NoProgress};
    use crate::expr::BuiltinEvaluator;

    fn make_request(function: &str, digits: u32) -> ResidueRequest {
        ResidueRequest::new(function, ComplexValue::new(0.0, 1.0), 0.5, digits)
    }

    #[test]
    fn test_worker_matches_direct_call() {
        let request = make_request("1/(z^2+1)", 4);
        let direct = estimate_residue(&request, &BuiltinEvaluator, &NoProgress).unwrap();

        let worker = EstimateWorker::spawn(request, Arc::new(BuiltinEvaluator)).unwrap();
        let progress: Vec<f64> = worker.progress().iter().collect();
        let threaded = worker.join().unwrap();

        assert_eq!(direct, threaded);
        assert_eq!(progress.last().copied(), Some(1.0));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        // 10^4 samples throttled to roughly one message per 0.1%
        assert!(progress.len() <= 1002);
    }

    #[test]
    fn test_worker_cancel() {
        let worker =
            EstimateWorker::spawn(make_request("1/(z-I)", 9), Arc::new(BuiltinEvaluator)).unwrap();
        worker.cancel();
        let err = worker.join().unwrap_err();
        assert!(matches!(err, ResiError::Cancelled { .. }));
    }

    #[test]
    fn test_worker_reports_errors() {
        let worker =
            EstimateWorker::spawn(make_request("sin(", 2), Arc::new(BuiltinEvaluator)).unwrap();
        let err = worker.join().unwrap_err();
        assert!(matches!(err, ResiError::MalformedFunction { .. }));
    }

    #[test]
    fn test_throttled_sender_keeps_final_value() {
        let (tx, rx) = mpsc::channel();
        let sink = ThrottledSender::new(tx);
        for i in 0..10_000 {
            sink.report(i as f64 / 10_000.0);
        }
        sink.report(1.0);
        drop(sink);
        let values: Vec<f64> = rx.iter().collect();
        assert_eq!(values.first().copied(), Some(0.0));
        assert_eq!(values.last().copied(), Some(1.0));
        assert!(values.len() < 1_100);
    }
}
