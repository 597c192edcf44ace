//! Recording adapter for the `VisionNamer` port.

use std::sync::{Arc, Mutex};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::NamingError;
use crate::ports::vision_namer::{NamingRequest, SuggestFuture, VisionNamer};

/// Records naming calls while delegating to an inner implementation.
pub struct RecordingVisionNamer {
    inner: Box<dyn VisionNamer>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingVisionNamer {
    /// Wrap `inner`, recording every call into `recorder`.
    pub fn new(inner: Box<dyn VisionNamer>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl VisionNamer for RecordingVisionNamer {
    fn suggest_name(
        &self,
        request: &NamingRequest,
        cancel: CancellationToken,
    ) -> SuggestFuture<'_> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let mut pending = PendingCall {
                recorder,
                request: request_clone,
                started: Instant::now(),
                finished: false,
            };
            let result = self.inner.suggest_name(&pending.request, cancel).await;
            pending.finish(&result);
            result
        })
    }
}

/// One in-flight call. A call dropped before it resolves (timeout or caller
/// cancellation) is still recorded, as `Cancelled`, so replay keeps the same
/// attempt sequence and latency.
struct PendingCall {
    recorder: Arc<Mutex<CassetteRecorder>>,
    request: NamingRequest,
    started: Instant,
    finished: bool,
}

impl PendingCall {
    fn finish(&mut self, result: &Result<String, NamingError>) {
        self.finished = true;
        record_result(
            &self.recorder,
            "vision_namer",
            "suggest_name",
            &self.request,
            result,
            self.started.elapsed(),
        );
    }
}

impl Drop for PendingCall {
    fn drop(&mut self) {
        if !self.finished {
            self.finish(&Err(NamingError::Cancelled));
        }
    }
}
