//! Replaying adapter for the `VisionNamer` port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{next_interaction, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::error::NamingError;
use crate::ports::vision_namer::{NamingRequest, SuggestFuture, VisionNamer};

/// Serves recorded naming results from a cassette.
///
/// The recorded latency is replayed as a cancellable delay, so a call that
/// timed out live times out again under the same configuration.
pub struct ReplayingVisionNamer {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingVisionNamer {
    /// Create a replaying namer backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl VisionNamer for ReplayingVisionNamer {
    fn suggest_name(
        &self,
        _request: &NamingRequest,
        cancel: CancellationToken,
    ) -> SuggestFuture<'_> {
        let interaction = next_interaction(&self.replayer, "vision_namer", "suggest_name");
        Box::pin(async move {
            let interaction = interaction?;
            let delay = Duration::from_millis(interaction.elapsed_ms);
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(NamingError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }

            match replay_result::<String>(interaction.output) {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(message)) => Err(NamingError::Api { status: 0, body: message }),
                Err(e) => Err(NamingError::Config(format!("malformed cassette output: {e}"))),
            }
        })
    }
}
