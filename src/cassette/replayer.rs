//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// Why a replay request could not be served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// The cassette never recorded this port/method pair.
    #[error("no interactions recorded for {port}::{method}; available: [{available}]")]
    NotRecorded {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Recorded `port::method` pairs.
        available: String,
    },

    /// Every recorded call for this pair has been served.
    #[error("cassette exhausted: all {count} interactions for {port}::{method} consumed")]
    Exhausted {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// How many were recorded.
        count: usize,
    },
}

/// Serves interactions in recorded order, one queue per port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
    served: HashMap<(String, String), usize>,
}

impl CassetteReplayer {
    /// Create a replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        let mut ordered = cassette.interactions.clone();
        ordered.sort_by_key(|i| i.seq);
        for interaction in ordered {
            let key = (interaction.port.clone(), interaction.method.clone());
            queues.entry(key).or_default().push_back(interaction);
        }
        Self { queues, served: HashMap::new() }
    }

    /// Take the next interaction for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] when the pair was never recorded or its
    /// recordings are used up.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<Interaction, ReplayError> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(ReplayError::NotRecorded {
                port: key.0,
                method: key.1,
                available: available.join(", "),
            });
        };

        let served = self.served.entry(key.clone()).or_insert(0);
        match queue.pop_front() {
            Some(interaction) => {
                *served += 1;
                Ok(interaction)
            }
            None => Err(ReplayError::Exhausted { port: key.0, method: key.1, count: *served }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: "vision_namer".into(),
            method: "suggest_name".into(),
            input: json!({}),
            output,
            elapsed_ms: 0,
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions }
    }

    #[test]
    fn replay_in_seq_order() {
        let cassette = make_cassette(vec![
            interaction(1, json!({"Ok": "second"})),
            interaction(0, json!({"Ok": "first"})),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        let first = replayer.next_interaction("vision_namer", "suggest_name").unwrap();
        assert_eq!(first.output, json!({"Ok": "first"}));
        let second = replayer.next_interaction("vision_namer", "suggest_name").unwrap();
        assert_eq!(second.seq, 1);
    }

    #[test]
    fn exhausted_replayer_errors() {
        let cassette = make_cassette(vec![interaction(0, json!({"Ok": "only"}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        assert!(replayer.next_interaction("vision_namer", "suggest_name").is_ok());

        let err = replayer.next_interaction("vision_namer", "suggest_name").unwrap_err();
        assert!(matches!(err, ReplayError::Exhausted { count: 1, .. }));
        assert!(err.to_string().contains("cassette exhausted"));
    }

    #[test]
    fn unknown_port_lists_available_pairs() {
        let cassette = make_cassette(vec![interaction(0, json!(null))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("unknown", "method").unwrap_err();
        assert!(err.to_string().contains("vision_namer::suggest_name"));
    }
}
