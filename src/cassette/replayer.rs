//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays interactions from a loaded cassette, serving them in recorded
/// order per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut interactions = cassette.interactions.clone();
        interactions.sort_by_key(|i| i.seq);

        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction);
        }
        Self { queues }
    }

    /// Take the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns an error naming the recorded pairs if none is left for this one.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, String> {
        let key = (port.to_string(), method.to_string());
        match self.queues.get_mut(&key) {
            Some(queue) => queue.pop_front().ok_or_else(|| {
                format!("Cassette exhausted: all interactions for {port}::{method} have been consumed")
            }),
            None => {
                let mut available: Vec<String> =
                    self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
                available.sort();
                Err(format!(
                    "Cassette has no interactions recorded for {port}::{method}. \
                     Available: [{}]",
                    available.join(", ")
                ))
            }
        }
    }
}
