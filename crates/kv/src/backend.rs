use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::command::{Command, Reply};
use crate::error::KvError;

#[cfg(feature = "backend-redb")]
pub mod redb_backend;

/// A single shard of the backing key-value store.
///
/// `execute` runs an entire batch of commands as one logical unit: for
/// backends that support it, the whole slice commits in one transaction
/// (spec §5's same-shard atomicity requirement for forward-add +
/// reverse-increment pairs). Implementations must be safe for concurrent
/// use (spec §5: "the KV client must be safe for concurrent use").
pub trait KvBackend: Send + Sync {
    fn execute(&self, commands: &[Command]) -> Result<Vec<Reply>, KvError>;
}

/// In-memory backend, used by default for tests and the demo CLI.
///
/// Grounded on `IndexBackend`/`InMemoryBackend` in the teacher's
/// `crates/index/src/backend.rs`: a single `RwLock`-guarded map, one write
/// lock acquired per batch so the batch observes a consistent view.
#[derive(Default)]
pub struct InMemoryBackend {
    sets: RwLock<HashMap<String, HashSet<String>>>,
    sorted_sets: RwLock<HashMap<String, HashMap<String, f64>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for InMemoryBackend {
    fn execute(&self, commands: &[Command]) -> Result<Vec<Reply>, KvError> {
        let mut sets = self.sets.write().map_err(|_| {
            KvError::Backend("in-memory set store poisoned".to_string())
        })?;
        let mut sorted_sets = self.sorted_sets.write().map_err(|_| {
            KvError::Backend("in-memory sorted-set store poisoned".to_string())
        })?;

        let mut replies = Vec::with_capacity(commands.len());
        for command in commands {
            let reply = match command {
                Command::SAdd { key, member } => {
                    let set = sets.entry(key.clone()).or_default();
                    Reply::Added(set.insert(member.clone()))
                }
                Command::SMembers { key } => {
                    let members = sets
                        .get(key)
                        .map(|s| s.iter().cloned().collect())
                        .unwrap_or_default();
                    Reply::Members(members)
                }
                Command::ZIncrBy { key, member, delta } => {
                    let zset = sorted_sets.entry(key.clone()).or_default();
                    let score = zset.entry(member.clone()).or_insert(0.0);
                    *score += delta;
                    Reply::Score(*score)
                }
                Command::ZRangeAll { key } => {
                    let mut entries: Vec<(String, f64)> = sorted_sets
                        .get(key)
                        .map(|z| z.iter().map(|(k, v)| (k.clone(), *v)).collect())
                        .unwrap_or_default();
                    entries.sort_by(|a, b| {
                        b.1.partial_cmp(&a.1)
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then_with(|| a.0.cmp(&b.0))
                    });
                    Reply::Scored(entries)
                }
            };
            replies.push(reply);
        }
        Ok(replies)
    }
}
