use std::marker::PhantomData;

use crate::cluster::KvCluster;
use crate::command::{Command, Reply};
use crate::error::KvError;

/// A handle to the eventual result of one enqueued command.
///
/// Exposes its result only after the owning [`Pipeline`] is flushed (spec
/// §9: "each enqueued command returns a handle that exposes its result only
/// after flush"), modeled here as an index into the flushed reply vector
/// rather than a shared-mutable promise cell.
#[derive(Debug, Clone, Copy)]
pub struct Handle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

/// The replies produced by one [`Pipeline::flush`] call.
pub struct Flushed {
    replies: Vec<Reply>,
}

impl Flushed {
    pub fn added(&self, handle: Handle<bool>) -> bool {
        self.replies[handle.index].clone().into_added()
    }

    pub fn members(&self, handle: Handle<Vec<String>>) -> Vec<String> {
        self.replies[handle.index].clone().into_members()
    }

    pub fn score(&self, handle: Handle<f64>) -> f64 {
        self.replies[handle.index].clone().into_score()
    }

    pub fn scored(&self, handle: Handle<Vec<(String, f64)>>) -> Vec<(String, f64)> {
        self.replies[handle.index].clone().into_scored()
    }
}

/// A batch of commands, committed together on flush.
///
/// Grounded on the batched-execution contract of spec §6/§9 and on the
/// `pipe = client.pipeline(); pipe.sadd(...); pipe.zincrby(...); pipe.execute()`
/// shape in `examples/original_source/src/sentry/similarity.py`. Unlike a
/// single-node pipeline, a command here is not bound to a shard until
/// flush: each one is routed independently by hashing its own key, so a
/// batch may span several shards (real Redis Cluster pipelines behave the
/// same way — a single `MULTI`/pipeline only guarantees atomicity per hash
/// slot, never across slots).
pub struct Pipeline<'a> {
    cluster: &'a KvCluster,
    commands: Vec<Command>,
}

impl<'a> Pipeline<'a> {
    pub fn new(cluster: &'a KvCluster) -> Self {
        Self {
            cluster,
            commands: Vec::new(),
        }
    }

    pub fn sadd(&mut self, key: impl Into<String>, member: impl Into<String>) -> Handle<bool> {
        self.push(Command::SAdd {
            key: key.into(),
            member: member.into(),
        })
    }

    pub fn smembers(&mut self, key: impl Into<String>) -> Handle<Vec<String>> {
        self.push(Command::SMembers { key: key.into() })
    }

    pub fn zincrby(
        &mut self,
        key: impl Into<String>,
        member: impl Into<String>,
        delta: f64,
    ) -> Handle<f64> {
        self.push(Command::ZIncrBy {
            key: key.into(),
            member: member.into(),
            delta,
        })
    }

    pub fn zrange_all(&mut self, key: impl Into<String>) -> Handle<Vec<(String, f64)>> {
        self.push(Command::ZRangeAll { key: key.into() })
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Commit every queued command, grouped by the shard each one's own key
    /// hashes to, and return the replies in original enqueue order.
    ///
    /// Each shard's subset still executes as a single batch against its
    /// backend (spec §5's same-shard atomicity guarantee is preserved for
    /// any pair of commands that do land on the same shard); commands whose
    /// keys hash to different shards simply become separate batches.
    pub fn flush(self) -> Result<Flushed, KvError> {
        let shard_count = self.cluster.shard_count();
        let total = self.commands.len();
        let mut grouped: Vec<Vec<(usize, Command)>> = (0..shard_count).map(|_| Vec::new()).collect();
        for (index, command) in self.commands.into_iter().enumerate() {
            let shard = self.cluster.shard_index(command.shard_key());
            grouped[shard].push((index, command));
        }

        let mut replies: Vec<Option<Reply>> = vec![None; total];
        for (shard_index, entries) in grouped.into_iter().enumerate() {
            if entries.is_empty() {
                continue;
            }
            let (indices, commands): (Vec<usize>, Vec<Command>) = entries.into_iter().unzip();
            let shard_replies = self.cluster.shard(shard_index).execute(&commands)?;
            for (index, reply) in indices.into_iter().zip(shard_replies) {
                replies[index] = Some(reply);
            }
        }

        let replies = replies
            .into_iter()
            .map(|r| r.expect("every enqueued command is routed to exactly one shard"))
            .collect();
        Ok(Flushed { replies })
    }

    fn push<T>(&mut self, command: Command) -> Handle<T> {
        let index = self.commands.len();
        self.commands.push(command);
        Handle {
            index,
            _marker: PhantomData,
        }
    }
}
