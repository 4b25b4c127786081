/// A single KV operation, as it is enqueued into a [`crate::Pipeline`].
///
/// Mirrors the four operations spec'd for the backing store: set
/// membership, sorted-set increment, and full-scan reads of both. Keys and
/// members are plain strings — the index's key encoding never needs binary
/// members.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add `member` to the unordered set at `key`.
    SAdd { key: String, member: String },
    /// Read the full unordered set at `key`.
    SMembers { key: String },
    /// Add `delta` to `member`'s score in the sorted set at `key`, creating
    /// it with score `delta` if absent.
    ZIncrBy {
        key: String,
        member: String,
        delta: f64,
    },
    /// Read the full sorted set at `key`, descending by score.
    ZRangeAll { key: String },
}

impl Command {
    /// The KV key this command addresses, used to route it to a shard.
    ///
    /// Routing must follow the command's own key, not whichever caller-side
    /// identifier happened to initiate the pipeline: a forward bucket key
    /// is shared structure (two different record keys with the same band
    /// value must land on the same shard to ever become candidates for each
    /// other), so it has to be hashed on its own, independent of the record
    /// `key` that produced the write.
    pub(crate) fn shard_key(&self) -> &str {
        match self {
            Command::SAdd { key, .. }
            | Command::SMembers { key }
            | Command::ZIncrBy { key, .. }
            | Command::ZRangeAll { key } => key,
        }
    }
}

/// The result of executing one [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `sadd` result: `true` if the member was newly added.
    Added(bool),
    /// `smembers` result.
    Members(Vec<String>),
    /// `zincrby` result: the member's new score.
    Score(f64),
    /// `zrange ... withscores` result, already sorted score-descending.
    Scored(Vec<(String, f64)>),
}

impl Reply {
    pub fn into_added(self) -> bool {
        match self {
            Reply::Added(v) => v,
            other => panic!("expected Reply::Added, got {other:?}"),
        }
    }

    pub fn into_members(self) -> Vec<String> {
        match self {
            Reply::Members(v) => v,
            other => panic!("expected Reply::Members, got {other:?}"),
        }
    }

    pub fn into_score(self) -> f64 {
        match self {
            Reply::Score(v) => v,
            other => panic!("expected Reply::Score, got {other:?}"),
        }
    }

    pub fn into_scored(self) -> Vec<(String, f64)> {
        match self {
            Reply::Scored(v) => v,
            other => panic!("expected Reply::Scored, got {other:?}"),
        }
    }
}
