use std::collections::{HashMap, HashSet};

use redb::{Database, ReadableTable, TableDefinition};

use crate::backend::KvBackend;
use crate::command::{Command, Reply};
use crate::error::KvError;

const SETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sim_sets");
const ZSETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sim_zsets");

/// Durable backend over an embedded `redb` database.
///
/// Grounded on the teacher's `crates/index/src/backend/redb.rs`: a table
/// keyed by string, valued by an opaque byte blob, one transaction per call,
/// every `redb` error collapsed to its message via `KvError::backend`. Here
/// each call to `execute` is the *subset of one flushed `Pipeline` that
/// landed on this shard*, run inside a single write transaction — giving
/// same-shard atomicity to whichever of a `record` call's forward-add and
/// reverse-increment pair actually hash to this shard.
pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, KvError> {
        let db = Database::create(path).map_err(KvError::backend)?;
        let txn = db.begin_write().map_err(KvError::backend)?;
        {
            txn.open_table(SETS_TABLE).map_err(KvError::backend)?;
            txn.open_table(ZSETS_TABLE).map_err(KvError::backend)?;
        }
        txn.commit().map_err(KvError::backend)?;
        Ok(Self { db })
    }

    fn decode_set(bytes: &[u8]) -> Result<HashSet<String>, KvError> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(value, _)| value)
            .map_err(|e| KvError::Encode(e.to_string()))
    }

    fn encode_set(value: &HashSet<String>) -> Result<Vec<u8>, KvError> {
        bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(|e| KvError::Encode(e.to_string()))
    }

    fn decode_zset(bytes: &[u8]) -> Result<HashMap<String, f64>, KvError> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(value, _)| value)
            .map_err(|e| KvError::Encode(e.to_string()))
    }

    fn encode_zset(value: &HashMap<String, f64>) -> Result<Vec<u8>, KvError> {
        bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(|e| KvError::Encode(e.to_string()))
    }
}

impl KvBackend for RedbBackend {
    fn execute(&self, commands: &[Command]) -> Result<Vec<Reply>, KvError> {
        let txn = self.db.begin_write().map_err(KvError::backend)?;
        let mut replies = Vec::with_capacity(commands.len());
        {
            let mut sets_table = txn.open_table(SETS_TABLE).map_err(KvError::backend)?;
            let mut zsets_table = txn.open_table(ZSETS_TABLE).map_err(KvError::backend)?;

            for command in commands {
                let reply = match command {
                    Command::SAdd { key, member } => {
                        let mut set = match sets_table.get(key.as_str()).map_err(KvError::backend)? {
                            Some(bytes) => Self::decode_set(bytes.value())?,
                            None => HashSet::new(),
                        };
                        let inserted = set.insert(member.clone());
                        let encoded = Self::encode_set(&set)?;
                        sets_table
                            .insert(key.as_str(), encoded.as_slice())
                            .map_err(KvError::backend)?;
                        Reply::Added(inserted)
                    }
                    Command::SMembers { key } => {
                        let members = match sets_table.get(key.as_str()).map_err(KvError::backend)? {
                            Some(bytes) => Self::decode_set(bytes.value())?.into_iter().collect(),
                            None => Vec::new(),
                        };
                        Reply::Members(members)
                    }
                    Command::ZIncrBy { key, member, delta } => {
                        let mut zset = match zsets_table.get(key.as_str()).map_err(KvError::backend)? {
                            Some(bytes) => Self::decode_zset(bytes.value())?,
                            None => HashMap::new(),
                        };
                        let score = zset.entry(member.clone()).or_insert(0.0);
                        *score += delta;
                        let new_score = *score;
                        let encoded = Self::encode_zset(&zset)?;
                        zsets_table
                            .insert(key.as_str(), encoded.as_slice())
                            .map_err(KvError::backend)?;
                        Reply::Score(new_score)
                    }
                    Command::ZRangeAll { key } => {
                        let zset = match zsets_table.get(key.as_str()).map_err(KvError::backend)? {
                            Some(bytes) => Self::decode_zset(bytes.value())?,
                            None => HashMap::new(),
                        };
                        let mut entries: Vec<(String, f64)> = zset.into_iter().collect();
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
        }
        txn.commit().map_err(KvError::backend)?;
        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn backend() -> RedbBackend {
        let file = NamedTempFile::new().unwrap();
        RedbBackend::open(file.path()).unwrap()
    }

    #[test]
    fn sadd_and_smembers_round_trip() {
        let backend = backend();
        backend
            .execute(&[
                Command::SAdd {
                    key: "k".into(),
                    member: "a".into(),
                },
                Command::SAdd {
                    key: "k".into(),
                    member: "b".into(),
                },
            ])
            .unwrap();
        let replies = backend
            .execute(&[Command::SMembers { key: "k".into() }])
            .unwrap();
        let mut members = replies[0].clone().into_members();
        members.sort();
        assert_eq!(members, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn zincrby_persists_across_transactions() {
        let backend = backend();
        backend
            .execute(&[Command::ZIncrBy {
                key: "z".into(),
                member: "m".into(),
                delta: 1.0,
            }])
            .unwrap();
        let replies = backend
            .execute(&[Command::ZIncrBy {
                key: "z".into(),
                member: "m".into(),
                delta: 4.0,
            }])
            .unwrap();
        assert_eq!(replies[0].clone().into_score(), 5.0);
    }

    #[test]
    fn batch_commits_atomically() {
        let backend = backend();
        let replies = backend
            .execute(&[
                Command::SAdd {
                    key: "fwd".into(),
                    member: "key-1".into(),
                },
                Command::ZIncrBy {
                    key: "rev".into(),
                    member: "band-value".into(),
                    delta: 1.0,
                },
            ])
            .unwrap();
        assert_eq!(replies[0], Reply::Added(true));
        assert_eq!(replies[1], Reply::Score(1.0));
    }
}
