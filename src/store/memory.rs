//! In-process store.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

use super::{MatchStore, StoreError, WriteBatch, WriteOp};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Value {
    Text(String),
    List(VecDeque<String>),
}

/// Thread-safe in-memory [`MatchStore`].
///
/// `commit` stages every touched key on a private copy and swaps the
/// results in under one write lock, so readers never see half a batch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<FxHashMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.data.read().len()
    }

    /// All keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn with_list<T>(
        &self,
        key: &str,
        read: impl FnOnce(Option<&VecDeque<String>>) -> T,
    ) -> Result<T, StoreError> {
        match self.data.read().get(key) {
            None => Ok(read(None)),
            Some(Value::List(list)) => Ok(read(Some(list))),
            Some(Value::Text(_)) => Err(StoreError::WrongType(key.to_string())),
        }
    }
}

fn list_mut<'a>(
    staged: &'a mut FxHashMap<String, Option<Value>>,
    key: &str,
) -> Result<&'a mut VecDeque<String>, StoreError> {
    let slot = staged.entry(key.to_string()).or_insert(None);
    if slot.is_none() {
        *slot = Some(Value::List(VecDeque::new()));
    }
    match slot {
        Some(Value::List(list)) => Ok(list),
        _ => Err(StoreError::WrongType(key.to_string())),
    }
}

fn apply(staged: &mut FxHashMap<String, Option<Value>>, op: WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Set { key, value } => {
            staged.insert(key, Some(Value::Text(value)));
        }
        WriteOp::Delete { key } => {
            staged.insert(key, None);
        }
        WriteOp::PushHead { key, values } => {
            let list = list_mut(staged, &key)?;
            for value in values {
                list.push_front(value);
            }
        }
        WriteOp::PushTail { key, values } => {
            list_mut(staged, &key)?.extend(values);
        }
        WriteOp::PopTail { key } => {
            let list = list_mut(staged, &key)?;
            list.pop_back();
        }
        WriteOp::ReplaceList { key, values } => {
            staged.insert(key, Some(Value::List(values.into_iter().collect())));
        }
    }
    Ok(())
}

impl MatchStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.data.read().get(key) {
            None => Ok(None),
            Some(Value::Text(text)) => Ok(Some(text.clone())),
            Some(Value::List(_)) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    fn list(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.with_list(key, |list| list.map(|l| l.iter().cloned().collect()).unwrap_or_default())
    }

    fn list_len(&self, key: &str) -> Result<usize, StoreError> {
        self.with_list(key, |list| list.map_or(0, VecDeque::len))
    }

    fn peek_tail(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_list(key, |list| list.and_then(|l| l.back().cloned()))
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.data.read().contains_key(key))
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut data = self.data.write();

        let mut staged: FxHashMap<String, Option<Value>> = FxHashMap::default();
        for op in batch.ops() {
            if !staged.contains_key(op.key()) {
                staged.insert(op.key().to_string(), data.get(op.key()).cloned());
            }
        }
        for op in batch.into_ops() {
            apply(&mut staged, op)?;
        }

        for (key, value) in staged {
            match value {
                Some(Value::List(list)) if list.is_empty() => {
                    data.remove(&key);
                }
                Some(value) => {
                    data.insert(key, value);
                }
                None => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }
}
