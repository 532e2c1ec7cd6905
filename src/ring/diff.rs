use super::RingSnapshot;
use crate::error::RingError;
use crate::hash::HashFunction;
use crate::node::Node;
use std::sync::Arc;

/// A key whose primary owner differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub key: String,
    /// Owner in the old snapshot.
    pub from: Arc<Node>,
    /// Owner in the new snapshot.
    pub to: Arc<Node>,
}

/// Lists the keys that change owner when moving from `old` to `new`.
///
/// Both snapshots must have been built with `hash_function`.
pub fn reassignments<I>(
    old: &RingSnapshot,
    new: &RingSnapshot,
    hash_function: &dyn HashFunction,
    keys: I,
) -> Result<Vec<Reassignment>, RingError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut moved = Vec::new();

    for key in keys {
        let key = key.as_ref();
        let key_hash = hash_function.hash(key);

        let from = old.route(key_hash)?;
        let to = new.route(key_hash)?;

        if from.id != to.id {
            moved.push(Reassignment {
                key: key.to_string(),
                from: from.clone(),
                to: to.clone(),
            });
        }
    }

    Ok(moved)
}
