//! In-memory donor store and sequence.

use crate::domain::{Donor, DonorError};
use crate::ports::{DonorMutation, DonorRepository, SequenceGenerator};
use parking_lot::RwLock;
use shared_types::{DonorId, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// `DonorRepository` backed by a `HashMap` under one lock.
#[derive(Debug, Default)]
pub struct InMemoryDonorRepository {
    donors: RwLock<HashMap<DonorId, Donor>>,
}

impl InMemoryDonorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DonorRepository for InMemoryDonorRepository {
    fn insert(&self, donor: Donor) -> Result<(), DonorError> {
        let mut donors = self.donors.write();
        if donors.contains_key(&donor.id) {
            return Err(StoreError::Conflict(format!("donor {} already exists", donor.id)).into());
        }
        donors.insert(donor.id.clone(), donor);
        Ok(())
    }

    fn get(&self, id: &DonorId) -> Result<Option<Donor>, DonorError> {
        Ok(self.donors.read().get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Donor>, DonorError> {
        Ok(self.donors.read().values().cloned().collect())
    }

    fn update(&self, id: &DonorId, mutate: DonorMutation<'_>) -> Result<Option<Donor>, DonorError> {
        let mut donors = self.donors.write();
        let Some(stored) = donors.get_mut(id) else {
            return Ok(None);
        };
        let mut draft = stored.clone();
        mutate(&mut draft)?;
        *stored = draft.clone();
        Ok(Some(draft))
    }
}

/// Lock-free counters, one `AtomicU64` per sequence name.
#[derive(Debug, Default)]
pub struct AtomicSequence {
    counters: RwLock<HashMap<String, Arc<AtomicU64>>>,
}

impl AtomicSequence {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, sequence: &str) -> Arc<AtomicU64> {
        if let Some(counter) = self.counters.read().get(sequence) {
            return Arc::clone(counter);
        }
        Arc::clone(
            self.counters
                .write()
                .entry(sequence.to_string())
                .or_insert_with(|| Arc::new(AtomicU64::new(0))),
        )
    }
}

impl SequenceGenerator for AtomicSequence {
    fn next_value(&self, sequence: &str) -> Result<u64, StoreError> {
        Ok(self.counter(sequence).fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_sequences_are_independent() {
        let seq = AtomicSequence::new();
        assert_eq!(seq.next_value("a").unwrap(), 1);
        assert_eq!(seq.next_value("a").unwrap(), 2);
        assert_eq!(seq.next_value("b").unwrap(), 1);
    }

    #[test]
    fn test_concurrent_values_are_unique() {
        let seq = Arc::new(AtomicSequence::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || {
                    (0..250)
                        .map(|_| seq.next_value("donor_number").unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "duplicate {value}");
            }
        }
        assert_eq!(seen.len(), 2_000);
        assert_eq!(seen.iter().max(), Some(&2_000));
    }
}
