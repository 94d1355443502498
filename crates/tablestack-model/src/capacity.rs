//! Consumed-capacity counters.

use serde::{Deserialize, Serialize};

/// Read/write capacity units consumed by an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityUnit {
    /// Consumed read units.
    pub read: i64,
    /// Consumed write units.
    pub write: i64,
}

impl CapacityUnit {
    /// Creates a capacity counter.
    pub fn new(read: i64, write: i64) -> Self {
        Self { read, write }
    }

    /// Accumulates another counter into this one.
    pub fn add(&mut self, other: &CapacityUnit) {
        self.read += other.read;
        self.write += other.write;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_accumulate_capacity() {
        let mut total = CapacityUnit::default();
        total.add(&CapacityUnit::new(1, 0));
        total.add(&CapacityUnit::new(2, 3));
        assert_eq!(total, CapacityUnit::new(3, 3));
    }
}
