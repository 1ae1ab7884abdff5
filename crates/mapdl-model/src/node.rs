use serde::{Deserialize, Serialize};

/// Translations X, Y, Z followed by rotations about X, Y, Z.
pub const DOF_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    pub number: i32,
    pub dof: [f64; DOF_COUNT],
}

impl NodeRecord {
    pub fn coordinates(&self) -> [f64; 3] {
        [self.dof[0], self.dof[1], self.dof[2]]
    }

    pub fn rotations(&self) -> [f64; 3] {
        [self.dof[3], self.dof[4], self.dof[5]]
    }
}

/// Nodes parsed from one block.
///
/// `requested` is the count the caller asked for; `records.len()` may be
/// smaller when the block carried an early terminator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeBlock {
    pub requested: usize,
    pub records: Vec<NodeRecord>,
}

impl NodeBlock {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_short(&self) -> bool {
        self.records.len() < self.requested
    }

    pub fn numbers(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.number).collect()
    }

    /// Row-major `n x 6` array of DOF values.
    pub fn flat_dof(&self) -> Vec<f64> {
        self.records.iter().flat_map(|r| r.dof).collect()
    }
}
