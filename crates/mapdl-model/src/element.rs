use serde::{Deserialize, Serialize};

/// Attribute fields stored ahead of the node ids of every element in the
/// flat element array.
pub const HEADER_FIELDS: usize = 10;

/// Node slots of a fixed-size element record.
pub const MAX_NODES: usize = 20;

/// Value of node slots past the nodes an element actually wrote.
pub const NODE_SENTINEL: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub material: i32,
    pub etype: i32,
    pub real_const: i32,
    pub section: i32,
    pub coord_sys: i32,
    pub birth_death: i32,
    pub solid_model_ref: i32,
    pub shape_key: i32,
    pub element_number: i32,
    pub unused_slot: i32,
    pub node_ids: [i32; MAX_NODES],
}

impl ElementRecord {
    /// Node ids up to the first sentinel slot.
    pub fn nodes(&self) -> &[i32] {
        let n = self
            .node_ids
            .iter()
            .position(|&id| id == NODE_SENTINEL)
            .unwrap_or(MAX_NODES);
        &self.node_ids[..n]
    }
}

/// Flattened element connectivity plus the offset table that indexes it.
///
/// Element `i` occupies `elem[elem_offsets[i]..elem_offsets[i + 1]]`: the ten
/// attribute fields in `ElementRecord` order followed by its node ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementBlock {
    pub requested: usize,
    pub elem: Vec<i32>,
    pub elem_offsets: Vec<usize>,
}

impl ElementBlock {
    pub fn len(&self) -> usize {
        self.elem_offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_short(&self) -> bool {
        self.len() < self.requested
    }

    /// Raw slice of element `index` inside the flat array.
    pub fn raw(&self, index: usize) -> Option<&[i32]> {
        let start = *self.elem_offsets.get(index)?;
        let end = *self.elem_offsets.get(index + 1)?;
        self.elem.get(start..end)
    }

    /// Node ids stored for element `index`, zero padding included.
    pub fn node_ids(&self, index: usize) -> Option<&[i32]> {
        self.raw(index).map(|raw| &raw[HEADER_FIELDS.min(raw.len())..])
    }

    /// Fixed-size view of element `index`.
    pub fn record(&self, index: usize) -> Option<ElementRecord> {
        let raw = self.raw(index)?;
        if raw.len() < HEADER_FIELDS {
            return None;
        }
        let mut node_ids = [NODE_SENTINEL; MAX_NODES];
        for (slot, &id) in node_ids.iter_mut().zip(&raw[HEADER_FIELDS..]) {
            *slot = id;
        }
        Some(ElementRecord {
            material: raw[0],
            etype: raw[1],
            real_const: raw[2],
            section: raw[3],
            coord_sys: raw[4],
            birth_death: raw[5],
            solid_model_ref: raw[6],
            shape_key: raw[7],
            element_number: raw[8],
            unused_slot: raw[9],
            node_ids,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = ElementRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }
}
