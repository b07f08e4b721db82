use std::mem;

use crate::util::error::AllocError;

/// A stable reference to a node in a [`BinaryTree`](super::BinaryTree).
///
/// Ids stay valid while the node is in the tree, regardless of what else is inserted or removed.
/// Once the node is removed, its id is stale: every lookup with it returns [`None`], even after the
/// slot has been reused by another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

pub(crate) struct Node<T> {
    pub value: T,
    pub parent: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Node<T> {
        Node {
            value,
            parent: None,
            left: None,
            right: None,
        }
    }
}

struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Slot storage for tree nodes. Links between nodes are plain indices, and a [`NodeId`] adds the
/// generation of its slot so that ids outliving their node can be detected.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Arena<T> {
    pub const fn new() -> Arena<T> {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    /// Stores `node` in a free slot (or a new one), returning its index.
    ///
    /// # Errors
    /// Returns an [`AllocError`] if the slot storage can't grow. The arena is unchanged.
    pub fn try_alloc(&mut self, node: Node<T>) -> Result<usize, AllocError> {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            },
            None => {
                self.slots.try_reserve(1).map_err(|_| AllocError::OutOfMemory {
                    size: mem::size_of::<Slot<T>>(),
                })?;
                // Every slot can end up on the free list, so make room there up front. Otherwise
                // a failed allocation during removal would leak the slot.
                if let Err(err) = self.free.try_reserve(self.slots.len() + 1 - self.free.len()) {
                    tracing::debug!(%err, "tree arena free list allocation failed");
                    return Err(AllocError::OutOfMemory {
                        size: mem::size_of::<usize>(),
                    });
                }
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            },
        };
        self.len += 1;
        Ok(index)
    }

    /// Removes the node at `index`, invalidating every id that refers to it.
    pub fn take(&mut self, index: usize) -> Node<T> {
        let slot = &mut self.slots[index];
        let Some(node) = slot.node.take() else {
            unreachable!("Linked tree nodes are always occupied.")
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        node
    }

    pub fn id(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Returns the index referred to by `id`, if it is still occupied by the same node.
    pub fn resolve(&self, id: NodeId) -> Option<usize> {
        let slot = self.slots.get(id.index)?;
        (slot.generation == id.generation && slot.node.is_some()).then_some(id.index)
    }

    pub fn node(&self, index: usize) -> &Node<T> {
        match &self.slots[index].node {
            Some(node) => node,
            None => unreachable!("Linked tree nodes are always occupied."),
        }
    }

    pub fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        match &mut self.slots[index].node {
            Some(node) => node,
            None => unreachable!("Linked tree nodes are always occupied."),
        }
    }

    /// Drops every node. Generations are kept, so ids from before the clear stay stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.len = 0;
    }
}
