//! Ordered entity storage with stable, generation-tagged handles.
//!
//! Each live value sits in a slot that also carries the indices of its
//! neighbours, so insertion at the tail and removal of any member are O(1)
//! and iteration follows insertion order. Freed slots are recycled; a slot's
//! generation is bumped on every removal so stale handles never alias a new
//! occupant.
//!
//! Removal while walking the list goes through [`Arena::erase`], which hands
//! back the successor of the erased value:
//!
//! ```
//! use tankgrid::arena::Arena;
//!
//! let mut arena: Arena<i32> = (1..=5).collect();
//! let mut cursor = arena.first();
//! while let Some(handle) = cursor {
//!     cursor = if arena[handle] % 2 == 0 {
//!         arena.erase(handle)
//!     } else {
//!         arena.next(handle)
//!     };
//! }
//! assert_eq!(arena.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A stable reference to a value owned by an [`Arena`].
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index, stable while the value is live.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<u32>,
    next: Option<u32>,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// An insertion-ordered owning container with O(1) add and remove.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Create an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of live values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the arena holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `value` at the tail and return its handle.
    pub fn add(&mut self, value: T) -> Handle<T> {
        let node = Node {
            value,
            prev: self.tail,
            next: None,
        };
        let index = if let Some(index) = self.free.pop() {
            self.slots[index as usize].node = Some(node);
            index
        } else {
            let Ok(index) = u32::try_from(self.slots.len()) else {
                panic!("arena slot index overflow");
            };
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            index
        };

        match self.tail {
            Some(tail) => {
                if let Some(tail_node) = self.slots[tail as usize].node.as_mut() {
                    tail_node.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        Handle::new(index, self.slots[index as usize].generation)
    }

    /// Construct a value in place and append it.
    pub fn emplace(&mut self, make: impl FnOnce() -> T) -> Handle<T> {
        self.add(make())
    }

    /// Whether `handle` refers to a live value.
    #[must_use]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.node(handle).is_some()
    }

    /// Borrow the value behind `handle`, if it is still live.
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.node(handle).map(|node| &node.value)
    }

    /// Mutably borrow the value behind `handle`, if it is still live.
    #[must_use]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_mut().map(|node| &mut node.value)
    }

    /// Unlink and return the value behind `handle`.
    ///
    /// Returns `None` if the handle is stale.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        match node.prev {
            Some(prev) => self.link_next(prev, node.next),
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.link_prev(next, node.prev),
            None => self.tail = node.prev,
        }
        self.free.push(handle.index);
        self.len -= 1;

        Some(node.value)
    }

    /// Destroy the value behind `handle` and return the handle after it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not live in this arena.
    pub fn erase(&mut self, handle: Handle<T>) -> Option<Handle<T>> {
        let next = self.next(handle);
        assert!(
            self.remove(handle).is_some(),
            "erase of {handle:?}, which this arena does not own"
        );
        next
    }

    /// Destroy every value. Handles issued before the call all go stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            if let Ok(index) = u32::try_from(index) {
                self.free.push(index);
            }
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Handle of the oldest value.
    #[must_use]
    pub fn first(&self) -> Option<Handle<T>> {
        self.head.map(|index| self.handle_at(index))
    }

    /// Handle of the value inserted after `handle`.
    #[must_use]
    pub fn next(&self, handle: Handle<T>) -> Option<Handle<T>> {
        let next = self.node(handle)?.next?;
        Some(self.handle_at(next))
    }

    /// Iterate values in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Iterate `(handle, value)` pairs in insertion order.
    pub fn iter_handles(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let index = cursor?;
            let node = self.slots[index as usize].node.as_ref()?;
            cursor = node.next;
            Some((self.handle_at(index), &node.value))
        })
    }

    /// Mutably iterate values in slot order.
    ///
    /// Slot order matches insertion order until a freed slot is reused. Walk
    /// [`first`](Self::first) and [`next`](Self::next) when order matters.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.node.as_mut().map(|node| &mut node.value))
    }

    fn node(&self, handle: Handle<T>) -> Option<&Node<T>> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn handle_at(&self, index: u32) -> Handle<T> {
        Handle::new(index, self.slots[index as usize].generation)
    }

    fn link_next(&mut self, index: u32, next: Option<u32>) {
        if let Some(node) = self.slots[index as usize].node.as_mut() {
            node.next = next;
        }
    }

    fn link_prev(&mut self, index: u32, prev: Option<u32>) {
        if let Some(node) = self.slots[index as usize].node.as_mut() {
            node.prev = prev;
        }
    }
}

impl<T> Index<Handle<T>> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("stale handle {handle:?}"),
        }
    }
}

impl<T> IndexMut<Handle<T>> for Arena<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("stale handle {handle:?}"),
        }
    }
}

impl<T> FromIterator<T> for Arena<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arena = Self::new();
        for value in iter {
            arena.add(value);
        }
        arena
    }
}

impl<'a, T> IntoIterator for &'a Arena<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Insertion-order iterator over an [`Arena`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    cursor: Option<u32>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let index = self.cursor?;
        let node = self.arena.slots[index as usize].node.as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
