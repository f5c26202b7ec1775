// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Handle-based object heap with mark-and-sweep collection.
//!
//! Objects live in a slot table. A [`Handle`] names a slot plus the
//! generation the slot had when the object was allocated; freeing an object
//! bumps its slot's generation, so a handle that outlives its object is
//! detected instead of silently resolving to whatever reuses the slot.
//!
//! The heap has no notion of roots. Callers mark every root with
//! [`Heap::mark`] and then call [`Heap::sweep`].

use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use crate::interp::RuntimeError;
use crate::value::Value;

/// Reference to a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.generation)
    }
}

/// An object of a user-declared class.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class_name: String,
    fields: IndexMap<String, Value>,
}

impl Instance {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self { class_name: class_name.into(), fields: IndexMap::new() }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Field value, or `Nil` if the field was never set.
    pub fn get_field(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or(Value::Nil)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeapObject {
    Instance(Instance),
}

impl HeapObject {
    /// Handles stored inside this object.
    fn children(&self) -> impl Iterator<Item = Handle> + '_ {
        match self {
            HeapObject::Instance(inst) => inst.fields.values().filter_map(Value::as_handle),
        }
    }
}

#[derive(Debug)]
struct Entry {
    marked: bool,
    object: HeapObject,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug, Default)]
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Take ownership of `object` and return its handle. Freed slots are
    /// reused before the table grows.
    pub fn allocate(&mut self, object: HeapObject) -> Handle {
        let entry = Some(Entry { marked: false, object });
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = entry;
                Handle { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, entry });
                Handle { index, generation: 0 }
            }
        };
        self.live += 1;
        trace!(%handle, live = self.live, "heap: allocate");
        handle
    }

    fn entry(&self, handle: Handle) -> Option<&Entry> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, handle: Handle) -> Option<&mut Entry> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entry(handle).is_some()
    }

    pub fn get(&self, handle: Handle) -> Result<&HeapObject, RuntimeError> {
        self.entry(handle)
            .map(|entry| &entry.object)
            .ok_or(RuntimeError::DanglingReference(handle))
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut HeapObject, RuntimeError> {
        self.entry_mut(handle)
            .map(|entry| &mut entry.object)
            .ok_or(RuntimeError::DanglingReference(handle))
    }

    pub fn instance(&self, handle: Handle) -> Result<&Instance, RuntimeError> {
        match self.get(handle)? {
            HeapObject::Instance(inst) => Ok(inst),
        }
    }

    pub fn instance_mut(&mut self, handle: Handle) -> Result<&mut Instance, RuntimeError> {
        match self.get_mut(handle)? {
            HeapObject::Instance(inst) => Ok(inst),
        }
    }

    /// Mark everything reachable from `root`. Returns how many objects were
    /// newly marked.
    ///
    /// Already-marked objects stop the walk, which keeps cycles finite.
    /// Handles that no longer resolve are skipped.
    pub fn mark(&mut self, root: &Value) -> usize {
        let mut work: Vec<Handle> = root.as_handle().into_iter().collect();
        let mut marked = 0;
        while let Some(handle) = work.pop() {
            let Some(entry) = self.entry_mut(handle) else { continue };
            if entry.marked {
                continue;
            }
            entry.marked = true;
            marked += 1;
            work.extend(entry.object.children());
        }
        marked
    }

    /// Free every unmarked object and clear the mark on the survivors.
    /// Returns the number of objects freed.
    pub fn sweep(&mut self) -> usize {
        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(entry) = slot.entry.as_mut() else { continue };
            if entry.marked {
                entry.marked = false;
                continue;
            }
            slot.entry = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index as u32);
            freed += 1;
        }
        self.live -= freed;
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_instance(heap: &mut Heap, class: &str) -> Handle {
        heap.allocate(HeapObject::Instance(Instance::new(class)))
    }

    fn link(heap: &mut Heap, from: Handle, field: &str, to: Handle) {
        heap.instance_mut(from).unwrap().set_field(field, Value::Instance(to));
    }

    #[test]
    fn allocate_and_get() {
        let mut heap = Heap::new();
        let h = new_instance(&mut heap, "Point");
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.instance(h).unwrap().class_name(), "Point");
    }

    #[test]
    fn unset_field_is_nil() {
        let mut heap = Heap::new();
        let h = new_instance(&mut heap, "Point");
        assert_eq!(heap.instance(h).unwrap().get_field("x"), Value::Nil);
        heap.instance_mut(h).unwrap().set_field("x", Value::Number(42.0));
        assert_eq!(heap.instance(h).unwrap().get_field("x"), Value::Number(42.0));
    }

    #[test]
    fn sweep_without_marks_frees_everything() {
        let mut heap = Heap::new();
        let h = new_instance(&mut heap, "A");
        new_instance(&mut heap, "B");
        assert_eq!(heap.sweep(), 2);
        assert!(heap.is_empty());
        assert!(matches!(heap.get(h), Err(RuntimeError::DanglingReference(d)) if d == h));
    }

    #[test]
    fn marked_objects_survive_and_are_unmarked() {
        let mut heap = Heap::new();
        let keep = new_instance(&mut heap, "Keep");
        new_instance(&mut heap, "Drop");

        assert_eq!(heap.mark(&Value::Instance(keep)), 1);
        assert_eq!(heap.sweep(), 1);
        assert!(heap.contains(keep));

        // Marks were cleared, so an unrooted second sweep frees it.
        assert_eq!(heap.sweep(), 1);
        assert!(!heap.contains(keep));
    }

    #[test]
    fn marking_follows_fields() {
        let mut heap = Heap::new();
        let a = new_instance(&mut heap, "A");
        let b = new_instance(&mut heap, "B");
        let c = new_instance(&mut heap, "C");
        link(&mut heap, a, "next", b);
        link(&mut heap, b, "next", c);
        heap.instance_mut(c).unwrap().set_field("label", Value::Text("end".into()));

        assert_eq!(heap.mark(&Value::Instance(a)), 3);
        assert_eq!(heap.sweep(), 0);
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn cycles_terminate_and_are_collected_when_unreachable() {
        let mut heap = Heap::new();
        let a = new_instance(&mut heap, "A");
        let b = new_instance(&mut heap, "B");
        link(&mut heap, a, "other", b);
        link(&mut heap, b, "other", a);
        link(&mut heap, a, "me", a);

        assert_eq!(heap.mark(&Value::Instance(b)), 2);
        assert_eq!(heap.sweep(), 0);

        assert_eq!(heap.sweep(), 2);
        assert!(heap.is_empty());
    }

    #[test]
    fn marking_scalars_is_a_no_op() {
        let mut heap = Heap::new();
        new_instance(&mut heap, "A");
        assert_eq!(heap.mark(&Value::Number(1.0)), 0);
        assert_eq!(heap.mark(&Value::Nil), 0);
    }

    #[test]
    fn reused_slot_rejects_stale_handle() {
        let mut heap = Heap::new();
        let old = new_instance(&mut heap, "Old");
        heap.sweep();

        let new = new_instance(&mut heap, "New");
        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert!(heap.get(old).is_err());
        assert_eq!(heap.instance(new).unwrap().class_name(), "New");
        assert_eq!(heap.mark(&Value::Instance(old)), 0);
    }
}
