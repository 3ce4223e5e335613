use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::render::driver::{PrimitiveDriver, RenderPrimitiveDescriptor};
use crate::render::handle::{
    IndexBufferHandle, PrimitiveType, RenderPrimitiveHandle, VertexBufferHandle,
};

/// Identity of a render primitive. Field order is the lookup order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PrimitiveKey {
    pub vertex_buffer: VertexBufferHandle,
    pub index_buffer: IndexBufferHandle,
    pub offset: u32,
    pub count: u32,
    pub type_: PrimitiveType,
}

impl From<&RenderPrimitiveDescriptor> for PrimitiveKey {
    fn from(descriptor: &RenderPrimitiveDescriptor) -> Self {
        Self {
            vertex_buffer: descriptor.vertex_buffer,
            index_buffer: descriptor.index_buffer,
            offset: descriptor.offset,
            count: descriptor.count,
            type_: descriptor.type_,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PrimitiveFactoryStats {
    pub live: usize,
    pub created: u64,
    pub reused: u64,
    pub destroyed: u64,
}

struct Entry {
    key: PrimitiveKey,
    ref_count: u32,
    handle: RenderPrimitiveHandle,
}

/// Hands out shared, reference-counted render primitives.
///
/// Requests with the same [`PrimitiveKey`] share one backend object, which is
/// released once every `create` has been matched by a `destroy`. Entries live
/// in an arena; the key index and the handle index both store arena slots, so
/// neither ever points into the other.
#[derive(Default)]
pub struct PrimitiveFactory {
    entries: Vec<Option<Entry>>,
    free_slots: Vec<usize>,
    key_index: BTreeMap<PrimitiveKey, usize>,
    handle_index: FxHashMap<u32, usize>,
    created: u64,
    reused: u64,
    destroyed: u64,
}

impl PrimitiveFactory {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns a handle for the given geometry binding, creating the backend
    /// object only if no live primitive has the same key.
    ///
    /// `min_index` and `max_index` are not part of the key. A reused handle
    /// keeps the range passed by whichever caller created it.
    pub fn create(
        &mut self,
        driver: &mut impl PrimitiveDriver,
        descriptor: &RenderPrimitiveDescriptor,
    ) -> RenderPrimitiveHandle {
        let key = PrimitiveKey::from(descriptor);

        if let Some(&slot) = self.key_index.get(&key) {
            if let Some(entry) = self.entries[slot].as_mut() {
                entry.ref_count += 1;
                self.reused += 1;
                log::trace!(
                    "Reusing render primitive {:?} ({} references)",
                    entry.handle,
                    entry.ref_count
                );
                return entry.handle;
            }
        }

        let handle = driver.create_render_primitive(descriptor);
        let entry = Entry {
            key,
            ref_count: 1,
            handle,
        };

        let slot = match self.free_slots.pop() {
            Some(slot) => {
                self.entries[slot] = Some(entry);
                slot
            }
            None => {
                self.entries.push(Some(entry));
                self.entries.len() - 1
            }
        };

        self.key_index.insert(key, slot);
        let previous = self.handle_index.insert(handle.id(), slot);
        debug_assert!(
            previous.is_none(),
            "The driver returned a handle that is still live: {handle:?}"
        );

        self.created += 1;
        log::trace!("Created render primitive {handle:?} for {key:?}");

        handle
    }

    /// Releases one reference to `handle`, destroying the backend object when
    /// it was the last one.
    ///
    /// # Panics
    ///
    /// Panics if `handle` is not live, i.e. it was never returned by `create`
    /// or all of its references have already been released.
    pub fn destroy(&mut self, driver: &mut impl PrimitiveDriver, handle: RenderPrimitiveHandle) {
        let slot = match self.handle_index.get(&handle.id()) {
            Some(&slot) => slot,
            None => panic!("Attempted to destroy an unknown render primitive: {handle:?}"),
        };

        let entry = match self.entries[slot].as_mut() {
            Some(entry) => entry,
            None => panic!("Render primitive {handle:?} points at an empty slot: {slot}"),
        };

        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            log::trace!(
                "Released render primitive {handle:?} ({} references left)",
                entry.ref_count
            );
            return;
        }

        let key = entry.key;
        self.key_index.remove(&key);
        self.handle_index.remove(&handle.id());
        self.entries[slot] = None;
        self.free_slots.push(slot);
        self.destroyed += 1;

        log::trace!("Destroying render primitive {handle:?} for {key:?}");
        driver.destroy_render_primitive(handle);
    }

    /// Checks that every reference has been released. A remaining entry means
    /// a caller leaked a handle.
    pub fn terminate(&mut self) {
        if !self.is_empty() {
            log::error!(
                "Render primitive factory terminated with {} live primitives",
                self.len()
            );
        }

        debug_assert!(
            self.key_index.is_empty(),
            "Leaked render primitives at terminate: {} keys still indexed",
            self.key_index.len()
        );
        debug_assert!(
            self.handle_index.is_empty(),
            "Leaked render primitives at terminate: {} handles still indexed",
            self.handle_index.len()
        );
    }

    pub fn len(&self) -> usize {
        self.key_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_index.is_empty() && self.handle_index.is_empty()
    }

    pub fn lookup(&self, key: &PrimitiveKey) -> Option<RenderPrimitiveHandle> {
        let slot = *self.key_index.get(key)?;
        self.entries[slot].as_ref().map(|entry| entry.handle)
    }

    pub fn ref_count(&self, handle: RenderPrimitiveHandle) -> Option<u32> {
        let slot = *self.handle_index.get(&handle.id())?;
        self.entries[slot].as_ref().map(|entry| entry.ref_count)
    }

    pub fn stats(&self) -> PrimitiveFactoryStats {
        PrimitiveFactoryStats {
            live: self.len(),
            created: self.created,
            reused: self.reused,
            destroyed: self.destroyed,
        }
    }
}
