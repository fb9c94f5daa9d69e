use std::num::NonZeroU64;

use bytemuck::Pod;

/// Uniform buffer holding one block per draw, addressed with dynamic offsets.
///
/// Blocks are laid out at `stride = align(item_size, min_uniform_buffer_offset_alignment)`
/// and written with one `write_buffer` per batch, starting at the slot the
/// frame cursor hands out. The bind group spans one block; each draw selects
/// its slot through [`offset`](Self::offset).
pub(super) struct UniformRing {
    label: &'static str,
    item_size: u64,
    stride: u64,
    capacity: usize,
    buffer: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl UniformRing {
    pub(super) fn new(label: &'static str, item_size: usize) -> Self {
        Self {
            label,
            item_size: item_size as u64,
            stride: 0,
            capacity: 0,
            buffer: None,
            bind_group: None,
        }
    }

    /// Size of one block, used as the binding size in layouts.
    pub(super) fn binding_size(&self) -> Option<NonZeroU64> {
        NonZeroU64::new(self.item_size)
    }

    /// Drops GPU resources; the next `ensure_capacity` recreates them against
    /// the current layout.
    pub(super) fn invalidate(&mut self) {
        self.buffer = None;
        self.bind_group = None;
        self.capacity = 0;
    }

    pub(super) fn ensure_capacity(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        required: usize,
    ) {
        if required <= self.capacity && self.buffer.is_some() && self.bind_group.is_some() {
            return;
        }

        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        self.stride = wgpu::util::align_to(self.item_size, align);

        let new_cap = required.next_power_of_two().max(16);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size: self.stride * new_cap as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: self.binding_size(),
                }),
            }],
        });

        log::debug!("{}: grew to {new_cap} blocks ({} B stride)", self.label, self.stride);

        self.buffer = Some(buffer);
        self.bind_group = Some(bind_group);
        self.capacity = new_cap;
    }

    /// Writes `items` into consecutive slots starting at `first_slot`.
    pub(super) fn write<T: Pod>(&self, queue: &wgpu::Queue, first_slot: usize, items: &[T]) {
        debug_assert_eq!(std::mem::size_of::<T>() as u64, self.item_size);
        debug_assert!(first_slot + items.len() <= self.capacity);

        let Some(buffer) = self.buffer.as_ref() else { return };
        if items.is_empty() {
            return;
        }

        let stride = self.stride as usize;
        let mut staging = vec![0u8; stride * items.len()];
        for (slot, item) in staging.chunks_exact_mut(stride).zip(items) {
            let bytes = bytemuck::bytes_of(item);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        queue.write_buffer(buffer, self.stride * first_slot as u64, &staging);
    }

    #[inline]
    pub(super) fn offset(&self, slot: usize) -> u32 {
        (self.stride * slot as u64) as u32
    }

    #[inline]
    pub(super) fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}
