use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;

use super::LineInstance;

/// Corner of the quad template shared by every instance.
///
/// `x` picks the side of the segment (`-1` / `+1`, scaled by thickness) and
/// `y` picks the end (`-0.5` / `+0.5`, scaled by direction).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub local: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { local: [-1.0, -0.5] },
    QuadVertex { local: [1.0, -0.5] },
    QuadVertex { local: [1.0, 0.5] },
    QuadVertex { local: [-1.0, 0.5] },
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Stage 1 expansion: places a template corner in world space.
///
/// `local.y * direction` stretches the quad along the segment and
/// `local.x * normal * thickness` offsets it sideways. The ends are pushed out
/// by another `thickness` along the tangent so the quad also covers the
/// rounded caps.
///
/// `direction` must be nonzero; [`LineInstance::new`] enforces that.
pub fn expand_vertex(local: Vec2, instance: &LineInstance, thickness: f32) -> Vec2 {
    let direction = instance.direction();
    let len = direction.length();
    let tangent = direction / len;
    let normal = direction.perp() / len;

    let cap = tangent * (signum0(local.y) * thickness);
    let local_expansion = direction * local.y + normal * (local.x * thickness) + cap;

    local_expansion + instance.position()
}

// WGSL `sign` semantics: zero stays zero.
#[inline]
fn signum0(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
