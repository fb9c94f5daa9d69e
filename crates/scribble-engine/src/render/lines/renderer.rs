use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::error::LineError;
use crate::geometry::{LineInstance, LineStyle, QuadVertex, QUAD_INDICES, QUAD_VERTICES};
use crate::render::{RenderCtx, RenderTarget};
use crate::transform::{
    AffineUniform, MatrixTransform, MatrixUniform, PanZoomUniform, TransformParams,
    TransformVariant,
};

use super::batch::LineBatch;
use super::cursor::FrameCursor;
use super::ring::UniformRing;

/// Pipeline selection for a [`LineRenderer`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LinePipelineConfig {
    pub variant: TransformVariant,
    pub label: &'static str,
}

impl LinePipelineConfig {
    pub fn new(variant: TransformVariant) -> Self {
        Self {
            variant,
            label: "scribble lines",
        }
    }

    #[inline]
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

impl Default for LinePipelineConfig {
    fn default() -> Self {
        Self::new(TransformVariant::default())
    }
}

/// Instanced capsule line renderer for one transform variant.
///
/// Bindings:
/// - group 0: `LineStyle`, one block per draw (dynamic offset)
/// - group 1: `TransformBlock`, per draw for pan/zoom and affine, persistent
///   for matrix
///
/// GPU resources are created lazily on first use and rebuilt when the surface
/// format or the configured variant changes.
pub struct LineRenderer {
    config: LinePipelineConfig,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline_variant: Option<TransformVariant>,
    pipeline: Option<wgpu::RenderPipeline>,

    style_bgl: Option<wgpu::BindGroupLayout>,
    transform_bgl: Option<wgpu::BindGroupLayout>,

    style_ring: UniformRing,
    transform_ring: UniformRing,

    matrix_ubo: Option<wgpu::Buffer>,
    matrix_bind_group: Option<wgpu::BindGroup>,
    uploaded_matrix: Option<MatrixTransform>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    cursor: FrameCursor,
}

impl LineRenderer {
    pub fn new(config: LinePipelineConfig) -> Self {
        Self {
            config,
            pipeline_format: None,
            pipeline_variant: None,
            pipeline: None,
            style_bgl: None,
            transform_bgl: None,
            style_ring: UniformRing::new("scribble line style ring", size_of::<LineStyleUniform>()),
            transform_ring: UniformRing::new(
                "scribble line transform ring",
                transform_block_size(config.variant),
            ),
            matrix_ubo: None,
            matrix_bind_group: None,
            uploaded_matrix: None,
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
            cursor: FrameCursor::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> LinePipelineConfig {
        self.config
    }

    #[inline]
    pub fn variant(&self) -> TransformVariant {
        self.config.variant
    }

    /// Switches the transform variant. The pipeline and its bindings are
    /// rebuilt on the next `render`.
    pub fn set_variant(&mut self, variant: TransformVariant) {
        if self.config.variant == variant {
            return;
        }
        log::info!(
            "line pipeline: {} -> {}",
            self.config.variant.label(),
            variant.label()
        );
        self.config.variant = variant;
        self.transform_ring = UniformRing::new(
            "scribble line transform ring",
            transform_block_size(variant),
        );
    }

    /// Encodes every draw of `batch` into one render pass over `target`,
    /// preserving its existing contents.
    ///
    /// May be called several times per frame; each batch is appended after
    /// the previous one in the instance and uniform buffers. Matrix batches
    /// within one frame must share their matrix.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        batch: &LineBatch,
    ) -> Result<(), LineError> {
        if batch.variant() != self.config.variant {
            return Err(LineError::VariantMismatch {
                expected: self.config.variant,
                found: batch.variant(),
            });
        }
        if batch.is_empty() {
            return Ok(());
        }

        self.cursor.begin(ctx.frame);
        let per_draw = self.config.variant.is_per_draw();
        if !per_draw {
            if let Some(matrix) = batch.matrix() {
                self.cursor.claim_matrix(matrix)?;
            }
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);

        let draws = batch.draws();
        let base = self.cursor.reserve(batch.instances().len(), draws.len());

        if let Some(bgl) = self.style_bgl.as_ref() {
            self.style_ring.ensure_capacity(ctx.device, bgl, self.cursor.draws());
        }
        let styles: Vec<LineStyleUniform> =
            draws.iter().map(|d| LineStyleUniform::from_style(&d.style)).collect();
        self.style_ring.write(ctx.queue, base.draw_base, &styles);

        if per_draw {
            if let Some(bgl) = self.transform_bgl.as_ref() {
                self.transform_ring.ensure_capacity(ctx.device, bgl, self.cursor.draws());
            }
            self.write_per_draw_transforms(ctx, base.draw_base, batch);
        } else if let Some(matrix) = batch.matrix() {
            self.write_matrix(ctx, matrix);
        }

        self.ensure_instance_capacity(ctx, self.cursor.instances());
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return Ok(()) };
        let instance_offset = (base.instance_base * size_of::<LineInstance>()) as u64;
        ctx.queue.write_buffer(
            instance_vbo,
            instance_offset,
            bytemuck::cast_slice(batch.instances()),
        );

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(()) };
        let Some(style_bg) = self.style_ring.bind_group() else { return Ok(()) };
        let transform_bg = if per_draw {
            self.transform_ring.bind_group()
        } else {
            self.matrix_bind_group.as_ref()
        };
        let Some(transform_bg) = transform_bg else { return Ok(()) };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return Ok(()) };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return Ok(()) };

        let mut rpass = target.color_pass(self.config.label, None);

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(instance_offset..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        if !per_draw {
            rpass.set_bind_group(1, transform_bg, &[]);
        }

        for (i, draw) in draws.iter().enumerate() {
            let slot = base.draw_base + i;
            rpass.set_bind_group(0, style_bg, &[self.style_ring.offset(slot)]);
            if per_draw {
                rpass.set_bind_group(1, transform_bg, &[self.transform_ring.offset(slot)]);
            }
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, draw.instances.clone());
        }

        Ok(())
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let variant = self.config.variant;
        if self.pipeline_format == Some(ctx.surface_format)
            && self.pipeline_variant == Some(variant)
            && self.pipeline.is_some()
        {
            return;
        }

        let source = shader_source(variant);
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scribble line shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let style_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scribble line style bgl"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                true,
                self.style_ring.binding_size(),
            )],
        });

        let transform_bgl =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scribble line transform bgl"),
                entries: &[uniform_entry(
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    variant.is_per_draw(),
                    NonZeroU64::new(transform_block_size(variant) as u64),
                )],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scribble line pipeline layout"),
            bind_group_layouts: &[&style_bgl, &transform_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.config.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), LineInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "built line pipeline ({}, {:?})",
            variant.label(),
            ctx.surface_format
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline_variant = Some(variant);
        self.pipeline = Some(pipeline);
        self.style_bgl = Some(style_bgl);
        self.transform_bgl = Some(transform_bgl);

        // Bind groups reference the old layouts.
        self.style_ring.invalidate();
        self.transform_ring.invalidate();
        self.matrix_ubo = None;
        self.matrix_bind_group = None;
        self.uploaded_matrix = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scribble line quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scribble line quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        let new_size = (new_cap * size_of::<LineInstance>()) as u64;
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scribble line instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }

    fn write_per_draw_transforms(&self, ctx: &RenderCtx<'_>, first_slot: usize, batch: &LineBatch) {
        match self.config.variant {
            TransformVariant::PanZoom => {
                let blocks: Vec<PanZoomUniform> = batch
                    .draws()
                    .iter()
                    .filter_map(|d| match &d.transform {
                        TransformParams::PanZoom(t) => Some(t.uniform()),
                        _ => None,
                    })
                    .collect();
                self.transform_ring.write(ctx.queue, first_slot, &blocks);
            }
            TransformVariant::Affine => {
                let blocks: Vec<AffineUniform> = batch
                    .draws()
                    .iter()
                    .filter_map(|d| match &d.transform {
                        TransformParams::Affine(t) => Some(t.uniform()),
                        _ => None,
                    })
                    .collect();
                self.transform_ring.write(ctx.queue, first_slot, &blocks);
            }
            TransformVariant::Matrix => {}
        }
    }

    /// Uploads the persistent matrix block, skipping the write when the
    /// matrix is unchanged since the last frame.
    fn write_matrix(&mut self, ctx: &RenderCtx<'_>, matrix: &MatrixTransform) {
        if self.matrix_ubo.is_none() || self.matrix_bind_group.is_none() {
            let Some(bgl) = self.transform_bgl.as_ref() else { return };
            let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("scribble line matrix ubo"),
                size: size_of::<MatrixUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("scribble line matrix bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                }],
            });
            self.matrix_ubo = Some(ubo);
            self.matrix_bind_group = Some(bind_group);
            self.uploaded_matrix = None;
        }

        if self.uploaded_matrix.as_ref() == Some(matrix) {
            return;
        }
        let Some(ubo) = self.matrix_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&matrix.uniform()));
        self.uploaded_matrix = Some(*matrix);
    }
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new(LinePipelineConfig::default())
    }
}

fn uniform_entry(
    visibility: wgpu::ShaderStages,
    has_dynamic_offset: bool,
    min_binding_size: Option<NonZeroU64>,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size,
        },
        count: None,
    }
}

/// The variant's prelude followed by the shared stage code.
fn shader_source(variant: TransformVariant) -> String {
    format!("{}\n{}", variant.wgsl_prelude(), include_str!("../shaders/line.wgsl"))
}

fn transform_block_size(variant: TransformVariant) -> usize {
    match variant {
        TransformVariant::Matrix => size_of::<MatrixUniform>(),
        TransformVariant::PanZoom => size_of::<PanZoomUniform>(),
        TransformVariant::Affine => size_of::<AffineUniform>(),
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// `LineStyle` in `line.wgsl` (32 bytes):
///
///  offset  0  color      [f32; 4]
///  offset 16  thickness  f32
///  offset 20  aa_border  f32
///  offset 24  _pad       [f32; 2]
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineStyleUniform {
    color: [f32; 4],
    thickness: f32,
    aa_border: f32,
    _pad: [f32; 2],
}

impl LineStyleUniform {
    fn from_style(style: &LineStyle) -> Self {
        Self {
            color: style.color.to_array(),
            thickness: style.thickness,
            aa_border: style.aa_border,
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Color;

    #[test]
    fn style_block_matches_wgsl_layout() {
        assert_eq!(size_of::<LineStyleUniform>(), 32);
        let u = LineStyleUniform::from_style(
            &LineStyle::new(0.25)
                .with_aa_border(0.01)
                .with_color(Color::new(1.0, 0.5, 0.0, 0.75)),
        );
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&u));
        assert_eq!(&floats[..6], &[1.0, 0.5, 0.0, 0.75, 0.25, 0.01]);
    }

    #[test]
    fn block_sizes_follow_variant() {
        assert_eq!(transform_block_size(TransformVariant::PanZoom), 16);
        assert_eq!(transform_block_size(TransformVariant::Affine), 48);
        assert_eq!(transform_block_size(TransformVariant::Matrix), 64);
    }

    #[test]
    fn set_variant_rebuilds_lazily() {
        let mut r = LineRenderer::new(LinePipelineConfig::new(TransformVariant::Matrix));
        r.set_variant(TransformVariant::Affine);
        assert_eq!(r.variant(), TransformVariant::Affine);
        assert_eq!(
            r.transform_ring.binding_size(),
            NonZeroU64::new(48)
        );
    }

    fn parse_and_validate(variant: TransformVariant) -> naga::Module {
        let source = shader_source(variant);
        let module = naga::front::wgsl::parse_str(&source)
            .unwrap_or_else(|e| panic!("{variant:?}: {}", e.emit_to_string(&source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{variant:?}: {e:?}"));
        module
    }

    fn struct_span(module: &naga::Module, name: &str) -> u32 {
        module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(n), naga::TypeInner::Struct { span, .. }) if n == name => Some(*span),
                _ => None,
            })
            .unwrap_or_else(|| panic!("struct {name} not found"))
    }

    #[test]
    fn composed_shaders_validate() {
        for variant in TransformVariant::ALL {
            let module = parse_and_validate(variant);
            let entry_points: Vec<&str> =
                module.entry_points.iter().map(|e| e.name.as_str()).collect();
            assert!(entry_points.contains(&"vs_main"), "{variant:?}");
            assert!(entry_points.contains(&"fs_main"), "{variant:?}");
        }
    }

    #[test]
    fn wgsl_blocks_match_host_layouts() {
        for variant in TransformVariant::ALL {
            let module = parse_and_validate(variant);
            assert_eq!(
                struct_span(&module, "TransformBlock") as usize,
                transform_block_size(variant),
                "{variant:?}"
            );
            assert_eq!(
                struct_span(&module, "LineStyle") as usize,
                size_of::<LineStyleUniform>(),
                "{variant:?}"
            );
        }
    }
}
