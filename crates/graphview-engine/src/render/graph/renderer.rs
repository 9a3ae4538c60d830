use std::time::Duration;

use wgpu::util::DeviceExt;

use crate::camera::ViewProj;
use crate::graph::{EdgeInstance, GraphSource, NodeInstance};
use crate::render::common::{
    alpha_over_blend, edge_instance_layout, node_instance_layout, view_proj_binding_size,
    LineVertex, QuadVertex, EDGE_QUAD, NODE_QUAD,
};
use crate::render::pool::PoolStats;
use crate::render::shader;
use crate::render::{RenderCtx, RenderError, RenderTarget};

use super::combined::CombinedBuffer;
use super::depth::DepthTarget;
use super::plan::{DrawPass, DrawPlan};

/// Lifecycle of the graph renderer.
///
/// `GraphRenderer` itself only ever reports `Ready` or `Disposed`; the earlier
/// phases belong to whoever is waiting on the GPU to construct one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RendererPhase {
    Uninitialized,
    Initializing,
    Ready,
    Disposed,
}

/// Construction parameters for [`GraphRenderer`].
#[derive(Debug, Clone)]
pub struct RendererInit {
    /// Matrix the uniform buffer is seeded with.
    pub view_proj: ViewProj,
    /// Initial render target size in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Idle pooled buffers older than this are destroyed.
    pub pool_max_age: Duration,
    /// Frames between pool reclaims.
    pub reclaim_interval: u32,
}

impl Default for RendererInit {
    fn default() -> Self {
        Self {
            view_proj: ViewProj::IDENTITY,
            width: 1,
            height: 1,
            pool_max_age: Duration::from_secs(10),
            reclaim_interval: 60,
        }
    }
}

/// Instance stream currently held in the combined buffer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
struct StreamLayout {
    byte_len: u64,
    node_count: u32,
    edge_count: u32,
    edges_offset: u64,
}

/// Draws a graph as instanced discs (nodes) over width-extruded quads (edges).
///
/// Both pipelines read one combined instance buffer: node instances from
/// byte 0, edge instances from `edges_offset`.
pub struct GraphRenderer {
    phase: RendererPhase,

    node_pipeline: wgpu::RenderPipeline,
    edge_pipeline: wgpu::RenderPipeline,

    bind_group: wgpu::BindGroup,
    view_proj_ubo: wgpu::Buffer,

    quad_vbo: wgpu::Buffer,
    line_vbo: wgpu::Buffer,

    depth: DepthTarget,

    combined: CombinedBuffer<wgpu::Device>,
    stream: StreamLayout,

    pool_max_age: Duration,
    reclaim_interval: u32,
    frames: u64,
}

impl GraphRenderer {
    /// Builds both pipelines and, when `initial` is given, uploads its
    /// instance stream into a freshly sized combined buffer.
    pub fn new(
        ctx: &RenderCtx<'_>,
        init: RendererInit,
        initial: Option<&dyn GraphSource>,
    ) -> Result<Self, RenderError> {
        let vertex_src = shader::vertex_source()?;
        let fragment_src = shader::fragment_source()?;

        let vertex_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("graphview vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fragment_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("graphview fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("graphview view-proj bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(view_proj_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("graphview pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let stages = Stages {
            layout: &pipeline_layout,
            vertex: &vertex_module,
            fragment: &fragment_module,
            format: ctx.surface_format,
        };
        let edge_pipeline = stages.build(
            ctx.device,
            "graphview edge pipeline",
            ("vs_edge", "fs_edge"),
            &[edge_instance_layout(), LineVertex::layout()],
            wgpu::PrimitiveTopology::TriangleStrip,
        );
        let node_pipeline = stages.build(
            ctx.device,
            "graphview node pipeline",
            ("vs_node", "fs_node"),
            &[node_instance_layout(), QuadVertex::layout()],
            wgpu::PrimitiveTopology::TriangleList,
        );

        let view_proj_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("graphview view-proj ubo"),
            contents: bytemuck::bytes_of(&init.view_proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("graphview view-proj bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_proj_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("graphview node quad vbo"),
            contents: bytemuck::cast_slice(&NODE_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let line_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("graphview edge quad vbo"),
            contents: bytemuck::cast_slice(&EDGE_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth = DepthTarget::new(ctx.device, init.width, init.height);

        log::info!(
            "graph renderer ready ({:?}, {}x{})",
            ctx.surface_format,
            init.width,
            init.height
        );

        let mut renderer = Self {
            phase: RendererPhase::Ready,
            node_pipeline,
            edge_pipeline,
            bind_group,
            view_proj_ubo,
            quad_vbo,
            line_vbo,
            depth,
            combined: CombinedBuffer::new(ctx.device.clone()),
            stream: StreamLayout::default(),
            pool_max_age: init.pool_max_age,
            reclaim_interval: init.reclaim_interval.max(1),
            frames: 0,
        };

        if let Some(source) = initial {
            renderer.upload_source(ctx, source)?;
        }
        Ok(renderer)
    }

    #[inline]
    pub fn phase(&self) -> RendererPhase {
        self.phase
    }

    /// Byte capacity of the combined instance buffer (0 before the first upload).
    pub fn capacity(&self) -> u64 {
        self.combined.capacity()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.combined.pool_stats()
    }

    /// Writes a full instance stream into the combined buffer.
    ///
    /// The buffer is swapped for a larger pooled one when `data` outgrows it;
    /// the old one goes back to the pool. Contents are never carried over.
    pub fn upload_graph(
        &mut self,
        ctx: &RenderCtx<'_>,
        data: &[f32],
        edges_offset: u64,
        node_count: u32,
        edge_count: u32,
    ) -> Result<(), RenderError> {
        if self.phase == RendererPhase::Disposed {
            return Err(RenderError::Disposed);
        }

        let bytes: &[u8] = bytemuck::cast_slice(data);
        let stream = StreamLayout {
            byte_len: bytes.len() as u64,
            node_count,
            edge_count,
            edges_offset,
        };
        stream.validate()?;

        self.combined.reserve(stream.byte_len)?;
        if let Some(combined) = self.combined.buffer()
            && !bytes.is_empty()
        {
            ctx.queue.write_buffer(combined, 0, bytes);
        }

        self.stream = stream;
        Ok(())
    }

    fn upload_source(
        &mut self,
        ctx: &RenderCtx<'_>,
        source: &dyn GraphSource,
    ) -> Result<(), RenderError> {
        self.upload_graph(
            ctx,
            source.instance_data(),
            source.edges_offset(),
            source.node_count(),
            source.edge_count(),
        )
    }

    pub fn update_view_projection(&self, ctx: &RenderCtx<'_>, view_proj: &ViewProj) {
        if self.phase == RendererPhase::Disposed {
            return;
        }
        ctx.queue
            .write_buffer(&self.view_proj_ubo, 0, bytemuck::bytes_of(view_proj));
    }

    /// Recreates the depth texture for a new target size.
    pub fn resize(&mut self, ctx: &RenderCtx<'_>, width: u32, height: u32) {
        if self.phase == RendererPhase::Disposed || !self.depth.is_stale(width, height) {
            return;
        }
        self.depth = DepthTarget::new(ctx.device, width, height);
        log::debug!("depth target resized to {:?}", self.depth.extent());
    }

    /// Uploads `source` and encodes one pass: edges, then nodes.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        source: &dyn GraphSource,
    ) -> Result<(), RenderError> {
        if self.phase == RendererPhase::Disposed {
            log::warn!("draw on a disposed graph renderer ignored");
            return Ok(());
        }

        self.upload_source(ctx, source)?;

        if self.depth.is_stale(target.width, target.height) {
            self.resize(ctx, target.width, target.height);
        }

        let plan = DrawPlan::new(
            self.stream.node_count,
            self.stream.edge_count,
            self.stream.edges_offset,
        );

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("graphview graph pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(combined) = self.combined.buffer() {
                rpass.set_bind_group(0, &self.bind_group, &[]);

                for call in plan.calls() {
                    let (pipeline, geometry) = match call.pass {
                        DrawPass::Edges => (&self.edge_pipeline, &self.line_vbo),
                        DrawPass::Nodes => (&self.node_pipeline, &self.quad_vbo),
                    };
                    rpass.set_pipeline(pipeline);
                    rpass.set_vertex_buffer(0, combined.slice(call.bytes.clone()));
                    rpass.set_vertex_buffer(1, geometry.slice(..));
                    rpass.draw(call.vertices.clone(), call.instances.clone());
                }
            }
        }

        self.frames += 1;
        if self.frames % self.reclaim_interval as u64 == 0 {
            if self.combined.reclaim(self.pool_max_age) > 0 {
                log::debug!("buffer pool: {}", self.combined.pool_stats());
            }
        }

        Ok(())
    }

    /// Returns the combined buffer to the pool and destroys everything pooled.
    pub fn dispose(&mut self) {
        if self.phase == RendererPhase::Disposed {
            return;
        }
        self.combined.dispose();
        self.stream = StreamLayout::default();
        self.phase = RendererPhase::Disposed;
        log::info!("graph renderer disposed");
    }
}

impl StreamLayout {
    fn validate(&self) -> Result<(), RenderError> {
        let nodes_end = self.node_count as u64 * NodeInstance::STRIDE;
        let edges_end = self
            .edges_offset
            .saturating_add(self.edge_count as u64 * EdgeInstance::STRIDE);

        if nodes_end > self.edges_offset || edges_end > self.byte_len {
            return Err(RenderError::StreamMismatch {
                node_count: self.node_count,
                edge_count: self.edge_count,
                edges_offset: self.edges_offset,
                byte_len: self.byte_len,
            });
        }
        Ok(())
    }
}

// ── pipeline construction ─────────────────────────────────────────────────

struct Stages<'a> {
    layout: &'a wgpu::PipelineLayout,
    vertex: &'a wgpu::ShaderModule,
    fragment: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
}

impl Stages<'_> {
    fn build(
        &self,
        device: &wgpu::Device,
        label: &str,
        (vs_entry, fs_entry): (&str, &str),
        buffers: &[wgpu::VertexBufferLayout<'_>],
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(self.layout),
            vertex: wgpu::VertexState {
                module: self.vertex,
                entry_point: Some(vs_entry),
                compilation_options: Default::default(),
                buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: self.fragment,
                entry_point: Some(fs_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(alpha_over_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTarget::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(nodes: u32, edges: u32, offset: u64, len: u64) -> StreamLayout {
        StreamLayout {
            byte_len: len,
            node_count: nodes,
            edge_count: edges,
            edges_offset: offset,
        }
    }

    #[test]
    fn consistent_streams_validate() {
        assert!(layout(0, 0, 0, 0).validate().is_ok());
        assert!(layout(3, 2, 84, 84 + 72).validate().is_ok());
        // Trailing slack is fine.
        assert!(layout(1, 0, 28, 64).validate().is_ok());
    }

    #[test]
    fn overlapping_or_short_streams_are_rejected() {
        assert!(matches!(
            layout(3, 2, 56, 200).validate(),
            Err(RenderError::StreamMismatch { .. })
        ));
        assert!(matches!(
            layout(3, 2, 84, 100).validate(),
            Err(RenderError::StreamMismatch { .. })
        ));
    }

    #[test]
    fn default_init_reclaims_periodically() {
        let init = RendererInit::default();
        assert_eq!(init.view_proj, ViewProj::IDENTITY);
        assert!(init.reclaim_interval > 0);
        assert!(init.pool_max_age > Duration::ZERO);
    }
}
