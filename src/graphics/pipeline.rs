use glam::{Mat2, Vec2};

use super::Flip;
use crate::world::Rect;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Screen position in pixels.
    pub position: [f32; 2],
    pub uv: [f32; 2],
    /// Multiplied with the sampled texel.
    pub color: [f32; 4],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,  // position
        1 => Float32x2,  // uv
        2 => Float32x4,  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Two triangles covering `dst`, rotated clockwise by `angle_degrees`
/// around its centre (Y points down, so a positive angle turns clockwise on
/// screen). Order: TL, BL, TR, TR, BL, BR.
pub fn quad_vertices(dst: Rect, angle_degrees: f64, flip: Flip, color: [f32; 4]) -> [QuadVertex; 6] {
    let [cx, cy] = dst.center();
    let center = Vec2::new(cx, cy);
    let hw = dst.w as f32 * 0.5;
    let hh = dst.h as f32 * 0.5;
    let rotation = Mat2::from_angle((angle_degrees as f32).to_radians());

    let corner = |x: f32, y: f32| -> [f32; 2] { (center + rotation * Vec2::new(x, y)).to_array() };

    let (u0, u1) = match flip {
        Flip::Horizontal | Flip::Both => (1.0, 0.0),
        _ => (0.0, 1.0),
    };
    let (v0, v1) = match flip {
        Flip::Vertical | Flip::Both => (1.0, 0.0),
        _ => (0.0, 1.0),
    };

    let tl = QuadVertex { position: corner(-hw, -hh), uv: [u0, v0], color };
    let tr = QuadVertex { position: corner( hw, -hh), uv: [u1, v0], color };
    let bl = QuadVertex { position: corner(-hw,  hh), uv: [u0, v1], color };
    let br = QuadVertex { position: corner( hw,  hh), uv: [u1, v1], color };
    [tl, bl, tr, tr, bl, br]
}

pub struct QuadPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub projection_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
}

pub fn create_quad_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
) -> QuadPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("quad_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
    });

    let projection_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("projection_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    // mat4x4<f32>
                    min_binding_size: wgpu::BufferSize::new(64),
                },
                count: None,
            }],
        });

    let texture_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("quad_pipeline_layout"),
        bind_group_layouts: &[&projection_bind_group_layout, &texture_bind_group_layout],
        ..Default::default()
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quad_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[QuadVertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    QuadPipeline {
        render_pipeline,
        projection_bind_group_layout,
        texture_bind_group_layout,
    }
}

/// Orthographic projection matrix (column-major) mapping pixel coords to clip space.
pub fn orthographic_projection(width: f32, height: f32) -> [f32; 16] {
    [
        2.0 / width, 0.0,           0.0, 0.0,
        0.0,         -2.0 / height, 0.0, 0.0,
        0.0,         0.0,           1.0, 0.0,
        -1.0,        1.0,           0.0, 1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-3 && (a[1] - b[1]).abs() < 1e-3
    }

    #[test]
    fn unrotated_quad_covers_rect() {
        let v = quad_vertices(Rect::new(10, 20, 30, 40), 0.0, Flip::None, WHITE);
        assert!(close(v[0].position, [10.0, 20.0]));
        assert!(close(v[1].position, [10.0, 60.0]));
        assert!(close(v[2].position, [40.0, 20.0]));
        assert!(close(v[5].position, [40.0, 60.0]));
        assert_eq!(v[0].uv, [0.0, 0.0]);
        assert_eq!(v[5].uv, [1.0, 1.0]);
    }

    #[test]
    fn quarter_turn_is_clockwise_on_screen() {
        // 90° clockwise with Y down: the top-left corner moves to the top-right.
        let v = quad_vertices(Rect::new(0, 0, 10, 10), 90.0, Flip::None, WHITE);
        assert!(close(v[0].position, [10.0, 0.0]), "{:?}", v[0].position);
    }

    #[test]
    fn horizontal_flip_swaps_u_only() {
        let v = quad_vertices(Rect::new(0, 0, 4, 4), 0.0, Flip::Horizontal, WHITE);
        assert_eq!(v[0].uv, [1.0, 0.0]);
        assert_eq!(v[5].uv, [0.0, 1.0]);
    }

    #[test]
    fn projection_maps_corners_to_clip_space() {
        let m = orthographic_projection(640.0, 480.0);
        // column-major: clip = M * (x, y, 0, 1)
        let apply = |x: f32, y: f32| [m[0] * x + m[4] * y + m[12], m[1] * x + m[5] * y + m[13]];
        assert!(close(apply(0.0, 0.0), [-1.0, 1.0]));
        assert!(close(apply(640.0, 480.0), [1.0, -1.0]));
    }
}
