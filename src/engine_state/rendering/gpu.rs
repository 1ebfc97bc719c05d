//! # GPU Chunk Renderer
//!
//! wgpu-backed [`ChunkRenderer`]. Each uploaded mesh gets its own `VERTEX` buffer,
//! laid out as [`Vertex::desc`](super::Vertex::desc) describes and drawn as a
//! non-indexed triangle list. Releasing a handle destroys the buffer immediately
//! rather than waiting for the last reference to drop.
//!
//! The device is requested headless (no surface); presenting is left to whoever
//! owns the window.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, info, warn};
use wgpu::util::DeviceExt;
use wgpu::{Buffer, Device};

use super::{ChunkRenderer, Mesh, MeshHandle};
use crate::error::TerrainError;

/// Renderer that uploads chunk meshes into wgpu vertex buffers.
pub struct GpuChunkRenderer {
    /// Device buffers are created on
    device: Device,
    /// Vertex buffers of live meshes by handle
    meshes: HashMap<MeshHandle, Buffer>,
    /// Next handle id
    next_handle: u64,
}

impl GpuChunkRenderer {
    /// Wraps an existing device.
    pub fn new(device: Device) -> Self {
        GpuChunkRenderer {
            device,
            meshes: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Acquires a headless adapter and device.
    ///
    /// # Errors
    /// [`TerrainError::Gpu`] when no adapter is available or the device request fails.
    pub fn request_headless() -> Result<Self, TerrainError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        pollster::block_on(async {
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .map_err(|e| TerrainError::Gpu(e.to_string()))?;

            info!("using adapter {:?}", adapter.get_info().name);

            let (device, _queue) = adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("voxel terrain device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                    trace: wgpu::Trace::Off,
                })
                .await
                .map_err(|e| TerrainError::Gpu(e.to_string()))?;

            Ok(GpuChunkRenderer::new(device))
        })
    }
}

impl ChunkRenderer for GpuChunkRenderer {
    fn upload_mesh(&mut self, origin: Point3<i32>, mesh: &Mesh) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;

        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Vertex Buffer"),
                contents: mesh.as_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });

        debug!(
            "uploaded {:?} for chunk {:?}: {} vertices",
            handle,
            origin,
            mesh.vertex_count()
        );
        self.meshes.insert(handle, buffer);
        handle
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        match self.meshes.remove(&handle) {
            Some(buffer) => buffer.destroy(),
            None => warn!("release of unknown mesh handle {:?}", handle),
        }
    }

    fn live_meshes(&self) -> usize {
        self.meshes.len()
    }
}
