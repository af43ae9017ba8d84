//! GPU-accelerated construction passes.
//!
//! ## Purpose
//!
//! This module runs sector assignment and sample permutation as `wgpu` compute
//! shaders. Both stages are embarrassingly parallel: one invocation per sample,
//! each reading its own inputs and writing its own output slot. The sort stays
//! on the host (rayon), since it is the single global barrier.
//!
//! ## Design notes
//!
//! * **Precision**: The shader maps coordinates in `f32`. Samples whose
//!   scaled coordinate lies within `f32` rounding of a sector boundary are
//!   reassigned on the host in `T`, so the pass matches the sequential one
//!   bit for bit.
//! * **Lossless permutation**: Values cross the device as the two 32-bit words
//!   of their `f64` bit pattern. The permutation only moves words, so `f32` and
//!   `f64` trajectories come back bit-exact.
//! * **Persistent executor**: Device, pipelines and buffers live in a
//!   thread-local executor and are grown on demand.
//! * **Failures**: Adapter, device or readback failures surface as
//!   `NufftError::Backend`; construction aborts without retry.

use bytemuck::{Pod, Zeroable};
use num_traits::Float;
use pollster::block_on;
use rayon::prelude::*;
use std::cell::RefCell;

// Export dependencies from nufft crate
use nufft::internals::algorithms::assignment::assign_sample;
use nufft::internals::algorithms::permutation::PermutedSamples;
use nufft::internals::primitives::dimensions::Dimensions;
use nufft::internals::primitives::errors::NufftError;

use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, Buffer, BufferBindingType, BufferDescriptor, BufferUsages,
    CommandEncoderDescriptor, ComputePassDescriptor, ComputePipeline, ComputePipelineDescriptor,
    Device, Instance, InstanceDescriptor, MapMode, PipelineLayoutDescriptor, PollType, Queue,
    RequestAdapterOptions, ShaderModule, ShaderModuleDescriptor, ShaderSource, ShaderStages,
};

// -----------------------------------------------------------------------------
// Shader Sources (WGSL)
// -----------------------------------------------------------------------------
const ASSIGN_SHADER: &str = r#"
struct Config {
    n: u32,
    components: u32,
    sector_w: u32,
    sector_h: u32,
    sector_d: u32,
    pad0: u32,
    pad1: u32,
    pad2: u32,
}

@group(0) @binding(0) var<uniform> config: Config;
@group(0) @binding(1) var<storage, read> coords: array<f32>;
@group(0) @binding(2) var<storage, read_write> sectors: array<u32>;

fn sector_mapping(coord: f32, count: u32) -> u32 {
    if (count == 0u) {
        return 0u;
    }
    let scaled = floor((coord + 0.5) * f32(count));
    if (!(scaled > 0.0)) {
        return 0u;
    }
    let last = count - 1u;
    if (scaled >= f32(last)) {
        return last;
    }
    return u32(scaled);
}

@compute @workgroup_size(64)
fn assign_sectors(
    @builtin(global_invocation_id) global_id: vec3<u32>,
    @builtin(num_workgroups) groups: vec3<u32>
) {
    let i = global_id.x + global_id.y * groups.x * 64u;
    let n = config.n;
    if (i >= n) {
        return;
    }

    let x = sector_mapping(coords[i], config.sector_w);
    let y = sector_mapping(coords[i + n], config.sector_h);
    var z = 0u;
    if (config.components == 3u) {
        z = sector_mapping(coords[i + 2u * n], config.sector_d);
    }
    sectors[i] = x + config.sector_w * (y + config.sector_h * z);
}
"#;

const PERMUTE_SHADER: &str = r#"
struct Config {
    n: u32,
    components: u32,
    sector_w: u32,
    sector_h: u32,
    sector_d: u32,
    pad0: u32,
    pad1: u32,
    pad2: u32,
}

@group(0) @binding(0) var<uniform> config: Config;
@group(0) @binding(1) var<storage, read> indices: array<u32>;
@group(0) @binding(2) var<storage, read> words_in: array<u32>;
@group(0) @binding(3) var<storage, read_write> words_out: array<u32>;

@compute @workgroup_size(64)
fn permute_samples(
    @builtin(global_invocation_id) global_id: vec3<u32>,
    @builtin(num_workgroups) groups: vec3<u32>
) {
    let k = global_id.x + global_id.y * groups.x * 64u;
    let n = config.n;
    if (k >= n) {
        return;
    }

    let src = indices[k];
    for (var c = 0u; c < config.components; c = c + 1u) {
        let src_word = 2u * (c * n + src);
        let dst_word = 2u * (c * n + k);
        words_out[dst_word] = words_in[src_word];
        words_out[dst_word + 1u] = words_in[src_word + 1u];
    }
}
"#;

const WORKGROUP_SIZE: u32 = 64;
/// Bound on the `f32` error of `(coord + 0.5) * count`, in units of epsilon.
const BOUNDARY_ULPS: f64 = 8.0;
const MAX_GROUPS_PER_DIM: u32 = 65_535;

thread_local! {
    static THREAD_EXECUTOR: RefCell<Option<GpuExecutor>> = const { RefCell::new(None) };
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct GpuConfig {
    n: u32,
    components: u32,
    sector_w: u32,
    sector_h: u32,
    sector_d: u32,
    padding: [u32; 3],
}

struct GpuExecutor {
    device: Device,
    queue: Queue,

    // Pipelines
    assign_pipeline: ComputePipeline,
    permute_pipeline: ComputePipeline,
    assign_layout: BindGroupLayout,
    permute_layout: BindGroupLayout,

    // Buffers
    config_buffer: Buffer,
    coords_buffer: Option<Buffer>,
    sectors_buffer: Option<Buffer>,
    indices_buffer: Option<Buffer>,
    words_in_buffer: Option<Buffer>,
    words_out_buffer: Option<Buffer>,

    // Staging
    staging_buffer: Option<Buffer>,
}

fn backend_error(msg: impl Into<String>) -> NufftError {
    NufftError::Backend(msg.into())
}

fn storage_entry(binding: u32, read_only: bool) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn to_u32(value: usize, what: &str) -> Result<u32, NufftError> {
    u32::try_from(value).map_err(|_| backend_error(format!("{what} ({value}) exceeds u32 range")))
}

impl GpuExecutor {
    async fn new() -> Result<Self, NufftError> {
        let instance = Instance::new(&InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&RequestAdapterOptions::default())
            .await
            .map_err(|_| backend_error("No GPU adapter found"))?;

        let (device, queue): (Device, Queue) = adapter
            .request_device(&Default::default())
            .await
            .map_err(|e| backend_error(format!("Device error: {:?}", e)))?;

        let assign_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Sector Assignment Shader"),
            source: ShaderSource::Wgsl(ASSIGN_SHADER.into()),
        });
        let permute_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Sample Permutation Shader"),
            source: ShaderSource::Wgsl(PERMUTE_SHADER.into()),
        });

        // Layouts
        let assign_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Assign Data"),
            entries: &[
                uniform_entry(0),
                storage_entry(1, true),
                storage_entry(2, false),
            ],
        });
        let permute_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Permute Data"),
            entries: &[
                uniform_entry(0),
                storage_entry(1, true),
                storage_entry(2, true),
                storage_entry(3, false),
            ],
        });

        let create_pipeline = |entry: &str, layout: &BindGroupLayout, module: &ShaderModule| {
            let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(entry),
                bind_group_layouts: &[layout],
                ..Default::default()
            });
            device.create_compute_pipeline(&ComputePipelineDescriptor {
                label: Some(entry),
                layout: Some(&pipeline_layout),
                module,
                entry_point: Some(entry),
                compilation_options: Default::default(),
                cache: None,
            })
        };
        let assign_pipeline = create_pipeline("assign_sectors", &assign_layout, &assign_shader);
        let permute_pipeline =
            create_pipeline("permute_samples", &permute_layout, &permute_shader);

        let config_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("Config"),
            size: size_of::<GpuConfig>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            device,
            queue,
            assign_pipeline,
            permute_pipeline,
            assign_layout,
            permute_layout,
            config_buffer,
            coords_buffer: None,
            sectors_buffer: None,
            indices_buffer: None,
            words_in_buffer: None,
            words_out_buffer: None,
            staging_buffer: None,
        })
    }

    fn ensure_buffer_capacity(
        device: &Device,
        label: &str,
        buffer_opt: &mut Option<Buffer>,
        size_required: u64,
        usage: BufferUsages,
    ) {
        // Bindings must not be empty
        let size_required = size_required.max(4);
        if let Some(buffer) = buffer_opt.as_ref() {
            if buffer.size() < size_required {
                *buffer_opt = None;
            }
        }

        if buffer_opt.is_none() {
            *buffer_opt = Some(device.create_buffer(&BufferDescriptor {
                label: Some(label),
                size: size_required,
                usage,
                mapped_at_creation: false,
            }));
        }
    }

    fn dispatch(
        &self,
        label: &str,
        pipeline: &ComputePipeline,
        bind_group: &BindGroup,
        invocations: u32,
    ) {
        let groups = invocations.div_ceil(WORKGROUP_SIZE);
        let groups_x = groups.clamp(1, MAX_GROUPS_PER_DIM);
        let groups_y = groups.div_ceil(groups_x).max(1);

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some(label),
            });
        {
            let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor::default());
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        self.queue.submit(Some(encoder.finish()));
    }

    fn assign(
        &mut self,
        coords: &[f32],
        samples: usize,
        components: usize,
        sector_dims: &Dimensions,
    ) -> Result<Vec<u32>, NufftError> {
        let config = GpuConfig {
            n: to_u32(samples, "sample count")?,
            components: to_u32(components, "component count")?,
            sector_w: to_u32(sector_dims.width, "sector grid width")?,
            sector_h: to_u32(sector_dims.height, "sector grid height")?,
            sector_d: to_u32(sector_dims.depth, "sector grid depth")?,
            padding: [0; 3],
        };
        let n_bytes = (samples * 4) as u64;

        Self::ensure_buffer_capacity(
            &self.device,
            "Coordinates",
            &mut self.coords_buffer,
            (coords.len() * 4) as u64,
            BufferUsages::STORAGE | BufferUsages::COPY_DST,
        );
        Self::ensure_buffer_capacity(
            &self.device,
            "Sectors",
            &mut self.sectors_buffer,
            n_bytes,
            BufferUsages::STORAGE | BufferUsages::COPY_SRC,
        );
        self.ensure_staging_capacity(n_bytes);

        let (Some(coords_buffer), Some(sectors_buffer)) =
            (self.coords_buffer.as_ref(), self.sectors_buffer.as_ref())
        else {
            return Err(backend_error("assignment buffers unavailable"));
        };

        self.queue
            .write_buffer(&self.config_buffer, 0, bytemuck::bytes_of(&config));
        self.queue
            .write_buffer(coords_buffer, 0, bytemuck::cast_slice(coords));

        let bind_group = self.device.create_bind_group(&BindGroupDescriptor {
            label: Some("Assign Bind Group"),
            layout: &self.assign_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: self.config_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: coords_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: sectors_buffer.as_entire_binding(),
                },
            ],
        });

        self.dispatch("Sector Assignment", &self.assign_pipeline, &bind_group, config.n);
        block_on(self.download_words(sectors_buffer, samples))
    }

    fn permute(
        &mut self,
        words: &[u32],
        components: usize,
        indices: &[u32],
    ) -> Result<Vec<u32>, NufftError> {
        let samples = indices.len();
        let config = GpuConfig {
            n: to_u32(samples, "sample count")?,
            components: to_u32(components, "component count")?,
            sector_w: 0,
            sector_h: 0,
            sector_d: 0,
            padding: [0; 3],
        };
        let words_bytes = (words.len() * 4) as u64;

        Self::ensure_buffer_capacity(
            &self.device,
            "Indices",
            &mut self.indices_buffer,
            (samples * 4) as u64,
            BufferUsages::STORAGE | BufferUsages::COPY_DST,
        );
        Self::ensure_buffer_capacity(
            &self.device,
            "Words In",
            &mut self.words_in_buffer,
            words_bytes,
            BufferUsages::STORAGE | BufferUsages::COPY_DST,
        );
        Self::ensure_buffer_capacity(
            &self.device,
            "Words Out",
            &mut self.words_out_buffer,
            words_bytes,
            BufferUsages::STORAGE | BufferUsages::COPY_SRC,
        );
        self.ensure_staging_capacity(words_bytes);

        let (Some(indices_buffer), Some(words_in_buffer), Some(words_out_buffer)) = (
            self.indices_buffer.as_ref(),
            self.words_in_buffer.as_ref(),
            self.words_out_buffer.as_ref(),
        ) else {
            return Err(backend_error("permutation buffers unavailable"));
        };

        self.queue
            .write_buffer(&self.config_buffer, 0, bytemuck::bytes_of(&config));
        self.queue
            .write_buffer(indices_buffer, 0, bytemuck::cast_slice(indices));
        self.queue
            .write_buffer(words_in_buffer, 0, bytemuck::cast_slice(words));

        let bind_group = self.device.create_bind_group(&BindGroupDescriptor {
            label: Some("Permute Bind Group"),
            layout: &self.permute_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: self.config_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: indices_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 2,
                    resource: words_in_buffer.as_entire_binding(),
                },
                BindGroupEntry {
                    binding: 3,
                    resource: words_out_buffer.as_entire_binding(),
                },
            ],
        });

        self.dispatch("Sample Permutation", &self.permute_pipeline, &bind_group, config.n);
        block_on(self.download_words(words_out_buffer, words.len()))
    }

    fn ensure_staging_capacity(&mut self, size: u64) {
        Self::ensure_buffer_capacity(
            &self.device,
            "Staging",
            &mut self.staging_buffer,
            size,
            BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        );
    }

    async fn download_words(&self, buf: &Buffer, words: usize) -> Result<Vec<u32>, NufftError> {
        let size = (words * 4) as u64;
        let Some(staging) = self.staging_buffer.as_ref() else {
            return Err(backend_error("staging buffer unavailable"));
        };

        let mut encoder = self.device.create_command_encoder(&Default::default());
        encoder.copy_buffer_to_buffer(buf, 0, staging, 0, size);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..size);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        slice.map_async(MapMode::Read, move |v| {
            let _ = tx.send(v);
        });
        self.device
            .poll(PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| backend_error(format!("Device poll failed: {:?}", e)))?;

        match rx.receive().await {
            Some(Ok(())) => {
                let data = slice.get_mapped_range();
                let ret = bytemuck::cast_slice(&data).to_vec();
                drop(data);
                staging.unmap();
                Ok(ret)
            }
            _ => Err(backend_error("Failed to map readback buffer")),
        }
    }
}

/// Run `f` on the thread's executor, creating it on first use.
fn with_executor<R>(
    f: impl FnOnce(&mut GpuExecutor) -> Result<R, NufftError>,
) -> Result<R, NufftError> {
    THREAD_EXECUTOR.with(|cell| {
        let mut opt = cell.borrow_mut();
        if opt.is_none() {
            *opt = Some(block_on(GpuExecutor::new())?);
        }
        match opt.as_mut() {
            Some(exec) => f(exec),
            None => Err(backend_error("GPU executor unavailable")),
        }
    })
}

// ============================================================================
// GPU Passes
// ============================================================================

/// Assign every sample to its sector on the GPU.
pub fn assign_pass_gpu<T>(
    coords: &[T],
    samples: usize,
    sector_dims: &Dimensions,
) -> Result<Vec<usize>, NufftError>
where
    T: Float + Send + Sync,
{
    if samples == 0 {
        return Ok(Vec::new());
    }
    let components = if sector_dims.is_2d() { 2 } else { 3 };

    let coords_f32: Vec<f32> = coords
        .iter()
        .map(|v| v.to_f32().unwrap_or(f32::NAN))
        .collect();

    let sectors = with_executor(|exec| exec.assign(&coords_f32, samples, components, sector_dims))?;
    let mut sectors: Vec<usize> = sectors.into_iter().map(|s| s as usize).collect();
    refine_boundary_samples(coords, samples, sector_dims, &mut sectors);
    Ok(sectors)
}

/// Whether the `f32` mapping of `coord` onto `sector_count` sectors may floor
/// to a different sector than the host mapping in `T`.
pub fn near_sector_boundary<T: Float>(coord: T, sector_count: usize) -> bool {
    if sector_count == 0 {
        return false;
    }
    let (Some(c), Some(c32)) = (coord.to_f64(), coord.to_f32()) else {
        return true;
    };
    if !c32.is_finite() {
        return true;
    }

    let count = sector_count as f64;
    let scaled = (c + 0.5) * count;
    // Rounding of the cast, the shift and the product
    let bound = BOUNDARY_ULPS * f64::from(f32::EPSILON) * (count * (c.abs() + 0.5) + scaled.abs());
    (scaled - scaled.round()).abs() <= bound
}

/// Recompute on the host every sample the device may have mapped across a
/// boundary. Returns the number of reassigned samples.
pub fn refine_boundary_samples<T>(
    coords: &[T],
    samples: usize,
    sector_dims: &Dimensions,
    sectors: &mut [usize],
) -> usize
where
    T: Float + Send + Sync,
{
    let counts = [sector_dims.width, sector_dims.height, sector_dims.depth];
    let components = if sector_dims.is_2d() { 2 } else { 3 };

    sectors
        .par_iter_mut()
        .enumerate()
        .filter(|(i, _)| {
            (0..components).any(|c| near_sector_boundary(coords[i + c * samples], counts[c]))
        })
        .map(|(i, sector)| *sector = assign_sample(coords, samples, i, sector_dims))
        .count()
}

/// Reorder the trajectory on the GPU; density is gathered on the host.
pub fn permute_pass_gpu<T>(
    trajectory: &[T],
    components: usize,
    density: Option<&[T]>,
    indices: &[usize],
) -> Result<PermutedSamples<T>, NufftError>
where
    T: Float + Send + Sync,
{
    let n = indices.len();
    let density = density.map(|d| indices.par_iter().map(|&i| d[i]).collect());
    if n == 0 {
        return Ok(PermutedSamples {
            trajectory: Vec::new(),
            density,
        });
    }

    let indices_u32 = indices
        .iter()
        .map(|&i| to_u32(i, "sample index"))
        .collect::<Result<Vec<u32>, NufftError>>()?;

    // Two words per value: low then high half of the f64 bit pattern
    let words: Vec<u32> = trajectory[..n * components]
        .iter()
        .flat_map(|v| {
            let bits = v.to_f64().unwrap_or(f64::NAN).to_bits();
            [bits as u32, (bits >> 32) as u32]
        })
        .collect();

    let sorted_words = with_executor(|exec| exec.permute(&words, components, &indices_u32))?;

    let sorted = sorted_words
        .chunks_exact(2)
        .map(|w| {
            let bits = (w[0] as u64) | ((w[1] as u64) << 32);
            T::from(f64::from_bits(bits))
                .ok_or_else(|| backend_error("permuted value not representable"))
        })
        .collect::<Result<Vec<T>, NufftError>>()?;

    Ok(PermutedSamples {
        trajectory: sorted,
        density,
    })
}
