//! The fixed triangle, its shader program and the per-draw parameter block.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec4};
use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::GpuError;
use crate::pose::Pose;

/// WGSL for the particle program (`vs_main` / `fs_main`).
pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

/// The triangle every particle draws, centered on the origin.
pub const TRIANGLE_VERTICES: [[f32; 2]; 3] = [[-1.0, -1.0], [0.0, 1.0], [1.0, -1.0]];

/// Per-draw parameters, laid out to match `ParticleUniforms` in WGSL.
///
/// `mat3x3<f32>` columns are 16-byte aligned, hence the padded columns.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub transform: [[f32; 4]; 3],
    pub color: [f32; 4],
    pub age_fraction: f32,
    pub _padding: [f32; 3],
}

impl ParticleUniforms {
    /// Size of the block as bound in the shader.
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Build the block from a composed transform.
    pub fn new(transform: Mat3, color: Vec4, age_fraction: f32) -> Self {
        let cols = transform.to_cols_array_2d();
        Self {
            transform: cols.map(|[x, y, z]| [x, y, z, 0.0]),
            color: color.to_array(),
            age_fraction,
            _padding: [0.0; 3],
        }
    }

    /// Parameters for drawing a particle of base `color` at `pose`.
    pub fn from_pose(pose: &Pose, color: Vec4) -> Self {
        Self::new(pose.matrix(), color, pose.age_fraction)
    }

    /// The transform as a glam matrix.
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_cols_array_2d(&self.transform.map(|[x, y, z, _]| [x, y, z]))
    }

    /// Opacity the fragment stage will output.
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age_fraction) * self.color[3]
    }
}

/// Parse and validate WGSL before it reaches the GPU.
pub fn validate_wgsl(source: &str, stage: &'static str) -> Result<(), GpuError> {
    let module = wgsl::parse_str(source).map_err(|err| GpuError::ShaderCompilation {
        stage,
        message: err.emit_to_string(source),
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator
        .validate(&module)
        .map_err(|err| GpuError::ShaderCompilation {
            stage,
            message: format!("{}", err),
        })?;

    Ok(())
}

/// Validate the built-in particle program.
pub fn validate() -> Result<(), GpuError> {
    validate_wgsl(SHADER_SOURCE, "Particle")
}
