//! The rendering boundary.
//!
//! A backend is already initialized when the frame driver receives it. Per
//! frame it is asked to clear, then for every live particle to take a
//! parameter block and draw the fixed triangle once. None of that can fail.

use crate::shader::ParticleUniforms;

/// Draw target for the frame driver.
pub trait RenderBackend {
    /// Start a new frame on a cleared target.
    fn clear_frame(&mut self);

    /// Set the parameter block used by the next [`draw_triangle`](Self::draw_triangle).
    fn set_uniforms(&mut self, uniforms: &ParticleUniforms);

    /// Draw the fixed triangle once with the current parameters.
    fn draw_triangle(&mut self);
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn clear_frame(&mut self) {
        (**self).clear_frame();
    }

    fn set_uniforms(&mut self, uniforms: &ParticleUniforms) {
        (**self).set_uniforms(uniforms);
    }

    fn draw_triangle(&mut self) {
        (**self).draw_triangle();
    }
}

/// What a [`RecordingBackend`] saw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Draw(ParticleUniforms),
}

/// Headless backend that keeps a log of the current frame.
///
/// The log is reset on every [`clear_frame`](RenderBackend::clear_frame), so
/// after a tick it holds exactly that frame's commands.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
    current: ParticleUniforms,
    frames: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the most recent frame, starting with its `Clear`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Parameter blocks drawn in the most recent frame, in draw order.
    pub fn draws(&self) -> impl Iterator<Item = &ParticleUniforms> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Draw(uniforms) => Some(uniforms),
            DrawCommand::Clear => None,
        })
    }

    /// Number of frames cleared so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderBackend for RecordingBackend {
    fn clear_frame(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.frames += 1;
    }

    fn set_uniforms(&mut self, uniforms: &ParticleUniforms) {
        self.current = *uniforms;
    }

    fn draw_triangle(&mut self) {
        self.commands.push(DrawCommand::Draw(self.current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Vec4};

    #[test]
    fn test_recording_resets_per_frame() {
        let mut backend = RecordingBackend::new();
        let uniforms = ParticleUniforms::new(Mat3::IDENTITY, Vec4::ONE, 0.5);

        backend.clear_frame();
        backend.set_uniforms(&uniforms);
        backend.draw_triangle();
        backend.draw_triangle();
        assert_eq!(backend.commands().len(), 3);
        assert_eq!(backend.draws().count(), 2);

        backend.clear_frame();
        assert_eq!(backend.commands(), &[DrawCommand::Clear]);
        assert_eq!(backend.frames(), 2);
    }

    #[test]
    fn test_draw_uses_latest_uniforms() {
        let mut backend = RecordingBackend::new();
        let first = ParticleUniforms::new(Mat3::IDENTITY, Vec4::ONE, 0.1);
        let second = ParticleUniforms::new(Mat3::IDENTITY, Vec4::ONE, 0.9);

        backend.clear_frame();
        backend.set_uniforms(&first);
        backend.draw_triangle();
        backend.set_uniforms(&second);
        backend.draw_triangle();

        let drawn: Vec<f32> = backend.draws().map(|u| u.age_fraction).collect();
        assert_eq!(drawn, vec![0.1, 0.9]);
    }

    #[test]
    fn test_backend_through_mut_ref() {
        fn frame(mut backend: impl RenderBackend) {
            backend.clear_frame();
            backend.draw_triangle();
        }

        let mut backend = RecordingBackend::new();
        frame(&mut backend);
        assert_eq!(backend.draws().count(), 1);
    }
}
