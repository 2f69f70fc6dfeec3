use wgpu::{Buffer, BufferUsages, Device, Queue};

use toroidal_life::config::{ALIVE_COLOR, DEAD_COLOR};

/// Cell states and draw parameters on the GPU
pub struct GridBuffers {
    /// One u32 per cell, row-major: 0 = dead, 1 = alive
    pub cell_buffer: Buffer,
    /// Uniform buffer for render parameters
    pub render_params_buffer: Buffer,
    pub width: u32,
    pub height: u32,
}

/// Render parameters passed to the fragment shader (48 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParams {
    // Grid info (8 bytes + 8 padding = 16 bytes)
    pub grid_width: u32,
    pub grid_height: u32,
    pub _padding: [u32; 2],

    // Colors (32 bytes)
    pub alive_color: [f32; 4],
    pub dead_color: [f32; 4],
}

impl GridBuffers {
    pub fn new(device: &Device, queue: &Queue, width: u32, height: u32, initial_states: &[u32]) -> Self {
        let cell_count = width as usize * height as usize;
        assert_eq!(initial_states.len(), cell_count, "Initial state size mismatch");

        let cell_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cell-state-buffer"),
            size: (cell_count * std::mem::size_of::<u32>()) as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let render_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("render-params-buffer"),
            size: std::mem::size_of::<RenderParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let buffers = Self {
            cell_buffer,
            render_params_buffer,
            width,
            height,
        };
        buffers.upload_states(queue, initial_states);
        buffers.update_render_params(queue, ALIVE_COLOR, DEAD_COLOR);
        buffers
    }

    /// Replace the cell states with a new generation.
    pub fn upload_states(&self, queue: &Queue, states: &[u32]) {
        if states.len() != self.width as usize * self.height as usize {
            log::warn!(
                "Skipping upload of {} states into a {}x{} buffer",
                states.len(),
                self.width,
                self.height
            );
            return;
        }
        queue.write_buffer(&self.cell_buffer, 0, bytemuck::cast_slice(states));
    }

    pub fn update_render_params(&self, queue: &Queue, alive_color: [f32; 4], dead_color: [f32; 4]) {
        let params = RenderParams {
            grid_width: self.width,
            grid_height: self.height,
            _padding: [0, 0],
            alive_color,
            dead_color,
        };
        queue.write_buffer(&self.render_params_buffer, 0, bytemuck::bytes_of(&params));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_params_size() {
        assert_eq!(std::mem::size_of::<RenderParams>(), 48);
    }
}
