use std::num::TryFromIntError;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use toroidal_life::config::{CELL_SIZE, TITLE, VERSION};
use toroidal_life::runner::{FrameSnapshot, SimCommand, SimulationHandle};
use toroidal_life::simulation::Dimensions;

use crate::gpu::{GpuContext, GridBuffers, RenderPipeline};

/// Grid extent as GPU-side `u32`s. Grids wider or taller than that cannot be
/// viewed.
pub fn grid_extent(dimensions: Dimensions) -> Result<(u32, u32), TryFromIntError> {
    Ok((
        u32::try_from(dimensions.width())?,
        u32::try_from(dimensions.height())?,
    ))
}

/// GPU state created once the window exists
struct Renderer {
    gpu: GpuContext,
    buffers: GridBuffers,
    pipeline: RenderPipeline,
    bind_group: wgpu::BindGroup,
}

/// Window and renderer around a simulation running on its own thread
pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    simulation: SimulationHandle,
    latest: FrameSnapshot,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new(simulation: SimulationHandle, initial: FrameSnapshot) -> Self {
        Self {
            window: None,
            renderer: None,
            simulation,
            latest: initial,
            fps_counter: FpsCounter::new(),
        }
    }

    fn render(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        if let Some(frame) = self.simulation.try_recv_snapshot() {
            renderer.buffers.upload_states(&renderer.gpu.queue, &frame.states);
            self.latest = frame;
        }

        let output = match renderer.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.gpu.surface.configure(&renderer.gpu.device, &renderer.gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = renderer
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        renderer.pipeline.draw(&mut encoder, &view, &renderer.bind_group);
        renderer.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                let paused = if self.simulation.is_paused() { " [paused]" } else { "" };
                window.set_title(&format!(
                    "{} {} - generation {} - population {} - {:.0} FPS{}",
                    TITLE, VERSION, self.latest.generation, self.latest.population, fps, paused
                ));
            }
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Space => {
                self.simulation.toggle_pause();
                log::info!(
                    "Simulation {}",
                    if self.simulation.is_paused() { "paused" } else { "resumed" }
                );
            }
            KeyCode::KeyN | KeyCode::ArrowRight => {
                if self.simulation.is_paused() {
                    self.simulation.send(SimCommand::Step);
                }
            }
            _ => {}
        }
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.simulation.token().cancel();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = match grid_extent(self.latest.dimensions) {
            Ok(extent) => extent,
            Err(e) => {
                log::error!("Grid too large to display: {}", e);
                self.exit(event_loop);
                return;
            }
        };
        log::info!("Opening viewer for {}x{} grid", width, height);

        let window_attrs = Window::default_attributes()
            .with_title(format!("{} {}", TITLE, VERSION))
            .with_inner_size(winit::dpi::LogicalSize::new(
                width.saturating_mul(CELL_SIZE),
                height.saturating_mul(CELL_SIZE),
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.exit(event_loop);
                return;
            }
        };

        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                self.exit(event_loop);
                return;
            }
        };

        let buffers = GridBuffers::new(&gpu.device, &gpu.queue, width, height, &self.latest.states);
        let pipeline = RenderPipeline::new(&gpu.device, gpu.format());
        let bind_group = pipeline.create_bind_group(&gpu.device, &buffers);

        log::info!("Controls:");
        log::info!("  Space: Pause/resume");
        log::info!("  N/Right: Single step while paused");
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(Renderer {
            gpu,
            buffers,
            pipeline,
            bind_group,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.exit(event_loop);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            self.exit(event_loop);
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Counts rendered frames, reporting once a second
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_extent_fits_u32() {
        let dimensions = Dimensions::new(640, 480).unwrap();
        assert_eq!(grid_extent(dimensions), Ok((640, 480)));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_grid_extent_rejects_oversized_grid() {
        let too_wide = Dimensions::new(u32::MAX as usize + 1, 1).unwrap();
        assert!(grid_extent(too_wide).is_err());
        let too_tall = Dimensions::new(1, usize::MAX).unwrap();
        assert!(grid_extent(too_tall).is_err());
    }
}
