use std::sync::Arc;
use std::time::Duration;

use pixels::{Pixels, SurfaceTexture};
use tracing::{info, warn};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

use crate::app::config::clamp_window_scale;
use crate::app::frontend::{DisplayError, Frontend};
use crate::app::input::{InputEvent, Key};

use super::{DisplayFrame, FrameSize};

const OPAQUE_ALPHA: u8 = 0xff;

struct WindowSurface {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    buffer_size: FrameSize,
}

/// Desktop window backed by winit, drawn through a `pixels` surface.
///
/// Events are pumped without blocking once per poll, so the player loop keeps
/// ownership of timing instead of handing control to winit.
pub struct WindowFrontend {
    event_loop: EventLoop<()>,
    surface: Option<WindowSurface>,
}

impl WindowFrontend {
    pub fn new(title: &str, frame_size: FrameSize, scale: u32) -> Result<Self, DisplayError> {
        let event_loop = EventLoop::new().map_err(DisplayError::CreateEventLoop)?;
        let scale = clamp_window_scale(scale);
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(title)
                .with_inner_size(scaled_inner_size(frame_size, scale))
                .build(&event_loop)
                .map_err(DisplayError::CreateWindow)?,
        );
        let inner = window.inner_size();
        let pixels = build_pixels(Arc::clone(&window), inner, frame_size)?;
        info!(
            width = frame_size.width,
            height = frame_size.height,
            scale,
            "window_opened"
        );

        Ok(Self {
            event_loop,
            surface: Some(WindowSurface {
                window,
                pixels,
                buffer_size: frame_size,
            }),
        })
    }
}

fn scaled_inner_size(frame_size: FrameSize, scale: u32) -> LogicalSize<f64> {
    let scale = clamp_window_scale(scale);
    LogicalSize::new(
        f64::from(frame_size.width.saturating_mul(scale)),
        f64::from(frame_size.height.saturating_mul(scale)),
    )
}

fn build_pixels(
    window: Arc<Window>,
    surface_size: PhysicalSize<u32>,
    buffer_size: FrameSize,
) -> Result<Pixels<'static>, DisplayError> {
    let surface = SurfaceTexture::new(surface_size.width, surface_size.height, window);
    Pixels::new(buffer_size.width, buffer_size.height, surface).map_err(DisplayError::CreateSurface)
}

impl Frontend for WindowFrontend {
    fn poll_events(&mut self, events: &mut Vec<InputEvent>) -> Result<(), DisplayError> {
        let Some(surface) = self.surface.as_mut() else {
            events.push(InputEvent::Quit);
            return Ok(());
        };
        let window_id = surface.window.id();
        let mut resized_to = None;

        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _window_target| {
                let Event::WindowEvent { window_id: id, event } = event else {
                    return;
                };
                if id != window_id {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => events.push(InputEvent::Quit),
                    WindowEvent::Resized(size) => resized_to = Some(size),
                    WindowEvent::KeyboardInput { event, .. } => {
                        if let Some(input) = input_event_from_key_event(&event) {
                            events.push(input);
                        }
                    }
                    _ => {}
                }
            });

        if let PumpStatus::Exit(code) = status {
            info!(code, "event_loop_exited");
            events.push(InputEvent::Quit);
        }

        if let Some(size) = resized_to.filter(|size| size.width > 0 && size.height > 0) {
            surface
                .pixels
                .resize_surface(size.width, size.height)
                .map_err(DisplayError::ResizeSurface)?;
        }
        Ok(())
    }

    fn blit(&mut self, frame: &DisplayFrame) -> Result<(), DisplayError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let size = frame.size();
        if size != surface.buffer_size {
            surface
                .pixels
                .resize_buffer(size.width, size.height)
                .map_err(DisplayError::ResizeBuffer)?;
            surface.buffer_size = size;
        }

        let target = surface.pixels.frame_mut();
        for (dst, src) in target.chunks_exact_mut(4).zip(frame.rgb().chunks_exact(3)) {
            dst[..3].copy_from_slice(src);
            dst[3] = OPAQUE_ALPHA;
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        match self.surface.as_mut() {
            Some(surface) => surface.pixels.render().map_err(DisplayError::Render),
            None => Ok(()),
        }
    }

    fn close(&mut self) {
        match self.surface.take() {
            Some(surface) => {
                surface.window.set_visible(false);
                drop(surface);
                info!("window_closed");
            }
            None => warn!("window_already_closed"),
        }
    }
}

fn input_event_from_key_event(key_event: &KeyEvent) -> Option<InputEvent> {
    let key = Key::from_physical(key_event.physical_key)?;
    match key_event.state {
        ElementState::Pressed => Some(InputEvent::KeyDown(key)),
        ElementState::Released => Some(InputEvent::KeyUp(key)),
    }
}
