use std::ops::{Deref, DerefMut};

use pixels::{Error as PixelsError, TextureError};
use thiserror::Error;
use winit::error::{EventLoopError, OsError};

use super::input::InputEvent;
use super::rendering::DisplayFrame;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize pixel surface: {0}")]
    CreateSurface(#[source] PixelsError),
    #[error("failed to resize pixel surface: {0}")]
    ResizeSurface(#[source] TextureError),
    #[error("failed to resize pixel buffer: {0}")]
    ResizeBuffer(#[source] TextureError),
    #[error("failed to present frame: {0}")]
    Render(#[source] PixelsError),
}

/// Window, keyboard and presentation collaborator driven by the player loop.
pub trait Frontend {
    /// Appends every event that arrived since the previous poll.
    fn poll_events(&mut self, events: &mut Vec<InputEvent>) -> Result<(), DisplayError>;

    fn blit(&mut self, frame: &DisplayFrame) -> Result<(), DisplayError>;

    fn present(&mut self) -> Result<(), DisplayError>;

    /// Releases the display. Called once, when the session ends.
    fn close(&mut self);
}

/// Closes the borrowed frontend when dropped, on every exit path.
pub(crate) struct DisplayLease<'a, F: Frontend> {
    frontend: &'a mut F,
}

impl<'a, F: Frontend> DisplayLease<'a, F> {
    pub(crate) fn new(frontend: &'a mut F) -> Self {
        Self { frontend }
    }
}

impl<F: Frontend> Deref for DisplayLease<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        self.frontend
    }
}

impl<F: Frontend> DerefMut for DisplayLease<'_, F> {
    fn deref_mut(&mut self) -> &mut F {
        self.frontend
    }
}

impl<F: Frontend> Drop for DisplayLease<'_, F> {
    fn drop(&mut self) {
        self.frontend.close();
    }
}
