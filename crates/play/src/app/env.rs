use std::error::Error;
use std::fmt;

use thiserror::Error;

use super::actions::KeysToAction;

/// Failure reported by an environment from `reset` or `step`.
pub type EnvError = Box<dyn Error + Send + Sync + 'static>;

/// Extra per-step data reported by an environment.
pub type Info = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    pub shape: Vec<usize>,
    pub low: f64,
    pub high: f64,
}

impl BoxSpace {
    /// A `u8` pixel box with the given shape.
    pub fn pixels(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            low: 0.0,
            high: f64::from(u8::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObservationSpace {
    Box(BoxSpace),
    Discrete(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationError {
    #[error("observation shape {shape:?} is not HxW, HxWx1 or HxWx3")]
    UnsupportedShape { shape: Vec<usize> },
    #[error("observation of shape {shape:?} needs {expected} bytes, got {actual}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

/// Row-major `u8` pixel frame, `height x width` or `height x width x channels`.
#[derive(Clone, PartialEq, Eq)]
pub struct Observation {
    shape: Vec<usize>,
    data: Vec<u8>,
}

impl Observation {
    pub fn new(shape: &[usize], data: Vec<u8>) -> Result<Self, ObservationError> {
        if !is_pixel_shape(shape) {
            return Err(ObservationError::UnsupportedShape {
                shape: shape.to_vec(),
            });
        }
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(ObservationError::LengthMismatch {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    pub fn grayscale(height: usize, width: usize, data: Vec<u8>) -> Result<Self, ObservationError> {
        Self::new(&[height, width], data)
    }

    pub fn rgb(height: usize, width: usize, data: Vec<u8>) -> Result<Self, ObservationError> {
        Self::new(&[height, width, 3], data)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn height(&self) -> usize {
        self.shape[0]
    }

    pub fn width(&self) -> usize {
        self.shape[1]
    }

    /// 1 for shapes without an explicit channel axis.
    pub fn channels(&self) -> usize {
        self.shape.get(2).copied().unwrap_or(1)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at (`row`, `col`) as RGB; single channels are replicated.
    /// `None` outside the frame.
    pub fn rgb_at(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        let channels = self.channels();
        let offset = (row * self.width() + col) * channels;
        match *self.data.get(offset..offset + channels)? {
            [value] => Some([value, value, value]),
            [r, g, b] => Some([r, g, b]),
            _ => None,
        }
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("shape", &self.shape)
            .field("bytes", &self.data.len())
            .finish()
    }
}

pub(crate) fn is_pixel_shape(shape: &[usize]) -> bool {
    let spatial_ok = shape.len() >= 2 && shape[0] > 0 && shape[1] > 0;
    let channels_ok = match shape.len() {
        2 => true,
        3 => matches!(shape[2], 1 | 3),
        _ => false,
    };
    spatial_ok && channels_ok
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: Option<Observation>,
    pub reward: f64,
    pub done: bool,
    pub info: Info,
}

/// What the per-step observer sees after each completed step.
#[derive(Debug)]
pub struct StepRecord<'a, A> {
    pub previous: Option<&'a Observation>,
    pub next: Option<&'a Observation>,
    pub action: &'a A,
    pub reward: f64,
    pub done: bool,
    pub info: &'a Info,
}

/// A step/reset simulation with a pixel observation space.
pub trait Environment {
    type Action: Clone + fmt::Debug;

    fn observation_space(&self) -> ObservationSpace;

    fn reset(&mut self) -> Result<Option<Observation>, EnvError>;

    fn step(&mut self, action: &Self::Action) -> Result<StepOutcome, EnvError>;

    fn keys_to_action(&self) -> Option<KeysToAction<Self::Action>> {
        None
    }

    /// Innermost environment when this one wraps another.
    fn unwrapped(&self) -> Option<&dyn Environment<Action = Self::Action>> {
        None
    }
}
