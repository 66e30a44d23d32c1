use play::{
    BoxSpace, EnvError, Environment, Info, JoypadBindings, JoypadButton, KeysToAction,
    Observation, ObservationSpace, StepOutcome,
};
use serde_json::json;

pub(crate) const FIELD_HEIGHT: usize = 240;
pub(crate) const FIELD_WIDTH: usize = 256;
const BLOCK_SIZE: usize = 16;
const GOAL_SIZE: usize = 24;
const MOVE_SPEED_PX: usize = 2;
const GOAL_REWARD: f64 = 1.0;
const TIME_PENALTY: f64 = -0.001;

const BACKGROUND_COLOR: [u8; 3] = [20, 22, 28];
const GOAL_COLOR: [u8; 3] = [80, 220, 120];
const BLOCK_COLOR: [u8; 3] = [220, 220, 240];
const BLOCK_A_COLOR: [u8; 3] = [255, 120, 120];
const BLOCK_B_COLOR: [u8; 3] = [120, 160, 255];

// Goal corners visited in order, one per episode.
const GOAL_POSITIONS: [(usize, usize); 4] = [
    (FIELD_WIDTH - GOAL_SIZE - 8, FIELD_HEIGHT - GOAL_SIZE - 8),
    (8, FIELD_HEIGHT - GOAL_SIZE - 8),
    (FIELD_WIDTH - GOAL_SIZE - 8, 8),
    (8, 8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: usize,
    y: usize,
    size: usize,
}

impl Rect {
    fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.size && y >= self.y && y < self.y + self.size
    }

    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.size
            && other.x < self.x + self.size
            && self.y < other.y + other.size
            && other.y < self.y + self.size
    }
}

/// Controller-driven test field: the D-pad moves a block towards a goal and
/// A/B recolor it. Touching the goal ends the episode.
#[derive(Debug)]
pub(crate) struct Playfield {
    grayscale: bool,
    bindings: JoypadBindings,
    block: Rect,
    goal: Rect,
    block_color: [u8; 3],
    episode: usize,
    episode_steps: u64,
}

impl Playfield {
    pub(crate) fn new(grayscale: bool) -> Self {
        Self {
            grayscale,
            bindings: JoypadBindings::default(),
            block: spawn_block(),
            goal: goal_for_episode(0),
            block_color: BLOCK_COLOR,
            episode: 0,
            episode_steps: 0,
        }
    }

    fn apply_buttons(&mut self, action: u8) {
        let max_x = FIELD_WIDTH - BLOCK_SIZE;
        let max_y = FIELD_HEIGHT - BLOCK_SIZE;
        if JoypadButton::Left.is_held(action) {
            self.block.x = self.block.x.saturating_sub(MOVE_SPEED_PX);
        }
        if JoypadButton::Right.is_held(action) {
            self.block.x = (self.block.x + MOVE_SPEED_PX).min(max_x);
        }
        if JoypadButton::Up.is_held(action) {
            self.block.y = self.block.y.saturating_sub(MOVE_SPEED_PX);
        }
        if JoypadButton::Down.is_held(action) {
            self.block.y = (self.block.y + MOVE_SPEED_PX).min(max_y);
        }

        self.block_color = if JoypadButton::A.is_held(action) {
            BLOCK_A_COLOR
        } else if JoypadButton::B.is_held(action) {
            BLOCK_B_COLOR
        } else {
            BLOCK_COLOR
        };
    }

    fn color_at(&self, x: usize, y: usize) -> [u8; 3] {
        if self.block.contains(x, y) {
            self.block_color
        } else if self.goal.contains(x, y) {
            GOAL_COLOR
        } else {
            BACKGROUND_COLOR
        }
    }

    fn observation(&self) -> Result<Observation, EnvError> {
        let channels = if self.grayscale { 1 } else { 3 };
        let mut data = Vec::with_capacity(FIELD_HEIGHT * FIELD_WIDTH * channels);
        for y in 0..FIELD_HEIGHT {
            for x in 0..FIELD_WIDTH {
                let rgb = self.color_at(x, y);
                if self.grayscale {
                    data.push(luma(rgb));
                } else {
                    data.extend_from_slice(&rgb);
                }
            }
        }
        let observation = if self.grayscale {
            Observation::grayscale(FIELD_HEIGHT, FIELD_WIDTH, data)?
        } else {
            Observation::rgb(FIELD_HEIGHT, FIELD_WIDTH, data)?
        };
        Ok(observation)
    }
}

impl Environment for Playfield {
    type Action = u8;

    fn observation_space(&self) -> ObservationSpace {
        if self.grayscale {
            ObservationSpace::Box(BoxSpace::pixels(&[FIELD_HEIGHT, FIELD_WIDTH]))
        } else {
            ObservationSpace::Box(BoxSpace::pixels(&[FIELD_HEIGHT, FIELD_WIDTH, 3]))
        }
    }

    fn reset(&mut self) -> Result<Option<Observation>, EnvError> {
        self.block = spawn_block();
        self.goal = goal_for_episode(self.episode);
        self.block_color = BLOCK_COLOR;
        self.episode += 1;
        self.episode_steps = 0;
        Ok(Some(self.observation()?))
    }

    fn step(&mut self, action: &u8) -> Result<StepOutcome, EnvError> {
        self.apply_buttons(*action);
        self.episode_steps += 1;

        let done = self.block.overlaps(&self.goal);
        let reward = if done { GOAL_REWARD } else { TIME_PENALTY };
        let info = match json!({
            "x": self.block.x,
            "y": self.block.y,
            "episode_steps": self.episode_steps,
        }) {
            serde_json::Value::Object(map) => map,
            _ => Info::new(),
        };

        Ok(StepOutcome {
            observation: Some(self.observation()?),
            reward,
            done,
            info,
        })
    }

    fn keys_to_action(&self) -> Option<KeysToAction<u8>> {
        Some(self.bindings.keys_to_action())
    }
}

fn spawn_block() -> Rect {
    Rect {
        x: (FIELD_WIDTH - BLOCK_SIZE) / 2,
        y: (FIELD_HEIGHT - BLOCK_SIZE) / 2,
        size: BLOCK_SIZE,
    }
}

fn goal_for_episode(episode: usize) -> Rect {
    let (x, y) = GOAL_POSITIONS[episode % GOAL_POSITIONS.len()];
    Rect {
        x,
        y,
        size: GOAL_SIZE,
    }
}

// ITU-R BT.601 weights.
fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(u32::from);
    ((r * 299 + g * 587 + b * 114) / 1000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(buttons: &[JoypadButton]) -> u8 {
        buttons.iter().fold(0, |action, button| action | button.mask())
    }

    #[test]
    fn reset_centers_block_and_emits_rgb_frame() {
        let mut field = Playfield::new(false);
        let obs = field.reset().expect("reset").expect("observation");

        assert_eq!(obs.shape(), &[FIELD_HEIGHT, FIELD_WIDTH, 3]);
        assert_eq!(field.block, spawn_block());
        let center = obs.rgb_at(FIELD_HEIGHT / 2, FIELD_WIDTH / 2);
        assert_eq!(center, Some(BLOCK_COLOR));
    }

    #[test]
    fn grayscale_field_has_two_dimensional_frames() {
        let mut field = Playfield::new(true);
        let obs = field.reset().expect("reset").expect("observation");

        assert_eq!(obs.shape(), &[FIELD_HEIGHT, FIELD_WIDTH]);
        assert_eq!(
            field.observation_space(),
            ObservationSpace::Box(BoxSpace::pixels(&[FIELD_HEIGHT, FIELD_WIDTH]))
        );
    }

    #[test]
    fn dpad_moves_block_and_clamps_at_edges() {
        let mut field = Playfield::new(false);
        field.reset().expect("reset");
        let start = field.block;

        field.step(&hold(&[JoypadButton::Right])).expect("step");
        assert_eq!(field.block.x, start.x + MOVE_SPEED_PX);

        for _ in 0..200 {
            field.step(&hold(&[JoypadButton::Up])).expect("step");
        }
        assert_eq!(field.block.y, 0);
    }

    #[test]
    fn a_and_b_recolor_block() {
        let mut field = Playfield::new(false);
        field.reset().expect("reset");

        field.step(&hold(&[JoypadButton::A])).expect("step");
        assert_eq!(field.block_color, BLOCK_A_COLOR);
        field.step(&hold(&[JoypadButton::B])).expect("step");
        assert_eq!(field.block_color, BLOCK_B_COLOR);
        field.step(&0).expect("step");
        assert_eq!(field.block_color, BLOCK_COLOR);
    }

    #[test]
    fn reaching_goal_finishes_episode_with_reward() {
        let mut field = Playfield::new(false);
        field.reset().expect("reset");

        let toward_goal = hold(&[JoypadButton::Right, JoypadButton::Down]);
        let mut outcome = field.step(&toward_goal).expect("step");
        let mut steps = 1;
        while !outcome.done && steps < 500 {
            outcome = field.step(&toward_goal).expect("step");
            steps += 1;
        }

        assert!(outcome.done);
        assert_eq!(outcome.reward, GOAL_REWARD);
        assert_eq!(
            outcome.info.get("episode_steps").and_then(|v| v.as_u64()),
            Some(steps)
        );
    }

    #[test]
    fn idle_step_costs_time_penalty() {
        let mut field = Playfield::new(false);
        field.reset().expect("reset");
        let outcome = field.step(&0).expect("step");
        assert!(!outcome.done);
        assert_eq!(outcome.reward, TIME_PENALTY);
    }

    #[test]
    fn goal_moves_between_episodes() {
        let mut field = Playfield::new(false);
        field.reset().expect("first reset");
        let first_goal = field.goal;
        field.reset().expect("second reset");
        assert_ne!(field.goal, first_goal);
    }

    #[test]
    fn field_exposes_controller_table() {
        let field = Playfield::new(false);
        let mapping = field.keys_to_action().expect("mapping");
        assert_eq!(mapping.len(), 256);
    }

    #[test]
    fn luma_of_white_is_full_scale() {
        assert_eq!(luma([255, 255, 255]), 255);
        assert_eq!(luma([0, 0, 0]), 0);
    }
}
