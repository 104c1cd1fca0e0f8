//! Endless-runner core: swipe derivation and the scrolling obstacle
//! field. Rendering, input capture, and the animation-frame loop stay in
//! the presentation layer; it calls [`RunnerWorld::update`] once per tick
//! with the elapsed wall-clock delta and draws the snapshot.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::session_rng;

/// A pointer delta must exceed this on its dominant axis to count as a
/// swipe.
pub const SWIPE_THRESHOLD: f64 = 30.0;

const PLAYER_X: f64 = 50.0;
const PLAYER_SIZE: f64 = 30.0;
const SWIPE_IMPULSE: f64 = 60.0;
const VELOCITY_DECAY: f64 = 0.9;
const SCROLL_SPEED: f64 = 200.0;
const SPAWN_RATE: f64 = 1.0;
const OBSTACLE_MIN_SIZE: f64 = 30.0;
const OBSTACLE_SIZE_SPREAD: f64 = 20.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl std::str::FromStr for SwipeDirection {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(SwipeDirection::Up),
            "down" => Ok(SwipeDirection::Down),
            "left" => Ok(SwipeDirection::Left),
            "right" => Ok(SwipeDirection::Right),
            _ => Err(()),
        }
    }
}

/// Discrete swipe from a pointer-down/pointer-up delta: the dominant axis
/// is the larger of |dx| vs |dy|, and only significant past the 30-unit
/// threshold.
pub fn swipe_direction(dx: f64, dy: f64) -> Option<SwipeDirection> {
    if dx.abs() > dy.abs() {
        if dx > SWIPE_THRESHOLD {
            Some(SwipeDirection::Right)
        } else if dx < -SWIPE_THRESHOLD {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    } else if dy > SWIPE_THRESHOLD {
        Some(SwipeDirection::Down)
    } else if dy < -SWIPE_THRESHOLD {
        Some(SwipeDirection::Up)
    } else {
        None
    }
}

/// Tracks one pointer gesture; `up` yields the derived swipe, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    start: Option<(f64, f64)>,
}

impl PointerTracker {
    pub fn down(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    pub fn up(&mut self, x: f64, y: f64) -> Option<SwipeDirection> {
        let (start_x, start_y) = self.start.take()?;
        swipe_direction(x - start_x, y - start_y)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlayerBody {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub vy: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Serializable view of the world for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerSnapshot {
    pub player: PlayerBody,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub obstacles: Vec<Obstacle>,
}

pub struct RunnerWorld {
    width: f64,
    height: f64,
    player: PlayerBody,
    obstacles: Vec<Obstacle>,
    rng: SmallRng,
}

impl RunnerWorld {
    pub fn new(width: f64, height: f64, seed: Option<u64>) -> Self {
        Self {
            width,
            height,
            player: PlayerBody {
                x: PLAYER_X,
                y: height / 2.0,
                size: PLAYER_SIZE,
                vy: 0.0,
            },
            obstacles: Vec::new(),
            rng: session_rng(seed),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Swipes are impulse-like: only the vertical ones move the player;
    /// horizontal swipes are recognized but have no effect here.
    pub fn move_dir(&mut self, direction: SwipeDirection) {
        match direction {
            SwipeDirection::Up => self.player.vy = -SWIPE_IMPULSE,
            SwipeDirection::Down => self.player.vy = SWIPE_IMPULSE,
            SwipeDirection::Left | SwipeDirection::Right => {}
        }
    }

    pub fn swipe(&mut self, dx: f64, dy: f64) {
        if let Some(direction) = swipe_direction(dx, dy) {
            self.move_dir(direction);
        }
    }

    /// One physics tick with elapsed seconds: velocity decay, bounds
    /// clamping, obstacle spawn/scroll/despawn, and collision reset.
    pub fn update(&mut self, dt: f64) {
        self.player.y += self.player.vy * dt;
        self.player.vy *= VELOCITY_DECAY;

        if self.player.y < self.player.size {
            self.player.y = self.player.size;
            self.player.vy = 0.0;
        }
        if self.player.y > self.height - self.player.size {
            self.player.y = self.height - self.player.size;
            self.player.vy = 0.0;
        }

        if self.rng.gen::<f64>() < SPAWN_RATE * dt {
            let size = OBSTACLE_MIN_SIZE + self.rng.gen::<f64>() * OBSTACLE_SIZE_SPREAD;
            let y = self.rng.gen::<f64>() * (self.height - size * 2.0) + size;
            self.obstacles.push(Obstacle {
                x: self.width + size,
                y,
                size,
            });
        }

        for obstacle in &mut self.obstacles {
            obstacle.x -= SCROLL_SPEED * dt;
        }
        self.obstacles.retain(|obstacle| obstacle.x + obstacle.size > 0.0);

        let player = self.player;
        let hit = self.obstacles.iter().any(|obstacle| {
            (player.x - obstacle.x).hypot(player.y - obstacle.y) < player.size + obstacle.size
        });
        if hit {
            self.reset();
        }
    }

    /// Collision outcome: the player re-centers and the field clears.
    pub fn reset(&mut self) {
        self.player.y = self.height / 2.0;
        self.player.vy = 0.0;
        self.obstacles.clear();
    }

    pub fn snapshot(&self) -> RunnerSnapshot {
        RunnerSnapshot {
            player: self.player,
            obstacles: self.obstacles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipes_below_threshold_are_ignored() {
        assert_eq!(swipe_direction(29.0, 0.0), None);
        assert_eq!(swipe_direction(0.0, -29.0), None);
        assert_eq!(swipe_direction(30.0, 0.0), None, "threshold is exclusive");
    }

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(swipe_direction(40.0, 35.0), Some(SwipeDirection::Right));
        assert_eq!(swipe_direction(-50.0, 35.0), Some(SwipeDirection::Left));
        assert_eq!(swipe_direction(10.0, 45.0), Some(SwipeDirection::Down));
        assert_eq!(swipe_direction(10.0, -45.0), Some(SwipeDirection::Up));
    }

    #[test]
    fn pointer_tracker_derives_a_swipe_per_gesture() {
        let mut tracker = PointerTracker::default();
        tracker.down(100.0, 100.0);
        assert_eq!(tracker.up(100.0, 40.0), Some(SwipeDirection::Up));

        // Without a new pointer-down there is no gesture to finish.
        assert_eq!(tracker.up(0.0, 0.0), None);
    }

    #[test]
    fn swipe_up_moves_the_player_up() {
        let mut world = RunnerWorld::new(800.0, 600.0, Some(1));
        world.swipe(0.0, -120.0);
        world.update(0.1);

        let snapshot = world.snapshot();
        assert!(snapshot.player.y < 300.0, "an up swipe should lift the player");
    }

    #[test]
    fn player_clamps_to_the_world_bounds() {
        // Wide world: spawned obstacles cannot scroll anywhere near the
        // player within this test, so no collision reset interferes.
        let mut world = RunnerWorld::new(100_000.0, 600.0, Some(1));
        for _ in 0..200 {
            world.move_dir(SwipeDirection::Down);
            world.update(0.1);
        }

        let snapshot = world.snapshot();
        assert_eq!(snapshot.player.y, 600.0 - snapshot.player.size);
        assert_eq!(snapshot.player.vy, 0.0, "clamping zeroes the velocity");
    }

    #[test]
    fn horizontal_swipes_leave_the_player_in_place() {
        let mut world = RunnerWorld::new(800.0, 600.0, Some(1));
        world.move_dir(SwipeDirection::Left);
        world.move_dir(SwipeDirection::Right);

        assert_eq!(world.snapshot().player.vy, 0.0);
    }

    #[test]
    fn obstacles_scroll_left_and_despawn() {
        let mut world = RunnerWorld::new(800.0, 600.0, Some(2));
        world.obstacles.push(Obstacle {
            x: 35.0,
            y: 590.0,
            size: 30.0,
        });

        // 200 units/s for 0.4s carries it past the left edge.
        world.update(0.4);

        assert!(
            world.snapshot().obstacles.iter().all(|o| o.y != 590.0 || o.x + o.size > 0.0),
            "off-screen obstacles should despawn"
        );
    }

    #[test]
    fn collision_resets_the_run() {
        let mut world = RunnerWorld::new(800.0, 600.0, Some(3));
        world.player.y = 120.0;
        world.obstacles.push(Obstacle {
            x: 60.0,
            y: 120.0,
            size: 30.0,
        });

        world.update(0.001);

        let snapshot = world.snapshot();
        assert_eq!(snapshot.player.y, 300.0, "player re-centers after a hit");
        assert!(snapshot.obstacles.is_empty(), "the field clears after a hit");
    }
}
