//! Frame clock: elapsed time, delta and frames-per-second.

use std::time::Duration;

pub struct GameState {
    pub show_fps: bool,
    time: Duration,
    delta: Duration,
    frame: u64,
    since_fps_print: Duration,
    frame_count: u32,
    last_fps: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            show_fps: false,
            time: Duration::ZERO,
            delta: Duration::ZERO,
            frame: 0,
            since_fps_print: Duration::ZERO,
            frame_count: 0,
            last_fps: 0,
        }
    }

    /// Records one frame that took `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.time += delta;
        self.frame += 1;
        self.frame_count += 1;
        self.since_fps_print += delta;
        if self.since_fps_print >= Duration::from_secs(1) {
            self.last_fps = self.frame_count;
            self.frame_count = 0;
            self.since_fps_print = Duration::ZERO;
        }
    }

    /// The fps to report, once per second, when display is enabled.
    pub fn update_fps_display(&self) -> Option<u32> {
        if self.show_fps && self.frame_count == 0 && self.frame > 0 {
            Some(self.last_fps)
        } else {
            None
        }
    }

    pub fn toggle_fps_display(&mut self) {
        self.show_fps = !self.show_fps;
    }

    /// Seconds since the game started running.
    pub fn time(&self) -> f32 {
        self.time.as_secs_f32()
    }

    /// Seconds the last frame took.
    pub fn delta(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn get_fps(&self) -> u32 {
        self.last_fps
    }
}
