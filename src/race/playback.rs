use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Frame duration at 1x speed.
pub const BASE_FRAME_DURATION: Duration = Duration::from_millis(500);

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PlaybackSpeed {
    #[serde(rename = "0.2x")]
    #[strum(serialize = "0.2", to_string = "0.2x")]
    X0_2,

    #[default]
    #[serde(rename = "0.5x")]
    #[strum(serialize = "0.5", to_string = "0.5x")]
    X0_5,

    #[serde(rename = "1x")]
    #[strum(serialize = "1", to_string = "1x")]
    X1,
}

/// Advances a frame index over wall-clock time.
///
/// Owns no timer: the embedding loop calls [`Playback::tick`] with the
/// current instant, and the driver decides when enough time has passed
/// to move one frame forward.
#[derive(Clone, Debug, Default)]
pub struct Playback {
    pub playing: bool,
    pub speed: PlaybackSpeed,
    pub current_index: usize,
    pub current_date: Option<NaiveDate>,

    last_advance: Option<Instant>,
}

impl PlaybackSpeed {
    pub fn multiplier(&self) -> f64 {
        match self {
            PlaybackSpeed::X0_2 => 0.2,
            PlaybackSpeed::X0_5 => 0.5,
            PlaybackSpeed::X1 => 1.0,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        BASE_FRAME_DURATION.div_f64(self.multiplier())
    }
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.last_advance = None;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.last_advance = None;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
        self.last_advance = None;
    }

    /// Scrubbing always pauses.
    pub fn seek(&mut self, index: usize) {
        self.current_index = index;
        self.pause();
    }

    pub fn step_forward(&mut self, total_frames: usize) {
        if total_frames > 0 {
            self.current_index = (self.current_index + 1).min(total_frames - 1);
        }
        self.last_advance = None;
    }

    pub fn step_back(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
        self.last_advance = None;
    }

    pub fn set_current_date(&mut self, date: Option<NaiveDate>) {
        self.current_date = date;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance at most one frame, returning whether it advanced.
    ///
    /// The first call after (re)starting only records the time reference.
    /// Reaching the final index pauses instead of wrapping.
    pub fn tick(&mut self, now: Instant, total_frames: usize) -> bool {
        if !self.playing || total_frames == 0 {
            return false;
        }

        let Some(last) = self.last_advance else {
            self.last_advance = Some(now);
            return false;
        };

        if now.duration_since(last) >= self.speed.frame_duration() {
            if self.current_index + 1 >= total_frames {
                self.pause();
            } else {
                self.current_index += 1;
                self.last_advance = Some(now);
                return true;
            }
        }

        false
    }
}
