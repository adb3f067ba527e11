use chrono::NaiveDate;

use crate::catalog::Team;

pub mod filter;
pub mod frames;
pub mod metrics;
pub mod playback;

/// One stock's standing within a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceEntry {
    pub ticker: String,
    pub name: String,
    pub cumulative_return: f64,
    pub rank: usize,
    pub team: Team,
    pub sector: String,
    pub percent_change: f64,
}

/// Ranked snapshot of one trading day, the unit of playback.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceFrame {
    pub date: NaiveDate,
    pub stocks: Vec<RaceEntry>,
}

pub fn first_frame(frames: &[RaceFrame]) -> Option<&RaceFrame> {
    frames.first()
}

pub fn last_frame(frames: &[RaceFrame]) -> Option<&RaceFrame> {
    frames.last()
}

pub fn frame_by_index(frames: &[RaceFrame], index: usize) -> Option<&RaceFrame> {
    frames.get(index)
}

pub fn frame_by_date<'a>(frames: &'a [RaceFrame], date: &NaiveDate) -> Option<&'a RaceFrame> {
    frames.iter().find(|frame| frame.date == *date)
}

pub fn total_frames(frames: &[RaceFrame]) -> usize {
    frames.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(y: i32, m: u32, d: u32) -> RaceFrame {
        RaceFrame {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            stocks: vec![],
        }
    }

    #[test]
    fn test_accessors() {
        let frames = vec![frame(2024, 1, 2), frame(2024, 1, 3), frame(2024, 1, 4)];

        assert_eq!(total_frames(&frames), 3);
        assert_eq!(
            first_frame(&frames).unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(
            last_frame(&frames).unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
        );
        assert_eq!(
            frame_by_index(&frames, 1).unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        assert!(frame_by_index(&frames, 3).is_none());
        assert!(
            frame_by_date(&frames, &NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()).is_some()
        );
        assert!(
            frame_by_date(&frames, &NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()).is_none()
        );
    }

    #[test]
    fn test_accessors_empty() {
        let frames: Vec<RaceFrame> = vec![];

        assert_eq!(total_frames(&frames), 0);
        assert!(first_frame(&frames).is_none());
        assert!(last_frame(&frames).is_none());
        assert!(frame_by_index(&frames, 0).is_none());
    }
}
