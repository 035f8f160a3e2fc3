//! Color tags and the dominant-color ranking.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::RoadmapCircle;

/// Color tag carried by a roadmap circle.
///
/// Declaration order is significant: it breaks ties in [`dominant_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorType {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Navy,
    Purple,
}

impl ColorType {
    /// All colors in declaration order.
    pub const ALL: [ColorType; 7] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Navy,
        Self::Purple,
    ];

    /// Converts the color to a string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Orange => "ORANGE",
            Self::Yellow => "YELLOW",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
            Self::Navy => "NAVY",
            Self::Purple => "PURPLE",
        }
    }

    /// Parses a color from a string
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.as_str() == s)
    }
}

/// Per-color aggregate over a roadmap's circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTally {
    pub color: ColorType,
    pub count: usize,
    pub max_level: u32,
}

impl ColorTally {
    /// Ranking order: higher count first, then higher max level, then
    /// declaration order of the color.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| other.max_level.cmp(&self.max_level))
            .then_with(|| self.color.cmp(&other.color))
    }
}

/// Builds one tally per color present, in a single pass.
pub fn tally_colors(circles: &[RoadmapCircle]) -> Vec<ColorTally> {
    let mut tallies: Vec<ColorTally> = Vec::new();
    for circle in circles {
        match tallies.iter_mut().find(|t| t.color == circle.color_type) {
            Some(tally) => {
                tally.count += 1;
                tally.max_level = tally.max_level.max(circle.level);
            }
            None => tallies.push(ColorTally {
                color: circle.color_type,
                count: 1,
                max_level: circle.level,
            }),
        }
    }
    tallies
}

/// Picks the color that represents a roadmap.
///
/// Returns `None` when the roadmap has no circles.
pub fn dominant_color(circles: &[RoadmapCircle]) -> Option<ColorType> {
    let mut tallies = tally_colors(circles);
    tallies.sort_by(ColorTally::rank);
    tallies.first().map(|tally| tally.color)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    fn circle(color: ColorType, level: u32) -> RoadmapCircle {
        RoadmapCircle::new(
            Uuid::new_v4(),
            "step",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "",
            level,
            color,
        )
    }

    #[test]
    fn test_empty_roadmap_has_no_color() {
        assert_eq!(dominant_color(&[]), None);
    }

    #[test]
    fn test_count_beats_level() {
        let circles = vec![
            circle(ColorType::Red, 2),
            circle(ColorType::Red, 1),
            circle(ColorType::Blue, 5),
        ];
        assert_eq!(dominant_color(&circles), Some(ColorType::Red));
    }

    #[test]
    fn test_level_breaks_count_tie() {
        let circles = vec![circle(ColorType::Red, 1), circle(ColorType::Blue, 3)];
        assert_eq!(dominant_color(&circles), Some(ColorType::Blue));
    }

    #[test]
    fn test_declaration_order_breaks_full_tie() {
        let circles = vec![
            circle(ColorType::Purple, 2),
            circle(ColorType::Green, 2),
            circle(ColorType::Yellow, 2),
        ];
        assert_eq!(dominant_color(&circles), Some(ColorType::Yellow));
    }

    #[test]
    fn test_tally_tracks_count_and_max_level() {
        let circles = vec![
            circle(ColorType::Navy, 1),
            circle(ColorType::Navy, 4),
            circle(ColorType::Navy, 2),
            circle(ColorType::Orange, 0),
        ];
        let tallies = tally_colors(&circles);

        assert_eq!(tallies.len(), 2);
        assert_eq!(
            tallies[0],
            ColorTally {
                color: ColorType::Navy,
                count: 3,
                max_level: 4
            }
        );
        assert_eq!(tallies[1].count, 1);
    }

    #[test]
    fn test_winner_dominates_every_other_color() {
        let circles = vec![
            circle(ColorType::Green, 3),
            circle(ColorType::Blue, 1),
            circle(ColorType::Green, 0),
            circle(ColorType::Blue, 4),
            circle(ColorType::Red, 9),
        ];
        let winner = dominant_color(&circles).unwrap();
        let tallies = tally_colors(&circles);
        let best = tallies.iter().find(|t| t.color == winner).unwrap();

        for other in &tallies {
            assert!(best.count >= other.count);
            if best.count == other.count {
                assert!(best.max_level >= other.max_level);
            }
        }
        assert_eq!(winner, ColorType::Blue);
    }

    #[test]
    fn test_color_string_round_trip() {
        for color in ColorType::ALL {
            assert_eq!(ColorType::parse(color.as_str()), Some(color));
        }
        assert_eq!(ColorType::parse("red"), None);
        assert_eq!(serde_json::to_string(&ColorType::Navy).unwrap(), "\"NAVY\"");
    }
}
