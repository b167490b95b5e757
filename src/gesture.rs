//! Gesture values produced by the recognizer

use serde::{Deserialize, Serialize};

/// Direction of a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Dominant axis of the movement. Horizontal only when strictly larger,
    /// so an exact diagonal counts as vertical.
    pub fn from_delta(delta_x: f64, delta_y: f64) -> Self {
        if delta_x.abs() > delta_y.abs() {
            if delta_x > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            }
        } else if delta_y > 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        }
    }
}

/// Kind of recognized gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureKind {
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    Tap,
    DoubleTap,
    LongPress,
}

impl GestureKind {
    pub const ALL: [GestureKind; 7] = [
        GestureKind::SwipeLeft,
        GestureKind::SwipeRight,
        GestureKind::SwipeUp,
        GestureKind::SwipeDown,
        GestureKind::Tap,
        GestureKind::DoubleTap,
        GestureKind::LongPress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GestureKind::SwipeLeft => "swipe-left",
            GestureKind::SwipeRight => "swipe-right",
            GestureKind::SwipeUp => "swipe-up",
            GestureKind::SwipeDown => "swipe-down",
            GestureKind::Tap => "tap",
            GestureKind::DoubleTap => "double-tap",
            GestureKind::LongPress => "long-press",
        }
    }

    pub fn is_swipe(self) -> bool {
        matches!(
            self,
            GestureKind::SwipeLeft
                | GestureKind::SwipeRight
                | GestureKind::SwipeUp
                | GestureKind::SwipeDown
        )
    }
}

impl From<SwipeDirection> for GestureKind {
    fn from(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Up => GestureKind::SwipeUp,
            SwipeDirection::Down => GestureKind::SwipeDown,
            SwipeDirection::Left => GestureKind::SwipeLeft,
            SwipeDirection::Right => GestureKind::SwipeRight,
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified gesture, one per recognized interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureEvent<T> {
    #[serde(rename = "type")]
    pub kind: GestureKind,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    pub distance: f64,
    /// Milliseconds from contact start to classification
    pub duration: u64,
    /// Whatever the input surface reported under the contact
    pub target: T,
}

impl<T> GestureEvent<T> {
    pub fn new(
        kind: GestureKind,
        start: (f64, f64),
        end: (f64, f64),
        start_time: u64,
        now: u64,
        target: T,
    ) -> Self {
        let delta_x = end.0 - start.0;
        let delta_y = end.1 - start.1;
        Self {
            kind,
            start_x: start.0,
            start_y: start.1,
            end_x: end.0,
            end_y: end.1,
            delta_x,
            delta_y,
            distance: delta_x.hypot(delta_y),
            duration: now.saturating_sub(start_time),
            target,
        }
    }
}

/// Whether the recognizer took ownership of an input event. Hosts suppress
/// platform defaults (text selection, scrolling) for consumed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Consumed,
    Ignored,
}

impl Disposition {
    pub fn is_consumed(self) -> bool {
        self == Disposition::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_dominant_axis() {
        assert_eq!(SwipeDirection::from_delta(100.0, 10.0), SwipeDirection::Right);
        assert_eq!(SwipeDirection::from_delta(-100.0, 10.0), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_delta(10.0, 100.0), SwipeDirection::Down);
        assert_eq!(SwipeDirection::from_delta(10.0, -100.0), SwipeDirection::Up);
    }

    #[test]
    fn test_direction_diagonal_is_vertical() {
        assert_eq!(SwipeDirection::from_delta(60.0, 60.0), SwipeDirection::Down);
        assert_eq!(SwipeDirection::from_delta(60.0, -60.0), SwipeDirection::Up);
        assert_eq!(SwipeDirection::from_delta(-60.0, -60.0), SwipeDirection::Up);
    }

    #[test]
    fn test_event_geometry() {
        let event = GestureEvent::new(GestureKind::Tap, (10.0, 10.0), (12.0, 11.0), 1000, 1300, ());
        assert_eq!(event.delta_x, 2.0);
        assert_eq!(event.delta_y, 1.0);
        assert!((event.distance - 5.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(event.duration, 300);
    }

    #[test]
    fn test_event_serializes_with_web_names() {
        let event = GestureEvent::new(
            GestureKind::DoubleTap,
            (0.0, 0.0),
            (3.0, 4.0),
            0,
            120,
            "chart".to_string(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "double-tap");
        assert_eq!(json["startX"], 0.0);
        assert_eq!(json["distance"], 5.0);
        assert_eq!(json["duration"], 120);
        assert_eq!(json["target"], "chart");
    }

    #[test]
    fn test_kind_names_round_trip_display() {
        for kind in GestureKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
        assert!(GestureKind::SwipeUp.is_swipe());
        assert!(!GestureKind::LongPress.is_swipe());
    }
}
