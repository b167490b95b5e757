//! Recorded contact streams
//!
//! One JSON object per line:
//!
//! ```text
//! {"type":"start","x":10.0,"y":10.0,"time":0,"target":"chart"}
//! {"type":"move","x":14.0,"y":10.0}
//! {"type":"end","x":12.0,"y":11.0,"time":80,"target":"chart"}
//! {"type":"cancel"}
//! ```
//!
//! Blank lines and `#` comments are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gesture::Disposition;
use crate::recognizer::GestureRecognizer;

/// Target type used when replaying traces
pub type TraceTarget = Option<String>;

/// One raw input event from a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TraceRecord {
    Start {
        x: f64,
        y: f64,
        time: u64,
        #[serde(default)]
        target: TraceTarget,
    },
    Move {
        x: f64,
        y: f64,
        /// Only used to pace real-time replay
        #[serde(default)]
        time: Option<u64>,
    },
    End {
        x: f64,
        y: f64,
        time: u64,
        #[serde(default)]
        target: TraceTarget,
    },
    Cancel,
}

impl TraceRecord {
    pub fn time(&self) -> Option<u64> {
        match self {
            TraceRecord::Start { time, .. } | TraceRecord::End { time, .. } => Some(*time),
            TraceRecord::Move { time, .. } => *time,
            TraceRecord::Cancel => None,
        }
    }

    /// Feed this record to a recognizer
    pub fn apply(&self, recognizer: &mut GestureRecognizer<TraceTarget>) -> Disposition {
        match self {
            TraceRecord::Start { x, y, time, target } => {
                recognizer.contact_start(*x, *y, *time, target.clone())
            }
            TraceRecord::Move { x, y, .. } => recognizer.contact_move(*x, *y),
            TraceRecord::End { x, y, time, target } => {
                recognizer.contact_end(*x, *y, *time, target.clone())
            }
            TraceRecord::Cancel => {
                recognizer.contact_cancel();
                Disposition::Consumed
            }
        }
    }
}

/// Parse a JSON-lines trace
pub fn parse<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| Error::Trace {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn load(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

/// Replay on the trace's own clock and run out every timer afterwards.
/// Returns the number of gestures emitted by timers at the end.
pub fn replay(recognizer: &mut GestureRecognizer<TraceTarget>, records: &[TraceRecord]) -> usize {
    for record in records {
        record.apply(recognizer);
    }
    recognizer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GestureConfig;
    use crate::gesture::GestureKind;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    const TAP_THEN_SWIPE: &str = r#"
# tap on the chart
{"type":"start","x":10.0,"y":10.0,"time":0,"target":"chart"}
{"type":"end","x":12.0,"y":11.0,"time":80,"target":"chart"}

{"type":"start","x":0.0,"y":0.0,"time":1000}
{"type":"move","x":40.0,"y":2.0,"time":1040}
{"type":"move","x":90.0,"y":4.0}
{"type":"end","x":100.0,"y":5.0,"time":1100}
"#;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let records = parse(Cursor::new(TAP_THEN_SWIPE)).unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(
            records[0],
            TraceRecord::Start {
                x: 10.0,
                y: 10.0,
                time: 0,
                target: Some("chart".to_string()),
            }
        );
        assert_eq!(records[3].time(), Some(1040));
        assert_eq!(records[4].time(), None);
        assert_eq!(
            serde_json::from_str::<TraceRecord>(r#"{"type":"cancel"}"#).unwrap(),
            TraceRecord::Cancel
        );
    }

    #[test]
    fn test_parse_reports_line_number() {
        let input = "{\"type\":\"cancel\"}\n\n{\"type\":\"start\",\"x\":1.0}\n";
        match parse(Cursor::new(input)) {
            Err(Error::Trace { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected trace error, got {:?}", other),
        }
    }

    #[test]
    fn test_replay_classifies_trace() {
        let records = parse(Cursor::new(TAP_THEN_SWIPE)).unwrap();
        let mut recognizer: GestureRecognizer<TraceTarget> =
            GestureRecognizer::new(GestureConfig::default()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        recognizer.on_gesture(move |e| sink.borrow_mut().push((e.kind, e.target.clone())));

        replay(&mut recognizer, &records);

        assert_eq!(
            *seen.borrow(),
            vec![
                (GestureKind::Tap, Some("chart".to_string())),
                (GestureKind::SwipeRight, None),
            ]
        );
    }

    #[test]
    fn test_demo_trace() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/watchlist.jsonl");
        let records = load(path).unwrap();
        let mut recognizer: GestureRecognizer<TraceTarget> =
            GestureRecognizer::new(GestureConfig::default()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        recognizer.on_gesture(move |e| sink.borrow_mut().push(e.kind));

        replay(&mut recognizer, &records);

        assert_eq!(
            *seen.borrow(),
            vec![
                GestureKind::Tap,
                GestureKind::DoubleTap,
                GestureKind::SwipeLeft,
                GestureKind::LongPress,
            ]
        );
    }
}
