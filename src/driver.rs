//! Wall-clock replay on a calloop event loop
//!
//! A single calloop `Timer` drives everything: each wake feeds the inputs
//! that are due, fires recognizer timers up to the current time, then
//! re-arms for whichever comes first, the next input or the next recognizer
//! deadline. The loop stops once both are exhausted.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopSignal};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::recognizer::GestureRecognizer;
use crate::trace::{TraceRecord, TraceTarget};

struct ReplayState {
    recognizer: GestureRecognizer<TraceTarget>,
    queue: VecDeque<(u64, TraceRecord)>,
    origin: Instant,
    base_time: u64,
    signal: LoopSignal,
}

impl ReplayState {
    /// Current time on the trace's clock
    fn now(&self) -> u64 {
        let elapsed = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.base_time.saturating_add(elapsed)
    }

    fn instant_at(&self, time: u64) -> Instant {
        self.origin + Duration::from_millis(time.saturating_sub(self.base_time))
    }

    /// Process everything due and return the next wake time
    fn step(&mut self) -> Option<u64> {
        let now = self.now();

        while self.queue.front().is_some_and(|(time, _)| *time <= now) {
            if let Some((time, record)) = self.queue.pop_front() {
                debug!(time, ?record, "Replaying input");
                record.apply(&mut self.recognizer);
            }
        }
        self.recognizer.advance(now);

        let next_input = self.queue.front().map(|(time, _)| *time);
        match (next_input, self.recognizer.next_deadline()) {
            (Some(input), Some(deadline)) => Some(input.min(deadline)),
            (input, deadline) => input.or(deadline),
        }
    }
}

/// Give every record a monotonic time. Records without one (moves, cancels)
/// happen together with the record before them.
fn schedule(records: Vec<TraceRecord>) -> VecDeque<(u64, TraceRecord)> {
    let mut last = 0;
    records
        .into_iter()
        .map(|record| {
            last = record.time().map_or(last, |time| time.max(last));
            (last, record)
        })
        .collect()
}

/// Replay `records` in real time. Gestures are delivered to the handlers
/// already registered on `recognizer`, which is handed back afterwards.
pub fn replay_realtime(
    recognizer: GestureRecognizer<TraceTarget>,
    records: Vec<TraceRecord>,
) -> Result<GestureRecognizer<TraceTarget>> {
    let mut event_loop: EventLoop<ReplayState> =
        EventLoop::try_new().map_err(|e| Error::EventLoop(e.to_string()))?;

    let queue = schedule(records);
    let base_time = queue.front().map_or(0, |(time, _)| *time);
    info!(inputs = queue.len(), base_time, "Starting real-time replay");

    let mut state = ReplayState {
        recognizer,
        queue,
        origin: Instant::now(),
        base_time,
        signal: event_loop.get_signal(),
    };

    event_loop
        .handle()
        .insert_source(Timer::immediate(), |_, _, state: &mut ReplayState| {
            match state.step() {
                Some(next) => TimeoutAction::ToInstant(state.instant_at(next)),
                None => {
                    state.signal.stop();
                    TimeoutAction::Drop
                }
            }
        })
        .map_err(|e| Error::EventLoop(e.error.to_string()))?;

    event_loop
        .run(Some(Duration::from_millis(50)), &mut state, |_| {})
        .map_err(|e| Error::EventLoop(e.to_string()))?;

    info!("Real-time replay finished");
    Ok(state.recognizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GestureConfig;
    use crate::gesture::GestureKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_schedule_fills_missing_times() {
        let records = vec![
            TraceRecord::Start { x: 0.0, y: 0.0, time: 100, target: None },
            TraceRecord::Move { x: 5.0, y: 0.0, time: None },
            TraceRecord::Move { x: 9.0, y: 0.0, time: Some(90) },
            TraceRecord::End { x: 9.0, y: 0.0, time: 140, target: None },
            TraceRecord::Cancel,
        ];
        let times: Vec<u64> = schedule(records).iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![100, 100, 100, 140, 140]);
    }

    #[test]
    fn test_realtime_replay_delivers_gestures() {
        let config = GestureConfig::default()
            .with_long_press_delay_ms(40)
            .with_double_tap_window_ms(20);
        let mut recognizer: GestureRecognizer<TraceTarget> =
            GestureRecognizer::new(config).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        recognizer.on_gesture(move |e| sink.borrow_mut().push(e.kind));

        let records = vec![
            TraceRecord::Start { x: 10.0, y: 10.0, time: 0, target: None },
            TraceRecord::End { x: 10.0, y: 10.0, time: 10, target: None },
            TraceRecord::Start { x: 0.0, y: 0.0, time: 60, target: None },
            TraceRecord::Move { x: 40.0, y: 0.0, time: Some(70) },
            TraceRecord::End { x: 80.0, y: 0.0, time: 80, target: None },
            TraceRecord::Start { x: 5.0, y: 5.0, time: 100, target: None },
        ];

        let recognizer = replay_realtime(recognizer, records).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![GestureKind::Tap, GestureKind::SwipeRight, GestureKind::LongPress]
        );
        assert_eq!(recognizer.next_deadline(), None);
    }
}
