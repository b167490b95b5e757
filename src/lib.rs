//! Backstreet Betas gesture recognition
//!
//! Turns one surface's raw contact stream (start, move, end) into discrete
//! gestures: tap, double tap, long press and four-way swipes.
//!
//! ```rust,ignore
//! use backstreet_gestures::{GestureConfig, GestureRecognizer};
//!
//! let mut recognizer = GestureRecognizer::new(GestureConfig::default())?;
//! recognizer.on_swipe_left(|g| println!("next page ({:.0}px)", g.distance));
//! recognizer.on_gesture(|g| println!("{}", g.kind));
//!
//! recognizer.contact_start(200.0, 40.0, now_ms, target);
//! recognizer.contact_end(90.0, 44.0, now_ms + 120, target);
//!
//! // Deferred taps and long presses fire from timers
//! if let Some(deadline) = recognizer.next_deadline() {
//!     arm_timer(deadline);
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod gesture;
pub mod recognizer;
pub mod timers;
pub mod trace;

pub use config::GestureConfig;
pub use dispatch::{GestureHandler, GestureHandlers};
pub use error::{Error, Result};
pub use gesture::{Disposition, GestureEvent, GestureKind, SwipeDirection};
pub use recognizer::{ContactPhase, GestureRecognizer};
