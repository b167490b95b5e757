//! Delivery of recognized gestures to consumers

use std::collections::HashMap;

use crate::gesture::{GestureEvent, GestureKind};

/// Gesture callback
pub type GestureHandler<T> = Box<dyn FnMut(&GestureEvent<T>)>;

/// Per-kind handler lists plus one catch-all
pub struct GestureHandlers<T> {
    by_kind: HashMap<GestureKind, Vec<GestureHandler<T>>>,
    catch_all: Option<GestureHandler<T>>,
}

impl<T> Default for GestureHandlers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GestureHandlers<T> {
    pub fn new() -> Self {
        Self {
            by_kind: HashMap::new(),
            catch_all: None,
        }
    }

    pub fn add<F>(&mut self, kind: GestureKind, handler: F)
    where
        F: FnMut(&GestureEvent<T>) + 'static,
    {
        self.by_kind.entry(kind).or_default().push(Box::new(handler));
    }

    /// Replaces any previous catch-all
    pub fn set_catch_all<F>(&mut self, handler: F)
    where
        F: FnMut(&GestureEvent<T>) + 'static,
    {
        self.catch_all = Some(Box::new(handler));
    }

    pub fn clear_catch_all(&mut self) {
        self.catch_all = None;
    }

    pub fn handler_count(&self, kind: GestureKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Kind-specific handlers run first, in registration order, then the
    /// catch-all.
    pub fn dispatch(&mut self, event: &GestureEvent<T>) {
        if let Some(handlers) = self.by_kind.get_mut(&event.kind) {
            for handler in handlers.iter_mut() {
                handler(event);
            }
        }
        if let Some(catch_all) = self.catch_all.as_mut() {
            catch_all(event);
        }
    }
}

impl<T> std::fmt::Debug for GestureHandlers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<_, _> = self.by_kind.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("GestureHandlers")
            .field("by_kind", &counts)
            .field("catch_all", &self.catch_all.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(kind: GestureKind) -> GestureEvent<()> {
        GestureEvent::new(kind, (0.0, 0.0), (0.0, 0.0), 0, 0, ())
    }

    #[test]
    fn test_dispatch_order_and_filtering() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers: GestureHandlers<()> = GestureHandlers::new();

        let l = log.clone();
        handlers.add(GestureKind::Tap, move |_| l.borrow_mut().push("tap-1"));
        let l = log.clone();
        handlers.add(GestureKind::Tap, move |_| l.borrow_mut().push("tap-2"));
        let l = log.clone();
        handlers.add(GestureKind::SwipeUp, move |_| l.borrow_mut().push("swipe-up"));
        let l = log.clone();
        handlers.set_catch_all(move |e| l.borrow_mut().push(e.kind.as_str()));

        handlers.dispatch(&event(GestureKind::Tap));
        assert_eq!(*log.borrow(), vec!["tap-1", "tap-2", "tap"]);

        log.borrow_mut().clear();
        handlers.dispatch(&event(GestureKind::LongPress));
        assert_eq!(*log.borrow(), vec!["long-press"]);

        assert_eq!(handlers.handler_count(GestureKind::Tap), 2);
        assert_eq!(handlers.handler_count(GestureKind::DoubleTap), 0);
    }

    #[test]
    fn test_catch_all_is_replaced() {
        let count = Rc::new(RefCell::new((0, 0)));
        let mut handlers: GestureHandlers<()> = GestureHandlers::new();

        let c = count.clone();
        handlers.set_catch_all(move |_| c.borrow_mut().0 += 1);
        let c = count.clone();
        handlers.set_catch_all(move |_| c.borrow_mut().1 += 1);

        handlers.dispatch(&event(GestureKind::SwipeLeft));
        assert_eq!(*count.borrow(), (0, 1));

        handlers.clear_catch_all();
        handlers.dispatch(&event(GestureKind::SwipeLeft));
        assert_eq!(*count.borrow(), (0, 1));
    }
}
