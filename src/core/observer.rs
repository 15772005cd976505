//! Line-close notification
//!
//! The buffer keeps at most one line "open for editing" after each line
//! insertion. When the next line is inserted (or the owner finalizes
//! explicitly), every registered observer is told exactly once that the
//! open line is complete.
//!
//! Observers are held as [`Weak`] handles: the buffer never keeps an
//! observer alive, and an observer dropped without deregistering is pruned
//! on the next notification.

use std::rc::{Rc, Weak};

use super::line::Line;

/// Receives lines that are no longer open for editing
pub trait LineCloseObserver {
    /// `line_number` is 1-based and keeps increasing even after scrollback
    /// lines have been removed from the buffer.
    fn line_closed(&self, line_number: usize, line: &Line);
}

/// Weak-handle registry of line-close observers
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Weak<dyn LineCloseObserver>>,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: &Rc<dyn LineCloseObserver>) {
        self.observers.push(Rc::downgrade(observer));
    }

    /// Remove `observer`; returns whether it was registered
    pub fn deregister(&mut self, observer: &Rc<dyn LineCloseObserver>) -> bool {
        let target = Rc::downgrade(observer);
        let before = self.observers.len();
        self.observers.retain(|weak| !Weak::ptr_eq(weak, &target));
        self.observers.len() < before
    }

    /// Number of live observers
    pub fn len(&self) -> usize {
        self.observers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify(&mut self, line_number: usize, line: &Line) {
        self.observers.retain(|weak| weak.strong_count() > 0);
        for observer in self.observers.iter().filter_map(Weak::upgrade) {
            observer.line_closed(line_number, line);
        }
    }
}
