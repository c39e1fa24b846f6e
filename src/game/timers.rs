use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub type TimerId = u64;

/// Cancellable timer scheduling, implemented by whatever event loop embeds
/// the engine (a glib/tokio timeout source in a real UI, `ManualTimers` in
/// tests). Callbacks run on the same thread that schedules them.
pub trait Timers {
    fn schedule_once(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// The callback fires every `period` until it returns `false` or the
    /// timer is cancelled.
    fn schedule_repeating(&self, period: Duration, callback: Box<dyn FnMut() -> bool>) -> TimerId;

    fn cancel(&self, id: TimerId);
}

enum Task {
    Once(Option<Box<dyn FnOnce()>>),
    Repeating {
        period: Duration,
        callback: Box<dyn FnMut() -> bool>,
    },
}

struct Entry {
    id: TimerId,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct TimerQueue {
    now: Duration,
    next_id: TimerId,
    entries: Vec<Entry>,
    running: Option<TimerId>,
    running_cancelled: bool,
}

/// Deterministic `Timers` implementation driven by an explicit virtual
/// clock. `advance` runs every callback that comes due, in due order.
pub struct ManualTimers {
    queue: Rc<RefCell<TimerQueue>>,
}

impl Clone for ManualTimers {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl ManualTimers {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(TimerQueue::default())),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    pub fn advance(&self, by: Duration) {
        let target = self.queue.borrow().now + by;

        loop {
            // take the next due entry; the queue must not stay borrowed
            // while its callback runs, since callbacks reschedule and cancel
            let entry = {
                let mut queue = self.queue.borrow_mut();
                let next = queue
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.due <= target)
                    .min_by_key(|(_, entry)| entry.due)
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let entry = queue.entries.remove(index);
                        queue.now = entry.due;
                        queue.running = Some(entry.id);
                        queue.running_cancelled = false;
                        entry
                    }
                    None => break,
                }
            };

            let rescheduled = match entry.task {
                Task::Once(mut callback) => {
                    if let Some(callback) = callback.take() {
                        callback();
                    }
                    None
                }
                Task::Repeating {
                    period,
                    mut callback,
                } => {
                    if callback() {
                        Some(Entry {
                            id: entry.id,
                            due: entry.due + period,
                            task: Task::Repeating { period, callback },
                        })
                    } else {
                        None
                    }
                }
            };

            let mut queue = self.queue.borrow_mut();
            if let Some(entry) = rescheduled {
                if !queue.running_cancelled {
                    queue.entries.push(entry);
                }
            }
            queue.running = None;
        }

        self.queue.borrow_mut().now = target;
    }
}

impl Timers for ManualTimers {
    fn schedule_once(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let due = queue.now + delay;
        queue.entries.push(Entry {
            id,
            due,
            task: Task::Once(Some(callback)),
        });
        id
    }

    fn schedule_repeating(&self, period: Duration, callback: Box<dyn FnMut() -> bool>) -> TimerId {
        debug_assert!(!period.is_zero());
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let due = queue.now + period;
        queue.entries.push(Entry {
            id,
            due,
            task: Task::Repeating { period, callback },
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut queue = self.queue.borrow_mut();
        queue.entries.retain(|entry| entry.id != id);
        if queue.running == Some(id) {
            queue.running_cancelled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_once_fires_at_its_due_time() {
        let timers = ManualTimers::new();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        timers.schedule_once(
            Duration::from_millis(800),
            Box::new(move || fired_clone.set(true)),
        );

        timers.advance(Duration::from_millis(799));
        assert!(!fired.get());
        timers.advance(Duration::from_millis(1));
        assert!(fired.get());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let timers = ManualTimers::new();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        let id = timers.schedule_once(
            Duration::from_millis(100),
            Box::new(move || fired_clone.set(true)),
        );

        timers.cancel(id);
        timers.advance(Duration::from_secs(1));
        assert!(!fired.get());
    }

    #[test]
    fn test_repeating_fires_once_per_period() {
        let timers = ManualTimers::new();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        timers.schedule_repeating(
            Duration::from_secs(1),
            Box::new(move || {
                count_clone.set(count_clone.get() + 1);
                true
            }),
        );

        timers.advance(Duration::from_secs(3));
        assert_eq!(count.get(), 3);
        timers.advance(Duration::from_millis(999));
        assert_eq!(count.get(), 3);
        timers.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 4);
    }

    #[test]
    fn test_repeating_stops_when_callback_returns_false() {
        let timers = ManualTimers::new();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        timers.schedule_repeating(
            Duration::from_secs(1),
            Box::new(move || {
                count_clone.set(count_clone.get() + 1);
                count_clone.get() < 2
            }),
        );

        timers.advance(Duration::from_secs(10));
        assert_eq!(count.get(), 2);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_cancel_from_inside_callback_stops_a_repeating_timer() {
        let timers = ManualTimers::new();
        let count = Rc::new(Cell::new(0));
        let id_slot: Rc<Cell<TimerId>> = Rc::new(Cell::new(0));

        let count_clone = count.clone();
        let timers_clone = timers.clone();
        let id_slot_clone = id_slot.clone();
        let id = timers.schedule_repeating(
            Duration::from_secs(1),
            Box::new(move || {
                count_clone.set(count_clone.get() + 1);
                timers_clone.cancel(id_slot_clone.get());
                true
            }),
        );
        id_slot.set(id);

        timers.advance(Duration::from_secs(5));
        assert_eq!(count.get(), 1);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_due_order_is_respected() {
        let timers = ManualTimers::new();
        let order: Rc<RefCell<Vec<&str>>> = Rc::new(RefCell::new(vec![]));

        let order_clone = order.clone();
        timers.schedule_once(
            Duration::from_millis(500),
            Box::new(move || order_clone.borrow_mut().push("late")),
        );
        let order_clone = order.clone();
        timers.schedule_once(
            Duration::from_millis(100),
            Box::new(move || order_clone.borrow_mut().push("early")),
        );

        timers.advance(Duration::from_secs(1));
        assert_eq!(*order.borrow(), vec!["early", "late"]);
    }
}
