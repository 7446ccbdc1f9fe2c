//! Multicast subjects: the shared, mutable end of the observable core.

use super::cancelable::AnyCancelable;
use super::signal::Signal;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A subscriber callback. Returns `true` to stay subscribed, `false` to
/// unsubscribe before the next send.
pub type ObserverHandler<T> = Box<dyn FnMut(&T) -> bool + Send>;

struct Entry<T> {
    id: u64,
    canceled: Arc<AtomicBool>,
    handler: Arc<Mutex<ObserverHandler<T>>>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            canceled: self.canceled.clone(),
            handler: self.handler.clone(),
        }
    }
}

struct SubjectCore<T> {
    observers: Vec<Entry<T>>,
    next_id: u64,
}

/// A push-only multicast event source.
///
/// `send` delivers synchronously to every current subscriber, in
/// subscription order. The subscriber list is snapshotted before delivery,
/// so a handler may cancel itself (or any other subscription) from within
/// its own callback without corrupting the iteration.
pub struct Subject<T> {
    core: Arc<Mutex<SubjectCore<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T> Default for Subject<T>
where
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subject<T>
where
    T: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            core: Arc::new(Mutex::new(SubjectCore {
                observers: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Register a handler. The returned handle removes it; a handler that
    /// returns `false` removes itself.
    pub fn observe(&self, handler: impl FnMut(&T) -> bool + Send + 'static) -> AnyCancelable {
        self.observe_boxed(Box::new(handler))
    }

    pub fn observe_boxed(&self, handler: ObserverHandler<T>) -> AnyCancelable {
        let (cancelable, _) = self.register(handler);
        cancelable
    }

    /// Registers and also hands back the entry internals so callers (the
    /// current-value variant) can replay a value into the fresh handler.
    fn register(
        &self,
        handler: ObserverHandler<T>,
    ) -> (AnyCancelable, Arc<Mutex<ObserverHandler<T>>>) {
        let handler = Arc::new(Mutex::new(handler));
        let canceled = Arc::new(AtomicBool::new(false));

        let id = {
            let mut core = self.core.lock();
            let id = core.next_id;
            core.next_id += 1;
            core.observers.push(Entry {
                id,
                canceled: canceled.clone(),
                handler: handler.clone(),
            });
            id
        };

        let core = self.core.clone();
        let flag = canceled;
        let cancelable = AnyCancelable::new(move || {
            flag.store(true, Ordering::SeqCst);
            core.lock().observers.retain(|entry| entry.id != id);
        });
        (cancelable, handler)
    }

    /// Deliver `value` to every current subscriber, in subscription order.
    ///
    /// Handlers run without the subject lock held. A handler busy with a
    /// re-entrant send to itself is skipped for that emission rather than
    /// deadlocked.
    pub fn send(&self, value: &T) {
        let snapshot: Vec<Entry<T>> = self.core.lock().observers.clone();
        let mut removed = false;

        for entry in &snapshot {
            if entry.canceled.load(Ordering::SeqCst) {
                continue;
            }
            let keep = match entry.handler.try_lock() {
                Some(mut handler) => (*handler)(value),
                None => continue,
            };
            if !keep {
                entry.canceled.store(true, Ordering::SeqCst);
                removed = true;
            }
        }

        if removed {
            self.core
                .lock()
                .observers
                .retain(|entry| !entry.canceled.load(Ordering::SeqCst));
        }
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.core.lock().observers.len()
    }

    /// The read side of this subject as a composable [`Signal`].
    pub fn signal(&self) -> Signal<T> {
        let subject = self.clone();
        Signal::new(move |handler| subject.observe_boxed(handler))
    }
}

/// A [`Subject`] that retains the last sent value and replays it
/// synchronously to late subscribers, so they are never behind.
pub struct CurrentValueSubject<T> {
    subject: Subject<T>,
    last: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for CurrentValueSubject<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            last: self.last.clone(),
        }
    }
}

impl<T> CurrentValueSubject<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            subject: Subject::new(),
            last: Arc::new(Mutex::new(None)),
        }
    }

    /// A subject whose subscribers immediately see `initial`.
    pub fn with_initial(initial: T) -> Self {
        let subject = Self::new();
        *subject.last.lock() = Some(initial);
        subject
    }

    /// The last sent value, if any.
    pub fn value(&self) -> Option<T> {
        self.last.lock().clone()
    }

    pub fn send(&self, value: &T) {
        *self.last.lock() = Some(value.clone());
        self.subject.send(value);
    }

    /// Register a handler; if a value has already been sent, the handler
    /// is invoked with it synchronously before `observe` returns.
    pub fn observe(&self, handler: impl FnMut(&T) -> bool + Send + 'static) -> AnyCancelable {
        self.observe_boxed(Box::new(handler))
    }

    pub fn observe_boxed(&self, handler: ObserverHandler<T>) -> AnyCancelable {
        let (cancelable, handler) = self.subject.register(handler);
        let replay = self.last.lock().clone();
        if let Some(value) = replay {
            let keep = {
                let mut handler = handler.lock();
                (*handler)(&value)
            };
            if !keep {
                cancelable.cancel();
            }
        }
        cancelable
    }

    pub fn observer_count(&self) -> usize {
        self.subject.observer_count()
    }

    pub fn signal(&self) -> Signal<T> {
        let subject = self.clone();
        Signal::new(move |handler| subject.observe_boxed(handler))
    }
}

impl<T> Default for CurrentValueSubject<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
