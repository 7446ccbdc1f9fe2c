//! Composable read-side of the observable core.

use super::cancelable::AnyCancelable;
use super::subject::ObserverHandler;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A description of a multicast, push-only source of `T`.
///
/// A signal is not a stored value: observing re-runs the source's connect
/// routine, so each subscriber gets its own upstream subscription (whether
/// two subscribers see the same physical emissions depends on whether the
/// backing subject is shared). Combinators never fail; a combination whose
/// sources never emit simply never fires.
pub struct Signal<T> {
    connect: Arc<dyn Fn(ObserverHandler<T>) -> AnyCancelable + Send + Sync>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            connect: self.connect.clone(),
        }
    }
}

impl<T> Signal<T>
where
    T: Send + 'static,
{
    /// Build a signal from a connect routine invoked once per subscriber.
    pub fn new(
        connect: impl Fn(ObserverHandler<T>) -> AnyCancelable + Send + Sync + 'static,
    ) -> Self {
        Self {
            connect: Arc::new(connect),
        }
    }

    /// A signal that never emits.
    pub fn never() -> Self {
        Self::new(|_| AnyCancelable::empty())
    }

    /// Subscribe. The handler returns `false` to unsubscribe, which also
    /// releases the upstream subscription this signal created for it.
    pub fn observe(&self, handler: impl FnMut(&T) -> bool + Send + 'static) -> AnyCancelable {
        (self.connect)(Box::new(handler))
    }

    pub fn observe_boxed(&self, handler: ObserverHandler<T>) -> AnyCancelable {
        (self.connect)(handler)
    }

    /// Transform each emission.
    pub fn map<U>(&self, transform: impl Fn(&T) -> U + Send + Sync + 'static) -> Signal<U>
    where
        U: Send + 'static,
    {
        let upstream = self.clone();
        let transform = Arc::new(transform);
        Signal::new(move |mut handler| {
            let transform = transform.clone();
            upstream.observe(move |value| {
                let mapped = (*transform)(value);
                handler(&mapped)
            })
        })
    }

    /// Keep only emissions the transform maps to `Some`.
    pub fn filter_map<U>(
        &self,
        transform: impl Fn(&T) -> Option<U> + Send + Sync + 'static,
    ) -> Signal<U>
    where
        U: Send + 'static,
    {
        let upstream = self.clone();
        let transform = Arc::new(transform);
        Signal::new(move |mut handler| {
            let transform = transform.clone();
            upstream.observe(move |value| match (*transform)(value) {
                Some(mapped) => handler(&mapped),
                None => true,
            })
        })
    }

    /// Suppress consecutive equal emissions.
    pub fn skip_repeats(&self) -> Signal<T>
    where
        T: Clone + PartialEq,
    {
        let upstream = self.clone();
        Signal::new(move |mut handler| {
            let mut last: Option<T> = None;
            upstream.observe(move |value| {
                if last.as_ref() == Some(value) {
                    return true;
                }
                last = Some(value.clone());
                handler(value)
            })
        })
    }

    /// Emit whenever either source's last-known value updates, once both
    /// have emitted at least once.
    pub fn combine_latest<U>(&self, other: &Signal<U>) -> Signal<(T, U)>
    where
        T: Clone,
        U: Clone + Send + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        Signal::new(move |handler| {
            let latest: Arc<Mutex<(Option<T>, Option<U>)>> = Arc::new(Mutex::new((None, None)));
            let handler = Arc::new(Mutex::new(handler));
            let dead = Arc::new(AtomicBool::new(false));

            let left_sub = {
                let latest = latest.clone();
                let handler = handler.clone();
                let dead = dead.clone();
                left.observe(move |value| {
                    if dead.load(Ordering::SeqCst) {
                        return false;
                    }
                    let pair = {
                        let mut latest = latest.lock();
                        latest.0 = Some(value.clone());
                        (latest.0.clone(), latest.1.clone())
                    };
                    deliver_pair(pair, &handler, &dead)
                })
            };

            let right_sub = {
                let latest = latest.clone();
                let handler = handler.clone();
                let dead = dead.clone();
                right.observe(move |value| {
                    if dead.load(Ordering::SeqCst) {
                        return false;
                    }
                    let pair = {
                        let mut latest = latest.lock();
                        latest.1 = Some(value.clone());
                        (latest.0.clone(), latest.1.clone())
                    };
                    deliver_pair(pair, &handler, &dead)
                })
            };

            let dead = dead.clone();
            AnyCancelable::new(move || {
                dead.store(true, Ordering::SeqCst);
                left_sub.cancel();
                right_sub.cancel();
            })
        })
    }

    /// Suppress emissions while `gate` last reported `true`; once it flips
    /// back to `false`, replay the most recent suppressed value. Until the
    /// gate has emitted at all, values pass through.
    pub fn blocked_while(&self, gate: &Signal<bool>) -> Signal<T>
    where
        T: Clone,
    {
        let upstream = self.clone();
        let gate = gate.clone();
        Signal::new(move |handler| {
            let state = Arc::new(Mutex::new(GateState::<T> {
                blocked: false,
                pending: None,
            }));
            let handler = Arc::new(Mutex::new(handler));
            let dead = Arc::new(AtomicBool::new(false));

            let gate_sub = {
                let state = state.clone();
                let handler = handler.clone();
                let dead = dead.clone();
                gate.observe(move |blocked| {
                    if dead.load(Ordering::SeqCst) {
                        return false;
                    }
                    let replay = {
                        let mut state = state.lock();
                        state.blocked = *blocked;
                        if *blocked {
                            None
                        } else {
                            state.pending.take()
                        }
                    };
                    match replay {
                        Some(value) => {
                            let keep = {
                                let mut handler = handler.lock();
                                (*handler)(&value)
                            };
                            if !keep {
                                dead.store(true, Ordering::SeqCst);
                            }
                            keep
                        }
                        None => true,
                    }
                })
            };

            let value_sub = {
                let state = state.clone();
                let handler = handler.clone();
                let dead = dead.clone();
                upstream.observe(move |value| {
                    if dead.load(Ordering::SeqCst) {
                        return false;
                    }
                    {
                        let mut state = state.lock();
                        if state.blocked {
                            state.pending = Some(value.clone());
                            return true;
                        }
                    }
                    let keep = {
                        let mut handler = handler.lock();
                        (*handler)(value)
                    };
                    if !keep {
                        dead.store(true, Ordering::SeqCst);
                    }
                    keep
                })
            };

            let dead = dead.clone();
            AnyCancelable::new(move || {
                dead.store(true, Ordering::SeqCst);
                gate_sub.cancel();
                value_sub.cancel();
            })
        })
    }
}

struct GateState<T> {
    blocked: bool,
    pending: Option<T>,
}

fn deliver_pair<T, U>(
    pair: (Option<T>, Option<U>),
    handler: &Arc<Mutex<ObserverHandler<(T, U)>>>,
    dead: &Arc<AtomicBool>,
) -> bool {
    if let (Some(left), Some(right)) = pair {
        let keep = {
            let mut handler = handler.lock();
            (*handler)(&(left, right))
        };
        if !keep {
            dead.store(true, Ordering::SeqCst);
        }
        keep
    } else {
        true
    }
}
