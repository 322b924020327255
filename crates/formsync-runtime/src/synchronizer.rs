#![forbid(unsafe_code)]

//! Bidirectional synchronization between a field map and a set of controls.
//!
//! # Data flow
//!
//! ```text
//! control event ──► extract ──► diff(prev, next) ──► watch gate ──► callbacks
//! set_state(partial) ──► merge ──► apply to every bound control   (silent)
//! ```
//!
//! # Architecture
//!
//! The state lives in an `Rc<State>` that is replaced, never mutated, on
//! every change. The snapshot handed to callbacks as "previous" is the old
//! `Rc`, so it cannot observe later mutations.
//!
//! Listeners attached to controls capture a `Weak` reference to the shared
//! core. After the synchronizer is dropped a stray event upgrades to nothing
//! and returns.
//!
//! # Invariants
//!
//! 1. The bound control set is fixed at construction.
//! 2. Callbacks never receive equal `(prev, next)` states and run at most
//!    once per control event.
//! 3. `set_state` never notifies.
//! 4. Callbacks run with no internal borrow held; they may call back into
//!    the synchronizer.
//! 5. Events raised while state is being applied to controls are ignored.
//! 6. `version()` increments exactly once per mutation that changes state.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unnamed control | Empty `name` | Per [`UnnamedControls`] policy |
//! | Empty source | No controls | Every operation is a no-op on empty state |
//! | Callback panic | User code | Propagates to the event's dispatcher |

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use formsync_core::{
    Control, ControlEvent, ControlKind, ControlSource, FieldValue, Listener, State, SyncError,
    WatchSet, apply, changed_fields, evaluate, extract_into,
};
use tracing::{debug, debug_span, trace, warn};

use crate::binding::BindingScope;
use crate::config::{SyncConfig, UnnamedControls};
use crate::subscribers::{ChangeCallback, Subscribers, Subscription};

/// State owned by one synchronizer.
struct Inner<C> {
    controls: Vec<C>,
    state: Rc<State>,
    version: u64,
    config: SyncConfig,
    on_update: Option<ChangeCallback>,
    subscribers: Subscribers,
}

impl<C: Control> Inner<C> {
    /// Extract control `index` into a new state. Returns the snapshot taken
    /// before the change, or `None` if nothing changed.
    fn extract(&mut self, index: usize) -> Option<Rc<State>> {
        let control = &self.controls[index];
        let mut next = State::clone(&self.state);
        let name = control.name();
        let group = self
            .controls
            .iter()
            .filter(|c| c.kind() == ControlKind::Radio && c.name() == name);
        extract_into(&mut next, control, self.config.radio, group);

        if next == *self.state {
            return None;
        }
        self.version += 1;
        Some(std::mem::replace(&mut self.state, Rc::new(next)))
    }

    /// Callbacks due for a `(prev, next)` pair, primary callback first.
    fn due(&self, prev: &State) -> Vec<ChangeCallback> {
        let next = &*self.state;
        let mut due = Vec::new();
        if let Some(on_update) = &self.on_update {
            let verdict = evaluate(prev, next, self.config.watch.as_ref());
            if verdict.should_notify() {
                due.push(Rc::clone(on_update));
            } else {
                trace!(verdict = verdict.as_str(), "primary callback suppressed");
            }
        }
        due.extend(self.subscribers.due(prev, next));
        due
    }
}

struct Shared<C> {
    inner: RefCell<Inner<C>>,
    /// Set while state is written onto controls.
    applying: Cell<bool>,
}

impl<C: Control + Clone> Shared<C> {
    /// Run one control event through extract → diff → notify.
    fn handle_event(&self, index: usize, event: ControlEvent) {
        if self.applying.get() {
            trace!(index, event = event.as_str(), "event during apply ignored");
            return;
        }
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            trace!(index, event = event.as_str(), "re-entrant event ignored");
            return;
        };

        let name = inner.controls[index].name();
        let _span = debug_span!("formsync.update", field = %name, event = event.as_str()).entered();

        let Some(prev) = inner.extract(index) else {
            trace!("state unchanged");
            return;
        };
        let next = Rc::clone(&inner.state);
        let due = inner.due(&prev);
        drop(inner);

        debug!(
            version = self.version(),
            fields = ?changed_fields(&prev, &next),
            callbacks = due.len(),
            "state changed"
        );
        for callback in due {
            callback(&prev, &next);
        }
    }

    fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Write the current state onto every bound control.
    fn apply_all(&self) {
        let (controls, state) = {
            let inner = self.inner.borrow();
            (inner.controls.clone(), Rc::clone(&inner.state))
        };
        self.applying.set(true);
        let written = controls.iter().filter(|c| apply(&state, *c)).count();
        self.applying.set(false);
        trace!(written, total = controls.len(), "state applied");
    }
}

/// Keeps a field map and a fixed set of controls in sync.
///
/// # Example
///
/// ```ignore
/// let sync = StateSynchronizer::new(
///     &form,
///     |prev, next| println!("{prev:?} -> {next:?}"),
///     Some(WatchSet::new(["subscribe"])),
/// );
/// sync.set_state(State::new().with("subscribe", true));
/// sync.destroy();
/// ```
pub struct StateSynchronizer<C: Control + Clone + 'static> {
    shared: Rc<Shared<C>>,
    scope: RefCell<BindingScope<C>>,
}

impl<C: Control + Clone + 'static> StateSynchronizer<C> {
    /// Bind to every control in `source`, notifying `on_state_update` when a
    /// field in `watched` changes (any field if `watched` is `None`).
    pub fn new<S>(
        source: &S,
        on_state_update: impl Fn(&State, &State) + 'static,
        watched: Option<WatchSet>,
    ) -> Self
    where
        S: ControlSource<Control = C> + ?Sized,
    {
        SyncBuilder::new()
            .config(SyncConfig::new().watch_set(watched))
            .on_state_update(on_state_update)
            .bind(source)
    }

    /// Bind with `config` and no primary callback.
    pub fn with_config<S>(source: &S, config: SyncConfig) -> Self
    where
        S: ControlSource<Control = C> + ?Sized,
    {
        SyncBuilder::new().config(config).bind(source)
    }

    /// Like [`with_config`](Self::with_config), but fails on an unnamed
    /// control when `config.unnamed` is [`UnnamedControls::Reject`].
    pub fn try_with_config<S>(source: &S, config: SyncConfig) -> Result<Self, SyncError>
    where
        S: ControlSource<Control = C> + ?Sized,
    {
        SyncBuilder::new().config(config).try_bind(source)
    }

    fn build(
        controls: Vec<C>,
        config: SyncConfig,
        on_update: Option<ChangeCallback>,
    ) -> Self {
        let _span = debug_span!("formsync.bind", controls = controls.len()).entered();
        let events = config.events.events();
        let shared = Rc::new(Shared {
            inner: RefCell::new(Inner {
                controls,
                state: Rc::new(State::new()),
                version: 0,
                config,
                on_update,
                subscribers: Subscribers::new(),
            }),
            applying: Cell::new(false),
        });

        // Initial extraction, silent.
        {
            let mut inner = shared.inner.borrow_mut();
            for index in 0..inner.controls.len() {
                inner.extract(index);
            }
        }

        let mut scope = BindingScope::new();
        let controls = shared.inner.borrow().controls.clone();
        for (index, control) in controls.iter().enumerate() {
            let weak: Weak<Shared<C>> = Rc::downgrade(&shared);
            let listener = Listener::new(move |event| {
                if let Some(shared) = weak.upgrade() {
                    shared.handle_event(index, event);
                }
            });
            for &event in events {
                scope.bind(control, event, &listener);
            }
        }
        debug!(
            fields = shared.inner.borrow().state.len(),
            listeners = scope.binding_count(),
            "bound"
        );

        Self {
            shared,
            scope: RefCell::new(scope),
        }
    }

    /// Merge `partial` over the current state and reflect the result onto
    /// every bound control. Never notifies.
    pub fn set_state(&self, partial: State) {
        let _span = debug_span!("formsync.set_state", fields = partial.len()).entered();
        {
            let mut inner = self.shared.inner.borrow_mut();
            let next = inner.state.merged(&partial);
            if next != *inner.state {
                inner.version += 1;
                inner.state = Rc::new(next);
            }
        }
        self.shared.apply_all();
    }

    /// Rebuild state from scratch by re-extracting every bound control.
    /// Fields no bound control backs are dropped. Never notifies.
    pub fn resync(&self) {
        let _span = debug_span!("formsync.resync").entered();
        let mut inner = self.shared.inner.borrow_mut();
        let before = std::mem::take(&mut inner.state);
        let version = inner.version;
        for index in 0..inner.controls.len() {
            inner.extract(index);
        }
        inner.version = if *inner.state == *before {
            version
        } else {
            version + 1
        };
    }

    /// Detach every listener. Idempotent; also runs on drop.
    pub fn destroy(&self) {
        let mut scope = self.scope.borrow_mut();
        if scope.is_empty() {
            return;
        }
        let _span = debug_span!("formsync.destroy", listeners = scope.binding_count()).entered();
        scope.clear();
    }

    /// Register an additional change subscriber, gated by its own watch set.
    pub fn subscribe(
        &self,
        watch: Option<WatchSet>,
        callback: impl Fn(&State, &State) + 'static,
    ) -> Subscription {
        self.shared
            .inner
            .borrow()
            .subscribers
            .subscribe(watch, callback)
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> Rc<State> {
        Rc::clone(&self.shared.inner.borrow().state)
    }

    /// Current value of one field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.shared.inner.borrow().state.get(name).cloned()
    }

    /// Number of state changes since construction. Initial extraction counts.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.version()
    }

    /// Number of controls bound at construction.
    #[must_use]
    pub fn bound_controls(&self) -> usize {
        self.shared.inner.borrow().controls.len()
    }

    /// Whether listeners are still attached.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        !self.scope.borrow().is_empty()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> SyncConfig {
        self.shared.inner.borrow().config.clone()
    }
}

impl<C: Control + Clone + 'static> Drop for StateSynchronizer<C> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<C: Control + Clone + 'static> fmt::Debug for StateSynchronizer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.borrow();
        f.debug_struct("StateSynchronizer")
            .field("state", &*inner.state)
            .field("version", &inner.version)
            .field("controls", &inner.controls.len())
            .field("bound", &!self.scope.borrow().is_empty())
            .finish()
    }
}

/// Builder for [`StateSynchronizer`].
#[derive(Default)]
pub struct SyncBuilder {
    config: SyncConfig,
    on_update: Option<ChangeCallback>,
}

impl SyncBuilder {
    /// Default configuration, no primary callback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Watch the given fields for the primary callback.
    #[must_use]
    pub fn watch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.watch(fields);
        self
    }

    /// Primary change callback.
    #[must_use]
    pub fn on_state_update(mut self, callback: impl Fn(&State, &State) + 'static) -> Self {
        let callback: ChangeCallback = Rc::new(callback);
        self.on_update = Some(callback);
        self
    }

    /// Bind to `source`. Unnamed controls are skipped or kept per policy;
    /// [`UnnamedControls::Reject`] is treated as skip here, use
    /// [`SyncBuilder::try_bind`] to surface it.
    pub fn bind<S>(self, source: &S) -> StateSynchronizer<S::Control>
    where
        S: ControlSource + ?Sized,
        S::Control: Clone + 'static,
    {
        let controls = filter_unnamed(source.controls(), self.config.unnamed);
        StateSynchronizer::build(controls, self.config, self.on_update)
    }

    /// Bind to `source`, failing on the first unnamed control under
    /// [`UnnamedControls::Reject`].
    pub fn try_bind<S>(self, source: &S) -> Result<StateSynchronizer<S::Control>, SyncError>
    where
        S: ControlSource + ?Sized,
        S::Control: Clone + 'static,
    {
        let controls = source.controls();
        if self.config.unnamed == UnnamedControls::Reject {
            if let Some(position) = controls.iter().position(|c| c.name().is_empty()) {
                return Err(SyncError::UnnamedControl { position });
            }
        }
        let controls = filter_unnamed(controls, self.config.unnamed);
        Ok(StateSynchronizer::build(controls, self.config, self.on_update))
    }
}

impl fmt::Debug for SyncBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncBuilder")
            .field("config", &self.config)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

fn filter_unnamed<C: Control>(controls: Vec<C>, policy: UnnamedControls) -> Vec<C> {
    if policy == UnnamedControls::Keep {
        return controls;
    }
    controls
        .into_iter()
        .enumerate()
        .filter_map(|(position, control)| {
            if control.name().is_empty() {
                warn!(
                    position,
                    input_type = %control.input_type(),
                    "skipping control without a name"
                );
                None
            } else {
                Some(control)
            }
        })
        .collect()
}
