use std::cell::Cell;
use std::rc::Rc;

use ai_core::{Blackboard, BlackboardSchema, KeyId, ObserverAction, Subscription};

use crate::{
    Decorator, DecoratorConfig, DecoratorError, DecoratorId, DecoratorSignal, NotifyObserver,
    SignalQueue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorState {
    /// Initialized from the asset, not observing anything.
    Idle,
    /// Observing its keys and reporting condition changes.
    Relevant,
}

/// A decorator node bound to an asset, with its relevance lifecycle.
///
/// `on_become_relevant` subscribes to every observed key; `on_cease_relevant` (or dropping the
/// instance) releases those subscriptions. Each relevant period therefore holds at most one
/// observer per key.
pub struct DecoratorInstance {
    id: DecoratorId,
    config: DecoratorConfig,
    decorator: Rc<dyn Decorator>,
    observed: Vec<KeyId>,
    state: DecoratorState,
    last_result: Rc<Cell<bool>>,
    subscriptions: Vec<Subscription>,
}

impl DecoratorInstance {
    /// Runs `initialize_from_asset` and freezes the decorator.
    pub fn new<D: Decorator>(
        id: DecoratorId,
        mut decorator: D,
        config: DecoratorConfig,
        schema: &BlackboardSchema,
    ) -> Result<Self, DecoratorError> {
        decorator.initialize_from_asset(schema)?;

        let mut observed = decorator.observed_keys();
        observed.sort();
        observed.dedup();

        Ok(Self {
            id,
            config,
            decorator: Rc::new(decorator),
            observed,
            state: DecoratorState::Idle,
            last_result: Rc::new(Cell::new(false)),
            subscriptions: Vec::new(),
        })
    }

    pub fn id(&self) -> DecoratorId {
        self.id
    }

    pub fn config(&self) -> &DecoratorConfig {
        &self.config
    }

    pub fn state(&self) -> DecoratorState {
        self.state
    }

    pub fn is_relevant(&self) -> bool {
        self.state == DecoratorState::Relevant
    }

    pub fn observed_keys(&self) -> &[KeyId] {
        &self.observed
    }

    pub fn description(&self) -> String {
        let description = self.decorator.static_description();
        if self.config.inverse_condition {
            format!("NOT {description}")
        } else {
            description
        }
    }

    /// Condition without `inverse_condition`. Can be queried in any state.
    pub fn calculate_raw_condition_value(&self, blackboard: &Blackboard) -> bool {
        self.decorator.calculate_raw_condition_value(blackboard)
    }

    /// Condition with `inverse_condition` applied.
    pub fn evaluate(&self, blackboard: &Blackboard) -> bool {
        self.calculate_raw_condition_value(blackboard) != self.config.inverse_condition
    }

    /// Last condition reported while relevant.
    pub fn last_result(&self) -> Option<bool> {
        self.is_relevant().then(|| self.last_result.get())
    }

    /// Start observing. Returns the initial condition.
    pub fn on_become_relevant(
        &mut self,
        blackboard: &Blackboard,
        signals: &SignalQueue,
    ) -> Result<bool, DecoratorError> {
        if self.is_relevant() {
            return Err(DecoratorError::AlreadyRelevant(self.id));
        }

        let initial = self.evaluate(blackboard);
        self.last_result.set(initial);

        let mut subscriptions = Vec::with_capacity(self.observed.len());
        for &key in &self.observed {
            let handler = ConditionObserver {
                id: self.id,
                config: self.config,
                decorator: Rc::clone(&self.decorator),
                last_result: Rc::clone(&self.last_result),
                signals: signals.clone(),
            };
            // On error the subscriptions collected so far are dropped and unregistered.
            subscriptions.push(blackboard.observe(key, move |bb, key| handler.on_change(bb, key))?);
        }

        self.subscriptions = subscriptions;
        self.state = DecoratorState::Relevant;
        tracing::debug!(
            decorator = self.id.0,
            keys = self.observed.len(),
            initial,
            "decorator became relevant"
        );
        Ok(initial)
    }

    /// Stop observing. A no-op when the decorator is not relevant.
    pub fn on_cease_relevant(&mut self) {
        if !self.is_relevant() {
            tracing::trace!(decorator = self.id.0, "cease relevant ignored, not relevant");
            return;
        }
        self.subscriptions.clear();
        self.state = DecoratorState::Idle;
        tracing::debug!(decorator = self.id.0, "decorator ceased relevance");
    }
}

impl std::fmt::Debug for DecoratorInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratorInstance")
            .field("id", &self.id)
            .field("description", &self.decorator.static_description())
            .field("config", &self.config)
            .field("state", &self.state)
            .field("observed", &self.observed)
            .finish()
    }
}

struct ConditionObserver {
    id: DecoratorId,
    config: DecoratorConfig,
    decorator: Rc<dyn Decorator>,
    last_result: Rc<Cell<bool>>,
    signals: SignalQueue,
}

impl ConditionObserver {
    fn on_change(&self, blackboard: &Blackboard, key: KeyId) -> ObserverAction {
        let raw = self.decorator.calculate_raw_condition_value(blackboard);
        let result = raw != self.config.inverse_condition;
        let flipped = result != self.last_result.replace(result);

        let report = match self.config.notify_observer {
            NotifyObserver::OnResultChange => flipped,
            NotifyObserver::OnValueChange => true,
        };
        if report {
            tracing::trace!(
                decorator = self.id.0,
                key = %key,
                result,
                "decorator condition report"
            );
            self.signals.push(DecoratorSignal {
                decorator: self.id,
                key,
                result,
                flow_abort_mode: self.config.flow_abort_mode,
            });
        }
        ObserverAction::Keep
    }
}
