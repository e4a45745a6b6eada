use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ai_core::KeyId;

use crate::{DecoratorId, FlowAbortMode};

/// Condition report from a relevant decorator to the tree scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoratorSignal {
    pub decorator: DecoratorId,
    /// Key whose change triggered the re-evaluation.
    pub key: KeyId,
    /// Condition after `inverse_condition` was applied.
    pub result: bool,
    pub flow_abort_mode: FlowAbortMode,
}

/// FIFO of decorator signals, shared between decorator observers and the scheduler.
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct SignalQueue {
    inner: Rc<RefCell<VecDeque<DecoratorSignal>>>,
}

impl SignalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, signal: DecoratorSignal) {
        self.inner.borrow_mut().push_back(signal);
    }

    pub fn pop(&self) -> Option<DecoratorSignal> {
        self.inner.borrow_mut().pop_front()
    }

    pub fn drain(&self) -> Vec<DecoratorSignal> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
