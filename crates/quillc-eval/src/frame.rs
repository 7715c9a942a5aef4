//! Local variable frames (§4.4). The source's `Evaluator` chains
//! frames through a raw `Evaluator* parent` and walks it in
//! `GetValue`/`SetValue` (`Evaluator.hpp`); a child control construct
//! or function call gets a fresh `Evaluator` parented at whichever
//! frame was current at that point, and an assignment has to be able
//! to reach up the chain and overwrite a binding that lives in an
//! ancestor. `Rc<RefCell<..>>` is the standard stand-in for that
//! pointer-parented, mutate-through-the-chain shape once there's no
//! single owner holding every frame on the Rust call stack at once —
//! a function call's frame outlives the expression that creates it
//! only in the sense that its *ancestors* must still be reachable from
//! it, which a `&mut` reborrow chain can't express once control
//! returns up past the call.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use quillc_par::SymbolId;

use crate::value::Value;

pub struct FrameData {
    locals: RefCell<HashMap<SymbolId, Value>>,
    parent: Option<Frame>,
}

/// A reference-counted handle to a frame. Cheap to clone; every clone
/// shares the same underlying locals.
#[derive(Clone)]
pub struct Frame(Rc<FrameData>);

impl Frame {
    pub fn root() -> Self {
        Frame(Rc::new(FrameData {
            locals: RefCell::new(HashMap::new()),
            parent: None,
        }))
    }

    /// A new frame parented at `self` — used for every control
    /// construct body (if/elseif/else, while, do-while, each `for`
    /// iteration) and for function calls, which per the source are
    /// parented at the call site rather than the callee's own
    /// definition scope.
    pub fn child(&self) -> Self {
        Frame(Rc::new(FrameData {
            locals: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
        }))
    }

    pub fn define(&self, id: SymbolId, value: Value) {
        self.0.locals.borrow_mut().insert(id, value);
    }

    /// Walks `self` then `parent`, mirroring `GetValue`.
    pub fn get(&self, id: SymbolId) -> Option<Value> {
        if let Some(v) = self.0.locals.borrow().get(&id) {
            return Some(v.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.get(id))
    }

    /// Overwrites the nearest ancestor frame (including `self`) that
    /// already has a binding for `id`. Returns `false` if no frame in
    /// the chain has ever defined it.
    pub fn assign(&self, id: SymbolId, value: Value) -> bool {
        if self.0.locals.borrow().contains_key(&id) {
            self.0.locals.borrow_mut().insert(id, value);
            return true;
        }
        match &self.0.parent {
            Some(p) => p.assign(id, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillc_util::Idx;

    fn id(n: usize) -> SymbolId {
        SymbolId::from_usize(n)
    }

    #[test]
    fn lookup_falls_through_to_parent() {
        let root = Frame::root();
        root.define(id(1), Value::Number(1.0));
        let child = root.child();
        match child.get(id(1)) {
            Some(Value::Number(n)) => assert_eq!(n, 1.0),
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn assign_mutates_the_ancestor_that_owns_the_binding() {
        let root = Frame::root();
        root.define(id(1), Value::Number(1.0));
        let child = root.child();
        assert!(child.assign(id(1), Value::Number(2.0)));
        match root.get(id(1)) {
            Some(Value::Number(n)) => assert_eq!(n, 2.0),
            other => panic!("expected a number, got {other:?}"),
        }
    }

    #[test]
    fn a_child_frames_own_definition_shadows_the_parent() {
        let root = Frame::root();
        root.define(id(1), Value::Number(1.0));
        let child = root.child();
        child.define(id(1), Value::Number(9.0));
        match (child.get(id(1)), root.get(id(1))) {
            (Some(Value::Number(c)), Some(Value::Number(r))) => {
                assert_eq!(c, 9.0);
                assert_eq!(r, 1.0);
            }
            other => panic!("unexpected values: {other:?}"),
        }
    }

    #[test]
    fn assign_on_an_undefined_identifier_fails() {
        let root = Frame::root();
        assert!(!root.assign(id(1), Value::Void));
    }
}
