use crate::gc::ObjHandle;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A chain of binding scopes. Each scope is a `HashMap` keyed by name — rebinding a name within
/// the same scope (a loop variable each iteration, a `let` re-run inside a loop body) upserts in
/// place rather than accumulating a fresh entry, the same way the teacher's own symbol table
/// (`checker::Scope`, a plain `HashMap<String, _>` built with `.insert()`) keeps one entry per
/// name. Lookup checks the local map first, then falls through to `outer`.
pub struct Environment {
    bindings: HashMap<String, ObjHandle>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            outer: None,
        }))
    }

    pub fn enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bindings: HashMap::new(),
            outer: Some(outer),
        }))
    }

    pub fn get(&self, name: &str) -> Option<ObjHandle> {
        if let Some(handle) = self.bindings.get(name) {
            return Some(*handle);
        }
        self.outer.as_ref().and_then(|outer| outer.borrow().get(name))
    }

    pub fn set(&mut self, name: impl Into<String>, handle: ObjHandle) {
        self.bindings.insert(name.into(), handle);
    }

    pub fn bindings(&self) -> impl Iterator<Item = &ObjHandle> {
        self.bindings.values()
    }

    pub fn outer(&self) -> Option<&Rc<RefCell<Environment>>> {
        self.outer.as_ref()
    }
}
