//! Registries for per-object ("local") and engine-level ("global") scripts.
//!
//! Scripts run once per tick. Local scripts are iterated over a snapshot
//! taken at the start of the pass, so a script that activates or removes
//! other scripts mid-pass never changes the membership of the pass already
//! in flight. The single `ignore` slot exempts a freshly (re)activated
//! object from the remainder of the current pass only.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

use crate::gui::WindowManager;

/// Handle to a placed game object. Allocation is the world's business; this
/// layer only needs a cheap, ordered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjectId(pub u32);

/// Variable store a script context is bound to. One per local-script entry,
/// one per global script.
#[derive(Debug, Default, Clone)]
pub struct Locals {
    values: BTreeMap<String, f64>,
}

impl Locals {
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }
}

#[derive(Debug, Clone)]
struct LocalEntry {
    script: String,
    target: ObjectId,
    locals: Rc<RefCell<Locals>>,
}

/// One (script, target, locals) triple captured by a snapshot. The pass owns
/// its locals handle, so an entry removed mid-pass still runs to completion.
#[derive(Debug, Clone)]
pub struct ActiveScript {
    pub script: String,
    pub target: ObjectId,
    pub locals: Rc<RefCell<Locals>>,
}

/// Registry of scripts bound to specific objects, in activation order.
#[derive(Debug, Default)]
pub struct LocalScripts {
    entries: Vec<LocalEntry>,
    ignore: Option<ObjectId>,
}

impl LocalScripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `script` on `target`. Reactivating an object replaces its
    /// script and hands it a fresh variable store; the entry keeps its
    /// position in activation order.
    pub fn add(&mut self, script: impl Into<String>, target: ObjectId) {
        let script = script.into();
        let locals = Rc::new(RefCell::new(Locals::default()));
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.target == target) {
            entry.script = script;
            entry.locals = locals;
        } else {
            self.entries.push(LocalEntry {
                script,
                target,
                locals,
            });
        }
    }

    /// Deactivate whatever script `target` carries. Returns false if the
    /// object had none.
    pub fn remove(&mut self, target: ObjectId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.target != target);
        self.entries.len() != before
    }

    pub fn has(&self, target: ObjectId) -> bool {
        self.entries.iter().any(|entry| entry.target == target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exempt `target` from the remainder of the current pass. At most one
    /// object is held; setting a new one overwrites the previous.
    pub fn set_ignore(&mut self, target: Option<ObjectId>) {
        self.ignore = target;
    }

    pub fn ignore(&self) -> Option<ObjectId> {
        self.ignore
    }

    pub fn locals(&self, target: ObjectId) -> Option<Rc<RefCell<Locals>>> {
        self.entries
            .iter()
            .find(|entry| entry.target == target)
            .map(|entry| entry.locals.clone())
    }

    /// Capture the membership for one pass. Mutations made while the pass
    /// runs affect only the next snapshot.
    pub fn snapshot(&self) -> Vec<ActiveScript> {
        self.entries
            .iter()
            .map(|entry| ActiveScript {
                script: entry.script.clone(),
                target: entry.target,
                locals: entry.locals.clone(),
            })
            .collect()
    }

    /// Drop every entry and the ignore marker. Used when a save is loaded or
    /// a new game starts.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.ignore = None;
    }
}

#[derive(Debug, Clone)]
struct GlobalEntry {
    script: String,
    enabled: bool,
    locals: Rc<RefCell<Locals>>,
}

/// Engine-level scripts, run once per tick after all local scripts, in
/// registration order. No ignore semantics apply here.
#[derive(Debug, Default)]
pub struct GlobalScripts {
    entries: Vec<GlobalEntry>,
}

impl GlobalScripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `script`, enabled. Re-registering an existing script only
    /// re-enables it; registration order is kept.
    pub fn add(&mut self, script: impl Into<String>) {
        let script = script.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.script == script) {
            entry.enabled = true;
        } else {
            self.entries.push(GlobalEntry {
                script,
                enabled: true,
                locals: Rc::new(RefCell::new(Locals::default())),
            });
        }
    }

    /// Disable without forgetting registration order or locals.
    pub fn disable(&mut self, script: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.script == script) {
            Some(entry) => {
                entry.enabled = false;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, script: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.script == script && entry.enabled)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enabled scripts in registration order, captured for one pass.
    pub fn snapshot(&self) -> Vec<(String, Rc<RefCell<Locals>>)> {
        self.entries
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| (entry.script.clone(), entry.locals.clone()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Everything an interpreter invocation may touch: the variable store it is
/// bound to, and the shared registries scripts mutate while running.
pub struct ScriptContext {
    /// Object the script is attached to; `None` for global scripts.
    pub target: Option<ObjectId>,
    pub locals: Rc<RefCell<Locals>>,
    pub local_scripts: Rc<RefCell<LocalScripts>>,
    pub global_scripts: Rc<RefCell<GlobalScripts>>,
    pub windows: Rc<RefCell<WindowManager>>,
}
