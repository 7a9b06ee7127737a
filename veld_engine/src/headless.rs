//! Headless collaborators: recording subsystems with no platform behind
//! them. The demo binary drives a small scripted town through these, and the
//! integration tests use the same types to assert phase order and gating.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

use veld_core::gui::{GuiMode, Window, WindowId};
use veld_core::subsystems::{
    AudioSystem, GuiRenderer, InputSystem, Interpreter, MechanicsSystem, WorldSystem,
};
use veld_core::{
    GlobalScripts, LocalScripts, ObjectId, ScriptContext, ScriptError, StateManager, WindowManager,
};

use crate::engine::Engine;
use crate::scheduler::Collaborators;
use crate::settings::Settings;

/// Shared, append-only record of everything the collaborators did, in call
/// order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Rc<RefCell<Vec<String>>>,
}

#[derive(Debug, Serialize)]
pub struct EventReport {
    pub events: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, label: impl Into<String>) {
        self.entries.borrow_mut().push(label.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.contains(needle))
    }

    pub fn count(&self, needle: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.contains(needle))
            .count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn report(&self) -> EventReport {
        EventReport {
            events: self.snapshot(),
        }
    }
}

pub struct RecordingInput {
    log: EventLog,
}

impl InputSystem for RecordingInput {
    fn poll(&mut self, _dt: Duration) {
        self.log.push("input.poll");
    }
}

pub struct RecordingAudio {
    log: EventLog,
    pub playing: Option<String>,
}

impl RecordingAudio {
    pub fn new(log: EventLog) -> Self {
        RecordingAudio { log, playing: None }
    }
}

impl AudioSystem for RecordingAudio {
    fn update(&mut self, _dt: Duration) {
        self.log.push("audio.update");
    }

    fn stream_music(&mut self, track: &str) {
        self.log.push(format!("audio.stream {track}"));
        self.playing = Some(track.to_string());
    }
}

pub struct RecordingMechanics {
    log: EventLog,
}

impl MechanicsSystem for RecordingMechanics {
    fn update(&mut self, _dt: Duration, gui_active: bool) {
        self.log.push(format!("mechanics.update gui={gui_active}"));
    }
}

struct DemoObject {
    name: String,
}

/// A still-standing town: a handful of named objects, a game clock, and a
/// player who is only as dead as a test wants them to be.
pub struct DemoWorld {
    log: EventLog,
    objects: BTreeMap<ObjectId, DemoObject>,
    faced: Option<ObjectId>,
    player_dead: bool,
    clock_hours: f64,
    cell_changed: bool,
}

impl DemoWorld {
    pub fn new(log: EventLog) -> Self {
        let mut objects = BTreeMap::new();
        for (id, name) in [
            (1, "chapel bell"),
            (2, "cellar door"),
            (3, "watch captain"),
            (4, "town gate"),
            // Boundary marker: placed but never presented to the player.
            (5, ""),
        ] {
            objects.insert(
                ObjectId(id),
                DemoObject {
                    name: name.to_string(),
                },
            );
        }
        DemoWorld {
            log,
            objects,
            faced: None,
            player_dead: false,
            clock_hours: 0.0,
            cell_changed: true,
        }
    }

    pub fn set_faced(&mut self, faced: Option<ObjectId>) {
        self.faced = faced;
    }

    pub fn set_player_dead(&mut self, dead: bool) {
        self.player_dead = dead;
    }

    pub fn clock_hours(&self) -> f64 {
        self.clock_hours
    }

    pub fn cell_changed(&self) -> bool {
        self.cell_changed
    }
}

impl WorldSystem for DemoWorld {
    fn update(&mut self, _dt: Duration, gui_active: bool) {
        self.log.push(format!("world.update gui={gui_active}"));
    }

    fn advance_clock(&mut self, hours: f64) {
        self.clock_hours += hours;
        self.log.push("world.clock");
    }

    fn player(&self) -> ObjectId {
        ObjectId(0)
    }

    fn is_player_dead(&self) -> bool {
        self.player_dead
    }

    fn faced_object(&self) -> Option<ObjectId> {
        self.faced
    }

    fn display_name(&self, object: ObjectId) -> Option<String> {
        self.objects.get(&object).map(|entry| entry.name.clone())
    }

    fn activate(&mut self, object: ObjectId, _actor: ObjectId) {
        let name = self
            .objects
            .get(&object)
            .map(|entry| entry.name.clone())
            .unwrap_or_default();
        self.log.push(format!("world.activate {name}"));
    }

    fn mark_cell_unchanged(&mut self) {
        self.cell_changed = false;
        self.log.push("world.cell_unchanged");
    }
}

/// Renders nothing; records what a real GUI layer would read each call.
pub struct RecordingGui {
    log: EventLog,
    windows: Rc<RefCell<WindowManager>>,
}

impl RecordingGui {
    pub fn new(log: EventLog, windows: Rc<RefCell<WindowManager>>) -> Self {
        RecordingGui { log, windows }
    }
}

impl GuiRenderer for RecordingGui {
    fn update(&mut self, _dt: Duration) {
        let windows = self.windows.borrow();
        self.log.push(format!(
            "gui.update mode={:?} visible={}",
            windows.current_mode(),
            windows.visible_windows().len()
        ));
    }
}

/// Window handle that only tracks its own visibility flag.
struct PassiveWindow {
    id: WindowId,
    #[allow(dead_code)]
    visible: bool,
}

impl Window for PassiveWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn close(&mut self) {}
}

/// Interprets the demo town's scripts by name. Stands in for the real
/// compiled-script VM, which lives outside this core.
pub struct DemoInterpreter {
    log: EventLog,
    state: Rc<RefCell<StateManager>>,
    /// Curfew tolls before the town asks the host to quit.
    pub quit_after_tolls: f64,
}

impl DemoInterpreter {
    pub fn new(log: EventLog, state: Rc<RefCell<StateManager>>) -> Self {
        DemoInterpreter {
            log,
            state,
            quit_after_tolls: 6.0,
        }
    }
}

impl Interpreter for DemoInterpreter {
    fn run(&mut self, script: &str, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        match script {
            "chapel_bell" => {
                let rings = ctx.locals.borrow().get("rings") + 1.0;
                ctx.locals.borrow_mut().set("rings", rings);
                self.log.push(format!("script.chapel_bell rings={rings}"));
                if rings == 3.0 {
                    // The third ring rouses the gate watch; the fresh script
                    // must sit out the rest of this pass.
                    let gate = ObjectId(4);
                    let mut locals = ctx.local_scripts.borrow_mut();
                    locals.add("gate_watch", gate);
                    locals.set_ignore(Some(gate));
                    self.log.push("script.chapel_bell posts the gate watch");
                }
                Ok(())
            }
            "gate_watch" => {
                let patrols = ctx.locals.borrow().get("patrols") + 1.0;
                ctx.locals.borrow_mut().set("patrols", patrols);
                self.log.push(format!("script.gate_watch patrols={patrols}"));
                Ok(())
            }
            "cellar_rats" => {
                let gnawed = ctx.locals.borrow().get("gnawed") + 1.0;
                ctx.locals.borrow_mut().set("gnawed", gnawed);
                self.log.push(format!("script.cellar_rats gnawed={gnawed}"));
                if gnawed >= 2.0 {
                    if let Some(target) = ctx.target {
                        ctx.local_scripts.borrow_mut().remove(target);
                        self.log.push("script.cellar_rats goes quiet");
                    }
                }
                Ok(())
            }
            "curfew_bell" => {
                let tolls = ctx.locals.borrow().get("tolls") + 1.0;
                ctx.locals.borrow_mut().set("tolls", tolls);
                self.log.push(format!("script.curfew_bell tolls={tolls}"));
                if tolls >= self.quit_after_tolls {
                    self.state.borrow_mut().request_quit();
                    self.log.push("script.curfew_bell calls curfew");
                }
                Ok(())
            }
            "watch_captain" => {
                let inspections = ctx.locals.borrow().get("inspections") + 1.0;
                ctx.locals.borrow_mut().set("inspections", inspections);
                self.log
                    .push(format!("script.watch_captain inspections={inspections}"));
                if inspections == 2.0 {
                    // Second inspection relieves the gate watch; its script
                    // restarts with fresh state and sits out this pass.
                    let gate = ObjectId(4);
                    let mut locals = ctx.local_scripts.borrow_mut();
                    locals.add("gate_watch", gate);
                    locals.set_ignore(Some(gate));
                    self.log.push("script.watch_captain relieves the gate watch");
                }
                Ok(())
            }
            "faulty_shrine" => {
                self.log.push("script.faulty_shrine approached");
                Err(ScriptError::runtime(
                    script,
                    "the offering bowl is missing",
                ))
            }
            other => Err(ScriptError::Unknown(other.to_string())),
        }
    }
}

/// Fully wired headless engine: shared state, demo collaborators, one event
/// log. Construction registers the window handles; scripts are seeded
/// separately so a boot that clears per-save state does not eat them.
pub struct DemoHarness {
    pub log: EventLog,
    pub state: Rc<RefCell<StateManager>>,
    pub windows: Rc<RefCell<WindowManager>>,
    pub local_scripts: Rc<RefCell<LocalScripts>>,
    pub global_scripts: Rc<RefCell<GlobalScripts>>,
    pub world: Rc<RefCell<DemoWorld>>,
    pub audio: Rc<RefCell<RecordingAudio>>,
    pub interpreter: Rc<RefCell<DemoInterpreter>>,
}

impl DemoHarness {
    pub fn new() -> Self {
        let log = EventLog::new();
        let state = Rc::new(RefCell::new(StateManager::new()));

        let mut manager = WindowManager::new();
        for id in WindowId::ALL {
            manager.register_window(Box::new(PassiveWindow { id, visible: false }));
        }
        manager.bind_mode(GuiMode::Inventory, WindowId::Inventory);
        manager.bind_mode(GuiMode::Dialogue, WindowId::Dialogue);
        manager.bind_mode(GuiMode::Console, WindowId::Console);
        manager.bind_mode(GuiMode::Journal, WindowId::Journal);
        manager.bind_mode(GuiMode::Rest, WindowId::Rest);
        let windows = Rc::new(RefCell::new(manager));

        let world = Rc::new(RefCell::new(DemoWorld::new(log.clone())));
        let audio = Rc::new(RefCell::new(RecordingAudio::new(log.clone())));
        let interpreter = Rc::new(RefCell::new(DemoInterpreter::new(
            log.clone(),
            state.clone(),
        )));

        DemoHarness {
            log,
            state,
            windows,
            local_scripts: Rc::new(RefCell::new(LocalScripts::new())),
            global_scripts: Rc::new(RefCell::new(GlobalScripts::new())),
            world,
            audio,
            interpreter,
        }
    }

    /// The demo town's standing scripts. Seed after booting.
    pub fn seed_demo_scripts(&self) {
        let mut locals = self.local_scripts.borrow_mut();
        locals.add("chapel_bell", ObjectId(1));
        locals.add("cellar_rats", ObjectId(2));
        self.global_scripts.borrow_mut().add("curfew_bell");
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            input: Rc::new(RefCell::new(RecordingInput {
                log: self.log.clone(),
            })),
            audio: self.audio.clone(),
            mechanics: Rc::new(RefCell::new(RecordingMechanics {
                log: self.log.clone(),
            })),
            world: self.world.clone(),
            interpreter: self.interpreter.clone(),
            gui: Rc::new(RefCell::new(RecordingGui::new(
                self.log.clone(),
                self.windows.clone(),
            ))),
        }
    }

    pub fn engine(&self, settings: &Settings) -> Engine {
        Engine::new(
            self.collaborators(),
            self.state.clone(),
            self.windows.clone(),
            self.local_scripts.clone(),
            self.global_scripts.clone(),
            settings,
        )
    }
}

impl Default for DemoHarness {
    fn default() -> Self {
        Self::new()
    }
}
