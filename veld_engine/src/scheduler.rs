//! The per-tick phase driver. One call to [`Scheduler::tick`] corresponds to
//! one rendered frame; phases run in a fixed dependency order and each one
//! is individually gated on game state and GUI mode.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::error;

use veld_core::gui::GuiMode;
use veld_core::subsystems::{
    AudioSystem, GuiRenderer, InputSystem, Interpreter, MechanicsSystem, WorldSystem,
};
use veld_core::{GameState, GlobalScripts, LocalScripts, ScriptContext, StateManager, WindowManager};

use crate::settings::Settings;
use crate::stats::FrameStats;

/// External subsystems the scheduler drives, injected at construction. The
/// scheduler owns shared handles rather than reaching through any global
/// environment.
pub struct Collaborators {
    pub input: Rc<RefCell<dyn InputSystem>>,
    pub audio: Rc<RefCell<dyn AudioSystem>>,
    pub mechanics: Rc<RefCell<dyn MechanicsSystem>>,
    pub world: Rc<RefCell<dyn WorldSystem>>,
    pub interpreter: Rc<RefCell<dyn Interpreter>>,
    pub gui: Rc<RefCell<dyn GuiRenderer>>,
}

pub struct Scheduler {
    collaborators: Collaborators,
    state: Rc<RefCell<StateManager>>,
    windows: Rc<RefCell<WindowManager>>,
    local_scripts: Rc<RefCell<LocalScripts>>,
    global_scripts: Rc<RefCell<GlobalScripts>>,
    sound_enabled: bool,
    scripts_enabled: bool,
    time_scale: f64,
    stats: FrameStats,
    frame: u64,
}

impl Scheduler {
    pub fn new(
        collaborators: Collaborators,
        state: Rc<RefCell<StateManager>>,
        windows: Rc<RefCell<WindowManager>>,
        local_scripts: Rc<RefCell<LocalScripts>>,
        global_scripts: Rc<RefCell<GlobalScripts>>,
        settings: &Settings,
    ) -> Self {
        Scheduler {
            collaborators,
            state,
            windows,
            local_scripts,
            global_scripts,
            sound_enabled: settings.sound_enabled,
            scripts_enabled: settings.scripts_enabled,
            time_scale: settings.time_scale,
            stats: FrameStats::new(),
            frame: 0,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Console toggle; flipping this off freezes script execution while the
    /// rest of the frame keeps running.
    pub fn set_scripts_enabled(&mut self, enabled: bool) {
        self.scripts_enabled = enabled;
    }

    /// Drive one frame. Any error escaping a phase ends the tick early; the
    /// next tick proceeds normally. Must not be called reentrantly.
    pub fn tick(&mut self, dt: Duration) {
        self.frame += 1;
        if let Err(err) = self.run_phases(dt) {
            error!("frame {}: tick aborted early: {err:#}", self.frame);
        }
    }

    fn run_phases(&mut self, dt: Duration) -> Result<()> {
        let tick_start = Instant::now();

        self.collaborators.input.borrow_mut().poll(dt);

        if self.sound_enabled {
            self.collaborators.audio.borrow_mut().update(dt);
        }

        // Most game processing pauses while any GUI mode is open; scripts
        // keep running unless the main menu itself is up.
        let gui_active = self.windows.borrow().is_gui_mode();
        let paused = self.windows.borrow().contains_mode(GuiMode::MainMenu);

        self.state.borrow_mut().update(dt);

        let before_scripts = tick_start.elapsed();
        if self.state.borrow().state() == GameState::Running {
            if !paused {
                if self.scripts_enabled {
                    self.run_local_scripts()?;
                    self.run_global_scripts()?;
                }
                self.collaborators.world.borrow_mut().mark_cell_unchanged();
            }

            if !gui_active {
                let hours = dt.as_secs_f64() * self.time_scale / 3600.0;
                self.collaborators.world.borrow_mut().advance_clock(hours);
            }
        }
        let after_scripts = tick_start.elapsed();

        let before_mechanics = tick_start.elapsed();
        if self.state.borrow().state() != GameState::NoGame {
            self.collaborators.mechanics.borrow_mut().update(dt, gui_active);
        }
        let after_mechanics = tick_start.elapsed();

        if self.state.borrow().state() == GameState::Running
            && !gui_active
            && self.collaborators.world.borrow().is_player_dead()
        {
            self.state.borrow_mut().end_game()?;
        }

        let before_world = tick_start.elapsed();
        if self.state.borrow().state() != GameState::NoGame {
            self.collaborators.world.borrow_mut().update(dt, gui_active);
        }
        let after_world = tick_start.elapsed();

        // The GUI stays interactive even with no game loaded.
        self.collaborators.gui.borrow_mut().update(dt);

        self.stats
            .record_span(self.frame, "script", before_scripts, after_scripts);
        self.stats
            .record_span(self.frame, "mechanics", before_mechanics, after_mechanics);
        self.stats
            .record_span(self.frame, "physics", before_world, after_world);

        Ok(())
    }

    /// One pass over the local-script registry. Membership is snapshotted at
    /// the start; the ignore slot is checked live so a script reactivated
    /// mid-pass stays skipped for the remainder of this pass.
    fn run_local_scripts(&mut self) -> Result<()> {
        let pass = self.local_scripts.borrow().snapshot();
        for entry in pass {
            let skipped = self.local_scripts.borrow().ignore() == Some(entry.target);
            if skipped {
                continue;
            }
            let mut ctx = ScriptContext {
                target: Some(entry.target),
                locals: entry.locals.clone(),
                local_scripts: self.local_scripts.clone(),
                global_scripts: self.global_scripts.clone(),
                windows: self.windows.clone(),
            };
            self.collaborators
                .interpreter
                .borrow_mut()
                .run(&entry.script, &mut ctx)
                .with_context(|| {
                    format!(
                        "running local script `{}` on object {:?}",
                        entry.script, entry.target
                    )
                })?;
        }
        self.local_scripts.borrow_mut().set_ignore(None);
        Ok(())
    }

    fn run_global_scripts(&mut self) -> Result<()> {
        let pass = self.global_scripts.borrow().snapshot();
        for (script, locals) in pass {
            let mut ctx = ScriptContext {
                target: None,
                locals,
                local_scripts: self.local_scripts.clone(),
                global_scripts: self.global_scripts.clone(),
                windows: self.windows.clone(),
            };
            self.collaborators
                .interpreter
                .borrow_mut()
                .run(&script, &mut ctx)
                .with_context(|| format!("running global script `{script}`"))?;
        }
        Ok(())
    }
}
