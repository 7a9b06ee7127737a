//! Engine shell around the scheduler: the frame loop, the boot flow, and the
//! player-facing entry points (activation, new game, load).

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::info;

use veld_core::gui::GuiMode;
use veld_core::subsystems::{AudioSystem, WorldSystem};
use veld_core::{GlobalScripts, LocalScripts, StateManager, WindowManager};

use crate::scheduler::{Collaborators, Scheduler};
use crate::settings::Settings;
use crate::stats::FrameStats;

/// Track streamed while the main menu waits for the player.
pub const TITLE_MUSIC: &str = "music/title_theme.ogg";

/// How the engine enters its first frame.
#[derive(Debug, Default, Clone)]
pub struct BootOptions {
    /// Start a new game immediately instead of opening the main menu.
    pub skip_menu: bool,
    /// Load this save at boot; wins over `skip_menu`.
    pub load_save: Option<String>,
}

pub struct Engine {
    scheduler: Scheduler,
    state: Rc<RefCell<StateManager>>,
    windows: Rc<RefCell<WindowManager>>,
    local_scripts: Rc<RefCell<LocalScripts>>,
    world: Rc<RefCell<dyn WorldSystem>>,
    audio: Rc<RefCell<dyn AudioSystem>>,
}

impl Engine {
    pub fn new(
        collaborators: Collaborators,
        state: Rc<RefCell<StateManager>>,
        windows: Rc<RefCell<WindowManager>>,
        local_scripts: Rc<RefCell<LocalScripts>>,
        global_scripts: Rc<RefCell<GlobalScripts>>,
        settings: &Settings,
    ) -> Self {
        let world = collaborators.world.clone();
        let audio = collaborators.audio.clone();
        let scheduler = Scheduler::new(
            collaborators,
            state.clone(),
            windows.clone(),
            local_scripts.clone(),
            global_scripts,
            settings,
        );
        Engine {
            scheduler,
            state,
            windows,
            local_scripts,
            world,
            audio,
        }
    }

    /// Enter the first frame: load a save, start straight into gameplay, or
    /// settle into the main menu with the title theme playing.
    pub fn boot(&mut self, options: &BootOptions) {
        if let Some(save_id) = options.load_save.as_deref() {
            self.load_game(save_id);
        } else if options.skip_menu {
            self.new_game(true);
        } else {
            self.windows.borrow_mut().push_mode(GuiMode::MainMenu);
            self.audio.borrow_mut().stream_music(TITLE_MUSIC);
        }
    }

    pub fn new_game(&mut self, bypass_intro: bool) {
        self.clear_per_save_state();
        self.state.borrow_mut().new_game(bypass_intro);
    }

    pub fn load_game(&mut self, save_id: &str) {
        self.clear_per_save_state();
        self.state.borrow_mut().load_game(save_id);
    }

    // GUI stacks and per-object scripts belong to the save being left
    // behind; registered window handles persist.
    fn clear_per_save_state(&mut self) {
        self.windows.borrow_mut().clear();
        self.local_scripts.borrow_mut().clear();
    }

    pub fn tick(&mut self, dt: Duration) {
        self.scheduler.tick(dt);
    }

    /// Real-time frame loop: measure elapsed wall time per frame and tick
    /// until something requests a quit.
    pub fn run(&mut self) {
        let mut last = Instant::now();
        while !self.state.borrow().has_quit_request() {
            let now = Instant::now();
            let dt = now.duration_since(last);
            last = now;
            self.tick(dt);
        }
        info!("quit requested after {} frames", self.scheduler.frame_number());
    }

    /// Fixed-step loop for headless runs and tests. Stops early on a quit
    /// request; returns the number of frames actually driven.
    pub fn run_fixed(&mut self, ticks: u64, dt: Duration) -> u64 {
        let mut driven = 0;
        for _ in 0..ticks {
            if self.state.borrow().has_quit_request() {
                break;
            }
            self.tick(dt);
            driven += 1;
        }
        driven
    }

    /// Player interaction with whatever the camera faces. Suppressed while
    /// any GUI mode is open; objects with no user-visible name are inert.
    pub fn activate(&mut self) {
        if self.windows.borrow().is_gui_mode() {
            return;
        }
        let (target, actor) = {
            let world = self.world.borrow();
            let Some(target) = world.faced_object() else {
                return;
            };
            match world.display_name(target) {
                Some(name) if !name.is_empty() => (target, world.player()),
                _ => return,
            }
        };
        self.world.borrow_mut().activate(target, actor);
    }

    pub fn frame_number(&self) -> u64 {
        self.scheduler.frame_number()
    }

    pub fn frame_stats(&self) -> &FrameStats {
        self.scheduler.stats()
    }

    pub fn set_scripts_enabled(&mut self, enabled: bool) {
        self.scheduler.set_scripts_enabled(enabled);
    }
}

/// First unused `screenshotNNN.<format>` under `dir`.
pub fn next_screenshot_path(dir: &Path, format: &str) -> PathBuf {
    let mut shot = 0u32;
    loop {
        let candidate = dir.join(format!("screenshot{shot:03}.{format}"));
        if !candidate.exists() {
            return candidate;
        }
        shot += 1;
    }
}
