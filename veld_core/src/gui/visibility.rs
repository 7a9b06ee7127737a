use serde::Serialize;

/// Fixed enumeration of GUI windows the visibility sets range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[repr(u16)]
pub enum WindowId {
    Hud = 1 << 0,
    Map = 1 << 1,
    Inventory = 1 << 2,
    Stats = 1 << 3,
    Magic = 1 << 4,
    Journal = 1 << 5,
    Console = 1 << 6,
    Dialogue = 1 << 7,
    Rest = 1 << 8,
}

impl WindowId {
    pub const ALL: [WindowId; 9] = [
        WindowId::Hud,
        WindowId::Map,
        WindowId::Inventory,
        WindowId::Stats,
        WindowId::Magic,
        WindowId::Journal,
        WindowId::Console,
        WindowId::Dialogue,
        WindowId::Rest,
    ];

    fn mask(self) -> u16 {
        self as u16
    }
}

/// Set of window ids stored as a bit mask. Three of these (`allowed`,
/// `shown`, `force_hidden`) compose into effective visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowSet(u16);

impl WindowSet {
    pub const NONE: WindowSet = WindowSet(0);

    pub fn all() -> WindowSet {
        let mut set = WindowSet::NONE;
        for id in WindowId::ALL {
            set.insert(id);
        }
        set
    }

    pub fn insert(&mut self, id: WindowId) {
        self.0 |= id.mask();
    }

    pub fn remove(&mut self, id: WindowId) {
        self.0 &= !id.mask();
    }

    pub fn toggle(&mut self, id: WindowId) {
        self.0 ^= id.mask();
    }

    pub fn contains(self, id: WindowId) -> bool {
        self.0 & id.mask() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for WindowSet {
    fn default() -> Self {
        WindowSet::NONE
    }
}
