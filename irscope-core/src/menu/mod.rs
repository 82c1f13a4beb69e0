//! Operator menu model
//!
//! Four items, each with a value clamped to its own range. Up/down moves
//! the selection, left/right adjusts the selected value. Every operation
//! reports what needs redrawing so the renderer only touches changed
//! labels.

use crate::thermal::{Palette, TempUnit};

/// Number of menu items
pub const ITEM_COUNT: usize = 4;

/// Menu items in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    /// Temperature unit (C/F)
    Unit,
    /// Heat-map palette (R/G/B/W)
    Palette,
    /// Signed offset added to every pixel code
    Offset,
    /// Left shift applied after the offset
    Gain,
}

impl MenuItem {
    /// All items in display order
    pub const ALL: [MenuItem; ITEM_COUNT] =
        [MenuItem::Unit, MenuItem::Palette, MenuItem::Offset, MenuItem::Gain];

    /// Row index of this item
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Item at a row index, clamped to the last item
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(ITEM_COUNT - 1)]
    }

    /// On-screen label
    pub const fn label(self) -> &'static str {
        match self {
            MenuItem::Unit => "deg",
            MenuItem::Palette => "clr",
            MenuItem::Offset => "off",
            MenuItem::Gain => "amp",
        }
    }

    /// Allowed value range
    pub const fn limits(self) -> ItemLimits {
        LIMITS[self as usize]
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Inclusive value range of one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ItemLimits {
    pub min: i8,
    pub max: i8,
}

impl ItemLimits {
    const fn new(min: i8, max: i8) -> Self {
        Self { min, max }
    }

    /// Clamp a value into range
    pub fn clamp(&self, value: i8) -> i8 {
        value.clamp(self.min, self.max)
    }
}

/// Value ranges, indexed by [`MenuItem::index`]
pub const LIMITS: [ItemLimits; ITEM_COUNT] = [
    ItemLimits::new(0, 1),
    ItemLimits::new(0, 3),
    ItemLimits::new(-10, 20),
    ItemLimits::new(0, 5),
];

/// Joystick direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Nav {
    Up,
    Down,
    Left,
    Right,
}

/// Presses latched since the last menu pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavPresses {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Change of the selector rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectorMove {
    /// Row to erase, if any
    pub from: Option<MenuItem>,
    /// Row to outline
    pub to: MenuItem,
}

/// What the renderer has to redraw after a menu operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Redraw {
    items: u8,
    /// Selector rectangle change
    pub selector: Option<SelectorMove>,
}

impl Redraw {
    /// Nothing to redraw
    pub const fn none() -> Self {
        Self {
            items: 0,
            selector: None,
        }
    }

    /// Every item plus the selector at `selected`
    pub const fn all(selected: MenuItem) -> Self {
        Self {
            items: (1 << ITEM_COUNT) - 1,
            selector: Some(SelectorMove {
                from: None,
                to: selected,
            }),
        }
    }

    /// Whether `item`'s value label must be redrawn
    pub fn contains(&self, item: MenuItem) -> bool {
        self.items & item.bit() != 0
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.items == 0 && self.selector.is_none()
    }

    /// Items whose value label must be redrawn
    pub fn items(&self) -> impl Iterator<Item = MenuItem> + '_ {
        MenuItem::ALL.into_iter().filter(|item| self.contains(*item))
    }

    fn mark(&mut self, item: MenuItem) {
        self.items |= item.bit();
    }

    fn merge(&mut self, other: Redraw) {
        self.items |= other.items;
        if other.selector.is_some() {
            self.selector = other.selector;
        }
    }
}

/// Menu state: selected row and per-item values
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Menu {
    selected: MenuItem,
    values: [i8; ITEM_COUNT],
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    /// Menu with the first item selected and every value at its minimum
    pub fn new() -> Self {
        let mut values = [0; ITEM_COUNT];
        for (value, limits) in values.iter_mut().zip(LIMITS.iter()) {
            *value = limits.min;
        }
        Self {
            selected: MenuItem::Unit,
            values,
        }
    }

    /// Menu with explicit starting values, clamped into range
    pub fn with_values(unit: TempUnit, palette: Palette, offset: i8, gain: i8) -> Self {
        let mut menu = Self::new();
        menu.values = [unit.index(), palette.index(), offset, gain];
        for (value, limits) in menu.values.iter_mut().zip(LIMITS.iter()) {
            *value = limits.clamp(*value);
        }
        menu
    }

    /// Currently selected item
    pub fn selected(&self) -> MenuItem {
        self.selected
    }

    /// Value of an item
    pub fn value(&self, item: MenuItem) -> i8 {
        self.values[item.index()]
    }

    /// Selected temperature unit
    pub fn unit(&self) -> TempUnit {
        TempUnit::from_index(self.value(MenuItem::Unit))
    }

    /// Selected palette
    pub fn palette(&self) -> Palette {
        Palette::from_index(self.value(MenuItem::Palette))
    }

    /// Pixel code offset
    pub fn offset(&self) -> i8 {
        self.value(MenuItem::Offset)
    }

    /// Pixel scale shift
    pub fn gain(&self) -> i8 {
        self.value(MenuItem::Gain)
    }

    /// Apply one joystick direction
    pub fn handle(&mut self, nav: Nav) -> Redraw {
        match nav {
            Nav::Up => self.select(self.selected.index().saturating_sub(1)),
            Nav::Down => self.select(self.selected.index() + 1),
            Nav::Left => self.adjust(-1),
            Nav::Right => self.adjust(1),
        }
    }

    /// Apply the presses latched during one frame
    ///
    /// Up wins over down and left wins over right; selection moves before
    /// the adjustment, so a simultaneous down+right adjusts the new row.
    pub fn process(&mut self, presses: NavPresses) -> Redraw {
        let mut redraw = Redraw::none();

        if presses.up {
            redraw.merge(self.handle(Nav::Up));
        } else if presses.down {
            redraw.merge(self.handle(Nav::Down));
        }

        if presses.left {
            redraw.merge(self.handle(Nav::Left));
        } else if presses.right {
            redraw.merge(self.handle(Nav::Right));
        }

        redraw
    }

    fn select(&mut self, index: usize) -> Redraw {
        let target = MenuItem::from_index(index);
        if target == self.selected {
            return Redraw::none();
        }
        let from = self.selected;
        self.selected = target;
        Redraw {
            items: 0,
            selector: Some(SelectorMove {
                from: Some(from),
                to: target,
            }),
        }
    }

    fn adjust(&mut self, delta: i8) -> Redraw {
        let item = self.selected;
        let limits = item.limits();
        let current = self.values[item.index()];
        let next = limits.clamp(current.saturating_add(delta));

        let mut redraw = Redraw::none();
        if next != current {
            self.values[item.index()] = next;
            redraw.mark(item);
        }
        redraw
    }
}
