use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Display scale for reward icons, in slider order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Zoom {
    /// Text only with the small program icon
    Zoom0,
    Zoom25,
    Zoom50,
    Zoom75,
    #[default]
    Zoom100,
}

impl Zoom {
    pub fn all() -> &'static [Zoom] {
        &[
            Self::Zoom0,
            Self::Zoom25,
            Self::Zoom50,
            Self::Zoom75,
            Self::Zoom100,
        ]
    }

    pub fn max_ordinal() -> usize {
        Self::all().len() - 1
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Result<Self> {
        Self::all().get(ordinal).copied().ok_or(Error::InvalidZoom {
            value: ordinal,
            max: Self::max_ordinal(),
        })
    }

    /// Ordinal clamped into range, as a slider would.
    pub fn clamped(ordinal: i64) -> Self {
        let max = Self::max_ordinal();
        let index = usize::try_from(ordinal.max(0)).map_or(max, |i| i.min(max));
        Self::all()[index]
    }

    pub fn percent(self) -> u32 {
        match self {
            Self::Zoom0 => 0,
            Self::Zoom25 => 25,
            Self::Zoom50 => 50,
            Self::Zoom75 => 75,
            Self::Zoom100 => 100,
        }
    }

    /// Move by one mouse-wheel event. Positive units zoom in.
    pub fn scrolled(self, units_to_scroll: i32, scroll_amount: i32) -> Self {
        if scroll_amount == 0 {
            return self;
        }
        let steps = i64::from(units_to_scroll / scroll_amount);
        Self::clamped(self.ordinal() as i64 + steps)
    }

    /// Icon size for a base size, or None when no scaled icon is drawn.
    pub fn scale(self, width: u32, height: u32) -> Option<(u32, u32)> {
        match self.percent() {
            0 => None,
            percent => Some((width * percent / 100, height * percent / 100)),
        }
    }
}

impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
