use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    static ref BBOX_PATTERN: Regex =
        Regex::new(r"bbox ([0-9]+) ([0-9]+) ([0-9]+) ([0-9]+);").expect("bbox pattern compiles");
}

/// Axis-aligned rectangle in page pixel space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("no `bbox x0 y0 x1 y1;` entry in metadata {0:?}")]
    Missing(String),
    #[error("bbox coordinate out of range in {0:?}")]
    Overflow(String),
    #[error("inverted bbox {0}")]
    Inverted(BBox),
    #[error("expected `minX,minY,maxX,maxY`, got {0:?}")]
    Syntax(String),
}

impl BBox {
    /// Marker for "no usable region". Never contained in anything.
    pub const SENTINEL: BBox = BBox {
        x0: -1,
        y0: -1,
        x1: -1,
        y1: -1,
    };

    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Builds a box, rejecting one whose min corner lies past its max corner.
    pub fn checked(x0: i32, y0: i32, x1: i32, y1: i32) -> Result<Self, RegionError> {
        let bbox = Self::new(x0, y0, x1, y1);
        if x0 > x1 || y0 > y1 {
            return Err(RegionError::Inverted(bbox));
        }
        Ok(bbox)
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// True when `self` lies entirely inside `outer`, edges included.
    pub fn contained(&self, outer: &BBox) -> bool {
        if self.is_sentinel() || outer.is_sentinel() {
            return false;
        }
        self.x0 >= outer.x0 && self.x1 <= outer.x1 && self.y0 >= outer.y0 && self.y1 <= outer.y1
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBOX {} {} {} {}", self.x0, self.y0, self.x1, self.y1)
    }
}

impl FromStr for BBox {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| RegionError::Syntax(s.to_string()))?;
        match parts.as_slice() {
            [x0, y0, x1, y1] => BBox::checked(*x0, *y0, *x1, *y1),
            _ => Err(RegionError::Syntax(s.to_string())),
        }
    }
}

/// Reads the first `bbox x0 y0 x1 y1;` entry from an hOCR `title` attribute.
pub fn parse_region(metadata: &str) -> Result<BBox, RegionError> {
    let caps = BBOX_PATTERN
        .captures(metadata)
        .ok_or_else(|| RegionError::Missing(metadata.to_string()))?;

    let mut coords = [0i32; 4];
    for (slot, idx) in coords.iter_mut().zip(1..=4) {
        *slot = caps[idx]
            .parse()
            .map_err(|_| RegionError::Overflow(metadata.to_string()))?;
    }

    BBox::checked(coords[0], coords[1], coords[2], coords[3])
}
