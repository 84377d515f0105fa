use super::registers::{MADCTL_MV, MADCTL_MX, MADCTL_MY};

/// One orientation of a panel: MADCTL bits plus the visible geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotationEntry {
    pub madctl: u8,
    pub width: u16,
    pub height: u16,
    pub x_offset: u16,
    pub y_offset: u16,
}

impl RotationEntry {
    const fn new(madctl: u8, width: u16, height: u16, x_offset: u16, y_offset: u16) -> Self {
        Self {
            madctl,
            width,
            height,
            x_offset,
            y_offset,
        }
    }
}

pub const ROT_240X320: [RotationEntry; 4] = [
    RotationEntry::new(0x00, 240, 320, 0, 0),
    RotationEntry::new(MADCTL_MX | MADCTL_MV, 320, 240, 0, 0),
    RotationEntry::new(MADCTL_MY | MADCTL_MX, 240, 320, 0, 0),
    RotationEntry::new(MADCTL_MY | MADCTL_MV, 320, 240, 0, 0),
];

// 240x240 glass sits inside 240x320 controller memory, so the flipped
// orientations start 80 rows/columns in.
pub const ROT_240X240: [RotationEntry; 4] = [
    RotationEntry::new(0x00, 240, 240, 0, 0),
    RotationEntry::new(MADCTL_MX | MADCTL_MV, 240, 240, 0, 0),
    RotationEntry::new(MADCTL_MY | MADCTL_MX, 240, 240, 0, 80),
    RotationEntry::new(MADCTL_MY | MADCTL_MV, 240, 240, 80, 0),
];

/// Pick the table for a native panel size.
pub fn table_for(width: u16, height: u16) -> &'static [RotationEntry] {
    match (width, height) {
        (240, 320) => &ROT_240X320,
        _ => &ROT_240X240,
    }
}

/// Index into a table of `len` entries for any requested rotation.
pub fn table_index(rotation: i32, len: usize) -> usize {
    rotation.rem_euclid(len as i32) as usize
}
