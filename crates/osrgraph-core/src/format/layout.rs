pub const STRING_ABSENT: u8 = 0x00;
pub const STRING_PRESENT: u8 = 0x0b;

pub const BYTE_WIDTH: usize = 1;
pub const SHORT_WIDTH: usize = 2;
pub const INT_WIDTH: usize = 4;
pub const LONG_WIDTH: usize = 8;

pub const ULEB_DATA_MASK: u8 = 0x7f;
pub const ULEB_CONTINUATION: u8 = 0x80;
pub const ULEB_MAX_SHIFT: u32 = 63;

pub const MODE_STANDARD: u8 = 0;
pub const MODE_TAIKO: u8 = 1;
pub const MODE_CATCH: u8 = 2;
pub const MODE_MANIA: u8 = 3;

/// Width of the header and footer with every optional string absent and an
/// empty motion-data blob.
pub const MIN_LEN: usize = BYTE_WIDTH
    + INT_WIDTH
    + 3 * BYTE_WIDTH
    + 6 * SHORT_WIDTH
    + INT_WIDTH
    + SHORT_WIDTH
    + BYTE_WIDTH
    + INT_WIDTH
    + BYTE_WIDTH
    + LONG_WIDTH
    + INT_WIDTH
    + LONG_WIDTH;
