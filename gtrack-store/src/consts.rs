/// Magic bytes at the start of every track store file.
pub const STORE_HEADER: &[u8; 4] = b"GTCS";
pub const STORE_VERSION: u8 = 1;

pub const INT64_FLAG: u8 = 0x01;
pub const FLOAT64_FLAG: u8 = 0x02;
pub const UTF8_FLAG: u8 = 0x03;

/// Every fixed-width item (and every string offset) is eight bytes.
pub const ITEM_SIZE: u64 = 8;
