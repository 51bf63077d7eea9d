// ZDC readout geometry
pub const NUMBER_OF_CHANNELS: usize = 18;
pub const SAMPLES_PER_CHANNEL: usize = 10;
pub const BUFFER_SIZE: usize = NUMBER_OF_CHANNELS * SAMPLES_PER_CHANNEL;

// Flat index layout: (section - 1) * SECTION_STRIDE + positive * SIDE_STRIDE + (channel - 1)
pub const SECTION_STRIDE: usize = 5;
pub const SIDE_STRIDE: usize = 9;

pub const EM_CHANNELS: u8 = 5;
pub const HAD_CHANNELS: u8 = 4;

/// Column prefixes in flat index order
pub const CHANNEL_NAMES: [&str; NUMBER_OF_CHANNELS] = [
    "negEM1", "negEM2", "negEM3", "negEM4", "negEM5", "negHD1", "negHD2", "negHD3", "negHD4",
    "posEM1", "posEM2", "posEM3", "posEM4", "posEM5", "posHD1", "posHD2", "posHD3", "posHD4",
];

pub const DEFAULT_DIGI_TAG: &str = "castorDigis";

/// Recorded as the start time when the first event had no usable time stamp
pub const NO_START_TIME: &str = "NotAvailable";
