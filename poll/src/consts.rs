/// A poll can't be started with fewer options than this.
pub const MIN_OPTIONS: u32 = 2;

/// NEP-297 event standard name.
pub const EVENT_STANDARD: &str = "poll";
pub const EVENT_VERSION: &str = "1.0.0";
