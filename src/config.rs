/// Window title prefix
pub const TITLE: &str = "Toroidal Life";

/// Version shown in the window title
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Size of one cell on screen, in logical pixels
pub const CELL_SIZE: u32 = 8;

/// Default generations per second
pub const FRAMERATE: u32 = 20;

/// Default probability that a cell starts alive
pub const OCCUPANCY: f64 = 0.20;

/// Default birth/survival rulestring
pub const DEFAULT_RULE: &str = "B3/S23";

/// Default generation count for headless runs
pub const HEADLESS_GENERATIONS: u64 = 100;

/// Headless runs print the final grid only up to this width
pub const MAX_PRINT_WIDTH: usize = 200;

/// Poll interval of a paused simulation thread, in milliseconds
pub const PAUSED_POLL_MS: u64 = 10;

// Cell colors, linear RGBA
pub const ALIVE_COLOR: [f32; 4] = [0.784, 0.784, 0.392, 1.0];
pub const DEAD_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
