/// Highest surface elevation a vertex can take. Fault tiers and the
/// normalized "space" height are expressed against this ceiling.
pub const MAX_HEIGHT: f32 = 10.0;
/// Lowest surface elevation (deep oceanic divergence).
pub const MIN_HEIGHT: f32 = 0.25;

/// Base elevation of continental crust before noise and multipliers.
pub const CONTINENTAL_BASE: f32 = 4.5;
/// Base elevation of oceanic crust before noise and multipliers.
pub const OCEANIC_BASE: f32 = 1.5;

pub const EQUATOR_TEMP: f32 = 35.0;
pub const POLE_TEMP: f32 = -35.0;

/// Normalized height above which altitude cools instead of warms.
pub const HIGHLAND_THRESHOLD: f32 = 0.7;
/// Degrees lost per unit of normalized height above the threshold.
pub const HIGHLAND_LAPSE: f32 = 60.0;
/// Degrees gained per unit of normalized height below the threshold.
pub const LOWLAND_BONUS: f32 = 5.0;

/// Sentinel for vertices that carry no moisture sample (oceanic crust).
pub const MOISTURE_NO_DATA: f32 = -1.0;

pub const DEBUG_COLORS: &[[f32; 4]] = &[
    [1.0, 0.0, 0.0, 1.0], // red
    [0.0, 1.0, 0.0, 1.0], // green
    [0.0, 0.0, 1.0, 1.0], // blue
    [1.0, 1.0, 0.0, 1.0], // yellow
    [1.0, 0.0, 1.0, 1.0], // magenta
    [0.0, 1.0, 1.0, 1.0], // cyan
    [1.0, 0.5, 0.0, 1.0], // orange
    [0.5, 0.0, 1.0, 1.0], // violet
    [0.0, 0.5, 1.0, 1.0], // sky blue
    [0.5, 1.0, 0.0, 1.0], // lime
];
