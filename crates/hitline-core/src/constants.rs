//! Engine constants and tuning parameters.

/// Nominal update rate (Hz). Scheduling is time-based, so this only sets
/// the default cadence used by tools and tests.
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick at the nominal rate.
pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;

/// Milliseconds per second. Speeds are expressed in units/second,
/// hit trigger times in milliseconds.
pub const MS_PER_SEC: f64 = 1000.0;

// --- World bounds ---

/// Lower-left corner of the default world rectangle.
pub const WORLD_MIN: f64 = -4096.0;

/// Edge length of the default (square) world rectangle.
pub const WORLD_SIZE: f64 = 8192.0;

// --- Penetration ---

/// Damage multiplier applied to each subsequent target a bullet passes
/// through. The result is rounded up.
pub const PENETRATION_FALLOFF: f64 = 0.5;

// --- Radius projectiles ---

/// Time a detonated radius projectile stays alive so its burst can play.
pub const RADIUS_LINGER_MS: f64 = 500.0;

/// Exponential velocity decay for thrown radius projectiles (1/s).
pub const GRENADE_DAMPING: f64 = 3.0;

/// Below this speed (units/s) a thrown projectile comes to rest.
pub const GRENADE_REST_SPEED: f64 = 5.0;

// --- Multi-kill ---

/// Deaths within one hit group that count as a double kill.
pub const DOUBLE_KILL_THRESHOLD: u32 = 2;

/// Deaths within one hit group that count as a triple kill.
pub const TRIPLE_KILL_THRESHOLD: u32 = 3;

// --- Geometry ---

/// Tolerance for the unit-length check on ray directions.
pub const UNIT_DIRECTION_EPSILON: f64 = 1e-6;

/// Direction components smaller than this are treated as axis-parallel.
pub const PARALLEL_EPSILON: f64 = 1e-12;
