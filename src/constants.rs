/// Physical constants and session defaults used in lift calculations

/// Standard gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Density of water at roughly 4°C (kg/m³)
///
/// Typical manometer fluid for a pitot-static tube.
pub const WATER_DENSITY: f64 = 1000.0;

/// Air density at sea level (kg/m³)
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225;

/// Neutral tube-angle correction factor
///
/// Multiplying a pitot-static reading by this leaves it unchanged, i.e. the tube
/// is taken to be perfectly aligned with the local flow.
pub const NO_TUBE_ANGLE_ADJUST: f64 = 1.0;

/// Default number of Monte Carlo samples carried by each uncertain value
pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;

/// Sample count at and above which element-wise ensemble arithmetic runs on the
/// rayon thread pool
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Ratio between the full width of a uniform distribution and its standard deviation
///
/// A uniform distribution on `[a, b]` has standard deviation `(b - a) / sqrt(12)`.
pub const UNIFORM_WIDTH_PER_STD_DEV: f64 = 3.464_101_615_137_754_6;
