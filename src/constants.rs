// Screen defaults (pixels)
pub const DEFAULT_SCREEN_WIDTH: u32 = 288;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 512;
pub const MIN_SCREEN_WIDTH: u32 = 128;
pub const MIN_SCREEN_HEIGHT: u32 = 256;

// Ground line as a fraction of screen height
pub const GROUND_FRACTION: f64 = 0.79;

// Bird geometry
pub const BIRD_WIDTH: f64 = 34.0;
pub const BIRD_HEIGHT: f64 = 24.0;
pub const BIRD_X_FRACTION: f64 = 0.2;

// Cosmetic rotation: degrees per unit of velocity, clamped to [MIN, MAX]
pub const ROTATION_PER_VELOCITY: f64 = 9.0;
pub const MAX_ROTATION_DEG: f64 = 45.0;
pub const MIN_ROTATION_DEG: f64 = -90.0;

// Physics defaults (pixels per tick)
pub const DEFAULT_GRAVITY: f64 = 1.0;
pub const DEFAULT_FLAP_VELOCITY: f64 = -9.0;
pub const DEFAULT_MAX_FALL_SPEED: f64 = 10.0;
pub const DEFAULT_SCROLL_SPEED: f64 = 4.0;

// Pipes
pub const PIPE_WIDTH: f64 = 52.0;
pub const DEFAULT_PIPE_GAP: f64 = 100.0;
pub const SMALL_PIPE_GAP: f64 = 80.0;
/// Gap-top offsets a new pipe chooses from, added to 20% of the ground line.
pub const GAP_TOP_SLOTS: [f64; 8] = [20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0];
pub const GAP_TOP_BASE_FRACTION: f64 = 0.2;

// Rewards
pub const DEFAULT_SURVIVE_REWARD: f64 = 0.1;
pub const DEFAULT_PASS_REWARD: f64 = 1.0;
pub const DEFAULT_COLLISION_PENALTY: f64 = -2.0;

// Observations
pub const OBSERVED_PIPES: usize = 3;
pub const FEATURE_COUNT: usize = 2 + 2 * OBSERVED_PIPES;
pub const LIDAR_RAYS: usize = 180;
pub const LIDAR_RANGE_FRACTION: f64 = 0.8;

// Text rendering grid
pub const TEXT_COLUMNS: usize = 48;
pub const TEXT_ROWS: usize = 24;
