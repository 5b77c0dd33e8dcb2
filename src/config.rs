use std::time::Duration;

// Game
pub const TOTAL_ROUNDS: usize = 4;
pub const MAX_ROUND_SCORE: u32 = 100;
pub const MAX_TOTAL_SCORE: u32 = MAX_ROUND_SCORE * TOTAL_ROUNDS as u32;

// Target generation (integer ranges, upper bound exclusive)
pub const TARGET_HUE_RANGE: std::ops::Range<u32> = 0..360;
pub const TARGET_SAT_RANGE: std::ops::Range<u32> = 30..100; // never near-gray

// Accuracy weighting
pub const HUE_WEIGHT: f64 = 0.7;
pub const SAT_WEIGHT: f64 = 0.3;

// Nicknames
pub const NICKNAME_MAX_CHARS: usize = 64;

// Networking
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const SERVER_URL_ENV: &str = "CHROMAGUESS_SERVER";
// How long a confirmed round waits for its percentile before the result is drawn.
pub const PERCENTILE_GRACE: Duration = Duration::from_millis(500);

// Settings
pub const SETTINGS_DIR: &str = "save";
pub const SETTINGS_INI_PATH: &str = "save/settings.ini";

// Console wheel: center is (radius, radius)
pub const CONSOLE_WHEEL_RADIUS: f64 = 100.0;

// Swatch lightness used when showing a (hue, saturation) pair
pub const SWATCH_LIGHTNESS: f64 = 50.0;
