//! Column names, sentinel values and fixed file names shared across the pipeline.

/// Marker for "classification attempted, no rule matched" and for missing text.
pub const NA: &str = "NA";

// Default file names used when neither the CLI nor the config supplies one
pub const DEFAULT_INPUT_FILE: &str = "amazon_laptop_2023.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "amazon_laptop_2023_cleaned.csv";
pub const DEFAULT_CONFIG_FILE: &str = "cleaner.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";

// Input columns, after lower-casing and trimming the header
pub const COL_BRAND: &str = "brand";
pub const COL_MODEL: &str = "model";
pub const COL_SCREEN_SIZE: &str = "screen_size";
pub const COL_COLOR: &str = "color";
pub const COL_HARDDISK: &str = "harddisk";
pub const COL_CPU: &str = "cpu";
pub const COL_RAM: &str = "ram";
pub const COL_OS: &str = "os";
pub const COL_SPECIAL_FEATURES: &str = "special_features";
pub const COL_GRAPHICS: &str = "graphics";
pub const COL_GRAPHICS_COPROCESSOR: &str = "graphics_coprocessor";
pub const COL_CPU_SPEED: &str = "cpu_speed";
pub const COL_RATING: &str = "rating";
pub const COL_PRICE: &str = "price";

/// Cell contents that spreadsheet readers treat as missing by default.
pub const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Delimiters separating values inside multi-valued cells (colors, features).
pub const MULTI_VALUE_DELIMITERS: &[char] = &[',', '/'];

/// Right-closed bin edges for `harddisk_range_gb`; the last bin is open ended.
pub const HARDDISK_BIN_EDGES: &[u32] = &[16, 32, 64, 128, 256, 512, 1024, 2048];

/// Hard disk values at or below this are taken to be terabytes.
pub const HARDDISK_TB_THRESHOLD: f64 = 8.0;

/// CPU clock values above this are taken to be megahertz.
pub const CPU_SPEED_MHZ_THRESHOLD: f64 = 10.0;

/// Joiner for set-valued output cells.
pub const SET_JOINER: &str = ", ";
