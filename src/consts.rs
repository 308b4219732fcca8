/// Name of the directory all generated files are rooted at.
pub const GENERATED_DIR_NAME: &str = "_generated";
/// File name of the emitted preCICE configuration.
pub const PRECICE_CONFIG_FILE_NAME: &str = "precice-config.xml";
/// File name of the per-participant adapter configuration.
pub const ADAPTER_CONFIG_FILE_NAME: &str = "adapter-config.json";
/// Directory log files are written to.
pub const LOG_DIR_NAME: &str = ".logs";
/// At most this many log files are kept; older ones are removed first.
pub const MAX_KEPT_LOG_FILES: usize = 10;

/// Where users can read up on the coupling library the generated cases target.
pub const PRECICE_URL: &str = "https://precice.org";

/// Data names containing one of these substrings are extensive quantities and
/// are transported with a write-conservative mapping.
pub const EXTENSIVE_DATA: &[&str] = &["force", "displacement"];
/// Data names containing one of these substrings are intensive quantities and
/// are transported with a read-consistent mapping.
pub const INTENSIVE_DATA: &[&str] = &["temperature", "pressure", "velocity", "heat-flux"];

/// Adjectives used to rename data exchanged in both directions under one name.
/// Order matters: the head of the pool is consumed first.
pub const DATA_UNIQUIFIERS: &[&str] = &[
    "magnificent",
    "grand",
    "wonderful",
    "suspicious",
    "mischievous",
    "clever",
    "pretty",
    "scary",
    "adventurous",
    "alien",
    "humungous",
    "informative",
];

/// Participants without an explicit dimensionality are three-dimensional.
pub const DEFAULT_PARTICIPANT_DIMENSIONALITY: u8 = 3;
/// Simulated time span emitted into every coupling scheme.
pub const DEFAULT_MAX_TIME: &str = "1.0";
/// Time window size emitted into every coupling scheme.
pub const DEFAULT_TIME_WINDOW_SIZE: &str = "1e-2";
/// Iteration cap for implicit and multi coupling schemes.
pub const DEFAULT_MAX_ITERATIONS: &str = "50";
/// Limit emitted for every relative convergence measure.
pub const DEFAULT_CONVERGENCE_LIMIT: &str = "1e-4";
