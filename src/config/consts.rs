/// Environment variable holding the native plugin module list
pub const DEFAULT_LIBRARY_ENV_VAR: &str = "CHAINWOOD_DLL";
/// Separator between module paths in the library list
pub const LIBRARY_PATH_DELIMITER: char = ':';
/// Global random seed when the steering file sets none
pub const DEFAULT_RANDOM_SEED: u32 = 1_234_567_890;
/// Condition of a processor that declares none
pub const DEFAULT_CONDITION: &str = "true";
/// How often a job may rewind its input before giving up
pub const DEFAULT_MAX_REWINDS: u32 = 1;
