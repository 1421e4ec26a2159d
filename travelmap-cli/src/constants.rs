pub const DEFAULT_COORDS_PATH: &str = "coords.txt";
pub const DEFAULT_CONNS_PATH: &str = "conns.txt";
pub const DEFAULT_LOG_FILTER: &str = "info";
