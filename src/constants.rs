// Arrays never shrink below this many slots once they've been asked to grow.
pub const MIN_DYNAMIC_CAPACITY: usize = 10;
pub const DEFAULT_DYNAMIC_CAPACITY: usize = 2;

// Load factor bounds for the open-addressing table. Anything past 0.99 risks a probe that walks
// the entire table, anything under 0.1 just wastes memory.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.8;
pub const MIN_LOAD_FACTOR: f64 = 0.1;
pub const MAX_LOAD_FACTOR: f64 = 0.99;

// Schedule terms pack the year into six bits above a two bit season.
pub const MIN_TERM_YEAR: u16 = 2000;
pub const MAX_TERM_YEAR: u16 = MIN_TERM_YEAR + (1 << 6) - 1;

// dedup_key() is term | section << 8 with four digit sections, so this covers every key.
pub const DEDUP_BITSET_LEN: usize = 10_000 << 8;

// Poisson sampling gives up past this many arrivals in a single minute.
pub const MAX_ARRIVALS_PER_STEP: usize = 100;

pub const DEFAULT_CITIES_PATH: &str = "cities.txt";
pub const DEFAULT_SCHEDULE_PATH: &str = "dvc-schedule.txt";
pub const DEFAULT_SIMULATION_PATH: &str = "simulation.txt";
