use binderscope::engine::config::{
    DEFAULT_CLASH_THRESHOLD, DEFAULT_CUTOFF, DEFAULT_SPATIAL_INDEX_MIN_PAIRS,
};

pub struct DefaultsConfig {
    pub cutoff: f64,
    pub clash_threshold: f64,
    pub include_hetero: bool,
    pub spatial_index_min_pairs: usize,
    pub model: String,
    pub hotspot_count: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            clash_threshold: DEFAULT_CLASH_THRESHOLD,
            include_hetero: false,
            spatial_index_min_pairs: DEFAULT_SPATIAL_INDEX_MIN_PAIRS,
            model: "precomputed".to_string(),
            hotspot_count: 5,
        }
    }
}
