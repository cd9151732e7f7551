use crate::kernel::logging::level_filter;
use log::LevelFilter;

#[test]
fn test_verbosity_levels_map_to_filters() {
    assert_eq!(level_filter(0), LevelFilter::Off);
    assert_eq!(level_filter(1), LevelFilter::Error);
    assert_eq!(level_filter(2), LevelFilter::Warn);
    assert_eq!(level_filter(3), LevelFilter::Info);
    assert_eq!(level_filter(4), LevelFilter::Debug);
}

#[test]
fn test_out_of_range_verbosity_is_clamped() {
    assert_eq!(level_filter(5), LevelFilter::Debug);
    assert_eq!(level_filter(u8::MAX), LevelFilter::Debug);
}
