use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builders() {
    let config = PartitionConfig::new(4);
    assert_eq!(config.requested_cgus, 4);
    assert_eq!(config.cache_dir, None);

    let config = config
        .with_requested_cgus(8)
        .with_cache_dir("build/cache/cgu");
    assert_eq!(config.requested_cgus, 8);
    assert_eq!(config.cache_dir, Some(PathBuf::from("build/cache/cgu")));
}

#[test]
fn default_uses_at_least_one_unit() {
    let config = PartitionConfig::default();
    assert!(config.requested_cgus >= 1);
    assert_eq!(config.cache_dir, None);
}
