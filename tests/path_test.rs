//! Integration tests for ConfigPath.

use preflight::{ConfigPath, PathSegment};

#[test]
fn test_path_construction_and_display() {
    assert_eq!(ConfigPath::root().to_string(), "");
    assert_eq!(ConfigPath::value_host(3).to_string(), "valueHostConfigs[3]");

    let path = ConfigPath::value_host(0)
        .push_property("validatorConfigs")
        .push_index(1)
        .push_property("conditionConfig")
        .push_property("conditionConfigs")
        .push_index(2);
    assert_eq!(
        path.to_string(),
        "valueHostConfigs[0].validatorConfigs[1].conditionConfig.conditionConfigs[2]"
    );
    assert_eq!(path.depth(), 7);
}

#[test]
fn test_path_segments_preserved() {
    let path = ConfigPath::value_host(4).push_property("enablerConfig");

    let segments: Vec<&PathSegment> = path.segments().collect();
    assert_eq!(
        segments,
        vec![
            &PathSegment::Property("valueHostConfigs".into()),
            &PathSegment::Index(4),
            &PathSegment::Property("enablerConfig".into()),
        ]
    );
}

#[test]
fn test_path_is_immutable() {
    let base = ConfigPath::value_host(0).push_property("validatorConfigs");

    let first = base.push_index(0);
    let second = base.push_index(1);

    assert_eq!(base.to_string(), "valueHostConfigs[0].validatorConfigs");
    assert_eq!(first.to_string(), "valueHostConfigs[0].validatorConfigs[0]");
    assert_eq!(second.to_string(), "valueHostConfigs[0].validatorConfigs[1]");
}

#[test]
fn test_parent_and_last_property() {
    let path = ConfigPath::value_host(2).push_property("validatorConfigs").push_index(0);

    assert_eq!(path.last_property(), Some("validatorConfigs"));
    assert_eq!(
        path.parent().unwrap().to_string(),
        "valueHostConfigs[2].validatorConfigs"
    );
    assert!(path.starts_with(&ConfigPath::value_host(2)));
    assert!(!path.starts_with(&ConfigPath::value_host(1)));
    assert_eq!(ConfigPath::root().parent(), None);
}
