//! Integration tests for cloudview-io
//!
//! These tests load real files from the temporary directory and check the
//! bounds, skipping and degradation behaviour of the loader.

use approx::assert_relative_eq;
use cloudview_core::{Drawable, Point3f};
use cloudview_io::*;
use std::fs;
use std::path::PathBuf;

/// Write `content` to a scratch file unique to this test
fn scratch_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cloudview_{}_{}.txt", name, std::process::id()));
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_three_rows_bounds_and_center() {
    let path = scratch_file("three_rows", "0 0 0 10\n2 0 0 50\n0 4 0 90\n");

    let cloud = load_intensity_cloud(&path).unwrap();
    assert_eq!(cloud.len(), 3);
    assert_eq!(cloud.lower_bound(), Point3f::new(0.0, 0.0, 0.0));
    assert_eq!(cloud.upper_bound(), Point3f::new(2.0, 4.0, 0.0));
    assert_relative_eq!(cloud.center(), Point3f::new(1.0, 2.0, 0.0));
    assert_eq!(cloud.intensities, vec![10.0, 50.0, 90.0]);

    let _ = fs::remove_file(path);
}

#[test]
fn test_missing_file_is_data_unavailable() {
    let path = std::env::temp_dir().join("cloudview_definitely_missing_cloud.txt");
    let _ = fs::remove_file(&path);

    let result = load_intensity_cloud(&path);
    match result {
        Err(LoadError::DataUnavailable { path: reported, .. }) => {
            assert!(reported.ends_with("cloudview_definitely_missing_cloud.txt"));
        }
        Ok(_) => panic!("loading a missing file must fail"),
    }
}

#[test]
fn test_three_field_line_is_ignored() {
    let path = scratch_file("short_line", "1 2 3 4\n5 6 7\n");

    let cloud = load_intensity_cloud(&path).unwrap();
    assert_eq!(cloud.len(), 1);
    assert_eq!(cloud[0], Point3f::new(1.0, 2.0, 3.0));
    assert_eq!(cloud.intensities, vec![4.0]);

    let _ = fs::remove_file(path);
}

#[test]
fn test_empty_file_has_origin_bounds() {
    let path = scratch_file("empty", "");

    let cloud = load_intensity_cloud(&path).unwrap();
    assert!(cloud.is_empty());
    assert_eq!(cloud.bounding_box(), (Point3f::origin(), Point3f::origin()));
    assert_eq!(cloud.bounds().extent().norm(), 0.0);

    let _ = fs::remove_file(path);
}

#[test]
fn test_file_order_is_preserved() {
    let path = scratch_file("order", "3 0 0 1\n# comment\n1 0 0 2\n2 0 0 3\n");

    let cloud = load_intensity_cloud(&path).unwrap();
    let xs: Vec<f32> = cloud.points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    assert_eq!(cloud.intensities, vec![1.0, 2.0, 3.0]);

    let _ = fs::remove_file(path);
}
