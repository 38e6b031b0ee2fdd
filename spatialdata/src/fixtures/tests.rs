use std::path::PathBuf;

use common::test_utils::init_tracing;
use rand::SeedableRng;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;

use super::*;
use crate::models::{RasterData, RasterKind};
use crate::spatial_data::Modality;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("spatialdata-{}-{name}", std::process::id()))
}

#[test]
fn same_seed_reproduces_values() {
    let a = get_rasters(
        &mut StdRng::seed_from_u64(9),
        2,
        &[3, 8, 8],
        RasterDtype::Float,
        "image",
        false,
    )
    .unwrap();
    let b = get_rasters(
        &mut StdRng::seed_from_u64(9),
        2,
        &[3, 8, 8],
        RasterDtype::Float,
        "image",
        false,
    )
    .unwrap();

    assert_eq!(a, b);
}

#[test]
fn different_seeds_keep_structure_but_change_values() {
    let mut first = Fixtures::seeded(1);
    let mut second = Fixtures::seeded(2);

    let a = first.build(Scenario::Full).unwrap().into_supported().unwrap();
    let b = second.build(Scenario::Full).unwrap().into_supported().unwrap();

    assert_eq!(a.element_names(), b.element_names());
    for (name, raster) in a.images() {
        let other = &b.images()[name];
        assert_eq!(raster.dims(), other.dims());
        assert_eq!(raster.base().data.dtype(), other.base().data.dtype());
        assert_ne!(raster.base().data, other.base().data);
    }
    assert_eq!(a.table().unwrap().n_obs(), b.table().unwrap().n_obs());
    assert_ne!(a.table().unwrap().x(), b.table().unwrap().x());
}

#[test]
fn reseed_restarts_the_sequence() {
    init_tracing();
    let mut fixtures = Fixtures::seeded(5);
    let first = fixtures.build(Scenario::Points).unwrap();
    let advanced = fixtures.build(Scenario::Points).unwrap();
    assert_ne!(first, advanced);

    fixtures.reseed(5);
    assert_eq!(fixtures.build(Scenario::Points).unwrap(), first);
}

#[test]
fn element_names_never_accumulate() {
    let names: Vec<String> = (0..4).map(|i| element_name("image", i)).collect();
    assert_eq!(names, vec!["image0", "image1", "image2", "image3"]);
}

#[test]
fn multiscale_scenarios_build_pyramids() {
    let mut fixtures = Fixtures::default();

    let images = fixtures
        .build(Scenario::ImagesMultiscale)
        .unwrap()
        .into_supported()
        .unwrap();
    let names: Vec<&str> = images.images().keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec!["image_multiscale0", "image_multiscale1", "image_multiscale2"]
    );
    for raster in images.images().values() {
        assert_eq!(raster.levels().len(), 3);
        assert_eq!(raster.levels()[2].dims, vec![3, 8, 8]);
    }

    let labels = fixtures
        .build(Scenario::LabelsMultiscale)
        .unwrap()
        .into_supported()
        .unwrap();
    for raster in labels.labels().values() {
        assert_eq!(raster.kind(), RasterKind::Label);
        assert_eq!(raster.levels()[1].dims, vec![32, 32]);
        assert!(matches!(raster.levels()[2].data, RasterData::Int(_)));
    }
}

#[test]
fn shapes_scenario_pairs_types_with_sizes() {
    let mut fixtures = Fixtures::default();
    let sdata = fixtures
        .build(Scenario::Shapes)
        .unwrap()
        .into_supported()
        .unwrap();

    assert_eq!(sdata.modalities(), vec![Modality::Shapes]);
    assert_eq!(sdata.shapes().len(), 2);
    assert_eq!(sdata.shapes()["shapes1"].shape_size(), 2.0);
}

#[test]
fn shapes_scenario_rejects_unpaired_config() {
    let mut fixtures = Fixtures::new(FixtureConfig {
        shape_sizes: vec![1.0],
        ..Default::default()
    });
    let err = fixtures.build(Scenario::Shapes).unwrap_err();
    assert!(matches!(err, FixtureError::Precondition(_)));
}

#[test]
fn oversized_raster_shapes_are_errors() {
    let mut fixtures = Fixtures::new(FixtureConfig {
        label_shape: vec![usize::MAX, 2],
        ..Default::default()
    });
    let err = fixtures.build(Scenario::Labels).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::Validation(crate::error::ValidationError::Raster { .. })
    ));

    let mut fixtures = Fixtures::new(FixtureConfig {
        image_shape: vec![3, 100_000, 100_000],
        ..Default::default()
    });
    let err = fixtures.build(Scenario::Images).unwrap_err();
    assert!(matches!(err, FixtureError::Precondition(_)));
}

#[test]
fn every_scenario_round_trips_through_its_name() {
    for scenario in Scenario::iter() {
        let name = scenario.to_string();
        assert_eq!(name.parse::<Scenario>().unwrap(), scenario);
    }
    assert_eq!(Scenario::EmptyPoints.to_string(), "empty_points");
    assert_eq!(Scenario::iter().filter(|s| s.is_empty_variant()).count(), 4);
}

#[test]
fn build_all_keeps_scenario_order() {
    let mut fixtures = Fixtures::default();
    let outcomes = fixtures.build_all(Scenario::parametrized()).unwrap();

    let order: Vec<Scenario> = outcomes.iter().map(|(s, _)| *s).collect();
    assert_eq!(order, Scenario::PARAMETRIZED);
    let skipped = outcomes.iter().filter(|(_, o)| !o.is_supported()).count();
    assert_eq!(skipped, 2);
}

#[test]
fn config_round_trips_through_yaml_and_json() {
    let config = FixtureConfig {
        seed: 7,
        raster_count: 1,
        table_region: "tissue".to_string(),
        ..Default::default()
    };

    for file in ["config.yaml", "config.json"] {
        let path = temp_path(file);
        config.save(&path).unwrap();
        let loaded = FixtureConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let path = temp_path("partial.yaml");
    std::fs::write(&path, "seed: 3\nraster_count: 1\n").unwrap();
    let loaded = FixtureConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(
        loaded,
        FixtureConfig {
            seed: 3,
            raster_count: 1,
            ..Default::default()
        }
    );
}

#[test]
fn config_errors_name_the_file() {
    let err = FixtureConfig::load("fixtures.toml").unwrap_err();
    assert!(matches!(err, FixtureError::ConfigExtension { .. }));

    let missing = temp_path("missing.json");
    let err = FixtureConfig::load(&missing).unwrap_err();
    assert!(matches!(err, FixtureError::Io { ref path, .. } if *path == missing));

    let path = temp_path("broken.json");
    std::fs::write(&path, "{ \"seed\": \"not a number\" }").unwrap();
    let err = FixtureConfig::load(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, FixtureError::ConfigFormat { .. }));
}
