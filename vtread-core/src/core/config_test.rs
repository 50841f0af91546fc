//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{
    gen_config, parse_config, read_config, ApplicationCfg, Config, GzipMode, LayerFilter,
};
use crate::filter::{CompareOp, FilterExpression};
use crate::mvt::Value;

#[test]
fn test_parse_layer_filters() {
    let toml = r#"
        [input]
        gzip = "never"

        [[layer]]
        name = "roads"
        filter = ["all", ["==", "class", "road"], [">=", "lanes", 2]]

        [[layer]]
        name = "water"
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(GzipMode::from_config(&config.input), Ok(GzipMode::Never));
    assert_eq!(config.layers.len(), 2);

    let roads = LayerFilter::from_config(&config.layers[0]).unwrap();
    assert_eq!(roads.layer, "roads");
    assert_eq!(
        roads.filter,
        Some(FilterExpression::All(vec![
            FilterExpression::Compare("class".to_string(), CompareOp::Eq, Value::from("road")),
            FilterExpression::Compare("lanes".to_string(), CompareOp::Ge, Value::UInt(2)),
        ]))
    );
    let water = LayerFilter::from_config(&config.layers[1]).unwrap();
    assert!(water.filter.is_none());
}

#[test]
fn test_defaults() {
    let config: ApplicationCfg = parse_config("".to_string(), "").unwrap();
    assert_eq!(config.input.gzip, "auto");
    assert_eq!(GzipMode::from_config(&config.input), Ok(GzipMode::Auto));
    assert!(config.layers.is_empty());

    let config: ApplicationCfg = parse_config(gen_config(), "").unwrap();
    assert_eq!(config.layers.len(), 1);
    assert!(config.layers[0].filter.is_none());
}

#[test]
fn test_invalid_config() {
    let toml = r#"
        [input]
        gzip = "maybe"

        [[layer]]
        name = "roads"
        filter = ["~", "class", "road"]
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(
        GzipMode::from_config(&config.input),
        Err("Invalid gzip mode `maybe`".to_string())
    );
    assert_eq!(
        LayerFilter::from_config(&config.layers[0]).err(),
        Some("Layer 'roads': Unknown filter operator `~`".to_string())
    );

    let config: Result<ApplicationCfg, _> = parse_config("[[layer]]\n".to_string(), "cfg.toml");
    assert!(config.err().unwrap().starts_with("cfg.toml - missing field `name`"));

    let config: Result<ApplicationCfg, _> = read_config("wrongfile");
    assert_eq!("Could not find config file!", config.err().unwrap());
}

#[test]
fn test_env_template() {
    std::env::set_var("VTREAD_TEST_LAYER", "buildings");
    let toml = r#"
        [[layer]]
        name = "{{env.VTREAD_TEST_LAYER}}"
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(config.layers[0].name, "buildings");

    let toml = r#"
        [[layer]]
        name = "${VTREAD_TEST_LAYER}"
        "#;
    let config: Result<ApplicationCfg, _> = parse_config(toml.to_string(), "");
    assert_eq!(
        config.err().unwrap(),
        "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`"
    );
}
