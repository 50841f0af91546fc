//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::filter::FilterExpression;
use regex::Regex;
use serde::Deserialize;
use std;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs;
use std::io;
use tera::{Context, Tera};
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationCfg {
    #[serde(default)]
    pub input: InputCfg,
    #[serde(rename = "layer", default)]
    pub layers: Vec<LayerFilterCfg>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct InputCfg {
    /// Gzip handling of input tiles (auto, always, never)
    #[serde(default = "default_gzip")]
    pub gzip: String,
}

impl Default for InputCfg {
    fn default() -> Self {
        InputCfg {
            gzip: default_gzip(),
        }
    }
}

pub fn default_gzip() -> String {
    "auto".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct LayerFilterCfg {
    pub name: String,
    /// Legacy GL filter, e.g. `["==", "class", "road"]`
    pub filter: Option<Value>,
}

/// Gzip handling of input tiles
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GzipMode {
    Auto,
    Always,
    Never,
}

impl GzipMode {
    pub fn from_config(cfg: &InputCfg) -> Result<GzipMode, String> {
        match cfg.gzip.as_str() {
            "auto" => Ok(GzipMode::Auto),
            "always" => Ok(GzipMode::Always),
            "never" => Ok(GzipMode::Never),
            other => Err(format!("Invalid gzip mode `{}`", other)),
        }
    }
}

/// Filter applied to a named layer
#[derive(Clone, Debug)]
pub struct LayerFilter {
    pub layer: String,
    pub filter: Option<FilterExpression>,
}

impl<'a> Config<'a, LayerFilterCfg> for LayerFilter {
    fn from_config(cfg: &LayerFilterCfg) -> Result<Self, String> {
        let filter = match cfg.filter {
            Some(ref toml) => {
                let json = serde_json::to_value(toml)
                    .map_err(|e| format!("Layer '{}': {}", cfg.name, e))?;
                let expr = FilterExpression::from_json(&json)
                    .map_err(|e| format!("Layer '{}': {}", cfg.name, e))?;
                Some(expr)
            }
            None => None,
        };
        Ok(LayerFilter {
            layer: cfg.name.clone(),
            filter,
        })
    }

    fn gen_config() -> String {
        r#"
[[layer]]
name = ""
#filter = ["==", "class", "road"]
"#
        .to_string()
    }
}

pub const DEFAULT_CONFIG: &'static str = r#"
[input]
gzip = "auto" # auto | always | never
"#;

/// Configuration template
pub fn gen_config() -> String {
    let mut config = String::from(DEFAULT_CONFIG);
    config.push_str(&LayerFilter::gen_config());
    config
}

/// Read a TOML config file into `T`.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let config_toml = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => "Could not find config file!".to_string(),
        _ => format!("Error while reading config: [{}]", e),
    })?;
    parse_config(config_toml, path)
}

/// Render `{{env.VAR}}` placeholders and deserialize the TOML into `T`.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    let toml = render_env(&config_toml, path)?;
    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}

fn render_env(template: &str, name: &str) -> Result<String, String> {
    let old_syntax = Regex::new(r"\$\{([[:alnum:]_]+)\}").map_err(|e| e.to_string())?;
    if old_syntax.is_match(template) {
        return Err(
            "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`".to_string(),
        );
    }

    let env: HashMap<String, String> = env::vars().collect();
    let mut context = Context::new();
    context.insert("env", &env);
    let mut tera = Tera::default();
    tera.add_raw_template(name, template)
        .map_err(|e| format!("Template error: {}", e))?;
    tera.render(name, &context).map_err(|e| {
        let cause = e.source().map_or_else(|| e.to_string(), |s| s.to_string());
        format!("Template error: {}", cause)
    })
}
