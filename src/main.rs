//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use clap::{App, AppSettings, ArgMatches, SubCommand};
use dotenv::dotenv;
use env_logger::Builder;
use log::Record;
use std::env;
use std::io::Write;
use std::process;
use time;
use vtread_core::core::config::{gen_config, GzipMode, InputCfg, LayerFilter};
use vtread_core::core::input::read_tile;
use vtread_core::core::stats::Statistics;
use vtread_core::core::{read_config, ApplicationCfg, Config};
use vtread_core::filter::FilterExpression;
use vtread_core::mvt::{AttributeSource, Layer, Tile};

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap_or_default(),
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log_env = env::var("RUST_LOG").ok();
    let rust_log = match (args.value_of("loglevel"), rust_log_env.as_ref()) {
        (None, Some(rust_log)) => rust_log.as_str(),
        (loglevel, _) => loglevel.unwrap_or("info"),
    };
    builder.parse_filters(rust_log);

    builder.init();
}

fn gzip_mode(args: &ArgMatches<'_>) -> Result<GzipMode, String> {
    let cfg = InputCfg {
        gzip: args.value_of("gzip").unwrap_or("auto").to_string(),
    };
    GzipMode::from_config(&cfg)
}

fn load_tile(args: &ArgMatches<'_>, mode: GzipMode) -> Result<Vec<u8>, String> {
    let path = args.value_of("TILE").ok_or("Missing tile file")?;
    read_tile(path, mode)
}

fn selected_layers<'t, 'a>(
    tile: &'t Tile<'a>,
    name: Option<&str>,
) -> Result<Vec<&'t Layer<'a>>, String> {
    match name {
        Some(name) => tile
            .layer(name)
            .map(|layer| vec![layer])
            .ok_or_else(|| format!("Layer '{}' not found", name)),
        None => Ok(tile
            .layer_names()
            .into_iter()
            .filter_map(|name| tile.layer(name))
            .collect()),
    }
}

fn info(args: &ArgMatches<'_>) -> Result<(), String> {
    let data = load_tile(args, gzip_mode(args)?)?;
    let tile = Tile::decode(&data).map_err(|e| e.to_string())?;
    println!("{} layers", tile.len());
    for layer in selected_layers(&tile, None)? {
        let features = match layer.feature_count() {
            Ok(count) => count.to_string(),
            Err(e) => format!("invalid ({})", e),
        };
        println!(
            "{}: extent={} version={} keys={} values={} features={}",
            layer.name,
            layer.extent,
            layer.version,
            layer.keys.len(),
            layer.values.len(),
            features
        );
    }
    Ok(())
}

fn dump(args: &ArgMatches<'_>) -> Result<(), String> {
    let data = load_tile(args, gzip_mode(args)?)?;
    let tile = Tile::decode(&data).map_err(|e| e.to_string())?;
    for layer in selected_layers(&tile, args.value_of("layer"))? {
        println!("Layer {}", layer.name);
        for feature in layer.features() {
            match feature {
                Ok(feature) => print!("{}", feature),
                Err(e) => return Err(format!("Layer '{}': {}", layer.name, e)),
            }
        }
    }
    Ok(())
}

fn print_filtered(layer: &Layer<'_>, filter: &FilterExpression) {
    println!("Layer {}", layer.name);
    for raw in layer.filter(filter) {
        match raw.decode() {
            Ok(feature) => print!("{}", feature),
            Err(e) => warn!("Layer '{}': skipping feature: {}", layer.name, e),
        }
    }
}

fn filter(args: &ArgMatches<'_>) -> Result<(), String> {
    let (mode, filters) = match args.value_of("config") {
        Some(path) => {
            let config: ApplicationCfg = read_config(path)?;
            let filters = config
                .layers
                .iter()
                .map(|cfg| LayerFilter::from_config(cfg))
                .collect::<Result<Vec<_>, _>>()?;
            (GzipMode::from_config(&config.input)?, filters)
        }
        None => {
            let layer = args
                .value_of("layer")
                .ok_or("Either --layer or --config is required")?;
            let filter = args
                .value_of("filter")
                .map(|json| json.parse::<FilterExpression>())
                .transpose()?;
            let filters = vec![LayerFilter {
                layer: layer.to_string(),
                filter,
            }];
            (gzip_mode(args)?, filters)
        }
    };

    let data = load_tile(args, mode)?;
    let tile = Tile::decode(&data).map_err(|e| e.to_string())?;
    let all = FilterExpression::All(Vec::new());
    for layer_filter in &filters {
        match tile.layer(&layer_filter.layer) {
            Some(layer) => print_filtered(layer, layer_filter.filter.as_ref().unwrap_or(&all)),
            None => info!("Layer '{}' not found", layer_filter.layer),
        }
    }
    Ok(())
}

fn stats(args: &ArgMatches<'_>) -> Result<(), String> {
    let data = load_tile(args, gzip_mode(args)?)?;
    let tile = Tile::decode(&data).map_err(|e| e.to_string())?;
    let mut stats = Statistics::new();
    let all = |_: &dyn AttributeSource| true;
    for layer in selected_layers(&tile, None)? {
        let mut count = 0;
        for raw in layer.filter(&all) {
            count += 1;
            stats.add(&format!("{}.feature_size", layer.name), raw.bytes().len() as u64);
            match raw.decode() {
                Ok(feature) => stats.add(
                    &format!("{}.tags", layer.name),
                    feature.properties.len() as u64,
                ),
                Err(e) => warn!("Layer '{}': {}", layer.name, e),
            }
        }
        stats.add(&format!("{}.features", layer.name), count);
    }
    print!("{}", stats.as_csv());
    Ok(())
}

fn main() {
    dotenv().ok();
    // http://kbknapp.github.io/clap-rs/clap/
    let mut app = App::new("vtread")
        .version(crate_version!())
        .author("Pirmin Kalberer <pka@sourcepole.ch>")
        .about("Mapbox vector tile reader with lazy feature filtering")
        .subcommand(SubCommand::with_name("info")
                        .args_from_usage("<TILE> 'Vector tile file'
                                              --gzip=[auto|always|never] 'Gzip handling (Default: auto)'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("List tile layers"))
        .subcommand(SubCommand::with_name("dump")
                        .args_from_usage("<TILE> 'Vector tile file'
                                              --layer=[NAME] 'Dump only this layer'
                                              --gzip=[auto|always|never] 'Gzip handling (Default: auto)'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Print all features"))
        .subcommand(SubCommand::with_name("filter")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("<TILE> 'Vector tile file'
                                              -c, --config=[FILE] 'Load layer filters from config file'
                                              --layer=[NAME] 'Layer name'
                                              --filter=[JSON] 'Filter expression, e.g. [\"==\", \"class\", \"road\"]'
                                              --gzip=[auto|always|never] 'Gzip handling (Default: auto)'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Print features matching a filter"))
        .subcommand(SubCommand::with_name("stats")
                        .args_from_usage("<TILE> 'Vector tile file'
                                              --gzip=[auto|always|never] 'Gzip handling (Default: auto)'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Layer statistics"))
        .subcommand(SubCommand::with_name("genconfig")
                        .about("Generate configuration template"));

    match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        Result::Err(e) => {
            println!("{}", e);
        }
        Result::Ok(matches) => {
            let result = match matches.subcommand() {
                ("info", Some(sub_m)) => {
                    init_logger(sub_m);
                    info(sub_m)
                }
                ("dump", Some(sub_m)) => {
                    init_logger(sub_m);
                    dump(sub_m)
                }
                ("filter", Some(sub_m)) => {
                    init_logger(sub_m);
                    filter(sub_m)
                }
                ("stats", Some(sub_m)) => {
                    init_logger(sub_m);
                    stats(sub_m)
                }
                ("genconfig", Some(sub_m)) => {
                    init_logger(sub_m);
                    println!("{}", gen_config());
                    Ok(())
                }
                _ => {
                    let _ = app.print_help();
                    println!("");
                    Ok(())
                }
            };
            if let Err(e) = result {
                error!("{}", e);
                process::exit(1);
            }
        }
    }
}
