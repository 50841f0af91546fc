//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Statistics collector

use stats::{MinMax, OnlineStats};
use std::collections::BTreeMap;
use std::fmt;

type MeasurementType = u64;

struct StatCollector {
    online: OnlineStats,
    minmax: MinMax<MeasurementType>,
}

#[derive(Debug, PartialEq)]
pub struct StatResults {
    pub len: usize,
    pub min: MeasurementType,
    pub max: MeasurementType,
    pub mean: f64,
    pub stddev: f64,
}

/// Measurements grouped by key, e.g. `roads.feature_size`
#[derive(Default)]
pub struct Statistics(BTreeMap<String, StatCollector>);

impl Statistics {
    pub fn new() -> Statistics {
        Statistics(BTreeMap::new())
    }

    pub fn add(&mut self, key: &str, value: MeasurementType) {
        let collector = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| StatCollector {
                online: OnlineStats::new(),
                minmax: MinMax::new(),
            });
        collector.online.add(value);
        collector.minmax.add(value);
    }

    pub fn results(&self, key: &str) -> Option<StatResults> {
        self.0.get(key).map(|collector| StatResults {
            len: collector.minmax.len(),
            min: *collector.minmax.min().unwrap_or(&0),
            max: *collector.minmax.max().unwrap_or(&0),
            mean: collector.online.mean(),
            stddev: collector.online.stddev(),
        })
    }

    pub fn as_csv(&self) -> String {
        let mut csv = String::from("key,count,min,max,mean,stddev\n");
        for key in self.0.keys() {
            if let Some(res) = self.results(key) {
                csv.push_str(&format!(
                    "{},{},{},{},{:.2},{:.2}\n",
                    key, res.len, res.min, res.max, res.mean, res.stddev
                ));
            }
        }
        csv
    }
}

impl fmt::Display for StatResults {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#measurements: {}, min: {}, max: {}, mean: {:.2} +/- {:.2}",
            self.len, self.min, self.max, self.mean, self.stddev
        )
    }
}

#[test]
fn usage() {
    let mut stats = Statistics::new();
    stats.add("roads.tags", 1);
    stats.add("roads.tags", 2);
    stats.add("water.tags", 2);
    stats.add("roads.tags", 3);
    let roads = stats.results("roads.tags").unwrap();
    assert_eq!(roads.len, 3);
    assert_eq!(roads.min, 1);
    assert_eq!(roads.max, 3);
    assert_eq!(roads.mean, 2.0);
    assert_eq!(roads.stddev, 0.816496580927726);
    assert_eq!(stats.results("water.tags").unwrap().mean, 2.0);
    assert!(stats.results("buildings.tags").is_none());
    assert_eq!(
        stats.as_csv(),
        "key,count,min,max,mean,stddev\nroads.tags,3,1,3,2.00,0.82\nwater.tags,1,2,2,2.00,0.00\n"
    );
}
