// Size chart — Indian ring sizes with their inner diameter and circumference.
// The table is ordered by size and never changes at runtime.

use crate::types::{SizeChartEntry, SizeMetric};

const fn size(label: &'static str, circumference_mm: f64, diameter_mm: f64) -> SizeChartEntry {
    SizeChartEntry {
        label,
        circumference_mm,
        diameter_mm,
    }
}

pub const SIZE_CHART: [SizeChartEntry; 50] = [
    size("1", 41.01, 13.1),
    size("2", 42.7, 13.3),
    size("3", 42.9, 13.7),
    size("4", 43.6, 13.9),
    size("5", 44.8, 14.3),
    size("6", 46.1, 14.7),
    size("7", 47.4, 15.1),
    size("8", 48.0, 15.3),
    size("9", 48.7, 15.5),
    size("10", 50.0, 15.9),
    size("11", 51.2, 16.3),
    size("12", 51.9, 16.5),
    size("13", 53.1, 16.9),
    size("14", 54.4, 17.3),
    size("15", 55.1, 17.5),
    size("16", 56.3, 17.9),
    size("17", 57.0, 18.1),
    size("18", 58.3, 18.5),
    size("19", 58.9, 18.8),
    size("20", 60.2, 19.2),
    size("21", 60.8, 19.4),
    size("22", 62.1, 19.8),
    size("23", 62.7, 20.0),
    size("24", 64.0, 20.4),
    size("25", 64.6, 20.6),
    size("26", 65.9, 21.0),
    size("27", 67.2, 21.1),
    size("28", 67.8, 21.6),
    size("29", 69.1, 22.0),
    size("30", 71.0, 22.3),
    size("31", 72.5, 23.0),
    size("32", 74.0, 23.5),
    size("33", 75.5, 24.0),
    size("34", 77.0, 24.5),
    size("35", 78.5, 25.0),
    size("36", 80.0, 25.5),
    size("37", 81.5, 26.0),
    size("38", 83.0, 26.5),
    size("39", 84.5, 27.0),
    size("40", 86.0, 27.5),
    size("41", 87.5, 28.0),
    size("42", 89.0, 28.5),
    size("43", 90.5, 29.0),
    size("44", 92.0, 29.5),
    size("45", 93.5, 30.0),
    size("46", 95.0, 30.5),
    size("47", 96.5, 31.0),
    size("48", 98.0, 31.5),
    size("49", 99.5, 32.0),
    size("50", 101.0, 32.5),
];

/// Entry whose `metric` field is nearest to `value`.
///
/// Scans left to right with a strict `<`, so on a tie the earlier (smaller) size wins.
pub fn find_closest_size(value: f64, metric: SizeMetric) -> SizeChartEntry {
    let mut closest = SIZE_CHART[0];
    let mut min_diff = (closest.value(metric) - value).abs();

    for entry in &SIZE_CHART[1..] {
        let diff = (entry.value(metric) - value).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = *entry;
        }
    }

    closest
}

/// Look up a chart row by its size label.
pub fn entry(label: &str) -> Option<SizeChartEntry> {
    SIZE_CHART.iter().find(|e| e.label == label).copied()
}
