//! Bootstrap seed dataset
//!
//! Normal river readings used to fit a first model when no artifact exists.

use crate::logic::features::Reading;

/// Times each base reading is repeated
pub const SEED_REPEAT: usize = 20;

/// (ph, dissolved_oxygen, temperature, turbidity, conductivity)
const SEED_BASE: [[f64; 5]; 3] = [
    [7.2, 8.5, 22.0, 2.1, 450.0],
    [7.1, 8.4, 22.1, 2.2, 455.0],
    [7.3, 8.6, 21.9, 2.0, 445.0],
];

pub fn seed_readings() -> Vec<Reading> {
    let base: Vec<Reading> = SEED_BASE
        .iter()
        .map(|[ph, dissolved_oxygen, temperature, turbidity, conductivity]| {
            Reading::new()
                .with("ph", *ph)
                .with("dissolved_oxygen", *dissolved_oxygen)
                .with("temperature", *temperature)
                .with("turbidity", *turbidity)
                .with("conductivity", *conductivity)
        })
        .collect();

    (0..SEED_REPEAT).flat_map(|_| base.iter().cloned()).collect()
}
