//! Pin rack layout.

use bevy::prelude::*;

use crate::resources::BowlingConfig;

/// Generate the triangular rack, head pin first.
///
/// Row `r` holds `r + 1` slots centred on `x = 0`, `spacing` apart, and sits
/// `r * spacing` further away (more negative Z) than the head pin.
///
/// # Arguments
/// * `rows` - Number of rows in the rack
/// * `spacing` - Distance between neighbouring slots and between rows
/// * `front_z` - Z of the head pin
///
/// # Returns
/// Slot positions on the ground plane, `x` in `.x` and `z` in `.y`
///
/// # Example
/// ```
/// use bevy_bowling::systems::layout::rack_layout;
///
/// let slots = rack_layout(4, 0.5, -5.0);
/// assert_eq!(slots.len(), 10);
/// assert_eq!(slots[0].x, 0.0);
/// assert_eq!(slots[0].y, -5.0);
/// ```
pub fn rack_layout(rows: usize, spacing: f32, front_z: f32) -> Vec<Vec2> {
    let mut slots = Vec::with_capacity(rows * (rows + 1) / 2);
    for row in 0..rows {
        let count = row + 1;
        let offset_x = -((count - 1) as f32) * spacing / 2.0;
        let z = front_z - row as f32 * spacing;
        for i in 0..count {
            slots.push(Vec2::new(offset_x + i as f32 * spacing, z));
        }
    }
    slots
}

/// Rack for the configured input scheme.
pub fn configured_rack(config: &BowlingConfig) -> Vec<Vec2> {
    rack_layout(config.rack_rows, config.rack_spacing, config.rack_front())
}

/// Upright pose of a pin standing on `slot`.
pub fn pin_home(config: &BowlingConfig, slot: Vec2) -> Transform {
    Transform::from_xyz(slot.x, config.pin_height / 2.0, slot.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn rows_of(slots: &[Vec2], rows: usize) -> Vec<&[Vec2]> {
        let mut out = Vec::new();
        let mut start = 0;
        for row in 0..rows {
            out.push(&slots[start..start + row + 1]);
            start += row + 1;
        }
        out
    }

    #[test]
    fn test_rack_has_triangular_rows() {
        let slots = rack_layout(4, 0.5, -5.0);
        assert_eq!(slots.len(), 10);

        for (r, row) in rows_of(&slots, 4).into_iter().enumerate() {
            assert_eq!(row.len(), r + 1);
            // Same depth within a row
            assert!(row.iter().all(|s| (s.y - row[0].y).abs() < EPS));
        }
    }

    #[test]
    fn test_rows_are_symmetric_about_centre() {
        let slots = rack_layout(4, 0.5, -5.0);
        for row in rows_of(&slots, 4) {
            let sum: f32 = row.iter().map(|s| s.x).sum();
            assert!(sum.abs() < EPS);
            for (a, b) in row.iter().zip(row.iter().rev()) {
                assert!((a.x + b.x).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_spacing_between_pins_and_rows() {
        let slots = rack_layout(4, 0.5, -5.0);
        let rows = rows_of(&slots, 4);

        for pair in rows.windows(2) {
            assert!((pair[0][0].y - pair[1][0].y - 0.5).abs() < EPS);
        }
        for row in &rows {
            for pair in row.windows(2) {
                assert!((pair[1].x - pair[0].x - 0.5).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        assert_eq!(rack_layout(4, 0.5, -5.0), rack_layout(4, 0.5, -5.0));
    }

    #[test]
    fn test_vr_rack_is_closer() {
        let desktop = configured_rack(&BowlingConfig::default());
        let vr = configured_rack(&BowlingConfig::vr());
        assert_eq!(desktop.len(), vr.len());
        assert!(vr[0].y > desktop[0].y);
    }

    #[test]
    fn test_pin_home_stands_on_ground() {
        let config = BowlingConfig::default();
        let home = pin_home(&config, Vec2::new(0.25, -5.5));
        assert_eq!(home.translation, Vec3::new(0.25, 0.2, -5.5));
        assert_eq!(home.rotation, Quat::IDENTITY);
    }
}
