//! Colour of a mixture as the density x quantity weighted mean of its components.
use crate::Substances::chemicals::Portion;
use crate::Substances::color::Color;

/// Weighted per-channel average of the portions' colours.
///
/// - an empty tube is white
/// - a single portion keeps its colour unchanged
/// - when every weight is zero the result is white
pub fn blend(portions: &[Portion]) -> Color {
    match portions {
        [] => Color::WHITE,
        [single] => single.chemical.color,
        _ => {
            let mut sums = [0.0_f64; 3];
            let mut total_weight = 0.0;
            for portion in portions {
                let weight = portion.weight();
                total_weight += weight;
                for (sum, channel) in sums.iter_mut().zip(portion.chemical.color.channels()) {
                    *sum += channel as f64 * weight;
                }
            }
            if total_weight <= 0.0 || !total_weight.is_finite() {
                return Color::WHITE;
            }
            Color::from_channels(sums.map(|sum| sum / total_weight))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Substances::chemicals::{Chemical, PhysicalState};

    fn portion(id: &str, color: Color, density: f64, quantity: f64) -> Portion {
        Portion::new(
            Chemical::new(id, id, color, density, PhysicalState::Liquid),
            quantity,
        )
    }

    #[test]
    fn test_empty_is_white() {
        assert_eq!(blend(&[]), Color::WHITE);
    }

    #[test]
    fn test_single_keeps_color() {
        let color = Color::new(0x1E, 0x90, 0xFF);
        assert_eq!(blend(&[portion("cuso4", color, 3.6, 4.0)]), color);
    }

    #[test]
    fn test_equal_weights_give_mean() {
        let a = portion("a", Color::new(0, 100, 255), 2.0, 1.0);
        let b = portion("b", Color::new(255, 50, 0), 1.0, 2.0);
        // 127.5 rounds up
        assert_eq!(blend(&[a, b]), Color::new(128, 75, 128));
    }

    #[test]
    fn test_heavier_component_dominates() {
        let dense = portion("a", Color::new(0, 0, 0), 9.0, 1.0);
        let light = portion("b", Color::new(100, 100, 100), 1.0, 1.0);
        assert_eq!(blend(&[dense, light]), Color::new(10, 10, 10));
    }

    #[test]
    fn test_same_color_different_weights() {
        // each portion weighs with its own density even when colours coincide
        let a = portion("a", Color::new(200, 200, 200), 1.0, 1.0);
        let b = portion("b", Color::new(200, 200, 200), 5.0, 1.0);
        let c = portion("c", Color::new(0, 0, 0), 4.0, 1.0);
        assert_eq!(blend(&[a, b, c]), Color::new(120, 120, 120));
    }

    #[test]
    fn test_zero_weight_is_white() {
        let a = portion("a", Color::new(10, 20, 30), 0.0, 1.0);
        let b = portion("b", Color::new(40, 50, 60), 0.0, 3.0);
        assert_eq!(blend(&[a, b]), Color::WHITE);
    }
}
