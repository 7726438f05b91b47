use irmapper_api::config::ColorEntry;
use irmapper_api::light::Rgb;

/// Closest configured color by squared euclidean distance.
///
/// Ties resolve to the entry listed first.
#[must_use]
pub fn nearest_color(colors: &[ColorEntry], rgb: Rgb) -> Option<&ColorEntry> {
    colors.iter().min_by_key(|c| rgb.distance_sq(c.rgb))
}

#[cfg(test)]
mod tests {
    use irmapper_api::config::ColorEntry;
    use irmapper_api::light::Rgb;

    use crate::light::nearest_color;

    fn entry(name: &str, rgb: [u8; 3]) -> ColorEntry {
        ColorEntry {
            name: name.to_string(),
            rgb: Rgb(rgb),
            ir_code: format!("{name}_code"),
        }
    }

    #[test]
    fn empty_list_has_no_match() {
        assert!(nearest_color(&[], Rgb::WHITE).is_none());
    }

    #[test]
    fn picks_closest() {
        let colors = [entry("white", [255, 255, 255]), entry("red", [255, 0, 0])];
        let hit = nearest_color(&colors, Rgb::new(200, 10, 10)).unwrap();
        assert_eq!(hit.name, "red");
    }

    #[test]
    fn exact_match_wins() {
        let colors = [
            entry("red", [255, 0, 0]),
            entry("green", [0, 255, 0]),
            entry("blue", [0, 0, 255]),
        ];
        let hit = nearest_color(&colors, Rgb::new(0, 255, 0)).unwrap();
        assert_eq!(hit.name, "green");
    }

    #[test]
    fn ties_go_to_first_listed() {
        let colors = [
            entry("dark", [0, 0, 0]),
            entry("bright", [255, 0, 0]),
            entry("dark_again", [0, 0, 0]),
        ];
        let hit = nearest_color(&colors, Rgb::new(0, 0, 0)).unwrap();
        assert_eq!(hit.name, "dark");

        let colors = [entry("a", [0, 0, 10]), entry("b", [0, 0, 30])];
        let hit = nearest_color(&colors, Rgb::new(0, 0, 20)).unwrap();
        assert_eq!(hit.name, "a");

        let colors = [entry("b", [0, 0, 30]), entry("a", [0, 0, 10])];
        let hit = nearest_color(&colors, Rgb::new(0, 0, 20)).unwrap();
        assert_eq!(hit.name, "b");
    }

    #[test]
    fn minimizes_distance_over_every_entry() {
        let colors: Vec<ColorEntry> = (0..=255u8)
            .step_by(17)
            .map(|v| entry(&format!("c{v}"), [v, 255 - v, v / 2]))
            .collect();

        for sample in [[0, 0, 0], [90, 200, 30], [255, 255, 255], [17, 17, 17]] {
            let rgb = Rgb(sample);
            let hit = nearest_color(&colors, rgb).unwrap();
            let best = colors.iter().map(|c| rgb.distance_sq(c.rgb)).min().unwrap();
            assert_eq!(rgb.distance_sq(hit.rgb), best);
        }
    }
}
