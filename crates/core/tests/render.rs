use fansim_core::{
    gauge::color_for, Color, Frame, Gauge, Phase, COLS, FAN_PHASE_A, GAUGE_TEMPLATE, ROWS,
    THERMOMETER_PATH,
};

#[test]
fn test_gauge_lights_path_prefix() {
    for temperature in 1..=15 {
        let colors: Vec<_> = Gauge::new(temperature).colors().collect();
        let lit = colors
            .iter()
            .take_while(|&&color| color != Color::BLACK)
            .count();
        assert_eq!(lit, temperature as usize);
        assert!(colors[lit..].iter().all(|&color| color == Color::BLACK));
    }
}

#[test]
fn test_gauge_bands_when_lit() {
    assert_eq!(color_for(4, 5), Color::YELLOW);
    assert_eq!(color_for(5, 6), Color::ORANGE);
    assert_eq!(color_for(9, 10), Color::ORANGE);
    assert_eq!(color_for(10, 11), Color::RED);
    assert_eq!(color_for(14, 15), Color::RED);
    // Not lit yet.
    assert_eq!(color_for(10, 10), Color::BLACK);
}

#[test]
fn test_fan_layer_overrides_frame() {
    for phase in [Phase::A, Phase::B] {
        let fan = phase.bitmap();
        let frame = Frame::compose(&Gauge::new(15), Some(fan));
        for (row, col, cell) in fan.cells() {
            if let Some(rgb) = cell.rgb() {
                assert_eq!(frame.get(row, col), rgb);
            }
        }
    }
}

#[test]
fn test_fan_layer_is_painted_after_gauge() {
    // A bitmap that overlaps the thermometer path.
    let mut cells = [Color::Transparent; 64];
    cells[7 * COLS] = Color::Rgb(Color::RED);
    let overlay = fansim_core::Bitmap::new(cells);

    let frame = Frame::compose(&Gauge::new(1), Some(&overlay));
    assert_eq!(frame.get(7, 0), Color::RED);
    assert_eq!(Frame::compose(&Gauge::new(1), None).get(7, 0), Color::YELLOW);
}

#[test]
fn test_compose_temperature_without_fan() {
    let frame = Frame::compose(&Gauge::new(8), None);

    for (index, &(row, col)) in THERMOMETER_PATH.iter().enumerate() {
        let expected = match index {
            0..=4 => Color::YELLOW,
            5..=7 => Color::ORANGE,
            _ => Color::BLACK,
        };
        assert_eq!(frame.get(row, col), expected, "path index {index}");
    }

    for row in 0..ROWS {
        for col in 0..COLS {
            if !GAUGE_TEMPLATE.get(row, col).is_opaque() {
                assert_eq!(frame.get(row, col), Color::BLACK);
            }
        }
    }
}

#[test]
fn test_compose_is_complete() {
    let frame = Frame::compose(&Gauge::new(3), Some(&FAN_PHASE_A));
    assert_eq!(frame.pixels().count(), ROWS * COLS);
    assert!(!frame.is_clear());
    assert!(Frame::compose(&Gauge::new(0), None).is_clear());
    assert_eq!(
        format!("{frame:?}").lines().nth(3),
        Some("RRRRRRR."),
    );
}
