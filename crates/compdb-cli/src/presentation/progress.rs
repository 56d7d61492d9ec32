const BAR_WIDTH: usize = 50;

/// `[||||-----] 42.0%`, fixed width, clamped to 0..=1
pub fn format_bar(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = ((BAR_WIDTH as f64) * fraction) as usize;
    format!(
        "[{}{}] {:.1}%",
        "|".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        fraction * 100.0
    )
}

/// Redraw throttle: only repaint when the per-mille value moves
#[derive(Debug, Default)]
pub struct Throttle {
    last: Option<u32>,
}

impl Throttle {
    pub fn should_draw(&mut self, fraction: f64) -> bool {
        let permille = (fraction.clamp(0.0, 1.0) * 1000.0) as u32;
        if self.last == Some(permille) {
            return false;
        }
        self.last = Some(permille);
        true
    }
}
