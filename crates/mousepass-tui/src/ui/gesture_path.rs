//! Trail of the gesture being drawn

use mousepass_core::{GestureEvent, GestureKind};
use ratatui::prelude::*;

const MOVE_SYMBOL: &str = "•";
const CLICK_SYMBOL: &str = "●";

/// Draws captured samples at the terminal cells they were recorded at
pub struct GesturePath<'a> {
    points: &'a [GestureEvent],
    move_style: Style,
    click_style: Style,
}

impl<'a> GesturePath<'a> {
    pub fn new(points: &'a [GestureEvent]) -> Self {
        Self {
            points,
            move_style: Style::default(),
            click_style: Style::default(),
        }
    }

    pub fn move_style(mut self, style: Style) -> Self {
        self.move_style = style;
        self
    }

    pub fn click_style(mut self, style: Style) -> Self {
        self.click_style = style;
        self
    }
}

/// Terminal cell of a sample, if it falls inside `area`
fn cell_of(event: &GestureEvent, area: Rect) -> Option<(u16, u16)> {
    let (x, y) = (event.x.round(), event.y.round());
    if x < f64::from(area.left())
        || y < f64::from(area.top())
        || x >= f64::from(area.right())
        || y >= f64::from(area.bottom())
    {
        return None;
    }
    Some((x as u16, y as u16))
}

impl Widget for GesturePath<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clicks go last so they are never hidden by later motion
        let moves = self.points.iter().filter(|e| e.kind == GestureKind::Move);
        for event in moves {
            if let Some((x, y)) = cell_of(event, area) {
                buf.set_string(x, y, MOVE_SYMBOL, self.move_style);
            }
        }

        let clicks = self.points.iter().filter(|e| e.kind == GestureKind::Click);
        for event in clicks {
            if let Some((x, y)) = cell_of(event, area) {
                buf.set_string(x, y, CLICK_SYMBOL, self.click_style);
            }
        }
    }
}
