//! Layout helpers

use ratatui::prelude::*;

/// Create a fixed-size centered box
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Single centered row of `area`
pub fn middle_row(area: Rect) -> Rect {
    centered_rect_fixed(area.width, 1, area)
}
