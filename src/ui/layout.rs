use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: text + side panel, full keyboard
    Medium, // 60-99 cols: full-width text, keyboard
    Narrow, // <60 cols: text and header only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_keyboard(self, height: u16, enabled: bool) -> bool {
        enabled && height >= 22 && self != LayoutTier::Narrow
    }

    pub fn show_side_panel(self) -> bool {
        self == LayoutTier::Wide
    }
}

/// Header, body, optional side panel and footer for the typing screens.
pub struct ScreenLayout {
    pub header: Rect,
    pub main: Rect,
    pub side: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl ScreenLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        let (main, side) = if tier.show_side_panel() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
                .split(vertical[1]);
            (horizontal[0], Some(horizontal[1]))
        } else {
            (vertical[1], None)
        };

        Self {
            header: vertical[0],
            main,
            side,
            footer: vertical[2],
            tier,
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let target_w = (area.width.saturating_mul(percent_x.min(100)) / 100)
        .max(MIN_POPUP_WIDTH)
        .min(area.width);
    let target_h = (area.height.saturating_mul(percent_y.min(100)) / 100)
        .max(MIN_POPUP_HEIGHT)
        .min(area.height);

    Rect::new(
        area.x + (area.width - target_w) / 2,
        area.y + (area.height - target_h) / 2,
        target_w,
        target_h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_by_width() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 120, 40)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 80, 40)), LayoutTier::Medium);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 40, 40)), LayoutTier::Narrow);
    }

    #[test]
    fn test_centered_rect_fits_small_area() {
        let area = Rect::new(0, 0, 30, 10);
        assert_eq!(centered_rect(50, 50, area), area);

        let big = Rect::new(0, 0, 200, 60);
        let popup = centered_rect(50, 50, big);
        assert_eq!((popup.width, popup.height), (100, 30));
        assert_eq!((popup.x, popup.y), (50, 15));
    }

    #[test]
    fn test_side_panel_only_when_wide() {
        assert!(ScreenLayout::new(Rect::new(0, 0, 120, 30)).side.is_some());
        assert!(ScreenLayout::new(Rect::new(0, 0, 80, 30)).side.is_none());
    }
}
