use chrono::NaiveDate;

/// Pixel geometry of the chart: date range, zoom, and row metrics.
///
/// All pixel-to-calendar translation in the engine goes through here, so
/// day snapping behaves the same for drags, previews, and placement.
#[derive(Debug, Clone)]
pub struct TimelineViewport {
    /// The leftmost visible date.
    pub start: NaiveDate,
    /// The rightmost visible date.
    pub end: NaiveDate,
    /// Pixels per day (controls zoom level).
    pub pixels_per_day: f32,
    /// Height of one task row band, excluding padding.
    pub row_height: f32,
    /// Gap between row bands.
    pub row_padding: f32,
    /// Height of the timeline header above row 0.
    pub header_height: f32,
}

impl TimelineViewport {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            pixels_per_day: 18.0,
            row_height: 28.0,
            row_padding: 4.0,
            header_height: 48.0,
        }
    }

    /// Convert a date to an x-pixel offset from the viewport start.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        let days = (date - self.start).num_days() as f32;
        days * self.pixels_per_day
    }

    /// Convert an x-pixel offset back to a date, snapped to the nearest
    /// whole-day boundary.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let days = (x / self.pixels_per_day).round() as i64;
        self.start + chrono::Duration::days(days)
    }

    /// Snap a pixel position to the nearest day boundary.
    pub fn snap_x(&self, x: f32) -> f32 {
        (x / self.pixels_per_day).round() * self.pixels_per_day
    }

    /// Whole-day delta for a horizontal pointer movement.
    pub fn days_from_delta(&self, delta_x: f32) -> i64 {
        (delta_x / self.pixels_per_day).round() as i64
    }

    /// Pixel width of a span of whole days.
    pub fn width_of_days(&self, days: i64) -> f32 {
        days as f32 * self.pixels_per_day
    }

    /// Top of the bar band for a row index.
    pub fn row_to_y(&self, row: usize) -> f32 {
        self.header_height + row as f32 * (self.row_height + self.row_padding) + self.row_padding
    }

    /// Total width in pixels for the visible range.
    pub fn total_width(&self) -> f32 {
        self.date_to_x(self.end)
    }

    /// Zoom in (increase pixels per day).
    pub fn zoom_in(&mut self) {
        self.pixels_per_day = (self.pixels_per_day * 1.2).min(80.0);
    }

    /// Zoom out (decrease pixels per day).
    pub fn zoom_out(&mut self) {
        self.pixels_per_day = (self.pixels_per_day / 1.2).max(2.0);
    }

    /// Scroll the viewport by a number of days.
    pub fn scroll_days(&mut self, days: i64) {
        self.start += chrono::Duration::days(days);
        self.end += chrono::Duration::days(days);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> TimelineViewport {
        TimelineViewport::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        )
    }

    #[test]
    fn x_to_date_rounds_to_nearest_day() {
        let vp = viewport();
        let jan3 = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        let x = vp.date_to_x(jan3);
        assert_eq!(vp.x_to_date(x + vp.pixels_per_day * 0.4), jan3);
        assert_eq!(
            vp.x_to_date(x + vp.pixels_per_day * 0.6),
            jan3 + chrono::Duration::days(1)
        );
    }

    #[test]
    fn snapping_is_stable_across_zoom_levels() {
        let mut vp = viewport();
        let jan10 = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        for _ in 0..6 {
            vp.zoom_in();
            assert_eq!(vp.x_to_date(vp.date_to_x(jan10)), jan10);
            assert_eq!(vp.snap_x(vp.date_to_x(jan10)), vp.date_to_x(jan10));
        }
        for _ in 0..12 {
            vp.zoom_out();
            assert_eq!(vp.x_to_date(vp.date_to_x(jan10)), jan10);
        }
    }
}
