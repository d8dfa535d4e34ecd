/// Page size in viewport units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
}

/// Width over height, `None` for empty or degenerate images
pub fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(width as f32 / height as f32)
}

/// Fit a single page of the given aspect ratio into the viewport.
///
/// The page takes the full viewport width unless that would make it taller
/// than the viewport, in which case it takes the full height instead.
pub fn fit_page(aspect_ratio: f32, viewport_width: f32, viewport_height: f32) -> Option<PageDimensions> {
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return None;
    }

    let mut width = viewport_width.max(0.0);
    let mut height = width / aspect_ratio;

    if height > viewport_height {
        height = viewport_height.max(0.0);
        width = height * aspect_ratio;
    }

    Some(PageDimensions { width, height })
}

/// Fit a two-page spread: each page gets half of the viewport width
pub fn fit_spread(aspect_ratio: f32, viewport_width: f32, viewport_height: f32) -> Option<PageDimensions> {
    fit_page(aspect_ratio, viewport_width / 2.0, viewport_height)
}
