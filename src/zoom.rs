use crate::{Result, ViewerConfig, ViewerError};
use std::fmt;

/// Size of a page in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Visible area of the page view in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// How the current zoom level was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Stepped with zoom in / zoom out.
    #[default]
    Normal,
    /// Page width matches the viewport width.
    Fill,
    /// Whole page visible inside the viewport.
    Fit,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisplayMode::Normal => "normal",
            DisplayMode::Fill => "fill",
            DisplayMode::Fit => "fit",
        })
    }
}

/// Zoom level and mode of the page view.
///
/// Stepped zooming is clamped to `[min_zoom, max_zoom]`; fill and fit are
/// computed from the page and viewport and are not clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    level: f64,
    mode: DisplayMode,
    step: f64,
    min: f64,
    max: f64,
}

impl ZoomState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            level: config.initial_zoom,
            mode: DisplayMode::Normal,
            step: config.zoom_step,
            min: config.min_zoom,
            max: config.max_zoom,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.mode = DisplayMode::Normal;
        self.level = (self.level + self.step).min(self.max);
        self.level
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.mode = DisplayMode::Normal;
        self.level = (self.level - self.step).max(self.min);
        self.level
    }

    /// Scale the page so its width fills the viewport.
    pub fn fill(&mut self, page: PageSize, viewport: Viewport) -> Result<f64> {
        check_positive("page width", page.width)?;
        check_positive("viewport width", viewport.width)?;

        self.level = viewport.width / page.width;
        self.mode = DisplayMode::Fill;
        Ok(self.level)
    }

    /// Scale the page so it fits the viewport in both directions.
    pub fn fit(&mut self, page: PageSize, viewport: Viewport) -> Result<f64> {
        check_positive("page width", page.width)?;
        check_positive("page height", page.height)?;
        check_positive("viewport width", viewport.width)?;
        check_positive("viewport height", viewport.height)?;

        let width_ratio = viewport.width / page.width;
        let height_ratio = viewport.height / page.height;
        self.level = width_ratio.min(height_ratio);
        self.mode = DisplayMode::Fit;
        Ok(self.level)
    }

    /// Pixel size of `page` rendered at the current level.
    pub fn scaled(&self, page: PageSize) -> (u32, u32) {
        (
            (page.width * self.level).round() as u32,
            (page.height * self.level).round() as u32,
        )
    }

    /// Status-bar text describing the current zoom.
    pub fn status_message(&self) -> String {
        match self.mode {
            DisplayMode::Normal => format!("Zoom: {:.1}x", self.level),
            DisplayMode::Fill => format!("Fill width (Zoom: {:.1}x)", self.level),
            DisplayMode::Fit => format!("Fit page (Zoom: {:.1}x)", self.level),
        }
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

fn check_positive(what: &str, value: f64) -> Result<()> {
    // also rejects NaN
    if value > 0.0 {
        Ok(())
    } else {
        Err(ViewerError::InvalidGeometry(format!("{what} must be positive, got {value}")))
    }
}
