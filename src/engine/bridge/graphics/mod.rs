//! Graphics abstraction for layout and painting.
//!
//! # Overview
//!
//! This module defines the interface between the layout engine / painter and
//! platform-specific text measurement and drawing implementations.
//!
//! # Responsibilities
//!
//! - Measure intrinsic text size (width, height, baseline)
//! - Accept absolute-coordinate draw calls (text, filled rects)
//!
//! # Non-Responsibilities
//!
//! - CSS resolution or inheritance
//! - Line breaking (done by the layout engine, run by run)
//!
//! # Data Flow
//!
//! ```text
//! CSS → Layout → Graphics::measure_text → TextMetrics
//! Layout → Renderer → Graphics::{fill_rect, draw_text}
//! ```

use std::fmt;

use crate::engine::css::values::Color;
use crate::engine::renderer::types::Rect;

/* ============================
 * Measure Request
 * ============================ */

#[derive(Debug, Clone, PartialEq)]
pub struct TextMeasureRequest<'a> {
    /// UTF-8 text content (already whitespace-processed)
    pub text: &'a str,

    /// Font file requested by the embedder, if any
    pub font_path: Option<&'a str>,

    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
}

/* ============================
 * Measure Result
 * ============================ */

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Logical width
    pub width: f32,

    /// Logical height
    pub height: f32,

    /// Baseline position from top
    pub baseline: f32,
}

/* ============================
 * Errors
 * ============================ */

#[derive(Debug, Clone, PartialEq)]
pub enum TextMeasureError {
    FontUnavailable,
    UnsupportedScript,
    Internal(String),
}

impl fmt::Display for TextMeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontUnavailable => write!(f, "Font unavailable"),
            Self::UnsupportedScript => write!(f, "Unsupported script"),
            Self::Internal(s) => write!(f, "Internal error: {s}"),
        }
    }
}

impl std::error::Error for TextMeasureError {}

/* ============================
 * Drawing
 * ============================ */

/// Resolved attributes for a `draw_text` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    SetViewport(Rect),
    FillRect {
        rect: Rect,
        color: Color,
    },
    DrawText {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
    },
    Present,
}

/* ============================
 * Trait
 * ============================ */

/// Collaborator consumed by layout (measurement) and painting (drawing).
///
/// Coordinates are top-left origin, y-down, in layout pixels.
pub trait Graphics {
    fn measure_text(&self, request: &TextMeasureRequest<'_>)
    -> Result<TextMetrics, TextMeasureError>;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn set_viewport(&mut self, rect: Rect);
    fn clear(&mut self, color: Color);
    fn present(&mut self);
}

/* ============================
 * Fallback
 * ============================ */

pub mod fallback;
pub use fallback::FallbackGraphics;
