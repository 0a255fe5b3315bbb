//! Color theme constants for the packet viewer
//!
//! Defines the minimal dark color palette used throughout the UI.

use ratatui::style::Color;

/// Primary border color - dark gray for minimal aesthetic
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Border of the focused widget
pub const COLOR_FOCUS: Color = Color::White;

/// Accent color - white for highlights and important elements
pub const COLOR_ACCENT: Color = Color::White;

/// Column headers and header summaries in the detail pane
pub const COLOR_HEADER: Color = Color::Cyan;

/// Connected / filter applied
pub const COLOR_ACTIVE: Color = Color::LightGreen;

/// Pending work (connecting, evaluation in flight)
pub const COLOR_PENDING: Color = Color::Yellow;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Errors and refused filters
pub const COLOR_ERROR: Color = Color::Red;

/// Background of the highlighted table row
pub const COLOR_HIGHLIGHT_BG: Color = Color::Rgb(40, 44, 60);

/// Marker color for the selected (expanded) record
pub const COLOR_SELECTED: Color = Color::Rgb(0, 122, 204);
