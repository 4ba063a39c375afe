//! picview Core Library
//!
//! This library provides the geometry and state engines behind the picview
//! image viewer/editor: interactive crop-box manipulation and printable
//! photo-grid composition.
//!
//! # Overview
//!
//! Both engines are pure, synchronous state machines with no dependency on
//! any GUI toolkit. The surrounding application feeds them pointer events
//! and configuration and reads back plain rectangles and placement lists;
//! a thin adapter owned by the UI does the actual drawing, and an image
//! collaborator (see `picview-cli`) does the pixel work.
//!
//! - **Crop box**: drag a rectangle over the displayed image by its
//!   corners or body, optionally ratio-locked, then commit it back to
//!   original-image coordinates via the [`cropbox`] module.
//! - **Photo grid**: tile fixed-size photo cells onto a sheet of paper in
//!   the orientation that fits the most, assign photos to cells, and emit
//!   the full-resolution placement list via the [`grid`] module.
//!
//! # Quick Start
//!
//! ```
//! use picview_core::geometry::{Point, Size};
//! use picview_core::CropBox;
//!
//! // A 1000x700 preview of a 2000x1400 photo.
//! let mut crop = CropBox::new(Size::new(1000, 700), Size::new(2000, 1400));
//! crop.begin_drag(Point::new(990, 690));
//! crop.update_drag(Point::new(490, 340));
//! crop.end_drag();
//!
//! // The region to cut from the full-resolution image.
//! let region = crop.commit().unwrap();
//! assert_eq!((region.x, region.y), (0, 0));
//! ```
//!
//! # Module Structure
//!
//! - [`browse`]: sibling-image navigation for previous/next
//! - [`config`]: persisted grid defaults
//! - [`cropbox`]: crop-box interaction engine
//! - [`error`]: error types and result aliases
//! - [`geometry`]: points, rectangles, display/original mapping, zoom
//! - [`grid`]: photo-grid layout engine

pub mod browse;
pub mod config;
pub mod cropbox;
pub mod error;
pub mod geometry;
pub mod grid;

// Re-export primary types for convenience
pub use config::GridDefaults;
pub use cropbox::{CropBox, CropRegion, DragMode};
pub use error::{AppError, Result};
pub use geometry::{DisplayMapping, Point, Rect, Size};
pub use grid::{GridConfig, GridLayout, Placement, Tiling};
