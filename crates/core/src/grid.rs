//! Photo-grid layout engine.
//!
//! Computes how many photo cells of a fixed physical size fit on a sheet of
//! paper, trying both paper orientations and keeping the one that holds
//! more cells. Margins are distributed evenly between and around the cells.
//! The engine tracks which photo goes in which cell and, on finalize,
//! emits the full-resolution placement list; an external renderer turns
//! that list into the composite image. No pixel buffer is ever touched
//! here.
//!
//! Display-space cell rectangles (for the preview) are scaled by
//! `screen_dpi / paper_dpi`; the placement list uses native paper units.

use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::geometry::{Point, Rect};

/// Paper and cell dimensions, all in pixels at `dpi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub paper_width: u32,
    pub paper_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub dpi: u32,
}

impl Default for GridConfig {
    /// 10x15 cm paper with 3.5x4.5 cm cells at 300 dpi, a 4x2 layout.
    fn default() -> Self {
        Self {
            paper_width: 1800,
            paper_height: 1200,
            cell_width: 413,
            cell_height: 531,
            dpi: 300,
        }
    }
}

/// Row/column counts in the winning paper orientation.
///
/// `paper_width`/`paper_height` come back swapped when the rotated
/// orientation won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tiling {
    pub paper_width: u32,
    pub paper_height: u32,
    pub rows: u32,
    pub cols: u32,
}

impl Tiling {
    pub fn cell_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }
}

/// Finds the orientation that fits the most cells.
///
/// Orientation A keeps the paper as given, orientation B rotates it 90
/// degrees; the cell never rotates. Ties keep the paper as given. Fails
/// with [`AppError::NoValidTiling`] when the cell exceeds the paper both
/// ways.
pub fn compute_tiling(config: &GridConfig) -> Result<Tiling> {
    let rows_a = config.paper_height / config.cell_height;
    let cols_a = config.paper_width / config.cell_width;
    let rows_b = config.paper_width / config.cell_height;
    let cols_b = config.paper_height / config.cell_width;

    if rows_a * cols_a == 0 && rows_b * cols_b == 0 {
        return Err(AppError::NoValidTiling {
            paper_width: config.paper_width,
            paper_height: config.paper_height,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
        });
    }

    if rows_a * cols_a >= rows_b * cols_b {
        Ok(Tiling {
            paper_width: config.paper_width,
            paper_height: config.paper_height,
            rows: rows_a,
            cols: cols_a,
        })
    } else {
        Ok(Tiling {
            paper_width: config.paper_height,
            paper_height: config.paper_width,
            rows: rows_b,
            cols: cols_b,
        })
    }
}

/// One photo slot in the preview, in display-space pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// Row-major position, `0 <= index < rows * cols`.
    pub index: usize,
    pub rect: Rect,
}

/// Lays out the preview cells for a tiling, row-major.
///
/// Spacing per axis is `(paper - n * cell) / (n + 1)`, shared by the outer
/// borders and the gaps between cells. Cell rects are one pixel smaller
/// than the scaled cell, the inset reserved for the slot rule.
pub fn layout_cells(tiling: &Tiling, config: &GridConfig, display_scale: f64) -> Vec<GridCell> {
    let cols = tiling.cols as usize;
    let w = f64::from(config.cell_width) * display_scale;
    let h = f64::from(config.cell_height) * display_scale;
    let sx = spacing(tiling.paper_width, tiling.cols, config.cell_width) * display_scale;
    let sy = spacing(tiling.paper_height, tiling.rows, config.cell_height) * display_scale;

    (0..tiling.cell_count())
        .map(|i| {
            let row = (i / cols) as f64;
            let col = (i % cols) as f64;
            let x = sx + col * (sx + w);
            let y = sy + row * (sy + h);
            GridCell {
                index: i,
                rect: Rect::new(
                    x.round() as i32,
                    y.round() as i32,
                    w.round() as i32 - 1,
                    h.round() as i32 - 1,
                ),
            }
        })
        .collect()
}

fn spacing(paper: u32, n: u32, cell: u32) -> f64 {
    (f64::from(paper) - f64::from(n) * f64::from(cell)) / (f64::from(n) + 1.0)
}

/// One entry of the final composite: where a photo goes on the sheet, in
/// native paper units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement<P> {
    pub index: usize,
    pub rect: Rect,
    pub photo: P,
    pub draw_border: bool,
}

/// A configured photo grid: cell geometry plus the cell-to-photo mapping.
///
/// `P` is whatever the caller uses to identify a photo (a path, a handle,
/// an id); the engine only stores and returns it.
#[derive(Debug, Clone)]
pub struct GridLayout<P> {
    /// Paper stored in the winning orientation.
    config: GridConfig,
    rows: u32,
    cols: u32,
    display_scale: f64,
    cells: Vec<GridCell>,
    photos: BTreeMap<usize, P>,
    border: bool,
}

impl<P: Clone> GridLayout<P> {
    /// Builds the grid for `config`, previewed at
    /// `display_scale = screen_dpi / paper_dpi`.
    pub fn new(config: GridConfig, display_scale: f64) -> Result<Self> {
        let tiling = compute_tiling(&config)?;
        let cells = layout_cells(&tiling, &config, display_scale);
        Ok(Self {
            config: GridConfig {
                paper_width: tiling.paper_width,
                paper_height: tiling.paper_height,
                ..config
            },
            rows: tiling.rows,
            cols: tiling.cols,
            display_scale,
            cells,
            photos: BTreeMap::new(),
            border: false,
        })
    }

    /// Replaces the geometry with a new configuration.
    ///
    /// Atomic: a rejected tiling leaves the previous geometry and the
    /// photo mapping untouched. On success the mapping is cleared, since
    /// cell identities mean nothing once the geometry changed.
    pub fn reconfigure(&mut self, config: GridConfig) -> Result<()> {
        let tiling = compute_tiling(&config)?;
        let cells = layout_cells(&tiling, &config, self.display_scale);
        self.config = GridConfig {
            paper_width: tiling.paper_width,
            paper_height: tiling.paper_height,
            ..config
        };
        self.rows = tiling.rows;
        self.cols = tiling.cols;
        self.cells = cells;
        self.photos.clear();
        log::debug!(
            "grid reconfigured: {}x{} cells on {}x{} paper",
            self.cols,
            self.rows,
            self.config.paper_width,
            self.config.paper_height,
        );
        Ok(())
    }

    /// The stored configuration, paper in the winning orientation.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Preview cells in row-major index order.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Native-unit spacing per axis. Non-negative for any accepted tiling.
    pub fn spacing(&self) -> (f64, f64) {
        (
            spacing(self.config.paper_width, self.cols, self.config.cell_width),
            spacing(self.config.paper_height, self.rows, self.config.cell_height),
        )
    }

    /// Puts `photo` into the cell, replacing any previous occupant.
    pub fn assign_photo(&mut self, index: usize, photo: P) -> Result<()> {
        if index >= self.cells.len() {
            return Err(AppError::IndexOutOfRange {
                index,
                count: self.cells.len(),
            });
        }
        self.photos.insert(index, photo);
        Ok(())
    }

    pub fn photo_at(&self, index: usize) -> Option<&P> {
        self.photos.get(&index)
    }

    /// Number of cells with a photo assigned.
    pub fn assigned(&self) -> usize {
        self.photos.len()
    }

    /// The first cell containing the point, scanned in index order.
    pub fn hit_test_cell(&self, p: Point) -> Option<usize> {
        self.cells.iter().find(|c| c.rect.contains(p)).map(|c| c.index)
    }

    /// Toggles the per-cell rule on the final composite. Geometry and the
    /// photo mapping are unaffected.
    pub fn set_border(&mut self, enabled: bool) {
        self.border = enabled;
    }

    pub fn border_enabled(&self) -> bool {
        self.border
    }

    /// Placement list for the final composite, ascending by cell index,
    /// in native paper units (no display scaling).
    pub fn finalize_composite(&self) -> Vec<Placement<P>> {
        let w = f64::from(self.config.cell_width);
        let h = f64::from(self.config.cell_height);
        let sx = spacing(self.config.paper_width, self.cols, self.config.cell_width);
        let sy = spacing(self.config.paper_height, self.rows, self.config.cell_height);
        let cols = self.cols as usize;

        // BTreeMap iteration is ascending by key, which is exactly the
        // index order the placement list promises.
        self.photos
            .iter()
            .map(|(&index, photo)| {
                let row = (index / cols) as f64;
                let col = (index % cols) as f64;
                let x = (sx + col * (sx + w)).round() as i32;
                let y = (sy + row * (sy + h)).round() as i32;
                Placement {
                    index,
                    rect: Rect::new(x, y, self.config.cell_width as i32, self.config.cell_height as i32),
                    photo: photo.clone(),
                    draw_border: self.border,
                }
            })
            .collect()
    }
}
