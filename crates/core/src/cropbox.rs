//! Interactive crop-box engine.
//!
//! This module contains the logic for manipulating a crop rectangle over
//! the displayed image and mapping the result back to original-image
//! coordinates. It owns no drawing surface: the surrounding application
//! feeds it pointer positions and reads back plain rectangles
//! ([`CropBox::rect`], [`CropBox::shade_regions`],
//! [`CropBox::corner_handles`]) for the preview overlay.
//!
//! A drag session is three calls: [`CropBox::begin_drag`] classifies the
//! press into a corner resize, a whole-box move, or nothing;
//! [`CropBox::update_drag`] applies the pointer delta with clamping and
//! optional aspect-ratio locking; [`CropBox::end_drag`] commits the
//! in-progress corners. Cancelling a crop is simply dropping the box
//! without calling [`CropBox::commit`].

use crate::error::{AppError, Result};
use crate::geometry::{DisplayMapping, Point, Rect, Size};

/// Side length of the square hit zone around each draggable corner.
pub const CORNER_GRAB: i32 = 60;

/// Drawn corner box, one pixel short of the hit zone.
const HANDLE_BOX: i32 = CORNER_GRAB - 1;

/// White rule inset one pixel inside the corner box.
const HANDLE_RULE: i32 = HANDLE_BOX - 2;

/// Default aspect-lock ratio units (photo print 3.5:4.5).
const DEFAULT_TARGET_W: f64 = 3.5;
const DEFAULT_TARGET_H: f64 = 4.5;

/// Minimum accepted ratio unit, matching the configuration dialog's range.
const MIN_TARGET: f64 = 0.1;

/// Which part of the crop box a drag is acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    /// No drag in progress; presses outside the box resolve to this.
    #[default]
    None,
    /// Resizing by the top-left corner; bottom-right stays fixed.
    TopLeftCorner,
    /// Resizing by the bottom-right corner; top-left stays fixed.
    BottomRightCorner,
    /// Moving the whole box.
    Body,
}

/// Committed crop region in original-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Drawing data for one corner grab zone: the 59x59 outer box and the
/// 57x57 white rule inset one pixel inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerHandle {
    pub outer: Rect,
    pub inner: Rect,
}

/// Crop rectangle over a displayed image.
///
/// Corners live in display space and always satisfy
/// `0 <= top_left < bottom_right <= display bounds` after every mutation.
/// Created when crop mode is entered (covering the full displayed image)
/// and consumed by [`CropBox::commit`] or discarded on cancel.
#[derive(Debug, Clone)]
pub struct CropBox {
    /// Corners as of the last completed drag.
    top_left: Point,
    bottom_right: Point,
    /// In-progress corners, live during a drag.
    pending_tl: Point,
    pending_br: Point,
    /// Far corner of the displayed image, the immovable limit.
    bounds_br: Point,
    press: Point,
    drag: DragMode,
    locked: bool,
    target_w: f64,
    target_h: f64,
    image_aspect: f64,
    mapping: DisplayMapping,
}

impl CropBox {
    /// Creates a crop box covering the full displayed image.
    ///
    /// `displayed` is the on-screen size, `original` the source image's
    /// native size; the pair fixes the commit-time coordinate mapping.
    pub fn new(displayed: Size, original: Size) -> Self {
        let bounds_br = Point::new(displayed.width - 1, displayed.height - 1);
        Self {
            top_left: Point::new(0, 0),
            bottom_right: bounds_br,
            pending_tl: Point::new(0, 0),
            pending_br: bounds_br,
            bounds_br,
            press: Point::default(),
            drag: DragMode::None,
            locked: false,
            target_w: DEFAULT_TARGET_W,
            target_h: DEFAULT_TARGET_H,
            image_aspect: original.aspect(),
            mapping: DisplayMapping::new(displayed, original),
        }
    }

    /// Classifies a press and starts the matching drag.
    ///
    /// Checked in precedence order: top-left grab zone (growing
    /// right/down), bottom-right grab zone (growing left/up), box body,
    /// otherwise no drag. Snapshots the committed corners as the drag's
    /// reference positions.
    pub fn begin_drag(&mut self, p: Point) -> DragMode {
        self.press = p;
        self.pending_tl = self.top_left;
        self.pending_br = self.bottom_right;

        let tl_zone = Rect::new(self.top_left.x, self.top_left.y, CORNER_GRAB, CORNER_GRAB);
        let br_zone = Rect::new(
            self.bottom_right.x - CORNER_GRAB + 1,
            self.bottom_right.y - CORNER_GRAB + 1,
            CORNER_GRAB,
            CORNER_GRAB,
        );

        self.drag = if tl_zone.contains(p) {
            DragMode::TopLeftCorner
        } else if br_zone.contains(p) {
            DragMode::BottomRightCorner
        } else if Rect::from_corners(self.top_left, self.bottom_right).contains(p) {
            DragMode::Body
        } else {
            DragMode::None
        };
        self.drag
    }

    /// Applies the pointer position to the active drag and returns the
    /// updated rectangle for preview drawing. No-op without an active
    /// drag.
    pub fn update_drag(&mut self, p: Point) -> Rect {
        let dx = p.x - self.press.x;
        let dy = p.y - self.press.y;

        match self.drag {
            DragMode::None => {}
            DragMode::TopLeftCorner => {
                let mut tl = Point::new(
                    (self.top_left.x + dx).max(0),
                    (self.top_left.y + dy).max(0),
                );
                if self.locked {
                    tl = self.ratio_correct(self.pending_br, tl, -1);
                }
                // Containment wins over exact ratio at the image boundary.
                self.pending_tl = Point::new(
                    tl.x.clamp(0, self.pending_br.x - 1),
                    tl.y.clamp(0, self.pending_br.y - 1),
                );
            }
            DragMode::BottomRightCorner => {
                let mut br = Point::new(
                    (self.bottom_right.x + dx).min(self.bounds_br.x),
                    (self.bottom_right.y + dy).min(self.bounds_br.y),
                );
                if self.locked {
                    br = self.ratio_correct(self.pending_tl, br, 1);
                }
                self.pending_br = Point::new(
                    br.x.clamp(self.pending_tl.x + 1, self.bounds_br.x),
                    br.y.clamp(self.pending_tl.y + 1, self.bounds_br.y),
                );
            }
            DragMode::Body => {
                let dx = dx.clamp(-self.top_left.x, self.bounds_br.x - self.bottom_right.x);
                let dy = dy.clamp(-self.top_left.y, self.bounds_br.y - self.bottom_right.y);
                self.pending_tl = self.top_left.offset(dx, dy);
                self.pending_br = self.bottom_right.offset(dx, dy);
            }
        }
        self.rect()
    }

    /// Commits the in-progress corners and ends the drag.
    pub fn end_drag(&mut self) {
        self.top_left = self.pending_tl;
        self.bottom_right = self.pending_br;
        self.drag = DragMode::None;
    }

    /// Recomputes one axis of the moving corner so the box keeps the
    /// target ratio against the fixed corner. `dir` is +1 when the moving
    /// corner sits right/below the fixed one, -1 when left/above; both
    /// corner modes go through here so they stay symmetric.
    ///
    /// The axis that would make the box too wide relative to the target
    /// ratio is the one corrected: a wider-than-target image corrects x
    /// from the y span, a taller one corrects y from the x span, and an
    /// exact match leaves the proposal untouched.
    fn ratio_correct(&self, fixed: Point, moving: Point, dir: i32) -> Point {
        let box_aspect = self.target_w / self.target_h;
        let d = f64::from(dir);
        if self.image_aspect > box_aspect {
            let span_y = d * f64::from(moving.y - fixed.y) + 1.0;
            let x = f64::from(fixed.x) + d * span_y * box_aspect - 1.0;
            Point::new(x.round() as i32, moving.y)
        } else if self.image_aspect < box_aspect {
            let span_x = d * f64::from(moving.x - fixed.x) + 1.0;
            let y = f64::from(fixed.y) + d * span_x / box_aspect - 1.0;
            Point::new(moving.x, y.round() as i32)
        } else {
            moving
        }
    }

    /// Enables or disables the aspect lock and sets the target ratio.
    /// Takes effect on the next drag motion.
    pub fn set_aspect_lock(&mut self, locked: bool, width: f64, height: f64) {
        self.locked = locked;
        self.target_w = width.max(MIN_TARGET);
        self.target_h = height.max(MIN_TARGET);
    }

    /// Toggles the lock without touching the target ratio.
    pub fn set_lock_enabled(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn set_target_width(&mut self, width: f64) {
        self.target_w = width.max(MIN_TARGET);
    }

    pub fn set_target_height(&mut self, height: f64) {
        self.target_h = height.max(MIN_TARGET);
    }

    /// The current rectangle: in-progress corners during a drag, committed
    /// corners otherwise.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.pending_tl, self.pending_br)
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag
    }

    /// The four display-bounds rectangles outside the box, for the
    /// darken-outside overlay. Rects collapse to empty where the box
    /// touches an edge; the adapter skips those.
    pub fn shade_regions(&self) -> [Rect; 4] {
        let r = self.rect();
        let full_w = self.bounds_br.x + 1;
        let full_h = self.bounds_br.y + 1;
        [
            Rect::new(0, 0, full_w, r.y),
            Rect::new(0, r.bottom() + 1, full_w, full_h - r.bottom() - 1),
            Rect::new(0, r.y, r.x, r.height),
            Rect::new(r.right() + 1, r.y, full_w - r.right() - 1, r.height),
        ]
    }

    /// Corner grab-zone drawing data: 59x59 boxes growing right/down from
    /// the top-left corner and left/up from the bottom-right corner, each
    /// with a 57x57 white rule inset by one pixel.
    pub fn corner_handles(&self) -> [CornerHandle; 2] {
        let tl = self.pending_tl;
        let br = self.pending_br;
        [
            CornerHandle {
                outer: Rect::new(tl.x, tl.y, HANDLE_BOX, HANDLE_BOX),
                inner: Rect::new(tl.x + 1, tl.y + 1, HANDLE_RULE, HANDLE_RULE),
            },
            CornerHandle {
                outer: Rect::new(
                    br.x - HANDLE_BOX + 1,
                    br.y - HANDLE_BOX + 1,
                    HANDLE_BOX,
                    HANDLE_BOX,
                ),
                inner: Rect::new(br.x - HANDLE_RULE, br.y - HANDLE_RULE, HANDLE_RULE, HANDLE_RULE),
            },
        ]
    }

    /// Maps the committed corners to original-image coordinates.
    ///
    /// The invariants make a degenerate result unreachable; the check is
    /// kept so a violation surfaces as an error instead of a bad crop.
    pub fn commit(&self) -> Result<CropRegion> {
        let (x, y, w, h) = self.mapping.to_original(self.top_left, self.bottom_right);
        if w <= 0 || h <= 0 {
            return Err(AppError::InvalidCropRegion {
                width: w,
                height: h,
            });
        }
        Ok(CropRegion {
            x: x as u32,
            y: y as u32,
            width: w as u32,
            height: h as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contained(b: &CropBox) {
        let r = b.rect();
        assert!(r.x >= 0 && r.y >= 0, "corner left the image: {r:?}");
        assert!(r.width >= 1 && r.height >= 1, "box inverted: {r:?}");
        assert!(
            r.right() <= b.bounds_br.x && r.bottom() <= b.bounds_br.y,
            "corner left the image: {r:?}"
        );
    }

    #[test]
    fn starts_covering_the_displayed_image() {
        let b = CropBox::new(Size::new(1000, 700), Size::new(2000, 1400));
        assert_eq!(b.rect(), Rect::new(0, 0, 1000, 700));
        assert_eq!(b.drag_mode(), DragMode::None);
    }

    #[test]
    fn press_classification_precedence() {
        let mut b = CropBox::new(Size::new(1000, 700), Size::new(1000, 700));
        assert_eq!(b.begin_drag(Point::new(30, 30)), DragMode::TopLeftCorner);
        assert_eq!(b.begin_drag(Point::new(59, 59)), DragMode::TopLeftCorner);
        assert_eq!(
            b.begin_drag(Point::new(970, 670)),
            DragMode::BottomRightCorner
        );
        assert_eq!(
            b.begin_drag(Point::new(940, 640)),
            DragMode::BottomRightCorner
        );
        assert_eq!(b.begin_drag(Point::new(500, 350)), DragMode::Body);
        assert_eq!(b.begin_drag(Point::new(1000, 350)), DragMode::None);
    }

    #[test]
    fn corner_drag_moves_and_clamps() {
        let mut b = CropBox::new(Size::new(1000, 700), Size::new(1000, 700));
        b.begin_drag(Point::new(10, 10));
        let r = b.update_drag(Point::new(110, 60));
        assert_eq!(r.top_left(), Point::new(100, 50));
        // Dragging far past the top-left limit pins the corner at origin.
        b.update_drag(Point::new(-500, -500));
        assert_eq!(b.rect().top_left(), Point::new(0, 0));
        b.end_drag();
        assert_eq!(b.drag_mode(), DragMode::None);
    }

    #[test]
    fn corners_never_cross_or_escape() {
        let mut b = CropBox::new(Size::new(1000, 700), Size::new(1000, 700));
        // A hostile drag sequence: corners pushed across each other and far
        // outside the image, body shoved past every edge.
        b.begin_drag(Point::new(5, 5));
        for p in [
            Point::new(2000, 1500),
            Point::new(-300, 900),
            Point::new(999, -50),
        ] {
            b.update_drag(p);
            assert_contained(&b);
        }
        b.end_drag();
        b.begin_drag(Point::new(990, 690));
        for p in [
            Point::new(-100, -100),
            Point::new(1500, 20),
            Point::new(0, 1200),
        ] {
            b.update_drag(p);
            assert_contained(&b);
        }
        b.end_drag();
        b.begin_drag(Point::new(500, 350));
        for p in [Point::new(-2000, 0), Point::new(3000, 3000)] {
            b.update_drag(p);
            assert_contained(&b);
        }
        b.end_drag();
        assert_contained(&b);
    }

    #[test]
    fn body_drag_translates_within_bounds() {
        let mut b = CropBox::new(Size::new(1000, 700), Size::new(1000, 700));
        // Shrink to a 200x200 box first.
        b.begin_drag(Point::new(990, 690));
        b.update_drag(Point::new(190, 190));
        b.end_drag();
        assert_eq!(b.rect(), Rect::new(0, 0, 200, 200));

        b.begin_drag(Point::new(100, 100));
        b.update_drag(Point::new(400, 250));
        assert_eq!(b.rect(), Rect::new(300, 150, 200, 200));
        // Clamped translation: the box stops at the far corner.
        b.update_drag(Point::new(5000, 5000));
        assert_eq!(b.rect(), Rect::new(800, 500, 200, 200));
        b.end_drag();
    }

    #[test]
    fn ratio_lock_holds_on_bottom_right_drag() {
        let mut b = CropBox::new(Size::new(1000, 700), Size::new(1000, 700));
        b.set_aspect_lock(true, 3.5, 4.5);
        b.begin_drag(Point::new(990, 690));
        b.update_drag(Point::new(990, 240));
        b.end_drag();
        let r = b.rect();
        let got = (f64::from(r.width) / f64::from(r.height) * 100.0).round();
        let want = (3.5_f64 / 4.5 * 100.0).round();
        assert!(
            (got - want).abs() <= 1.0,
            "ratio drifted: {got} vs {want} ({r:?})"
        );
    }

    #[test]
    fn ratio_lock_holds_on_top_left_drag() {
        let mut b = CropBox::new(Size::new(1000, 700), Size::new(1000, 700));
        b.set_aspect_lock(true, 3.5, 4.5);
        b.begin_drag(Point::new(5, 5));
        b.update_drag(Point::new(105, 105));
        b.end_drag();
        let r = b.rect();
        let got = (f64::from(r.width) / f64::from(r.height) * 100.0).round();
        let want = (3.5_f64 / 4.5 * 100.0).round();
        assert!(
            (got - want).abs() <= 1.0,
            "ratio drifted: {got} vs {want} ({r:?})"
        );
        assert_contained(&b);
    }

    #[test]
    fn matching_ratio_leaves_proposal_untouched() {
        // Image aspect equals the target ratio exactly: no correction.
        let mut b = CropBox::new(Size::new(700, 900), Size::new(700, 900));
        b.set_aspect_lock(true, 7.0, 9.0);
        b.begin_drag(Point::new(690, 890));
        b.update_drag(Point::new(390, 590));
        assert_eq!(b.rect().bottom_right(), Point::new(399, 599));
    }

    #[test]
    fn commit_maps_to_original_coordinates() {
        // 0.5x display of a 2000x1400 original.
        let mut b = CropBox::new(Size::new(1000, 700), Size::new(2000, 1400));
        b.begin_drag(Point::new(0, 0));
        b.update_drag(Point::new(100, 100));
        b.end_drag();
        b.begin_drag(Point::new(999, 699));
        b.update_drag(Point::new(299, 299));
        b.end_drag();
        assert_eq!(b.rect(), Rect::new(100, 100, 200, 200));

        let region = b.commit().unwrap();
        assert_eq!((region.x, region.y), (200, 200));
        assert_eq!((region.width, region.height), (400, 400));
    }

    #[test]
    fn shade_regions_tile_the_outside() {
        let mut b = CropBox::new(Size::new(1000, 700), Size::new(1000, 700));
        b.begin_drag(Point::new(10, 10));
        b.update_drag(Point::new(110, 110));
        b.end_drag();
        b.begin_drag(Point::new(990, 690));
        b.update_drag(Point::new(490, 390));
        b.end_drag();
        let r = b.rect();

        let regions = b.shade_regions();
        let outside: i64 = regions
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| i64::from(s.width) * i64::from(s.height))
            .sum();
        let total = 1000i64 * 700;
        let inside = i64::from(r.width) * i64::from(r.height);
        assert_eq!(outside, total - inside);
        for s in regions.iter().filter(|s| !s.is_empty()) {
            assert!(!s.contains(Point::new(r.x, r.y)));
            assert!(!s.contains(Point::new(r.right(), r.bottom())));
        }
    }

    #[test]
    fn corner_handles_hug_the_corners() {
        let b = CropBox::new(Size::new(1000, 700), Size::new(1000, 700));
        let [tl, br] = b.corner_handles();
        assert_eq!(tl.outer, Rect::new(0, 0, 59, 59));
        assert_eq!(tl.inner, Rect::new(1, 1, 57, 57));
        assert_eq!(br.outer.bottom_right(), Point::new(999, 699));
        assert_eq!(br.outer.width, 59);
        assert_eq!(br.inner.bottom_right(), Point::new(998, 698));
        assert_eq!(br.inner.width, 57);
    }
}
