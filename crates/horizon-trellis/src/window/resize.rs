//! Border-drag window resizing.
//!
//! The gesture has two stages. Hovering a window edge makes that window the
//! *candidate*; pressing the left button while a candidate is set starts the
//! *drag*, remembering where the pointer and the window were. Every later
//! motion recomputes the window rectangle from that starting point.

use horizon_trellis_core::{Point, Rect, Size, WindowId};

use super::CursorShape;

/// A window edge. Coordinates are y-up, so `Bottom` is the edge at the
/// window origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl ResizeEdge {
    /// Find the edge band of a `size` window that contains the local point
    /// `(x, y)`. Bands are `threshold` wide and tested right, left, top,
    /// bottom; `allowed` filters the edges that may be grabbed.
    pub fn detect(
        x: f32,
        y: f32,
        size: Size,
        threshold: f32,
        allowed: impl Fn(ResizeEdge) -> bool,
    ) -> Option<ResizeEdge> {
        let candidates = [
            (ResizeEdge::Right, x >= size.width - threshold),
            (ResizeEdge::Left, x < threshold),
            (ResizeEdge::Top, y >= size.height - threshold),
            (ResizeEdge::Bottom, y < threshold),
        ];
        candidates
            .into_iter()
            .find(|(edge, hit)| *hit && allowed(*edge))
            .map(|(edge, _)| edge)
    }

    /// Whether grabbing this edge moves the window origin.
    pub fn is_origin_edge(self) -> bool {
        matches!(self, ResizeEdge::Left | ResizeEdge::Bottom)
    }

    pub fn cursor(self) -> CursorShape {
        match self {
            ResizeEdge::Left | ResizeEdge::Right => CursorShape::ResizeHorizontal,
            ResizeEdge::Top | ResizeEdge::Bottom => CursorShape::ResizeVertical,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: Point,
    rect: Rect,
}

/// State of the manager's single resize gesture.
#[derive(Debug, Default)]
pub(crate) struct ResizeGesture {
    candidate: Option<(WindowId, ResizeEdge)>,
    drag: Option<Drag>,
}

impl ResizeGesture {
    pub(crate) fn candidate(&self) -> Option<(WindowId, ResizeEdge)> {
        self.candidate
    }

    pub(crate) fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    pub(crate) fn arm(&mut self, window: WindowId, edge: ResizeEdge) {
        self.candidate = Some((window, edge));
        self.drag = None;
    }

    /// Start dragging the armed edge. Does nothing without a candidate.
    pub(crate) fn begin(&mut self, start: Point, rect: Rect) {
        if self.candidate.is_some() {
            self.drag = Some(Drag { start, rect });
        }
    }

    pub(crate) fn clear(&mut self) {
        self.candidate = None;
        self.drag = None;
    }

    /// The rectangle the dragged window should take with the pointer at
    /// `pointer`. `clamp` bounds the size the way the window does, so a
    /// clamped origin-edge drag keeps the opposite edge in place.
    pub(crate) fn resized(
        &self,
        pointer: Point,
        clamp: impl Fn(Size) -> Size,
    ) -> Option<(WindowId, Rect)> {
        let (window, edge) = self.candidate?;
        let Drag { start, rect } = self.drag?;
        let (dx, dy) = (pointer.x - start.x, pointer.y - start.y);

        let mut size = rect.size();
        match edge {
            ResizeEdge::Right => size.width += dx,
            ResizeEdge::Left => size.width -= dx,
            ResizeEdge::Top => size.height += dy,
            ResizeEdge::Bottom => size.height -= dy,
        }
        size = clamp(Size::new(size.width.max(0.0), size.height.max(0.0)));

        let mut resized = Rect::new(rect.x, rect.y, size.width, size.height);
        match edge {
            ResizeEdge::Left => resized.x = rect.right() - size.width,
            ResizeEdge::Bottom => resized.y = rect.top() - size.height,
            ResizeEdge::Right | ResizeEdge::Top => {}
        }
        Some((window, resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any(_: ResizeEdge) -> bool {
        true
    }

    #[test]
    fn test_detect_edges() {
        let size = Size::new(200.0, 100.0);
        assert_eq!(ResizeEdge::detect(198.0, 50.0, size, 5.0, any), Some(ResizeEdge::Right));
        assert_eq!(ResizeEdge::detect(2.0, 50.0, size, 5.0, any), Some(ResizeEdge::Left));
        assert_eq!(ResizeEdge::detect(100.0, 97.0, size, 5.0, any), Some(ResizeEdge::Top));
        assert_eq!(ResizeEdge::detect(100.0, 1.0, size, 5.0, any), Some(ResizeEdge::Bottom));
        assert_eq!(ResizeEdge::detect(100.0, 50.0, size, 5.0, any), None);
        // A corner resolves to the horizontal edge first.
        assert_eq!(ResizeEdge::detect(199.0, 99.0, size, 5.0, any), Some(ResizeEdge::Right));
    }

    #[test]
    fn test_detect_respects_allowed_edges() {
        let size = Size::new(200.0, 100.0);
        let vertical_only = |edge: ResizeEdge| !matches!(edge, ResizeEdge::Left | ResizeEdge::Right);
        assert_eq!(ResizeEdge::detect(199.0, 99.0, size, 5.0, vertical_only), Some(ResizeEdge::Top));
        assert_eq!(ResizeEdge::detect(199.0, 50.0, size, 5.0, vertical_only), None);
    }

    #[test]
    fn test_far_edge_changes_size_only() {
        let window = WindowId::next();
        let mut gesture = ResizeGesture::default();
        gesture.arm(window, ResizeEdge::Right);
        assert!(gesture.resized(Point::new(0.0, 0.0), |size| size).is_none());

        gesture.begin(Point::new(300.0, 150.0), Rect::new(100.0, 100.0, 200.0, 100.0));
        assert!(gesture.is_active());
        let (target, rect) = gesture.resized(Point::new(310.0, 170.0), |size| size).unwrap();
        assert_eq!(target, window);
        assert_eq!(rect, Rect::new(100.0, 100.0, 210.0, 100.0));
    }

    #[test]
    fn test_origin_edge_moves_origin() {
        let mut gesture = ResizeGesture::default();
        gesture.arm(WindowId::next(), ResizeEdge::Bottom);
        gesture.begin(Point::new(150.0, 100.0), Rect::new(100.0, 100.0, 200.0, 100.0));
        let (_, rect) = gesture.resized(Point::new(150.0, 80.0), |size| size).unwrap();
        assert_eq!(rect, Rect::new(100.0, 80.0, 200.0, 120.0));

        // Clamped at 50 high, the top edge stays at 200.
        let clamp = |size: Size| Size::new(size.width, size.height.max(50.0));
        let (_, rect) = gesture.resized(Point::new(150.0, 180.0), clamp).unwrap();
        assert_eq!(rect, Rect::new(100.0, 150.0, 200.0, 50.0));
    }

    #[test]
    fn test_begin_without_candidate_is_ignored() {
        let mut gesture = ResizeGesture::default();
        gesture.begin(Point::new(0.0, 0.0), Rect::ZERO);
        assert!(!gesture.is_active());
        gesture.arm(WindowId::next(), ResizeEdge::Left);
        gesture.clear();
        assert!(gesture.candidate().is_none());
    }
}
