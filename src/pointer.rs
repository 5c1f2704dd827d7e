//! Pointer tracking for image fields.
//!
//! A [`PointerTracker`] turns host pointer events into the [`PointerState`]
//! an image field reads once per frame. It owns its state; nothing here is
//! global, so several fields can track independent regions side by side.
//!
//! # Usage
//!
//! ```ignore
//! let mut tracker = PointerTracker::new(section_rect, Vec2::new(vw, vh));
//!
//! // From the host's event listeners:
//! tracker.handle_event(PointerEvent::Moved(Vec2::new(client_x, client_y)));
//! tracker.handle_event(PointerEvent::Scrolled { region: new_rect });
//! tracker.handle_event(PointerEvent::Left);
//!
//! // Once per frame:
//! field.update(tracker.state());
//! ```
//!
//! Screen coordinates are y-down with the origin at the top-left. Field-local
//! coordinates are y-up with the origin at the region's centre, scaled so the
//! region spans the viewport.

use glam::Vec2;

/// Where the pointer starts before any event arrives: far from every particle.
pub const FAR_AWAY: Vec2 = Vec2::new(9999.0, 9999.0);

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Map a point to normalized device coordinates (-1 to 1, y up).
    ///
    /// Degenerate rectangles map everything to the origin.
    pub fn to_ndc(&self, point: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            ((point.x - self.left) / self.width) * 2.0 - 1.0,
            -((point.y - self.top) / self.height) * 2.0 + 1.0,
        )
    }
}

/// Pointer snapshot handed to the per-frame update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Last known pointer location in field-local coordinates.
    pub position: Vec2,
    /// Whether the pointer is currently inside the tracked region.
    pub inside: bool,
}

impl PointerState {
    /// A pointer inside the region at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            inside: true,
        }
    }

    /// A pointer outside the region.
    pub fn away() -> Self {
        Self::default()
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: FAR_AWAY,
            inside: false,
        }
    }
}

/// Host pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to this screen position.
    Moved(Vec2),
    /// The page scrolled; `region` is the section's new screen rectangle.
    Scrolled { region: Rect },
    /// Pointer left the document.
    Left,
}

/// Tracks the pointer relative to one screen region.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    region: Rect,
    viewport: Vec2,
    last_screen: Option<Vec2>,
    state: PointerState,
}

impl PointerTracker {
    /// Track `region` (screen pixels), mapping into a field of `viewport` size.
    pub fn new(region: Rect, viewport: Vec2) -> Self {
        Self {
            region,
            viewport,
            last_screen: None,
            state: PointerState::default(),
        }
    }

    /// Current snapshot for the frame callback.
    #[inline]
    pub fn state(&self) -> PointerState {
        self.state
    }

    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Last pointer position seen on screen, if any.
    #[inline]
    pub fn last_screen_position(&self) -> Option<Vec2> {
        self.last_screen
    }

    /// Replace the tracked region (layout change) and re-evaluate.
    pub fn set_region(&mut self, region: Rect) {
        self.region = region;
        self.reevaluate();
    }

    /// Replace the field viewport size (resize) and re-evaluate.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.reevaluate();
    }

    /// Process one host event.
    pub fn handle_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Moved(screen) => {
                self.last_screen = Some(screen);
                self.evaluate(screen);
            }
            PointerEvent::Scrolled { region } => {
                self.region = region;
                self.reevaluate();
            }
            PointerEvent::Left => {
                // Keep the last coordinate so particles ease back instead of snapping.
                self.state.inside = false;
            }
        }
    }

    fn reevaluate(&mut self) {
        if let Some(screen) = self.last_screen {
            self.evaluate(screen);
        }
    }

    fn evaluate(&mut self, screen: Vec2) {
        let inside = self.region.contains(screen);
        self.state.inside = inside;
        if inside {
            self.state.position = self.region.to_ndc(screen) * self.viewport * 0.5;
        }
    }
}
