//! Geometric primitives for layout analysis.
//!
//! Coordinates are PDF user space as reported by glyph extraction: the origin
//! is the bottom-left corner of the page and `y` grows upward, so `y0` is the
//! bottom edge of a box and `y1` its top edge.

use serde::{Deserialize, Serialize};

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box given by its two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a box from its corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(bbox.width(), 100.0);
    /// assert_eq!(bbox.height(), 50.0);
    /// ```
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Get the center point of the box.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
    /// let center = bbox.center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 25.0);
    /// ```
    pub fn center(&self) -> Point {
        Point {
            x: (self.x0 + self.x1) / 2.0,
            y: (self.y0 + self.y1) / 2.0,
        }
    }

    /// Compute the union of this box with another.
    ///
    /// Returns the smallest box that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_reflow::geometry::BoundingBox;
    ///
    /// let a = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
    /// let b = BoundingBox::new(25.0, 25.0, 75.0, 75.0);
    /// let union = a.union(&b);
    ///
    /// assert_eq!(union, BoundingBox::new(0.0, 0.0, 75.0, 75.0));
    /// ```
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union of all boxes, or `None` for an empty iterator.
    pub fn enclosing<I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = BoundingBox>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Compute the area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True when the box has no usable area for laying out text.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}
