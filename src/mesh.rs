// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel mesh: a four-direction linked grid stored in an arena.
//!
//! Every pixel holds its color, its last computed energy map and cost
//! matrix values, a masked flag, and four neighbor links.  The links
//! are arena indices rather than references, which keeps the splice
//! and duplicate operations free of lifetime gymnastics and makes the
//! deep copy needed for insertion search a plain `clone` of the node
//! vector instead of a graph walk.
//!
//! "Off the grid" is the reserved [`BORDER`] index.  Reads against it
//! come back as fixed sentinel values: infinite energy and cost (so a
//! border never wins a minimum comparison), black color, and itself
//! for every neighbor.  This lets the traversal and dynamic
//! programming code treat edges uniformly, with no bounds checks.
//!
//! The tracked `width`/`height` counters are authoritative: removal
//! decrements and insertion increments the relevant dimension, and
//! the tests verify the counters against full row/column traversals.

use crate::cq;
use crate::error::CarveError;
use image::{Rgb, RgbImage};

/// An arena handle to one pixel, or [`BORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRef(u32);

/// The border sentinel.  All of its neighbors are itself.
pub const BORDER: PixelRef = PixelRef(u32::MAX);

impl PixelRef {
    pub fn is_border(self) -> bool {
        self == BORDER
    }
}

#[derive(Debug, Clone)]
struct Node {
    color: Rgb<u8>,
    energy: f64,
    cost: f64,
    masked: bool,
    left: PixelRef,
    right: PixelRef,
    above: PixelRef,
    below: PixelRef,
}

impl Node {
    fn new(color: Rgb<u8>) -> Self {
        Node {
            color,
            energy: 0.0,
            cost: 0.0,
            masked: false,
            left: BORDER,
            right: BORDER,
            above: BORDER,
            below: BORDER,
        }
    }
}

/// The mesh itself: an arena of nodes plus the designated upper-left
/// pixel the whole grid is reachable from.  Removed pixels stay in
/// the arena, unlinked; the arena only ever grows.
#[derive(Debug, Clone)]
pub struct Mesh {
    nodes: Vec<Node>,
    origin: PixelRef,
    width: u32,
    height: u32,
}

impl Mesh {
    /// Builds a fully linked mesh from a decoded image, row-major,
    /// stitching each new pixel to the one on its left and the one
    /// above it as it goes.
    pub fn from_image(image: &RgbImage) -> Result<Mesh, CarveError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CarveError::EmptyImage);
        }

        let mut mesh = Mesh {
            nodes: Vec::with_capacity(width as usize * height as usize),
            origin: BORDER,
            width,
            height,
        };

        let mut previous_row: Vec<PixelRef> = Vec::new();
        for y in 0..height {
            let mut row = Vec::with_capacity(width as usize);
            for x in 0..width {
                let pixel = mesh.push_node(*image.get_pixel(x, y));
                if x > 0 {
                    mesh.link_horizontal(row[x as usize - 1], pixel);
                }
                if y > 0 {
                    mesh.link_vertical(previous_row[x as usize], pixel);
                }
                row.push(pixel);
            }
            previous_row = row;
        }

        mesh.origin = PixelRef(0);
        Ok(mesh)
    }

    fn push_node(&mut self, color: Rgb<u8>) -> PixelRef {
        self.nodes.push(Node::new(color));
        PixelRef(self.nodes.len() as u32 - 1)
    }

    fn node(&self, pixel: PixelRef) -> &Node {
        &self.nodes[pixel.0 as usize]
    }

    fn node_mut(&mut self, pixel: PixelRef) -> &mut Node {
        &mut self.nodes[pixel.0 as usize]
    }

    pub fn origin(&self) -> PixelRef {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, pixel: PixelRef) {
        self.origin = pixel;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn shrink_width(&mut self) {
        self.width -= 1;
    }

    pub(crate) fn shrink_height(&mut self) {
        self.height -= 1;
    }

    pub(crate) fn grow_width(&mut self) {
        self.width += 1;
    }

    pub(crate) fn grow_height(&mut self) {
        self.height += 1;
    }

    /// The border reads back black; it is never displayed.
    pub fn color(&self, pixel: PixelRef) -> Rgb<u8> {
        cq!(pixel.is_border(), Rgb([0, 0, 0]), self.node(pixel).color)
    }

    pub fn set_color(&mut self, pixel: PixelRef, color: Rgb<u8>) {
        if pixel.is_border() {
            return;
        }
        self.node_mut(pixel).color = color;
    }

    /// The border's energy is unbounded so it never wins a minimum.
    pub fn energy(&self, pixel: PixelRef) -> f64 {
        cq!(pixel.is_border(), f64::INFINITY, self.node(pixel).energy)
    }

    /// Writes an energy value, unless the pixel is masked: masked
    /// pixels must keep their sentinel energy across recomputation.
    pub fn set_energy(&mut self, pixel: PixelRef, energy: f64) {
        if pixel.is_border() {
            return;
        }
        let node = self.node_mut(pixel);
        if !node.masked {
            node.energy = energy;
        }
    }

    pub fn cost(&self, pixel: PixelRef) -> f64 {
        cq!(pixel.is_border(), f64::INFINITY, self.node(pixel).cost)
    }

    pub fn set_cost(&mut self, pixel: PixelRef, cost: f64) {
        if pixel.is_border() {
            return;
        }
        self.node_mut(pixel).cost = cost;
    }

    pub fn is_masked(&self, pixel: PixelRef) -> bool {
        !pixel.is_border() && self.node(pixel).masked
    }

    /// Marks a pixel as part of a mask and pins its energy to the
    /// given sentinel.  Idempotent: a second call neither re-raises
    /// nor re-lowers the sentinel.
    pub fn mark_masked(&mut self, pixel: PixelRef, energy_value: f64) {
        if pixel.is_border() {
            return;
        }
        let node = self.node_mut(pixel);
        if !node.masked {
            node.masked = true;
            node.energy = energy_value;
        }
    }

    pub fn left(&self, pixel: PixelRef) -> PixelRef {
        cq!(pixel.is_border(), BORDER, self.node(pixel).left)
    }

    pub fn right(&self, pixel: PixelRef) -> PixelRef {
        cq!(pixel.is_border(), BORDER, self.node(pixel).right)
    }

    pub fn above(&self, pixel: PixelRef) -> PixelRef {
        cq!(pixel.is_border(), BORDER, self.node(pixel).above)
    }

    pub fn below(&self, pixel: PixelRef) -> PixelRef {
        cq!(pixel.is_border(), BORDER, self.node(pixel).below)
    }

    // The diagonals are derived, never stored: each is the
    // composition of two direct links.

    pub fn upper_left(&self, pixel: PixelRef) -> PixelRef {
        self.left(self.above(pixel))
    }

    pub fn upper_right(&self, pixel: PixelRef) -> PixelRef {
        self.right(self.above(pixel))
    }

    pub fn lower_left(&self, pixel: PixelRef) -> PixelRef {
        self.left(self.below(pixel))
    }

    pub fn lower_right(&self, pixel: PixelRef) -> PixelRef {
        self.right(self.below(pixel))
    }

    /// Makes `a` and `b` horizontal neighbors.  Either side may be
    /// the border, in which case only the interior side is written.
    pub fn link_horizontal(&mut self, a: PixelRef, b: PixelRef) {
        if !a.is_border() {
            self.node_mut(a).right = b;
        }
        if !b.is_border() {
            self.node_mut(b).left = a;
        }
    }

    /// Makes `a` the pixel directly above `b`.
    pub fn link_vertical(&mut self, a: PixelRef, b: PixelRef) {
        if !a.is_border() {
            self.node_mut(a).below = b;
        }
        if !b.is_border() {
            self.node_mut(b).above = a;
        }
    }

    /// Creates a fresh, unlinked node carrying the given pixel's
    /// color.  Insertion stitches it into place afterwards.
    pub fn duplicate(&mut self, pixel: PixelRef) -> PixelRef {
        let color = self.color(pixel);
        self.push_node(color)
    }

    /// Walks the links from the origin to the pixel at (x, y).
    pub fn pixel_at(&self, x: u32, y: u32) -> Result<PixelRef, CarveError> {
        if x >= self.width || y >= self.height {
            return Err(CarveError::OutOfBounds { x, y });
        }
        let mut pixel = self.origin;
        for _ in 0..x {
            pixel = self.right(pixel);
        }
        for _ in 0..y {
            pixel = self.below(pixel);
        }
        Ok(pixel)
    }

    /// Iterates one row, left to right, from the given pixel.
    pub fn row(&self, start: PixelRef) -> Row<'_> {
        Row {
            mesh: self,
            current: start,
        }
    }

    /// Iterates one column, top to bottom, from the given pixel.
    pub fn column(&self, start: PixelRef) -> Column<'_> {
        Column {
            mesh: self,
            current: start,
        }
    }

    /// Iterates the whole grid row-major, yielding each pixel with
    /// its current (x, y) position.
    pub fn cells(&self) -> Cells<'_> {
        Cells {
            mesh: self,
            line_start: self.origin,
            current: self.origin,
            x: 0,
            y: 0,
        }
    }

    /// Iterates the whole grid column-major, yielding each pixel with
    /// its current (x, y) position.
    pub fn cells_by_column(&self) -> CellsByColumn<'_> {
        CellsByColumn {
            mesh: self,
            line_start: self.origin,
            current: self.origin,
            x: 0,
            y: 0,
        }
    }

    /// Rasterizes the current state of the mesh back to a buffer.
    pub fn to_image(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width, self.height);
        for (pixel, x, y) in self.cells() {
            out.put_pixel(x, y, self.color(pixel));
        }
        out
    }
}

pub struct Row<'a> {
    mesh: &'a Mesh,
    current: PixelRef,
}

impl<'a> Iterator for Row<'a> {
    type Item = PixelRef;

    fn next(&mut self) -> Option<PixelRef> {
        if self.current.is_border() {
            return None;
        }
        let pixel = self.current;
        self.current = self.mesh.right(pixel);
        Some(pixel)
    }
}

pub struct Column<'a> {
    mesh: &'a Mesh,
    current: PixelRef,
}

impl<'a> Iterator for Column<'a> {
    type Item = PixelRef;

    fn next(&mut self) -> Option<PixelRef> {
        if self.current.is_border() {
            return None;
        }
        let pixel = self.current;
        self.current = self.mesh.below(pixel);
        Some(pixel)
    }
}

pub struct Cells<'a> {
    mesh: &'a Mesh,
    line_start: PixelRef,
    current: PixelRef,
    x: u32,
    y: u32,
}

impl<'a> Iterator for Cells<'a> {
    type Item = (PixelRef, u32, u32);

    fn next(&mut self) -> Option<(PixelRef, u32, u32)> {
        if self.current.is_border() {
            self.line_start = self.mesh.below(self.line_start);
            if self.line_start.is_border() {
                return None;
            }
            self.current = self.line_start;
            self.x = 0;
            self.y += 1;
        }
        let item = (self.current, self.x, self.y);
        self.current = self.mesh.right(self.current);
        self.x += 1;
        Some(item)
    }
}

pub struct CellsByColumn<'a> {
    mesh: &'a Mesh,
    line_start: PixelRef,
    current: PixelRef,
    x: u32,
    y: u32,
}

impl<'a> Iterator for CellsByColumn<'a> {
    type Item = (PixelRef, u32, u32);

    fn next(&mut self) -> Option<(PixelRef, u32, u32)> {
        if self.current.is_border() {
            self.line_start = self.mesh.right(self.line_start);
            if self.line_start.is_border() {
                return None;
            }
            self.current = self.line_start;
            self.y = 0;
            self.x += 1;
        }
        let item = (self.current, self.x, self.y);
        self.current = self.mesh.below(self.current);
        self.y += 1;
        Some(item)
    }
}

/// Asserts the structural invariants: tracked dimensions equal the
/// traversal counts, and every stored link is symmetric.
#[cfg(test)]
pub(crate) fn check_consistency(mesh: &Mesh) {
    let mut rows = 0;
    for start in mesh.column(mesh.origin()) {
        assert_eq!(
            mesh.row(start).count() as u32,
            mesh.width(),
            "row {} length disagrees with the tracked width",
            rows
        );
        rows += 1;
    }
    assert_eq!(rows, mesh.height(), "row count disagrees with the tracked height");

    let mut columns = 0;
    for start in mesh.row(mesh.origin()) {
        assert_eq!(
            mesh.column(start).count() as u32,
            mesh.height(),
            "column {} length disagrees with the tracked height",
            columns
        );
        columns += 1;
    }
    assert_eq!(columns, mesh.width(), "column count disagrees with the tracked width");

    for (pixel, x, y) in mesh.cells() {
        let right = mesh.right(pixel);
        if !right.is_border() {
            assert_eq!(mesh.left(right), pixel, "right/left asymmetry at ({}, {})", x, y);
        }
        let left = mesh.left(pixel);
        if !left.is_border() {
            assert_eq!(mesh.right(left), pixel, "left/right asymmetry at ({}, {})", x, y);
        }
        let below = mesh.below(pixel);
        if !below.is_border() {
            assert_eq!(mesh.above(below), pixel, "below/above asymmetry at ({}, {})", x, y);
        }
        let above = mesh.above(pixel);
        if !above.is_border() {
            assert_eq!(mesh.below(above), pixel, "above/below asymmetry at ({}, {})", x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 10 + y) as u8, 0, 0])
        })
    }

    #[test]
    fn builds_a_consistent_mesh() {
        let mesh = Mesh::from_image(&numbered(4, 3)).unwrap();
        assert_eq!(mesh.width(), 4);
        assert_eq!(mesh.height(), 3);
        check_consistency(&mesh);
    }

    #[test]
    fn rejects_an_empty_image() {
        assert_eq!(
            Mesh::from_image(&RgbImage::new(0, 5)).unwrap_err(),
            CarveError::EmptyImage
        );
    }

    #[test]
    fn border_reads_are_fixed_sentinels() {
        assert!(BORDER.is_border());
        let mesh = Mesh::from_image(&numbered(2, 2)).unwrap();
        assert_eq!(mesh.color(BORDER), Rgb([0, 0, 0]));
        assert!(mesh.energy(BORDER).is_infinite());
        assert!(mesh.cost(BORDER).is_infinite());
        assert_eq!(mesh.left(BORDER), BORDER);
        assert_eq!(mesh.upper_right(BORDER), BORDER);
        assert!(!mesh.is_masked(BORDER));
    }

    #[test]
    fn corner_pixels_see_the_border_diagonally() {
        let mesh = Mesh::from_image(&numbered(3, 3)).unwrap();
        let origin = mesh.origin();
        assert_eq!(mesh.upper_left(origin), BORDER);
        assert_eq!(mesh.upper_right(origin), BORDER);
        assert_eq!(mesh.lower_left(origin), BORDER);
        assert!(!mesh.lower_right(origin).is_border());
    }

    #[test]
    fn traversals_expose_positions_in_order() {
        let mesh = Mesh::from_image(&numbered(3, 2)).unwrap();
        let row_major: Vec<(u32, u32)> = mesh.cells().map(|(_, x, y)| (x, y)).collect();
        assert_eq!(
            row_major,
            [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
        );
        let column_major: Vec<(u32, u32)> = mesh.cells_by_column().map(|(_, x, y)| (x, y)).collect();
        assert_eq!(
            column_major,
            [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]
        );
    }

    #[test]
    fn rasterization_round_trips() {
        let image = numbered(5, 4);
        let mesh = Mesh::from_image(&image).unwrap();
        assert_eq!(mesh.to_image(), image);
    }

    #[test]
    fn pixel_at_walks_the_links() {
        let image = numbered(4, 4);
        let mesh = Mesh::from_image(&image).unwrap();
        let pixel = mesh.pixel_at(2, 3).unwrap();
        assert_eq!(mesh.color(pixel), *image.get_pixel(2, 3));
        assert_eq!(
            mesh.pixel_at(4, 0).unwrap_err(),
            CarveError::OutOfBounds { x: 4, y: 0 }
        );
    }

    #[test]
    fn masking_is_idempotent() {
        let mut mesh = Mesh::from_image(&numbered(2, 2)).unwrap();
        let pixel = mesh.origin();
        mesh.mark_masked(pixel, 5000.0);
        assert!(mesh.is_masked(pixel));
        assert_eq!(mesh.energy(pixel), 5000.0);
        mesh.mark_masked(pixel, -5000.0);
        assert_eq!(mesh.energy(pixel), 5000.0);
    }

    #[test]
    fn masked_pixels_refuse_new_energies() {
        let mut mesh = Mesh::from_image(&numbered(2, 2)).unwrap();
        let pixel = mesh.origin();
        mesh.mark_masked(pixel, -5000.0);
        mesh.set_energy(pixel, 12.0);
        assert_eq!(mesh.energy(pixel), -5000.0);
        mesh.set_cost(pixel, 12.0);
        assert_eq!(mesh.cost(pixel), 12.0);
    }

    #[test]
    fn duplicates_start_unlinked() {
        let mut mesh = Mesh::from_image(&numbered(2, 2)).unwrap();
        let source = mesh.origin();
        let copy = mesh.duplicate(source);
        assert_eq!(mesh.color(copy), mesh.color(source));
        assert_eq!(mesh.left(copy), BORDER);
        assert_eq!(mesh.right(copy), BORDER);
        assert_eq!(mesh.above(copy), BORDER);
        assert_eq!(mesh.below(copy), BORDER);
    }

    #[test]
    fn deep_copies_do_not_alias() {
        let mut mesh = Mesh::from_image(&numbered(3, 3)).unwrap();
        let copy = mesh.clone();
        mesh.set_color(mesh.origin(), Rgb([255, 255, 255]));
        assert_eq!(copy.color(copy.origin()), Rgb([0, 0, 0]));
    }
}
