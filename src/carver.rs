// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The carver: content-aware resizing driven by seam removal and
//! insertion.
//!
//! A resize pass runs in three phases over the mesh: refresh the
//! energy map, propagate the cost matrix in the seam's orientation,
//! then backtrack the cheapest path from the far edge.  Removal
//! splices the found seam out; enlargement first locates the seams a
//! shrink *would* take, against a scratch copy of the mesh, then
//! splices duplicates of those paths into the live mesh, with a
//! [`SeamAdjuster`] correcting for the drift each insertion causes.
//!
//! Masks bias the whole machine: a protected pixel's energy is pinned
//! high enough that no minimum path crosses it, a doomed pixel's low
//! enough that every path does.

use image::{Rgb, RgbImage};
use num_traits::clamp;

use crate::adjuster::SeamAdjuster;
use crate::coordinate::Coordinate;
use crate::cost::{BackwardEnergy, CostProcessor};
use crate::cq;
use crate::energy::{AverageGradient, EnergyFunction};
use crate::error::CarveError;
use crate::mask::Mask;
use crate::mesh::{Mesh, PixelRef, BORDER};
use crate::seam::{Orientation, Seam};

/// Energy pinned onto masked pixels.  Positive protects, negative
/// dooms.  High enough to dwarf any gradient the energy function can
/// produce from 8-bit color.
pub const MASK_ENERGY: f64 = 5000.0;

/// Recomputes every pixel's energy and returns the largest stored
/// value, for scaling visualizations.  Masked pixels keep their
/// pinned sentinel, which is why the maximum reads the stored value
/// back rather than trusting the function's output.
pub fn compute_energy_map(
    mesh: &mut Mesh,
    energy_function: &dyn EnergyFunction,
) -> Result<f64, CarveError> {
    let cells: Vec<(PixelRef, u32, u32)> = mesh.cells().collect();
    let mut max = 0.0;
    for (pixel, _, _) in cells {
        let energy = energy_function.compute(mesh, pixel)?;
        mesh.set_energy(pixel, energy);
        let stored = mesh.energy(pixel);
        if stored > max {
            max = stored;
        }
    }
    Ok(max)
}

/// Propagates the cost matrix across the whole mesh and returns the
/// largest finite cost.  The first row (vertical) or column
/// (horizontal) seeds straight from the energy map; every later lane
/// folds in its cheapest predecessor via the processor.
pub fn compute_cost_matrix(
    mesh: &mut Mesh,
    processor: &dyn CostProcessor,
    orientation: Orientation,
) -> Result<f64, CarveError> {
    let cells: Vec<(PixelRef, u32, u32)> = match orientation {
        Orientation::Vertical => mesh.cells().collect(),
        Orientation::Horizontal => mesh.cells_by_column().collect(),
    };
    let mut max = 0.0;
    for (pixel, x, y) in cells {
        let cost = match orientation {
            Orientation::Vertical => {
                cq!(y == 0, mesh.energy(pixel), processor.vertical_cost(mesh, pixel)?)
            }
            Orientation::Horizontal => {
                cq!(x == 0, mesh.energy(pixel), processor.horizontal_cost(mesh, pixel)?)
            }
        };
        mesh.set_cost(pixel, cost);
        if cost.is_finite() && cost > max {
            max = cost;
        }
    }
    Ok(max)
}

/// Backtracks the cheapest seam out of a freshly computed cost
/// matrix.  The scan along the far edge keeps the first minimum it
/// sees, so ties resolve to the leftmost column or topmost row.
pub fn find_minimum_seam(mesh: &Mesh, orientation: Orientation) -> Result<Seam, CarveError> {
    match orientation {
        Orientation::Vertical => find_vertical_seam(mesh),
        Orientation::Horizontal => find_horizontal_seam(mesh),
    }
}

fn find_vertical_seam(mesh: &Mesh) -> Result<Seam, CarveError> {
    let far_edge = mesh.pixel_at(0, mesh.height() - 1)?;
    let mut current = far_edge;
    let mut x = 0;
    for (index, pixel) in mesh.row(far_edge).enumerate().skip(1) {
        if mesh.cost(pixel) < mesh.cost(current) {
            current = pixel;
            x = index as u32;
        }
    }

    let mut seam = Seam::new(Orientation::Vertical);
    seam.push(current, Coordinate::new(x, mesh.height() - 1), mesh.cost(current));

    for y in (0..mesh.height() - 1).rev() {
        let upper_left = mesh.upper_left(current);
        let upper_right = mesh.upper_right(current);
        let above = mesh.above(current);

        // Candidate order decides ties: the diagonal toward the left
        // edge first, then the right, then straight up.
        let mut next = upper_left;
        let mut next_x = x.wrapping_sub(1);
        if mesh.cost(upper_right) < mesh.cost(next) {
            next = upper_right;
            next_x = x + 1;
        }
        if mesh.cost(above) < mesh.cost(next) {
            next = above;
            next_x = x;
        }
        // All candidates can tie at infinity on a degenerate matrix;
        // straight up is the one that always exists.
        if next.is_border() {
            next = above;
            next_x = x;
        }
        current = next;
        x = next_x;
        seam.push(current, Coordinate::new(x, y), mesh.cost(current));
    }
    Ok(seam)
}

fn find_horizontal_seam(mesh: &Mesh) -> Result<Seam, CarveError> {
    let far_edge = mesh.pixel_at(mesh.width() - 1, 0)?;
    let mut current = far_edge;
    let mut y = 0;
    for (index, pixel) in mesh.column(far_edge).enumerate().skip(1) {
        if mesh.cost(pixel) < mesh.cost(current) {
            current = pixel;
            y = index as u32;
        }
    }

    let mut seam = Seam::new(Orientation::Horizontal);
    seam.push(current, Coordinate::new(mesh.width() - 1, y), mesh.cost(current));

    for x in (0..mesh.width() - 1).rev() {
        let upper_left = mesh.upper_left(current);
        let lower_left = mesh.lower_left(current);
        let left = mesh.left(current);

        let mut next = upper_left;
        let mut next_y = y.wrapping_sub(1);
        if mesh.cost(lower_left) < mesh.cost(next) {
            next = lower_left;
            next_y = y + 1;
        }
        if mesh.cost(left) < mesh.cost(next) {
            next = left;
            next_y = y;
        }
        if next.is_border() {
            next = left;
            next_y = y;
        }
        current = next;
        y = next_y;
        seam.push(current, Coordinate::new(x, y), mesh.cost(current));
    }
    Ok(seam)
}

/// Drives resizing, region removal, and replacement over one image.
pub struct SeamCarver {
    mesh: Mesh,
    energy_function: Box<dyn EnergyFunction>,
    processor: Box<dyn CostProcessor>,
    record: bool,
    history: Vec<RgbImage>,
}

impl SeamCarver {
    pub fn new(image: &RgbImage) -> Result<Self, CarveError> {
        Ok(SeamCarver {
            mesh: Mesh::from_image(image)?,
            energy_function: Box::new(AverageGradient),
            processor: Box::new(BackwardEnergy),
            record: false,
            history: Vec::new(),
        })
    }

    /// Keeps a rasterized frame for the loaded image and after every
    /// seam operation, for rendering the carve as an animation.
    pub fn recording(mut self) -> Self {
        self.record = true;
        self.history.push(self.mesh.to_image());
        self
    }

    pub fn with_processor(mut self, processor: Box<dyn CostProcessor>) -> Self {
        self.processor = processor;
        self
    }

    pub fn with_energy_function(mut self, energy_function: Box<dyn EnergyFunction>) -> Self {
        self.energy_function = energy_function;
        self
    }

    pub fn width(&self) -> u32 {
        self.mesh.width()
    }

    pub fn height(&self) -> u32 {
        self.mesh.height()
    }

    pub fn current_image(&self) -> RgbImage {
        self.mesh.to_image()
    }

    /// The frames stored so far, oldest first.
    pub fn history(&self) -> Result<&[RgbImage], CarveError> {
        cq!(
            self.record,
            Ok(self.history.as_slice()),
            Err(CarveError::RecordingDisabled)
        )
    }

    #[cfg(test)]
    pub(crate) fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Carves or grows to exactly the given dimensions.  When both
    /// dimensions shrink, each step removes whichever orientation's
    /// minimum seam carries less average energy; enlargement happens
    /// after all removal, one axis at a time.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CarveError> {
        if width == 0 || height == 0 {
            return Err(CarveError::InvalidDimensions { width, height });
        }

        while self.mesh.width() > width && self.mesh.height() > height {
            let vertical = self.search(Orientation::Vertical)?;
            let horizontal = self.search(Orientation::Horizontal)?;
            if vertical.average_energy() < horizontal.average_energy() {
                vertical.remove(&mut self.mesh)?;
            } else {
                horizontal.remove(&mut self.mesh)?;
            }
            self.store_state();
        }
        while self.mesh.width() > width {
            self.remove_minimum_seam(Orientation::Vertical)?;
        }
        while self.mesh.height() > height {
            self.remove_minimum_seam(Orientation::Horizontal)?;
        }

        if width > self.mesh.width() {
            self.insert_vertical_seams(width - self.mesh.width())?;
        }
        if height > self.mesh.height() {
            self.insert_horizontal_seams(height - self.mesh.height())?;
        }
        Ok(())
    }

    /// [`resize`](Self::resize) with a region no seam may cross.
    pub fn resize_protected(
        &mut self,
        width: u32,
        height: u32,
        protected: &Mask,
    ) -> Result<(), CarveError> {
        self.apply_mask(protected, MASK_ENERGY)?;
        self.resize(width, height)
    }

    /// Carves seams through the masked region until none of its
    /// pixels remain, shrinking the image.  The orientation of each
    /// seam follows a countdown over the mask's bounding box: the
    /// longer remaining direction is cut across first.  The counters
    /// are only a heuristic; the loop itself runs on the actual
    /// masked-pixel census.
    pub fn remove_area(&mut self, doomed: &Mask) -> Result<(), CarveError> {
        self.apply_mask(doomed, -MASK_ENERGY)?;

        let mut box_width = doomed.span_x();
        let mut box_height = doomed.span_y();

        while self.has_masked_pixels() {
            if box_width > box_height {
                if self.mesh.height() == 1 {
                    return Err(CarveError::BelowMinimumSize);
                }
                self.remove_minimum_seam(Orientation::Horizontal)?;
                box_width -= 1;
            } else {
                if self.mesh.width() == 1 {
                    return Err(CarveError::BelowMinimumSize);
                }
                self.remove_minimum_seam(Orientation::Vertical)?;
                box_height = box_height.saturating_sub(1);
            }
        }
        Ok(())
    }

    /// Removes the masked region, then grows back to the original
    /// dimensions, filling the hole from its surroundings.
    pub fn replace_area(&mut self, doomed: &Mask) -> Result<(), CarveError> {
        let width = self.mesh.width();
        let height = self.mesh.height();
        self.remove_area(doomed)?;
        self.resize(width, height)
    }

    /// Pins the given energy onto every pixel the mask covers.
    pub fn apply_mask(&mut self, mask: &Mask, energy_value: f64) -> Result<(), CarveError> {
        if mask.max_x() >= self.mesh.width() || mask.max_y() >= self.mesh.height() {
            return Err(CarveError::MaskOutOfBounds);
        }
        let covered: Vec<PixelRef> = self
            .mesh
            .cells()
            .filter(|&(_, x, y)| mask.contains(&Coordinate::new(x, y)))
            .map(|(pixel, _, _)| pixel)
            .collect();
        for pixel in covered {
            self.mesh.mark_masked(pixel, energy_value);
        }
        Ok(())
    }

    pub fn has_masked_pixels(&self) -> bool {
        self.mesh.cells().any(|(pixel, _, _)| self.mesh.is_masked(pixel))
    }

    /// The current energy map rendered as grayscale, white at the
    /// maximum.  Negative (doomed) energies floor to black.
    pub fn energy_map_image(&mut self) -> Result<RgbImage, CarveError> {
        let max = compute_energy_map(&mut self.mesh, self.energy_function.as_ref())?;
        let mut out = RgbImage::new(self.mesh.width(), self.mesh.height());
        for (pixel, x, y) in self.mesh.cells() {
            out.put_pixel(x, y, grayscale(self.mesh.energy(pixel), max));
        }
        Ok(out)
    }

    /// The cost matrix for the given orientation rendered as
    /// grayscale.
    pub fn cost_matrix_image(&mut self, orientation: Orientation) -> Result<RgbImage, CarveError> {
        compute_energy_map(&mut self.mesh, self.energy_function.as_ref())?;
        let max = compute_cost_matrix(&mut self.mesh, self.processor.as_ref(), orientation)?;
        let mut out = RgbImage::new(self.mesh.width(), self.mesh.height());
        for (pixel, x, y) in self.mesh.cells() {
            out.put_pixel(x, y, grayscale(self.mesh.cost(pixel), max));
        }
        Ok(out)
    }

    fn search(&mut self, orientation: Orientation) -> Result<Seam, CarveError> {
        compute_energy_map(&mut self.mesh, self.energy_function.as_ref())?;
        compute_cost_matrix(&mut self.mesh, self.processor.as_ref(), orientation)?;
        find_minimum_seam(&self.mesh, orientation)
    }

    fn remove_minimum_seam(&mut self, orientation: Orientation) -> Result<(), CarveError> {
        let seam = self.search(orientation)?;
        seam.remove(&mut self.mesh)?;
        self.store_state();
        Ok(())
    }

    fn store_state(&mut self) {
        if self.record {
            self.history.push(self.mesh.to_image());
        }
    }

    /// Finds the paths the next `count` removals would take, by
    /// actually carving a scratch copy of the mesh.  The returned
    /// coordinates are mapped back onto the live grid: each removal
    /// displaces the scratch copy's lanes, and the inclusive
    /// adjustment undoes that drift.
    fn locate_seams(
        &self,
        orientation: Orientation,
        count: u32,
    ) -> Result<Vec<Vec<Coordinate>>, CarveError> {
        let mut scratch = self.mesh.clone();
        let range = match orientation {
            Orientation::Vertical => scratch.width(),
            Orientation::Horizontal => scratch.height(),
        };
        let mut adjuster = SeamAdjuster::new(range)?;

        let mut located = Vec::with_capacity(count as usize);
        for _ in 0..count {
            compute_energy_map(&mut scratch, self.energy_function.as_ref())?;
            compute_cost_matrix(&mut scratch, self.processor.as_ref(), orientation)?;
            let seam = find_minimum_seam(&scratch, orientation)?;
            let coordinates = seam.coordinates();
            let adjusted = match orientation {
                Orientation::Vertical => adjuster.adjust_x_inclusive(&coordinates)?,
                Orientation::Horizontal => adjuster.adjust_y_inclusive(&coordinates)?,
            };
            seam.remove(&mut scratch)?;
            located.push(adjusted);
        }
        Ok(located)
    }

    fn insert_vertical_seams(&mut self, count: u32) -> Result<(), CarveError> {
        if count == 0 {
            return Err(CarveError::EmptySeamBatch);
        }
        if count >= self.mesh.width() {
            return Err(CarveError::BelowMinimumSize);
        }
        let located = self.locate_seams(Orientation::Vertical, count)?;

        let mut adjuster = SeamAdjuster::new(self.mesh.width())?;
        for coordinates in &located {
            let coordinates = cq!(
                count > 1,
                adjuster.adjust_x_exclusive(coordinates)?,
                coordinates.clone()
            );
            self.splice_vertical(&coordinates)?;
            self.mesh.grow_width();
            self.store_state();
        }
        Ok(())
    }

    fn insert_horizontal_seams(&mut self, count: u32) -> Result<(), CarveError> {
        if count == 0 {
            return Err(CarveError::EmptySeamBatch);
        }
        if count >= self.mesh.height() {
            return Err(CarveError::BelowMinimumSize);
        }
        let located = self.locate_seams(Orientation::Horizontal, count)?;

        let mut adjuster = SeamAdjuster::new(self.mesh.height())?;
        for coordinates in &located {
            let coordinates = cq!(
                count > 1,
                adjuster.adjust_y_exclusive(coordinates)?,
                coordinates.clone()
            );
            self.splice_horizontal(&coordinates)?;
            self.mesh.grow_height();
            self.store_state();
        }
        Ok(())
    }

    /// Splices one duplicated vertical path into the mesh.  Each
    /// row's seam pixel gets a copy of itself inserted on its right;
    /// the diagonal the path takes between rows decides which of the
    /// three pixels the previous row's copy stitches down to.
    fn splice_vertical(&mut self, coordinates: &[Coordinate]) -> Result<(), CarveError> {
        if coordinates.is_empty() {
            return Err(CarveError::EmptySeam);
        }
        let mesh = &mut self.mesh;

        let mut prev_left = BORDER;
        let mut prev_middle = BORDER;
        let mut prev_right = BORDER;
        let mut previous_x: Option<u32> = None;

        for coordinate in coordinates {
            let cur_left = match previous_x {
                None => mesh.pixel_at(coordinate.x, coordinate.y)?,
                Some(px) if coordinate.x + 1 == px => mesh.lower_left(prev_left),
                Some(px) if coordinate.x == px + 1 => mesh.lower_right(prev_left),
                Some(_) => mesh.below(prev_left),
            };
            // The current row is still unspliced, so its own link is
            // the authoritative flank.  Composing a diagonal through
            // prev_right reads the border when the seam hugs the
            // last column.
            let cur_right = mesh.right(cur_left);
            let cur_middle = mesh.duplicate(cur_left);

            match previous_x {
                Some(px) if coordinate.x + 1 == px => {
                    mesh.link_vertical(prev_middle, cur_right);
                    mesh.link_vertical(prev_left, cur_middle);
                }
                Some(px) if coordinate.x == px + 1 => {
                    mesh.link_vertical(prev_middle, cur_left);
                    mesh.link_vertical(prev_right, cur_middle);
                }
                Some(_) => mesh.link_vertical(prev_middle, cur_middle),
                None => {}
            }
            mesh.link_horizontal(cur_left, cur_middle);
            mesh.link_horizontal(cur_middle, cur_right);

            prev_left = cur_left;
            prev_middle = cur_middle;
            prev_right = cur_right;
            previous_x = Some(coordinate.x);
        }
        Ok(())
    }

    /// The horizontal mirror: each column's seam pixel gets a copy
    /// inserted below it.
    fn splice_horizontal(&mut self, coordinates: &[Coordinate]) -> Result<(), CarveError> {
        if coordinates.is_empty() {
            return Err(CarveError::EmptySeam);
        }
        let mesh = &mut self.mesh;

        let mut prev_above = BORDER;
        let mut prev_middle = BORDER;
        let mut prev_below = BORDER;
        let mut previous_y: Option<u32> = None;

        for coordinate in coordinates {
            let cur_above = match previous_y {
                None => mesh.pixel_at(coordinate.x, coordinate.y)?,
                Some(py) if coordinate.y + 1 == py => mesh.upper_right(prev_above),
                Some(py) if coordinate.y == py + 1 => mesh.below(mesh.right(prev_above)),
                Some(_) => mesh.right(prev_above),
            };
            // As in the vertical splice: prev_below is the border
            // when the seam hugs the bottom row, so the flank comes
            // from the current column's own link.
            let cur_below = mesh.below(cur_above);
            let cur_middle = mesh.duplicate(cur_above);

            match previous_y {
                Some(py) if coordinate.y + 1 == py => {
                    mesh.link_horizontal(prev_above, cur_middle);
                    mesh.link_horizontal(prev_middle, cur_below);
                }
                Some(py) if coordinate.y == py + 1 => {
                    mesh.link_horizontal(prev_middle, cur_above);
                    mesh.link_horizontal(prev_below, cur_middle);
                }
                Some(_) => mesh.link_horizontal(prev_middle, cur_middle),
                None => {}
            }
            mesh.link_vertical(cur_above, cur_middle);
            mesh.link_vertical(cur_middle, cur_below);

            prev_above = cur_above;
            prev_middle = cur_middle;
            prev_below = cur_below;
            previous_y = Some(coordinate.y);
        }
        Ok(())
    }
}

fn grayscale(value: f64, max: f64) -> Rgb<u8> {
    if max <= 0.0 {
        return Rgb([0, 0, 0]);
    }
    let level = (clamp(value, 0.0, max) / max * 255.0).round() as u8;
    Rgb([level, level, level])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::ForwardEnergy;
    use crate::mesh::check_consistency;

    fn uniform(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    fn numbered(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([(x * 16 + y) as u8, 0, 0]))
    }

    fn coordinates(points: &[(u32, u32)]) -> Vec<Coordinate> {
        points.iter().map(|&(x, y)| Coordinate::new(x, y)).collect()
    }

    #[test]
    fn uniform_image_seam_follows_the_tie_break_order() {
        // Every interior pixel of a uniform image has zero energy, so
        // the whole search is decided by the tie-breaking rules: the
        // far-edge scan keeps the leftmost minimum, and backtracking
        // prefers the upper-left diagonal, then the upper-right, then
        // straight up.
        let mut mesh = Mesh::from_image(&uniform(4, 4, 100)).unwrap();
        compute_energy_map(&mut mesh, &AverageGradient).unwrap();
        compute_cost_matrix(&mut mesh, &BackwardEnergy, Orientation::Vertical).unwrap();
        let seam = find_minimum_seam(&mesh, Orientation::Vertical).unwrap();
        assert_eq!(
            seam.coordinates(),
            coordinates(&[(2, 0), (1, 1), (2, 2), (1, 3)])
        );
    }

    #[test]
    fn searching_twice_finds_the_same_seam() {
        let image = numbered(6, 5);
        let mut first = Mesh::from_image(&image).unwrap();
        let mut second = Mesh::from_image(&image).unwrap();
        for mesh in [&mut first, &mut second] {
            compute_energy_map(mesh, &AverageGradient).unwrap();
            compute_cost_matrix(mesh, &BackwardEnergy, Orientation::Horizontal).unwrap();
        }
        assert_eq!(
            find_minimum_seam(&first, Orientation::Horizontal)
                .unwrap()
                .coordinates(),
            find_minimum_seam(&second, Orientation::Horizontal)
                .unwrap()
                .coordinates()
        );
    }

    #[test]
    fn energy_map_maximum_is_the_stored_maximum() {
        let mut mesh = Mesh::from_image(&uniform(3, 3, 100)).unwrap();
        let max = compute_energy_map(&mut mesh, &AverageGradient).unwrap();
        // Corners carry the most border contrast: 5 * 100 / 8.
        assert_eq!(max, 62.5);
    }

    #[test]
    fn solid_image_loses_exactly_one_column() {
        let mut carver = SeamCarver::new(&uniform(5, 5, 77)).unwrap();
        carver.resize(4, 5).unwrap();
        assert_eq!((carver.width(), carver.height()), (4, 5));
        let carved = carver.current_image();
        assert!(carved.pixels().all(|&pixel| pixel == Rgb([77, 77, 77])));
        check_consistency(carver.mesh());
    }

    #[test]
    fn shrinking_reaches_the_target_dimensions() {
        let mut carver = SeamCarver::new(&numbered(6, 5)).unwrap();
        carver.resize(4, 3).unwrap();
        assert_eq!((carver.width(), carver.height()), (4, 3));
        let image = carver.current_image();
        assert_eq!(image.dimensions(), (4, 3));
        check_consistency(carver.mesh());
    }

    #[test]
    fn shrinking_one_axis_leaves_the_other_alone() {
        let mut carver = SeamCarver::new(&numbered(5, 4)).unwrap();
        carver.resize(3, 4).unwrap();
        assert_eq!((carver.width(), carver.height()), (3, 4));
        check_consistency(carver.mesh());
    }

    #[test]
    fn growing_reaches_the_target_dimensions() {
        let mut carver = SeamCarver::new(&numbered(5, 5)).unwrap();
        carver.resize(7, 7).unwrap();
        assert_eq!((carver.width(), carver.height()), (7, 7));
        assert_eq!(carver.current_image().dimensions(), (7, 7));
        check_consistency(carver.mesh());
    }

    #[test]
    fn insertion_duplicates_a_seam_pixel_in_every_row() {
        let mut carver = SeamCarver::new(&numbered(4, 3)).unwrap();
        carver.resize(5, 3).unwrap();
        check_consistency(carver.mesh());
        let image = carver.current_image();
        for y in 0..3 {
            let duplicated = (0..4).any(|x| image.get_pixel(x, y) == image.get_pixel(x + 1, y));
            assert!(duplicated, "row {} has no duplicated neighbor", y);
        }
    }

    #[test]
    fn insertion_stitches_a_seam_hugging_the_last_column() {
        // Pin everything except (3, 0) and (2, 1), forcing the
        // located seam through the last column before it leans
        // inward; the stitch must not read past the right edge.
        let mut carver = SeamCarver::new(&uniform(4, 2, 100)).unwrap();
        let mut stencil = RgbImage::from_pixel(4, 2, Rgb([255, 255, 255]));
        stencil.put_pixel(3, 0, Rgb([0, 0, 0]));
        stencil.put_pixel(2, 1, Rgb([0, 0, 0]));
        let pinned = Mask::from_image(&stencil).unwrap();
        carver.apply_mask(&pinned, MASK_ENERGY).unwrap();

        carver.resize(5, 2).unwrap();
        check_consistency(carver.mesh());
        let image = carver.current_image();
        assert_eq!(image.dimensions(), (5, 2));
        assert!(image.pixels().all(|&pixel| pixel == Rgb([100, 100, 100])));
    }

    #[test]
    fn insertion_stitches_a_seam_hugging_the_bottom_row() {
        let mut carver = SeamCarver::new(&uniform(2, 4, 100)).unwrap();
        let mut stencil = RgbImage::from_pixel(2, 4, Rgb([255, 255, 255]));
        stencil.put_pixel(0, 3, Rgb([0, 0, 0]));
        stencil.put_pixel(1, 2, Rgb([0, 0, 0]));
        let pinned = Mask::from_image(&stencil).unwrap();
        carver.apply_mask(&pinned, MASK_ENERGY).unwrap();

        carver.resize(2, 5).unwrap();
        check_consistency(carver.mesh());
        let image = carver.current_image();
        assert_eq!(image.dimensions(), (2, 5));
        assert!(image.pixels().all(|&pixel| pixel == Rgb([100, 100, 100])));
    }

    #[test]
    fn shrink_then_grow_round_trips_the_dimensions() {
        let mut carver = SeamCarver::new(&numbered(6, 6)).unwrap();
        carver.resize(4, 4).unwrap();
        carver.resize(6, 6).unwrap();
        assert_eq!((carver.width(), carver.height()), (6, 6));
        check_consistency(carver.mesh());
    }

    #[test]
    fn zero_targets_are_rejected() {
        let mut carver = SeamCarver::new(&numbered(4, 4)).unwrap();
        assert_eq!(
            carver.resize(0, 4).unwrap_err(),
            CarveError::InvalidDimensions { width: 0, height: 4 }
        );
    }

    #[test]
    fn forward_energy_carves_too() {
        let mut carver = SeamCarver::new(&numbered(6, 5))
            .unwrap()
            .with_processor(Box::new(ForwardEnergy));
        carver.resize(4, 5).unwrap();
        assert_eq!((carver.width(), carver.height()), (4, 5));
        check_consistency(carver.mesh());
    }

    #[test]
    fn protection_keeps_the_masked_columns() {
        let image = numbered(5, 4);
        let mut carver = SeamCarver::new(&image).unwrap();
        let protected = Mask::rectangle(0, 0, 1, 3).unwrap();
        carver.resize_protected(3, 4, &protected).unwrap();
        assert_eq!(carver.width(), 3);

        // Pinned energy keeps columns 0 and 1 out of every seam.
        let carved = carver.current_image();
        for y in 0..4 {
            assert_eq!(carved.get_pixel(0, y), image.get_pixel(0, y));
            assert_eq!(carved.get_pixel(1, y), image.get_pixel(1, y));
        }
    }

    #[test]
    fn remove_area_clears_every_masked_pixel() {
        let mut carver = SeamCarver::new(&numbered(4, 4)).unwrap();
        let doomed = Mask::rectangle(1, 1, 2, 2).unwrap();
        carver.remove_area(&doomed).unwrap();
        assert!(!carver.has_masked_pixels());
        assert!(carver.width() < 4);
        check_consistency(carver.mesh());
    }

    #[test]
    fn removing_the_whole_image_stops_at_the_floor() {
        let mut carver = SeamCarver::new(&uniform(3, 3, 50)).unwrap();
        let doomed = Mask::rectangle(0, 0, 2, 2).unwrap();
        assert_eq!(
            carver.remove_area(&doomed).unwrap_err(),
            CarveError::BelowMinimumSize
        );
    }

    #[test]
    fn replace_area_restores_the_dimensions() {
        let mut carver = SeamCarver::new(&numbered(6, 6)).unwrap();
        let doomed = Mask::rectangle(2, 2, 3, 3).unwrap();
        carver.replace_area(&doomed).unwrap();
        assert_eq!((carver.width(), carver.height()), (6, 6));
        assert!(!carver.has_masked_pixels());
        check_consistency(carver.mesh());
    }

    #[test]
    fn masks_must_fit_the_current_image() {
        let mut carver = SeamCarver::new(&numbered(4, 4)).unwrap();
        let oversized = Mask::rectangle(2, 2, 5, 5).unwrap();
        assert_eq!(
            carver.apply_mask(&oversized, MASK_ENERGY).unwrap_err(),
            CarveError::MaskOutOfBounds
        );
    }

    #[test]
    fn recording_stores_the_source_and_one_frame_per_seam() {
        let mut carver = SeamCarver::new(&numbered(6, 4)).unwrap().recording();
        carver.resize(4, 4).unwrap();
        let history = carver.history().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].dimensions(), (6, 4));
        assert_eq!(history[1].dimensions(), (5, 4));
        assert_eq!(history[2].dimensions(), (4, 4));
    }

    #[test]
    fn history_requires_recording() {
        let carver = SeamCarver::new(&numbered(3, 3)).unwrap();
        assert_eq!(
            carver.history().unwrap_err(),
            CarveError::RecordingDisabled
        );
    }

    #[test]
    fn energy_map_image_scales_to_the_maximum() {
        let mut carver = SeamCarver::new(&uniform(3, 3, 100)).unwrap();
        let map = carver.energy_map_image().unwrap();
        assert_eq!(map.dimensions(), (3, 3));
        // Corner 62.5 is the maximum, the center contributes nothing,
        // and an edge pixel sits at 37.5 / 62.5 of full white.
        assert_eq!(*map.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*map.get_pixel(1, 1), Rgb([0, 0, 0]));
        assert_eq!(*map.get_pixel(1, 0), Rgb([153, 153, 153]));
    }

    #[test]
    fn cost_matrix_image_scales_to_the_maximum() {
        let mut carver = SeamCarver::new(&uniform(3, 3, 100)).unwrap();
        let matrix = carver.cost_matrix_image(Orientation::Vertical).unwrap();
        assert_eq!(matrix.dimensions(), (3, 3));
        // Accumulation peaks at the bottom corners: 100 of 100.
        assert_eq!(*matrix.get_pixel(0, 2), Rgb([255, 255, 255]));
    }
}
