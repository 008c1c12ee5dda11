// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An immutable (x, y) position on the image grid.

/// A position on the image grid.  Seams record one of these per pixel
/// at search time, and masks are sets of them; both outlive the mesh
/// surgery that invalidates the positions themselves, which is the
/// point: the adjuster re-maps stale coordinates onto the grown mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    pub fn new(x: u32, y: u32) -> Self {
        Coordinate { x, y }
    }
}
