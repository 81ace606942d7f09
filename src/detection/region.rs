//! Dominant connected region selection
//!
//! Picks the external contour with the largest enclosed area and rasterises
//! its filled interior, including any holes inside it.

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashSet;

/// Enclosed polygon area of a contour (shoelace formula)
pub fn contour_area(contour: &Contour<i32>) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice_area.abs() as f64 / 2.0
}

/// Copy of `mask` inside a one-pixel zero frame.
///
/// Border following only starts on a background-to-foreground transition, so
/// regions touching the image edge need the frame to be traced at all.
fn pad_mask(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    GrayImage::from_fn(width + 2, height + 2, |x, y| {
        if x == 0 || y == 0 || x > width || y > height {
            Luma([0])
        } else {
            *mask.get_pixel(x - 1, y - 1)
        }
    })
}

/// Find the external contour with the greatest area.
///
/// Contours are visited in raster order; on ties the first one found wins.
/// Returned points are in `mask` coordinates.
pub fn largest_external_contour(mask: &GrayImage) -> Option<Contour<i32>> {
    let mut best: Option<(f64, Contour<i32>)> = None;
    for contour in find_contours::<i32>(&pad_mask(mask)) {
        if !matches!(contour.border_type, BorderType::Outer) || contour.parent.is_some() {
            continue;
        }
        let area = contour_area(&contour);
        if best.as_ref().map_or(true, |(best_area, _)| area > *best_area) {
            best = Some((area, contour));
        }
    }
    best.map(|(_, mut contour)| {
        for point in &mut contour.points {
            point.x -= 1;
            point.y -= 1;
        }
        contour
    })
}

/// Rasterise the filled interior of the region traced by `contour`.
///
/// The region is the 8-connected component the contour bounds. Pixels outside
/// it are split into 4-connected components; those touching the image border
/// lie outside the region, the rest are holes and get filled.
pub fn fill_region(mask: &GrayImage, contour: &Contour<i32>) -> GrayImage {
    let (width, height) = mask.dimensions();
    let mut filled = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return filled;
    }

    let Some(seed) = contour.points.first() else {
        return filled;
    };
    if seed.x < 0 || seed.y < 0 || seed.x as u32 >= width || seed.y as u32 >= height {
        return filled;
    }
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    let region = labels.get_pixel(seed.x as u32, seed.y as u32)[0];
    if region == 0 {
        return filled;
    }

    let complement = GrayImage::from_fn(width, height, |x, y| {
        Luma([if labels.get_pixel(x, y)[0] == region { 0 } else { 255 }])
    });
    let gaps = connected_components(&complement, Connectivity::Four, Luma([0u8]));

    let mut outside = HashSet::new();
    for x in 0..width {
        outside.insert(gaps.get_pixel(x, 0)[0]);
        outside.insert(gaps.get_pixel(x, height - 1)[0]);
    }
    for y in 0..height {
        outside.insert(gaps.get_pixel(0, y)[0]);
        outside.insert(gaps.get_pixel(width - 1, y)[0]);
    }
    // Label 0 is the region itself
    outside.remove(&0);

    for (x, y, pixel) in filled.enumerate_pixels_mut() {
        if !outside.contains(&gaps.get_pixel(x, y)[0]) {
            *pixel = Luma([255]);
        }
    }
    filled
}
