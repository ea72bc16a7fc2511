use super::RenderError;
use crate::grid::Position;
use image::{Rgb, RgbImage};

/// Sub-samples per pixel edge used to anti-alias shape edges.
pub const SUBDIVS: usize = 3;

const CHANNELS: usize = 3;

/// Half-open pixel rectangle `[xmin, xmax) × [ymin, ymax)` covered by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub xmin: u32,
    pub xmax: u32,
    pub ymin: u32,
    pub ymax: u32,
}

impl TileRect {
    /// Rectangle of the cell at `pos`; `None` if it is not addressable in `u32` pixels.
    pub fn for_cell(pos: Position, tile_size: u32) -> Option<Self> {
        let x = u32::try_from(pos.x).ok()?;
        let y = u32::try_from(pos.y).ok()?;
        Some(Self {
            xmin: x.checked_mul(tile_size)?,
            xmax: x.checked_add(1)?.checked_mul(tile_size)?,
            ymin: y.checked_mul(tile_size)?,
            ymax: y.checked_add(1)?.checked_mul(tile_size)?,
        })
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        (self.xmin..self.xmax).contains(&px) && (self.ymin..self.ymax).contains(&py)
    }
}

/// Mutable view of one square tile inside a row-major RGB buffer.
///
/// Coordinates passed to [`TileMut::get`] and [`TileMut::put`] are local to the
/// tile; nothing outside it can be written through the view.
pub struct TileMut<'a> {
    data: &'a mut [u8],
    stride: usize,
    x0: usize,
    y0: usize,
    size: usize,
}

impl<'a> TileMut<'a> {
    /// View of the cell at `pos` in `img`. Fails if the tile does not fit entirely.
    pub fn new(img: &'a mut RgbImage, pos: Position, tile_size: u32) -> Result<Self, RenderError> {
        let (width, height) = img.dimensions();
        let outside = RenderError::TileOutsideImage {
            x: pos.x,
            y: pos.y,
            tile_size,
            width,
            height,
        };
        let rect = TileRect::for_cell(pos, tile_size).ok_or_else(|| outside.clone())?;
        if rect.xmax > width || rect.ymax > height {
            return Err(outside);
        }
        Ok(Self {
            data: &mut **img,
            stride: width as usize * CHANNELS,
            x0: rect.xmin as usize,
            y0: rect.ymin as usize,
            size: tile_size as usize,
        })
    }

    /// View of tile column `col` inside a band of `size` image rows.
    pub(crate) fn in_band(band: &'a mut [u8], stride: usize, col: usize, size: usize) -> Self {
        debug_assert!(band.len() >= stride * size);
        debug_assert!((col + 1) * size * CHANNELS <= stride);
        Self {
            data: band,
            stride,
            x0: col * size,
            y0: 0,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn offset(&self, px: usize, py: usize) -> usize {
        debug_assert!(px < self.size && py < self.size);
        (self.y0 + py) * self.stride + (self.x0 + px) * CHANNELS
    }

    #[inline]
    pub fn get(&self, px: usize, py: usize) -> Rgb<u8> {
        let idx = self.offset(px, py);
        Rgb([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    #[inline]
    pub fn put(&mut self, px: usize, py: usize, color: Rgb<u8>) {
        let idx = self.offset(px, py);
        self.data[idx..idx + CHANNELS].copy_from_slice(&color.0);
    }

    /// Sets every pixel of the tile to `color`.
    pub fn fill(&mut self, color: Rgb<u8>) {
        for py in 0..self.size {
            let start = self.offset(0, py);
            for px in self.data[start..start + self.size * CHANNELS].chunks_exact_mut(CHANNELS) {
                px.copy_from_slice(&color.0);
            }
        }
    }
}

/// Shape test for a disc centred at `(cx, cy)` in normalized tile coordinates.
pub fn point_in_circle(cx: f32, cy: f32, r: f32) -> impl Fn(f32, f32) -> bool {
    move |x, y| (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r * r
}

/// Shape test for the closed rectangle `[xmin, xmax] × [ymin, ymax]`.
pub fn point_in_rect(xmin: f32, xmax: f32, ymin: f32, ymax: f32) -> impl Fn(f32, f32) -> bool {
    move |x, y| x >= xmin && x <= xmax && y >= ymin && y <= ymax
}

#[inline]
fn blend(base: Rgb<u8>, over: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    if coverage >= 1.0 {
        return over;
    }
    let mix = |b: u8, o: u8| (b as f32 * (1.0 - coverage) + o as f32 * coverage).round() as u8;
    Rgb([
        mix(base[0], over[0]),
        mix(base[1], over[1]),
        mix(base[2], over[2]),
    ])
}

/// Paints `color` over the part of the tile where `shape` holds.
///
/// Each pixel is sampled on a `SUBDIVS × SUBDIVS` lattice; the fraction of
/// samples inside the shape blends `color` over the base. With `bg` set, the
/// base is `bg` and every pixel of the tile is written; without it, the base is
/// the current pixel and pixels the shape misses are left alone.
pub fn fill_coords(
    tile: &mut TileMut<'_>,
    shape: impl Fn(f32, f32) -> bool,
    color: Rgb<u8>,
    bg: Option<Rgb<u8>>,
) {
    let size = tile.size() as f32;
    let step = 1.0 / SUBDIVS as f32;
    let samples = (SUBDIVS * SUBDIVS) as f32;
    for py in 0..tile.size() {
        for px in 0..tile.size() {
            let mut hits = 0usize;
            for sy in 0..SUBDIVS {
                let y = (py as f32 + (sy as f32 + 0.5) * step) / size;
                for sx in 0..SUBDIVS {
                    let x = (px as f32 + (sx as f32 + 0.5) * step) / size;
                    if shape(x, y) {
                        hits += 1;
                    }
                }
            }
            let base = match bg {
                Some(bg) => bg,
                None if hits == 0 => continue,
                None => tile.get(px, py),
            };
            tile.put(px, py, blend(base, color, hits as f32 / samples));
        }
    }
}

/// Paints `color` on every pixel whose centre lies inside `shape`.
///
/// No blending: a pixel is either fully `color` or left alone. Used for the
/// grid lines, which must keep their exact tone at every tile size.
pub fn fill_pixel_centers(
    tile: &mut TileMut<'_>,
    shape: impl Fn(f32, f32) -> bool,
    color: Rgb<u8>,
) {
    let size = tile.size() as f32;
    for py in 0..tile.size() {
        let y = (py as f32 + 0.5) / size;
        for px in 0..tile.size() {
            if shape((px as f32 + 0.5) / size, y) {
                tile.put(px, py, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    #[test]
    fn tile_rect_is_half_open_and_uses_x_for_columns() {
        let rect = TileRect::for_cell(Position::new(2, 1), 10).unwrap();
        assert_eq!(
            rect,
            TileRect {
                xmin: 20,
                xmax: 30,
                ymin: 10,
                ymax: 20
            }
        );
        assert!(rect.contains(29, 19));
        assert!(!rect.contains(30, 19));
        assert!(!rect.contains(29, 20));
    }

    #[test]
    fn view_rejects_tiles_past_the_image_edge() {
        let mut img = RgbImage::new(16, 8);
        assert!(TileMut::new(&mut img, Position::new(1, 0), 8).is_ok());
        assert!(matches!(
            TileMut::new(&mut img, Position::new(0, 1), 8),
            Err(RenderError::TileOutsideImage { x: 0, y: 1, .. })
        ));
    }

    #[test]
    fn put_addresses_local_coordinates() {
        let mut img = RgbImage::new(8, 8);
        {
            let mut tile = TileMut::new(&mut img, Position::new(1, 1), 4).unwrap();
            tile.put(0, 0, RED);
            tile.put(3, 2, BLUE);
        }
        assert_eq!(*img.get_pixel(4, 4), RED);
        assert_eq!(*img.get_pixel(7, 6), BLUE);
        assert_eq!(img.pixels().filter(|p| **p != Rgb([0, 0, 0])).count(), 2);
    }

    #[test]
    fn shape_without_background_leaves_misses_untouched() {
        let mut img = RgbImage::from_pixel(10, 10, BLUE);
        {
            let mut tile = TileMut::new(&mut img, Position::new(0, 0), 10).unwrap();
            fill_coords(&mut tile, point_in_rect(0.0, 0.5, 0.0, 1.0), RED, None);
        }
        assert_eq!(*img.get_pixel(0, 5), RED);
        assert_eq!(*img.get_pixel(4, 9), RED);
        assert_eq!(*img.get_pixel(5, 0), BLUE);
        assert_eq!(*img.get_pixel(9, 9), BLUE);
    }

    #[test]
    fn circle_edge_is_blended_with_background() {
        let mut img = RgbImage::new(32, 32);
        {
            let mut tile = TileMut::new(&mut img, Position::new(0, 0), 32).unwrap();
            fill_coords(&mut tile, point_in_circle(0.5, 0.5, 0.25), RED, Some(BLUE));
        }
        assert_eq!(*img.get_pixel(16, 16), RED);
        assert_eq!(*img.get_pixel(0, 0), BLUE);
        let edge_blends = img
            .pixels()
            .filter(|p| **p != RED && **p != BLUE)
            .count();
        assert!(edge_blends > 0, "anti-aliased rim expected");
        for p in img.pixels() {
            assert_eq!(p[1], 0, "blend stays on the red/blue line");
        }
    }

    #[test]
    fn center_fill_never_blends() {
        let mut img = RgbImage::from_pixel(20, 20, BLUE);
        {
            let mut tile = TileMut::new(&mut img, Position::new(0, 0), 20).unwrap();
            fill_pixel_centers(&mut tile, point_in_rect(0.0, 0.031, 0.0, 1.0), RED);
        }
        // 0.5 / 20 = 0.025 lies inside the strip, 1.5 / 20 does not.
        assert!((0..20).all(|y| *img.get_pixel(0, y) == RED));
        assert!(img
            .enumerate_pixels()
            .filter(|(x, _, _)| *x > 0)
            .all(|(_, _, p)| *p == BLUE));
    }
}
