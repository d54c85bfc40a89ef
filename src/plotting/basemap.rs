use crate::plotting::error::PlotError;
use crate::types::crs::Crs;
use geo::Rect;

/// A raster image covering `bounds`, stored row-major from the north-west corner as
/// packed RGB bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct BasemapTile {
    pub bounds: Rect<f64>,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl BasemapTile {
    /// The color of every pixel with its extent in map coordinates, as `(min, max, rgb)`.
    pub(crate) fn pixels(
        &self,
    ) -> Result<impl Iterator<Item = ((f64, f64), (f64, f64), [u8; 3])> + '_, PlotError> {
        let expected = self.width as usize * self.height as usize * 3;
        if self.width == 0 || self.height == 0 || self.rgb.len() != expected {
            return Err(PlotError::Basemap(format!(
                "tile of {}x{} pixels carries {} bytes, expected {}",
                self.width,
                self.height,
                self.rgb.len(),
                expected
            )));
        }
        let min = self.bounds.min();
        let max = self.bounds.max();
        let dx = (max.x - min.x) / self.width as f64;
        let dy = (max.y - min.y) / self.height as f64;
        let width = self.width as usize;
        Ok(self.rgb.chunks_exact(3).enumerate().map(move |(i, px)| {
            let (column, row) = ((i % width) as f64, (i / width) as f64);
            let x0 = min.x + column * dx;
            let y1 = max.y - row * dy;
            ((x0, y1 - dy), (x0 + dx, y1), [px[0], px[1], px[2]])
        }))
    }
}

/// Source of background imagery for station maps.
///
/// No implementation ships with the crate; wrap a tile server or a local raster.
pub trait Basemap {
    /// Tiles covering `bounds` (in `crs`), for a map of `size` pixels.
    fn tiles(
        &self,
        bounds: Rect<f64>,
        crs: Crs,
        size: (u32, u32),
    ) -> Result<Vec<BasemapTile>, PlotError>;

    /// Credit line drawn on the map when no attribution is passed explicitly.
    fn attribution(&self) -> Option<String> {
        None
    }
}
