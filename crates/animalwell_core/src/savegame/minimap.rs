use image::DynamicImage;

use crate::codec::{BitmapGeometry, EncodeOptions, IndexedImage, Palette, decode_region, quantize};
use crate::composite::CompositeBuilder;
use crate::error::{Result, SaveError};
use crate::field::RawBytesField;
use crate::store::BufferStore;

pub const ROOM_WIDTH: u32 = 40;
pub const ROOM_HEIGHT: u32 = 22;
pub const ROOM_BYTE_WIDTH: usize = ROOM_WIDTH as usize / 8;

// The stored map has padding rooms around the playable 16x16 area.
pub const MAP_ROOMS_X: u32 = 20;
pub const MAP_ROOMS_Y: u32 = 24;
pub const MAP_BYTE_WIDTH: usize = ROOM_BYTE_WIDTH * MAP_ROOMS_X as usize;
pub const MAP_BYTES_PER_ROOM_ROW: usize = MAP_BYTE_WIDTH * ROOM_HEIGHT as usize;
pub const MAP_BYTES: usize = MAP_BYTES_PER_ROOM_ROW * MAP_ROOMS_Y as usize;

pub const PLAYABLE_ROOMS_X: u32 = 16;
pub const PLAYABLE_ROOMS_Y: u32 = 16;
pub const PLAYABLE_START: (u32, u32) = (2, 4);

/// Which part of the map an imported image covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinimapTarget {
    /// 800x528, padding rooms included.
    #[default]
    Full,
    /// 640x352, the 16x16 rooms from (2, 4).
    Playable,
}

impl MinimapTarget {
    pub fn geometry(self) -> BitmapGeometry {
        match self {
            Self::Full => Minimap::GEOMETRY,
            Self::Playable => BitmapGeometry::new(
                ROOM_WIDTH * PLAYABLE_ROOMS_X,
                ROOM_HEIGHT * PLAYABLE_ROOMS_Y,
                1,
            ),
        }
    }
}

/// One 1-bit minimap layer (revealed rooms, pencil drawings or destroyed
/// blocks). Edits work on whole rooms at the smallest.
#[derive(Debug, Clone, Copy)]
pub struct Minimap {
    data: RawBytesField,
}

impl Minimap {
    pub const GEOMETRY: BitmapGeometry =
        BitmapGeometry::new(ROOM_WIDTH * MAP_ROOMS_X, ROOM_HEIGHT * MAP_ROOMS_Y, 1);

    pub(crate) fn declare(b: &mut CompositeBuilder<'_>, label: &'static str) -> Self {
        Self {
            data: b.raw(label, MAP_BYTES),
        }
    }

    pub fn field(&self) -> RawBytesField {
        self.data
    }

    pub fn fill_room(&self, store: &mut BufferStore, x: u32, y: u32) -> Result<()> {
        self.paint_room(store, x, y, 0xFF)
    }

    pub fn clear_room(&self, store: &mut BufferStore, x: u32, y: u32) -> Result<()> {
        self.paint_room(store, x, y, 0x00)
    }

    pub fn fill_map(&self, store: &mut BufferStore, playable_only: bool) -> Result<()> {
        self.paint_map(store, playable_only, 0xFF)
    }

    pub fn clear_map(&self, store: &mut BufferStore, playable_only: bool) -> Result<()> {
        self.paint_map(store, playable_only, 0x00)
    }

    /// Number of set pixels, used for the info report.
    pub fn lit_pixels(&self, store: &BufferStore) -> Result<u32> {
        Ok(self
            .data
            .read(store)?
            .iter()
            .map(|byte| byte.count_ones())
            .sum())
    }

    /// Always the full 800x528 map.
    pub fn export_image(&self, store: &BufferStore) -> Result<IndexedImage> {
        decode_region(self.data.read(store)?, Self::GEOMETRY, &Palette::monochrome())
    }

    pub fn export_png(&self, store: &BufferStore) -> Result<Vec<u8>> {
        self.export_image(store)?.encode_png()
    }

    pub fn import_image(
        &self,
        store: &mut BufferStore,
        image: &DynamicImage,
        target: MinimapTarget,
        options: &EncodeOptions,
    ) -> Result<()> {
        let geometry = target.geometry();
        let indices = quantize(image, geometry, &Palette::monochrome(), options)?;

        let mut grid = self.data.read(store)?.to_vec();
        let (x, y) = match target {
            MinimapTarget::Full => (0, 0),
            MinimapTarget::Playable => (
                PLAYABLE_START.0 * ROOM_WIDTH,
                PLAYABLE_START.1 * ROOM_HEIGHT,
            ),
        };
        geometry.pack_window(&indices, &mut grid, MAP_BYTE_WIDTH, x, y)?;
        self.data.write(store, &grid)?;
        tracing::info!(layer = self.data.info().label, ?target, "imported minimap image");
        Ok(())
    }

    fn room_start(&self, x: u32, y: u32) -> usize {
        self.data.info().offset + y as usize * MAP_BYTES_PER_ROOM_ROW + x as usize * ROOM_BYTE_WIDTH
    }

    fn paint_room(&self, store: &mut BufferStore, x: u32, y: u32, byte: u8) -> Result<()> {
        check_room("room x", x, MAP_ROOMS_X)?;
        check_room("room y", y, MAP_ROOMS_Y)?;
        self.paint_rows(store, self.room_start(x, y), ROOM_BYTE_WIDTH, ROOM_HEIGHT as usize, byte)
    }

    fn paint_map(&self, store: &mut BufferStore, playable_only: bool, byte: u8) -> Result<()> {
        if playable_only {
            let (x, y) = PLAYABLE_START;
            self.paint_rows(
                store,
                self.room_start(x, y),
                ROOM_BYTE_WIDTH * PLAYABLE_ROOMS_X as usize,
                (ROOM_HEIGHT * PLAYABLE_ROOMS_Y) as usize,
                byte,
            )
        } else {
            self.data.fill(store, byte)
        }
    }

    fn paint_rows(
        &self,
        store: &mut BufferStore,
        start: usize,
        row_len: usize,
        rows: usize,
        byte: u8,
    ) -> Result<()> {
        for row in 0..rows {
            store.fill(start + row * MAP_BYTE_WIDTH, row_len, byte)?;
        }
        Ok(())
    }
}

fn check_room(label: &'static str, value: u32, limit: u32) -> Result<()> {
    if value >= limit {
        return Err(SaveError::Range {
            label,
            value: i128::from(value),
            min: 0,
            max: i128::from(limit) - 1,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn layer() -> (BufferStore, Minimap) {
        let mut layout = Layout::new();
        let mut root = CompositeBuilder::root(&mut layout, "Test");
        let map = Minimap::declare(&mut root, "Minimap");
        (BufferStore::new(vec![0u8; MAP_BYTES]), map)
    }

    #[test]
    fn map_dimensions() {
        assert_eq!(MAP_BYTES, 52_800);
        assert_eq!(Minimap::GEOMETRY.byte_len(), MAP_BYTES);
        assert_eq!(MinimapTarget::Playable.geometry().width, 640);
        assert_eq!(MinimapTarget::Playable.geometry().height, 352);
    }

    #[test]
    fn fill_room_touches_only_that_room() {
        let (mut store, map) = layer();
        map.fill_room(&mut store, 3, 5).expect("room in range");
        assert_eq!(map.lit_pixels(&store).expect("count"), 40 * 22);
        let start = 5 * MAP_BYTES_PER_ROOM_ROW + 3 * ROOM_BYTE_WIDTH;
        assert_eq!(store.as_bytes()[start], 0xFF);
        assert_eq!(store.as_bytes()[start + ROOM_BYTE_WIDTH], 0x00);
        assert!(map.fill_room(&mut store, 20, 0).is_err());
    }

    #[test]
    fn playable_fill_leaves_padding_alone() {
        let (mut store, map) = layer();
        map.fill_map(&mut store, true).expect("fill");
        assert_eq!(map.lit_pixels(&store).expect("count"), 640 * 352);
        assert_eq!(store.as_bytes()[0], 0);

        map.clear_map(&mut store, false).expect("clear");
        assert_eq!(map.lit_pixels(&store).expect("count"), 0);
    }
}
