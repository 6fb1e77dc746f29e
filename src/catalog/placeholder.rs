//! Placeholder texture for images that fail to load.
//!
//! A flat dark tile with a faint inset frame, so a broken image reads as an
//! empty slot rather than a hole in the grid.

use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

#[derive(Resource)]
pub struct PlaceholderTexture {
    pub handle: Handle<Image>,
}

/// Placeholder size in pixels. Sprites stretch it to the cell size.
pub const PLACEHOLDER_SIZE: u32 = 64;

const FILL: [u8; 4] = [38, 38, 42, 255];
const FRAME: [u8; 4] = [64, 64, 70, 255];

fn placeholder_pixels() -> Vec<u8> {
    let size = PLACEHOLDER_SIZE as usize;
    let mut data = vec![0u8; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;
            // 1px frame, inset by 4px
            let on_frame = (x == 4 || x == size - 5 || y == 4 || y == size - 5)
                && (4..size - 4).contains(&x)
                && (4..size - 4).contains(&y);
            let color = if on_frame { FRAME } else { FILL };
            data[idx..idx + 4].copy_from_slice(&color);
        }
    }
    data
}

pub fn create_placeholder_image() -> Image {
    Image::new(
        Extent3d {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        placeholder_pixels(),
        TextureFormat::Rgba8UnormSrgb,
        default(),
    )
}

pub fn setup_placeholder_texture(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let handle = images.add(create_placeholder_image());
    commands.insert_resource(PlaceholderTexture { handle });
}
