mod library;
mod placeholder;
pub use library::{gallery_location, scan_gallery, ImageCatalog, ImageResource};
pub use placeholder::PlaceholderTexture;

use bevy::prelude::*;

use crate::config::{ConfigLoaded, GridConfig};

/// System set for catalog loading (the grid builds after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogLoaded;

pub struct CatalogPlugin;

impl Plugin for CatalogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ImageCatalog>().add_systems(
            Startup,
            (placeholder::setup_placeholder_texture, load_catalog)
                .chain()
                .after(ConfigLoaded)
                .in_set(CatalogLoaded),
        );
    }
}

/// Scan the gallery directory and start loading every image in it.
///
/// Loading is asynchronous; the preload gate watches the handles and keeps
/// the grid hidden until each one has either loaded or failed.
fn load_catalog(
    config: Res<GridConfig>,
    asset_server: Res<AssetServer>,
    mut catalog: ResMut<ImageCatalog>,
) {
    let (gallery_path, asset_prefix) = gallery_location(&config.data.gallery_dir);

    for resource in scan_gallery(&gallery_path, &asset_prefix) {
        let handle: Handle<Image> = asset_server.load(resource.path().to_owned());
        catalog.insert(resource, handle);
    }
    catalog.gallery_path = gallery_path;

    if catalog.is_empty() {
        warn!("No images found in {:?}", catalog.gallery_path);
    } else {
        info!(
            "Loading {} images from {:?}",
            catalog.len(),
            catalog.gallery_path
        );
    }
}
