use bevy::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque handle to one picture: its asset path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageResource {
    path: String,
}

impl ImageResource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ImageResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Every image available to the grid, with the handle Bevy loads it through.
#[derive(Resource, Default)]
pub struct ImageCatalog {
    pub gallery_path: PathBuf,
    resources: Vec<ImageResource>,
    handles: HashMap<ImageResource, Handle<Image>>,
}

impl ImageCatalog {
    pub fn resources(&self) -> &[ImageResource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn handle(&self, resource: &ImageResource) -> Option<&Handle<Image>> {
        self.handles.get(resource)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ImageResource, &Handle<Image>)> {
        self.resources
            .iter()
            .filter_map(|r| self.handles.get(r).map(|h| (r, h)))
    }

    pub fn insert(&mut self, resource: ImageResource, handle: Handle<Image>) {
        if self.handles.insert(resource.clone(), handle).is_none() {
            self.resources.push(resource);
        }
    }
}

/// Where the gallery lives on disk and how its files are addressed as assets.
///
/// Relative directories are resolved against Bevy's `assets/` folder and keep
/// relative asset paths; absolute directories are loaded by absolute path.
pub fn gallery_location(gallery_dir: &Path) -> (PathBuf, String) {
    if gallery_dir.is_absolute() {
        (
            gallery_dir.to_path_buf(),
            gallery_dir.to_string_lossy().into_owned(),
        )
    } else {
        (
            crate::paths::bundled_assets_dir().join(gallery_dir),
            gallery_dir.to_string_lossy().replace('\\', "/"),
        )
    }
}

/// List the images in `dir`, sorted by file name, as asset paths under
/// `asset_prefix`. A missing or unreadable directory yields nothing.
pub fn scan_gallery(dir: &Path, asset_prefix: &str) -> Vec<ImageResource> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read gallery directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .filter_map(|path| path.file_name()?.to_str().map(str::to_owned))
        .collect();
    names.sort();

    let prefix = asset_prefix.trim_end_matches('/');
    names
        .into_iter()
        .map(|name| {
            if prefix.is_empty() {
                ImageResource::new(name)
            } else {
                ImageResource::new(format!("{}/{}", prefix, name))
            }
        })
        .collect()
}

pub fn is_image_file(path: &Path) -> bool {
    let extensions = ["png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff", "tif"];

    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
