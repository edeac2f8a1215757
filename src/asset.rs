use tracing::debug;

use super::encoder::ContainerKind;
use super::error::{Error, Result, UnregisteredPolicy};
use super::registry::Registry;

/// A pre-rendered image for one pixel size.  The data is stored and written
/// exactly as given (typically a PNG file).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageAsset {
    size: u32,
    data: Vec<u8>,
}

impl ImageAsset {
    /// Creates an asset for square images with the given edge length.
    pub fn new(size: u32, data: Vec<u8>) -> ImageAsset {
        ImageAsset { size, data }
    }

    /// Returns the edge length of the image, in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the asset and returns its data.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// The images accepted by one encoder, keyed by size.
#[derive(Clone, Debug, Default)]
pub(crate) struct AssetStore {
    assets: Vec<ImageAsset>,
}

impl AssetStore {
    /// Stores `asset` if `registry` has an entry for its size.  Otherwise
    /// the asset is dropped or rejected according to `policy`.
    pub(crate) fn offer(&mut self,
                        registry: &Registry,
                        policy: UnregisteredPolicy,
                        kind: ContainerKind,
                        asset: ImageAsset)
                        -> Result<()> {
        if registry.contains(asset.size) {
            self.insert(asset);
            return Ok(());
        }
        match policy {
            UnregisteredPolicy::Skip => {
                debug!("skipping {}x{} image: not a supported {} size",
                       asset.size,
                       asset.size,
                       kind);
                Ok(())
            }
            UnregisteredPolicy::Reject => {
                Err(Error::UnregisteredSize {
                    kind,
                    size: asset.size,
                })
            }
        }
    }

    /// Stores an asset, replacing any earlier asset of the same size.
    pub(crate) fn insert(&mut self, asset: ImageAsset) {
        match self.assets.iter_mut().find(|a| a.size == asset.size) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
    }

    pub(crate) fn get(&self, size: u32) -> Option<&ImageAsset> {
        self.assets.iter().find(|a| a.size == size)
    }

    pub(crate) fn len(&self) -> usize {
        self.assets.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
