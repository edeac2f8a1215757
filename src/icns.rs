use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use super::asset::{AssetStore, ImageAsset};
use super::bytes::{ByteWriter, Sink};
use super::encoder::ContainerKind;
use super::error::{Error, Result, UnregisteredPolicy};
use super::registry::{OSType, Registry};

/// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// The length of an icon element header, in bytes:
const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// Builds an Apple Icon Image (.icns) file out of pre-rendered images.
///
/// Each image is stored as one element, tagged with the OSType the registry
/// declares for its size.  Elements are written in registry order.
pub struct IcnsEncoder {
    registry: Registry,
    policy: UnregisteredPolicy,
    images: AssetStore,
}

/// One element of the icon family, borrowed from the encoder's images.
struct IconElement<'a> {
    ostype: OSType,
    data: &'a [u8],
}

impl<'a> IconElement<'a> {
    fn write<W: Write>(&self, mut writer: W, total_length: u32) -> Result<()> {
        let OSType(ref raw_ostype) = self.ostype;
        writer.put_bytes(raw_ostype)?;
        writer.put_u32_be(total_length)?;
        writer.put_bytes(self.data)?;
        Ok(())
    }
}

impl IcnsEncoder {
    /// Creates an empty encoder using the default ICNS registry.
    pub fn new() -> IcnsEncoder {
        IcnsEncoder {
            registry: Registry::icns(),
            policy: UnregisteredPolicy::default(),
            images: AssetStore::default(),
        }
    }

    /// Creates an empty encoder that writes the sizes and OSTypes of the
    /// given registry.  Returns an error if any entry has no OSType.
    pub fn with_registry(registry: Registry) -> Result<IcnsEncoder> {
        if let Some(entry) = registry.entries()
            .iter()
            .find(|entry| entry.ostype().is_none()) {
            return Err(Error::MissingTypeTag(entry.size()));
        }
        Ok(IcnsEncoder {
            registry,
            policy: UnregisteredPolicy::default(),
            images: AssetStore::default(),
        })
    }

    /// Sets what happens to images whose size is not in the registry.
    pub fn with_policy(mut self, policy: UnregisteredPolicy) -> IcnsEncoder {
        self.policy = policy;
        self
    }

    /// Returns the registry this encoder writes.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Adds the encoded image for the given size, replacing any earlier image
    /// of that size.  Images of unsupported sizes are skipped, or rejected
    /// if the encoder was built with `UnregisteredPolicy::Reject`.
    pub fn set_image(&mut self, size: u32, data: Vec<u8>) -> Result<()> {
        self.images.offer(&self.registry,
                          self.policy,
                          ContainerKind::Icns,
                          ImageAsset::new(size, data))
    }

    /// Returns true if an image of the given size will be written.
    pub fn has_image(&self, size: u32) -> bool {
        self.images.get(size).is_some()
    }

    /// Returns the number of images that will be written.
    pub fn num_images(&self) -> usize {
        self.images.len()
    }

    /// Returns true if no images have been added.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> Result<u32> {
        family_length(self.elements().iter().map(|el| el.data.len() as u64))
    }

    /// Writes the icon family in ICNS format to `writer`.  The encoder is
    /// left untouched, so encoding the same images twice yields identical
    /// output.
    pub fn encode<W: Write>(&self, mut writer: W) -> Result<()> {
        let total_length = self.total_length()?;
        self.write_family(&mut writer, total_length)
    }

    /// Writes the ICNS file to `path`, creating or truncating it.
    pub fn write<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let total_length = self.total_length()?;
        let mut sink = Sink::create(path)?;
        self.write_family(&mut sink, total_length)?;
        self.finish(sink, total_length)
    }

    /// Writes the ICNS file to `path` by way of a temporary file, so `path`
    /// is never left holding a partial file.
    pub fn write_atomic<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let total_length = self.total_length()?;
        let mut sink = Sink::create_atomic(path)?;
        self.write_family(&mut sink, total_length)?;
        self.finish(sink, total_length)
    }

    fn finish(&self, sink: Sink, total_length: u32) -> Result<()> {
        let path = sink.path().to_path_buf();
        sink.finish()?;
        info!("wrote {} ({} images, {} bytes)",
              path.display(),
              self.num_images(),
              total_length);
        Ok(())
    }

    fn write_family<W: Write>(&self, writer: &mut W, total_length: u32) -> Result<()> {
        writer.put_bytes(ICNS_MAGIC_LITERAL)?;
        writer.put_u32_be(total_length)?;
        for element in self.elements() {
            // Bounded by the family length checked above.
            let element_length = ICON_ELEMENT_HEADER_LENGTH + element.data.len() as u32;
            debug!("icns element {}: {} bytes", element.ostype, element_length);
            element.write(writer.by_ref(), element_length)?;
        }
        Ok(())
    }

    /// The stored images in registry order.
    fn elements(&self) -> Vec<IconElement<'_>> {
        self.registry
            .entries()
            .iter()
            .filter_map(|entry| {
                let ostype = entry.ostype()?;
                let asset = self.images.get(entry.size())?;
                Some(IconElement {
                    ostype,
                    data: asset.data(),
                })
            })
            .collect()
    }
}

impl Default for IcnsEncoder {
    fn default() -> IcnsEncoder {
        IcnsEncoder::new()
    }
}

/// Computes the ICNS family length for elements with the given payload
/// lengths.
fn family_length<I: IntoIterator<Item = u64>>(data_lengths: I) -> Result<u32> {
    let mut length = u64::from(ICON_FAMILY_HEADER_LENGTH);
    for data_length in data_lengths {
        length += u64::from(ICON_ELEMENT_HEADER_LENGTH) + data_length;
    }
    u32::try_from(length).map_err(|_| {
        Error::LengthOverflow {
            what: "icns file length",
            value: length,
        }
    })
}
