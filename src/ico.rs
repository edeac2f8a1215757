use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use super::asset::{AssetStore, ImageAsset};
use super::bytes::{ByteWriter, Sink};
use super::encoder::ContainerKind;
use super::error::{Error, Result, UnregisteredPolicy};
use super::registry::Registry;

/// The length of the ICONDIR header, in bytes:
const ICON_DIR_LENGTH: u32 = 6;

/// The length of one ICONDIRENTRY record, in bytes:
const ICON_DIR_ENTRY_LENGTH: u32 = 16;

/// The ICONDIR resource type for icons (as opposed to cursors, which are 2).
const RESOURCE_TYPE_ICON: u32 = 1;

/// The largest edge length an ICONDIRENTRY can describe.
const MAX_SIZE: u32 = 256;

/// Builds a Windows icon (.ico) file out of pre-rendered images.
///
/// The file is a directory of entries followed by the image payloads, both in
/// registry order.  Payloads are stored as given; entries declare zero bits
/// per pixel, marking them as PNG data rather than bitmaps.
pub struct IcoEncoder {
    registry: Registry,
    policy: UnregisteredPolicy,
    images: AssetStore,
}

/// One directory entry together with the payload it points at.
struct IconDirEntry<'a> {
    size: u32,
    data: &'a [u8],
    offset: u32,
}

impl<'a> IconDirEntry<'a> {
    fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let dimension = if self.size < MAX_SIZE { self.size } else { 0 };
        writer.put_u8(dimension)?; // width
        writer.put_u8(dimension)?; // height
        writer.put_u8(0)?; // no color palette
        writer.put_u8(0)?; // reserved
        writer.put_u16_le(0)?; // color planes
        writer.put_u16_le(0)?; // bits per pixel, 0 for PNG
        // Bounded by the file length checked in directory_layout.
        writer.put_u32_le(self.data.len() as u32)?;
        writer.put_u32_le(self.offset)?;
        Ok(())
    }
}

impl IcoEncoder {
    /// Creates an empty encoder using the default ICO registry.
    pub fn new() -> IcoEncoder {
        IcoEncoder {
            registry: Registry::ico(),
            policy: UnregisteredPolicy::default(),
            images: AssetStore::default(),
        }
    }

    /// Creates an empty encoder that writes the sizes of the given registry,
    /// in its order.  Returns an error if any size is larger than 256, which
    /// an ICO directory entry cannot express.
    pub fn with_registry(registry: Registry) -> Result<IcoEncoder> {
        if let Some(entry) = registry.entries()
            .iter()
            .find(|entry| entry.size() > MAX_SIZE) {
            return Err(Error::InvalidSize {
                kind: ContainerKind::Ico,
                size: entry.size(),
            });
        }
        Ok(IcoEncoder {
            registry,
            policy: UnregisteredPolicy::default(),
            images: AssetStore::default(),
        })
    }

    /// Sets what happens to images whose size is not in the registry.
    pub fn with_policy(mut self, policy: UnregisteredPolicy) -> IcoEncoder {
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
                          ContainerKind::Ico,
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

    /// Returns the encoded length of the file, in bytes.
    pub fn total_length(&self) -> Result<u32> {
        Ok(self.layout()?.1)
    }

    /// Writes the icon directory in ICO format to `writer`.  The encoder is
    /// left untouched, so encoding the same images twice yields identical
    /// output.
    pub fn encode<W: Write>(&self, mut writer: W) -> Result<()> {
        let (entries, _) = self.layout()?;
        write_icon_dir(&mut writer, &entries)
    }

    /// Writes the ICO file to `path`, creating or truncating it.
    pub fn write<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let (entries, total_length) = self.layout()?;
        let mut sink = Sink::create(path)?;
        write_icon_dir(&mut sink, &entries)?;
        finish(sink, entries.len(), total_length)
    }

    /// Writes the ICO file to `path` by way of a temporary file, so `path` is
    /// never left holding a partial file.
    pub fn write_atomic<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let (entries, total_length) = self.layout()?;
        let mut sink = Sink::create_atomic(path)?;
        write_icon_dir(&mut sink, &entries)?;
        finish(sink, entries.len(), total_length)
    }

    /// Resolves the directory entries, in registry order, and the total file
    /// length.
    fn layout(&self) -> Result<(Vec<IconDirEntry<'_>>, u32)> {
        let included: Vec<(u32, &[u8])> = self.registry
            .entries()
            .iter()
            .filter_map(|entry| {
                self.images
                    .get(entry.size())
                    .map(|asset| (entry.size(), asset.data()))
            })
            .collect();
        let lengths: Vec<u64> =
            included.iter().map(|&(_, data)| data.len() as u64).collect();
        let (offsets, total_length) = directory_layout(&lengths)?;
        let entries: Vec<IconDirEntry<'_>> = included.into_iter()
            .zip(offsets)
            .map(|((size, data), offset)| IconDirEntry { size, data, offset })
            .collect();
        Ok((entries, total_length))
    }
}

impl Default for IcoEncoder {
    fn default() -> IcoEncoder {
        IcoEncoder::new()
    }
}

fn write_icon_dir<W: Write>(writer: &mut W, entries: &[IconDirEntry]) -> Result<()> {
    writer.put_u16_le(0)?; // reserved
    writer.put_u16_le(RESOURCE_TYPE_ICON)?;
    writer.put_u16_le(entries.len() as u32)?;
    for entry in entries {
        debug!("ico entry {}x{}: {} bytes at offset {}",
               entry.size,
               entry.size,
               entry.data.len(),
               entry.offset);
        entry.write(writer.by_ref())?;
    }
    for entry in entries {
        writer.put_bytes(entry.data)?;
    }
    Ok(())
}

fn finish(sink: Sink, num_images: usize, total_length: u32) -> Result<()> {
    let path = sink.path().to_path_buf();
    sink.finish()?;
    info!("wrote {} ({} images, {} bytes)",
          path.display(),
          num_images,
          total_length);
    Ok(())
}

/// Computes the payload offset of each entry, given the payload lengths in
/// file order, along with the total file length.  The first payload starts
/// right after the directory and each following payload starts where the
/// previous one ends.
fn directory_layout(data_lengths: &[u64]) -> Result<(Vec<u32>, u32)> {
    if data_lengths.len() > usize::from(u16::MAX) {
        return Err(Error::LengthOverflow {
            what: "ico entry count",
            value: data_lengths.len() as u64,
        });
    }
    let mut offset = u64::from(ICON_DIR_LENGTH) +
                     u64::from(ICON_DIR_ENTRY_LENGTH) * data_lengths.len() as u64;
    let mut offsets = Vec::with_capacity(data_lengths.len());
    for &length in data_lengths {
        offsets.push(offset as u32);
        offset += length;
    }
    if offset > u64::from(u32::MAX) {
        return Err(Error::LengthOverflow {
            what: "ico file length",
            value: offset,
        });
    }
    Ok((offsets, offset as u32))
}
