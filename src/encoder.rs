use std::fmt;
use std::io::Write;
use std::path::Path;

use super::asset::ImageAsset;
use super::error::{Result, UnregisteredPolicy};
use super::icns::IcnsEncoder;
use super::ico::IcoEncoder;
use super::registry::Registry;

/// The icon container formats this crate can write.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ContainerKind {
    /// Apple Icon Image.
    Icns,
    /// Windows icon.
    Ico,
}

impl ContainerKind {
    /// All container kinds, in the order the exporter writes them.
    pub const ALL: [ContainerKind; 2] = [ContainerKind::Icns, ContainerKind::Ico];

    /// Returns the file extension for this container kind (without a dot).
    pub fn extension(self) -> &'static str {
        match self {
            ContainerKind::Icns => "icns",
            ContainerKind::Ico => "ico",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(self.extension())
    }
}

/// An encoder for either container kind.
pub enum Encoder {
    /// Writes an ICNS file.
    Icns(IcnsEncoder),
    /// Writes an ICO file.
    Ico(IcoEncoder),
}

impl Encoder {
    /// Creates an empty encoder of the given kind, using its default
    /// registry.
    pub fn new(kind: ContainerKind) -> Encoder {
        match kind {
            ContainerKind::Icns => Encoder::Icns(IcnsEncoder::new()),
            ContainerKind::Ico => Encoder::Ico(IcoEncoder::new()),
        }
    }

    /// Creates an empty encoder of the given kind that treats unsupported
    /// sizes according to `policy`.
    pub fn with_policy(kind: ContainerKind, policy: UnregisteredPolicy) -> Encoder {
        match kind {
            ContainerKind::Icns => Encoder::Icns(IcnsEncoder::new().with_policy(policy)),
            ContainerKind::Ico => Encoder::Ico(IcoEncoder::new().with_policy(policy)),
        }
    }

    /// Returns the kind of container this encoder writes.
    pub fn kind(&self) -> ContainerKind {
        match *self {
            Encoder::Icns(_) => ContainerKind::Icns,
            Encoder::Ico(_) => ContainerKind::Ico,
        }
    }

    /// Returns the registry this encoder writes.
    pub fn registry(&self) -> &Registry {
        match *self {
            Encoder::Icns(ref encoder) => encoder.registry(),
            Encoder::Ico(ref encoder) => encoder.registry(),
        }
    }

    /// Adds the encoded image for the given size.
    pub fn set_image(&mut self, size: u32, data: Vec<u8>) -> Result<()> {
        match *self {
            Encoder::Icns(ref mut encoder) => encoder.set_image(size, data),
            Encoder::Ico(ref mut encoder) => encoder.set_image(size, data),
        }
    }

    /// Adds an image, as [`set_image`](#method.set_image) does.
    pub fn set_asset(&mut self, asset: ImageAsset) -> Result<()> {
        let size = asset.size();
        self.set_image(size, asset.into_data())
    }

    /// Returns true if an image of the given size will be written.
    pub fn has_image(&self, size: u32) -> bool {
        match *self {
            Encoder::Icns(ref encoder) => encoder.has_image(size),
            Encoder::Ico(ref encoder) => encoder.has_image(size),
        }
    }

    /// Returns the number of images that will be written.
    pub fn num_images(&self) -> usize {
        match *self {
            Encoder::Icns(ref encoder) => encoder.num_images(),
            Encoder::Ico(ref encoder) => encoder.num_images(),
        }
    }

    /// Returns the encoded length of the file, in bytes.
    pub fn total_length(&self) -> Result<u32> {
        match *self {
            Encoder::Icns(ref encoder) => encoder.total_length(),
            Encoder::Ico(ref encoder) => encoder.total_length(),
        }
    }

    /// Writes the container to `writer`.
    pub fn encode<W: Write>(&self, writer: W) -> Result<()> {
        match *self {
            Encoder::Icns(ref encoder) => encoder.encode(writer),
            Encoder::Ico(ref encoder) => encoder.encode(writer),
        }
    }

    /// Writes the container to `path`, creating or truncating it.
    pub fn write<P: AsRef<Path>>(self, path: P) -> Result<()> {
        match self {
            Encoder::Icns(encoder) => encoder.write(path),
            Encoder::Ico(encoder) => encoder.write(path),
        }
    }

    /// Writes the container to `path` by way of a temporary file.
    pub fn write_atomic<P: AsRef<Path>>(self, path: P) -> Result<()> {
        match self {
            Encoder::Icns(encoder) => encoder.write_atomic(path),
            Encoder::Ico(encoder) => encoder.write_atomic(path),
        }
    }
}

impl From<IcnsEncoder> for Encoder {
    fn from(encoder: IcnsEncoder) -> Encoder {
        Encoder::Icns(encoder)
    }
}

impl From<IcoEncoder> for Encoder {
    fn from(encoder: IcoEncoder) -> Encoder {
        Encoder::Ico(encoder)
    }
}
