use std::io;

use thiserror::Error;

use super::encoder::ContainerKind;

/// Result type for icon container operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing an icon container.
#[derive(Debug, Error)]
pub enum Error {
    /// The output could not be opened, written, flushed or renamed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An image was offered for a size the container does not support, and
    /// the encoder was configured with [`UnregisteredPolicy::Reject`].
    #[error("{kind} containers have no entry for {size}x{size} images")]
    UnregisteredSize {
        /// The container the image was offered to.
        kind: ContainerKind,
        /// The rejected pixel size.
        size: u32,
    },

    /// A length, offset or count does not fit in its on-disk field.
    #[error("{what} ({value}) does not fit in its header field")]
    LengthOverflow {
        /// Which field overflowed.
        what: &'static str,
        /// The value that was too large.
        value: u64,
    },

    /// A registry entry declared a size of zero.
    #[error("registry entries must have a nonzero size")]
    ZeroSize,

    /// A registry declared the same pixel size twice.
    #[error("registry declares size {0} more than once")]
    DuplicateSize(u32),

    /// A registry entry has a size the container cannot express.
    #[error("{kind} containers cannot hold {size}x{size} images")]
    InvalidSize {
        /// The container the registry was meant for.
        kind: ContainerKind,
        /// The offending pixel size.
        size: u32,
    },

    /// An ICNS registry entry has no type tag.
    #[error("icns registry entry for size {0} has no type tag")]
    MissingTypeTag(u32),
}

/// What an encoder does with an image whose size is not in its registry.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum UnregisteredPolicy {
    /// Silently drop the image.
    #[default]
    Skip,
    /// Fail with [`Error::UnregisteredSize`].
    Reject,
}
