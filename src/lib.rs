//! Library for packing pre-rendered images into Apple Icon Image (.icns) and
//! Windows icon (.ico) files.
//!
//! See https://en.wikipedia.org/wiki/Apple_Icon_Image_format and
//! https://en.wikipedia.org/wiki/ICO_(file_format) for more information
//! about the file formats.
//!
//! Images are opaque: each one is stored exactly as given (normally a PNG
//! file), under the entry its container's [`Registry`] declares for its
//! pixel size.  Nothing is decoded, resized or validated.
//!
//! # Example
//!
//! ```
//! use iconpack::{IcnsEncoder, IcoEncoder};
//!
//! let png_16: Vec<u8> = vec![0x89, b'P', b'N', b'G'];
//! let mut icns = IcnsEncoder::new();
//! icns.set_image(16, png_16.clone()).unwrap();
//! let mut ico = IcoEncoder::new();
//! ico.set_image(16, png_16).unwrap();
//!
//! let mut icns_bytes = Vec::new();
//! icns.encode(&mut icns_bytes).unwrap();
//! assert_eq!(&icns_bytes[..4], b"icns");
//! let mut ico_bytes = Vec::new();
//! ico.encode(&mut ico_bytes).unwrap();
//! assert_eq!(ico_bytes.len(), 6 + 16 + 4);
//! ```

#![warn(missing_docs)]

mod asset;
mod bytes;
mod encoder;
mod error;
pub mod export;
mod icns;
mod ico;
mod registry;

pub use asset::ImageAsset;
pub use bytes::{ByteWriter, Sink};
pub use encoder::{ContainerKind, Encoder};
pub use error::{Error, Result, UnregisteredPolicy};
pub use icns::IcnsEncoder;
pub use ico::IcoEncoder;
pub use registry::{FormatEntry, OSType, Registry};
