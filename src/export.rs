//! Packing directories of pre-rendered images into icon files.
//!
//! An [`ImageSource`] supplies encoded images for a named app at each pixel
//! size it has.  [`export_app`] offers every image to one encoder per
//! container kind and writes `<app>.icns` / `<app>.ico` into the destination
//! directory.  Files already written are kept if a later one fails.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::asset::ImageAsset;
use super::encoder::{ContainerKind, Encoder};
use super::error::{Result, UnregisteredPolicy};

/// Provides already-rendered images for an app, one per pixel size.
pub trait ImageSource {
    /// Returns the sizes available for `app`, in ascending order.
    fn sizes(&self, app: &str) -> io::Result<Vec<u32>>;

    /// Returns the encoded image for `app` at `size`, or `None` if there is
    /// no such image.
    fn image(&self, app: &str, size: u32) -> io::Result<Option<Vec<u8>>>;
}

/// An [`ImageSource`] backed by a directory of `<app>_<size>.png` files.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Creates a source that reads images from `dir`.
    pub fn new<P: Into<PathBuf>>(dir: P) -> DirectorySource {
        DirectorySource { dir: dir.into() }
    }

    /// Returns the directory images are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the names of all apps with at least one image, sorted.
    pub fn apps(&self) -> io::Result<Vec<String>> {
        Ok(self.scan()?.into_keys().collect())
    }

    fn scan(&self) -> io::Result<BTreeMap<String, BTreeSet<u32>>> {
        let mut found: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            let file_name = dir_entry.file_name();
            let file_name = match file_name.to_str() {
                Some(name) => name,
                None => continue,
            };
            match parse_image_name(file_name) {
                Some((app, size)) => {
                    found.entry(app.to_string()).or_default().insert(size);
                }
                None if file_name.ends_with(".png") => {
                    warn!("ignoring {}: not named <app>_<size>.png", file_name);
                }
                None => {}
            }
        }
        Ok(found)
    }

    fn image_path(&self, app: &str, size: u32) -> PathBuf {
        self.dir.join(format!("{}_{}.png", app, size))
    }
}

impl ImageSource for DirectorySource {
    fn sizes(&self, app: &str) -> io::Result<Vec<u32>> {
        Ok(self.scan()?
            .remove(app)
            .map(|sizes| sizes.into_iter().collect())
            .unwrap_or_default())
    }

    fn image(&self, app: &str, size: u32) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.image_path(app, size)) {
            Ok(data) => Ok(Some(data)),
            Err(ref err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Splits a file name like `app_128.png` into its app name and size.  The
/// size must be written without leading zeros, so that the name can be
/// rebuilt from the app and size alone.
fn parse_image_name(file_name: &str) -> Option<(&str, u32)> {
    let stem = file_name.strip_suffix(".png")?;
    let (app, size) = stem.rsplit_once('_')?;
    if app.is_empty() || size.is_empty() || size.starts_with('0') ||
       !size.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    match size.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(size) => Some((app, size)),
    }
}

/// Where and how the exporter writes icon files.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Directory the icon files are written into.
    pub destination: PathBuf,
    /// What to do with images no container has a slot for.
    pub policy: UnregisteredPolicy,
    /// Write each file through a temporary file and rename it into place.
    pub atomic: bool,
    /// Which containers to write, in order.
    pub kinds: Vec<ContainerKind>,
}

impl ExportOptions {
    /// Options that write both container kinds into `destination`, skipping
    /// unsupported sizes and writing files in place.
    pub fn new<P: Into<PathBuf>>(destination: P) -> ExportOptions {
        ExportOptions {
            destination: destination.into(),
            policy: UnregisteredPolicy::default(),
            atomic: false,
            kinds: ContainerKind::ALL.to_vec(),
        }
    }

    /// Returns the path the given container for `app` is written to.
    pub fn output_path(&self, app: &str, kind: ContainerKind) -> PathBuf {
        self.destination.join(format!("{}.{}", app, kind.extension()))
    }
}

/// Builds and writes every requested container for one app.  Returns the
/// paths written, in the order of `options.kinds`.
pub fn export_app<S>(source: &S, app: &str, options: &ExportOptions) -> Result<Vec<PathBuf>>
    where S: ImageSource + ?Sized
{
    let mut encoders: Vec<Encoder> = options.kinds
        .iter()
        .map(|&kind| Encoder::with_policy(kind, options.policy))
        .collect();
    for size in source.sizes(app)? {
        let data = match source.image(app, size)? {
            Some(data) => data,
            None => {
                warn!("{}: {}x{} image is listed but could not be found",
                      app,
                      size,
                      size);
                continue;
            }
        };
        let accepted = encoders.iter().any(|e| e.registry().contains(size));
        if !accepted {
            warn!("{}: no container has a slot for {}x{} images", app, size, size);
        }
        // An image nobody accepts still goes to every encoder, so that the
        // unregistered-size policy decides its fate.
        for encoder in encoders.iter_mut() {
            if !accepted || encoder.registry().contains(size) {
                encoder.set_asset(ImageAsset::new(size, data.clone()))?;
            }
        }
    }

    fs::create_dir_all(&options.destination)?;
    let mut written = Vec::with_capacity(encoders.len());
    for encoder in encoders {
        let path = options.output_path(app, encoder.kind());
        if encoder.num_images() == 0 {
            warn!("{}: writing {} with no images", app, path.display());
        }
        if options.atomic {
            encoder.write_atomic(&path)?;
        } else {
            encoder.write(&path)?;
        }
        written.push(path);
    }
    Ok(written)
}

/// Exports each app in turn, stopping at the first failure.
pub fn export_all<S>(source: &S, apps: &[String], options: &ExportOptions) -> Result<Vec<PathBuf>>
    where S: ImageSource + ?Sized
{
    let mut written = Vec::new();
    for app in apps {
        info!("exporting icons for {}", app);
        written.extend(export_app(source, app, options)?);
    }
    Ok(written)
}
