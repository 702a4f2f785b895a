//! Library for encoding/decoding classic Mac OS resource forks, and for
//! rasterizing the icon resources stored in them.
//!
//! A resource fork holds typed, numbered, optionally named blobs of data.
//! [`ResourceFork`] reads and writes the container itself; the [`icon`]
//! module turns `ICN#`, `ICON`, `ics#`, `SICN` and `cicn` resources into
//! pixels; and [`extract()`] runs the whole pipeline for a file that may be
//! wrapped in a MacBinary envelope.
//!
//! See Inside Macintosh: More Macintosh Toolbox, chapter 1, for the
//! resource fork layout.
//!
//! # Example
//!
//! ```
//! use rsrcfork::{OSType, Resource, ResourceFork};
//!
//! let mut fork = ResourceFork::new();
//! fork.resources.push(Resource::new(OSType(*b"ICN#"), 128, vec![0xFF; 256])
//!                         .with_name("Folder"));
//! let bytes = fork.to_bytes().unwrap();
//!
//! let extraction = rsrcfork::extract(&bytes).unwrap();
//! assert_eq!(extraction.icons.len(), 1);
//! assert_eq!(extraction.icons[0].pixels.width(), 32);
//! ```

#![warn(missing_docs)]

pub mod clut;
mod error;
pub mod extract;
mod fork;
pub mod icon;
mod image;
pub mod macbinary;
mod ostype;
pub mod pattern;
mod pixmap;
#[cfg(feature = "pngio")]
mod pngio;
mod resource;

pub use clut::{ColorEntry, ColorTable, FallbackPalettes};
pub use error::{DecodeWarning, Error, Result};
pub use extract::{extract, DecodedIcon, Extraction};
pub use fork::ResourceFork;
pub use icon::{IconPixels, MonoIcon};
pub use image::{Image, PixelFormat};
pub use ostype::{Encoding, IconType, OSType};
pub use pixmap::PixMapHeader;
pub use resource::Resource;
