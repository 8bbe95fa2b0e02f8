//! Loading a numbered image sequence into a slice stack
//!
//! Slices are read from a directory as `{prefix}{index}.{extension}`, decoded
//! to RGBA8, and kept in load order. Slice 0 is the top of the stack.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// File naming scheme of a slice sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceNaming {
    /// Text before the index, e.g. `"IM-0001-"`
    pub prefix: String,
    /// Index of the first file (usually 1)
    pub first_index: usize,
    /// Zero-pad the index to this many digits (0 = no padding)
    pub index_width: usize,
    /// Extension without the dot
    pub extension: String,
}

impl SliceNaming {
    /// `IM-0001-0001.jpg`, `IM-0001-0002.jpg`, ...
    pub fn dicom_export() -> Self {
        Self {
            prefix: "IM-0001-".to_string(),
            first_index: 1,
            index_width: 4,
            extension: "jpg".to_string(),
        }
    }

    /// `combined_1.jpg`, `combined_2.jpg`, ...
    pub fn combined() -> Self {
        Self {
            prefix: "combined_".to_string(),
            first_index: 1,
            index_width: 0,
            extension: "jpg".to_string(),
        }
    }

    /// File name of slice `index` (0-based)
    pub fn file_name(&self, index: usize) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            self.first_index + index,
            self.extension,
            width = self.index_width
        )
    }
}

/// Errors from building a slice stack
#[derive(Debug)]
pub enum SliceStackError {
    /// The slice directory could not be read
    Io(io::Error),
    /// A slice file could not be decoded
    Decode { path: PathBuf, source: image::ImageError },
    /// Not a single slice could be decoded
    NoSlices { directory: PathBuf },
    /// An in-memory slice differs in size from the first one
    DimensionMismatch {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },
}

impl fmt::Display for SliceStackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceStackError::Io(err) => write!(f, "Slice IO error: {}", err),
            SliceStackError::Decode { path, source } => {
                write!(f, "Failed to decode slice {}: {}", path.display(), source)
            }
            SliceStackError::NoSlices { directory } => {
                write!(f, "No slices could be loaded from {}", directory.display())
            }
            SliceStackError::DimensionMismatch { index, expected, found } => write!(
                f,
                "Slice {} is {}x{}, expected {}x{}",
                index, found.0, found.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for SliceStackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SliceStackError::Io(err) => Some(err),
            SliceStackError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for SliceStackError {
    fn from(err: io::Error) -> Self {
        SliceStackError::Io(err)
    }
}

/// Decode one slice file to RGBA8
pub fn decode_slice(path: &Path) -> Result<RgbaImage, SliceStackError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| SliceStackError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// An ordered stack of equally sized RGBA8 slices
#[derive(Debug, Clone)]
pub struct SliceStack {
    width: u32,
    height: u32,
    slices: Vec<RgbaImage>,
}

impl SliceStack {
    /// Load `count` slices from `directory`
    ///
    /// A slice that fails to decode is replaced by a transparent one so the
    /// remaining slices keep their depth. Slices whose size differs from the
    /// first decoded slice are resized to match it.
    pub fn load(directory: &Path, naming: &SliceNaming, count: usize) -> Result<Self, SliceStackError> {
        if !directory.is_dir() {
            return Err(SliceStackError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("slice directory {} does not exist", directory.display()),
            )));
        }

        let decoded: Vec<Option<RgbaImage>> = (0..count)
            .map(|i| {
                let path = directory.join(naming.file_name(i));
                match decode_slice(&path) {
                    Ok(img) => {
                        log::debug!("Loaded slice {} ({}x{})", path.display(), img.width(), img.height());
                        Some(img)
                    }
                    Err(e) => {
                        log::warn!("{}; using an empty slice", e);
                        None
                    }
                }
            })
            .collect();

        let (width, height) = decoded
            .iter()
            .flatten()
            .map(|img| img.dimensions())
            .next()
            .ok_or_else(|| SliceStackError::NoSlices {
                directory: directory.to_path_buf(),
            })?;

        let slices = decoded
            .into_iter()
            .enumerate()
            .map(|(i, slice)| match slice {
                Some(img) if img.dimensions() == (width, height) => img,
                Some(img) => {
                    log::warn!(
                        "Slice {} is {}x{}, resizing to {}x{}",
                        i, img.width(), img.height(), width, height
                    );
                    imageops::resize(&img, width, height, FilterType::Triangle)
                }
                None => RgbaImage::new(width, height),
            })
            .collect::<Vec<_>>();

        log::info!("Loaded {} slices of {}x{} from {}", slices.len(), width, height, directory.display());

        Ok(Self { width, height, slices })
    }

    /// Build a stack from already decoded images, which must share one size
    pub fn from_images(slices: Vec<RgbaImage>) -> Result<Self, SliceStackError> {
        let (width, height) = slices
            .first()
            .map(|img| img.dimensions())
            .ok_or_else(|| SliceStackError::NoSlices {
                directory: PathBuf::new(),
            })?;

        if let Some((index, img)) = slices
            .iter()
            .enumerate()
            .find(|(_, img)| img.dimensions() != (width, height))
        {
            return Err(SliceStackError::DimensionMismatch {
                index,
                expected: (width, height),
                found: img.dimensions(),
            });
        }

        Ok(Self { width, height, slices })
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Slice `index`, top of the stack first
    pub fn slice(&self, index: usize) -> Option<&RgbaImage> {
        self.slices.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RgbaImage> {
        self.slices.iter()
    }

    /// Stack the slices into one voxel volume, slice `i` becoming layer `i`
    pub fn to_volume(&self) -> Volume {
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 4 * self.len());
        for slice in self.iter() {
            data.extend_from_slice(slice.as_raw());
        }

        Volume {
            width: self.width,
            height: self.height,
            depth: self.len() as u32,
            data,
        }
    }
}

/// Dense RGBA8 voxel grid, layers stored contiguously
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, 0, 255 - value, 255]))
    }

    fn png_naming() -> SliceNaming {
        SliceNaming {
            prefix: "slice_".to_string(),
            first_index: 1,
            index_width: 2,
            extension: "png".to_string(),
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(SliceNaming::dicom_export().file_name(0), "IM-0001-0001.jpg");
        assert_eq!(SliceNaming::dicom_export().file_name(21), "IM-0001-0022.jpg");
        assert_eq!(SliceNaming::combined().file_name(0), "combined_1.jpg");
        assert_eq!(SliceNaming::combined().file_name(63), "combined_64.jpg");
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let naming = png_naming();
        for i in 0..3 {
            solid(4, 2, i as u8 * 100).save(dir.path().join(naming.file_name(i))).unwrap();
        }

        let stack = SliceStack::load(dir.path(), &naming, 3).unwrap();
        assert_eq!(stack.len(), 3);
        assert_eq!((stack.width(), stack.height()), (4, 2));
        assert_eq!(stack.slice(2).unwrap().get_pixel(0, 0), &Rgba([200, 0, 55, 255]));
    }

    #[test]
    fn test_missing_slice_becomes_transparent() {
        let dir = tempfile::tempdir().unwrap();
        let naming = png_naming();
        solid(4, 4, 10).save(dir.path().join(naming.file_name(0))).unwrap();
        solid(4, 4, 30).save(dir.path().join(naming.file_name(2))).unwrap();

        let stack = SliceStack::load(dir.path(), &naming, 3).unwrap();
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.slice(1).unwrap().get_pixel(1, 1), &Rgba([0, 0, 0, 0]));
        assert_eq!(stack.slice(2).unwrap().get_pixel(1, 1), &Rgba([30, 0, 225, 255]));
    }

    #[test]
    fn test_mismatched_slice_is_resized() {
        let dir = tempfile::tempdir().unwrap();
        let naming = png_naming();
        solid(8, 8, 0).save(dir.path().join(naming.file_name(0))).unwrap();
        solid(2, 2, 0).save(dir.path().join(naming.file_name(1))).unwrap();

        let stack = SliceStack::load(dir.path(), &naming, 2).unwrap();
        assert_eq!(stack.slice(1).unwrap().dimensions(), (8, 8));
    }

    #[test]
    fn test_all_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SliceStack::load(dir.path(), &png_naming(), 4).unwrap_err();
        assert!(matches!(err, SliceStackError::NoSlices { .. }));
        assert!(err.to_string().contains("No slices"));
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SliceStack::load(&dir.path().join("nope"), &png_naming(), 1).unwrap_err();
        assert!(matches!(err, SliceStackError::Io(_)));
    }

    #[test]
    fn test_from_images_rejects_mismatch() {
        let err = SliceStack::from_images(vec![solid(2, 2, 0), solid(3, 2, 0)]).unwrap_err();
        match err {
            SliceStackError::DimensionMismatch { index, expected, found } => {
                assert_eq!(index, 1);
                assert_eq!(expected, (2, 2));
                assert_eq!(found, (3, 2));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_volume_layers_follow_slices() {
        let stack = SliceStack::from_images(vec![solid(2, 3, 1), solid(2, 3, 2), solid(2, 3, 3)]).unwrap();
        let volume = stack.to_volume();
        assert_eq!((volume.width, volume.height, volume.depth), (2, 3, 3));
        assert_eq!(volume.data.len(), 2 * 3 * 3 * 4);
        // last texel of the last layer
        assert_eq!(&volume.data[volume.data.len() - 4..], &[3, 0, 252, 255]);
        let layer = 2 * 3 * 4;
        assert_eq!(&volume.data[layer..layer + 4], &[2, 0, 253, 255]);
    }
}
