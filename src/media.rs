//! Image extraction shared by both pipelines.
//!
//! Word documents resolve images through the relationship table of the
//! main part ([`RelationshipMap`]); presentations hand over the blob of
//! each picture shape as they meet it. Both end in [`ImageStore::save`],
//! which names the file through an [`ImageNaming`] strategy and writes the
//! bytes untouched.

use crate::container::Package;
use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the image directory inside the output directory.
pub const IMAGES_DIR_NAME: &str = "images";

/// Extension used when a part name carries none.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Produces the file name of the next extracted image.
pub trait ImageNaming {
    /// Name for the next image with the given extension (no leading dot).
    fn next_name(&mut self, extension: &str) -> String;
}

/// `img_<n>.<ext>`, numbered across the whole document.
#[derive(Debug, Default)]
pub struct DocumentImageNames {
    next: usize,
}

impl DocumentImageNames {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageNaming for DocumentImageNames {
    fn next_name(&mut self, extension: &str) -> String {
        let name = format!("img_{}.{}", self.next, extension);
        self.next += 1;
        name
    }
}

/// `slide_<NN>_img_<n>.<ext>`, numbered per slide.
#[derive(Debug)]
pub struct SlideImageNames {
    slide: usize,
    next: usize,
}

impl SlideImageNames {
    /// Start a fresh sequence for the given 1-based slide number.
    pub fn new(slide: usize) -> Self {
        Self { slide, next: 0 }
    }
}

impl ImageNaming for SlideImageNames {
    fn next_name(&mut self, extension: &str) -> String {
        let name = format!("slide_{:02}_img_{}.{}", self.slide, self.next, extension);
        self.next += 1;
        name
    }
}

/// An image written to the image directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// File name inside the image directory
    pub file_name: String,
    /// Path relative to the Markdown file, always `/`-separated
    pub relative_path: String,
}

impl ImageRef {
    fn new(file_name: String) -> Self {
        let relative_path = format!("{}/{}", IMAGES_DIR_NAME, file_name);
        Self {
            file_name,
            relative_path,
        }
    }

    /// Reference an image by file name, as [`ImageStore::save`] would.
    pub fn from_file_name(file_name: impl Into<String>) -> Self {
        Self::new(file_name.into())
    }

    /// The Markdown image line referencing this file.
    pub fn markdown(&self) -> String {
        format!("![{}]({})", self.file_name, self.relative_path)
    }
}

/// The image directory of one conversion.
#[derive(Debug)]
pub struct ImageStore {
    dir: PathBuf,
    written: usize,
}

impl ImageStore {
    /// Create `<output_dir>/images`.
    pub fn create(output_dir: &Path) -> Result<Self> {
        let dir = output_dir.join(IMAGES_DIR_NAME);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    /// The directory images are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of images written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Name the next image and write its bytes verbatim.
    pub fn save(
        &mut self,
        naming: &mut dyn ImageNaming,
        data: &[u8],
        extension: &str,
    ) -> Result<ImageRef> {
        let image = ImageRef::new(naming.next_name(extension));
        fs::write(self.dir.join(&image.file_name), data)?;
        self.written += 1;
        log::debug!("wrote {} ({} bytes)", image.relative_path, data.len());
        Ok(image)
    }
}

/// Extension of a part name as written, or the default when absent.
pub fn extension_or_default(part_name: &str) -> &str {
    Path::new(part_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_IMAGE_EXTENSION)
}

/// Relationship ID → extracted image, for one content part.
///
/// Built once before the content is walked and read-only afterwards.
#[derive(Debug, Default)]
pub struct RelationshipMap {
    images: HashMap<String, ImageRef>,
    skipped: usize,
}

impl RelationshipMap {
    /// Extract every image relationship of `part_path` into `store`.
    ///
    /// Relationships are handled in declaration order. Targets missing
    /// from the archive are skipped and counted, never fatal.
    pub fn extract(package: &Package, part_path: &str, store: &mut ImageStore) -> Result<Self> {
        let rels = package.read_relationships(part_path)?;
        let mut naming = DocumentImageNames::new();
        let mut map = RelationshipMap::default();

        for rel in rels.images() {
            let target = Package::resolve_path(part_path, &rel.target);
            let data = match package.read_binary(&target) {
                Ok(data) => data,
                Err(_) => {
                    log::warn!("skipping image {}: {} not in package", rel.id, target);
                    map.skipped += 1;
                    continue;
                }
            };

            let image = store.save(&mut naming, &data, extension_or_default(&rel.target))?;
            map.images.insert(rel.id.clone(), image);
        }

        Ok(map)
    }

    /// Look up the image extracted for a relationship ID.
    pub fn get(&self, id: &str) -> Option<&ImageRef> {
        self.images.get(id)
    }

    /// Register an already written image (used when building maps by hand).
    pub fn insert(&mut self, id: impl Into<String>, image: ImageRef) {
        self.images.insert(id.into(), image);
    }

    /// Number of resolved image relationships.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no image was resolved.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of image relationships whose target was missing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
