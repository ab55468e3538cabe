// ============================================================
// Layer 4 — Image Folder Loader
// ============================================================
// Indexes a directory tree laid out as one subdirectory per
// class label:
//
//   root/
//     n02086240/  ← label 0
//       a.JPEG
//       b.JPEG
//     n02087394/  ← label 1
//       ...
//
// Labels are the position of the class directory in sorted
// order. When an expected class list is supplied, every one of
// those directories must exist; a missing class is an error.
//
// Only the image header is read here (to fail early on broken
// files). Pixel decoding happens later, inside the data loader
// worker threads.
//
// Reference: Rust Book §9 (Error Handling)
//            image crate documentation

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::sample::ImageSample;
use crate::domain::traits::SampleSource;

/// Mirror the extracted tree is expected to come from.
pub const DATASET_URL: &str = "https://s3.amazonaws.com/fast-ai-imageclas/imagewoof-160.tgz";

/// Indexes every image under `root`, labelled by class directory.
/// Implements the SampleSource trait from Layer 3.
pub struct ImageFolder {
    root:    PathBuf,
    /// Expected class directories, sorted. `None` = discover from disk.
    classes: Option<Vec<String>>,
}

impl ImageFolder {
    /// Create an ImageFolder that discovers its classes from disk
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), classes: None }
    }

    /// Require exactly these class directories to be present
    pub fn with_classes<S: AsRef<str>>(mut self, classes: &[S]) -> Self {
        let mut classes: Vec<String> = classes.iter().map(|c| c.as_ref().to_string()).collect();
        classes.sort();
        self.classes = Some(classes);
        self
    }

    /// Class directory names in label order.
    pub fn classes(&self) -> Result<Vec<String>> {
        let found = discover_class_dirs(&self.root)?;

        let Some(expected) = &self.classes else {
            if found.is_empty() {
                bail!("No class directories found under '{}'", self.root.display());
            }
            return Ok(found);
        };

        if let Some(missing) = expected.iter().find(|c| !found.contains(c)) {
            bail!(
                "Missing class directory '{}' under '{}'",
                missing,
                self.root.display()
            );
        }
        for extra in found.iter().filter(|c| !expected.contains(c)) {
            tracing::warn!("Ignoring unexpected class directory '{}'", extra);
        }
        Ok(expected.clone())
    }
}

impl SampleSource for ImageFolder {
    fn load_all(&self) -> Result<Vec<ImageSample>> {
        if !self.root.is_dir() {
            bail!(
                "Dataset directory '{}' does not exist. Download and extract {} \
                 so that it contains one subdirectory per class.",
                self.root.display(),
                DATASET_URL
            );
        }

        let classes     = self.classes()?;
        let mut samples = Vec::new();

        for (label, class) in classes.iter().enumerate() {
            let class_dir = self.root.join(class);
            let files     = list_image_files(&class_dir)?;

            if files.is_empty() {
                bail!("Class directory '{}' contains no images", class_dir.display());
            }

            for path in files {
                // Header-only read: cheap, and catches truncated or mislabelled files
                image::image_dimensions(&path)
                    .with_context(|| format!("Cannot read image '{}'", path.display()))?;
                samples.push(ImageSample::new(path, label));
            }

            tracing::debug!("Class {} '{}': indexed", label, class);
        }

        tracing::info!(
            "Indexed {} images in {} classes under '{}'",
            samples.len(),
            classes.len(),
            self.root.display()
        );
        Ok(samples)
    }
}

/// Sorted names of the immediate subdirectories of `root`.
fn discover_class_dirs(root: &Path) -> Result<Vec<String>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(root)
        .with_context(|| format!("Cannot read directory '{}'", root.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => dirs.push(name),
            Err(name) => tracing::warn!("Skipping non UTF-8 directory {:?}", name),
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Sorted image files directly inside `dir`. Non-image files are skipped.
fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        // Format is guessed from the extension, e.g. ".JPEG" or ".png"
        if image::ImageFormat::from_path(&path).is_ok() {
            files.push(path);
        } else {
            tracing::warn!("Skipping non-image file '{}'", path.display());
        }
    }

    files.sort();
    Ok(files)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{build_image_tree, write_png};

    #[test]
    fn test_labels_follow_sorted_directory_names() {
        let tmp = tempfile::tempdir().unwrap();
        build_image_tree(tmp.path(), &["cat", "ant", "bee"], 2, 8);

        let folder  = ImageFolder::new(tmp.path());
        let samples = folder.load_all().unwrap();

        assert_eq!(folder.classes().unwrap(), vec!["ant", "bee", "cat"]);
        assert_eq!(samples.len(), 6);
        for s in &samples {
            let class = s.path.parent().unwrap().file_name().unwrap().to_str().unwrap();
            let expected = match class { "ant" => 0, "bee" => 1, _ => 2 };
            assert_eq!(s.label, expected);
        }
    }

    #[test]
    fn test_missing_class_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        build_image_tree(tmp.path(), &["a", "b"], 1, 8);

        let err = ImageFolder::new(tmp.path())
            .with_classes(&["a", "b", "c"])
            .load_all()
            .unwrap_err();
        assert!(err.to_string().contains("Missing class directory 'c'"));
    }

    #[test]
    fn test_unexpected_class_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        build_image_tree(tmp.path(), &["a", "b", "extra"], 1, 8);

        let samples = ImageFolder::new(tmp.path())
            .with_classes(&["b", "a"])
            .load_all()
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.label < 2));
    }

    #[test]
    fn test_non_image_files_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        build_image_tree(tmp.path(), &["a"], 2, 8);
        fs::write(tmp.path().join("a").join("notes.txt"), "hello").unwrap();

        let samples = ImageFolder::new(tmp.path()).load_all().unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_corrupt_image_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(&tmp.path().join("a").join("ok.png"), 8, 8, [1, 2, 3]);
        fs::write(tmp.path().join("a").join("broken.png"), b"not a png").unwrap();

        assert!(ImageFolder::new(tmp.path()).load_all().is_err());
    }

    #[test]
    fn test_missing_root_mentions_download_url() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ImageFolder::new(tmp.path().join("nope")).load_all().unwrap_err();
        assert!(err.to_string().contains(DATASET_URL));
    }
}
