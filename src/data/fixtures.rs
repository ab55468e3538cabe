use image::{Rgb, RgbImage};
use std::{fs, path::Path};

/// Write a solid-colour RGB PNG.
pub fn write_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, Rgb(color)).save(path).unwrap();
}

/// Build `root/<class>/img_<i>.png` for every class, `per_class` images each.
/// Colours differ per class so a model has something to fit.
pub fn build_image_tree(root: &Path, classes: &[&str], per_class: usize, size: u32) {
    for (label, class) in classes.iter().enumerate() {
        let shade = (label * 255 / classes.len().max(1)) as u8;
        for i in 0..per_class {
            let path = root.join(class).join(format!("img_{i}.png"));
            write_png(&path, size, size, [shade, 255 - shade, (i * 7) as u8]);
        }
    }
}
