use std::path::PathBuf;

use log::warn;

use super::Fill;
use crate::types::Color;

/// Fill used when an image cannot be found.
pub const PLACEHOLDER: Color = Color::rgb(255, 0, 255);

/// Directory that image fills are looked up in.
#[derive(Debug, Clone, Default)]
pub struct ImageDir {
    root: Option<PathBuf>,
}

impl ImageDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImageDir {
            root: Some(root.into()),
        }
    }

    /// An image directory in which nothing resolves.
    pub fn none() -> Self {
        ImageDir { root: None }
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let path = self.root.as_ref()?.join(name);
        path.is_file().then_some(path)
    }

    /// Image fill for `name`, or the placeholder colour if it is missing.
    pub fn fill(&self, name: &str) -> Fill {
        match self.resolve(name) {
            Some(path) => Fill::Image(path),
            None => {
                match &self.root {
                    Some(root) => warn!(
                        "image {name} not found in {}, using placeholder colour",
                        root.display()
                    ),
                    None => warn!("no image directory for {name}, using placeholder colour"),
                }
                Fill::Color(PLACEHOLDER)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageDir::new(dir.path());
        assert_eq!(images.fill("pulley.png"), Fill::Color(PLACEHOLDER));
        assert_eq!(ImageDir::none().fill("pulley.png"), Fill::Color(PLACEHOLDER));
    }

    #[test]
    fn present_image_resolves_to_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("base.png");
        std::fs::write(&file, b"png").unwrap();

        let images = ImageDir::new(dir.path());
        assert_eq!(images.fill("base.png"), Fill::Image(file));
    }
}
