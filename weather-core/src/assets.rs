use std::path::PathBuf;

use crate::{
    animation::Animation,
    error::AssetError,
    model::ConditionCategory,
};

/// Directory of per-condition GIFs named `<category>.gif`.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    dir: PathBuf,
}

impl AssetLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, category: ConditionCategory) -> PathBuf {
        self.dir.join(category.asset_file_name())
    }

    /// Decode the animation for `category`. The returned animation is loaded
    /// but not started.
    pub fn load_animation(&self, category: ConditionCategory) -> Result<Animation, AssetError> {
        let mut animation = Animation::new();
        animation.load_path(&self.path_for(category))?;
        Ok(animation)
    }
}
