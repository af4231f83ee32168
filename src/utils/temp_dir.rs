use std::{
    env, fs,
    ops::Deref,
    path::{Path, PathBuf},
};

/// A scratch directory under the system temp dir, removed again on drop.
/// Callers pick the name, so it should be unique per test.
pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new<P: AsRef<Path>>(name: P) -> Self {
        let path = env::temp_dir().join(name);
        fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Deref for TempDir {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}
