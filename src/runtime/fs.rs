//! File system operations (create, copy, remove, permissions).

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn copy_impl(&self, from: &Path, to: &Path) -> Result<u64> {
        fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create directory {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_file_impl(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_file_impl(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        let file = fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        Ok(Box::new(file))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn set_permissions_impl(&self, path: &Path, mode: u32) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(mode);
            fs::set_permissions(path, permissions)
                .with_context(|| format!("Failed to set permissions on {:?}", path))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, mode);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let rt = RealRuntime;
        let dir = tempdir().unwrap();
        let nested = dir.path().join("tool/1.0.0/amd64");

        rt.create_dir_all(&nested).unwrap();
        assert!(rt.exists(&nested));

        let source = dir.path().join("download.tmp");
        {
            let mut writer = rt.create_file(&source).unwrap();
            writer.write_all(b"#!/bin/sh\necho hi\n").unwrap();
        }

        let dest = nested.join("tool");
        let copied = rt.copy(&source, &dest).unwrap();
        assert_eq!(copied, 18);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "#!/bin/sh\necho hi\n");

        rt.write(&dir.path().join("marker"), b"").unwrap();
        assert!(rt.exists(&dir.path().join("marker")));

        rt.remove_file(&source).unwrap();
        assert!(!rt.exists(&source));
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_set_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let rt = RealRuntime;
        let dir = tempdir().unwrap();
        let file = dir.path().join("tool");
        rt.write(&file, b"data").unwrap();

        rt.set_permissions(&file, 0o755).unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_real_runtime_errors() {
        let rt = RealRuntime;
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");

        assert!(rt.remove_file(&missing).is_err());
        assert!(rt.copy(&missing, &dir.path().join("copy")).is_err());
        assert!(rt.set_permissions(&missing, 0o755).is_err() || cfg!(not(unix)));
    }
}
