use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR_NAME: &str = "PulseCam";

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve a detector model file by name, downloading it only as a last resort.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. Bundled directory (development checkouts, packaged installs)
/// 3. Download from `url` into the cache
pub fn resolve(
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    resolve_in(&model_cache_dir()?, name, url, bundled_dir, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        log::debug!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    if let Some(bundled_path) = bundled_dir.map(|d| d.join(name)) {
        if bundled_path.exists() {
            log::debug!("Using bundled model {}", bundled_path.display());
            return Ok(bundled_path);
        }
    }

    log::info!("Downloading {name} from {url}");
    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/PulseCam/models/`
/// - Linux: `$XDG_CACHE_HOME/PulseCam/models/` or `~/.cache/PulseCam/models/`
/// - Windows: `%LOCALAPPDATA%/PulseCam/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join(APP_DIR_NAME).join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ModelResolveError::Write { path, source }
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_err)?;

    // Written under a temporary name and renamed, so a failed download never
    // leaves a truncated model where `resolve` would pick it up.
    let temp_path = dest.with_extension("part");
    let mut file = fs::File::create(&temp_path).map_err(write_err(temp_path.as_path()))?;

    let mut downloaded: u64 = 0;
    for chunk in bytes.chunks(1024 * 1024) {
        file.write_all(chunk).map_err(write_err(temp_path.as_path()))?;
        downloaded += chunk.len() as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_err(temp_path.as_path()))?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(write_err(dest))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const UNREACHABLE_URL: &str = "http://invalid.nonexistent.example.com/model.onnx";

    #[test]
    fn test_resolve_prefers_cached_file() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&cache).unwrap();
        fs::create_dir_all(&bundled).unwrap();
        fs::write(cache.join("m.onnx"), b"cached").unwrap();
        fs::write(bundled.join("m.onnx"), b"bundled").unwrap();

        let path = resolve_in(&cache, "m.onnx", UNREACHABLE_URL, Some(&bundled), None).unwrap();
        assert_eq!(path, cache.join("m.onnx"));
    }

    #[test]
    fn test_resolve_falls_back_to_bundled_file() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&bundled).unwrap();
        fs::write(bundled.join("m.onnx"), b"bundled").unwrap();

        let path = resolve_in(&cache, "m.onnx", UNREACHABLE_URL, Some(&bundled), None).unwrap();
        assert_eq!(path, bundled.join("m.onnx"));
    }

    #[test]
    fn test_resolve_download_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let result = resolve_in(&cache, "m.onnx", UNREACHABLE_URL, None, None);
        assert!(matches!(result, Err(ModelResolveError::Download { .. })));
    }

    #[test]
    fn test_model_cache_dir_is_app_scoped() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR_NAME));
        assert!(path.ends_with("models"));
    }

    #[test]
    fn test_download_leaves_no_partial_file_on_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.onnx");
        let _ = download(UNREACHABLE_URL, &dest, None);
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
