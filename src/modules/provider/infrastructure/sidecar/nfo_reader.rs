use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::modules::media::{MediaClass, MediaFile};
use crate::shared::errors::AppResult;
use crate::{log_debug, log_warn};

static RE_IMDB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btt(\d{7,8})\b").expect("Invalid regex"));

/// Reads IMDb ids out of `.nfo` sidecar files next to a media file
#[derive(Debug, Clone, Default)]
pub struct NfoReader;

impl NfoReader {
    pub fn new() -> Self {
        Self
    }

    /// All distinct ids mentioned in the text, in ascending order
    pub fn grep_imdb_ids(text: &str) -> BTreeSet<u32> {
        RE_IMDB_ID
            .captures_iter(text)
            .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
            .collect()
    }

    /// The IMDb id referenced by the sidecars in the file's folder
    ///
    /// A sidecar sharing the file's base name wins. Otherwise the folder's
    /// sidecars must agree on exactly one id.
    pub async fn imdb_id_for(&self, file: &MediaFile) -> AppResult<Option<u32>> {
        let Some(folder) = file.parent_folder() else {
            return Ok(None);
        };

        let sidecars = Self::list_sidecars(folder).await?;
        if sidecars.is_empty() {
            return Ok(None);
        }

        if let Some(own) = sidecars.iter().find(|s| s.base_name() == file.base_name()) {
            let ids = Self::read_ids(own.path()).await?;
            if ids.len() == 1 {
                return Ok(ids.into_iter().next());
            }
        }

        let mut ids = BTreeSet::new();
        for sidecar in &sidecars {
            ids.extend(Self::read_ids(sidecar.path()).await?);
        }

        match ids.len() {
            0 => Ok(None),
            1 => {
                let id = ids.into_iter().next();
                log_debug!("Sidecar id {:?} found for {}", id, file);
                Ok(id)
            }
            _ => {
                log_warn!("Conflicting sidecar ids in {}: {:?}", folder.display(), ids);
                Ok(None)
            }
        }
    }

    async fn list_sidecars(folder: &Path) -> AppResult<Vec<MediaFile>> {
        let mut entries = match tokio::fs::read_dir(folder).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut sidecars = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file = MediaFile::new(entry.path());
            if file.media_class() == MediaClass::Info {
                sidecars.push(file);
            }
        }
        sidecars.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(sidecars)
    }

    async fn read_ids(path: &Path) -> AppResult<BTreeSet<u32>> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::grep_imdb_ids(&String::from_utf8_lossy(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grep_imdb_ids() {
        let text = "https://www.imdb.com/title/tt0113277/ and tt0113277 again, not tt12";
        let ids = NfoReader::grep_imdb_ids(text);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![113277]);
    }

    #[tokio::test]
    async fn test_imdb_id_from_folder_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("movie.nfo"), "imdb: tt0113277").unwrap();
        let file = MediaFile::new(dir.path().join("Heat.avi"));

        let id = NfoReader::new().imdb_id_for(&file).await.unwrap();
        assert_eq!(id, Some(113277));
    }

    #[tokio::test]
    async fn test_conflicting_sidecars_yield_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.nfo"), "tt0113277").unwrap();
        std::fs::write(dir.path().join("b.nfo"), "tt0110413").unwrap();
        let file = MediaFile::new(dir.path().join("Heat.avi"));

        assert_eq!(NfoReader::new().imdb_id_for(&file).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_folder_is_not_an_error() {
        let file = MediaFile::new("/definitely/not/here/Heat.avi");
        assert_eq!(NfoReader::new().imdb_id_for(&file).await.unwrap(), None);
    }
}
