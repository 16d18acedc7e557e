use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::log_debug;
use crate::modules::grouping::domain::{
    detect_folder_query, detect_movie_query, detect_series_name, Batch, BatchKey,
};
use crate::modules::media::MediaFile;
use crate::modules::similarity::NameNormalizer;
use crate::shared::config::MatchConfig;

/// Partitions input files into batches that share one candidate fetch
///
/// Every file lands in exactly one batch. Batches come out ordered by the
/// input index of their first member and members keep input order.
pub struct BatchPlanner {
    config: Arc<MatchConfig>,
    keys: NameNormalizer,
}

impl BatchPlanner {
    pub fn new(config: Arc<MatchConfig>) -> Self {
        Self {
            config,
            keys: NameNormalizer::default_pipeline(),
        }
    }

    /// Groups by detected series name, falling back to the containing folder
    pub fn plan_series(&self, files: &[MediaFile]) -> Vec<Batch> {
        let min = self.config.min_query_length;
        let batches = self.plan(files, |file| match detect_series_name(file, min) {
            Some(name) => (BatchKey::Name(self.keys.normalize(&name)), name),
            None => {
                let folder = folder_of(file);
                let query = detect_folder_query(&folder, min).unwrap_or_default();
                (BatchKey::Folder(folder), query)
            }
        });

        log_debug!(
            "Planned {} series batches for {} files",
            batches.len(),
            files.len()
        );
        batches
    }

    /// Groups by detected movie name and year within each folder
    pub fn plan_movies(&self, files: &[MediaFile]) -> Vec<Batch> {
        let min = self.config.min_query_length;
        self.plan(files, |file| {
            let parsed = detect_movie_query(file, min);
            let key = format!(
                "{}|{}|{}",
                folder_of(file).display(),
                self.keys.normalize(&parsed.name),
                parsed.year.map(|y| y.to_string()).unwrap_or_default()
            );
            (BatchKey::Name(key), parsed.name)
        })
    }

    fn plan<F>(&self, files: &[MediaFile], classify: F) -> Vec<Batch>
    where
        F: Fn(&MediaFile) -> (BatchKey, String),
    {
        let mut batches: Vec<Batch> = Vec::new();
        let mut positions: HashMap<BatchKey, usize> = HashMap::new();

        for (index, file) in files.iter().enumerate() {
            let (key, query) = classify(file);
            let position = *positions.entry(key.clone()).or_insert_with(|| {
                batches.push(Batch::new(key, query));
                batches.len() - 1
            });
            batches[position].push(index, file.clone());
        }

        batches
    }
}

fn folder_of(file: &MediaFile) -> PathBuf {
    file.parent_folder().map(PathBuf::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> BatchPlanner {
        BatchPlanner::new(Arc::new(MatchConfig::minimal()))
    }

    #[test]
    fn test_shared_name_beats_folder() {
        let files: Vec<MediaFile> = (1..=30)
            .map(|n| MediaFile::new(format!("/tv/folder{:02}/Show.S01E{:02}.mkv", n, n)))
            .collect();

        let batches = planner().plan_series(&files);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].query, "Show");
        assert_eq!(batches[0].len(), 30);
    }

    #[test]
    fn test_undetected_files_group_by_folder() {
        let files = vec![
            MediaFile::new("/tv/Firefly/Season 1/pilot.mkv"),
            MediaFile::new("/tv/Lost/Lost.S01E01.mkv"),
            MediaFile::new("/tv/Firefly/Season 1/train job.mkv"),
        ];

        let batches = planner().plan_series(&files);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].query, "Firefly");
        assert_eq!(
            batches[0].members.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(batches[1].query, "Lost");
    }

    #[test]
    fn test_batches_ordered_by_first_member() {
        let files = vec![
            MediaFile::new("/x/Bones.S01E01.mkv"),
            MediaFile::new("/x/Angel.S01E01.mkv"),
            MediaFile::new("/x/Bones.S01E02.mkv"),
        ];

        let batches = planner().plan_series(&files);
        let firsts: Vec<_> = batches.iter().filter_map(Batch::first_index).collect();
        assert_eq!(firsts, vec![0, 1]);
    }

    #[test]
    fn test_movie_batches_per_folder_and_name() {
        let files = vec![
            MediaFile::new("/m/Heat (1995)/cd1.avi"),
            MediaFile::new("/m/Heat (1995)/cd2.avi"),
            MediaFile::new("/m/Alien.1979.mkv"),
        ];

        let batches = planner().plan_movies(&files);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].query, "Heat");
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1].query, "Alien");
    }
}
