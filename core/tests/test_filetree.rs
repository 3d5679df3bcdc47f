#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use chrono::{Days, Local};
    use logarchive_core::config::{FilterConfig, ProcessConfig};
    use logarchive_core::filetree::{
        process_walk, walk, CompressProcessor, DeleteProcessor, FileFilter, FileProcessor, ListProcessor,
        UploadProcessor,
    };
    use logarchive_core::storage::{list_all, BlobStore, MemoryBlobStore};
    use logarchive_core::stream::{read_all, PipelineBuilder};
    use tempfile::{tempdir, TempDir};

    const DAY: u64 = 86_400;

    /// Five directories of ten daily logs; the file for `day` days ago is
    /// `(day + 1)` KiB of zeros, named and timestamped for that day.
    fn log_tree() -> TempDir {
        let td = tempdir().unwrap();
        let today = Local::now().date_naive();
        for d in 0..5 {
            let dir = td.path().join(format!("dir{d}"));
            fs::create_dir(&dir).unwrap();
            for day in 0..10u64 {
                let date = today.checked_sub_days(Days::new(day)).unwrap();
                let path = dir.join(date.format("%Y-%m-%d.log").to_string());
                fs::write(&path, vec![0u8; (day as usize + 1) * 1024]).unwrap();
                let file = File::options().write(true).open(&path).unwrap();
                file.set_modified(SystemTime::now() - Duration::from_secs(day * DAY)).unwrap();
            }
        }
        td
    }

    fn count(top: &Path) -> (usize, u64) {
        walk(top)
            .map(|item| item.unwrap().1.len())
            .fold((0, 0), |(n, size), len| (n + 1, size + len))
    }

    fn days_ago(day: u64) -> String {
        let date = Local::now().date_naive().checked_sub_days(Days::new(day)).unwrap();
        date.format("%Y-%m-%d").to_string()
    }

    fn filter(config: FilterConfig) -> FileFilter {
        FileFilter::from_config(&config).unwrap()
    }

    fn older_bigger(older: &str, bigger: &str) -> FileFilter {
        filter(FilterConfig {
            older: Some(older.into()),
            bigger: Some(bigger.into()),
            ..FilterConfig::default()
        })
    }

    fn by_date(date: String) -> FileFilter {
        filter(FilterConfig { date: Some(date), ..FilterConfig::default() })
    }

    fn gzip(dry: bool) -> ProcessConfig {
        ProcessConfig { dry, mode: "gzip".into() }
    }

    #[test]
    fn delete_older_and_bigger() {
        let td = log_tree();
        let mut proc = DeleteProcessor::new(older_bigger("2d", "1k"), false);
        let summary = process_walk(td.path(), &mut [&mut proc]);
        assert_eq!(count(td.path()).0, 10, "2 files x 5 dirs remain");
        assert_eq!(summary.seen, 50);
        assert_eq!(summary.processed, 40);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn delete_with_fractional_size() {
        let td = log_tree();
        let mut proc = DeleteProcessor::new(older_bigger("1d", "4.1k"), false);
        process_walk(td.path(), &mut [&mut proc]);
        assert_eq!(count(td.path()).0, 20, "4 files x 5 dirs remain");
    }

    #[test]
    fn delete_single_date() {
        let td = log_tree();
        let mut proc = DeleteProcessor::new(by_date(days_ago(2)), false);
        process_walk(td.path(), &mut [&mut proc]);
        assert_eq!(count(td.path()).0, 45);
    }

    #[test]
    fn delete_date_range_is_half_open() {
        let td = log_tree();
        let range = format!("{}..{}", days_ago(3), days_ago(1));
        let mut proc = DeleteProcessor::new(by_date(range), false);
        process_walk(td.path(), &mut [&mut proc]);
        assert_eq!(count(td.path()).0, 40, "days 3 and 2 removed, day 1 kept");
    }

    #[test]
    fn dry_delete_keeps_everything() {
        let td = log_tree();
        let mut proc = DeleteProcessor::new(older_bigger("1d", "4.1k"), true);
        process_walk(td.path(), &mut [&mut proc]);
        assert_eq!(count(td.path()).0, 50);
    }

    #[test]
    fn compress_replaces_files_and_keeps_mtime() {
        let td = log_tree();
        let before = count(td.path());
        let sample = td.path().join("dir0").join(format!("{}.log", days_ago(5)));
        let mtime = fs::metadata(&sample).unwrap().modified().unwrap();

        let mut proc = CompressProcessor::new(older_bigger("2d", "1k"), gzip(false));
        let summary = process_walk(td.path(), &mut [&mut proc]);
        assert_eq!(summary.failed, 0);

        let after = count(td.path());
        assert_eq!(before.0, after.0, "one output per input");
        assert!(after.1 < before.1, "zeros should shrink");

        assert!(!sample.exists());
        let packed = PathBuf::from(format!("{}.gz", sample.display()));
        assert_eq!(fs::metadata(&packed).unwrap().modified().unwrap(), mtime);

        let (name, mut stream) = PipelineBuilder::new().build(packed.to_str().unwrap(), "decompress", None).unwrap();
        assert_eq!(name, sample.to_str().unwrap());
        assert_eq!(read_all(&mut stream).unwrap().len(), 6 * 1024);

        // Second pass: everything selected is already gzip.
        let mut again = CompressProcessor::new(older_bigger("2d", "1k"), gzip(false));
        process_walk(td.path(), &mut [&mut again]);
        assert_eq!(count(td.path()), after);
    }

    #[test]
    fn dry_compress_changes_nothing() {
        let td = log_tree();
        let before = count(td.path());
        let mut proc = CompressProcessor::new(older_bigger("2d", "1k"), gzip(true));
        process_walk(td.path(), &mut [&mut proc]);
        assert_eq!(count(td.path()), before);
    }

    #[test]
    fn compress_without_matches_changes_nothing() {
        let td = log_tree();
        let before = count(td.path());
        let only_big = filter(FilterConfig { bigger: Some("100k".into()), ..FilterConfig::default() });
        let mut proc = CompressProcessor::new(only_big, gzip(false));
        process_walk(td.path(), &mut [&mut proc]);
        assert_eq!(count(td.path()), before);
    }

    #[test]
    fn corrupt_file_fails_alone() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.log"), "fine\n").unwrap();
        fs::write(td.path().join("b.log.gz"), "not gzip").unwrap();
        fs::write(td.path().join("c.log"), "also fine\n").unwrap();

        let config = ProcessConfig { dry: false, mode: "xz".into() };
        let mut proc = CompressProcessor::new(FileFilter::any(), config);
        let summary = process_walk(td.path(), &mut [&mut proc]);
        assert_eq!((summary.seen, summary.processed, summary.failed), (3, 2, 1));

        let mut names: Vec<String> = fs::read_dir(td.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.log.xz", "b.log.gz", "c.log.xz"], "no partial b.log.xz left behind");
    }

    #[test]
    fn stop_skips_later_processors() {
        let td = log_tree();
        let mut delete = DeleteProcessor::new(by_date(days_ago(0)), true);
        let mut list = ListProcessor::new(FileFilter::any());
        process_walk(td.path(), &mut [&mut delete, &mut list]);
        assert_eq!(list.entries().len(), 45, "files claimed by delete are not listed");
        assert_eq!(delete.name(), "delete");
    }

    #[test]
    fn list_collects_sorted_paths() {
        let td = log_tree();
        let mut list = ListProcessor::new(by_date(days_ago(1)));
        process_walk(td.path(), &mut [&mut list]);
        let entries = list.into_entries();
        let dirs: Vec<String> = entries
            .iter()
            .map(|e| e.path.parent().unwrap().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(dirs, vec!["dir0", "dir1", "dir2", "dir3", "dir4"]);
        assert!(entries.iter().all(|e| e.size == 2 * 1024));
    }

    #[test]
    fn upload_converts_and_skips_existing() {
        let td = log_tree();
        let store = Arc::new(MemoryBlobStore::new());
        let one_day = || by_date(days_ago(4));

        let mut upload =
            UploadProcessor::new(store.clone(), "logs/", td.path(), one_day(), gzip(false)).unwrap();
        let summary = process_walk(td.path(), &mut [&mut upload]);
        assert_eq!(summary.failed, 0);

        let keys: Vec<String> = list_all(store.as_ref(), "logs/").unwrap().into_iter().map(|m| m.key).collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(keys[0], format!("logs/dir0/{}.log.gz", days_ago(4)));

        let body = store.get(&keys[0]).unwrap();
        let (_, mut plain) = PipelineBuilder::new().build(&keys[0], "decompress", Some(body)).unwrap();
        assert_eq!(read_all(&mut plain).unwrap().len(), 5 * 1024);
        assert_eq!(count(td.path()).0, 50, "upload leaves local files alone");

        let before = store.head(&keys[0]).unwrap().unwrap().last_modified;
        let mut again =
            UploadProcessor::new(store.clone(), "logs/", td.path(), one_day(), gzip(false)).unwrap();
        process_walk(td.path(), &mut [&mut again]);
        assert_eq!(store.head(&keys[0]).unwrap().unwrap().last_modified, before, "existing keys are skipped");
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn walk_is_sorted_depth_first_and_skips_symlinks() {
        let td = tempdir().unwrap();
        let top = td.path();
        fs::create_dir_all(top.join("a")).unwrap();
        fs::create_dir_all(top.join("c/x")).unwrap();
        for rel in ["b.log", "a/2.log", "a/1.log", "c/x/9.log", "0.log", ".hidden.log"] {
            fs::write(top.join(rel), rel).unwrap();
        }
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(top.join("b.log"), top.join("a/link.log")).unwrap();
            std::os::unix::fs::symlink(top.join("c"), top.join("d")).unwrap();
        }

        let found: Vec<PathBuf> = walk(top)
            .map(|item| item.unwrap().0.strip_prefix(top).unwrap().to_path_buf())
            .collect();
        let expected: Vec<PathBuf> =
            [".hidden.log", "0.log", "a/1.log", "a/2.log", "b.log", "c/x/9.log"].iter().map(PathBuf::from).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn walk_of_missing_top_reports_error() {
        let td = tempdir().unwrap();
        let items: Vec<_> = walk(td.path().join("nope")).collect();
        assert!(!items.is_empty() && items.iter().all(Result::is_err), "missing top must surface as an error");
    }
}
