use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use gazette_archiver::{fetch_year, ArchiveStore, ListingSource};

/// 回放固定条目的检索列表
struct FakeListing {
    /// None 表示读取标题时出错
    titles: Vec<Option<String>>,
    failing_downloads: HashSet<usize>,
    fail_open: bool,
    opened_years: Vec<u16>,
    downloaded: Vec<usize>,
}

impl FakeListing {
    fn new(titles: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(|t| Some(t.to_string())).collect(),
            failing_downloads: HashSet::new(),
            fail_open: false,
            opened_years: Vec::new(),
            downloaded: Vec::new(),
        }
    }

    fn payload(index: usize) -> Vec<u8> {
        format!("%PDF-1.4 voce {}", index).into_bytes()
    }
}

impl ListingSource for FakeListing {
    async fn open_year(&mut self, year: u16) -> Result<usize> {
        if self.fail_open {
            bail!("navigazione fallita");
        }
        self.opened_years.push(year);
        Ok(self.titles.len())
    }

    async fn entry_title(&mut self, index: usize) -> Result<String> {
        match &self.titles[index] {
            Some(title) => Ok(title.clone()),
            None => bail!("elemento .titolo_atto non trovato"),
        }
    }

    async fn download_entry(&mut self, index: usize, dest: &Path) -> Result<u64> {
        if self.failing_downloads.contains(&index) {
            bail!("download scaduto");
        }
        let payload = Self::payload(index);
        tokio::fs::write(dest, &payload).await?;
        self.downloaded.push(index);
        Ok(payload.len() as u64)
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_same_date_editions_get_sequential_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArchiveStore::new(dir.path());
    let mut listing = FakeListing::new(&[
        "Gazzetta Ufficiale n. 131 del 05-06-1948",
        "Gazzetta Ufficiale n. 131 del 05-06-1948 (edizione straordinaria)",
    ]);

    let summary = fetch_year(&mut listing, &store, 1948, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(listing.opened_years, vec![1948]);
    assert_eq!(file_names(dir.path()), vec!["480605-1.pdf", "480605-2.pdf"]);
    // 按列表顺序分配序号
    assert_eq!(
        std::fs::read(dir.path().join("480605-1.pdf")).unwrap(),
        FakeListing::payload(0)
    );
    assert_eq!(
        std::fs::read(dir.path().join("480605-2.pdf")).unwrap(),
        FakeListing::payload(1)
    );
    assert_eq!(summary.dates_processed, 1);
    assert_eq!(summary.editions_downloaded, 2);
}

#[tokio::test]
async fn test_interleaved_dates_count_independently() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArchiveStore::new(dir.path());
    let mut listing = FakeListing::new(&[
        "del 03-01-1948",
        "del 04-01-1948",
        "del 03-01-1948",
        "del 04-01-1948",
        "del 03-01-1948",
    ]);

    let summary = fetch_year(&mut listing, &store, 1948, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(
        file_names(dir.path()),
        vec![
            "480103-1.pdf",
            "480103-2.pdf",
            "480103-3.pdf",
            "480104-1.pdf",
            "480104-2.pdf"
        ]
    );
    assert_eq!(
        std::fs::read(dir.path().join("480103-3.pdf")).unwrap(),
        FakeListing::payload(4)
    );
    assert_eq!(summary.dates_processed, 2);
    assert_eq!(summary.editions_downloaded, 5);
}

#[tokio::test]
async fn test_title_without_date_is_skipped_without_counting() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArchiveStore::new(dir.path());
    let mut listing = FakeListing::new(&[
        "Gazzetta Ufficiale del 03-01-1948",
        "Indice annuale",
        "Gazzetta Ufficiale del 03-01-1948",
    ]);

    let summary = fetch_year(&mut listing, &store, 1948, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(file_names(dir.path()), vec!["480103-1.pdf", "480103-2.pdf"]);
    assert_eq!(listing.downloaded, vec![0, 2]);
    assert_eq!(summary.unparsed, 1);
    assert_eq!(summary.editions_downloaded, 2);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_second_run_downloads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArchiveStore::new(dir.path());
    let titles = ["del 03-01-1948", "del 03-01-1948", "del 05-06-1948"];

    let mut first = FakeListing::new(&titles);
    let first_summary = fetch_year(&mut first, &store, 1948, Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(first_summary.editions_downloaded, 3);

    let mut second = FakeListing::new(&titles);
    let second_summary = fetch_year(&mut second, &store, 1948, Duration::ZERO)
        .await
        .unwrap();

    assert!(second.downloaded.is_empty());
    assert_eq!(second_summary.editions_downloaded, 0);
    assert_eq!(second_summary.already_present, 3);
    assert_eq!(second_summary.dated_entries, 3);
    assert_eq!(
        file_names(dir.path()),
        vec!["480103-1.pdf", "480103-2.pdf", "480605-1.pdf"]
    );
}

#[tokio::test]
async fn test_existing_file_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("480103-1.pdf"), b"originale").unwrap();
    let store = ArchiveStore::new(dir.path());
    let mut listing = FakeListing::new(&["del 03-01-1948", "del 03-01-1948"]);

    let summary = fetch_year(&mut listing, &store, 1948, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read(dir.path().join("480103-1.pdf")).unwrap(),
        b"originale"
    );
    assert_eq!(listing.downloaded, vec![1]);
    assert_eq!(summary.already_present, 1);
    assert_eq!(summary.editions_downloaded, 1);
}

#[tokio::test]
async fn test_entry_failures_do_not_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArchiveStore::new(dir.path());
    let mut listing = FakeListing::new(&[
        "del 03-01-1948",
        "del 04-01-1948",
        "del 05-01-1948",
        "del 05-01-1948",
    ]);
    listing.titles[1] = None;
    listing.failing_downloads.insert(2);

    let summary = fetch_year(&mut listing, &store, 1948, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.failed, 2);
    assert_eq!(summary.editions_downloaded, 2);
    // 标题读取失败的条目不计数，下载失败的条目已计数
    assert_eq!(summary.dated_entries, 3);
    // 失败的下载已占用序号 1
    assert_eq!(file_names(dir.path()), vec!["480103-1.pdf", "480105-2.pdf"]);
}

#[tokio::test]
async fn test_navigation_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArchiveStore::new(dir.path());
    let mut listing = FakeListing::new(&["del 03-01-1948"]);
    listing.fail_open = true;

    let result = fetch_year(&mut listing, &store, 1948, Duration::ZERO).await;

    assert!(result.is_err());
    assert!(listing.downloaded.is_empty());
    assert!(file_names(dir.path()).is_empty());
}
