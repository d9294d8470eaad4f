use std::{
    collections::HashSet,
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    tasks::task::TaskList,
    utils::clock::Clock,
};

use super::naming::{is_list_file, sanitize_stem, unique_filename};

/// Interface for abstracting the set of list files in the task directory.
pub trait ListStore {
    /// File names of every list in the directory, sorted by name.
    fn discover_lists(&self) -> impl Future<Output = Result<Vec<String>>>;

    /// Creates an empty list titled `title` and returns the path of its new file.
    fn create_list(&self, title: &str) -> impl Future<Output = Result<PathBuf>>;

    fn remove_list(&self, file_name: &str) -> impl Future<Output = Result<()>>;

    fn load(&self, path: &Path) -> impl Future<Output = Result<TaskList>>;

    /// Refreshes `updated_at` and overwrites the file with the whole list.
    fn save(&self, path: &Path, list: &mut TaskList) -> impl Future<Output = Result<()>>;

    fn list_path(&self, file_name: &str) -> PathBuf;
}

/// Files in a directory split into list files and everything else, for display.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FolderContents {
    pub list_files: Vec<String>,
    pub other_files: Vec<String>,
}

/// The main realization of [ListStore]: one JSON file per list in a single directory.
pub struct FileListStore {
    list_dir: PathBuf,
    clock: Box<dyn Clock>,
}

impl FileListStore {
    pub fn new(list_dir: PathBuf, clock: Box<dyn Clock>) -> Self {
        Self { list_dir, clock }
    }

    pub fn dir(&self) -> &Path {
        &self.list_dir
    }

    /// Plain file names in the directory. Subdirectories are skipped.
    async fn file_names(&self) -> Result<Vec<String>> {
        if self.list_dir.as_os_str().is_empty() {
            return Err(Error::NotConfigured);
        }
        let unreadable = |source| Error::DirectoryUnreadable {
            path: self.list_dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.list_dir)
            .await
            .map_err(unreadable)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            if entry.file_type().await.map_err(unreadable)?.is_dir() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    pub async fn folder_contents(&self) -> Result<FolderContents> {
        let (list_files, other_files) = self
            .file_names()
            .await?
            .into_iter()
            .partition(|name| is_list_file(name));
        Ok(FolderContents {
            list_files,
            other_files,
        })
    }

    async fn write(&self, path: &Path, list: &TaskList) -> Result<()> {
        let write_failure = |source| Error::WriteFailure {
            path: path.to_path_buf(),
            source,
        };
        let data = serde_json::to_vec_pretty(list)
            .map_err(|e| write_failure(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        tokio::fs::write(path, data).await.map_err(write_failure)?;
        debug!("Wrote {} tasks to {path:?}", list.items.len());
        Ok(())
    }
}

impl ListStore for FileListStore {
    async fn discover_lists(&self) -> Result<Vec<String>> {
        let lists = self
            .file_names()
            .await?
            .into_iter()
            .filter(|name| is_list_file(name))
            .collect::<Vec<_>>();

        debug!("Found {} lists in {:?}", lists.len(), self.list_dir);
        if lists.is_empty() {
            return Err(Error::NoListsFound);
        }
        Ok(lists)
    }

    async fn create_list(&self, title: &str) -> Result<PathBuf> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyName);
        }

        let existing = self.file_names().await?.into_iter().collect::<HashSet<_>>();
        let file_name = unique_filename(&sanitize_stem(title), &existing);
        let path = self.list_path(&file_name);

        let list = TaskList::new(title, self.clock.time());
        self.write(&path, &list).await?;
        info!("Created list '{title}' at {path:?}");
        Ok(path)
    }

    async fn remove_list(&self, file_name: &str) -> Result<()> {
        let path = self.list_path(file_name);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|source| Error::RemoveFailure {
                path: path.clone(),
                source,
            })?;
        info!("Removed list {path:?}");
        Ok(())
    }

    async fn load(&self, path: &Path) -> Result<TaskList> {
        debug!("Loading {path:?}");
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| Error::ReadFailure {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_slice::<TaskList>(&data).map_err(|source| Error::MalformedData {
            path: path.to_path_buf(),
            source,
        })
    }

    async fn save(&self, path: &Path, list: &mut TaskList) -> Result<()> {
        list.updated_at = self.clock.time();
        self.write(path, list).await
    }

    fn list_path(&self, file_name: &str) -> PathBuf {
        self.list_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anyhow::Result;
    use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        error::Error,
        store::list_store::{FileListStore, FolderContents, ListStore},
        tasks::{
            task::{Session, Task, TaskList, TaskStatus},
            timer,
        },
        utils::{
            clock::{DefaultClock, MockClock},
            logging::TEST_LOGGING,
        },
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn start() -> DateTime<Utc> {
        Utc.from_utc_datetime(&TEST_START_DATE)
    }

    fn fixed_clock(time: DateTime<Utc>) -> Box<MockClock> {
        let mut clock = MockClock::new();
        clock.expect_time().return_const(time);
        Box::new(clock)
    }

    #[tokio::test]
    async fn test_discover_not_configured() {
        let store = FileListStore::new(PathBuf::new(), Box::new(DefaultClock));
        assert!(matches!(
            store.discover_lists().await,
            Err(Error::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_discover_unreadable() -> Result<()> {
        let dir = tempdir()?;
        let store = FileListStore::new(dir.path().join("missing"), Box::new(DefaultClock));
        assert!(matches!(
            store.discover_lists().await,
            Err(Error::DirectoryUnreadable { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_discover_empty_and_foreign_files() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("notes.txt"), "hello")?;
        std::fs::create_dir(dir.path().join("nested.1list"))?;
        let store = FileListStore::new(dir.path().to_owned(), Box::new(DefaultClock));

        assert!(matches!(
            store.discover_lists().await,
            Err(Error::NoListsFound)
        ));
        assert_eq!(
            store.folder_contents().await?,
            FolderContents {
                list_files: vec![],
                other_files: vec!["notes.txt".to_string()],
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_discover() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = FileListStore::new(dir.path().to_owned(), fixed_clock(start()));

        let path = store.create_list("  Groceries ").await?;
        assert_eq!(path, dir.path().join("groceries.1list"));

        let lists = store.discover_lists().await?;
        assert_eq!(lists, vec!["groceries.1list".to_string()]);

        let list = store.load(&path).await?;
        assert_eq!(list, TaskList::new("Groceries", start()));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_same_title_twice() -> Result<()> {
        let dir = tempdir()?;
        let store = FileListStore::new(dir.path().to_owned(), Box::new(DefaultClock));

        store.create_list("Work").await?;
        let second = store.create_list("work").await?;
        assert_eq!(second, dir.path().join("work-1.1list"));

        let lists = store.discover_lists().await?;
        assert_eq!(lists, vec!["work-1.1list".to_string(), "work.1list".to_string()]);
        assert_eq!(
            lists.iter().filter(|name| *name == "work-1.1list").count(),
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_empty_name() -> Result<()> {
        let dir = tempdir()?;
        let store = FileListStore::new(dir.path().to_owned(), Box::new(DefaultClock));
        assert!(matches!(
            store.create_list("   ").await,
            Err(Error::EmptyName)
        ));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_then_discover() -> Result<()> {
        let dir = tempdir()?;
        let store = FileListStore::new(dir.path().to_owned(), Box::new(DefaultClock));
        store.create_list("Home").await?;
        store.create_list("Work").await?;

        store.remove_list("home.1list").await?;

        let lists = store.discover_lists().await?;
        assert!(!lists.contains(&"home.1list".to_string()));
        assert_eq!(lists, vec!["work.1list".to_string()]);

        assert!(matches!(
            store.remove_list("home.1list").await,
            Err(Error::RemoveFailure { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_failures() -> Result<()> {
        let dir = tempdir()?;
        let store = FileListStore::new(dir.path().to_owned(), Box::new(DefaultClock));

        assert!(matches!(
            store.load(&dir.path().join("missing.1list")).await,
            Err(Error::ReadFailure { .. })
        ));

        let broken = dir.path().join("broken.1list");
        std::fs::write(&broken, "{\"title\": ")?;
        assert!(matches!(
            store.load(&broken).await,
            Err(Error::MalformedData { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_into_missing_directory() -> Result<()> {
        let dir = tempdir()?;
        let store = FileListStore::new(dir.path().join("gone"), Box::new(DefaultClock));
        let mut list = TaskList::new("x", start());
        assert!(matches!(
            store.save(&store.list_path("x.1list"), &mut list).await,
            Err(Error::WriteFailure { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_load_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let saved_at = start() + Duration::hours(2);
        let store = FileListStore::new(dir.path().to_owned(), fixed_clock(saved_at));

        let mut list = TaskList::new("Groceries", start());
        list.items.push(Task::new("Milk", start()));

        let mut paused = Task::new("Bread", start() + Duration::nanoseconds(1));
        paused.status = TaskStatus::Paused;
        paused.sessions.push(Session::between(
            start(),
            start() + Duration::nanoseconds(1_500_000_001),
        ));
        paused.total_duration = Duration::nanoseconds(1_500_000_001);
        paused.comment = "wholegrain".into();
        paused.comment_displayed = true;
        list.items.push(paused);

        let mut done = Task::new("Eggs", start());
        done.status = TaskStatus::Done;
        done.completed_at = Some(start() + Duration::minutes(3));
        list.items.push(done);

        let mut active = Task::new("Butter", start());
        active.status = TaskStatus::Active;
        active.active_start_time = Some(start() + Duration::minutes(1));
        list.items.push(active);

        let path = store.list_path("groceries.1list");
        store.save(&path, &mut list).await?;
        assert_eq!(list.updated_at, saved_at);

        let loaded = store.load(&path).await?;
        assert_eq!(loaded, list);
        Ok(())
    }

    /// Walks the whole lifecycle of a list the way the interactive session does.
    #[tokio::test]
    async fn test_groceries_scenario() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;

        let mut times = [0, 0, 5, 10]
            .map(|s| start() + Duration::seconds(s))
            .into_iter();
        let mut clock = MockClock::new();
        clock.expect_time().returning(move || times.next().unwrap());
        let store = FileListStore::new(dir.path().to_owned(), Box::new(DefaultClock));

        assert!(matches!(
            store.discover_lists().await,
            Err(Error::NoListsFound)
        ));

        let path = store.create_list("Groceries").await?;
        assert_eq!(store.discover_lists().await?, vec!["groceries.1list"]);

        let mut list = store.load(&path).await?;
        assert_eq!(list.title, "Groceries");
        assert!(list.items.is_empty());

        // t=0
        timer::add(&mut list, "Milk", &clock)?;
        store.save(&path, &mut list).await?;
        assert_eq!(list.items[0].status, TaskStatus::Pending);

        // t=0
        timer::toggle(&mut list, 1, &clock)?;
        assert_eq!(list.items[0].status, TaskStatus::Active);
        assert_eq!(list.items[0].active_start_time, Some(start()));

        // t=5
        timer::toggle(&mut list, 1, &clock)?;
        store.save(&path, &mut list).await?;
        let milk = &store.load(&path).await?.items[0];
        assert_eq!(milk.status, TaskStatus::Paused);
        assert_eq!(milk.sessions.len(), 1);
        assert_eq!(milk.total_duration, Duration::seconds(5));

        // t=10
        timer::complete(&mut list, 1, &clock)?;
        store.save(&path, &mut list).await?;
        let milk = &store.load(&path).await?.items[0];
        assert_eq!(milk.status, TaskStatus::Done);
        assert_eq!(milk.completed_at, Some(start() + Duration::seconds(10)));
        assert_eq!(milk.total_duration, Duration::seconds(5));
        Ok(())
    }
}
