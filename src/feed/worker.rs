//! Background execution of refresh and load-more actions.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::refresh::Completion;

use super::{FeedClient, FeedQuery, FeedSource, fetch_app_list};

/// Result of a background action, delivered to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// A refresh finished; errors are carried as display strings.
    Refreshed(Result<super::AppList, String>),
    /// The next page may be revealed.
    PageRevealed,
}

/// Spawns feed actions on background threads.
///
/// Each action sends its [`FeedMessage`] before completing its token, so the
/// data is already queued when the refresh machine sees the completion.
#[derive(Debug, Clone)]
pub struct FeedWorker {
    client: FeedClient,
    source: FeedSource,
    /// Shared with the UI so search edits apply to the next refresh.
    query: Rc<RefCell<FeedQuery>>,
    latency: Duration,
    tx: Sender<FeedMessage>,
}

impl FeedWorker {
    /// Create a worker and the receiver its messages arrive on.
    pub fn new(
        client: FeedClient,
        source: FeedSource,
        query: FeedQuery,
        latency: Duration,
    ) -> (Self, Receiver<FeedMessage>) {
        let (tx, rx) = mpsc::channel();
        let worker = Self {
            client,
            source,
            query: Rc::new(RefCell::new(query)),
            latency,
            tx,
        };
        (worker, rx)
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    pub fn query(&self) -> FeedQuery {
        self.query.borrow().clone()
    }

    /// Change the search term used by subsequent refreshes.
    pub fn set_term(&self, term: &str) {
        self.query.borrow_mut().term = term.trim().to_string();
    }

    /// Re-fetch the list, then complete.
    pub fn spawn_refresh(&self, completion: Completion) {
        let client = self.client.clone();
        let source = self.source.clone();
        let query = self.query();
        let latency = self.latency;
        let tx = self.tx.clone();

        thread::spawn(move || {
            thread::sleep(latency);
            let result = fetch_app_list(&client, &source, &query).map_err(|e| {
                warn!("refresh failed: {e}");
                e.to_string()
            });
            if tx.send(FeedMessage::Refreshed(result)).is_err() {
                debug!("refresh result dropped: UI loop has exited");
            }
            info!("{} action finished", completion.edge());
            completion.complete();
        });
    }

    /// Wait out the latency, reveal the next page, then complete.
    pub fn spawn_load_more(&self, completion: Completion) {
        let latency = self.latency;
        let tx = self.tx.clone();

        thread::spawn(move || {
            thread::sleep(latency);
            if tx.send(FeedMessage::PageRevealed).is_err() {
                debug!("load-more result dropped: UI loop has exited");
            }
            info!("{} action finished", completion.edge());
            completion.complete();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::{RefreshMachine, RefreshState, Thresholds};
    use std::io::Write;
    use std::time::Instant;

    fn file_worker(body: &str) -> (FeedWorker, Receiver<FeedMessage>, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{body}").unwrap();
        let source = FeedSource::File {
            path: file.path().to_path_buf(),
        };
        let (worker, rx) = FeedWorker::new(
            FeedClient::new().unwrap(),
            source,
            FeedQuery::default(),
            Duration::ZERO,
        );
        (worker, rx, file)
    }

    fn machine_for(worker: &FeedWorker) -> RefreshMachine {
        let top = worker.clone();
        let bottom = worker.clone();
        RefreshMachine::new(
            Thresholds::uniform(68.0),
            move |token| top.spawn_refresh(token),
            move |token| bottom.spawn_load_more(token),
        )
    }

    fn pump_until_idle(machine: &mut RefreshMachine) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while machine.state() != RefreshState::Idle {
            assert!(Instant::now() < deadline, "action never completed");
            machine.pump();
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_refresh_sends_list_then_completes() {
        let (worker, rx, _file) =
            file_worker(r#"{"resultCount":1,"results":[{"trackName":"One"}]}"#);
        let mut machine = machine_for(&worker);

        machine.update_offset(80.0);
        machine.update_offset(10.0);
        assert_eq!(machine.state(), RefreshState::TopLoading);

        pump_until_idle(&mut machine);
        match rx.try_recv().unwrap() {
            FeedMessage::Refreshed(Ok(list)) => assert_eq!(list.results[0].track_name, "One"),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_refresh_failure_still_completes() {
        let (worker, rx, _file) = file_worker("not json");
        let mut machine = machine_for(&worker);

        machine.update_offset(80.0);
        machine.update_offset(10.0);
        pump_until_idle(&mut machine);

        assert!(matches!(rx.try_recv().unwrap(), FeedMessage::Refreshed(Err(_))));
    }

    #[test]
    fn test_load_more_reveals_page() {
        let (worker, rx, _file) = file_worker("{}");
        let mut machine = machine_for(&worker);

        machine.update_offset(-80.0);
        machine.update_offset(-10.0);
        assert_eq!(machine.state(), RefreshState::BottomLoading);

        pump_until_idle(&mut machine);
        assert_eq!(rx.try_recv().unwrap(), FeedMessage::PageRevealed);
    }

    #[test]
    fn test_set_term_is_shared_between_clones() {
        let (worker, _rx, _file) = file_worker("{}");
        let clone = worker.clone();
        clone.set_term("  notes ");
        assert_eq!(worker.query().term, "notes");
    }
}
