use mockview_protocol::{InterviewDraft, NewInterview, QaPair, TimestampWrite, UserId};
use mockview_store::{FileInterviewStore, InterviewStore, MemoryInterviewStore};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const WRITERS: usize = 16;
const ROUNDS: usize = 10;

fn new_interview(owner: &UserId, n: usize) -> NewInterview {
    NewInterview {
        user_id: owner.clone(),
        draft: InterviewDraft {
            position: format!("Engineer {n}"),
            description: "Build APIs".to_string(),
            experience: 3,
            tech_stack: "Rust".to_string(),
        },
        questions: vec![QaPair::new("q", "a")],
        created_at: TimestampWrite::ServerNow,
    }
}

/// After a burst of concurrent creates settles, every watcher must hold the
/// same snapshot a fresh listing returns.
async fn assert_watchers_settle_on_latest(store: Arc<dyn InterviewStore>) {
    for round in 0..ROUNDS {
        let owner = UserId::new(format!("user-{round}"));
        let mut subscription = store.watch_owner(&owner).expect("watch");

        let writers: Vec<_> = (0..WRITERS)
            .map(|n| {
                let store = Arc::clone(&store);
                let interview = new_interview(&owner, n);
                tokio::spawn(async move { store.create(interview).await })
            })
            .collect();
        for writer in writers {
            writer.await.expect("join").expect("create");
        }

        let listed = store.list_by_owner(&owner).await.expect("list");
        assert_eq!(listed.len(), WRITERS);
        assert_eq!(subscription.current(), listed, "round {round}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn file_store_watchers_see_every_concurrent_create() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = FileInterviewStore::new(temp.path()).expect("store");
    assert_watchers_settle_on_latest(Arc::new(store)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn memory_store_watchers_see_every_concurrent_create() {
    assert_watchers_settle_on_latest(Arc::new(MemoryInterviewStore::new())).await;
}
