use smartnai_core::db::open_db_in_memory;
use smartnai_core::{
    default_app_state, FieldUpdate, HostBridge, HostError, HostPage, HostSelectors, Item,
    ItemList, PageField, PageHostBridge, PromptSession, RepoError, RepoResult,
    SnapshotRepository, SnapshotService, SqliteSnapshotRepository, Topic,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

const KEY: &str = "appState";

#[derive(Default)]
struct MemoryRepository {
    payloads: RefCell<HashMap<String, String>>,
    fail_writes: bool,
    writes: Cell<usize>,
}

impl SnapshotRepository for MemoryRepository {
    fn get_snapshot(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.payloads.borrow().get(key).cloned())
    }

    fn put_snapshot(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes {
            return Err(RepoError::Unavailable("disk full".to_string()));
        }
        self.payloads
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

fn full_page() -> HostPage {
    let mut page = HostPage::new();
    page.add_field(PageField::new("textarea").with_id("prompt-input-0"));
    page.add_field(PageField::new("textarea").with_label("Undesired Content"));
    page
}

fn seeded_session(repo: &MemoryRepository) -> PromptSession<&MemoryRepository> {
    let mut session = PromptSession::open(SnapshotService::new(repo), KEY);
    session.set_base_prompt("anime girl,");
    session.add_item(0, "blue hair", ItemList::Items).unwrap();
    session.add_item(0, "red eyes", ItemList::Items).unwrap();
    session.change_level(0, ItemList::Items, 0, 1).unwrap();
    session.add_item(0, "blurry", ItemList::Undesired).unwrap();
    session.change_level(0, ItemList::Undesired, 0, 1).unwrap();
    session
}

#[test]
fn fresh_session_starts_from_default_state() {
    let repo = MemoryRepository::default();
    let session = PromptSession::open(SnapshotService::new(&repo), KEY);

    assert_eq!(session.key(), KEY);
    assert_eq!(session.state(), &default_app_state());
    assert!(session.topic_views().iter().all(|view| !view.open));
}

#[test]
fn commit_pushes_both_fields_and_saves_snapshot() {
    let repo = MemoryRepository::default();
    let mut session = seeded_session(&repo);
    let mut page = full_page();

    let compiled = {
        let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
        session.commit(&mut bridge).unwrap()
    };

    assert_eq!(compiled.prompt_text, "anime girl, {blue hair}, red eyes");
    assert_eq!(compiled.undesired_text, "(blurry)");
    assert_eq!(page.field(0).unwrap().value, compiled.prompt_text);
    assert_eq!(page.field(1).unwrap().value, compiled.undesired_text);
    assert_eq!(page.events().len(), 2);

    let reopened = PromptSession::open(SnapshotService::new(&repo), KEY);
    assert_eq!(reopened.state(), session.state());
}

#[test]
fn commit_without_undesired_field_still_updates_positive() {
    let repo = MemoryRepository::default();
    let mut session = seeded_session(&repo);
    let mut page = HostPage::new();
    page.add_field(PageField::new("textarea").with_id("prompt-input-0"));

    let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
    session.commit(&mut bridge).unwrap();
    drop(bridge);

    assert_eq!(
        page.field(0).unwrap().value,
        "anime girl, {blue hair}, red eyes"
    );
    assert_eq!(repo.writes.get(), 1);
}

#[test]
fn commit_without_positive_field_fails_and_saves_nothing() {
    let repo = MemoryRepository::default();
    let mut session = seeded_session(&repo);
    let mut page = HostPage::new();

    let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
    let err = session.commit(&mut bridge).unwrap_err();

    assert!(err.to_string().contains("#prompt-input-0"));
    assert_eq!(repo.writes.get(), 0);
}

#[test]
fn commit_drops_items_left_blank_without_blur() {
    let repo = MemoryRepository::default();
    let mut session = seeded_session(&repo);
    session
        .update_item_prompt(0, ItemList::Items, 1, "   ")
        .unwrap();
    let mut page = full_page();

    let compiled = {
        let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
        session.commit(&mut bridge).unwrap()
    };

    assert_eq!(compiled.prompt_text, "anime girl, {blue hair}");
    assert_eq!(
        session.state().topic(0).unwrap().items,
        vec![Item::with_level("blue hair", 1)]
    );
    let payload = repo.get_snapshot(KEY).unwrap().unwrap();
    assert!(!payload.contains(r#""prompt":"   ""#));
    assert!(!payload.contains("red eyes"));
}

#[test]
fn failing_undesired_field_does_not_abort_commit() {
    struct BrokenUndesired {
        positive: Option<String>,
    }

    impl HostBridge for BrokenUndesired {
        fn set_positive_prompt_field(&mut self, text: &str) -> Result<(), HostError> {
            self.positive = Some(text.to_string());
            Ok(())
        }

        fn set_undesired_prompt_field(&mut self, _text: &str) -> Result<FieldUpdate, HostError> {
            Err(HostError::Io(io::Error::other("detached")))
        }
    }

    let repo = MemoryRepository::default();
    let mut session = seeded_session(&repo);
    let mut bridge = BrokenUndesired { positive: None };

    let compiled = session.commit(&mut bridge).unwrap();

    assert_eq!(bridge.positive.as_deref(), Some(compiled.prompt_text.as_str()));
    assert_eq!(repo.writes.get(), 1);
    let reopened = PromptSession::open(SnapshotService::new(&repo), KEY);
    assert_eq!(reopened.state(), session.state());
}

#[test]
fn save_failure_keeps_in_memory_state() {
    let repo = MemoryRepository {
        fail_writes: true,
        ..MemoryRepository::default()
    };
    let mut session = seeded_session(&repo);
    let before = session.state().clone();
    let mut page = full_page();

    let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
    session.commit(&mut bridge).unwrap();

    assert_eq!(repo.writes.get(), 1);
    assert_eq!(session.state(), &before);
}

#[test]
fn declined_confirmation_keeps_topic() {
    let repo = MemoryRepository::default();
    let mut session = PromptSession::open(SnapshotService::new(&repo), KEY);
    let mut asked = Vec::new();
    let mut decline = |message: &str| {
        asked.push(message.to_string());
        false
    };

    assert!(!session.remove_topic(0, &mut decline).unwrap());
    assert_eq!(session.state().topics.len(), 1);
    assert_eq!(
        asked,
        vec!["Are you sure you want to delete the topic \"New Topic\"?".to_string()]
    );
}

#[test]
fn accepted_confirmation_removes_topic_and_view_state() {
    let repo = MemoryRepository::default();
    let mut session = PromptSession::open(SnapshotService::new(&repo), KEY);
    let added = session.add_topic();
    assert!(session.view().is_open(added));

    let mut accept = |_: &str| true;
    assert!(session.remove_topic(1, &mut accept).unwrap());

    assert_eq!(session.state().topics.len(), 1);
    assert!(!session.view().is_open(added));
}

#[test]
fn staged_text_becomes_item_and_clears_staging() {
    let repo = MemoryRepository::default();
    let mut session = PromptSession::open(SnapshotService::new(&repo), KEY);
    let id = session.state().topic(0).unwrap().id();

    session.set_staging(0, ItemList::Undesired, "lowres").unwrap();
    assert!(session.commit_staged_item(0, ItemList::Undesired).unwrap());

    assert_eq!(
        session.state().topic(0).unwrap().undesired,
        vec![Item::new("lowres")]
    );
    assert_eq!(session.view().staging(id, ItemList::Undesired), "");
}

#[test]
fn blank_staged_text_adds_nothing() {
    let repo = MemoryRepository::default();
    let mut session = PromptSession::open(SnapshotService::new(&repo), KEY);

    session.set_staging(0, ItemList::Items, "   ").unwrap();
    assert!(!session.commit_staged_item(0, ItemList::Items).unwrap());
    assert!(session.state().topic(0).unwrap().items.is_empty());
}

#[test]
fn emptied_item_is_removed_on_blur() {
    let repo = MemoryRepository::default();
    let mut session = seeded_session(&repo);

    session
        .update_item_prompt(0, ItemList::Items, 1, "   ")
        .unwrap();
    assert!(session.on_item_blur(0, ItemList::Items, 1).unwrap());
    assert!(!session.on_item_blur(0, ItemList::Items, 0).unwrap());

    assert_eq!(
        session.state().topic(0).unwrap().items,
        vec![Item::with_level("blue hair", 1)]
    );
}

#[test]
fn toggle_open_is_view_only_and_never_persisted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let mut session = PromptSession::open(SnapshotService::new(&repo), KEY);

    assert!(session.toggle_topic_open(0).unwrap());
    assert!(session.topic_views()[0].open);
    let mut page = full_page();
    let mut bridge = PageHostBridge::new(&mut page, HostSelectors::default());
    session.commit(&mut bridge).unwrap();

    let payload = repo.get_snapshot(KEY).unwrap().unwrap();
    assert!(!payload.contains("open"));
    let reopened = PromptSession::open(SnapshotService::new(&repo), KEY);
    assert_eq!(reopened.state(), session.state());
    assert!(!reopened.topic_views()[0].open);
}

#[test]
fn inactive_and_reordered_topics_compile_in_order() {
    let repo = MemoryRepository::default();
    let mut session = PromptSession::open(SnapshotService::new(&repo), KEY);
    session.add_item(0, "cat", ItemList::Items).unwrap();
    session.add_topic();
    session.rename_topic(1, "Second").unwrap();
    session.add_item(1, "dog", ItemList::Items).unwrap();

    session.move_topic(1, 0).unwrap();
    assert_eq!(session.preview().prompt_text, "dog, cat");

    session.toggle_topic_active(0).unwrap();
    assert_eq!(session.preview().prompt_text, "cat");
    assert_eq!(session.state().topic(0).unwrap().name, "Second");
}

#[test]
fn custom_bridge_sees_compiled_text() {
    struct Recorder {
        positive: Option<String>,
    }

    impl HostBridge for Recorder {
        fn set_positive_prompt_field(&mut self, text: &str) -> Result<(), HostError> {
            self.positive = Some(text.to_string());
            Ok(())
        }

        fn set_undesired_prompt_field(&mut self, _text: &str) -> Result<FieldUpdate, HostError> {
            Ok(FieldUpdate::Skipped)
        }
    }

    let repo = MemoryRepository::default();
    let mut session = PromptSession::open(SnapshotService::new(&repo), KEY);
    session.add_item(0, "dog", ItemList::Items).unwrap();
    session.change_level(0, ItemList::Items, 0, -1).unwrap();

    let mut recorder = Recorder { positive: None };
    session.commit(&mut recorder).unwrap();
    assert_eq!(recorder.positive.as_deref(), Some("[dog]"));
}

#[test]
fn out_of_range_edits_leave_state_untouched() {
    let repo = MemoryRepository::default();
    let mut session = PromptSession::open(SnapshotService::new(&repo), KEY);
    let before = session.state().clone();

    assert!(session.rename_topic(3, "x").is_err());
    assert!(session.remove_item(0, ItemList::Items, 0).is_err());
    assert!(session.toggle_topic_open(4).is_err());
    assert_eq!(session.state(), &before);

    let unused = Topic::new("unused");
    assert!(!session.view().is_open(unused.id()));
}
