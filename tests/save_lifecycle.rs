//! End-to-end lifecycle over a scratch data directory: startup assembly with
//! a deployed assets root, export/import, revision retention, and the event
//! log, all through the public API.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::json;

use gridcore::autosave::{self, AutosaveConfig};
use gridcore::core::{Plan, SaveDocument, Trial};
use gridcore::fetch::{FsFetcher, NullFetcher};
use gridcore::metrics::MetricsRecorder;
use gridcore::store::{keys, KvStore, RevisionStore};
use gridcore::SaveManager;

fn scratch() -> (tempfile::TempDir, KvStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = KvStore::open(dir.path().join("keys")).expect("open store");
    (dir, store)
}

#[test]
fn init_against_a_deployed_assets_root() {
    let (dir, store) = scratch();

    let assets = dir.path().join("deploy");
    std::fs::create_dir_all(assets.join("data")).expect("mkdir");
    std::fs::create_dir_all(assets.join("lang")).expect("mkdir");
    // only the second candidate location is deployed
    std::fs::write(
        assets.join("data/updates.json"),
        serde_json::to_string(&json!({
            "version": "2026.08",
            "defaults": {"ui": {"glow": 0.9}},
            "flags": {"learning_enabled_default": true},
        }))
        .expect("serialize"),
    )
    .expect("write manifest");
    std::fs::write(
        assets.join("lang/grid_lang.json"),
        serde_json::to_string(&json!({
            "seeds": {"neon": "skyline at dusk"},
            "prompts": {"intro": "welcome to the grid"},
        }))
        .expect("serialize"),
    )
    .expect("write pack");

    let mut manager = SaveManager::new(store.clone(), Box::new(FsFetcher::new(&assets)));
    let doc = manager.init().expect("init");

    assert_eq!(doc.meta.updates_version.as_deref(), Some("2026.08"));
    assert_eq!(doc.ui.glow, 0.9);
    assert_eq!(doc.flags.learning, Some(true));
    assert_eq!(doc.language.seeds["neon"], json!("skyline at dusk"));
    assert_eq!(doc.language.prompts["intro"], json!("welcome to the grid"));
    assert!(doc.telemetry.last_session.is_some());

    // a second init keeps the manifest-applied state stable
    let again = manager.init().expect("init");
    assert_eq!(again.ui.glow, 0.9);
    assert_eq!(again.flags.learning, Some(true));
}

#[test]
fn export_survives_a_fresh_data_dir_import() {
    let (_dir_a, store_a) = scratch();
    let mut source = SaveManager::new(store_a, Box::new(NullFetcher));
    source.init().expect("init");
    source
        .add_trial(Trial::new("composer", "city of light"))
        .expect("trial");
    source.set_plan(Plan::Gold).expect("plan");
    let exported = source.export_save().expect("export");

    let (_dir_b, store_b) = scratch();
    let mut target = SaveManager::new(store_b, Box::new(NullFetcher));
    let parsed = serde_json::from_str(&exported).expect("parse");
    let doc = target.import_save(&parsed).expect("import");

    assert_eq!(doc.trials.len(), 1);
    assert_eq!(doc.trials[0].app, "composer");
    // the plan lives outside the document and does not travel with it
    assert_eq!(target.plan(), None);
}

#[test]
fn autosave_loop_feeds_a_bounded_revision_history() {
    let (dir, store) = scratch();
    let mut manager = SaveManager::new(store.clone(), Box::new(NullFetcher));
    manager.init().expect("init");

    let revisions_path = dir.path().join("revisions.sqlite");
    let handle = autosave::start(
        store.clone(),
        revisions_path.clone(),
        AutosaveConfig {
            save_every: Duration::from_millis(10),
            snapshot_every: Duration::from_millis(5),
            keep: 4,
        },
    );
    std::thread::sleep(Duration::from_millis(150));
    handle.stop();

    let revisions = RevisionStore::open(&revisions_path).expect("open");
    let listed = revisions.list().expect("list");
    assert!(!listed.is_empty());
    assert!(listed.len() <= 4, "retention cap exceeded: {}", listed.len());
    // ids ascend and payloads are valid documents
    for window in listed.windows(2) {
        assert!(window[0].id < window[1].id);
    }
    for revision in &listed {
        serde_json::from_str::<SaveDocument>(&revision.payload).expect("payload parses");
    }
}

#[test]
fn metrics_log_shares_the_data_dir_and_keeps_its_sid() {
    let (_dir, store) = scratch();
    let recorder = MetricsRecorder::new(store.clone()).expect("recorder");
    let sid = recorder.sid().to_string();

    let mut payload = BTreeMap::new();
    payload.insert("depth".to_string(), json!(40));
    recorder.track("scroll", payload).expect("track");
    recorder.track("click", BTreeMap::new()).expect("track");

    // the log is stored under its flat key next to the save document
    assert!(store.contains(keys::METRICS_LOG));

    let reopened = MetricsRecorder::new(store).expect("recorder");
    assert_eq!(reopened.sid(), sid);
    let events = reopened.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event, "scroll");
    assert_eq!(events[1].event, "click");
}
