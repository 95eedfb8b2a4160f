use std::io;

use dagdog::cache::{CacheMap, ExecutionCache, MemoryStore, StateStore, cache_file_path};
use dagdog::{Dag, DagdogError, NodeState, Target};
use dagdog_test_utils::actions::ExecutionLog;
use dagdog_test_utils::builders::{diamond_dag, diamond_tasks};
use dagdog_test_utils::{init_tracing, temp_state_dir};

#[test]
fn start_then_finish_round_trips_through_disk() {
    init_tracing();
    let dir = temp_state_dir();
    let mut cache = ExecutionCache::open(dir.path(), "roundtrip", ["x"]).unwrap();

    assert_eq!(cache.state("x").unwrap(), NodeState::default());

    cache.start("x").unwrap();
    let started = ExecutionCache::open(dir.path(), "roundtrip", ["x"])
        .unwrap()
        .state("x")
        .unwrap();
    assert!(started.start_ns.is_some());
    assert!(started.finish_ns.is_none());

    cache.finish("x").unwrap();
    let finished = ExecutionCache::open(dir.path(), "roundtrip", ["x"])
        .unwrap()
        .state("x")
        .unwrap();
    assert_eq!(finished.start_ns, started.start_ns);
    assert!(finished.finish_ns.unwrap() >= started.start_ns.unwrap());
}

#[test]
fn start_discards_previous_finish() {
    let dir = temp_state_dir();
    let mut cache = ExecutionCache::open(dir.path(), "restart", ["x"]).unwrap();

    cache.start("x").unwrap();
    cache.finish("x").unwrap();
    let first = cache.state("x").unwrap();

    cache.start("x").unwrap();
    let second = cache.state("x").unwrap();
    assert!(second.start_ns >= first.start_ns);
    assert_eq!(second.finish_ns, None);
}

#[test]
fn cache_file_is_json_keyed_by_task_name() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("layout", dir.path(), &log);

    dag.run(0).unwrap();

    let path = cache_file_path(dir.path(), "layout");
    let contents = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();

    assert!(json["a"]["start_ns"].is_u64());
    assert!(json["a"]["finish_ns"].is_u64());
    assert!(json["d"]["start_ns"].is_null());
    assert!(json["d"]["finish_ns"].is_null());
}

#[test]
fn history_survives_a_new_dag_instance() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();

    {
        let mut dag = diamond_dag("restart", dir.path(), &log);
        dag.run("+2").unwrap();
    }

    let mut reopened = diamond_dag("restart", dir.path(), &log);
    let positions: Vec<usize> = reopened
        .select("+3", false)
        .unwrap()
        .iter()
        .map(|e| e.position)
        .collect();
    assert_eq!(positions, vec![1, 3]);
}

#[test]
fn caches_are_namespaced_by_dag_name() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();

    let mut first = diamond_dag("first", dir.path(), &log);
    first.run(Target::All).unwrap();

    let mut second = diamond_dag("second", dir.path(), &log);
    assert_eq!(second.select("+3", false).unwrap().len(), 4);
    assert!(first.select("+3", false).unwrap().is_empty());
}

#[test]
fn writes_from_another_instance_are_observed() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();

    let mut reader = diamond_dag("shared", dir.path(), &log);
    assert_eq!(reader.select("+3", false).unwrap().len(), 4);

    let mut writer = diamond_dag("shared", dir.path(), &log);
    writer.run(Target::All).unwrap();

    assert!(reader.select("+3", false).unwrap().is_empty());
}

#[test]
fn delete_resets_history() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("reset", dir.path(), &log);

    dag.run(Target::All).unwrap();
    assert!(cache_file_path(dir.path(), "reset").exists());

    dag.delete_cache().unwrap();
    assert!(!cache_file_path(dir.path(), "reset").exists());
    assert_eq!(dag.state("a").unwrap(), NodeState::default());
    assert_eq!(dag.select("+3", false).unwrap().len(), 4);

    // Deleting twice is fine.
    dag.delete_cache().unwrap();
}

#[test]
fn delete_from_another_instance_is_not_undone() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();

    let mut first = diamond_dag("shared-delete", dir.path(), &log);
    first.run("+3").unwrap();

    let mut second = diamond_dag("shared-delete", dir.path(), &log);
    second.delete_cache().unwrap();

    // The first instance sees the deletion instead of its old view.
    assert_eq!(first.select("+3", false).unwrap().len(), 4);

    // Writing through the first instance must not resurrect other tasks.
    first.run(0).unwrap();
    assert!(second.state("a").unwrap().has_finished());
    assert_eq!(second.state("d").unwrap(), NodeState::default());
}

#[test]
fn reload_drops_tasks_missing_from_the_store() {
    let dir = temp_state_dir();
    let mut cache = ExecutionCache::open(dir.path(), "partial", ["x", "y"]).unwrap();
    cache.start("x").unwrap();
    cache.finish("x").unwrap();
    cache.start("y").unwrap();

    // Another writer replaces the file with one that only knows `x`.
    let path = cache_file_path(dir.path(), "partial");
    std::fs::write(&path, r#"{ "x": { "start_ns": 1, "finish_ns": 2 } }"#).unwrap();

    let snapshot = cache.snapshot().unwrap();
    assert_eq!(snapshot["x"], NodeState { start_ns: Some(1), finish_ns: Some(2) });
    assert_eq!(snapshot["y"], NodeState::default());
}

#[test]
fn corrupt_cache_file_is_reported_not_guessed() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("corrupt", dir.path(), &log);

    std::fs::write(cache_file_path(dir.path(), "corrupt"), b"{ not json").unwrap();

    assert!(matches!(
        dag.select("+3", false),
        Err(DagdogError::CacheCorrupt { .. })
    ));
    assert!(matches!(
        dag.run(0),
        Err(DagdogError::CacheCorrupt { .. })
    ));
    assert!(log.executed().is_empty());
}

/// Store whose writes always fail.
#[derive(Debug, Default)]
struct ReadOnlyStore;

impl StateStore for ReadOnlyStore {
    fn load(&self) -> dagdog::Result<Option<CacheMap>> {
        Ok(None)
    }

    fn save(&mut self, _nodes: &CacheMap) -> dagdog::Result<()> {
        Err(DagdogError::CacheIo {
            path: "read-only".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only store"),
        })
    }

    fn delete(&mut self) -> dagdog::Result<()> {
        Ok(())
    }
}

#[test]
fn failed_write_aborts_before_the_action_runs() {
    let log = ExecutionLog::new();
    let mut dag = Dag::with_store("readonly", diamond_tasks(&log), Box::new(ReadOnlyStore)).unwrap();

    assert!(matches!(dag.run(0), Err(DagdogError::CacheIo { .. })));
    assert!(log.executed().is_empty());
    assert_eq!(dag.state("a").unwrap(), NodeState::default());
}

#[test]
fn memory_store_keeps_history_for_its_lifetime() {
    let log = ExecutionLog::new();
    let mut dag =
        Dag::with_store("memory", diamond_tasks(&log), Box::new(MemoryStore::new())).unwrap();

    dag.run("+2").unwrap();
    let positions: Vec<usize> = dag
        .select("+3", false)
        .unwrap()
        .iter()
        .map(|e| e.position)
        .collect();
    assert_eq!(positions, vec![1, 3]);
    assert!(dag.state_dir().is_none());
}
