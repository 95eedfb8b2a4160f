use dagdog::{Dag, DagdogError, NodeState, Target};
use dagdog_test_utils::actions::ExecutionLog;
use dagdog_test_utils::builders::{TaskListBuilder, chain_tasks, diamond_dag};
use dagdog_test_utils::{init_tracing, temp_state_dir};

#[test]
fn whole_dag_runs_in_index_order() {
    init_tracing();
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("all", dir.path(), &log);

    let summary = dag.run(Target::All).unwrap();
    assert_eq!(summary.executed, vec!["a", "b", "c", "d"]);
    assert_eq!(log.executed(), vec!["a", "b", "c", "d"]);

    for name in ["a", "b", "c", "d"] {
        let state = dag.state(name).unwrap();
        assert!(state.start_ns.is_some(), "{name} should have started");
        assert!(state.finish_ns >= state.start_ns, "{name} should have finished");
    }
}

#[test]
fn none_target_means_whole_dag() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("none", dir.path(), &log);

    let summary = dag.run(None::<usize>).unwrap();
    assert_eq!(summary.executed.len(), 4);
}

#[test]
fn single_position_runs_only_that_task() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("single", dir.path(), &log);

    let summary = dag.run(3).unwrap();
    assert_eq!(summary.executed, vec!["d"]);
    assert_eq!(dag.state("a").unwrap(), NodeState::default());
}

#[test]
fn single_position_runs_even_when_fresh() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("single-fresh", dir.path(), &log);

    dag.run(0).unwrap();
    dag.run(0).unwrap();
    assert_eq!(log.executed(), vec!["a", "a"]);
}

#[test]
fn unknown_position_runs_nothing() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("unknown", dir.path(), &log);

    assert!(matches!(
        dag.run(10),
        Err(DagdogError::UnknownPosition { position: 10, len: 4 })
    ));
    assert!(log.executed().is_empty());
}

#[test]
fn repeated_backfill_only_runs_what_is_missing() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("backfill", dir.path(), &log);

    dag.run("+2").unwrap();
    log.clear();

    let summary = dag.run("+3").unwrap();
    assert_eq!(summary.executed, vec!["b", "d"]);

    let summary = dag.run("+3").unwrap();
    assert!(summary.is_empty());

    let summary = dag.run(Target::forced("+3")).unwrap();
    assert_eq!(summary.executed, vec!["a", "b", "c", "d"]);
}

#[test]
fn failing_task_halts_run_and_stays_unfinished() {
    init_tracing();
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let tasks = TaskListBuilder::new(&log)
        .task("a", &[])
        .failing_task("b", &["a"])
        .task("c", &["a"])
        .task("d", &["b", "c"])
        .build();
    let mut dag = Dag::new("failing", tasks, dir.path()).unwrap();

    match dag.run(Target::All) {
        Err(DagdogError::TaskExecution { task, source }) => {
            assert_eq!(task, "b");
            assert!(source.to_string().contains("exploded"));
        }
        other => panic!("expected TaskExecution, got {other:?}"),
    }

    assert_eq!(log.executed(), vec!["a", "b"]);

    let b = dag.state("b").unwrap();
    assert!(b.start_ns.is_some());
    assert!(b.finish_ns.is_none());
    assert_eq!(dag.state("c").unwrap(), NodeState::default());

    // The failed task and everything downstream of it is still pending.
    let positions: Vec<usize> = dag
        .select("+3", false)
        .unwrap()
        .iter()
        .map(|e| e.position)
        .collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn chain_backfill_resumes_after_interruption() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = Dag::new("chain", chain_tasks(&log, 5), dir.path()).unwrap();

    dag.run("+2").unwrap();
    log.clear();

    dag.run("+4").unwrap();
    assert_eq!(log.executed(), vec!["t3", "t4"]);
}

/// Mirrors the intended interactive workflow end to end.
#[test]
fn demo_workflow() {
    let dir = temp_state_dir();
    let log = ExecutionLog::new();
    let mut dag = diamond_dag("demo", dir.path(), &log);

    dag.delete_cache().unwrap();
    let all: Vec<usize> = dag.index().iter().map(|e| e.position).collect();
    assert!(all.windows(2).all(|w| w[0] < w[1]));

    dag.delete_cache().unwrap();
    dag.run("+2").unwrap();
    let positions: Vec<usize> = dag
        .select("+3", false)
        .unwrap()
        .iter()
        .map(|e| e.position)
        .collect();
    assert_eq!(positions, vec![1, 3]);

    let forced: Vec<usize> = dag
        .select("+3", true)
        .unwrap()
        .iter()
        .map(|e| e.position)
        .collect();
    assert_eq!(forced, all);

    dag.run(Target::All).unwrap();
    dag.run(0).unwrap();
}
