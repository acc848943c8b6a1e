// tests/dag_sort_property.rs

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use taskweave::dag::sort_tasks_to_run;
use taskweave::task::Registry;

// Acyclic by construction: task i may only depend on tasks 0..i.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    if i == 0 {
                        return Vec::new();
                    }
                    let unique: HashSet<usize> = deps.into_iter().map(|d| d % i).collect();
                    unique.into_iter().collect()
                })
                .collect()
        })
    })
}

fn build_registry(deps: &[Vec<usize>]) -> Registry {
    let mut registry = Registry::new();
    for (i, task_deps) in deps.iter().enumerate() {
        registry
            .declare(format!("task_{i}"))
            .unwrap()
            .depends_on(task_deps.iter().map(|d| format!("task_{d}")))
            .run(|_| Ok(()));
    }
    registry
}

proptest! {
    #[test]
    fn sorted_order_respects_every_dependency(
        deps in dag_strategy(12),
        picks in proptest::collection::vec(any::<usize>(), 1..4),
    ) {
        let registry = build_registry(&deps);
        let requested: Vec<String> = picks
            .iter()
            .map(|p| format!("task_{}", p % deps.len()))
            .collect();

        let run = sort_tasks_to_run(registry.tasks(), requested.as_slice()).unwrap();
        let position: HashMap<&str, usize> = run
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name(), i))
            .collect();

        // Every task appears once, and after all of its dependencies.
        prop_assert_eq!(position.len(), run.tasks.len());
        for task in &run.tasks {
            for dep in task.dependencies() {
                let dep_pos = position.get(dep.as_str()).copied();
                prop_assert!(dep_pos.is_some(), "dependency {} missing", dep);
                prop_assert!(dep_pos.unwrap() < position[task.name()]);
            }
        }

        // Every requested task is included.
        for name in &requested {
            prop_assert!(position.contains_key(name.as_str()));
        }

        // The same request always sorts the same way.
        let again = sort_tasks_to_run(registry.tasks(), requested.as_slice()).unwrap();
        prop_assert_eq!(run.task_names(), again.task_names());
    }
}
