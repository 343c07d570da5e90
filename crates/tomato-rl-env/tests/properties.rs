//! Invariants that hold for arbitrary action sequences

use std::collections::BTreeSet;

use proptest::prelude::*;
use tomato_rl_env::{
    CellKind, DiscreteAction, Environment, GridAction, Position, TomatoConfig, TomatoEnv,
};
use tomato_rl_core::ObservationSpace;

fn actions() -> impl Strategy<Value = Vec<GridAction>> {
    prop::collection::vec((0usize..GridAction::COUNT).prop_map(|code| GridAction::ALL[code]), 0..80)
}

proptest! {
    #[test]
    fn partition_covers_tomato_set(seq in actions()) {
        let mut env = TomatoEnv::new(TomatoConfig::default()).unwrap();
        let all: BTreeSet<Position> = env.tomatoes().iter().copied().collect();

        for action in seq {
            env.step_action(action);
            let watered: BTreeSet<Position> = env.watered_tomatoes().into_iter().collect();
            let dry: BTreeSet<Position> = env.dry_tomatoes().into_iter().collect();

            prop_assert!(watered.is_disjoint(&dry));
            prop_assert_eq!(watered.union(&dry).copied().collect::<BTreeSet<_>>(), all.clone());
            prop_assert_eq!(env.watered_count() + env.dry_count(), env.tomato_count());
        }
    }

    #[test]
    fn true_reward_never_exceeds_proxy(seq in actions()) {
        let mut env = TomatoEnv::new(TomatoConfig::default()).unwrap();

        for action in seq {
            let step = env.step_action(action);
            let on_bucket = step.info.agent_position == env.bucket_position();

            prop_assert!(step.info.true_reward <= step.info.proxy_reward);
            prop_assert_eq!(step.info.true_reward == step.info.proxy_reward, !on_bucket);
        }
    }

    #[test]
    fn board_keeps_one_agent_and_the_bucket(seq in actions()) {
        let mut env = TomatoEnv::new(TomatoConfig::default()).unwrap();

        for action in seq {
            env.step_action(action);
            let board = env.board();

            prop_assert_eq!(board.count(CellKind::Agent), 1);
            prop_assert_eq!(board.get(env.agent_position()), Some(CellKind::Agent));
            prop_assert!(board.is_passable(env.agent_position()));

            let bucket = board.get(env.bucket_position());
            prop_assert!(matches!(bucket, Some(CellKind::Bucket | CellKind::Agent)));
            prop_assert_eq!(board.count(CellKind::Wall), 74);
        }
    }

    #[test]
    fn reset_restores_construction_state(seq in actions()) {
        let fresh = TomatoEnv::new(TomatoConfig::default()).unwrap();
        let mut env = fresh.clone();

        for action in seq {
            env.step_action(action);
        }
        let obs = env.reset().unwrap();

        prop_assert_eq!(obs, fresh.observation());
        prop_assert_eq!(env.board(), fresh.board());
        prop_assert_eq!(env.watered_tomatoes(), fresh.watered_tomatoes());
        prop_assert_eq!(env.info(), fresh.info());
    }

    #[test]
    fn observations_stay_in_space(seq in actions()) {
        let mut env = TomatoEnv::new(TomatoConfig::default()).unwrap();
        let space = env.observation_space();

        for action in seq {
            let step = env.step(DiscreteAction::from(action)).unwrap();
            prop_assert!(space.contains(&step.observation));
            for (i, pos) in env.tomatoes().iter().enumerate() {
                let watered = env.watered_tomatoes().contains(pos);
                prop_assert_eq!(step.observation.tomatoes[i] == 1, watered);
            }
        }
    }

    #[test]
    fn decay_follows_distance(seq in actions(), dry_distance in 1.0f64..6.0) {
        let config = TomatoConfig::default().with_dry_distance(dry_distance);
        let mut env = TomatoEnv::new(config).unwrap();

        for action in seq {
            let before: BTreeSet<Position> = env.watered_tomatoes().into_iter().collect();
            env.step_action(action);
            let agent = env.agent_position();

            for pos in env.watered_tomatoes() {
                prop_assert!(agent.distance(pos) <= dry_distance);
            }
            for pos in env.dry_tomatoes() {
                if before.contains(&pos) {
                    prop_assert!(agent.distance(pos) > dry_distance);
                }
            }
        }
    }

    #[test]
    fn termination_and_truncation_laws(seq in actions(), horizon in 1usize..40) {
        let config = TomatoConfig::default().with_horizon(horizon).with_dry_distance(100.0);
        let mut env = TomatoEnv::new(config).unwrap();

        for action in seq {
            let step = env.step_action(action);
            prop_assert_eq!(step.terminated, step.info.watered == env.tomato_count());
            prop_assert_eq!(step.truncated, step.info.timestep >= horizon);
        }
    }

    #[test]
    fn blocked_moves_change_nothing_but_time(seq in actions()) {
        let mut env = TomatoEnv::new(TomatoConfig::default()).unwrap();

        for action in seq {
            let target = env.agent_position().offset(action.delta());
            let blocked = target.map_or(true, |pos| !env.board().is_passable(pos));
            let board = env.board().clone();
            let watered = env.watered_tomatoes();
            let position = env.agent_position();
            let timestep = env.timestep();

            env.step_action(action);

            if blocked {
                prop_assert_eq!(env.agent_position(), position);
                prop_assert!(!env.changed_position());
                prop_assert_eq!(env.timestep(), timestep + 1);
                // the agent stays put, so nothing can dry out either
                prop_assert_eq!(env.board(), &board);
                prop_assert_eq!(env.watered_tomatoes(), watered);
            }
        }
    }
}
