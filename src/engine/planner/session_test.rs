use crate::engine::errors::PlannerError;
use crate::engine::planner::PlannerSession;
use crate::engine::types::{CompilerErrorGroup, DistributedPlan};
use crate::test_helpers::doubles::ScriptedPlanner;
use crate::test_helpers::factories::TopologyFactory;
use std::sync::atomic::Ordering;

#[test]
fn explicit_release_happens_once() {
    let planner = ScriptedPlanner::compiled(&[1]);
    let releases = planner.releases();
    let topology = TopologyFactory::new().with_collectors(&[1]).create();

    let mut session = PlannerSession::new(Box::new(planner));
    assert!(session.plan(&topology, "q").unwrap().is_compiled());
    session.release();

    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[test]
fn drop_releases_on_compile_rejection() {
    let planner =
        ScriptedPlanner::rejected(CompilerErrorGroup::single(1, 1, "syntax error"));
    let releases = planner.releases();
    let topology = TopologyFactory::new().create();

    {
        let mut session = PlannerSession::new(Box::new(planner));
        let plan = session.plan(&topology, "q").unwrap();
        assert!(matches!(plan, DistributedPlan::Rejected(_)));
    }

    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[test]
fn drop_releases_on_planner_error() {
    let planner = ScriptedPlanner::failing("compiler crashed");
    let releases = planner.releases();
    let topology = TopologyFactory::new().create();

    let result = (|| {
        let mut session = PlannerSession::new(Box::new(planner));
        session.plan(&topology, "q")
    })();

    assert_eq!(
        result,
        Err(PlannerError::Internal("compiler crashed".to_string()))
    );
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[test]
fn borrowed_planner_is_released_by_session() {
    let mut planner = ScriptedPlanner::compiled(&[1, 2]);
    let releases = planner.releases();
    let topology = TopologyFactory::new().create();

    {
        let mut session = PlannerSession::borrowed(&mut planner);
        assert_eq!(session.plan(&topology, "q").unwrap().targets().len(), 2);
    }

    assert_eq!(releases.load(Ordering::SeqCst), 1);
    assert_eq!(planner.plan_calls(), 1);
}

#[test]
fn planner_is_not_released_twice() {
    let planner = ScriptedPlanner::compiled(&[1]);
    let releases = planner.releases();

    let session = PlannerSession::new(Box::new(planner));
    session.release();

    assert_eq!(releases.load(Ordering::SeqCst), 1);
}
