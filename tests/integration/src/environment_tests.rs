//! Environment discovery against scripted candidates

use tempfile::TempDir;
use testbed_core::{EnvironmentConfig, Error, TestbedSession};
use testbed_test_utils::engine::InMemoryEngine;
use testbed_test_utils::probe::{ScriptedOutcome, ScriptedProbe};

fn session_with(
    parent_paths: Vec<std::path::PathBuf>,
    parent_urls: Vec<&str>,
    probe: &ScriptedProbe,
) -> TestbedSession {
    let config = EnvironmentConfig {
        parent_paths,
        parent_urls: parent_urls.into_iter().map(str::to_string).collect(),
    };
    TestbedSession::with_collaborators(
        "environment_tests",
        config,
        Box::new(probe.clone()),
        Box::new(InMemoryEngine::new()),
    )
}

#[test]
fn test_first_writable_parent_path_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let probe = ScriptedProbe::new();
    let mut session = session_with(
        vec![
            "/does/not/exist".into(),
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ],
        vec![],
        &probe,
    );

    let resolved = session.local_parent_path().unwrap();
    assert_eq!(resolved, first.path());
}

#[test]
fn test_no_parent_path_reports_all_candidates() {
    let probe = ScriptedProbe::new();
    let mut session = session_with(
        vec!["/does/not/exist".into(), "/also/missing".into()],
        vec![],
        &probe,
    );

    let err = session.local_parent_path().unwrap_err();
    match err {
        Error::ParentPathNotFound { tried } => {
            assert_eq!(tried, vec!["/does/not/exist", "/also/missing"]);
        }
        other => panic!("expected ParentPathNotFound, got {other:?}"),
    }
}

#[test]
fn test_refused_and_rejected_candidates_are_skipped() {
    let probe = ScriptedProbe::new()
        .on("http://one.invalid/svn/", ScriptedOutcome::Refused)
        .on("http://two.invalid/svn/", ScriptedOutcome::Status(404))
        .on("http://three.invalid/svn/", ScriptedOutcome::Status(401));
    let mut session = session_with(
        vec![],
        vec![
            "http://one.invalid/svn/",
            "http://two.invalid/svn/",
            "http://three.invalid/svn/",
        ],
        &probe,
    );

    let resolved = session.http_parent_url().unwrap();
    assert_eq!(resolved.as_str(), "http://three.invalid/svn/");
    assert_eq!(probe.issued().len(), 3);
}

#[test]
fn test_status_200_is_accepted() {
    let probe = ScriptedProbe::new().on("http://one.invalid/svn/", ScriptedOutcome::Status(200));
    let mut session = session_with(vec![], vec!["http://one.invalid/svn/"], &probe);
    assert!(session.http_parent_url().is_ok());
}

#[test]
fn test_transport_failure_aborts_discovery() {
    let probe = ScriptedProbe::new()
        .on(
            "http://one.invalid/svn/",
            ScriptedOutcome::Transport("proxy rejected request".into()),
        )
        .on("http://two.invalid/svn/", ScriptedOutcome::Status(200));
    let mut session = session_with(
        vec![],
        vec!["http://one.invalid/svn/", "http://two.invalid/svn/"],
        &probe,
    );

    let err = session.http_parent_url().unwrap_err();
    assert!(matches!(err, Error::Probe { .. }));
    // the healthy second candidate was never consulted
    assert_eq!(probe.issued().len(), 1);
}

#[test]
fn test_no_parent_url_reports_all_candidates() {
    let probe = ScriptedProbe::new();
    let mut session = session_with(
        vec![],
        vec!["http://one.invalid/svn/", "http://two.invalid/svn/"],
        &probe,
    );

    let err = session.http_parent_url().unwrap_err();
    match err {
        Error::ParentUrlNotFound { tried } => {
            assert_eq!(
                tried,
                vec!["http://one.invalid/svn/", "http://two.invalid/svn/"]
            );
        }
        other => panic!("expected ParentUrlNotFound, got {other:?}"),
    }
}

#[test]
fn test_resolved_url_gains_trailing_slash() {
    let probe = ScriptedProbe::new().on("http://one.invalid/svn", ScriptedOutcome::Status(200));
    let mut session = session_with(vec![], vec!["http://one.invalid/svn"], &probe);

    let resolved = session.http_parent_url().unwrap();
    assert_eq!(resolved.as_str(), "http://one.invalid/svn/");
}

#[test]
fn test_invalid_candidate_url_is_fatal() {
    let probe = ScriptedProbe::new();
    let mut session = session_with(vec![], vec!["not a url"], &probe);
    assert!(matches!(
        session.http_parent_url().unwrap_err(),
        Error::InvalidUrl { .. }
    ));
}

#[test]
fn test_resolution_happens_once_per_session() {
    let mut fixture = testbed_test_utils::fixture::session("environment_tests");

    fixture.session.http_parent_url().unwrap();
    fixture.session.http_parent_url().unwrap();
    fixture.session.repository().unwrap();
    fixture.session.repository().unwrap();

    assert_eq!(fixture.probe.issued().len(), 1);
    fixture.session.tear_down().unwrap();
}
