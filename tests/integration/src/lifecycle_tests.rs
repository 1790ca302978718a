//! Full provisioning/teardown lifecycle against the fakes

use pretty_assertions::assert_eq;
use testbed_core::{Error, NamePolicy};
use testbed_test_utils::fixture::{self, PARENT_URL};

#[test]
fn test_generated_repositories_are_distinct() {
    let mut fixture = fixture::session("lifecycle_tests");

    let first = fixture.session.repository().unwrap();
    let second = fixture.session.repository().unwrap();

    assert_ne!(first.name(), second.name());
    assert_ne!(first.local_path(), second.local_path());
    assert!(first.local_path().exists());
    assert!(second.local_path().exists());
    assert_eq!(fixture.engine.repository_names().len(), 2);

    fixture.session.tear_down().unwrap();
}

#[test]
fn test_repository_looks_like_a_repository() {
    let mut fixture = fixture::session("lifecycle_tests");

    let repo = fixture.session.repository().unwrap();

    assert!(repo.url().as_str().starts_with(PARENT_URL));
    assert!(!repo.url().as_str().ends_with('/'));
    assert!(repo.name().contains("lifecycle_tests"));
    assert!(repo.local_path().join("format").exists());
    assert_eq!(repo.username(), "test");
    assert_eq!(repo.password(), "test");

    let info = repo.connection().info().unwrap();
    assert_eq!(info.head_revision, 0);
    assert_eq!(info.root_url.as_str(), repo.url().as_str());

    fixture.session.tear_down().unwrap();
}

#[test]
fn test_explicit_name_is_used_verbatim() {
    let mut fixture = fixture::session("lifecycle_tests");

    let repo = fixture.session.repository_named("testaut1").unwrap();

    assert_eq!(repo.name(), "testaut1");
    assert_eq!(
        repo.local_path().file_name().unwrap().to_str().unwrap(),
        "testaut1"
    );
    assert!(repo.url().as_str().ends_with("/testaut1"));

    fixture.session.tear_down().unwrap();
}

#[test]
fn test_explicit_name_collision_is_refused() {
    let mut fixture = fixture::session("lifecycle_tests");

    fixture.session.repository_named("testaut1").unwrap();
    let err = fixture.session.repository_named("testaut1").unwrap_err();

    match err {
        Error::NameCollision { name, .. } => assert_eq!(name, "testaut1"),
        other => panic!("expected NameCollision, got {other:?}"),
    }

    fixture.session.tear_down().unwrap();
}

#[test]
fn test_teardown_deletes_non_kept_repositories() {
    let mut fixture = fixture::session("lifecycle_tests");

    let repo = fixture.session.repository().unwrap();
    let path = repo.local_path().to_path_buf();
    assert!(path.exists());

    let summary = fixture.session.tear_down().unwrap();

    assert!(!path.exists());
    assert_eq!(summary.deleted, vec![repo.name().to_string()]);
    assert!(summary.kept.is_empty());
    assert_eq!(fixture.session.registered(), 0);
}

#[test]
fn test_kept_significant_repository_is_renamed_aside() {
    let mut fixture = fixture::session("lifecycle_tests");

    let repo = fixture.session.repository_named("keepme").unwrap();
    repo.keep();
    let original = repo.local_path().to_path_buf();

    let summary = fixture.session.tear_down().unwrap();

    assert!(!original.exists());
    assert_eq!(summary.kept.len(), 1);
    let kept = &summary.kept[0];
    assert!(kept.name.starts_with("keepme."));
    assert!(kept.local_path.exists());
    assert!(kept.local_path.join("format").exists());
    assert!(kept.url.as_str().ends_with(&kept.name));
}

#[test]
fn test_kept_incidental_repository_stays_in_place() {
    let mut fixture = fixture::session("lifecycle_tests");

    let repo = fixture.session.repository().unwrap();
    repo.keep();
    let original = repo.local_path().to_path_buf();

    let summary = fixture.session.tear_down().unwrap();

    assert!(original.exists());
    assert_eq!(summary.kept.len(), 1);
    assert_eq!(summary.kept[0].name, repo.name());
    assert_eq!(summary.kept[0].local_path, original);
}

#[test]
fn test_keep_matrix_across_two_repositories() {
    let mut fixture = fixture::session("lifecycle_tests");

    let a = fixture
        .session
        .repository_with_policy("a", NamePolicy::Incidental)
        .unwrap();
    a.keep();
    let b = fixture
        .session
        .repository_with_policy("b", NamePolicy::Incidental)
        .unwrap();
    let a_path = a.local_path().to_path_buf();
    let b_path = b.local_path().to_path_buf();

    fixture.session.tear_down().unwrap();

    assert!(a_path.exists());
    assert!(!b_path.exists());
}

#[test]
fn test_set_keep_can_be_reverted() {
    let mut fixture = fixture::session("lifecycle_tests");

    let repo = fixture.session.repository().unwrap();
    repo.keep();
    repo.set_keep(false);
    let path = repo.local_path().to_path_buf();

    fixture.session.tear_down().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_teardown_is_single_shot() {
    let mut fixture = fixture::session("lifecycle_tests");

    fixture.session.repository().unwrap();
    fixture.session.tear_down().unwrap();

    // nothing left to process
    let summary = fixture.session.tear_down().unwrap();
    assert!(summary.kept.is_empty());
    assert!(summary.deleted.is_empty());
}

#[test]
fn test_failed_delete_is_fatal_but_processing_continues() {
    let mut fixture = fixture::session("lifecycle_tests");

    let first = fixture.session.repository().unwrap();
    let second = fixture.session.repository().unwrap();
    let second_path = second.local_path().to_path_buf();

    // sabotage the first delete by removing the tree out-of-band
    std::fs::remove_dir_all(first.local_path()).unwrap();

    let err = fixture.session.tear_down().unwrap_err();
    assert!(matches!(err, Error::Teardown { .. }));

    // the second repository was still reclaimed and the registry is empty
    assert!(!second_path.exists());
    assert_eq!(fixture.session.registered(), 0);
}

#[test]
fn test_connect_adopts_existing_repository() {
    let mut fixture = fixture::session("lifecycle_tests");

    let path = fixture.parent.path().join("external");
    fixture.engine.seed_repository(&path);
    let url = url::Url::parse(&format!("{PARENT_URL}external")).unwrap();

    let adopted = fixture.session.connect(&path, url.clone()).unwrap();

    assert_eq!(adopted.name(), "external");
    assert_eq!(adopted.url().as_str(), url.as_str());
    assert!(adopted.is_kept());
    assert_eq!(adopted.connection().info().unwrap().head_revision, 0);

    let summary = fixture.session.tear_down().unwrap();
    assert!(path.exists());
    assert_eq!(summary.kept.len(), 1);
    assert_eq!(summary.kept[0].name, "external");
}

#[test]
fn test_connect_to_missing_repository_fails() {
    let mut fixture = fixture::session("lifecycle_tests");

    let path = fixture.parent.path().join("ghost");
    let url = url::Url::parse(&format!("{PARENT_URL}ghost")).unwrap();

    assert!(matches!(
        fixture.session.connect(&path, url).unwrap_err(),
        Error::Engine(_)
    ));
}
