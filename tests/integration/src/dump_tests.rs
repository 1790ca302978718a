//! Seeding repositories from serialized dumps

use pretty_assertions::assert_eq;
use testbed_core::Error;
use testbed_test_utils::fixture;

#[test]
fn test_dump_round_trip_reads_back_revision_property() {
    let mut fx = fixture::session("dump_tests");

    let repo = fx.session.repository().unwrap();
    fx.session
        .load(&repo, &mut fixture::revprop_dump().as_bytes())
        .unwrap();

    let value = repo.connection().revision_property(0, "test").unwrap();
    assert_eq!(value.as_deref(), Some("yes"));

    fx.session.tear_down().unwrap();
}

#[test]
fn test_repository_from_dump_is_seeded_and_registered() {
    let mut fx = fixture::session("dump_tests");

    let repo = fx
        .session
        .repository_from_dump(&mut fixture::revprop_dump().as_bytes())
        .unwrap();

    assert_eq!(
        repo.connection()
            .revision_property(0, "test")
            .unwrap()
            .as_deref(),
        Some("yes")
    );
    assert_eq!(fx.session.registered(), 1);

    let path = repo.local_path().to_path_buf();
    fx.session.tear_down().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_dump_carries_repository_identity() {
    let mut fx = fixture::session("dump_tests");

    let repo = fx
        .session
        .repository_from_dump(&mut fixture::revprop_dump().as_bytes())
        .unwrap();

    let info = repo.connection().info().unwrap();
    assert_eq!(info.uuid, "9ff1b372-1b0e-41ec-946b-24d40082c707");

    fx.session.tear_down().unwrap();
}

#[test]
fn test_unset_revision_property_reads_back_none() {
    let mut fx = fixture::session("dump_tests");

    let repo = fx
        .session
        .repository_from_dump(&mut fixture::revprop_dump().as_bytes())
        .unwrap();

    let value = repo.connection().revision_property(0, "absent").unwrap();
    assert_eq!(value, None);

    fx.session.tear_down().unwrap();
}

#[test]
fn test_broken_dump_is_fatal() {
    let mut fx = fixture::session("dump_tests");

    let repo = fx.session.repository().unwrap();
    let err = fx
        .session
        .load(&repo, &mut "not a dump stream".as_bytes())
        .unwrap_err();

    match err {
        Error::Load { name, .. } => assert_eq!(name, repo.name()),
        other => panic!("expected Load, got {other:?}"),
    }

    fx.session.tear_down().unwrap();
}
