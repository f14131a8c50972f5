//! Merge laws for the entity patches.

use proptest::prelude::*;

use annotrack_core::entities::{
    Dataset, DatasetPatch, Issue, IssuePatch, Permissions, User, UserPatch,
};
use annotrack_core::{Patch, Payload, RecordId};

fn permissions() -> impl Strategy<Value = Permissions> {
    prop_oneof![Just(Permissions::Standard), Just(Permissions::Admin)]
}

fn user() -> impl Strategy<Value = User> {
    ("[a-z]{1,10}", "[0-9a-f]{32}", permissions()).prop_map(|(name, api_key, permissions)| User {
        name,
        api_key,
        permissions,
    })
}

fn user_patch() -> impl Strategy<Value = UserPatch> {
    (
        prop::option::of("[a-z]{1,10}"),
        prop::option::of("[0-9a-f]{32}"),
        prop::option::of(permissions()),
    )
        .prop_map(|(name, api_key, permissions)| UserPatch {
            name,
            api_key,
            permissions,
        })
}

proptest! {
    #[test]
    fn empty_patch_is_identity(u in user()) {
        prop_assert!(UserPatch::default().is_empty());
        prop_assert_eq!(u.merge(&UserPatch::default()), u);
    }

    #[test]
    fn merge_is_idempotent(u in user(), p in user_patch()) {
        let once = u.merge(&p);
        prop_assert_eq!(once.merge(&p), once);
    }

    #[test]
    fn unset_fields_survive(u in user(), p in user_patch()) {
        let merged = u.merge(&p);
        if p.name.is_none() { prop_assert_eq!(&merged.name, &u.name); }
        if p.api_key.is_none() { prop_assert_eq!(&merged.api_key, &u.api_key); }
        if p.permissions.is_none() { prop_assert_eq!(merged.permissions, u.permissions); }
    }
}

#[test]
fn patch_json_distinguishes_null_from_absent() {
    let dataset = Dataset {
        name: "gsm".into(),
        description: "math".into(),
        domain: "math".into(),
        extra_metadata: Some(serde_json::json!({"source": "hf"})),
        creator_id: Some(RecordId(1)),
    };

    let clear: DatasetPatch = serde_json::from_str(r#"{"creator_id": null}"#).unwrap();
    let merged = dataset.merge(&clear);
    assert_eq!(merged.creator_id, None);
    assert!(merged.extra_metadata.is_some());

    let untouched: DatasetPatch = serde_json::from_str("{}").unwrap();
    assert!(untouched.is_empty());
    assert_eq!(dataset.merge(&untouched), dataset);
}

#[test]
fn issue_resolution_patch() {
    let issue = Issue {
        text: "step 2 mislabeled".into(),
        resolved: false,
        problem_id: RecordId(5),
        creator_id: RecordId(1),
    };
    let patch: IssuePatch = serde_json::from_str(r#"{"resolved": true}"#).unwrap();
    let resolved = issue.merge(&patch);
    assert!(resolved.resolved);
    assert_eq!(resolved.text, issue.text);
    assert!(resolved.validate().is_ok());
    assert_eq!(Issue::KIND, "issue");
}
