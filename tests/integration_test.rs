use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use admission_core::web::access_validators::{
    self, BLOG_HOME_ROUTE, LEARNER_GROUP_ROUTE, MANAGE_OWN_ACCOUNT_ROUTE, PROFILE_ROUTE,
    RELEASE_COORDINATOR_ROUTE,
};
use admission_core::{
    AdmissionOutcome, AdmissionPipeline, ArgSpec, ArgType, CapabilityPolicy, ConfigError,
    ErrorKind, FeatureFlagStore, FeatureFlags, Handler, InMemoryDirectory, MembershipDirectory,
    Principal, RawArgs, Rejection, RequestSchema, Response, Role, RouteRegistry, ValidatorSpec, Verb,
    LEARNER_GROUPS_ARE_ENABLED,
};

#[derive(Default)]
struct SpyMembers {
    calls: AtomicUsize,
    members: Vec<(String, String)>,
}

impl MembershipDirectory for SpyMembers {
    fn is_member(&self, user_id: &str, group_id: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.members
            .iter()
            .any(|(u, g)| u == user_id && g == group_id)
    }
}

fn access_pipeline(spy: Arc<SpyMembers>, flags: FeatureFlags) -> AdmissionPipeline {
    AdmissionPipeline::new(
        Arc::new(access_validators::registry().unwrap()),
        Arc::new(FeatureFlagStore::new(flags)),
        spy,
    )
}

fn rejected_kind(outcome: AdmissionOutcome) -> Option<ErrorKind> {
    outcome.rejection().map(|r| r.kind())
}

#[test]
fn missing_argument_rejects_before_policy_runs() {
    let spy = Arc::new(SpyMembers::default());
    let pipeline = access_pipeline(
        Arc::clone(&spy),
        FeatureFlags::new().with(LEARNER_GROUPS_ARE_ENABLED, true),
    );

    // Anonymous would fail the policy with 401, but validation comes first.
    let outcome = pipeline
        .admit(LEARNER_GROUP_ROUTE, Verb::Get, &RawArgs::new(), Principal::Anonymous)
        .unwrap();

    assert_eq!(rejected_kind(outcome), Some(ErrorKind::MissingArgument));
    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn malformed_group_id_rejects_before_membership_check() {
    let spy = Arc::new(SpyMembers::default());
    let pipeline = access_pipeline(
        Arc::clone(&spy),
        FeatureFlags::new().with(LEARNER_GROUPS_ARE_ENABLED, true),
    );
    let raw = RawArgs::new().with_path("learner_group_id", "not-an-id!");

    let outcome = pipeline
        .admit(LEARNER_GROUP_ROUTE, Verb::Get, &raw, Principal::user("uid-1"))
        .unwrap();

    assert_eq!(rejected_kind(outcome), Some(ErrorKind::InvalidArgument));
    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn anonymous_cannot_manage_an_account() {
    let pipeline = access_pipeline(Arc::default(), FeatureFlags::new());
    let outcome = pipeline
        .admit(MANAGE_OWN_ACCOUNT_ROUTE, Verb::Get, &RawArgs::new(), Principal::Anonymous)
        .unwrap();
    assert_eq!(rejected_kind(outcome), Some(ErrorKind::Unauthenticated));
}

#[test]
fn plain_user_is_forbidden_from_release_coordinator_page() {
    let pipeline = access_pipeline(Arc::default(), FeatureFlags::new());

    let outcome = pipeline
        .admit(RELEASE_COORDINATOR_ROUTE, Verb::Get, &RawArgs::new(), Principal::user("uid-1"))
        .unwrap();
    assert_eq!(rejected_kind(outcome), Some(ErrorKind::Forbidden));

    let outcome = pipeline
        .admit(
            RELEASE_COORDINATOR_ROUTE,
            Verb::Get,
            &RawArgs::new(),
            Principal::elevated("uid-2", [Role::ReleaseCoordinator]),
        )
        .unwrap();
    assert!(outcome.is_proceed());
}

#[test]
fn blog_home_accepts_either_blog_role() {
    let pipeline = access_pipeline(Arc::default(), FeatureFlags::new());
    let admit = |principal| {
        pipeline
            .admit(BLOG_HOME_ROUTE, Verb::Get, &RawArgs::new(), principal)
            .unwrap()
    };

    assert_eq!(rejected_kind(admit(Principal::Anonymous)), Some(ErrorKind::Unauthenticated));
    assert_eq!(rejected_kind(admit(Principal::user("u"))), Some(ErrorKind::Forbidden));
    assert!(admit(Principal::elevated("a", [Role::BlogAdmin])).is_proceed());
    assert!(admit(Principal::elevated("e", [Role::BlogPostEditor])).is_proceed());
    assert_eq!(
        rejected_kind(admit(Principal::elevated("m", [Role::Moderator]))),
        Some(ErrorKind::Forbidden)
    );
}

#[test]
fn disabled_flag_and_handler_absence_render_identically() {
    let directory = InMemoryDirectory::new();
    let spy = Arc::new(SpyMembers {
        members: vec![("uid-1".to_string(), "abcDEF123456".to_string())],
        ..SpyMembers::default()
    });
    let pipeline = access_pipeline(spy, FeatureFlags::new());

    let raw = RawArgs::new().with_path("learner_group_id", "abcDEF123456");
    let flag_rejection = pipeline
        .admit(LEARNER_GROUP_ROUTE, Verb::Get, &raw, Principal::user("uid-1"))
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(flag_rejection.kind(), ErrorKind::NotFound);

    let raw = RawArgs::new().with_path("username", "alice");
    let request = pipeline
        .admit(PROFILE_ROUTE, Verb::Get, &raw, Principal::Anonymous)
        .unwrap()
        .into_result()
        .unwrap();
    let handler_rejection: Rejection = access_validators::ProfileExists
        .handle(&request, &directory)
        .unwrap_err()
        .into();

    let a = Response::from_rejection(&flag_rejection);
    let b = Response::from_rejection(&handler_rejection);
    assert_eq!(a.status(), b.status());
    assert_eq!(a.body_string(), b.body_string());
    assert_eq!(a.status().as_u16(), 404);
}

#[test]
fn enabling_the_flag_admits_members_only() {
    let spy = Arc::new(SpyMembers {
        members: vec![("uid-1".to_string(), "abcDEF123456".to_string())],
        ..SpyMembers::default()
    });
    let pipeline = access_pipeline(Arc::clone(&spy), FeatureFlags::new());
    pipeline.flags().set(LEARNER_GROUPS_ARE_ENABLED, true);

    let raw = RawArgs::new().with_path("learner_group_id", "abcDEF123456");
    assert!(pipeline
        .admit(LEARNER_GROUP_ROUTE, Verb::Get, &raw, Principal::user("uid-1"))
        .unwrap()
        .is_proceed());
    assert_eq!(
        rejected_kind(
            pipeline
                .admit(LEARNER_GROUP_ROUTE, Verb::Get, &raw, Principal::user("uid-2"))
                .unwrap()
        ),
        Some(ErrorKind::NotFound)
    );
    assert_eq!(spy.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn open_access_profile_proceeds_then_handler_reports_not_found() {
    let directory = InMemoryDirectory::new().with_user("uid-bob", "bob");
    let pipeline = access_pipeline(Arc::default(), FeatureFlags::new());
    let raw = RawArgs::new().with_path("username", "alice");

    let request = pipeline
        .admit(PROFILE_ROUTE, Verb::Get, &raw, Principal::Anonymous)
        .unwrap()
        .into_result()
        .expect("open access admits anonymous callers");
    assert_eq!(request.args().get_str("username"), Some("alice"));

    let err = access_validators::ProfileExists
        .handle(&request, &directory)
        .unwrap_err();
    assert_eq!(Response::from_rejection(&Rejection::from(err)).status().as_u16(), 404);
}

#[test]
fn typed_arguments_are_normalized() {
    let registry = RouteRegistry::builder()
        .register(
            "/search",
            Verb::Get,
            RequestSchema::builder()
                .arg(ArgSpec::query("q", ArgType::BaseString).validate(ValidatorSpec::IsNonEmpty))
                .arg(
                    ArgSpec::query("page", ArgType::Int)
                        .with_default(1_i64)
                        .validate(ValidatorSpec::IsAtLeast(1.0)),
                )
                .arg(ArgSpec::query("exact", ArgType::Bool).optional())
                .build()
                .unwrap(),
            CapabilityPolicy::OpenAccess,
        )
        .build()
        .unwrap();
    let pipeline = AdmissionPipeline::new(
        Arc::new(registry),
        Arc::new(FeatureFlagStore::default()),
        Arc::new(InMemoryDirectory::new()),
    );

    let raw = RawArgs::new().with_query("q", "fractions").with_query("exact", "TRUE");
    let request = pipeline
        .admit("/search", Verb::Get, &raw, Principal::Anonymous)
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(request.args().get_int("page"), Some(1));
    assert_eq!(request.args().get_bool("exact"), Some(true));

    let raw = RawArgs::new().with_query("q", "fractions").with_query("page", "0");
    let outcome = pipeline
        .admit("/search", Verb::Get, &raw, Principal::Anonymous)
        .unwrap();
    assert_eq!(rejected_kind(outcome), Some(ErrorKind::InvalidArgument));
}

#[test]
fn unregistered_route_is_fatal_not_a_reject() {
    let pipeline = access_pipeline(Arc::default(), FeatureFlags::new());
    let err = pipeline
        .admit(PROFILE_ROUTE, Verb::Post, &RawArgs::new(), Principal::Anonymous)
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnregisteredRoute { verb: Verb::Post, .. }));
}

#[test]
fn policy_on_optional_argument_is_rejected_at_startup() {
    let err = RouteRegistry::builder()
        .register(
            "/groups",
            Verb::Get,
            RequestSchema::builder()
                .arg(ArgSpec::query("group_id", ArgType::BaseString).optional())
                .build()
                .unwrap(),
            CapabilityPolicy::member_of_group("group_id"),
        )
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "GET /groups: policy refers to optional argument 'group_id' without a default"
    );
}

#[test]
fn tainted_values_never_show_in_debug_output() {
    let raw = RawArgs::new().with_query("token", "s3cr3t-value");
    let debug = format!("{:?}", raw);
    assert!(!debug.contains("s3cr3t-value"));
    assert!(debug.contains("Tainted"));
}
