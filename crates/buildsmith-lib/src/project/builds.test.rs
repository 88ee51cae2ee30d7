use crate::application::session_mocks::{
    MockBuildExecutor, MockCommandSession, MockFileSystemProvider, MockProcessProvider,
    MockSceneResolver,
};
use crate::primitives::BuildMode;
use crate::project::profile::default_production_profile;

fn root() -> PathBuf {
    PathBuf::from("/test/workdir")
}

fn single_project() -> ProjectConfig {
    let mut config = ProjectConfig::new("Orbit", BuildMode::Single, "Builds");
    config.scenes = vec![
        Some("Assets/Scenes/Menu.unity".to_string()),
        None,
        Some("Assets/Scenes/Level1.unity".to_string()),
    ];
    config.profiles = crate::project::profile::default_profiles("Orbit")
        .into_iter()
        .map(|p| p.with_target(BuildTarget::StandaloneLinux64))
        .collect();
    config.setup_complete = true;
    config
}

fn wildcard_project() -> ProjectConfig {
    let mut config = ProjectConfig::new("Suite", BuildMode::Wildcard, "Builds");
    config.add_variant("Orbit", "").expect("add orbit");
    let orbit = config.variant_mut("Orbit").expect("orbit");
    orbit.scene_refs = vec![Some("Orbit.unity".to_string())];
    for profile in &mut orbit.build_profiles {
        profile.build_target = BuildTarget::Android;
    }
    config.setup_complete = true;
    config
}

fn request() -> BuildRequest {
    BuildRequest {
        scenes: vec![root().join("Menu.unity"), root().join("Level1.unity")],
        output_path: root().join("Builds/orbit-dev-v0-1-0-250714-rev1/Orbit"),
        artifact_root: root().join("Builds/orbit-dev-v0-1-0-250714-rev1"),
        target: BuildTarget::StandaloneLinux64,
        product_name: "Orbit".to_string(),
        define_symbol: Some("ORBIT".to_string()),
        options: BuildOptions {
            development: true,
            script_debugging: true,
        },
        working_dir: root(),
    }
}

#[test]
fn test_plan_skips_unassigned_scene_slots() -> Result<(), BuildError> {
    let session = MockCommandSession::new();
    let orchestrator = BuildOrchestrator::new(&session, root());

    let plan = orchestrator.plan(&single_project(), None, "development")?;

    assert_eq!(plan.profile_name, "Development");
    assert_eq!(plan.skipped_scenes, 1);
    assert_eq!(
        plan.request.scenes,
        vec![
            root().join("Assets/Scenes/Menu.unity"),
            root().join("Assets/Scenes/Level1.unity")
        ]
    );
    assert_eq!(plan.request.define_symbol, None);
    assert_eq!(plan.request.working_dir, root());
    assert!(plan.request.options.development);
    assert_eq!(plan.artifact.candidate, "orbit-dev-v0-1-0-250714-rev1");
    assert_eq!(
        plan.request.output_path,
        root().join("Builds/orbit-dev-v0-1-0-250714-rev1/Orbit")
    );
    Ok(())
}

#[test]
fn test_plan_without_assigned_scenes_fails() {
    let session = MockCommandSession::new();
    let orchestrator = BuildOrchestrator::new(&session, root());
    let mut config = single_project();
    config.scenes = vec![None, None];

    let err = orchestrator.plan(&config, None, "Production").unwrap_err();
    assert!(matches!(err, BuildError::NoScenes { .. }));
}

#[test]
fn test_plan_reports_unresolvable_scene() {
    let session = MockCommandSession::new()
        .with_scenes(MockSceneResolver::new().with_missing("Assets/Scenes/Level1.unity"));
    let orchestrator = BuildOrchestrator::new(&session, root());

    let err = orchestrator
        .plan(&single_project(), None, "Production")
        .unwrap_err();
    match err {
        BuildError::Scene { scene, .. } => assert_eq!(scene, "Assets/Scenes/Level1.unity"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_plan_unknown_profile() {
    let session = MockCommandSession::new();
    let orchestrator = BuildOrchestrator::new(&session, root());

    let err = orchestrator
        .plan(&single_project(), None, "Nightly")
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Project(ProjectError::UnknownProfile { .. })
    ));
}

#[test]
fn test_wildcard_plan_carries_variant_define() -> Result<(), BuildError> {
    let session = MockCommandSession::new();
    let orchestrator = BuildOrchestrator::new(&session, root());

    let plan = orchestrator.plan(&wildcard_project(), Some("orbit"), "Production")?;

    assert_eq!(plan.request.define_symbol.as_deref(), Some("ORBIT"));
    assert_eq!(plan.request.target, BuildTarget::Android);
    assert_eq!(
        plan.request.output_path,
        root().join("Builds/Orbit/orbit-prd-v0-1-0-250714-rev1.apk")
    );
    assert_eq!(plan.request.artifact_root, root().join("Builds/Orbit"));
    Ok(())
}

#[test]
fn test_build_runs_family_executor_and_creates_artifact_root() -> Result<(), BuildError> {
    let executor = MockBuildExecutor::new();
    let fs = MockFileSystemProvider::new();
    let session = MockCommandSession::new()
        .with_filesystem(fs.clone())
        .with_build_executor(executor.clone());
    let orchestrator = BuildOrchestrator::new(&session, root());

    let (plan, report) = orchestrator.build(&single_project(), None, "Production", &mut ())?;

    assert!(report.succeeded);
    assert_eq!(report.total_size, 1024);
    assert!(fs.has_directory(&plan.request.artifact_root));

    let requests = executor.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, TargetFamily::DesktopLinux);
    assert_eq!(requests[0].1, plan.request);
    Ok(())
}

#[test]
fn test_second_build_same_day_gets_next_revision() -> Result<(), BuildError> {
    let session = MockCommandSession::new();
    let orchestrator = BuildOrchestrator::new(&session, root());
    let config = single_project();

    let (first, _) = orchestrator.build(&config, None, "Production", &mut ())?;
    let (second, _) = orchestrator.build(&config, None, "Production", &mut ())?;

    assert_eq!(first.artifact.revision, 1);
    assert_eq!(second.artifact.revision, 2);
    Ok(())
}

#[test]
fn test_reported_failure_becomes_error() {
    let executor = MockBuildExecutor::new().with_outcome(Ok(BuildReport {
        succeeded: false,
        total_size: 0,
    }));
    let session = MockCommandSession::new().with_build_executor(executor);
    let orchestrator = BuildOrchestrator::new(&session, root());

    let err = orchestrator
        .build(&single_project(), None, "Production", &mut ())
        .unwrap_err();
    assert!(matches!(err, BuildError::ExecutionFailure { .. }));
}

#[test]
fn test_build_all_stops_at_first_failure() {
    let executor = MockBuildExecutor::new().with_outcome(Err("compiler exploded".to_string()));
    let session = MockCommandSession::new().with_build_executor(executor.clone());
    let orchestrator = BuildOrchestrator::new(&session, root());

    let err = orchestrator.build_all(&single_project(), None, &mut ()).unwrap_err();

    assert!(err.to_string().contains("compiler exploded"));
    assert_eq!(executor.get_requests().len(), 1);
}

#[test]
fn test_build_all_builds_every_profile_in_order() -> Result<(), BuildError> {
    let executor = MockBuildExecutor::new();
    let session = MockCommandSession::new().with_build_executor(executor.clone());
    let orchestrator = BuildOrchestrator::new(&session, root());

    let results = orchestrator.build_all(&single_project(), None, &mut ())?;

    let names: Vec<&str> = results.iter().map(|(p, _)| p.profile_name.as_str()).collect();
    assert_eq!(names, vec!["Production", "Development"]);
    assert_eq!(executor.get_requests().len(), 2);
    Ok(())
}

#[test]
fn test_build_environment_exports_request() {
    let env = build_environment(&request());
    let get = |key: &str| {
        env.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };

    assert_eq!(get("BUILDSMITH_TARGET"), "standalone-linux64");
    assert_eq!(get("BUILDSMITH_PRODUCT"), "Orbit");
    assert_eq!(get("BUILDSMITH_DEFINE"), "ORBIT");
    assert_eq!(get("BUILDSMITH_DEVELOPMENT"), "1");
    assert_eq!(get("BUILDSMITH_SCRIPT_DEBUGGING"), "1");
    assert_eq!(
        get("BUILDSMITH_SCENES"),
        format!(
            "{};{}",
            root().join("Menu.unity").display(),
            root().join("Level1.unity").display()
        )
    );
}

#[test]
fn test_standalone_executor_runs_command_and_measures_directory() -> Result<(), BuildError> {
    let process = MockProcessProvider::new();
    let request = request();
    let fs = MockFileSystemProvider::new()
        .with_file(request.artifact_root.join("Orbit"), "12345678".to_string())
        .with_file(request.artifact_root.join("Data/level0"), "abcd".to_string());

    let executor = executor_for(
        TargetFamily::DesktopLinux,
        Some("./build.sh".to_string()),
        &process,
        &fs,
    );
    let report = executor.build(&request)?;

    assert!(report.succeeded);
    assert_eq!(report.total_size, 12);

    let calls = process.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args.last().map(String::as_str), Some("./build.sh"));
    assert_eq!(calls[0].working_dir, root());
    assert_eq!(
        calls[0].env_var("BUILDSMITH_OUTPUT"),
        Some(request.output_path.display().to_string().as_str())
    );
    Ok(())
}

#[test]
fn test_package_executor_measures_output_file() -> Result<(), BuildError> {
    let process = MockProcessProvider::new();
    let mut request = request();
    request.target = BuildTarget::Android;
    request.artifact_root = root().join("Builds");
    request.output_path = root().join("Builds/orbit-dev-v0-1-0-250714-rev1.apk");
    let fs = MockFileSystemProvider::new()
        .with_file(request.output_path.clone(), "apk!".to_string())
        .with_file(root().join("Builds/older.apk"), "older build".to_string());

    let executor = executor_for(
        TargetFamily::MobileAndroid,
        Some("make apk".to_string()),
        &process,
        &fs,
    );
    let report = executor.build(&request)?;

    assert_eq!(report.total_size, 4);
    Ok(())
}

#[test]
fn test_missing_output_measures_zero() -> Result<(), BuildError> {
    let process = MockProcessProvider::new();
    let fs = MockFileSystemProvider::new();

    let executor = executor_for(
        TargetFamily::MobileAndroid,
        Some("make apk".to_string()),
        &process,
        &fs,
    );
    let report = executor.build(&request())?;

    assert!(report.succeeded);
    assert_eq!(report.total_size, 0);
    Ok(())
}

#[test]
fn test_executor_without_command_fails() {
    let process = MockProcessProvider::new();
    let fs = MockFileSystemProvider::new();

    for command in [None, Some("   ".to_string())] {
        let executor = executor_for(TargetFamily::DesktopWindows, command, &process, &fs);
        assert!(matches!(
            executor.build(&request()),
            Err(BuildError::NoBuildCommand)
        ));
    }
    assert!(process.get_calls().is_empty());
}

#[test]
fn test_failed_command_surfaces_stderr() {
    let process = MockProcessProvider::new().with_failure("missing license\n");
    let fs = MockFileSystemProvider::new();

    let executor = executor_for(
        TargetFamily::DesktopLinux,
        Some("./build.sh".to_string()),
        &process,
        &fs,
    );
    match executor.build(&request()) {
        Err(BuildError::ExecutionFailure { target, message }) => {
            assert_eq!(target, BuildTarget::StandaloneLinux64);
            assert_eq!(message, "missing license");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_unlaunchable_command_is_launch_error() {
    let process = MockProcessProvider::new().with_result(Err("no such shell".to_string()));
    let fs = MockFileSystemProvider::new();

    let executor = executor_for(
        TargetFamily::DesktopLinux,
        Some("./build.sh".to_string()),
        &process,
        &fs,
    );
    assert!(matches!(
        executor.build(&request()),
        Err(BuildError::Launch { .. })
    ));
}

#[test]
fn test_build_options_follow_profile() {
    let profile = default_production_profile("Orbit");
    assert_eq!(BuildOptions::from(&profile), BuildOptions::default());
}

#[derive(Default)]
struct RecordingObserver {
    events: Vec<String>,
}

impl BuildObserver for RecordingObserver {
    fn started(&mut self, index: usize, total: usize, plan: &BuildPlan) {
        self.events
            .push(format!("start {}/{} {}", index, total, plan.profile_name));
    }

    fn succeeded(&mut self, plan: &BuildPlan, _report: &BuildReport) {
        self.events.push(format!("ok {}", plan.profile_name));
    }

    fn failed(&mut self, profile: &str, _error: &BuildError) {
        self.events.push(format!("failed {}", profile));
    }
}

#[test]
fn test_observer_sees_each_build_in_order() -> Result<(), BuildError> {
    let session = MockCommandSession::new();
    let orchestrator = BuildOrchestrator::new(&session, root());
    let mut observer = RecordingObserver::default();

    orchestrator.build_all(&single_project(), None, &mut observer)?;

    assert_eq!(
        observer.events,
        vec![
            "start 1/2 Production",
            "ok Production",
            "start 2/2 Development",
            "ok Development",
        ]
    );
    Ok(())
}

#[test]
fn test_observer_is_told_which_profile_failed() {
    let executor = MockBuildExecutor::new().with_outcome(Err("out of disk".to_string()));
    let session = MockCommandSession::new().with_build_executor(executor);
    let orchestrator = BuildOrchestrator::new(&session, root());
    let mut observer = RecordingObserver::default();

    let result = orchestrator.build(&single_project(), None, "Development", &mut observer);

    assert!(result.is_err());
    assert_eq!(
        observer.events,
        vec!["start 1/1 Development", "failed Development"]
    );
}

#[test]
fn test_observer_is_told_when_planning_fails() {
    let session = MockCommandSession::new();
    let orchestrator = BuildOrchestrator::new(&session, root());
    let mut observer = RecordingObserver::default();

    let result = orchestrator.build(&single_project(), None, "QA", &mut observer);

    assert!(matches!(result, Err(BuildError::Project(_))));
    assert_eq!(observer.events, vec!["failed QA"]);
}
