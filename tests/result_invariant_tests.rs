//! Property tests: whatever the CLI prints, `success` tracks the ready status

mod fixtures;

use adw_vercel::{DeploymentMonitor, DeploymentStatus};
use fixtures::{failed_output, ProjectDir, ScriptedVercel};
use proptest::prelude::*;

fn inspect_output() -> impl Strategy<Value = (bool, String)> {
    prop_oneof![
        Just((true, r#"{"readyState": "READY"}"#.to_string())),
        Just((true, r#"{"readyState": "BUILDING"}"#.to_string())),
        Just((true, r#"{"state": "ERROR"}"#.to_string())),
        Just((true, r#"{"readyState": "CANCELED"}"#.to_string())),
        Just((true, "status ● BUILDING".to_string())),
        Just((false, "Error: rate limited".to_string())),
        "[A-Za-z ]{0,30}".prop_map(|text| (true, text)),
    ]
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn wait_result_success_iff_ready(
        outputs in prop::collection::vec(inspect_output(), 1..6),
        timeout in 0u64..40,
    ) {
        let project = ProjectDir::linked("prj_prop");
        let vercel = ScriptedVercel::new();
        for (ok, text) in &outputs {
            if *ok {
                vercel.push_stdout("inspect", text);
            } else {
                vercel.push("inspect", Ok(failed_output(1, text)));
            }
        }
        let monitor = DeploymentMonitor::new(vercel, &project.config());

        let result = paused_runtime()
            .block_on(monitor.wait_for_deployment("https://app.vercel.app", timeout, 5));

        prop_assert_eq!(result.success(), result.deployment_status() == DeploymentStatus::Ready);
        if !result.success() {
            prop_assert!(result.error_message().is_some());
        }
        prop_assert!(matches!(
            result.deployment_status(),
            DeploymentStatus::Ready
                | DeploymentStatus::Error
                | DeploymentStatus::Canceled
                | DeploymentStatus::Pending
        ));
    }
}
