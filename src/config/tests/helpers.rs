//! Shared test helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::TicketSyncConfig;

/// Runner variables the configuration falls back to.
const RUNNER_ENV: [&str; 12] = [
    "INPUT_GITHUB-TOKEN",
    "INPUT_JIRA-LOGIN",
    "INPUT_JIRA-PASSWORD",
    "INPUT_JIRA-URL",
    "INPUT_JIRA-PROJECT",
    "INPUT_JIRA-FIELD-INPROGRESS",
    "INPUT_JIRA-FIELD-INREVIEW",
    "INPUT_JIRA-FIELD-INTEST",
    "INPUT_JIRA-FIELD-RESOLVED",
    "GITHUB_TOKEN",
    "GITHUB_EVENT_PATH",
    "GITHUB_API_URL",
];

/// Applies a configuration layer to the composer based on the layer type.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Helper to compose a [`TicketSyncConfig`] from a sequence of `(layer_type, value)` pairs.
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> TicketSyncConfig {
    let mut composer = MergeComposer::new();

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    TicketSyncConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// Runs `check` with every runner variable cleared except `overrides`.
pub fn with_runner_env<R>(overrides: &[(&str, &str)], check: impl FnOnce() -> R) -> R {
    let vars: Vec<(&str, Option<&str>)> = RUNNER_ENV
        .iter()
        .map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| *value);
            (*name, value)
        })
        .collect();
    let _guard = env_lock::lock_env(vars);
    check()
}

/// Configuration with every required field set.
pub fn complete_config() -> TicketSyncConfig {
    TicketSyncConfig {
        github_token: Some("ghp_config".to_owned()),
        event_path: Some("/tmp/event.json".into()),
        jira_login: Some("bot@example.com".to_owned()),
        jira_token: Some("jira-secret".to_owned()),
        jira_url: Some("https://example.atlassian.net".to_owned()),
        jira_project: Some("SC".to_owned()),
        transition_in_progress: Some(11),
        transition_in_review: Some(21),
        transition_in_test: Some(31),
        transition_resolved: Some(41),
        ..TicketSyncConfig::default()
    }
}
