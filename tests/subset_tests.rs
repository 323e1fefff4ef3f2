//! Subset Tests
//!
//! End-to-end subset computation against provider schema fixtures.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use provider_schemas::graph::extract_references;
use provider_schemas::{
    compute_subset, Checksum, EntityKind, OutputFormat, ProviderSchema, ShortenOptions,
    SubsetRequest,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn load(name: &str) -> ProviderSchema {
    ProviderSchema::from_path(&fixture_path(name)).unwrap()
}

fn names(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn assert_contains_only(
    schema: &ProviderSchema,
    types: &[&str],
    resources: &[&str],
    functions: &[&str],
) {
    let keys = |kind: EntityKind| schema.section(kind).keys().cloned().collect::<BTreeSet<_>>();
    assert_eq!(keys(EntityKind::Type), names(types), "types differ");
    assert_eq!(keys(EntityKind::Resource), names(resources), "resources differ");
    assert_eq!(keys(EntityKind::Function), names(functions), "functions differ");
}

// =============================================================================
// Forward Closure
// =============================================================================

#[test]
fn test_type_finds_itself() {
    let schema = load("aws_lambda_fsx.json");
    let request = SubsetRequest::new(
        EntityKind::Type,
        "aws:fsx/getOpenZfsSnapshotFilter:getOpenZfsSnapshotFilter",
    );
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(
        &subset,
        &["aws:fsx/getOpenZfsSnapshotFilter:getOpenZfsSnapshotFilter"],
        &[],
        &[],
    );
}

#[test]
fn test_resource_referencing_types() {
    let schema = load("aws_lambda_fsx.json");
    let request = SubsetRequest::new(EntityKind::Resource, "aws:lambda/function:Function");
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(
        &subset,
        &[
            "aws:lambda/Runtime:Runtime",
            "aws:lambda/FunctionDeadLetterConfig:FunctionDeadLetterConfig",
            "aws:lambda/FunctionEnvironment:FunctionEnvironment",
            "aws:lambda/FunctionTracingConfig:FunctionTracingConfig",
            "aws:lambda/FunctionVpcConfig:FunctionVpcConfig",
        ],
        &["aws:lambda/function:Function"],
        &[],
    );
}

#[test]
fn test_function_referencing_types() {
    let schema = load("aws_lambda_fsx.json");
    let request = SubsetRequest::new(
        EntityKind::Function,
        "aws:fsx/getOpenZfsSnapshot:getOpenZfsSnapshot",
    );
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(
        &subset,
        &["aws:fsx/getOpenZfsSnapshotFilter:getOpenZfsSnapshotFilter"],
        &[],
        &["aws:fsx/getOpenZfsSnapshot:getOpenZfsSnapshot"],
    );
}

#[test]
fn test_key_conflicts_between_kinds() {
    let schema = load("azure_key_conflict.json");
    let request = SubsetRequest::new(EntityKind::Type, "azure-native:network:IPAllocationMethod");
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(&subset, &["azure-native:network:IPAllocationMethod"], &[], &[]);
}

#[test]
fn test_key_conflict_resource_side() {
    let schema = load("azure_key_conflict.json");
    let request =
        SubsetRequest::new(EntityKind::Resource, "azure-native:network:IPAllocationMethod");
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(
        &subset,
        &["azure-native:network:IPAllocationType"],
        &["azure-native:network:IPAllocationMethod"],
        &[],
    );
}

#[test]
fn test_recursive_references() {
    let schema = load("azure_recursion.json");
    let request = SubsetRequest::new(EntityKind::Type, "azure-native:batch:AutoScaleRunResponse");
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(
        &subset,
        &[
            "azure-native:batch:AutoScaleRunResponse",
            "azure-native:batch:AutoScaleRunErrorResponse",
        ],
        &[],
        &[],
    );
}

// =============================================================================
// Full Parents
// =============================================================================

#[test]
fn test_type_referenced_by_function() {
    let schema = load("aws_lambda_fsx.json");
    let request = SubsetRequest::new(
        EntityKind::Type,
        "aws:fsx/getOpenZfsSnapshotFilter:getOpenZfsSnapshotFilter",
    )
    .with_full_parents(true);
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(
        &subset,
        &["aws:fsx/getOpenZfsSnapshotFilter:getOpenZfsSnapshotFilter"],
        &[],
        &["aws:fsx/getOpenZfsSnapshot:getOpenZfsSnapshot"],
    );
}

#[test]
fn test_load_full_parents_of_resource() {
    let schema = load("aws_lambda_fsx.json");
    let request = SubsetRequest::new(EntityKind::Resource, "aws:lambda/function:Function")
        .with_full_parents(true);
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(
        &subset,
        &[
            "aws:lambda/Runtime:Runtime",
            "aws:lambda/FunctionDeadLetterConfig:FunctionDeadLetterConfig",
            "aws:lambda/FunctionEnvironment:FunctionEnvironment",
            "aws:lambda/FunctionTracingConfig:FunctionTracingConfig",
            "aws:lambda/FunctionVpcConfig:FunctionVpcConfig",
        ],
        &["aws:lambda/function:Function", "aws:lambda/permission:Permission"],
        &["aws:lambda/getFunction:getFunction"],
    );
}

#[test]
fn test_full_parents_through_cycle() {
    let schema = load("azure_recursion.json");
    let request =
        SubsetRequest::new(EntityKind::Type, "azure-native:batch:AutoScaleRunErrorResponse")
            .with_full_parents(true);
    let subset = compute_subset(&schema, &request).unwrap();

    assert_contains_only(
        &subset,
        &[
            "azure-native:batch:AutoScaleRunResponse",
            "azure-native:batch:AutoScaleRunErrorResponse",
            "azure-native:batch:AutoScaleSettingsResponse",
        ],
        &["azure-native:batch:Pool"],
        &[],
    );
}

// =============================================================================
// Output
// =============================================================================

#[test]
fn test_shorten_descriptions() {
    let schema = load("aws_lambda_fsx.json");
    let request = SubsetRequest::new(EntityKind::Resource, "aws:lambda/function:Function")
        .with_shortening(ShortenOptions::default());
    let output = compute_subset(&schema, &request)
        .unwrap()
        .to_json_string(OutputFormat::Pretty)
        .unwrap();

    assert!(output.contains(
        "S3 key of an object containing the function<<shortened>> Conflicts with `filename` and `image_uri`."
    ));
    assert!(output.contains("Provides a Lambda Function resource."));
}

#[test]
fn test_subset_references_resolve() {
    let schema = load("aws_lambda_fsx.json");
    for (kind, name, _) in schema.entities() {
        let request = SubsetRequest::new(kind, name.clone()).with_full_parents(true);
        let subset = compute_subset(&schema, &request).unwrap();
        for (_, _, definition) in subset.entities() {
            for (ref_kind, ref_name) in extract_references(definition) {
                assert!(
                    subset.contains(ref_kind, &ref_name) || !schema.contains(ref_kind, &ref_name),
                    "{} {} references {} {} which is missing from its subset",
                    kind,
                    name,
                    ref_kind,
                    ref_name
                );
            }
        }
    }
}

#[test]
fn test_output_is_deterministic() {
    let request = SubsetRequest::new(EntityKind::Resource, "aws:lambda/function:Function")
        .with_full_parents(true)
        .with_shortening(ShortenOptions::default());

    let first = compute_subset(&load("aws_lambda_fsx.json"), &request).unwrap();
    let second = compute_subset(&load("aws_lambda_fsx.json"), &request).unwrap();

    let first_json = first.to_json_string(OutputFormat::Pretty).unwrap();
    let second_json = second.to_json_string(OutputFormat::Pretty).unwrap();
    assert_eq!(first_json, second_json);
    assert_eq!(
        Checksum::from_schema(&first).unwrap(),
        Checksum::from_schema(&second).unwrap()
    );

    // Only the three mappings, keys in lexical order
    let value: serde_json::Value = serde_json::from_str(&first_json).unwrap();
    let top: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(top.len(), 3);
    let type_keys: Vec<&String> = value["types"].as_object().unwrap().keys().collect();
    let mut sorted = type_keys.clone();
    sorted.sort();
    assert_eq!(type_keys, sorted);
}

#[test]
fn test_unknown_root_is_an_error() {
    let schema = load("aws_lambda_fsx.json");
    let request = SubsetRequest::new(EntityKind::Type, "aws:lambda/function:Function");
    let err = compute_subset(&schema, &request).unwrap_err();
    assert!(err.to_string().contains("type not found in schema"));
}

// =============================================================================
// CLI
// =============================================================================

fn schema_subset() -> Command {
    Command::new(env!("CARGO_BIN_EXE_schema-subset"))
}

#[test]
fn test_cli_writes_subset_to_stdout() {
    let output = schema_subset()
        .arg("--schema-path")
        .arg(fixture_path("aws_lambda_fsx.json"))
        .args([
            "--name",
            "aws:fsx/getOpenZfsSnapshotFilter:getOpenZfsSnapshotFilter",
            "--context",
            "type",
            "--load-full-parents=true",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let subset = ProviderSchema::from_json_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_contains_only(
        &subset,
        &["aws:fsx/getOpenZfsSnapshotFilter:getOpenZfsSnapshotFilter"],
        &[],
        &["aws:fsx/getOpenZfsSnapshot:getOpenZfsSnapshot"],
    );
}

#[test]
fn test_cli_shortens_into_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("subset.json");
    let status = schema_subset()
        .arg("--schema-path")
        .arg(fixture_path("aws_lambda_fsx.json"))
        .args(["--name", "aws:lambda/function:Function", "--context", "resource"])
        .args(["--shorten-descriptions", "--compact", "--output"])
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), 1);
    assert!(written.contains("the function<<shortened>> Conflicts with"));
}

#[test]
fn test_cli_unknown_root_fails() {
    let output = schema_subset()
        .arg("--schema-path")
        .arg(fixture_path("aws_lambda_fsx.json"))
        .args(["--name", "aws:lambda/Runtime", "--context", "type"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found in schema"), "{}", stderr);
}
