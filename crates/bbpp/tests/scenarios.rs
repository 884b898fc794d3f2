//! End-to-end scenarios: rule-set documents on disk, active selection,
//! built-in evaluators, findings.

use bbpp::{Argument, ArgumentDirection, Config, Session, Severity, StorageConfig, WorkflowData};
use std::path::Path;
use tempfile::TempDir;

fn session(root: &Path) -> Session {
    Session::open(Config {
        storage: StorageConfig::rooted_at(root),
        ..Config::default()
    })
}

/// Writes a one-file set document and activates it alone.
fn activate_document(session: &Session, name: &str, document: &str) {
    let path = session.repository().path_for(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, document).unwrap();
    session
        .resolver()
        .set_active_set_names(&[path.file_name().unwrap().to_string_lossy().into_owned()])
        .unwrap();
}

fn flagged_names(session: &Session, workflow: &WorkflowData) -> Vec<String> {
    session
        .analyzer(None)
        .unwrap()
        .analyze(workflow)
        .iter()
        .map(|f| f.details["name"].as_str().unwrap().to_string())
        .collect()
}

const NAMING_SET: &str = r#"{
  "metadata": {"name": "Naming"},
  "rules": [
    {"id": "NAMING-001", "name": "camelCase", "category": "naming", "severity": "warning",
     "enabled": __CAMEL__, "rule_type": "variable_naming",
     "parameters": {"convention": "camelCase"}},
    {"id": "NAMING-002", "name": "PascalCase", "category": "naming", "severity": "warning",
     "enabled": __PASCAL__, "rule_type": "variable_naming",
     "parameters": {"convention": "PascalCase"}}
  ]
}"#;

fn naming_set(camel: bool, pascal: bool) -> String {
    NAMING_SET
        .replace("__CAMEL__", &camel.to_string())
        .replace("__PASCAL__", &pascal.to_string())
}

#[test]
fn pascal_case_only() {
    let tmp = TempDir::new().unwrap();
    let session = session(tmp.path());
    activate_document(&session, "Naming", &naming_set(false, true));

    let workflow =
        WorkflowData::new("Main.xaml").with_variables(["MyVariable", "UserName", "myVariable"]);
    assert_eq!(flagged_names(&session, &workflow), ["myVariable"]);
}

#[test]
fn camel_case_only() {
    let tmp = TempDir::new().unwrap();
    let session = session(tmp.path());
    activate_document(&session, "Naming", &naming_set(true, false));

    let workflow =
        WorkflowData::new("Main.xaml").with_variables(["myVariable", "userName", "MyVariable"]);
    assert_eq!(flagged_names(&session, &workflow), ["MyVariable"]);
}

#[test]
fn argument_prefix_with_camel_case_remainder() {
    let tmp = TempDir::new().unwrap();
    let session = session(tmp.path());
    activate_document(
        &session,
        "Args",
        r#"{
  "metadata": {"name": "Args"},
  "rules": [
    {"id": "ARG-001", "name": "Argument prefix", "category": "naming", "severity": "error",
     "enabled": true, "rule_type": "argument_prefix",
     "parameters": {"format_after_prefix": "camelCase"}}
  ]
}"#,
    );

    let workflow = WorkflowData::new("Main.xaml")
        .with_argument(Argument::new("in_myArgument", ArgumentDirection::In))
        .with_argument(Argument::new("in_MyArgument", ArgumentDirection::In))
        .with_argument(Argument::new("myArgument", ArgumentDirection::In));
    assert_eq!(
        flagged_names(&session, &workflow),
        ["in_MyArgument", "myArgument"]
    );
}

#[test]
fn whitelisted_names_are_never_flagged() {
    let tmp = TempDir::new().unwrap();
    let session = session(tmp.path());
    activate_document(
        &session,
        "Naming",
        r#"{
  "metadata": {"name": "Naming"},
  "rules": [
    {"id": "NAMING-001", "name": "camelCase", "category": "naming", "severity": "warning",
     "enabled": true, "rule_type": "variable_naming",
     "parameters": {"convention": "camelCase", "exceptions": ["DT_Input", "Config"]}}
  ]
}"#,
    );

    let workflow =
        WorkflowData::new("Main.xaml").with_variables(["DT_Input", "Config", "Other_Name"]);
    assert_eq!(flagged_names(&session, &workflow), ["Other_Name"]);
}

#[test]
fn unknown_rule_type_is_inert() {
    let tmp = TempDir::new().unwrap();
    let session = session(tmp.path());
    activate_document(
        &session,
        "Future",
        r#"{
  "metadata": {"name": "Future"},
  "rules": [
    {"id": "FUT-001", "name": "Not yet", "category": "misc", "severity": "error",
     "enabled": true, "rule_type": "selector_quality", "parameters": {"anything": 1}}
  ]
}"#,
    );

    let analyzer = session.analyzer(None).unwrap();
    assert_eq!(analyzer.rule_count(), 1);
    assert!(analyzer
        .analyze(&WorkflowData::new("Main.xaml").with_variables(["X"]))
        .is_empty());
}

#[test]
fn master_set_checks_out_of_the_box() {
    let tmp = TempDir::new().unwrap();
    let session = session(tmp.path());
    session.install_master(false).unwrap();

    let mut workflow = WorkflowData::new("Process.xaml")
        .with_variables(["invoiceTotal", "Bad_Name"])
        .with_argument(Argument::new("in_Config", ArgumentDirection::In).with_annotation("cfg"));
    workflow.activity_count = 3;
    workflow.log_message_count = 1;
    workflow.try_catch_blocks = vec![bbpp::TryCatchBlock {
        display_name: Some("Try Login".to_string()),
        catch_empty: true,
    }];

    let result = session.check(&[workflow], None).unwrap();
    let ids: Vec<_> = result.findings.iter().map(|f| f.rule_id.as_str()).collect();
    assert_eq!(ids, ["NAMING-001", "ERR-001"]);
    assert!(result.has_errors());
    assert_eq!(result.total_penalty(), 7);
}

#[test]
fn reinstalling_master_backs_up_once() {
    let tmp = TempDir::new().unwrap();
    let session = session(tmp.path());
    let path = session.install_master(false).unwrap();
    assert_eq!(session.install_master(false).unwrap(), path);
    assert!(session
        .repository()
        .list_backups("BBPP_Master.json")
        .unwrap()
        .is_empty());

    session.install_master(true).unwrap();
    assert_eq!(
        session
            .repository()
            .list_backups("BBPP_Master.json")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn config_override_changes_severity() {
    let tmp = TempDir::new().unwrap();
    let config = Config::parse(
        r#"
[rules.NAMING-001]
severity = "error"
"#,
    )
    .unwrap();
    let session = Session::open(Config {
        storage: StorageConfig::rooted_at(tmp.path()),
        ..config
    });
    session.install_master(false).unwrap();

    let workflow = WorkflowData {
        activity_count: 1,
        log_message_count: 1,
        ..WorkflowData::new("Main.xaml").with_variables(["Bad_Name"])
    };
    let result = session.check(&[workflow], None).unwrap();
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].severity, Severity::Error);
}

#[test]
fn workflow_document_loads_with_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("Main.json");
    std::fs::write(
        &path,
        r#"{"variables": [{"name": "x"}], "arguments": [{"name": "in_A", "direction": "Property"}]}"#,
    )
    .unwrap();

    let workflow = Session::load_workflow(&path).unwrap();
    assert_eq!(workflow.file_path, path);
    assert_eq!(workflow.arguments[0].direction, ArgumentDirection::Other);
    assert_eq!(workflow.total_lines, 0);
}
