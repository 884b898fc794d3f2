//! Integration test: rule-set storage and active-set resolution on disk.
//!
//! Every test works in its own temporary directory laid out like a real
//! installation (`rules/` plus `user_config.json`).

use bbpp_core::{
    ActiveSetResolver, Analyzer, Evaluator, EvaluatorRegistry, Finding, Location, NamingOptions,
    RepositoryError, Rule, RuleOptions, RuleRepository, RuleSet, RuleType, Severity,
    StorageConfig, WorkflowData, BACKUP_MARKER,
};
use std::path::Path;
use tempfile::TempDir;

fn storage(root: &Path) -> StorageConfig {
    StorageConfig::rooted_at(root)
}

fn naming_rule(id: &str, name: &str) -> Rule {
    Rule::new(id, name, "naming")
        .with_severity(Severity::Error)
        .with_penalty(5)
        .with_options(RuleOptions::VariableNaming(NamingOptions::default()))
}

fn write_set(repo: &RuleRepository, set: &RuleSet) {
    repo.save_set(set).expect("set should save");
}

// ── Repository ──

#[test]
fn save_then_load_is_identity() {
    let tmp = TempDir::new().unwrap();
    let repo = RuleRepository::new(&storage(tmp.path()));

    let mut set = RuleSet::new("Team Rules")
        .with_rule(naming_rule("NAMING-001", "camelCase variables"))
        .with_rule(
            Rule::new("CUSTOM-001", "Custom", "misc")
                .with_type(RuleType::from("not_implemented_yet"))
                .enabled(false),
        );
    set.metadata.version = "1.2.0".to_string();
    set.metadata.author = "qa".to_string();

    let path = repo.save_set(&set).unwrap();
    assert_eq!(path.file_name().unwrap(), "BBPP_Team_Rules.json");

    let loaded = repo.load(&path).unwrap();
    assert_eq!(loaded, set);
}

#[test]
fn save_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let repo = RuleRepository::new(&storage(tmp.path()));
    let set = RuleSet::new("Master").with_rule(naming_rule("NAMING-001", "n"));

    let path = repo.save_set(&set).unwrap();
    let first = std::fs::read(&path).unwrap();
    repo.save(&repo.load(&path).unwrap(), &path).unwrap();
    let second = std::fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn corrupt_import_leaves_storage_untouched() {
    let tmp = TempDir::new().unwrap();
    let repo = RuleRepository::new(&storage(tmp.path()));
    let source = tmp.path().join("broken.json");
    std::fs::write(&source, "{ not json").unwrap();

    let err = repo.import(&source, "BBPP_Broken.json").unwrap_err();
    assert!(matches!(err, RepositoryError::Validation { .. }));
    assert!(!repo.path_for("BBPP_Broken.json").exists());
    assert!(repo.list_documents().unwrap().is_empty());
}

#[test]
fn import_over_existing_keeps_one_backup() {
    let tmp = TempDir::new().unwrap();
    let repo = RuleRepository::new(&storage(tmp.path()));

    let old = RuleSet::new("Team").with_rule(naming_rule("A", "old"));
    let old_path = repo.save_set(&old).unwrap();
    let old_bytes = std::fs::read(&old_path).unwrap();

    let incoming = tmp.path().join("incoming.json");
    let new = RuleSet::new("Team").with_rule(naming_rule("B", "new"));
    repo.save(&new, &incoming).unwrap();

    let outcome = repo.import(&incoming, "BBPP_Team.json").unwrap();
    assert_eq!(outcome.destination, old_path);
    assert_eq!(
        std::fs::read(&outcome.destination).unwrap(),
        std::fs::read(&incoming).unwrap()
    );

    let backups = repo.list_backups("BBPP_Team.json").unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(outcome.backup.as_deref(), Some(backups[0].as_path()));
    assert!(backups[0]
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with(&format!("BBPP_Team.json{BACKUP_MARKER}")));
    assert_eq!(std::fs::read(&backups[0]).unwrap(), old_bytes);
}

#[test]
fn aggregate_round_trip() {
    let tmp = TempDir::new().unwrap();
    let repo = RuleRepository::new(&storage(tmp.path()));
    write_set(&repo, &RuleSet::new("A").with_rule(naming_rule("R1", "a")));
    let mut retired = RuleSet::new("B").with_rule(naming_rule("R2", "b"));
    retired.enabled = false;
    retired
        .dependencies
        .insert("A".to_string(), serde_json::json!(">=1.0.0"));
    write_set(&repo, &retired);

    let export = tmp.path().join("export/all.json");
    let count = repo
        .export_all(&["A".to_string(), "B".to_string()], &export)
        .unwrap();
    assert_eq!(count, 2);

    let other = TempDir::new().unwrap();
    let target = RuleRepository::new(&storage(other.path()));
    let outcomes = target.import_aggregate(&export).unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.backup.is_none()));

    assert_eq!(target.load_set("A").unwrap(), repo.load_set("A").unwrap());
    let imported = target.load_set("B").unwrap();
    assert_eq!(imported, retired);
    assert!(!imported.enabled);
    assert_eq!(imported.dependencies["A"], ">=1.0.0");
}

#[test]
fn aggregate_with_duplicate_sets_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("all.json");
    let rule = serde_json::json!({
        "id": "R1", "name": "n", "category": "c", "severity": "info", "enabled": true
    });
    let aggregate = serde_json::json!({"sets": [
        {"metadata": {"name": "Team"}, "rules": [rule.clone()]},
        {"metadata": {"name": "Team"}, "rules": [rule]}
    ]});
    std::fs::write(&source, aggregate.to_string()).unwrap();

    let repo = RuleRepository::new(&storage(tmp.path()));
    let err = repo.import_aggregate(&source).unwrap_err();
    assert!(matches!(err, RepositoryError::Validation { .. }));
    assert!(repo.list_documents().unwrap().is_empty());
    assert!(repo.list_backups("BBPP_Team.json").unwrap().is_empty());
}

// ── Resolver ──

#[test]
fn first_active_set_wins_conflicts() {
    let tmp = TempDir::new().unwrap();
    let resolver = ActiveSetResolver::new(&storage(tmp.path()));
    let repo = resolver.repository();
    write_set(
        repo,
        &RuleSet::new("A").with_rule(naming_rule("NAMING-001", "from A").enabled(false)),
    );
    write_set(
        repo,
        &RuleSet::new("B").with_rule(naming_rule("NAMING-001", "from B")),
    );

    resolver
        .set_active_set_names(&["BBPP_A.json".to_string(), "BBPP_B.json".to_string()])
        .unwrap();
    let rules = resolver.get_effective_rules(None);
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].name, "from A");
    assert!(ActiveSetResolver::get_enabled_rules(&rules).is_empty());

    resolver
        .set_active_set_names(&["BBPP_B.json".to_string(), "BBPP_A.json".to_string()])
        .unwrap();
    let rules = resolver.get_effective_rules(None);
    assert_eq!(rules[0].name, "from B");
}

#[test]
fn missing_active_set_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let resolver = ActiveSetResolver::new(&storage(tmp.path()));
    write_set(
        resolver.repository(),
        &RuleSet::new("A").with_rule(naming_rule("R1", "a")),
    );

    let rules = resolver.get_effective_rules(Some(&["Gone".to_string(), "A".to_string()]));
    assert_eq!(rules.len(), 1);
}

#[test]
fn corrupt_user_config_is_regenerated() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(tmp.path());
    std::fs::write(&storage.user_config, "][").unwrap();

    let resolver = ActiveSetResolver::new(&storage);
    assert_eq!(resolver.get_active_set_names(), ["BBPP_Master.json"]);

    let rewritten = std::fs::read_to_string(&storage.user_config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rewritten).unwrap();
    assert_eq!(value["version"], "1.0");
    assert_eq!(value["active_bbpp_sets"][0], "BBPP_Master.json");
}

#[test]
fn repeated_selection_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let storage = storage(tmp.path());
    let resolver = ActiveSetResolver::new(&storage);
    let repo = resolver.repository();
    write_set(
        repo,
        &RuleSet::new("A")
            .with_rule(naming_rule("R1", "from A"))
            .with_rule(naming_rule("R2", "only A")),
    );
    write_set(
        repo,
        &RuleSet::new("B")
            .with_rule(naming_rule("R1", "from B"))
            .with_rule(naming_rule("R3", "only B")),
    );
    let names = vec!["BBPP_B.json".to_string(), "BBPP_A.json".to_string()];

    resolver.set_active_set_names(&names).unwrap();
    let once = resolver.get_effective_rules(None);
    let persisted_once: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&storage.user_config).unwrap()).unwrap();

    resolver.set_active_set_names(&names).unwrap();
    let twice = resolver.get_effective_rules(None);
    let persisted_twice: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&storage.user_config).unwrap()).unwrap();

    assert_eq!(once, twice);
    let ids: Vec<_> = twice.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["R1", "R3", "R2"]);
    assert_eq!(twice[0].name, "from B");
    assert_eq!(
        persisted_once["active_bbpp_sets"],
        persisted_twice["active_bbpp_sets"]
    );
    assert_eq!(
        persisted_twice["active_bbpp_sets"],
        serde_json::json!(["BBPP_B.json", "BBPP_A.json"])
    );
}

#[test]
fn selection_is_persisted_verbatim() {
    let tmp = TempDir::new().unwrap();
    let resolver = ActiveSetResolver::new(&storage(tmp.path()));
    let names = vec!["BBPP_Z.json".to_string(), "BBPP_A.json".to_string()];
    resolver.set_active_set_names(&names).unwrap();

    let reopened = ActiveSetResolver::new(&storage(tmp.path()));
    assert_eq!(reopened.get_active_set_names(), names);
}

#[test]
fn available_sets_report_activation() {
    let tmp = TempDir::new().unwrap();
    let resolver = ActiveSetResolver::new(&storage(tmp.path()));
    let repo = resolver.repository();
    write_set(repo, &RuleSet::new("A").with_rule(naming_rule("R1", "a")));
    write_set(repo, &RuleSet::new("B"));
    std::fs::write(repo.rules_dir().join("BBPP_Bad.json"), "{}").unwrap();

    resolver
        .set_active_set_names(&["BBPP_B.json".to_string()])
        .unwrap();
    let sets = resolver.list_available_sets().unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].name, "A");
    assert_eq!(sets[0].rules_count, 1);
    assert!(!sets[0].is_active);
    assert!(sets[1].is_active);
}

#[test]
fn export_all_active_follows_selection() {
    let tmp = TempDir::new().unwrap();
    let resolver = ActiveSetResolver::new(&storage(tmp.path()));
    write_set(resolver.repository(), &RuleSet::new("A"));
    write_set(resolver.repository(), &RuleSet::new("B"));
    resolver
        .set_active_set_names(&["BBPP_B.json".to_string()])
        .unwrap();

    let dest = tmp.path().join("active.json");
    assert_eq!(resolver.export_all_active(&dest).unwrap(), 1);
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dest).unwrap()).unwrap();
    assert_eq!(value["metadata"]["sets_count"], 1);
    assert_eq!(value["sets"][0]["metadata"]["name"], "B");
}

// ── Analyzer over resolved sets ──

struct FlagAll;

impl Evaluator for FlagAll {
    fn rule_type(&self) -> RuleType {
        RuleType::VariableNaming
    }

    fn evaluate(&self, rule: &Rule, workflow: &WorkflowData) -> Vec<Finding> {
        vec![Finding::new(rule, Location::file(workflow.path()), "flagged")]
    }
}

#[test]
fn analyzer_uses_resolved_sets() {
    let tmp = TempDir::new().unwrap();
    let resolver = ActiveSetResolver::new(&storage(tmp.path()));
    write_set(
        resolver.repository(),
        &RuleSet::new("A")
            .with_rule(naming_rule("R1", "on"))
            .with_rule(naming_rule("R2", "off").enabled(false)),
    );
    resolver
        .set_active_set_names(&["BBPP_A.json".to_string()])
        .unwrap();

    let analyzer = Analyzer::builder()
        .resolver(resolver)
        .registry(EvaluatorRegistry::new().with(FlagAll))
        .build()
        .unwrap();

    let findings = analyzer.analyze(&WorkflowData::new("Main.xaml"));
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id, "R1");
    assert_eq!(findings[0].penalty, 5);
    assert_eq!(findings[0].severity, Severity::Error);
}
