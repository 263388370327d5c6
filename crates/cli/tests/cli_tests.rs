use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("leadsync").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Paginated CRM resources"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("leadsync").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_cli_list_help_shows_paging() {
    let mut cmd = Command::cargo_bin("leadsync").unwrap();
    cmd.args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--page").and(predicate::str::contains("--limit")));
}

#[test]
fn test_cli_unknown_resource() {
    let mut cmd = Command::cargo_bin("leadsync").unwrap();
    cmd.args(["list", "invoices"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown resource: invoices"));
}

#[test]
fn test_cli_page_zero_rejected_before_request() {
    let mut cmd = Command::cargo_bin("leadsync").unwrap();
    cmd.args(["--api-url", "http://127.0.0.1:9", "list", "labels", "--page", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid page request"));
}

#[test]
fn test_cli_bad_json_payload() {
    let mut cmd = Command::cargo_bin("leadsync").unwrap();
    cmd.args(["--api-url", "http://127.0.0.1:9", "create", "labels", "--json", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --json payload"));
}
