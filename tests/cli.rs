use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn medexp(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("medexp").unwrap();
    cmd.env("MEDEXP_DATA_DIR", dir.path())
        .env_remove("MEDEXP_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn registered() -> TempDir {
    let dir = TempDir::new().unwrap();
    medexp(&dir).arg("init").assert().success();
    medexp(&dir)
        .args(["user", "register", "Sam Patient", "sam@example.com"])
        .args(["--password", "correct horse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered and signed in as Sam Patient"));
    dir
}

fn add_expense(dir: &TempDir, args: &[&str]) -> String {
    let output = medexp(dir)
        .args(["expense", "add"])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.find("[exp-").unwrap() + 1;
    let end = stdout[start..].find(']').unwrap() + start;
    stdout[start..end].to_string()
}

#[test]
fn test_init_creates_settings() {
    let dir = TempDir::new().unwrap();
    medexp(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized MedExp"));

    assert!(dir.path().join("config.json").exists());
}

#[test]
fn test_commands_require_login() {
    let dir = TempDir::new().unwrap();
    medexp(&dir)
        .args(["expense", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_wrong_password_is_rejected() {
    let dir = registered();
    medexp(&dir).args(["user", "logout"]).assert().success();

    medexp(&dir)
        .args(["user", "login", "SAM@example.com", "--password", "wrong password"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));

    medexp(&dir)
        .args(["user", "login", "SAM@example.com", "--password", "correct horse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as Sam Patient"));
}

#[test]
fn test_add_and_list_expenses() {
    let dir = registered();
    add_expense(
        &dir,
        &["Smile Dental", "Cleaning", "120", "-c", "dental", "-d", "2024-03-01"],
    );
    add_expense(
        &dir,
        &[
            "City Clinic",
            "Checkup",
            "85.50",
            "-c",
            "Doctor Visit",
            "-d",
            "2024-03-05",
            "--insurance-claim",
        ],
    );

    medexp(&dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Smile Dental"))
        .stdout(predicate::str::contains("City Clinic"))
        .stdout(predicate::str::contains("Pending claim"));

    medexp(&dir)
        .args(["expense", "list", "-c", "dental"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Smile Dental"))
        .stdout(predicate::str::contains("City Clinic").not());
}

#[test]
fn test_invalid_amount_is_rejected() {
    let dir = registered();
    medexp(&dir)
        .args(["expense", "add", "Clinic", "Visit", "abc", "-c", "dental"])
        .assert()
        .failure();

    medexp(&dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found."));
}

#[test]
fn test_status_and_claims() {
    let dir = registered();
    let id = add_expense(
        &dir,
        &[
            "City Clinic",
            "X-ray",
            "200",
            "-c",
            "hospital",
            "-d",
            "2024-04-10",
            "--insurance-claim",
        ],
    );

    medexp(&dir)
        .args(["expense", "status", &id, "reimbursed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending claim -> Reimbursed"));

    medexp(&dir)
        .arg("claims")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Claims:      1"))
        .stdout(predicate::str::contains("$200.00"));
}

#[test]
fn test_delete_requires_force() {
    let dir = registered();
    let id = add_expense(
        &dir,
        &["Pharmacy Plus", "Antibiotics", "15", "-c", "pharmacy"],
    );

    medexp(&dir)
        .args(["expense", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force to confirm deletion"));

    medexp(&dir)
        .args(["expense", "delete", &id, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted expense"));

    medexp(&dir)
        .args(["expense", "show", &id])
        .assert()
        .failure();
}

#[test]
fn test_dashboard_welcomes_user() {
    let dir = registered();
    add_expense(&dir, &["Eye Care", "Glasses", "250", "-c", "vision"]);

    medexp(&dir)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome back, Sam Patient"))
        .stdout(predicate::str::contains("Eye Care"));
}

#[test]
fn test_general_report_text_and_csv() {
    let dir = registered();
    add_expense(
        &dir,
        &["Smile Dental", "Cleaning", "120", "-c", "dental", "-d", "2024-03-01"],
    );

    medexp(&dir)
        .args(["report", "general", "--from", "2024-01-01", "--to", "2024-12-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medical Expense Report"))
        .stdout(predicate::str::contains("Date Range: 2024-01-01 to 2024-12-31"))
        .stdout(predicate::str::contains("$120.00"));

    medexp(&dir)
        .args(["report", "general", "-f", "csv", "-o"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let csv_path = dir.path().join("medical-expenses-all-to-all.csv");
    let contents = std::fs::read_to_string(csv_path).unwrap();
    assert!(contents.contains("Smile Dental"));
    assert!(contents.contains("120.00"));
}

#[test]
fn test_tax_report_only_lists_deductible_expenses() {
    let dir = registered();
    add_expense(
        &dir,
        &[
            "Physio Works",
            "Rehab session",
            "90",
            "-c",
            "physical-therapy",
            "-d",
            "2023-06-15",
            "--tax-deductible",
        ],
    );
    add_expense(
        &dir,
        &["Pharmacy Plus", "Vitamins", "30", "-c", "pharmacy", "-d", "2023-07-01"],
    );

    medexp(&dir)
        .args(["report", "tax", "-y", "2023"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medical Expenses Tax Summary - 2023"))
        .stdout(predicate::str::contains("Physio Works"))
        .stdout(predicate::str::contains("Pharmacy Plus").not());
}

#[test]
fn test_export_all_json() {
    let dir = registered();
    add_expense(&dir, &["Smile Dental", "Filling", "180", "-c", "dental"]);

    let out = dir.path().join("export.json");
    medexp(&dir)
        .args(["export", "all", "--pretty"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 expenses"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(value["metadata"]["expense_count"], 1);
    assert!(value["user"].get("password_hash").is_none());
}
