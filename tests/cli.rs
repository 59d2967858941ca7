use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn planner(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("planner").unwrap();
    cmd.env("SAVINGS_PLANNER_DATA_DIR", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn init_with_year(dir: &TempDir) {
    planner(dir).arg("init").assert().success();
    for args in [
        &["transaction", "add", "income", "1000", "-c", "salary", "-d", "2024-02-01"][..],
        &["transaction", "add", "expense", "300", "-c", "bills", "-d", "2024-02-03"][..],
        &["transaction", "add", "expense", "100", "-c", "food", "-d", "2024-03-10"][..],
    ] {
        planner(dir).args(args).assert().success();
    }
}

#[test]
fn init_seeds_default_categories() {
    let dir = TempDir::new().unwrap();
    planner(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    planner(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("salary"))
        .stdout(predicate::str::contains("income"));
}

#[test]
fn category_add_and_roles() {
    let dir = TempDir::new().unwrap();
    planner(&dir).arg("init").assert().success();

    planner(&dir)
        .args(["category", "add", "Emergency Savings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("emergency-savings"))
        .stdout(predicate::str::contains("savings"));

    planner(&dir)
        .args(["category", "add", "Emergency Savings"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn transaction_with_unknown_category_fails() {
    let dir = TempDir::new().unwrap();
    planner(&dir).arg("init").assert().success();

    planner(&dir)
        .args(["transaction", "add", "expense", "10", "-c", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Category not found"));
}

#[test]
fn goal_set_and_show() {
    let dir = TempDir::new().unwrap();
    planner(&dir).arg("init").assert().success();

    planner(&dir)
        .args(["goal", "show", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20%"))
        .stdout(predicate::str::contains("(default)"));

    planner(&dir)
        .args(["goal", "set", "35", "--year", "2024"])
        .assert()
        .success();

    planner(&dir)
        .args(["goal", "show", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("35%"))
        .stdout(predicate::str::contains("(default)").not());
}

#[test]
fn report_overview_json() {
    let dir = TempDir::new().unwrap();
    init_with_year(&dir);

    planner(&dir)
        .args(["report", "overview", "--year", "2024", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_income\": 100000"))
        .stdout(predicate::str::contains("\"total_expenses\": 40000"))
        .stdout(predicate::str::contains("\"is_behind_target\": true"));
}

#[test]
fn plan_cut_is_saved_and_applied() {
    let dir = TempDir::new().unwrap();
    init_with_year(&dir);

    planner(&dir)
        .args(["plan", "cut", "food", "50", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("food"));

    planner(&dir)
        .args(["plan", "lock", "Bills", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Locked: bills"));

    planner(&dir)
        .args(["plan", "show", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50%"))
        .stdout(predicate::str::contains("(locked)"));
}

#[test]
fn import_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    planner(&dir).arg("init").assert().success();

    let csv = dir.path().join("bank.csv");
    std::fs::write(
        &csv,
        "Date,Description,Amount,Category\n2024-01-05,Coffee,-4.50,Food\n2024-01-06,Pay,2000,Salary\n",
    )
    .unwrap();

    planner(&dir)
        .args(["transaction", "import"])
        .arg(&csv)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 new row(s)"));

    planner(&dir)
        .args(["transaction", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found"));

    planner(&dir)
        .args(["transaction", "import"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2"));

    planner(&dir)
        .args(["transaction", "import"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped 2 duplicate"));
}

#[test]
fn account_add_list_and_reference() {
    let dir = TempDir::new().unwrap();
    planner(&dir).arg("init").assert().success();

    planner(&dir)
        .args(["account", "add", "Visa", "--type", "credit", "--balance", "250"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-250.00 USD"));

    planner(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visa"))
        .stdout(predicate::str::contains("credit"));

    planner(&dir)
        .args(["transaction", "add", "expense", "12", "-c", "food", "--account", "visa"])
        .assert()
        .success();

    planner(&dir)
        .args(["transaction", "add", "expense", "12", "--account", "Brokerage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found"));

    planner(&dir)
        .args(["account", "show", "Visa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions: 1"));

    planner(&dir)
        .args(["account", "edit", "Visa", "--name", "Travel Card"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Travel Card"));

    planner(&dir)
        .args(["account", "delete", "Travel Card"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 transaction(s) no longer have an account"));
}

#[test]
fn import_with_unknown_account_fails() {
    let dir = TempDir::new().unwrap();
    planner(&dir).arg("init").assert().success();

    let csv = dir.path().join("bank.csv");
    std::fs::write(&csv, "Date,Description,Amount\n2024-01-05,Coffee,-4.50\n").unwrap();

    planner(&dir)
        .args(["transaction", "import"])
        .arg(&csv)
        .args(["--account", "Nowhere", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found"));
}

#[test]
fn import_keeps_identical_rows() {
    let dir = TempDir::new().unwrap();
    planner(&dir).arg("init").assert().success();

    let csv = dir.path().join("bank.csv");
    std::fs::write(
        &csv,
        "Date,Description,Amount\n2024-01-05T08:30:00,Coffee,-4\n2024-01-05T08:30:00,Coffee,-4\n2024-01-06,Adjustment,0\n",
    )
    .unwrap();

    planner(&dir)
        .args(["transaction", "import"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3"))
        .stdout(predicate::str::contains("skipped 0 duplicate"));

    planner(&dir)
        .args(["transaction", "list", "--kind", "transfer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adjustment"));
}

#[test]
fn transaction_edit_changes_fields() {
    let dir = TempDir::new().unwrap();
    planner(&dir).arg("init").assert().success();

    let output = planner(&dir)
        .args(["transaction", "add", "expense", "30", "-c", "food", "-d", "2024-04-01"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("ID: "))
        .unwrap()
        .to_string();

    planner(&dir)
        .args(["transaction", "edit", &id, "--amount", "45", "--date", "2024-05-02"])
        .args(["--description", "Groceries", "--clear-category"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-$45.00"))
        .stdout(predicate::str::contains("2024-05-02"))
        .stdout(predicate::str::contains("(uncategorized)"));

    planner(&dir)
        .args(["transaction", "edit", &id, "--amount", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be zero"));
}
