//! CLI integration tests.
//!
//! Drive the `cb` binary against a temp database and check the visible
//! behavior: creation order, moves, patches, and the stable error messages.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cb(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cb").unwrap();
    cmd.arg("--db").arg(dir.path().join("boards.db"));
    cmd
}

/// Build board 1 with columns "todo" (cards a,b,c) and "doing" (empty).
fn seed(dir: &TempDir) {
    cb(dir).args(["init", "-q"]).assert().success();
    cb(dir)
        .args(["create", "board", "sprint"])
        .assert()
        .success();
    cb(dir)
        .args(["create", "column", "--board", "1", "todo"])
        .assert()
        .success();
    cb(dir)
        .args(["create", "column", "--board", "1", "doing"])
        .assert()
        .success();
    for title in ["a", "b", "c"] {
        cb(dir)
            .args(["create", "card", "--column", "1", title])
            .assert()
            .success();
    }
}

#[test]
fn init_reports_the_database_path() {
    let dir = TempDir::new().unwrap();
    cb(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("board database ready"));
    assert!(dir.path().join("boards.db").is_file());
}

#[test]
fn show_prints_items_in_position_order() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let expected = predicate::str::contains("1. todo")
        .and(predicate::str::contains("2. doing"))
        .and(predicate::str::contains("1. a"))
        .and(predicate::str::contains("3. c"));
    cb(&dir).args(["show", "1"]).assert().success().stdout(expected);
}

#[test]
fn move_reorders_cards_within_a_column() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    // Card 3 ("c") to the front of column 1.
    cb(&dir)
        .args(["move", "card", "3", "--rank", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moved card 3"));

    cb(&dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. c").and(predicate::str::contains("2. a")));
}

#[test]
fn move_card_across_columns() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    cb(&dir)
        .args(["move", "card", "2", "--column", "2", "--rank", "1"])
        .assert()
        .success();

    let output = cb(&dir).args(["show", "1"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let todo_block = stdout.split("2. doing").next().unwrap();
    assert!(!todo_block.contains("1. b"));
    assert!(stdout.contains("2. doing"));
}

#[test]
fn patch_renames_a_card() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    cb(&dir)
        .args([
            "patch",
            "card",
            "1",
            r#"[{"op":"replace","path":"/title","value":"a, renamed"}]"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("patched card 1"));

    cb(&dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a, renamed"));
}

#[test]
fn patch_document_can_come_from_stdin() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    cb(&dir)
        .args(["patch", "card", "1", "-"])
        .write_stdin(r#"[{"op":"replace","path":"/position","value":3}]"#)
        .assert()
        .success();

    cb(&dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3. a"));
}

#[test]
fn cross_board_move_fails_with_a_stable_message() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    cb(&dir)
        .args(["create", "board", "other"])
        .assert()
        .success();
    cb(&dir)
        .args(["create", "column", "--board", "2", "elsewhere"])
        .assert()
        .success();

    cb(&dir)
        .args(["move", "card", "1", "--column", "3", "--rank", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("across different boards"));
}

#[test]
fn delete_keeps_sibling_positions() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    cb(&dir).args(["delete", "card", "2"]).assert().success();
    cb(&dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. a").and(predicate::str::contains("3. c")));
}

#[test]
fn unknown_item_is_a_clean_error() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    cb(&dir)
        .args(["move", "card", "404", "--rank", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such card 404"));
}
