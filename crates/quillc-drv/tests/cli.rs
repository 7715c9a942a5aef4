//! End-to-end CLI tests exercising the `quillc` binary directly,
//! covering §8's scenarios as they're reachable through `-eval`/-tree`.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("quillc").unwrap()
}

fn write_source(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("prog.ql");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn help_prints_usage_and_exits_zero() {
    cmd()
        .arg("-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quillc - the Quill interpreter"));
}

#[test]
fn no_arguments_also_prints_usage() {
    cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"));
}

#[test]
fn tree_on_a_valid_file_exits_zero_and_prints_global_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo() : number { return 1; }");
    cmd()
        .arg("-tree")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Global\n"));
}

#[test]
fn tree_on_an_invalid_file_exits_nonzero_with_the_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo( {");
    cmd()
        .arg("-tree")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn eval_literal_return_matches_scenario_2() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo() : number { return 12.4; }");
    cmd()
        .arg("-eval")
        .arg(&path)
        .arg("foo")
        .assert()
        .success()
        .stdout(predicate::eq("Evaluation returned: 12.4.\n"));
}

#[test]
fn eval_marshals_a_numeric_cli_argument_matching_scenario_3() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo(a: any) : any { return a; }");
    cmd()
        .arg("-eval")
        .arg(&path)
        .arg("foo")
        .arg("123")
        .assert()
        .success()
        .stdout(predicate::eq("Evaluation returned: 123.\n"));
}

#[test]
fn eval_marshals_a_boolean_cli_argument() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo(a: any) : any { return a; }");
    cmd()
        .arg("-eval")
        .arg(&path)
        .arg("foo")
        .arg("true")
        .assert()
        .success()
        .stdout(predicate::eq("Evaluation returned: True.\n"));
}

#[test]
fn eval_marshals_a_plain_string_cli_argument() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo(a: any) : any { return a; }");
    cmd()
        .arg("-eval")
        .arg(&path)
        .arg("foo")
        .arg("goo")
        .assert()
        .success()
        .stdout(predicate::eq("Evaluation returned: goo.\n"));
}

#[test]
fn eval_recursive_factorial_matches_scenario_5() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(
        &dir,
        "func Factorial(n: number) : number {\n\
             if n <= 1 { return 1; } else { return n * Factorial(n - 1); }\n\
         }",
    );
    cmd()
        .arg("-eval")
        .arg(&path)
        .arg("Factorial")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::eq("Evaluation returned: 120.\n"));
}

#[test]
fn eval_on_an_undefined_function_exits_nonzero_with_the_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo() {}");
    cmd()
        .arg("-eval")
        .arg(&path)
        .arg("does_not_exist")
        .assert()
        .failure()
        .stderr(predicate::eq(
            "Found undefined identifier does_not_exist.\n",
        ));
}

#[test]
fn eval_type_mismatch_matches_scenario_8() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo() {\nvar x: number = 1;\nx = \"oops\";\n}");
    cmd()
        .arg("-eval")
        .arg(&path)
        .arg("foo")
        .assert()
        .failure()
        .stderr(predicate::eq(
            "Type mismatch error on line 3. Expected \"number\" got \"string\".\n",
        ));
}

#[test]
fn eval_wrong_argument_count_is_a_runtime_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "func foo(a: number) : number { return a; }");
    cmd()
        .arg("-eval")
        .arg(&path)
        .arg("foo")
        .assert()
        .failure()
        .stderr(predicate::eq(
            "Argument count mismatch. Expected 1 got 0.\n",
        ));
}

#[test]
fn missing_source_file_is_reported_as_an_io_error() {
    cmd()
        .arg("-eval")
        .arg("/no/such/file.ql")
        .arg("foo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
