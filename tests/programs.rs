use assert_cmd::Command;
use predicates::prelude::*;


fn run_program(prog_name: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut lox_cmd = Command::cargo_bin("lox").unwrap();
    lox_cmd
        .args(args)
        .arg(&format!("programs/{}.lox", prog_name))
        .assert()
}

#[test]
fn grouping() {
    run_program("grouping", &[]).success().stdout("9\n");
}

#[test]
fn precedence() {
    run_program("precedence", &[]).success().stdout("7\n");
}

#[test]
fn concat() {
    run_program("concat", &[]).success().stdout("concatenation\n");
}

#[test]
fn equality() {
    run_program("equality", &[]).success().stdout("true\n");
}

#[test]
fn print_ast() {
    run_program("unary", &["--emit", "ast"])
        .success()
        .stdout("(* (- 123) (group 45.67))\n");
}

#[test]
fn print_tokens() {
    run_program("precedence", &["-e", "tokens"]).success().stdout("\
NUMBER 1 1.0
PLUS + null
NUMBER 2 2.0
STAR * null
NUMBER 3 3.0
EOF  null
");
}

#[test]
fn divide_by_zero() {
    run_program("divide_by_zero", &[])
        .code(70)
        .stdout("")
        .stderr("Division by zero.\n[line 2]\n");
}

#[test]
fn mixed_plus() {
    run_program("mixed_plus", &[])
        .code(70)
        .stderr(predicate::str::contains("Operands must be two numbers or two strings."));
}

#[test]
fn missing_paren() {
    run_program("missing_paren", &[])
        .code(65)
        .stdout("")
        .stderr("[line 2] Error at end: Expect ')' after expression.\n");
}

#[test]
fn unterminated_string() {
    run_program("unterminated", &[])
        .code(65)
        .stderr("[line 3] Error: Unterminated string.\n");
}

#[test]
fn unexpected_character_in_token_listing() {
    run_program("unexpected", &["--emit", "tokens"])
        .code(65)
        .stdout("NUMBER 1 1.0\nNUMBER 2 2.0\nEOF  null\n")
        .stderr("[line 1] Error: Unexpected character: @\n");
}
