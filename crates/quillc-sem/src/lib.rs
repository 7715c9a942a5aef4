//! Typed-enough AST to typed AST: a single post-parse pass (§4.3)
//! checking every function body and object definition the parser
//! produced. Name resolution already happened in `quillc-par`; this
//! crate only asks whether the resolved program is well-typed.

mod checker;
mod error;

pub use checker::check;
pub use error::{MismatchKind, TypeError};

#[cfg(test)]
mod tests {
    use super::*;
    use quillc_par::parse;

    fn check_ok(source: &str) {
        let ast = parse(source).unwrap_or_else(|e| panic!("parse failed: {}", e.message));
        if let Err(e) = check(&ast) {
            panic!("expected type check to pass, got: {}", e.message);
        }
    }

    fn check_err(source: &str) -> TypeError {
        let ast = parse(source).unwrap_or_else(|e| panic!("parse failed: {}", e.message));
        check(&ast).expect_err("expected type check to fail")
    }

    #[test]
    fn empty_function_type_checks() {
        check_ok("func foo() {}");
    }

    #[test]
    fn literal_return_type_checks() {
        check_ok("func foo() : number { return 12.4; }");
    }

    #[test]
    fn any_argument_echo_type_checks() {
        check_ok("func foo(a: any) : any { return a; }");
    }

    #[test]
    fn if_else_covering_every_path_type_checks() {
        check_ok("func foo(a: bool) : number { if a { return 1; } else { return 0; } }");
    }

    #[test]
    fn recursive_factorial_type_checks() {
        check_ok(
            "func Factorial(n: number) : number { if n <= 1 { return 1; } else { return n * Factorial(n - 1); } }",
        );
    }

    #[test]
    fn mixed_number_and_string_addition_is_rejected_when_both_are_concrete() {
        let err = check_err("func foo(a: number, b: string) : any { return a + b; }");
        assert_eq!(
            err.message,
            "Type mismatch error on line 1. Expected \"number\" got \"string\"."
        );
    }

    #[test]
    fn assigning_string_to_number_variable_matches_scenario_8() {
        let err = check_err("func foo() {\nvar x: number = 1;\nx = \"oops\";\n}");
        assert_eq!(
            err.message,
            "Type mismatch error on line 3. Expected \"number\" got \"string\"."
        );
    }

    #[test]
    fn non_void_function_missing_a_return_on_every_path_is_rejected() {
        let err = check_err("func foo(a: bool) : number { if a { return 1; } }");
        assert!(err.message.contains("caused by wrong return type"));
    }

    #[test]
    fn void_function_returning_a_value_is_rejected() {
        let err = check_err("func foo() { return 1; }");
        assert!(err.message.contains("caused by wrong return type"));
    }

    #[test]
    fn call_with_wrong_argument_count_is_rejected() {
        let err = check_err(
            "func bar(a: number) : number { return a; } func foo() : number { return bar(); }",
        );
        assert!(err.message.starts_with("Argument count mismatch"));
    }

    #[test]
    fn call_with_mismatched_argument_type_is_rejected() {
        let err = check_err(
            "func bar(a: number) : number { return a; } func foo() : number { return bar(\"x\"); }",
        );
        assert_eq!(
            err.message,
            "Type mismatch error on line 1. Expected \"number\" got \"string\"."
        );
    }

    #[test]
    fn object_field_of_wrong_type_is_rejected() {
        let err = check_err(
            "object Point { var x: number = 0; } func foo() : any { return new Point { x: \"nope\" }; }",
        );
        assert_eq!(
            err.message,
            "Type mismatch error on line 1. Expected \"number\" got \"string\"."
        );
    }

    #[test]
    fn member_access_on_the_right_object_type_resolves_its_attribute_type() {
        check_ok(
            "object Point { var x: number = 0; } func foo() : number { var p = new Point { x: 1 }; return p.x; }",
        );
    }

    #[test]
    fn member_access_with_an_unknown_attribute_is_rejected() {
        let err = check_err(
            "object Point { var x: number = 0; } func foo() : any { var p = new Point { x: 1 }; return p.y; }",
        );
        assert_eq!(err.message, "Found undefined identifier y.");
    }

    #[test]
    fn equality_across_differing_concrete_types_is_allowed_statically() {
        check_ok("func foo() : bool { return 1 == \"x\"; }");
    }

    #[test]
    fn unary_not_on_a_non_bool_is_rejected() {
        let err = check_err("func foo() : bool { return !1; }");
        assert_eq!(
            err.message,
            "Type mismatch error on line 1. Expected \"bool\" got \"number\"."
        );
    }
}
