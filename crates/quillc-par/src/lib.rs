//! Tokens to typed-enough AST: the parser drives the lexer, builds a
//! lexically scoped symbol table as it goes, and resolves every name
//! occurrence to a `SymbolId` on the spot. Type checking itself is a
//! separate crate; this one only establishes identity (what a name
//! refers to), not yet whether the program is well-typed.

mod ast;
mod error;
mod expr;
mod items;
mod parser;
mod stmt;
mod symtab;

pub use ast::{
    AssignOp, Ast, BinaryOp, Block, Expr, FunctionBody, FunctionDef, Global, HostFn, IfArm,
    IfChain, ObjectDef, Param, Stmt, UnaryOp,
};
pub use error::ParserError;
pub use parser::parse;
pub use symtab::{
    ScopeId, Scope, SymbolId, SymbolInfo, SymbolTable, SymtabError, FN_READ_NUMBER, FN_READ_TEXT,
    FN_WRITE, FN_WRITE_LINE, PARAM_WRITE, PARAM_WRITE_LINE, SCOPE_ROOT, SCOPE_WRITE,
    SCOPE_WRITE_LINE, TYPE_ANY, TYPE_BOOL, TYPE_NUMBER, TYPE_STRING, TYPE_VOID,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Ast {
        parse(source).unwrap_or_else(|e| panic!("expected parse to succeed, got: {}", e.message))
    }

    #[test]
    fn empty_program_has_only_host_functions() {
        let ast = parse_ok("");
        assert_eq!(ast.global.functions.len(), 4);
        assert!(ast.global.objects.is_empty());
    }

    #[test]
    fn empty_function_parses() {
        let ast = parse_ok("func foo() {}");
        let foo = ast
            .global
            .functions
            .values()
            .find(|f| f.name == "foo")
            .unwrap();
        assert_eq!(foo.args.params.len(), 0);
        assert_eq!(foo.args.return_type, TYPE_VOID);
    }

    #[test]
    fn argument_with_any_type_and_no_var_keyword() {
        let ast = parse_ok("func foo(a: any) : any { return a; }");
        let foo = ast
            .global
            .functions
            .values()
            .find(|f| f.name == "foo")
            .unwrap();
        assert_eq!(foo.args.params.len(), 1);
        assert_eq!(foo.args.return_type, TYPE_ANY);
        match &foo.body {
            FunctionBody::Block(block) => assert_eq!(block.stmts.len(), 1),
            FunctionBody::Host(_) => panic!("expected a parsed block"),
        }
    }

    #[test]
    fn recursive_call_resolves_its_own_name() {
        let ast = parse_ok(
            "func Factorial(n: number) : number { if n <= 1 { return 1; } else { return n * Factorial(n - 1); } }",
        );
        assert!(ast
            .global
            .functions
            .values()
            .any(|f| f.name == "Factorial"));
    }

    #[test]
    fn object_def_with_attributes() {
        let ast = parse_ok("object Point { var x: number = 0; var y: number = 0; }");
        let point = ast
            .global
            .objects
            .values()
            .find(|o| o.name == "Point")
            .unwrap();
        assert_eq!(point.attributes.len(), 2);
    }

    #[test]
    fn object_init_resolves_field_names_against_its_type() {
        let ast = parse_ok(
            "object Point { var x: number = 0; } func foo() : any { return new Point { x: 1 }; }",
        );
        let foo = ast
            .global
            .functions
            .values()
            .find(|f| f.name == "foo")
            .unwrap();
        match &foo.body {
            FunctionBody::Block(block) => match &block.stmts[0] {
                Stmt::Return {
                    value: Some(Expr::ObjectInit { fields, .. }),
                    ..
                } => assert_eq!(fields.len(), 1),
                other => panic!("unexpected statement: {other:?}"),
            },
            FunctionBody::Host(_) => unreachable!(),
        }
    }

    #[test]
    fn parse_error_propagates_verbatim_message() {
        let err = parse("\nfoo();").unwrap_err();
        assert_eq!(
            err.message,
            "Failed to parse [Identifier 'foo' on line 2]. Expected one of following { Func, Object, }."
        );
    }

    #[test]
    fn undefined_identifier_is_wrapped_with_line() {
        let err = parse("func foo() { return a; }").unwrap_err();
        assert_eq!(
            err.message,
            "An exception occured on line 1. Message: Found undefined identifier a."
        );
    }

    #[test]
    fn redefinition_in_same_scope_is_rejected() {
        let err = parse("func foo() { var x = 1; var x = 2; }").unwrap_err();
        assert_eq!(
            err.message,
            "An exception occured on line 1. Message: Tried to redefine identifier x."
        );
    }

    #[test]
    fn for_loop_variable_is_not_visible_after_the_loop() {
        let err = parse("func foo() { for i in 1..<5 {} return i; }").unwrap_err();
        assert!(err.message.contains("Found undefined identifier i"));
    }

    #[test]
    fn range_and_member_and_assignment_all_parse() {
        parse_ok(
            "object Box { var v: number = 0; } \
             func foo() { var b = new Box { v: 1 }; b.v; for i in 0...3 {} var x = 1; x += 2; }",
        );
    }
}
