use std::{fs, io::Cursor};

use pcse::{
    error::Error,
    interpreter::{
        lexer::{Lexer, Token},
        value::{date::Date, fraction::Fraction},
    },
    run_source,
};
use walkdir::WalkDir;

fn run(source: &str, input: &str) -> Result<String, Error> {
    let mut output = Vec::new();
    let mut input = Cursor::new(input.to_string());
    run_source(source, &mut input, &mut output)?;
    Ok(String::from_utf8(output).expect("program output is UTF-8"))
}

fn assert_output(source: &str, expected: &str) {
    match run(source, "") {
        Ok(output) => assert_eq!(output, expected, "wrong output for:\n{source}"),
        Err(e) => panic!("script failed: {e}\nsource:\n{source}"),
    }
}

fn assert_output_with_input(source: &str, input: &str, expected: &str) {
    match run(source, input) {
        Ok(output) => assert_eq!(output, expected, "wrong output for:\n{source}"),
        Err(e) => panic!("script failed: {e}\nsource:\n{source}"),
    }
}

#[test]
fn fixture_programs_work() {
    let mut count = 0;

    for entry in WalkDir::new("tests/programs").into_iter()
                                               .filter_map(Result::ok)
                                               .filter(|e| {
                                                   e.path()
                                                    .extension()
                                                    .is_some_and(|ext| ext == "pcse")
                                               })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));
        let input = fs::read_to_string(path.with_extension("in")).unwrap_or_default();
        let expected = fs::read_to_string(path.with_extension("out"))
            .unwrap_or_else(|e| panic!("missing expected output for {path:?}: {e}"));

        match run(&source, &input) {
            Ok(output) => assert_eq!(output, expected, "wrong output for {path:?}"),
            Err(e) => panic!("{path:?} failed: {e}"),
        }
        count += 1;
    }

    assert!(count > 0, "no fixture programs found in tests/programs");
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_output("OUTPUT 2 + 3 * 4", "14\n");
    assert_output("OUTPUT (2 + 3) * 4", "20\n");
    assert_output("OUTPUT 10 - 2 - 3", "5\n");
}

#[test]
fn division_always_produces_real() {
    assert_output("OUTPUT 1 / 2", "0.5\n");
    assert_output("OUTPUT 7 / 2", "3.5\n");
    assert_output("OUTPUT 6 / 3", "2\n");
}

#[test]
fn real_arithmetic_is_exact() {
    // 0.1 + 0.2 is exactly 3/10; a float interpreter prints 0.30000000000000004.
    assert_output("OUTPUT 0.1 + 0.2", "0.3\n");
    assert_output("OUTPUT 1.5 * 2.0", "3\n");
}

#[test]
fn mod_and_div_are_integer_operations() {
    assert_output("OUTPUT 7 DIV 2", "3\n");
    assert_output("OUTPUT 7 MOD 2", "1\n");
    assert_output("OUTPUT -7 MOD 2", "-1\n");
    assert_output("OUTPUT -7 DIV 2", "-3\n");
}

#[test]
fn unary_operators_nest() {
    assert_output("OUTPUT --5", "5\n");
    assert_output("IF NOT NOT TRUE THEN OUTPUT \"y\" ELSE OUTPUT \"n\" ENDIF", "y\n");
}

#[test]
fn comparisons_promote_integer_to_real() {
    assert_output("IF 1 < 1.5 THEN OUTPUT \"y\" ELSE OUTPUT \"n\" ENDIF", "y\n");
    assert_output("IF 2.0 = 2 THEN OUTPUT \"y\" ELSE OUTPUT \"n\" ENDIF", "y\n");
    assert_output("IF 3 >= 3.5 THEN OUTPUT \"y\" ELSE OUTPUT \"n\" ENDIF", "n\n");
}

#[test]
fn strings_and_chars_compare_by_value() {
    assert_output("IF \"abc\" = \"abc\" THEN OUTPUT 1 ENDIF", "1\n");
    assert_output("IF \"abc\" < \"abd\" THEN OUTPUT 1 ENDIF", "1\n");
    assert_output("IF 'a' < 'b' THEN OUTPUT 1 ENDIF", "1\n");
}

#[test]
fn if_takes_the_right_branch() {
    assert_output("IF 2 > 3 THEN OUTPUT \"a\" ELSE OUTPUT \"b\" ENDIF", "b\n");
    assert_output("IF 3 > 2 THEN OUTPUT \"a\" ELSE OUTPUT \"b\" ENDIF", "a\n");
}

#[test]
fn for_loop_counts_up_and_down() {
    assert_output("FOR i <- 1 TO 3 OUTPUT i NEXT", "1\n2\n3\n");
    assert_output("FOR i <- 3 TO 1 STEP -1 OUTPUT i NEXT", "3\n2\n1\n");
    assert_output("FOR i <- 1 TO 10 STEP 4 OUTPUT i NEXT", "1\n5\n9\n");
}

#[test]
fn for_loop_goes_real_when_any_bound_is_real() {
    assert_output("FOR x <- 1 TO 2 STEP 0.5 OUTPUT x NEXT", "1\n1.5\n2\n");
}

#[test]
fn for_loop_restores_the_previous_binding() {
    let source = "DECLARE i: STRING\n\
                  i <- \"kept\"\n\
                  FOR i <- 1 TO 2 OUTPUT i NEXT\n\
                  OUTPUT i";
    assert_output(source, "1\n2\nkept\n");
}

#[test]
fn while_and_repeat_loops_run() {
    let while_source = "DECLARE n: INTEGER\n\
                        n <- 3\n\
                        WHILE n > 0 DO\n\
                        OUTPUT n\n\
                        n <- n - 1\n\
                        ENDWHILE";
    assert_output(while_source, "3\n2\n1\n");

    let repeat_source = "DECLARE n: INTEGER\n\
                         n <- 0\n\
                         REPEAT\n\
                         n <- n + 1\n\
                         OUTPUT n\n\
                         UNTIL n = 3";
    assert_output(repeat_source, "1\n2\n3\n");
}

#[test]
fn repeat_body_runs_at_least_once() {
    assert_output("DECLARE n: INTEGER\nn <- 10\nREPEAT\nOUTPUT n\nUNTIL n = 10", "10\n");
}

#[test]
fn case_takes_the_first_matching_arm() {
    let source = "DECLARE n: INTEGER\n\
                  n <- 2\n\
                  CASE OF n\n\
                  1 : OUTPUT \"one\"\n\
                  2 : OUTPUT \"two\"\n\
                  2 : OUTPUT \"again\"\n\
                  OTHERWISE OUTPUT \"many\"\n\
                  ENDCASE";
    assert_output(source, "two\n");
}

#[test]
fn case_falls_through_to_otherwise() {
    let source = "DECLARE n: INTEGER\n\
                  n <- 9\n\
                  CASE OF n\n\
                  1 : OUTPUT \"one\"\n\
                  OTHERWISE OUTPUT \"many\"\n\
                  ENDCASE";
    assert_output(source, "many\n");
}

#[test]
fn arrays_store_and_load_elements() {
    let source = "DECLARE a: ARRAY[1:3] OF INTEGER\n\
                  a[2] <- 7\n\
                  OUTPUT a[2]";
    assert_output(source, "7\n");
}

#[test]
fn array_elements_start_zeroed() {
    assert_output("DECLARE a: ARRAY[1:3] OF INTEGER\nOUTPUT a[1]", "0\n");
    assert_output("DECLARE s: ARRAY[1:2] OF STRING\nOUTPUT s[1], \"end\"", "end\n");
}

#[test]
fn arrays_support_arbitrary_bounds() {
    let source = "DECLARE a: ARRAY[5:7] OF INTEGER\n\
                  a[5] <- 50\n\
                  a[7] <- 70\n\
                  OUTPUT a[5] + a[7]";
    assert_output(source, "120\n");
}

#[test]
fn multidimensional_arrays_index_both_ways() {
    let source = "DECLARE grid: ARRAY[1:2] OF ARRAY[1:3] OF INTEGER\n\
                  grid[1, 2] <- 12\n\
                  grid[2][3] <- 23\n\
                  OUTPUT grid[1][2], \" \", grid[2, 3]";
    assert_output(source, "12 23\n");
}

#[test]
fn array_types_compare_by_length() {
    // ARRAY[0:1] and ARRAY[1:2] both hold two integers, so assignment works.
    let source = "DECLARE a: ARRAY[0:1] OF INTEGER\n\
                  DECLARE b: ARRAY[1:2] OF INTEGER\n\
                  a[0] <- 4\n\
                  a[1] <- 5\n\
                  b <- a\n\
                  OUTPUT b[1], b[2]";
    assert_output(source, "45\n");
}

#[test]
fn array_assignment_copies_deeply() {
    let source = "DECLARE a: ARRAY[1:2] OF INTEGER\n\
                  DECLARE b: ARRAY[1:2] OF INTEGER\n\
                  a[1] <- 1\n\
                  b <- a\n\
                  a[1] <- 99\n\
                  OUTPUT b[1]";
    assert_output(source, "1\n");
}

#[test]
fn functions_return_values() {
    let source = "FUNCTION sq(x: INTEGER) RETURNS INTEGER\n\
                  RETURN x * x\n\
                  ENDFUNCTION\n\
                  OUTPUT sq(5)";
    assert_output(source, "25\n");
}

#[test]
fn return_unwinds_nested_blocks() {
    let source = "FUNCTION clamp(x: INTEGER) RETURNS INTEGER\n\
                  IF x > 10 THEN\n\
                  RETURN 10\n\
                  ENDIF\n\
                  RETURN x\n\
                  ENDFUNCTION\n\
                  OUTPUT clamp(42), clamp(3)";
    assert_output(source, "103\n");
}

#[test]
fn return_inside_a_loop_exits_the_function() {
    let source = "FUNCTION firstover(limit: INTEGER) RETURNS INTEGER\n\
                  FOR i <- 1 TO 100\n\
                  IF i * i > limit THEN\n\
                  RETURN i\n\
                  ENDIF\n\
                  NEXT\n\
                  RETURN 0\n\
                  ENDFUNCTION\n\
                  OUTPUT firstover(10)";
    assert_output(source, "4\n");
}

#[test]
fn recursion_works() {
    let source = "FUNCTION fact(n: INTEGER) RETURNS INTEGER\n\
                  IF n <= 1 THEN\n\
                  RETURN 1\n\
                  ENDIF\n\
                  RETURN n * fact(n - 1)\n\
                  ENDFUNCTION\n\
                  OUTPUT fact(10)";
    assert_output(source, "3628800\n");
}

#[test]
fn parameters_shadow_globals_and_are_restored() {
    let source = "DECLARE x: INTEGER\n\
                  x <- 10\n\
                  PROCEDURE show(x: INTEGER)\n\
                  OUTPUT x\n\
                  ENDPROCEDURE\n\
                  CALL show(42)\n\
                  OUTPUT x";
    assert_output(source, "42\n10\n");
}

#[test]
fn procedures_run_via_call() {
    let source = "DECLARE total: INTEGER\n\
                  total <- 0\n\
                  PROCEDURE bump(amount: INTEGER)\n\
                  total <- total + amount\n\
                  ENDPROCEDURE\n\
                  CALL bump(3)\n\
                  CALL bump(4)\n\
                  OUTPUT total";
    assert_output(source, "7\n");
}

#[test]
fn constants_hold_their_value() {
    assert_output("CONSTANT pi = 3.14\nOUTPUT pi", "3.14\n");
    assert_output("CONSTANT greeting = \"hi\"\nOUTPUT greeting, greeting", "hihi\n");
}

#[test]
fn assignment_promotes_integer_into_real_target() {
    assert_output("DECLARE x: REAL\nx <- 2\nOUTPUT x + 0.5", "2.5\n");
}

#[test]
fn output_concatenates_without_separators() {
    assert_output("OUTPUT 1, \" and \", 2.5, \" and \", TRUE", "1 and 2.5 and TRUE\n");
    assert_output("OUTPUT 'x', \"y\"", "xy\n");
}

#[test]
fn date_literals_compare_lexicographically() {
    assert_output("IF 01/01/2020 < 02/01/2020 THEN OUTPUT \"y\" ELSE OUTPUT \"n\" ENDIF", "y\n");
    assert_output("IF 31/12/2019 < 01/01/2020 THEN OUTPUT \"y\" ELSE OUTPUT \"n\" ENDIF", "y\n");
    assert_output("OUTPUT 15/6/2021", "15/6/2021\n");
}

#[test]
fn leap_years_validate() {
    assert_output("OUTPUT 29/2/2020", "29/2/2020\n");
    assert!(matches!(run("OUTPUT 29/2/2019", ""), Err(Error::Lex(_))));
    assert!(matches!(run("OUTPUT 29/2/1900", ""), Err(Error::Lex(_))));
    assert_output("OUTPUT 29/2/2000", "29/2/2000\n");
}

#[test]
fn input_parses_each_primitive() {
    assert_output_with_input("DECLARE n: INTEGER\nINPUT n\nOUTPUT n * 2", "21\n", "42\n");
    assert_output_with_input("DECLARE x: REAL\nINPUT x\nOUTPUT x + 0.25", "1.25\n", "1.5\n");
    assert_output_with_input("DECLARE s: STRING\nINPUT s\nOUTPUT s, \"!\"", "hello\n", "hello!\n");
    assert_output_with_input("DECLARE c: CHAR\nINPUT c\nOUTPUT c", "abc\n", "a\n");
    assert_output_with_input("DECLARE b: BOOLEAN\nINPUT b\nIF b THEN OUTPUT 1 ENDIF",
                             "TRUE\n",
                             "1\n");
    assert_output_with_input("DECLARE d: DATE\nINPUT d\nOUTPUT d", "21/11/2019\n", "21/11/2019\n");
}

#[test]
fn input_failures_are_runtime_errors() {
    let exhausted = run("DECLARE n: INTEGER\nINPUT n", "");
    assert!(matches!(exhausted, Err(Error::Runtime(_))));

    let malformed = run("DECLARE n: INTEGER\nINPUT n", "seven\n");
    assert!(matches!(malformed, Err(Error::Runtime(_))));
}

#[test]
fn builtins_are_available_when_named() {
    assert_output("OUTPUT INT(2.9)", "2\n");
    assert_output("OUTPUT INT(-2.9)", "-2\n");
    assert_output("OUTPUT RANDOMBETWEEN(3, 3)", "3\n");

    let source = "DECLARE r: REAL\n\
                  r <- RND()\n\
                  IF r >= 0 AND r <= 1 THEN OUTPUT \"in range\" ENDIF";
    assert_output(source, "in range\n");

    let source = "DECLARE n: INTEGER\n\
                  n <- RANDOMBETWEEN(1, 6)\n\
                  IF n >= 1 AND n <= 6 THEN OUTPUT \"in range\" ENDIF";
    assert_output(source, "in range\n");
}

#[test]
fn logical_operators_combine_booleans() {
    assert_output("IF TRUE AND NOT FALSE THEN OUTPUT 1 ENDIF", "1\n");
    assert_output("IF FALSE OR TRUE THEN OUTPUT 1 ENDIF", "1\n");
    assert_output("IF FALSE OR FALSE THEN OUTPUT 1 ELSE OUTPUT 0 ENDIF", "0\n");
}

// Failure modes, one per error kind.

#[test]
fn unterminated_string_is_a_lex_error() {
    assert!(matches!(run("OUTPUT \"abc", ""), Err(Error::Lex(_))));
}

#[test]
fn oversized_literals_are_lex_errors() {
    assert!(matches!(run("OUTPUT 99999999999999999999", ""), Err(Error::Lex(_))));
    assert!(matches!(run("OUTPUT 9999999999.999999999", ""), Err(Error::Lex(_))));
}

#[test]
fn letters_after_numbers_are_lex_errors() {
    assert!(matches!(run("OUTPUT 12e2", ""), Err(Error::Lex(_))));
    assert!(matches!(run("OUTPUT 12.2e2", ""), Err(Error::Lex(_))));
}

#[test]
fn dangling_operator_is_a_parse_error() {
    assert!(matches!(run("OUTPUT 1 +", ""), Err(Error::Parse(_))));
}

#[test]
fn return_outside_a_function_is_a_parse_error() {
    assert!(matches!(run("RETURN 1", ""), Err(Error::Parse(_))));
    let in_procedure = "PROCEDURE p\nRETURN 1\nENDPROCEDURE";
    assert!(matches!(run(in_procedure, ""), Err(Error::Parse(_))));
}

#[test]
fn assigning_the_wrong_type_is_a_type_error() {
    let source = "DECLARE a: INTEGER\na <- \"hi\"";
    assert!(matches!(run(source, ""), Err(Error::Type(_))));
}

#[test]
fn redeclaration_is_a_type_error() {
    let source = "DECLARE a: INTEGER\nDECLARE a: STRING";
    assert!(matches!(run(source, ""), Err(Error::Type(_))));
}

#[test]
fn procedure_in_value_position_is_a_type_error() {
    let source = "PROCEDURE p\nOUTPUT 1\nENDPROCEDURE\nOUTPUT p()";
    assert!(matches!(run(source, ""), Err(Error::Type(_))));
}

#[test]
fn function_that_never_returns_is_a_type_error() {
    let source = "FUNCTION f(x: INTEGER) RETURNS INTEGER\n\
                  OUTPUT x\n\
                  ENDFUNCTION\n\
                  OUTPUT f(1)";
    assert!(matches!(run(source, ""), Err(Error::Type(_))));
}

#[test]
fn backwards_array_bounds_are_a_type_error() {
    assert!(matches!(run("DECLARE a: ARRAY[10:0] OF INTEGER", ""), Err(Error::Type(_))));
}

#[test]
fn comparing_arrays_is_a_type_error() {
    let source = "DECLARE a: ARRAY[1:2] OF INTEGER\n\
                  DECLARE b: ARRAY[1:2] OF INTEGER\n\
                  IF a = b THEN OUTPUT 1 ENDIF";
    assert!(matches!(run(source, ""), Err(Error::Type(_))));
}

#[test]
fn outputting_an_array_is_a_type_error() {
    let source = "DECLARE a: ARRAY[1:2] OF INTEGER\nOUTPUT a";
    assert!(matches!(run(source, ""), Err(Error::Type(_))));
}

#[test]
fn out_of_bounds_index_is_a_runtime_error() {
    let source = "DECLARE a: ARRAY[1:2] OF INTEGER\nOUTPUT a[5]";
    assert!(matches!(run(source, ""), Err(Error::Runtime(_))));
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    assert!(matches!(run("OUTPUT 1 / 0", ""), Err(Error::Runtime(_))));
    assert!(matches!(run("OUTPUT 1 MOD 0", ""), Err(Error::Runtime(_))));
    assert!(matches!(run("OUTPUT 1 DIV 0", ""), Err(Error::Runtime(_))));
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    assert!(matches!(run("OUTPUT x", ""), Err(Error::Runtime(_))));
    assert!(matches!(run("x <- 1", ""), Err(Error::Runtime(_))));
}

#[test]
fn integer_overflow_is_a_runtime_error() {
    let source = "DECLARE n: INTEGER\n\
                  n <- 999999999999999999\n\
                  OUTPUT n * n";
    assert!(matches!(run(source, ""), Err(Error::Runtime(_))));
}

#[test]
fn byref_parameters_are_rejected() {
    let source = "PROCEDURE p(BYREF x: INTEGER)\nOUTPUT x\nENDPROCEDURE";
    assert!(matches!(run(source, ""), Err(Error::Runtime(_))));
}

#[test]
fn calling_an_unknown_procedure_is_a_runtime_error() {
    assert!(matches!(run("CALL missing", ""), Err(Error::Runtime(_))));
}

#[test]
fn wrong_argument_count_is_a_runtime_error() {
    let source = "FUNCTION sq(x: INTEGER) RETURNS INTEGER\n\
                  RETURN x * x\n\
                  ENDFUNCTION\n\
                  OUTPUT sq(1, 2)";
    assert!(matches!(run(source, ""), Err(Error::Runtime(_))));
}

#[test]
fn partial_output_survives_an_error() {
    let source = "OUTPUT \"before\"\nOUTPUT 1 / 0";
    let mut output = Vec::new();
    let mut input = Cursor::new(String::new());
    let result = run_source(source, &mut input, &mut output);
    assert!(result.is_err());
    assert_eq!(output, b"before\n");
}

// Lexer-level checks through the public API.

#[test]
fn identifiers_intern_to_stable_ids() {
    let lexer = Lexer::lex("alpha beta alpha").expect("lexes");
    let ids: Vec<i64> = lexer.tokens
                             .iter()
                             .filter_map(|spanned| match spanned.token {
                                 Token::Identifier(id) => Some(id),
                                 _ => None,
                             })
                             .collect();
    assert_eq!(ids, vec![1, 2, 1]);
    assert_eq!(lexer.identifier_count, 2);
    assert_eq!(lexer.names[1], "alpha");
    assert_eq!(lexer.names[2], "beta");
}

#[test]
fn tokens_carry_line_and_column() {
    let lexer = Lexer::lex(" \n  *\nx // comment\n").expect("lexes");
    assert_eq!((lexer.tokens[0].line, lexer.tokens[0].col), (2, 3));
    assert!(matches!(lexer.tokens[0].token, Token::Star));
    assert_eq!((lexer.tokens[1].line, lexer.tokens[1].col), (3, 1));
    assert!(matches!(lexer.tokens[1].token, Token::Identifier(1)));
    // The end-of-stream sentinel sits after the last byte.
    assert!(matches!(lexer.tokens[2].token, Token::Invalid));
}

#[test]
fn reserved_words_are_not_identifiers() {
    let lexer = Lexer::lex("WHILE while").expect("lexes");
    assert!(matches!(lexer.tokens[0].token, Token::While));
    assert!(matches!(lexer.tokens[1].token, Token::Identifier(1)));
}

#[test]
fn dates_fuse_in_the_token_stream() {
    let lexer = Lexer::lex("21/11/2019").expect("lexes");
    assert_eq!(lexer.tokens.len(), 2);
    let expected = Date::new(21, 11, 2019).expect("valid date");
    assert!(matches!(lexer.tokens[0].token, Token::DateConst(date) if date == expected));
}

#[test]
fn interrupted_date_patterns_stay_division() {
    // A parenthesis breaks the INT / INT / INT run, so these stay slashes.
    let lexer = Lexer::lex("(1)/2/3").expect("lexes");
    assert!(lexer.tokens.iter().any(|spanned| matches!(spanned.token, Token::Slash)));
    assert!(!lexer.tokens.iter().any(|spanned| matches!(spanned.token, Token::DateConst(_))));
}

#[test]
fn reals_lex_as_reduced_fractions() {
    let lexer = Lexer::lex("4.999 3.0").expect("lexes");
    let expected = Fraction::new(4999, 1000).expect("reduces");
    assert!(matches!(lexer.tokens[0].token, Token::RealConst(value) if value == expected));
    let three = Fraction::new(3, 1).expect("reduces");
    assert!(matches!(lexer.tokens[1].token, Token::RealConst(value) if value == three));
}

#[test]
fn strings_may_contain_newlines() {
    let lexer = Lexer::lex("\"a\nb\" x").expect("lexes");
    assert!(matches!(&lexer.tokens[0].token, Token::StrConst(body) if body.as_ref() == "a\nb"));
    // The identifier after the string is on line 2.
    assert_eq!(lexer.tokens[1].line, 2);
}
