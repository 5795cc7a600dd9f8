//! Arithmetic expressions: operator precedence, grouping and wrapping overflow.

#[test]
fn multiplication_binds_tighter_than_addition() {
    test_utils::assert_result("2 + 3 * 4;", "14");
}

#[test]
fn parentheses_override_precedence() {
    test_utils::assert_result("(2 + 3) * 4;", "20");
}

#[test]
fn unary_minus_binds_tighter_than_binary_operators() {
    test_utils::assert_result("-5 + 10;", "5");
}

#[test]
fn modulo_follows_multiplicative_precedence() {
    test_utils::assert_result("10 % 3 + 1;", "2");
}

#[test]
fn division_truncates_toward_zero() {
    test_utils::assert_result("7 / 2;", "3");
    test_utils::assert_result("-7 / 2;", "-3");
}

#[test]
fn integer_arithmetic_wraps_on_overflow_instead_of_panicking() {
    test_utils::assert_result("9223372036854775807 + 1;", "-9223372036854775808");
}

#[test]
fn deeply_nested_expressions_evaluate_left_to_right_within_precedence() {
    test_utils::assert_result("1 + 2 + 3 + 4 + 5;", "15");
}
