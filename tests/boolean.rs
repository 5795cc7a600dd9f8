//! Boolean literals, comparisons and short-circuit-free logical behaviour.

#[test]
fn comparisons_produce_boolean_literals() {
    test_utils::assert_result("1 < 2;", "จริง");
    test_utils::assert_result("1 > 2;", "เท็จ");
    test_utils::assert_result("2 == 2;", "จริง");
    test_utils::assert_result("2 != 2;", "เท็จ");
}

#[test]
fn not_operator_flips_true_and_false() {
    test_utils::assert_result("!จริง;", "เท็จ");
    test_utils::assert_result("!เท็จ;", "จริง");
}

#[test]
fn double_negation_is_identity() {
    test_utils::assert_result("!!จริง;", "จริง");
}

#[test]
fn if_expression_yields_the_taken_branch_value() {
    test_utils::assert_result("ถ้า (จริง) { 1 } ไม่งั้น { 2 };", "1");
    test_utils::assert_result("ถ้า (เท็จ) { 1 } ไม่งั้น { 2 };", "2");
}

#[test]
fn if_without_else_yields_null_when_condition_is_false() {
    test_utils::assert_result("ถ้า (เท็จ) { 1 };", "ว่างเปล่า");
}

#[test]
fn comparing_an_integer_to_a_boolean_is_a_type_mismatch() {
    // There is no implicit coercion between types; only like-typed values can be compared.
    let value = test_utils::run("1 == จริง;").result;
    assert!(value.contains("type mismatch: INTEGER == BOOLEAN"), "got {value:?}");
}
