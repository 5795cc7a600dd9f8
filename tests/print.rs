//! The `print` builtin: multi-argument joining, the one representation per value type, and its
//! `NULL` return value.

#[test]
fn prints_each_value_type_using_its_canonical_rendering() {
    let source = r#"แสดง(42, จริง, เท็จ, "text", ว่างเปล่า, [1, 2]);"#;
    test_utils::assert_stdout(source, "42 จริง เท็จ text ว่างเปล่า [1, 2]\n");
}

#[test]
fn print_with_no_arguments_writes_a_blank_line() {
    test_utils::assert_stdout("แสดง();", "\n");
}

#[test]
fn print_returns_null() {
    test_utils::assert_result(r#"แสดง("ignored");"#, "ว่างเปล่า");
}

#[test]
fn each_call_to_print_writes_its_own_line() {
    let source = r#"
        แสดง(1);
        แสดง(2);
        แสดง(3);
    "#;
    test_utils::assert_stdout(source, "1\n2\n3\n");
}
