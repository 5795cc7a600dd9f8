//! Array literals, indexing, and the `len`/`push`/`pop` builtins.

#[test]
fn indexing_reads_elements_by_position() {
    test_utils::assert_result("[10, 20, 30][1];", "20");
}

#[test]
fn len_reports_element_count() {
    test_utils::assert_result("len([1, 2, 3, 4]);", "4");
}

#[test]
fn push_appends_in_place_and_returns_the_array() {
    let source = r#"
        ให้ a = [1, 2];
        push(a, 3);
        แสดง(len(a));
        แสดง(a[2]);
    "#;
    test_utils::assert_stdout(source, "3\n3\n");
}

#[test]
fn pop_removes_and_returns_the_last_element() {
    let source = r#"
        ให้ a = [1, 2, 3];
        แสดง(pop(a));
        แสดง(len(a));
    "#;
    test_utils::assert_stdout(source, "3\n2\n");
}

#[test]
fn pop_from_an_empty_array_is_a_runtime_error() {
    let value = test_utils::run("pop([]);").result;
    assert!(value.starts_with("ERROR"), "got {value:?}");
}

#[test]
fn indexing_out_of_bounds_is_a_runtime_error() {
    let value = test_utils::run("[1, 2][5];").result;
    assert!(value.contains("array index out of bounds: index 5, length 2"), "got {value:?}");
}

#[test]
fn arrays_can_hold_mixed_element_types() {
    let source = r#"แสดง([1, "two", จริง]);"#;
    let run = test_utils::run(source);
    assert!(run.stdout.starts_with('['), "got {:?}", run.stdout);
}

#[test]
fn nested_arrays_print_collapsed() {
    test_utils::assert_stdout("แสดง([[1, 2], 3]);", "[nested array, 3]\n");
}
