//! The smallest possible program: one `print` call.

#[test]
fn prints_hello_world() {
    test_utils::assert_stdout(r#"แสดง("Hello, World!");"#, "Hello, World!\n");
}

#[test]
fn print_joins_multiple_arguments_with_a_space() {
    test_utils::assert_stdout(r#"แสดง("Hello,", "World!");"#, "Hello, World!\n");
}

#[test]
fn trailing_semicolon_is_optional_on_the_last_statement() {
    let run = test_utils::run(r#"แสดง("no trailing semicolon")"#);
    assert_eq!(run.stdout, "no trailing semicolon\n");
}
