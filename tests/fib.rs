//! Recursive function calls deep enough to exercise the call stack and GC together.

#[test]
fn recursive_fibonacci() {
    let source = r#"
        ให้ fib = ฟังก์ชัน(n) {
            ถ้า (n < 2) {
                คืนค่า n;
            }
            คืนค่า fib(n - 1) + fib(n - 2);
        };
        fib(20);
    "#;
    test_utils::assert_result(source, "6765");
}

#[test]
fn recursive_fibonacci_prints_a_sequence() {
    let source = r#"
        ให้ fib = ฟังก์ชัน(n) {
            ถ้า (n < 2) {
                คืนค่า n;
            }
            คืนค่า fib(n - 1) + fib(n - 2);
        };
        สำหรับ i จาก 0 ถึง 10 {
            แสดง(fib(i));
        }
    "#;
    test_utils::assert_stdout(source, "0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n55\n");
}
