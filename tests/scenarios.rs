use pretty_assertions::assert_eq;
use pylite::{run, run_with, Config, Interpreter, RunReport, Status};

#[test]
fn test_hello_world() {
    assert_eq!(run("print('Hello, World!')"), "Hello, World!");
}

#[test]
fn test_assignment_then_print() {
    assert_eq!(run("x = 5\nprint(x)"), "5");
}

#[test]
fn test_for_over_range() {
    assert_eq!(run("for i in range(1,4):\n    print(i)"), "1\n2\n3");
}

#[test]
fn test_else_branch() {
    assert_eq!(
        run("if 1 > 2:\n    print(\"a\")\nelse:\n    print(\"b\")"),
        "b"
    );
}

#[test]
fn test_untranslatable_assignment_keeps_text() {
    assert_eq!(run("total = price @ qty\nprint(total)"), "price @ qty");
}

#[test]
fn test_ranges_print_as_lists() {
    assert_eq!(
        run("print(range(5))\nprint(range(0,10,2))"),
        "[0, 1, 2, 3, 4]\n[0, 2, 4, 6, 8]"
    );
}

#[test]
fn test_print_join_and_nesting() {
    assert_eq!(run("print(1, \"x\", 2)\nprint(min(1,2), 3)"), "1 x 2\n1 3");
}

#[test]
fn test_fstring() {
    assert_eq!(run("x = 5\nprint(f\"{x}\")"), "5");
}

#[test]
fn test_error_discards_partial_output() {
    assert_eq!(
        run("print('first')\nundefined_function()"),
        "Error: name 'undefined_function' is not defined (line 2)"
    );
}

#[test]
fn test_infinite_loop_is_capped() {
    let output = run("count = 0\nwhile True:\n    count += 1\nprint(count)");
    assert_eq!(
        output,
        format!("{}\n1000", Config::default().loop_cap_warning())
    );
}

#[test]
fn test_custom_loop_cap() {
    let config = Config {
        while_iteration_cap: 2,
        ..Config::default()
    };
    let output = run_with("while True:\n    print('x')", config);
    assert_eq!(output, format!("x\nx\n{}", config.loop_cap_warning()));
}

#[test]
fn test_function_return_value_is_dropped() {
    let source = "def double(n):\n    return n * 2\nresult = double(4)\nprint(result)";
    assert_eq!(run(source), "double(4)");
}

#[test]
fn test_small_program() {
    let source = "\
# collect the even squares
squares = []
for n in range(1, 7):
    if n % 2 == 0:
        squares.append(n ** 2)
total = sum(squares)
print('squares:', squares)
print(f'total={total}')

def report(label, value):
    if value > 50:
        print(label, 'is large')
    else:
        print(label, 'is small')

report('total', total)
report('first', squares[0])
";
    assert_eq!(
        run(source),
        "squares: [4, 16, 36]\ntotal=56\ntotal is large\nfirst is small"
    );
}

#[test]
fn test_huge_subscript_degrades() {
    assert_eq!(run("xs = [1]\nprint(xs[-10**19])"), "xs[-10**19]");
    assert_eq!(
        run("xs = [1]\nxs[10**19] = 0"),
        "Error: list assignment index out of range (line 2)"
    );
}

#[test]
fn test_huge_repetition_is_an_error() {
    assert_eq!(
        run("s = 'ab'\ns *= 10**19\nprint(s)"),
        "Error: repeated sequence is too long (line 2)"
    );
}

#[test]
fn test_range_near_integer_limit() {
    let out = run("for i in range(9223372036854775000, 9223372036854775807, 1000):\n    print(i)");
    assert!(!out.starts_with("Error"), "{}", out);
    assert_eq!(out.lines().count(), 2);
    assert_eq!(
        run("for i in range(10**12):\n    print(i)"),
        "Error: 'range(10**12)' is not iterable (line 1)"
    );
}

#[test]
fn test_runs_are_independent() {
    assert_eq!(run("x = 1\nprint(x)"), "1");
    assert_eq!(run("print(x)"), "x");
}

#[test]
fn test_report_serializes() {
    let mut interp = Interpreter::default();
    let outcome = interp.interpret("print('a')\nbreak");
    let report = RunReport::from_outcome(&interp.output, &outcome);
    assert_eq!(report.status, Status::Error);
    assert_eq!(
        serde_json::to_string(&report).unwrap(),
        r#"{"status":"error","output":"Error: 'break' outside loop (line 2)","line":2}"#
    );

    let ok = RunReport::from_outcome(&["a".to_string()], &Ok(()));
    assert_eq!(
        serde_json::to_string(&ok).unwrap(),
        r#"{"status":"ok","output":"a"}"#
    );
}
