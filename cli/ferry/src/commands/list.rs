//! `ferry list`: show the cases in execution order.

use ferry_harness::standard_cases;

pub fn run() {
    print!("{}", render());
}

fn render() -> String {
    let mut out = String::new();
    for case in standard_cases() {
        out.push_str(&format!(
            "{:<18} {:<12} {} -> {}\n",
            case.name,
            case.operation.name(),
            case.operation.argument_kind(),
            case.operation.result_kind(),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_case_in_order() {
        let text = render();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 20);
        assert!(lines[0].starts_with("bool "));
        assert!(lines[16].contains("mapping_op"));
        assert!(lines[16].ends_with("map<text, i32> -> map<text, i32>"));
        assert!(lines[19].ends_with("sequence<u64> -> result<u64, ArithmeticError>"));
    }
}
