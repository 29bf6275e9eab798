//! `ferry describe`: print the wire contract of a value kind.

use anyhow::{anyhow, Result};
use ferry_bridge::Operation;
use ferry_codec::ValueKind;

pub fn run(name: &str) -> Result<()> {
    print!("{}", render(name)?);
    Ok(())
}

fn render(name: &str) -> Result<String> {
    let kind = ValueKind::parse(name).ok_or_else(|| {
        anyhow!(
            "unknown kind: '{name}'. Examples: bool, i32, u64, f64, text, Point, void, \
             optional<i32>, sequence<text>, map<text, i32>, result<u64, ArithmeticError>"
        )
    })?;

    let mut out = kind.describe();
    let used_by: Vec<_> = Operation::ALL
        .iter()
        .filter(|op| op.argument_kind() == kind || op.result_kind() == kind)
        .map(|op| op.name())
        .collect();
    if !used_by.is_empty() {
        out.push_str(&format!("  operations:   {}\n", used_by.join(", ")));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_scalar_and_lists_operations() {
        let text = render("u64").unwrap();
        assert!(text.starts_with("u64\n"));
        assert!(text.contains("uint64_t"));
        assert!(text.contains("operations:   u64_op"));
    }

    #[test]
    fn describes_nested_kind() {
        let text = render("map<text, i32>").unwrap();
        assert!(text.contains("i32 big-endian count"));
        assert!(text.contains("mapping_op"));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = render("complex128").unwrap_err();
        assert!(err.to_string().contains("unknown kind"));
    }
}
