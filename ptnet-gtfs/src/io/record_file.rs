use itertools::Itertools;
use ptnet_core::model::AttributeValue;
use std::io::Write;

/// widest numeric field the downstream import tool accepts
const MAX_NUMERIC_WIDTH: usize = 32;

/// derives one column's field declaration from its values: integer columns
/// become `N(len,0)`, real columns `N(len,dec)` and text columns `C(len)`
pub fn field_declaration(name: &str, values: &[AttributeValue]) -> String {
    let numbers: Option<Vec<f64>> = values.iter().map(|v| v.as_number()).collect();
    match numbers {
        Some(ns) if ns.iter().all(|n| n.fract() == 0.0) => {
            let len = ns
                .iter()
                .map(|n| format!("{}", *n as i64).len())
                .max()
                .unwrap_or(1);
            format!("{name} N({len},0)")
        }
        Some(ns) => {
            let int_len = ns
                .iter()
                .map(|n| format!("{}", n.trunc() as i64).len())
                .max()
                .unwrap_or(1);
            let mut decimals = 6usize;
            while int_len + decimals + 1 > MAX_NUMERIC_WIDTH && decimals > 0 {
                decimals -= 1;
            }
            format!("{name} N({},{decimals})", int_len + decimals + 1)
        }
        None => {
            let len = values.iter().map(|v| v.to_string().len()).max().unwrap_or(1);
            format!("{name} C({len})")
        }
    }
}

/// fixed-schema record file for import into the travel-demand tool: one
/// declaration line naming every field and its type, then one record per
/// row
pub fn write_records<W: Write>(
    writer: &mut W,
    columns: &[String],
    rows: &[Vec<AttributeValue>],
) -> Result<(), std::io::Error> {
    let declarations = columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let values = rows
                .iter()
                .filter_map(|row| row.get(index).cloned())
                .collect_vec();
            field_declaration(name, &values)
        })
        .join(";");
    writeln!(writer, "{declarations}")?;
    for row in rows {
        writeln!(writer, "{}", row.iter().map(|v| v.to_string()).join(","))?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_integer_column_declaration() {
        let values = vec![
            AttributeValue::Number(7.0),
            AttributeValue::Number(12345.0),
        ];
        assert_eq!(field_declaration("N", &values), "N N(5,0)");
    }

    #[test]
    fn test_real_column_declaration() {
        let values = vec![AttributeValue::Number(1.5), AttributeValue::Number(10.25)];
        assert_eq!(field_declaration("DIST", &values), "DIST N(9,6)");
    }

    #[test]
    fn test_text_column_declaration() {
        let values = vec![
            AttributeValue::Text(String::from("local")),
            AttributeValue::Text(String::from("express")),
        ];
        assert_eq!(field_declaration("SERVICE", &values), "SERVICE C(7)");
    }

    #[test]
    fn test_write_records_layout() {
        let columns = vec![String::from("A"), String::from("NAME")];
        let rows = vec![
            vec![AttributeValue::Number(1.0), AttributeValue::Text(String::from("x"))],
            vec![AttributeValue::Number(22.0), AttributeValue::Text(String::from("yz"))],
        ];
        let mut out: Vec<u8> = vec![];
        write_records(&mut out, &columns, &rows).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "A N(2,0);NAME C(2)\n1,x\n22,yz\n");
    }
}
