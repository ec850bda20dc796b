use super::LinRecord;
use itertools::Itertools;
use std::io::Write;

/// maximum characters per record line in the transit-line text block
const RECORD_WIDTH: usize = 254;

/// serializes line records into the fixed-format transit-line text block:
/// one record per line with name, mode, one headway per period, the full
/// signed node sequence and the non-circular closing marker
pub fn write_lin<W: Write>(records: &[LinRecord], writer: &mut W) -> Result<(), std::io::Error> {
    for (index, record) in records.iter().enumerate() {
        if index != 0 {
            writeln!(writer)?;
        }
        let headways = record
            .headways
            .iter()
            .enumerate()
            .map(|(i, h)| format!("HEADWAY[{}]={h:.2}", i + 1))
            .join(", ");
        writeln!(
            writer,
            "LINE NAME=\"{}\", MODE={}, {headways}, ONEWAY=T, ALLSTOPS=F, VEHICLETYPE=1,",
            record.name, record.mode
        )?;
        let nodes = record.node_sequence.iter().map(|n| n.to_string()).collect_vec();
        for line in wrap_fields("N=", &nodes) {
            writeln!(writer, "{line}")?;
        }
        write!(writer, "CIRCULAR=F")?;
    }
    Ok(())
}

/// joins comma-separated fields into lines no wider than the record width
fn wrap_fields(prefix: &str, fields: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = vec![];
    let mut current = String::from(prefix);
    for field in fields {
        let piece = format!("{field},");
        if current.len() + piece.len() > RECORD_WIDTH && current.len() > prefix.len() {
            lines.push(current.clone());
            current = String::new();
        }
        current.push_str(&piece);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod test {
    use super::*;

    fn record() -> LinRecord {
        LinRecord {
            shape_id: String::from("20250012"),
            name: String::from("Crosst_012"),
            mode: 2,
            headways: vec![15.0, 30.0],
            node_sequence: vec![101, -102, -103, 104],
        }
    }

    #[test]
    fn test_write_lin_single_record() {
        let mut out: Vec<u8> = vec![];
        write_lin(&[record()], &mut out).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "LINE NAME=\"Crosst_012\", MODE=2, HEADWAY[1]=15.00, HEADWAY[2]=30.00, \
             ONEWAY=T, ALLSTOPS=F, VEHICLETYPE=1,\nN=101,-102,-103,104,\nCIRCULAR=F"
        );
    }

    #[test]
    fn test_write_lin_separates_records_with_blank_line() {
        let mut out: Vec<u8> = vec![];
        write_lin(&[record(), record()], &mut out).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.matches("LINE NAME").count(), 2);
        assert!(text.contains("CIRCULAR=F\nLINE NAME"));
    }

    #[test]
    fn test_long_node_sequences_wrap() {
        let mut long = record();
        long.node_sequence = (1..=200).collect();
        let mut out: Vec<u8> = vec![];
        write_lin(&[long], &mut out).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.lines().all(|line| line.len() <= RECORD_WIDTH));
        assert!(text.lines().count() > 3);
    }
}
