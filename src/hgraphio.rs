//! Reading hypergraphs in hMetis format and writing partition files.
//!
//! ```text
//! % comment
//! <nedges> <nvtxs> [fmt]          fmt: 1 edge weights, 10 node weights, 11 both
//! [w] p1 p2 ...                   one line per hyperedge, pins are 1-based
//! w                               one line per node if node weights are present
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::defs::*;
use crate::error::{Error, Result};
use crate::hypergraph::Hypergraph;

pub fn read_hypergraph(path: impl AsRef<Path>, k: PartitionId) -> Result<Hypergraph> {
    let file = File::open(path)?;
    read_hypergraph_from(BufReader::new(file), k)
}

pub fn read_hypergraph_from<R: BufRead>(reader: R, k: PartitionId) -> Result<Hypergraph> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, l)| l.map(|l| (i + 1, l)))
        .filter(|l| match l {
            Ok((_, l)) => {
                let l = l.trim_start();
                !l.is_empty() && !l.starts_with('%')
            }
            Err(_) => true,
        });

    let (lineno, header) = lines
        .next()
        .ok_or_else(|| Error::InvalidInput("file contains no header".to_string()))??;
    let fields = parse_numbers::<i64>(&header, lineno)?;
    let (nedges, nvtxs, fmt) = match fields[..] {
        [nedges, nvtxs] => (nedges, nvtxs, 0),
        [nedges, nvtxs, fmt] => (nedges, nvtxs, fmt),
        _ => return Err(Error::parse(lineno, "header needs 2 or 3 fields")),
    };
    if nedges < 0 || nvtxs < 0 {
        return Err(Error::parse(lineno, "negative size in header"));
    }
    let (has_ewgt, has_vwgt) = match fmt {
        0 => (false, false),
        1 => (true, false),
        10 => (false, true),
        11 => (true, true),
        _ => return Err(Error::parse(lineno, format!("unknown fmt {fmt}"))),
    };
    let nedges = nedges as usize;
    let nvtxs = nvtxs as usize;
    if k < 1 || k as usize > nvtxs {
        return Err(Error::InvalidConfig(format!(
            "cannot split {nvtxs} nodes into {k} parts"
        )));
    }

    let mut eptr = Vec::with_capacity(nedges + 1);
    let mut eind: Vec<HypernodeId> = Vec::new();
    let mut ewgt = Vec::with_capacity(if has_ewgt { nedges } else { 0 });
    let mut seen = vec![usize::MAX; nvtxs];
    eptr.push(0);

    for e in 0..nedges {
        let (lineno, line) = lines.next().ok_or_else(|| {
            Error::InvalidInput(format!("expected {nedges} hyperedges, found {e}"))
        })??;
        let mut fields = parse_numbers::<i64>(&line, lineno)?.into_iter();
        if has_ewgt {
            let w = fields
                .next()
                .ok_or_else(|| Error::parse(lineno, "missing hyperedge weight"))?;
            if w <= 0 {
                return Err(Error::parse(lineno, format!("hyperedge weight {w} is not positive")));
            }
            let w = HyperedgeWeight::try_from(w)
                .map_err(|_| Error::parse(lineno, format!("hyperedge weight {w} is too large")))?;
            ewgt.push(w);
        }
        let start = eind.len();
        for pin in fields {
            if pin < 1 || pin as usize > nvtxs {
                return Err(Error::parse(lineno, format!("pin {pin} out of range 1..={nvtxs}")));
            }
            let pin = pin as usize - 1;
            // duplicate pins within one hyperedge collapse
            if seen[pin] != e {
                seen[pin] = e;
                eind.push(pin as HypernodeId);
            }
        }
        if eind.len() == start {
            return Err(Error::parse(lineno, "hyperedge without pins"));
        }
        eptr.push(eind.len());
    }

    let mut vwgt = Vec::new();
    let mut total: i64 = 0;
    if has_vwgt {
        vwgt.reserve(nvtxs);
        for v in 0..nvtxs {
            let (lineno, line) = lines.next().ok_or_else(|| {
                Error::InvalidInput(format!("expected {nvtxs} node weights, found {v}"))
            })??;
            let w = match parse_numbers::<i64>(&line, lineno)?[..] {
                [w] => w,
                _ => return Err(Error::parse(lineno, "expected one node weight")),
            };
            if w <= 0 {
                return Err(Error::parse(lineno, format!("node weight {w} is not positive")));
            }
            total = total.saturating_add(w);
            if total > HypernodeWeight::MAX as i64 {
                return Err(Error::parse(lineno, "node weights exceed the supported total"));
            }
            vwgt.push(w as HypernodeWeight);
        }
    }

    if let Some(extra) = lines.next() {
        let (lineno, _) = extra?;
        return Err(Error::parse(lineno, "unexpected data after the last record"));
    }

    Ok(Hypergraph::with_weights(
        nvtxs,
        &eptr,
        &eind,
        k,
        has_ewgt.then_some(&ewgt[..]),
        has_vwgt.then_some(&vwgt[..]),
    ))
}

fn parse_numbers<T: std::str::FromStr>(line: &str, lineno: usize) -> Result<Vec<T>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse()
                .map_err(|_| Error::parse(lineno, format!("cannot parse {tok:?}")))
        })
        .collect()
}

/// one part id per node line
pub fn write_partition(path: impl AsRef<Path>, hg: &Hypergraph) -> Result<()> {
    let file = File::create(path)?;
    write_partition_to(BufWriter::new(file), hg)
}

pub fn write_partition_to<W: Write>(mut writer: W, hg: &Hypergraph) -> Result<()> {
    for v in 0..hg.initial_num_nodes() as HypernodeId {
        writeln!(writer, "{}", hg.part_id(v))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn read(s: &str) -> Result<Hypergraph> {
        read_hypergraph_from(s.as_bytes(), 2)
    }

    #[test]
    fn reads_unweighted() {
        let hg = read("% seven nodes\n4 7\n1 3\n1 2 4 5\n4 5 7\n3 6 7\n").unwrap();
        assert_eq!(hg.initial_num_nodes(), 7);
        assert_eq!(hg.initial_num_edges(), 4);
        assert_eq!(hg.pins(1), &[0, 1, 3, 4]);
        assert_eq!(hg.edge_weight(2), 1);
    }

    #[test]
    fn reads_weights_and_collapses_duplicates() {
        let hg = read("2 3 11\n5 1 2 2\n% between\n1 2 3\n4\n1\n2\n").unwrap();
        assert_eq!(hg.pins(0), &[0, 1]);
        assert_eq!(hg.edge_weight(0), 5);
        assert_eq!(hg.node_weight(0), 4);
        assert_eq!(hg.total_weight(), 7);
    }

    #[test]
    fn reports_line_numbers() {
        match read("% c\n2 3\n1 2\n1 9\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected {other:?}"),
        }
        match read("1 3\n1 x\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(matches!(read("3 3\n1 2\n"), Err(Error::InvalidInput(_))));
        assert!(matches!(read(""), Err(Error::InvalidInput(_))));
        assert!(matches!(read("1 2 7\n1 2\n"), Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn rejects_weights_out_of_range() {
        assert!(matches!(read("1 2 1\n4294967297 1 2\n"), Err(Error::Parse { line: 2, .. })));
        assert!(matches!(read("1 2 1\n2147483648 1 2\n"), Err(Error::Parse { line: 2, .. })));
        assert_eq!(read("1 2 1\n2147483647 1 2\n").unwrap().edge_weight(0), HyperedgeWeight::MAX);

        assert!(matches!(read("1 2 10\n1 2\n3\n4294967296\n"), Err(Error::Parse { line: 4, .. })));
        // each weight fits, their sum does not
        assert!(matches!(
            read("1 2 10\n1 2\n2147483647\n1\n"),
            Err(Error::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn rejects_part_counts_outside_the_node_range() {
        let input = "1 3\n1 2 3\n";
        assert!(read_hypergraph_from(input.as_bytes(), 3).is_ok());
        for k in [0, -1, 4, 2_000_000_000] {
            assert!(matches!(
                read_hypergraph_from(input.as_bytes(), k),
                Err(Error::InvalidConfig(_))
            ));
        }
        // huge hyperedge counts are not allocated for before the check
        assert!(matches!(
            read_hypergraph_from("1000000000 3\n".as_bytes(), 2_000_000_000),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn writes_one_part_per_line() {
        let mut hg = read("1 3\n1 2 3\n").unwrap();
        hg.set_node_part(0, 1);
        hg.set_node_part(1, 0);
        hg.set_node_part(2, 1);
        let mut out = Vec::new();
        write_partition_to(&mut out, &hg).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n0\n1\n");
    }
}
