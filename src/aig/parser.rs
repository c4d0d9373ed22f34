use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{Aig, AigEdge, AigError, AigNode, NodeId, Result, aig::error::ParserError};

fn read_u64(s: &str) -> std::result::Result<u64, ParserError> {
    s.parse::<u64>()
        .map_err(|_| ParserError::InvalidToken(s.to_string() + " expected u64"))
}

fn check_even(x: u64) -> std::result::Result<u64, ParserError> {
    if x & 1 == 1 {
        return Err(ParserError::InvalidToken(
            "expected literal to be even, got ".to_string() + &x.to_string(),
        ));
    }
    Ok(x)
}

/// Splits an AIGER literal into a node id and a complement flag.
fn split_literal(lit: u64) -> (NodeId, bool) {
    (lit >> 1, lit & 1 != 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    i: u64,
    l: u64,
    o: u64,
    a: u64,
}

impl TryFrom<&str> for Header {
    type Error = ParserError;

    fn try_from(line: &str) -> std::result::Result<Self, Self::Error> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();

        if tokens.len() < 6 {
            return Err(ParserError::InvalidToken(
                "missing header tokens".to_string(),
            ));
        }
        if tokens[0] == "aig" {
            return Err(ParserError::UnsupportedFeature(
                "binary AIGER, only aag is supported".to_string(),
            ));
        }
        if tokens[0] != "aag" {
            return Err(ParserError::InvalidToken("expected aag".to_string()));
        }
        if tokens.len() > 6 {
            return Err(ParserError::UnsupportedFeature(
                "header only supports M I L O A".to_string(),
            ));
        }

        let _m = read_u64(tokens[1])?;
        let header = Header {
            i: read_u64(tokens[2])?,
            l: read_u64(tokens[3])?,
            o: read_u64(tokens[4])?,
            a: read_u64(tokens[5])?,
        };
        if header.l > 0 {
            return Err(ParserError::UnsupportedFeature(
                "latches, only combinational circuits are supported".to_string(),
            ));
        }
        Ok(header)
    }
}

/// Reads the next line and splits it into exactly `n` numeric tokens.
fn read_tokens(reader: &mut impl BufRead, n: usize, what: &str) -> Result<Vec<u64>> {
    let mut line = String::new();
    if reader.read_line(&mut line).map_err(ParserError::from)? == 0 {
        return Err(ParserError::InvalidToken(format!("expected {}, got end of file", what)).into());
    }
    let tokens = line.split_whitespace().collect::<Vec<&str>>();
    if tokens.len() != n {
        return Err(ParserError::InvalidToken(format!(
            "expected {} token(s) for {}, got '{}'",
            n,
            what,
            line.trim()
        ))
        .into());
    }
    Ok(tokens
        .into_iter()
        .map(read_u64)
        .collect::<std::result::Result<Vec<u64>, ParserError>>()?)
}

fn cyclic_gate(id: NodeId) -> AigError {
    ParserError::InvalidToken(format!("and gate {} is part of a cycle", id << 1)).into()
}

impl Aig {
    /// Parses a combinational circuit in the ASCII AIGER format (`aag`).
    ///
    /// AND gates may be listed in any order, as long as the graph is acyclic.
    /// The symbol table and comments are ignored.
    pub fn from_ascii(mut reader: impl BufRead) -> Result<Self> {
        let mut line = String::new();
        reader.read_line(&mut line).map_err(ParserError::from)?;
        let header = Header::try_from(line.as_str())?;

        let mut aig = Aig::new();

        for _ in 0..header.i {
            let lit = check_even(read_tokens(&mut reader, 1, "input")?[0])?;
            aig.add_node(AigNode::Input(lit >> 1))?;
        }

        let mut outputs = Vec::new();
        for _ in 0..header.o {
            outputs.push(split_literal(read_tokens(&mut reader, 1, "output")?[0]));
        }

        let mut order = Vec::new();
        let mut ands: HashMap<NodeId, [(NodeId, bool); 2]> = HashMap::new();
        for _ in 0..header.a {
            let tokens = read_tokens(&mut reader, 3, "and gate")?;
            let id = check_even(tokens[0])? >> 1;
            if id == 0 {
                return Err(ParserError::InvalidToken(
                    "and gate defined on literal 0, reserved for the constant".to_string(),
                )
                .into());
            }
            if ands
                .insert(id, [split_literal(tokens[1]), split_literal(tokens[2])])
                .is_some()
            {
                return Err(AigError::DuplicateId(id));
            }
            order.push(id);
        }

        // Gates are registered in post order, so that fanins always exist first.
        let mut done: HashMap<NodeId, bool> = HashMap::new();
        for root in order {
            let mut stack = vec![(root, false)];
            while let Some((id, expanded)) = stack.pop() {
                let [f0, f1] = ands[&id];
                if expanded {
                    let n0 = aig.get_node(f0.0).ok_or(AigError::NodeDoesNotExist(f0.0))?;
                    let n1 = aig.get_node(f1.0).ok_or(AigError::NodeDoesNotExist(f1.0))?;
                    aig.new_and(id, AigEdge::new(n0, f0.1), AigEdge::new(n1, f1.1))?;
                    done.insert(id, true);
                    continue;
                }
                match done.get(&id) {
                    Some(true) => continue,
                    Some(false) => return Err(cyclic_gate(id)),
                    None => (),
                }
                done.insert(id, false);
                stack.push((id, true));

                for (fanin, _) in [f0, f1] {
                    if aig.get_node(fanin).is_some() {
                        continue;
                    }
                    match done.get(&fanin) {
                        Some(true) => (),
                        Some(false) => return Err(cyclic_gate(fanin)),
                        None if ands.contains_key(&fanin) => stack.push((fanin, false)),
                        None => {
                            return Err(ParserError::InvalidToken(format!(
                                "and gate {} depends on undefined literal {}",
                                id << 1,
                                fanin << 1
                            ))
                            .into());
                        }
                    }
                }
            }
        }

        for (id, complement) in outputs {
            aig.add_output(id, complement)?;
        }
        aig.update();
        aig.check_integrity()?;

        Ok(aig)
    }

    /// Parses an ASCII AIGER file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|ext| ext.to_str()) != Some("aag") {
            return Err(AigError::ParserError(ParserError::UnsupportedFeature(format!(
                "file extension of {}, expected .aag",
                path.display()
            ))));
        }
        let file = File::open(path).map_err(ParserError::from)?;
        Aig::from_ascii(BufReader::new(file))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const HALF_ADDER: &str = "aag 7 2 0 2 3\n2\n4\n6\n12\n6 13 15\n12 2 4\n14 3 5\n";

    #[test]
    fn read_u64_test() {
        assert_eq!(read_u64("42").unwrap(), 42);
        assert!(read_u64("-1").is_err());
        assert!(read_u64("x").is_err());
    }

    #[test]
    fn header_try_from_test() {
        assert_eq!(
            Header::try_from("aag 3 2 0 1 1").unwrap(),
            Header {
                i: 2,
                l: 0,
                o: 1,
                a: 1
            }
        );
        assert!(Header::try_from("aag 3 2 0 1").is_err());
        assert!(Header::try_from("aig 3 2 0 1 1").is_err());
        assert!(Header::try_from("aag 3 2 0 1 1 0").is_err());
        assert!(matches!(
            Header::try_from("aag 3 1 1 1 1"),
            Err(ParserError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn half_adder_test() {
        let aig = Aig::from_ascii(HALF_ADDER.as_bytes()).unwrap();
        assert_eq!(aig.input_count(), 2);
        assert_eq!(aig.output_count(), 2);
        assert_eq!(aig.and_count(), 3);
        // outputs: sum = xor, carry = and
        assert_eq!(aig.eval(&[false, false]).unwrap(), vec![false, false]);
        assert_eq!(aig.eval(&[true, false]).unwrap(), vec![true, false]);
        assert_eq!(aig.eval(&[false, true]).unwrap(), vec![true, false]);
        assert_eq!(aig.eval(&[true, true]).unwrap(), vec![false, true]);
    }

    #[test]
    fn truncated_file_test() {
        assert!(Aig::from_ascii("aag 3 2 0 1 1\n2\n4\n6\n".as_bytes()).is_err());
        assert!(Aig::from_ascii("aag 3 2 0 1 1\n2\n".as_bytes()).is_err());
    }

    #[test]
    fn cyclic_gates_test() {
        let cyclic = "aag 4 1 0 1 2\n2\n6\n6 2 8\n8 2 6\n";
        assert!(Aig::from_ascii(cyclic.as_bytes()).is_err());
    }

    #[test]
    fn and_on_constant_literal_test() {
        for and in ["0 2 2", "1 2 2"] {
            let text = format!("aag 1 1 0 1 1\n2\n2\n{}\n", and);
            assert!(matches!(
                Aig::from_ascii(text.as_bytes()),
                Err(AigError::ParserError(ParserError::InvalidToken(_)))
            ));
        }
    }

    #[test]
    fn reverse_order_gates_test() {
        // A chain g_k = g_{k-1} & i1, listed from the output down to the first gate.
        let n = 2000u64;
        let mut text = format!("aag {} 1 0 1 {}\n2\n{}\n", n + 1, n, (n + 1) << 1);
        for k in (2..=n + 1).rev() {
            let fanin = if k == 2 { 2 } else { (k - 1) << 1 };
            text.push_str(&format!("{} {} 2\n", k << 1, fanin));
        }
        let aig = Aig::from_ascii(text.as_bytes()).unwrap();
        assert_eq!(aig.and_count(), n as usize);
        assert_eq!(aig.eval(&[true]).unwrap(), vec![true]);
        assert_eq!(aig.eval(&[false]).unwrap(), vec![false]);
    }

    #[test]
    fn undefined_fanin_test() {
        let undefined = "aag 3 1 0 1 1\n2\n6\n6 2 4\n";
        assert!(Aig::from_ascii(undefined.as_bytes()).is_err());
        let duplicate = "aag 2 1 0 1 2\n2\n4\n4 2 2\n4 3 3\n";
        assert!(matches!(
            Aig::from_ascii(duplicate.as_bytes()),
            Err(AigError::DuplicateId(2))
        ));
    }

    #[test]
    fn odd_input_literal_test() {
        assert!(Aig::from_ascii("aag 1 1 0 1 0\n3\n2\n".as_bytes()).is_err());
    }

    #[test]
    fn from_file_extension_test() {
        assert!(Aig::from_file("circuit.aig").is_err());
    }
}
