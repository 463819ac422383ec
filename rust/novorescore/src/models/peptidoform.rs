//! Minimal ProForma-style peptidoform handling.
//!
//! Only the subset produced by the bracket-notation step is understood:
//! terminal tags (`[ac]-PEP`, `PEP-[am]`), residue tags (`M[ox]`) and an
//! optional trailing charge (`/2`). Tags are stored verbatim, they are not
//! resolved against any modification database here.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeptidoformParsingError {
    pub input: String,
    pub position: usize,
    pub msg: &'static str,
}

impl fmt::Display for PeptidoformParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at position {} of '{}'",
            self.msg, self.position, self.input
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub amino_acid: char,
    pub modifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Peptidoform {
    pub n_term: Vec<String>,
    pub residues: Vec<Residue>,
    pub c_term: Vec<String>,
    pub charge: Option<i32>,
}

impl Peptidoform {
    pub fn parse(input: &str) -> Result<Self, PeptidoformParsingError> {
        let err = |position: usize, msg: &'static str| PeptidoformParsingError {
            input: input.to_string(),
            position,
            msg,
        };

        let (body, charge) = match input.rsplit_once('/') {
            Some((body, charge)) => {
                let charge = charge
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| err(body.len() + 1, "Invalid charge"))?;
                (body, Some(charge))
            }
            None => (input, None),
        };

        let chars: Vec<char> = body.chars().collect();
        let mut pos = 0;
        let mut out = Peptidoform {
            charge,
            ..Default::default()
        };

        // N-terminal tags must be closed by a dash.
        while pos < chars.len() && chars[pos] == '[' {
            let (tag, next) = read_tag(&chars, pos).ok_or_else(|| err(pos, "Unclosed tag"))?;
            out.n_term.push(tag);
            pos = next;
            if pos < chars.len() && chars[pos] == '-' {
                pos += 1;
                break;
            } else if pos >= chars.len() || chars[pos] != '[' {
                return Err(err(pos, "Expected '-' after N-terminal modification"));
            }
        }

        while pos < chars.len() {
            let c = chars[pos];
            if c.is_ascii_alphabetic() {
                out.residues.push(Residue {
                    amino_acid: c,
                    modifications: Vec::new(),
                });
                pos += 1;
            } else if c == '[' {
                let (tag, next) = read_tag(&chars, pos).ok_or_else(|| err(pos, "Unclosed tag"))?;
                match out.residues.last_mut() {
                    Some(residue) => residue.modifications.push(tag),
                    None => return Err(err(pos, "Modification without a residue")),
                }
                pos = next;
            } else if c == '-' && pos + 1 < chars.len() && chars[pos + 1] == '[' {
                pos += 1;
                while pos < chars.len() {
                    if chars[pos] != '[' {
                        return Err(err(pos, "Residue after C-terminal modification"));
                    }
                    let (tag, next) =
                        read_tag(&chars, pos).ok_or_else(|| err(pos, "Unclosed tag"))?;
                    out.c_term.push(tag);
                    pos = next;
                }
            } else {
                return Err(err(pos, "Unexpected character"));
            }
        }

        if out.residues.is_empty() {
            return Err(err(0, "Peptidoform has no residues"));
        }
        Ok(out)
    }

    /// Bare sequence without any modification or charge.
    pub fn sequence(&self) -> String {
        self.residues.iter().map(|x| x.amino_acid).collect()
    }

    /// Applies `f` to every modification tag, terminal tags included.
    pub fn map_modifications<F: FnMut(&mut String)>(&mut self, mut f: F) {
        self.n_term.iter_mut().for_each(&mut f);
        self.residues
            .iter_mut()
            .flat_map(|x| x.modifications.iter_mut())
            .for_each(&mut f);
        self.c_term.iter_mut().for_each(&mut f);
    }

    /// Rendering without the charge suffix.
    pub fn to_unsigned_string(&self) -> String {
        let mut out = String::new();
        self.write_body(&mut out);
        out
    }

    fn write_body(&self, out: &mut String) {
        for tag in self.n_term.iter() {
            out.push('[');
            out.push_str(tag);
            out.push(']');
        }
        if !self.n_term.is_empty() {
            out.push('-');
        }
        for residue in self.residues.iter() {
            out.push(residue.amino_acid);
            for tag in residue.modifications.iter() {
                out.push('[');
                out.push_str(tag);
                out.push(']');
            }
        }
        if !self.c_term.is_empty() {
            out.push('-');
        }
        for tag in self.c_term.iter() {
            out.push('[');
            out.push_str(tag);
            out.push(']');
        }
    }
}

fn read_tag(chars: &[char], start: usize) -> Option<(String, usize)> {
    debug_assert_eq!(chars[start], '[');
    let end = chars[start + 1..].iter().position(|c| *c == ']')? + start + 1;
    Some((chars[start + 1..end].iter().collect(), end + 1))
}

impl fmt::Display for Peptidoform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_body(&mut out);
        if let Some(charge) = self.charge {
            out.push('/');
            out.push_str(&charge.to_string());
        }
        f.write_str(&out)
    }
}
