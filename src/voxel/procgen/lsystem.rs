//! L-system grammar parsing and expansion
//!
//! A grammar is written as one or more rules separated by `;`, each of the
//! form `X=replacement`. The left-hand side of the first rule is the axiom.
//! Expansion rewrites every symbol with a rule in parallel; symbols without a
//! rule pass through unchanged.

use std::collections::HashMap;

use thiserror::Error;

/// Rewrite iterations applied to tree grammars
pub const TREE_ITERATIONS: u32 = 2;

/// Hard cap on expanded string length
pub const MAX_EXPANDED_LEN: usize = 16_384;

/// Hard cap on `A(n)` arguments
pub const MAX_ARC_STEPS: u32 = 16;

/// Grammar parse failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("rule '{0}' is missing '='")]
    MissingEquals(String),
    #[error("rule '{0}' must have a single-symbol left-hand side")]
    BadSymbol(String),
    #[error("unbalanced brackets in '{0}'")]
    Unbalanced(String),
    #[error("malformed A(n) in '{0}'")]
    BadArc(String),
    #[error("grammar has no rules")]
    Empty,
}

/// One turtle instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// `F`: step forward, emitting wood
    Forward,
    /// `+ - / \`: snap facing to a discrete direction
    Face(Facing),
    /// `[`
    Push,
    /// `]`
    Pop,
    /// `A(n)`: n diagonal wood steps at an increasing azimuth
    Arc(u32),
    /// `L`: ring of leaves
    Leaves,
}

/// Discrete turtle facings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Up,
    PosX,
    NegX,
    PosZ,
    NegZ,
}

impl Facing {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Facing::PosX),
            '-' => Some(Facing::NegX),
            '/' => Some(Facing::PosZ),
            '\\' => Some(Facing::NegZ),
            _ => None,
        }
    }

    pub fn step(self) -> glam::IVec3 {
        match self {
            Facing::Up => glam::IVec3::Y,
            Facing::PosX => glam::IVec3::X,
            Facing::NegX => glam::IVec3::NEG_X,
            Facing::PosZ => glam::IVec3::Z,
            Facing::NegZ => glam::IVec3::NEG_Z,
        }
    }
}

/// Parsed rewrite grammar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    axiom: char,
    rules: HashMap<char, String>,
}

impl Grammar {
    /// Parse a rule string such as `F=F[FA(3)L]A(3)`
    pub fn parse(source: &str) -> Result<Self, GrammarError> {
        let mut axiom = None;
        let mut rules = HashMap::new();

        for rule in source.split(';').map(str::trim).filter(|r| !r.is_empty()) {
            let (lhs, rhs) = rule
                .split_once('=')
                .ok_or_else(|| GrammarError::MissingEquals(rule.to_string()))?;
            let mut symbols = lhs.trim().chars();
            let symbol = match (symbols.next(), symbols.next()) {
                (Some(c), None) => c,
                _ => return Err(GrammarError::BadSymbol(rule.to_string())),
            };
            let rhs = rhs.trim();
            validate_body(rhs)?;

            axiom.get_or_insert(symbol);
            rules.insert(symbol, rhs.to_string());
        }

        let axiom = axiom.ok_or(GrammarError::Empty)?;
        Ok(Self { axiom, rules })
    }

    pub fn axiom(&self) -> char {
        self.axiom
    }

    /// Rewrite the axiom `iterations` times
    pub fn expand(&self, iterations: u32) -> String {
        let mut current = self.axiom.to_string();
        for _ in 0..iterations {
            let mut next = String::with_capacity(current.len() * 4);
            for c in current.chars() {
                match self.rules.get(&c) {
                    Some(replacement) => next.push_str(replacement),
                    None => next.push(c),
                }
                if next.len() > MAX_EXPANDED_LEN {
                    break;
                }
            }
            current = next;
            if current.len() > MAX_EXPANDED_LEN {
                log::warn!("L-system expansion truncated at {} symbols", MAX_EXPANDED_LEN);
                break;
            }
        }
        current
    }

    /// Expand and tokenize in one step
    pub fn instructions(&self, iterations: u32) -> Vec<Instruction> {
        tokenize(&self.expand(iterations))
    }
}

fn validate_body(body: &str) -> Result<(), GrammarError> {
    let mut depth = 0i32;
    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return Err(GrammarError::Unbalanced(body.to_string()));
                }
            }
            'A' => {
                let (_, consumed) = parse_arc(&chars[i..])
                    .ok_or_else(|| GrammarError::BadArc(body.to_string()))?;
                i += consumed;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return Err(GrammarError::Unbalanced(body.to_string()));
    }
    Ok(())
}

/// Parse `A(n)` at the start of `chars`, returning `(n, chars consumed)`
fn parse_arc(chars: &[char]) -> Option<(u32, usize)> {
    if chars.first() != Some(&'A') || chars.get(1) != Some(&'(') {
        return None;
    }
    let close = chars.iter().position(|&c| c == ')')?;
    let digits: String = chars[2..close].iter().collect();
    let n: u32 = digits.parse().ok()?;
    Some((n.min(MAX_ARC_STEPS), close + 1))
}

/// Turn an expanded string into instructions; unknown symbols are skipped
pub fn tokenize(expanded: &str) -> Vec<Instruction> {
    let chars: Vec<char> = expanded.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            'F' => out.push(Instruction::Forward),
            '[' => out.push(Instruction::Push),
            ']' => out.push(Instruction::Pop),
            'L' => out.push(Instruction::Leaves),
            'A' => {
                if let Some((n, consumed)) = parse_arc(&chars[i..]) {
                    out.push(Instruction::Arc(n));
                    i += consumed;
                    continue;
                }
            }
            _ => {
                if let Some(facing) = Facing::from_symbol(c) {
                    out.push(Instruction::Face(facing));
                }
            }
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_rule() {
        let g = Grammar::parse("F=F[FA(3)L]A(3)").unwrap();
        assert_eq!(g.axiom(), 'F');
        assert_eq!(g.expand(0), "F");
        assert_eq!(g.expand(1), "F[FA(3)L]A(3)");
    }

    #[test]
    fn test_expand_two_iterations() {
        let g = Grammar::parse("F=F[A(2)L]").unwrap();
        // Symbols without a rule (A, L, brackets) pass through
        assert_eq!(g.expand(2), "F[A(2)L][A(2)L]");
    }

    #[test]
    fn test_multiple_rules() {
        let g = Grammar::parse("F=FX; X=[+FL]").unwrap();
        assert_eq!(g.axiom(), 'F');
        assert_eq!(g.expand(1), "FX");
        assert_eq!(g.expand(2), "FX[+FL]");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Grammar::parse(""), Err(GrammarError::Empty));
        assert!(matches!(Grammar::parse("F[F"), Err(GrammarError::MissingEquals(_))));
        assert!(matches!(Grammar::parse("FF=F"), Err(GrammarError::BadSymbol(_))));
        assert!(matches!(Grammar::parse("F=F]["), Err(GrammarError::Unbalanced(_))));
        assert!(matches!(Grammar::parse("F=F[F"), Err(GrammarError::Unbalanced(_))));
        assert!(matches!(Grammar::parse("F=FA(x)"), Err(GrammarError::BadArc(_))));
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("F[+A(3)L]-/\\?");
        assert_eq!(
            tokens,
            vec![
                Instruction::Forward,
                Instruction::Push,
                Instruction::Face(Facing::PosX),
                Instruction::Arc(3),
                Instruction::Leaves,
                Instruction::Pop,
                Instruction::Face(Facing::NegX),
                Instruction::Face(Facing::PosZ),
                Instruction::Face(Facing::NegZ),
            ]
        );
    }

    #[test]
    fn test_arc_steps_capped() {
        assert_eq!(tokenize("A(999)"), vec![Instruction::Arc(MAX_ARC_STEPS)]);
    }

    #[test]
    fn test_expansion_capped() {
        let g = Grammar::parse("F=FFFFFFFFFF").unwrap();
        let expanded = g.expand(10);
        assert!(expanded.len() <= MAX_EXPANDED_LEN + 10);
    }

    #[test]
    fn test_default_pool_parses() {
        for rule in crate::terrain::biome::DEFAULT_TREE_GRAMMARS {
            let g = Grammar::parse(rule).unwrap();
            assert!(!g.instructions(TREE_ITERATIONS).is_empty());
        }
    }
}
