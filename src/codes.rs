//! Code table derivation: symbol → bit string, read off the tree paths.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::symbol::{check_symbol, Symbol, ALPHABET_SIZE};
use crate::tree::HuffNode;

/// A variable-length code; `false` is a left edge, `true` a right edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Codes for every symbol that has a leaf in the tree.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walk `root` in preorder, appending `0` on each left descent and `1` on
    /// each right descent.
    ///
    /// A lone leaf root is given the one-bit code `0` so no code is ever empty.
    /// A leaf symbol outside the alphabet is a `SymbolOutOfRange` error.
    pub fn from_tree(root: &HuffNode) -> Result<Self> {
        let mut codes = vec![None; ALPHABET_SIZE as usize];
        match root {
            HuffNode::Leaf { symbol, .. } => {
                codes[check_symbol(*symbol)?] = Some(Code(vec![false]));
            }
            HuffNode::Internal { .. } => {
                let mut path = Vec::new();
                assign(root, &mut path, &mut codes)?;
            }
        }
        Ok(Self { codes })
    }

    /// Code for `symbol`, or `None` if the tree has no leaf for it.
    pub fn get(&self, symbol: Symbol) -> Result<Option<&Code>> {
        let idx = check_symbol(symbol)?;
        Ok(self.codes[idx].as_ref())
    }

    /// Assigned codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as Symbol, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for CodeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

fn assign(node: &HuffNode, path: &mut Vec<bool>, codes: &mut [Option<Code>]) -> Result<()> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            codes[check_symbol(*symbol)?] = Some(Code(path.clone()));
        }
        HuffNode::Internal { left, right, .. } => {
            path.push(false);
            assign(left, path, codes)?;
            path.pop();
            path.push(true);
            assign(right, path, codes)?;
            path.pop();
        }
    }
    Ok(())
}
