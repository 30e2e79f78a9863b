use std::fmt::{self, Debug};
use std::hash::Hash;

use super::CodeTable;
use crate::error::{Error, MalformedStream};

const ROOT_INDEX: usize = 0;

#[derive(Debug, Clone)]
enum TrieNode<T> {
    Inner { children: [Option<usize>; 2] },
    Leaf { symbol: T },
}

/// Binary trie resolving code words back to symbols.
///
/// Nodes live in an arena and reference their children by index, the
/// root being the first node. Only leaves carry a symbol.
#[derive(Debug, Clone)]
pub struct DecodeTrie<T> {
    nodes: Vec<TrieNode<T>>,
}

impl<T> DecodeTrie<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// Compiles a code table, one root-to-leaf path per code word.
    ///
    /// Fails if one code word is a prefix of another or two symbols share
    /// a code word.
    pub fn build(code_table: &CodeTable<T>) -> crate::Result<Self> {
        let mut trie = DecodeTrie {
            nodes: vec![TrieNode::Inner {
                children: [None, None],
            }],
        };
        for (symbol, code_word) in code_table.iter() {
            let mut current = ROOT_INDEX;
            for bit in code_word.bits() {
                current = trie
                    .child_or_insert(current, bit)
                    .ok_or_else(|| Self::ambiguous(symbol))?;
            }
            trie.place_leaf(current, symbol)?;
        }
        Ok(trie)
    }

    fn ambiguous(symbol: &T) -> Error {
        Error::AmbiguousCodeTable {
            symbol: format!("{:?}", symbol),
        }
    }

    /// returns None when the path runs through a leaf
    fn child_or_insert(&mut self, index: usize, bit: bool) -> Option<usize> {
        let new_index = self.nodes.len();
        let TrieNode::Inner { children } = &mut self.nodes[index] else {
            return None;
        };
        let child = *children[bit as usize].get_or_insert(new_index);
        if child == new_index {
            self.nodes.push(TrieNode::Inner {
                children: [None, None],
            });
        }
        Some(child)
    }

    fn place_leaf(&mut self, index: usize, symbol: &T) -> crate::Result<()> {
        let childless = matches!(
            self.nodes[index],
            TrieNode::Inner {
                children: [None, None]
            }
        );
        if !childless {
            return Err(Self::ambiguous(symbol));
        }
        self.nodes[index] = TrieNode::Leaf {
            symbol: symbol.clone(),
        };
        Ok(())
    }
}

impl<T> DecodeTrie<T> {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walks the trie bit by bit, emitting a symbol at every leaf.
    pub fn decode<I>(&self, bits: I) -> Result<Vec<T>, MalformedStream>
    where
        I: IntoIterator<Item = bool>,
        T: Clone,
    {
        let mut decoded = Vec::new();
        let mut current = ROOT_INDEX;
        let mut bit_length = 0;
        for (bit_index, bit) in bits.into_iter().enumerate() {
            bit_length = bit_index + 1;
            current = self
                .child(current, bit)
                .ok_or(MalformedStream::MissingTransition { bit_index })?;
            if let TrieNode::Leaf { symbol } = &self.nodes[current] {
                decoded.push(symbol.clone());
                current = ROOT_INDEX;
            }
        }
        if current != ROOT_INDEX {
            return Err(MalformedStream::TruncatedCodeWord { bit_length });
        }
        Ok(decoded)
    }

    /// The symbol of a trie consisting of a single leaf.
    pub fn root_symbol(&self) -> Option<&T> {
        match &self.nodes[ROOT_INDEX] {
            TrieNode::Leaf { symbol } => Some(symbol),
            TrieNode::Inner { .. } => None,
        }
    }

    fn child(&self, index: usize, bit: bool) -> Option<usize> {
        match &self.nodes[index] {
            TrieNode::Inner { children } => children[bit as usize],
            TrieNode::Leaf { .. } => None,
        }
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: usize,
        depth: usize,
        path: &mut String,
    ) -> fmt::Result
    where
        T: Debug,
    {
        let last_bit = path.chars().last().unwrap_or('.');
        write!(f, "{} {}", INDENT.repeat(depth), last_bit)?;
        match &self.nodes[index] {
            TrieNode::Leaf { symbol } => writeln!(f, " => ({}, {:?})", path, symbol),
            TrieNode::Inner { children } => {
                writeln!(f)?;
                for (bit, child) in ['0', '1'].into_iter().zip(children) {
                    if let Some(child) = child {
                        path.push(bit);
                        self.write_node(f, *child, depth + 1, path)?;
                        path.pop();
                    }
                }
                Ok(())
            }
        }
    }
}

const INDENT: &str = "----";

impl<T: Debug> fmt::Display for DecodeTrie<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let TrieNode::Leaf { symbol } = &self.nodes[ROOT_INDEX] {
            return writeln!(f, ". => (, {:?})", symbol);
        }
        writeln!(f, ".")?;
        let mut path = String::new();
        if let TrieNode::Inner { children } = &self.nodes[ROOT_INDEX] {
            for (bit, child) in ['0', '1'].into_iter().zip(children) {
                if let Some(child) = child {
                    path.push(bit);
                    self.write_node(f, *child, 1, &mut path)?;
                    path.pop();
                }
            }
        }
        Ok(())
    }
}
