use std::collections::HashMap;
use std::hash::Hash;

use super::SymbolFrequency;
use crate::error::Error;

/// Counts every distinct symbol and sorts the counts in descending order.
///
/// Symbols with equal counts keep the order in which they were first
/// encountered in the input.
pub fn sorted_frequencies<T>(symbols: &[T]) -> crate::Result<Vec<SymbolFrequency<T>>>
where
    T: Eq + Hash + Clone,
{
    if symbols.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut frequencies = count_in_encounter_order(symbols);
    sort_by_descending_frequency(&mut frequencies);
    Ok(frequencies)
}

fn count_in_encounter_order<T>(symbols: &[T]) -> Vec<SymbolFrequency<T>>
where
    T: Eq + Hash + Clone,
{
    let mut positions: HashMap<&T, usize> = HashMap::new();
    let mut frequencies: Vec<SymbolFrequency<T>> = Vec::new();
    for symbol in symbols {
        let position = *positions.entry(symbol).or_insert_with(|| {
            frequencies.push(SymbolFrequency::new(symbol.clone(), 0));
            frequencies.len() - 1
        });
        frequencies[position].frequency += 1;
    }
    frequencies
}

fn sort_by_descending_frequency<T>(frequencies: &mut [SymbolFrequency<T>]) {
    // stable, equal counts stay in encounter order
    frequencies.sort_by(|a, b| b.frequency.cmp(&a.frequency));
}
