use std::collections::HashMap;

use super::{COMMA, PERIOD};

/// Parse a CMU pronouncing dictionary into word -> stress patterns.
///
/// Each pattern keeps only the stress digits of the phones, with secondary
/// stress (`2`) folded into primary (`1`). Alternate pronunciations
/// (`WORD(1)`) are merged under the base word; duplicate patterns are dropped.
/// Comment lines start with `;;;`.
pub fn parse_cmudict(contents: &str) -> HashMap<String, Vec<String>> {
    let mut meters: HashMap<String, Vec<String>> = HashMap::new();

    for line in contents.lines() {
        if line.contains(";;;") {
            continue;
        }
        let mut fields = line.split_whitespace();
        let Some(head) = fields.next() else {
            continue;
        };

        let word = strip_variant(&head.to_lowercase());
        let pattern: String = fields
            .flat_map(str::chars)
            .filter_map(|ch| match ch {
                '0' => Some('0'),
                '1' | '2' => Some('1'),
                _ => None,
            })
            .collect();

        let patterns = meters.entry(word).or_default();
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }

    meters.insert(COMMA.to_string(), vec![String::new()]);
    meters.insert(PERIOD.to_string(), vec![String::new()]);
    meters
}

fn strip_variant(word: &str) -> String {
    if word.ends_with(')')
        && let Some(open) = word.rfind('(')
    {
        return word[..open].to_string();
    }
    word.to_string()
}
