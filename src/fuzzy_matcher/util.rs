use crate::fuzzy_matcher::IndexType;

/// Lower-cases a single character, keeping the first char of multi-char mappings.
#[inline]
pub(crate) fn fold_case(ch: char) -> char {
    if ch.is_ascii() {
        ch.to_ascii_lowercase()
    } else {
        ch.to_lowercase().next().unwrap_or(ch)
    }
}

/// Case-insensitive subsequence check.
///
/// Returns the greedy (leftmost) positions of `pattern` inside `choice`, or
/// `None` if `pattern` is not a subsequence.
pub(crate) fn cheap_matches(choice: &[char], pattern: &[char]) -> Option<Vec<IndexType>> {
    let mut positions = Vec::with_capacity(pattern.len());
    let mut choice_iter = choice.iter().enumerate();
    for &p in pattern {
        let (idx, _) = choice_iter.by_ref().find(|&(_, &c)| fold_case(c) == fold_case(p))?;
        positions.push(idx);
    }
    Some(positions)
}

#[cfg(test)]
pub(crate) fn wrap_matches(line: &str, indices: &[IndexType]) -> String {
    let mut ret = String::new();
    let mut peekable = indices.iter().peekable();
    for (idx, ch) in line.chars().enumerate() {
        let next_id = **peekable.peek().unwrap_or(&&(line.len() as IndexType));
        if next_id == idx {
            ret.push('[');
            ret.push(ch);
            ret.push(']');
            peekable.next();
        } else {
            ret.push(ch);
        }
    }
    ret
}

#[cfg(test)]
pub(crate) fn assert_order(matcher: &dyn crate::fuzzy_matcher::FuzzyMatcher, pattern: &str, choices: &[&'static str]) {
    let result = filter_and_sort(matcher, pattern, choices);
    if result != choices {
        // debug print
        println!("pattern: {pattern}");
        for &choice in choices.iter() {
            if let Some((score, indices)) = matcher.fuzzy_indices(choice, pattern) {
                println!("{}: {:?}", score, wrap_matches(choice, &indices));
            } else {
                println!("NO MATCH for {choice}");
            }
        }
    }
    assert_eq!(result, choices);
}

#[cfg(test)]
fn filter_and_sort(
    matcher: &dyn crate::fuzzy_matcher::FuzzyMatcher,
    pattern: &str,
    lines: &[&'static str],
) -> Vec<&'static str> {
    let mut lines_with_score: Vec<(i64, &'static str)> = lines
        .iter()
        .filter_map(|&s| matcher.fuzzy_match(s, pattern).map(|score| (score, s)))
        .collect();
    lines_with_score.sort_by_key(|(score, _)| -score);
    lines_with_score.into_iter().map(|(_, string)| string).collect()
}
