/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Parsing of user-entered numeric lists

/// Parse a list of numbers separated by commas and/or whitespace.
///
/// Surrounding brackets or braces are ignored, so `[0.2, 0.4]`,
/// `{0, 0, -1}` and `0.2 0.4` are all accepted. Returns `None` when any
/// item is not a finite number.
pub fn parse_number_list(text: &str) -> Option<Vec<f64>> {
    let trimmed = text
        .trim()
        .trim_start_matches(['[', '{', '('])
        .trim_end_matches([']', '}', ')']);

    trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_list() {
        assert_eq!(parse_number_list("0.2"), Some(vec![0.2]));
        assert_eq!(parse_number_list("[0.2, 0.4]"), Some(vec![0.2, 0.4]));
        assert_eq!(parse_number_list("{0, 0, -1}"), Some(vec![0.0, 0.0, -1.0]));
        assert_eq!(parse_number_list("0.1 0.3  855"), Some(vec![0.1, 0.3, 855.0]));
        assert_eq!(parse_number_list(""), Some(vec![]));
    }

    #[test]
    fn test_parse_number_list_rejects_garbage() {
        assert_eq!(parse_number_list("0.2, abc"), None);
        assert_eq!(parse_number_list("1, nan"), None);
        assert_eq!(parse_number_list("1,,2"), Some(vec![1.0, 2.0]));
    }
}
