/// Lowercase `text` and replace every run of characters outside `[a-z0-9]`
/// with a single hyphen
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_gap = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12 hour", "12-hour")]
    #[case("Hourly", "hourly")]
    #[case("maximum", "maximum")]
    #[case("wind  speed / gust", "wind-speed-gust")]
    #[case(" apparent ", "-apparent-")]
    #[case("Grüße", "gr-e")]
    #[case("", "")]
    fn test_slugify(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }
}
