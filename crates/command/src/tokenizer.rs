/// Splits the body of a command line into tokens. Double-quoted spans
/// become single tokens with the quotes stripped; everything else splits on
/// whitespace. The prefix must already have been checked by the caller.
pub fn tokenize(message: &str, prefix: &str) -> Vec<String> {
    let mut rest = message.strip_prefix(prefix).unwrap_or(message).trim();
    let mut tokens = Vec::new();

    while !rest.is_empty() {
        if let Some(after_quote) = rest.strip_prefix('"') {
            // A quoted span needs at least one character and a closing
            // quote; otherwise the quote is just part of a bare token.
            if let Some(end) = after_quote.find('"') {
                if end > 0 {
                    tokens.push(after_quote[..end].to_string());
                    rest = after_quote[end + 1..].trim_start();
                    continue;
                }
            }
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        tokens.push(rest[..end].to_string());
        rest = rest[end..].trim_start();
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(
            tokenize("-chatRank add  Steve", "-"),
            vec!["chatRank", "add", "Steve"]
        );
    }

    #[test]
    fn quoted_span_is_one_token() {
        assert_eq!(
            tokenize("-say \"a b c\" after", "-"),
            vec!["say", "a b c", "after"]
        );
    }

    #[test]
    fn unterminated_quote_stays_bare() {
        assert_eq!(tokenize("-say \"a b", "-"), vec!["say", "\"a", "b"]);
    }

    #[test]
    fn empty_quotes_stay_bare() {
        assert_eq!(tokenize("-say \"\" x", "-"), vec!["say", "\"\"", "x"]);
    }

    #[test]
    fn bare_prefix_yields_no_tokens() {
        assert_eq!(tokenize("-", "-"), Vec::<String>::new());
        assert_eq!(tokenize("-   ", "-"), Vec::<String>::new());
    }
}
