//! Hand-written scanner for `<image>#` values (the `background-image` grammar subset we need).

use super::ImageLayer;

/// Splits `input` at top-level occurrences of `sep`, ignoring separators nested
/// in parentheses or quoted strings.
pub(crate) fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0usize;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' | '\'' => match quote {
                Some(q) if q == c => quote = None,
                None => quote = Some(c),
                _ => {}
            },
            '(' if quote.is_none() => depth += 1,
            ')' if quote.is_none() => depth = depth.saturating_sub(1),
            _ if c == sep && quote.is_none() && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// If `input` starts with `name(`, returns the function name (lowercased) and its
/// argument text up to the matching `)`. Unterminated functions take the rest of the input.
pub(crate) fn function_call(input: &str) -> Option<(String, &str)> {
    let open = input.find('(')?;
    let name = input[..open].trim();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    let body = &input[open + 1..];
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' | '\'' => match quote {
                Some(q) if q == c => quote = None,
                None => quote = Some(c),
                _ => {}
            },
            '(' if quote.is_none() => depth += 1,
            ')' if quote.is_none() => {
                depth -= 1;
                if depth == 0 {
                    return Some((name.to_ascii_lowercase(), &body[..i]));
                }
            }
            _ => {}
        }
    }
    Some((name.to_ascii_lowercase(), body))
}

/// Argument of `url(...)`: whitespace trimmed, matching quotes removed, escapes undone.
pub(crate) fn url_argument(arg: &str) -> Option<String> {
    let arg = arg.trim();
    let unquoted = match arg.chars().next() {
        Some(q @ ('"' | '\'')) if arg.len() >= 2 && arg.ends_with(q) => &arg[1..arg.len() - 1],
        Some('"' | '\'') => &arg[1..],
        _ => arg,
    };
    let value = unescape(unquoted.trim());
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parses one comma-separated layer.
pub(crate) fn parse_layer(layer: &str) -> ImageLayer {
    let layer = layer.trim();
    if layer.is_empty() || layer.eq_ignore_ascii_case("none") {
        return ImageLayer::None;
    }
    let Some((name, args)) = function_call(layer) else {
        return ImageLayer::Other(layer.to_string());
    };
    if name == "url" {
        return match url_argument(args) {
            Some(u) => ImageLayer::Url(u),
            None => ImageLayer::Other(layer.to_string()),
        };
    }
    if name.ends_with("gradient") {
        return ImageLayer::Gradient(name);
    }
    ImageLayer::Function {
        urls: nested_urls(args),
        name,
    }
}

/// Collects every `url(...)` found inside a function argument list, in order.
fn nested_urls(args: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for part in split_top_level(args, ',') {
        for token in split_top_level(part.trim(), ' ') {
            let token = token.trim();
            if let Some((name, inner)) = function_call(token) {
                if name == "url" {
                    urls.extend(url_argument(inner));
                } else {
                    urls.extend(nested_urls(inner));
                }
            } else if let Some(q) = token.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
                // image-set() accepts bare strings as URLs.
                if !q.is_empty() {
                    urls.push(unescape(q));
                }
            }
        }
    }
    urls
}
