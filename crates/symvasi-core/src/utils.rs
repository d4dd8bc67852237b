//! String transformation utilities for code generation

/// Split an identifier into words.
///
/// Boundaries are separators (`-`, `_`, whitespace, punctuation), lower to
/// upper case transitions, and the end of an acronym (`HTTPResponse` splits
/// into `HTTP` and `Response`).
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = (ch.is_uppercase() && (prev.is_lowercase() || prev.is_numeric()))
                || (ch.is_uppercase() && prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    join_lower(s, "_")
}

/// Convert a string to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    join_lower(s, "-")
}

/// Convert a string to UpperCamelCase (PascalCase)
pub fn to_upper_camel_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| upper_first(&word.to_lowercase()))
        .collect()
}

/// Convert a string to lowerCamelCase
pub fn to_lower_camel_case(s: &str) -> String {
    lower_first(&to_upper_camel_case(s))
}

/// Uppercase the first character, leaving the rest untouched
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lowercase the first character, leaving the rest untouched
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

fn join_lower(s: &str, separator: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("findPetsByStatus"), ["find", "Pets", "By", "Status"]);
        assert_eq!(split_words("HTTPResponse"), ["HTTP", "Response"]);
        assert_eq!(split_words("get HTTP-response_2x"), ["get", "HTTP", "response", "2x"]);
        assert!(split_words("__").is_empty());
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("FindPetsByStatus"), "find_pets_by_status");
        assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
        assert_eq!(to_snake_case("find_pets_by_status"), "find_pets_by_status");
        assert_eq!(to_snake_case("getHTTPResponse"), "get_http_response");
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("OrderLine"), "order-line");
        assert_eq!(to_kebab_case("order_line item"), "order-line-item");
    }

    #[test]
    fn test_to_upper_camel_case() {
        assert_eq!(to_upper_camel_case("find_pets_by_status"), "FindPetsByStatus");
        assert_eq!(to_upper_camel_case("FIND_PETS_BY_STATUS"), "FindPetsByStatus");
        assert_eq!(to_upper_camel_case("http_response"), "HttpResponse");
    }

    #[test]
    fn test_to_lower_camel_case() {
        assert_eq!(to_lower_camel_case("find-pets-by-status"), "findPetsByStatus");
        assert_eq!(to_lower_camel_case("FindPetsByStatus"), "findPetsByStatus");
        assert_eq!(to_lower_camel_case(""), "");
    }

    #[test]
    fn test_first_character_case() {
        assert_eq!(upper_first("order"), "Order");
        assert_eq!(lower_first("OrderLine"), "orderLine");
        assert_eq!(upper_first(""), "");
    }
}
