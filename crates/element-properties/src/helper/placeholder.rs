//! `{{name}}` placeholder substitution in string properties.

use std::collections::BTreeMap;

use crate::limits::{MAX_PLACEHOLDER_TOKENS, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};
use crate::model::{ElementProperties, PropertyValue};

fn marker(name: &str) -> String {
    format!("{}{}{}", PLACEHOLDER_OPEN, name, PLACEHOLDER_CLOSE)
}

/// Substitutes `{{name}}` tokens in `template` with values from
/// `placeholders`.
///
/// A template that is exactly one token is replaced by that token's value.
/// Otherwise every occurrence of each known token is replaced in place.
/// Templates without `{{` are returned unchanged without consulting the map,
/// and unknown tokens are left as they are. At most
/// [`MAX_PLACEHOLDER_TOKENS`] tokens are substituted.
pub fn replace_primitive_string_with_placeholders(
    template: Option<&str>,
    placeholders: Option<&BTreeMap<String, String>>,
) -> Option<String> {
    let template = template?;
    if !template.contains(PLACEHOLDER_OPEN) {
        return Some(template.to_string());
    }
    let Some(placeholders) = placeholders.filter(|p| !p.is_empty()) else {
        return Some(template.to_string());
    };

    let mut result = template.to_string();
    let mut remaining = MAX_PLACEHOLDER_TOKENS;
    for (name, value) in placeholders {
        let token = marker(name);
        if result == token {
            return Some(value.clone());
        }
        let occurrences = result.matches(token.as_str()).count();
        if occurrences == 0 {
            continue;
        }
        if occurrences > remaining {
            tracing::warn!(
                placeholder = name.as_str(),
                limit = MAX_PLACEHOLDER_TOKENS,
                "placeholder token limit reached"
            );
        }
        let replaced = occurrences.min(remaining);
        result = result.replacen(token.as_str(), value, replaced);
        remaining -= replaced;
        if remaining == 0 {
            break;
        }
    }
    Some(result)
}

/// Returns a deep copy of `properties` with placeholders substituted in
/// every string primitive, including those inside nested containers.
pub fn replace_placeholders_in_properties(
    properties: Option<&ElementProperties>,
    placeholders: Option<&BTreeMap<String, String>>,
) -> Option<ElementProperties> {
    let mut copy = properties?.deep_copy();
    if let Some(placeholders) = placeholders.filter(|p| !p.is_empty()) {
        substitute_in(&mut copy, placeholders);
    }
    Some(copy)
}

fn substitute_in(properties: &mut ElementProperties, placeholders: &BTreeMap<String, String>) {
    for value in properties.values_mut() {
        substitute_value(value, placeholders);
    }
}

fn substitute_value(value: &mut PropertyValue, placeholders: &BTreeMap<String, String>) {
    if let PropertyValue::Primitive(primitive) = value {
        primitive.map_string_value(|s| {
            replace_primitive_string_with_placeholders(Some(s), Some(placeholders))
                .unwrap_or_else(|| s.to_string())
        });
        return;
    }
    if let Some(nested) = value.nested() {
        substitute_in(&mut nested.borrow_mut(), placeholders);
    }
}
