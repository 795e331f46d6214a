//! Conversion between native values and element properties.
//!
//! Free functions for:
//! - adding typed properties ([`builder`])
//! - reading and removing typed properties ([`extract`])
//! - building search conditions ([`search`])
//! - substituting `{{name}}` placeholders ([`placeholder`])

pub mod builder;
pub mod extract;
pub mod placeholder;
pub mod search;

pub use builder::{
    add_boolean_map_property, add_boolean_property, add_date_map_property, add_date_property,
    add_double_map_property, add_double_property, add_enum_property, add_float_property,
    add_int_map_property, add_int_property, add_long_map_property, add_long_property,
    add_map_property, add_property_map, add_string_array_property, add_string_map_property,
    add_string_property, native_to_property_value, PropertiesBuilder,
};
pub use extract::{
    get_boolean_map_property, get_boolean_property, get_date_property, get_double_property,
    get_enum_symbolic_name, get_float_property, get_int_map_property, get_int_property,
    get_long_map_property, get_long_property, get_map_property, get_string_array_property,
    get_string_map_property, get_string_property, get_struct_attributes,
    remove_boolean_map_property, remove_boolean_property, remove_date_property,
    remove_double_property, remove_enum_property, remove_float_property,
    remove_int_map_property, remove_int_property, remove_long_map_property,
    remove_long_property, remove_map_property, remove_string_array_property,
    remove_string_map_property, remove_string_property, remove_struct_attributes,
};
pub use placeholder::{replace_placeholders_in_properties, replace_primitive_string_with_placeholders};
pub use search::{
    contains_regex, get_search_classifications, get_search_properties,
    get_search_properties_by_name, get_search_properties_for_metadata_collection_name,
};
