//! JSON wire encoding/decoding for element properties and search conditions.
//!
//! Property values travel as objects tagged with a `class` discriminator;
//! containers travel as objects keyed by property name.

pub mod json;

pub use json::{
    decode_properties, decode_properties_with_options, decode_property_value,
    decode_property_value_with_options, decode_search_properties,
    decode_search_properties_with_options, encode_properties, encode_properties_with_options,
    encode_property_value, encode_property_value_with_options, encode_search_properties,
    encode_search_properties_with_options, DecodeOptions, EncodeOptions,
};
