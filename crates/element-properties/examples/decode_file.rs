//! Simple decoder to inspect element property files.

use std::fs;

use element_properties::{decode_properties, ElementProperties, PropertyValue};

fn format_value(v: &PropertyValue) -> String {
    let rendered = v.value_as_string();
    let preview: String = rendered.chars().take(80).collect();
    let preview = if rendered.chars().count() > 80 {
        format!("{}...", preview)
    } else {
        preview
    };
    match v.type_name() {
        Some(type_name) => format!("{} ({})", preview, type_name),
        None => preview,
    }
}

fn print_properties(properties: &ElementProperties, indent: usize) {
    for (name, value) in properties.sorted_iter() {
        println!("{:indent$}{} = {}", "", name, format_value(value), indent = indent);
        let nested = match value {
            PropertyValue::Array(v) => v.array_values(),
            PropertyValue::Map(v) => v.map_values(),
            PropertyValue::Struct(v) => v.attributes(),
            _ => None,
        };
        if let Some(nested) = nested {
            print_properties(&nested.borrow(), indent + 2);
        }
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "properties.json".to_string());

    println!("Reading: {}", path);

    let data = fs::read_to_string(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let properties = decode_properties(&data).expect("Failed to decode");

    println!("\n=== Properties ({}) ===", properties.property_count());
    print_properties(&properties, 0);
}
