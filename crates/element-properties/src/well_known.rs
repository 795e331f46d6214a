//! Property names with a fixed meaning across metadata types.

/// Unique name of an element.
pub const QUALIFIED_NAME: &str = "qualifiedName";

/// Name shown to people.
pub const DISPLAY_NAME: &str = "displayName";

pub const NAME: &str = "name";

pub const DESCRIPTION: &str = "description";

/// Name of the metadata collection that owns an element.
pub const METADATA_COLLECTION_NAME: &str = "metadataCollectionName";

/// Property names searched by default when looking elements up by name.
pub const NAME_PROPERTIES: [&str; 3] = [QUALIFIED_NAME, DISPLAY_NAME, NAME];
