use serde::{Serialize, Serializer, ser::SerializeMap};

/// Serializes `None` as `{}` so failure reports keep an object-shaped section.
pub fn empty_map_when_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
