//! Case-insensitive deserialization for `{"type": ..., "value": ...}` enums.
//!
//! Configuration files written by hand tend to mix `"Plain"`, `"plain"` and
//! `"PLAIN"`; the generated impl accepts all of them.

/// Implements `Deserialize` for an enum serialized as
/// `#[serde(tag = "type", content = "value")]` whose variants each wrap a
/// value convertible from `String`. The `type` tag is matched
/// case-insensitively against the given lowercase names.
#[macro_export]
macro_rules! impl_case_insensitive_enum {
	($enum_name:ident, { $($variant_str:expr => $variant:ident),* $(,)? }) => {
		impl<'de> ::serde::Deserialize<'de> for $enum_name {
			fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
			where
				D: ::serde::Deserializer<'de>,
			{
				use ::serde::de::{self, MapAccess, Visitor};
				use std::fmt;

				struct EnumVisitor;

				impl<'de> Visitor<'de> for EnumVisitor {
					type Value = $enum_name;

					fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
						formatter.write_str(concat!("a map with `type` and `value` for ", stringify!($enum_name)))
					}

					fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
					where
						M: MapAccess<'de>,
					{
						let mut type_: Option<String> = None;
						let mut value: Option<::serde_json::Value> = None;

						while let Some(key) = map.next_key::<String>()? {
							match key.as_str() {
								"type" => type_ = Some(map.next_value()?),
								"value" => value = Some(map.next_value()?),
								_ => {
									let _: ::serde_json::Value = map.next_value()?;
								}
							}
						}

						let type_ = type_.ok_or_else(|| de::Error::missing_field("type"))?;
						let value = value.ok_or_else(|| de::Error::missing_field("value"))?;

						match type_.to_lowercase().as_str() {
							$(
								$variant_str => {
									let content = ::serde_json::from_value::<String>(value)
										.map_err(|e| de::Error::custom(format!(
											concat!("invalid ", $variant_str, " value: {}"), e
										)))?;
									Ok($enum_name::$variant(content.into()))
								},
							)*
							_ => Err(de::Error::unknown_variant(
								&type_,
								&[$($variant_str),*],
							)),
						}
					}
				}

				deserializer.deserialize_map(EnumVisitor)
			}
		}
	};
}
