use serde::Deserializer;
use serde_aux::field_attributes::deserialize_option_number_from_string;

// the quiz page sends the category id either as a number or as a string, and uses 0 for "all"
pub fn deserialize_category_filter<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id: Option<i64> = deserialize_option_number_from_string(deserializer)?;
    Ok(id.filter(|id| *id != 0))
}
