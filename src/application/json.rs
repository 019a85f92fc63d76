//! JSON reading for arbitrarily deep forests
//!
//! Each tree level is two levels of JSON nesting (node object, children
//! array), so serde_json's default limit of 128 stops at about 63 levels.
//! The recursion limit is lifted and the stack grows on demand instead.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application::error_ext::JsonResultExt;
use crate::application::ApplicationResult;

/// Deserialize `text` without a nesting limit; `what` names the document in errors.
pub fn from_str<T: DeserializeOwned>(text: &str, what: &str) -> ApplicationResult<T> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de)).with_json_context(what)?;
    de.end().with_json_context(what)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Forest;

    fn nested_forest_json(depth: usize) -> String {
        let mut json = String::from(r#"{"label":"leaf"}"#);
        for level in (0..depth - 1).rev() {
            json = format!(r#"{{"label":"n{level}","children":[{json}]}}"#);
        }
        format!("[{json}]")
    }

    #[test]
    fn given_forest_beyond_default_nesting_limit_when_reading_then_parsed() {
        let json = nested_forest_json(200);
        assert!(serde_json::from_str::<Forest>(&json).is_err());

        let forest: Forest = from_str(&json, "forest").unwrap();

        assert_eq!(forest.depth(), 200);
    }

    #[test]
    fn given_trailing_garbage_when_reading_then_rejected() {
        let err = from_str::<Forest>(r#"[{"label":"a"}] x"#, "forest").unwrap_err();

        assert_eq!(err.to_string(), "JSON error in forest");
    }
}
