use std::fmt;

use serde::{de, Deserializer};

/// Accepts either a sequence of strings or one comma-separated string, which is how list
/// values arrive from env vars.
pub fn deserialize_vec_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> de::Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a comma-separated string or a sequence of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Vec<String>, E>
        where
            E: de::Error,
        {
            Ok(value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Vec<String>, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(elem) = seq.next_element()? {
                vec.push(elem);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Levels {
        #[serde(deserialize_with = "deserialize_vec_string")]
        levels: Vec<String>,
    }

    #[test]
    fn comma_separated_or_list() {
        let levels: Levels = serde_json::from_str(r#"{"levels": "info, taiko=debug,"}"#).unwrap();
        assert_eq!(levels.levels, ["info", "taiko=debug"]);

        let levels: Levels = serde_json::from_str(r#"{"levels": ["warn", "alloy=info"]}"#).unwrap();
        assert_eq!(levels.levels, ["warn", "alloy=info"]);
    }
}
