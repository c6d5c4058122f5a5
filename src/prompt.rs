//! Deterministic prompt construction and summary conformance.
//!
//! The language model is only *asked* to follow the selection and format
//! rules below; nothing guarantees it complies. The rules therefore also
//! exist here as plain functions (`first_specific_tag`, `conform_summary`)
//! so the service's behavior stays testable without a model in the loop.

/// Generic botanical category words that never count as a specific plant name.
pub const GENERIC_TAGS: [&str; 6] = ["flower", "shrub", "herb", "plant", "green", "vegetable"];

/// Returned when the image contains nothing plant-like.
pub const NO_PLANT_FALLBACK: &str = "No plant could be detected in the image.";

/// Returned when a plant is present but the tags name no specific species.
pub const UNIDENTIFIED_FALLBACK: &str =
    "A plant was detected in the image, but it could not be identified.";

pub fn is_generic(tag: &str) -> bool {
    GENERIC_TAGS.iter().any(|g| tag.eq_ignore_ascii_case(g))
}

/// The selection rule the prompt requests from the model, enforced locally:
/// the first tag in list order that is not a generic category word wins.
pub fn first_specific_tag(tags: &[String]) -> Option<&str> {
    tags.iter().find(|t| !is_generic(t)).map(String::as_str)
}

/// Embed the full ordered tag list into the fixed identification instruction.
pub fn build_prompt(tags: &[String]) -> String {
    format!(
        "An image was analyzed by a vision service and produced these tags, in order: {tags}. \
         Ignore generic category words such as {generics}. \
         Find the first tag in list order that names a specific common plant, vegetable, \
         fruit or flower, and describe that plant. \
         Begin your answer with \"The <common name> (<latin name>) is a\" and keep the whole \
         answer under 1000 characters. \
         If none of the tags suggests a plant, reply exactly: {no_plant} \
         If a plant is present but you cannot identify it, reply exactly: {unidentified}",
        tags = tags.join(", "),
        generics = GENERIC_TAGS.join(", "),
        no_plant = NO_PLANT_FALLBACK,
        unidentified = UNIDENTIFIED_FALLBACK,
    )
}

/// Check a model reply against the requested `The X (Y) is a …` format and
/// substitute the canonical fallback on mismatch, rather than trusting the
/// prompt alone. The two fixed fallback sentences pass through unchanged.
pub fn conform_summary(raw: &str) -> String {
    let text = raw.trim();

    if text == NO_PLANT_FALLBACK || text == UNIDENTIFIED_FALLBACK {
        return text.to_string();
    }
    if text.len() < 1000 && matches_summary_shape(text) {
        return text.to_string();
    }
    UNIDENTIFIED_FALLBACK.to_string()
}

/// `The <common name> (<latin name>) is a …` with both names non-empty.
fn matches_summary_shape(text: &str) -> bool {
    let Some(rest) = text.strip_prefix("The ") else {
        return false;
    };
    let Some(open) = rest.find('(') else {
        return false;
    };
    let Some(close) = rest[open..].find(')').map(|i| open + i) else {
        return false;
    };
    !rest[..open].trim().is_empty()
        && !rest[open + 1..close].trim().is_empty()
        && rest[close + 1..].trim_start().starts_with("is a")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prompt_embeds_all_tags_in_order() {
        let tags = tags(&["plant", "flower", "dandelion", "yellow"]);
        let prompt = build_prompt(&tags);

        let positions: Vec<usize> = tags
            .iter()
            .map(|t| prompt.find(t.as_str()).expect("tag missing from prompt"))
            .collect();
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "tags must appear in their original order"
        );
    }

    #[test]
    fn first_specific_tag_skips_generic_words() {
        let tags = tags(&["plant", "flower", "dandelion", "yellow"]);
        assert_eq!(first_specific_tag(&tags), Some("dandelion"));
    }

    #[test]
    fn first_specific_tag_is_case_insensitive_on_generics() {
        let tags = tags(&["Plant", "FLOWER", "rose"]);
        assert_eq!(first_specific_tag(&tags), Some("rose"));
    }

    #[test]
    fn all_generic_tags_yield_no_candidate() {
        let tags = tags(&["plant", "green", "herb"]);
        assert_eq!(first_specific_tag(&tags), None);
    }

    #[test]
    fn ties_break_on_lowest_index() {
        let tags = tags(&["shrub", "rose", "tulip"]);
        assert_eq!(first_specific_tag(&tags), Some("rose"));
    }

    #[test]
    fn conforming_summary_passes_unchanged() {
        let reply = "The dandelion (Taraxacum officinale) is a bright yellow wildflower.";
        assert_eq!(conform_summary(reply), reply);
    }

    #[test]
    fn fallback_sentences_pass_unchanged() {
        assert_eq!(conform_summary(NO_PLANT_FALLBACK), NO_PLANT_FALLBACK);
        assert_eq!(conform_summary(UNIDENTIFIED_FALLBACK), UNIDENTIFIED_FALLBACK);
    }

    #[test]
    fn nonconforming_summary_is_replaced() {
        assert_eq!(conform_summary("Sure! Here's what I found:"), UNIDENTIFIED_FALLBACK);
        assert_eq!(conform_summary(""), UNIDENTIFIED_FALLBACK);
        assert_eq!(conform_summary("The () is a mystery."), UNIDENTIFIED_FALLBACK);
    }

    #[test]
    fn overlong_summary_is_replaced() {
        let reply = format!("The oak (Quercus robur) is a {}", "very ".repeat(300));
        assert_eq!(conform_summary(&reply), UNIDENTIFIED_FALLBACK);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let reply = "  The rose (Rosa rubiginosa) is a thorny shrub.\n";
        assert_eq!(conform_summary(reply), reply.trim());
    }
}
