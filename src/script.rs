//! Best-effort extraction of structured scene data from free-form
//! natural-language video scripts.
//!
//! Scripts mark scenes as `Name (N seconds):` followed by sentences like
//! `Text: '...'`, `Animation: ...`, `Duration: ...`, `Transition: ...`.
//! This is pattern matching, not a grammar: anything the patterns do not
//! recognize is kept in an explicit unparsed remainder instead of being
//! silently dropped.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SCENE_MARKER: Regex = Regex::new(r"\((\d+)\s*seconds\)\s*:").unwrap();
    static ref TEXT_FIELD: Regex = Regex::new(r#"Text:\s*['"]([^'"]+)['"]"#).unwrap();
    static ref ANIMATION_FIELD: Regex = Regex::new(r"Animation:\s*([^.]+)").unwrap();
    static ref DURATION_FIELD: Regex = Regex::new(r"Duration:\s*([^.]+)").unwrap();
    static ref TRANSITION_FIELD: Regex = Regex::new(r"Transition:\s*([^.]+)").unwrap();
}

/// One scene extracted from a script.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Scene name, the sentence fragment preceding the duration marker
    pub name: String,

    /// Declared duration in seconds
    pub duration_secs: u32,

    /// Structured fields recognized inside the scene
    pub content: SceneContent,

    /// The scene's full text, kept for prompt construction
    pub raw_text: String,
}

/// Recognized fields of a scene, plus whatever did not match.
#[derive(Debug, Clone, Default)]
pub struct SceneContent {
    pub texts: Vec<String>,
    pub animations: Vec<String>,
    pub transitions: Vec<String>,
    pub timings: Vec<String>,

    /// Sentence fragments matching none of the field patterns
    pub unparsed: Vec<String>,
}

/// Result of parsing a whole script.
#[derive(Debug, Clone, Default)]
pub struct ParsedScript {
    pub scenes: Vec<Scene>,

    /// Script text appearing before the first scene marker
    pub unparsed: Vec<String>,
}

/// Extracts scenes from natural-language scripts.
#[derive(Debug, Default)]
pub struct SceneExtractor;

impl SceneExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse a script into scenes.
    ///
    /// A scene's name is the text between the previous sentence boundary
    /// and its `(N seconds):` marker; its body runs to the start of the
    /// next scene's name. Text before the first scene goes into the
    /// script-level unparsed remainder.
    pub fn parse_script(&self, script: &str) -> ParsedScript {
        // (name_start, body_start, duration) per marker.
        let mut markers: Vec<(usize, usize, u32)> = Vec::new();
        for captures in SCENE_MARKER.captures_iter(script) {
            let whole = captures.get(0).unwrap();
            let duration: u32 = match captures[1].parse() {
                Ok(d) => d,
                Err(_) => continue,
            };
            let name_start = script[..whole.start()]
                .rfind(['.', '!', '?'])
                .map(|p| p + 1)
                .unwrap_or(0);
            markers.push((name_start, whole.end(), duration));
        }

        let mut parsed = ParsedScript::default();
        if markers.is_empty() {
            let remainder = script.trim();
            if !remainder.is_empty() {
                parsed.unparsed.push(remainder.to_string());
            }
            return parsed;
        }

        let preamble = script[..markers[0].0].trim();
        if !preamble.is_empty() {
            parsed.unparsed.push(preamble.to_string());
        }

        for (i, &(name_start, body_start, duration_secs)) in markers.iter().enumerate() {
            let body_end = markers
                .get(i + 1)
                .map(|&(next_name_start, _, _)| next_name_start)
                .unwrap_or(script.len());

            let marker_start = SCENE_MARKER
                .find_at(script, name_start)
                .map(|m| m.start())
                .unwrap_or(body_start);
            let name = script[name_start..marker_start].trim().to_string();
            let raw_text = script[body_start..body_end].trim().to_string();

            parsed.scenes.push(Scene {
                name,
                duration_secs,
                content: parse_content(&raw_text),
                raw_text,
            });
        }

        parsed
    }
}

/// Match each sentence fragment against the field patterns; fragments
/// matching nothing are kept verbatim.
fn parse_content(body: &str) -> SceneContent {
    let mut content = SceneContent::default();

    for part in body.split('.').map(str::trim).filter(|p| !p.is_empty()) {
        let mut matched = false;

        if let Some(captures) = TEXT_FIELD.captures(part) {
            content.texts.push(captures[1].trim().to_string());
            matched = true;
        }
        if let Some(captures) = ANIMATION_FIELD.captures(part) {
            content.animations.push(captures[1].trim().to_string());
            matched = true;
        }
        if let Some(captures) = DURATION_FIELD.captures(part) {
            content.timings.push(captures[1].trim().to_string());
            matched = true;
        }
        if let Some(captures) = TRANSITION_FIELD.captures(part) {
            content.transitions.push(captures[1].trim().to_string());
            matched = true;
        }

        if !matched {
            content.unparsed.push(part.to_string());
        }
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "Introduction Scene (5 seconds): Text: 'Welcome to Binary Search' \
        (large font, center screen). Animation: Text appears with a Write effect. Duration: 2 \
        seconds for the animations. Transition: Both texts fade out simultaneously. Recap Scene \
        (10 seconds): Text: 'Summary time'. The array shrinks by half each pass. Animation: \
        FadeIn effect.";

    #[test]
    fn test_scene_markers_split_scenes() {
        let parsed = SceneExtractor::new().parse_script(SCRIPT);
        assert_eq!(parsed.scenes.len(), 2);
        assert_eq!(parsed.scenes[0].name, "Introduction Scene");
        assert_eq!(parsed.scenes[0].duration_secs, 5);
        assert_eq!(parsed.scenes[1].name, "Recap Scene");
        assert_eq!(parsed.scenes[1].duration_secs, 10);
        assert!(parsed.unparsed.is_empty());
    }

    #[test]
    fn test_field_extraction() {
        let parsed = SceneExtractor::new().parse_script(SCRIPT);
        let intro = &parsed.scenes[0].content;
        assert_eq!(intro.texts, vec!["Welcome to Binary Search"]);
        assert_eq!(intro.animations, vec!["Text appears with a Write effect"]);
        assert_eq!(intro.timings, vec!["2 seconds for the animations"]);
        assert_eq!(
            intro.transitions,
            vec!["Both texts fade out simultaneously"]
        );
    }

    #[test]
    fn test_unmatched_fragments_are_kept() {
        let parsed = SceneExtractor::new().parse_script(SCRIPT);
        let recap = &parsed.scenes[1].content;
        assert!(recap
            .unparsed
            .iter()
            .any(|p| p.contains("array shrinks by half")));
    }

    #[test]
    fn test_preamble_goes_to_script_remainder() {
        let script = "Some intro chatter. Opening (3 seconds): Text: 'Hi'.";
        let parsed = SceneExtractor::new().parse_script(script);
        assert_eq!(parsed.scenes.len(), 1);
        assert_eq!(parsed.scenes[0].name, "Opening");
        assert_eq!(parsed.unparsed, vec!["Some intro chatter."]);
    }

    #[test]
    fn test_script_without_markers_is_all_remainder() {
        let parsed = SceneExtractor::new().parse_script("just prose, no scenes here");
        assert!(parsed.scenes.is_empty());
        assert_eq!(parsed.unparsed.len(), 1);
    }

    #[test]
    fn test_empty_script() {
        let parsed = SceneExtractor::new().parse_script("");
        assert!(parsed.scenes.is_empty());
        assert!(parsed.unparsed.is_empty());
    }
}
