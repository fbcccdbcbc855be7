//! Scene-by-scene animation code synthesis.
//!
//! Each extracted scene becomes one chat-completion prompt; the returned
//! code is cleaned of markdown fences, its scene class renamed to a
//! unique `Scene<i>`, and all scenes are assembled into a single runnable
//! module.

use std::sync::Arc;

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::output::ChatModel;
use crate::retry::RetryPolicy;
use crate::script::{Scene, SceneExtractor};

const SCENE_SYSTEM_PROMPT: &str = "You are a Manim expert. Generate a complete, runnable Scene \
class for the specified educational animation. Focus on proper positioning and timing. Output \
only the code, no explanations.";

lazy_static! {
    static ref OPENING_FENCE: Regex = Regex::new(r"^```[a-zA-Z]*\s*").unwrap();
    static ref CLOSING_FENCE: Regex = Regex::new(r"\s*```$").unwrap();
    static ref SCENE_CLASS: Regex = Regex::new(r"class\s+Scene\s*\(Scene\)").unwrap();
}

/// Generates a runnable animation module from a natural-language script.
pub struct CodeGenerator {
    chat: Arc<dyn ChatModel>,
    retry: RetryPolicy,
    extractor: SceneExtractor,
}

impl CodeGenerator {
    pub fn new(chat: Arc<dyn ChatModel>, retry: RetryPolicy) -> Self {
        Self {
            chat,
            retry,
            extractor: SceneExtractor::new(),
        }
    }

    /// Parse the script and synthesize one scene class per scene.
    pub async fn generate(&self, script: &str) -> Result<String> {
        let parsed = self.extractor.parse_script(script);
        info!(
            scenes = parsed.scenes.len(),
            unparsed = parsed.unparsed.len(),
            "Parsed script"
        );

        let mut scene_classes = Vec::with_capacity(parsed.scenes.len());
        for (i, scene) in parsed.scenes.iter().enumerate() {
            let prompt = scene_prompt(scene);
            let raw = self
                .retry
                .run("generate scene", || {
                    self.chat.complete(SCENE_SYSTEM_PROMPT, &prompt)
                })
                .await?;
            let code = rename_scene_class(&strip_code_fences(&raw), i);
            scene_classes.push(code);
        }

        Ok(assemble_module(&scene_classes))
    }
}

/// Build the per-scene prompt from its structured fields and raw text.
fn scene_prompt(scene: &Scene) -> String {
    format!(
        "Generate a complete Manim scene class that implements the following educational scene.\n\
        Scene Name: {name}\n\
        Duration: {duration} seconds\n\
        \n\
        Required Elements:\n\
        1. All text elements must be properly positioned and spaced\n\
        2. Animations must follow the specified sequence\n\
        3. Timing must match the requirements\n\
        4. Elements must not overlap\n\
        5. Transitions must be smooth\n\
        \n\
        Scene Details:\n\
        {details}\n\
        \n\
        Scene Requirements:\n\
        - Create a self-contained Scene class that handles all specified animations\n\
        - Use appropriate Manim animations for the described effects\n\
        - Ensure proper positioning of all elements\n\
        - Handle all specified transitions\n\
        - Follow exact timing requirements\n\
        - Clear any elements that should not persist between animations\n\
        \n\
        Generate only the complete Manim code for this scene, with no explanations or comments.\n",
        name = scene.name,
        duration = scene.duration_secs,
        details = scene.raw_text,
    )
}

/// Remove a leading ```` ```python ```` fence and a trailing fence.
fn strip_code_fences(code: &str) -> String {
    let code = code.trim();
    let code = OPENING_FENCE.replace(code, "");
    CLOSING_FENCE.replace(&code, "").to_string()
}

/// Give each generated scene a unique class name so the assembled module
/// does not redefine `Scene`.
fn rename_scene_class(code: &str, index: usize) -> String {
    SCENE_CLASS
        .replace_all(code, format!("class Scene{index}(Scene)"))
        .to_string()
}

/// Combine scene classes into one runnable module with a render footer.
fn assemble_module(scene_classes: &[String]) -> String {
    let scene_list = (0..scene_classes.len())
        .map(|i| format!("Scene{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "from manim import *\n\n{scenes}\n\nif __name__ == \"__main__\":\n    \
        scenes_to_render = [{scene_list}]\n    for scene in scenes_to_render:\n        \
        scene().render()\n",
        scenes = scene_classes.join("\n\n"),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct FakeChat {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatModel for FakeChat {
        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(user.to_string());
            Ok("```python\nclass Scene(Scene):\n    def construct(self):\n        pass\n```"
                .to_string())
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```python\nx = 1\n```"),
            "x = 1"
        );
        assert_eq!(strip_code_fences("```\nx = 1\n```"), "x = 1");
        assert_eq!(strip_code_fences("x = 1"), "x = 1");
    }

    #[test]
    fn test_rename_scene_class() {
        assert_eq!(
            rename_scene_class("class Scene(Scene):\n    pass", 2),
            "class Scene2(Scene):\n    pass"
        );
        // Already-unique names are left alone.
        assert_eq!(
            rename_scene_class("class IntroScene(Scene):\n    pass", 2),
            "class IntroScene(Scene):\n    pass"
        );
    }

    #[test]
    fn test_assemble_module() {
        let module = assemble_module(&[
            "class Scene0(Scene):\n    pass".to_string(),
            "class Scene1(Scene):\n    pass".to_string(),
        ]);
        assert!(module.starts_with("from manim import *"));
        assert!(module.contains("scenes_to_render = [Scene0, Scene1]"));
    }

    #[tokio::test]
    async fn test_generate_end_to_end_with_fake_chat() {
        let chat = Arc::new(FakeChat {
            prompts: Mutex::new(Vec::new()),
        });
        let generator = CodeGenerator::new(Arc::clone(&chat) as Arc<dyn ChatModel>, RetryPolicy::none());

        let script = "Intro (5 seconds): Text: 'Hello'. Animation: Write effect. \
            Outro (3 seconds): Text: 'Bye'. Transition: Fade out.";
        let module = generator.generate(script).await.unwrap();

        assert!(module.contains("class Scene0(Scene)"));
        assert!(module.contains("class Scene1(Scene)"));
        assert!(!module.contains("```"));

        let prompts = chat.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Scene Name: Intro"));
        assert!(prompts[0].contains("Duration: 5 seconds"));
        assert!(prompts[1].contains("Scene Name: Outro"));
    }
}
