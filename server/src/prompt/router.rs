use strum::Display;

use crate::server_config::ModelProfiles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PromptTask {
    Categorization,
    Translation,
    SecurityClassification,
    GeneralAnalysis,
}

/// Pick the model profile for a task. Pure selection over the immutable
/// profile table — never influenced by extractor output, so routing stays
/// reproducible for a given input size.
///
/// Rule order: small categorization jobs take the fast profile, translation
/// always takes the multilingual one, security classification takes the
/// accurate profile when configured, and everything else lands on the
/// balanced default.
pub fn select_model<'a>(
    profiles: &'a ModelProfiles,
    task: PromptTask,
    input_len: usize,
) -> &'a str {
    match task {
        PromptTask::Categorization if input_len < profiles.fast_input_limit => &profiles.fast,
        PromptTask::Translation => &profiles.multilingual,
        PromptTask::SecurityClassification => {
            profiles.accurate.as_deref().unwrap_or(&profiles.balanced)
        }
        _ => &profiles.balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles() -> ModelProfiles {
        ModelProfiles {
            fast: "fast-model".to_string(),
            balanced: "balanced-model".to_string(),
            accurate: Some("accurate-model".to_string()),
            multilingual: "multilingual-model".to_string(),
            fast_input_limit: 500,
        }
    }

    #[test]
    fn test_small_categorization_uses_fast() {
        let p = profiles();
        assert_eq!(select_model(&p, PromptTask::Categorization, 100), "fast-model");
    }

    #[test]
    fn test_large_categorization_falls_back_to_balanced() {
        let p = profiles();
        assert_eq!(
            select_model(&p, PromptTask::Categorization, 5000),
            "balanced-model"
        );
    }

    #[test]
    fn test_translation_uses_multilingual() {
        let p = profiles();
        assert_eq!(
            select_model(&p, PromptTask::Translation, 100),
            "multilingual-model"
        );
    }

    #[test]
    fn test_security_prefers_accurate_with_balanced_fallback() {
        let mut p = profiles();
        assert_eq!(
            select_model(&p, PromptTask::SecurityClassification, 100),
            "accurate-model"
        );
        p.accurate = None;
        assert_eq!(
            select_model(&p, PromptTask::SecurityClassification, 100),
            "balanced-model"
        );
    }

    #[test]
    fn test_general_analysis_uses_balanced() {
        let p = profiles();
        assert_eq!(
            select_model(&p, PromptTask::GeneralAnalysis, 100),
            "balanced-model"
        );
    }
}
